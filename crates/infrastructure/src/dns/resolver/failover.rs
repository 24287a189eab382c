use super::exchange::exchange;
use crate::dns::forwarding::ResponseParser;
use crate::dns::transport::{self, Protocol};
use ferrous_resolv_domain::{
    RecordType, Resolution, ResolveError, ResolveErrorKind, ResolverConfig,
};
use std::net::SocketAddr;
use tracing::{debug, warn};

/// Resolves one root-terminated name, trying the configured servers in order.
///
/// The first server to produce an answer wins. An authoritative "no such
/// host" ends the walk as well; any other failure moves on to the next
/// server and only the last one is reported.
pub async fn try_one_name(
    config: &ResolverConfig,
    name: &str,
    record_type: RecordType,
) -> Result<Resolution, ResolveError> {
    if config.servers.is_empty() {
        return Err(ResolveError::new(ResolveErrorKind::NoServers, name));
    }
    debug!(strategy = "failover", servers = config.servers.len(), name = %name, "Trying sequentially");

    let mut last_error = None;

    for (position, server) in config.servers.iter().enumerate() {
        match query_server(config, *server, name, record_type).await {
            Ok(resolution) => {
                debug!(server = %server, position, records = resolution.records.len(), "Server answered");
                return Ok(resolution);
            }
            Err(e) if e.is_no_such_host() => {
                debug!(server = %server, name = %name, "No such host");
                return Err(e);
            }
            Err(e) => {
                warn!(server = %server, error = %e, position, "Failing over");
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| ResolveError::new(ResolveErrorKind::NoServers, name)))
}

/// Queries a single server over UDP, moving to TCP when the reply is truncated.
pub async fn query_server(
    config: &ResolverConfig,
    server: SocketAddr,
    name: &str,
    record_type: RecordType,
) -> Result<Resolution, ResolveError> {
    let mut udp = transport::connect(Protocol::Udp, server, None)
        .await
        .map_err(|e| ResolveError::from_io(&e, name, server))?;
    let mut message = exchange(config, &mut udp, name, record_type).await?;
    drop(udp);

    // RFC 7766 §5: a truncated answer is retried over a stream transport.
    if message.truncated() {
        debug!(server = %server, name = %name, "Response truncated (TC bit), retrying via TCP");

        let mut tcp = transport::connect(Protocol::Tcp, server, config.deadline())
            .await
            .map_err(|e| ResolveError::from_io(&e, name, server))?;
        debug!(server = %server, protocol = %tcp.protocol(), "Stream connection open");
        message = exchange(config, &mut tcp, name, record_type).await?;
    }

    ResponseParser::extract_answer(name, &server.to_string(), &message, &record_type)
}
