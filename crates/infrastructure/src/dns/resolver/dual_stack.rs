use super::search;
use ferrous_resolv_domain::{RecordType, Resolution, ResolveError, ResolverConfig};
use std::net::IpAddr;
use tracing::debug;

/// Looks up A then AAAA records for `name` and returns IPv4 addresses
/// followed by IPv6 addresses.
///
/// The AAAA query follows the canonical name found by the A query. One
/// family failing is tolerated as long as the other produced something.
pub async fn lookup_ip(config: &ResolverConfig, name: &str) -> Result<Vec<IpAddr>, ResolveError> {
    let v4 = search::lookup(config, name, RecordType::A).await;

    let aaaa_name = match &v4 {
        Ok(resolution) if !resolution.cname.is_empty() => resolution.cname.clone(),
        _ => name.to_string(),
    };

    let v6 = search::lookup(config, &aaaa_name, RecordType::AAAA).await;

    combine(v4, v6)
}

/// Applies the error suppression policy to the two family results.
pub fn combine(
    v4: Result<Resolution, ResolveError>,
    v6: Result<Resolution, ResolveError>,
) -> Result<Vec<IpAddr>, ResolveError> {
    let (mut addrs, err4) = match v4 {
        Ok(resolution) => (resolution.addresses(), None),
        Err(e) => (Vec::new(), Some(e)),
    };
    let (v6_addrs, err6) = match v6 {
        Ok(resolution) => (resolution.addresses(), None),
        Err(e) => (Vec::new(), Some(e)),
    };

    match (err4, err6) {
        (Some(e4), Some(_)) => Err(e4),
        (None, Some(e6)) if addrs.is_empty() => Err(e6),
        (err4, err6) => {
            if let Some(e) = err4 {
                debug!(error = %e, "Ignoring A failure, AAAA lookup succeeded");
            }
            if let Some(e) = err6 {
                debug!(error = %e, "Ignoring AAAA failure, A lookup succeeded");
            }
            addrs.extend(v6_addrs);
            Ok(addrs)
        }
    }
}
