//! Process-wide resolver loaded lazily from [`DEFAULT_RESOLV_CONF`].
//!
//! The first caller loads the file; concurrent first callers block until
//! that finishes and all of them observe the same outcome. The file is
//! never re-read.

use super::StubResolver;
use ferrous_resolv_domain::dns_name::is_domain_name;
use ferrous_resolv_domain::{
    ConfigError, RecordType, Resolution, ResolveError, ResolveErrorKind, DEFAULT_RESOLV_CONF,
};
use std::net::IpAddr;
use std::sync::OnceLock;
use tracing::error;

static SYSTEM_RESOLVER: OnceLock<Result<StubResolver, ConfigError>> = OnceLock::new();

pub fn system_resolver() -> Result<&'static StubResolver, ConfigError> {
    SYSTEM_RESOLVER
        .get_or_init(|| {
            StubResolver::from_file(DEFAULT_RESOLV_CONF).inspect_err(|e| {
                error!(path = DEFAULT_RESOLV_CONF, error = %e, "Failed to load resolver configuration");
            })
        })
        .as_ref()
        .map_err(Clone::clone)
}

/// Name syntax is checked before the configuration is touched, so a bad
/// name is reported as such even when the file cannot be loaded.
fn resolver_for(name: &str) -> Result<&'static StubResolver, ResolveError> {
    if !is_domain_name(name) {
        return Err(ResolveError::new(ResolveErrorKind::InvalidDomainName, name));
    }
    system_resolver()
        .map_err(|e| ResolveError::new(ResolveErrorKind::Config(e.to_string()), name))
}

pub async fn lookup(name: &str, record_type: RecordType) -> Result<Resolution, ResolveError> {
    resolver_for(name)?.lookup(name, record_type).await
}

pub async fn lookup_ip(name: &str) -> Result<Vec<IpAddr>, ResolveError> {
    resolver_for(name)?.lookup_ip(name).await
}

pub async fn lookup_host(name: &str) -> Result<Vec<String>, ResolveError> {
    resolver_for(name)?.lookup_host(name).await
}
