use super::{dual_stack, search};
use ferrous_resolv_domain::{
    ConfigError, RecordType, Resolution, ResolveError, ResolverConfig,
};
use std::net::IpAddr;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Stub resolver querying the configured nameservers directly.
///
/// Cheap to clone; every clone shares the same read-only configuration.
/// Lookups are independent and each one owns its sockets.
#[derive(Debug, Clone)]
pub struct StubResolver {
    config: Arc<ResolverConfig>,
}

impl StubResolver {
    pub fn new(config: Arc<ResolverConfig>) -> Self {
        info!(
            servers = config.servers.len(),
            search = config.search.len(),
            ndots = config.ndots,
            timeout_ms = config.timeout.as_millis() as u64,
            attempts = config.attempts,
            blacklist = config.has_blacklist(),
            "Stub resolver created"
        );
        Self { config }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = ResolverConfig::from_file(path)?;
        Ok(Self::new(Arc::new(config)))
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolves `name` for one record type, applying the search list.
    pub async fn lookup(
        &self,
        name: &str,
        record_type: RecordType,
    ) -> Result<Resolution, ResolveError> {
        debug!(name = %name, record_type = %record_type, "Lookup");
        search::lookup(&self.config, name, record_type).await
    }

    /// IPv4 addresses followed by IPv6 addresses.
    pub async fn lookup_ip(&self, name: &str) -> Result<Vec<IpAddr>, ResolveError> {
        dual_stack::lookup_ip(&self.config, name).await
    }

    pub async fn lookup_host(&self, name: &str) -> Result<Vec<String>, ResolveError> {
        let addrs = self.lookup_ip(name).await?;
        Ok(addrs.iter().map(IpAddr::to_string).collect())
    }
}
