use super::{resolv_conf, Blacklist, ConfigError};
use std::fmt;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_RESOLV_CONF: &str = "/etc/goproxy/resolv.conf";

/// Standard resolver limit on `nameserver` lines.
pub const MAX_NAMESERVERS: usize = 3;

/// Immutable resolver settings shared read-only by every lookup.
#[derive(Clone)]
pub struct ResolverConfig {
    /// Queried in order. Always literal addresses, never host names.
    pub servers: Vec<SocketAddr>,
    pub search: Vec<String>,
    pub ndots: usize,
    /// Per-attempt read deadline. `Duration::ZERO` waits forever.
    pub timeout: Duration,
    pub attempts: usize,
    pub blacklist: Option<Arc<dyn Blacklist>>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            servers: Vec::new(),
            search: Vec::new(),
            ndots: default_ndots(),
            timeout: default_timeout(),
            attempts: default_attempts(),
            blacklist: None,
        }
    }
}

fn default_ndots() -> usize {
    1
}

fn default_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_attempts() -> usize {
    2
}

impl ResolverConfig {
    pub fn new(servers: Vec<SocketAddr>) -> Self {
        Self {
            servers,
            ..Self::default()
        }
    }

    pub fn with_search(mut self, search: Vec<String>) -> Self {
        self.search = search;
        self
    }

    pub fn with_ndots(mut self, ndots: usize) -> Self {
        self.ndots = ndots;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_attempts(mut self, attempts: usize) -> Self {
        self.attempts = attempts;
        self
    }

    pub fn with_blacklist(mut self, blacklist: Arc<dyn Blacklist>) -> Self {
        self.blacklist = Some(blacklist);
        self
    }

    /// Reads a resolv.conf style file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.display().to_string(), e.to_string()))?;
        let config = resolv_conf::parse(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.attempts == 0 {
            return Err(ConfigError::Validation(
                "attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn deadline(&self) -> Option<Duration> {
        if self.timeout.is_zero() {
            None
        } else {
            Some(self.timeout)
        }
    }

    /// Poison detection only runs with servers and a blacklist present.
    pub fn has_blacklist(&self) -> bool {
        !self.servers.is_empty() && self.blacklist.is_some()
    }
}

impl fmt::Debug for ResolverConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverConfig")
            .field("servers", &self.servers)
            .field("search", &self.search)
            .field("ndots", &self.ndots)
            .field("timeout", &self.timeout)
            .field("attempts", &self.attempts)
            .field("blacklist", &self.blacklist.is_some())
            .finish()
    }
}
