pub mod blacklist;
pub mod errors;
pub mod resolv_conf;
pub mod resolver;

pub use blacklist::{Blacklist, IpBlacklist};
pub use errors::ConfigError;
pub use resolver::{ResolverConfig, DEFAULT_RESOLV_CONF, MAX_NAMESERVERS};
