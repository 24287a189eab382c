//! Ferrous Resolv Domain Layer
pub mod config;
pub mod dns_name;
pub mod dns_record;
pub mod errors;
pub mod resolution;

pub use config::{
    Blacklist, ConfigError, IpBlacklist, ResolverConfig, DEFAULT_RESOLV_CONF, MAX_NAMESERVERS,
};
pub use dns_record::{DnsRecord, RecordType};
pub use errors::{ResolveError, ResolveErrorKind};
pub use resolution::Resolution;
