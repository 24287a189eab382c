//! Forged reply detection.
//!
//! Only direct A answers are judged: the reply must name the queried host
//! itself (no alias chain) and the configuration must carry a blacklist.
//! An empty answer set is treated as forged too, since injectors for
//! blocked names sometimes answer with nothing at all. Genuinely empty
//! names can therefore look poisoned while a blacklist is configured.

use crate::dns::forwarding::ResponseParser;
use ferrous_resolv_domain::{
    Blacklist, DnsRecord, RecordType, Resolution, ResolveError, ResolverConfig,
};
use hickory_proto::op::Message;
use std::net::IpAddr;
use tracing::debug;

pub struct PoisonDetector<'a> {
    config: &'a ResolverConfig,
}

impl<'a> PoisonDetector<'a> {
    pub fn new(config: &'a ResolverConfig) -> Self {
        Self { config }
    }

    /// Returns true when `message` should be dropped as forged.
    pub fn is_forged(
        &self,
        name: &str,
        server: &str,
        message: &Message,
        record_type: RecordType,
    ) -> bool {
        // AAAA replies are never judged.
        if record_type != RecordType::A {
            return false;
        }
        if self.config.servers.is_empty() {
            return false;
        }
        let Some(blacklist) = self.config.blacklist.as_deref() else {
            return false;
        };

        let answer = ResponseParser::extract_answer(name, server, message, &record_type);
        classify(name, answer, blacklist)
    }
}

/// Verdict on an already extracted answer.
pub fn classify(
    name: &str,
    answer: Result<Resolution, ResolveError>,
    blacklist: &dyn Blacklist,
) -> bool {
    // Extraction failures are left to the caller's normal error handling.
    let Ok(resolution) = answer else {
        return false;
    };

    if resolution.cname != name {
        return false;
    }

    if resolution.records.is_empty() {
        debug!(name = %name, "Empty answer set treated as forged");
        return true;
    }

    let addrs: Vec<IpAddr> = resolution
        .records
        .iter()
        .filter_map(DnsRecord::ipv4)
        .map(IpAddr::V4)
        .collect();

    if blacklist.check_black(&addrs) {
        debug!(name = %name, addresses = ?addrs, "Blacklisted address in reply");
        return true;
    }

    false
}
