use super::ConfigError;
use ipnetwork::IpNetwork;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// Membership test for addresses known to be returned by forged replies.
pub trait Blacklist: Send + Sync {
    /// Returns true when any of `addrs` is blacklisted.
    fn check_black(&self, addrs: &[IpAddr]) -> bool;
}

impl<F> Blacklist for F
where
    F: Fn(&[IpAddr]) -> bool + Send + Sync,
{
    fn check_black(&self, addrs: &[IpAddr]) -> bool {
        self(addrs)
    }
}

/// Blacklist backed by single addresses and CIDR networks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IpBlacklist {
    networks: Vec<IpNetwork>,
}

impl IpBlacklist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, network: IpNetwork) {
        if !self.networks.contains(&network) {
            self.networks.push(network);
        }
    }

    /// Accepts `192.0.2.1`, `2001:db8::1` or `10.0.0.0/8` forms.
    pub fn insert_str(&mut self, entry: &str) -> Result<(), String> {
        // A bare address parses as a host network (/32 or /128).
        let network = IpNetwork::from_str(entry)
            .map_err(|e| format!("invalid blacklist entry '{}': {}", entry, e))?;
        self.insert(network);
        Ok(())
    }

    pub fn contains(&self, addr: IpAddr) -> bool {
        self.networks.iter().any(|net| net.contains(addr))
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}

impl Blacklist for IpBlacklist {
    fn check_black(&self, addrs: &[IpAddr]) -> bool {
        addrs.iter().any(|addr| self.contains(*addr))
    }
}

impl FromStr for IpBlacklist {
    type Err = ConfigError;

    /// Parses whitespace or comma separated entries.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut list = IpBlacklist::new();
        for entry in s.split(|c: char| c.is_whitespace() || c == ',') {
            if entry.is_empty() {
                continue;
            }
            list.insert_str(entry).map_err(ConfigError::Validation)?;
        }
        Ok(list)
    }
}

impl fmt::Display for IpBlacklist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries: Vec<String> = self.networks.iter().map(|n| n.to_string()).collect();
        write!(f, "{}", entries.join(" "))
    }
}
