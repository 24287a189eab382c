use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// An address record extracted from a reply's answer section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DnsRecord {
    A(Ipv4Addr),
    Aaaa(Ipv6Addr),
}

impl DnsRecord {
    pub fn ip(&self) -> IpAddr {
        match self {
            DnsRecord::A(v4) => IpAddr::V4(*v4),
            DnsRecord::Aaaa(v6) => IpAddr::V6(*v6),
        }
    }

    pub fn ipv4(&self) -> Option<Ipv4Addr> {
        match self {
            DnsRecord::A(v4) => Some(*v4),
            DnsRecord::Aaaa(_) => None,
        }
    }
}

impl From<IpAddr> for DnsRecord {
    fn from(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(v4) => DnsRecord::A(v4),
            IpAddr::V6(v6) => DnsRecord::Aaaa(v6),
        }
    }
}
