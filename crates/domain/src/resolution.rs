use crate::DnsRecord;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Successful answer to one name and record type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Name reached after following the alias chain, root-terminated.
    pub cname: String,
    pub records: Vec<DnsRecord>,
}

impl Resolution {
    pub fn new(cname: impl Into<String>, records: Vec<DnsRecord>) -> Self {
        Self {
            cname: cname.into(),
            records,
        }
    }

    pub fn addresses(&self) -> Vec<IpAddr> {
        self.records.iter().map(DnsRecord::ip).collect()
    }
}
