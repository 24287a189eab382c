use clap::ValueEnum;
use ferrous_resolv_domain::{RecordType, ResolveError};
use ferrous_resolv_infrastructure::dns::StubResolver;
use serde::Serialize;
use std::net::IpAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LookupKind {
    A,
    Aaaa,
    /// A and AAAA combined
    Ip,
}

pub struct Answer {
    pub cname: Option<String>,
    pub addresses: Vec<IpAddr>,
}

pub async fn resolve(
    resolver: &StubResolver,
    name: &str,
    kind: LookupKind,
) -> Result<Answer, ResolveError> {
    let record_type = match kind {
        LookupKind::A => RecordType::A,
        LookupKind::Aaaa => RecordType::AAAA,
        LookupKind::Ip => {
            let addresses = resolver.lookup_ip(name).await?;
            return Ok(Answer {
                cname: None,
                addresses,
            });
        }
    };

    let resolution = resolver.lookup(name, record_type).await?;
    Ok(Answer {
        addresses: resolution.addresses(),
        cname: Some(resolution.cname),
    })
}

/// One printed result line.
#[derive(Debug, Serialize)]
pub struct LookupOutput {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cname: Option<String>,
    pub addresses: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timeout: bool,
}

impl LookupOutput {
    pub fn new(name: &str, kind: LookupKind, result: Result<Answer, ResolveError>) -> Self {
        let kind = match kind {
            LookupKind::A => "A",
            LookupKind::Aaaa => "AAAA",
            LookupKind::Ip => "IP",
        };

        match result {
            Ok(answer) => Self {
                name: name.to_string(),
                kind,
                cname: answer.cname,
                addresses: answer.addresses.iter().map(IpAddr::to_string).collect(),
                error: None,
                timeout: false,
            },
            Err(e) => Self {
                name: name.to_string(),
                kind,
                cname: None,
                addresses: Vec::new(),
                timeout: e.is_timeout(),
                error: Some(e.to_string()),
            },
        }
    }

    /// `name<TAB>addr,addr,...`, or `name<TAB>error: ...` on failure.
    pub fn to_text(&self) -> String {
        match &self.error {
            Some(error) => format!("{}\terror: {}", self.name, error),
            None => format!("{}\t{}", self.name, self.addresses.join(",")),
        }
    }
}
