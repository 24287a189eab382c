use std::io;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveErrorKind {
    #[error("invalid domain name")]
    InvalidDomainName,

    #[error("name too long")]
    NameTooLong,

    #[error("no DNS servers")]
    NoServers,

    #[error("no answer from server")]
    NoAnswer,

    #[error("no such host")]
    NoSuchHost,

    #[error("internal error - cannot pack message")]
    CannotPack,

    #[error("server misbehaving")]
    ServerMisbehaving,

    #[error("too many redirects")]
    TooManyRedirects,

    #[error("{0}")]
    Io(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Failure of a lookup, reported against the name the caller asked for.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("lookup {name}{}: {kind}", .server.as_ref().map(|s| format!(" on {}", s)).unwrap_or_default())]
pub struct ResolveError {
    pub kind: ResolveErrorKind,
    pub name: String,
    pub server: Option<String>,
    pub is_timeout: bool,
}

impl ResolveError {
    pub fn new(kind: ResolveErrorKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            server: None,
            is_timeout: false,
        }
    }

    pub fn with_server(mut self, server: impl ToString) -> Self {
        self.server = Some(server.to_string());
        self
    }

    pub fn timeout(mut self) -> Self {
        self.is_timeout = true;
        self
    }

    /// Wraps a socket failure, keeping the timeout classification.
    pub fn from_io(err: &io::Error, name: impl Into<String>, server: impl ToString) -> Self {
        let is_timeout = matches!(
            err.kind(),
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
        );
        Self {
            kind: ResolveErrorKind::Io(err.to_string()),
            name: name.into(),
            server: Some(server.to_string()),
            is_timeout,
        }
    }

    pub fn is_no_such_host(&self) -> bool {
        self.kind == ResolveErrorKind::NoSuchHost
    }

    pub fn is_timeout(&self) -> bool {
        self.is_timeout
    }
}
