pub mod tcp;
pub mod udp;

use async_trait::async_trait;
use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

/// How replies are delimited on a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// One message per datagram (RFC 1035 §4.2.1).
    Datagram,
    /// Two-octet big-endian length before every message (RFC 1035 §4.2.2, RFC 7766).
    Stream,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Udp,
    Tcp,
}

impl Protocol {
    pub fn protocol_name(&self) -> &'static str {
        match self {
            Self::Udp => "UDP",
            Self::Tcp => "TCP",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.protocol_name())
    }
}

/// One connection to one nameserver, owned by a single exchange.
///
/// Callers write a request already framed for [`DnsConnection::framing`]
/// and read back one unframed reply per `recv`. Deadlines are applied by
/// the caller around `recv`.
#[async_trait]
pub trait DnsConnection: Send {
    fn framing(&self) -> Framing;

    fn server(&self) -> SocketAddr;

    async fn send(&mut self, request: &[u8]) -> io::Result<()>;

    async fn recv(&mut self) -> io::Result<Vec<u8>>;
}

pub enum Connection {
    Udp(udp::UdpConnection),
    Tcp(tcp::TcpConnection),
}

impl Connection {
    pub fn protocol(&self) -> Protocol {
        match self {
            Self::Udp(_) => Protocol::Udp,
            Self::Tcp(_) => Protocol::Tcp,
        }
    }
}

#[async_trait]
impl DnsConnection for Connection {
    fn framing(&self) -> Framing {
        match self {
            Self::Udp(c) => c.framing(),
            Self::Tcp(c) => c.framing(),
        }
    }

    fn server(&self) -> SocketAddr {
        match self {
            Self::Udp(c) => c.server(),
            Self::Tcp(c) => c.server(),
        }
    }

    async fn send(&mut self, request: &[u8]) -> io::Result<()> {
        match self {
            Self::Udp(c) => c.send(request).await,
            Self::Tcp(c) => c.send(request).await,
        }
    }

    async fn recv(&mut self) -> io::Result<Vec<u8>> {
        match self {
            Self::Udp(c) => c.recv().await,
            Self::Tcp(c) => c.recv().await,
        }
    }
}

/// Opens a connection to `server`. `connect_timeout` bounds TCP setup only;
/// UDP setup never blocks on the network.
pub async fn connect(
    protocol: Protocol,
    server: SocketAddr,
    connect_timeout: Option<Duration>,
) -> io::Result<Connection> {
    match protocol {
        Protocol::Udp => Ok(Connection::Udp(udp::UdpConnection::connect(server).await?)),
        Protocol::Tcp => Ok(Connection::Tcp(
            tcp::TcpConnection::connect(server, connect_timeout).await?,
        )),
    }
}
