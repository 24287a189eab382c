//! UDP Transport for DNS queries (RFC 1035 §4.2.1)
//!
//! Messages are sent as-is (no framing). If the response has the TC
//! (truncated) bit set, the caller should retry via TCP.

use super::{DnsConnection, Framing};
use async_trait::async_trait;
use std::io;
use std::net::SocketAddr;
use tokio::net::UdpSocket;
use tracing::debug;

/// Receive buffer size; larger datagrams are cut short by the kernel.
pub const MAX_UDP_RESPONSE_SIZE: usize = 4096;

/// Connected UDP socket to a single nameserver
pub struct UdpConnection {
    socket: UdpSocket,
    server_addr: SocketAddr,
}

impl UdpConnection {
    pub async fn connect(server_addr: SocketAddr) -> io::Result<Self> {
        // Bind to ephemeral port (0 = OS assigns)
        let bind_addr: SocketAddr = if server_addr.is_ipv4() {
            SocketAddr::from(([0, 0, 0, 0], 0))
        } else {
            SocketAddr::from(([0u16; 8], 0))
        };

        let socket = UdpSocket::bind(bind_addr).await?;
        socket.connect(server_addr).await?;

        Ok(Self {
            socket,
            server_addr,
        })
    }
}

#[async_trait]
impl DnsConnection for UdpConnection {
    fn framing(&self) -> Framing {
        Framing::Datagram
    }

    fn server(&self) -> SocketAddr {
        self.server_addr
    }

    async fn send(&mut self, request: &[u8]) -> io::Result<()> {
        let bytes_sent = self.socket.send(request).await?;
        debug!(server = %self.server_addr, bytes_sent, "UDP query sent");
        Ok(())
    }

    async fn recv(&mut self) -> io::Result<Vec<u8>> {
        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        let bytes_received = self.socket.recv(&mut recv_buf).await?;
        recv_buf.truncate(bytes_received);

        debug!(server = %self.server_addr, bytes_received, "UDP response received");
        Ok(recv_buf)
    }
}
