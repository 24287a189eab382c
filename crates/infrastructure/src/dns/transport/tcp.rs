//! TCP Transport for DNS queries (RFC 1035 §4.2.2, RFC 7766)

use super::{DnsConnection, Framing};
use async_trait::async_trait;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

/// TCP stream to a single nameserver, used for truncated UDP answers
pub struct TcpConnection {
    stream: TcpStream,
    server_addr: SocketAddr,
}

impl TcpConnection {
    pub async fn connect(server_addr: SocketAddr, timeout: Option<Duration>) -> io::Result<Self> {
        let stream = match timeout {
            Some(limit) => tokio::time::timeout(limit, TcpStream::connect(server_addr))
                .await
                .map_err(|_| {
                    io::Error::new(
                        io::ErrorKind::TimedOut,
                        format!("timeout connecting to TCP server {}", server_addr),
                    )
                })??,
            None => TcpStream::connect(server_addr).await?,
        };

        stream.set_nodelay(true)?;

        Ok(Self {
            stream,
            server_addr,
        })
    }
}

#[async_trait]
impl DnsConnection for TcpConnection {
    fn framing(&self) -> Framing {
        Framing::Stream
    }

    fn server(&self) -> SocketAddr {
        self.server_addr
    }

    async fn send(&mut self, request: &[u8]) -> io::Result<()> {
        self.stream.write_all(request).await?;
        self.stream.flush().await?;
        debug!(server = %self.server_addr, message_len = request.len(), "TCP query sent");
        Ok(())
    }

    async fn recv(&mut self) -> io::Result<Vec<u8>> {
        let response = read_with_length_prefix(&mut self.stream).await?;
        debug!(server = %self.server_addr, response_len = response.len(), "TCP response received");
        Ok(response)
    }
}

/// Reads exactly one length-prefixed message.
pub(crate) async fn read_with_length_prefix<S>(stream: &mut S) -> io::Result<Vec<u8>>
where
    S: AsyncReadExt + Unpin,
{
    let mut len_buf = [0u8; 2];
    stream.read_exact(&mut len_buf).await?;

    let response_len = u16::from_be_bytes(len_buf) as usize;

    let mut response = vec![0u8; response_len];
    stream.read_exact(&mut response).await?;

    Ok(response)
}
