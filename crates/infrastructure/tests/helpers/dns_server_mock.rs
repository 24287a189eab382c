#![allow(dead_code)]
use hickory_proto::op::Message;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tokio::sync::oneshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Via {
    Udp,
    Tcp,
}

/// Decides what the server sends back for one query: zero or more raw
/// messages, delivered in order.
pub type Handler = Arc<dyn Fn(&Message, Via) -> Vec<Vec<u8>> + Send + Sync>;

#[derive(Default)]
struct Counters {
    udp_queries: AtomicUsize,
    tcp_queries: AtomicUsize,
    names: Mutex<Vec<(String, String)>>,
}

/// Scripted nameserver on localhost answering UDP and TCP on one port.
pub struct MockDnsServer {
    addr: SocketAddr,
    counters: Arc<Counters>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start<F>(handler: F) -> Self
    where
        F: Fn(&Message, Via) -> Vec<Vec<u8>> + Send + Sync + 'static,
    {
        let handler: Handler = Arc::new(handler);
        let (udp, tcp) = bind_pair().await;
        let addr = udp.local_addr().unwrap();
        let counters = Arc::new(Counters::default());
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let udp_handler = Arc::clone(&handler);
        let udp_counters = Arc::clone(&counters);
        let tcp_handler = handler;
        let tcp_counters = Arc::clone(&counters);

        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = udp.recv_from(&mut buf) => {
                        let Ok((len, peer)) = result else { continue };
                        let Ok(query) = Message::from_vec(&buf[..len]) else { continue };
                        udp_counters.udp_queries.fetch_add(1, Ordering::SeqCst);
                        record_name(&udp_counters, &query);
                        for response in udp_handler(&query, Via::Udp) {
                            let _ = udp.send_to(&response, peer).await;
                        }
                    }
                    accepted = tcp.accept() => {
                        let Ok((stream, _)) = accepted else { continue };
                        tokio::spawn(serve_tcp(
                            stream,
                            Arc::clone(&tcp_handler),
                            Arc::clone(&tcp_counters),
                        ));
                    }
                }
            }
        });

        Self {
            addr,
            counters,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn udp_queries(&self) -> usize {
        self.counters.udp_queries.load(Ordering::SeqCst)
    }

    pub fn tcp_queries(&self) -> usize {
        self.counters.tcp_queries.load(Ordering::SeqCst)
    }

    /// `(name, type)` of every query received, in arrival order.
    pub fn queried(&self) -> Vec<(String, String)> {
        self.counters.names.lock().unwrap().clone()
    }

    pub fn queried_names(&self) -> Vec<String> {
        self.queried().into_iter().map(|(name, _)| name).collect()
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// A UDP socket that swallows every query. Stands in for an unreachable server.
pub struct SilentServer {
    socket: UdpSocket,
}

impl SilentServer {
    pub async fn start() -> Self {
        Self {
            socket: UdpSocket::bind("127.0.0.1:0").await.unwrap(),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.socket.local_addr().unwrap()
    }
}

async fn bind_pair() -> (UdpSocket, TcpListener) {
    for _ in 0..16 {
        let udp = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = udp.local_addr().unwrap();
        if let Ok(tcp) = TcpListener::bind(addr).await {
            return (udp, tcp);
        }
    }
    panic!("could not bind UDP and TCP on the same port");
}

fn record_name(counters: &Counters, query: &Message) {
    if let Some(question) = query.queries().first() {
        counters.names.lock().unwrap().push((
            question.name().to_string(),
            question.query_type().to_string(),
        ));
    }
}

async fn serve_tcp(mut stream: TcpStream, handler: Handler, counters: Arc<Counters>) {
    loop {
        let mut len_buf = [0u8; 2];
        if stream.read_exact(&mut len_buf).await.is_err() {
            return;
        }
        let mut request = vec![0u8; u16::from_be_bytes(len_buf) as usize];
        if stream.read_exact(&mut request).await.is_err() {
            return;
        }
        let Ok(query) = Message::from_vec(&request) else {
            return;
        };
        counters.tcp_queries.fetch_add(1, Ordering::SeqCst);
        record_name(&counters, &query);

        for response in handler(&query, Via::Tcp) {
            let mut framed = (response.len() as u16).to_be_bytes().to_vec();
            framed.extend_from_slice(&response);
            if stream.write_all(&framed).await.is_err() {
                return;
            }
        }
    }
}
