//! One query over one connection.
//!
//! The outer loop counts attempts: each attempt resends the request and
//! arms a fresh read deadline. The inner loop keeps reading on the same
//! connection until the deadline fires. Malformed packets, packets with a
//! foreign transaction id and replies the poison detector flags as forged
//! are dropped there without resending, so a genuine reply arriving after
//! an injected one is still picked up.

use super::poison::PoisonDetector;
use crate::dns::forwarding::{MessageBuilder, ResponseParser};
use crate::dns::transport::{DnsConnection, Framing};
use ferrous_resolv_domain::{RecordType, ResolveError, ResolveErrorKind, ResolverConfig};
use hickory_proto::op::Message;
use std::io;
use std::net::SocketAddr;
use tokio::time::Instant;
use tracing::debug;

/// Names at or above this many octets are refused before any I/O.
pub const MAX_QUERY_NAME_LEN: usize = 256;

enum ReadFailure {
    /// Deadline hit; the next attempt may still succeed.
    TimedOut,
    Fatal(io::Error),
}

/// Sends a query for `name` on `conn` and returns the first acceptable reply.
pub async fn exchange<C>(
    config: &ResolverConfig,
    conn: &mut C,
    name: &str,
    record_type: RecordType,
) -> Result<Message, ResolveError>
where
    C: DnsConnection + ?Sized,
{
    if name.len() >= MAX_QUERY_NAME_LEN {
        return Err(ResolveError::new(ResolveErrorKind::NameTooLong, name));
    }

    let query = MessageBuilder::build_query(name, &record_type)?;
    let request = match conn.framing() {
        Framing::Stream => MessageBuilder::frame_for_stream(&query.bytes),
        Framing::Datagram => query.bytes,
    };

    let server = conn.server();
    let detector = PoisonDetector::new(config);

    for attempt in 0..config.attempts {
        // A failed write is not retried.
        conn.send(&request)
            .await
            .map_err(|e| ResolveError::from_io(&e, name, server))?;

        let deadline = config.deadline().map(|timeout| Instant::now() + timeout);

        match read_reply(conn, &detector, server, name, record_type, query.id, deadline).await {
            Ok(message) => return Ok(message),
            Err(ReadFailure::TimedOut) => {
                debug!(server = %server, name = %name, attempt, "No reply before deadline");
            }
            Err(ReadFailure::Fatal(e)) => return Err(ResolveError::from_io(&e, name, server)),
        }
    }

    Err(ResolveError::new(ResolveErrorKind::NoAnswer, name)
        .with_server(server)
        .timeout())
}

async fn read_reply<C>(
    conn: &mut C,
    detector: &PoisonDetector<'_>,
    server: SocketAddr,
    name: &str,
    record_type: RecordType,
    id: u16,
    deadline: Option<Instant>,
) -> Result<Message, ReadFailure>
where
    C: DnsConnection + ?Sized,
{
    let server_str = server.to_string();

    loop {
        let read = match deadline {
            Some(at) => match tokio::time::timeout_at(at, conn.recv()).await {
                Ok(read) => read,
                Err(_) => return Err(ReadFailure::TimedOut),
            },
            None => conn.recv().await,
        };

        let bytes = match read {
            Ok(bytes) => bytes,
            Err(e) if is_timeout(&e) => return Err(ReadFailure::TimedOut),
            Err(e) => return Err(ReadFailure::Fatal(e)),
        };

        let message = match ResponseParser::decode(&bytes) {
            Ok(message) => message,
            Err(e) => {
                debug!(server = %server, error = %e, "Discarding malformed reply");
                continue;
            }
        };

        if message.id() != id {
            debug!(
                server = %server,
                expected = id,
                received = message.id(),
                "Discarding reply with mismatched id"
            );
            continue;
        }

        if detector.is_forged(name, &server_str, &message, record_type) {
            debug!(server = %server, name = %name, "Discarding forged reply, still listening");
            continue;
        }

        return Ok(message);
    }
}

fn is_timeout(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ferrous_resolv_domain::IpBlacklist;
    use hickory_proto::op::{MessageType, OpCode, Query};
    use hickory_proto::rr::rdata::A;
    use hickory_proto::rr::{Name, RData, Record};
    use std::collections::VecDeque;
    use std::net::Ipv4Addr;
    use std::str::FromStr;
    use std::sync::Arc;
    use std::time::Duration;

    enum Scripted {
        /// Reply built from the id of the last request sent.
        Reply(Box<dyn Fn(u16) -> Vec<u8> + Send>),
        Timeout,
        Fail(io::ErrorKind),
    }

    struct ScriptedConnection {
        framing: Framing,
        sends: usize,
        last_id: u16,
        last_request: Vec<u8>,
        fail_send: bool,
        script: VecDeque<Scripted>,
    }

    impl ScriptedConnection {
        fn udp(script: Vec<Scripted>) -> Self {
            Self {
                framing: Framing::Datagram,
                sends: 0,
                last_id: 0,
                last_request: Vec::new(),
                fail_send: false,
                script: script.into(),
            }
        }
    }

    #[async_trait]
    impl DnsConnection for ScriptedConnection {
        fn framing(&self) -> Framing {
            self.framing
        }

        fn server(&self) -> SocketAddr {
            "192.0.2.53:53".parse().unwrap()
        }

        async fn send(&mut self, request: &[u8]) -> io::Result<()> {
            if self.fail_send {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
            }
            self.sends += 1;
            let offset = match self.framing {
                Framing::Stream => 2,
                Framing::Datagram => 0,
            };
            self.last_id = u16::from_be_bytes([request[offset], request[offset + 1]]);
            self.last_request = request.to_vec();
            Ok(())
        }

        async fn recv(&mut self) -> io::Result<Vec<u8>> {
            match self.script.pop_front() {
                Some(Scripted::Reply(build)) => Ok(build(self.last_id)),
                Some(Scripted::Timeout) => Err(io::Error::new(io::ErrorKind::TimedOut, "t")),
                Some(Scripted::Fail(kind)) => Err(io::Error::new(kind, "boom")),
                None => Err(io::Error::new(io::ErrorKind::TimedOut, "drained")),
            }
        }
    }

    fn a_reply(id: u16, owner: &str, ip: Ipv4Addr) -> Vec<u8> {
        let name = Name::from_str(owner).unwrap();
        let mut message = Message::new(id, MessageType::Response, OpCode::Query);
        message.set_recursion_available(true);
        message.add_query(Query::query(name.clone(), hickory_proto::rr::RecordType::A));
        message.add_answer(Record::from_rdata(name, 60, RData::A(A(ip))));
        MessageBuilder::serialize_message(&message).unwrap()
    }

    fn reply(owner: &'static str, ip: Ipv4Addr) -> Scripted {
        Scripted::Reply(Box::new(move |id| a_reply(id, owner, ip)))
    }

    fn mismatched(owner: &'static str) -> Scripted {
        Scripted::Reply(Box::new(move |id| {
            a_reply(id.wrapping_add(1), owner, Ipv4Addr::new(192, 0, 2, 99))
        }))
    }

    fn config() -> ResolverConfig {
        ResolverConfig::new(vec!["192.0.2.53:53".parse().unwrap()])
            .with_timeout(Duration::from_millis(200))
            .with_attempts(2)
    }

    fn first_ip(message: &Message) -> Ipv4Addr {
        match message.answers()[0].data() {
            RData::A(a) => a.0,
            other => panic!("unexpected rdata {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_name_too_long_rejected_before_io() {
        let mut conn = ScriptedConnection::udp(vec![]);
        let name = format!("{}.", "a".repeat(255));

        let err = exchange(&config(), &mut conn, &name, RecordType::A)
            .await
            .unwrap_err();

        assert_eq!(err.kind, ResolveErrorKind::NameTooLong);
        assert_eq!(conn.sends, 0);
    }

    #[tokio::test]
    async fn test_mismatched_ids_do_not_consume_attempts() {
        let ip = Ipv4Addr::new(93, 184, 216, 34);
        let mut conn = ScriptedConnection::udp(vec![
            mismatched("example.com."),
            mismatched("example.com."),
            mismatched("example.com."),
            reply("example.com.", ip),
        ]);

        let message = exchange(&config(), &mut conn, "example.com.", RecordType::A)
            .await
            .unwrap();

        assert_eq!(conn.sends, 1);
        assert_eq!(first_ip(&message), ip);
    }

    #[tokio::test]
    async fn test_malformed_packets_skipped() {
        let ip = Ipv4Addr::new(198, 51, 100, 1);
        let mut conn = ScriptedConnection::udp(vec![
            Scripted::Reply(Box::new(|_| vec![0xde, 0xad])),
            reply("example.com.", ip),
        ]);

        let message = exchange(&config(), &mut conn, "example.com.", RecordType::A)
            .await
            .unwrap();

        assert_eq!(conn.sends, 1);
        assert_eq!(first_ip(&message), ip);
    }

    #[tokio::test]
    async fn test_timeout_moves_to_next_attempt() {
        let ip = Ipv4Addr::new(198, 51, 100, 2);
        let mut conn = ScriptedConnection::udp(vec![Scripted::Timeout, reply("example.com.", ip)]);

        let message = exchange(&config(), &mut conn, "example.com.", RecordType::A)
            .await
            .unwrap();

        assert_eq!(conn.sends, 2);
        assert_eq!(first_ip(&message), ip);
    }

    #[tokio::test]
    async fn test_attempts_exhausted_reports_timeout() {
        let mut conn = ScriptedConnection::udp(vec![Scripted::Timeout, Scripted::Timeout]);

        let err = exchange(&config(), &mut conn, "example.com.", RecordType::A)
            .await
            .unwrap_err();

        assert_eq!(conn.sends, 2);
        assert_eq!(err.kind, ResolveErrorKind::NoAnswer);
        assert!(err.is_timeout);
        assert_eq!(err.name, "example.com.");
        assert_eq!(err.server.as_deref(), Some("192.0.2.53:53"));
    }

    #[tokio::test]
    async fn test_read_error_aborts_exchange() {
        let mut conn = ScriptedConnection::udp(vec![
            Scripted::Fail(io::ErrorKind::ConnectionRefused),
            reply("example.com.", Ipv4Addr::new(192, 0, 2, 1)),
        ]);

        let err = exchange(&config(), &mut conn, "example.com.", RecordType::A)
            .await
            .unwrap_err();

        assert_eq!(conn.sends, 1);
        assert!(matches!(err.kind, ResolveErrorKind::Io(_)));
        assert!(!err.is_timeout);
    }

    #[tokio::test]
    async fn test_write_error_is_not_retried() {
        let mut conn = ScriptedConnection::udp(vec![]);
        conn.fail_send = true;

        let err = exchange(&config(), &mut conn, "example.com.", RecordType::A)
            .await
            .unwrap_err();

        assert!(matches!(err.kind, ResolveErrorKind::Io(_)));
    }

    #[tokio::test]
    async fn test_forged_reply_discarded_without_resend() {
        let forged = Ipv4Addr::new(243, 185, 187, 39);
        let genuine = Ipv4Addr::new(93, 184, 216, 34);
        let blacklist: IpBlacklist = "243.185.187.39".parse().unwrap();
        let config = config().with_blacklist(Arc::new(blacklist));

        let mut conn = ScriptedConnection::udp(vec![
            reply("example.com.", forged),
            reply("example.com.", genuine),
        ]);

        let message = exchange(&config, &mut conn, "example.com.", RecordType::A)
            .await
            .unwrap();

        assert_eq!(conn.sends, 1);
        assert_eq!(first_ip(&message), genuine);
    }

    #[tokio::test]
    async fn test_only_forged_replies_time_out() {
        let forged = Ipv4Addr::new(243, 185, 187, 39);
        let blacklist: IpBlacklist = "243.185.187.39".parse().unwrap();
        let config = config().with_blacklist(Arc::new(blacklist)).with_attempts(1);

        let mut conn = ScriptedConnection::udp(vec![reply("example.com.", forged)]);

        let err = exchange(&config, &mut conn, "example.com.", RecordType::A)
            .await
            .unwrap_err();

        assert_eq!(err.kind, ResolveErrorKind::NoAnswer);
        assert!(err.is_timeout);
    }

    #[tokio::test]
    async fn test_stream_request_is_length_prefixed() {
        let ip = Ipv4Addr::new(192, 0, 2, 10);
        let mut conn = ScriptedConnection::udp(vec![reply("example.com.", ip)]);
        conn.framing = Framing::Stream;

        exchange(&config(), &mut conn, "example.com.", RecordType::A)
            .await
            .unwrap();

        let declared = u16::from_be_bytes([conn.last_request[0], conn.last_request[1]]) as usize;
        assert_eq!(declared, conn.last_request.len() - 2);
    }

    #[tokio::test]
    async fn test_deadline_bounds_silent_server() {
        struct Silent;

        #[async_trait]
        impl DnsConnection for Silent {
            fn framing(&self) -> Framing {
                Framing::Datagram
            }
            fn server(&self) -> SocketAddr {
                "192.0.2.53:53".parse().unwrap()
            }
            async fn send(&mut self, _request: &[u8]) -> io::Result<()> {
                Ok(())
            }
            async fn recv(&mut self) -> io::Result<Vec<u8>> {
                std::future::pending().await
            }
        }

        let config = config().with_timeout(Duration::from_millis(50)).with_attempts(2);
        let started = std::time::Instant::now();
        let err = exchange(&config, &mut Silent, "example.com.", RecordType::A)
            .await
            .unwrap_err();

        assert!(err.is_timeout);
        assert!(started.elapsed() >= Duration::from_millis(100));
    }
}
