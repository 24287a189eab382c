//! DNS Message Builder
//!
//! Constructs DNS query messages in wire format using `hickory-proto`.

use super::record_type_map::RecordTypeMapper;
use ferrous_resolv_domain::{RecordType, ResolveError, ResolveErrorKind};
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::Name;
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

/// Encoded query together with the id a reply must echo.
#[derive(Debug, Clone)]
pub struct QueryMessage {
    pub id: u16,
    pub bytes: Vec<u8>,
}

/// Builds DNS query messages in wire format
pub struct MessageBuilder;

impl MessageBuilder {
    /// Build a recursive query for `domain`, which should be root-terminated.
    ///
    /// Creates a standard recursive query with:
    /// - Transaction id from [`MessageBuilder::next_id`]
    /// - RD (Recursion Desired) flag set
    /// - Single question section, class IN
    pub fn build_query(domain: &str, record_type: &RecordType) -> Result<QueryMessage, ResolveError> {
        let name = Name::from_str(domain)
            .map_err(|_| ResolveError::new(ResolveErrorKind::CannotPack, domain))?;

        let mut query = Query::new();
        query.set_name(name);
        query.set_query_type(RecordTypeMapper::to_hickory(record_type));
        query.set_query_class(hickory_proto::rr::DNSClass::IN);

        let id = Self::next_id();

        let mut message = Message::new(id, MessageType::Query, OpCode::Query);
        message.set_recursion_desired(true);
        message.add_query(query);

        let bytes = Self::serialize_message(&message)
            .map_err(|_| ResolveError::new(ResolveErrorKind::CannotPack, domain))?;

        Ok(QueryMessage { id, bytes })
    }

    /// Random id mixed with the wall clock so it is hard to predict.
    pub fn next_id() -> u16 {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        fastrand::u16(..) ^ (nanos as u16)
    }

    /// Serialize a Message to wire format bytes
    pub fn serialize_message(message: &Message) -> Result<Vec<u8>, hickory_proto::ProtoError> {
        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);
        message.emit(&mut encoder)?;
        Ok(buf)
    }

    /// Prepends the RFC 1035 §4.2.2 two-octet length used on stream transports.
    pub fn frame_for_stream(bytes: &[u8]) -> Vec<u8> {
        let mut framed = Vec::with_capacity(bytes.len() + 2);
        framed.extend_from_slice(&(bytes.len() as u16).to_be_bytes());
        framed.extend_from_slice(bytes);
        framed
    }
}
