use ferrous_resolv_domain::{DnsRecord, RecordType, Resolution, ResolveError, ResolveErrorKind};
use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::RData;
use hickory_proto::ProtoError;
use tracing::debug;

/// Upper bound on CNAME hops followed inside a single reply.
pub const MAX_CNAME_REDIRECTS: usize = 10;

pub struct ResponseParser;

impl ResponseParser {
    /// Decodes one wire-format reply. A failure here only discards the packet.
    pub fn decode(response_bytes: &[u8]) -> Result<Message, ProtoError> {
        Message::from_vec(response_bytes)
    }

    /// Pulls the canonical name and the `record_type` records for `name` out
    /// of a reply, following the CNAME chain.
    ///
    /// The configured servers are expected to be recursive, so everything
    /// needed is in this one message.
    pub fn extract_answer(
        name: &str,
        server: &str,
        message: &Message,
        record_type: &RecordType,
    ) -> Result<Resolution, ResolveError> {
        let rcode = message.response_code();

        if rcode == ResponseCode::NXDomain && message.recursion_available() {
            return Err(ResolveError::new(ResolveErrorKind::NoSuchHost, name));
        }
        if rcode != ResponseCode::NoError {
            debug!(name = %name, server = %server, rcode = Self::rcode_to_status(rcode), "Unexpected response code");
            return Err(
                ResolveError::new(ResolveErrorKind::ServerMisbehaving, name).with_server(server)
            );
        }

        let mut current = name.to_string();

        'chain: for _ in 0..MAX_CNAME_REDIRECTS {
            let mut records = Vec::new();

            for record in message.answers() {
                if !record.name().to_string().eq_ignore_ascii_case(&current) {
                    continue;
                }
                match (record.data(), record_type) {
                    (RData::A(a), RecordType::A) => records.push(DnsRecord::A(a.0)),
                    (RData::AAAA(aaaa), RecordType::AAAA) => records.push(DnsRecord::Aaaa(aaaa.0)),
                    (RData::CNAME(canonical), _) => {
                        current = canonical.0.to_string();
                        continue 'chain;
                    }
                    _ => {}
                }
            }

            if records.is_empty() {
                return Err(
                    ResolveError::new(ResolveErrorKind::NoSuchHost, current).with_server(server)
                );
            }

            return Ok(Resolution::new(current, records));
        }

        Err(ResolveError::new(ResolveErrorKind::TooManyRedirects, current).with_server(server))
    }

    pub fn rcode_to_status(rcode: ResponseCode) -> &'static str {
        match rcode {
            ResponseCode::NoError => "NOERROR",
            ResponseCode::NXDomain => "NXDOMAIN",
            ResponseCode::ServFail => "SERVFAIL",
            ResponseCode::Refused => "REFUSED",
            ResponseCode::NotImp => "NOTIMP",
            ResponseCode::FormErr => "FORMERR",
            _ => "UNKNOWN",
        }
    }
}
