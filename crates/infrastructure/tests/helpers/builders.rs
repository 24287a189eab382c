#![allow(dead_code)]
use ferrous_resolv_domain::RecordType;
use ferrous_resolv_infrastructure::dns::forwarding::RecordTypeMapper;
use ferrous_resolv_infrastructure::dns::MessageBuilder;
use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use hickory_proto::rr::rdata::{A, AAAA, CNAME};
use hickory_proto::rr::{Name, RData, Record};
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// Builds wire-format replies to a decoded query, echoing its id and question.
pub struct ReplyBuilder {
    message: Message,
}

impl ReplyBuilder {
    pub fn to(query: &Message) -> Self {
        let mut message = Message::new(query.id(), MessageType::Response, OpCode::Query);
        message.set_recursion_desired(true);
        message.set_recursion_available(true);
        for question in query.queries() {
            message.add_query(question.clone());
        }
        Self { message }
    }

    pub fn with_id(mut self, id: u16) -> Self {
        let mut header = *self.message.header();
        header.set_id(id);
        self.message.set_header(header);
        self
    }

    pub fn a(mut self, owner: &str, ip: Ipv4Addr) -> Self {
        self.message
            .add_answer(Record::from_rdata(name(owner), 60, RData::A(A(ip))));
        self
    }

    pub fn aaaa(mut self, owner: &str, ip: Ipv6Addr) -> Self {
        self.message
            .add_answer(Record::from_rdata(name(owner), 60, RData::AAAA(AAAA(ip))));
        self
    }

    pub fn cname(mut self, owner: &str, target: &str) -> Self {
        self.message.add_answer(Record::from_rdata(
            name(owner),
            60,
            RData::CNAME(CNAME(name(target))),
        ));
        self
    }

    pub fn rcode(mut self, code: ResponseCode) -> Self {
        self.message.set_response_code(code);
        self
    }

    pub fn truncated(mut self) -> Self {
        self.message.set_truncated(true);
        self
    }

    pub fn build(self) -> Vec<u8> {
        MessageBuilder::serialize_message(&self.message).unwrap()
    }
}

/// Name of the first question, root-terminated, as sent on the wire.
pub fn question_name(query: &Message) -> String {
    query
        .queries()
        .first()
        .map(|q| q.name().to_string())
        .unwrap_or_default()
}

pub fn question_type(query: &Message) -> Option<RecordType> {
    query
        .queries()
        .first()
        .and_then(|q| RecordTypeMapper::from_hickory(q.query_type()))
}

pub fn nxdomain(query: &Message) -> Vec<u8> {
    ReplyBuilder::to(query).rcode(ResponseCode::NXDomain).build()
}

pub fn servfail(query: &Message) -> Vec<u8> {
    ReplyBuilder::to(query).rcode(ResponseCode::ServFail).build()
}

fn name(s: &str) -> Name {
    Name::from_str(s).unwrap()
}
