pub mod builders;
pub mod dns_server_mock;

#[allow(unused_imports)]
pub use builders::{nxdomain, question_name, question_type, servfail, ReplyBuilder};
#[allow(unused_imports)]
pub use dns_server_mock::{MockDnsServer, SilentServer, Via};
