pub mod forwarding;
pub mod resolver;
pub mod transport;

pub use forwarding::{MessageBuilder, ResponseParser};
pub use resolver::{PoisonDetector, StubResolver};
pub use transport::{Connection, DnsConnection, Framing, Protocol};
