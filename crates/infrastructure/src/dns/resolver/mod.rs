pub mod core;
pub mod dual_stack;
pub mod exchange;
pub mod failover;
pub mod poison;
pub mod search;
pub mod system;

pub use core::StubResolver;
pub use exchange::exchange;
pub use poison::PoisonDetector;
pub use system::{lookup, lookup_host, lookup_ip, system_resolver};
