//! Ferrous Resolv Infrastructure Layer
pub mod dns;
