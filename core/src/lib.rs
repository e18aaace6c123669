//! The reconnaissance engines.
//!
//! * [`scanner`]: concurrent TCP connect scan over a port range.
//! * [`traceroute`]: TTL-stepping ICMP path discovery.
//!
//! Both entry points take an explicit configuration value and return plain
//! result records; formatting is left to the caller.

pub mod network;
pub mod scanner;
pub mod traceroute;
