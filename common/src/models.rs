pub mod hop;
pub mod port;

pub use hop::{HopOutcome, HopReport};
pub use port::PortProbeResult;
