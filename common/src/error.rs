use std::io;
use std::net::IpAddr;

use thiserror::Error;

/// Operation-level failures.
///
/// Only validation and setup problems end up here. A closed port or a silent
/// hop is recorded in the result data instead.
#[derive(Error, Debug)]
pub enum ToolboxError {
    #[error("invalid target address or unresolvable hostname: {0}")]
    UnresolvableHost(String),

    #[error("ports must be between 1 and 65535 (got {start}-{end})")]
    InvalidPortRange { start: u32, end: u32 },

    #[error("maximum hop count must be at least 1")]
    InvalidHopCount,

    #[error("{0} is not an IPv4 address, only IPv4 targets can be traced")]
    UnsupportedAddressFamily(IpAddr),

    #[error("permission denied opening a raw ICMP socket, run as administrator or grant CAP_NET_RAW")]
    RawSocketPermissionDenied,

    #[error("failed to open raw ICMP socket: {0}")]
    RawSocket(#[source] io::Error),

    #[error("traceroute worker stopped before finishing: {0}")]
    TraceAborted(String),
}
