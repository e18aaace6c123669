use std::time::Duration;

pub const DEFAULT_TARGET: &str = "127.0.0.1";
pub const DEFAULT_START_PORT: u32 = 1;
pub const DEFAULT_END_PORT: u32 = 1024;
pub const DEFAULT_MAX_HOPS: u8 = 30;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);
/// Longest per-probe timeout accepted from the command line.
pub const MAX_TIMEOUT: Duration = Duration::from_secs(3600);

/// Parameters of a single port scan run.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Literal IP address or hostname.
    pub target: String,
    pub start_port: u32,
    pub end_port: u32,
    /// Upper bound for each individual handshake.
    pub timeout: Duration,
    /// Caps the number of handshakes in flight.
    ///
    /// `None` launches every port at once. A limit of zero is treated as one.
    pub concurrency: Option<usize>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET.to_string(),
            start_port: DEFAULT_START_PORT,
            end_port: DEFAULT_END_PORT,
            timeout: DEFAULT_TIMEOUT,
            concurrency: None,
        }
    }
}

/// Parameters of a single traceroute run.
#[derive(Debug, Clone)]
pub struct TraceConfig {
    pub target: String,
    pub max_hops: u8,
    /// How long to wait for the reply to each hop's probe.
    pub timeout: Duration,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET.to_string(),
            max_hops: DEFAULT_MAX_HOPS,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
