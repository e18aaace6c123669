/// Verdict for one scanned TCP port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortProbeResult {
    pub port: u16,
    pub open: bool,
}

impl PortProbeResult {
    pub fn new(port: u16, open: bool) -> Self {
        Self { port, open }
    }

    pub fn status(&self) -> &'static str {
        if self.open { "Open" } else { "Closed" }
    }
}
