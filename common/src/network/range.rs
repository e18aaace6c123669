use std::ops::RangeInclusive;

use crate::error::ToolboxError;

pub const MIN_PORT: u32 = 1;
pub const MAX_PORT: u32 = 65535;

/// A normalized, validated closed interval of TCP ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortRange {
    pub start_port: u16,
    pub end_port: u16,
}

impl PortRange {
    /// Validates both bounds against `[1, 65535]` and orders them.
    ///
    /// A reversed range is swapped silently, so `new(90, 80)` and `new(80, 90)`
    /// describe the same ports.
    pub fn new(start: u32, end: u32) -> Result<Self, ToolboxError> {
        let (Some(start_port), Some(end_port)) = (to_port(start), to_port(end)) else {
            return Err(ToolboxError::InvalidPortRange { start, end });
        };

        if start_port > end_port {
            return Ok(Self { start_port: end_port, end_port: start_port });
        }
        Ok(Self { start_port, end_port })
    }

    pub fn to_iter(&self) -> RangeInclusive<u16> {
        self.start_port..=self.end_port
    }

    /// Number of ports covered. Never zero.
    pub fn len(&self) -> usize {
        usize::from(self.end_port - self.start_port) + 1
    }
}

fn to_port(value: u32) -> Option<u16> {
    if !(MIN_PORT..=MAX_PORT).contains(&value) {
        return None;
    }
    u16::try_from(value).ok()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
