//! # Target Resolution
//!
//! Turns the user supplied target string into an address both engines can use.
//!
//! * A literal IP address is returned as-is, without touching the network.
//! * Anything else is looked up through the system resolver and the first
//!   IPv4 address wins.
//!
//! Nothing is cached, so every call performs a fresh lookup.

use std::fmt;
use std::net::IpAddr;

use tokio::net::lookup_host;
use tracing::debug;

use crate::error::ToolboxError;

/// A resolved address together with the string it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanTarget {
    pub input: String,
    pub addr: IpAddr,
}

impl ScanTarget {
    pub async fn resolve(input: &str) -> Result<Self, ToolboxError> {
        let addr: IpAddr = resolve(input).await?;
        Ok(Self {
            input: input.to_string(),
            addr,
        })
    }

    pub fn is_literal(&self) -> bool {
        parse_literal(&self.input).is_some()
    }
}

impl fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_literal() {
            write!(f, "{}", self.addr)
        } else {
            write!(f, "{} ({})", self.input, self.addr)
        }
    }
}

/// Resolves a hostname or literal IP into a single address.
pub async fn resolve(input: &str) -> Result<IpAddr, ToolboxError> {
    if let Some(addr) = parse_literal(input) {
        return Ok(addr);
    }

    if input.is_empty() {
        return Err(ToolboxError::UnresolvableHost(input.to_string()));
    }

    let addrs = lookup_host((input, 0)).await.map_err(|e| {
        debug!("Lookup of {input} failed: {e}");
        ToolboxError::UnresolvableHost(input.to_string())
    })?;

    let resolved: Option<IpAddr> = first_ipv4(addrs.map(|sock| sock.ip()));
    match resolved {
        Some(addr) => {
            debug!("Resolved {input} to {addr}");
            Ok(addr)
        }
        None => Err(ToolboxError::UnresolvableHost(input.to_string())),
    }
}

fn parse_literal(s: &str) -> Option<IpAddr> {
    s.parse::<IpAddr>().ok()
}

fn first_ipv4<I>(addrs: I) -> Option<IpAddr>
where
    I: IntoIterator<Item = IpAddr>,
{
    addrs.into_iter().find(IpAddr::is_ipv4)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
