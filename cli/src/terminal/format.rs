use std::time::Duration;

use colored::*;
use nettoolbox_common::config::ScanConfig;
use nettoolbox_common::models::{HopOutcome, HopReport, PortProbeResult};
use nettoolbox_common::network::range::PortRange;

use crate::terminal::colors;

pub fn duration(d: Duration) -> String {
    format!("{:.3?}", d)
}

/// The range a scan will actually cover, falling back to the raw input when it
/// does not validate.
pub fn port_range(cfg: &ScanConfig) -> String {
    match PortRange::new(cfg.start_port, cfg.end_port) {
        Ok(range) => format!("{}-{} ({} ports)", range.start_port, range.end_port, range.len()),
        Err(_) => format!("{}-{}", cfg.start_port, cfg.end_port),
    }
}

pub fn port_line(result: &PortProbeResult) -> String {
    format!("Port {}: {}", result.port, result.status())
}

pub fn hop_line(hop: &HopReport) -> String {
    let ttl: u8 = hop.ttl;
    match (hop.outcome, hop.responded_address, hop.round_trip_time) {
        (HopOutcome::IntermediateHop, Some(addr), Some(rtt)) => {
            format!("Hop {ttl}: {addr}, Time: {}", duration(rtt))
        }
        (HopOutcome::TargetReached, Some(addr), Some(rtt)) => {
            format!("Hop {ttl}: {addr}, Time: {} (Reached Target)", duration(rtt))
        }
        (HopOutcome::Timeout, _, _) => format!("Hop {ttl}: * (Timeout)"),
        (HopOutcome::SendFailure, _, _) => format!("Hop {ttl}: Failed to send ICMP packet"),
        _ => format!("Hop {ttl}: Unexpected response"),
    }
}

pub fn colored_port_line(result: &PortProbeResult) -> String {
    let port: ColoredString = format!("Port {}", result.port).color(colors::TEXT_DEFAULT);
    let status: ColoredString = match result.open {
        true => result.status().color(colors::OPEN).bold(),
        false => result.status().color(colors::CLOSED),
    };
    format!("{port}{} {status}", ":".color(colors::SEPARATOR))
}

pub fn colored_hop_line(hop: &HopReport) -> String {
    let prefix: ColoredString = format!("Hop {:>2}", hop.ttl).color(colors::ACCENT);
    let colon: ColoredString = ":".color(colors::SEPARATOR);

    let rest: String = match (hop.outcome, hop.responded_address, hop.round_trip_time) {
        (HopOutcome::IntermediateHop, Some(addr), Some(rtt)) => format!(
            "{}, Time: {}",
            addr.to_string().color(colors::IPV4_ADDR),
            duration(rtt).color(colors::DURATION)
        ),
        (HopOutcome::TargetReached, Some(addr), Some(rtt)) => format!(
            "{}, Time: {} {}",
            addr.to_string().color(colors::IPV4_ADDR),
            duration(rtt).color(colors::DURATION),
            "(Reached Target)".color(colors::PRIMARY).bold()
        ),
        (HopOutcome::Timeout, _, _) => "* (Timeout)".color(colors::TIMEOUT).to_string(),
        (HopOutcome::SendFailure, _, _) => {
            "Failed to send ICMP packet".color(colors::FAILURE).to_string()
        }
        _ => "Unexpected response".color(colors::FAILURE).to_string(),
    };

    format!("{prefix}{colon} {rest}")
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    const ROUTER: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1));

    #[test]
    fn port_lines() {
        assert_eq!(port_line(&PortProbeResult::new(22, true)), "Port 22: Open");
        assert_eq!(port_line(&PortProbeResult::new(23, false)), "Port 23: Closed");
    }

    #[test]
    fn hop_lines() {
        let rtt = Duration::from_micros(1500);

        assert_eq!(
            hop_line(&HopReport::intermediate(1, ROUTER, rtt)),
            "Hop 1: 192.168.1.1, Time: 1.500ms"
        );
        assert_eq!(
            hop_line(&HopReport::reached(4, ROUTER, rtt)),
            "Hop 4: 192.168.1.1, Time: 1.500ms (Reached Target)"
        );
        assert_eq!(hop_line(&HopReport::timeout(2)), "Hop 2: * (Timeout)");
        assert_eq!(
            hop_line(&HopReport::send_failure(3)),
            "Hop 3: Failed to send ICMP packet"
        );
        assert_eq!(
            hop_line(&HopReport::malformed(5, Some(ROUTER))),
            "Hop 5: Unexpected response"
        );
        assert_eq!(hop_line(&HopReport::malformed(6, None)), "Hop 6: Unexpected response");
    }

    #[test]
    fn colored_lines_keep_the_text() {
        colored::control::set_override(false);
        let open = PortProbeResult::new(80, true);
        assert_eq!(colored_port_line(&open), port_line(&open));
        assert_eq!(colored_hop_line(&HopReport::timeout(7)), "Hop  7: * (Timeout)");
    }

    #[test]
    fn port_range_is_normalized() {
        let cfg = ScanConfig {
            start_port: 90,
            end_port: 80,
            ..ScanConfig::default()
        };
        assert_eq!(port_range(&cfg), "80-90 (11 ports)");

        let cfg = ScanConfig {
            start_port: 0,
            end_port: 80,
            ..ScanConfig::default()
        };
        assert_eq!(port_range(&cfg), "0-80");
    }
}
