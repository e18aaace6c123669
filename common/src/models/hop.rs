use std::net::IpAddr;
use std::time::Duration;

/// How a single TTL probe ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HopOutcome {
    /// A router on the path answered with ICMP Time Exceeded.
    IntermediateHop,
    /// The destination answered with ICMP Echo Reply.
    TargetReached,
    /// Nothing relevant arrived before the deadline.
    Timeout,
    /// Something arrived but it was neither Time Exceeded nor Echo Reply.
    MalformedResponse,
    /// The probe could not be sent.
    SendFailure,
}

/// One line of a traceroute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HopReport {
    pub ttl: u8,
    pub responded_address: Option<IpAddr>,
    pub round_trip_time: Option<Duration>,
    pub outcome: HopOutcome,
}

impl HopReport {
    pub fn intermediate(ttl: u8, addr: IpAddr, rtt: Duration) -> Self {
        Self {
            ttl,
            responded_address: Some(addr),
            round_trip_time: Some(rtt),
            outcome: HopOutcome::IntermediateHop,
        }
    }

    pub fn reached(ttl: u8, addr: IpAddr, rtt: Duration) -> Self {
        Self {
            ttl,
            responded_address: Some(addr),
            round_trip_time: Some(rtt),
            outcome: HopOutcome::TargetReached,
        }
    }

    pub fn timeout(ttl: u8) -> Self {
        Self::silent(ttl, HopOutcome::Timeout)
    }

    pub fn send_failure(ttl: u8) -> Self {
        Self::silent(ttl, HopOutcome::SendFailure)
    }

    pub fn malformed(ttl: u8, addr: Option<IpAddr>) -> Self {
        Self {
            ttl,
            responded_address: addr,
            round_trip_time: None,
            outcome: HopOutcome::MalformedResponse,
        }
    }

    fn silent(ttl: u8, outcome: HopOutcome) -> Self {
        Self {
            ttl,
            responded_address: None,
            round_trip_time: None,
            outcome,
        }
    }

    /// The trace stops after a terminal report.
    pub fn is_terminal(&self) -> bool {
        self.outcome == HopOutcome::TargetReached
    }
}
