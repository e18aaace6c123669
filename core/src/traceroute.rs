//! # ICMP Traceroute Engine
//!
//! Walks the path to a target one TTL at a time. Each hop sends a single ICMP
//! Echo Request and waits for one relevant answer:
//!
//! * **Time Exceeded**: a router on the way, the walk continues.
//! * **Echo Reply**: the target itself, the walk stops.
//! * nothing before the deadline, anything else, or a failed send: recorded
//!   and the walk continues with the next TTL.
//!
//! Hops run strictly one after another on a single raw socket, so no reply can
//! be confused with a probe still in flight.
//!
//! Setup problems (bad hop count, unresolvable target, missing privileges) are
//! returned as errors before the first probe leaves.

use std::net::IpAddr;
use std::time::{Duration, Instant};

use tokio::task::JoinError;
use tracing::{debug, trace, warn};

use nettoolbox_common::config::{MAX_TIMEOUT, TraceConfig};
use nettoolbox_common::models::{HopOutcome, HopReport};
use nettoolbox_common::network::target::ScanTarget;
use nettoolbox_common::ToolboxError;
use nettoolbox_protocols::icmp::{self, IcmpReply, PROBE_MARKER};

use crate::network::transport::{self, IcmpChannel, ProbeChannel};

/// A validated traceroute, ready to run.
pub struct Tracer<C: ProbeChannel> {
    channel: C,
    target: ScanTarget,
    identifier: u16,
    max_hops: u8,
    timeout: Duration,
}

/// Performs every fatal check and opens the raw ICMP socket.
///
/// Order: hop count, target resolution, address family, socket.
pub async fn prepare_trace(cfg: &TraceConfig) -> Result<Tracer<IcmpChannel>, ToolboxError> {
    if cfg.max_hops == 0 {
        return Err(ToolboxError::InvalidHopCount);
    }

    let target: ScanTarget = ScanTarget::resolve(&cfg.target).await?;
    if !target.addr.is_ipv4() {
        return Err(ToolboxError::UnsupportedAddressFamily(target.addr));
    }

    let channel: IcmpChannel = transport::open_icmp_channel()?;
    Ok(Tracer::new(channel, target, cfg))
}

/// Runs a complete traceroute and returns one report per probed hop.
pub async fn perform_trace(cfg: &TraceConfig) -> Result<Vec<HopReport>, ToolboxError> {
    let tracer: Tracer<IcmpChannel> = prepare_trace(cfg).await?;
    let hops: Vec<HopReport> = tokio::task::spawn_blocking(move || tracer.run(|_| {}))
        .await
        .map_err(worker_error)?;
    Ok(hops)
}

fn worker_error(e: JoinError) -> ToolboxError {
    warn!("Traceroute worker failed: {e}");
    ToolboxError::TraceAborted(e.to_string())
}

/// Identifier stamped on every probe of this process.
pub fn process_identifier() -> u16 {
    (std::process::id() & 0xffff) as u16
}

impl<C: ProbeChannel> Tracer<C> {
    pub fn new(channel: C, target: ScanTarget, cfg: &TraceConfig) -> Self {
        Self {
            channel,
            target,
            identifier: process_identifier(),
            max_hops: cfg.max_hops,
            timeout: cfg.timeout.min(MAX_TIMEOUT),
        }
    }

    pub fn target(&self) -> &ScanTarget {
        &self.target
    }

    pub fn max_hops(&self) -> u8 {
        self.max_hops
    }

    /// Probes TTL 1 through `max_hops`, stopping early once the target answers.
    ///
    /// Blocks the calling thread. `on_hop` sees every report as soon as it is
    /// produced. The socket is closed when the tracer is dropped at the end.
    pub fn run<F>(mut self, mut on_hop: F) -> Vec<HopReport>
    where
        F: FnMut(&HopReport),
    {
        debug!(
            "Tracing route to {}, {} hops max",
            self.target, self.max_hops
        );

        let mut hops: Vec<HopReport> = Vec::with_capacity(usize::from(self.max_hops));
        for ttl in 1..=self.max_hops {
            let report: HopReport = self.probe_hop(ttl);
            on_hop(&report);

            let reached: bool = report.is_terminal();
            hops.push(report);
            if reached {
                break;
            }
        }

        let reached = hops.last().is_some_and(HopReport::is_terminal);
        debug!("Trace finished after {} hops (target reached: {reached})", hops.len());
        hops
    }

    fn probe_hop(&mut self, ttl: u8) -> HopReport {
        if let Err(e) = self.channel.set_ttl(ttl) {
            warn!("Hop {ttl}: failed to set TTL: {e}");
            return HopReport::send_failure(ttl);
        }

        let message: Vec<u8> =
            match icmp::create_echo_request(self.identifier, u16::from(ttl), PROBE_MARKER) {
                Ok(message) => message,
                Err(e) => {
                    warn!("Hop {ttl}: failed to encode ICMP message: {e}");
                    return HopReport::send_failure(ttl);
                }
            };

        let start: Instant = Instant::now();
        if let Err(e) = self.channel.send_probe(&message, self.target.addr) {
            warn!("Hop {ttl}: failed to send ICMP packet: {e}");
            return HopReport::send_failure(ttl);
        }

        let deadline: Instant = Instant::now() + self.timeout;
        let report: HopReport = self.await_reply(ttl, start, deadline);
        debug!("Hop {ttl}: {:?}", report.outcome);
        report
    }

    /// Reads until a message that answers this probe arrives or the deadline passes.
    fn await_reply(&mut self, ttl: u8, start: Instant, deadline: Instant) -> HopReport {
        loop {
            let wait: Duration = deadline.saturating_duration_since(Instant::now());
            if wait.is_zero() {
                return HopReport::timeout(ttl);
            }

            let (bytes, source) = match self.channel.next_message(wait) {
                Ok(Some(message)) => message,
                Ok(None) => return HopReport::timeout(ttl),
                Err(e) => {
                    debug!("Hop {ttl}: read failed: {e}");
                    return HopReport::timeout(ttl);
                }
            };
            let elapsed: Duration = start.elapsed();

            let reply: IcmpReply = match icmp::parse_reply(&bytes) {
                Ok(reply) => reply,
                Err(e) => {
                    debug!("Hop {ttl}: unparsable reply from {source}: {e}");
                    return HopReport::malformed(ttl, Some(source));
                }
            };

            if !reply.answers(self.identifier, u16::from(ttl)) {
                trace!("Hop {ttl}: ignoring {reply:?} from {source}");
                continue;
            }

            return classify(ttl, reply, source, elapsed);
        }
    }
}

fn classify(ttl: u8, reply: IcmpReply, source: IpAddr, elapsed: Duration) -> HopReport {
    let report = match reply {
        IcmpReply::TimeExceeded { .. } => HopReport::intermediate(ttl, source, elapsed),
        IcmpReply::EchoReply { .. } => HopReport::reached(ttl, source, elapsed),
        other => {
            debug!("Hop {ttl}: unexpected {other:?} from {source}");
            HopReport::malformed(ttl, Some(source))
        }
    };
    if report.outcome == HopOutcome::TargetReached {
        debug!("Reached {source} at hop {ttl}");
    }
    report
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
