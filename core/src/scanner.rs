//! # TCP Port Scanner
//!
//! Probes every port of a range with a full TCP handshake and classifies it as
//! open or closed.
//!
//! The scan is a fan-out/fan-in barrier:
//! 1. **Validation**: the target is resolved and the port range normalized
//!    before any connection is attempted.
//! 2. **Fan-out**: one task per port, each depositing exactly one
//!    [`PortProbeResult`] into a channel.
//! 3. **Fan-in**: the coordinator drains the channel until every task has
//!    finished, then sorts by port.
//!
//! Individual timeouts only close their own port. Nothing aborts the scan once
//! it has started.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, info};

use nettoolbox_common::config::ScanConfig;
use nettoolbox_common::models::PortProbeResult;
use nettoolbox_common::network::range::PortRange;
use nettoolbox_common::network::target::ScanTarget;
use nettoolbox_common::ToolboxError;

use crate::network::tcp;

/// Called by the coordinator with `(completed, total)` after each result.
pub type ProgressCallback = Box<dyn Fn(usize, usize) + Send + Sync>;

/// Scans `start..=end` on `target` with default settings otherwise.
pub async fn scan_ports(
    target: &str,
    start: u32,
    end: u32,
    probe_timeout: Duration,
) -> Result<Vec<PortProbeResult>, ToolboxError> {
    let cfg = ScanConfig {
        target: target.to_string(),
        start_port: start,
        end_port: end,
        timeout: probe_timeout,
        ..ScanConfig::default()
    };
    perform_scan(&cfg, None).await
}

/// Executes a full scan as described by `cfg`.
///
/// Validation happens in order: target first, then the port bounds. A valid
/// scan returns exactly one result per port, sorted ascending.
pub async fn perform_scan(
    cfg: &ScanConfig,
    on_progress: Option<ProgressCallback>,
) -> Result<Vec<PortProbeResult>, ToolboxError> {
    let target: ScanTarget = ScanTarget::resolve(&cfg.target).await?;
    let range: PortRange = PortRange::new(cfg.start_port, cfg.end_port)?;

    info!(
        "Scanning {} ports on {target} ({}-{})",
        range.len(),
        range.start_port,
        range.end_port
    );

    let start_time = Instant::now();
    let results: Vec<PortProbeResult> =
        scan_range(target.addr, range, cfg.timeout, cfg.concurrency, on_progress).await;

    let open_count: usize = results.iter().filter(|r| r.open).count();
    info!(
        "Scan of {target} finished in {:.2}s: {open_count} open",
        start_time.elapsed().as_secs_f64()
    );

    Ok(results)
}

async fn scan_range(
    addr: IpAddr,
    range: PortRange,
    probe_timeout: Duration,
    concurrency: Option<usize>,
    on_progress: Option<ProgressCallback>,
) -> Vec<PortProbeResult> {
    let total: usize = range.len();
    let (result_tx, mut result_rx) = mpsc::unbounded_channel::<PortProbeResult>();
    let limiter: Option<Arc<Semaphore>> =
        concurrency.map(|limit| Arc::new(Semaphore::new(limit.max(1))));

    for port in range.to_iter() {
        let result_tx = result_tx.clone();
        let limiter = limiter.clone();

        tokio::spawn(async move {
            let _permit = match limiter {
                Some(semaphore) => semaphore.acquire_owned().await.ok(),
                None => None,
            };
            let open: bool = tcp::handshake_probe(SocketAddr::new(addr, port), probe_timeout).await;
            debug!("Port {port}: {}", if open { "open" } else { "closed" });
            let _ = result_tx.send(PortProbeResult::new(port, open));
        });
    }
    drop(result_tx);

    let mut results: Vec<PortProbeResult> = Vec::with_capacity(total);
    while let Some(result) = result_rx.recv().await {
        results.push(result);
        if let Some(callback) = &on_progress {
            callback(results.len(), total);
        }
    }

    results.sort_by_key(|result| result.port);
    results
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
