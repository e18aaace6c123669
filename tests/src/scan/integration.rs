#![cfg(test)]
use std::time::Duration;

use nettoolbox_common::config::ScanConfig;
use nettoolbox_common::models::PortProbeResult;
use nettoolbox_common::ToolboxError;
use nettoolbox_core::scanner;

use crate::utils;

const PROBE_TIMEOUT: Duration = Duration::from_millis(500);

/// A listening loopback port is reported open and the whole range comes back
/// in order, one result per port.
#[tokio::test]
async fn scan_loopback_listener() -> anyhow::Result<()> {
    let (_listener, port) = utils::listener_with_neighbours().await?;

    let results: Vec<PortProbeResult> =
        scanner::scan_ports("127.0.0.1", u32::from(port) - 1, u32::from(port) + 1, PROBE_TIMEOUT)
            .await?;

    let ports: Vec<u16> = results.iter().map(|r| r.port).collect();
    assert_eq!(ports, vec![port - 1, port, port + 1]);

    let listener_result = results
        .iter()
        .find(|r| r.port == port)
        .expect("listener port missing from results");
    assert!(listener_result.open, "listening port {port} reported closed");
    Ok(())
}

#[tokio::test]
async fn scan_hostname_target() -> anyhow::Result<()> {
    let (_listener, port) = utils::listener_with_neighbours().await?;

    let results = scanner::scan_ports("localhost", u32::from(port), u32::from(port), PROBE_TIMEOUT)
        .await?;

    assert_eq!(results, vec![PortProbeResult::new(port, true)]);
    Ok(())
}

#[tokio::test]
async fn swapped_range_matches_forward_range() -> anyhow::Result<()> {
    let (_listener, port) = utils::listener_with_neighbours().await?;
    let (low, high) = (u32::from(port) - 1, u32::from(port) + 1);

    let forward = scanner::scan_ports("127.0.0.1", low, high, PROBE_TIMEOUT).await?;
    let reversed = scanner::scan_ports("127.0.0.1", high, low, PROBE_TIMEOUT).await?;

    let ports = |results: &[PortProbeResult]| results.iter().map(|r| r.port).collect::<Vec<_>>();
    assert_eq!(ports(&forward), ports(&reversed));
    assert!(reversed.iter().any(|r| r.port == port && r.open));
    Ok(())
}

#[tokio::test]
async fn bounded_scan_covers_every_port() -> anyhow::Result<()> {
    let (_listener, port) = utils::listener_with_neighbours().await?;
    let cfg = ScanConfig {
        target: String::from("127.0.0.1"),
        start_port: u32::from(port) - 1,
        end_port: u32::from(port) + 1,
        timeout: PROBE_TIMEOUT,
        concurrency: Some(1),
    };

    let results = scanner::perform_scan(&cfg, None).await?;

    assert_eq!(results.len(), 3);
    assert!(results.windows(2).all(|w| w[0].port < w[1].port));
    assert!(results.iter().any(|r| r.port == port && r.open));
    Ok(())
}

#[tokio::test]
async fn unresolvable_target_yields_no_results() {
    let result = scanner::scan_ports("invalid-target", 1, 10, PROBE_TIMEOUT).await;

    assert!(
        matches!(result, Err(ToolboxError::UnresolvableHost(_))),
        "expected an unresolvable host error, got {result:?}"
    );
}

#[tokio::test]
async fn out_of_range_ports_yield_no_results() {
    for (start, end) in [(0, 10), (1, 65536), (70000, 80000)] {
        let result = scanner::scan_ports("127.0.0.1", start, end, PROBE_TIMEOUT).await;
        assert!(
            matches!(result, Err(ToolboxError::InvalidPortRange { .. })),
            "range {start}-{end} should be rejected, got {result:?}"
        );
    }
}
