#![cfg(test)]
use std::time::Duration;

use nettoolbox_common::config::TraceConfig;
use nettoolbox_common::models::{HopOutcome, HopReport};
use nettoolbox_common::ToolboxError;
use nettoolbox_core::traceroute;

use crate::utils::LOCALHOST;

fn trace_config(target: &str, max_hops: u8) -> TraceConfig {
    TraceConfig {
        target: target.to_string(),
        max_hops,
        timeout: Duration::from_millis(500),
    }
}

#[tokio::test]
async fn zero_hops_is_rejected_before_any_probe() {
    let result = traceroute::perform_trace(&trace_config("127.0.0.1", 0)).await;

    assert!(matches!(result, Err(ToolboxError::InvalidHopCount)));
}

#[tokio::test]
async fn unresolvable_target_is_fatal() {
    let result = traceroute::perform_trace(&trace_config("invalid-target", 5)).await;

    assert!(matches!(result, Err(ToolboxError::UnresolvableHost(_))));
}

#[tokio::test]
async fn ipv6_target_is_rejected() {
    let result = traceroute::perform_trace(&trace_config("::1", 5)).await;

    assert!(matches!(result, Err(ToolboxError::UnsupportedAddressFamily(_))));
}

/// Needs root or CAP_NET_RAW.
#[tokio::test]
#[ignore]
async fn trace_loopback_reaches_target() -> anyhow::Result<()> {
    let hops: Vec<HopReport> = traceroute::perform_trace(&trace_config("127.0.0.1", 5)).await?;

    let last: &HopReport = hops.last().expect("trace produced no hops");
    assert_eq!(last.outcome, HopOutcome::TargetReached);
    assert_eq!(last.responded_address, Some(LOCALHOST));
    assert_eq!(
        hops.iter().filter(|h| h.outcome == HopOutcome::TargetReached).count(),
        1
    );
    for (idx, hop) in hops.iter().enumerate() {
        assert_eq!(usize::from(hop.ttl), idx + 1);
    }
    Ok(())
}
