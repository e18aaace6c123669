use colored::*;
use tracing::{info_span, warn};
use tracing_indicatif::span_ext::IndicatifSpanExt;

use nettoolbox_common::{config::TraceConfig, models::HopReport};
use nettoolbox_core::traceroute;

use crate::terminal::{colors, format, print, spinner};

pub async fn trace(cfg: TraceConfig, q_level: u8) -> anyhow::Result<()> {
    if !is_root::is_root() {
        warn!("Traceroute needs raw sockets: run as root or grant CAP_NET_RAW");
    }

    let tracer = traceroute::prepare_trace(&cfg).await?;

    let target = tracer.target();
    print::print(&format!(
        "Traceroute to {} ({}), {} hops max",
        target.input.bold(),
        target.addr.to_string().color(colors::IPV4_ADDR),
        tracer.max_hops()
    ));

    let span = info_span!("trace", indicatif.pb_show = true);
    span.pb_set_style(&spinner::trace_spinner_style());
    span.pb_set_message(&spinner::trace_message(1));

    let hops: Vec<HopReport> = tokio::task::spawn_blocking(move || {
        let _guard = span.enter();
        tracer.run(|hop| {
            let line: String = match q_level {
                0 | 1 => format::colored_hop_line(hop),
                _ => format::hop_line(hop),
            };
            print::print(&line);
            span.pb_set_message(&spinner::trace_message(hop.ttl.saturating_add(1)));
        })
    })
    .await?;

    if q_level < 2 {
        let reached: bool = hops.last().is_some_and(HopReport::is_terminal);
        if !reached {
            warn!("Target did not answer within {} hops", cfg.max_hops);
        }
        print::print("Traceroute complete.");
    }
    Ok(())
}
