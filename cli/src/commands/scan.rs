use std::time::{Duration, Instant};

use colored::*;
use tracing::{Instrument, info_span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

use nettoolbox_common::{config::ScanConfig, models::PortProbeResult};
use nettoolbox_core::scanner::{self, ProgressCallback};

use crate::terminal::{colors, format, print, spinner};

pub async fn scan(cfg: ScanConfig, q_level: u8) -> anyhow::Result<()> {
    print_parameters(&cfg, q_level);

    let span = info_span!("scan", indicatif.pb_show = true);
    span.pb_set_style(&spinner::scan_progress_style());
    span.pb_set_message(&spinner::scan_message(&cfg.target));

    let progress_span = span.clone();
    let on_progress: ProgressCallback = Box::new(move |completed, total| {
        progress_span.pb_set_length(total as u64);
        progress_span.pb_set_position(completed as u64);
    });

    let start_time: Instant = Instant::now();
    let results: Vec<PortProbeResult> = scanner::perform_scan(&cfg, Some(on_progress))
        .instrument(span)
        .await?;

    scan_ends(&results, start_time.elapsed(), q_level);
    Ok(())
}

fn print_parameters(cfg: &ScanConfig, q_level: u8) {
    if q_level > 0 {
        return;
    }

    let concurrency: String = match cfg.concurrency {
        Some(limit) => limit.to_string(),
        None => String::from("unbounded"),
    };

    print::set_key_width(&["Target", "Ports", "Timeout", "Concurrency"]);
    print::aligned_line("Target", cfg.target.as_str());
    print::aligned_line("Ports", format::port_range(cfg));
    print::aligned_line("Timeout", format::duration(cfg.timeout));
    print::aligned_line("Concurrency", concurrency);
}

fn scan_ends(results: &[PortProbeResult], total_time: Duration, q_level: u8) {
    print::header("port scan", q_level);

    for result in results {
        let line: String = match q_level {
            0 | 1 => format::colored_port_line(result),
            _ => format::port_line(result),
        };
        print::print(&line);
    }

    if q_level > 1 {
        return;
    }
    print_summary(results, total_time, q_level);
}

fn print_summary(results: &[PortProbeResult], total_time: Duration, q_level: u8) {
    let open: usize = results.iter().filter(|r| r.open).count();
    let open: ColoredString = format!("{open} open").bold().green();
    let scanned: ColoredString = format!("{} ports", results.len()).bold();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64())
        .bold()
        .color(colors::DURATION);
    let output: ColoredString =
        format!("Scan Complete: {open} of {scanned} in {total_time}").color(colors::TEXT_DEFAULT);

    match q_level {
        0 => {
            print::fat_separator();
            print::centerln(&output.to_string());
        }
        _ => print::print(&output.to_string()),
    }
}
