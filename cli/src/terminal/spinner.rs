use colored::*;
use indicatif::ProgressStyle;

use crate::terminal::colors;

const TICK_STRINGS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

const SCAN_TEMPLATE: &str = "{spinner:.blue} {msg} [{bar:30.green/bright_black}] {pos}/{len}";
const TRACE_TEMPLATE: &str = "{spinner:.blue} {msg}";

fn with_template(template: &str) -> ProgressStyle {
    ProgressStyle::with_template(template)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(TICK_STRINGS)
}

pub fn scan_progress_style() -> ProgressStyle {
    with_template(SCAN_TEMPLATE).progress_chars("━╸ ")
}

pub fn trace_spinner_style() -> ProgressStyle {
    with_template(TRACE_TEMPLATE)
}

pub fn scan_message(target: &str) -> String {
    format!("Scanning {}", target.bold())
        .color(colors::TEXT_DEFAULT)
        .to_string()
}

pub fn trace_message(ttl: u8) -> String {
    format!("Waiting for hop {}", ttl.to_string().green().bold())
        .color(colors::TEXT_DEFAULT)
        .to_string()
}
