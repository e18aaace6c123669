pub mod scan;
pub mod trace;

use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};
use nettoolbox_common::config::{
    DEFAULT_END_PORT, DEFAULT_MAX_HOPS, DEFAULT_START_PORT, DEFAULT_TARGET, MAX_TIMEOUT,
    ScanConfig, TraceConfig,
};

#[derive(Parser)]
#[command(name = "nettoolbox")]
#[command(about = "A network diagnostics toolbox.", version)]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Show more log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Show less output (-q hides headers, -qq prints results only)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub quiet: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a range of TCP ports on a target
    #[command(alias = "s")]
    Scan(ScanArgs),
    /// Trace the route to a target with ICMP (needs raw socket privileges)
    #[command(alias = "t")]
    Trace(TraceArgs),
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Target IP address or hostname
    #[arg(short, long, default_value = DEFAULT_TARGET)]
    pub target: String,

    /// Start port
    #[arg(short, long, default_value_t = DEFAULT_START_PORT)]
    pub start: u32,

    /// End port
    #[arg(short, long, default_value_t = DEFAULT_END_PORT)]
    pub end: u32,

    /// Timeout per connection attempt (e.g. 500ms, 2s)
    #[arg(short = 'o', long, default_value = "1s", value_parser = parse_duration)]
    pub timeout: Duration,

    /// Maximum number of connection attempts in flight
    #[arg(short, long)]
    pub concurrency: Option<usize>,
}

#[derive(Args, Debug)]
pub struct TraceArgs {
    /// Target IP address or hostname
    #[arg(short, long, default_value = DEFAULT_TARGET)]
    pub target: String,

    /// Maximum number of hops
    #[arg(short, long, default_value_t = DEFAULT_MAX_HOPS)]
    pub max_hops: u8,

    /// Time to wait for each hop's reply (e.g. 500ms, 2s)
    #[arg(short = 'o', long, default_value = "1s", value_parser = parse_duration)]
    pub timeout: Duration,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl From<ScanArgs> for ScanConfig {
    fn from(args: ScanArgs) -> Self {
        Self {
            target: args.target,
            start_port: args.start,
            end_port: args.end,
            timeout: args.timeout,
            concurrency: args.concurrency,
        }
    }
}

impl From<TraceArgs> for TraceConfig {
    fn from(args: TraceArgs) -> Self {
        Self {
            target: args.target,
            max_hops: args.max_hops,
            timeout: args.timeout,
        }
    }
}

/// Parses `250ms`, `2s`, `1.5s`, `1m` or a bare number of seconds.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    let split_at = s.find(|c: char| c.is_ascii_alphabetic()).unwrap_or(s.len());
    let (value, unit) = s.split_at(split_at);

    let value: f64 = value
        .parse()
        .map_err(|_| format!("invalid duration '{s}'"))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("invalid duration '{s}'"));
    }

    let secs: f64 = match unit {
        "ms" => value / 1000.0,
        "" | "s" => value,
        "m" => value * 60.0,
        _ => return Err(format!("unknown unit '{unit}' in '{s}', use ms, s or m")),
    };

    let duration: Duration =
        Duration::try_from_secs_f64(secs).map_err(|_| format!("invalid duration '{s}'"))?;
    if duration > MAX_TIMEOUT {
        return Err(format!(
            "duration '{s}' is too long, the maximum is {}s",
            MAX_TIMEOUT.as_secs()
        ));
    }
    Ok(duration)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
