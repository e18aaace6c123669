mod commands;
mod terminal;

use commands::{CommandLine, Commands, scan, trace};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose, commands.quiet);

    match commands.command {
        Commands::Scan(args) => {
            print::header("starting scanner", commands.quiet);
            scan::scan(args.into(), commands.quiet).await
        }
        Commands::Trace(args) => {
            print::header("starting traceroute", commands.quiet);
            trace::trace(args.into(), commands.quiet).await
        }
    }
}
