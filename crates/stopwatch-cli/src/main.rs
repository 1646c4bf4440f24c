//! `stopwatch`: interactive serial control for the FPGA stopwatch.

use std::error::Error;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info};

use stopwatch_cli::{logging, ConfigOverrides, SerialTransport, Session, StopwatchConfig};

/// Drive the UART stopwatch with single-character commands read from stdin.
#[derive(Debug, Parser)]
#[command(name = "stopwatch", version, about)]
struct Args {
    /// Serial port identifier (e.g. COM8 or /dev/ttyUSB0).
    #[arg(short, long)]
    port: Option<String>,

    /// Baud rate.
    #[arg(short, long = "baud")]
    baud_rate: Option<u32>,

    /// Give up on a timestamp reply after this many milliseconds.
    /// Without it, a read waits forever.
    #[arg(long)]
    read_timeout_ms: Option<u64>,

    /// YAML file with `port`, `baud_rate` and `read_timeout_ms`.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let config = StopwatchConfig::resolve(
        args.config.as_deref(),
        ConfigOverrides {
            port: args.port,
            baud_rate: args.baud_rate,
            read_timeout_ms: args.read_timeout_ms,
        },
    )?;
    info!("Using {} at {} baud", config.port, config.baud_rate);
    debug!("Resolved config:\n{}", config.to_yaml_string()?);

    let transport = SerialTransport::open(&config.port, config.baud_rate)?;
    let session = Session::open(transport, config.session_config())?;
    session.run(io::stdin().lock(), io::stdout().lock())?;
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
