//! `uframe` command-line front end.
//!
//! Builds frames from hex field values, sends them over a serial port and
//! shows the response. Port enumeration and all formatting live here; the
//! protocol and exchange crates never print anything.

pub mod commands;
pub mod config;
pub mod error;
pub mod output;

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use uart_frame_exchange::{MemoryLine, SerialConnector};

pub use config::CliConfig;
pub use error::{CliError, CliResult};
pub use output::ConsolePresenter;

/// Send and inspect 10-byte UART command frames.
#[derive(Debug, Parser)]
#[command(name = "uframe", version, about)]
pub struct Cli {
    /// YAML configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Baud rate (default 9600).
    #[arg(long, global = true)]
    pub baud: Option<u32>,

    /// Response timeout in milliseconds (default 1000).
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Print one JSON object per line instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// `uframe` subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List available serial ports.
    Ports,

    /// Build a frame from nine hex fields and print it.
    Encode {
        /// sync dev_id cmd_id prm_id error data3 data2 data1 data0
        fields: Vec<String>,
    },

    /// Parse ten raw frame bytes given as hex.
    Decode {
        /// Frame bytes, e.g. `02 01 10 00 00 00 00 00 05 18`.
        #[arg(required = true)]
        bytes: Vec<String>,
    },

    /// Send one frame and print the response.
    Send {
        /// Serial port to open.
        #[arg(short, long)]
        port: Option<String>,

        /// Use an in-memory line that echoes every frame instead of a port.
        #[arg(long)]
        loopback: bool,

        /// sync dev_id cmd_id prm_id error data3 data2 data1 data0
        fields: Vec<String>,
    },

    /// Open a port and send one frame per line read from stdin.
    Session {
        /// Serial port to open.
        #[arg(short, long)]
        port: Option<String>,

        /// Use an in-memory line that echoes every frame instead of a port.
        #[arg(long)]
        loopback: bool,
    },
}

/// Name shown for the in-memory loopback line.
pub const LOOPBACK_PORT: &str = "loopback";

/// Run a parsed command line, writing results to stdout.
pub fn run(cli: Cli) -> CliResult<()> {
    let file_config = match &cli.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Ports => commands::list_ports(&mut out, cli.json),
        Command::Encode { fields } => {
            let fields = file_config.resolve_fields(&fields)?;
            commands::encode(&fields, &mut out, cli.json)
        }
        Command::Decode { bytes } => commands::decode(&bytes, &mut out, cli.json),
        Command::Send {
            port,
            loopback,
            fields,
        } => {
            let config = file_config.with_overrides(port, cli.baud, cli.timeout_ms);
            let fields = config.resolve_fields(&fields)?;
            if loopback {
                let line = MemoryLine::echo();
                commands::send(line.connector(), config.serial, LOOPBACK_PORT, &fields, &mut out, cli.json)
            } else {
                let port = config.require_port()?;
                commands::send(SerialConnector, config.serial.clone(), port, &fields, &mut out, cli.json)
            }
        }
        Command::Session { port, loopback } => {
            let config = file_config.with_overrides(port, cli.baud, cli.timeout_ms);
            let stdin = io::stdin();
            let input = stdin.lock();
            let summary = if loopback {
                let line = MemoryLine::echo();
                commands::session(line.connector(), config.serial, LOOPBACK_PORT, input, &mut out, cli.json)?
            } else {
                let port = config.require_port()?;
                commands::session(SerialConnector, config.serial.clone(), port, input, &mut out, cli.json)?
            };
            if !cli.json {
                writeln!(
                    out,
                    "{} completed, {} failed, {} checksum mismatches",
                    summary.completed, summary.failed, summary.checksum_mismatches
                )?;
            }
            Ok(())
        }
    }
}
