//! CLI subcommand definitions and handlers.
//!
//! One subcommand per diagnostic utility:
//! - `netmon ping <host>` - test reachability
//! - `netmon dns <host>` - forward or reverse name resolution
//! - `netmon scan <host>` - TCP port scan
//! - `netmon traceroute <host>` - hop-by-hop path trace

mod dns;
mod ping;
mod scan;
mod trace;

pub use dns::DnsCommand;
pub use ping::PingCommand;
pub use scan::ScanCommand;
pub use trace::TraceCommand;

use clap::{Parser, Subcommand};

/// netmon - network troubleshooting from the command line.
///
/// Each run performs exactly one bounded diagnostic operation and exits;
/// nothing is persisted between runs.
#[derive(Parser, Debug)]
#[command(name = "netmon")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Network troubleshooting and diagnostics tool", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Test host reachability with ICMP echo probes
    Ping(PingCommand),

    /// Resolve a hostname, or an address in reverse mode
    Dns(DnsCommand),

    /// Scan a host for open TCP ports
    Scan(ScanCommand),

    /// Trace the network path to a host
    #[command(alias = "trace")]
    Traceroute(TraceCommand),
}
