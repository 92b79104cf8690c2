//! Ping subcommand implementation.

use crate::error::DiagResult;
use crate::output;
use crate::ping::Pinger;
use crate::resolver;
use clap::Parser;
use std::time::Duration;

/// Test host reachability with ICMP echo probes.
#[derive(Parser, Debug)]
pub struct PingCommand {
    /// Host to ping (hostname or IP address)
    #[arg(value_name = "HOST")]
    pub host: String,

    /// Number of echo probes to send
    #[arg(short, long, default_value_t = 4, value_parser = clap::value_parser!(u32).range(1..))]
    pub count: u32,

    /// Per-probe timeout in seconds
    #[arg(short, long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,
}

impl PingCommand {
    /// Execute the ping command.
    ///
    /// Lost probes are statistics, not failures: only a resolution error
    /// before the first probe aborts the run.
    pub async fn execute(&self, _verbose: bool, quiet: bool) -> DiagResult<()> {
        let addr = resolver::resolve_host(&self.host).await?;

        if !quiet {
            output::print_ping_header(&self.host, &addr, self.count);
        }

        let pinger = Pinger::new(
            &self.host,
            addr,
            self.count,
            Duration::from_secs(self.timeout),
        );
        let report = pinger.run().await?;

        output::print_ping_report(&report);
        Ok(())
    }
}
