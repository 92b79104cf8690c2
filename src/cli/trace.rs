//! Traceroute subcommand implementation.

use crate::error::DiagResult;
use crate::output;
use crate::resolver;
use crate::trace::Tracer;
use clap::Parser;
use std::time::Duration;

/// Trace the network path to a host.
#[derive(Parser, Debug)]
pub struct TraceCommand {
    /// Host to trace the route to (hostname or IP address)
    #[arg(value_name = "HOST")]
    pub host: String,

    /// Maximum number of hops to probe
    #[arg(short = 'm', long = "maxhops", default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..=255))]
    pub max_hops: u32,

    /// Per-hop timeout in seconds
    #[arg(short, long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,
}

impl TraceCommand {
    /// Execute the traceroute command.
    pub async fn execute(&self, _verbose: bool, quiet: bool) -> DiagResult<()> {
        let addr = resolver::resolve_host(&self.host).await?;

        if !is_root() {
            output::print_warning(
                "tracing uses raw ICMP sockets, which usually require root or CAP_NET_RAW",
            );
        }

        if !quiet {
            output::print_trace_header(&self.host, &addr, self.max_hops);
        }

        let tracer = Tracer::new(
            &self.host,
            addr,
            self.max_hops,
            Duration::from_secs(self.timeout),
        );
        let report = tracer.run().await?;

        output::print_trace_report(&report);
        Ok(())
    }
}

/// Check if running with root/admin privileges.
fn is_root() -> bool {
    #[cfg(unix)]
    {
        unsafe { libc::geteuid() == 0 }
    }
    #[cfg(not(unix))]
    {
        false
    }
}
