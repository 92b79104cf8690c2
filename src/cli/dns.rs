//! DNS subcommand implementation.

use crate::error::DiagResult;
use crate::output;
use crate::resolver;
use clap::Parser;

/// Resolve a hostname to addresses, or an address to its hostname.
#[derive(Parser, Debug)]
pub struct DnsCommand {
    /// Domain name, or IP address in reverse mode
    #[arg(value_name = "HOST")]
    pub host: String,

    /// Perform a reverse (PTR) lookup instead
    #[arg(short, long)]
    pub reverse: bool,
}

impl DnsCommand {
    /// Execute the lookup and print the result.
    pub async fn execute(&self, _verbose: bool, _quiet: bool) -> DiagResult<()> {
        let result = if self.reverse {
            resolver::lookup_ptr(&self.host).await?
        } else {
            resolver::lookup_host(&self.host).await?
        };

        output::print_resolution(&result);
        Ok(())
    }
}
