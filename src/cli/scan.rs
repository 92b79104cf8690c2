//! Scan subcommand implementation.

use crate::error::{DiagError, DiagResult};
use crate::output;
use crate::resolver;
use crate::scanner::Scanner;
use crate::types::PortRange;
use clap::Parser;
use std::time::Duration;

/// Scan a host for open TCP ports.
#[derive(Parser, Debug)]
pub struct ScanCommand {
    /// Host to scan (hostname or IP address)
    #[arg(value_name = "HOST")]
    pub host: String,

    /// Ports to scan: a single port ("22") or an inclusive range ("1-1000")
    #[arg(short, long, default_value = "1-1000")]
    pub ports: String,

    /// Per-connection timeout in seconds
    #[arg(short, long, default_value_t = 1.0, value_parser = parse_timeout)]
    pub timeout: f64,
}

impl ScanCommand {
    /// Execute the scan command.
    ///
    /// The port specification is validated before any resolution or
    /// connection attempt.
    pub async fn execute(&self, verbose: bool, quiet: bool) -> DiagResult<()> {
        let range: PortRange = self.ports.parse()?;

        let addr = resolver::resolve_host(&self.host)
            .await
            .map_err(|_| DiagError::HostUnreachable(self.host.clone()))?;

        if !quiet {
            output::print_scan_header(&self.host, &addr, range.len());
        }

        let scanner = Scanner::new(&self.host, addr, range, Duration::from_secs_f64(self.timeout));
        let report = scanner.run(verbose && !quiet).await;

        output::print_scan_report(&report);
        Ok(())
    }
}

/// Parse the timeout flag, rejecting non-positive values.
fn parse_timeout(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(format!("timeout must be positive, got {value}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timeout_accepts_fractions() {
        assert_eq!(parse_timeout("1.5").unwrap(), 1.5);
        assert_eq!(parse_timeout("0.25").unwrap(), 0.25);
    }

    #[test]
    fn test_parse_timeout_rejects_bad_values() {
        assert!(parse_timeout("0").is_err());
        assert!(parse_timeout("-1").is_err());
        assert!(parse_timeout("inf").is_err());
        assert!(parse_timeout("soon").is_err());
    }
}
