//! Console output formatting.
//!
//! All user-facing printing lives here so the utilities stay focused on
//! their network work. Uses the `console` crate for styling.

use crate::ping::{PingReport, ProbeResult};
use crate::resolver::ResolutionResult;
use crate::scanner::ScanReport;
use crate::services;
use crate::trace::{HopResult, TraceReport};
use console::style;
use std::net::IpAddr;
use std::time::Duration;

/// Print the startup banner.
pub fn print_banner() {
    println!();
    println!(
        "{} {} v{}",
        style("netmon").cyan().bold(),
        style("·").dim(),
        env!("CARGO_PKG_VERSION")
    );
    println!("{}", style("network diagnostics toolkit").dim());
    println!();
}

fn fmt_ms(duration: Duration) -> String {
    format!("{:.2} ms", duration.as_secs_f64() * 1000.0)
}

/// Header line before the ping probes start.
pub fn print_ping_header(target: &str, addr: &IpAddr, count: u32) {
    println!(
        "{} {} ({}) with {} probes",
        style("Pinging").cyan(),
        style(target).bold(),
        addr,
        count
    );
}

/// One line per echo probe.
pub fn print_probe(addr: &IpAddr, result: &ProbeResult) {
    match result.rtt {
        Some(rtt) => println!(
            "  {} from {}: seq={} time={}",
            style("reply").green(),
            addr,
            result.sequence,
            fmt_ms(rtt)
        ),
        None => println!(
            "  {}: seq={}",
            style("request timed out").yellow(),
            result.sequence
        ),
    }
}

/// Final ping statistics block.
pub fn print_ping_report(report: &PingReport) {
    println!();
    println!("{} statistics for {}:", style("Ping").cyan(), report.addr);
    println!(
        "  {} packets transmitted, {} received, {:.1}% packet loss",
        report.sent(),
        report.received(),
        report.loss_pct()
    );

    if let (Some(min), Some(avg), Some(max)) =
        (report.min_rtt(), report.avg_rtt(), report.max_rtt())
    {
        println!(
            "  rtt min/avg/max = {}/{}/{}",
            fmt_ms(min),
            fmt_ms(avg),
            fmt_ms(max)
        );
    }
}

/// Resolved addresses or PTR hostname.
pub fn print_resolution(result: &ResolutionResult) {
    match result {
        ResolutionResult::Addresses { query, addrs } => {
            println!("{} {}", style("Resolved").cyan(), style(query).bold());
            for addr in addrs {
                println!("  {addr}");
            }
        }
        ResolutionResult::Hostname { query, hostname } => {
            println!(
                "{} {} {} {}",
                style("Resolved").cyan(),
                style(query).bold(),
                style("→").dim(),
                hostname
            );
        }
    }
}

/// Header line before the port scan starts.
pub fn print_scan_header(target: &str, addr: &IpAddr, ports: usize) {
    println!(
        "{} {} ({}), {} ports",
        style("Scanning").cyan(),
        style(target).bold(),
        addr,
        ports
    );
}

/// Scan summary: open ports with service names, sorted ascending.
pub fn print_scan_report(report: &ScanReport) {
    let open = report.open_ports();

    println!();
    if open.is_empty() {
        println!("  {}", style("no open ports found").yellow());
    } else {
        println!("  {:>9}  {}", style("PORT").bold(), style("SERVICE").bold());
        for port in &open {
            println!(
                "  {:>9}  {}",
                style(format!("{port}/tcp")).green(),
                services::service_description(port.as_u16())
            );
        }
    }

    println!();
    println!(
        "{} {} ports in {:.2}s, {} open",
        style("Scanned").cyan(),
        report.results.len(),
        report.elapsed.as_secs_f64(),
        open.len()
    );
}

/// Header line before tracing starts.
pub fn print_trace_header(target: &str, addr: &IpAddr, max_hops: u32) {
    println!(
        "{} {} ({}), {} hops max",
        style("Tracing route to").cyan(),
        style(target).bold(),
        addr,
        max_hops
    );
}

/// One line per hop.
pub fn print_hop(result: &HopResult) {
    match (result.addr, result.rtt) {
        (Some(addr), Some(rtt)) => {
            println!("  {:>3}  {:<18}  {}", result.hop, addr, fmt_ms(rtt));
        }
        _ => println!("  {:>3}  {}", result.hop, style("*").dim()),
    }
}

/// Final trace status line.
pub fn print_trace_report(report: &TraceReport) {
    println!();
    if report.reached {
        println!(
            "{} in {} hops",
            style("Destination reached").green(),
            report.hops.len()
        );
    } else {
        println!(
            "{}: gave up after {} hops",
            style("Trace did not complete").yellow(),
            report.hops.len()
        );
    }
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}

/// Print the cancellation notice.
pub fn print_cancelled() {
    eprintln!();
    eprintln!("{}", style("Operation cancelled by user").red().bold());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_ms() {
        assert_eq!(fmt_ms(Duration::from_millis(12)), "12.00 ms");
        assert_eq!(fmt_ms(Duration::from_micros(1500)), "1.50 ms");
    }
}
