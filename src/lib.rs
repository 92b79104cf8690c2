//! # netmon - Network Diagnostics Toolkit
//!
//! netmon bundles four independent, stateless network diagnostics behind
//! one command-line dispatcher:
//!
//! - **ping** - ICMP echo reachability testing with loss and RTT statistics
//! - **dns** - forward and reverse name resolution
//! - **scan** - TCP connect port scanning over a range
//! - **traceroute** - hop-by-hop path tracing with increasing TTLs
//!
//! Each invocation performs exactly one bounded operation and exits; no
//! state survives a run, and no utility depends on another.
//!
//! ## Example
//!
//! ```rust,ignore
//! use netmon::scanner::Scanner;
//! use netmon::types::PortRange;
//! use std::net::IpAddr;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let addr: IpAddr = "127.0.0.1".parse().unwrap();
//!     let range: PortRange = "20-25".parse().unwrap();
//!     let scanner = Scanner::new("localhost", addr, range, Duration::from_secs(1));
//!     let report = scanner.run(false).await;
//!     println!("open: {:?}", report.open_ports());
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`cli`] - subcommand definitions and handlers
//! - [`resolver`] - forward/reverse resolution
//! - [`ping`] - the reachability prober
//! - [`scanner`] - the port scanner
//! - [`trace`] - the path tracer
//! - [`probe`] - shared ICMP socket and packet machinery
//! - [`error`] - the error taxonomy
//! - [`output`] - console formatting

pub mod cli;
pub mod error;
pub mod output;
pub mod ping;
pub mod probe;
pub mod resolver;
pub mod scanner;
pub mod services;
pub mod trace;
pub mod types;

// Re-export commonly used types
pub use error::{DiagError, DiagResult};
pub use ping::{PingReport, Pinger, ProbeResult};
pub use scanner::{PortState, ScanReport, Scanner};
pub use trace::{HopResult, TraceReport, Tracer};
pub use types::{Port, PortRange};
