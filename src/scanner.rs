//! TCP connect port scanner.
//!
//! Attempts a full TCP connection to every port in the requested range
//! with bounded concurrency. A connection that completes within the
//! timeout marks the port open and is dropped immediately; refusals,
//! timeouts and unreachable errors all mark the port closed. Per-port
//! failures never abort the scan.

use crate::types::{Port, PortRange};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::debug;

/// Default cap on concurrent connection attempts.
const DEFAULT_CONCURRENCY: usize = 500;

/// State of a scanned port.
///
/// The connect scan cannot tell a filtering firewall from a closed port,
/// so both collapse into `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortState {
    Open,
    Closed,
}

impl std::fmt::Display for PortState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Result of scanning a single port.
#[derive(Debug, Clone, Copy)]
pub struct ScanResult {
    pub port: Port,
    pub state: PortState,
}

/// Complete scan results, ordered by ascending port.
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// The host argument as the user supplied it.
    pub target: String,
    /// Address that was scanned.
    pub addr: IpAddr,
    /// The requested range.
    pub range: PortRange,
    /// One result per port in the range, sorted ascending.
    pub results: Vec<ScanResult>,
    /// Wall-clock scan duration.
    pub elapsed: Duration,
}

impl ScanReport {
    /// Ports found open, in ascending order.
    pub fn open_ports(&self) -> Vec<Port> {
        self.results
            .iter()
            .filter(|r| r.state == PortState::Open)
            .map(|r| r.port)
            .collect()
    }
}

/// TCP connect scanner against a single resolved address.
#[derive(Debug, Clone)]
pub struct Scanner {
    target: String,
    addr: IpAddr,
    range: PortRange,
    timeout: Duration,
    concurrency: usize,
}

impl Scanner {
    /// Create a scanner over a validated port range.
    pub fn new(target: impl Into<String>, addr: IpAddr, range: PortRange, timeout: Duration) -> Self {
        Self {
            target: target.into(),
            addr,
            range,
            timeout,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Override the concurrent-connection cap.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Scan every port in the range.
    ///
    /// Attempts run concurrently behind a semaphore; results are buffered
    /// and sorted so the report is in ascending port order regardless of
    /// completion order.
    pub async fn run(&self, show_progress: bool) -> ScanReport {
        let start = Instant::now();
        debug!(addr = %self.addr, range = %self.range, "starting scan");

        let progress = if show_progress {
            let pb = ProgressBar::new(self.range.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ports {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=>-"),
            );
            Some(pb)
        } else {
            None
        };

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let addr = self.addr;
        let connect_timeout = self.timeout;

        let mut results: Vec<ScanResult> = stream::iter(self.range.iter())
            .map(|port| {
                let sem = Arc::clone(&semaphore);
                let progress = progress.clone();
                async move {
                    let _permit = sem.acquire().await.expect("semaphore never closed");
                    let result = scan_port(addr, port, connect_timeout).await;

                    if let Some(ref pb) = progress {
                        pb.inc(1);
                        if result.state == PortState::Open {
                            pb.set_message(format!("open: {port}"));
                        }
                    }

                    result
                }
            })
            .buffer_unordered(self.concurrency.max(1))
            .collect()
            .await;

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        results.sort_by_key(|r| r.port);

        ScanReport {
            target: self.target.clone(),
            addr: self.addr,
            range: self.range,
            results,
            elapsed: start.elapsed(),
        }
    }
}

/// Attempt one TCP connection; the stream is dropped as soon as the
/// handshake completes.
async fn scan_port(addr: IpAddr, port: Port, connect_timeout: Duration) -> ScanResult {
    let sockaddr = SocketAddr::new(addr, port.as_u16());
    let state = match timeout(connect_timeout, TcpStream::connect(sockaddr)).await {
        Ok(Ok(stream)) => {
            drop(stream);
            PortState::Open
        }
        Ok(Err(_)) | Err(_) => PortState::Closed,
    };

    ScanResult { port, state }
}
