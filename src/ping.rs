//! Reachability prober ("ping").
//!
//! Sends a bounded number of sequential ICMP echo requests and aggregates
//! round-trip statistics. A probe that times out or is rejected is a lost
//! packet, never a command failure: only resolution problems before the
//! first probe abort the run.

use crate::error::DiagResult;
use crate::output;
use crate::probe::{build_echo_request, parse_response, IcmpResponse, IcmpSocket, ProbeId};
use std::io;
use std::net::IpAddr;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Pause between consecutive probes.
const PROBE_INTERVAL: Duration = Duration::from_millis(500);

/// Outcome of a single echo probe.
#[derive(Debug, Clone, Copy)]
pub struct ProbeResult {
    /// Probe sequence number, starting at 1.
    pub sequence: u16,
    /// Round-trip time; `None` marks a lost probe.
    pub rtt: Option<Duration>,
}

impl ProbeResult {
    /// Whether the probe was answered.
    pub fn is_success(&self) -> bool {
        self.rtt.is_some()
    }
}

/// Aggregate statistics over a completed ping run.
#[derive(Debug, Clone)]
pub struct PingReport {
    /// The host argument as the user supplied it.
    pub target: String,
    /// The address the probes were sent to.
    pub addr: IpAddr,
    /// One entry per probe, in sequence order.
    pub results: Vec<ProbeResult>,
}

impl PingReport {
    /// Packets sent.
    pub fn sent(&self) -> usize {
        self.results.len()
    }

    /// Packets answered.
    pub fn received(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    /// Loss percentage: (sent - received) / sent * 100.
    pub fn loss_pct(&self) -> f64 {
        if self.results.is_empty() {
            return 0.0;
        }
        let lost = self.sent() - self.received();
        lost as f64 * 100.0 / self.sent() as f64
    }

    /// Minimum RTT over answered probes.
    pub fn min_rtt(&self) -> Option<Duration> {
        self.results.iter().filter_map(|r| r.rtt).min()
    }

    /// Maximum RTT over answered probes.
    pub fn max_rtt(&self) -> Option<Duration> {
        self.results.iter().filter_map(|r| r.rtt).max()
    }

    /// Mean RTT over answered probes.
    pub fn avg_rtt(&self) -> Option<Duration> {
        let received = self.received() as u32;
        if received == 0 {
            return None;
        }
        let total: Duration = self.results.iter().filter_map(|r| r.rtt).sum();
        Some(total / received)
    }
}

/// Sequential echo prober against a single resolved address.
#[derive(Debug, Clone)]
pub struct Pinger {
    target: String,
    addr: IpAddr,
    count: u32,
    timeout: Duration,
}

impl Pinger {
    /// Create a prober for `count` probes with a per-probe timeout.
    pub fn new(target: impl Into<String>, addr: IpAddr, count: u32, timeout: Duration) -> Self {
        Self {
            target: target.into(),
            addr,
            count,
            timeout,
        }
    }

    /// Run all probes, printing each reply line as it arrives.
    ///
    /// Probing is sequential and the socket reads block, so the loop runs
    /// on the blocking pool.
    pub async fn run(self) -> DiagResult<PingReport> {
        tokio::task::spawn_blocking(move || self.run_blocking())
            .await
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?
    }

    fn run_blocking(self) -> DiagResult<PingReport> {
        let socket = IcmpSocket::open_preferred()?;
        let identifier = rand::random::<u16>();
        debug!(addr = %self.addr, identifier, dgram = socket.is_dgram(), "starting ping");

        let mut results = Vec::with_capacity(self.count as usize);
        for seq in 1..=self.count {
            let sequence = seq as u16;
            let result = self.probe_once(&socket, identifier, sequence);
            output::print_probe(&self.addr, &result);
            results.push(result);

            if seq < self.count {
                std::thread::sleep(PROBE_INTERVAL);
            }
        }

        Ok(PingReport {
            target: self.target,
            addr: self.addr,
            results,
        })
    }

    /// Send one echo request and wait for its reply until the timeout.
    fn probe_once(&self, socket: &IcmpSocket, identifier: u16, sequence: u16) -> ProbeResult {
        let lost = ProbeResult {
            sequence,
            rtt: None,
        };

        let packet = build_echo_request(identifier, sequence);
        let start = Instant::now();
        if let Err(e) = socket.send_to(&packet, self.addr) {
            warn!(sequence, error = %e, "echo request send failed");
            return lost;
        }

        let deadline = start + self.timeout;
        let mut buf = [0u8; 1500];
        loop {
            let (len, from) = match socket.recv_until(&mut buf, deadline) {
                Ok(Some(received)) => received,
                Ok(None) => return lost,
                Err(e) => {
                    warn!(sequence, error = %e, "echo receive failed");
                    return lost;
                }
            };

            match parse_response(&buf[..len], socket.is_dgram()) {
                Some(IcmpResponse::EchoReply(id)) if self.matches(socket, id, identifier, sequence) => {
                    return ProbeResult {
                        sequence,
                        rtt: Some(start.elapsed()),
                    };
                }
                Some(IcmpResponse::Unreachable(id))
                    if from == self.addr
                        || id.is_some_and(|id| self.matches(socket, id, identifier, sequence)) =>
                {
                    debug!(sequence, "destination unreachable");
                    return lost;
                }
                // A raw socket sees every ICMP message on the host; keep
                // listening until our reply or the deadline.
                _ => continue,
            }
        }
    }

    /// Datagram ICMP sockets have their identifier rewritten by the
    /// kernel, so only the sequence can be matched there.
    fn matches(&self, socket: &IcmpSocket, id: ProbeId, identifier: u16, sequence: u16) -> bool {
        if socket.is_dgram() {
            id.sequence == sequence
        } else {
            id.identifier == identifier && id.sequence == sequence
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn report(rtts: Vec<Option<u64>>) -> PingReport {
        PingReport {
            target: "test".to_string(),
            addr: IpAddr::V4(Ipv4Addr::LOCALHOST),
            results: rtts
                .into_iter()
                .enumerate()
                .map(|(i, ms)| ProbeResult {
                    sequence: (i + 1) as u16,
                    rtt: ms.map(Duration::from_millis),
                })
                .collect(),
        }
    }

    #[test]
    fn test_loss_percentage_all_received() {
        let report = report(vec![Some(10), Some(20), Some(30), Some(40)]);
        assert_eq!(report.sent(), 4);
        assert_eq!(report.received(), 4);
        assert_eq!(report.loss_pct(), 0.0);
    }

    #[test]
    fn test_loss_percentage_partial() {
        let report = report(vec![Some(10), None, Some(30), None]);
        assert_eq!(report.loss_pct(), 50.0);
    }

    #[test]
    fn test_loss_percentage_total() {
        let report = report(vec![None, None, None, None]);
        assert_eq!(report.received(), 0);
        assert_eq!(report.loss_pct(), 100.0);
        assert!(report.min_rtt().is_none());
        assert!(report.avg_rtt().is_none());
    }

    #[test]
    fn test_rtt_statistics() {
        let report = report(vec![Some(10), Some(20), Some(30)]);
        assert_eq!(report.min_rtt(), Some(Duration::from_millis(10)));
        assert_eq!(report.max_rtt(), Some(Duration::from_millis(30)));
        assert_eq!(report.avg_rtt(), Some(Duration::from_millis(20)));
    }
}
