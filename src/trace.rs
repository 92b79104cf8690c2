//! Hop-by-hop path tracer ("traceroute").
//!
//! Sends one ICMP echo per hop with an increasing TTL. Routers that
//! discard an expired probe answer with Time Exceeded, revealing
//! themselves; the destination answers the echo itself. A hop that stays
//! silent past the timeout is printed as "*" and the trace continues.
//!
//! Receiving Time Exceeded requires a raw ICMP socket, so this utility
//! does not fall back to the unprivileged datagram flavor.

use crate::error::DiagResult;
use crate::output;
use crate::probe::{build_echo_request, parse_response, IcmpResponse, IcmpSocket};
use std::io;
use std::net::IpAddr;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Result of probing a single hop.
#[derive(Debug, Clone, Copy)]
pub struct HopResult {
    /// Hop index (the TTL used), starting at 1.
    pub hop: u32,
    /// Responding address; `None` marks a timed-out hop.
    pub addr: Option<IpAddr>,
    /// Round trip to the responder.
    pub rtt: Option<Duration>,
}

/// A completed trace.
#[derive(Debug, Clone)]
pub struct TraceReport {
    /// The host argument as the user supplied it.
    pub target: String,
    /// Resolved destination address.
    pub addr: IpAddr,
    /// One entry per probed hop, in increasing hop order.
    pub hops: Vec<HopResult>,
    /// Whether the destination answered before the hop ceiling.
    pub reached: bool,
}

/// What a matched reply tells us about the current hop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HopReply {
    addr: IpAddr,
    /// The trace stops once the responder is the destination itself.
    terminal: bool,
}

/// Path tracer against a single resolved destination.
#[derive(Debug, Clone)]
pub struct Tracer {
    target: String,
    addr: IpAddr,
    max_hops: u32,
    timeout: Duration,
}

impl Tracer {
    /// Create a tracer with a hop ceiling and per-hop timeout.
    pub fn new(target: impl Into<String>, addr: IpAddr, max_hops: u32, timeout: Duration) -> Self {
        Self {
            target: target.into(),
            addr,
            max_hops,
            timeout,
        }
    }

    /// Run the trace, printing each hop line as it resolves.
    pub async fn run(self) -> DiagResult<TraceReport> {
        tokio::task::spawn_blocking(move || self.run_blocking())
            .await
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?
    }

    fn run_blocking(self) -> DiagResult<TraceReport> {
        let socket = IcmpSocket::open_raw_required()?;
        let identifier = rand::random::<u16>();
        debug!(addr = %self.addr, identifier, max_hops = self.max_hops, "starting trace");

        let mut hops = Vec::new();
        let mut reached = false;

        for ttl in 1..=self.max_hops {
            let (result, terminal) = self.probe_hop(&socket, identifier, ttl);
            output::print_hop(&result);
            hops.push(result);

            if terminal {
                reached = true;
                break;
            }
        }

        Ok(TraceReport {
            target: self.target,
            addr: self.addr,
            hops,
            reached,
        })
    }

    /// Send one probe at the given TTL and wait for the hop's answer.
    ///
    /// Returns the hop record and whether the responder was the
    /// destination itself.
    fn probe_hop(&self, socket: &IcmpSocket, identifier: u16, ttl: u32) -> (HopResult, bool) {
        let timed_out = (
            HopResult {
                hop: ttl,
                addr: None,
                rtt: None,
            },
            false,
        );

        if let Err(e) = socket.set_ttl(ttl) {
            warn!(ttl, error = %e, "failed to set TTL");
            return timed_out;
        }

        // The TTL doubles as the sequence number, so each hop's probe is
        // distinguishable in embedded error payloads.
        let sequence = ttl as u16;
        let packet = build_echo_request(identifier, sequence);
        let start = Instant::now();
        if let Err(e) = socket.send_to(&packet, self.addr) {
            warn!(ttl, error = %e, "probe send failed");
            return timed_out;
        }

        let deadline = start + self.timeout;
        let mut buf = [0u8; 1500];
        loop {
            let (len, from) = match socket.recv_until(&mut buf, deadline) {
                Ok(Some(received)) => received,
                Ok(None) => return timed_out,
                Err(e) => {
                    warn!(ttl, error = %e, "probe receive failed");
                    return timed_out;
                }
            };

            let Some(response) = parse_response(&buf[..len], socket.is_dgram()) else {
                continue;
            };

            if let Some(reply) = match_hop(response, from, self.addr, identifier, sequence) {
                return (
                    HopResult {
                        hop: ttl,
                        addr: Some(reply.addr),
                        rtt: Some(start.elapsed()),
                    },
                    reply.terminal,
                );
            }
        }
    }
}

/// Decide whether a classified ICMP message answers the probe identified
/// by `identifier`/`sequence`, and if so which address it attributes to
/// the hop.
///
/// Error messages whose embedded echo header was truncated away are
/// accepted: only one probe is ever in flight.
fn match_hop(
    response: IcmpResponse,
    from: IpAddr,
    destination: IpAddr,
    identifier: u16,
    sequence: u16,
) -> Option<HopReply> {
    let id_matches = |id: crate::probe::ProbeId| {
        id.identifier == identifier && id.sequence == sequence
    };

    match response {
        IcmpResponse::EchoReply(id) if id_matches(id) => Some(HopReply {
            addr: from,
            terminal: from == destination,
        }),
        IcmpResponse::TimeExceeded(id) | IcmpResponse::Unreachable(id)
            if id.map_or(true, id_matches) =>
        {
            Some(HopReply {
                addr: from,
                terminal: from == destination,
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::ProbeId;
    use std::net::Ipv4Addr;

    const IDENT: u16 = 0x4242;
    const SEQ: u16 = 3;

    fn dest() -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(93, 184, 216, 34))
    }

    fn router() -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1))
    }

    fn probe_id() -> ProbeId {
        ProbeId {
            identifier: IDENT,
            sequence: SEQ,
        }
    }

    #[test]
    fn test_echo_reply_from_destination_is_terminal() {
        let reply = match_hop(
            IcmpResponse::EchoReply(probe_id()),
            dest(),
            dest(),
            IDENT,
            SEQ,
        )
        .unwrap();
        assert_eq!(reply.addr, dest());
        assert!(reply.terminal);
    }

    #[test]
    fn test_time_exceeded_from_router_is_intermediate() {
        let reply = match_hop(
            IcmpResponse::TimeExceeded(Some(probe_id())),
            router(),
            dest(),
            IDENT,
            SEQ,
        )
        .unwrap();
        assert_eq!(reply.addr, router());
        assert!(!reply.terminal);
    }

    #[test]
    fn test_truncated_error_payload_still_matches() {
        let reply = match_hop(IcmpResponse::TimeExceeded(None), router(), dest(), IDENT, SEQ);
        assert!(reply.is_some());
    }

    #[test]
    fn test_foreign_probe_ignored() {
        let foreign = ProbeId {
            identifier: IDENT.wrapping_add(1),
            sequence: SEQ,
        };
        assert!(match_hop(
            IcmpResponse::TimeExceeded(Some(foreign)),
            router(),
            dest(),
            IDENT,
            SEQ
        )
        .is_none());
        assert!(
            match_hop(IcmpResponse::EchoReply(foreign), dest(), dest(), IDENT, SEQ).is_none()
        );
    }

    #[test]
    fn test_unreachable_from_destination_is_terminal() {
        let reply = match_hop(
            IcmpResponse::Unreachable(Some(probe_id())),
            dest(),
            dest(),
            IDENT,
            SEQ,
        )
        .unwrap();
        assert!(reply.terminal);
    }

    #[test]
    fn test_unrelated_traffic_ignored() {
        assert!(match_hop(IcmpResponse::Other, router(), dest(), IDENT, SEQ).is_none());
    }
}
