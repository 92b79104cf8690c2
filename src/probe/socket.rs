//! ICMP socket construction with privilege fallback.
//!
//! A raw ICMPv4 socket sees every ICMP message on the host, including the
//! Time Exceeded errors routers send back to a traceroute. Creating one
//! requires root or CAP_NET_RAW. Unprivileged processes can often fall
//! back to a datagram ICMP socket (Linux `ping_group_range`), which is
//! enough for echo request/reply but does not deliver router errors, so
//! the tracer insists on raw.

use crate::error::{DiagError, DiagResult};
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::{IpAddr, SocketAddr, UdpSocket};
use std::time::{Duration, Instant};
use tracing::debug;

/// An ICMPv4 socket for sending echo probes and receiving replies.
///
/// Internally a `std::net::UdpSocket` over the ICMP protocol; `send_to`
/// and `recv_from` map straight onto sendto(2)/recvfrom(2).
#[derive(Debug)]
pub struct IcmpSocket {
    inner: UdpSocket,
    /// Datagram ICMP sockets deliver bare ICMP messages; raw sockets
    /// prefix each message with the IPv4 header.
    dgram: bool,
}

impl IcmpSocket {
    /// Open a raw ICMPv4 socket. Requires root or CAP_NET_RAW.
    pub fn open_raw() -> io::Result<Self> {
        let socket = Socket::new(Domain::IPV4, Type::RAW, Some(Protocol::ICMPV4))?;
        Ok(Self {
            inner: socket.into(),
            dgram: false,
        })
    }

    /// Open an unprivileged datagram ICMPv4 socket.
    pub fn open_dgram() -> io::Result<Self> {
        let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::ICMPV4))?;
        Ok(Self {
            inner: socket.into(),
            dgram: true,
        })
    }

    /// Open the best available socket for echo request/reply: raw when
    /// permitted, datagram otherwise.
    pub fn open_preferred() -> DiagResult<Self> {
        match Self::open_raw() {
            Ok(socket) => Ok(socket),
            Err(_) => {
                debug!("raw ICMP socket unavailable, trying datagram fallback");
                Self::open_dgram().map_err(|_| permission_error(false))
            }
        }
    }

    /// Open a raw socket or fail: operations that must observe router
    /// errors (Time Exceeded) cannot use the datagram fallback.
    pub fn open_raw_required() -> DiagResult<Self> {
        Self::open_raw().map_err(|_| permission_error(true))
    }

    /// Whether received buffers carry a bare ICMP message (no IPv4 header).
    pub fn is_dgram(&self) -> bool {
        self.dgram
    }

    /// Set the IP TTL for subsequently sent probes.
    pub fn set_ttl(&self, ttl: u32) -> io::Result<()> {
        self.inner.set_ttl(ttl)
    }

    /// Send an ICMP packet to the target address.
    pub fn send_to(&self, packet: &[u8], target: IpAddr) -> io::Result<()> {
        self.inner.send_to(packet, SocketAddr::new(target, 0))?;
        Ok(())
    }

    /// Receive one ICMP message, waiting no later than `deadline`.
    ///
    /// Returns `Ok(None)` once the deadline has passed without a message.
    pub fn recv_until(
        &self,
        buf: &mut [u8],
        deadline: Instant,
    ) -> io::Result<Option<(usize, IpAddr)>> {
        let now = Instant::now();
        if now >= deadline {
            return Ok(None);
        }
        // A zero read timeout means block forever; the guard above keeps
        // the remaining duration strictly positive.
        self.inner
            .set_read_timeout(Some(deadline.duration_since(now).max(Duration::from_millis(1))))?;

        match self.inner.recv_from(buf) {
            Ok((len, addr)) => Ok(Some((len, addr.ip()))),
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

fn permission_error(raw_required: bool) -> DiagError {
    let binary = std::env::current_exe()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "netmon".to_string());

    let detail = if raw_required {
        "raw ICMP sockets are required to receive Time Exceeded responses from routers"
    } else {
        "no usable ICMP socket could be created"
    };

    DiagError::PermissionDenied(format!(
        "{detail}.\n  Fix options:\n  \u{2022} run with sudo\n  \u{2022} grant the capability: sudo setcap cap_net_raw+ep {binary}\n  \u{2022} enable unprivileged ICMP: sudo sysctl -w net.ipv4.ping_group_range='0 65534'"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_error_mentions_remediation() {
        let err = permission_error(true);
        let msg = err.to_string();
        assert!(msg.contains("setcap"));
        assert!(msg.contains("sudo"));
    }

    #[test]
    fn test_recv_until_expired_deadline_returns_none() {
        // Whichever socket flavor this environment permits.
        let socket = match IcmpSocket::open_raw().or_else(|_| IcmpSocket::open_dgram()) {
            Ok(s) => s,
            Err(_) => return, // no ICMP sockets in this sandbox
        };
        let mut buf = [0u8; 64];
        let expired = Instant::now() - Duration::from_millis(10);
        assert!(matches!(socket.recv_until(&mut buf, expired), Ok(None)));
    }
}
