//! Shared ICMP probe machinery used by the reachability prober and the
//! path tracer: socket construction with privilege fallback, and echo
//! packet construction/parsing.

pub mod icmp;
pub mod socket;

pub use icmp::{build_echo_request, parse_response, IcmpResponse, ProbeId};
pub use socket::IcmpSocket;
