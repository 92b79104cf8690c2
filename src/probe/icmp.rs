//! ICMP echo packet construction and reply classification.
//!
//! Uses `pnet` packet views over plain byte buffers. Replies arriving on a
//! raw socket are prefixed with the IPv4 header; datagram sockets deliver
//! the bare ICMP message. `parse_response` handles both.

use pnet::packet::icmp::destination_unreachable::DestinationUnreachablePacket;
use pnet::packet::icmp::echo_reply::EchoReplyPacket;
use pnet::packet::icmp::echo_request::{EchoRequestPacket, MutableEchoRequestPacket};
use pnet::packet::icmp::{checksum, IcmpCode, IcmpPacket, IcmpTypes};
use pnet::packet::icmp::time_exceeded::TimeExceededPacket;
use pnet::packet::ip::IpNextHeaderProtocols;
use pnet::packet::ipv4::Ipv4Packet;
use pnet::packet::Packet;

/// ICMP header size (fixed).
pub const ICMP_HEADER_LEN: usize = 8;
/// Payload carried by each echo request.
pub const ECHO_PAYLOAD_LEN: usize = 32;

/// Identity of the probe a reply answers, when it can be recovered.
///
/// Router-originated errors embed the offending datagram, so the original
/// echo header is usually recoverable; heavily truncating routers lose it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeId {
    pub identifier: u16,
    pub sequence: u16,
}

/// Classification of a received ICMP message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IcmpResponse {
    /// The destination answered our echo.
    EchoReply(ProbeId),
    /// A router discarded our probe when its TTL expired.
    TimeExceeded(Option<ProbeId>),
    /// The probe was rejected as unreachable.
    Unreachable(Option<ProbeId>),
    /// Some other ICMP traffic, not ours.
    Other,
}

/// Build an ICMP echo request.
///
/// Payload is a fixed byte pattern; identity lives in the header's
/// identifier and sequence fields.
pub fn build_echo_request(identifier: u16, sequence: u16) -> Vec<u8> {
    let mut buffer = vec![0u8; ICMP_HEADER_LEN + ECHO_PAYLOAD_LEN];

    {
        let mut packet = MutableEchoRequestPacket::new(&mut buffer).unwrap();
        packet.set_icmp_type(IcmpTypes::EchoRequest);
        packet.set_icmp_code(IcmpCode::new(0));
        packet.set_identifier(identifier);
        packet.set_sequence_number(sequence);
    }

    for (i, byte) in buffer[ICMP_HEADER_LEN..].iter_mut().enumerate() {
        *byte = (i & 0xff) as u8;
    }

    let cksum = checksum(&IcmpPacket::new(&buffer).unwrap());
    let mut packet = MutableEchoRequestPacket::new(&mut buffer).unwrap();
    packet.set_checksum(cksum);

    buffer
}

/// Classify a received ICMP message.
///
/// `from_dgram` signals that the buffer holds a bare ICMP message rather
/// than a full IPv4 datagram. Returns `None` for buffers too short to be
/// any ICMP message.
pub fn parse_response(buf: &[u8], from_dgram: bool) -> Option<IcmpResponse> {
    let icmp_bytes: &[u8] = if from_dgram {
        buf
    } else {
        let ip = Ipv4Packet::new(buf)?;
        if ip.get_next_level_protocol() != IpNextHeaderProtocols::Icmp {
            return Some(IcmpResponse::Other);
        }
        let header_len = ip.get_header_length() as usize * 4;
        buf.get(header_len..)?
    };

    let icmp = IcmpPacket::new(icmp_bytes)?;
    let response = match icmp.get_icmp_type() {
        IcmpTypes::EchoReply => {
            let reply = EchoReplyPacket::new(icmp_bytes)?;
            IcmpResponse::EchoReply(ProbeId {
                identifier: reply.get_identifier(),
                sequence: reply.get_sequence_number(),
            })
        }
        IcmpTypes::TimeExceeded => {
            let exceeded = TimeExceededPacket::new(icmp_bytes)?;
            IcmpResponse::TimeExceeded(embedded_probe_id(exceeded.payload()))
        }
        IcmpTypes::DestinationUnreachable => {
            let unreachable = DestinationUnreachablePacket::new(icmp_bytes)?;
            IcmpResponse::Unreachable(embedded_probe_id(unreachable.payload()))
        }
        _ => IcmpResponse::Other,
    };

    Some(response)
}

/// Recover the echo header from the offending datagram a router embedded
/// in its error message.
fn embedded_probe_id(payload: &[u8]) -> Option<ProbeId> {
    let inner_ip = Ipv4Packet::new(payload)?;
    if inner_ip.get_next_level_protocol() != IpNextHeaderProtocols::Icmp {
        return None;
    }
    let header_len = inner_ip.get_header_length() as usize * 4;
    let inner_icmp = payload.get(header_len..)?;
    let echo = EchoRequestPacket::new(inner_icmp)?;
    Some(ProbeId {
        identifier: echo.get_identifier(),
        sequence: echo.get_sequence_number(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_echo_request_layout() {
        let packet = build_echo_request(0x1234, 7);
        assert_eq!(packet.len(), ICMP_HEADER_LEN + ECHO_PAYLOAD_LEN);
        assert_eq!(packet[0], 8); // echo request type
        assert_eq!(packet[1], 0); // code
    }

    #[test]
    fn test_echo_request_checksum_validates() {
        let packet = build_echo_request(500, 1);
        let view = IcmpPacket::new(&packet).unwrap();
        assert_eq!(view.get_checksum(), checksum(&view));
    }

    #[test]
    fn test_parse_echo_reply_dgram() {
        // An echo reply is an echo request with type 0 and a fixed-up
        // checksum; close enough for the parser.
        let mut packet = build_echo_request(42, 3);
        packet[0] = 0;
        packet[2] = 0;
        packet[3] = 0;
        let cksum = checksum(&IcmpPacket::new(&packet).unwrap());
        packet[2..4].copy_from_slice(&cksum.to_be_bytes());

        let response = parse_response(&packet, true).unwrap();
        assert_eq!(
            response,
            IcmpResponse::EchoReply(ProbeId {
                identifier: 42,
                sequence: 3
            })
        );
    }

    #[test]
    fn test_parse_time_exceeded_with_embedded_probe() {
        let inner_echo = build_echo_request(99, 5);

        // Offending IPv4 datagram: minimal 20-byte header + echo request.
        let mut inner_ip = vec![0u8; 20 + inner_echo.len()];
        inner_ip[0] = 0x45; // version 4, IHL 5
        inner_ip[9] = 1; // protocol = ICMP
        inner_ip[20..].copy_from_slice(&inner_echo);

        // Time Exceeded: type 11, code 0, checksum, 4 unused bytes.
        let mut packet = vec![11u8, 0, 0, 0, 0, 0, 0, 0];
        packet.extend_from_slice(&inner_ip);

        let response = parse_response(&packet, true).unwrap();
        assert_eq!(
            response,
            IcmpResponse::TimeExceeded(Some(ProbeId {
                identifier: 99,
                sequence: 5
            }))
        );
    }

    #[test]
    fn test_parse_raw_buffer_skips_ip_header() {
        let mut reply = build_echo_request(7, 1);
        reply[0] = 0;

        let mut datagram = vec![0u8; 20 + reply.len()];
        datagram[0] = 0x45;
        datagram[9] = 1;
        datagram[20..].copy_from_slice(&reply);

        let response = parse_response(&datagram, false).unwrap();
        assert!(matches!(response, IcmpResponse::EchoReply(_)));
    }

    #[test]
    fn test_parse_truncated_buffer() {
        assert!(parse_response(&[11u8, 0], true).is_none());
    }

    #[test]
    fn test_unrelated_type_is_other() {
        // Router advertisement, type 9.
        let packet = vec![9u8, 0, 0, 0, 0, 0, 0, 0];
        assert_eq!(parse_response(&packet, true), Some(IcmpResponse::Other));
    }
}
