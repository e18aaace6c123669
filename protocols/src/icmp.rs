use anyhow::{Context, ensure};
use pnet::packet::Packet;
use pnet::packet::icmp::echo_reply::EchoReplyPacket;
use pnet::packet::icmp::echo_request::{self, EchoRequestPacket, MutableEchoRequestPacket};
use pnet::packet::icmp::{self, IcmpPacket, IcmpTypes};
use pnet::packet::ip::IpNextHeaderProtocols;
use pnet::packet::ipv4::Ipv4Packet;

pub const ICMP_HDR_LEN: usize = 8;

/// Payload carried by every traceroute probe.
pub const PROBE_MARKER: &[u8] = b"traceroute";

/// Time Exceeded keeps 4 unused bytes between its header and the quoted datagram.
const QUOTE_OFFSET: usize = 4;

/// What came back on the raw ICMP socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IcmpReply {
    /// A router dropped the probe. Carries the `(identifier, sequence)` of the
    /// quoted echo when the quote was long enough to read it.
    TimeExceeded { quoted_echo: Option<(u16, u16)> },
    EchoReply { identifier: u16, sequence: u16 },
    /// Our own request, seen again when probing a local address.
    EchoRequest { identifier: u16 },
    Other { icmp_type: u8, code: u8 },
}

impl IcmpReply {
    /// Whether this message can be an answer to the probe sent with
    /// `identifier` and `sequence`.
    pub fn answers(&self, identifier: u16, sequence: u16) -> bool {
        match self {
            Self::TimeExceeded { quoted_echo } => {
                quoted_echo.is_none_or(|quoted| quoted == (identifier, sequence))
            }
            Self::EchoReply { identifier: id, sequence: seq } => {
                *id == identifier && *seq == sequence
            }
            Self::EchoRequest { .. } => false,
            Self::Other { .. } => true,
        }
    }
}

/// Builds an ICMP Echo Request (type 8, code 0) with a valid checksum.
pub fn create_echo_request(identifier: u16, sequence: u16, payload: &[u8]) -> anyhow::Result<Vec<u8>> {
    let mut buffer: Vec<u8> = vec![0u8; ICMP_HDR_LEN + payload.len()];
    {
        let mut echo: MutableEchoRequestPacket =
            MutableEchoRequestPacket::new(&mut buffer).context("creating echo request packet")?;
        echo.set_icmp_type(IcmpTypes::EchoRequest);
        echo.set_icmp_code(echo_request::IcmpCodes::NoCode);
        echo.set_identifier(identifier);
        echo.set_sequence_number(sequence);
        echo.set_payload(payload);
        echo.set_checksum(0);
    }

    let checksum: u16 = icmp::checksum(&IcmpPacket::new(&buffer).context("reading icmp header")?);
    MutableEchoRequestPacket::new(&mut buffer)
        .context("creating echo request packet")?
        .set_checksum(checksum);

    Ok(buffer)
}

/// Classifies an ICMP message, starting at the ICMP header.
pub fn parse_reply(bytes: &[u8]) -> anyhow::Result<IcmpReply> {
    ensure!(
        bytes.len() >= ICMP_HDR_LEN,
        "truncated ICMP message ({} bytes)",
        bytes.len()
    );
    let packet: IcmpPacket = IcmpPacket::new(bytes).context("invalid ICMP message")?;

    let reply: IcmpReply = match packet.get_icmp_type() {
        IcmpTypes::TimeExceeded => IcmpReply::TimeExceeded {
            quoted_echo: packet.payload().get(QUOTE_OFFSET..).and_then(quoted_echo),
        },
        IcmpTypes::EchoReply => {
            let echo = EchoReplyPacket::new(bytes).context("invalid echo reply")?;
            IcmpReply::EchoReply {
                identifier: echo.get_identifier(),
                sequence: echo.get_sequence_number(),
            }
        }
        IcmpTypes::EchoRequest => {
            let echo = EchoRequestPacket::new(bytes).context("invalid echo request")?;
            IcmpReply::EchoRequest {
                identifier: echo.get_identifier(),
            }
        }
        other => IcmpReply::Other {
            icmp_type: other.0,
            code: packet.get_icmp_code().0,
        },
    };

    Ok(reply)
}

/// Reads the echo identifier and sequence out of the IPv4 datagram quoted by a router.
fn quoted_echo(quoted: &[u8]) -> Option<(u16, u16)> {
    let ip: Ipv4Packet = Ipv4Packet::new(quoted)?;
    if ip.get_next_level_protocol() != IpNextHeaderProtocols::Icmp {
        return None;
    }

    let header_len: usize = usize::from(ip.get_header_length()) * 4;
    let echo: EchoRequestPacket = EchoRequestPacket::new(quoted.get(header_len..)?)?;
    if echo.get_icmp_type() != IcmpTypes::EchoRequest {
        return None;
    }
    Some((echo.get_identifier(), echo.get_sequence_number()))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use pnet::packet::ipv4::MutableIpv4Packet;

    const IPV4_HDR_LEN: usize = 20;

    /// Wraps `inner` the way a router quotes a dropped datagram.
    fn time_exceeded(inner: &[u8]) -> Vec<u8> {
        let mut quoted = vec![0u8; IPV4_HDR_LEN];
        {
            let mut ip = MutableIpv4Packet::new(&mut quoted).unwrap();
            ip.set_version(4);
            ip.set_header_length(5);
            ip.set_ttl(1);
            ip.set_next_level_protocol(IpNextHeaderProtocols::Icmp);
            ip.set_total_length((IPV4_HDR_LEN + inner.len()) as u16);
        }
        quoted.extend_from_slice(&inner[..ICMP_HDR_LEN]);

        let mut msg = vec![11, 0, 0, 0, 0, 0, 0, 0];
        msg.extend_from_slice(&quoted);
        msg
    }

    #[test]
    fn echo_request_layout() {
        let bytes = create_echo_request(0x1234, 7, PROBE_MARKER).unwrap();
        assert_eq!(bytes.len(), ICMP_HDR_LEN + PROBE_MARKER.len());
        assert_eq!(bytes[0], 8, "type");
        assert_eq!(bytes[1], 0, "code");
        assert_eq!(&bytes[4..6], &[0x12, 0x34], "identifier");
        assert_eq!(&bytes[6..8], &[0x00, 0x07], "sequence");
        assert_eq!(&bytes[ICMP_HDR_LEN..], PROBE_MARKER);
    }

    #[test]
    fn echo_request_checksum_is_valid() {
        let bytes = create_echo_request(4242, 1, PROBE_MARKER).unwrap();
        let stored = u16::from_be_bytes([bytes[2], bytes[3]]);
        assert_eq!(stored, icmp::checksum(&IcmpPacket::new(&bytes).unwrap()));
    }

    #[test]
    fn own_request_is_recognized_and_ignored() {
        let bytes = create_echo_request(99, 3, PROBE_MARKER).unwrap();
        let reply = parse_reply(&bytes).unwrap();
        assert_eq!(reply, IcmpReply::EchoRequest { identifier: 99 });
        assert!(!reply.answers(99, 3));
    }

    #[test]
    fn echo_reply_matches_on_identifier_and_sequence() {
        let mut bytes = create_echo_request(500, 9, PROBE_MARKER).unwrap();
        bytes[0] = 0;

        let reply = parse_reply(&bytes).unwrap();
        assert_eq!(reply, IcmpReply::EchoReply { identifier: 500, sequence: 9 });
        assert!(reply.answers(500, 9));
        assert!(!reply.answers(501, 9));

        // --- Late reply to the previous hop ---
        assert!(!reply.answers(500, 10));
    }

    #[test]
    fn time_exceeded_quotes_identifier_and_sequence() {
        let request = create_echo_request(777, 2, PROBE_MARKER).unwrap();
        let reply = parse_reply(&time_exceeded(&request)).unwrap();

        assert_eq!(reply, IcmpReply::TimeExceeded { quoted_echo: Some((777, 2)) });
        assert!(reply.answers(777, 2));
        assert!(!reply.answers(778, 2));
        assert!(!reply.answers(777, 3));
    }

    #[test]
    fn time_exceeded_with_short_quote_is_accepted() {
        let reply = parse_reply(&[11, 0, 0, 0, 0, 0, 0, 0]).unwrap();
        assert_eq!(reply, IcmpReply::TimeExceeded { quoted_echo: None });
        assert!(reply.answers(1, 1));
    }

    #[test]
    fn other_types_are_reported_verbatim() {
        // Destination unreachable, port unreachable
        let reply = parse_reply(&[3, 3, 0, 0, 0, 0, 0, 0]).unwrap();
        assert_eq!(reply, IcmpReply::Other { icmp_type: 3, code: 3 });
        assert!(reply.answers(1, 1));
    }

    #[test]
    fn truncated_message_is_an_error() {
        assert!(parse_reply(&[]).is_err());
        assert!(parse_reply(&[11, 0, 0]).is_err());
    }
}
