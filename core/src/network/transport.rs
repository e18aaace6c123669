use std::io;
use std::net::IpAddr;
use std::time::Duration;

use pnet::{
    packet::{
        Packet,
        icmp::IcmpPacket,
        ip::IpNextHeaderProtocols,
    },
    transport::{
        self,
        TransportChannelType,
        TransportProtocol,
        TransportReceiver,
        TransportSender,
    },
};

use nettoolbox_common::ToolboxError;

const TRANSPORT_BUFFER_SIZE: usize = 4096;
const CHANNEL_TYPE_ICMP: TransportChannelType =
    TransportChannelType::Layer4(TransportProtocol::Ipv4(IpNextHeaderProtocols::Icmp));

/// The raw socket operations a traceroute needs.
pub trait ProbeChannel {
    /// Sets the IP TTL used for every packet sent afterwards.
    fn set_ttl(&mut self, ttl: u8) -> io::Result<()>;

    /// Sends an already encoded ICMP message.
    fn send_probe(&mut self, message: &[u8], destination: IpAddr) -> io::Result<()>;

    /// Blocks for at most `wait` and returns the next ICMP message with its sender.
    ///
    /// `Ok(None)` means nothing arrived in time.
    fn next_message(&mut self, wait: Duration) -> io::Result<Option<(Vec<u8>, IpAddr)>>;
}

impl<C: ProbeChannel + ?Sized> ProbeChannel for &mut C {
    fn set_ttl(&mut self, ttl: u8) -> io::Result<()> {
        (**self).set_ttl(ttl)
    }

    fn send_probe(&mut self, message: &[u8], destination: IpAddr) -> io::Result<()> {
        (**self).send_probe(message, destination)
    }

    fn next_message(&mut self, wait: Duration) -> io::Result<Option<(Vec<u8>, IpAddr)>> {
        (**self).next_message(wait)
    }
}

/// Raw IPv4 ICMP socket. Closed when dropped.
pub struct IcmpChannel {
    tx: TransportSender,
    rx: TransportReceiver,
}

/// Opens the raw ICMP channel.
///
/// Fails with [`ToolboxError::RawSocketPermissionDenied`] when the process lacks
/// root or `CAP_NET_RAW`.
pub fn open_icmp_channel() -> Result<IcmpChannel, ToolboxError> {
    let (tx, rx) = transport::transport_channel(TRANSPORT_BUFFER_SIZE, CHANNEL_TYPE_ICMP)
        .map_err(|e| match e.kind() {
            io::ErrorKind::PermissionDenied => ToolboxError::RawSocketPermissionDenied,
            _ => ToolboxError::RawSocket(e),
        })?;
    Ok(IcmpChannel { tx, rx })
}

impl ProbeChannel for IcmpChannel {
    fn set_ttl(&mut self, ttl: u8) -> io::Result<()> {
        self.tx.set_ttl(ttl)
    }

    fn send_probe(&mut self, message: &[u8], destination: IpAddr) -> io::Result<()> {
        let packet: IcmpPacket = IcmpPacket::new(message)
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "ICMP message too short"))?;
        self.tx.send_to(packet, destination)?;
        Ok(())
    }

    fn next_message(&mut self, wait: Duration) -> io::Result<Option<(Vec<u8>, IpAddr)>> {
        if wait.is_zero() {
            return Ok(None);
        }
        let mut iter = transport::icmp_packet_iter(&mut self.rx);
        let message = iter
            .next_with_timeout(wait)?
            .map(|(packet, source)| (packet.packet().to_vec(), source));
        Ok(message)
    }
}
