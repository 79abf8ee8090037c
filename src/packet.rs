use std::net::{Ipv4Addr, Ipv6Addr};

/// IP protocol numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IpProtocol {
    Icmp,
    Tcp,
    Udp,
    Icmpv6,
    Unknown(u8),
}

impl From<u8> for IpProtocol {
    fn from(value: u8) -> Self {
        match value {
            1 => IpProtocol::Icmp,
            6 => IpProtocol::Tcp,
            17 => IpProtocol::Udp,
            58 => IpProtocol::Icmpv6,
            other => IpProtocol::Unknown(other),
        }
    }
}

impl From<IpProtocol> for u8 {
    fn from(value: IpProtocol) -> Self {
        match value {
            IpProtocol::Icmp => 1,
            IpProtocol::Tcp => 6,
            IpProtocol::Udp => 17,
            IpProtocol::Icmpv6 => 58,
            IpProtocol::Unknown(v) => v,
        }
    }
}

/// Read-only view of a decoded packet, as seen by rule keywords.
///
/// Keywords only ever borrow the packet for the duration of a single
/// evaluation, so implementations can be backed by whatever the decoder
/// produced.
pub trait PacketView {
    /// Transport protocol carried by the IP layer, if the packet has one
    fn transport_protocol(&self) -> Option<IpProtocol>;

    /// Raw (unscaled) TCP window, present only for decoded TCP segments
    fn tcp_window(&self) -> Option<u16>;
}

/// Decoded packet with protocol layers
#[derive(Debug, Clone, Default)]
pub struct DecodedPacket {
    pub ethernet: Option<EthernetHeader>,
    pub ip: Option<IpLayer>,
    pub transport: Option<TransportLayer>,
}

impl DecodedPacket {
    pub fn is_tcp(&self) -> bool {
        matches!(self.transport, Some(TransportLayer::Tcp(_)))
    }

    pub fn tcp(&self) -> Option<&TcpSegment> {
        match &self.transport {
            Some(TransportLayer::Tcp(seg)) => Some(seg),
            _ => None,
        }
    }
}

impl PacketView for DecodedPacket {
    fn transport_protocol(&self) -> Option<IpProtocol> {
        match &self.transport {
            Some(TransportLayer::Tcp(_)) => Some(IpProtocol::Tcp),
            Some(TransportLayer::Udp(_)) => Some(IpProtocol::Udp),
            Some(TransportLayer::Icmp(_)) => Some(IpProtocol::Icmp),
            // Fall back to the IP header when the transport layer did not decode
            None => self.ip.as_ref().map(IpLayer::protocol),
        }
    }

    fn tcp_window(&self) -> Option<u16> {
        self.tcp().map(|seg| seg.window)
    }
}

#[derive(Debug, Clone)]
pub struct EthernetHeader {
    pub src_mac: [u8; 6],
    pub dst_mac: [u8; 6],
    pub ethertype: u16,
}

#[derive(Debug, Clone)]
pub enum IpLayer {
    V4(Ipv4Header),
    V6(Ipv6Header),
}

impl IpLayer {
    pub fn protocol(&self) -> IpProtocol {
        match self {
            IpLayer::V4(h) => IpProtocol::from(h.protocol),
            IpLayer::V6(h) => IpProtocol::from(h.next_header),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Ipv4Header {
    pub src_addr: Ipv4Addr,
    pub dst_addr: Ipv4Addr,
    pub protocol: u8,
    pub ttl: u8,
    pub header_length: u8,
    pub total_length: u16,
    /// More Fragments flag
    pub more_fragments: bool,
    /// Fragment offset in 8-byte units
    pub fragment_offset: u16,
}

impl Ipv4Header {
    /// Only the first fragment carries the transport header
    pub fn is_later_fragment(&self) -> bool {
        self.fragment_offset != 0
    }
}

#[derive(Debug, Clone)]
pub struct Ipv6Header {
    pub src_addr: Ipv6Addr,
    pub dst_addr: Ipv6Addr,
    pub next_header: u8,
    pub hop_limit: u8,
    pub payload_length: u16,
}

#[derive(Debug, Clone)]
pub enum TransportLayer {
    Tcp(TcpSegment),
    Udp(UdpDatagram),
    Icmp(IcmpPacket),
}

#[derive(Debug, Clone)]
pub struct TcpSegment {
    pub src_port: u16,
    pub dst_port: u16,
    pub seq: u32,
    pub ack: u32,
    pub flags: u8,
    pub window: u16,
    pub payload_len: usize,
}

#[derive(Debug, Clone)]
pub struct UdpDatagram {
    pub src_port: u16,
    pub dst_port: u16,
    pub length: u16,
}

#[derive(Debug, Clone)]
pub struct IcmpPacket {
    pub icmp_type: u8,
    pub icmp_code: u8,
}
