use crate::decoders::ethernet::{self, ETHERTYPE_IPV4, ETHERTYPE_IPV6};
use crate::decoders::{ip, transport};
use crate::error::Result;
use crate::packet::{DecodedPacket, IpLayer, IpProtocol, TransportLayer};
use tracing::{trace, warn};

/// Packet decoder - walks Ethernet, IP and transport headers
#[derive(Debug, Clone)]
pub struct PacketDecoder {
    decode_ethernet: bool,
}

impl PacketDecoder {
    pub fn new() -> Self {
        Self {
            decode_ethernet: true,
        }
    }

    /// Decoder for captures without a link layer (DLT_RAW)
    pub fn raw_ip() -> Self {
        Self {
            decode_ethernet: false,
        }
    }

    /// Decode a frame into structured layers.
    ///
    /// A malformed Ethernet header is an error; anything that fails
    /// further up the stack leaves the corresponding layer as `None`.
    pub fn decode(&self, frame: &[u8]) -> Result<DecodedPacket> {
        let mut decoded = DecodedPacket::default();
        let mut data = frame;

        if self.decode_ethernet {
            let (eth_header, payload) = ethernet::decode_ethernet(data)?;
            let ethertype = eth_header.ethertype;
            decoded.ethernet = Some(eth_header);
            data = payload;

            if ethertype != ETHERTYPE_IPV4 && ethertype != ETHERTYPE_IPV6 {
                trace!("Unsupported EtherType: 0x{:04x}", ethertype);
                return Ok(decoded);
            }
        }

        let (ip_layer, payload) = match ip::decode_ip(data) {
            Ok(decoded_ip) => decoded_ip,
            Err(e) => {
                warn!("Failed to decode IP: {}", e);
                return Ok(decoded);
            }
        };
        let protocol = ip_layer.protocol();
        let later_fragment = matches!(&ip_layer, IpLayer::V4(h) if h.is_later_fragment());
        decoded.ip = Some(ip_layer);

        if later_fragment {
            trace!("Non-first IPv4 fragment, transport header not present");
            return Ok(decoded);
        }

        let layer = match protocol {
            IpProtocol::Tcp => transport::decode_tcp(payload).map(TransportLayer::Tcp),
            IpProtocol::Udp => transport::decode_udp(payload).map(TransportLayer::Udp),
            IpProtocol::Icmp | IpProtocol::Icmpv6 => {
                transport::decode_icmp(payload).map(TransportLayer::Icmp)
            }
            IpProtocol::Unknown(p) => {
                trace!("Unsupported IP protocol: {}", p);
                return Ok(decoded);
            }
        }
        .map_err(|e| warn!("Failed to decode {:?}: {}", protocol, e))
        .ok();
        decoded.transport = layer;

        if let Some(TransportLayer::Tcp(seg)) = &decoded.transport {
            trace!(
                "TCP: {} -> {}, window {}",
                seg.src_port,
                seg.dst_port,
                seg.window
            );
        }

        Ok(decoded)
    }
}

impl Default for PacketDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoders::fixtures::{HTTP_302_FRAME, HTTP_302_WINDOW};
    use crate::packet::{IpLayer, PacketView};

    #[test]
    fn test_decode_captured_frame() {
        let decoded = PacketDecoder::new().decode(HTTP_302_FRAME).unwrap();

        assert!(decoded.ethernet.is_some());
        match decoded.ip {
            Some(IpLayer::V4(ref h)) => {
                assert_eq!(h.src_addr.to_string(), "209.85.227.103");
                assert_eq!(h.dst_addr.to_string(), "192.168.100.140");
            }
            _ => panic!("Expected IPv4 layer"),
        }

        let tcp = decoded.tcp().expect("Expected TCP transport layer");
        assert_eq!(tcp.src_port, 80);
        assert_eq!(tcp.dst_port, 49335);
        assert_eq!(tcp.flags, 0x18); // PSH,ACK
        assert_eq!(tcp.window, HTTP_302_WINDOW);
        assert_eq!(decoded.tcp_window(), Some(117));
    }

    #[test]
    fn test_decode_raw_ip() {
        // IPv4 header + minimal UDP header
        let data = vec![
            0x45, 0x00, 0x00, 0x1c, 0x00, 0x00, 0x00, 0x00, 0x40, 0x11, 0x00, 0x00,
            0x0a, 0x00, 0x00, 0x01, 0x0a, 0x00, 0x00, 0x02,
            0x04, 0xd2, 0x00, 0x35, 0x00, 0x08, 0x00, 0x00,
        ];

        let decoded = PacketDecoder::raw_ip().decode(&data).unwrap();

        assert!(decoded.ethernet.is_none());
        assert_eq!(decoded.transport_protocol(), Some(IpProtocol::Udp));
        assert_eq!(decoded.tcp_window(), None);
    }

    #[test]
    fn test_truncated_tcp_keeps_ip_layer() {
        // Truncate the captured frame in the middle of the TCP header
        let decoded = PacketDecoder::new().decode(&HTTP_302_FRAME[..40]).unwrap();

        assert!(decoded.ip.is_some());
        assert!(decoded.transport.is_none());
        assert_eq!(decoded.transport_protocol(), Some(IpProtocol::Tcp));
        assert_eq!(decoded.tcp_window(), None);
    }

    #[test]
    fn test_non_first_fragment_has_no_transport() {
        let mut frame = HTTP_302_FRAME.to_vec();
        frame[20] = 0x00;
        frame[21] = 0xb9; // Fragment offset 185

        let decoded = PacketDecoder::new().decode(&frame).unwrap();
        match decoded.ip {
            Some(IpLayer::V4(ref h)) => assert_eq!(h.fragment_offset, 185),
            _ => panic!("Expected IPv4 layer"),
        }
        assert!(decoded.transport.is_none());
        assert_eq!(decoded.tcp_window(), None);

        // The first fragment still carries the TCP header
        frame[20] = 0x20;
        frame[21] = 0x00;
        let decoded = PacketDecoder::new().decode(&frame).unwrap();
        assert_eq!(decoded.tcp_window(), Some(HTTP_302_WINDOW));
    }

    #[test]
    fn test_non_ip_ethertype() {
        let mut frame = HTTP_302_FRAME[..60].to_vec();
        frame[12] = 0x08;
        frame[13] = 0x06; // ARP

        let decoded = PacketDecoder::new().decode(&frame).unwrap();
        assert!(decoded.ip.is_none());
        assert_eq!(decoded.transport_protocol(), None);
    }

    #[test]
    fn test_short_frame_is_error() {
        assert!(PacketDecoder::new().decode(&[0x00, 0x25]).is_err());
    }
}
