use crate::error::{KsError, Result};
use crate::packet::{IcmpPacket, TcpSegment, UdpDatagram};

/// Decode TCP segment
pub fn decode_tcp(data: &[u8]) -> Result<TcpSegment> {
    if data.len() < 20 {
        return Err(KsError::DecodeError(
            "Packet too short for TCP header".to_string(),
        ));
    }

    // Data offset is in the high 4 bits of byte 12, in 32-bit words
    let data_offset = ((data[12] >> 4) as usize) * 4;
    if data_offset < 20 || data.len() < data_offset {
        return Err(KsError::DecodeError(format!(
            "Invalid TCP data offset {}",
            data_offset
        )));
    }

    Ok(TcpSegment {
        src_port: u16::from_be_bytes([data[0], data[1]]),
        dst_port: u16::from_be_bytes([data[2], data[3]]),
        seq: u32::from_be_bytes([data[4], data[5], data[6], data[7]]),
        ack: u32::from_be_bytes([data[8], data[9], data[10], data[11]]),
        flags: data[13],
        window: u16::from_be_bytes([data[14], data[15]]),
        payload_len: data.len() - data_offset,
    })
}

/// Decode UDP datagram
pub fn decode_udp(data: &[u8]) -> Result<UdpDatagram> {
    if data.len() < 8 {
        return Err(KsError::DecodeError(
            "Packet too short for UDP header".to_string(),
        ));
    }

    Ok(UdpDatagram {
        src_port: u16::from_be_bytes([data[0], data[1]]),
        dst_port: u16::from_be_bytes([data[2], data[3]]),
        length: u16::from_be_bytes([data[4], data[5]]),
    })
}

/// Decode ICMP / ICMPv6 header
pub fn decode_icmp(data: &[u8]) -> Result<IcmpPacket> {
    if data.len() < 8 {
        return Err(KsError::DecodeError(
            "Packet too short for ICMP header".to_string(),
        ));
    }

    Ok(IcmpPacket {
        icmp_type: data[0],
        icmp_code: data[1],
    })
}
