use crate::error::{KsError, Result};
use crate::packet::{IpLayer, Ipv4Header, Ipv6Header};
use std::net::{Ipv4Addr, Ipv6Addr};

/// Decode IPv4 header
pub fn decode_ipv4(data: &[u8]) -> Result<(Ipv4Header, &[u8])> {
    if data.len() < 20 {
        return Err(KsError::DecodeError(
            "Packet too short for IPv4 header".to_string(),
        ));
    }

    // IHL is in 32-bit words
    let header_length = (data[0] & 0x0F) as usize * 4;
    if header_length < 20 || data.len() < header_length {
        return Err(KsError::DecodeError(format!(
            "Invalid IPv4 header length {}",
            header_length
        )));
    }

    let flags_fragment = u16::from_be_bytes([data[6], data[7]]);

    let header = Ipv4Header {
        src_addr: Ipv4Addr::new(data[12], data[13], data[14], data[15]),
        dst_addr: Ipv4Addr::new(data[16], data[17], data[18], data[19]),
        protocol: data[9],
        ttl: data[8],
        header_length: header_length as u8,
        total_length: u16::from_be_bytes([data[2], data[3]]),
        more_fragments: flags_fragment & 0x2000 != 0,
        fragment_offset: flags_fragment & 0x1FFF,
    };

    // Drop Ethernet trailer padding; a zero total length (TSO) keeps everything
    let total = header.total_length as usize;
    let end = if total >= header_length {
        total.min(data.len())
    } else {
        data.len()
    };

    Ok((header, &data[header_length..end]))
}

/// Decode IPv6 fixed header (extension headers are not walked)
pub fn decode_ipv6(data: &[u8]) -> Result<(Ipv6Header, &[u8])> {
    if data.len() < 40 {
        return Err(KsError::DecodeError(
            "Packet too short for IPv6 header".to_string(),
        ));
    }

    let mut src = [0u8; 16];
    let mut dst = [0u8; 16];
    src.copy_from_slice(&data[8..24]);
    dst.copy_from_slice(&data[24..40]);

    let header = Ipv6Header {
        src_addr: Ipv6Addr::from(src),
        dst_addr: Ipv6Addr::from(dst),
        next_header: data[6],
        hop_limit: data[7],
        payload_length: u16::from_be_bytes([data[4], data[5]]),
    };

    Ok((header, &data[40..]))
}

/// Decode IP layer (auto-detect IPv4 or IPv6)
pub fn decode_ip(data: &[u8]) -> Result<(IpLayer, &[u8])> {
    let version = match data.first() {
        Some(b) => b >> 4,
        None => return Err(KsError::DecodeError("Empty IP packet".to_string())),
    };

    match version {
        4 => {
            let (header, payload) = decode_ipv4(data)?;
            Ok((IpLayer::V4(header), payload))
        }
        6 => {
            let (header, payload) = decode_ipv6(data)?;
            Ok((IpLayer::V6(header), payload))
        }
        _ => Err(KsError::DecodeError(format!(
            "Unknown IP version: {}",
            version
        ))),
    }
}
