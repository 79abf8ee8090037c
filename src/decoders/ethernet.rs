use crate::error::{KsError, Result};
use crate::packet::EthernetHeader;

pub const ETHERTYPE_IPV4: u16 = 0x0800;
pub const ETHERTYPE_IPV6: u16 = 0x86DD;
pub const ETHERTYPE_VLAN: u16 = 0x8100;

const ETHERNET_HEADER_LEN: usize = 14;
const VLAN_TAG_LEN: usize = 4;

/// Decode an Ethernet II header, stepping over a single 802.1Q tag.
pub fn decode_ethernet(data: &[u8]) -> Result<(EthernetHeader, &[u8])> {
    if data.len() < ETHERNET_HEADER_LEN {
        return Err(KsError::DecodeError(
            "Packet too short for Ethernet header".to_string(),
        ));
    }

    let mut dst_mac = [0u8; 6];
    let mut src_mac = [0u8; 6];
    dst_mac.copy_from_slice(&data[0..6]);
    src_mac.copy_from_slice(&data[6..12]);

    let mut ethertype = u16::from_be_bytes([data[12], data[13]]);
    let mut offset = ETHERNET_HEADER_LEN;

    if ethertype == ETHERTYPE_VLAN {
        if data.len() < ETHERNET_HEADER_LEN + VLAN_TAG_LEN {
            return Err(KsError::DecodeError(
                "Packet too short for 802.1Q tag".to_string(),
            ));
        }
        ethertype = u16::from_be_bytes([data[16], data[17]]);
        offset += VLAN_TAG_LEN;
    }

    let header = EthernetHeader {
        dst_mac,
        src_mac,
        ethertype,
    };

    Ok((header, &data[offset..]))
}
