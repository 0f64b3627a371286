//! Ethernet II link header view.

use crate::error::MalformedFrame;

/// Link type constant for Ethernet.
pub const LINKTYPE_ETHERNET: u16 = 1;

/// Ethernet II header length in bytes.
pub const HEADER_LEN: usize = 14;

/// Well-known EtherTypes.
pub mod ethertype {
    pub const IPV4: u16 = 0x0800;
    pub const ARP: u16 = 0x0806;
    pub const VLAN: u16 = 0x8100;
    pub const IPV6: u16 = 0x86DD;
}

/// Zero-copy view of an Ethernet II header.
///
/// Construction proves the fixed fourteen-byte header is present;
/// accessors never read past it.
#[derive(Debug, Clone, Copy)]
pub struct EthernetView<'a> {
    data: &'a [u8],
}

impl<'a> EthernetView<'a> {
    /// Overlay the header on `data` after checking its length.
    pub fn from_slice(data: &'a [u8]) -> Result<Self, MalformedFrame> {
        if data.len() < HEADER_LEN {
            return Err(MalformedFrame::Truncated {
                layer: "Ethernet",
                needed: HEADER_LEN,
                have: data.len(),
            });
        }
        Ok(EthernetView { data })
    }

    /// Destination MAC address (bytes 0..6).
    pub fn destination(&self) -> [u8; 6] {
        [
            self.data[0],
            self.data[1],
            self.data[2],
            self.data[3],
            self.data[4],
            self.data[5],
        ]
    }

    /// Source MAC address (bytes 6..12).
    pub fn source(&self) -> [u8; 6] {
        [
            self.data[6],
            self.data[7],
            self.data[8],
            self.data[9],
            self.data[10],
            self.data[11],
        ]
    }

    /// EtherType field (bytes 12..14, big-endian).
    pub fn ethertype(&self) -> u16 {
        u16::from_be_bytes([self.data[12], self.data[13]])
    }

    /// Everything after the link header.
    pub fn payload(&self) -> &'a [u8] {
        &self.data[HEADER_LEN..]
    }
}
