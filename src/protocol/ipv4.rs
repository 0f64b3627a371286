//! IPv4 network header view.

use std::net::Ipv4Addr;

use crate::error::MalformedFrame;

/// Minimum IPv4 header length in bytes (no options).
pub const MIN_HEADER_LEN: usize = 20;

/// Zero-copy view of an IPv4 header.
///
/// Construction validates the declared header length against the
/// buffer: the length nibble must describe at least the twenty-byte
/// fixed part and the buffer must cover the whole declared header.
/// Accessors never read past the declared header.
#[derive(Debug, Clone, Copy)]
pub struct Ipv4View<'a> {
    data: &'a [u8],
    header_len: usize,
}

impl<'a> Ipv4View<'a> {
    /// Overlay the header on `data` after validating its length.
    pub fn from_slice(data: &'a [u8]) -> Result<Self, MalformedFrame> {
        let first = *data.first().ok_or(MalformedFrame::Truncated {
            layer: "IPv4",
            needed: MIN_HEADER_LEN,
            have: 0,
        })?;

        let header_len = ((first & 0x0f) as usize) * 4;
        if header_len < MIN_HEADER_LEN {
            return Err(MalformedFrame::InvalidHeaderLength {
                layer: "IPv4",
                length: header_len,
            });
        }
        if data.len() < header_len {
            return Err(MalformedFrame::Truncated {
                layer: "IPv4",
                needed: header_len,
                have: data.len(),
            });
        }
        Ok(Ipv4View { data, header_len })
    }

    /// Version nibble (high bits of byte 0).
    pub fn version(&self) -> u8 {
        self.data[0] >> 4
    }

    /// Header length in bytes, from the IHL nibble.
    pub fn header_len(&self) -> usize {
        self.header_len
    }

    /// Type-of-service byte.
    pub fn tos(&self) -> u8 {
        self.data[1]
    }

    /// Total length of network header, transport header and payload.
    pub fn total_length(&self) -> u16 {
        u16::from_be_bytes([self.data[2], self.data[3]])
    }

    /// Identification field.
    pub fn identification(&self) -> u16 {
        u16::from_be_bytes([self.data[4], self.data[5]])
    }

    /// Don't-fragment flag.
    pub fn dont_fragment(&self) -> bool {
        self.data[6] & 0x40 != 0
    }

    /// More-fragments flag.
    pub fn more_fragments(&self) -> bool {
        self.data[6] & 0x20 != 0
    }

    /// Fragment offset in eight-byte units.
    pub fn fragment_offset(&self) -> u16 {
        u16::from_be_bytes([self.data[6], self.data[7]]) & 0x1fff
    }

    /// Time-to-live.
    pub fn ttl(&self) -> u8 {
        self.data[8]
    }

    /// Protocol number of the carried transport header.
    pub fn protocol(&self) -> u8 {
        self.data[9]
    }

    /// Header checksum as stored (not verified).
    pub fn checksum(&self) -> u16 {
        u16::from_be_bytes([self.data[10], self.data[11]])
    }

    /// Source address.
    pub fn source(&self) -> Ipv4Addr {
        Ipv4Addr::from([self.data[12], self.data[13], self.data[14], self.data[15]])
    }

    /// Destination address.
    pub fn destination(&self) -> Ipv4Addr {
        Ipv4Addr::from([self.data[16], self.data[17], self.data[18], self.data[19]])
    }

    /// Everything after the declared header.
    pub fn payload(&self) -> &'a [u8] {
        &self.data[self.header_len..]
    }
}
