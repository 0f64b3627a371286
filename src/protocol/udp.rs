//! UDP transport header view.

use crate::error::MalformedFrame;

/// IP protocol number for UDP.
pub const IP_PROTO_UDP: u8 = 17;

/// UDP header length in bytes.
pub const HEADER_LEN: usize = 8;

/// Zero-copy view of a UDP header.
///
/// Availability of the fixed eight bytes is the only check; the
/// length field is reported as stored, with no cross-validation
/// against the buffer.
#[derive(Debug, Clone, Copy)]
pub struct UdpView<'a> {
    data: &'a [u8],
}

impl<'a> UdpView<'a> {
    /// Overlay the header on `data` after checking its length.
    pub fn from_slice(data: &'a [u8]) -> Result<Self, MalformedFrame> {
        if data.len() < HEADER_LEN {
            return Err(MalformedFrame::Truncated {
                layer: "UDP",
                needed: HEADER_LEN,
                have: data.len(),
            });
        }
        Ok(UdpView { data })
    }

    /// Source port (bytes 0..2, big-endian).
    pub fn source_port(&self) -> u16 {
        u16::from_be_bytes([self.data[0], self.data[1]])
    }

    /// Destination port (bytes 2..4, big-endian).
    pub fn destination_port(&self) -> u16 {
        u16::from_be_bytes([self.data[2], self.data[3]])
    }

    /// Datagram length in bytes, header included, as stored.
    pub fn length(&self) -> u16 {
        u16::from_be_bytes([self.data[4], self.data[5]])
    }

    /// Checksum as stored (not verified).
    pub fn checksum(&self) -> u16 {
        u16::from_be_bytes([self.data[6], self.data[7]])
    }

    /// Everything after the fixed header, to the end of the capture.
    pub fn payload(&self) -> &'a [u8] {
        &self.data[HEADER_LEN..]
    }
}
