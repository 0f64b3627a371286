//! TCP transport header view.

use crate::error::MalformedFrame;

/// IP protocol number for TCP.
pub const IP_PROTO_TCP: u8 = 6;

/// Minimum TCP header length in bytes (no options).
pub const MIN_HEADER_LEN: usize = 20;

/// TCP flag bits (byte 13 of the header).
pub mod flags {
    pub const FIN: u8 = 0x01;
    pub const SYN: u8 = 0x02;
    pub const RST: u8 = 0x04;
    pub const PSH: u8 = 0x08;
    pub const ACK: u8 = 0x10;
    pub const URG: u8 = 0x20;
    pub const ECE: u8 = 0x40;
    pub const CWR: u8 = 0x80;
}

/// Zero-copy view of a TCP header.
///
/// Construction validates the data-offset nibble against the buffer
/// the same way [`Ipv4View`](crate::protocol::Ipv4View) validates its
/// IHL: the declared header must cover at least the twenty-byte fixed
/// part and fit inside the buffer.
#[derive(Debug, Clone, Copy)]
pub struct TcpView<'a> {
    data: &'a [u8],
    header_len: usize,
}

impl<'a> TcpView<'a> {
    /// Overlay the header on `data` after validating its length.
    pub fn from_slice(data: &'a [u8]) -> Result<Self, MalformedFrame> {
        if data.len() < MIN_HEADER_LEN {
            return Err(MalformedFrame::Truncated {
                layer: "TCP",
                needed: MIN_HEADER_LEN,
                have: data.len(),
            });
        }

        let header_len = ((data[12] >> 4) as usize) * 4;
        if header_len < MIN_HEADER_LEN {
            return Err(MalformedFrame::InvalidHeaderLength {
                layer: "TCP",
                length: header_len,
            });
        }
        if data.len() < header_len {
            return Err(MalformedFrame::Truncated {
                layer: "TCP",
                needed: header_len,
                have: data.len(),
            });
        }
        Ok(TcpView { data, header_len })
    }

    /// Source port (bytes 0..2, big-endian).
    pub fn source_port(&self) -> u16 {
        u16::from_be_bytes([self.data[0], self.data[1]])
    }

    /// Destination port (bytes 2..4, big-endian).
    pub fn destination_port(&self) -> u16 {
        u16::from_be_bytes([self.data[2], self.data[3]])
    }

    /// Sequence number.
    pub fn sequence_number(&self) -> u32 {
        u32::from_be_bytes([self.data[4], self.data[5], self.data[6], self.data[7]])
    }

    /// Acknowledgment number.
    pub fn acknowledgment_number(&self) -> u32 {
        u32::from_be_bytes([self.data[8], self.data[9], self.data[10], self.data[11]])
    }

    /// Data-offset nibble: header length in four-byte words.
    pub fn data_offset(&self) -> u8 {
        self.data[12] >> 4
    }

    /// Header length in bytes, from the data-offset nibble.
    pub fn header_len(&self) -> usize {
        self.header_len
    }

    /// The eight flag bits as stored.
    pub fn flags(&self) -> u8 {
        self.data[13]
    }

    pub fn fin(&self) -> bool {
        self.data[13] & flags::FIN != 0
    }

    pub fn syn(&self) -> bool {
        self.data[13] & flags::SYN != 0
    }

    pub fn rst(&self) -> bool {
        self.data[13] & flags::RST != 0
    }

    pub fn psh(&self) -> bool {
        self.data[13] & flags::PSH != 0
    }

    pub fn ack(&self) -> bool {
        self.data[13] & flags::ACK != 0
    }

    pub fn urg(&self) -> bool {
        self.data[13] & flags::URG != 0
    }

    pub fn ece(&self) -> bool {
        self.data[13] & flags::ECE != 0
    }

    pub fn cwr(&self) -> bool {
        self.data[13] & flags::CWR != 0
    }

    /// Receive window.
    pub fn window(&self) -> u16 {
        u16::from_be_bytes([self.data[14], self.data[15]])
    }

    /// Checksum as stored (not verified).
    pub fn checksum(&self) -> u16 {
        u16::from_be_bytes([self.data[16], self.data[17]])
    }

    /// Urgent pointer.
    pub fn urgent_pointer(&self) -> u16 {
        u16::from_be_bytes([self.data[18], self.data[19]])
    }

    /// Everything after the declared header, to the end of the capture.
    ///
    /// The caller trims this to the length the network layer declares;
    /// captures can carry link-layer padding past the datagram.
    pub fn payload(&self) -> &'a [u8] {
        &self.data[self.header_len..]
    }
}
