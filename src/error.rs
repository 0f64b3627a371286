//! Error types for snifflet.

use thiserror::Error;

/// Main error type for snifflet operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Errors reading or parsing capture files.
    #[error("capture error: {0}")]
    Pcap(#[from] PcapError),

    /// A frame that could not be dissected.
    #[error("dissect error: {0}")]
    Dissect(#[from] DissectError),

    /// I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to capture file handling.
#[derive(Error, Debug)]
pub enum PcapError {
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    #[error("invalid capture format: {reason}")]
    InvalidFormat { reason: String },

    #[error("unsupported link type: {link_type} (only Ethernet is supported)")]
    UnsupportedLinkType { link_type: u16 },
}

/// A single frame that failed dissection.
///
/// Carries the packet ordinal so reporting can still print the
/// per-packet banner before the failure reason.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("frame {frame}: {kind}")]
pub struct DissectError {
    /// 1-based ordinal of the offending frame.
    pub frame: u64,
    /// What was wrong with it.
    pub kind: MalformedFrame,
}

/// Ways a captured frame can be structurally unusable.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedFrame {
    /// The capture ended before a header we needed to read.
    #[error("{layer} header truncated (need {needed} bytes, have {have})")]
    Truncated {
        layer: &'static str,
        needed: usize,
        have: usize,
    },

    /// A header-length field describes a header smaller than its own
    /// mandatory fixed part.
    #[error("invalid {layer} header length: {length} bytes")]
    InvalidHeaderLength { layer: &'static str, length: usize },
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
