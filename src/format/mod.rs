//! Pure formatting for dissection output.
//!
//! Rendering helpers with no I/O of their own:
//! - hex/ASCII payload dumps with fixed sixteen-byte lines
//! - MAC address display
//!
//! The CLI output layer composes these into the per-packet report.

mod address;
mod hexdump;

pub use address::format_mac;
pub use hexdump::{hex_dump, DumpLine, BYTES_PER_LINE};
