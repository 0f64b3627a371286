//! snifflet - Dissect Ethernet/IPv4 captures into per-packet reports.
//!
//! This library reads PCAP/PCAPNG files (plain or gzip-compressed),
//! walks each frame through Ethernet, IPv4 and TCP/UDP headers, and
//! renders the classic numbered-packet listing with hex/ASCII payload
//! dumps.
//!
//! # Example
//!
//! ```no_run
//! use snifflet::pcap::PcapReader;
//! use snifflet::protocol::Dissector;
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut reader = PcapReader::open("capture.pcap")?;
//!     let dissector = Dissector::new();
//!     while let Some(frame) = reader.next_frame()? {
//!         let dissection = dissector.dissect(&frame)?;
//!         println!("{} -> {}", dissection.src_ip, dissection.dst_ip);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod format;
pub mod pcap;
pub mod protocol;

pub use error::{Error, Result};
