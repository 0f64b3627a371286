//! Capture file reading module.
//!
//! This module handles reading PCAP and PCAPNG files and
//! exposing raw frames for dissection.

mod packet;
mod reader;

pub use packet::RawFrame;
pub use reader::PcapReader;
