//! Command-line argument definitions.

use clap::Parser;
use std::path::PathBuf;

/// Dissect captured network frames and dump their payloads.
#[derive(Parser, Debug)]
#[command(name = "snifflet")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Capture file to read (PCAP or PCAPNG, optionally gzipped)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Stop after this many frames (0 = all)
    #[arg(short = 'c', long = "count", value_name = "N", default_value = "0")]
    pub count: u64,

    /// Suppress hex/ASCII payload dumps
    #[arg(long = "no-payload")]
    pub no_payload: bool,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Frame limit as an option, `None` meaning unlimited.
    pub fn frame_limit(&self) -> Option<u64> {
        (self.count > 0).then_some(self.count)
    }
}
