//! snifflet CLI entry point.

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use snifflet::cli::{Args, ReportWriter, RunStats};
use snifflet::error::PcapError;
use snifflet::format::format_mac;
use snifflet::pcap::PcapReader;
use snifflet::protocol::{Dissector, LINKTYPE_ETHERNET};

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Set up logging
    let filter = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    let mut reader = PcapReader::open(&args.file)
        .with_context(|| format!("Failed to open capture file: {}", args.file.display()))?;
    tracing::debug!("Opened {} (link type {})", args.file.display(), reader.link_type());

    let dissector = Dissector::new();
    let report = ReportWriter::new(!args.no_payload);
    let mut stats = RunStats::default();
    let mut stdout = io::stdout().lock();

    let limit = args.frame_limit();

    while let Some(frame) = reader.next_frame()? {
        if frame.link_type != LINKTYPE_ETHERNET {
            return Err(PcapError::UnsupportedLinkType {
                link_type: frame.link_type,
            }
            .into());
        }
        if frame.is_truncated() {
            tracing::warn!(
                "Frame {} truncated by capture ({} of {} bytes)",
                frame.frame_number,
                frame.captured_length,
                frame.original_length
            );
        }

        match dissector.dissect(&frame) {
            Ok(dissection) => {
                tracing::debug!(
                    "Frame {}: {} -> {}",
                    dissection.frame,
                    format_mac(&dissection.src_mac),
                    format_mac(&dissection.dst_mac)
                );
                stats.record(&dissection);
                report.write_dissection(&dissection, &mut stdout)?;
            }
            Err(error) => {
                tracing::warn!("Frame {} not dissected: {}", error.frame, error.kind);
                stats.record_malformed();
                report.write_malformed(&error, &mut stdout)?;
            }
        }

        if limit.is_some_and(|n| stats.frames >= n) {
            tracing::debug!("Stopping after {} frames (--count)", stats.frames);
            break;
        }
    }

    report.write_summary(&stats, &mut stdout)?;
    Ok(())
}
