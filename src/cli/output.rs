//! Rendering dissection results as the per-packet report.
//!
//! All diagnostic text lives here: the dissector hands back structured
//! values and this module turns them into the classic numbered-packet
//! listing, payload dumps included.

use std::io::{self, Write};

use crate::error::DissectError;
use crate::format::hex_dump;
use crate::protocol::{Dissection, Transport};

/// Counters accumulated over one capture run.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunStats {
    /// Frames handed to the dissector, any outcome.
    pub frames: u64,
    /// Frames rejected as malformed.
    pub malformed: u64,
    /// Anomalies raised by otherwise-good frames.
    pub anomalies: u64,
}

impl RunStats {
    /// Account for a dissected frame.
    pub fn record(&mut self, dissection: &Dissection<'_>) {
        self.frames += 1;
        self.anomalies += dissection.anomalies.len() as u64;
    }

    /// Account for a frame the dissector rejected.
    pub fn record_malformed(&mut self) {
        self.frames += 1;
        self.malformed += 1;
    }
}

/// Writes the per-packet report.
pub struct ReportWriter {
    show_payload: bool,
}

impl ReportWriter {
    /// Create a report writer; `show_payload` controls whether payload
    /// bytes are dumped under each TCP packet.
    pub fn new(show_payload: bool) -> Self {
        Self { show_payload }
    }

    /// Render one dissected frame.
    pub fn write_dissection<W: Write>(
        &self,
        dissection: &Dissection<'_>,
        writer: &mut W,
    ) -> io::Result<()> {
        writeln!(writer)?;
        writeln!(writer, "Packet number {}:", dissection.frame)?;
        writeln!(writer, "       From: {}", dissection.src_ip)?;
        writeln!(writer, "         To: {}", dissection.dst_ip)?;
        writeln!(writer, "   Protocol: {}", dissection.transport.protocol_name())?;

        match &dissection.transport {
            Transport::Tcp(segment) => {
                writeln!(writer, "   Src port: {}", segment.src_port)?;
                writeln!(writer, "   Dst port: {}", segment.dst_port)?;
                writeln!(writer, "        Seq: {}", segment.sequence)?;
                writeln!(writer, "        Ack: {}", segment.acknowledgment)?;
            }
            Transport::Udp(datagram) => {
                writeln!(writer, "   Src port: {}", datagram.src_port)?;
                writeln!(writer, "   Dst port: {}", datagram.dst_port)?;
                writeln!(writer, "     Length: {}", datagram.length)?;
            }
            Transport::Icmp | Transport::RawIp | Transport::Other(_) => {}
        }

        for anomaly in &dissection.anomalies {
            writeln!(writer, "    Anomaly: {anomaly}")?;
        }

        if let Transport::Tcp(segment) = &dissection.transport {
            if !segment.payload.is_empty() {
                writeln!(writer, "   Payload ({} bytes):", segment.payload.len())?;
                if self.show_payload {
                    for line in hex_dump(segment.payload) {
                        writeln!(writer, "{line}")?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Render a frame the dissector rejected.
    pub fn write_malformed<W: Write>(
        &self,
        error: &DissectError,
        writer: &mut W,
    ) -> io::Result<()> {
        writeln!(writer)?;
        writeln!(writer, "Packet number {}:", error.frame)?;
        writeln!(writer, "  Malformed: {}", error.kind)
    }

    /// Render the end-of-run summary.
    pub fn write_summary<W: Write>(&self, stats: &RunStats, writer: &mut W) -> io::Result<()> {
        writeln!(writer)?;
        writeln!(
            writer,
            "Capture complete. {} frames read, {} malformed, {} anomalies.",
            stats.frames, stats.malformed, stats.anomalies
        )
    }
}
