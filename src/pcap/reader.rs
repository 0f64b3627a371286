//! Capture file reader.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use pcap_parser::traits::PcapReaderIterator;
use pcap_parser::{LegacyPcapReader, PcapBlockOwned, PcapError, PcapNGReader};

use super::RawFrame;
use crate::error::{Error, PcapError as OurPcapError};

/// Buffer size for reading capture files (64KB).
const BUFFER_SIZE: usize = 65536;

/// Gzip magic bytes.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// The byte stream a capture is read from, gzip already unwrapped.
type CaptureStream = BufReader<Box<dyn Read + Send>>;

/// Reader for PCAP and PCAPNG files, with transparent gzip
/// decompression.
///
/// Frames come back in file order with 1-based frame numbers. The
/// capture's link type is learned from the file header (or interface
/// description block) and stamped on every frame.
pub struct PcapReader {
    inner: ReaderInner,
    frame_number: u64,
    link_type: u16,
    /// Subsecond divisor for legacy timestamps: 1000 for the
    /// nanosecond magic, 1 otherwise.
    ts_divisor: i64,
}

enum ReaderInner {
    Legacy(LegacyPcapReader<CaptureStream>),
    Ng(PcapNGReader<CaptureStream>),
}

impl PcapReader {
    /// Open a capture file for reading.
    ///
    /// Detects gzip by extension or magic bytes and decompresses on
    /// the fly. The capture format is picked by magic number.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let is_gzipped = is_gzip_file(path)?;

        // First pass: sniff the capture magic through the gzip layer.
        let mut stream = open_stream(path, is_gzipped)?;
        let mut magic = [0u8; 4];
        stream.read_exact(&mut magic).map_err(|_| {
            Error::Pcap(OurPcapError::InvalidFormat {
                reason: "file too short to read magic number".to_string(),
            })
        })?;

        // Second pass: hand a fresh stream to the format reader.
        drop(stream);
        let stream = open_stream(path, is_gzipped)?;

        match &magic {
            // Legacy PCAP, either endianness
            [0xd4, 0xc3, 0xb2, 0xa1] | [0xa1, 0xb2, 0xc3, 0xd4] => Self::open_legacy(stream, 1),
            // Nanosecond-resolution variant; subseconds scale to µs
            [0x4d, 0x3c, 0xb2, 0xa1] | [0xa1, 0xb2, 0x3c, 0x4d] => {
                Self::open_legacy(stream, 1000)
            }
            // PCAPNG section header
            [0x0a, 0x0d, 0x0d, 0x0a] => Self::open_ng(stream),
            _ => Err(Error::Pcap(OurPcapError::InvalidFormat {
                reason: format!("unknown magic number: {magic:02x?}"),
            })),
        }
    }

    fn open_legacy(stream: CaptureStream, ts_divisor: i64) -> Result<Self, Error> {
        let reader = LegacyPcapReader::new(BUFFER_SIZE, stream).map_err(|e| {
            Error::Pcap(OurPcapError::InvalidFormat {
                reason: format!("bad PCAP header: {e}"),
            })
        })?;

        Ok(Self {
            inner: ReaderInner::Legacy(reader),
            frame_number: 0,
            link_type: 1, // default to Ethernet, updated from the file header
            ts_divisor,
        })
    }

    fn open_ng(stream: CaptureStream) -> Result<Self, Error> {
        let reader = PcapNGReader::new(BUFFER_SIZE, stream).map_err(|e| {
            Error::Pcap(OurPcapError::InvalidFormat {
                reason: format!("bad PCAPNG header: {e}"),
            })
        })?;

        Ok(Self {
            inner: ReaderInner::Ng(reader),
            frame_number: 0,
            link_type: 1, // updated from the interface description block
            ts_divisor: 1,
        })
    }

    /// Link type of the capture, meaningful once reading has started.
    pub fn link_type(&self) -> u16 {
        self.link_type
    }

    /// Frames read so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_number
    }

    /// Read the next frame, skipping non-packet blocks.
    pub fn next_frame(&mut self) -> Result<Option<RawFrame>, Error> {
        match &mut self.inner {
            ReaderInner::Legacy(reader) => next_legacy(
                reader,
                &mut self.frame_number,
                &mut self.link_type,
                self.ts_divisor,
            ),
            ReaderInner::Ng(reader) => next_ng(reader, &mut self.frame_number, &mut self.link_type),
        }
    }
}

// Manual impl: the format readers wrap a `dyn Read` stream and carry
// no `Debug` of their own.
impl fmt::Debug for PcapReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let format = match self.inner {
            ReaderInner::Legacy(_) => "pcap",
            ReaderInner::Ng(_) => "pcapng",
        };
        f.debug_struct("PcapReader")
            .field("format", &format)
            .field("frame_number", &self.frame_number)
            .field("link_type", &self.link_type)
            .finish_non_exhaustive()
    }
}

impl Iterator for PcapReader {
    type Item = Result<RawFrame, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_frame().transpose()
    }
}

fn next_legacy(
    reader: &mut LegacyPcapReader<CaptureStream>,
    frame_number: &mut u64,
    link_type: &mut u16,
    ts_divisor: i64,
) -> Result<Option<RawFrame>, Error> {
    loop {
        match reader.next() {
            Ok((offset, block)) => match block {
                PcapBlockOwned::Legacy(packet) => {
                    *frame_number += 1;

                    let timestamp_us = (packet.ts_sec as i64) * 1_000_000
                        + (packet.ts_usec as i64) / ts_divisor;

                    let frame = RawFrame::new(
                        *frame_number,
                        timestamp_us,
                        packet.caplen,
                        packet.origlen,
                        *link_type,
                        packet.data.to_vec(),
                    );

                    reader.consume(offset);
                    return Ok(Some(frame));
                }
                PcapBlockOwned::LegacyHeader(header) => {
                    *link_type = header.network.0 as u16;
                    reader.consume(offset);
                }
                _ => {
                    reader.consume(offset);
                }
            },
            Err(PcapError::Eof) => return Ok(None),
            Err(PcapError::Incomplete(_)) => {
                reader.refill().map_err(|e| {
                    Error::Pcap(OurPcapError::InvalidFormat {
                        reason: format!("refill error: {e}"),
                    })
                })?;
            }
            Err(e) => {
                return Err(Error::Pcap(OurPcapError::InvalidFormat {
                    reason: format!("parse error: {e}"),
                }))
            }
        }
    }
}

fn next_ng(
    reader: &mut PcapNGReader<CaptureStream>,
    frame_number: &mut u64,
    link_type: &mut u16,
) -> Result<Option<RawFrame>, Error> {
    loop {
        match reader.next() {
            Ok((offset, block)) => match block {
                PcapBlockOwned::NG(ng_block) => {
                    use pcap_parser::pcapng::Block;

                    match ng_block {
                        Block::InterfaceDescription(idb) => {
                            *link_type = idb.linktype.0 as u16;
                            reader.consume(offset);
                        }
                        Block::EnhancedPacket(epb) => {
                            *frame_number += 1;

                            // Interface time units default to microseconds.
                            let timestamp_us = ((epb.ts_high as i64) << 32) | (epb.ts_low as i64);
                            let caplen = epb.caplen.min(epb.data.len() as u32);

                            let frame = RawFrame::new(
                                *frame_number,
                                timestamp_us,
                                caplen,
                                epb.origlen,
                                *link_type,
                                epb.data[..caplen as usize].to_vec(),
                            );

                            reader.consume(offset);
                            return Ok(Some(frame));
                        }
                        Block::SimplePacket(spb) => {
                            *frame_number += 1;

                            // Block data is padded to 32 bits; trim to the
                            // original length when that is shorter.
                            let caplen = (spb.origlen as usize).min(spb.data.len());

                            let frame = RawFrame::new(
                                *frame_number,
                                0, // no timestamp in simple packets
                                caplen as u32,
                                spb.origlen,
                                *link_type,
                                spb.data[..caplen].to_vec(),
                            );

                            reader.consume(offset);
                            return Ok(Some(frame));
                        }
                        _ => {
                            reader.consume(offset);
                        }
                    }
                }
                _ => {
                    reader.consume(offset);
                }
            },
            Err(PcapError::Eof) => return Ok(None),
            Err(PcapError::Incomplete(_)) => {
                reader.refill().map_err(|e| {
                    Error::Pcap(OurPcapError::InvalidFormat {
                        reason: format!("refill error: {e}"),
                    })
                })?;
            }
            Err(e) => {
                return Err(Error::Pcap(OurPcapError::InvalidFormat {
                    reason: format!("parse error: {e}"),
                }))
            }
        }
    }
}

fn open_stream(path: &Path, is_gzipped: bool) -> Result<CaptureStream, Error> {
    let file = File::open(path).map_err(|_| {
        Error::Pcap(OurPcapError::FileNotFound {
            path: path.display().to_string(),
        })
    })?;

    let reader: Box<dyn Read + Send> = if is_gzipped {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };

    Ok(BufReader::with_capacity(BUFFER_SIZE, reader))
}

/// Check if a file is gzipped by extension or magic bytes.
fn is_gzip_file<P: AsRef<Path>>(path: P) -> Result<bool, Error> {
    let path = path.as_ref();

    if let Some(filename) = path.file_name().and_then(|f| f.to_str()) {
        if filename.to_lowercase().ends_with(".gz") {
            return Ok(true);
        }
    }

    let mut file = File::open(path).map_err(|_| {
        Error::Pcap(OurPcapError::FileNotFound {
            path: path.display().to_string(),
        })
    })?;

    let mut magic = [0u8; 2];
    match file.read_exact(&mut magic) {
        Ok(()) => Ok(magic == GZIP_MAGIC),
        Err(_) => Ok(false), // too short to be gzipped
    }
}
