//! Hex/ASCII payload rendering.
//!
//! Renders a byte buffer as the classic three-zone dump: a five-digit
//! decimal offset, sixteen hex columns with a visual break after the
//! eighth, and the printable-ASCII view of the same bytes. Short final
//! lines pad the hex zone with blanks so the ASCII zone always starts
//! at the same character position.

use std::fmt;

/// Bytes rendered per dump line.
pub const BYTES_PER_LINE: usize = 16;

/// One rendered line of a payload dump.
///
/// `cols` holds the line's byte slots; `None` marks a padded slot on a
/// short final line. `ascii` is the printable view of the same bytes,
/// one character per byte, with non-printable bytes shown as `.`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpLine {
    /// Byte offset of the first column, from the start of the buffer.
    pub offset: usize,
    /// Hex column slots, in buffer order.
    pub cols: [Option<u8>; BYTES_PER_LINE],
    /// Printable rendering of the occupied slots.
    pub ascii: String,
}

impl DumpLine {
    fn new(offset: usize, chunk: &[u8]) -> Self {
        let mut cols = [None; BYTES_PER_LINE];
        for (slot, byte) in cols.iter_mut().zip(chunk) {
            *slot = Some(*byte);
        }
        let ascii = chunk
            .iter()
            .map(|&b| if is_printable(b) { b as char } else { '.' })
            .collect();
        DumpLine {
            offset,
            cols,
            ascii,
        }
    }

    /// Number of bytes this line covers.
    pub fn len(&self) -> usize {
        self.cols.iter().filter(|c| c.is_some()).count()
    }

    /// True when the line covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.cols[0].is_none()
    }
}

impl fmt::Display for DumpLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:05}   ", self.offset)?;
        for (i, col) in self.cols.iter().enumerate() {
            match col {
                Some(byte) => write!(f, "{byte:02x} ")?,
                None => f.write_str("   ")?,
            }
            // visual break after the eighth column
            if i == 7 {
                f.write_str(" ")?;
            }
        }
        write!(f, "   {}", self.ascii)
    }
}

/// Render `bytes` as dump lines, sixteen bytes per line in order.
///
/// Empty input produces no lines.
///
/// # Example
///
/// ```
/// use snifflet::format::hex_dump;
///
/// let lines = hex_dump(b"GET / HTTP/1.1\r\n");
/// assert_eq!(lines.len(), 1);
/// assert_eq!(
///     lines[0].to_string(),
///     "00000   47 45 54 20 2f 20 48 54  54 50 2f 31 2e 31 0d 0a    GET / HTTP/1.1.."
/// );
/// ```
pub fn hex_dump(bytes: &[u8]) -> Vec<DumpLine> {
    bytes
        .chunks(BYTES_PER_LINE)
        .enumerate()
        .map(|(index, chunk)| DumpLine::new(index * BYTES_PER_LINE, chunk))
        .collect()
}

/// Printable ASCII: space through tilde.
fn is_printable(byte: u8) -> bool {
    matches!(byte, 0x20..=0x7e)
}
