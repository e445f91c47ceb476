//! Transaction log loading with encoding recovery.
//!
//! Sales logs arrive from several point-of-sale exports and are not reliably
//! UTF-8. The reader tries an ordered list of [`TextEncoding`]s and hands the
//! cleaned, non-header lines to the parser.

use std::path::Path;

use sales_core::models::HEADER_MARKER;
use thiserror::Error;
use tracing::{debug, warn};

/// Decode attempts used by [`read_sales_data`], in priority order.
pub const DEFAULT_ENCODINGS: [TextEncoding; 3] = [
    TextEncoding::Utf8,
    TextEncoding::Windows1252,
    TextEncoding::Latin1,
];

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Windows-1252 code points for bytes `0x80..=0x9F`; `None` marks the five
/// bytes the code page leaves undefined.
const CP1252_HIGH: [Option<char>; 32] = [
    Some('\u{20AC}'),
    None,
    Some('\u{201A}'),
    Some('\u{0192}'),
    Some('\u{201E}'),
    Some('\u{2026}'),
    Some('\u{2020}'),
    Some('\u{2021}'),
    Some('\u{02C6}'),
    Some('\u{2030}'),
    Some('\u{0160}'),
    Some('\u{2039}'),
    Some('\u{0152}'),
    None,
    Some('\u{017D}'),
    None,
    None,
    Some('\u{2018}'),
    Some('\u{2019}'),
    Some('\u{201C}'),
    Some('\u{201D}'),
    Some('\u{2022}'),
    Some('\u{2013}'),
    Some('\u{2014}'),
    Some('\u{02DC}'),
    Some('\u{2122}'),
    Some('\u{0161}'),
    Some('\u{203A}'),
    Some('\u{0153}'),
    None,
    Some('\u{017E}'),
    Some('\u{0178}'),
];

// ── Encodings ─────────────────────────────────────────────────────────────────

/// A text encoding the reader knows how to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Windows1252,
    Latin1,
}

/// A strict decode attempt hit a byte sequence the encoding cannot represent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{encoding} cannot decode byte at offset {offset}")]
pub struct DecodeError {
    pub encoding: &'static str,
    pub offset: usize,
}

impl TextEncoding {
    /// Conventional label, e.g. `"utf-8"`.
    pub fn label(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Windows1252 => "cp1252",
            TextEncoding::Latin1 => "latin-1",
        }
    }

    /// Decode `bytes`, failing on the first byte the encoding cannot map.
    pub fn decode(&self, bytes: &[u8]) -> Result<String, DecodeError> {
        match self {
            TextEncoding::Utf8 => std::str::from_utf8(strip_bom(bytes))
                .map(str::to_string)
                .map_err(|e| DecodeError {
                    encoding: self.label(),
                    offset: e.valid_up_to(),
                }),
            TextEncoding::Windows1252 => bytes
                .iter()
                .enumerate()
                .map(|(offset, &b)| {
                    cp1252_char(b).ok_or(DecodeError {
                        encoding: self.label(),
                        offset,
                    })
                })
                .collect(),
            TextEncoding::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }

    /// Decode `bytes`, silently skipping anything the encoding cannot map.
    pub fn decode_lossy(&self, bytes: &[u8]) -> String {
        match self {
            TextEncoding::Utf8 => decode_utf8_ignoring_errors(strip_bom(bytes)),
            TextEncoding::Windows1252 => bytes.iter().filter_map(|&b| cp1252_char(b)).collect(),
            TextEncoding::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
        }
    }
}

impl std::fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Text recovered from raw bytes together with how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub encoding: TextEncoding,
    pub text: String,
    /// `true` when no strict attempt succeeded and undecodable bytes were
    /// dropped.
    pub lossy: bool,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Try each encoding in order and keep the first strict success.
///
/// When every strict attempt fails, the first listed encoding is applied
/// again with undecodable bytes ignored. Returns `None` only for an empty
/// encoding list.
pub fn decode_bytes(bytes: &[u8], encodings: &[TextEncoding]) -> Option<DecodedText> {
    for encoding in encodings {
        match encoding.decode(bytes) {
            Ok(text) => {
                return Some(DecodedText {
                    encoding: *encoding,
                    text,
                    lossy: false,
                })
            }
            Err(e) => debug!("Decode attempt failed: {}", e),
        }
    }

    let fallback = *encodings.first()?;
    Some(DecodedText {
        encoding: fallback,
        text: fallback.decode_lossy(bytes),
        lossy: true,
    })
}

/// Trim every line and drop blanks and header rows.
///
/// `\n`, `\r\n` and a bare `\r` all end a line.
pub fn clean_lines(text: &str) -> Vec<String> {
    text.split(['\r', '\n'])
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(HEADER_MARKER))
        .map(str::to_string)
        .collect()
}

/// Read a transaction log using [`DEFAULT_ENCODINGS`].
pub fn read_sales_data(path: &Path) -> Vec<String> {
    read_sales_data_with(path, &DEFAULT_ENCODINGS)
}

/// Read a transaction log trying `encodings` in order.
///
/// A missing or unreadable file, or an empty encoding list, yields an empty
/// `Vec` after logging a warning.
pub fn read_sales_data_with(path: &Path, encodings: &[TextEncoding]) -> Vec<String> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) => {
            warn!("Failed to read sales data {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    let Some(decoded) = decode_bytes(&bytes, encodings) else {
        warn!("No text encoding configured for {}", path.display());
        return Vec::new();
    };

    if decoded.lossy {
        warn!(
            "{} is not valid in any configured encoding; decoded as {} with errors ignored",
            path.display(),
            decoded.encoding
        );
    }

    let lines = clean_lines(&decoded.text);
    debug!(
        "Read {} data lines from {} ({})",
        lines.len(),
        path.display(),
        decoded.encoding
    );
    lines
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
}

fn cp1252_char(byte: u8) -> Option<char> {
    match byte {
        0x80..=0x9F => CP1252_HIGH[usize::from(byte - 0x80)],
        _ => Some(char::from(byte)),
    }
}

fn decode_utf8_ignoring_errors(mut bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    loop {
        match std::str::from_utf8(bytes) {
            Ok(s) => {
                out.push_str(s);
                return out;
            }
            Err(e) => {
                let (valid, rest) = bytes.split_at(e.valid_up_to());
                out.push_str(std::str::from_utf8(valid).unwrap_or_default());
                let skip = e.error_len().unwrap_or(rest.len());
                bytes = &rest[skip..];
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_bytes(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    // ── decode_bytes ──────────────────────────────────────────────────────────

    #[test]
    fn test_decode_prefers_utf8() {
        let decoded = decode_bytes("Café".as_bytes(), &DEFAULT_ENCODINGS).unwrap();
        assert_eq!(decoded.encoding, TextEncoding::Utf8);
        assert_eq!(decoded.text, "Café");
        assert!(!decoded.lossy);
    }

    #[test]
    fn test_decode_falls_back_to_cp1252() {
        // "Café “x”" as Windows-1252.
        let bytes = [0x43, 0x61, 0x66, 0xE9, 0x20, 0x93, 0x78, 0x94];
        let decoded = decode_bytes(&bytes, &DEFAULT_ENCODINGS).unwrap();
        assert_eq!(decoded.encoding, TextEncoding::Windows1252);
        assert_eq!(decoded.text, "Café \u{201C}x\u{201D}");
    }

    #[test]
    fn test_decode_falls_back_to_latin1_on_undefined_cp1252_byte() {
        let bytes = [0x41, 0x81, 0x42];
        let decoded = decode_bytes(&bytes, &DEFAULT_ENCODINGS).unwrap();
        assert_eq!(decoded.encoding, TextEncoding::Latin1);
        assert_eq!(decoded.text, "A\u{81}B");
        assert!(!decoded.lossy);
    }

    #[test]
    fn test_decode_ignores_errors_when_no_attempt_succeeds() {
        let bytes = [0x41, 0xFF, 0x42, 0xC3];
        let decoded = decode_bytes(&bytes, &[TextEncoding::Utf8]).unwrap();
        assert!(decoded.lossy);
        assert_eq!(decoded.text, "AB");
    }

    #[test]
    fn test_decode_empty_encoding_list() {
        assert!(decode_bytes(b"T001", &[]).is_none());
    }

    #[test]
    fn test_utf8_bom_is_stripped() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(b"T001|x");
        let decoded = decode_bytes(&bytes, &DEFAULT_ENCODINGS).unwrap();
        assert_eq!(decoded.text, "T001|x");
    }

    #[test]
    fn test_strict_decode_reports_offset() {
        let err = TextEncoding::Windows1252.decode(&[0x41, 0x42, 0x9D]).unwrap_err();
        assert_eq!(err.offset, 2);
        assert_eq!(err.encoding, "cp1252");
    }

    // ── clean_lines ───────────────────────────────────────────────────────────

    #[test]
    fn test_clean_lines_drops_header_and_blanks() {
        let text = "TransactionID|Date|ProductID\r\n\
                    T001|2024-12-01|P101\r\n\
                    \r\n   \n  T002|2024-12-02|P102  \n";
        let lines = clean_lines(text);
        assert_eq!(lines, vec!["T001|2024-12-01|P101", "T002|2024-12-02|P102"]);
    }

    #[test]
    fn test_clean_lines_accepts_cr_only_and_mixed_endings() {
        let cr_only = "TransactionID|Date\rT001|a\rT002|b\r";
        assert_eq!(clean_lines(cr_only), vec!["T001|a", "T002|b"]);

        let mixed = "TransactionID|Date\r\nT001|a\rT002|b\nT003|c\r\n";
        assert_eq!(clean_lines(mixed), vec!["T001|a", "T002|b", "T003|c"]);
    }

    // ── read_sales_data ───────────────────────────────────────────────────────

    #[test]
    fn test_read_sales_data_basic() {
        let dir = TempDir::new().unwrap();
        let path = write_bytes(
            dir.path(),
            "sales.txt",
            b"TransactionID|Date|ProductID|ProductName|Quantity|UnitPrice|CustomerID|Region\n\
              T001|2024-12-01|P101|Laptop|2|45000|C001|North\n\
              \n\
              T002|2024-12-01|P102|Mouse|5|500|C002|South\n",
        );

        let lines = read_sales_data(&path);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("T001"));
        assert!(lines[1].starts_with("T002"));
    }

    #[test]
    fn test_read_sales_data_cp1252_file() {
        let dir = TempDir::new().unwrap();
        let mut bytes = b"T001|2024-12-01|P101|Caf".to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(b" Mug|1|250|C001|West\n");
        let path = write_bytes(dir.path(), "sales.txt", &bytes);

        let lines = read_sales_data(&path);
        assert_eq!(lines, vec!["T001|2024-12-01|P101|Café Mug|1|250|C001|West"]);
    }

    #[test]
    fn test_read_sales_data_cr_line_endings() {
        let dir = TempDir::new().unwrap();
        let path = write_bytes(
            dir.path(),
            "sales.txt",
            b"TransactionID|Date|ProductID|ProductName|Quantity|UnitPrice|CustomerID|Region\r\
              T001|2024-12-01|P101|Laptop|2|45000|C001|North\r\
              T002|2024-12-01|P102|Mouse|5|500|C002|North\r",
        );

        let lines = read_sales_data(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(crate::parser::parse_transactions(&lines).len(), 2);
    }

    #[test]
    fn test_read_sales_data_missing_file() {
        let lines = read_sales_data(Path::new("/tmp/does-not-exist-sales-test-xyz.txt"));
        assert!(lines.is_empty());
    }

    #[test]
    fn test_read_sales_data_with_no_encodings() {
        let dir = TempDir::new().unwrap();
        let path = write_bytes(dir.path(), "sales.txt", b"T001|x\n");
        assert!(read_sales_data_with(&path, &[]).is_empty());
    }
}
