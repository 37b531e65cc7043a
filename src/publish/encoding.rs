// src/publish/encoding.rs

//! Byte-order-mark based text encoding detection.
//!
//! Only the first three bytes of a file are inspected. Files without a BOM
//! are treated as UTF-8. Decoded text never contains the BOM; encoding
//! writes it back for the BOM variants.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::warn;

/// Text encodings the include resolver can read and write back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// UTF-8 with a leading `EF BB BF` byte-order mark.
    Utf8Bom,
    /// UTF-16 big-endian (`FE FF`).
    Utf16Be,
    /// UTF-16 little-endian (`FF FE`).
    Utf16Le,
    /// No byte-order mark present.
    Utf8,
}

/// Encoding used when a file has no BOM or cannot be read.
pub const DEFAULT_ENCODING: TextEncoding = TextEncoding::Utf8;

const BOM_LEN: usize = 3;
const BOM_CHAR: char = '\u{FEFF}';

impl TextEncoding {
    /// Classify a file prefix. Only the first three bytes are considered.
    pub fn from_prefix(prefix: &[u8]) -> Self {
        match prefix {
            [0xEF, 0xBB, 0xBF, ..] => TextEncoding::Utf8Bom,
            [0xFE, 0xFF, ..] => TextEncoding::Utf16Be,
            [0xFF, 0xFE, ..] => TextEncoding::Utf16Le,
            _ => DEFAULT_ENCODING,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TextEncoding::Utf8Bom => "UTF-8 (BOM)",
            TextEncoding::Utf16Be => "UTF-16BE",
            TextEncoding::Utf16Le => "UTF-16LE",
            TextEncoding::Utf8 => "UTF-8",
        }
    }

    /// Whether files in this encoding carry a byte-order mark.
    pub fn has_bom(self) -> bool {
        !matches!(self, TextEncoding::Utf8)
    }

    /// Decode raw file bytes, dropping a leading byte-order mark.
    ///
    /// Malformed sequences are replaced with `U+FFFD`.
    pub fn decode(self, bytes: &[u8]) -> String {
        let text = match self {
            TextEncoding::Utf8Bom | TextEncoding::Utf8 => {
                String::from_utf8_lossy(bytes).into_owned()
            }
            TextEncoding::Utf16Be => decode_utf16(bytes, u16::from_be_bytes),
            TextEncoding::Utf16Le => decode_utf16(bytes, u16::from_le_bytes),
        };
        match text.strip_prefix(BOM_CHAR) {
            Some(rest) if self.has_bom() => rest.to_string(),
            _ => text,
        }
    }

    /// Encode `text`, prefixing the byte-order mark for BOM encodings.
    pub fn encode(self, text: &str) -> Vec<u8> {
        let mut with_bom = String::with_capacity(text.len() + BOM_CHAR.len_utf8());
        if self.has_bom() {
            with_bom.push(BOM_CHAR);
        }
        with_bom.push_str(text);

        match self {
            TextEncoding::Utf8Bom | TextEncoding::Utf8 => with_bom.into_bytes(),
            TextEncoding::Utf16Be => with_bom.encode_utf16().flat_map(u16::to_be_bytes).collect(),
            TextEncoding::Utf16Le => with_bom.encode_utf16().flat_map(u16::to_le_bytes).collect(),
        }
    }
}

impl std::fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> String {
    let chunks = bytes.chunks_exact(2);
    let dangling = !chunks.remainder().is_empty();

    let mut text: String = char::decode_utf16(chunks.map(|pair| unit([pair[0], pair[1]])))
        .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect();

    if dangling {
        text.push(char::REPLACEMENT_CHARACTER);
    }
    text
}

/// Detect the encoding of the file at `path` from its first three bytes.
///
/// Never fails: unreadable files fall back to [`DEFAULT_ENCODING`]. The file
/// handle is closed before returning.
pub fn detect_encoding(path: &Path) -> TextEncoding {
    match read_prefix(path) {
        Ok(prefix) => TextEncoding::from_prefix(&prefix),
        Err(err) => {
            warn!(?path, error = %err, "could not sniff encoding; using default");
            DEFAULT_ENCODING
        }
    }
}

fn read_prefix(path: &Path) -> std::io::Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut prefix = Vec::with_capacity(BOM_LEN);
    file.take(BOM_LEN as u64).read_to_end(&mut prefix)?;
    Ok(prefix)
}
