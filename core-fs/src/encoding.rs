//! Text/byte codec for file contents
//!
//! `Base64` stores the UTF-8 bytes of the text as base64 text, so the file on
//! disk is itself printable. Decoding tolerates line breaks and other ASCII
//! whitespace anywhere in the stored text and decodes it as a single blob.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::{FsError, FsResult};

/// How text maps to the bytes stored on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentEncoding {
    /// UTF-8 text
    #[default]
    Utf8,
    /// 7-bit ASCII text
    Ascii,
    /// Base64 text of the UTF-8 bytes
    Base64,
}

impl fmt::Display for ContentEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContentEncoding::Utf8 => "utf8",
            ContentEncoding::Ascii => "ascii",
            ContentEncoding::Base64 => "base64",
        };
        f.write_str(name)
    }
}

impl ContentEncoding {
    /// Convert text to the bytes that go on disk
    ///
    /// `line_width` only affects `Base64`; `None` produces a single line.
    pub fn encode(self, text: &str, line_width: Option<usize>) -> FsResult<Vec<u8>> {
        match self {
            ContentEncoding::Utf8 => Ok(text.as_bytes().to_vec()),
            ContentEncoding::Ascii => {
                if let Some(pos) = text.find(|c: char| !c.is_ascii()) {
                    return Err(FsError::invalid_content(
                        self,
                        format!("non-ASCII character at byte {}", pos),
                    ));
                }
                Ok(text.as_bytes().to_vec())
            }
            ContentEncoding::Base64 => {
                let encoded = STANDARD.encode(text.as_bytes());
                Ok(match line_width {
                    Some(width) if width > 0 => wrap_lines(&encoded, width).into_bytes(),
                    _ => encoded.into_bytes(),
                })
            }
        }
    }

    /// Convert bytes read from disk back to text
    pub fn decode(self, bytes: &[u8]) -> FsResult<String> {
        match self {
            ContentEncoding::Utf8 => {
                String::from_utf8(bytes.to_vec()).map_err(|e| FsError::invalid_content(self, e))
            }
            ContentEncoding::Ascii => {
                if let Some(pos) = bytes.iter().position(|b| !b.is_ascii()) {
                    return Err(FsError::invalid_content(
                        self,
                        format!("non-ASCII byte at offset {}", pos),
                    ));
                }
                // ASCII is a subset of UTF-8
                String::from_utf8(bytes.to_vec()).map_err(|e| FsError::invalid_content(self, e))
            }
            ContentEncoding::Base64 => {
                let compact: Vec<u8> = bytes
                    .iter()
                    .copied()
                    .filter(|b| !b.is_ascii_whitespace())
                    .collect();
                let raw = STANDARD
                    .decode(compact)
                    .map_err(|e| FsError::invalid_content(self, e))?;
                String::from_utf8(raw).map_err(|e| FsError::invalid_content(self, e))
            }
        }
    }
}

/// Break `encoded` into `\n`-terminated lines of at most `width` characters
fn wrap_lines(encoded: &str, width: usize) -> String {
    let mut out = String::with_capacity(encoded.len() + encoded.len() / width + 1);
    // base64 output is ASCII, so byte chunks are char boundaries
    for chunk in encoded.as_bytes().chunks(width) {
        out.push_str(&String::from_utf8_lossy(chunk));
        out.push('\n');
    }
    out
}
