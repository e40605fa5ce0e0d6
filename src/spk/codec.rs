//! zlib (RFC 1950) wrapped DEFLATE for entry payloads.

use std::io::{self, Read, Write};

use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;

use crate::error::{Result, SpkError};

/// Compress `data` at maximum effort.
pub fn compress(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len() / 2), Compression::best());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Decompress a payload that must inflate to exactly `expected` bytes.
///
/// Output is capped one byte past `expected`, so an oversized stream is
/// reported without inflating all of it.
pub fn decompress(file: &str, raw: &[u8], expected: u64) -> Result<Vec<u8>> {
    let corrupt = |detail: String| SpkError::PayloadCorrupt {
        file: file.to_string(),
        detail,
    };

    let mut out = Vec::with_capacity(expected.min(64 * 1024 * 1024) as usize);
    ZlibDecoder::new(raw)
        .take(expected + 1)
        .read_to_end(&mut out)
        .map_err(|e| corrupt(format!("inflate failed: {e}")))?;

    if out.len() as u64 != expected {
        let actual = if out.len() as u64 > expected {
            format!("more than {expected}")
        } else {
            out.len().to_string()
        };
        return Err(corrupt(format!(
            "decompressed size mismatch: expected {expected}, got {actual}"
        )));
    }

    Ok(out)
}
