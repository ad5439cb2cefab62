use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

use crate::error::{invalid_input, JsonResult};

/// Detected encoding information
#[derive(Debug, Clone)]
pub struct EncodingInfo {
    pub encoding: &'static Encoding,
    pub has_bom: bool,
    pub bom_length: usize,
}

/// Detect the document encoding from its leading bytes
pub fn detect_encoding(bytes: &[u8]) -> EncodingInfo {
    // Check BOM first
    if let Some(info) = detect_bom(bytes) {
        return info;
    }

    detect_encoding_heuristic(bytes)
}

/// Detect BOM (Byte Order Mark)
fn detect_bom(bytes: &[u8]) -> Option<EncodingInfo> {
    if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        return Some(EncodingInfo {
            encoding: UTF_8,
            has_bom: true,
            bom_length: 3,
        });
    }

    if bytes.starts_with(&[0xFE, 0xFF]) {
        return Some(EncodingInfo {
            encoding: UTF_16BE,
            has_bom: true,
            bom_length: 2,
        });
    }
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return Some(EncodingInfo {
            encoding: UTF_16LE,
            has_bom: true,
            bom_length: 2,
        });
    }

    None
}

/// BOM-less heuristic: JSON text starts with an ASCII byte, so a NUL in the
/// first two bytes betrays a UTF-16 stream (RFC 4627 §3 pattern).
fn detect_encoding_heuristic(bytes: &[u8]) -> EncodingInfo {
    let encoding = if bytes.len() >= 2 && bytes[0] == 0 {
        UTF_16BE
    } else if bytes.len() >= 2 && bytes[1] == 0 {
        UTF_16LE
    } else {
        UTF_8
    };

    EncodingInfo {
        encoding,
        has_bom: false,
        bom_length: 0,
    }
}

/// Normalize a document to UTF-8: strip the BOM, transcode, reject
/// malformed input.
pub fn decode_document(bytes: &[u8]) -> JsonResult<String> {
    let info = detect_encoding(bytes);
    let body = &bytes[info.bom_length..];

    let (decoded, had_errors) = info.encoding.decode_without_bom_handling(body);
    if had_errors {
        return Err(invalid_input(
            format!("input is not valid {}", info.encoding.name()),
            0,
        ));
    }

    tracing::debug!(
        encoding = info.encoding.name(),
        has_bom = info.has_bom,
        bytes = body.len(),
        "decoded document"
    );

    Ok(decoded.into_owned())
}
