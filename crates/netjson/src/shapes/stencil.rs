//! Embedded stencil codec
//!
//! drawio stores custom shapes inline as `shape=stencil(<payload>)`, where
//! the payload is the shape markup URI-component encoded, raw-deflated and
//! base64 encoded. Compressed `<diagram>` contents use the same scheme.

use std::io::{Read, Write};

use base64::{engine::general_purpose, Engine as _};
use flate2::{read::DeflateDecoder, write::DeflateEncoder, Compression};
use percent_encoding::{percent_decode, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::core::{NetjsonError, NetjsonResult};

/// Characters `encodeURIComponent` escapes
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Decode a stencil payload into shape markup
///
/// A payload that is already markup (starts with `<`) is returned as is.
pub fn decompress(payload: &str) -> NetjsonResult<String> {
    let payload = payload.trim();
    if payload.starts_with('<') {
        return Ok(payload.to_string());
    }

    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let deflated = general_purpose::STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| NetjsonError::stencil_decode(format!("base64: {}", e)))?;

    let mut inflated = Vec::new();
    DeflateDecoder::new(deflated.as_slice())
        .read_to_end(&mut inflated)
        .map_err(|e| NetjsonError::stencil_decode(format!("inflate: {}", e)))?;

    percent_decode(&inflated)
        .decode_utf8()
        .map(|markup| markup.into_owned())
        .map_err(|e| NetjsonError::stencil_decode(format!("utf-8: {}", e)))
}

/// Encode shape markup the way drawio embeds it
pub fn compress(markup: &str) -> NetjsonResult<String> {
    let encoded = utf8_percent_encode(markup, URI_COMPONENT).to_string();

    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(encoded.as_bytes())?;
    let deflated = encoder.finish()?;

    Ok(general_purpose::STANDARD.encode(deflated))
}

/// Extract the payload of a `stencil(...)` shape value
pub fn stencil_payload(shape_value: &str) -> Option<&str> {
    shape_value
        .trim()
        .strip_prefix("stencil(")
        .and_then(|rest| rest.strip_suffix(')'))
}
