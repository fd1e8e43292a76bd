use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

use crate::errors::ParserError;

/// Only the XML declaration is inspected, which must open the document.
const PROLOG_SCAN_BYTES: usize = 256;

/// Turns raw export bytes into text.
///
/// A byte-order mark decides first, then a UTF-16 `<?` opening without one,
/// then the `encoding` of an XML declaration. Anything else must be UTF-8.
pub fn decode_content(bytes: &[u8]) -> Result<Cow<'_, str>, ParserError> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_length)) => (encoding, &bytes[bom_length..]),
        None => (sniff_encoding(bytes)?, bytes),
    };

    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or(ParserError::Decode {
            encoding: encoding.name(),
        })
}

fn sniff_encoding(bytes: &[u8]) -> Result<&'static Encoding, ParserError> {
    if bytes.starts_with(&[b'<', 0, b'?', 0]) {
        return Ok(UTF_16LE);
    }
    if bytes.starts_with(&[0, b'<', 0, b'?']) {
        return Ok(UTF_16BE);
    }

    match declared_encoding(bytes) {
        Some(label) => {
            Encoding::for_label(label.as_bytes()).ok_or_else(|| ParserError::UnsupportedEncoding {
                label: label.to_string(),
            })
        }
        None => Ok(UTF_8),
    }
}

/// Label from `<?xml version="1.0" encoding="..."?>`, if declared.
fn declared_encoding(bytes: &[u8]) -> Option<&str> {
    let prolog = &bytes[..bytes.len().min(PROLOG_SCAN_BYTES)];
    let prolog = prolog.strip_prefix(b"<?xml")?;
    let end = prolog.windows(2).position(|pair| pair == b"?>")?;
    let declaration = std::str::from_utf8(&prolog[..end]).ok()?;

    let (_, rest) = declaration.split_once("encoding")?;
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let rest = &rest[quote.len_utf8()..];
    let end = rest.find(quote)?;
    Some(rest[..end].trim())
}
