//! Code point decoding
//!
//! Turns the hyphen-delimited hex notation used by emoji catalogs
//! (`"1F600"`, `"0039-FE0F-20E3"`) into the string it represents.

use thiserror::Error;

/// Failure to decode a code point sequence
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodepointError {
    #[error("empty code point segment in {0:?}")]
    EmptySegment(String),
    #[error("invalid hex segment {segment:?} in {input:?}")]
    InvalidHex { input: String, segment: String },
    #[error("code point {0:#X} is outside the Unicode range")]
    OutOfRange(u32),
    #[error("unpaired surrogate in {0:?}")]
    UnpairedSurrogate(String),
}

/// Parse a hyphen-delimited hex sequence into raw numeric values
///
/// Segments are case-insensitive. No range checking happens here.
pub fn parse_segments(unified: &str) -> Result<Vec<u32>, CodepointError> {
    unified
        .split('-')
        .map(|segment| {
            if segment.is_empty() {
                return Err(CodepointError::EmptySegment(unified.to_string()));
            }
            let invalid = || CodepointError::InvalidHex {
                input: unified.to_string(),
                segment: segment.to_string(),
            };
            // from_str_radix accepts a leading sign
            if !segment.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            u32::from_str_radix(segment, 16).map_err(|_| invalid())
        })
        .collect()
}

/// Decode a hyphen-delimited hex sequence into a string
///
/// Values above the BMP are taken as scalar values. Values in the
/// surrogate range are treated as UTF-16 code units and must pair up,
/// so `"D83D-DE00"` and `"1F600"` decode to the same string.
pub fn decode(unified: &str) -> Result<String, CodepointError> {
    let mut units: Vec<u16> = Vec::new();
    for value in parse_segments(unified)? {
        match u16::try_from(value) {
            Ok(unit) => units.push(unit),
            Err(_) => {
                let c = char::from_u32(value).ok_or(CodepointError::OutOfRange(value))?;
                let mut buf = [0u16; 2];
                units.extend_from_slice(c.encode_utf16(&mut buf));
            }
        }
    }

    char::decode_utf16(units.iter().copied())
        .collect::<Result<String, _>>()
        .map_err(|_| CodepointError::UnpairedSurrogate(unified.to_string()))
}
