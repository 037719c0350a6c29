//! Field normalization for vpncmd report values
//!
//! vpncmd prints counters in a locale format ("4,734,874 bytes"), timestamps
//! with an embedded weekday ("2017-04-19 (Wed) 02:05:16") and failure
//! messages with an embedded numeric code ("exit status 58"). These helpers
//! convert each into its machine form. All are pure functions; the shared
//! digit matcher is immutable configuration.

use crate::error::{AdminError, Result};
use regex::Regex;

lazy_static::lazy_static! {
    static ref FIND_INTEGERS: Regex = Regex::new("[0-9]+").expect("digit pattern is valid");
}

/// Parse a formatted count like `"4,734,874 bytes"` into `4734874`.
///
/// Every non-digit character is stripped and the remaining digits parsed as
/// base 10. A value with no digits at all is a typed error; endpoint mappers
/// degrade it (and absent fields) to zero rather than failing the call.
pub fn parse_byte_count(value: &str) -> Result<u64> {
    let digits: String = FIND_INTEGERS
        .find_iter(value)
        .map(|m| m.as_str())
        .collect();
    if digits.is_empty() {
        return Err(AdminError::ByteCount(value.to_string()));
    }
    digits
        .parse::<u64>()
        .map_err(|_| AdminError::ByteCount(value.to_string()))
}

/// Canonical timestamp length: `YYYY-MM-DD HH:MM:SS`
const CANONICAL_LEN: usize = 19;
/// Offset of the time portion in the tool's weekday format
const TIME_OFFSET: usize = 17;

/// Rewrite `"2017-04-19 (Wed) 02:05:16"` into `"2017-04-19 02:05:16"`.
///
/// The fixed-width weekday shape is validated before slicing: byte 11 must
/// open the parenthesized weekday, byte 15 close it, byte 16 separate it from
/// the time. Values already in canonical form pass through unchanged, as do
/// short absent-sentinels such as `"(None)"` or `"-"`. Anything else of
/// weekday length that fails the shape check is a typed error, never an
/// out-of-range fault.
pub fn normalize_timestamp(value: &str) -> Result<String> {
    let bytes = value.as_bytes();

    if has_weekday_shape(bytes) {
        return Ok(format!("{}{}", &value[..11], &value[TIME_OFFSET..]));
    }

    // Already canonical: normalization is a no-op.
    if is_canonical(bytes) {
        return Ok(value.to_string());
    }

    // Absent sentinels ("(None)", "none", "-") are shorter than the time
    // offset and must pass through unchanged rather than be sliced.
    if bytes.len() < TIME_OFFSET {
        return Ok(value.to_string());
    }

    Err(AdminError::Timestamp(value.to_string()))
}

fn has_weekday_shape(bytes: &[u8]) -> bool {
    bytes.len() > TIME_OFFSET
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes[10] == b' '
        && bytes[11] == b'('
        && bytes[15] == b')'
        && bytes[16] == b' '
}

fn is_canonical(bytes: &[u8]) -> bool {
    bytes.len() == CANONICAL_LEN
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes[10] == b' '
        && bytes[13] == b':'
        && bytes[16] == b':'
}

/// Extract the first maximal run of decimal digits from a failure message.
///
/// vpncmd failures surface as messages like `"exit status 58"`; the embedded
/// number is the tool's error code. Returns `None` when the message carries
/// no digits, which callers surface as a distinct unknown-failure outcome.
pub fn extract_error_code(message: &str) -> Option<u64> {
    FIND_INTEGERS
        .find(message)
        .and_then(|m| m.as_str().parse::<u64>().ok())
}
