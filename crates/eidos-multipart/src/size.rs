//! Shorthand byte sizes (`512`, `64K`, `2M`, `1G`).

use crate::ByteSizeError;

/// Default upload ceiling for a single file part (2 MiB).
pub const DEFAULT_UPLOAD_MAX_FILESIZE: u64 = 2 * 1024 * 1024;

/// Parses an integer with an optional `K`, `M` or `G` suffix into bytes.
///
/// Suffixes are case-insensitive and use powers of 1024, the convention of
/// the `upload_max_filesize` setting this value usually comes from.
///
/// # Example
///
/// ```rust
/// use eidos_multipart::parse_byte_size;
///
/// assert_eq!(parse_byte_size("2M").unwrap(), 2 * 1024 * 1024);
/// assert_eq!(parse_byte_size("512").unwrap(), 512);
/// assert!(parse_byte_size("2MB").is_err());
/// ```
pub fn parse_byte_size(value: &str) -> Result<u64, ByteSizeError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ByteSizeError::Empty);
    }

    let (digits, multiplier) = match trimmed.as_bytes()[trimmed.len() - 1] {
        b'k' | b'K' => (&trimmed[..trimmed.len() - 1], 1024_u64),
        b'm' | b'M' => (&trimmed[..trimmed.len() - 1], 1024 * 1024),
        b'g' | b'G' => (&trimmed[..trimmed.len() - 1], 1024 * 1024 * 1024),
        _ => (trimmed, 1),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ByteSizeError::Invalid(value.to_string()));
    }

    digits
        .parse::<u64>()
        .ok()
        .and_then(|n| n.checked_mul(multiplier))
        .ok_or_else(|| ByteSizeError::Overflow(value.to_string()))
}
