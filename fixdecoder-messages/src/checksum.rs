//! FIX checksum calculation.
//!
//! The checksum is the sum of all bytes preceding the `10=` field, modulo
//! 256, written as three zero-padded digits.

use memchr::memmem;

/// Checksum trailer, with the separator that precedes it.
const CHECKSUM_FIELD: &[u8] = b"\x0110=";

/// Sum of all bytes modulo 256.
#[inline]
#[must_use]
pub fn checksum(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |sum, &b| sum.wrapping_add(b))
}

/// Formats a checksum as a 3-digit zero-padded string (e.g. "042").
pub fn format_checksum(checksum: u8) -> String {
    format!("{checksum:03}")
}

/// Computes the checksum `msg` should carry.
///
/// Covers every byte up to and including the separator in front of the last
/// `10=` field. A message without such a separator has an empty prefix.
pub fn expected_checksum(msg: &str) -> String {
    let bytes = msg.as_bytes();
    let prefix = match memmem::rfind(bytes, CHECKSUM_FIELD) {
        Some(pos) => &bytes[..=pos],
        None => &[][..],
    };
    format_checksum(checksum(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum_wraps() {
        assert_eq!(checksum(b""), 0);
        assert_eq!(checksum(&[200, 100]), 44);
        assert_eq!(checksum(&[255; 4]), 252);
    }

    #[test]
    fn formatting() {
        assert_eq!(format_checksum(0), "000");
        assert_eq!(format_checksum(45), "045");
        assert_eq!(format_checksum(255), "255");
    }

    #[test]
    fn known_message() {
        let msg = "8=FIX.4.2\x019=5\x0135=0\x0110=161\x01";
        assert_eq!(expected_checksum(msg), "161");
    }

    #[test]
    fn prefix_includes_separator() {
        // "A" + SOH
        assert_eq!(expected_checksum("A\x0110=066\x01"), "066");
    }

    #[test]
    fn last_checksum_field_counts() {
        let msg = "35=0\x0110=000\x0110=123\x01";
        let prefix = "35=0\x0110=000\x01";
        assert_eq!(expected_checksum(msg), format_checksum(checksum(prefix.as_bytes())));
    }

    #[test]
    fn leading_checksum_field() {
        assert_eq!(expected_checksum("10=000\x01"), "000");
        assert_eq!(expected_checksum("35=0\x01"), "000");
    }
}
