//! Splitting of tag=value messages into fields.

use std::{iter, str};

use memchr::{memchr, memchr_iter};

/// Standard FIX field separator.
pub const SOH: u8 = 0x01;

/// One `tag=value` element of a message, in arrival order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ParsedField<'a> {
    pub tag: u32,
    pub value: &'a str,
}

/// Splits a SOH-delimited message into fields.
///
/// See [`parse_fields_with`].
pub fn parse_fields(msg: &str) -> Vec<ParsedField<'_>> {
    parse_fields_with(msg, SOH)
}

/// Splits a message delimited by `separator` into fields.
///
/// Input without a single separator is not message shaped and yields no
/// fields. Otherwise empty segments, segments without `=` and segments whose
/// tag is not a non-negative integer are skipped. The value is everything
/// after the first `=`. Repeated tags are all kept, in order.
pub fn parse_fields_with(msg: &str, separator: u8) -> Vec<ParsedField<'_>> {
    let bytes = msg.as_bytes();
    if memchr(separator, bytes).is_none() {
        return Vec::new();
    }

    let mut fields = Vec::new();
    let mut start = 0;
    for end in memchr_iter(separator, bytes).chain(iter::once(bytes.len())) {
        let segment = &bytes[start..end];
        start = end + 1;
        if let Some(field) = parse_segment(segment) {
            fields.push(field);
        }
    }
    fields
}

fn parse_segment(segment: &[u8]) -> Option<ParsedField<'_>> {
    let eq = memchr(b'=', segment)?;
    let tag = str::from_utf8(&segment[..eq]).ok()?.parse().ok()?;
    let value = str::from_utf8(&segment[eq + 1..]).ok()?;
    Some(ParsedField { tag, value })
}

/// Returns the value of the first occurrence of `tag`.
pub fn tag_value(msg: &str, tag: u32) -> Option<&str> {
    parse_fields(msg)
        .into_iter()
        .find(|field| field.tag == tag)
        .map(|field| field.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(tag: u32, value: &str) -> ParsedField<'_> {
        ParsedField { tag, value }
    }

    #[test]
    fn parse_logon() {
        let fields = parse_fields("8=FIX.4.4\x019=12\x0135=A\x0110=099\x01");
        assert_eq!(
            fields,
            [
                field(8, "FIX.4.4"),
                field(9, "12"),
                field(35, "A"),
                field(10, "099")
            ]
        );
    }

    #[test]
    fn no_separator_means_no_fields() {
        assert!(parse_fields("8=FIX.4.49=11235=A").is_empty());
        assert!(parse_fields("").is_empty());
        assert!(parse_fields("35=A").is_empty());
    }

    #[test]
    fn separator_only() {
        assert!(parse_fields("\x01").is_empty());
        assert!(parse_fields("\x01\x01\x01").is_empty());
    }

    #[test]
    fn last_segment_without_separator_is_kept() {
        assert_eq!(parse_fields("35=A\x0110=099"), [field(35, "A"), field(10, "099")]);
    }

    #[test]
    fn malformed_segments_are_skipped() {
        let fields = parse_fields("35=A\x01\x01garbage\x01abc=1\x01-5=2\x01=3\x0158=a=b\x0155=\x01");
        assert_eq!(fields, [field(35, "A"), field(58, "a=b"), field(55, "")]);
    }

    #[test]
    fn duplicates_are_kept_in_order() {
        let fields = parse_fields("448=A\x01448=B\x01");
        assert_eq!(fields, [field(448, "A"), field(448, "B")]);
    }

    #[test]
    fn custom_separator() {
        let fields = parse_fields_with("8=FIX.4.2|35=0|10=000|", b'|');
        assert_eq!(fields, [field(8, "FIX.4.2"), field(35, "0"), field(10, "000")]);
        assert!(parse_fields_with("8=FIX.4.2\x0135=0\x01", b'|').is_empty());
    }

    #[test]
    fn first_value_of_tag() {
        let msg = "8=FIX.4.4\x0135=D\x01448=A\x01448=B\x01";
        assert_eq!(tag_value(msg, 448), Some("A"));
        assert_eq!(tag_value(msg, 35), Some("D"));
        assert_eq!(tag_value(msg, 55), None);
    }
}
