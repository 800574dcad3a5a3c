//! Syntax rules for field values, one per [`FieldType`].

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use fixdecoder_dictionary::FieldType;
use regex::Regex;

static MONTH_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{6}([0-9]{2}|(-[0-9]{1,2})|(-?w[1-5]))?$").expect("valid month-year regex")
});

/// Matches `value` against a layout where `9` stands for any ASCII digit and
/// every other byte must match literally.
fn has_layout(value: &str, layout: &str) -> bool {
    value.len() == layout.len()
        && value
            .bytes()
            .zip(layout.bytes())
            .all(|(v, l)| if l == b'9' { v.is_ascii_digit() } else { v == l })
}

fn is_timestamp(value: &str) -> bool {
    (has_layout(value, "99999999-99:99:99")
        && NaiveDateTime::parse_from_str(value, "%Y%m%d-%H:%M:%S").is_ok())
        || (has_layout(value, "99999999-99:99:99.999")
            && NaiveDateTime::parse_from_str(value, "%Y%m%d-%H:%M:%S%.3f").is_ok())
}

fn is_date(value: &str) -> bool {
    has_layout(value, "99999999") && NaiveDate::parse_from_str(value, "%Y%m%d").is_ok()
}

fn is_time(value: &str) -> bool {
    (has_layout(value, "99:99") && NaiveTime::parse_from_str(value, "%H:%M").is_ok())
        || (has_layout(value, "99:99:99") && NaiveTime::parse_from_str(value, "%H:%M:%S").is_ok())
        || (has_layout(value, "99:99:99.999")
            && NaiveTime::parse_from_str(value, "%H:%M:%S%.3f").is_ok())
}

/// Returns true if `value` is syntactically valid for `field_type`.
///
/// String-like kinds and kinds without a rule (including custom type names)
/// accept anything.
pub fn is_valid_value(field_type: &FieldType, value: &str) -> bool {
    match field_type {
        FieldType::Int
        | FieldType::Length
        | FieldType::NumInGroup
        | FieldType::SeqNum
        | FieldType::DayOfMonth => value.parse::<i64>().is_ok(),
        FieldType::Float
        | FieldType::Qty
        | FieldType::Price
        | FieldType::PriceOffset
        | FieldType::Amt
        | FieldType::Percentage => value.parse::<f64>().is_ok(),
        FieldType::Boolean => value == "Y" || value == "N",
        FieldType::Char => value.chars().count() == 1,
        FieldType::UtcTimestamp => is_timestamp(value),
        FieldType::UtcDateOnly => is_date(value),
        FieldType::UtcTimeOnly => is_time(value),
        FieldType::MonthYear => MONTH_YEAR.is_match(value),
        FieldType::String
        | FieldType::Data
        | FieldType::Currency
        | FieldType::Exchange
        | FieldType::Country
        | FieldType::Language
        | FieldType::LocalMktDate
        | FieldType::MultipleCharValue
        | FieldType::MultipleStringValue
        | FieldType::MultipleValueString
        | FieldType::TagNum
        | FieldType::TzTimeOnly
        | FieldType::TzTimestamp
        | FieldType::XmlData
        | FieldType::Other(_) => true,
    }
}
