//! Checking of decoded messages against a [`FlatDictionary`].
//!
//! Validation never fails: every problem is reported as a [`Finding`] and a
//! clean message yields an empty list. Findings are ordered by check, not by
//! position in the message:
//!
//! 1. message type resolution (stops validation when it fails)
//! 2. missing required tags, in declaration order
//! 3. enum and type violations, in message order
//! 4. ordering violations
//! 5. checksum

use std::{collections::HashMap, fmt};

use fixdecoder_dictionary::{FlatDictionary, MSG_TYPE_TAG, MessageDef};

use crate::{
    checksum::expected_checksum,
    parser::{ParsedField, parse_fields},
    types::is_valid_value,
};


pub const CHECKSUM_TAG: u32 = 10;

/// A single validation violation.
///
/// The [`Display`](fmt::Display) output is the stable, user-facing text of
/// the finding.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Finding {
    MissingTag { tag: u32, name: String },
    UnknownMsgType(String),
    InvalidEnum { tag: u32, value: String },
    InvalidType { tag: u32, expected: String, value: String },
    OutOfOrder { tag: u32 },
    MissingChecksum,
    ChecksumMismatch { got: String, expected: String },
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::MissingTag { tag, name } => write!(f, "Missing required tag {tag} ({name})"),
            Finding::UnknownMsgType(value) => write!(f, "unknown message type: {value}"),
            Finding::InvalidEnum { tag, value } => {
                write!(f, "Invalid enum value '{value}' for tag {tag}")
            }
            Finding::InvalidType {
                tag,
                expected,
                value,
            } => write!(f, "Invalid type for tag {tag}: expected {expected}, got '{value}'"),
            Finding::OutOfOrder { tag } => write!(f, "Tag {tag} out of order"),
            Finding::MissingChecksum => {
                write!(f, "Missing required checksum tag {CHECKSUM_TAG}")
            }
            Finding::ChecksumMismatch { got, expected } => {
                write!(f, "Checksum mismatch: got {got}, expected {expected}")
            }
        }
    }
}

/// Validates a SOH-delimited message.
pub fn validate(msg: &str, dictionary: &FlatDictionary) -> Vec<Finding> {
    let fields = parse_fields(msg);

    let mut values: HashMap<u32, &str> = HashMap::with_capacity(fields.len());
    for field in &fields {
        values.insert(field.tag, field.value);
    }

    let message = match resolve_message(&values, dictionary) {
        Ok(message) => message,
        Err(finding) => return vec![finding],
    };

    let mut findings = Vec::new();
    check_required(message, &values, dictionary, &mut findings);
    check_values(&fields, dictionary, &mut findings);
    check_order(&fields, message, &mut findings);
    check_checksum(msg, &values, &mut findings);
    findings
}

fn resolve_message<'d>(
    values: &HashMap<u32, &str>,
    dictionary: &'d FlatDictionary,
) -> Result<&'d MessageDef, Finding> {
    let Some(msg_type) = values.get(&MSG_TYPE_TAG) else {
        return Err(Finding::MissingTag {
            tag: MSG_TYPE_TAG,
            name: "MsgType".to_owned(),
        });
    };
    dictionary
        .message(msg_type)
        .ok_or_else(|| Finding::UnknownMsgType((*msg_type).to_owned()))
}

fn check_required(
    message: &MessageDef,
    values: &HashMap<u32, &str>,
    dictionary: &FlatDictionary,
    findings: &mut Vec<Finding>,
) {
    for &tag in &message.required {
        if !values.contains_key(&tag) {
            findings.push(Finding::MissingTag {
                tag,
                name: dictionary.field_name(tag).into_owned(),
            });
        }
    }
}

fn is_known_code(codes: &HashMap<String, String>, value: &str, multiple: bool) -> bool {
    if multiple {
        let mut tokens = value.split(' ').filter(|token| !token.is_empty()).peekable();
        tokens.peek().is_some() && tokens.all(|token| codes.contains_key(token))
    } else {
        codes.contains_key(value)
    }
}

fn check_values(fields: &[ParsedField<'_>], dictionary: &FlatDictionary, findings: &mut Vec<Finding>) {
    for field in fields {
        let field_type = dictionary.field_type(field.tag);

        if let Some(codes) = dictionary.enum_values(field.tag) {
            let multiple = field_type.is_some_and(|t| t.is_multiple_value());
            if !is_known_code(codes, field.value, multiple) {
                findings.push(Finding::InvalidEnum {
                    tag: field.tag,
                    value: field.value.to_owned(),
                });
            }
        }

        if let Some(field_type) = field_type {
            if !is_valid_value(field_type, field.value) {
                findings.push(Finding::InvalidType {
                    tag: field.tag,
                    expected: dictionary
                        .type_name(field.tag)
                        .map_or_else(|| field_type.to_string(), str::to_owned),
                    value: field.value.to_owned(),
                });
            }
        }
    }
}

/// Reports every field whose declared position is lower than the highest
/// position seen before it. Tags outside the message layout are ignored.
fn check_order(fields: &[ParsedField<'_>], message: &MessageDef, findings: &mut Vec<Finding>) {
    let positions: HashMap<u32, usize> = message
        .field_order
        .iter()
        .enumerate()
        .map(|(position, &tag)| (tag, position))
        .collect();

    let mut highest: Option<usize> = None;
    for field in fields {
        let Some(&position) = positions.get(&field.tag) else {
            continue;
        };
        match highest {
            Some(max) if position < max => findings.push(Finding::OutOfOrder { tag: field.tag }),
            _ => highest = Some(position),
        }
    }
}

fn check_checksum(msg: &str, values: &HashMap<u32, &str>, findings: &mut Vec<Finding>) {
    let Some(&got) = values.get(&CHECKSUM_TAG) else {
        findings.push(Finding::MissingChecksum);
        return;
    };
    let expected = expected_checksum(msg);
    if got != expected {
        findings.push(Finding::ChecksumMismatch {
            got: got.to_owned(),
            expected,
        });
    }
}
