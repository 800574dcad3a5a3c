//! Replacement of sensitive tag values with stable aliases.
//!
//! An alias is the tag name followed by a per-tag counter, so the first
//! distinct `SenderCompID` becomes `SenderCompID0001`, the second
//! `SenderCompID0002`, and every later occurrence of a value reuses the alias
//! it was given first.

use std::{borrow::Cow, collections::HashMap};

use fixdecoder_messages::SOH;
use parking_lot::Mutex;
use tracing::debug;

/// Tags whose values identify parties, accounts or credentials.
pub const SENSITIVE_TAGS: &[(u32, &str)] = &[
    (1, "Account"),
    (49, "SenderCompID"),
    (50, "SenderSubID"),
    (56, "TargetCompID"),
    (57, "TargetSubID"),
    (79, "AllocAccount"),
    (109, "ClientID"),
    (115, "OnBehalfOfCompID"),
    (116, "OnBehalfOfSubID"),
    (128, "DeliverToCompID"),
    (129, "DeliverToSubID"),
    (142, "SenderLocationID"),
    (143, "TargetLocationID"),
    (144, "OnBehalfOfLocationID"),
    (145, "DeliverToLocationID"),
    (448, "PartyID"),
    (523, "PartySubID"),
    (553, "Username"),
    (554, "Password"),
    (925, "NewPassword"),
];

#[derive(Debug, Default)]
struct Aliases {
    by_value: HashMap<(u32, String), String>,
    counters: HashMap<u32, u32>,
}

#[derive(Debug)]
pub struct Obfuscator {
    tags: HashMap<u32, String>,
    aliases: Mutex<Aliases>,
}

impl Default for Obfuscator {
    fn default() -> Obfuscator {
        Obfuscator::new()
    }
}

impl Obfuscator {
    pub fn new() -> Obfuscator {
        Obfuscator::with_tags(SENSITIVE_TAGS.iter().copied())
    }

    pub fn with_tags<'a>(tags: impl IntoIterator<Item = (u32, &'a str)>) -> Obfuscator {
        Obfuscator {
            tags: tags
                .into_iter()
                .map(|(tag, name)| (tag, name.to_owned()))
                .collect(),
            aliases: Mutex::new(Aliases::default()),
        }
    }

    /// Rewrites every `tag=value` segment of a SOH-delimited line whose tag is
    /// sensitive. Anything that is not a `tag=value` pair is kept verbatim.
    pub fn obfuscate_line(&self, line: &str) -> String {
        let separator = char::from(SOH);
        let mut result = String::with_capacity(line.len());
        for (i, segment) in line.split(separator).enumerate() {
            if i > 0 {
                result.push(separator);
            }
            result.push_str(&self.obfuscate_field(segment));
        }
        result
    }

    fn obfuscate_field<'a>(&self, segment: &'a str) -> Cow<'a, str> {
        let Some((tag, value)) = segment.split_once('=') else {
            return Cow::Borrowed(segment);
        };
        let Ok(number) = tag.parse::<u32>() else {
            return Cow::Borrowed(segment);
        };
        match self.tags.get(&number) {
            Some(name) => Cow::Owned(format!("{tag}={}", self.alias(number, name, value))),
            None => Cow::Borrowed(segment),
        }
    }

    fn alias(&self, tag: u32, name: &str, value: &str) -> String {
        let key = (tag, value.to_owned());
        let mut aliases = self.aliases.lock();
        if let Some(alias) = aliases.by_value.get(&key) {
            return alias.clone();
        }

        let counter = {
            let counter = aliases.counters.entry(tag).or_default();
            *counter += 1;
            *counter
        };
        let alias = format!("{name}{counter:04}");
        debug!(tag, name, %alias, "first use of sensitive value");
        aliases.by_value.insert(key, alias.clone());
        alias
    }
}
