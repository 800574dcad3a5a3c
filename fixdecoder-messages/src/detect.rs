//! Choosing the dictionary a message should be decoded with.

use std::sync::Arc;

use fixdecoder_dictionary::{DictionaryCache, Error, FlatDictionary, Version};
use tracing::debug;

use crate::parser::{ParsedField, parse_fields};

pub const BEGIN_STRING_TAG: u32 = 8;
pub const APPL_VER_ID_TAG: u32 = 1128;

const TRANSPORT_PREFIX: &str = "FIXT";

/// Picks the version from already parsed fields.
///
/// A transport (`FIXT.*`) begin string defers to `ApplVerID(1128)`, whose
/// codes map through [`Version::from_appl_ver_id`]. A missing begin string
/// selects [`Version::DEFAULT`]. A classic begin string that does not parse
/// as a version falls back to the default as well.
pub fn detect_version_in(fields: &[ParsedField<'_>]) -> Version {
    let value_of = |tag| {
        fields
            .iter()
            .find(|field| field.tag == tag)
            .map(|field| field.value)
    };

    let Some(begin_string) = value_of(BEGIN_STRING_TAG) else {
        return Version::DEFAULT;
    };

    if begin_string.starts_with(TRANSPORT_PREFIX) {
        return Version::from_appl_ver_id(value_of(APPL_VER_ID_TAG).unwrap_or_default());
    }

    let key = begin_string.replace('.', "");
    key.parse().unwrap_or_else(|err| {
        debug!(begin_string, "{err}, using {}", Version::DEFAULT);
        Version::DEFAULT
    })
}

/// Picks the version of a SOH-delimited message.
pub fn detect_version(msg: &str) -> Version {
    detect_version_in(&parse_fields(msg))
}

/// Returns the dictionary for `msg`, falling back to [`Version::DEFAULT`]
/// when there is none for the detected version.
pub fn dictionary_for_message(
    cache: &DictionaryCache,
    msg: &str,
) -> Result<Arc<FlatDictionary>, Error> {
    cache.resolve(detect_version(msg))
}
