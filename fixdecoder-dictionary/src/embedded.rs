//! Dictionaries compiled into the binary.

use std::borrow::Cow;

use tracing::debug;

use crate::{Version, cache::DictionarySource};

const FIX40: &str = include_str!("../resources/FIX40.xml");
const FIX41: &str = include_str!("../resources/FIX41.xml");
const FIX42: &str = include_str!("../resources/FIX42.xml");
const FIX43: &str = include_str!("../resources/FIX43.xml");
const FIX44: &str = include_str!("../resources/FIX44.xml");
const FIX50: &str = include_str!("../resources/FIX50.xml");
const FIX50SP1: &str = include_str!("../resources/FIX50SP1.xml");
const FIX50SP2: &str = include_str!("../resources/FIX50SP2.xml");
const FIXT11: &str = include_str!("../resources/FIXT11.xml");

/// Short version ids accepted on the command line, in display order.
#[rustfmt::skip]
pub const VERSION_IDS: [(&str, Version); 9] = [
    ("40",    Version::FIX40),
    ("41",    Version::FIX41),
    ("42",    Version::FIX42),
    ("43",    Version::FIX43),
    ("44",    Version::FIX44),
    ("50",    Version::FIX50),
    ("50SP1", Version::FIX50SP1),
    ("50SP2", Version::FIX50SP2),
    ("T11",   Version::FIXT11),
];

/// Returns the embedded XML for `version`.
///
/// FIX 2.7 and 3.0 are served by the FIX 4.0 dictionary, their closest
/// superset.
pub fn embedded_xml(version: Version) -> Option<&'static str> {
    match version {
        Version::FIX27 | Version::FIX30 | Version::FIX40 => Some(FIX40),
        Version::FIX41 => Some(FIX41),
        Version::FIX42 => Some(FIX42),
        Version::FIX43 => Some(FIX43),
        Version::FIX44 => Some(FIX44),
        Version::FIX50 => Some(FIX50),
        Version::FIX50SP1 => Some(FIX50SP1),
        Version::FIX50SP2 => Some(FIX50SP2),
        Version::FIXT11 => Some(FIXT11),
        _ => None,
    }
}

/// Maps a short version id (`44`, `50SP2`, `T11`, ...) onto a version.
/// Unknown ids select [`Version::DEFAULT`].
pub fn version_for_id(id: &str) -> Version {
    VERSION_IDS
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(id))
        .map(|(_, version)| *version)
        .unwrap_or_else(|| {
            debug!(id, "unknown version id, using {}", Version::DEFAULT);
            Version::DEFAULT
        })
}

/// Comma separated list of the accepted short version ids.
pub fn supported_versions() -> String {
    VERSION_IDS
        .iter()
        .map(|(id, _)| *id)
        .collect::<Vec<_>>()
        .join(",")
}

/// [`DictionarySource`] serving the embedded dictionaries.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmbeddedDictionaries;

impl DictionarySource for EmbeddedDictionaries {
    fn xml(&self, version: Version) -> Option<Cow<'static, str>> {
        embedded_xml(version).map(Cow::Borrowed)
    }
}
