//! # fixdecoder-messages
//!
//! Decoding-side operations on raw tag=value FIX messages: splitting a
//! message into fields, checksum calculation, picking the dictionary version
//! a message belongs to, and validating a message against a
//! [`FlatDictionary`](fixdecoder_dictionary::FlatDictionary).
//!
//! ```rust
//! use fixdecoder_dictionary::DictionaryCache;
//! use fixdecoder_messages::{dictionary_for_message, validate};
//!
//! let cache = DictionaryCache::new();
//! let msg = "8=FIX.4.4\x0135=0\x0110=000\x01";
//!
//! let dictionary = dictionary_for_message(&cache, msg).unwrap();
//! for finding in validate(msg, &dictionary) {
//!     println!("{finding}");
//! }
//! ```

mod checksum;
mod detect;
mod parser;
mod types;
mod validator;

pub use checksum::{checksum, expected_checksum, format_checksum};
pub use detect::{
    APPL_VER_ID_TAG, BEGIN_STRING_TAG, detect_version, detect_version_in, dictionary_for_message,
};
pub use parser::{ParsedField, SOH, parse_fields, parse_fields_with, tag_value};
pub use types::is_valid_value;
pub use validator::{CHECKSUM_TAG, Finding, validate};
