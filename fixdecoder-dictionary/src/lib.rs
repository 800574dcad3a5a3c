//! # fixdecoder-dictionary
//!
//! Loading and querying of FIX protocol dictionaries for log decoding.
//!
//! A QuickFIX-style XML dictionary is parsed once into a [`RawDictionary`]
//! and turned into two independent views:
//!
//! - [`FlatDictionary`], a set of lookup tables (tag names, types, enum
//!   descriptions, group membership, per-message field order and required
//!   tags) used while decoding and validating messages
//! - [`SchemaTree`], a fully expanded hierarchy of messages, components,
//!   groups and fields used for display
//!
//! [`DictionaryCache`] keeps both views per protocol [`Version`], building
//! them on first use from the embedded dictionaries (or any other
//! [`DictionarySource`]).
//!
//! ## Basic Usage
//!
//! ```rust
//! use fixdecoder_dictionary::{DictionaryCache, Version};
//!
//! let cache = DictionaryCache::new();
//! let dictionary = cache.resolve(Version::FIX44).expect("embedded dictionary");
//!
//! assert_eq!(dictionary.field_name(54), "Side");
//! assert_eq!(dictionary.enum_description(54, "1"), "BUY");
//! assert_eq!(dictionary.field_name(99999), "99999");
//! ```

mod cache;
mod embedded;
mod error;
mod lookup;
mod schema;
mod version;
mod xml;

pub use cache::{DictionaryCache, DictionarySource};
pub use embedded::{
    EmbeddedDictionaries, VERSION_IDS, embedded_xml, supported_versions, version_for_id,
};
pub use error::{Error, ValidationError};
pub use lookup::{FlatDictionary, GroupDef, MSG_TYPE_TAG, MessageDef};
pub use schema::{
    ComponentNode, EnumValue, FieldNode, FieldSpec, GroupNode, HEADER, Members, MessageNode,
    NO_SERVICE_PACK, SchemaNode, SchemaTree, TRAILER,
};
pub use version::{ParseVersionError, Version};
pub use xml::{
    Component, Envelope, Field, FieldType, FixType, Group, Member, MemberRef, Message,
    RawDictionary, Value, ValueList,
};
