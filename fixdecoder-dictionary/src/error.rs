use std::io;

/// Errors that can occur while loading dictionaries.
///
/// Only structural problems are errors. Dangling references between
/// dictionary elements are skipped while building, see
/// [`FlatDictionary`](crate::FlatDictionary) and
/// [`SchemaTree`](crate::SchemaTree).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input/output error while reading a dictionary file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// XML parsing error when reading a dictionary
    #[error("XML parsing error: {0}")]
    XmlParse(#[from] quick_xml::de::DeError),

    /// Dictionary structure is unusable
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Neither the requested nor the fallback dictionary is available
    #[error("No dictionary available for {0}")]
    Unavailable(String),
}

/// Errors related to dictionary structure.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// A component contains itself, directly or through nested
    /// components/groups.
    #[error("Circular reference found: {0}")]
    CircularReference(String),
}
