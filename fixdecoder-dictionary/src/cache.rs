//! Process-scoped, read-mostly store of built dictionaries.

use std::{borrow::Cow, collections::HashMap, sync::Arc};

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::{
    Error, FlatDictionary, SchemaTree, Version, embedded::EmbeddedDictionaries, xml::RawDictionary,
};

/// Supplies dictionary XML by version.
pub trait DictionarySource: Send + Sync {
    /// Returns the XML for `version`, or `None` if there is none.
    fn xml(&self, version: Version) -> Option<Cow<'static, str>>;
}

impl DictionarySource for HashMap<Version, String> {
    fn xml(&self, version: Version) -> Option<Cow<'static, str>> {
        self.get(&version).map(|xml| Cow::Owned(xml.clone()))
    }
}

impl DictionarySource for HashMap<Version, &'static str> {
    fn xml(&self, version: Version) -> Option<Cow<'static, str>> {
        self.get(&version).map(|xml| Cow::Borrowed(*xml))
    }
}

/// Version-keyed cache of [`FlatDictionary`] and [`SchemaTree`] instances.
///
/// Entries are built lazily on first use and kept for the lifetime of the
/// cache. Readers only take a shared lock. A miss parses outside of any
/// lock and takes the write lock just to publish the result; when two
/// threads race on the same miss, the first published instance wins and
/// both receive it.
///
/// Dictionaries of FIX 5.0 and later have the FIXT 1.1 dictionary merged in
/// before they are published.
pub struct DictionaryCache {
    source: Box<dyn DictionarySource>,
    lookups: RwLock<HashMap<Version, Arc<FlatDictionary>>>,
    schemas: RwLock<HashMap<Version, Arc<SchemaTree>>>,
}

impl Default for DictionaryCache {
    fn default() -> Self {
        DictionaryCache::new()
    }
}

impl DictionaryCache {
    /// Creates a cache backed by the embedded dictionaries.
    pub fn new() -> DictionaryCache {
        DictionaryCache::with_source(EmbeddedDictionaries)
    }

    pub fn with_source(source: impl DictionarySource + 'static) -> DictionaryCache {
        DictionaryCache {
            source: Box::new(source),
            lookups: RwLock::new(HashMap::new()),
            schemas: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the flat dictionary for `version`, building it on first use.
    ///
    /// `Ok(None)` means the source has no dictionary for this version.
    ///
    /// # Errors
    ///
    /// Propagates parse failures of the dictionary (or of the transport
    /// dictionary it depends on). Failures are not cached, so a later call
    /// parses again.
    pub fn get(&self, version: Version) -> Result<Option<Arc<FlatDictionary>>, Error> {
        if let Some(dictionary) = self.lookups.read().get(&version).cloned() {
            return Ok(Some(dictionary));
        }

        let Some(xml) = self.source.xml(version) else {
            debug!(%version, "no dictionary source");
            return Ok(None);
        };

        debug!(%version, "cache miss, building flat dictionary");
        let mut dictionary = FlatDictionary::load(&xml).inspect_err(|err| {
            warn!(%version, "failed to load dictionary: {err}");
        })?;
        if version.uses_transport_dictionary() {
            match self.get(Version::FIXT11)? {
                Some(transport) => {
                    debug!(%version, "merging transport dictionary");
                    dictionary.merge(&transport);
                }
                None => debug!(%version, "transport dictionary unavailable"),
            }
        }

        let mut lookups = self.lookups.write();
        Ok(Some(Arc::clone(
            lookups
                .entry(version)
                .or_insert_with(|| Arc::new(dictionary)),
        )))
    }

    /// Returns the flat dictionary for `version`, falling back to
    /// [`Version::DEFAULT`] when there is no source for `version`.
    ///
    /// # Errors
    ///
    /// Parse failures propagate. [`Error::Unavailable`] is returned when the
    /// fallback has no source either.
    pub fn resolve(&self, version: Version) -> Result<Arc<FlatDictionary>, Error> {
        if let Some(dictionary) = self.get(version)? {
            return Ok(dictionary);
        }
        debug!(%version, fallback = %Version::DEFAULT, "falling back to default dictionary");
        self.get(Version::DEFAULT)?
            .ok_or_else(|| Error::Unavailable(version.key()))
    }

    /// Returns the schema tree for `version`, building it on first use.
    pub fn schema(&self, version: Version) -> Result<Option<Arc<SchemaTree>>, Error> {
        if let Some(schema) = self.schemas.read().get(&version).cloned() {
            return Ok(Some(schema));
        }

        let Some(xml) = self.source.xml(version) else {
            debug!(%version, "no dictionary source");
            return Ok(None);
        };

        debug!(%version, "cache miss, building schema tree");
        let schema = SchemaTree::build(&RawDictionary::parse(&xml)?)?;

        let mut schemas = self.schemas.write();
        Ok(Some(Arc::clone(
            schemas.entry(version).or_insert_with(|| Arc::new(schema)),
        )))
    }

    /// Like [`schema`](DictionaryCache::schema) with the fallback of
    /// [`resolve`](DictionaryCache::resolve).
    pub fn resolve_schema(&self, version: Version) -> Result<Arc<SchemaTree>, Error> {
        if let Some(schema) = self.schema(version)? {
            return Ok(schema);
        }
        debug!(%version, fallback = %Version::DEFAULT, "falling back to default schema");
        self.schema(Version::DEFAULT)?
            .ok_or_else(|| Error::Unavailable(version.key()))
    }

    /// Returns true if a flat dictionary for `version` has been built.
    pub fn is_cached(&self, version: Version) -> bool {
        self.lookups.read().contains_key(&version)
    }

    /// Drops every cached entry.
    pub fn clear(&self) {
        self.lookups.write().clear();
        self.schemas.write().clear();
    }
}
