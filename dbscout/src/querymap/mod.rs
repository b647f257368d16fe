//! Named SQL query templates merged from properties resources.
//!
//! A [`QueryStore`] asks its scanner for every resource matching a filename
//! pattern, decodes each by an extension-based encoding rule, parses it as a
//! properties document, and merges everything into one key/value namespace.
//! Reloads rebuild that namespace wholesale and publish it atomically.

pub mod props;

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ReloadError;
use crate::scan::ResourceScanner;
use crate::types::ResourceRecord;

/// Matches any path ending in `.sql.props`, `.sql.properties`, `.oom.props`
/// or `.oom.properties`, case-insensitively.
static DEFAULT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(sql|oom)\.prop(s|erties)$").unwrap());

/// Queryable namespace of named SQL templates, rebuilt from the scan scope
/// on every [`reload`](QueryStore::reload).
///
/// Construction performs the initial load, so every reachable store is
/// loaded. Readers racing a reload observe either the previous namespace or
/// the new one in full: the replacement map is built off to the side and
/// published with a single `Arc` swap.
pub struct QueryStore {
    scanner: Arc<dyn ResourceScanner + Send + Sync>,
    pattern: Regex,
    namespace: RwLock<Arc<HashMap<String, String>>>,
}

impl std::fmt::Debug for QueryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryStore")
            .field("pattern", &self.pattern)
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

impl QueryStore {
    /// Build a store with the default resource pattern and load it.
    pub fn load(scanner: Arc<dyn ResourceScanner + Send + Sync>) -> Result<Self, ReloadError> {
        Self::with_pattern(scanner, DEFAULT_PATTERN.clone())
    }

    /// Build a store matching `pattern` and load it.
    pub fn with_pattern(
        scanner: Arc<dyn ResourceScanner + Send + Sync>,
        pattern: Regex,
    ) -> Result<Self, ReloadError> {
        let store = Self {
            scanner,
            pattern,
            namespace: RwLock::new(Arc::new(HashMap::new())),
        };
        store.reload()?;
        Ok(store)
    }

    /// Rebuild the namespace from the scan scope.
    ///
    /// A medium failure mid-scan is logged and the records delivered before
    /// it are kept (best effort). A malformed resource aborts the whole
    /// rebuild and leaves the previous namespace in place.
    pub fn reload(&self) -> Result<(), ReloadError> {
        let mut records: Vec<ResourceRecord> = Vec::new();
        let scan = self
            .scanner
            .discover_resources(&self.pattern, &mut |record| records.push(record));
        if let Err(err) = scan {
            warn!(
                "resource scan incomplete, merging the {} records found so far: {err}",
                records.len()
            );
        }

        // Merge order is lexicographic by path; the stable sort lets the
        // scanner's yield order break exact-path ties.
        records.sort_by(|a, b| a.path.cmp(&b.path));

        let mut namespace = HashMap::new();
        for record in records {
            let ResourceRecord { path, bytes } = record;
            let text = decode(&path, bytes)?;
            let pairs = props::parse(&text)
                .map_err(|source| ReloadError::Malformed { path, source })?;
            for (key, value) in pairs {
                namespace.insert(key, value);
            }
        }

        *self.namespace.write().unwrap() = Arc::new(namespace);
        Ok(())
    }

    /// Query template registered under `key`, if any.
    ///
    /// `None` means the key is absent; a template defined with an empty
    /// body comes back as `Some("")`.
    pub fn get_query(&self, key: &str) -> Option<String> {
        self.namespace.read().unwrap().get(key).cloned()
    }

    /// Number of distinct keys in the current namespace.
    pub fn size(&self) -> usize {
        self.namespace.read().unwrap().len()
    }

    /// Handle to the current namespace as a whole.
    pub fn snapshot(&self) -> Arc<HashMap<String, String>> {
        Arc::clone(&self.namespace.read().unwrap())
    }
}

/// `.properties` resources are ISO-8859-1 by convention; everything else in
/// scope is UTF-8, strictly.
fn decode(path: &str, bytes: Vec<u8>) -> Result<String, ReloadError> {
    if has_properties_extension(path) {
        Ok(bytes.into_iter().map(char::from).collect())
    } else {
        String::from_utf8(bytes).map_err(|_| ReloadError::Encoding {
            path: path.to_string(),
        })
    }
}

fn has_properties_extension(path: &str) -> bool {
    match path.rsplit_once('.') {
        Some((_, extension)) => extension.eq_ignore_ascii_case("properties"),
        None => false,
    }
}
