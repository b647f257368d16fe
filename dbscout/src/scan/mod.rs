//! Discovery across a configured scan scope.
//!
//! Two capabilities behind one seam: finding types that carry the table
//! mapping marker, and finding byte resources whose relative path matches a
//! pattern. [`LinkedScanner`] serves both from the compiled program image;
//! [`DirScanner`] walks directories and archives on disk.

mod linked;
mod walker;

pub use linked::{
    EmbeddedResource, LinkedScanner, MappedType, mapping_by_name, registered_mappings,
};
pub use walker::DirScanner;

use regex::Regex;

use crate::errors::ScanError;
use crate::types::{ResourceRecord, TypeDescriptor};

/// Read-only discovery over a scan medium.
pub trait ResourceScanner {
    /// Every marker-carrying type whose module path falls under one of
    /// `roots`. An empty root set matches nothing. Never fails: a medium
    /// failure is logged and reported as nothing found. Yield order carries
    /// no meaning.
    fn discover_marked_types(&self, roots: &[String]) -> Vec<TypeDescriptor>;

    /// Feed every resource whose relative path matches `pattern` to `sink`.
    ///
    /// Returns an error only when the medium itself stops being readable;
    /// records already handed to `sink` stand, and the caller decides what
    /// to do with them.
    fn discover_resources(
        &self,
        pattern: &Regex,
        sink: &mut dyn FnMut(ResourceRecord),
    ) -> Result<(), ScanError>;
}

/// Root filter shared by the backends: a module path lies under a root when
/// it equals the root or extends it at a `::` boundary.
pub(crate) fn under_roots(module_path: &str, roots: &[String]) -> bool {
    roots.iter().any(|root| {
        module_path == root.as_str()
            || (module_path.starts_with(root.as_str())
                && module_path[root.len()..].starts_with("::"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_matches_itself_and_descendants() {
        let roots = vec!["app::models".to_string()];
        assert!(under_roots("app::models", &roots));
        assert!(under_roots("app::models::billing", &roots));
        assert!(!under_roots("app::modelsextra", &roots));
        assert!(!under_roots("app", &roots));
        assert!(!under_roots("other::models", &roots));
    }

    #[test]
    fn empty_roots_match_nothing() {
        assert!(!under_roots("app::models", &[]));
    }
}
