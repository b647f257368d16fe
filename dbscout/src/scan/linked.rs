//! Compile-time scan backend fed by `inventory` submissions.
//!
//! `#[derive(TableMapped)]` submits a [`MappedType`] for the deriving
//! struct, and `embed_resource!` submits an [`EmbeddedResource`]; the
//! [`LinkedScanner`] then discovers both from the running program image
//! without touching the filesystem.

use std::collections::HashSet;

use regex::Regex;

use super::{ResourceScanner, under_roots};
use crate::errors::ScanError;
use crate::types::{ResourceRecord, TypeDescriptor};

/// Registration record for one table-mapped type.
///
/// Submitted to the inventory by the `TableMapped` derive; not usually
/// constructed by hand.
#[derive(Debug)]
pub struct MappedType {
    type_name: &'static str,
    module_path: &'static str,
    table_name: &'static str,
}

impl MappedType {
    pub const fn new(
        type_name: &'static str,
        module_path: &'static str,
        table_name: &'static str,
    ) -> Self {
        Self {
            type_name,
            module_path,
            table_name,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn module_path(&self) -> &'static str {
        self.module_path
    }

    pub fn table_name(&self) -> &'static str {
        self.table_name
    }

    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.module_path, self.type_name)
    }

    pub fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::new(self.type_name, self.module_path, self.table_name)
    }
}

inventory::collect!(MappedType);

/// A byte resource compiled into the program image, usually via
/// `embed_resource!`.
#[derive(Debug)]
pub struct EmbeddedResource {
    path: &'static str,
    bytes: &'static [u8],
}

impl EmbeddedResource {
    pub const fn new(path: &'static str, bytes: &'static [u8]) -> Self {
        Self { path, bytes }
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    pub fn bytes(&self) -> &'static [u8] {
        self.bytes
    }
}

inventory::collect!(EmbeddedResource);

/// All table mappings linked into the current image.
pub fn registered_mappings() -> impl Iterator<Item = &'static MappedType> {
    inventory::iter::<MappedType>()
}

/// Look a linked mapping up by fully qualified name.
pub fn mapping_by_name(qualified: &str) -> Option<&'static MappedType> {
    registered_mappings().find(|mapping| mapping.qualified_name() == qualified)
}

/// Scan backend over the linked program image.
///
/// The medium is the binary itself, so resource discovery cannot fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkedScanner;

impl LinkedScanner {
    pub fn new() -> Self {
        Self
    }
}

impl ResourceScanner for LinkedScanner {
    fn discover_marked_types(&self, roots: &[String]) -> Vec<TypeDescriptor> {
        let mut seen = HashSet::new();
        registered_mappings()
            .filter(|mapping| under_roots(mapping.module_path(), roots))
            .filter(|mapping| seen.insert(mapping.qualified_name()))
            .map(MappedType::descriptor)
            .collect()
    }

    fn discover_resources(
        &self,
        pattern: &Regex,
        sink: &mut dyn FnMut(ResourceRecord),
    ) -> Result<(), ScanError> {
        for resource in inventory::iter::<EmbeddedResource>() {
            if pattern.is_match(resource.path()) {
                sink(ResourceRecord::new(resource.path(), resource.bytes()));
            }
        }
        Ok(())
    }
}
