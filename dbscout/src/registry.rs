//! Entity registry collaborator.
//!
//! The registry stores registered mappings and owns the uniqueness and
//! validation policy; the rest of this crate only talks to the
//! [`EntityRegistry`] trait. [`MemoryRegistry`] is the bundled default.

use std::collections::HashMap;

use crate::errors::RegistryError;
use crate::types::TypeDescriptor;

/// External collaborator consuming discovered mappings.
pub trait EntityRegistry {
    /// Register a full entity, keyed by its table name.
    fn register_entity(&mut self, descriptor: &TypeDescriptor) -> Result<(), RegistryError>;

    /// Register the bare type, keyed by its type name.
    fn register_type(&mut self, descriptor: &TypeDescriptor) -> Result<(), RegistryError>;

    /// Number of names currently registered.
    fn total_names(&self) -> usize;
}

/// What [`MemoryRegistry`] keeps per registered name.
#[derive(Debug, Clone)]
pub struct RegisteredMapping {
    pub type_name: String,
    pub module_path: String,
    pub table_name: String,
    /// Whether the registration carried full entity semantics.
    pub as_entity: bool,
}

/// Map-backed registry. Rejects empty names and name collisions.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    names: HashMap<String, RegisteredMapping>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mapping(&self, name: &str) -> Option<&RegisteredMapping> {
        self.names.get(name)
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    fn insert(
        &mut self,
        name: &str,
        descriptor: &TypeDescriptor,
        as_entity: bool,
    ) -> Result<(), RegistryError> {
        if name.is_empty() {
            return Err(RegistryError::Invalid {
                type_name: descriptor.type_name().to_string(),
                reason: "empty registration name".to_string(),
            });
        }
        if self.names.contains_key(name) {
            return Err(RegistryError::Duplicate {
                name: name.to_string(),
            });
        }
        self.names.insert(
            name.to_string(),
            RegisteredMapping {
                type_name: descriptor.type_name().to_string(),
                module_path: descriptor.module_path().to_string(),
                table_name: descriptor.table_name().to_string(),
                as_entity,
            },
        );
        Ok(())
    }
}

impl EntityRegistry for MemoryRegistry {
    fn register_entity(&mut self, descriptor: &TypeDescriptor) -> Result<(), RegistryError> {
        self.insert(descriptor.table_name(), descriptor, true)
    }

    fn register_type(&mut self, descriptor: &TypeDescriptor) -> Result<(), RegistryError> {
        self.insert(descriptor.type_name(), descriptor, false)
    }

    fn total_names(&self) -> usize {
        self.names.len()
    }
}
