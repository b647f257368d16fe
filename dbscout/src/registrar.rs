//! Registration pass feeding discovered mappings into an entity registry.

use std::time::Instant;

use log::info;

use crate::errors::RegistryError;
use crate::registry::EntityRegistry;
use crate::scan::ResourceScanner;
use crate::types::TypeDescriptor;

/// Feeds discovered table mappings to an [`EntityRegistry`], either as full
/// entities or as bare types.
///
/// # Example
/// ```ignore
/// let applied = EntityRegistrar::new(true)
///     .roots(["app::models"])
///     .configure(&LinkedScanner::new(), &mut registry)?;
/// ```
pub struct EntityRegistrar {
    register_as_entities: bool,
    roots: Vec<String>,
}

impl EntityRegistrar {
    /// `register_as_entities` selects `register_entity` over `register_type`
    /// for every discovered mapping.
    pub fn new(register_as_entities: bool) -> Self {
        Self {
            register_as_entities,
            roots: Vec::new(),
        }
    }

    /// Restrict discovery to the given module-path roots.
    pub fn roots(mut self, roots: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.roots = roots.into_iter().map(Into::into).collect();
        self
    }

    /// Forward `descriptors` to `registry` in order.
    ///
    /// Fail-fast: the first rejection propagates and aborts the rest of the
    /// pass; registrations already made stand. On success, logs one summary
    /// line with the elapsed time and the registry's total name count.
    pub fn apply<R>(
        &self,
        descriptors: &[TypeDescriptor],
        registry: &mut R,
    ) -> Result<usize, RegistryError>
    where
        R: EntityRegistry + ?Sized,
    {
        let started = Instant::now();
        let applied = self.register_all(descriptors, registry)?;
        self.log_summary(applied, started, registry);
        Ok(applied)
    }

    /// Discover marked types under the configured roots and apply them.
    ///
    /// The logged elapsed time covers the whole pass, scan included.
    pub fn configure<R>(
        &self,
        scanner: &dyn ResourceScanner,
        registry: &mut R,
    ) -> Result<usize, RegistryError>
    where
        R: EntityRegistry + ?Sized,
    {
        let started = Instant::now();
        let descriptors = scanner.discover_marked_types(&self.roots);
        let applied = self.register_all(&descriptors, registry)?;
        self.log_summary(applied, started, registry);
        Ok(applied)
    }

    fn register_all<R>(
        &self,
        descriptors: &[TypeDescriptor],
        registry: &mut R,
    ) -> Result<usize, RegistryError>
    where
        R: EntityRegistry + ?Sized,
    {
        for descriptor in descriptors {
            if self.register_as_entities {
                registry.register_entity(descriptor)?;
            } else {
                registry.register_type(descriptor)?;
            }
        }
        Ok(descriptors.len())
    }

    fn log_summary<R>(&self, applied: usize, started: Instant, registry: &R)
    where
        R: EntityRegistry + ?Sized,
    {
        info!(
            "registered {applied} mapped types in {}ms, total names: {}",
            started.elapsed().as_millis(),
            registry.total_names()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ScanError;
    use crate::types::ResourceRecord;
    use regex::Regex;

    /// Registry double recording every call in order.
    #[derive(Default)]
    struct RecordingRegistry {
        calls: Vec<(&'static str, String)>,
        reject: Option<String>,
    }

    impl EntityRegistry for RecordingRegistry {
        fn register_entity(&mut self, descriptor: &TypeDescriptor) -> Result<(), RegistryError> {
            self.record("entity", descriptor)
        }

        fn register_type(&mut self, descriptor: &TypeDescriptor) -> Result<(), RegistryError> {
            self.record("type", descriptor)
        }

        fn total_names(&self) -> usize {
            self.calls.len()
        }
    }

    impl RecordingRegistry {
        fn record(
            &mut self,
            mode: &'static str,
            descriptor: &TypeDescriptor,
        ) -> Result<(), RegistryError> {
            if self.reject.as_deref() == Some(descriptor.type_name()) {
                return Err(RegistryError::Duplicate {
                    name: descriptor.type_name().to_string(),
                });
            }
            self.calls.push((mode, descriptor.type_name().to_string()));
            Ok(())
        }
    }

    /// Scanner double honoring the empty-roots contract.
    struct StubScanner {
        descriptors: Vec<TypeDescriptor>,
    }

    impl ResourceScanner for StubScanner {
        fn discover_marked_types(&self, roots: &[String]) -> Vec<TypeDescriptor> {
            if roots.is_empty() {
                return Vec::new();
            }
            self.descriptors.clone()
        }

        fn discover_resources(
            &self,
            _pattern: &Regex,
            _sink: &mut dyn FnMut(ResourceRecord),
        ) -> Result<(), ScanError> {
            Ok(())
        }
    }

    fn descriptors() -> Vec<TypeDescriptor> {
        vec![
            TypeDescriptor::new("Guild", "app::models", "guilds"),
            TypeDescriptor::new("Member", "app::models", "members"),
        ]
    }

    #[test]
    fn entity_mode_routes_every_descriptor_to_register_entity() {
        let mut registry = RecordingRegistry::default();
        let applied = EntityRegistrar::new(true)
            .apply(&descriptors(), &mut registry)
            .expect("apply");

        assert_eq!(applied, 2);
        assert_eq!(
            registry.calls,
            vec![
                ("entity", "Guild".to_string()),
                ("entity", "Member".to_string()),
            ]
        );
    }

    #[test]
    fn type_mode_routes_every_descriptor_to_register_type() {
        let mut registry = RecordingRegistry::default();
        EntityRegistrar::new(false)
            .apply(&descriptors(), &mut registry)
            .expect("apply");

        assert_eq!(
            registry.calls,
            vec![
                ("type", "Guild".to_string()),
                ("type", "Member".to_string()),
            ]
        );
    }

    #[test]
    fn rejection_aborts_the_pass_but_keeps_earlier_registrations() {
        let mut registry = RecordingRegistry {
            reject: Some("Member".to_string()),
            ..Default::default()
        };

        let err = EntityRegistrar::new(true)
            .apply(&descriptors(), &mut registry)
            .unwrap_err();

        assert!(matches!(err, RegistryError::Duplicate { name } if name == "Member"));
        assert_eq!(registry.calls, vec![("entity", "Guild".to_string())]);
    }

    #[test]
    fn configure_scans_under_the_configured_roots() {
        let scanner = StubScanner {
            descriptors: descriptors(),
        };
        let mut registry = RecordingRegistry::default();

        let applied = EntityRegistrar::new(false)
            .roots(["app::models"])
            .configure(&scanner, &mut registry)
            .expect("configure");

        assert_eq!(applied, 2);
        assert_eq!(registry.total_names(), 2);
    }

    #[test]
    fn empty_scope_registers_nothing() {
        let scanner = StubScanner {
            descriptors: descriptors(),
        };
        let mut registry = RecordingRegistry::default();
        registry.calls.push(("entity", "Preexisting".to_string()));

        let applied = EntityRegistrar::new(true)
            .configure(&scanner, &mut registry)
            .expect("configure");

        assert_eq!(applied, 0);
        assert_eq!(registry.total_names(), 1);
    }
}
