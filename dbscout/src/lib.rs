//! Configuration-time discovery and registration for persistence frameworks.
//!
//! Two jobs, both driven by one scan over a configured scope:
//!
//! - find every type deriving [`TableMapped`] and hand it to an
//!   [`EntityRegistry`], either as a full entity or as a bare type;
//! - find every properties resource matching a filename pattern, merge the
//!   documents into one namespace of named SQL templates, and serve lookups
//!   through a [`QueryStore`].
//!
//! Nothing here executes SQL or persists state: every pass rebuilds its view
//! from the scan scope.
//!
//! # Example
//! ```ignore
//! use std::sync::Arc;
//! use dbscout::{EntityRegistrar, LinkedScanner, MemoryRegistry, QueryStore, TableMapped};
//!
//! #[derive(TableMapped)]
//! #[table(name = "guilds")]
//! struct Guild {
//!     id: u64,
//! }
//!
//! let scanner = Arc::new(LinkedScanner::new());
//! let mut registry = MemoryRegistry::new();
//! EntityRegistrar::new(true)
//!     .roots(["myapp::models"])
//!     .configure(scanner.as_ref(), &mut registry)?;
//!
//! let queries = QueryStore::load(scanner)?;
//! let find_guild = queries.get_query("guild.find");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

extern crate self as dbscout;

pub mod errors;
pub mod querymap;
pub mod registrar;
pub mod registry;
pub mod scan;
pub mod types;

pub use errors::{ConfigureError, PropsError, RegistryError, ReloadError, ScanError};
pub use querymap::QueryStore;
pub use registrar::EntityRegistrar;
pub use registry::{EntityRegistry, MemoryRegistry, RegisteredMapping};
pub use scan::{DirScanner, EmbeddedResource, LinkedScanner, MappedType, ResourceScanner};
pub use types::{ResourceRecord, ScanScope, TableMapping, TypeDescriptor};

pub use dbscout_macros::TableMapped;

// Re-export inventory so derive-generated code and `embed_resource!` can
// reach it through this crate.
pub use inventory;

use std::sync::Arc;

/// One configuration pass: scan once, register every discovered mapping,
/// and build the query namespace.
///
/// The two consumers stay independent of each other; a registration failure
/// aborts the pass before the query store is built.
pub fn configure<R>(
    scope: &ScanScope,
    register_as_entities: bool,
    scanner: Arc<dyn ResourceScanner + Send + Sync>,
    registry: &mut R,
) -> Result<QueryStore, ConfigureError>
where
    R: EntityRegistry + ?Sized,
{
    EntityRegistrar::new(register_as_entities)
        .roots(scope.roots().iter().cloned())
        .configure(scanner.as_ref(), registry)?;

    let store = match scope.resource_pattern() {
        Some(pattern) => QueryStore::with_pattern(scanner, pattern.clone()),
        None => QueryStore::load(scanner),
    }?;
    Ok(store)
}

/// Compile a byte resource into the program image for [`LinkedScanner`] to
/// find.
///
/// # Example
/// ```ignore
/// dbscout::embed_resource!("queries/app.sql.props");
/// dbscout::embed_resource!("inline.sql.props", b"user.find=SELECT * FROM users");
/// ```
#[macro_export]
macro_rules! embed_resource {
    ($path:literal) => {
        $crate::inventory::submit! {
            $crate::scan::EmbeddedResource::new($path, ::core::include_bytes!($path))
        }
    };
    ($path:expr, $bytes:expr) => {
        $crate::inventory::submit! {
            $crate::scan::EmbeddedResource::new($path, $bytes)
        }
    };
}
