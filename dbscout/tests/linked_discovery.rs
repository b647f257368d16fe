//! End-to-end discovery through the derive macro and the linked scanner.

use std::sync::Arc;

use dbscout::{
    EntityRegistrar, EntityRegistry, LinkedScanner, MemoryRegistry, ResourceScanner, ScanScope,
    TableMapping,
};

mod models {
    use dbscout::TableMapped;

    #[derive(Debug, TableMapped)]
    pub struct Guild {
        pub id: u64,
    }

    #[derive(Debug, TableMapped)]
    #[table(name = "guild_members")]
    pub struct Member {
        pub id: u64,
        pub guild_id: u64,
    }
}

mod elsewhere {
    use dbscout::TableMapped;

    #[derive(Debug, TableMapped)]
    pub struct Outsider {
        pub id: u64,
    }
}

/// Module-path root of `models` as linked into this test binary.
fn models_root() -> String {
    format!("{}::models", module_path!())
}

#[test]
fn derive_implements_the_mapping_contract() {
    assert_eq!(models::Guild::TABLE, "guild");
    assert_eq!(models::Member::TABLE, "guild_members");

    let descriptor = models::Guild::descriptor();
    assert_eq!(descriptor.type_name(), "Guild");
    assert_eq!(descriptor.module_path(), models_root());
    assert_eq!(descriptor.table_name(), "guild");
}

#[test]
fn linked_scanner_discovers_types_under_a_root() {
    let scanner = LinkedScanner::new();
    let mut found: Vec<_> = scanner
        .discover_marked_types(&[models_root()])
        .into_iter()
        .map(|d| d.type_name().to_string())
        .collect();
    found.sort();

    assert_eq!(found, ["Guild", "Member"]);
}

#[test]
fn entity_mode_registers_under_table_names() {
    let mut registry = MemoryRegistry::new();
    let applied = EntityRegistrar::new(true)
        .roots([models_root()])
        .configure(&LinkedScanner::new(), &mut registry)
        .expect("configure");

    assert_eq!(applied, 2);
    assert!(registry.is_registered("guild"));
    assert!(registry.is_registered("guild_members"));
    assert!(!registry.is_registered("Guild"));
}

#[test]
fn type_mode_registers_under_type_names() {
    let mut registry = MemoryRegistry::new();
    EntityRegistrar::new(false)
        .roots([models_root()])
        .configure(&LinkedScanner::new(), &mut registry)
        .expect("configure");

    assert!(registry.is_registered("Guild"));
    assert!(registry.is_registered("Member"));
    assert!(!registry.is_registered("guild"));
}

#[test]
fn empty_scope_leaves_the_registry_untouched() {
    let mut registry = MemoryRegistry::new();
    registry
        .register_type(&elsewhere::Outsider::descriptor())
        .expect("preload");

    let applied = EntityRegistrar::new(true)
        .configure(&LinkedScanner::new(), &mut registry)
        .expect("configure");

    assert_eq!(applied, 0);
    assert_eq!(registry.total_names(), 1);
}

#[test]
fn full_configuration_pass_routes_both_consumers() {
    let mut registry = MemoryRegistry::new();
    let scope = ScanScope::new([models_root()]);

    let queries = dbscout::configure(&scope, true, Arc::new(LinkedScanner::new()), &mut registry)
        .expect("configure");

    assert_eq!(registry.total_names(), 2);
    // No resources are embedded in this binary.
    assert_eq!(queries.size(), 0);
    assert_eq!(queries.get_query("anything"), None);
}
