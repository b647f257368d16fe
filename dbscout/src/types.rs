use regex::Regex;

/// Contract implemented for every type deriving `TableMapped`.
pub trait TableMapping {
    /// Table the type maps to.
    const TABLE: &'static str;

    /// Descriptor for this mapping, as scanners would discover it.
    fn descriptor() -> TypeDescriptor;
}

/// A discovered table-mapped type.
///
/// The fully qualified `module_path::TypeName` is enough to resolve the
/// registration again later; nothing else is carried. Descriptors are
/// transient: produced by one scan, consumed by one registration pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    type_name: String,
    module_path: String,
    table_name: String,
}

impl TypeDescriptor {
    pub fn new(
        type_name: impl Into<String>,
        module_path: impl Into<String>,
        table_name: impl Into<String>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            module_path: module_path.into(),
            table_name: table_name.into(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn module_path(&self) -> &str {
        &self.module_path
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// `module_path::TypeName`.
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.module_path, self.type_name)
    }
}

/// A resource yielded by a scan: relative `/`-joined path plus raw bytes.
///
/// Ephemeral; decoded and merged immediately by the consumer.
#[derive(Debug, Clone)]
pub struct ResourceRecord {
    pub path: String,
    pub bytes: Vec<u8>,
}

impl ResourceRecord {
    pub fn new(path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            bytes: bytes.into(),
        }
    }
}

/// Input to one configuration pass: the scan roots restricting typed
/// discovery, plus an optional override of the resource pattern.
#[derive(Debug, Clone, Default)]
pub struct ScanScope {
    roots: Vec<String>,
    pattern: Option<Regex>,
}

impl ScanScope {
    pub fn new(roots: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
            pattern: None,
        }
    }

    /// Override the resource pattern for this pass.
    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    pub fn resource_pattern(&self) -> Option<&Regex> {
        self.pattern.as_ref()
    }
}
