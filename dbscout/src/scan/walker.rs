//! Filesystem and archive scan backend.
//!
//! A [`DirScanner`] walks a list of scan entries. Directory entries are
//! walked recursively: resources come back under `/`-joined relative paths,
//! and `.rs` files are parsed for structs deriving `TableMapped`. Entries
//! that are `.zip`/`.jar` files are iterated as archives, their entry names
//! serving as resource paths.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use regex::Regex;
use syn::{Attribute, Expr, ExprLit, Lit, Meta, MetaNameValue};
use walkdir::WalkDir;
use zip::ZipArchive;

use super::{ResourceScanner, under_roots};
use crate::errors::ScanError;
use crate::types::{ResourceRecord, TypeDescriptor};

/// Scan backend over directories and archive files on disk.
pub struct DirScanner {
    entries: Vec<PathBuf>,
    crate_name: String,
}

impl DirScanner {
    pub fn new(entries: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            entries: entries.into_iter().map(Into::into).collect(),
            crate_name: "crate".to_string(),
        }
    }

    /// Crate name used as the leading module path segment when computing
    /// module paths from file paths. Default: `crate`.
    pub fn crate_name(mut self, name: impl Into<String>) -> Self {
        self.crate_name = name.into();
        self
    }

    fn is_archive(path: &Path) -> bool {
        path.extension()
            .and_then(|extension| extension.to_str())
            .is_some_and(|extension| {
                extension.eq_ignore_ascii_case("zip") || extension.eq_ignore_ascii_case("jar")
            })
    }
}

impl ResourceScanner for DirScanner {
    fn discover_marked_types(&self, roots: &[String]) -> Vec<TypeDescriptor> {
        if roots.is_empty() {
            return Vec::new();
        }

        let mut seen = HashSet::new();
        let mut found = Vec::new();
        for entry in &self.entries {
            if !entry.is_dir() {
                if !entry.exists() {
                    warn!("scan entry `{}` is unavailable", entry.display());
                }
                continue;
            }
            for file in WalkDir::new(entry)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.path().extension().is_some_and(|extension| extension == "rs"))
            {
                for descriptor in scan_source_file(file.path(), entry, &self.crate_name) {
                    if under_roots(descriptor.module_path(), roots)
                        && seen.insert(descriptor.qualified_name())
                    {
                        found.push(descriptor);
                    }
                }
            }
        }
        found
    }

    fn discover_resources(
        &self,
        pattern: &Regex,
        sink: &mut dyn FnMut(ResourceRecord),
    ) -> Result<(), ScanError> {
        for entry in &self.entries {
            if Self::is_archive(entry) {
                scan_archive(entry, pattern, sink)?;
            } else {
                scan_directory(entry, pattern, sink)?;
            }
        }
        Ok(())
    }
}

fn scan_directory(
    base: &Path,
    pattern: &Regex,
    sink: &mut dyn FnMut(ResourceRecord),
) -> Result<(), ScanError> {
    for entry in WalkDir::new(base) {
        let entry = entry.map_err(|err| ScanError::Io(err.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = relative_path(entry.path(), base);
        if pattern.is_match(&relative) {
            let bytes = fs::read(entry.path())?;
            sink(ResourceRecord::new(relative, bytes));
        }
    }
    Ok(())
}

fn scan_archive(
    path: &Path,
    pattern: &Regex,
    sink: &mut dyn FnMut(ResourceRecord),
) -> Result<(), ScanError> {
    let archive_path = || path.display().to_string();
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file).map_err(|source| ScanError::Archive {
        path: archive_path(),
        source,
    })?;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(|source| ScanError::Archive {
            path: archive_path(),
            source,
        })?;
        if !entry.is_file() {
            continue;
        }
        let name = entry.name().to_string();
        if pattern.is_match(&name) {
            let mut bytes = Vec::new();
            entry.read_to_end(&mut bytes)?;
            sink(ResourceRecord::new(name, bytes));
        }
    }
    Ok(())
}

/// Relative path under `base`, `/`-joined regardless of platform.
fn relative_path(path: &Path, base: &Path) -> String {
    let relative = path.strip_prefix(base).unwrap_or(path);
    relative
        .components()
        .filter_map(|component| component.as_os_str().to_str())
        .collect::<Vec<_>>()
        .join("/")
}

/// Scan a single source file for structs deriving `TableMapped`.
///
/// Per-file failures are not medium failures; they are logged and skipped.
fn scan_source_file(file_path: &Path, base: &Path, crate_name: &str) -> Vec<TypeDescriptor> {
    let content = match fs::read_to_string(file_path) {
        Ok(content) => content,
        Err(err) => {
            warn!("skipping unreadable `{}`: {err}", file_path.display());
            return Vec::new();
        }
    };
    let syntax = match syn::parse_file(&content) {
        Ok(syntax) => syntax,
        Err(err) => {
            debug!("skipping unparseable `{}`: {err}", file_path.display());
            return Vec::new();
        }
    };

    let module_path = module_path_for(file_path, base, crate_name);

    let mut found = Vec::new();
    for item in syntax.items {
        if let syn::Item::Struct(item_struct) = item
            && has_table_mapped_derive(&item_struct.attrs)
        {
            let type_name = item_struct.ident.to_string();
            let table_name = table_name_override(&item_struct.attrs)
                .unwrap_or_else(|| to_snake_case(&type_name));
            found.push(TypeDescriptor::new(type_name, module_path.clone(), table_name));
        }
    }
    found
}

/// Check for `#[derive(TableMapped)]`, including qualified forms.
fn has_table_mapped_derive(attrs: &[Attribute]) -> bool {
    for attr in attrs {
        if attr.path().is_ident("derive")
            && let Ok(paths) = attr.parse_args_with(
                syn::punctuated::Punctuated::<syn::Path, syn::Token![,]>::parse_terminated,
            )
        {
            for path in paths {
                if path
                    .segments
                    .last()
                    .is_some_and(|segment| segment.ident == "TableMapped")
                {
                    return true;
                }
            }
        }
    }
    false
}

/// Extract `#[table(name = "...")]` if present.
fn table_name_override(attrs: &[Attribute]) -> Option<String> {
    for attr in attrs {
        if attr.path().is_ident("table")
            && let Ok(nested) = attr.parse_args_with(
                syn::punctuated::Punctuated::<Meta, syn::Token![,]>::parse_terminated,
            )
        {
            for meta in nested {
                if let Meta::NameValue(MetaNameValue { path, value, .. }) = meta
                    && path.is_ident("name")
                    && let Expr::Lit(ExprLit {
                        lit: Lit::Str(value),
                        ..
                    }) = value
                {
                    return Some(value.value());
                }
            }
        }
    }
    None
}

/// Compute the module path from a file path.
/// e.g. `src/guild/models.rs` under crate name `app` -> `app::guild::models`.
fn module_path_for(file_path: &Path, base: &Path, crate_name: &str) -> String {
    let relative = file_path.strip_prefix(base).unwrap_or(file_path);
    let without_extension = relative.with_extension("");
    let mut parts: Vec<String> = without_extension
        .components()
        .filter_map(|component| component.as_os_str().to_str())
        .map(str::to_string)
        .collect();

    if parts.first().is_some_and(|first| first == "src") {
        parts.remove(0);
    }
    if let Some(last) = parts.last()
        && (last == "mod" || last == "lib" || last == "main")
    {
        parts.pop();
    }

    if parts.is_empty() {
        crate_name.to_string()
    } else {
        format!("{}::{}", crate_name, parts.join("::"))
    }
}

fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (index, ch) in name.chars().enumerate() {
        if ch.is_uppercase() {
            if index > 0 {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
