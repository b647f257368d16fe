use thiserror::Error;

/// Failure of a scan medium itself, as opposed to a problem with any single
/// resource found on it.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The underlying filesystem could not be read.
    #[error("scan medium unavailable: {0}")]
    Io(#[from] std::io::Error),

    /// An archive scan entry could not be opened or iterated.
    #[error("archive `{path}` unavailable: {source}")]
    Archive {
        path: String,
        #[source]
        source: zip::result::ZipError,
    },
}

/// Why a reload pass was aborted.
///
/// The previously published namespace stays authoritative whenever one of
/// these is returned.
#[derive(Debug, Error)]
pub enum ReloadError {
    /// A discovered resource failed to parse as a properties document.
    #[error("malformed resource `{path}`: {source}")]
    Malformed {
        path: String,
        #[source]
        source: PropsError,
    },

    /// A resource outside the `.properties` convention held bytes that are
    /// not valid UTF-8.
    #[error("resource `{path}` is not valid UTF-8")]
    Encoding { path: String },
}

/// Rejection raised by an entity registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The name is already taken by an earlier registration.
    #[error("`{name}` is already registered")]
    Duplicate { name: String },

    /// The mapping cannot be registered under any name.
    #[error("invalid mapping for `{type_name}`: {reason}")]
    Invalid { type_name: String, reason: String },
}

/// Union of the failures a full configuration pass can surface.
#[derive(Debug, Error)]
pub enum ConfigureError {
    #[error(transparent)]
    Registration(#[from] RegistryError),

    #[error(transparent)]
    Reload(#[from] ReloadError),
}

/// Syntax error in a properties document.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PropsError {
    /// A non-comment logical line had no unescaped `=` or `:`.
    #[error("line {line}: missing `=` or `:` separator")]
    MissingSeparator { line: usize },

    /// An escape sequence outside the supported set.
    #[error("line {line}: unsupported escape `\\{escape}`")]
    InvalidEscape { line: usize, escape: char },

    /// A `\u` escape that is truncated, not hex, or not a scalar value.
    #[error("line {line}: malformed `\\u` escape")]
    BadUnicodeEscape { line: usize },
}
