use thiserror::Error;

/// Errors raised while loading a command catalog.
///
/// These surface once, at startup. Searching a loaded catalog never fails.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog is empty")]
    Empty,

    #[error("duplicate command id '{0}'")]
    DuplicateId(String),

    #[error("command at position {0} has an empty id")]
    MissingId(usize),

    #[error("command '{0}' has an empty name")]
    MissingName(String),

    #[error("unsupported catalog format '{0}' (expected .json or .toml)")]
    UnsupportedFormat(String),
}

/// Errors that can occur in shellref
#[derive(Debug, Error)]
pub enum ShellrefError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for shellref operations
pub type ShellrefResult<T> = Result<T, ShellrefError>;

impl From<toml::ser::Error> for ShellrefError {
    fn from(err: toml::ser::Error) -> Self {
        ShellrefError::Config(err.to_string())
    }
}
