//! Error handling types and utilities.

use std::path::PathBuf;

/// A specialized Result type for rustdoc-impls operations.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods throughout the codebase.
pub type Result<T> = anyhow::Result<T>;

/// Error returned when an implementor script cannot be decoded.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// The script never assigns an `implementors` table.
    #[error("no `implementors` assignment found in script")]
    MissingAssignment,
    /// The assigned table is not valid JSON.
    #[error("implementor table is not valid JSON: {0}")]
    InvalidPayload(#[from] serde_json::Error),
    /// The table is neither an object nor an `Object.fromEntries` pair list.
    #[error("implementor table has unexpected shape: {0}")]
    InvalidShape(String),
    /// A crate key maps to something other than an array of entries.
    #[error("implementors for crate '{crate_name}' are not an array")]
    InvalidCrateList { crate_name: String },
    /// An entry carries no HTML description.
    #[error("entry {index} for crate '{crate_name}' has no HTML description")]
    InvalidEntry { crate_name: String, index: usize },
}

/// Error returned when loading a trait's implementor file fails.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Implementor file not found at the expected path.
    #[error("Implementor file not found for '{trait_path}' at {}", .path.display())]
    NotFound { trait_path: String, path: PathBuf },
    /// The file could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file holds binary data rather than UTF-8 script text.
    #[error("{} is not UTF-8 text (invalid byte at offset {valid_up_to})", .path.display())]
    NotText { path: PathBuf, valid_up_to: usize },
    /// The file was read but its contents could not be decoded.
    #[error("Failed to decode implementors for '{trait_path}': {source}")]
    Script {
        trait_path: String,
        #[source]
        source: ScriptError,
    },
}
