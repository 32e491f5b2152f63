//! Error types for theme operations.

use std::io;

/// Error returned by fallible theme operations.
///
/// Mode changes through a [`ThemeHandle`](crate::ThemeHandle) never fail;
/// these errors come from the loosely-typed boundaries (parsing a mode name,
/// validating a style value, rendering a stylesheet).
#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    /// A mode name other than `light` or `dark`.
    #[error("invalid theme mode '{0}', expected 'light' or 'dark'")]
    InvalidMode(String),

    /// A token value that is neither a hex color nor a gradient.
    #[error("invalid style value for '{slot}': {reason}")]
    InvalidStyleValue { slot: String, reason: String },

    /// The stylesheet template failed to render.
    #[error("failed to render stylesheet: {0}")]
    Stylesheet(#[from] minijinja::Error),
}

/// Error reported by a [`PreferenceStore`](crate::PreferenceStore).
///
/// The controller never surfaces these; they are logged and the session
/// continues in memory.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Storage is disabled or not present in this context.
    #[error("preference storage is unavailable")]
    Unavailable,

    /// The backing file could not be read or written.
    #[error("preference storage I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The backing file exists but does not hold a JSON object of strings.
    #[error("preference storage is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}
