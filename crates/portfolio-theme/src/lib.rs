//! # Portfolio Theme
//!
//! Light/dark theme preference handling for a single-page site: which mode is
//! active, where that came from, and how it reaches both framework components
//! and plain stylesheets.
//!
//! ## Quick Start
//!
//! ```rust
//! use portfolio_theme::{DocumentRoot, MemoryStore, OsPreference, ThemeController, ThemeMode};
//!
//! let root = DocumentRoot::new();
//! let controller = ThemeController::builder()
//!     .store(MemoryStore::new())
//!     .system(OsPreference::with_detector(|| Some(true)))
//!     .sink(root.clone())
//!     .mount();
//!
//! // Hand this to descendants.
//! let theme = controller.handle();
//! assert_eq!(theme.mode(), ThemeMode::Dark);
//! assert_eq!(theme.tokens().colors.background, "#0f172a");
//! assert_eq!(root.variable("--color-background").as_deref(), Some("#0f172a"));
//! ```
//!
//! ## Concepts
//!
//! - [`ThemeMode`]: `Light` or `Dark`
//! - [`ThemeTokens`]: constant color and gradient values per mode
//! - [`ThemeController`]: resolves, persists and exports the active mode
//! - [`ThemeHandle`]: cloneable channel descendants read and change the mode through
//! - [`PreferenceStore`]: where explicit choices are kept
//! - [`SystemPreference`]: the ambient OS/user-agent preference
//! - [`StyleSink`]: global style variables and root markers
//!
//! ## Precedence
//!
//! A stored explicit choice beats a caller default, which beats the system
//! preference. While a choice is stored, system changes are ignored.

mod controller;
mod error;
mod mode;
mod options;
mod sink;
mod store;
mod stylesheet;
mod system;
mod toggle;
mod tokens;

pub use controller::{
    resolve_initial_mode, ListenerId, ResolvedFrom, ThemeController, ThemeControllerBuilder,
    ThemeHandle, ThemeSnapshot,
};
pub use error::{StoreError, ThemeError};
pub use mode::ThemeMode;
pub use options::ThemeOptions;
pub use sink::{
    apply_tokens, DocumentRoot, NullSink, StyleSink, THEME_ATTRIBUTE, THEME_CLASS_PREFIX,
};
pub use store::{
    FileStore, MemoryStore, PreferenceSlot, PreferenceStore, UnavailableStore,
    DEFAULT_STORAGE_KEY,
};
pub use stylesheet::render_stylesheet;
pub use system::{
    ManualPreference, NoSystemPreference, OsPreference, PreferenceCallback, PreferenceDetector,
    Subscription, SystemPreference,
};
pub use toggle::{ThemeToggle, ToggleIcon, ToggleSize, ToggleView};
pub use tokens::{
    classify_style_value, ColorSlot, GradientSlot, StyleValueKind, ThemeColors, ThemeGradients,
    ThemeTokens, COLOR_VARIABLE_PREFIX, DARK, GRADIENT_VARIABLE_PREFIX, LIGHT,
};
