//! Controller configuration.

use serde::{Deserialize, Serialize};

use crate::mode::ThemeMode;
use crate::store::DEFAULT_STORAGE_KEY;

/// Settings a host passes when mounting a controller.
///
/// Deserializable so hosts can keep it in their own config files; missing
/// fields take their defaults.
///
/// ```rust
/// use portfolio_theme::{ThemeMode, ThemeOptions};
///
/// let options: ThemeOptions = serde_json::from_str(r#"{"default_mode": "dark"}"#).unwrap();
/// assert_eq!(options.default_mode, Some(ThemeMode::Dark));
/// assert_eq!(options.storage_key, "portfolio-theme");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeOptions {
    /// Mode used when nothing is stored; outranks the system preference.
    pub default_mode: Option<ThemeMode>,
    /// Key the explicit choice is stored under.
    pub storage_key: String,
}

impl Default for ThemeOptions {
    fn default() -> Self {
        Self {
            default_mode: None,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}
