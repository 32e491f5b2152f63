//! View model for the theme toggle button.
//!
//! Rendering and animation belong to the host; this module decides what the
//! control shows and announces for the current mode, and which keys activate
//! it.

use crate::controller::ThemeHandle;
use crate::mode::ThemeMode;

/// Button size presets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ToggleSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl ToggleSize {
    /// Edge length of the square button, in CSS pixels.
    pub fn pixels(self) -> u32 {
        match self {
            ToggleSize::Small => 32,
            ToggleSize::Medium => 40,
            ToggleSize::Large => 48,
        }
    }
}

/// Icon shown inside the button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleIcon {
    Sun,
    Moon,
}

/// Everything the host needs to render the toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleView {
    /// Visible label, when labels are enabled. Names the mode a press switches to.
    pub label: Option<&'static str>,
    pub aria_label: String,
    /// `aria-pressed`: true while dark.
    pub aria_pressed: bool,
    pub role: &'static str,
    pub icon: ToggleIcon,
    pub size_px: u32,
}

/// A light/dark switch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThemeToggle {
    pub size: ToggleSize,
    pub show_label: bool,
}

impl ThemeToggle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(mut self, size: ToggleSize) -> Self {
        self.size = size;
        self
    }

    pub fn show_label(mut self, show: bool) -> Self {
        self.show_label = show;
        self
    }

    pub fn view(&self, mode: ThemeMode) -> ToggleView {
        let label = match mode {
            ThemeMode::Light => "Dark Mode",
            ThemeMode::Dark => "Light Mode",
        };
        let icon = match mode {
            ThemeMode::Light => ToggleIcon::Sun,
            ThemeMode::Dark => ToggleIcon::Moon,
        };
        ToggleView {
            label: self.show_label.then_some(label),
            aria_label: format!("Switch to {} mode", mode.toggle()),
            aria_pressed: mode.is_dark(),
            role: "switch",
            icon,
            size_px: self.size.pixels(),
        }
    }

    /// Toggles the theme (click or tap).
    pub fn activate(&self, theme: &ThemeHandle) {
        theme.toggle();
    }

    /// Handles a key press, toggling on Enter or Space.
    ///
    /// `key` uses DOM `KeyboardEvent.key` names. Returns `true` when the key
    /// was consumed, so the host can suppress its default action.
    pub fn handle_key(&self, theme: &ThemeHandle, key: &str) -> bool {
        match key {
            "Enter" | " " => {
                self.activate(theme);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::ThemeController;

    #[test]
    fn test_view_while_light() {
        let view = ThemeToggle::new().show_label(true).view(ThemeMode::Light);
        assert_eq!(view.label, Some("Dark Mode"));
        assert_eq!(view.aria_label, "Switch to dark mode");
        assert!(!view.aria_pressed);
        assert_eq!(view.role, "switch");
        assert_eq!(view.icon, ToggleIcon::Sun);
        assert_eq!(view.size_px, 40);
    }

    #[test]
    fn test_view_while_dark() {
        let view = ThemeToggle::new()
            .size(ToggleSize::Large)
            .show_label(true)
            .view(ThemeMode::Dark);
        assert_eq!(view.label, Some("Light Mode"));
        assert_eq!(view.aria_label, "Switch to light mode");
        assert!(view.aria_pressed);
        assert_eq!(view.icon, ToggleIcon::Moon);
        assert_eq!(view.size_px, 48);
    }

    #[test]
    fn test_label_hidden_by_default() {
        let view = ThemeToggle::new().view(ThemeMode::Light);
        assert_eq!(view.label, None);
    }

    #[test]
    fn test_sizes() {
        assert_eq!(ToggleSize::Small.pixels(), 32);
        assert_eq!(ToggleSize::Medium.pixels(), 40);
        assert_eq!(ToggleSize::Large.pixels(), 48);
    }

    #[test]
    fn test_keyboard_activation() {
        let controller = ThemeController::builder().mount();
        let theme = controller.handle();
        let toggle = ThemeToggle::new();

        assert!(toggle.handle_key(&theme, "Enter"));
        assert_eq!(theme.mode(), ThemeMode::Dark);
        assert!(toggle.handle_key(&theme, " "));
        assert_eq!(theme.mode(), ThemeMode::Light);

        assert!(!toggle.handle_key(&theme, "Escape"));
        assert!(!toggle.handle_key(&theme, "Space"));
        assert_eq!(theme.mode(), ThemeMode::Light);
    }

    #[test]
    fn test_activate_toggles() {
        let controller = ThemeController::builder()
            .default_mode(ThemeMode::Dark)
            .mount();
        let theme = controller.handle();
        ThemeToggle::new().activate(&theme);
        assert_eq!(theme.mode(), ThemeMode::Light);
    }
}
