//! Global style export.
//!
//! Besides notifying framework listeners, every mode change is mirrored onto
//! the document root so plain stylesheets can react without a re-render:
//! one custom property per token, a `data-theme` attribute, and a
//! `theme-<mode>` class.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use crate::mode::ThemeMode;
use crate::tokens::ThemeTokens;

/// Root attribute carrying the active mode.
pub const THEME_ATTRIBUTE: &str = "data-theme";

/// Prefix of the root class carrying the active mode.
pub const THEME_CLASS_PREFIX: &str = "theme-";

/// Receiver of global style variables and root markers.
pub trait StyleSink {
    /// Sets a custom property, e.g. `--color-primary`.
    fn set_variable(&mut self, name: &str, value: &str);

    fn set_attribute(&mut self, name: &str, value: &str);

    /// Removes every class starting with `prefix`, then adds `class`.
    fn replace_class(&mut self, _prefix: &str, _class: &str) {}
}

impl<S: StyleSink + ?Sized> StyleSink for Box<S> {
    fn set_variable(&mut self, name: &str, value: &str) {
        (**self).set_variable(name, value)
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        (**self).set_attribute(name, value)
    }

    fn replace_class(&mut self, prefix: &str, class: &str) {
        (**self).replace_class(prefix, class)
    }
}

/// Writes every token of `mode` plus the mode markers to `sink`.
pub fn apply_tokens(sink: &mut dyn StyleSink, mode: ThemeMode) {
    let tokens = ThemeTokens::for_mode(mode);
    for (name, value) in tokens.css_variables() {
        sink.set_variable(&name, value);
    }
    sink.set_attribute(THEME_ATTRIBUTE, mode.as_str());
    sink.replace_class(
        THEME_CLASS_PREFIX,
        &format!("{}{}", THEME_CLASS_PREFIX, mode.as_str()),
    );
}

/// A sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl StyleSink for NullSink {
    fn set_variable(&mut self, _name: &str, _value: &str) {}
    fn set_attribute(&mut self, _name: &str, _value: &str) {}
}

#[derive(Debug, Default)]
struct RootState {
    variables: BTreeMap<String, String>,
    attributes: BTreeMap<String, String>,
    classes: BTreeSet<String>,
}

/// In-memory document root.
///
/// Headless hosts render from it; clones share state, so one clone can be
/// given to a controller while another is inspected.
#[derive(Debug, Clone, Default)]
pub struct DocumentRoot {
    state: Rc<RefCell<RootState>>,
}

impl DocumentRoot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn variable(&self, name: &str) -> Option<String> {
        self.state.borrow().variables.get(name).cloned()
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.state.borrow().attributes.get(name).cloned()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.state.borrow().classes.contains(class)
    }

    /// All custom properties, sorted by name.
    pub fn variables(&self) -> Vec<(String, String)> {
        self.state
            .borrow()
            .variables
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn classes(&self) -> Vec<String> {
        self.state.borrow().classes.iter().cloned().collect()
    }
}

impl StyleSink for DocumentRoot {
    fn set_variable(&mut self, name: &str, value: &str) {
        self.state
            .borrow_mut()
            .variables
            .insert(name.to_string(), value.to_string());
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        self.state
            .borrow_mut()
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    fn replace_class(&mut self, prefix: &str, class: &str) {
        let mut state = self.state.borrow_mut();
        state.classes.retain(|c| !c.starts_with(prefix));
        state.classes.insert(class.to_string());
    }
}
