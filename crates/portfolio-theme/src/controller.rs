//! The theme preference controller.
//!
//! [`ThemeController`] is mounted once near the application root. Mounting
//! resolves the initial mode, exports its tokens, and subscribes to the
//! system preference. Descendants receive a [`ThemeHandle`], the propagation
//! channel through which they read the mode and tokens, change the mode, and
//! register for re-render notifications.
//!
//! # Resolution
//!
//! The initial mode is taken from the first of:
//!
//! 1. a valid stored choice
//! 2. the caller-supplied default mode
//! 3. the system preference (`Dark` if it reports dark, otherwise `Light`)
//!
//! # Side effects
//!
//! [`ThemeHandle::toggle`] and [`ThemeHandle::set`] run, in order: update the
//! in-memory mode, persist it, export tokens to the [`StyleSink`], notify
//! change listeners. Setting the current mode again still persists and
//! re-exports.
//!
//! System notifications are adopted only while no explicit choice exists. They
//! follow the same path minus persistence, so ambient changes never turn into
//! an explicit choice.
//!
//! # Example
//!
//! ```rust
//! use portfolio_theme::{DocumentRoot, ManualPreference, MemoryStore, ThemeController, ThemeMode};
//!
//! let store = MemoryStore::new();
//! let system = ManualPreference::new(Some(false));
//! let root = DocumentRoot::new();
//!
//! let controller = ThemeController::builder()
//!     .store(store.clone())
//!     .system(system.clone())
//!     .sink(root.clone())
//!     .mount();
//! let theme = controller.handle();
//!
//! assert_eq!(theme.mode(), ThemeMode::Light);
//! theme.toggle();
//! assert_eq!(store.peek("portfolio-theme").as_deref(), Some("dark"));
//! assert_eq!(root.attribute("data-theme").as_deref(), Some("dark"));
//!
//! // An explicit choice outranks later system changes.
//! system.set_dark(false);
//! assert_eq!(theme.mode(), ThemeMode::Dark);
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::ThemeError;
use crate::mode::ThemeMode;
use crate::options::ThemeOptions;
use crate::sink::{apply_tokens, NullSink, StyleSink};
use crate::store::{MemoryStore, PreferenceSlot, PreferenceStore};
use crate::system::{NoSystemPreference, Subscription, SystemPreference};
use crate::tokens::ThemeTokens;

/// Where the initial mode came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedFrom {
    /// A valid stored choice.
    Stored,
    /// The caller-supplied default mode.
    Default,
    /// The system preference signal.
    System,
    /// Nothing was available; the fixed `Light` fallback.
    Fallback,
}

/// Applies the resolution precedence.
///
/// `system_dark` is only queried when neither a stored choice nor a default
/// is present.
pub fn resolve_initial_mode(
    stored: Option<ThemeMode>,
    default_mode: Option<ThemeMode>,
    system_dark: impl FnOnce() -> Option<bool>,
) -> (ThemeMode, ResolvedFrom) {
    if let Some(mode) = stored {
        return (mode, ResolvedFrom::Stored);
    }
    if let Some(mode) = default_mode {
        return (mode, ResolvedFrom::Default);
    }
    match system_dark() {
        Some(dark) => (ThemeMode::from_dark(dark), ResolvedFrom::System),
        None => (ThemeMode::default(), ResolvedFrom::Fallback),
    }
}

/// The active mode together with its tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeSnapshot {
    pub mode: ThemeMode,
    pub tokens: &'static ThemeTokens,
}

impl ThemeSnapshot {
    pub fn of(mode: ThemeMode) -> Self {
        Self {
            mode,
            tokens: ThemeTokens::for_mode(mode),
        }
    }
}

/// Identifies a listener registered with [`ThemeHandle::on_change`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Rc<dyn Fn(ThemeSnapshot)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChangeOrigin {
    User,
    System,
}

struct ThemeState {
    mode: ThemeMode,
    mounted: bool,
    slot: PreferenceSlot,
    sink: Box<dyn StyleSink>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

/// Cheap, cloneable access to the mounted theme.
///
/// This is the value a UI tree propagates to descendants. Sinks and stores
/// must not call back into the handle; change listeners may.
#[derive(Clone)]
pub struct ThemeHandle {
    state: Rc<RefCell<ThemeState>>,
}

impl ThemeHandle {
    pub fn mode(&self) -> ThemeMode {
        self.state.borrow().mode
    }

    /// Returns the constant token set of the current mode.
    pub fn tokens(&self) -> &'static ThemeTokens {
        ThemeTokens::for_mode(self.mode())
    }

    pub fn snapshot(&self) -> ThemeSnapshot {
        ThemeSnapshot::of(self.mode())
    }

    /// Flips between light and dark.
    pub fn toggle(&self) {
        let next = self.mode().toggle();
        self.change(next, ChangeOrigin::User);
    }

    /// Sets the mode explicitly.
    pub fn set(&self, mode: ThemeMode) {
        self.change(mode, ChangeOrigin::User);
    }

    /// Sets the mode from its name, for callers holding untyped input.
    ///
    /// Names other than `light`/`dark` are rejected and leave the theme
    /// untouched.
    pub fn try_set(&self, name: &str) -> Result<(), ThemeError> {
        let mode = name.parse::<ThemeMode>()?;
        self.set(mode);
        Ok(())
    }

    /// Whether an explicit user choice currently outranks the system preference.
    pub fn has_explicit_choice(&self) -> bool {
        self.state.borrow().slot.is_present()
    }

    /// Registers a listener called after every mode change.
    pub fn on_change(&self, listener: impl Fn(ThemeSnapshot) + 'static) -> ListenerId {
        let mut state = self.state.borrow_mut();
        let id = ListenerId(state.next_listener);
        state.next_listener += 1;
        state.listeners.push((id, Rc::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut state = self.state.borrow_mut();
        let before = state.listeners.len();
        state.listeners.retain(|(listener_id, _)| *listener_id != id);
        state.listeners.len() != before
    }

    fn change(&self, mode: ThemeMode, origin: ChangeOrigin) {
        let listeners: Vec<Listener> = {
            let mut guard = self.state.borrow_mut();
            let state = &mut *guard;
            let previous = state.mode;

            state.mode = mode;
            if origin == ChangeOrigin::User {
                state.slot.save(mode);
            }
            apply_tokens(state.sink.as_mut(), mode);

            tracing::debug!(from = %previous, to = %mode, ?origin, "theme mode changed");
            state
                .listeners
                .iter()
                .map(|(_, listener)| Rc::clone(listener))
                .collect()
        };

        let snapshot = ThemeSnapshot::of(mode);
        for listener in listeners {
            listener(snapshot);
        }
    }

    fn handle_system_change(&self, dark: bool) {
        let explicit = {
            let state = self.state.borrow();
            if !state.mounted {
                return;
            }
            state.slot.is_present()
        };

        if explicit {
            tracing::debug!(dark, "ignoring system color scheme change, explicit choice stored");
            return;
        }
        self.change(ThemeMode::from_dark(dark), ChangeOrigin::System);
    }
}

impl fmt::Debug for ThemeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ThemeHandle")
            .field("mode", &state.mode)
            .field("mounted", &state.mounted)
            .field("listeners", &state.listeners.len())
            .finish()
    }
}

/// The mounted theme controller.
///
/// Owns the system-preference subscription. Dropping the controller (or
/// calling [`unmount`](Self::unmount)) releases it; no system notification is
/// acted on afterwards, even through handles that are still alive.
pub struct ThemeController {
    handle: ThemeHandle,
    resolved_from: ResolvedFrom,
    system: Box<dyn SystemPreference>,
    subscription: Option<Subscription>,
}

impl ThemeController {
    pub fn builder() -> ThemeControllerBuilder {
        ThemeControllerBuilder::new()
    }

    /// Returns a handle for descendants.
    pub fn handle(&self) -> ThemeHandle {
        self.handle.clone()
    }

    pub fn mode(&self) -> ThemeMode {
        self.handle.mode()
    }

    pub fn tokens(&self) -> &'static ThemeTokens {
        self.handle.tokens()
    }

    pub fn toggle(&self) {
        self.handle.toggle()
    }

    pub fn set(&self, mode: ThemeMode) {
        self.handle.set(mode)
    }

    /// Where the mode chosen at mount came from.
    pub fn resolved_from(&self) -> ResolvedFrom {
        self.resolved_from
    }

    /// The system source's current reading.
    pub fn system_prefers_dark(&self) -> Option<bool> {
        self.system.is_dark_preferred()
    }

    /// Tears the controller down, releasing the system subscription.
    pub fn unmount(self) {}
}

impl Drop for ThemeController {
    fn drop(&mut self) {
        self.handle.state.borrow_mut().mounted = false;
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        tracing::debug!("theme controller unmounted");
    }
}

impl fmt::Debug for ThemeController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeController")
            .field("handle", &self.handle)
            .field("resolved_from", &self.resolved_from)
            .finish()
    }
}

/// Builder for [`ThemeController`].
///
/// Unset collaborators default to an in-memory store, no system preference,
/// and a sink that discards output.
pub struct ThemeControllerBuilder {
    store: Box<dyn PreferenceStore>,
    system: Box<dyn SystemPreference>,
    sink: Box<dyn StyleSink>,
    options: ThemeOptions,
}

impl ThemeControllerBuilder {
    pub fn new() -> Self {
        Self {
            store: Box::new(MemoryStore::new()),
            system: Box::new(NoSystemPreference),
            sink: Box::new(NullSink),
            options: ThemeOptions::default(),
        }
    }

    pub fn store(mut self, store: impl PreferenceStore + 'static) -> Self {
        self.store = Box::new(store);
        self
    }

    pub fn system(mut self, system: impl SystemPreference + 'static) -> Self {
        self.system = Box::new(system);
        self
    }

    pub fn sink(mut self, sink: impl StyleSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Replaces all options at once.
    pub fn options(mut self, options: ThemeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn default_mode(mut self, mode: ThemeMode) -> Self {
        self.options.default_mode = Some(mode);
        self
    }

    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.options.storage_key = key.into();
        self
    }

    /// Resolves the initial mode, exports it, and subscribes to the system source.
    pub fn mount(self) -> ThemeController {
        let Self {
            store,
            system,
            mut sink,
            options,
        } = self;

        let slot = PreferenceSlot::new(store, options.storage_key);
        let (mode, resolved_from) =
            resolve_initial_mode(slot.load(), options.default_mode, || {
                system.is_dark_preferred()
            });
        tracing::debug!(%mode, ?resolved_from, key = slot.key(), "theme resolved");

        apply_tokens(sink.as_mut(), mode);

        let handle = ThemeHandle {
            state: Rc::new(RefCell::new(ThemeState {
                mode,
                mounted: true,
                slot,
                sink,
                listeners: Vec::new(),
                next_listener: 0,
            })),
        };

        let weak = Rc::downgrade(&handle.state);
        let subscription = system.subscribe(Box::new(move |dark| {
            if let Some(state) = weak.upgrade() {
                ThemeHandle { state }.handle_system_change(dark);
            }
        }));

        ThemeController {
            handle,
            resolved_from,
            system,
            subscription: Some(subscription),
        }
    }
}

impl Default for ThemeControllerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
