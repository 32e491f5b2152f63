//! System color-scheme preference sources.
//!
//! A [`SystemPreference`] answers "does the OS/user agent prefer dark?" and
//! delivers change notifications to subscribers. Subscriptions are scoped:
//! the returned [`Subscription`] releases its registration when dropped.
//!
//! - [`OsPreference`]: detects the desktop setting through `dark-light`
//! - [`ManualPreference`]: in-process source that hosts push changes into
//! - [`NoSystemPreference`]: the preference API is not available

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use dark_light::{detect as detect_os_theme, Mode as OsThemeMode};

pub type PreferenceCallback = Box<dyn FnMut(bool)>;

/// Source of the ambient light/dark preference.
pub trait SystemPreference {
    /// `Some(true)` if dark is preferred, `None` if the signal is unavailable.
    fn is_dark_preferred(&self) -> Option<bool>;

    /// Registers `callback` for change notifications until the returned
    /// subscription is dropped.
    fn subscribe(&self, callback: PreferenceCallback) -> Subscription;
}

/// Registration guard returned by [`SystemPreference::subscribe`].
///
/// Dropping it, or calling [`unsubscribe`](Subscription::unsubscribe),
/// releases the registration exactly once.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A subscription with nothing to release.
    pub fn none() -> Self {
        Self { release: None }
    }

    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

type SharedCallback = Rc<RefCell<PreferenceCallback>>;

#[derive(Default)]
struct Broadcast {
    dark: Option<bool>,
    next_id: u64,
    listeners: Vec<(u64, SharedCallback)>,
    delivering: bool,
    pending: VecDeque<bool>,
}

/// A preference source driven by the host.
///
/// Hosts forward platform change events with [`set_dark`](Self::set_dark).
/// Clones share state, so one clone can be handed to a controller while
/// another keeps pushing changes.
#[derive(Clone, Default)]
pub struct ManualPreference {
    inner: Rc<RefCell<Broadcast>>,
}

impl ManualPreference {
    /// Creates a source with an initial reading; `None` means unavailable.
    pub fn new(dark: Option<bool>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Broadcast {
                dark,
                ..Broadcast::default()
            })),
        }
    }

    /// Records a new reading and notifies subscribers if it changed.
    ///
    /// A reading pushed while subscribers are being notified is queued and
    /// delivered, in order, once the current round finishes.
    pub fn set_dark(&self, dark: bool) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.dark == Some(dark) {
                return;
            }
            inner.dark = Some(dark);
            if inner.delivering {
                inner.pending.push_back(dark);
                return;
            }
            inner.delivering = true;
        }

        let mut next = Some(dark);
        while let Some(dark) = next {
            self.deliver(dark);
            let mut inner = self.inner.borrow_mut();
            next = inner.pending.pop_front();
            if next.is_none() {
                inner.delivering = false;
            }
        }
    }

    // Callbacks run with no borrow held; they may unsubscribe, drop the
    // subscriber that owns them, or push a new reading.
    fn deliver(&self, dark: bool) {
        let listeners = self.inner.borrow().listeners.clone();
        for (id, callback) in listeners {
            if !self.is_registered(id) {
                continue;
            }
            if let Ok(mut callback) = callback.try_borrow_mut() {
                (*callback)(dark);
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    fn is_registered(&self, id: u64) -> bool {
        self.inner
            .borrow()
            .listeners
            .iter()
            .any(|(listener_id, _)| *listener_id == id)
    }
}

impl SystemPreference for ManualPreference {
    fn is_dark_preferred(&self) -> Option<bool> {
        self.inner.borrow().dark
    }

    fn subscribe(&self, callback: PreferenceCallback) -> Subscription {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.listeners.push((id, Rc::new(RefCell::new(callback))));
            id
        };

        let weak: Weak<RefCell<Broadcast>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner
                    .borrow_mut()
                    .listeners
                    .retain(|(listener_id, _)| *listener_id != id);
            }
        })
    }
}

impl fmt::Debug for ManualPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ManualPreference")
            .field("dark", &inner.dark)
            .field("subscribers", &inner.listeners.len())
            .finish()
    }
}

/// A context with no color-scheme preference API.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSystemPreference;

impl SystemPreference for NoSystemPreference {
    fn is_dark_preferred(&self) -> Option<bool> {
        None
    }

    fn subscribe(&self, _callback: PreferenceCallback) -> Subscription {
        Subscription::none()
    }
}

/// Function used to read the OS preference.
pub type PreferenceDetector = fn() -> Option<bool>;

/// The desktop light/dark setting, read through `dark-light`.
///
/// The OS is not watched on a background thread. Hosts call
/// [`poll`](Self::poll) from their event loop; a changed reading is delivered
/// to subscribers on the calling thread.
#[derive(Clone)]
pub struct OsPreference {
    detector: PreferenceDetector,
    hub: ManualPreference,
}

impl OsPreference {
    pub fn new() -> Self {
        Self::with_detector(os_theme_detector)
    }

    /// Uses `detector` instead of querying the OS.
    ///
    /// This is useful for testing or when the host has its own detection.
    pub fn with_detector(detector: PreferenceDetector) -> Self {
        Self {
            detector,
            hub: ManualPreference::new(detector()),
        }
    }

    /// Re-reads the preference, notifying subscribers if it changed.
    ///
    /// Returns `true` when a change was delivered.
    pub fn poll(&self) -> bool {
        match (self.detector)() {
            Some(dark) if self.hub.is_dark_preferred() != Some(dark) => {
                tracing::debug!(dark, "system color scheme changed");
                self.hub.set_dark(dark);
                true
            }
            _ => false,
        }
    }
}

impl Default for OsPreference {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemPreference for OsPreference {
    fn is_dark_preferred(&self) -> Option<bool> {
        (self.detector)()
    }

    fn subscribe(&self, callback: PreferenceCallback) -> Subscription {
        self.hub.subscribe(callback)
    }
}

impl fmt::Debug for OsPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OsPreference")
            .field("last", &self.hub.is_dark_preferred())
            .finish()
    }
}

fn os_theme_detector() -> Option<bool> {
    match detect_os_theme() {
        OsThemeMode::Dark => Some(true),
        OsThemeMode::Light => Some(false),
    }
}
