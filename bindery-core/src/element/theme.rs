//! Theme Feed
//!
//! The theme feed broadcasts appearance changes to the elements that opted
//! in. Receivers are held weakly, keyed by a monotonically increasing token,
//! so a stale token can never address a later registration and a dropped
//! element is skipped rather than dereferenced.
//!
//! # Shared Feed
//!
//! [`ThemeFeed::shared`] returns the feed for the current (UI) thread,
//! created lazily on first use and never torn down. Tests and embedders can
//! create isolated feeds with [`ThemeFeed::new`].
//!
//! # Re-entrancy
//!
//! A broadcast iterates over a snapshot of the receivers. Elements may join
//! or leave the feed from inside `on_theme_change`; an element that leaves
//! mid-broadcast is not notified if it has not been reached yet.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use tracing::debug;

use super::Element;
use crate::view::Appearance;

/// Registration token for one receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThemeToken(u64);

impl ThemeToken {
    /// Get the raw token value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

thread_local! {
    static SHARED_FEED: Rc<ThemeFeed> = Rc::new(ThemeFeed::new());
}

/// Broadcaster of appearance changes.
pub struct ThemeFeed {
    next_token: Cell<u64>,
    receivers: RefCell<IndexMap<ThemeToken, Weak<dyn Element>>>,
    appearance: Cell<Appearance>,
}

impl ThemeFeed {
    /// Create an isolated feed.
    pub fn new() -> Self {
        Self {
            next_token: Cell::new(0),
            receivers: RefCell::new(IndexMap::new()),
            appearance: Cell::new(Appearance::default()),
        }
    }

    /// The feed shared by every element on this thread.
    pub fn shared() -> Rc<Self> {
        SHARED_FEED.with(Rc::clone)
    }

    /// Add a receiver. Returns the token to deregister it with.
    pub fn register(&self, element: &Rc<dyn Element>) -> ThemeToken {
        let token = ThemeToken(self.next_token.get());
        self.next_token.set(token.0 + 1);
        self.receivers
            .borrow_mut()
            .insert(token, Rc::downgrade(element));
        token
    }

    /// Remove a receiver. Returns false for unknown or stale tokens.
    pub fn deregister(&self, token: ThemeToken) -> bool {
        self.receivers.borrow_mut().shift_remove(&token).is_some()
    }

    /// Whether `token` still names a registration.
    pub fn is_registered(&self, token: ThemeToken) -> bool {
        self.receivers.borrow().contains_key(&token)
    }

    /// The most recently broadcast appearance.
    pub fn appearance(&self) -> Appearance {
        self.appearance.get()
    }

    /// Number of receivers still alive.
    pub fn receiver_count(&self) -> usize {
        self.receivers
            .borrow()
            .values()
            .filter(|receiver| receiver.strong_count() > 0)
            .count()
    }

    /// Record `appearance` and notify every live receiver, in registration
    /// order.
    pub fn notify_all(&self, appearance: Appearance) {
        self.appearance.set(appearance);

        let snapshot: Vec<(ThemeToken, Rc<dyn Element>)> = {
            let mut receivers = self.receivers.borrow_mut();
            receivers.retain(|_, receiver| receiver.strong_count() > 0);
            receivers
                .iter()
                .filter_map(|(token, receiver)| receiver.upgrade().map(|element| (*token, element)))
                .collect()
        };

        debug!(?appearance, receivers = snapshot.len(), "broadcasting theme change");

        for (token, element) in snapshot {
            if self.is_registered(token) {
                element.apply_theme(appearance);
            }
        }
    }
}

impl Default for ThemeFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ThemeFeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeFeed")
            .field("appearance", &self.appearance())
            .field("receivers", &self.receiver_count())
            .finish()
    }
}
