//! Binder Implementation
//!
//! A Binder is the observable value container. It holds a value and an
//! ordered list of subscriptions.
//!
//! # How Binders Work
//!
//! 1. An owner registers a callback. Dead subscriptions are purged first,
//!    then the callback runs once with the current value.
//!
//! 2. Setting the value runs the binder's own callback (if any), then every
//!    live subscription in registration order.
//!
//! 3. When an owner is dropped its callback stops firing at once; the entry
//!    itself is removed on the next registration or explicit purge.
//!
//! # Re-entrancy
//!
//! A callback may set the binder it is being notified by. The new value is
//! stored immediately, but its notification is queued and delivered after
//! the current pass reaches every subscriber. Subscribers therefore observe
//! values in the order they were set, and the call stack never grows with
//! the number of nested sets. A callback that sets the binder on every
//! notification will loop forever, same as it would with plain recursion.
//!
//! # Memory Layout
//!
//! Each binder consists of:
//! - A unique ID (8 bytes)
//! - The value, behind a `RefCell`
//! - The subscription list (grows with number of registrations)
//! - The pending-notification queue (empty outside of re-entrant sets)

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt::{self, Debug};
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use smallvec::SmallVec;
use tracing::trace;

use super::subscription::{owner_addr, ErasedBinder, OwnerRef, Subscription, SubscriptionKey};

/// Unique identifier for a binder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BinderId(u64);

impl BinderId {
    fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

type Notify<T> = Rc<dyn Fn(&T)>;

/// One registered `(owner, callback)` pair.
struct Entry<T> {
    key: SubscriptionKey,
    owner: Box<dyn OwnerRef>,
    /// Cleared on removal so an in-flight dispatch skips it.
    active: Rc<Cell<bool>>,
    notify: Notify<T>,
}

pub(crate) struct BinderInner<T> {
    id: BinderId,
    value: RefCell<T>,
    callback: RefCell<Option<Notify<T>>>,
    entries: RefCell<Vec<Entry<T>>>,
    dispatching: Cell<bool>,
    pending: RefCell<VecDeque<T>>,
}

/// Resets the dispatch flag even if a callback panics.
struct DispatchGuard<'a, T> {
    inner: &'a BinderInner<T>,
}

impl<T> Drop for DispatchGuard<'_, T> {
    fn drop(&mut self) {
        self.inner.dispatching.set(false);
        self.inner.pending.borrow_mut().clear();
    }
}

impl<T: Clone + 'static> BinderInner<T> {
    fn set(&self, value: T) {
        // Old value may own elements whose teardown reads this binder.
        let previous = self.value.replace(value.clone());
        drop(previous);
        self.pending.borrow_mut().push_back(value);

        if self.dispatching.get() {
            trace!(binder = self.id.raw(), "deferred re-entrant set");
            return;
        }

        self.dispatching.set(true);
        let _guard = DispatchGuard { inner: self };

        loop {
            let next = self.pending.borrow_mut().pop_front();
            let Some(next) = next else { break };
            self.dispatch(&next);
        }
    }

    fn dispatch(&self, value: &T) {
        let callback = self.callback.borrow().clone();
        if let Some(callback) = callback {
            callback(value);
        }

        // Snapshot so callbacks may register and deregister freely.
        let live: SmallVec<[(Rc<Cell<bool>>, Notify<T>); 4]> = self
            .entries
            .borrow()
            .iter()
            .filter(|entry| entry.owner.is_alive())
            .map(|entry| (Rc::clone(&entry.active), Rc::clone(&entry.notify)))
            .collect();

        for (active, notify) in live {
            if active.get() {
                notify(value);
            }
        }
    }

    fn purge(&self) -> usize {
        let dead = self.remove_where(|entry| !entry.owner.is_alive());
        if !dead.is_empty() {
            trace!(binder = self.id.raw(), purged = dead.len(), "purged dead subscriptions");
        }
        dead.len()
    }
}

impl<T> BinderInner<T> {
    /// Detach matching entries and hand them back.
    ///
    /// Entries are dropped by the caller after the borrow ends, since a
    /// callback's captures may touch this binder when dropped.
    fn remove_where(&self, mut matches: impl FnMut(&Entry<T>) -> bool) -> Vec<Entry<T>> {
        let mut entries = self.entries.borrow_mut();
        let (removed, kept): (Vec<_>, Vec<_>) =
            std::mem::take(&mut *entries).into_iter().partition(|entry| matches(entry));
        *entries = kept;
        for entry in &removed {
            entry.active.set(false);
        }
        removed
    }
}

impl<T> ErasedBinder for BinderInner<T> {
    fn deregister_addr(&self, addr: usize) -> usize {
        let removed = self.remove_where(|entry| entry.owner.addr() == addr);
        for entry in &removed {
            trace!(binder = self.id.raw(), subscription = entry.key.raw(), "deregistered");
        }
        removed.len()
    }
}

/// An observable value of type `T`.
///
/// Cloning a binder yields another handle to the same cell.
///
/// # Example
///
/// ```rust
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use bindery_core::binding::Binder;
///
/// let count = Binder::new(0);
/// let log = Rc::new(RefCell::new(Vec::new()));
///
/// let owner = Rc::clone(&log);
/// count.register(&owner, |log, value| log.borrow_mut().push(*value));
///
/// count.set(5);
/// count.set(5);
/// assert_eq!(*log.borrow(), vec![0, 5, 5]);
/// ```
pub struct Binder<T: Clone + 'static> {
    inner: Rc<BinderInner<T>>,
}

impl<T: Clone + 'static> Binder<T> {
    /// Create a new binder with the given initial value.
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(BinderInner {
                id: BinderId::next(),
                value: RefCell::new(value),
                callback: RefCell::new(None),
                entries: RefCell::new(Vec::new()),
                dispatching: Cell::new(false),
                pending: RefCell::new(VecDeque::new()),
            }),
        }
    }

    /// Create a binder with its own change callback.
    ///
    /// The callback runs on every change, before any subscription. It is not
    /// invoked for the initial value.
    pub fn with_callback<F>(value: T, callback: F) -> Self
    where
        F: Fn(&T) + 'static,
    {
        let binder = Self::new(value);
        binder.set_callback(callback);
        binder
    }

    /// Get the binder's unique ID.
    pub fn id(&self) -> BinderId {
        self.inner.id
    }

    /// Get a clone of the current value.
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Borrow the current value.
    ///
    /// The binder must not be set from inside `f`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Set a new value and notify.
    ///
    /// Always notifies, even if `value` equals the previous value.
    pub fn set(&self, value: T) {
        self.inner.set(value);
    }

    /// Update the value using a function of the current value.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        let next = self.with(f);
        self.set(next);
    }

    /// Replace the binder's own change callback.
    pub fn set_callback<F>(&self, callback: F)
    where
        F: Fn(&T) + 'static,
    {
        *self.inner.callback.borrow_mut() = Some(Rc::new(callback));
    }

    /// Remove the binder's own change callback.
    pub fn clear_callback(&self) {
        self.inner.callback.borrow_mut().take();
    }

    /// Register a callback on behalf of `owner`.
    ///
    /// The callback receives the owner and the new value, and runs once
    /// immediately with the current value. It stops firing as soon as the
    /// owner is dropped. Registering the same owner twice yields two
    /// independent callbacks.
    pub fn register<O, F>(&self, owner: &Rc<O>, callback: F)
    where
        O: ?Sized + 'static,
        F: Fn(&O, &T) + 'static,
    {
        self.inner.purge();

        let weak: Weak<O> = Rc::downgrade(owner);
        let notify: Notify<T> = {
            let weak = weak.clone();
            Rc::new(move |value: &T| {
                if let Some(owner) = weak.upgrade() {
                    callback(&owner, value);
                }
            })
        };

        let key = SubscriptionKey::new();
        self.inner.entries.borrow_mut().push(Entry {
            key,
            owner: Box::new(weak),
            active: Rc::new(Cell::new(true)),
            notify: Rc::clone(&notify),
        });
        trace!(binder = self.inner.id.raw(), subscription = key.raw(), "registered");

        let current = self.get();
        notify(&current);
    }

    /// Remove every subscription registered by `owner`.
    ///
    /// Returns the number of subscriptions removed. Safe to call from the
    /// owner's `Drop` and from inside a notification.
    pub fn deregister<O: ?Sized>(&self, owner: &O) -> usize {
        self.inner.deregister_addr(owner_addr(owner))
    }

    /// Remove every subscription.
    pub fn deregister_all(&self) {
        let removed = self.inner.remove_where(|_| true);
        trace!(binder = self.inner.id.raw(), removed = removed.len(), "deregistered all");
    }

    /// Subscribe without an owner.
    ///
    /// The callback runs once immediately and then on every change until the
    /// returned guard is dropped.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + 'static,
    {
        let token = Rc::new(());
        self.register(&token, move |_, value| callback(value));

        Subscription::new(self.downgrade_erased(), token)
    }

    /// Derive a binder whose value is `f` applied to this binder's value.
    ///
    /// This binder only holds the derived one weakly. Once every handle to
    /// the derived binder is dropped, the mapping stops.
    pub fn transform<U, F>(&self, f: F) -> Binder<U>
    where
        U: Clone + 'static,
        F: Fn(&T) -> U + 'static,
    {
        let derived = Binder::new(self.with(&f));
        self.register(&derived.inner, move |inner, value| inner.set(f(value)));
        derived
    }

    /// Number of subscriptions whose owner is still alive.
    pub fn subscription_count(&self) -> usize {
        self.inner
            .entries
            .borrow()
            .iter()
            .filter(|entry| entry.owner.is_alive())
            .count()
    }

    /// Drop subscriptions whose owner is gone. Returns how many were removed.
    pub fn purge(&self) -> usize {
        self.inner.purge()
    }

    /// Whether a notification pass is running on this binder.
    pub fn is_dispatching(&self) -> bool {
        self.inner.dispatching.get()
    }

    pub(crate) fn downgrade_erased(&self) -> Weak<dyn ErasedBinder> {
        Rc::downgrade(&self.inner) as Weak<dyn ErasedBinder>
    }
}

impl<T: Clone + 'static> Clone for Binder<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + Default + 'static> Default for Binder<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + Debug + 'static> Debug for Binder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binder")
            .field("id", &self.inner.id)
            .field("value", &*self.inner.value.borrow())
            .field("subscription_count", &self.subscription_count())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
