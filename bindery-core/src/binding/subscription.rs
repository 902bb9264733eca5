//! Subscription types for the binding system.
//!
//! A subscription is one `(owner, callback)` pair registered on a binder.
//! Owners are held weakly and identified by address, so an owner that
//! registered several times can be removed in one call.

use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a single registration.
///
/// Two registrations by the same owner get two different keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionKey(u64);

impl SubscriptionKey {
    /// Generate a new unique key.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw key value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for SubscriptionKey {
    fn default() -> Self {
        Self::new()
    }
}

/// Address used to identify an owner.
///
/// Matches `Rc::as_ptr` for the same object, so `deregister(&*rc)` and
/// `register(&rc, ..)` agree, including from inside the owner's `Drop`.
pub(crate) fn owner_addr<O: ?Sized>(owner: &O) -> usize {
    (owner as *const O).cast::<()>() as usize
}

/// Type-erased weak owner reference.
pub(crate) trait OwnerRef {
    /// Whether the owner still has strong references.
    fn is_alive(&self) -> bool;

    /// The owner's address, valid for comparison even after it dies.
    fn addr(&self) -> usize;
}

impl<O: ?Sized> OwnerRef for Weak<O> {
    fn is_alive(&self) -> bool {
        self.strong_count() > 0
    }

    fn addr(&self) -> usize {
        self.as_ptr().cast::<()>() as usize
    }
}

/// Type-erased view of a binder, enough to tear registrations down.
///
/// Used by [`Subscription`] and [`BindingsBag`](super::BindingsBag), which
/// must hold binders of any value type.
pub(crate) trait ErasedBinder {
    /// Remove every registration whose owner lives at `addr`.
    fn deregister_addr(&self, addr: usize) -> usize;
}

/// Guard for an owner-less subscription created by
/// [`Binder::subscribe`](super::Binder::subscribe).
///
/// Dropping the guard (or calling [`dispose`](Self::dispose)) removes the
/// registration immediately. The binder is held weakly, so the guard never
/// keeps a binder alive.
pub struct Subscription {
    binder: Weak<dyn ErasedBinder>,
    /// Stand-in owner. The registration is alive exactly as long as this is.
    token: Option<Rc<()>>,
}

impl Subscription {
    pub(crate) fn new(binder: Weak<dyn ErasedBinder>, token: Rc<()>) -> Self {
        Self {
            binder,
            token: Some(token),
        }
    }

    /// Stop receiving updates.
    pub fn dispose(mut self) {
        self.release();
    }

    /// Whether the subscription can still fire.
    ///
    /// False once disposed or once the binder has been dropped.
    pub fn is_active(&self) -> bool {
        self.token.is_some() && self.binder.strong_count() > 0
    }

    fn release(&mut self) {
        if let Some(token) = self.token.take() {
            if let Some(binder) = self.binder.upgrade() {
                binder.deregister_addr(owner_addr(&*token));
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
