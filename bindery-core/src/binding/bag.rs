//! Bindings Bag
//!
//! Collects `(binder, owner)` pairs registered on behalf of one consumer so
//! they can all be torn down together.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::trace;

use super::subscription::{ErasedBinder, OwnerRef};
use super::Binder;

struct Held {
    binder: Weak<dyn ErasedBinder>,
    /// Weak owner. Keeps the allocation, and so the address, from being
    /// reused by another owner while the bag still refers to it.
    owner: Box<dyn OwnerRef>,
}

/// Registry of bindings torn down as a unit.
///
/// The bag holds binders weakly; a binder dropped before the bag simply has
/// nothing left to deregister. Dropping the bag deregisters everything it
/// recorded.
#[derive(Default)]
pub struct BindingsBag {
    held: RefCell<Vec<Held>>,
}

impl BindingsBag {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` on `binder` for `owner` and record the pair.
    pub fn register<T, O, F>(&self, binder: &Binder<T>, owner: &Rc<O>, callback: F)
    where
        T: Clone + 'static,
        O: ?Sized + 'static,
        F: Fn(&O, &T) + 'static,
    {
        binder.register(owner, callback);
        self.insert(binder, owner);
    }

    /// Record a registration made elsewhere.
    pub fn insert<T, O>(&self, binder: &Binder<T>, owner: &Rc<O>)
    where
        T: Clone + 'static,
        O: ?Sized + 'static,
    {
        let owner: Box<dyn OwnerRef> = Box::new(Rc::downgrade(owner));
        let binder = binder.downgrade_erased();
        let mut held = self.held.borrow_mut();
        // One deregister per pair removes every registration for it.
        let known = held
            .iter()
            .any(|h| h.owner.addr() == owner.addr() && Weak::ptr_eq(&h.binder, &binder));
        if !known {
            held.push(Held { binder, owner });
        }
    }

    /// Deregister every recorded pair and empty the bag.
    pub fn clear(&self) {
        let held = std::mem::take(&mut *self.held.borrow_mut());
        let mut removed = 0;
        for pair in &held {
            if let Some(binder) = pair.binder.upgrade() {
                removed += binder.deregister_addr(pair.owner.addr());
            }
        }
        if !held.is_empty() {
            trace!(pairs = held.len(), removed, "bindings bag cleared");
        }
    }

    /// Number of recorded `(binder, owner)` pairs.
    pub fn len(&self) -> usize {
        self.held.borrow().len()
    }

    /// Whether the bag holds nothing.
    pub fn is_empty(&self) -> bool {
        self.held.borrow().is_empty()
    }
}

impl Drop for BindingsBag {
    fn drop(&mut self) {
        self.clear();
    }
}

impl fmt::Debug for BindingsBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingsBag")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn clear_deregisters_all_pairs() {
        let name = Binder::new(String::from("a"));
        let count = Binder::new(0);
        let owner = Rc::new(Cell::new(0));
        let bag = BindingsBag::new();

        bag.register(&name, &owner, |o, _| o.set(o.get() + 1));
        bag.register(&count, &owner, |o, _| o.set(o.get() + 1));
        assert_eq!(owner.get(), 2);
        assert_eq!(bag.len(), 2);

        bag.clear();
        assert!(bag.is_empty());
        name.set("b".into());
        count.set(1);

        assert_eq!(owner.get(), 2);
        assert_eq!(name.subscription_count(), 0);
        assert_eq!(count.subscription_count(), 0);
    }

    #[test]
    fn drop_deregisters() {
        let binder = Binder::new(0);
        let owner = Rc::new(());
        {
            let bag = BindingsBag::new();
            bag.register(&binder, &owner, |_, _| {});
            bag.register(&binder, &owner, |_, _| {});
            // Same pair is recorded once.
            assert_eq!(bag.len(), 1);
            assert_eq!(binder.subscription_count(), 2);
        }
        assert_eq!(binder.subscription_count(), 0);
    }

    #[test]
    fn binder_dropped_before_bag() {
        let bag = BindingsBag::new();
        let owner = Rc::new(());
        {
            let binder = Binder::new(1);
            bag.register(&binder, &owner, |_, _| {});
        }
        // Nothing to deregister; must not panic.
        bag.clear();
        assert!(bag.is_empty());
    }

    #[test]
    fn insert_records_existing_registration() {
        let binder = Binder::new(0);
        let owner = Rc::new(());
        binder.register(&owner, |_, _| {});

        let bag = BindingsBag::new();
        bag.insert(&binder, &owner);
        drop(bag);

        assert_eq!(binder.subscription_count(), 0);
    }

    #[test]
    fn bag_outliving_owner_leaves_other_owners_alone() {
        let binder = Binder::new(0_u64);
        let bag = BindingsBag::new();
        {
            let owner = Rc::new(Cell::new(0_u64));
            bag.register(&binder, &owner, |o, v| o.set(*v));
        }
        binder.purge();

        // Same size as the dropped owner, so a freed slot would be reused.
        let others: Vec<Rc<Cell<u64>>> = (0..8).map(|_| Rc::new(Cell::new(0))).collect();
        for other in &others {
            binder.register(other, |o, v| o.set(*v));
        }

        bag.clear();
        binder.set(7);

        assert_eq!(binder.subscription_count(), others.len());
        assert!(others.iter().all(|other| other.get() == 7));
    }
}
