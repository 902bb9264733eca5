//! Binding Primitives
//!
//! This module implements the observable value container and its
//! subscription lifecycle. Every reactive property in the element tree is
//! driven through these types.
//!
//! # Concepts
//!
//! ## Binders
//!
//! A [`Binder`] is a mutable cell holding a value of type `T`. Setting the
//! value synchronously notifies every live subscription, in registration
//! order, on the calling thread. There is no equality check: setting the same
//! value twice notifies twice.
//!
//! ## Subscriptions
//!
//! A subscription pairs a weakly held owner with a callback. The callback only
//! fires while the owner is alive, and dead entries are purged on the next
//! registration. Registering always invokes the callback once with the
//! current value.
//!
//! [`Binder::subscribe`] is the owner-less form: it returns a [`Subscription`]
//! guard that stops delivery when dropped.
//!
//! ## Bindings Bags
//!
//! A [`BindingsBag`] records `(binder, owner)` pairs so a composite consumer
//! can tear all of them down at once. Every element carries one in its core,
//! which is what makes element teardown deterministic.
//!
//! # Threading
//!
//! Binders are built on `Rc` and `RefCell` and are therefore `!Send`. The
//! single-thread contract is checked by the compiler rather than at runtime.

mod bag;
mod binder;
mod subscription;

pub use bag::BindingsBag;
pub use binder::{Binder, BinderId};
pub use subscription::{Subscription, SubscriptionKey};

