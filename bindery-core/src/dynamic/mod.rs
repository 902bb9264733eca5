//! Dynamic Content
//!
//! Elements whose displayed subtree changes at runtime. Each controller owns
//! a container view and attaches child views into it in response to a
//! binder.
//!
//! | Controller         | Driver                        | Children                |
//! |--------------------|-------------------------------|-------------------------|
//! | [`OneOf`]          | `Binder<usize>`               | pre-built, swapped      |
//! | [`OneOf::if_else`] | `Binder<bool>`                | two pre-built branches  |
//! | [`DynamicElement`] | `Binder<Option<Rc<dyn Element>>>` | replaced on change  |
//! | [`Maybe`]          | none (decided once)           | element or placeholder  |
//! | [`List`]           | `Binder<Vec<Item>>`           | rebuilt on every change |
//!
//! # Attachment Invariant
//!
//! A controller has at most one attached child view per slot at any
//! instant. Every swap detaches the previous view before attaching the next,
//! so no view ever has two parents.
//!
//! # No Diffing
//!
//! `List` rebuilds every child on every change and `DynamicElement` discards
//! the previous element outright. Nothing is keyed or reused.

mod dynamic_element;
mod list;
mod maybe;
mod one_of;

pub use dynamic_element::{DynamicElement, ElementSlot};
pub use list::List;
pub use maybe::Maybe;
pub use one_of::OneOf;
