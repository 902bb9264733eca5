//! Bindery Core
//!
//! This crate provides the reactive core of a declarative composition layer
//! over a retained-mode native UI toolkit. It implements:
//!
//! - Observable values with owner-scoped subscriptions
//! - An element tree where each node owns exactly one native view
//! - Dynamic content controllers that swap live views at runtime
//! - A process-wide theme feed and weak handles into the tree
//!
//! Everything runs synchronously on the thread that owns the UI. The types
//! are built on `Rc` and are not `Send`.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `binding`: `Binder`, subscriptions and bindings bags
//! - `view`: native view handles, colors and geometry options
//! - `element`: the `Element` trait, its core, the theme feed and basic elements
//! - `dynamic`: `OneOf`, `DynamicElement`, `Maybe` and `List`
//! - `handle` / `window`: weak handles and the windows and sheets they point at
//!
//! # Example
//!
//! ```rust
//! use bindery_core::binding::Binder;
//! use bindery_core::dynamic::OneOf;
//! use bindery_core::element::{Element, ElementExt, Label};
//!
//! let page = Binder::new(0);
//! let pages = OneOf::new(
//!     &page,
//!     [Label::new("Home").to_element(), Label::new("Settings").to_element()],
//! );
//!
//! assert_eq!(pages.view().subviews()[0].text().as_deref(), Some("Home"));
//!
//! page.set(1);
//! assert_eq!(pages.view().subviews()[0].text().as_deref(), Some("Settings"));
//! ```

pub mod binding;
pub mod dynamic;
pub mod element;
pub mod error;
pub mod handle;
pub mod view;
pub mod window;

pub use binding::{Binder, BindingsBag, Subscription};
pub use dynamic::{DynamicElement, List, Maybe, OneOf};
pub use element::{Element, ElementExt};
pub use error::HandleError;
pub use handle::{ElementHandle, SheetHandle, WeakHandle, WindowHandle};
pub use view::View;
