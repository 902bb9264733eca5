//! Element Tree
//!
//! An element is a lightweight node in the declarative UI tree. Each element
//! owns exactly one native [`View`], built lazily the first time it is asked
//! for, and enumerates its logical children.
//!
//! # Composition
//!
//! Elements do not inherit from one another. A concrete element embeds an
//! [`ElementCore`] (identity, lazily built view, bindings, theme
//! registration) and implements [`Element`]:
//!
//! - `core()` hands out the embedded core
//! - `build_view()` creates the native view, called at most once
//! - `child_elements()` enumerates children (empty for leaves)
//! - `on_theme_change()` refreshes cached, non-adapting attributes
//!
//! Shared behavior (identifiers, hidden bindings, theme colors, traversal)
//! lives on [`ElementExt`], implemented for `Rc<E>` and `Rc<dyn Element>`.
//!
//! # Teardown
//!
//! Everything an element registers through its core is recorded in the
//! core's [`BindingsBag`](crate::binding::BindingsBag). Dropping the element
//! deregisters all of it, along with its theme registration, so teardown is
//! deterministic rather than waiting for weak owners to be purged.

mod base;
mod label;
mod stack;
mod theme;

use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::warn;

use crate::binding::Binder;
use crate::handle::ElementHandle;
use crate::view::{Appearance, DynamicColor, View};

pub use base::ElementCore;
pub use label::{Label, Nothing};
pub use stack::{Stack, DEFAULT_SPACING};
pub use theme::{ThemeFeed, ThemeToken};

/// Stable identity of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(u64);

impl ElementId {
    /// Generate a new unique element ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

/// A node in the element tree.
pub trait Element: 'static {
    /// The embedded core.
    fn core(&self) -> &ElementCore;

    /// Create the native view for this element.
    ///
    /// Called at most once, from [`view`](Self::view). Must not call
    /// `self.view()`.
    fn build_view(&self) -> View;

    /// Logical children, in order. Empty by default.
    fn child_elements(&self) -> Vec<Rc<dyn Element>> {
        Vec::new()
    }

    /// Hook run after the appearance changed, for elements that opted into
    /// theme notifications.
    fn on_theme_change(&self, _appearance: Appearance) {}

    /// The element's native view. Always the same instance.
    fn view(&self) -> View {
        self.core().view_or_init(|| self.build_view())
    }

    /// Stable identity.
    fn id(&self) -> ElementId {
        self.core().id()
    }
}

fn walk(element: &dyn Element, visitor: &mut dyn FnMut(&dyn Element)) {
    visitor(element);
    for child in element.child_elements() {
        walk(&*child, visitor);
    }
}

impl dyn Element {
    /// Pre-order depth-first traversal: this element, then each child's
    /// subtree in order.
    pub fn apply_recursively(&self, visitor: &mut dyn FnMut(&dyn Element)) {
        walk(self, visitor);
    }

    /// Number of elements in this subtree, including this one.
    pub fn descendant_count(&self) -> usize {
        let mut count = 0;
        walk(self, &mut |_| count += 1);
        count
    }

    /// View of the first element in this subtree whose identifier matches.
    pub fn find_view(&self, identifier: &str) -> Option<View> {
        let mut found = None;
        walk(self, &mut |element| {
            if found.is_none() {
                let view = element.view();
                if view.identifier().as_deref() == Some(identifier) {
                    found = Some(view);
                }
            }
        });
        found
    }

    /// Re-resolve cached colors for `appearance`, then run the hook.
    pub(crate) fn apply_theme(&self, appearance: Appearance) {
        if let Some(color) = self.core().background() {
            self.view().set_layer_background(Some(color.resolve(appearance)));
        }
        self.on_theme_change(appearance);
    }
}

/// Fluent configuration shared by every element.
///
/// Setters consume and return the handle so they chain:
///
/// ```rust
/// use bindery_core::binding::Binder;
/// use bindery_core::element::{Element, ElementExt, Label};
///
/// let hidden = Binder::new(false);
/// let label = Label::new("Title")
///     .identifier("title")
///     .bind_is_hidden(&hidden);
///
/// hidden.set(true);
/// assert!(label.view().is_hidden());
/// ```
pub trait ElementExt: Sized {
    /// This handle as a trait object.
    fn to_element(&self) -> Rc<dyn Element>;

    /// Set the accessibility identifier on the view.
    fn identifier(self, identifier: impl Into<String>) -> Self {
        self.to_element()
            .view()
            .set_identifier(Some(identifier.into()));
        self
    }

    /// Set the view's hidden flag once.
    fn hidden(self, hidden: bool) -> Self {
        self.to_element().view().set_hidden(hidden);
        self
    }

    /// Set the view's tooltip.
    fn tooltip(self, tooltip: impl Into<String>) -> Self {
        self.to_element().view().set_tooltip(Some(tooltip.into()));
        self
    }

    /// Drive the view's hidden flag from `binder`.
    fn bind_is_hidden(self, binder: &Binder<bool>) -> Self {
        let element = self.to_element();
        element
            .core()
            .bindings()
            .register(binder, &element, |element, hidden| {
                element.view().set_hidden(*hidden);
            });
        self
    }

    /// Give the view a theme-aware layer background.
    ///
    /// The layer only stores raw colors, so the element opts into theme
    /// notifications to re-resolve it when the appearance changes.
    fn background_color(self, color: impl Into<DynamicColor>) -> Self {
        let color = color.into();
        let element = self.to_element();
        let core = element.core();
        core.set_background(Some(color));

        let feed = core.theme_feed().unwrap_or_else(ThemeFeed::shared);
        if !core.receives_theme_notifications() {
            core.start_theme_notifications(&element, &feed);
        }
        element
            .view()
            .set_layer_background(Some(color.resolve(feed.appearance())));
        self
    }

    /// Opt into or out of the shared theme feed.
    fn receive_theme_notifications(self, receive: bool) -> Self {
        let element = self.to_element();
        if receive {
            element
                .core()
                .start_theme_notifications(&element, &ThemeFeed::shared());
        } else {
            element.core().stop_theme_notifications();
        }
        self
    }

    /// Opt into a specific theme feed.
    fn receive_theme_notifications_from(self, feed: &Rc<ThemeFeed>) -> Self {
        let element = self.to_element();
        element.core().start_theme_notifications(&element, feed);
        self
    }

    /// Claim `handle` so later code can reach this element.
    fn bind_element(self, handle: &ElementHandle) -> Self {
        let element = self.to_element();
        if let Err(error) = handle.claim(&element) {
            warn!(element = element.id().raw(), %error, "element handle not bound");
        }
        self
    }

    /// Pre-order depth-first traversal of this subtree.
    fn apply_recursively(&self, mut visitor: impl FnMut(&dyn Element)) {
        let element = self.to_element();
        walk(&*element, &mut visitor);
    }

    /// View of the first element in this subtree with a matching identifier.
    fn find_view(&self, identifier: &str) -> Option<View> {
        let element = self.to_element();
        // Deref so the inherent method on `dyn Element` is chosen.
        (*element).find_view(identifier)
    }
}

impl<E: Element> ElementExt for Rc<E> {
    fn to_element(&self) -> Rc<dyn Element> {
        let element: Rc<dyn Element> = self.clone();
        element
    }
}

impl ElementExt for Rc<dyn Element> {
    fn to_element(&self) -> Rc<dyn Element> {
        Rc::clone(self)
    }
}
