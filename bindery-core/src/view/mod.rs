//! Native View Handles
//!
//! This module defines the view handle the element tree drives. A [`View`]
//! is the in-process stand-in for one native toolkit view: it has a parent,
//! an ordered list of subviews, a hidden flag, optional text content and a
//! raw layer color.
//!
//! # Ownership
//!
//! A view holds its subviews strongly and its superview weakly, mirroring a
//! retained-mode toolkit. A view has at most one superview at any instant;
//! [`View::add_subview`] detaches a view from its current superview before
//! attaching it, and logs a warning when it has to.

mod color;

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::warn;

pub use color::{Appearance, Color, DynamicColor};

/// Unique identifier for a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(u64);

impl ViewId {
    fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Stacking direction for stack views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Children laid out top to bottom.
    #[default]
    Vertical,
    /// Children laid out leading to trailing.
    Horizontal,
}

/// Insets used when pinning a view to its superview's edges.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeInsets {
    pub top: f64,
    pub leading: f64,
    pub bottom: f64,
    pub trailing: f64,
}

impl EdgeInsets {
    /// No inset on any edge.
    pub const ZERO: Self = Self::uniform(0.0);

    /// The same inset on every edge.
    pub const fn uniform(inset: f64) -> Self {
        Self {
            top: inset,
            leading: inset,
            bottom: inset,
            trailing: inset,
        }
    }
}

/// What kind of native view a handle stands for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewKind {
    /// Plain container with no intrinsic content.
    Container,
    /// Stack container.
    Stack {
        orientation: Orientation,
        spacing: f64,
    },
    /// Text label.
    Label,
    /// Invisible, zero-content placeholder.
    Placeholder,
    /// Root content view of a window or sheet.
    Window,
}

struct ViewInner {
    id: ViewId,
    kind: ViewKind,
    superview: RefCell<Weak<ViewInner>>,
    subviews: RefCell<Vec<View>>,
    hidden: Cell<bool>,
    text: RefCell<Option<String>>,
    tooltip: RefCell<Option<String>>,
    identifier: RefCell<Option<String>>,
    layer_background: Cell<Option<Color>>,
    pinned: Cell<Option<EdgeInsets>>,
}

/// Handle to a native view.
///
/// Cloning yields another handle to the same view. Equality is identity.
#[derive(Clone)]
pub struct View {
    inner: Rc<ViewInner>,
}

impl View {
    /// Create a detached view of the given kind.
    pub fn new(kind: ViewKind) -> Self {
        Self {
            inner: Rc::new(ViewInner {
                id: ViewId::next(),
                kind,
                superview: RefCell::new(Weak::new()),
                subviews: RefCell::new(Vec::new()),
                hidden: Cell::new(false),
                text: RefCell::new(None),
                tooltip: RefCell::new(None),
                identifier: RefCell::new(None),
                layer_background: Cell::new(None),
                pinned: Cell::new(None),
            }),
        }
    }

    /// Plain container view.
    pub fn container() -> Self {
        Self::new(ViewKind::Container)
    }

    /// Stack view.
    pub fn stack(orientation: Orientation, spacing: f64) -> Self {
        Self::new(ViewKind::Stack {
            orientation,
            spacing,
        })
    }

    /// Label view showing `text`.
    pub fn label(text: impl Into<String>) -> Self {
        let view = Self::new(ViewKind::Label);
        view.set_text(Some(text.into()));
        view
    }

    /// Empty, hidden placeholder view.
    pub fn placeholder() -> Self {
        let view = Self::new(ViewKind::Placeholder);
        view.set_hidden(true);
        view
    }

    /// Stable identity of this view.
    pub fn id(&self) -> ViewId {
        self.inner.id
    }

    /// What kind of native view this is.
    pub fn kind(&self) -> ViewKind {
        self.inner.kind
    }

    // ------------------------------------------------------------------------
    // Hierarchy
    // ------------------------------------------------------------------------

    /// The view this one is attached to, if any.
    pub fn superview(&self) -> Option<View> {
        self.inner
            .superview
            .borrow()
            .upgrade()
            .map(|inner| View { inner })
    }

    /// Snapshot of the attached subviews, in order.
    pub fn subviews(&self) -> Vec<View> {
        self.inner.subviews.borrow().clone()
    }

    /// Number of attached subviews.
    pub fn subview_count(&self) -> usize {
        self.inner.subviews.borrow().len()
    }

    /// Whether `child` is a direct subview of this view.
    pub fn contains(&self, child: &View) -> bool {
        child
            .superview()
            .is_some_and(|parent| parent == *self)
    }

    /// Append `child` as the last subview.
    ///
    /// A view cannot have two superviews. If `child` is still attached
    /// somewhere it is detached first. Adding a view to itself or to one of
    /// its own descendants is refused, since it would close a cycle.
    pub fn add_subview(&self, child: &View) {
        if self.has_ancestor_or_self(child) {
            warn!(
                view = child.id().raw(),
                to = self.id().raw(),
                "refusing to add a view inside its own subtree"
            );
            return;
        }
        if let Some(current) = child.superview() {
            warn!(
                view = child.id().raw(),
                from = current.id().raw(),
                to = self.id().raw(),
                "view already has a superview; detaching first"
            );
            child.remove_from_superview();
        }
        *child.inner.superview.borrow_mut() = Rc::downgrade(&self.inner);
        self.inner.subviews.borrow_mut().push(child.clone());
    }

    fn has_ancestor_or_self(&self, candidate: &View) -> bool {
        let mut current = Some(self.clone());
        while let Some(view) = current {
            if view == *candidate {
                return true;
            }
            current = view.superview();
        }
        false
    }

    /// Detach this view from its superview. No-op when detached.
    ///
    /// Pinning constraints are dropped along with the parent.
    pub fn remove_from_superview(&self) {
        let parent = self.inner.superview.replace(Weak::new()).upgrade();
        if let Some(parent) = parent {
            let removed: Vec<View> = {
                let mut subviews = parent.subviews.borrow_mut();
                let (removed, kept) = std::mem::take(&mut *subviews)
                    .into_iter()
                    .partition(|view| view.id() == self.id());
                *subviews = kept;
                removed
            };
            drop(removed);
        }
        self.inner.pinned.set(None);
    }

    /// Detach every subview, in order.
    pub fn remove_all_subviews(&self) {
        let subviews = std::mem::take(&mut *self.inner.subviews.borrow_mut());
        for view in &subviews {
            *view.inner.superview.borrow_mut() = Weak::new();
            view.inner.pinned.set(None);
        }
    }

    /// Constrain this view to its superview's edges.
    ///
    /// Ignored (with a warning) when the view has no superview.
    pub fn pin_to_superview_edges(&self, insets: EdgeInsets) {
        if self.superview().is_none() {
            warn!(view = self.id().raw(), "cannot pin a view without a superview");
            return;
        }
        self.inner.pinned.set(Some(insets));
    }

    /// Insets of the active edge pinning, if any.
    pub fn pinned_insets(&self) -> Option<EdgeInsets> {
        self.inner.pinned.get()
    }

    /// Depth-first search of this view and its descendants by identifier.
    pub fn find(&self, identifier: &str) -> Option<View> {
        if self.identifier().as_deref() == Some(identifier) {
            return Some(self.clone());
        }
        self.subviews()
            .iter()
            .find_map(|child| child.find(identifier))
    }

    // ------------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------------

    /// Whether the view is hidden.
    pub fn is_hidden(&self) -> bool {
        self.inner.hidden.get()
    }

    /// Show or hide the view.
    pub fn set_hidden(&self, hidden: bool) {
        self.inner.hidden.set(hidden);
    }

    /// Text content, if any.
    pub fn text(&self) -> Option<String> {
        self.inner.text.borrow().clone()
    }

    /// Replace the text content.
    pub fn set_text(&self, text: Option<String>) {
        *self.inner.text.borrow_mut() = text;
    }

    /// Tooltip text, if any.
    pub fn tooltip(&self) -> Option<String> {
        self.inner.tooltip.borrow().clone()
    }

    /// Replace the tooltip text.
    pub fn set_tooltip(&self, tooltip: Option<String>) {
        *self.inner.tooltip.borrow_mut() = tooltip;
    }

    /// Accessibility identifier.
    pub fn identifier(&self) -> Option<String> {
        self.inner.identifier.borrow().clone()
    }

    /// Replace the accessibility identifier.
    pub fn set_identifier(&self, identifier: Option<String>) {
        *self.inner.identifier.borrow_mut() = identifier;
    }

    /// Raw layer background color. Does not follow appearance changes.
    pub fn layer_background(&self) -> Option<Color> {
        self.inner.layer_background.get()
    }

    /// Set the raw layer color.
    pub fn set_layer_background(&self, color: Option<Color>) {
        self.inner.layer_background.set(color);
    }
}

impl PartialEq for View {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for View {}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("id", &self.inner.id)
            .field("kind", &self.inner.kind)
            .field("subviews", &self.subview_count())
            .field("hidden", &self.is_hidden())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_remove_subview() {
        let parent = View::container();
        let child = View::label("hi");

        parent.add_subview(&child);
        assert_eq!(child.superview(), Some(parent.clone()));
        assert!(parent.contains(&child));
        assert_eq!(parent.subviews(), vec![child.clone()]);

        child.remove_from_superview();
        assert!(child.superview().is_none());
        assert_eq!(parent.subview_count(), 0);
    }

    #[test]
    fn remove_from_superview_when_detached_is_noop() {
        let view = View::container();
        view.remove_from_superview();
        assert!(view.superview().is_none());
    }

    #[test]
    fn adding_to_second_parent_detaches_from_first() {
        let a = View::container();
        let b = View::container();
        let child = View::container();

        a.add_subview(&child);
        b.add_subview(&child);

        assert_eq!(a.subview_count(), 0);
        assert_eq!(b.subviews(), vec![child.clone()]);
        assert_eq!(child.superview(), Some(b));
    }

    #[test]
    fn subviews_keep_insertion_order() {
        let parent = View::stack(Orientation::Vertical, 4.0);
        let views: Vec<View> = (0..3).map(|i| View::label(i.to_string())).collect();
        for view in &views {
            parent.add_subview(view);
        }
        assert_eq!(parent.subviews(), views);
    }

    #[test]
    fn remove_all_subviews_clears_parents() {
        let parent = View::container();
        let a = View::container();
        let b = View::container();
        parent.add_subview(&a);
        parent.add_subview(&b);
        a.pin_to_superview_edges(EdgeInsets::ZERO);

        parent.remove_all_subviews();

        assert_eq!(parent.subview_count(), 0);
        assert!(a.superview().is_none());
        assert!(b.superview().is_none());
        assert!(a.pinned_insets().is_none());
    }

    #[test]
    fn pinning_requires_superview_and_is_cleared_on_removal() {
        let parent = View::container();
        let child = View::container();

        child.pin_to_superview_edges(EdgeInsets::uniform(4.0));
        assert!(child.pinned_insets().is_none());

        parent.add_subview(&child);
        child.pin_to_superview_edges(EdgeInsets::uniform(4.0));
        assert_eq!(child.pinned_insets(), Some(EdgeInsets::uniform(4.0)));

        child.remove_from_superview();
        assert!(child.pinned_insets().is_none());
    }

    #[test]
    fn superview_is_weak() {
        let child = View::container();
        {
            let parent = View::container();
            parent.add_subview(&child);
        }
        assert!(child.superview().is_none());
    }

    #[test]
    fn placeholder_is_hidden_and_empty() {
        let view = View::placeholder();
        assert!(view.is_hidden());
        assert!(view.text().is_none());
        assert_eq!(view.kind(), ViewKind::Placeholder);
    }

    #[test]
    fn find_by_identifier() {
        let root = View::container();
        let inner = View::container();
        let leaf = View::label("x");
        leaf.set_identifier(Some("leaf".into()));
        root.add_subview(&inner);
        inner.add_subview(&leaf);

        assert_eq!(root.find("leaf"), Some(leaf));
        assert!(root.find("missing").is_none());
    }

    #[test]
    fn adding_an_ancestor_is_refused() {
        let root = View::container();
        let middle = View::container();
        let leaf = View::container();
        root.add_subview(&middle);
        middle.add_subview(&leaf);

        leaf.add_subview(&root);
        leaf.add_subview(&leaf);

        assert_eq!(leaf.subview_count(), 0);
        assert!(root.superview().is_none());
        assert_eq!(root.subviews(), vec![middle.clone()]);
        assert_eq!(leaf.superview(), Some(middle));
    }
}
