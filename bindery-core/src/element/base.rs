//! State shared by every element.

use std::cell::{Cell, OnceCell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::trace;

use super::theme::{ThemeFeed, ThemeToken};
use super::{Element, ElementId};
use crate::binding::BindingsBag;
use crate::view::{DynamicColor, View};

struct ThemeRegistration {
    feed: Weak<ThemeFeed>,
    token: ThemeToken,
}

/// Identity, view slot, bindings and theme state embedded in each element.
///
/// Dropping the core deregisters every binding recorded in its bag and
/// leaves the theme feed.
pub struct ElementCore {
    id: ElementId,
    view: OnceCell<View>,
    bindings: BindingsBag,
    theme: RefCell<Option<ThemeRegistration>>,
    background: Cell<Option<DynamicColor>>,
}

impl ElementCore {
    /// Fresh core with a new id and no view built yet.
    pub fn new() -> Self {
        Self {
            id: ElementId::new(),
            view: OnceCell::new(),
            bindings: BindingsBag::new(),
            theme: RefCell::new(None),
            background: Cell::new(None),
        }
    }

    /// Identity of the owning element.
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// The view, building it with `build` on first use.
    pub fn view_or_init(&self, build: impl FnOnce() -> View) -> View {
        self.view.get_or_init(build).clone()
    }

    /// Whether the view has been built yet.
    pub fn has_view(&self) -> bool {
        self.view.get().is_some()
    }

    /// Bindings owned by this element, torn down with it.
    pub fn bindings(&self) -> &BindingsBag {
        &self.bindings
    }

    /// Whether the element is registered with a theme feed.
    pub fn receives_theme_notifications(&self) -> bool {
        self.theme.borrow().is_some()
    }

    /// The feed this element is registered with, if still alive.
    pub fn theme_feed(&self) -> Option<Rc<ThemeFeed>> {
        self.theme
            .borrow()
            .as_ref()
            .and_then(|registration| registration.feed.upgrade())
    }

    /// Register `element` (the element embedding this core) with `feed`.
    ///
    /// Leaves any previously joined feed first.
    pub(crate) fn start_theme_notifications(&self, element: &Rc<dyn Element>, feed: &Rc<ThemeFeed>) {
        if let Some(current) = self.theme_feed() {
            if Rc::ptr_eq(&current, feed) {
                return;
            }
        }
        self.stop_theme_notifications();

        let token = feed.register(element);
        trace!(element = self.id.raw(), token = token.raw(), "joined theme feed");
        *self.theme.borrow_mut() = Some(ThemeRegistration {
            feed: Rc::downgrade(feed),
            token,
        });
    }

    pub(crate) fn stop_theme_notifications(&self) {
        let registration = self.theme.borrow_mut().take();
        if let Some(registration) = registration {
            if let Some(feed) = registration.feed.upgrade() {
                feed.deregister(registration.token);
            }
            trace!(element = self.id.raw(), "left theme feed");
        }
    }

    pub(crate) fn background(&self) -> Option<DynamicColor> {
        self.background.get()
    }

    pub(crate) fn set_background(&self, color: Option<DynamicColor>) {
        self.background.set(color);
    }
}

impl Default for ElementCore {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ElementCore {
    fn drop(&mut self) {
        self.stop_theme_notifications();
    }
}

impl fmt::Debug for ElementCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementCore")
            .field("id", &self.id)
            .field("view", &self.view.get())
            .field("bindings", &self.bindings.len())
            .field("theme", &self.receives_theme_notifications())
            .finish()
    }
}
