//! Windows and Sheets
//!
//! Minimal presentation hosts for an element tree. A window owns its
//! content element and a root view the content is pinned into; it can
//! present at most one sheet at a time. Both can claim weak handles so other
//! code can reach them without extending their lifetime.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, warn};

use crate::element::Element;
use crate::handle::{SheetHandle, WindowHandle};
use crate::view::{EdgeInsets, View, ViewKind};

/// Root view with `content` pinned to its edges.
fn host(content: &Rc<dyn Element>) -> View {
    let root = View::new(ViewKind::Window);
    let view = content.view();
    root.add_subview(&view);
    view.pin_to_superview_edges(EdgeInsets::ZERO);
    root
}

/// Top-level window hosting an element tree.
pub struct Window {
    title: RefCell<String>,
    content: Rc<dyn Element>,
    root: View,
    visible: Cell<bool>,
    sheet: RefCell<Option<Rc<Sheet>>>,
}

impl Window {
    /// Window titled `title` hosting `content`. Starts hidden.
    pub fn new(title: impl Into<String>, content: Rc<dyn Element>) -> Rc<Self> {
        let root = host(&content);
        Rc::new(Self {
            title: RefCell::new(title.into()),
            content,
            root,
            visible: Cell::new(false),
            sheet: RefCell::new(None),
        })
    }

    /// Claim `handle` for this window.
    pub fn bind_window(self: Rc<Self>, handle: &WindowHandle) -> Rc<Self> {
        if let Err(error) = handle.claim(&self) {
            warn!(%error, "window handle not bound");
        }
        self
    }

    /// Current title.
    pub fn title(&self) -> String {
        self.title.borrow().clone()
    }

    /// Change the title.
    pub fn set_title(&self, title: impl Into<String>) {
        *self.title.borrow_mut() = title.into();
    }

    /// The hosted content element.
    pub fn content(&self) -> Rc<dyn Element> {
        Rc::clone(&self.content)
    }

    /// Root view the content is pinned into.
    pub fn root_view(&self) -> View {
        self.root.clone()
    }

    /// Make the window visible.
    pub fn show(&self) {
        self.visible.set(true);
    }

    /// Hide the window, dismissing any presented sheet.
    pub fn close(&self) {
        self.dismiss_sheet();
        self.visible.set(false);
    }

    /// Whether the window is shown.
    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    /// Present `sheet` over this window, replacing any current sheet.
    pub fn present_sheet(self: &Rc<Self>, sheet: Rc<Sheet>) {
        self.dismiss_sheet();
        *sheet.parent.borrow_mut() = Rc::downgrade(self);
        sheet.presented.set(true);
        debug!(sheet = %sheet.title(), "presenting sheet");
        *self.sheet.borrow_mut() = Some(sheet);
    }

    /// Dismiss the presented sheet, handing it back if there was one.
    pub fn dismiss_sheet(&self) -> Option<Rc<Sheet>> {
        let sheet = self.sheet.borrow_mut().take();
        if let Some(sheet) = &sheet {
            sheet.presented.set(false);
            *sheet.parent.borrow_mut() = Weak::new();
        }
        sheet
    }

    /// The presented sheet, if any.
    pub fn sheet(&self) -> Option<Rc<Sheet>> {
        self.sheet.borrow().clone()
    }
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("title", &*self.title.borrow())
            .field("visible", &self.is_visible())
            .field("sheet", &self.sheet.borrow().is_some())
            .finish()
    }
}

/// Modal content presented over a window.
pub struct Sheet {
    title: String,
    content: Rc<dyn Element>,
    root: View,
    presented: Cell<bool>,
    parent: RefCell<Weak<Window>>,
}

impl Sheet {
    /// Sheet titled `title` hosting `content`, not yet presented.
    pub fn new(title: impl Into<String>, content: Rc<dyn Element>) -> Rc<Self> {
        let root = host(&content);
        Rc::new(Self {
            title: title.into(),
            content,
            root,
            presented: Cell::new(false),
            parent: RefCell::new(Weak::new()),
        })
    }

    /// Claim `handle` for this sheet.
    pub fn bind_sheet(self: Rc<Self>, handle: &SheetHandle) -> Rc<Self> {
        if let Err(error) = handle.claim(&self) {
            warn!(%error, "sheet handle not bound");
        }
        self
    }

    /// Sheet title.
    pub fn title(&self) -> String {
        self.title.clone()
    }

    /// The hosted content element.
    pub fn content(&self) -> Rc<dyn Element> {
        Rc::clone(&self.content)
    }

    /// Root view the content is pinned into.
    pub fn root_view(&self) -> View {
        self.root.clone()
    }

    /// Whether a window is currently presenting this sheet.
    pub fn is_presented(&self) -> bool {
        self.presented.get()
    }

    /// Dismiss from the presenting window. No-op when not presented.
    pub fn dismiss(&self) {
        let parent = self.parent.borrow().upgrade();
        if let Some(window) = parent {
            window.dismiss_sheet();
        }
    }
}

impl fmt::Debug for Sheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sheet")
            .field("title", &self.title)
            .field("presented", &self.is_presented())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementExt, Label};

    #[test]
    fn window_hosts_content_pinned() {
        let content = Label::new("body");
        let window = Window::new("Main", content.to_element());

        let view = content.view();
        assert_eq!(view.superview(), Some(window.root_view()));
        assert_eq!(view.pinned_insets(), Some(EdgeInsets::ZERO));
    }

    #[test]
    fn window_handle_follows_window_lifetime() {
        let handle = WindowHandle::new();
        let window = Window::new("Main", Label::new("x").to_element()).bind_window(&handle);

        window.show();
        assert_eq!(handle.title().as_deref(), Some("Main"));
        handle.close();
        assert!(!window.is_visible());

        drop(window);
        assert!(handle.title().is_none());
        // No-op once released.
        handle.close();
    }

    #[test]
    fn sheet_handle_dismisses_and_releases() {
        let handle = SheetHandle::new();
        let window = Window::new("Main", Label::new("x").to_element());
        window.present_sheet(Sheet::new("Confirm", Label::new("Sure?").to_element()).bind_sheet(&handle));

        let sheet = handle.get().expect("sheet is presented");
        assert!(sheet.is_presented());
        drop(sheet);

        handle.dismiss();
        assert!(window.sheet().is_none());
        // Only the window held the sheet.
        assert!(!handle.is_bound());
        handle.dismiss();
    }

    #[test]
    fn presenting_replaces_current_sheet() {
        let window = Window::new("Main", Label::new("x").to_element());
        let first = Sheet::new("one", Label::new("1").to_element());
        let second = Sheet::new("two", Label::new("2").to_element());

        window.present_sheet(Rc::clone(&first));
        window.present_sheet(Rc::clone(&second));

        assert!(!first.is_presented());
        assert!(second.is_presented());

        window.close();
        assert!(!second.is_presented());
    }
}
