//! Weak Handles
//!
//! A handle is a slot that a producer (an element, window or sheet) claims
//! once and unrelated code reads later, for example to anchor a popover to a
//! particular descendant's view. Handles never keep their target alive: once
//! the target is torn down every accessor returns `None` or does nothing.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::element::Element;
use crate::error::HandleError;
use crate::view::View;
use crate::window::{Sheet, Window};

/// Non-owning, claim-once reference to a `T`.
pub struct WeakHandle<T: ?Sized> {
    target: RefCell<Option<Weak<T>>>,
}

/// Handle to an element in the tree.
pub type ElementHandle = WeakHandle<dyn Element>;

/// Handle to a window.
pub type WindowHandle = WeakHandle<Window>;

/// Handle to a sheet.
pub type SheetHandle = WeakHandle<Sheet>;

impl<T: ?Sized> WeakHandle<T> {
    /// Create an unclaimed handle.
    pub fn new() -> Self {
        Self {
            target: RefCell::new(None),
        }
    }

    /// Bind the handle to `target`.
    ///
    /// Claiming again with the same target is a no-op. Claiming with a
    /// different target fails while the current one is alive; once it has
    /// been released the handle may be claimed afresh.
    pub fn claim(&self, target: &Rc<T>) -> Result<(), HandleError> {
        if let Some(current) = self.get() {
            if same_target(&current, target) {
                return Ok(());
            }
            return Err(HandleError::AlreadyClaimed);
        }
        *self.target.borrow_mut() = Some(Rc::downgrade(target));
        Ok(())
    }

    /// The target, if claimed and still alive.
    pub fn get(&self) -> Option<Rc<T>> {
        self.target.borrow().as_ref().and_then(Weak::upgrade)
    }

    /// The target, or why it is unavailable.
    pub fn require(&self) -> Result<Rc<T>, HandleError> {
        match self.target.borrow().as_ref() {
            None => Err(HandleError::Unclaimed),
            Some(weak) => weak.upgrade().ok_or(HandleError::Released),
        }
    }

    /// Whether the handle currently resolves to a live target.
    pub fn is_bound(&self) -> bool {
        self.target
            .borrow()
            .as_ref()
            .is_some_and(|weak| weak.strong_count() > 0)
    }
}

fn same_target<T: ?Sized>(a: &Rc<T>, b: &Rc<T>) -> bool {
    Rc::as_ptr(a).cast::<()>() == Rc::as_ptr(b).cast::<()>()
}

impl<T: ?Sized> Default for WeakHandle<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for WeakHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakHandle")
            .field("bound", &self.is_bound())
            .finish()
    }
}

impl WeakHandle<dyn Element> {
    /// View of the claimed element.
    pub fn view(&self) -> Option<View> {
        self.get().map(|element| element.view())
    }
}

impl WeakHandle<Window> {
    /// Close the window, if it still exists.
    pub fn close(&self) {
        if let Some(window) = self.get() {
            window.close();
        }
    }

    /// Title of the window, if it still exists.
    pub fn title(&self) -> Option<String> {
        self.get().map(|window| window.title())
    }
}

impl WeakHandle<Sheet> {
    /// Dismiss the sheet, if it still exists.
    pub fn dismiss(&self) {
        if let Some(sheet) = self.get() {
            sheet.dismiss();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementExt, Label};

    #[test]
    fn unclaimed_handle_is_absent() {
        let handle = ElementHandle::new();
        assert!(handle.get().is_none());
        assert!(handle.view().is_none());
        assert_eq!(handle.require().err(), Some(HandleError::Unclaimed));
    }

    #[test]
    fn claimed_handle_resolves_without_owning() {
        let handle = ElementHandle::new();
        let label = Label::new("x").bind_element(&handle);

        assert!(handle.is_bound());
        assert_eq!(handle.view(), Some(label.view()));

        drop(label);
        assert!(!handle.is_bound());
        assert!(handle.view().is_none());
        assert_eq!(handle.require().err(), Some(HandleError::Released));
    }

    #[test]
    fn second_live_claim_is_rejected() {
        let handle = WeakHandle::<String>::new();
        let first = Rc::new(String::from("first"));
        let second = Rc::new(String::from("second"));

        assert!(handle.claim(&first).is_ok());
        assert!(handle.claim(&first).is_ok());
        assert_eq!(handle.claim(&second), Err(HandleError::AlreadyClaimed));

        drop(first);
        assert!(handle.claim(&second).is_ok());
        assert_eq!(handle.get().as_deref().map(String::as_str), Some("second"));
    }
}
