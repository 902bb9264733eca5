//! Element swapped wholesale from a binder.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::binding::Binder;
use crate::element::{Element, ElementCore};
use crate::view::{EdgeInsets, View};

/// Value type driving a [`DynamicElement`].
pub type ElementSlot = Option<Rc<dyn Element>>;

/// Displays whatever element its binder currently holds.
///
/// On every change the previous element is detached and released; if the
/// binder held the last reference, its bindings go with it. `None` shows
/// nothing.
pub struct DynamicElement {
    core: ElementCore,
    current: RefCell<ElementSlot>,
    driver: Binder<ElementSlot>,
}

impl DynamicElement {
    /// Displays `element`'s current value and follows its changes.
    pub fn new(element: &Binder<ElementSlot>) -> Rc<Self> {
        let this = Rc::new(Self {
            core: ElementCore::new(),
            current: RefCell::new(None),
            driver: element.clone(),
        });
        this.core
            .bindings()
            .register(&this.driver, &this, |this, next| this.swap(next.clone()));
        this
    }

    /// The element currently displayed.
    pub fn current(&self) -> ElementSlot {
        self.current.borrow().clone()
    }

    fn swap(&self, next: ElementSlot) {
        let container = self.view();

        let previous = self.current.borrow_mut().take();
        if let Some(previous) = &previous {
            previous.view().remove_from_superview();
        }

        if let Some(element) = &next {
            let view = element.view();
            container.add_subview(&view);
            view.pin_to_superview_edges(EdgeInsets::ZERO);
        }

        debug!(
            element = self.id().raw(),
            previous = ?previous.as_ref().map(|e| e.id().raw()),
            next = ?next.as_ref().map(|e| e.id().raw()),
            "dynamic element swapped"
        );

        *self.current.borrow_mut() = next;
        // Released here, after the slot is updated.
        drop(previous);
    }
}

impl Element for DynamicElement {
    fn core(&self) -> &ElementCore {
        &self.core
    }

    fn build_view(&self) -> View {
        View::container()
    }

    fn child_elements(&self) -> Vec<Rc<dyn Element>> {
        self.current.borrow().iter().cloned().collect()
    }
}
