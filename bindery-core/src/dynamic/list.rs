//! Rebuild-everything list.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::binding::Binder;
use crate::element::{Element, ElementCore, DEFAULT_SPACING};
use crate::view::{Orientation, View};

type MapFn<Item> = Box<dyn Fn(&Item) -> Rc<dyn Element>>;

/// One child per item, rebuilt from scratch on every change.
///
/// Each update detaches all current child views in order, releases their
/// elements, then maps every new item and appends its view. Items are not
/// keyed; an unchanged item still gets a fresh element.
pub struct List<Item: Clone + 'static> {
    core: ElementCore,
    orientation: Orientation,
    map: MapFn<Item>,
    children: RefCell<Vec<Rc<dyn Element>>>,
    driver: Binder<Vec<Item>>,
}

impl<Item: Clone + 'static> List<Item> {
    /// Vertical list.
    pub fn new<F>(items: &Binder<Vec<Item>>, map: F) -> Rc<Self>
    where
        F: Fn(&Item) -> Rc<dyn Element> + 'static,
    {
        Self::with_orientation(Orientation::Vertical, items, map)
    }

    /// List laid out in `orientation`.
    pub fn with_orientation<F>(orientation: Orientation, items: &Binder<Vec<Item>>, map: F) -> Rc<Self>
    where
        F: Fn(&Item) -> Rc<dyn Element> + 'static,
    {
        let this = Rc::new(Self {
            core: ElementCore::new(),
            orientation,
            map: Box::new(map),
            children: RefCell::new(Vec::new()),
            driver: items.clone(),
        });
        this.core
            .bindings()
            .register(&this.driver, &this, |this, items| this.rebuild(items));
        this
    }

    /// Number of displayed children.
    pub fn len(&self) -> usize {
        self.children.borrow().len()
    }

    /// Whether no children are displayed.
    pub fn is_empty(&self) -> bool {
        self.children.borrow().is_empty()
    }

    fn rebuild(&self, items: &[Item]) {
        let container = self.view();

        let previous = std::mem::take(&mut *self.children.borrow_mut());
        for child in &previous {
            child.view().remove_from_superview();
        }
        drop(previous);

        let next: Vec<Rc<dyn Element>> = items.iter().map(|item| (self.map)(item)).collect();
        for child in &next {
            container.add_subview(&child.view());
        }

        debug!(element = self.id().raw(), items = next.len(), "list rebuilt");
        *self.children.borrow_mut() = next;
    }
}

impl<Item: Clone + 'static> Element for List<Item> {
    fn core(&self) -> &ElementCore {
        &self.core
    }

    fn build_view(&self) -> View {
        View::stack(self.orientation, DEFAULT_SPACING)
    }

    fn child_elements(&self) -> Vec<Rc<dyn Element>> {
        self.children.borrow().clone()
    }
}
