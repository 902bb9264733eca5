//! Leaf elements.

use std::rc::Rc;

use super::{Element, ElementCore};
use crate::binding::Binder;
use crate::view::View;

/// Static or bound text.
#[derive(Debug)]
pub struct Label {
    core: ElementCore,
    initial: String,
}

impl Label {
    /// Label showing `text` until something rebinds it.
    pub fn new(text: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            core: ElementCore::new(),
            initial: text.into(),
        })
    }

    /// Current text shown by the label.
    pub fn text(&self) -> String {
        self.view().text().unwrap_or_default()
    }

    /// Drive the label's text from `binder`.
    pub fn bind_text(self: Rc<Self>, binder: &Binder<String>) -> Rc<Self> {
        self.core.bindings().register(binder, &self, |label, text| {
            label.view().set_text(Some(text.clone()));
        });
        self
    }
}

impl Element for Label {
    fn core(&self) -> &ElementCore {
        &self.core
    }

    fn build_view(&self) -> View {
        View::label(self.initial.clone())
    }
}

/// Invisible element with no content.
#[derive(Debug)]
pub struct Nothing {
    core: ElementCore,
}

impl Nothing {
    /// Create an empty placeholder element.
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            core: ElementCore::new(),
        })
    }
}

impl Element for Nothing {
    fn core(&self) -> &ElementCore {
        &self.core
    }

    fn build_view(&self) -> View {
        View::placeholder()
    }
}
