//! One-shot conditional content.

use std::rc::Rc;

use crate::element::{Element, ElementCore};
use crate::view::View;

/// Either an element or an invisible placeholder, decided once.
///
/// The choice is made at construction and never revisited; for content
/// that follows a binder use [`OneOf`](super::OneOf) or
/// [`DynamicElement`](super::DynamicElement). When present, the element's
/// own view is this element's view.
pub struct Maybe {
    core: ElementCore,
    content: Option<Rc<dyn Element>>,
}

impl Maybe {
    /// Build the content with `build` only if `condition` holds.
    pub fn new(condition: bool, build: impl FnOnce() -> Rc<dyn Element>) -> Rc<Self> {
        Self::from_option(condition.then(build))
    }

    /// Show `content` if there is one.
    pub fn from_option(content: Option<Rc<dyn Element>>) -> Rc<Self> {
        Rc::new(Self {
            core: ElementCore::new(),
            content,
        })
    }

    /// Whether the content was chosen over the placeholder.
    pub fn is_present(&self) -> bool {
        self.content.is_some()
    }
}

impl Element for Maybe {
    fn core(&self) -> &ElementCore {
        &self.core
    }

    fn build_view(&self) -> View {
        match &self.content {
            Some(element) => element.view(),
            None => View::placeholder(),
        }
    }

    fn child_elements(&self) -> Vec<Rc<dyn Element>> {
        self.content.iter().cloned().collect()
    }
}
