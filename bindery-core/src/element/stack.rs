//! Stack container.

use std::rc::Rc;

use super::{Element, ElementCore};
use crate::view::{Orientation, View};

/// Spacing used by [`Stack::vertical`] and [`Stack::horizontal`].
pub const DEFAULT_SPACING: f64 = 8.0;

/// Container laying out a fixed list of children in one direction.
///
/// The stack owns its children; their views become the stack view's
/// subviews, in order, when the stack view is built.
pub struct Stack {
    core: ElementCore,
    orientation: Orientation,
    spacing: f64,
    children: Vec<Rc<dyn Element>>,
}

impl Stack {
    /// Stack with explicit orientation and spacing.
    pub fn new(orientation: Orientation, spacing: f64, children: Vec<Rc<dyn Element>>) -> Rc<Self> {
        Rc::new(Self {
            core: ElementCore::new(),
            orientation,
            spacing,
            children,
        })
    }

    /// Top-to-bottom stack with [`DEFAULT_SPACING`].
    pub fn vertical(children: Vec<Rc<dyn Element>>) -> Rc<Self> {
        Self::new(Orientation::Vertical, DEFAULT_SPACING, children)
    }

    /// Leading-to-trailing stack with [`DEFAULT_SPACING`].
    pub fn horizontal(children: Vec<Rc<dyn Element>>) -> Rc<Self> {
        Self::new(Orientation::Horizontal, DEFAULT_SPACING, children)
    }

    /// Direction the children are laid out in.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }
}

impl Element for Stack {
    fn core(&self) -> &ElementCore {
        &self.core
    }

    fn build_view(&self) -> View {
        let view = View::stack(self.orientation, self.spacing);
        for child in &self.children {
            view.add_subview(&child.view());
        }
        view
    }

    fn child_elements(&self) -> Vec<Rc<dyn Element>> {
        self.children.clone()
    }
}
