//! Index-driven choice between pre-built children.

use std::cell::Cell;
use std::rc::Rc;

use tracing::debug;

use crate::binding::Binder;
use crate::element::{Element, ElementCore};
use crate::view::{EdgeInsets, View};

/// Shows the child selected by an index binder.
///
/// All children are built up front and owned for the controller's lifetime.
/// An index outside `0..len` shows nothing; that is not an error.
pub struct OneOf {
    core: ElementCore,
    children: Vec<Rc<dyn Element>>,
    selected: Cell<Option<usize>>,
    /// Kept so a derived driver (see [`OneOf::if_else`]) stays alive.
    driver: Binder<usize>,
}

impl OneOf {
    /// Shows the child at `index`'s current value, tracking every change.
    pub fn new<I>(index: &Binder<usize>, children: I) -> Rc<Self>
    where
        I: IntoIterator<Item = Rc<dyn Element>>,
    {
        let this = Rc::new(Self {
            core: ElementCore::new(),
            children: children.into_iter().collect(),
            selected: Cell::new(None),
            driver: index.clone(),
        });
        this.core
            .bindings()
            .register(&this.driver, &this, |this, index| this.select(*index));
        this
    }

    /// Shows `when_true` while `condition` is true, `when_false` otherwise.
    pub fn if_else(
        condition: &Binder<bool>,
        when_true: Rc<dyn Element>,
        when_false: Rc<dyn Element>,
    ) -> Rc<Self> {
        let index = condition.transform(|value| if *value { 0 } else { 1 });
        Self::new(&index, [when_true, when_false])
    }

    /// Index of the attached child, if any.
    pub fn selected(&self) -> Option<usize> {
        self.selected.get()
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether there are no children to choose from.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    fn select(&self, index: usize) {
        let container = self.view();
        let previous = self.selected.take();

        if let Some(previous) = previous {
            self.children[previous].view().remove_from_superview();
        }

        if let Some(child) = self.children.get(index) {
            let view = child.view();
            container.add_subview(&view);
            view.pin_to_superview_edges(EdgeInsets::ZERO);
            self.selected.set(Some(index));
        }

        debug!(
            element = self.id().raw(),
            ?previous,
            selected = ?self.selected.get(),
            "one-of selection changed"
        );
    }
}

impl Element for OneOf {
    fn core(&self) -> &ElementCore {
        &self.core
    }

    fn build_view(&self) -> View {
        View::container()
    }

    fn child_elements(&self) -> Vec<Rc<dyn Element>> {
        self.children.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementExt, Label};

    fn labels(n: usize) -> Vec<Rc<Label>> {
        (0..n).map(|i| Label::new(format!("child {i}"))).collect()
    }

    fn erase(labels: &[Rc<Label>]) -> Vec<Rc<dyn Element>> {
        labels.iter().map(ElementExt::to_element).collect()
    }

    #[test]
    fn attaches_only_selected_child() {
        let index = Binder::new(1);
        let children = labels(3);
        let one_of = OneOf::new(&index, erase(&children));

        let container = one_of.view();
        assert_eq!(container.subviews(), vec![children[1].view()]);
        assert_eq!(one_of.selected(), Some(1));
        assert!(children[0].view().superview().is_none());
        assert!(children[2].view().superview().is_none());
    }

    #[test]
    fn switching_detaches_previous_child() {
        let index = Binder::new(0);
        let children = labels(3);
        let one_of = OneOf::new(&index, erase(&children));

        index.set(2);
        let container = one_of.view();
        assert_eq!(container.subviews(), vec![children[2].view()]);
        assert!(children[0].view().superview().is_none());
        assert_eq!(children[2].view().superview(), Some(container));
    }

    #[test]
    fn never_two_children_attached() {
        let index = Binder::new(0);
        let children = labels(2);
        let one_of = OneOf::new(&index, erase(&children));

        let container = one_of.view();
        let c = container.clone();
        let owner = Rc::new(());
        // Registered after the controller, so it observes the post-swap state.
        index.register(&owner, move |_, _| assert!(c.subview_count() <= 1));

        for i in [1, 0, 1, 1, 0] {
            index.set(i);
            assert_eq!(container.subview_count(), 1);
        }
    }

    #[test]
    fn out_of_range_shows_nothing() {
        let index = Binder::new(0);
        let one_of = OneOf::new(&index, erase(&labels(2)));

        index.set(5);
        assert_eq!(one_of.view().subview_count(), 0);
        assert_eq!(one_of.selected(), None);

        index.set(1);
        assert_eq!(one_of.view().subview_count(), 1);
    }

    #[test]
    fn reselecting_same_index_keeps_one_child() {
        let index = Binder::new(0);
        let children = labels(2);
        let one_of = OneOf::new(&index, erase(&children));

        index.set(0);
        assert_eq!(one_of.view().subviews(), vec![children[0].view()]);
    }

    #[test]
    fn if_else_maps_true_and_false() {
        let flag = Binder::new(false);
        let yes = Label::new("yes");
        let no = Label::new("no");
        let choice = OneOf::if_else(&flag, yes.to_element(), no.to_element());

        assert_eq!(choice.view().subviews(), vec![no.view()]);

        flag.set(true);
        assert_eq!(choice.view().subviews(), vec![yes.view()]);
        assert!(no.view().superview().is_none());
    }

    #[test]
    fn all_children_are_logical_children() {
        let index = Binder::new(0);
        let one_of = OneOf::new(&index, erase(&labels(3)));
        assert_eq!(one_of.child_elements().len(), 3);
        assert_eq!(one_of.len(), 3);
    }

    #[test]
    fn dropping_controller_stops_updates() {
        let index = Binder::new(0);
        let one_of = OneOf::new(&index, erase(&labels(2)));
        assert_eq!(index.subscription_count(), 1);

        drop(one_of);
        assert_eq!(index.subscription_count(), 0);
        index.set(1);
    }
}
