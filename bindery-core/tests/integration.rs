//! Integration Tests for the Binding Core
//!
//! These tests verify that binders, elements and dynamic content controllers
//! work together correctly.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use bindery_core::binding::Binder;
use bindery_core::dynamic::{DynamicElement, ElementSlot, List, Maybe, OneOf};
use bindery_core::element::{Element, ElementExt, Label, Nothing, Stack};
use bindery_core::view::ViewKind;

/// Registration fires once immediately, then once per set without dedup.
#[test]
fn binder_log_scenario() {
    let b = Binder::new(0);
    let log = Rc::new(RefCell::new(Vec::new()));

    b.register(&log, |log, v| log.borrow_mut().push(*v));
    b.set(5);
    b.set(5);

    assert_eq!(*log.borrow(), vec![0, 5, 5]);
}

/// Every live callback sees every mutation, in registration order.
#[test]
fn every_subscriber_sees_every_mutation_in_order() {
    let binder = Binder::new(String::new());
    let seen = Rc::new(RefCell::new(Vec::new()));

    let owners: Vec<Rc<usize>> = (0..3).map(Rc::new).collect();
    for owner in &owners {
        let seen = Rc::clone(&seen);
        binder.register(owner, move |id, v: &String| seen.borrow_mut().push((*id, v.clone())));
    }
    seen.borrow_mut().clear();

    for value in ["a", "b", "b"] {
        binder.set(value.to_string());
    }

    let expected: Vec<(usize, String)> = ["a", "b", "b"]
        .iter()
        .flat_map(|v| (0..3).map(move |id| (id, v.to_string())))
        .collect();
    assert_eq!(*seen.borrow(), expected);
}

/// An owner going away mid-stream never crashes and never fires again.
#[test]
fn unreachable_owner_is_silent() {
    let binder = Binder::new(0);
    let hits = Rc::new(Cell::new(0));

    let owner = Rc::new(());
    let h = Rc::clone(&hits);
    binder.register(&owner, move |_, _| h.set(h.get() + 1));
    binder.set(1);
    drop(owner);
    binder.set(2);
    binder.set(3);

    assert_eq!(hits.get(), 2);
}

/// A OneOf has at most one attached child after every index change.
#[test]
fn one_of_swap_is_never_doubly_attached() {
    let index = Binder::new(0);
    let children: Vec<Rc<Label>> = (0..3).map(|i| Label::new(i.to_string())).collect();
    let one_of = OneOf::new(&index, children.iter().map(|child| child.to_element()));

    for next in [2, 1, 1, 0, 7, 2] {
        index.set(next);
        let attached: Vec<_> = children
            .iter()
            .filter(|child| child.view().superview().is_some())
            .collect();
        if next < 3 {
            assert_eq!(attached.len(), 1);
            assert_eq!(attached[0].view(), children[next].view());
        } else {
            assert!(attached.is_empty());
        }
    }
}

/// List update from three items to two rebuilds exactly two children.
#[test]
fn list_rebuild_scenario() {
    let items = Binder::new(vec!["x1", "x2", "x3"]);
    let list = List::new(&items, |item: &&str| Label::new(*item).to_element());
    let originals = list.view().subviews();

    items.set(vec!["y1", "y2"]);

    let texts: Vec<String> = list
        .view()
        .subviews()
        .iter()
        .filter_map(|view| view.text())
        .collect();
    assert_eq!(texts, vec!["y1", "y2"]);
    assert!(originals.iter().all(|view| view.superview().is_none()));
}

/// Maybe is decided once: placeholder for false, the element's view for true.
#[test]
fn maybe_scenario() {
    let absent = Maybe::new(false, || Label::new("x").to_element());
    let present = Maybe::new(true, || Label::new("x").to_element());

    assert_eq!(absent.view().kind(), ViewKind::Placeholder);
    assert!(absent.view().text().is_none());
    assert_eq!(present.view().kind(), ViewKind::Label);
    assert_eq!(present.view().text().as_deref(), Some("x"));
}

/// Controllers nest: a list of dynamic elements inside a stack.
#[test]
fn nested_dynamic_content() {
    let show_details = Binder::new(false);
    let details: Binder<ElementSlot> = Binder::new(None);

    let root = Stack::vertical(vec![
        Label::new("header").identifier("header").to_element(),
        OneOf::if_else(
            &show_details,
            DynamicElement::new(&details).identifier("details").to_element(),
            Nothing::new().to_element(),
        )
        .to_element(),
    ]);

    assert!(root.find_view("header").is_some());

    show_details.set(true);
    details.set(Some(Label::new("more").identifier("more").to_element()));

    let more = root.find_view("more").expect("details are displayed");
    let details_view = root.find_view("details").expect("dynamic element is reachable");
    assert_eq!(more.superview(), Some(details_view));
}

/// Hidden bindings on children keep working while a parent controller swaps
/// between them.
#[test]
fn bindings_survive_one_of_swaps() {
    let hidden = Binder::new(false);
    let index = Binder::new(0);
    let bound = Label::new("bound").bind_is_hidden(&hidden);
    let one_of = OneOf::new(&index, [bound.to_element(), Nothing::new().to_element()]);

    index.set(1);
    hidden.set(true);
    index.set(0);

    assert!(bound.view().is_hidden());
    assert_eq!(one_of.view().subviews(), vec![bound.view()]);
}
