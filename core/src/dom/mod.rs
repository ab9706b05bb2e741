//! Thin façade over the host's document and element primitives.
//!
//! # Design
//! The host supplies two capabilities: [`NativeDocument`] (selector lookup,
//! ready notification) and [`NativeElement`] (class list, properties, style,
//! content, focus, listeners, tree edits). Host element types are handles into
//! a tree owned elsewhere, so every operation takes `&self`.
//!
//! Whether a lookup produced one element or many is decided once, in
//! [`select`], which returns a [`Selection`]. Both [`ElementHandle`] and
//! [`ElementCollectionHandle`] implement [`Elements`]; a collection broadcasts
//! each operation to every member and answers getters with one value per
//! member.

mod element;

use std::rc::Rc;

pub use element::{ElementCollectionHandle, ElementHandle, Elements};

use crate::error::Error;
use crate::value::Scalar;

/// Events the façade subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Keyup,
    Keydown,
    Keypress,
    Submit,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::Keyup => "keyup",
            EventKind::Keydown => "keydown",
            EventKind::Keypress => "keypress",
            EventKind::Submit => "submit",
        }
    }
}

/// Listener options, passed to the host untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventOptions {
    pub capture: bool,
    pub once: bool,
    pub passive: bool,
}

/// Listener shared between every member of a collection.
pub type EventHandler<Ev> = Rc<dyn Fn(&Ev)>;

/// A host element handle.
pub trait NativeElement: Clone {
    /// Event object the host passes to listeners.
    type Event;

    fn add_class(&self, name: &str);
    fn remove_class(&self, name: &str);
    fn property(&self, name: &str) -> Scalar;
    fn set_property(&self, name: &str, value: Scalar);
    fn set_style(&self, property: &str, value: &str);
    fn inner_html(&self) -> String;
    fn set_inner_html(&self, html: &str);
    fn focus(&self);
    fn add_event_listener(&self, kind: EventKind, handler: EventHandler<Self::Event>, options: EventOptions);
    fn append_child(&self, child: &Self);
    /// Detach from the parent; a no-op for a detached element.
    fn remove(&self);
}

/// A host document.
pub trait NativeDocument {
    type Element: NativeElement;

    /// All elements matching a CSS selector, in document order.
    fn query_selector_all(&self, selector: &str) -> Vec<Self::Element>;
    fn on_content_loaded(&self, handler: Box<dyn FnOnce()>);
}

/// Result of a lookup: exactly one element or several.
#[derive(Debug, Clone)]
pub enum Selection<E> {
    One(ElementHandle<E>),
    Many(ElementCollectionHandle<E>),
}

impl<E: NativeElement> Selection<E> {
    /// Wrap host elements, choosing the handle type by count.
    pub fn from_natives(mut elements: Vec<E>) -> Result<Self, Error> {
        match elements.len() {
            0 => Err(Error::invalid("no elements to wrap")),
            1 => Ok(Selection::One(ElementHandle::new(elements.remove(0)))),
            _ => Ok(Selection::Many(ElementCollectionHandle::new(elements))),
        }
    }

    pub fn single(self) -> Option<ElementHandle<E>> {
        match self {
            Selection::One(el) => Some(el),
            Selection::Many(_) => None,
        }
    }

    /// View the selection as a collection, one member for a single element.
    pub fn into_collection(self) -> ElementCollectionHandle<E> {
        match self {
            Selection::One(el) => ElementCollectionHandle::new(vec![el.into_native()]),
            Selection::Many(list) => list,
        }
    }

    /// Never zero: an empty lookup is rejected by [`Selection::from_natives`].
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        match self {
            Selection::One(_) => 1,
            Selection::Many(list) => list.len(),
        }
    }
}

/// Look up `selector` in `doc`.
pub fn select<D: NativeDocument>(doc: &D, selector: &str) -> Result<Selection<D::Element>, Error> {
    if selector.trim().is_empty() {
        return Err(Error::invalid("selector must not be empty"));
    }
    let found = doc.query_selector_all(selector);
    if found.is_empty() {
        return Err(Error::invalid(format!("no element matches selector: {selector}")));
    }
    Selection::from_natives(found)
}

/// Wrapper over the document itself.
#[derive(Debug, Clone)]
pub struct DocumentHandle<D> {
    doc: D,
}

impl<D: NativeDocument> DocumentHandle<D> {
    pub fn new(doc: D) -> Self {
        Self { doc }
    }

    /// Run `init` once the document content has loaded.
    pub fn on_ready<F: FnOnce() + 'static>(&self, init: F) {
        self.doc.on_content_loaded(Box::new(init));
    }

    pub fn select(&self, selector: &str) -> Result<Selection<D::Element>, Error> {
        select(&self.doc, selector)
    }

    pub fn native(&self) -> &D {
        &self.doc
    }
}
