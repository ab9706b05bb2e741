use std::rc::Rc;

use super::{EventHandler, EventKind, EventOptions, NativeElement};
use crate::error::Error;
use crate::value::Scalar;

/// Operations shared by single elements and collections.
pub trait Elements {
    type Event;
    /// What a getter returns: `T` for one element, `Vec<T>` for a collection.
    type Each<T>;

    fn add_class(&self, name: &str) -> Result<(), Error>;
    fn add_classes(&self, names: &[&str]) -> Result<(), Error>;
    fn remove_class(&self, name: &str) -> Result<(), Error>;
    /// Add the class when `on` is true, remove it otherwise.
    fn toggle_class(&self, name: &str, on: bool) -> Result<(), Error>;
    fn prop(&self, name: &str) -> Result<Self::Each<Scalar>, Error>;
    fn set_prop(&self, name: &str, value: Scalar) -> Result<(), Error>;
    fn apply_css(&self, property: &str, value: &str) -> Result<(), Error>;
    /// Inner HTML.
    fn text(&self) -> Self::Each<String>;
    fn set_text(&self, html: &str);
    fn focus(&self);
    fn on(&self, kind: EventKind, handler: EventHandler<Self::Event>, options: EventOptions);
    fn remove(&self);

    fn on_click<F: Fn(&Self::Event) + 'static>(&self, handler: F, options: EventOptions) {
        self.on(EventKind::Click, Rc::new(handler), options);
    }

    fn on_keyup<F: Fn(&Self::Event) + 'static>(&self, handler: F, options: EventOptions) {
        self.on(EventKind::Keyup, Rc::new(handler), options);
    }

    fn on_keydown<F: Fn(&Self::Event) + 'static>(&self, handler: F, options: EventOptions) {
        self.on(EventKind::Keydown, Rc::new(handler), options);
    }

    fn on_keypress<F: Fn(&Self::Event) + 'static>(&self, handler: F, options: EventOptions) {
        self.on(EventKind::Keypress, Rc::new(handler), options);
    }

    fn on_submit<F: Fn(&Self::Event) + 'static>(&self, handler: F, options: EventOptions) {
        self.on(EventKind::Submit, Rc::new(handler), options);
    }
}

fn check_class(name: &str) -> Result<(), Error> {
    if name.trim().is_empty() {
        return Err(Error::invalid("class name must be a non-empty string"));
    }
    Ok(())
}

fn check_prop(name: &str) -> Result<(), Error> {
    if name.is_empty() {
        return Err(Error::invalid("property name must be a non-empty string"));
    }
    Ok(())
}

fn check_css(property: &str, value: &str) -> Result<(), Error> {
    if property.is_empty() || value.is_empty() {
        return Err(Error::invalid("CSS property and value must be non-empty"));
    }
    Ok(())
}

fn check_classes(names: &[&str]) -> Result<(), Error> {
    if names.is_empty() {
        return Err(Error::invalid("at least one class name is required"));
    }
    names.iter().try_for_each(|name| check_class(name))
}

/// One host element.
#[derive(Debug, Clone)]
pub struct ElementHandle<E> {
    node: E,
}

impl<E: NativeElement> ElementHandle<E> {
    pub fn new(node: E) -> Self {
        Self { node }
    }

    pub fn native(&self) -> &E {
        &self.node
    }

    pub fn into_native(self) -> E {
        self.node
    }

    /// The `value` property of an input-like element.
    pub fn value(&self) -> Scalar {
        self.node.property("value")
    }

    pub fn set_value(&self, value: impl Into<Scalar>) {
        self.node.set_property("value", value.into());
    }

    /// Append this element as the last child of `parent`.
    pub fn append_to(&self, parent: &ElementHandle<E>) {
        parent.node.append_child(&self.node);
    }
}

impl<E: NativeElement> Elements for ElementHandle<E> {
    type Event = E::Event;
    type Each<T> = T;

    fn add_class(&self, name: &str) -> Result<(), Error> {
        check_class(name)?;
        self.node.add_class(name);
        Ok(())
    }

    fn add_classes(&self, names: &[&str]) -> Result<(), Error> {
        check_classes(names)?;
        names.iter().for_each(|name| self.node.add_class(name));
        Ok(())
    }

    fn remove_class(&self, name: &str) -> Result<(), Error> {
        check_class(name)?;
        self.node.remove_class(name);
        Ok(())
    }

    fn toggle_class(&self, name: &str, on: bool) -> Result<(), Error> {
        if on {
            self.add_class(name)
        } else {
            self.remove_class(name)
        }
    }

    fn prop(&self, name: &str) -> Result<Scalar, Error> {
        check_prop(name)?;
        Ok(self.node.property(name))
    }

    fn set_prop(&self, name: &str, value: Scalar) -> Result<(), Error> {
        check_prop(name)?;
        self.node.set_property(name, value);
        Ok(())
    }

    fn apply_css(&self, property: &str, value: &str) -> Result<(), Error> {
        check_css(property, value)?;
        self.node.set_style(property, value);
        Ok(())
    }

    fn text(&self) -> String {
        self.node.inner_html()
    }

    fn set_text(&self, html: &str) {
        self.node.set_inner_html(html);
    }

    fn focus(&self) {
        self.node.focus();
    }

    fn on(&self, kind: EventKind, handler: EventHandler<E::Event>, options: EventOptions) {
        self.node.add_event_listener(kind, handler, options);
    }

    fn remove(&self) {
        self.node.remove();
    }
}

/// Several host elements treated as one.
#[derive(Debug, Clone)]
pub struct ElementCollectionHandle<E> {
    members: Vec<E>,
}

impl<E: NativeElement> ElementCollectionHandle<E> {
    pub fn new(members: Vec<E>) -> Self {
        Self { members }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ElementHandle<E>> + '_ {
        self.members.iter().cloned().map(ElementHandle::new)
    }
}

impl<E: NativeElement> Elements for ElementCollectionHandle<E> {
    type Event = E::Event;
    type Each<T> = Vec<T>;

    fn add_class(&self, name: &str) -> Result<(), Error> {
        check_class(name)?;
        self.members.iter().for_each(|el| el.add_class(name));
        Ok(())
    }

    fn add_classes(&self, names: &[&str]) -> Result<(), Error> {
        check_classes(names)?;
        for el in &self.members {
            names.iter().for_each(|name| el.add_class(name));
        }
        Ok(())
    }

    fn remove_class(&self, name: &str) -> Result<(), Error> {
        check_class(name)?;
        self.members.iter().for_each(|el| el.remove_class(name));
        Ok(())
    }

    fn toggle_class(&self, name: &str, on: bool) -> Result<(), Error> {
        if on {
            self.add_class(name)
        } else {
            self.remove_class(name)
        }
    }

    fn prop(&self, name: &str) -> Result<Vec<Scalar>, Error> {
        check_prop(name)?;
        Ok(self.members.iter().map(|el| el.property(name)).collect())
    }

    fn set_prop(&self, name: &str, value: Scalar) -> Result<(), Error> {
        check_prop(name)?;
        self.members.iter().for_each(|el| el.set_property(name, value.clone()));
        Ok(())
    }

    fn apply_css(&self, property: &str, value: &str) -> Result<(), Error> {
        check_css(property, value)?;
        self.members.iter().for_each(|el| el.set_style(property, value));
        Ok(())
    }

    fn text(&self) -> Vec<String> {
        self.members.iter().map(NativeElement::inner_html).collect()
    }

    fn set_text(&self, html: &str) {
        self.members.iter().for_each(|el| el.set_inner_html(html));
    }

    fn focus(&self) {
        self.members.iter().for_each(NativeElement::focus);
    }

    fn on(&self, kind: EventKind, handler: EventHandler<E::Event>, options: EventOptions) {
        for el in &self.members {
            el.add_event_listener(kind, Rc::clone(&handler), options);
        }
    }

    fn remove(&self) {
        self.members.iter().for_each(NativeElement::remove);
    }
}
