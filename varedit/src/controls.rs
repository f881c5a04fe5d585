//! Controls observed and driven by the editors.
//!
//! Setters are programmatic updates and never call the change handlers;
//! only user input does. The headless models below stand in for widgets in
//! the CLI and in tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub type ChangeHandler = Box<dyn Fn()>;

pub trait ToggleControl {
    fn is_checked(&self) -> bool;
    fn set_checked(&self, checked: bool);
    fn connect_changed(&self, handler: ChangeHandler);
}

pub trait NumericControl {
    fn value(&self) -> f64;
    fn set_value(&self, value: f64);
    fn connect_changed(&self, handler: ChangeHandler);
}

pub trait ChoiceControl {
    fn count(&self) -> usize;
    fn item_text(&self, index: usize) -> Option<String>;
    fn current_index(&self) -> Option<usize>;
    /// Out of range clears the selection.
    fn set_current_index(&self, index: usize);
    fn connect_changed(&self, handler: ChangeHandler);

    fn current_text(&self) -> String {
        self.current_index()
            .and_then(|i| self.item_text(i))
            .unwrap_or_default()
    }

    fn find_text(&self, text: &str) -> Option<usize> {
        (0..self.count()).find(|&i| self.item_text(i).as_deref() == Some(text))
    }
}

impl<T: ToggleControl + ?Sized> ToggleControl for Rc<T> {
    fn is_checked(&self) -> bool {
        (**self).is_checked()
    }

    fn set_checked(&self, checked: bool) {
        (**self).set_checked(checked)
    }

    fn connect_changed(&self, handler: ChangeHandler) {
        (**self).connect_changed(handler)
    }
}

impl<T: NumericControl + ?Sized> NumericControl for Rc<T> {
    fn value(&self) -> f64 {
        (**self).value()
    }

    fn set_value(&self, value: f64) {
        (**self).set_value(value)
    }

    fn connect_changed(&self, handler: ChangeHandler) {
        (**self).connect_changed(handler)
    }
}

impl<T: ChoiceControl + ?Sized> ChoiceControl for Rc<T> {
    fn count(&self) -> usize {
        (**self).count()
    }

    fn item_text(&self, index: usize) -> Option<String> {
        (**self).item_text(index)
    }

    fn current_index(&self) -> Option<usize> {
        (**self).current_index()
    }

    fn set_current_index(&self, index: usize) {
        (**self).set_current_index(index)
    }

    fn connect_changed(&self, handler: ChangeHandler) {
        (**self).connect_changed(handler)
    }
}

#[derive(Default)]
struct Handlers(RefCell<Vec<ChangeHandler>>);

impl Handlers {
    fn push(&self, handler: ChangeHandler) {
        self.0.borrow_mut().push(handler);
    }

    fn fire(&self) {
        for handler in self.0.borrow().iter() {
            handler();
        }
    }
}

#[derive(Default)]
pub struct CheckModel {
    checked: Cell<bool>,
    handlers: Handlers,
}

impl CheckModel {
    pub fn new(checked: bool) -> Self {
        Self { checked: Cell::new(checked), handlers: Handlers::default() }
    }

    /// Checks or unchecks as a user click would. No-op when unchanged.
    pub fn user_set_checked(&self, checked: bool) {
        if self.checked.replace(checked) != checked {
            self.handlers.fire();
        }
    }
}

impl ToggleControl for CheckModel {
    fn is_checked(&self) -> bool {
        self.checked.get()
    }

    fn set_checked(&self, checked: bool) {
        self.checked.set(checked);
    }

    fn connect_changed(&self, handler: ChangeHandler) {
        self.handlers.push(handler);
    }
}

/// Bounded numeric field. Values are clamped to its range like a spin button.
pub struct SpinModel {
    value: Cell<f64>,
    min: f64,
    max: f64,
    handlers: Handlers,
}

impl SpinModel {
    pub fn new(min: f64, max: f64) -> Self {
        Self { value: Cell::new(min), min, max, handlers: Handlers::default() }
    }

    pub fn user_set_value(&self, value: f64) {
        let value = value.clamp(self.min, self.max);
        if self.value.replace(value) != value {
            self.handlers.fire();
        }
    }
}

impl NumericControl for SpinModel {
    fn value(&self) -> f64 {
        self.value.get()
    }

    fn set_value(&self, value: f64) {
        self.value.set(value.clamp(self.min, self.max));
    }

    fn connect_changed(&self, handler: ChangeHandler) {
        self.handlers.push(handler);
    }
}

pub struct ComboModel {
    items: Vec<String>,
    current: Cell<Option<usize>>,
    handlers: Handlers,
}

impl ComboModel {
    /// The first item starts selected.
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Vec<String> = items.into_iter().map(Into::into).collect();
        let current = if items.is_empty() { None } else { Some(0) };
        Self { items, current: Cell::new(current), handlers: Handlers::default() }
    }

    pub fn user_select(&self, index: usize) {
        let index = self.checked_index(index);
        if self.current.replace(index) != index {
            self.handlers.fire();
        }
    }

    fn checked_index(&self, index: usize) -> Option<usize> {
        if index < self.items.len() { Some(index) } else { None }
    }
}

impl ChoiceControl for ComboModel {
    fn count(&self) -> usize {
        self.items.len()
    }

    fn item_text(&self, index: usize) -> Option<String> {
        self.items.get(index).cloned()
    }

    fn current_index(&self) -> Option<usize> {
        self.current.get()
    }

    fn set_current_index(&self, index: usize) {
        self.current.set(self.checked_index(index));
    }

    fn connect_changed(&self, handler: ChangeHandler) {
        self.handlers.push(handler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter() -> (Rc<Cell<usize>>, ChangeHandler) {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        (count, Box::new(move || c.set(c.get() + 1)))
    }

    #[test]
    fn test_check_model_fires_on_user_change_only() {
        let check = CheckModel::new(false);
        let (count, handler) = counter();
        check.connect_changed(handler);

        check.set_checked(true);
        assert_eq!(count.get(), 0);
        check.user_set_checked(false);
        check.user_set_checked(false);
        assert_eq!(count.get(), 1);
        assert!(!check.is_checked());
    }

    #[test]
    fn test_spin_model_clamps() {
        let spin = SpinModel::new(-1.0, 1.0);
        spin.set_value(4.0);
        assert_eq!(spin.value(), 1.0);
        spin.user_set_value(-8.0);
        assert_eq!(spin.value(), -1.0);
    }

    #[test]
    fn test_combo_model_text_lookup() {
        let combo = ComboModel::new(["0.1", "0.5", "1"]);
        assert_eq!(combo.current_index(), Some(0));
        assert_eq!(combo.find_text("0.5"), Some(1));
        assert_eq!(combo.find_text("0.50"), None);

        combo.set_current_index(2);
        assert_eq!(combo.current_text(), "1");
        combo.set_current_index(7);
        assert_eq!(combo.current_index(), None);
        assert_eq!(combo.current_text(), "");
    }
}
