use std::cell::RefCell;

use gtk::glib::SignalHandlerId;
use gtk::prelude::*;
use varedit::{ChangeHandler, ChoiceControl, NumericControl, ToggleControl};

// Runs `f` with the editor's change handler blocked.
fn quietly<O: ObjectExt>(obj: &O, handler: &RefCell<Option<SignalHandlerId>>, f: impl FnOnce()) {
    let handler = handler.borrow();
    if let Some(id) = handler.as_ref() {
        obj.block_signal(id);
    }
    f();
    if let Some(id) = handler.as_ref() {
        obj.unblock_signal(id);
    }
}

pub struct CheckButtonControl {
    button: gtk::CheckButton,
    handler: RefCell<Option<SignalHandlerId>>,
}

impl CheckButtonControl {
    pub fn new(button: gtk::CheckButton) -> Self {
        Self { button, handler: RefCell::new(None) }
    }
}

impl ToggleControl for CheckButtonControl {
    fn is_checked(&self) -> bool {
        self.button.is_active()
    }

    fn set_checked(&self, checked: bool) {
        quietly(&self.button, &self.handler, || self.button.set_active(checked));
    }

    fn connect_changed(&self, handler: ChangeHandler) {
        let id = self.button.connect_toggled(move |_| handler());
        self.handler.replace(Some(id));
    }
}

pub struct SpinButtonControl {
    spin: gtk::SpinButton,
    handler: RefCell<Option<SignalHandlerId>>,
}

impl SpinButtonControl {
    pub fn new(spin: gtk::SpinButton) -> Self {
        Self { spin, handler: RefCell::new(None) }
    }
}

impl NumericControl for SpinButtonControl {
    fn value(&self) -> f64 {
        self.spin.value()
    }

    fn set_value(&self, value: f64) {
        quietly(&self.spin, &self.handler, || self.spin.set_value(value));
    }

    fn connect_changed(&self, handler: ChangeHandler) {
        let id = self.spin.connect_value_changed(move |_| handler());
        self.handler.replace(Some(id));
    }
}

pub struct DropDownControl {
    dropdown: gtk::DropDown,
    items: Vec<String>,
    handler: RefCell<Option<SignalHandlerId>>,
}

impl DropDownControl {
    pub fn new(items: &[&str]) -> Self {
        Self {
            dropdown: gtk::DropDown::from_strings(items),
            items: items.iter().map(|s| s.to_string()).collect(),
            handler: RefCell::new(None),
        }
    }

    pub fn widget(&self) -> &gtk::DropDown {
        &self.dropdown
    }
}

impl ChoiceControl for DropDownControl {
    fn count(&self) -> usize {
        self.items.len()
    }

    fn item_text(&self, index: usize) -> Option<String> {
        self.items.get(index).cloned()
    }

    fn current_index(&self) -> Option<usize> {
        let selected = self.dropdown.selected() as usize;
        if selected < self.items.len() { Some(selected) } else { None }
    }

    fn set_current_index(&self, index: usize) {
        let position = if index < self.items.len() { index as u32 } else { gtk::INVALID_LIST_POSITION };
        quietly(&self.dropdown, &self.handler, || self.dropdown.set_selected(position));
    }

    fn connect_changed(&self, handler: ChangeHandler) {
        let id = self.dropdown.connect_selected_notify(move |_| handler());
        self.handler.replace(Some(id));
    }
}
