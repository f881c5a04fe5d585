mod bool_combo;
mod double_spin;
mod value_combo;

use std::cell::Cell;
use std::rc::Rc;
use log::{debug, warn};

use crate::controls::{ChangeHandler, ToggleControl};
use crate::signal::{EditorEvent, Listener, Signals};
use crate::store::SettingsStore;
use crate::value::Value;

pub use bool_combo::{BoolComboVariableEditor, COMBO_INDEX_FALSE, COMBO_INDEX_TRUE};
pub use double_spin::DoubleSpinVariableEditor;
pub use value_combo::ValueComboVariableEditor;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorState {
    Disabled,
    Enabled,
}

/// State shared by every editor: the variable, its two setting keys and the
/// toggle that enables it.
pub struct EditorBase {
    variable_name: String,
    check_key: String,
    value_key: String,
    toggle: Box<dyn ToggleControl>,
    signals: Signals,
    connected: Cell<bool>,
}

impl EditorBase {
    pub fn new<T>(variable_name: &str, check_key: &str, value_key: &str, toggle: T) -> Self
    where
        T: ToggleControl + 'static,
    {
        Self {
            variable_name: variable_name.to_string(),
            check_key: check_key.to_string(),
            value_key: value_key.to_string(),
            toggle: Box::new(toggle),
            signals: Signals::new(),
            connected: Cell::new(false),
        }
    }

    pub fn variable_name(&self) -> &str {
        &self.variable_name
    }

    pub fn check_key(&self) -> &str {
        &self.check_key
    }

    pub fn value_key(&self) -> &str {
        &self.value_key
    }

    pub fn toggle(&self) -> &dyn ToggleControl {
        self.toggle.as_ref()
    }

    pub fn signals(&self) -> &Signals {
        &self.signals
    }

    pub fn is_checked(&self) -> bool {
        self.toggle.is_checked()
    }

    fn mark_connected(&self) -> bool {
        !self.connected.replace(true)
    }

    fn load_check(&self, store: &dyn SettingsStore) {
        let checked = store.value_or(&self.check_key, Value::Bool(false)).to_bool();
        self.toggle.set_checked(checked);
    }

    fn save_check(&self, store: &mut dyn SettingsStore) {
        store.set_value(&self.check_key, Value::Bool(self.is_checked()));
    }

    pub fn emit_enable(&self, value: Value) {
        debug!("varEnable {} = {}", self.variable_name, value);
        self.signals.emit(EditorEvent::VarEnable { name: self.variable_name.clone(), value });
    }

    pub fn emit_disable(&self) {
        debug!("varDisable {}", self.variable_name);
        self.signals.emit(EditorEvent::VarDisable { name: self.variable_name.clone() });
    }

    fn emit_updated(&self) {
        self.signals.emit(EditorEvent::SettingsUpdated);
    }
}

/// Adapter pairing a toggle and a value control to one variable.
///
/// Implementors provide the value side; the lifecycle (wiring, load/save,
/// enable/disable emission) is shared.
pub trait VariableEditor: 'static {
    fn base(&self) -> &EditorBase;

    /// Current value of the value control, as emitted with `varEnable`.
    fn current_value(&self) -> Value;

    /// Reads the value setting into the value control, falling back to the default.
    fn load_value(&self, store: &dyn SettingsStore);

    fn save_value(&self, store: &mut dyn SettingsStore);

    /// Puts the value control back to its default.
    fn restore_default(&self);

    fn connect_value_control(&self, handler: ChangeHandler);

    fn name(&self) -> &str {
        self.base().variable_name()
    }

    fn state(&self) -> EditorState {
        if self.base().is_checked() { EditorState::Enabled } else { EditorState::Disabled }
    }

    /// Wires the toggle and value control change events to `update_var`.
    fn connect_interface(self: Rc<Self>) {
        if !self.base().mark_connected() {
            warn!("Editor for {} is already connected", self.name());
            return;
        }
        self.base().toggle().connect_changed(watch(&self));
        self.connect_value_control(watch(&self));
    }

    fn load_settings(&self, store: &dyn SettingsStore) {
        self.load_value(store);
        self.base().load_check(store);
        if self.base().is_checked() {
            self.set_value();
        }
    }

    fn save_settings(&self, store: &mut dyn SettingsStore) {
        self.save_value(store);
        self.base().save_check(store);
    }

    fn set_value(&self) {
        self.base().emit_enable(self.current_value());
    }

    fn update_var(&self) {
        if self.base().is_checked() {
            self.set_value();
        } else {
            self.base().emit_disable();
        }

        self.base().emit_updated();
    }

    fn reset_default_value(&self) {
        self.base().toggle().set_checked(false);
        self.restore_default();
        self.update_var();
    }
}

fn watch<E: VariableEditor + ?Sized>(editor: &Rc<E>) -> ChangeHandler {
    let editor = Rc::downgrade(editor);
    Box::new(move || {
        if let Some(editor) = editor.upgrade() {
            editor.update_var();
        }
    })
}

/// All editors of one form.
#[derive(Default)]
pub struct EditorSet {
    editors: Vec<Rc<dyn VariableEditor>>,
}

impl EditorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, editor: Rc<dyn VariableEditor>) {
        self.editors.push(editor);
    }

    pub fn get(&self, name: &str) -> Option<&Rc<dyn VariableEditor>> {
        self.editors.iter().find(|e| e.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rc<dyn VariableEditor>> {
        self.editors.iter()
    }

    pub fn len(&self) -> usize {
        self.editors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.editors.is_empty()
    }

    pub fn connect_interface(&self) {
        for editor in &self.editors {
            editor.clone().connect_interface();
        }
    }

    pub fn connect_listener(&self, listener: Listener) {
        for editor in &self.editors {
            editor.base().signals().connect_listener(listener.clone());
        }
    }

    pub fn load_settings(&self, store: &dyn SettingsStore) {
        for editor in &self.editors {
            editor.load_settings(store);
        }
    }

    pub fn save_settings(&self, store: &mut dyn SettingsStore) {
        for editor in &self.editors {
            editor.save_settings(store);
        }
    }

    pub fn reset_default_values(&self) {
        for editor in &self.editors {
            editor.reset_default_value();
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::VariableEditor;
    use crate::signal::EditorEvent;

    pub fn record(editor: &dyn VariableEditor) -> Rc<RefCell<Vec<EditorEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        editor.base().signals().connect(move |e| sink.borrow_mut().push(e.clone()));
        events
    }

    pub fn enable(name: &str, value: impl Into<crate::value::Value>) -> EditorEvent {
        EditorEvent::VarEnable { name: name.to_string(), value: value.into() }
    }

    pub fn disable(name: &str) -> EditorEvent {
        EditorEvent::VarDisable { name: name.to_string() }
    }
}
