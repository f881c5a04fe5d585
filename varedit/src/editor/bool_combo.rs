use super::{EditorBase, VariableEditor};
use crate::controls::{ChangeHandler, ChoiceControl};
use crate::store::SettingsStore;
use crate::value::Value;

pub const COMBO_INDEX_TRUE: usize = 0;
pub const COMBO_INDEX_FALSE: usize = 1;

/// Two-item dropdown (true, false) mapped to a pair of output values.
pub struct BoolComboVariableEditor {
    base: EditorBase,
    combo: Box<dyn ChoiceControl>,
    default_value: bool,
    value_true: Value,
    value_false: Value,
}

impl BoolComboVariableEditor {
    pub fn new<C>(base: EditorBase, combo: C, default_value: bool, value_true: Value, value_false: Value) -> Self
    where
        C: ChoiceControl + 'static,
    {
        Self {
            base,
            combo: Box::new(combo),
            default_value,
            value_true,
            value_false,
        }
    }

    fn selected(&self) -> bool {
        self.combo.current_index() == Some(COMBO_INDEX_TRUE)
    }

    fn select(&self, value: bool) {
        self.combo.set_current_index(if value { COMBO_INDEX_TRUE } else { COMBO_INDEX_FALSE });
    }
}

impl VariableEditor for BoolComboVariableEditor {
    fn base(&self) -> &EditorBase {
        &self.base
    }

    fn current_value(&self) -> Value {
        if self.selected() { self.value_true.clone() } else { self.value_false.clone() }
    }

    fn load_value(&self, store: &dyn SettingsStore) {
        let value = store.value_or(self.base.value_key(), Value::Bool(self.default_value)).to_bool();
        self.select(value);
    }

    fn save_value(&self, store: &mut dyn SettingsStore) {
        store.set_value(self.base.value_key(), Value::Bool(self.selected()));
    }

    fn restore_default(&self) {
        self.select(self.default_value);
    }

    fn connect_value_control(&self, handler: ChangeHandler) {
        self.combo.connect_changed(handler);
    }
}
