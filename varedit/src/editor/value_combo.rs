use log::warn;

use super::{EditorBase, VariableEditor};
use crate::controls::{ChangeHandler, ChoiceControl};
use crate::store::SettingsStore;
use crate::value::Value;

/// Dropdown whose items are numbers written as text.
pub struct ValueComboVariableEditor {
    base: EditorBase,
    combo: Box<dyn ChoiceControl>,
    default_index: usize,
}

impl ValueComboVariableEditor {
    pub fn new<C>(base: EditorBase, combo: C, default_index: usize) -> Self
    where
        C: ChoiceControl + 'static,
    {
        Self {
            base,
            combo: Box::new(combo),
            default_index,
        }
    }
}

impl VariableEditor for ValueComboVariableEditor {
    fn base(&self) -> &EditorBase {
        &self.base
    }

    fn current_value(&self) -> Value {
        let text = self.combo.current_text();
        let value = text.trim().parse::<f64>().unwrap_or_else(|_| {
            warn!("{}: item {:?} is not a number", self.base.variable_name(), text);
            0.0
        });
        Value::Double(value)
    }

    fn load_value(&self, store: &dyn SettingsStore) {
        let default_text = self.combo.item_text(self.default_index).unwrap_or_default();
        let text = store.value_or(self.base.value_key(), Value::Text(default_text)).to_text();
        match self.combo.find_text(&text) {
            Some(i) => self.combo.set_current_index(i),
            None => {
                warn!("{} = {:?} matches no item, using item {}", self.base.value_key(), text, self.default_index);
                self.combo.set_current_index(self.default_index);
            }
        }
    }

    fn save_value(&self, store: &mut dyn SettingsStore) {
        store.set_value(self.base.value_key(), Value::Text(self.combo.current_text()));
    }

    fn restore_default(&self) {
        self.combo.set_current_index(self.default_index);
    }

    fn connect_value_control(&self, handler: ChangeHandler) {
        self.combo.connect_changed(handler);
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::controls::{CheckModel, ComboModel, ToggleControl};
    use crate::editor::testing::{disable, enable, record};
    use crate::signal::EditorEvent;
    use crate::store::MemoryStore;

    struct Fixture {
        check: Rc<CheckModel>,
        combo: Rc<ComboModel>,
        editor: Rc<ValueComboVariableEditor>,
    }

    fn fixture(items: &[&str], default_index: usize) -> Fixture {
        let check = Rc::new(CheckModel::new(false));
        let combo = Rc::new(ComboModel::new(items.iter().copied()));
        let base = EditorBase::new("step", "StepCheck", "StepValue", check.clone());
        let editor = Rc::new(ValueComboVariableEditor::new(base, combo.clone(), default_index));
        editor.clone().connect_interface();
        Fixture { check, combo, editor }
    }

    #[test]
    fn test_load_exact_match() {
        let f = fixture(&["0.1", "0.5", "1"], 0);
        let mut store = MemoryStore::new();
        store.set_value("StepValue", Value::from("1"));
        f.editor.load_settings(&store);
        assert_eq!(f.combo.current_index(), Some(2));
    }

    #[test]
    fn test_load_stored_double_matches_item_text() {
        let f = fixture(&["0.1", "0.5", "1"], 0);
        let mut store = MemoryStore::new();
        store.set_value("StepValue", Value::Double(0.5));
        f.editor.load_settings(&store);
        assert_eq!(f.combo.current_index(), Some(1));
    }

    #[test]
    fn test_load_unmatched_falls_back() {
        for stored in ["0.50", "2", "", "abc"] {
            let f = fixture(&["0.1", "0.5", "1"], 1);
            f.combo.set_current_index(2);
            let mut store = MemoryStore::new();
            store.set_value("StepValue", Value::from(stored));
            f.editor.load_settings(&store);
            assert_eq!(f.combo.current_index(), Some(1), "stored {:?}", stored);
        }
    }

    #[test]
    fn test_load_missing_uses_default_item() {
        let f = fixture(&["0.1", "0.5", "1"], 2);
        f.editor.load_settings(&MemoryStore::new());
        assert_eq!(f.combo.current_index(), Some(2));
    }

    #[test]
    fn test_emits_parsed_item() {
        let f = fixture(&["0.1", "0.5", "1"], 0);
        let events = record(&*f.editor);
        f.check.user_set_checked(true);
        f.combo.user_select(1);

        assert_eq!(*events.borrow(), vec![
            enable("step", 0.1),
            EditorEvent::SettingsUpdated,
            enable("step", 0.5),
            EditorEvent::SettingsUpdated,
        ]);
    }

    #[test]
    fn test_unparseable_item_emits_zero() {
        let f = fixture(&["fast"], 0);
        assert_eq!(f.editor.current_value(), Value::Double(0.0));
    }

    #[test]
    fn test_reset_default_value() {
        let f = fixture(&["0.1", "0.5", "1"], 1);
        f.check.user_set_checked(true);
        f.combo.user_select(2);
        let events = record(&*f.editor);

        f.editor.reset_default_value();
        assert!(!f.check.is_checked());
        assert_eq!(f.combo.current_index(), Some(1));
        assert_eq!(*events.borrow(), vec![disable("step"), EditorEvent::SettingsUpdated]);
    }

    #[test]
    fn test_save_then_load() {
        let f = fixture(&["0.1", "0.5", "1"], 0);
        f.check.user_set_checked(true);
        f.combo.user_select(2);
        let mut store = MemoryStore::new();
        f.editor.save_settings(&mut store);
        assert_eq!(store.value("StepValue"), Some(Value::from("1")));

        let g = fixture(&["0.1", "0.5", "1"], 0);
        g.editor.load_settings(&store);
        assert_eq!(g.combo.current_index(), Some(2));
        assert!(g.check.is_checked());
    }
}
