use log::warn;

use super::{EditorBase, VariableEditor};
use crate::controls::{ChangeHandler, NumericControl};
use crate::store::SettingsStore;
use crate::value::Value;

/// Bounded floating point variable edited with a spin button.
pub struct DoubleSpinVariableEditor {
    base: EditorBase,
    spin: Box<dyn NumericControl>,
    default_value: f64,
    min_value: f64,
    max_value: f64,
}

impl DoubleSpinVariableEditor {
    pub fn new<N>(base: EditorBase, spin: N, default_value: f64, min_value: f64, max_value: f64) -> Self
    where
        N: NumericControl + 'static,
    {
        Self {
            base,
            spin: Box::new(spin),
            default_value,
            min_value,
            max_value,
        }
    }
}

impl VariableEditor for DoubleSpinVariableEditor {
    fn base(&self) -> &EditorBase {
        &self.base
    }

    fn current_value(&self) -> Value {
        Value::Double(self.spin.value())
    }

    fn load_value(&self, store: &dyn SettingsStore) {
        let mut value = store.value_or(self.base.value_key(), Value::Double(self.default_value)).to_f64();
        // NaN is rejected too
        if !(self.min_value..=self.max_value).contains(&value) {
            warn!("{} = {} is outside [{}, {}], using {}",
                self.base.value_key(), value, self.min_value, self.max_value, self.default_value);
            value = self.default_value;
        }

        self.spin.set_value(value);
    }

    fn save_value(&self, store: &mut dyn SettingsStore) {
        store.set_value(self.base.value_key(), Value::Double(self.spin.value()));
    }

    fn restore_default(&self) {
        self.spin.set_value(self.default_value);
    }

    fn connect_value_control(&self, handler: ChangeHandler) {
        self.spin.connect_changed(handler);
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::controls::{CheckModel, SpinModel, ToggleControl};
    use crate::editor::testing::{disable, enable, record};
    use crate::signal::EditorEvent;
    use crate::store::MemoryStore;

    struct Fixture {
        check: Rc<CheckModel>,
        spin: Rc<SpinModel>,
        editor: Rc<DoubleSpinVariableEditor>,
    }

    fn fixture() -> Fixture {
        let check = Rc::new(CheckModel::new(false));
        let spin = Rc::new(SpinModel::new(-100.0, 100.0));
        let base = EditorBase::new("speed", "SpeedCheck", "SpeedValue", check.clone());
        let editor = Rc::new(DoubleSpinVariableEditor::new(base, spin.clone(), 5.0, 0.0, 10.0));
        editor.clone().connect_interface();
        Fixture { check, spin, editor }
    }

    #[test]
    fn test_load_out_of_range_falls_back() {
        for stored in [15.0, -0.5, 10.01, f64::NAN] {
            let f = fixture();
            let mut store = MemoryStore::new();
            store.set_value("SpeedValue", Value::Double(stored));
            f.editor.load_settings(&store);
            assert_eq!(f.spin.value(), 5.0, "stored {}", stored);
        }
    }

    #[test]
    fn test_load_bounds_are_inclusive() {
        for stored in [0.0, 10.0, 7.25] {
            let f = fixture();
            let mut store = MemoryStore::new();
            store.set_value("SpeedValue", Value::Double(stored));
            f.editor.load_settings(&store);
            assert_eq!(f.spin.value(), stored);
        }
    }

    #[test]
    fn test_load_text_value() {
        let f = fixture();
        let mut store = MemoryStore::new();
        store.set_value("SpeedValue", Value::from("2.5"));
        f.editor.load_settings(&store);
        assert_eq!(f.spin.value(), 2.5);
    }

    #[test]
    fn test_load_checked_emits_value_only() {
        let f = fixture();
        let events = record(&*f.editor);
        let mut store = MemoryStore::new();
        store.set_value("SpeedCheck", Value::Bool(true));
        store.set_value("SpeedValue", Value::Double(8.0));
        f.editor.load_settings(&store);

        assert!(f.check.is_checked());
        assert_eq!(*events.borrow(), vec![enable("speed", 8.0)]);
    }

    #[test]
    fn test_missing_value_uses_default() {
        let f = fixture();
        f.spin.set_value(9.0);
        f.editor.load_settings(&MemoryStore::new());
        assert_eq!(f.spin.value(), 5.0);
    }

    #[test]
    fn test_reset_default_value() {
        let f = fixture();
        f.check.user_set_checked(true);
        f.spin.user_set_value(9.0);
        let events = record(&*f.editor);

        f.editor.reset_default_value();
        assert!(!f.check.is_checked());
        assert_eq!(f.spin.value(), 5.0);
        assert_eq!(*events.borrow(), vec![disable("speed"), EditorEvent::SettingsUpdated]);
    }

    #[test]
    fn test_save_then_load() {
        let f = fixture();
        f.check.user_set_checked(true);
        f.spin.user_set_value(3.5);
        let mut store = MemoryStore::new();
        f.editor.save_settings(&mut store);
        assert_eq!(store.value("SpeedCheck"), Some(Value::Bool(true)));
        assert_eq!(store.value("SpeedValue"), Some(Value::Double(3.5)));

        let g = fixture();
        g.editor.load_settings(&store);
        assert!(g.check.is_checked());
        assert_eq!(g.spin.value(), 3.5);
    }
}
