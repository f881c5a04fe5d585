//! Editors bound to in-memory controls, for driving a form without a display.

use std::rc::Rc;
use thiserror::Error;

use crate::config::{EditorDef, EditorKind};
use crate::controls::{CheckModel, ChoiceControl, ComboModel, NumericControl, SpinModel};
use crate::editor::{
    BoolComboVariableEditor, DoubleSpinVariableEditor, EditorBase, EditorSet, ValueComboVariableEditor,
    VariableEditor, COMBO_INDEX_FALSE, COMBO_INDEX_TRUE,
};

#[derive(Error, Debug, PartialEq)]
pub enum InputError {
    #[error("{variable:?}: {text:?} is not a number")]
    NotANumber { variable: String, text: String },
    #[error("{variable:?}: {text:?} is not one of {items:?}")]
    NoItem { variable: String, text: String, items: Vec<String> },
    #[error("Unknown variable {0:?}")]
    UnknownVariable(String),
}

enum ValueModel {
    Spin(Rc<SpinModel>),
    Combo(Rc<ComboModel>),
}

pub struct HeadlessEditor {
    def: EditorDef,
    check: Rc<CheckModel>,
    value: ValueModel,
    editor: Rc<dyn VariableEditor>,
}

impl HeadlessEditor {
    pub fn new(def: &EditorDef) -> Self {
        let check = Rc::new(CheckModel::new(false));
        let base = EditorBase::new(&def.variable, &def.check_key, &def.value_key, check.clone());
        let (value, editor): (ValueModel, Rc<dyn VariableEditor>) = match &def.kind {
            EditorKind::DoubleSpin { default, min, max, .. } => {
                let spin = Rc::new(SpinModel::new(*min, *max));
                let editor = DoubleSpinVariableEditor::new(base, spin.clone(), *default, *min, *max);
                (ValueModel::Spin(spin), Rc::new(editor))
            }
            EditorKind::BoolCombo { default, true_label, false_label, value_true, value_false } => {
                let combo = Rc::new(ComboModel::new([true_label.as_str(), false_label.as_str()]));
                let editor = BoolComboVariableEditor::new(
                    base, combo.clone(), *default, value_true.clone(), value_false.clone());
                (ValueModel::Combo(combo), Rc::new(editor))
            }
            EditorKind::ValueCombo { items, default_index } => {
                let combo = Rc::new(ComboModel::new(items.iter().map(String::as_str)));
                let editor = ValueComboVariableEditor::new(base, combo.clone(), *default_index);
                (ValueModel::Combo(combo), Rc::new(editor))
            }
        };

        Self { def: def.clone(), check, value, editor }
    }

    pub fn def(&self) -> &EditorDef {
        &self.def
    }

    pub fn editor(&self) -> &Rc<dyn VariableEditor> {
        &self.editor
    }

    pub fn user_set_checked(&self, checked: bool) {
        self.check.user_set_checked(checked);
    }

    /// Applies `text` to the value control as if typed or picked by a user.
    pub fn user_set_value(&self, text: &str) -> Result<(), InputError> {
        match (&self.def.kind, &self.value) {
            (EditorKind::DoubleSpin { .. }, ValueModel::Spin(spin)) => {
                let value = text.trim().parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| InputError::NotANumber {
                        variable: self.def.variable.clone(),
                        text: text.to_string(),
                    })?;
                spin.user_set_value(value);
            }
            (EditorKind::BoolCombo { true_label, false_label, .. }, ValueModel::Combo(combo)) => {
                let index = if text.eq_ignore_ascii_case(true_label) || text.eq_ignore_ascii_case("true") {
                    COMBO_INDEX_TRUE
                } else if text.eq_ignore_ascii_case(false_label) || text.eq_ignore_ascii_case("false") {
                    COMBO_INDEX_FALSE
                } else {
                    return Err(self.no_item(text, combo));
                };
                combo.user_select(index);
            }
            (EditorKind::ValueCombo { .. }, ValueModel::Combo(combo)) => {
                let index = combo.find_text(text).ok_or_else(|| self.no_item(text, combo))?;
                combo.user_select(index);
            }
            _ => unreachable!("value model always matches the editor kind"),
        }

        Ok(())
    }

    /// Text shown by the value control.
    pub fn display_value(&self) -> String {
        match &self.value {
            ValueModel::Spin(spin) => format!("{:.*}", self.digits(), spin.value()),
            ValueModel::Combo(combo) => combo.current_text(),
        }
    }

    fn digits(&self) -> usize {
        match self.def.kind {
            EditorKind::DoubleSpin { digits, .. } => digits as usize,
            _ => 0,
        }
    }

    fn no_item(&self, text: &str, combo: &ComboModel) -> InputError {
        InputError::NoItem {
            variable: self.def.variable.clone(),
            text: text.to_string(),
            items: (0..combo.count()).filter_map(|i| combo.item_text(i)).collect(),
        }
    }
}

/// A whole form of headless editors.
pub struct HeadlessForm {
    editors: Vec<HeadlessEditor>,
    set: EditorSet,
}

impl HeadlessForm {
    pub fn new(defs: &[EditorDef]) -> Self {
        let editors: Vec<HeadlessEditor> = defs.iter().map(HeadlessEditor::new).collect();
        let mut set = EditorSet::new();
        for editor in &editors {
            set.add(editor.editor().clone());
        }
        set.connect_interface();

        Self { editors, set }
    }

    pub fn set(&self) -> &EditorSet {
        &self.set
    }

    pub fn editors(&self) -> &[HeadlessEditor] {
        &self.editors
    }

    pub fn get(&self, variable: &str) -> Result<&HeadlessEditor, InputError> {
        self.editors.iter()
            .find(|e| e.def.variable == variable)
            .ok_or_else(|| InputError::UnknownVariable(variable.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::config::default_editors;
    use crate::editor::EditorState;
    use crate::signal::VariableTable;
    use crate::store::{MemoryStore, SettingsStore, TomlStore};
    use crate::value::Value;

    fn form() -> (HeadlessForm, Rc<RefCell<VariableTable>>) {
        let form = HeadlessForm::new(&default_editors());
        let table = Rc::new(RefCell::new(VariableTable::new()));
        form.set().connect_listener(VariableTable::listener(&table));
        form.set().load_settings(&MemoryStore::new());
        (form, table)
    }

    #[test]
    fn test_user_input_drives_editors() {
        let (form, table) = form();
        let infill = form.get("infill").unwrap();
        infill.user_set_checked(true);
        infill.user_set_value("35").unwrap();
        let layer = form.get("layer_height").unwrap();
        layer.user_set_checked(true);
        layer.user_set_value("0.3").unwrap();
        form.get("supports").unwrap().user_set_value("yes").unwrap();

        assert_eq!(table.borrow().summary(), "infill=35 layer_height=0.3");
        assert_eq!(infill.display_value(), "35");
        assert_eq!(form.get("supports").unwrap().display_value(), "Yes");
        assert_eq!(form.get("supports").unwrap().editor().state(), EditorState::Disabled);
    }

    #[test]
    fn test_bad_input_is_rejected() {
        let (form, _) = form();
        assert!(matches!(form.get("infill").unwrap().user_set_value("lots"), Err(InputError::NotANumber{..})));
        for text in ["nan", "inf", "-inf"] {
            assert!(matches!(form.get("infill").unwrap().user_set_value(text), Err(InputError::NotANumber{..})), "{}", text);
        }
        assert_eq!(form.get("infill").unwrap().display_value(), "20");
        assert!(matches!(form.get("layer_height").unwrap().user_set_value("0.25"), Err(InputError::NoItem{..})));
        assert!(matches!(form.get("supports").unwrap().user_set_value("maybe"), Err(InputError::NoItem{..})));
        assert_eq!(form.get("nope").err(), Some(InputError::UnknownVariable("nope".to_string())));
    }

    #[test]
    fn test_round_trip_through_store() {
        let (form, _) = form();
        form.get("tolerance").unwrap().user_set_checked(true);
        form.get("tolerance").unwrap().user_set_value("0.05").unwrap();
        let mut store = MemoryStore::new();
        form.set().save_settings(&mut store);
        assert_eq!(store.value("tolerance/value"), Some(Value::Double(0.05)));

        let (other, table) = form_loaded(&store);
        assert_eq!(other.get("tolerance").unwrap().display_value(), "0.0500");
        assert_eq!(table.borrow().get("tolerance"), Some(&Value::Double(0.05)));
    }

    #[test]
    fn test_round_trip_through_toml_file() {
        let path = std::env::temp_dir()
            .join(format!("varedit-headless-{}", std::process::id()))
            .join("settings.toml");
        let (form, _) = form();
        let infill = form.get("infill").unwrap();
        infill.user_set_checked(true);
        infill.user_set_value("35").unwrap();
        let supports = form.get("supports").unwrap();
        supports.user_set_value("Yes").unwrap();
        supports.user_set_checked(true);
        form.get("layer_height").unwrap().user_set_value("0.3").unwrap();

        let mut store = TomlStore::open(&path).unwrap();
        form.set().save_settings(&mut store);
        store.save().unwrap();

        let reopened = TomlStore::open(&path).unwrap();
        let (other, table) = form_loaded(&reopened);
        assert_eq!(other.get("infill").unwrap().display_value(), "35");
        assert_eq!(other.get("infill").unwrap().editor().state(), EditorState::Enabled);
        assert_eq!(other.get("tolerance").unwrap().display_value(), "0.0100");
        assert_eq!(other.get("tolerance").unwrap().editor().state(), EditorState::Disabled);
        assert_eq!(other.get("supports").unwrap().display_value(), "Yes");
        assert_eq!(other.get("supports").unwrap().editor().state(), EditorState::Enabled);
        assert_eq!(other.get("layer_height").unwrap().display_value(), "0.3");
        assert_eq!(other.get("layer_height").unwrap().editor().state(), EditorState::Disabled);
        assert_eq!(table.borrow().summary(), "infill=35 supports=1");

        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    fn form_loaded(store: &dyn SettingsStore) -> (HeadlessForm, Rc<RefCell<VariableTable>>) {
        let form = HeadlessForm::new(&default_editors());
        let table = Rc::new(RefCell::new(VariableTable::new()));
        form.set().connect_listener(VariableTable::listener(&table));
        form.set().load_settings(store);
        (form, table)
    }
}
