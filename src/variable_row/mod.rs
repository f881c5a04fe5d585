mod imp;

use std::rc::Rc;

use adw::prelude::*;
use adw::subclass::prelude::ObjectSubclassIsExt;
use gtk::glib::{self, BindingFlags, Object};
use varedit::config::{EditorDef, EditorKind};
use varedit::{
    BoolComboVariableEditor, DoubleSpinVariableEditor, EditorBase, ValueComboVariableEditor, VariableEditor,
};

use crate::controls::{CheckButtonControl, DropDownControl, SpinButtonControl};

glib::wrapper! {
    pub struct VariableRow(ObjectSubclass<imp::VariableRow>)
        @extends adw::ActionRow, adw::PreferencesRow, gtk::ListBoxRow, gtk::Widget,
        @implements gtk::Accessible, gtk::Actionable, gtk::Buildable, gtk::ConstraintTarget;
}

impl VariableRow {
    pub fn new(def: &EditorDef) -> Self {
        let row = Object::builder::<Self>()
            .property("title", def.label.as_str())
            .property("subtitle", def.variable.as_str())
            .build();
        row.bind_editor(def);
        row
    }

    pub fn editor(&self) -> Option<Rc<dyn VariableEditor>> {
        self.imp().editor.borrow().clone()
    }

    fn setup_sensitivity(&self) {
        let imp = self.imp();
        imp.check
            .bind_property("active", &*imp.value_box, "sensitive")
            .flags(BindingFlags::SYNC_CREATE)
            .build();
    }

    fn bind_editor(&self, def: &EditorDef) {
        let imp = self.imp();
        let toggle = CheckButtonControl::new(imp.check.get());
        let base = EditorBase::new(&def.variable, &def.check_key, &def.value_key, toggle);

        let editor: Rc<dyn VariableEditor> = match &def.kind {
            EditorKind::DoubleSpin { default, min, max, step, digits } => {
                let spin = gtk::SpinButton::with_range(*min, *max, *step);
                spin.set_digits(*digits);
                imp.value_box.append(&spin);
                Rc::new(DoubleSpinVariableEditor::new(base, SpinButtonControl::new(spin), *default, *min, *max))
            }
            EditorKind::BoolCombo { default, true_label, false_label, value_true, value_false } => {
                let combo = DropDownControl::new(&[true_label.as_str(), false_label.as_str()]);
                imp.value_box.append(combo.widget());
                Rc::new(BoolComboVariableEditor::new(base, combo, *default, value_true.clone(), value_false.clone()))
            }
            EditorKind::ValueCombo { items, default_index } => {
                let items: Vec<&str> = items.iter().map(String::as_str).collect();
                let combo = DropDownControl::new(&items);
                imp.value_box.append(combo.widget());
                Rc::new(ValueComboVariableEditor::new(base, combo, *default_index))
            }
        };

        imp.editor.replace(Some(editor));
    }
}
