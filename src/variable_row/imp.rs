use std::cell::RefCell;
use std::rc::Rc;

use adw::subclass::prelude::*;
use gtk::{glib, CompositeTemplate};
use gtk::glib::subclass::InitializingObject;
use varedit::VariableEditor;

// Object holding the state
#[derive(CompositeTemplate, Default)]
#[template(resource = "/org/varedit/VarEdit/VariableRow.ui")]
pub struct VariableRow {
    #[template_child]
    pub check: TemplateChild<gtk::CheckButton>,
    #[template_child]
    pub value_box: TemplateChild<gtk::Box>,
    pub editor: RefCell<Option<Rc<dyn VariableEditor>>>,
}

// The central trait for subclassing a GObject
#[glib::object_subclass]
impl ObjectSubclass for VariableRow {
    // `NAME` needs to match `class` attribute of template
    const NAME: &'static str = "VariableRow";
    type Type = super::VariableRow;
    type ParentType = adw::ActionRow;

    fn class_init(klass: &mut Self::Class) {
        klass.bind_template();
    }

    fn instance_init(obj: &InitializingObject<Self>) {
        obj.init_template();
    }
}

// Trait shared by all GObjects
impl ObjectImpl for VariableRow {
    fn constructed(&self) {
        // Call "constructed" on parent
        self.parent_constructed();

        self.obj().setup_sensitivity();
    }
}

// Trait shared by all widgets
impl WidgetImpl for VariableRow {}

impl ListBoxRowImpl for VariableRow {}

impl PreferencesRowImpl for VariableRow {}

impl ActionRowImpl for VariableRow {}
