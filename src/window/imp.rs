use std::cell::RefCell;
use std::rc::Rc;

use adw::prelude::*;
use adw::subclass::prelude::*;
use gtk::{glib, CompositeTemplate, Inhibit};
use gtk::glib::subclass::InitializingObject;
use gtk::glib::{g_log, LogLevel};
use varedit::{EditorSet, TomlStore, VariableTable};

// Object holding the state
#[derive(CompositeTemplate, Default)]
#[template(resource = "/org/varedit/VarEdit/Window.ui")]
pub struct Window {
    #[template_child]
    pub group: TemplateChild<adw::PreferencesGroup>,
    #[template_child]
    pub active_label: TemplateChild<gtk::Label>,
    #[template_child]
    pub reset_button: TemplateChild<gtk::Button>,
    #[template_child]
    pub save_button: TemplateChild<gtk::Button>,
    pub editors: RefCell<EditorSet>,
    pub store: RefCell<Option<TomlStore>>,
    pub table: Rc<RefCell<VariableTable>>,
}

// The central trait for subclassing a GObject
#[glib::object_subclass]
impl ObjectSubclass for Window {
    // `NAME` needs to match `class` attribute of template
    const NAME: &'static str = "Window";
    type Type = super::Window;
    type ParentType = adw::ApplicationWindow;

    fn class_init(klass: &mut Self::Class) {
        klass.bind_template();
    }

    fn instance_init(obj: &InitializingObject<Self>) {
        obj.init_template();
    }
}

// Trait shared by all GObjects
impl ObjectImpl for Window {
    fn constructed(&self) {
        // Call "constructed" on parent
        self.parent_constructed();

        let obj = self.obj();
        obj.setup_store();
        obj.setup_editors();
        obj.setup_callbacks();
        obj.load_settings();
    }
}

// Trait shared by all widgets
impl WidgetImpl for Window {}

// Trait shared by all windows
impl WindowImpl for Window {
    fn close_request(&self) -> Inhibit {
        if let Err(e) = self.obj().save_settings() {
            g_log!(LogLevel::Warning, "Could not save settings: {e:#}");
        }

        self.parent_close_request()
    }
}

// Trait shared by all application windows
impl ApplicationWindowImpl for Window {}

// Trait shared by all application windows
impl AdwApplicationWindowImpl for Window {}
