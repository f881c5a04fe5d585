mod imp;

use std::rc::Rc;

use adw::Application;
use adw::prelude::*;
use adw::subclass::prelude::ObjectSubclassIsExt;
use anyhow::{Context, Result};
use gtk::{gio, glib};
use gtk::glib::{clone, g_log, LogLevel, Object};
use log::info;
use varedit::config;
use varedit::{EditorEvent, MemoryStore, TomlStore, VariableTable};

use crate::variable_row::VariableRow;

glib::wrapper! {
    pub struct Window(ObjectSubclass<imp::Window>)
        @extends adw::ApplicationWindow, gtk::ApplicationWindow, gtk::Window, gtk::Widget,
        @implements gio::ActionGroup, gio::ActionMap, gtk::Accessible, gtk::Buildable,
                    gtk::ConstraintTarget, gtk::Native, gtk::Root, gtk::ShortcutManager;
}

impl Window {
    pub fn new(app: &Application) -> Self {
        Object::builder::<Self>().property("application", app).build()
    }

    fn setup_store(&self) {
        let path = config::user_settings_path()
            .unwrap_or_else(|| glib::user_config_dir().join("varedit").join("settings.toml"));
        match TomlStore::open(&path) {
            Ok(store) => {
                self.imp().store.replace(Some(store));
            }
            Err(e) => {
                // Leave the broken file alone; nothing is saved this session.
                g_log!(LogLevel::Warning, "{e}, settings will not be saved");
            }
        }
    }

    fn setup_editors(&self) {
        let imp = self.imp();
        let mut editors = imp.editors.borrow_mut();
        for def in config::load() {
            let row = VariableRow::new(&def);
            imp.group.add(&row);
            if let Some(editor) = row.editor() {
                editors.add(editor);
            }
        }

        editors.connect_interface();
        editors.connect_listener(VariableTable::listener(&imp.table));
        let window = self.downgrade();
        editors.connect_listener(Rc::new(move |event: &EditorEvent| {
            if let EditorEvent::SettingsUpdated = event {
                if let Some(window) = window.upgrade() {
                    window.refresh_active_label();
                }
            }
        }));
    }

    fn setup_callbacks(&self) {
        self.imp().reset_button.connect_clicked(
            clone!(@weak self as window => move |_| {
                window.imp().editors.borrow().reset_default_values();
            }),
        );
        self.imp().save_button.connect_clicked(
            clone!(@weak self as window => move |_| {
                if let Err(e) = window.save_settings() {
                    g_log!(LogLevel::Error, "Could not save settings: {e:#}");
                }
            }),
        );
    }

    fn load_settings(&self) {
        let imp = self.imp();
        let editors = imp.editors.borrow();
        match imp.store.borrow().as_ref() {
            Some(store) => editors.load_settings(store),
            None => editors.load_settings(&MemoryStore::new()),
        }
        self.refresh_active_label();
    }

    fn save_settings(&self) -> Result<()> {
        let imp = self.imp();
        let mut store = imp.store.borrow_mut();
        let store = match store.as_mut() {
            Some(store) => store,
            None => return Ok(()),
        };
        imp.editors.borrow().save_settings(&mut *store);
        if store.is_dirty() {
            store.save().context("Could not write settings file")?;
        } else {
            info!("Settings unchanged");
        }

        Ok(())
    }

    fn refresh_active_label(&self) {
        let table = self.imp().table.borrow();
        let label = if table.is_empty() {
            "No variables enabled".to_string()
        } else {
            table.summary()
        };
        self.imp().active_label.set_label(&label);
    }
}
