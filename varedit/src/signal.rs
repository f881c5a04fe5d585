use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::value::Value;

#[derive(Clone, Debug, PartialEq)]
pub enum EditorEvent {
    VarEnable { name: String, value: Value },
    VarDisable { name: String },
    SettingsUpdated,
}

pub type Listener = Rc<dyn Fn(&EditorEvent)>;

/// Observer list of an editor.
#[derive(Default)]
pub struct Signals {
    listeners: RefCell<Vec<Listener>>,
}

impl Signals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect<F: Fn(&EditorEvent) + 'static>(&self, f: F) {
        self.listeners.borrow_mut().push(Rc::new(f));
    }

    pub fn connect_listener(&self, listener: Listener) {
        self.listeners.borrow_mut().push(listener);
    }

    pub fn emit(&self, event: EditorEvent) {
        // Listeners may connect further listeners while being called.
        let listeners: Vec<Listener> = self.listeners.borrow().clone();
        for listener in listeners {
            listener(&event);
        }
    }
}

/// Tracks which variables are currently enabled, and with what value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VariableTable {
    vars: BTreeMap<String, Value>,
    updates: usize,
}

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: &EditorEvent) {
        match event {
            EditorEvent::VarEnable { name, value } => {
                self.vars.insert(name.clone(), value.clone());
            }
            EditorEvent::VarDisable { name } => {
                self.vars.remove(name);
            }
            EditorEvent::SettingsUpdated => self.updates += 1,
        }
    }

    /// A listener feeding `table`.
    pub fn listener(table: &Rc<RefCell<VariableTable>>) -> Listener {
        let table = Rc::downgrade(table);
        Rc::new(move |event: &EditorEvent| {
            if let Some(table) = table.upgrade() {
                table.borrow_mut().apply(event);
            }
        })
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.vars.iter()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Number of `SettingsUpdated` events seen.
    pub fn updates(&self) -> usize {
        self.updates
    }

    /// `name=value` pairs joined by spaces, in name order.
    pub fn summary(&self) -> String {
        self.vars.iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_reaches_all_listeners() {
        let signals = Signals::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        for _ in 0..2 {
            let seen = seen.clone();
            signals.connect(move |e| seen.borrow_mut().push(e.clone()));
        }
        signals.emit(EditorEvent::SettingsUpdated);
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_variable_table() {
        let table = Rc::new(RefCell::new(VariableTable::new()));
        let signals = Signals::new();
        signals.connect_listener(VariableTable::listener(&table));

        signals.emit(EditorEvent::VarEnable { name: "feed".to_string(), value: Value::Double(2.0) });
        signals.emit(EditorEvent::VarEnable { name: "cool".to_string(), value: Value::from("M8") });
        signals.emit(EditorEvent::SettingsUpdated);
        assert_eq!(table.borrow().summary(), "cool=M8 feed=2");

        signals.emit(EditorEvent::VarDisable { name: "feed".to_string() });
        assert!(table.borrow().get("feed").is_none());
        assert_eq!(table.borrow().len(), 1);
        assert_eq!(table.borrow().updates(), 1);
    }
}
