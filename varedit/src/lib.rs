#[macro_use]
extern crate lazy_static;

pub mod config;
pub mod controls;
pub mod editor;
pub mod headless;
pub mod signal;
pub mod store;
pub mod value;

pub use controls::{ChangeHandler, ChoiceControl, NumericControl, ToggleControl};
pub use editor::{
    BoolComboVariableEditor, DoubleSpinVariableEditor, EditorBase, EditorSet, EditorState, ValueComboVariableEditor,
    VariableEditor,
};
pub use signal::{EditorEvent, Listener, Signals, VariableTable};
pub use store::{MemoryStore, SettingsStore, StoreError, TomlStore};
pub use value::Value;
