use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use log::{debug, warn};
use serde::Deserialize;
use thiserror::Error;

use crate::value::Value;

#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("Could not read editor definitions from {path:?}")]
	Read {
		path: PathBuf,
		#[source]
		source: io::Error,
	},
	#[error("Could not parse editor definitions")]
	Parse(#[from] toml::de::Error),
	#[error("{variable:?}: min {min} is greater than max {max}")]
	InvalidRange {
		variable: String,
		min: f64,
		max: f64,
	},
	#[error("{variable:?}: {field} must be a finite number")]
	NotFinite {
		variable: String,
		field: &'static str,
	},
	#[error("{variable:?}: default {default} is outside {min}..={max}")]
	DefaultOutOfRange {
		variable: String,
		default: f64,
		min: f64,
		max: f64,
	},
	#[error("{variable:?}: step {step} must be greater than zero")]
	InvalidStep {
		variable: String,
		step: f64,
	},
	#[error("{variable:?}: default index {index} is out of {len} items")]
	DefaultIndex {
		variable: String,
		index: usize,
		len: usize,
	},
	#[error("{variable:?} has no items")]
	NoItems {
		variable: String,
	},
	#[error("{variable:?} is defined more than once")]
	Duplicate {
		variable: String,
	},
}

#[derive(Clone, Debug, PartialEq)]
pub struct EditorDef {
	pub variable: String,
	pub label: String,
	pub check_key: String,
	pub value_key: String,
	pub kind: EditorKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum EditorKind {
	DoubleSpin {
		default: f64,
		min: f64,
		max: f64,
		step: f64,
		digits: u32,
	},
	BoolCombo {
		default: bool,
		true_label: String,
		false_label: String,
		value_true: Value,
		value_false: Value,
	},
	ValueCombo {
		items: Vec<String>,
		default_index: usize,
	},
}

impl EditorDef {
	fn validate(&self) -> Result<(), ConfigError> {
		match &self.kind {
			EditorKind::DoubleSpin { default, min, max, step, .. } => {
				for (field, value) in [("default", default), ("min", min), ("max", max), ("step", step)] {
					if !value.is_finite() {
						return Err(ConfigError::NotFinite{variable: self.variable.clone(), field});
					}
				}
				if min > max {
					return Err(ConfigError::InvalidRange{variable: self.variable.clone(), min: *min, max: *max});
				}
				if default < min || default > max {
					return Err(ConfigError::DefaultOutOfRange{variable: self.variable.clone(), default: *default, min: *min, max: *max});
				}
				if *step <= 0.0 {
					return Err(ConfigError::InvalidStep{variable: self.variable.clone(), step: *step});
				}
			}
			EditorKind::BoolCombo { .. } => {}
			EditorKind::ValueCombo { items, default_index } => {
				if items.is_empty() {
					return Err(ConfigError::NoItems{variable: self.variable.clone()});
				}
				if *default_index >= items.len() {
					return Err(ConfigError::DefaultIndex{variable: self.variable.clone(), index: *default_index, len: items.len()});
				}
			}
		}

		Ok(())
	}
}

lazy_static! {
	static ref DEFAULT_EDITORS: Vec<EditorDef> = vec![
		EditorDef {
			variable: "infill".to_string(),
			label: "Infill density (%)".to_string(),
			check_key: "infill/check".to_string(),
			value_key: "infill/value".to_string(),
			kind: EditorKind::DoubleSpin {
				default: 20.0,
				min: 0.0,
				max: 100.0,
				step: 5.0,
				digits: 0,
			},
		},
		EditorDef {
			variable: "tolerance".to_string(),
			label: "Tolerance".to_string(),
			check_key: "tolerance/check".to_string(),
			value_key: "tolerance/value".to_string(),
			kind: EditorKind::DoubleSpin {
				default: 0.01,
				min: 0.0001,
				max: 1.0,
				step: 0.001,
				digits: 4,
			},
		},
		EditorDef {
			variable: "supports".to_string(),
			label: "Generate supports".to_string(),
			check_key: "supports/check".to_string(),
			value_key: "supports/value".to_string(),
			kind: EditorKind::BoolCombo {
				default: false,
				true_label: "Yes".to_string(),
				false_label: "No".to_string(),
				value_true: Value::Double(1.0),
				value_false: Value::Double(0.0),
			},
		},
		EditorDef {
			variable: "layer_height".to_string(),
			label: "Layer height (mm)".to_string(),
			check_key: "layer_height/check".to_string(),
			value_key: "layer_height/value".to_string(),
			kind: EditorKind::ValueCombo {
				items: vec!["0.1".to_string(), "0.2".to_string(), "0.3".to_string()],
				default_index: 1,
			},
		},
	];
}

#[derive(Debug, Deserialize, PartialEq)]
struct RawConfig {
	editors: Option<Vec<RawEditorDef>>,
}

#[derive(Debug, Deserialize, PartialEq)]
struct RawEditorDef {
	variable: String,
	label: Option<String>,
	check_key: Option<String>,
	value_key: Option<String>,
	#[serde(flatten)]
	kind: RawEditorKind,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum RawEditorKind {
	DoubleSpin {
		default: Option<f64>,
		min: Option<f64>,
		max: Option<f64>,
		step: Option<f64>,
		digits: Option<u32>,
	},
	BoolCombo {
		default: Option<bool>,
		true_label: Option<String>,
		false_label: Option<String>,
		value_true: Option<Value>,
		value_false: Option<Value>,
	},
	ValueCombo {
		items: Vec<String>,
		default_index: Option<usize>,
	},
}

impl From<RawEditorDef> for EditorDef {
	fn from(raw: RawEditorDef) -> Self {
		EditorDef {
			label: raw.label.unwrap_or_else(|| raw.variable.clone()),
			check_key: raw.check_key.unwrap_or_else(|| format!("{}/check", raw.variable)),
			value_key: raw.value_key.unwrap_or_else(|| format!("{}/value", raw.variable)),
			variable: raw.variable,
			kind: raw.kind.into(),
		}
	}
}

impl From<RawEditorKind> for EditorKind {
	fn from(raw: RawEditorKind) -> Self {
		match raw {
			RawEditorKind::DoubleSpin { default, min, max, step, digits } => {
				let min = min.unwrap_or(0.0);
				let max = max.unwrap_or(100.0);
				EditorKind::DoubleSpin {
					default: default.unwrap_or(min),
					min,
					max,
					step: step.unwrap_or(1.0),
					digits: digits.unwrap_or(2),
				}
			}
			RawEditorKind::BoolCombo { default, true_label, false_label, value_true, value_false } => EditorKind::BoolCombo {
				default: default.unwrap_or(false),
				true_label: true_label.unwrap_or_else(|| "True".to_string()),
				false_label: false_label.unwrap_or_else(|| "False".to_string()),
				value_true: value_true.unwrap_or(Value::Bool(true)),
				value_false: value_false.unwrap_or(Value::Bool(false)),
			},
			RawEditorKind::ValueCombo { items, default_index } => EditorKind::ValueCombo {
				items,
				default_index: default_index.unwrap_or(0),
			},
		}
	}
}

pub fn default_editors() -> Vec<EditorDef> {
	DEFAULT_EDITORS.clone()
}

pub fn user_editors_path() -> Option<PathBuf> {
	dirs::config_dir().map(|dir| dir.join("varedit").join("editors.toml"))
}

pub fn user_settings_path() -> Option<PathBuf> {
	dirs::config_dir().map(|dir| dir.join("varedit").join("settings.toml"))
}

const SYSTEM_EDITORS_PATH: &str = "/etc/varedit/editors.toml";

/// Editor definitions from the user or system file, or the built-in set.
pub fn load() -> Vec<EditorDef> {
	let candidates = user_editors_path().into_iter().chain(Some(PathBuf::from(SYSTEM_EDITORS_PATH)));
	for path in candidates {
		if !path.exists() {
			continue;
		}
		match parse_config_at(&path) {
			Ok(editors) => {
				debug!("Loaded {} editor definitions from {}", editors.len(), path.display());
				return editors;
			}
			Err(e) => warn!("Ignoring {}: {}", path.display(), e),
		}
	}

	default_editors()
}

pub fn parse_config_at(path: &Path) -> Result<Vec<EditorDef>, ConfigError> {
	let s = fs::read_to_string(path).map_err(|source| ConfigError::Read{path: path.to_path_buf(), source})?;
	parse_config_str(&s)
}

pub fn parse_config_str(s: &str) -> Result<Vec<EditorDef>, ConfigError> {
	let raw: RawConfig = toml::from_str(s)?;
	let editors: Vec<EditorDef> = raw.editors.unwrap_or_default().into_iter().map(EditorDef::from).collect();

	let mut seen = HashSet::new();
	for editor in &editors {
		editor.validate()?;
		if !seen.insert(editor.variable.as_str()) {
			return Err(ConfigError::Duplicate{variable: editor.variable.clone()});
		}
	}

	Ok(editors)
}
