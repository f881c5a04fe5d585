use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, LevelFilter};

use varedit::config::{self, EditorDef, EditorKind};
use varedit::headless::HeadlessForm;
use varedit::{EditorEvent, EditorState, TomlStore, VariableTable};

#[derive(Parser)]
#[clap(version, about = "Inspect and edit persisted variable settings")]
struct Opts {
    /// Settings file. Defaults to the user config directory
    #[clap(short, long, global = true)]
    settings: Option<PathBuf>,
    /// Editor definition file. Defaults to the user, then system, definitions
    #[clap(short, long, global = true)]
    editors: Option<PathBuf>,
    /// Do not write the settings file
    #[clap(short('n'), long("dry-run"), global = true)]
    dry_run: bool,
    /// A level of verbosity, and can be used multiple times
    #[clap(short, long, parse(from_occurrences), global = true)]
    verbose: u64,
    #[clap(subcommand)]
    subcmd: SubCommand,
}

#[derive(Subcommand)]
enum SubCommand {
    List(ListSubCommand),
    Show(ShowSubCommand),
    Enable(EnableSubCommand),
    Disable(DisableSubCommand),
    Reset(ResetSubCommand),
}

/// List editor definitions
#[derive(Parser)]
struct ListSubCommand {}

/// Show every variable and the ones currently enabled
#[derive(Parser)]
struct ShowSubCommand {}

/// Enable a variable, optionally setting its value first
#[derive(Parser)]
struct EnableSubCommand {
    /// Variable name
    variable: String,
    /// New value, as typed in the spin button or picked in the dropdown
    value: Option<String>,
}

/// Disable a variable
#[derive(Parser)]
struct DisableSubCommand {
    /// Variable name
    variable: String,
}

/// Reset a variable, or all of them, to the default
#[derive(Parser)]
struct ResetSubCommand {
    /// Variable name
    variable: Option<String>,
}

fn init_logger(verbose: u64) {
    let mut builder = pretty_env_logger::formatted_builder();
    match std::env::var("RUST_LOG") {
        Ok(filters) => {
            builder.parse_filters(&filters);
        }
        Err(_) => {
            let level = match verbose {
                0 => LevelFilter::Warn,
                1 => LevelFilter::Info,
                2 => LevelFilter::Debug,
                _ => LevelFilter::Trace,
            };
            builder.filter_level(level);
        }
    }
    builder.init();
}

fn main() -> Result<()> {
    let opts: Opts = Opts::parse();
    init_logger(opts.verbose);

    let defs = match &opts.editors {
        Some(path) => config::parse_config_at(path)
            .with_context(|| format!("Could not load editors from {}", path.display()))?,
        None => config::load(),
    };

    if let SubCommand::List(_) = opts.subcmd {
        list(&defs);
        return Ok(());
    }

    let settings_path = match &opts.settings {
        Some(path) => path.clone(),
        None => config::user_settings_path().context("Could not find a config directory")?,
    };
    let mut store = TomlStore::open(&settings_path)?;
    let form = HeadlessForm::new(&defs);
    let table = Rc::new(RefCell::new(VariableTable::new()));
    form.set().connect_listener(VariableTable::listener(&table));
    form.set().load_settings(&store);

    match &opts.subcmd {
        SubCommand::List(_) => unreachable!(),
        SubCommand::Show(_) => {
            show(&form, &table.borrow());
            return Ok(());
        }
        SubCommand::Enable(t) => {
            form.set().connect_listener(Rc::new(print_event));
            let editor = form.get(&t.variable)?;
            if let Some(value) = &t.value {
                editor.user_set_value(value)?;
            }
            editor.user_set_checked(true);
        }
        SubCommand::Disable(t) => {
            form.set().connect_listener(Rc::new(print_event));
            form.get(&t.variable)?.user_set_checked(false);
        }
        SubCommand::Reset(t) => {
            form.set().connect_listener(Rc::new(print_event));
            match &t.variable {
                Some(variable) => form.get(variable)?.editor().reset_default_value(),
                None => form.set().reset_default_values(),
            }
        }
    }

    form.set().save_settings(&mut store);
    if opts.dry_run {
        info!("Would save settings to {}", store.path().display());
    } else if store.is_dirty() {
        store.save()?;
    }

    Ok(())
}

fn print_event(event: &EditorEvent) {
    match event {
        EditorEvent::VarEnable { name, value } => println!("enable {} = {}", name, value),
        EditorEvent::VarDisable { name } => println!("disable {}", name),
        EditorEvent::SettingsUpdated => {}
    }
}

fn list(defs: &[EditorDef]) {
    for def in defs {
        let kind = match &def.kind {
            EditorKind::DoubleSpin { default, min, max, .. } => format!("double_spin default={} range=[{}, {}]", default, min, max),
            EditorKind::BoolCombo { default, value_true, value_false, .. } => format!("bool_combo default={} true={} false={}", default, value_true, value_false),
            EditorKind::ValueCombo { items, default_index } => format!("value_combo default={} items={:?}", items[*default_index], items),
        };
        println!("{:<16} {} ({}, {})", def.variable, kind, def.check_key, def.value_key);
    }
}

fn show(form: &HeadlessForm, table: &VariableTable) {
    for editor in form.editors() {
        let mark = match editor.editor().state() {
            EditorState::Enabled => "x",
            EditorState::Disabled => " ",
        };
        println!("[{}] {:<16} {}", mark, editor.def().variable, editor.display_value());
    }
    println!("active: {}", table.summary());
}
