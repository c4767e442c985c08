//! Config subcommand handlers.

use dialoguer::{Input, Select};

use twinkly_core::EntityKind;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::commands::util;
use crate::config::{self, Config, DeviceEntry};
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }
        ConfigCommand::Show => show(global),
        ConfigCommand::Init => init(global),
    }
}

fn show(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_config()?;
    let out = match global.output {
        OutputFormat::Table | OutputFormat::Plain => toml::to_string_pretty(&cfg)?,
        OutputFormat::Json => serde_json::to_string_pretty(&cfg)?,
        OutputFormat::JsonCompact => serde_json::to_string(&cfg)?,
        OutputFormat::Yaml => serde_yaml::to_string(&cfg)?,
    };
    output::print_output(out.trim_end(), global.quiet);
    Ok(())
}

fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let path = config::config_path();

    let entry = match config::entry_from_flags(global)? {
        Some(entry) => entry,
        None => prompt_entry()?,
    };

    if path.exists()
        && !util::confirm(&format!("Overwrite {}?", path.display()), global.yes)?
    {
        output::print_output("Aborted.", global.quiet);
        return Ok(());
    }

    let mut cfg = Config {
        devices: vec![entry],
        ..Config::default()
    };
    if let Some(timeout) = global.timeout {
        cfg.timeout_secs = timeout;
    }

    let written = config::save_config(&cfg)?;
    output::print_output(&format!("Wrote {}", written.display()), global.quiet);
    Ok(())
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn prompt_entry() -> Result<DeviceEntry, CliError> {
    let host: String = Input::new()
        .with_prompt("Device address (IP or hostname)")
        .validate_with(|input: &String| twinkly_config::validate_host(input))
        .interact_text()
        .map_err(prompt_err)?;

    let name: String = Input::new()
        .with_prompt("Display name (empty for default)")
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)?;

    let kinds = [EntityKind::Light, EntityKind::Switch];
    let selection = Select::new()
        .with_prompt("Expose as")
        .items(&kinds)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    Ok(DeviceEntry {
        host: host.trim().to_owned(),
        name: Some(name.trim().to_owned()).filter(|n| !n.is_empty()),
        kind: kinds.get(selection).copied().unwrap_or_default(),
    })
}
