//! `tsa config` command - Configuration inspection

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::find_workspace;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show(ShowArgs),

    /// Show paths to configuration files
    Path,

    /// List all available configuration keys
    Keys,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value
    pub key: Option<String>,
}

const KEYS: [(&str, &str); 6] = [
    ("inspector", "Default inspector for new projects"),
    ("position", "Default inspector position"),
    ("company", "Default inspector company"),
    ("default_type", "Construction type for new sections"),
    ("unit_length", "Span length for new sections (m)"),
    ("log_level", "Log filter when RUST_LOG is unset"),
];

pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => run_show(args, global),
        ConfigCommands::Path => run_path(global),
        ConfigCommands::Keys => run_keys(),
    }
}

/// Effective value of one key, including built-in fallbacks
fn effective_value(config: &Config, key: &str) -> Option<String> {
    match key {
        "inspector" => Some(config.inspector.clone().unwrap_or_default()),
        "position" => Some(config.position.clone().unwrap_or_default()),
        "company" => Some(config.company.clone().unwrap_or_default()),
        "default_type" => Some(config.construction_type().key().to_string()),
        "unit_length" => Some(config.unit_length().to_string()),
        "log_level" => Some(
            config
                .log_level
                .clone()
                .unwrap_or_else(|| crate::core::logging::DEFAULT_LEVEL.to_string()),
        ),
        _ => None,
    }
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let config = &global.config;

    if let Some(key) = args.key {
        let value = effective_value(config, &key)
            .ok_or_else(|| miette::miette!("Unknown config key '{}'. See 'tsa config keys'.", key))?;
        println!("{}", value);
        return Ok(());
    }

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(config).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(config).into_diagnostic()?);
        }
        _ => {
            for (key, _) in KEYS {
                let value = effective_value(config, key).unwrap_or_default();
                println!("{}: {}", style(key).bold(), value);
            }
        }
    }
    Ok(())
}

fn run_path(global: &GlobalOpts) -> Result<()> {
    match Config::global_config_path() {
        Some(path) => println!("{}: {}", style("global").bold(), path.display()),
        None => println!("{}: {}", style("global").bold(), style("(unavailable)").dim()),
    }
    match find_workspace(global) {
        Ok(workspace) => println!(
            "{}: {}",
            style("workspace").bold(),
            workspace.config_path().display()
        ),
        Err(_) => println!(
            "{}: {}",
            style("workspace").bold(),
            style("(not in a workspace)").dim()
        ),
    }
    Ok(())
}

fn run_keys() -> Result<()> {
    for (key, description) in KEYS {
        println!("{:<14} {}", style(key).cyan(), description);
    }
    println!();
    println!(
        "Environment overrides: {}",
        style("TSA_INSPECTOR, TSA_POSITION, TSA_COMPANY, TSA_LOG").yellow()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_values_fall_back_to_defaults() {
        let config = Config::default();
        assert_eq!(effective_value(&config, "default_type").unwrap(), "natm-rc");
        assert_eq!(effective_value(&config, "unit_length").unwrap(), "20");
        assert_eq!(effective_value(&config, "log_level").unwrap(), "warn");
        assert_eq!(effective_value(&config, "inspector").unwrap(), "");
        assert!(effective_value(&config, "editor").is_none());
    }

    #[test]
    fn test_every_key_has_a_value() {
        let config = Config::default();
        for (key, _) in KEYS {
            assert!(effective_value(&config, key).is_some(), "{}", key);
        }
    }
}
