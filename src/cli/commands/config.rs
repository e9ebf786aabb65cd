//! `curtain config` command - Configuration management
//!
//! Provides commands to view and modify the default selections.

use clap::{Subcommand, ValueEnum};
use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::PROJECT_CONFIG_FILE;
use crate::core::{Config, PleatStyle, WindowType};

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration values
    Show(ShowArgs),

    /// Set a configuration value
    Set(SetArgs),

    /// Unset (remove) a configuration value
    Unset(UnsetArgs),

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

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Configuration key (window, style, default_format)
    pub key: String,

    /// Value to set
    pub value: String,

    /// Set in global (user) config instead of project config
    #[arg(long, short = 'g')]
    pub global: bool,
}

#[derive(clap::Args, Debug)]
pub struct UnsetArgs {
    /// Configuration key to remove
    pub key: String,

    /// Remove from global (user) config instead of project config
    #[arg(long, short = 'g')]
    pub global: bool,
}

/// Valid configuration keys
const VALID_KEYS: &[(&str, &str)] = &[
    ("window", "Default window type (full, partial)"),
    (
        "style",
        "Default pleat style (butterfly, back-matched, plain)",
    ),
    (
        "default_format",
        "Default output format (text, json, yaml, csv, tsv, md)",
    ),
];

/// Run a config subcommand
pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => run_show(args, global),
        ConfigCommands::Set(args) => run_set(args),
        ConfigCommands::Unset(args) => run_unset(args),
        ConfigCommands::Path => run_path(),
        ConfigCommands::Keys => run_keys(),
    }
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load(global.config.as_deref())?;

    if let Some(key) = &args.key {
        validate_key(key)?;
        return match config.get(key) {
            Some(v) => {
                println!("{}", v);
                Ok(())
            }
            None => Err(miette::miette!("Key '{}' is not set", key)),
        };
    }

    println!("{}", style("Effective Configuration").bold().underlined());
    println!();
    for (key, _) in VALID_KEYS {
        print_config_value(key, config.get(key));
    }

    println!();
    println!("{}", style("Config Sources (in priority order):").dim());
    println!("  1. Environment variables (CURTAIN_WINDOW, CURTAIN_STYLE, CURTAIN_FORMAT)");
    println!("  2. --config file (CURTAIN_CONFIG)");
    println!("  3. Project config ({})", PROJECT_CONFIG_FILE);
    println!("  4. Global config (~/.config/curtain/config.yaml)");

    Ok(())
}

fn run_set(args: SetArgs) -> Result<()> {
    validate_key(&args.key)?;
    validate_value(&args.key, &args.value)?;

    let config_path = target_path(args.global)?;
    let mut config_map = read_config_map(&config_path)?;
    config_map.insert(
        serde_yml::Value::String(args.key.clone()),
        serde_yml::Value::String(args.value.clone()),
    );
    write_config(&config_path, config_map)?;

    let scope = if args.global { "global" } else { "project" };
    println!(
        "{} Set {} {} {} in {} config",
        style("✓").green(),
        style(&args.key).cyan(),
        style("→").dim(),
        style(&args.value).yellow(),
        scope
    );

    Ok(())
}

fn run_unset(args: UnsetArgs) -> Result<()> {
    validate_key(&args.key)?;

    let config_path = target_path(args.global)?;
    if !config_path.exists() {
        return Err(miette::miette!(
            "Config file does not exist: {}",
            config_path.display()
        ));
    }

    let mut config_map = read_config_map(&config_path)?;
    let key = serde_yml::Value::String(args.key.clone());
    if config_map.remove(&key).is_none() {
        return Err(miette::miette!("Key '{}' not found in config", args.key));
    }
    write_config(&config_path, config_map)?;

    let scope = if args.global { "global" } else { "project" };
    println!(
        "{} Removed {} from {} config",
        style("✓").green(),
        style(&args.key).cyan(),
        scope
    );

    Ok(())
}

fn run_path() -> Result<()> {
    let global_path = get_global_config_path()?;
    let project_path = get_project_config_path()?;

    println!("{}", style("Configuration file paths:").bold());
    println!();
    print_path("Global: ", &global_path);
    println!();
    print_path("Project:", &project_path);

    Ok(())
}

fn run_keys() -> Result<()> {
    println!("{}", style("Available configuration keys:").bold());
    println!();

    for (key, description) in VALID_KEYS {
        println!("  {:<20} {}", style(key).cyan(), style(description).dim());
    }

    println!();
    println!(
        "{}",
        style("Use 'curtain config set <key> <value>' to set a value.").dim()
    );

    Ok(())
}

// Helper functions

fn validate_key(key: &str) -> Result<()> {
    if VALID_KEYS.iter().any(|(k, _)| *k == key) {
        Ok(())
    } else {
        let keys: Vec<&str> = VALID_KEYS.iter().map(|(k, _)| *k).collect();
        Err(miette::miette!(
            help = format!("Valid keys: {}", keys.join(", ")),
            "Unknown config key '{}'",
            key
        ))
    }
}

fn validate_value(key: &str, value: &str) -> Result<()> {
    match key {
        "window" => {
            value.parse::<WindowType>()?;
        }
        "style" => {
            value.parse::<PleatStyle>()?;
        }
        _ => {
            OutputFormat::from_str(value, true)
                .map_err(|_| miette::miette!("Unknown output format '{}'", value))?;
        }
    }
    Ok(())
}

fn target_path(global: bool) -> Result<PathBuf> {
    if global {
        get_global_config_path()
    } else {
        get_project_config_path()
    }
}

fn get_global_config_path() -> Result<PathBuf> {
    Config::global_config_path()
        .ok_or_else(|| miette::miette!("Could not determine global config directory"))
}

/// Existing project config above the cwd, else one in the cwd
fn get_project_config_path() -> Result<PathBuf> {
    let cwd = std::env::current_dir().into_diagnostic()?;
    Ok(Config::find_project_config(&cwd).unwrap_or_else(|| cwd.join(PROJECT_CONFIG_FILE)))
}

/// Existing file as a YAML map; keys this tool does not know are kept
fn read_config_map(path: &Path) -> Result<serde_yml::Mapping> {
    if !path.exists() {
        return Ok(serde_yml::Mapping::new());
    }
    let content = fs::read_to_string(path).into_diagnostic()?;
    let parsed: serde_yml::Value = serde_yml::from_str(&content).map_err(|e| {
        miette::miette!(
            help = "Fix or remove the file, then try again",
            "Cannot parse config file {}; leaving it unchanged: {}",
            path.display(),
            e
        )
    })?;
    match parsed {
        serde_yml::Value::Null => Ok(serde_yml::Mapping::new()),
        serde_yml::Value::Mapping(map) => Ok(map),
        _ => Err(miette::miette!(
            "Config file {} is not a YAML map; leaving it unchanged",
            path.display()
        )),
    }
}

fn write_config(path: &Path, config_map: serde_yml::Mapping) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).into_diagnostic()?;
    }
    let yaml = serde_yml::to_string(&serde_yml::Value::Mapping(config_map)).into_diagnostic()?;
    fs::write(path, yaml).into_diagnostic()?;
    Ok(())
}

fn print_config_value(key: &str, value: Option<&str>) {
    if let Some(v) = value {
        println!("  {}: {}", style(key).cyan(), style(v).yellow());
    } else {
        println!("  {}: {}", style(key).cyan(), style("(not set)").dim());
    }
}

fn print_path(label: &str, path: &Path) {
    println!("  {} {}", style(label).cyan(), path.display());
    if path.exists() {
        println!("           {}", style("(exists)").green());
    } else {
        println!("           {}", style("(not created)").dim());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("window").is_ok());
        assert!(validate_key("style").is_ok());
        assert!(validate_key("default_format").is_ok());
        assert!(validate_key("author").is_err());
    }

    #[test]
    fn test_read_config_map_keeps_unknown_keys() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join(PROJECT_CONFIG_FILE);
        fs::write(&path, "style: plain\nshop: 노노파이어\n").unwrap();

        let mut map = read_config_map(&path).unwrap();
        map.insert(
            serde_yml::Value::String("window".to_string()),
            serde_yml::Value::String("partial".to_string()),
        );
        write_config(&path, map).unwrap();

        let written: serde_yml::Value =
            serde_yml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["shop"].as_str(), Some("노노파이어"));
        assert_eq!(written["style"].as_str(), Some("plain"));
        assert_eq!(written["window"].as_str(), Some("partial"));
    }

    #[test]
    fn test_read_config_map_rejects_malformed_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join(PROJECT_CONFIG_FILE);
        fs::write(&path, "style: [unclosed\n").unwrap();
        assert!(read_config_map(&path).is_err());

        fs::write(&path, "- plain\n").unwrap();
        assert!(read_config_map(&path).is_err());

        assert!(read_config_map(&tmp.path().join("missing.yaml")).unwrap().is_empty());
    }

    #[test]
    fn test_validate_value() {
        assert!(validate_value("window", "통창").is_ok());
        assert!(validate_value("window", "bay").is_err());
        assert!(validate_value("style", "plain").is_ok());
        assert!(validate_value("style", "pinch").is_err());
        assert!(validate_value("default_format", "json").is_ok());
        assert!(validate_value("default_format", "xml").is_err());
    }
}
