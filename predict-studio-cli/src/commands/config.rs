//! Configuration commands

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand, ValueEnum};
use colored::Colorize;
use serde::Serialize;

use std::path::PathBuf;

use crate::config::CliConfig;
use crate::context::Context;
use crate::output::{print_field, print_section, OutputFormat, TableDisplay};

/// Configuration management commands
#[derive(Debug, Args)]
pub struct ConfigCommands {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Show the effective configuration
    Show,

    /// Get a configuration value
    Get {
        /// Configuration key (e.g. settings.download_dir, profile.lab.api_url)
        key: String,
    },

    /// Set a configuration value
    ///
    /// Bare profile fields such as `api_url` apply to the active profile.
    Set {
        /// Configuration key (e.g. settings.output_format, default_profile)
        key: String,

        /// Value to set
        value: String,
    },

    /// Show configuration file paths
    Path,

    /// Reset configuration to defaults
    Reset {
        /// Force reset without confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Execute configuration commands
pub async fn execute(ctx: &Context, cmd: ConfigCommands) -> Result<()> {
    match cmd.command {
        ConfigSubcommand::Show => show(ctx),
        ConfigSubcommand::Get { key } => {
            println!("{}", read_setting(&ctx.config, &key, ctx.profile_name.as_deref())?);
            Ok(())
        }
        ConfigSubcommand::Set { key, value } => set(ctx, &key, &value),
        ConfigSubcommand::Path => show_paths(ctx),
        ConfigSubcommand::Reset { force } => reset(ctx, force),
    }
}

/// What a prediction run would use right now
#[derive(Debug, Serialize)]
struct ConfigView {
    config_path: Option<PathBuf>,
    profile: Option<String>,
    api_url: String,
    output_format: String,
    color: bool,
    verbose: bool,
    timeout_secs: u64,
    max_retries: u32,
    download_dir: PathBuf,
}

impl ConfigView {
    fn from_context(ctx: &Context) -> Self {
        let settings = &ctx.config.settings;
        Self {
            config_path: CliConfig::config_path().ok(),
            profile: ctx.profile_name.clone(),
            api_url: ctx.api_url().to_string(),
            output_format: ctx.output_format.to_string(),
            color: settings.color,
            verbose: ctx.verbose,
            timeout_secs: settings.timeout_secs,
            max_retries: settings.max_retries,
            download_dir: settings.download_dir(),
        }
    }
}

impl TableDisplay for ConfigView {
    fn display_single(&self) {
        print_section("Configuration");
        let path = self
            .config_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string());
        print_field("Config file", &path);
        print_field("Profile", self.profile.as_deref().unwrap_or("none"));
        print_field("API URL", &self.api_url);
        print_field("Output format", &self.output_format);
        print_field("Color", &self.color.to_string());
        print_field("Verbose", &self.verbose.to_string());
        print_field("Timeout (s)", &self.timeout_secs.to_string());
        print_field("Max retries", &self.max_retries.to_string());
        print_field("Downloads", &self.download_dir.display().to_string());
    }

    fn display_compact(&self) {
        println!(
            "profile={} api_url={} output={}",
            self.profile.as_deref().unwrap_or("-"),
            self.api_url,
            self.output_format
        );
    }
}

fn show(ctx: &Context) -> Result<()> {
    ctx.output.write(&ConfigView::from_context(ctx))
}

fn set(ctx: &Context, key: &str, value: &str) -> Result<()> {
    let mut config = ctx.config.clone();
    apply_setting(&mut config, key, value, ctx.profile_name.as_deref())?;

    config.save().context("Failed to save configuration")?;
    ctx.output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

fn parse_format(value: &str) -> Result<String> {
    OutputFormat::from_str(value, true)
        .map(|f| f.to_string())
        .map_err(|_| anyhow::anyhow!("Invalid output format '{}': expected table, json, yaml or compact", value))
}

/// Split `key` into a profile and field, resolving bare fields against `active`.
fn profile_field<'a>(parts: &[&'a str], active: Option<&'a str>, key: &str) -> Result<(&'a str, &'a str)> {
    match parts {
        ["profile", name, field] => Ok((*name, *field)),
        [field] => {
            let name = active.with_context(|| {
                format!("No active profile for '{}'; use profile.<name>.{} or --profile", key, key)
            })?;
            Ok((name, *field))
        }
        _ => anyhow::bail!("Unknown configuration key: {}", key),
    }
}

fn apply_setting(config: &mut CliConfig, key: &str, value: &str, active: Option<&str>) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["settings", setting] => {
            let settings = &mut config.settings;
            match *setting {
                "output_format" => settings.output_format = parse_format(value)?,
                "color" => settings.color = value.parse().context("Invalid boolean value")?,
                "verbose" => settings.verbose = value.parse().context("Invalid boolean value")?,
                "timeout_secs" => settings.timeout_secs = value.parse().context("Invalid number")?,
                "max_retries" => settings.max_retries = value.parse().context("Invalid number")?,
                "download_dir" => settings.download_dir = Some(PathBuf::from(value)),
                _ => anyhow::bail!("Unknown setting: {}", setting),
            }
            return Ok(());
        }
        ["default_profile"] => {
            config.get_or_create_profile(value);
            config.set_default_profile(value);
            return Ok(());
        }
        _ => {}
    }

    let (name, field) = profile_field(&parts, active, key)?;
    let p = config.get_or_create_profile(name);
    match field {
        "api_url" => {
            url::Url::parse(value).with_context(|| format!("Invalid URL: {}", value))?;
            p.api_url = Some(value.to_string());
        }
        "output_format" => p.output_format = Some(parse_format(value)?),
        _ => anyhow::bail!("Unknown profile field: {}", field),
    }
    Ok(())
}

fn read_setting(config: &CliConfig, key: &str, active: Option<&str>) -> Result<String> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["settings", setting] => {
            let settings = &config.settings;
            return Ok(match *setting {
                "output_format" => settings.output_format.clone(),
                "color" => settings.color.to_string(),
                "verbose" => settings.verbose.to_string(),
                "timeout_secs" => settings.timeout_secs.to_string(),
                "max_retries" => settings.max_retries.to_string(),
                "download_dir" => settings.download_dir().display().to_string(),
                _ => anyhow::bail!("Unknown setting: {}", setting),
            });
        }
        ["default_profile"] => {
            return Ok(config.default_profile.clone().unwrap_or_else(|| "not set".to_string()))
        }
        _ => {}
    }

    let (name, field) = profile_field(&parts, active, key)?;
    let p = config
        .get_profile(Some(name))
        .with_context(|| format!("Profile '{}' not found", name))?;
    Ok(match field {
        "api_url" => p.api_url().to_string(),
        "output_format" => p.output_format.clone().unwrap_or_default(),
        _ => anyhow::bail!("Unknown profile field: {}", field),
    })
}

fn show_paths(ctx: &Context) -> Result<()> {
    println!("{}", "Configuration paths:".bold());
    println!();

    match CliConfig::config_path() {
        Ok(path) => {
            let status = if path.exists() { "✓".green() } else { "✗".red() };
            println!("  Config:    {} {}", status, path.display());
        }
        Err(e) => println!("  Config:    Error: {}", e),
    }

    println!("  Downloads: {}", ctx.config.settings.download_dir().display());

    Ok(())
}

fn reset(ctx: &Context, force: bool) -> Result<()> {
    if !force {
        let confirm = dialoguer::Confirm::new()
            .with_prompt("Reset all configuration to defaults? This cannot be undone.")
            .default(false)
            .interact()
            .context("Failed to get confirmation")?;

        if !confirm {
            ctx.output.info("Cancelled");
            return Ok(());
        }
    }

    CliConfig::default().save().context("Failed to save configuration")?;

    ctx.output.success("Configuration reset to defaults");
    Ok(())
}
