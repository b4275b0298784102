//! CLI execution context

use anyhow::{Context as _, Result};
use clap::ValueEnum;
use predict_studio_sdk::{SdkConfig, StudioClient};
use std::path::PathBuf;
use std::time::Duration;

use crate::cli::Cli;
use crate::config::{CliConfig, Profile};
use crate::download::FileDownloadSink;
use crate::output::{OutputFormat, OutputWriter};

/// Execution context for CLI commands
pub struct Context {
    /// CLI configuration
    pub config: CliConfig,

    /// Active profile name
    pub profile_name: Option<String>,

    /// Active profile
    pub profile: Profile,

    /// Resolved output format
    pub output_format: OutputFormat,

    /// Output writer
    pub output: OutputWriter,

    /// Verbose mode
    pub verbose: bool,

    /// API URL override
    pub api_url_override: Option<String>,
}

impl Context {
    /// Create a new context from CLI arguments
    pub fn new(cli: &Cli) -> Result<Self> {
        let config = CliConfig::load().unwrap_or_default();

        let profile_name = cli.profile.clone().or_else(|| config.default_profile.clone());
        let profile = config
            .get_profile(profile_name.as_deref())
            .cloned()
            .unwrap_or_default();

        let output_format = resolve_output_format(cli.output, &profile, &config);
        let no_color = cli.no_color || !config.settings.color;
        let output = OutputWriter::new(output_format, no_color);

        Ok(Self {
            verbose: cli.verbose || config.settings.verbose,
            config,
            profile_name,
            profile,
            output_format,
            output,
            api_url_override: cli.api_url.clone(),
        })
    }

    /// Get the effective API URL
    pub fn api_url(&self) -> &str {
        self.api_url_override
            .as_deref()
            .unwrap_or_else(|| self.profile.api_url())
    }

    /// Create an SDK client
    pub fn create_client(&self) -> Result<StudioClient> {
        let timeout = Duration::from_secs(self.config.settings.timeout_secs);

        let mut config = SdkConfig::new(self.api_url())
            .with_timeout(timeout)
            .with_max_retries(self.config.settings.max_retries);

        if self.verbose {
            config = config.with_logging(true);
        }

        for (name, value) in &self.profile.headers {
            config = config.with_header(name.clone(), value.clone());
        }

        StudioClient::new(config).context("Failed to create API client")
    }

    /// Directory downloads are saved into, `override_dir` first
    pub fn download_dir(&self, override_dir: Option<PathBuf>) -> PathBuf {
        override_dir.unwrap_or_else(|| self.config.settings.download_dir())
    }

    /// Sink saving downloads into [`Context::download_dir`]
    pub fn download_sink(&self, override_dir: Option<PathBuf>) -> Result<FileDownloadSink> {
        let dir = self.download_dir(override_dir);
        FileDownloadSink::new(&dir)
            .with_context(|| format!("Failed to prepare download directory {:?}", dir))
    }
}

/// `--output` first, then the profile's format, then the global setting.
///
/// Unparseable configured values fall through to the next source.
fn resolve_output_format(flag: Option<OutputFormat>, profile: &Profile, config: &CliConfig) -> OutputFormat {
    let parse = |s: &str| OutputFormat::from_str(s, true).ok();
    flag.or_else(|| profile.output_format.as_deref().and_then(parse))
        .or_else(|| parse(&config.settings.output_format))
        .unwrap_or_default()
}
