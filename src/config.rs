// Configuration: command line / environment first, then an optional JSON
// config file, then built-in defaults.

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::pipeline::AssetRequest;

pub const DEFAULT_API_URL: &str = "https://api.pinata.cloud";
pub const DEFAULT_GATEWAY_URL: &str = "https://gateway.pinata.cloud";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Default, Parser)]
#[command(version, about = "Pin an image and its metadata to IPFS through Pinata", long_about = None)]
pub struct CliArgs {
    /// Pinata JWT sent as a bearer token. Left empty if unset.
    #[arg(long, env = "PINATA_JWT", hide_env_values = true)]
    pub jwt: Option<String>,

    /// URL of the image to pin
    #[arg(long)]
    pub image_url: Option<String>,

    /// Name written into the metadata document
    #[arg(long)]
    pub name: Option<String>,

    /// Description written into the metadata document
    #[arg(long)]
    pub description: Option<String>,

    #[arg(long, env = "PINATA_API_URL")]
    pub api_url: Option<String>,

    #[arg(long, env = "PINATA_GATEWAY_URL")]
    pub gateway_url: Option<String>,

    /// JSON config file. Defaults to `<config dir>/pinup/config.json` when present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// The path to an optional dotenv file to try and load
    /// if not set, will be the current working directory's .env
    #[arg(long)]
    pub dotenv: Option<PathBuf>,

    /// Log level in the format of comma-separated tracing directives.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Prompt for name and description before uploading
    #[arg(long)]
    pub interactive: bool,
}

/// Contents of the optional config file. Every field may be omitted.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub jwt: Option<String>,
    pub image_url: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub api_url: Option<String>,
    pub gateway_url: Option<String>,
    pub log_level: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub jwt: String,
    pub api_url: String,
    pub gateway_url: String,
    pub log_level: Vec<String>,
    pub asset: AssetRequest,
    pub interactive: bool,
}

impl Config {
    /// Resolve the final configuration. An explicit `--config` path must
    /// exist; the default location is only read if it does.
    pub fn build(args: CliArgs) -> Result<Self> {
        let file = match &args.config {
            Some(path) => FileConfig::load(path)?,
            None => match default_config_path().filter(|p| p.is_file()) {
                Some(path) => FileConfig::load(&path)?,
                None => FileConfig::default(),
            },
        };
        Ok(Self::merge(args, file))
    }

    pub fn merge(args: CliArgs, file: FileConfig) -> Self {
        let defaults = AssetRequest::default();
        let log_level = args
            .log_level
            .or(file.log_level)
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Config {
            jwt: args.jwt.or(file.jwt).unwrap_or_default(),
            api_url: args
                .api_url
                .or(file.api_url)
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            gateway_url: args
                .gateway_url
                .or(file.gateway_url)
                .unwrap_or_else(|| DEFAULT_GATEWAY_URL.to_string()),
            log_level: log_level
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            asset: AssetRequest {
                image_url: args
                    .image_url
                    .or(file.image_url)
                    .unwrap_or(defaults.image_url),
                name: args.name.or(file.name).unwrap_or(defaults.name),
                description: args
                    .description
                    .or(file.description)
                    .unwrap_or(defaults.description),
            },
            interactive: args.interactive,
        }
    }

    pub fn tracing_env_filter(&self) -> Result<tracing_subscriber::EnvFilter> {
        let mut filter = tracing_subscriber::EnvFilter::from_default_env();
        for directive in &self.log_level {
            match directive.parse() {
                Ok(directive) => filter = filter.add_directive(directive),
                Err(err) => bail!("{}: {}", err, directive),
            }
        }

        Ok(filter)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pinup").join("config.json"))
}

/// Load `.env` from `path`, or from the working directory when `None`.
/// A missing default file is not an error.
pub fn load_dotenv(path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("Failed to load dotenv file {}", path.display()))?;
        }
        None => {
            let _ = dotenvy::dotenv();
        }
    }
    Ok(())
}
