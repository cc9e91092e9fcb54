use anyhow::{anyhow, Context, Result};
use lcep_core::PlanningConfig;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Serialization formats accepted for a planning configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl FromStr for ConfigFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "toml" => Ok(ConfigFormat::Toml),
            "yaml" | "yml" => Ok(ConfigFormat::Yaml),
            "json" => Ok(ConfigFormat::Json),
            other => Err(anyhow!("unknown config format '{other}' (toml, yaml, json)")),
        }
    }
}

fn parse(data: &str, format: ConfigFormat) -> Result<PlanningConfig> {
    match format {
        ConfigFormat::Toml => toml::from_str(data).context("parsing config toml"),
        ConfigFormat::Yaml => serde_yaml::from_str(data).context("parsing config yaml"),
        ConfigFormat::Json => serde_json::from_str(data).context("parsing config json"),
    }
}

/// Load a planning configuration and validate it.
///
/// The format follows the file extension; an unknown extension tries TOML,
/// then YAML, then JSON. Keys the file omits keep their defaults.
pub fn load_config_from_path(path: &Path) -> Result<PlanningConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading planning config '{}'", path.display()))?;
    let config = match ConfigFormat::from_path(path) {
        Some(format) => parse(&data, format)?,
        None => parse(&data, ConfigFormat::Toml)
            .or_else(|_| parse(&data, ConfigFormat::Yaml))
            .or_else(|_| parse(&data, ConfigFormat::Json))
            .context("parsing planning config")?,
    };
    config
        .validate()
        .with_context(|| format!("validating planning config '{}'", path.display()))?;
    Ok(config)
}

pub fn render_config(config: &PlanningConfig, format: ConfigFormat) -> Result<String> {
    match format {
        ConfigFormat::Toml => toml::to_string_pretty(config).context("rendering config toml"),
        ConfigFormat::Yaml => serde_yaml::to_string(config).context("rendering config yaml"),
        ConfigFormat::Json => {
            serde_json::to_string_pretty(config).context("rendering config json")
        }
    }
}
