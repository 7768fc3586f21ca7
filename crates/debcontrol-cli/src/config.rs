use std::fs;
use std::path::Path;
use std::str::FromStr;

use debcontrol::{ControlParser, DEFAULT_LINE_CAPACITY};
use serde::Deserialize;
use tracing::debug;

use crate::error::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown format {other:?}, expected text or json")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub line_capacity: usize,
    pub format: OutputFormat,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            line_capacity: DEFAULT_LINE_CAPACITY,
            format: OutputFormat::Text,
        }
    }
}

impl CliConfig {
    /// Builds a parser, preferring an explicit capacity over the configured one.
    pub fn parser(&self, line_capacity: Option<usize>) -> Result<ControlParser, CliError> {
        let capacity = line_capacity.unwrap_or(self.line_capacity);
        if capacity == 0 {
            return Err(CliError::ZeroLineCapacity);
        }
        Ok(ControlParser::with_line_capacity(capacity))
    }
}

pub fn load_config(path: &Path) -> Result<CliConfig, CliError> {
    let contents = fs::read_to_string(path)?;
    let config = toml::from_str(&contents)?;
    Ok(config)
}

pub fn load_config_or_default(path: &Path) -> Result<CliConfig, CliError> {
    if path.exists() {
        debug!(path = %path.display(), "loading config");
        load_config(path)
    } else {
        Ok(CliConfig::default())
    }
}
