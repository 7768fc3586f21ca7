use std::io::Write;
use std::path::PathBuf;

use debcontrol::{ControlError, key_value_map, parse_file_with};
use thiserror::Error;

use crate::config::load_config_or_default;
use crate::error::CliError;

#[derive(Debug, Error)]
pub enum GetCommandError {
    #[error("config error: {0}")]
    Config(#[from] CliError),
    #[error("{}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ControlError,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("key {key:?} not found in {}", path.display())]
    MissingKey { key: String, path: PathBuf },
}

#[derive(Debug, Clone)]
pub struct GetOptions {
    pub file: PathBuf,
    pub key: String,
    pub line_capacity: Option<usize>,
    pub config_path: PathBuf,
}

pub fn run_get(options: &GetOptions, out: &mut impl Write) -> Result<(), GetCommandError> {
    let config = load_config_or_default(&options.config_path)?;
    let parser = config.parser(options.line_capacity)?;
    let records =
        parse_file_with(&parser, &options.file).map_err(|source| GetCommandError::Parse {
            path: options.file.clone(),
            source,
        })?;
    let fields = key_value_map(&records);
    let value = fields
        .get(&options.key)
        .ok_or_else(|| GetCommandError::MissingKey {
            key: options.key.clone(),
            path: options.file.clone(),
        })?;
    writeln!(out, "{value}")?;
    Ok(())
}
