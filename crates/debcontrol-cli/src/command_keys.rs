use std::io::Write;
use std::path::PathBuf;

use debcontrol::{ControlError, parse_file_with};
use thiserror::Error;

use crate::config::load_config_or_default;
use crate::error::CliError;

#[derive(Debug, Error)]
pub enum KeysCommandError {
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
}

#[derive(Debug, Clone)]
pub struct KeysOptions {
    pub file: PathBuf,
    pub line_capacity: Option<usize>,
    pub config_path: PathBuf,
}

/// Prints every non-empty key in input order, duplicates included.
pub fn run_keys(options: &KeysOptions, out: &mut impl Write) -> Result<(), KeysCommandError> {
    let config = load_config_or_default(&options.config_path)?;
    let parser = config.parser(options.line_capacity)?;
    let records =
        parse_file_with(&parser, &options.file).map_err(|source| KeysCommandError::Parse {
            path: options.file.clone(),
            source,
        })?;
    for record in records.iter().filter(|record| !record.key.is_empty()) {
        writeln!(out, "{}", record.key)?;
    }
    Ok(())
}
