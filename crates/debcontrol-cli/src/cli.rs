use std::io::{self, Write};
use std::path::PathBuf;

use thiserror::Error;

use crate::command_get::{GetCommandError, GetOptions, run_get};
use crate::command_keys::{KeysCommandError, KeysOptions, run_keys};
use crate::command_show::{ShowCommandError, ShowOptions, run_show};
use crate::config::OutputFormat;

const DEFAULT_CONFIG_PATH: &str = "debcontrol.toml";

#[derive(Debug, Error)]
pub enum CliAppError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Show(#[from] ShowCommandError),
    #[error(transparent)]
    Get(#[from] GetCommandError),
    #[error(transparent)]
    Keys(#[from] KeysCommandError),
}

impl CliAppError {
    pub fn exit_code(&self) -> u8 {
        match self {
            CliAppError::Usage(_) => 2,
            _ => 1,
        }
    }
}

pub fn run() -> Result<(), CliAppError> {
    let args = std::env::args().skip(1).collect();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_with_args(args, &mut out)
}

fn run_with_args(args: Vec<String>, out: &mut impl Write) -> Result<(), CliAppError> {
    let mut args = args.into_iter();
    let command = args.next().ok_or_else(|| CliAppError::Usage(usage()))?;
    match command.as_str() {
        "show" => {
            let options = parse_show_options(args.collect())?;
            run_show(&options, out)?;
            Ok(())
        }
        "get" => {
            let options = parse_get_options(args.collect())?;
            run_get(&options, out)?;
            Ok(())
        }
        "keys" => {
            let options = parse_keys_options(args.collect())?;
            run_keys(&options, out)?;
            Ok(())
        }
        _ => Err(CliAppError::Usage(usage())),
    }
}

fn parse_show_options(args: Vec<String>) -> Result<ShowOptions, CliAppError> {
    let mut file = None;
    let mut format = None;
    let mut line_capacity = None;
    let mut config_path = PathBuf::from(DEFAULT_CONFIG_PATH);
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--file" => file = Some(PathBuf::from(next_value("--file", &mut iter)?)),
            "--format" => {
                let value = next_value("--format", &mut iter)?;
                let parsed = value
                    .parse::<OutputFormat>()
                    .map_err(|err| CliAppError::Usage(format!("{err}\n\n{}", usage())))?;
                format = Some(parsed);
            }
            "--line-capacity" => line_capacity = Some(parse_capacity(&mut iter)?),
            "--config" => config_path = PathBuf::from(next_value("--config", &mut iter)?),
            "--help" | "-h" => return Err(CliAppError::Usage(usage())),
            _ => return Err(CliAppError::Usage(usage())),
        }
    }
    let file = file.ok_or_else(|| CliAppError::Usage(usage()))?;
    Ok(ShowOptions {
        file,
        format,
        line_capacity,
        config_path,
    })
}

fn parse_get_options(args: Vec<String>) -> Result<GetOptions, CliAppError> {
    let mut file = None;
    let mut key = None;
    let mut line_capacity = None;
    let mut config_path = PathBuf::from(DEFAULT_CONFIG_PATH);
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--file" => file = Some(PathBuf::from(next_value("--file", &mut iter)?)),
            "--key" => key = Some(next_value("--key", &mut iter)?),
            "--line-capacity" => line_capacity = Some(parse_capacity(&mut iter)?),
            "--config" => config_path = PathBuf::from(next_value("--config", &mut iter)?),
            "--help" | "-h" => return Err(CliAppError::Usage(usage())),
            _ => return Err(CliAppError::Usage(usage())),
        }
    }
    let file = file.ok_or_else(|| CliAppError::Usage(usage()))?;
    let key = key.ok_or_else(|| CliAppError::Usage(usage()))?;
    Ok(GetOptions {
        file,
        key,
        line_capacity,
        config_path,
    })
}

fn parse_keys_options(args: Vec<String>) -> Result<KeysOptions, CliAppError> {
    let mut file = None;
    let mut line_capacity = None;
    let mut config_path = PathBuf::from(DEFAULT_CONFIG_PATH);
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--file" => file = Some(PathBuf::from(next_value("--file", &mut iter)?)),
            "--line-capacity" => line_capacity = Some(parse_capacity(&mut iter)?),
            "--config" => config_path = PathBuf::from(next_value("--config", &mut iter)?),
            "--help" | "-h" => return Err(CliAppError::Usage(usage())),
            _ => return Err(CliAppError::Usage(usage())),
        }
    }
    let file = file.ok_or_else(|| CliAppError::Usage(usage()))?;
    Ok(KeysOptions {
        file,
        line_capacity,
        config_path,
    })
}

fn next_value(flag: &str, iter: &mut impl Iterator<Item = String>) -> Result<String, CliAppError> {
    iter.next()
        .ok_or_else(|| CliAppError::Usage(format!("{flag} requires a value\n\n{}", usage())))
}

fn parse_capacity(iter: &mut impl Iterator<Item = String>) -> Result<usize, CliAppError> {
    let value = next_value("--line-capacity", iter)?;
    value.parse::<usize>().map_err(|_| {
        CliAppError::Usage(format!(
            "--line-capacity expects a positive integer, got {value:?}\n\n{}",
            usage()
        ))
    })
}

fn usage() -> String {
    "usage: debcontrol show --file <path> [--format text|json] [--line-capacity <bytes>] [--config <path>]\n       debcontrol get --file <path> --key <name> [--line-capacity <bytes>] [--config <path>]\n       debcontrol keys --file <path> [--line-capacity <bytes>] [--config <path>]".to_string()
}

#[cfg(test)]
mod tests {
    use super::{
        CliAppError, parse_get_options, parse_keys_options, parse_show_options, run_with_args,
    };
    use crate::config::OutputFormat;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn parses_show_options() {
        let args = strings(&["--file", "control", "--format", "json"]);
        let options = parse_show_options(args).expect("options");
        assert!(options.file.ends_with("control"));
        assert_eq!(options.format, Some(OutputFormat::Json));
        assert!(options.config_path.ends_with("debcontrol.toml"));
    }

    #[test]
    fn rejects_unknown_format() {
        let args = strings(&["--file", "control", "--format", "yaml"]);
        let err = parse_show_options(args).expect_err("error");
        assert!(err.to_string().starts_with("unknown format"));
    }

    #[test]
    fn parses_get_options() {
        let args = strings(&["--file", "control", "--key", "Version", "--line-capacity", "128"]);
        let options = parse_get_options(args).expect("options");
        assert_eq!(options.key, "Version");
        assert_eq!(options.line_capacity, Some(128));
    }

    #[test]
    fn get_requires_key() {
        let args = strings(&["--file", "control"]);
        assert!(matches!(parse_get_options(args), Err(CliAppError::Usage(_))));
    }

    #[test]
    fn parses_keys_options() {
        let args = strings(&["--file", "control", "--config", "custom.toml"]);
        let options = parse_keys_options(args).expect("options");
        assert!(options.config_path.ends_with("custom.toml"));
    }

    #[test]
    fn rejects_bad_capacity() {
        let args = strings(&["--file", "control", "--line-capacity", "lots"]);
        let err = parse_keys_options(args).expect_err("error");
        assert!(err.to_string().contains("positive integer"));
    }

    #[test]
    fn flag_without_value_is_usage_error() {
        let err = parse_show_options(strings(&["--file"])).expect_err("error");
        assert!(err.to_string().starts_with("--file requires a value"));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn unknown_command_prints_usage() {
        let mut out = Vec::new();
        let err = run_with_args(strings(&["frobnicate"]), &mut out).expect_err("error");
        assert!(err.to_string().starts_with("usage: debcontrol"));
        let err = run_with_args(Vec::new(), &mut out).expect_err("error");
        assert!(matches!(err, CliAppError::Usage(_)));
    }

    #[test]
    fn parse_failures_exit_with_one() {
        let mut out = Vec::new();
        let args = strings(&["keys", "--file", "/nonexistent/debcontrol/control"]);
        let err = run_with_args(args, &mut out).expect_err("error");
        assert_eq!(err.exit_code(), 1);
    }
}
