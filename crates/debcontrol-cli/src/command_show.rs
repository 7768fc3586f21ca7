use std::io::Write;
use std::path::PathBuf;

use debcontrol::{ControlError, Record, parse_file_with};
use thiserror::Error;
use tracing::info;

use crate::config::{OutputFormat, load_config_or_default};
use crate::error::CliError;

#[derive(Debug, Error)]
pub enum ShowCommandError {
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
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct ShowOptions {
    pub file: PathBuf,
    pub format: Option<OutputFormat>,
    pub line_capacity: Option<usize>,
    pub config_path: PathBuf,
}

pub fn run_show(options: &ShowOptions, out: &mut impl Write) -> Result<(), ShowCommandError> {
    let config = load_config_or_default(&options.config_path)?;
    let parser = config.parser(options.line_capacity)?;
    let records =
        parse_file_with(&parser, &options.file).map_err(|source| ShowCommandError::Parse {
            path: options.file.clone(),
            source,
        })?;
    info!(path = %options.file.display(), records = records.len(), "parsed control file");

    match options.format.unwrap_or(config.format) {
        OutputFormat::Text => {
            for record in &records {
                writeln!(out, "{}", render_record(record))?;
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&records)?;
            writeln!(out, "{json}")?;
        }
    }
    Ok(())
}

/// Renders a record back in control-file form, indenting continuation lines
/// by one space. Records without a key print their value alone.
fn render_record(record: &Record) -> String {
    let value = record.value.replace('\n', "\n ");
    if record.key.is_empty() {
        value
    } else if value.is_empty() {
        format!("{}:", record.key)
    } else {
        format!("{}: {}", record.key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::{ShowCommandError, ShowOptions, render_record, run_show};
    use crate::config::OutputFormat;
    use debcontrol::{ControlError, Record};
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        path.push(format!("debcontrol_{name}_{nanos}"));
        path
    }

    fn options(file: PathBuf, format: Option<OutputFormat>) -> ShowOptions {
        ShowOptions {
            file,
            format,
            line_capacity: None,
            config_path: temp_path("no_config"),
        }
    }

    #[test]
    fn renders_continuation_lines() {
        let record = Record::new("Description", "short\nlong text");
        assert_eq!(render_record(&record), "Description: short\n long text");
    }

    #[test]
    fn renders_keyless_records_bare() {
        assert_eq!(render_record(&Record::new("", "")), "");
        assert_eq!(render_record(&Record::new("", "loose")), "loose");
        assert_eq!(render_record(&Record::new("Empty", "")), "Empty:");
    }

    #[test]
    fn prints_text_records_in_order() {
        let path = temp_path("show_text");
        fs::write(&path, "B: 1\nA: 0 # note\nDescription: one\n two\n").expect("write");
        let mut out = Vec::new();
        run_show(&options(path.clone(), None), &mut out).expect("show");
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "B: 1\nA: 0\nDescription: one\n two\n"
        );
        fs::remove_file(&path).ok();
    }

    #[test]
    fn prints_json_records() {
        let path = temp_path("show_json");
        fs::write(&path, "Package: demo\nVersion: 1.0\n").expect("write");
        let mut out = Vec::new();
        run_show(&options(path.clone(), Some(OutputFormat::Json)), &mut out).expect("show");
        let records: Vec<Record> = serde_json::from_slice(&out).expect("json");
        assert_eq!(
            records,
            vec![Record::new("Package", "demo"), Record::new("Version", "1.0")]
        );
        fs::remove_file(&path).ok();
    }

    #[test]
    fn reports_parse_errors_with_path() {
        let path = temp_path("show_bad");
        fs::write(&path, "Bad#Key: 1\n").expect("write");
        let mut out = Vec::new();
        let err = run_show(&options(path.clone(), None), &mut out).expect_err("error");
        match &err {
            ShowCommandError::Parse { source, .. } => {
                assert!(matches!(source, ControlError::MalformedKey { line: 1, column: 4 }));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("show_bad"));
        assert!(out.is_empty());
        fs::remove_file(&path).ok();
    }
}
