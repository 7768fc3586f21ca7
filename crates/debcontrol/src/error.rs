use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControlError {
    #[error("line {line} exceeds internal buffer limit of {capacity} bytes")]
    LineTooLong { line: usize, capacity: usize },
    #[error("malformed input file: comment '#' in key section at line {line}, column {column}")]
    MalformedKey { line: usize, column: usize },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ControlResult<T> = Result<T, ControlError>;
