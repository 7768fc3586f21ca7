//! Reading of files in the style of Debian control files.
//!
//! A control file is an ordered list of `Key: value` records. Values may
//! continue on following lines that start with a space, and `#` starts a
//! comment that runs to the end of the line.
//!
//! ```
//! use debcontrol::{key_value_map, parse};
//!
//! let input = "Package: hello\nVersion: 2.10 # upstream\nDescription: greeting\n program\n";
//! let records = parse(input.as_bytes())?;
//! assert_eq!(records[1].value, "2.10");
//! assert_eq!(records[2].value, "greeting\nprogram");
//!
//! let fields = key_value_map(&records);
//! assert_eq!(fields["Package"], "hello");
//! # Ok::<(), debcontrol::ControlError>(())
//! ```

#![forbid(unsafe_code)]

mod error;
mod loader;
mod lookup;
mod parser;
mod record;

pub use crate::error::{ControlError, ControlResult};
pub use crate::loader::{parse_file, parse_file_with};
pub use crate::lookup::key_value_map;
pub use crate::parser::{ControlParser, DEFAULT_LINE_CAPACITY, parse};
pub use crate::record::Record;
