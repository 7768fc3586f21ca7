use std::io::{self, BufRead, BufReader, Read};

use tracing::{debug, trace};

use crate::error::{ControlError, ControlResult};
use crate::record::Record;

/// Longest physical line, excluding its terminator, accepted by default.
pub const DEFAULT_LINE_CAPACITY: usize = 4096;

const COMMENT: u8 = b'#';
const CONTINUATION: u8 = b' ';
const KEY_SEPARATOR: &[u8] = b": ";

/// Parses a file in the style of Debian control files using the default
/// line capacity.
///
/// See [`ControlParser::parse`].
pub fn parse<R: Read>(reader: R) -> ControlResult<Vec<Record>> {
    ControlParser::new().parse(reader)
}

/// Reader for control-file style key/value records.
///
/// A record starts with a key followed by `": "`. Lines that begin with a
/// single space continue the previous value and are joined with `\n`. Any
/// `#` inside a value starts a comment that runs to the end of that line,
/// and a line starting with `#` is skipped entirely. Values are trimmed.
///
/// ```text
/// Package: mypackage
/// Version: 4.5.0 # this is a comment
/// Description: Hello
///  world
/// ```
///
/// The description above is read as `"Hello\nworld"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlParser {
    line_capacity: usize,
}

impl Default for ControlParser {
    fn default() -> Self {
        Self {
            line_capacity: DEFAULT_LINE_CAPACITY,
        }
    }
}

impl ControlParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_line_capacity(line_capacity: usize) -> Self {
        Self { line_capacity }
    }

    pub fn line_capacity(&self) -> usize {
        self.line_capacity
    }

    pub fn parse<R: Read>(&self, reader: R) -> ControlResult<Vec<Record>> {
        self.parse_buffered(BufReader::new(reader))
    }

    /// Parses records from an already buffered stream.
    ///
    /// Either every record is returned or an error is; partial results are
    /// never handed back.
    pub fn parse_buffered<R: BufRead>(&self, reader: R) -> ControlResult<Vec<Record>> {
        let mut lines = LineReader::new(reader, self.line_capacity);
        let mut records = Vec::new();
        let mut line = Vec::new();

        while lines.read_line(&mut line)? {
            if line.first() == Some(&COMMENT) {
                continue;
            }
            let start_line = lines.line_number();
            let (key, fragment) = split_key(&line, start_line)?;
            let key = String::from_utf8_lossy(key).into_owned();

            let mut value = Vec::new();
            value.extend_from_slice(strip_comment(fragment));

            while lines.peek()? == Some(CONTINUATION) {
                if !lines.read_line(&mut line)? {
                    break;
                }
                if let Some(first) = line.first_mut() {
                    *first = b'\n';
                }
                value.extend_from_slice(strip_comment(&line));
            }

            let value = String::from_utf8_lossy(&value).trim().to_string();
            trace!(line = start_line, key = %key, "record");
            records.push(Record { key, value });
        }

        debug!(
            records = records.len(),
            lines = lines.line_number(),
            "parsed control input"
        );
        Ok(records)
    }
}

/// Splits a record's first line at the key separator.
///
/// A line without a separator has an empty key and is all value.
fn split_key(line: &[u8], line_number: usize) -> ControlResult<(&[u8], &[u8])> {
    for (idx, &byte) in line.iter().enumerate() {
        if byte == COMMENT {
            return Err(ControlError::MalformedKey {
                line: line_number,
                column: idx + 1,
            });
        }
        if line[idx..].starts_with(KEY_SEPARATOR) {
            return Ok((&line[..idx], &line[idx + KEY_SEPARATOR.len()..]));
        }
    }
    Ok((&[], line))
}

fn strip_comment(fragment: &[u8]) -> &[u8] {
    match fragment.iter().position(|&byte| byte == COMMENT) {
        Some(idx) => &fragment[..idx],
        None => fragment,
    }
}

/// Line-at-a-time reader with a bounded line length and one byte of
/// lookahead.
struct LineReader<R> {
    inner: R,
    capacity: usize,
    line_number: usize,
}

impl<R: BufRead> LineReader<R> {
    fn new(inner: R, capacity: usize) -> Self {
        Self {
            inner,
            capacity,
            line_number: 0,
        }
    }

    fn line_number(&self) -> usize {
        self.line_number
    }

    /// Reads the next line into `buf` without its `\n` or `\r\n` terminator.
    /// Returns `false` once the stream is exhausted.
    fn read_line(&mut self, buf: &mut Vec<u8>) -> ControlResult<bool> {
        buf.clear();
        let mut terminated = false;
        loop {
            let available = match self.inner.fill_buf() {
                Ok(available) => available,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            };
            if available.is_empty() {
                break;
            }
            let used = match available.iter().position(|&byte| byte == b'\n') {
                Some(pos) => {
                    buf.extend_from_slice(&available[..pos]);
                    terminated = true;
                    pos + 1
                }
                None => {
                    buf.extend_from_slice(available);
                    available.len()
                }
            };
            self.inner.consume(used);
            // One extra byte leaves room for the '\r' of a CRLF terminator.
            if buf.len() > self.capacity.saturating_add(1) {
                return Err(self.too_long());
            }
            if terminated {
                break;
            }
        }

        if buf.is_empty() && !terminated {
            return Ok(false);
        }
        if terminated && buf.last() == Some(&b'\r') {
            buf.pop();
        }
        if buf.len() > self.capacity {
            return Err(self.too_long());
        }
        self.line_number += 1;
        Ok(true)
    }

    fn peek(&mut self) -> ControlResult<Option<u8>> {
        loop {
            match self.inner.fill_buf() {
                Ok(available) => return Ok(available.first().copied()),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        }
    }

    fn too_long(&self) -> ControlError {
        ControlError::LineTooLong {
            line: self.line_number + 1,
            capacity: self.capacity,
        }
    }
}
