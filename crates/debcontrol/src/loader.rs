use std::fs::File;
use std::path::Path;

use tracing::debug;

use crate::error::ControlResult;
use crate::parser::ControlParser;
use crate::record::Record;

pub fn parse_file(path: &Path) -> ControlResult<Vec<Record>> {
    parse_file_with(&ControlParser::new(), path)
}

pub fn parse_file_with(parser: &ControlParser, path: &Path) -> ControlResult<Vec<Record>> {
    debug!(path = %path.display(), "opening control file");
    let file = File::open(path)?;
    parser.parse(file)
}
