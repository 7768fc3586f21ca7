use serde::{Deserialize, Serialize};

/// A single key/value pair read from a control file.
///
/// Keys are not unique; a file may carry the same key more than once and
/// each occurrence is kept as its own record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    pub key: String,
    pub value: String,
}

impl Record {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}
