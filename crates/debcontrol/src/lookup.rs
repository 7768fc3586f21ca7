use std::collections::BTreeMap;

use crate::record::Record;

/// Folds an ordered record list into a map for random access.
///
/// The record list is explicitly ordered whereas the map is not. When a key
/// appears more than once the last occurrence wins.
pub fn key_value_map(records: &[Record]) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for record in records {
        map.insert(record.key.clone(), record.value.clone());
    }
    map
}
