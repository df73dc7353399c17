//! Two-column key/value table loaded from CSV.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;

use crate::spec::{ProductXlsxError, Result};

/// Ordered `key -> value` mapping.
///
/// Keys keep the position of their first occurrence; a repeated key
/// overwrites the value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyValueTable {
    l_entries: Vec<(String, String)>,
    dict_pos: BTreeMap<String, usize>,
}

impl KeyValueTable {
    /// Parse `key,value` lines. Extra fields on a line are ignored.
    ///
    /// Fields are decoded lossily: invalid UTF-8 becomes `U+FFFD` instead of
    /// failing the load.
    pub fn load<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut table = Self::default();
        for res_record in rdr.byte_records() {
            let record = res_record.map_err(|err| ProductXlsxError::MalformedRecord {
                line: err.position().map_or(0, |pos| pos.line()),
                message: err.to_string(),
            })?;
            let n_line = record.position().map_or(0, |pos| pos.line());

            match (record.get(0), record.get(1)) {
                (Some(key), Some(value)) => {
                    table.insert(&String::from_utf8_lossy(key), &String::from_utf8_lossy(value))
                }
                _ => {
                    return Err(ProductXlsxError::MalformedRecord {
                        line: n_line,
                        message: format!(
                            "expected at least 2 fields, found {}",
                            record.len()
                        ),
                    });
                }
            }
        }

        tracing::debug!(n_keys = table.len(), "loaded key/value table");
        Ok(table)
    }

    /// Parse an in-memory CSV text.
    pub fn from_csv_str(text: &str) -> Result<Self> {
        Self::load(text.as_bytes())
    }

    /// Open and parse a CSV file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ProductXlsxError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load(file)
    }

    fn insert(&mut self, key: &str, value: &str) {
        match self.dict_pos.get(key) {
            Some(&n_idx) => self.l_entries[n_idx].1 = value.to_string(),
            None => {
                self.dict_pos.insert(key.to_string(), self.l_entries.len());
                self.l_entries.push((key.to_string(), value.to_string()));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.dict_pos
            .get(key)
            .map(|&n_idx| self.l_entries[n_idx].1.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.dict_pos.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.l_entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.l_entries.is_empty()
    }

    /// Entries in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.l_entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.l_entries.iter().map(|(key, _)| key.as_str())
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for KeyValueTable {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut table = Self::default();
        for (key, value) in iter {
            table.insert(key.as_ref(), value.as_ref());
        }
        table
    }
}
