use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use crate::error::{CorpusError, Result};

use super::{row_fields, tab_reader};

/// Name stored for a code whose row carries no name.
pub const BLANK_CONCEPT: &str = " ";

/// Immutable code → concept-name lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConceptTable {
    names: HashMap<i32, String>,
}

impl ConceptTable {
    /// Read a tab-delimited `code<TAB>name` file.
    ///
    /// A row with only a code (after dropping trailing empty fields) maps it
    /// to [`BLANK_CONCEPT`]. A code that is not an integer fails the whole
    /// load.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CorpusError::MissingPath {
                path: path.to_path_buf(),
            });
        }
        let file = File::open(path).map_err(|e| CorpusError::io(path, e))?;
        let mut reader = tab_reader(file);

        let mut names = HashMap::new();
        for result in reader.records() {
            let record = result.map_err(|source| CorpusError::Table {
                path: path.to_path_buf(),
                source,
            })?;
            let fields = row_fields(&record);
            let Some(raw_code) = fields.first() else {
                continue;
            };
            let code = raw_code.trim().parse::<i32>().map_err(|_| CorpusError::ConceptCode {
                path: path.to_path_buf(),
                line: record.position().map(|p| p.line()).unwrap_or(0),
                value: raw_code.to_string(),
            })?;
            let name = fields.get(1).copied().unwrap_or(BLANK_CONCEPT);
            names.insert(code, name.to_string());
        }

        log::debug!("{}: {} concepts", path.display(), names.len());
        Ok(ConceptTable { names })
    }

    /// Build a table from in-memory entries.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (i32, S)>,
        S: Into<String>,
    {
        ConceptTable {
            names: entries.into_iter().map(|(c, n)| (c, n.into())).collect(),
        }
    }

    /// Concept name for `code`, or `None` for an unannotated segment.
    pub fn resolve(&self, code: i32) -> Option<&str> {
        self.names.get(&code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_table(text: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wlist100.txt");
        std::fs::write(&path, text).unwrap();
        (dir, path)
    }

    #[test]
    fn loads_codes_and_names() {
        let (_dir, path) = write_table("1\tsky\n42\tgrass\n");
        let table = ConceptTable::load(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.resolve(1), Some("sky"));
        assert_eq!(table.resolve(42), Some("grass"));
        assert_eq!(table.resolve(3), None);
    }

    #[test]
    fn missing_name_becomes_blank_placeholder() {
        let (_dir, path) = write_table("7\n8\t\n9\tsea\n10\t\textra\n");
        let table = ConceptTable::load(&path).unwrap();
        assert_eq!(table.resolve(7), Some(BLANK_CONCEPT));
        assert_eq!(table.resolve(8), Some(BLANK_CONCEPT));
        assert_eq!(table.resolve(9), Some("sea"));
        // An empty name between other fields is kept as-is.
        assert_eq!(table.resolve(10), Some(""));
    }

    #[test]
    fn non_integer_code_is_fatal() {
        let (_dir, path) = write_table("1\tsky\nabc\tgrass\n");
        let err = ConceptTable::load(&path).unwrap_err();
        match err {
            CorpusError::ConceptCode { line, value, .. } => {
                assert_eq!(line, 2);
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConceptTable::load(&dir.path().join("wlist100.txt")).unwrap_err();
        assert!(matches!(err, CorpusError::MissingPath { .. }));
    }
}
