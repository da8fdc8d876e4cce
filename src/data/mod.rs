/// Data layer: record types, per-format readers and the corpus loader.
///
/// Architecture:
/// ```text
///  wlist100.txt      training.mat / testing.mat
///        │                     │
///        ▼                     ▼
///  ┌─────────────┐     ┌────────────────┐
///  │  concepts   │     │   partition    │ ◄── matrix (.mat reader)
///  └─────────────┘     └────────────────┘
///        │                     │
///        └──────────┬──────────┘
///                   ▼
///  per category:  images/ ─► images     ┐
///                 features.txt ─► segments ├─► Split<T> ─► loader ─► Corpus
///                 spatial_rels/ ─► relations┘
/// ```

pub mod concepts;
pub mod images;
pub mod loader;
pub mod matrix;
pub mod model;
pub mod partition;
pub mod relations;
pub mod segments;

use std::path::{Path, PathBuf};

/// Sorted regular files of `dir`. A missing or unlistable directory yields
/// no entries.
pub(crate) fn sorted_files(dir: &Path) -> Vec<PathBuf> {
    let Ok(read) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = read
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    files
}

/// Sorted subdirectories of `dir`.
pub(crate) fn sorted_dirs(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut dirs: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();
    Ok(dirs)
}

/// File name up to its first `.`: `"1234.jpg"` → `"1234"`.
pub(crate) fn file_stem_prefix(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    Some(name.split('.').next().unwrap_or(name).to_string())
}

/// Reader for the corpus' headerless, unquoted, tab-delimited tables.
pub(crate) fn tab_reader<R: std::io::Read>(source: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(source)
}

/// Fields of a row with trailing empty fields dropped, so `"42\t"` has one
/// field and `"a\tb\tc\t"` has three.
pub(crate) fn row_fields(record: &csv::StringRecord) -> Vec<&str> {
    let mut fields: Vec<&str> = record.iter().collect();
    while fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }
    fields
}
