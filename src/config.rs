use std::path::Path;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CorpusLayout – where each input lives relative to the corpus root
// ---------------------------------------------------------------------------

/// File and directory names of the CLEF layout.
///
/// Root-level entries are resolved against the corpus root, per-category
/// entries against each category directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusLayout {
    /// Tab-delimited code → concept table.
    pub concepts_file: String,
    /// Matrix file listing training image ids.
    pub training_file: String,
    /// Matrix file listing test image ids.
    pub testing_file: String,
    /// Array name inside `training_file`.
    pub training_array: String,
    /// Array name inside `testing_file`.
    pub testing_array: String,
    /// Per-category image folder.
    pub images_dir: String,
    /// Per-category segment feature table.
    pub features_file: String,
    /// Per-category folder of relation matrix files, one per image.
    pub relations_dir: String,
}

impl Default for CorpusLayout {
    fn default() -> Self {
        Self {
            concepts_file: "wlist100.txt".to_string(),
            training_file: "training.mat".to_string(),
            testing_file: "testing.mat".to_string(),
            training_array: "training".to_string(),
            testing_array: "testing".to_string(),
            images_dir: "images".to_string(),
            features_file: "features.txt".to_string(),
            relations_dir: "spatial_rels".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// LoadOptions
// ---------------------------------------------------------------------------

/// Options for [`crate::load`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Process every category. When false only the first two categories
    /// (in lexicographic order) are loaded.
    pub full_scan: bool,
    pub layout: CorpusLayout,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            full_scan: true,
            layout: CorpusLayout::default(),
        }
    }
}

/// Number of categories loaded when `full_scan` is off.
pub const SAMPLE_CATEGORIES: usize = 2;

impl LoadOptions {
    /// Read options from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let opts: LoadOptions =
            serde_json::from_str(r#"{ "layout": { "features_file": "feats.tsv" } }"#).unwrap();
        assert!(opts.full_scan);
        assert_eq!(opts.layout.features_file, "feats.tsv");
        assert_eq!(opts.layout.concepts_file, "wlist100.txt");
        assert_eq!(opts.layout.relations_dir, "spatial_rels");
    }

    #[test]
    fn from_json_file_reports_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("opts.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(LoadOptions::from_json_file(&path).is_err());
    }
}
