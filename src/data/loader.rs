use std::path::Path;

use crate::config::{LoadOptions, SAMPLE_CATEGORIES};
use crate::error::{CorpusError, Result};

use super::concepts::ConceptTable;
use super::model::Corpus;
use super::partition::PartitionIndex;
use super::{images, relations, segments, sorted_dirs};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a corpus with the default layout.
///
/// With `full_scan` off only the first two category directories are read.
pub fn load_corpus(corpus_root: &Path, full_scan: bool) -> Result<Corpus> {
    let options = LoadOptions {
        full_scan,
        ..LoadOptions::default()
    };
    load(corpus_root, &options)
}

/// Load a corpus rooted at `corpus_root`.
///
/// Expected layout (names from [`crate::CorpusLayout`]):
///
/// ```text
/// root/
///   wlist100.txt            code<TAB>concept
///   training.mat            array `training`, column 0 = image id
///   testing.mat             array `testing`,  column 0 = image id
///   <category>/
///     images/               <imageId>.<ext>
///     features.txt          imageId<TAB>segmentId<TAB>features<TAB>code
///     spatial_rels/         <imageId>.mat with `topo`, `x_rels`, `y_rels`
/// ```
///
/// Categories are read in lexicographic order. The root, the concept table and
/// both partition files are required; everything under a category is
/// optional.
pub fn load(corpus_root: &Path, options: &LoadOptions) -> Result<Corpus> {
    if !corpus_root.exists() {
        return Err(CorpusError::MissingPath {
            path: corpus_root.to_path_buf(),
        });
    }
    if !corpus_root.is_dir() {
        return Err(CorpusError::NotADirectory {
            path: corpus_root.to_path_buf(),
        });
    }

    let layout = &options.layout;
    let concepts = ConceptTable::load(&corpus_root.join(&layout.concepts_file))?;
    let partitions = PartitionIndex::load(corpus_root, layout)?;
    log::info!(
        "{} concepts, {} training ids, {} test ids",
        concepts.len(),
        partitions.training_len(),
        partitions.test_len()
    );

    let categories = sorted_dirs(corpus_root).map_err(|e| CorpusError::io(corpus_root, e))?;
    let limit = if options.full_scan {
        usize::MAX
    } else {
        SAMPLE_CATEGORIES
    };

    let mut corpus = Corpus::default();
    for category in categories.iter().take(limit) {
        log::info!("{}", category.display());

        corpus.add_images(images::scan(&category.join(&layout.images_dir), &partitions));
        corpus.add_segments(segments::parse(
            &category.join(&layout.features_file),
            &partitions,
            &concepts,
        )?);
        corpus.add_relations(relations::extract(
            &category.join(&layout.relations_dir),
            &partitions,
        )?);

        let name = category
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        corpus.categories.push(name);
    }

    let summary = corpus.summary();
    log::info!("Total Train Images {}", summary.training_images);
    log::info!("Total Test Images {}", summary.test_images);
    log::info!("Total Train Segments {}", summary.training_segments);
    log::info!("Total Test Segments {}", summary.test_segments);
    log::info!("Total Train Relations {}", summary.training_relations);
    log::info!("Total Test Relations {}", summary.test_relations);

    Ok(corpus)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::matrix::{write_mat_file, Matrix};

    fn write_root_files(root: &Path) {
        std::fs::write(root.join("wlist100.txt"), "1\tsky\n").unwrap();
        write_mat_file(
            &root.join("training.mat"),
            &[("training", &Matrix::column_vector(&[1.0, 2.0]))],
        )
        .unwrap();
        write_mat_file(
            &root.join("testing.mat"),
            &[("testing", &Matrix::column_vector(&[3.0, 4.0]))],
        )
        .unwrap();
    }

    #[test]
    fn missing_root_fails_first() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_corpus(&dir.path().join("nope"), true).unwrap_err();
        assert!(matches!(err, CorpusError::MissingPath { .. }));
    }

    #[test]
    fn file_root_is_not_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("root.txt");
        std::fs::write(&file, "").unwrap();
        let err = load_corpus(&file, true).unwrap_err();
        assert!(matches!(err, CorpusError::NotADirectory { .. }));
    }

    #[test]
    fn missing_concept_table_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_root_files(dir.path());
        std::fs::remove_file(dir.path().join("wlist100.txt")).unwrap();
        let err = load_corpus(dir.path(), true).unwrap_err();
        assert!(matches!(err, CorpusError::MissingPath { ref path } if path.ends_with("wlist100.txt")));
    }

    #[test]
    fn sampling_reads_first_two_categories_in_order() {
        let dir = tempfile::tempdir().unwrap();
        write_root_files(dir.path());
        for name in ["e", "c", "a", "d", "b"] {
            std::fs::create_dir(dir.path().join(name)).unwrap();
        }
        std::fs::write(dir.path().join("0-not-a-category"), "").unwrap();

        let sampled = load_corpus(dir.path(), false).unwrap();
        assert_eq!(sampled.categories, vec!["a", "b"]);

        let full = load_corpus(dir.path(), true).unwrap();
        assert_eq!(full.categories, vec!["a", "b", "c", "d", "e"]);
        assert!(full.is_empty());
    }
}
