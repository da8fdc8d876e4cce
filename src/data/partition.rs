use std::collections::HashSet;
use std::path::Path;

use crate::config::CorpusLayout;
use crate::error::Result;

use super::matrix::MatFile;
use super::model::{ImageId, Partition};

/// Training and test image ids.
///
/// The two sets are expected to be disjoint but this is not checked; an id
/// listed in both classifies as training.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionIndex {
    training: HashSet<ImageId>,
    test: HashSet<ImageId>,
}

impl PartitionIndex {
    /// Read the training and testing id matrices under `corpus_root`.
    pub fn load(corpus_root: &Path, layout: &CorpusLayout) -> Result<Self> {
        let training = read_ids(&corpus_root.join(&layout.training_file), &layout.training_array)?;
        let test = read_ids(&corpus_root.join(&layout.testing_file), &layout.testing_array)?;
        Ok(PartitionIndex { training, test })
    }

    pub fn from_ids<T, E>(training: T, test: E) -> Self
    where
        T: IntoIterator<Item = ImageId>,
        E: IntoIterator<Item = ImageId>,
    {
        PartitionIndex {
            training: training.into_iter().collect(),
            test: test.into_iter().collect(),
        }
    }

    pub fn is_training(&self, id: &ImageId) -> bool {
        self.training.contains(id)
    }

    pub fn is_test(&self, id: &ImageId) -> bool {
        self.test.contains(id)
    }

    /// Partition of `id`, or `None` when it is in neither list.
    pub fn classify(&self, id: &ImageId) -> Option<Partition> {
        if self.is_training(id) {
            Some(Partition::Training)
        } else if self.is_test(id) {
            Some(Partition::Test)
        } else {
            None
        }
    }

    pub fn training_len(&self) -> usize {
        self.training.len()
    }

    pub fn test_len(&self) -> usize {
        self.test.len()
    }
}

/// Ids in the first column of array `name`. Arrays of at most one row are
/// treated as empty.
fn read_ids(path: &Path, name: &str) -> Result<HashSet<ImageId>> {
    let matrix = MatFile::open(path)?.matrix(name)?;
    if matrix.rows() <= 1 {
        log::warn!(
            "{}: array '{name}' has {} row(s), treating partition as empty",
            path.display(),
            matrix.rows()
        );
        return Ok(HashSet::new());
    }
    Ok(matrix.column(0).map(ImageId::from_cell).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::matrix::{write_mat_file, Matrix};
    use crate::error::CorpusError;

    fn write_partitions(root: &Path, training: &Matrix, testing: &Matrix) {
        write_mat_file(&root.join("training.mat"), &[("training", training)]).unwrap();
        write_mat_file(&root.join("testing.mat"), &[("testing", testing)]).unwrap();
    }

    #[test]
    fn loads_first_column_as_ids() {
        let dir = tempfile::tempdir().unwrap();
        let training = Matrix::from_rows(&[vec![11.0, 0.5], vec![12.0, 0.7], vec![13.0, 0.1]]).unwrap();
        let testing = Matrix::column_vector(&[21.0, 22.0]);
        write_partitions(dir.path(), &training, &testing);

        let index = PartitionIndex::load(dir.path(), &CorpusLayout::default()).unwrap();
        assert_eq!(index.training_len(), 3);
        assert_eq!(index.test_len(), 2);
        assert!(index.is_training(&ImageId::new("12")));
        assert!(index.is_test(&ImageId::new("22")));
        assert_eq!(index.classify(&ImageId::new("0013")), Some(Partition::Training));
        assert_eq!(index.classify(&ImageId::new("99")), None);
    }

    #[test]
    fn single_row_array_is_empty_partition() {
        let dir = tempfile::tempdir().unwrap();
        write_partitions(
            dir.path(),
            &Matrix::column_vector(&[5.0]),
            &Matrix::column_vector(&[6.0, 7.0]),
        );

        let index = PartitionIndex::load(dir.path(), &CorpusLayout::default()).unwrap();
        assert_eq!(index.training_len(), 0);
        assert!(!index.is_training(&ImageId::new("5")));
        assert_eq!(index.test_len(), 2);
    }

    #[test]
    fn missing_testing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_mat_file(
            &dir.path().join("training.mat"),
            &[("training", &Matrix::column_vector(&[1.0, 2.0]))],
        )
        .unwrap();

        let err = PartitionIndex::load(dir.path(), &CorpusLayout::default()).unwrap_err();
        assert!(matches!(err, CorpusError::MissingPath { ref path } if path.ends_with("testing.mat")));
    }

    #[test]
    fn id_in_both_lists_classifies_as_training() {
        let id = ImageId::new("3");
        let index = PartitionIndex::from_ids([id.clone()], [id.clone()]);
        assert_eq!(index.classify(&id), Some(Partition::Training));
    }
}
