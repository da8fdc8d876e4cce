use std::fs::File;
use std::path::Path;

use crate::error::{CorpusError, Result};

use super::concepts::ConceptTable;
use super::model::{ImageId, Segment, SegmentId, Split};
use super::partition::PartitionIndex;
use super::{row_fields, tab_reader};

/// Why a feature row produced no segment.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Skipped {
    malformed: usize,
    unresolved: usize,
    unpartitioned: usize,
}

/// Parse a category's `imageId<TAB>segmentId<TAB>features<TAB>code` table.
///
/// Rows that are not exactly four fields wide, or whose ids are not
/// integers, are skipped. So are rows whose concept code is not in
/// `concepts` and rows whose image is in neither partition. A missing file
/// yields an empty split.
pub fn parse(
    features_file: &Path,
    partitions: &PartitionIndex,
    concepts: &ConceptTable,
) -> Result<Split<Segment>> {
    let mut split = Split::default();
    if !features_file.exists() {
        return Ok(split);
    }

    let file = File::open(features_file).map_err(|e| CorpusError::io(features_file, e))?;
    let mut reader = tab_reader(file);
    let mut skipped = Skipped::default();

    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) if !e.is_io_error() => {
                skipped.malformed += 1;
                continue;
            }
            Err(source) => {
                return Err(CorpusError::Table {
                    path: features_file.to_path_buf(),
                    source,
                })
            }
        };

        let fields = row_fields(&record);
        let &[image, segment, features, code] = fields.as_slice() else {
            skipped.malformed += 1;
            continue;
        };
        let (Ok(segment_id), Ok(concept_code)) =
            (segment.trim().parse::<i32>(), code.trim().parse::<i32>())
        else {
            skipped.malformed += 1;
            continue;
        };
        let Some(concept_name) = concepts.resolve(concept_code) else {
            skipped.unresolved += 1;
            continue;
        };
        let image_id = ImageId::new(image);
        let Some(partition) = partitions.classify(&image_id) else {
            skipped.unpartitioned += 1;
            continue;
        };

        split.push(
            partition,
            Segment {
                image_id,
                segment_id: SegmentId(segment_id),
                concept_code,
                feature_vector: normalize_features(features),
                concept_name: concept_name.to_string(),
            },
        );
    }

    if skipped != Skipped::default() {
        log::debug!(
            "{}: skipped {} malformed, {} unresolved, {} unpartitioned row(s)",
            features_file.display(),
            skipped.malformed,
            skipped.unresolved,
            skipped.unpartitioned
        );
    }
    Ok(split)
}

/// Trim and collapse internal whitespace runs to single spaces.
pub fn normalize_features(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
