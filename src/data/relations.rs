use std::path::Path;

use crate::error::Result;

use super::matrix::{MatFile, Matrix};
use super::model::{ImageId, RelationKind, RelationLabel, SegmentId, SegmentRelation, Split};
use super::partition::PartitionIndex;
use super::{file_stem_prefix, sorted_files};

/// The three relation matrices of one image.
pub struct RelationMatrices {
    pub topo: Matrix,
    pub x_rels: Matrix,
    pub y_rels: Matrix,
}

impl RelationMatrices {
    pub fn load(path: &Path) -> Result<Self> {
        let mat = MatFile::open(path)?;
        Ok(RelationMatrices {
            topo: mat.matrix("topo")?,
            x_rels: mat.matrix("x_rels")?,
            y_rels: mat.matrix("y_rels")?,
        })
    }

    fn for_kind(&self, kind: RelationKind) -> &Matrix {
        match kind {
            RelationKind::Topology => &self.topo,
            RelationKind::XAxis => &self.x_rels,
            RelationKind::YAxis => &self.y_rels,
        }
    }
}

/// Decode one relation-matrix cell.
pub fn label_for(kind: RelationKind, value: f64) -> Option<RelationLabel> {
    match (kind, value as i64) {
        (RelationKind::Topology, 1) => Some(RelationLabel::Adjacent),
        (RelationKind::Topology, 2) => Some(RelationLabel::Disjoint),
        (RelationKind::XAxis, 3) => Some(RelationLabel::Beside),
        (RelationKind::XAxis, 4) => Some(RelationLabel::XAligned),
        (RelationKind::YAxis, 5) => Some(RelationLabel::Above),
        (RelationKind::YAxis, 6) => Some(RelationLabel::Below),
        (RelationKind::YAxis, 7) => Some(RelationLabel::YAligned),
        _ => None,
    }
}

/// Relations between every ordered pair of distinct segments of one image.
///
/// Pairs range over the rows of `topo`. Each pair yields a topology, an
/// x-axis and a y-axis relation, in that order, whether or not the cell
/// decodes to a label. A `topo` of at most one row yields nothing, even if
/// `x_rels` and `y_rels` are populated.
pub fn image_relations(image_id: &ImageId, matrices: &RelationMatrices) -> Vec<SegmentRelation> {
    let n = matrices.topo.rows();
    if n <= 1 {
        return Vec::new();
    }

    let mut relations = Vec::with_capacity(3 * n * (n - 1));
    for x in 0..n {
        for y in (0..n).filter(|&y| y != x) {
            for kind in RelationKind::ALL {
                let label = matrices
                    .for_kind(kind)
                    .get(x, y)
                    .and_then(|value| label_for(kind, value));
                relations.push(SegmentRelation {
                    image_id: image_id.clone(),
                    first_segment_id: SegmentId::from_index(x),
                    second_segment_id: SegmentId::from_index(y),
                    kind,
                    label,
                });
            }
        }
    }
    relations
}

/// Read every relation file in `relations_dir` and route its relations by
/// the image's partition.
///
/// The file stem up to the first `.` is the image id. Files for images in
/// neither partition are not opened. A missing directory yields an empty
/// split; an unreadable relation file is an error.
pub fn extract(relations_dir: &Path, partitions: &PartitionIndex) -> Result<Split<SegmentRelation>> {
    let mut split = Split::default();

    for path in sorted_files(relations_dir) {
        let Some(stem) = file_stem_prefix(&path) else {
            continue;
        };
        let image_id = ImageId::new(&stem);
        let Some(partition) = partitions.classify(&image_id) else {
            log::debug!("{}: image in neither partition, skipped", path.display());
            continue;
        };

        let matrices = RelationMatrices::load(&path)?;
        if matrices.topo.rows() <= 1 {
            log::debug!(
                "{}: topology matrix has {} row(s), no relations",
                path.display(),
                matrices.topo.rows()
            );
            continue;
        }

        for relation in image_relations(&image_id, &matrices) {
            split.push(partition, relation);
        }
    }
    Ok(split)
}
