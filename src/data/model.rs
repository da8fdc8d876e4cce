use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Identifier of one corpus image.
///
/// Ids arrive as file-name stems, feature-table text and matrix cells.
/// Integer-looking text is stored in canonical base-10 form so that
/// `"0042"`, `"42"` and the cell value `42.0` all name the same image.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ImageId(String);

impl ImageId {
    /// Build an id from text, canonicalising integers.
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<i64>() {
            Ok(n) => ImageId(n.to_string()),
            Err(_) => ImageId(trimmed.to_string()),
        }
    }

    /// Build an id from a numeric matrix cell (truncated toward zero).
    pub fn from_cell(value: f64) -> Self {
        ImageId((value as i64).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Index of a segment within its image. Relation matrices number segments
/// from 1; feature tables may carry any integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SegmentId(pub i32);

impl SegmentId {
    /// Segment id for a zero-based matrix index.
    pub fn from_index(index: usize) -> Self {
        SegmentId(index as i32 + 1)
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One image file of the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Image {
    pub file_name: String,
    pub image_id: ImageId,
}

/// An annotated region of an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub image_id: ImageId,
    pub segment_id: SegmentId,
    pub concept_code: i32,
    /// Space-separated feature tokens.
    pub feature_vector: String,
    pub concept_name: String,
}

/// Which relation matrix a [`SegmentRelation`] was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    Topology,
    XAxis,
    YAxis,
}

impl RelationKind {
    /// Emission order within a segment pair.
    pub const ALL: [RelationKind; 3] = [
        RelationKind::Topology,
        RelationKind::XAxis,
        RelationKind::YAxis,
    ];
}

/// Symbolic spatial relation between two segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RelationLabel {
    #[serde(rename = "adjacent")]
    Adjacent,
    #[serde(rename = "disjoint")]
    Disjoint,
    #[serde(rename = "beside")]
    Beside,
    #[serde(rename = "x-aligned")]
    XAligned,
    #[serde(rename = "above")]
    Above,
    #[serde(rename = "below")]
    Below,
    #[serde(rename = "y-aligned")]
    YAligned,
}

impl RelationLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            RelationLabel::Adjacent => "adjacent",
            RelationLabel::Disjoint => "disjoint",
            RelationLabel::Beside => "beside",
            RelationLabel::XAligned => "x-aligned",
            RelationLabel::Above => "above",
            RelationLabel::Below => "below",
            RelationLabel::YAligned => "y-aligned",
        }
    }
}

impl fmt::Display for RelationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Directed relation between two segments of one image.
///
/// `label` is `None` when the matrix cell carries no relation of this kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentRelation {
    pub image_id: ImageId,
    pub first_segment_id: SegmentId,
    pub second_segment_id: SegmentId,
    pub kind: RelationKind,
    pub label: Option<RelationLabel>,
}

// ---------------------------------------------------------------------------
// Partition buckets
// ---------------------------------------------------------------------------

/// The subset an image belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Partition {
    Training,
    Test,
}

/// Items routed into training and test lists, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Split<T> {
    pub training: Vec<T>,
    pub test: Vec<T>,
}

impl<T> Default for Split<T> {
    fn default() -> Self {
        Split {
            training: Vec::new(),
            test: Vec::new(),
        }
    }
}

impl<T> Split<T> {
    pub fn push(&mut self, partition: Partition, item: T) {
        match partition {
            Partition::Training => self.training.push(item),
            Partition::Test => self.test.push(item),
        }
    }

    pub fn len(&self) -> usize {
        self.training.len() + self.test.len()
    }

    pub fn is_empty(&self) -> bool {
        self.training.is_empty() && self.test.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Corpus – the complete loaded dataset
// ---------------------------------------------------------------------------

/// Everything read from a corpus root, split into training and test.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Corpus {
    pub training_images: Vec<Image>,
    pub training_segments: Vec<Segment>,
    pub training_relations: Vec<SegmentRelation>,
    pub test_images: Vec<Image>,
    pub test_segments: Vec<Segment>,
    pub test_relations: Vec<SegmentRelation>,
    /// Category directory names in the order they were read.
    pub categories: Vec<String>,
}

impl Corpus {
    pub(crate) fn add_images(&mut self, split: Split<Image>) {
        self.training_images.extend(split.training);
        self.test_images.extend(split.test);
    }

    pub(crate) fn add_segments(&mut self, split: Split<Segment>) {
        self.training_segments.extend(split.training);
        self.test_segments.extend(split.test);
    }

    pub(crate) fn add_relations(&mut self, split: Split<SegmentRelation>) {
        self.training_relations.extend(split.training);
        self.test_relations.extend(split.test);
    }

    /// Collection sizes.
    pub fn summary(&self) -> CorpusSummary {
        CorpusSummary {
            categories: self.categories.len(),
            training_images: self.training_images.len(),
            test_images: self.test_images.len(),
            training_segments: self.training_segments.len(),
            test_segments: self.test_segments.len(),
            training_relations: self.training_relations.len(),
            test_relations: self.test_relations.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.training_images.is_empty()
            && self.test_images.is_empty()
            && self.training_segments.is_empty()
            && self.test_segments.is_empty()
            && self.training_relations.is_empty()
            && self.test_relations.is_empty()
    }
}

/// Per-collection totals of a [`Corpus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CorpusSummary {
    pub categories: usize,
    pub training_images: usize,
    pub test_images: usize,
    pub training_segments: usize,
    pub test_segments: usize,
    pub training_relations: usize,
    pub test_relations: usize,
}

impl fmt::Display for CorpusSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Categories       {}", self.categories)?;
        writeln!(f, "Train images     {}", self.training_images)?;
        writeln!(f, "Test images      {}", self.test_images)?;
        writeln!(f, "Train segments   {}", self.training_segments)?;
        writeln!(f, "Test segments    {}", self.test_segments)?;
        writeln!(f, "Train relations  {}", self.training_relations)?;
        write!(f, "Test relations   {}", self.test_relations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_id_canonicalises_integers() {
        assert_eq!(ImageId::new("0042"), ImageId::new("42"));
        assert_eq!(ImageId::new("42"), ImageId::from_cell(42.0));
        assert_eq!(ImageId::from_cell(7.9).as_str(), "7");
        assert_eq!(ImageId::new("img7").as_str(), "img7");
        assert_ne!(ImageId::new("img7"), ImageId::new("7"));
    }

    #[test]
    fn split_routes_by_partition() {
        let mut split = Split::default();
        split.push(Partition::Training, 1);
        split.push(Partition::Test, 2);
        split.push(Partition::Training, 3);
        assert_eq!(split.training, vec![1, 3]);
        assert_eq!(split.test, vec![2]);
        assert_eq!(split.len(), 3);
    }

    #[test]
    fn relation_labels_serialize_as_source_names() {
        let json = serde_json::to_string(&RelationLabel::XAligned).unwrap();
        assert_eq!(json, "\"x-aligned\"");
        assert_eq!(RelationLabel::YAligned.to_string(), "y-aligned");
    }
}
