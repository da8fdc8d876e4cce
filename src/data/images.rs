use std::path::Path;

use super::model::{Image, ImageId, Split};
use super::partition::PartitionIndex;
use super::{file_stem_prefix, sorted_files};

/// Classify the files of `images_dir` into training and test images.
///
/// The image id is the file name up to its first `.`. Files whose id is in
/// neither partition are left out. A missing directory yields an empty split.
pub fn scan(images_dir: &Path, partitions: &PartitionIndex) -> Split<Image> {
    let mut split = Split::default();
    let mut unpartitioned = 0usize;

    for path in sorted_files(images_dir) {
        let (Some(file_name), Some(stem)) = (
            path.file_name().and_then(|n| n.to_str()),
            file_stem_prefix(&path),
        ) else {
            continue;
        };
        let image_id = ImageId::new(&stem);
        match partitions.classify(&image_id) {
            Some(partition) => split.push(
                partition,
                Image {
                    file_name: file_name.to_string(),
                    image_id,
                },
            ),
            None => unpartitioned += 1,
        }
    }

    if unpartitioned > 0 {
        log::debug!(
            "{}: {unpartitioned} image(s) in neither partition",
            images_dir.display()
        );
    }
    split
}
