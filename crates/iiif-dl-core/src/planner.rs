//! Output path planning: source URL + position → destination file.
//!
//! Pure functions, no I/O.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::batch::DownloadTask;
use crate::url_model::{image_extension, source_filename};

/// Decimal digits needed to print `total` (at least 1).
pub fn sequence_width(total: usize) -> usize {
    total.to_string().len()
}

/// `index` zero-padded to the width of `total`: (7, 150, "png") → `007.png`.
pub fn sequential_filename(index: usize, total: usize, extension: &str) -> String {
    format!("{:0width$}.{}", index, extension, width = sequence_width(total))
}

/// Destination for the `index`-th (1-based) of `total` URLs.
pub fn plan_destination(url: &str, index: usize, total: usize, output_dir: &Path, rename_sequentially: bool) -> PathBuf {
    let filename = if rename_sequentially {
        sequential_filename(index, total, image_extension(url))
    } else {
        source_filename(url)
    };
    output_dir.join(filename)
}

/// `dir/stem_N.ext` for the first N ≥ 2 not in `taken`.
fn disambiguate(path: &Path, taken: &HashSet<PathBuf>) -> PathBuf {
    let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    let ext = path.extension().map(|s| s.to_string_lossy().into_owned());
    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    (2usize..)
        .map(|n| {
            let name = match &ext {
                Some(ext) => format!("{}_{}.{}", stem, n, ext),
                None => format!("{}_{}", stem, n),
            };
            dir.join(name)
        })
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| path.to_path_buf())
}

/// One task per URL, indices assigned in input order starting at 1.
///
/// Destinations are unique within the batch: when several URLs map to the
/// same file (e.g. IIIF URLs all ending in `default.jpg`), the first keeps
/// the name and later ones become `default_2.jpg`, `default_3.jpg`, ...
pub fn plan_tasks<S: AsRef<str>>(urls: &[S], output_dir: &Path, rename_sequentially: bool) -> Vec<DownloadTask> {
    let total = urls.len();
    let mut taken: HashSet<PathBuf> = HashSet::with_capacity(total);
    urls.iter()
        .enumerate()
        .map(|(i, url)| {
            let url = url.as_ref();
            let mut destination = plan_destination(url, i + 1, total, output_dir, rename_sequentially);
            if taken.contains(&destination) {
                let renamed = disambiguate(&destination, &taken);
                tracing::debug!(
                    url,
                    planned = %destination.display(),
                    renamed = %renamed.display(),
                    "duplicate destination in batch"
                );
                destination = renamed;
            }
            taken.insert(destination.clone());
            DownloadTask {
                source_url: url.to_string(),
                destination,
                sequence_index: i + 1,
            }
        })
        .collect()
}
