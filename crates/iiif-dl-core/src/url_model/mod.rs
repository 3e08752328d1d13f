//! Filename derivation from image URLs.
//!
//! Splits the last URL path segment into a stem and an apparent extension,
//! normalizes the extension to a known image type and sanitizes the stem for
//! Linux filesystems.

mod extension;
mod path;
mod sanitize;

pub use extension::{normalize_extension, DEFAULT_EXTENSION, KNOWN_EXTENSIONS};
pub use path::last_path_segment;
pub use sanitize::sanitize_filename_for_linux;

/// Stem used when the URL path yields nothing usable.
const DEFAULT_STEM: &str = "image";

/// Splits `segment` at its last `.` into (stem, apparent extension).
/// A leading dot does not start an extension.
fn split_extension(segment: &str) -> (&str, &str) {
    match segment.rfind('.') {
        Some(0) | None => (segment, ""),
        Some(i) => (&segment[..i], &segment[i + 1..]),
    }
}

/// Normalized extension (without the dot) for the image at `url`.
pub fn image_extension(url: &str) -> &'static str {
    let segment = last_path_segment(url).unwrap_or_default();
    normalize_extension(split_extension(&segment).1)
}

/// Local filename for `url` keeping the source base name:
/// `https://x.org/scans/page_01.PNG` → `page_01.png`.
pub fn source_filename(url: &str) -> String {
    let segment = last_path_segment(url).unwrap_or_default();
    let (stem, ext) = split_extension(&segment);
    let stem = sanitize_filename_for_linux(stem);
    let stem = if stem.is_empty() { DEFAULT_STEM } else { stem.as_str() };
    format!("{}.{}", stem, normalize_extension(ext))
}
