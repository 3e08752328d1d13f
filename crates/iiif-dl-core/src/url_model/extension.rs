//! Image extension normalization.

/// Extensions kept as-is (lowercased) when the URL's extension starts with one of them.
pub const KNOWN_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// Used when the URL has no recognizable image extension.
pub const DEFAULT_EXTENSION: &str = "jpg";

/// Maps an apparent extension (no dot) onto one of `KNOWN_EXTENSIONS` by
/// case-insensitive prefix match, e.g. `JPG:large` → `jpg`, `tif` → `jpg`.
pub fn normalize_extension(apparent: &str) -> &'static str {
    let lower = apparent.trim().to_ascii_lowercase();
    KNOWN_EXTENSIONS
        .iter()
        .copied()
        .find(|known| lower.starts_with(known))
        .unwrap_or(DEFAULT_EXTENSION)
}
