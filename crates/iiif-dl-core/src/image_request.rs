//! IIIF Image API request parameters.
//!
//! See <https://iiif.io/api/image/3.0/#21-image-request-uri-syntax>:
//!
//! - region: `full | square | x,y,w,h | pct:x,y,w,h`
//! - size: `max | ^max | w, | ^w, | ,h | ^,h | pct:n | ^pct:n | w,h | ^w,h | !w,h | ^!w,h`
//! - rotation: `n | !n`
//! - quality: `color | gray | bitonal | default`
//! - format: `jpg | tif | png | gif | jp2 | pdf | webp`

use serde::{Deserialize, Serialize};

pub const DEFAULT_REGION: &str = "full";
pub const DEFAULT_SIZE: &str = "1000,";
pub const DEFAULT_ROTATION: &str = "0";
pub const DEFAULT_QUALITY: &str = "default";
pub const DEFAULT_FORMAT: &str = "jpg";

/// Caller-supplied overrides. Every field is optional; unset fields take the
/// built-in default when resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRequestOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// Fully resolved request parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub region: String,
    pub size: String,
    pub rotation: String,
    pub quality: String,
    pub format: String,
}

impl Default for ImageRequest {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            size: DEFAULT_SIZE.to_string(),
            rotation: DEFAULT_ROTATION.to_string(),
            quality: DEFAULT_QUALITY.to_string(),
            format: DEFAULT_FORMAT.to_string(),
        }
    }
}

impl ImageRequestOptions {
    pub fn is_empty(&self) -> bool {
        self.region.is_none()
            && self.size.is_none()
            && self.rotation.is_none()
            && self.quality.is_none()
            && self.format.is_none()
    }

    /// Layers `other` on top of `self`: fields set in `other` win, the rest are kept.
    pub fn overlay(&self, other: &ImageRequestOptions) -> ImageRequestOptions {
        ImageRequestOptions {
            region: other.region.clone().or_else(|| self.region.clone()),
            size: other.size.clone().or_else(|| self.size.clone()),
            rotation: other.rotation.clone().or_else(|| self.rotation.clone()),
            quality: other.quality.clone().or_else(|| self.quality.clone()),
            format: other.format.clone().or_else(|| self.format.clone()),
        }
    }

    /// Resolves against the built-in defaults, field by field.
    pub fn resolve(&self) -> ImageRequest {
        let defaults = ImageRequest::default();
        ImageRequest {
            region: self.region.clone().unwrap_or(defaults.region),
            size: self.size.clone().unwrap_or(defaults.size),
            rotation: self.rotation.clone().unwrap_or(defaults.rotation),
            quality: self.quality.clone().unwrap_or(defaults.quality),
            format: self.format.clone().unwrap_or(defaults.format),
        }
    }
}

impl ImageRequest {
    /// Builds `{service}/{region}/{size}/{rotation}/{quality}.{format}`.
    pub fn url_for_service(&self, service_base: &str) -> String {
        format!(
            "{}/{}/{}/{}/{}.{}",
            normalize_service_base(service_base),
            self.region,
            self.size,
            self.rotation,
            self.quality,
            self.format
        )
    }
}

/// Strips a trailing `/info.json` and trailing slashes from a service identifier.
pub fn normalize_service_base(service_base: &str) -> &str {
    let trimmed = service_base.trim().trim_end_matches('/');
    trimmed
        .strip_suffix("/info.json")
        .unwrap_or(trimmed)
        .trim_end_matches('/')
}
