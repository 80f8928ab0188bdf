//! Image descriptors handed to the presentation layer

use serde::{Deserialize, Serialize};

/// Accent color used when the source does not provide one
pub const DEFAULT_ACCENT_COLOR: &str = "#e0e0e0";

/// Where an image descriptor came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageOrigin {
    /// Fetched from the remote image API
    Remote,
    /// Drawn from the bundled fallback pool
    Fallback,
}

/// Credit for the owner of an image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribution {
    pub name: String,
    pub profile_link: String,
    pub username: String,
}

impl Attribution {
    /// Generic credit attached to locally bundled images
    pub fn generic() -> Self {
        Self {
            name: "Unsplash".to_string(),
            profile_link: "https://unsplash.com".to_string(),
            username: "unsplash".to_string(),
        }
    }
}

/// A resolved image ready to embed into a pin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDescriptor {
    pub url: String,
    pub alt: String,
    #[serde(default)]
    pub attribution: Option<Attribution>,
    #[serde(default = "default_accent_color")]
    pub accent_color: String,
    #[serde(default)]
    pub blur_hash: Option<String>,
    pub origin: ImageOrigin,
}

fn default_accent_color() -> String {
    DEFAULT_ACCENT_COLOR.to_string()
}

impl ImageDescriptor {
    /// Whether this descriptor came from the fallback pool
    pub fn is_fallback(&self) -> bool {
        self.origin == ImageOrigin::Fallback
    }
}
