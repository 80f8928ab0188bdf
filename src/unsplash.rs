//! Unsplash API client for category and search images
//!
//! Uses async reqwest for non-blocking HTTP requests. Responses are read as
//! text and parsed with serde_json so that malformed bodies surface as
//! `GalleryError::Parse` rather than transport errors.

use crate::config::ApiConfig;
use crate::error::{GalleryError, Result};
use crate::models::{Attribution, ImageDescriptor, ImageOrigin, DEFAULT_ACCENT_COLOR};
use serde::Deserialize;

const USER_AGENT: &str = "pin_gallery/0.1";

/// Unsplash photo record
#[derive(Debug, Clone, Deserialize)]
pub struct UnsplashPhoto {
    pub id: String,
    pub urls: PhotoUrls,
    #[serde(default)]
    pub alt_description: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub blur_hash: Option<String>,
    pub user: PhotoUser,
    #[serde(default)]
    pub tags: Option<Vec<PhotoTag>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoUrls {
    pub regular: String,
    #[serde(default)]
    pub small: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoUser {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub username: String,
    #[serde(default)]
    pub profile_image: Option<ProfileImage>,
    #[serde(default)]
    pub links: Option<UserLinks>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileImage {
    pub small: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserLinks {
    pub html: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoTag {
    pub title: String,
}

/// `/search/photos` response envelope
#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<UnsplashPhoto>,
}

impl PhotoUser {
    /// Display name, falling back to the username
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.username)
    }

    pub fn avatar(&self) -> Option<&str> {
        self.profile_image.as_ref()?.small.as_deref()
    }

    /// Public profile page
    pub fn profile_link(&self) -> String {
        self.links
            .as_ref()
            .and_then(|l| l.html.clone())
            .unwrap_or_else(|| format!("https://unsplash.com/@{}", self.username))
    }
}

impl UnsplashPhoto {
    /// First tag title, used as the pin category
    pub fn first_tag(&self) -> Option<&str> {
        self.tags.as_ref()?.first().map(|t| t.title.as_str())
    }

    /// Convert to an image descriptor; `category` fills in missing alt text
    pub fn to_descriptor(&self, category: &str) -> ImageDescriptor {
        ImageDescriptor {
            url: self.urls.regular.clone(),
            alt: self
                .alt_description
                .clone()
                .filter(|a| !a.is_empty())
                .unwrap_or_else(|| category.to_string()),
            attribution: Some(Attribution {
                name: self.user.display_name().to_string(),
                profile_link: self.user.profile_link(),
                username: self.user.username.clone(),
            }),
            accent_color: self
                .color
                .clone()
                .unwrap_or_else(|| DEFAULT_ACCENT_COLOR.to_string()),
            blur_hash: self.blur_hash.clone(),
            origin: ImageOrigin::Remote,
        }
    }
}

/// Thin async client over the Unsplash REST API
#[derive(Debug, Clone)]
pub struct UnsplashClient {
    client: reqwest::Client,
    config: ApiConfig,
}

impl UnsplashClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Fetch `count` random photos matching a category query
    pub async fn random_photos(&self, query: &str, count: usize) -> Result<Vec<UnsplashPhoto>> {
        let url = format!(
            "{}/photos/random?query={}&count={}&client_id={}",
            self.config.base_url,
            urlencoding::encode(query),
            count,
            urlencoding::encode(&self.config.access_key)
        );

        log::debug!("Fetching {} random photos for '{}'", count, query);

        let response = self
            .client
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GalleryError::HttpStatus(response.status()));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Keyword search, one page at a time
    pub async fn search_photos(
        &self,
        query: &str,
        page: u32,
        per_page: usize,
    ) -> Result<Vec<UnsplashPhoto>> {
        let url = format!(
            "{}/search/photos?query={}&page={}&per_page={}",
            self.config.base_url,
            urlencoding::encode(query),
            page.max(1),
            per_page
        );

        log::debug!("Searching photos for '{}' (page {})", query, page);

        let response = self
            .client
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .header("Authorization", format!("Client-ID {}", self.config.access_key))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GalleryError::HttpStatus(response.status()));
        }

        let body = response.text().await?;
        let search: SearchResponse = serde_json::from_str(&body)?;
        Ok(search.results)
    }
}

#[cfg(test)]
#[path = "unsplash_tests.rs"]
mod tests;
