//! Pin Gallery - content core for a Pinterest-style image board
//!
//! Fetches category images from Unsplash through an in-memory TTL cache with
//! retry and fallback, drives infinite scroll loading, and keeps the pin and
//! saved-pin data the board views render.

pub mod config;
pub mod error;
pub mod fallback;
pub mod image_cache;
pub mod masonry;
pub mod models;
pub mod pins;
pub mod random;
pub mod saved_pins;
pub mod scroll;
pub mod unsplash;

pub use config::{ApiConfig, CacheConfig, GalleryConfig};
pub use error::{GalleryError, Result};
pub use image_cache::ImageFetchCache;
pub use models::{Attribution, ImageDescriptor, ImageOrigin};
pub use pins::{CategoryStats, Pin, PinBoard, PinUser};
pub use saved_pins::SavedPins;
pub use scroll::{attach, ScrollAttachment, ScrollMetrics, ScrollOptions};
pub use unsplash::UnsplashClient;
