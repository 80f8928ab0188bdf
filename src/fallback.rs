//! Bundled fallback images per category
//!
//! Used when the remote API is unreachable, rate limited or returns garbage.
//! Selection is uniform with replacement from the category pool.

use crate::models::{Attribution, ImageDescriptor, ImageOrigin, DEFAULT_ACCENT_COLOR};
use crate::random::RandomSource;

/// Category whose pool is used for unknown categories
pub const DEFAULT_CATEGORY: &str = "Nature";

const NATURE: &[&str] = &[
    "/images/categories/nature/forest.jpg",
    "/images/categories/nature/lake.jpg",
    "/images/categories/nature/mountains.jpg",
    "/images/categories/nature/waterfall.jpg",
    "/images/categories/nature/meadow.jpg",
    "/images/categories/nature/coast.jpg",
];
const TRAVEL: &[&str] = &[
    "/images/categories/travel/city-street.jpg",
    "/images/categories/travel/beach.jpg",
    "/images/categories/travel/train.jpg",
    "/images/categories/travel/old-town.jpg",
];
const FOOD: &[&str] = &[
    "/images/categories/food/pasta.jpg",
    "/images/categories/food/breakfast.jpg",
    "/images/categories/food/dessert.jpg",
    "/images/categories/food/salad.jpg",
];
const ART: &[&str] = &[
    "/images/categories/art/painting.jpg",
    "/images/categories/art/mural.jpg",
    "/images/categories/art/sculpture.jpg",
];
const FASHION: &[&str] = &[
    "/images/categories/fashion/street-style.jpg",
    "/images/categories/fashion/runway.jpg",
    "/images/categories/fashion/accessories.jpg",
];
const TECHNOLOGY: &[&str] = &[
    "/images/categories/technology/laptop.jpg",
    "/images/categories/technology/circuit.jpg",
    "/images/categories/technology/workspace.jpg",
];
const ARCHITECTURE: &[&str] = &[
    "/images/categories/architecture/skyscraper.jpg",
    "/images/categories/architecture/bridge.jpg",
    "/images/categories/architecture/interior.jpg",
];
const FITNESS: &[&str] = &[
    "/images/categories/fitness/running.jpg",
    "/images/categories/fitness/yoga.jpg",
    "/images/categories/fitness/gym.jpg",
];
const DIY: &[&str] = &[
    "/images/categories/diy/woodwork.jpg",
    "/images/categories/diy/knitting.jpg",
    "/images/categories/diy/planters.jpg",
];
const ANIMALS: &[&str] = &[
    "/images/categories/animals/fox.jpg",
    "/images/categories/animals/cat.jpg",
    "/images/categories/animals/owl.jpg",
    "/images/categories/animals/dog.jpg",
];

/// Pool for a known category (case-insensitive)
fn known_pool(category: &str) -> Option<&'static [&'static str]> {
    let pool = match category.trim().to_ascii_lowercase().as_str() {
        "nature" => NATURE,
        "travel" => TRAVEL,
        "food" => FOOD,
        "art" => ART,
        "fashion" => FASHION,
        "technology" => TECHNOLOGY,
        "architecture" => ARCHITECTURE,
        "fitness" => FITNESS,
        "diy" => DIY,
        "animals" => ANIMALS,
        _ => return None,
    };
    Some(pool)
}

/// Whether the category has its own bundled pool
pub fn has_pool(category: &str) -> bool {
    known_pool(category).is_some()
}

/// Pool for a category, falling back to the default category's pool
pub fn pool_for(category: &str) -> &'static [&'static str] {
    known_pool(category).unwrap_or(NATURE)
}

/// Draw `count` fallback descriptors for a category
pub fn fallback_images<R: RandomSource + ?Sized>(
    category: &str,
    count: usize,
    rng: &mut R,
) -> Vec<ImageDescriptor> {
    let pool = pool_for(category);
    if !has_pool(category) {
        log::debug!(
            "No fallback pool for '{}', using {} pool",
            category,
            DEFAULT_CATEGORY
        );
    }

    (0..count)
        .map(|_| {
            let url = pool[rng.next_index(pool.len())];
            ImageDescriptor {
                url: url.to_string(),
                alt: format!("{} image", category),
                attribution: Some(Attribution::generic()),
                accent_color: DEFAULT_ACCENT_COLOR.to_string(),
                blur_hash: None,
                origin: ImageOrigin::Fallback,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::XorShiftRng;

    #[test]
    fn test_known_category_pool() {
        assert!(has_pool("Nature"));
        assert!(has_pool("animals"));
        assert!(has_pool(" DIY "));
        assert_eq!(pool_for("Food"), FOOD);
    }

    #[test]
    fn test_unknown_category_uses_default_pool() {
        assert!(!has_pool("Cars"));
        assert_eq!(pool_for("Cars"), pool_for(DEFAULT_CATEGORY));
    }

    #[test]
    fn test_fallback_images_exact_count() {
        let mut rng = XorShiftRng::seeded(1);
        assert_eq!(fallback_images("Travel", 12, &mut rng).len(), 12);
        assert_eq!(fallback_images("Travel", 0, &mut rng).len(), 0);
        // More than the pool holds: selection is with replacement
        assert_eq!(fallback_images("Art", 50, &mut rng).len(), 50);
    }

    #[test]
    fn test_fallback_images_come_from_pool() {
        let mut rng = XorShiftRng::seeded(2);
        let images = fallback_images("Nature", 12, &mut rng);

        for image in &images {
            assert!(NATURE.contains(&image.url.as_str()));
            assert!(image.is_fallback());
            assert_eq!(image.alt, "Nature image");
            assert_eq!(image.attribution, Some(Attribution::generic()));
            assert_eq!(image.accent_color, DEFAULT_ACCENT_COLOR);
        }
    }

    #[test]
    fn test_fallback_selection_is_reproducible_with_seed() {
        let a = fallback_images("Food", 8, &mut XorShiftRng::seeded(99));
        let b = fallback_images("Food", 8, &mut XorShiftRng::seeded(99));
        assert_eq!(a, b);
    }

    #[test]
    fn test_unknown_category_keeps_its_alt_text() {
        let mut rng = XorShiftRng::seeded(3);
        let images = fallback_images("Cars", 3, &mut rng);
        for image in &images {
            assert!(NATURE.contains(&image.url.as_str()));
            assert_eq!(image.alt, "Cars image");
        }
    }
}
