//! Pin model, mock pin generation and pin queries

use crate::random::RandomSource;
use crate::unsplash::UnsplashPhoto;
use serde::{Deserialize, Serialize};

/// Browsable categories, in display order
pub const CATEGORIES: [&str; 10] = [
    "Nature",
    "Travel",
    "Food",
    "Art",
    "Fashion",
    "Technology",
    "Architecture",
    "Fitness",
    "DIY",
    "Animals",
];

/// Owner of a pin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinUser {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// A displayable image item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pin {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub image: String,
    pub user: PinUser,
    #[serde(default)]
    pub saves: u32,
    #[serde(default)]
    pub category: Option<String>,
}

fn mock_users() -> Vec<PinUser> {
    [
        ("1", "Alex Johnson"),
        ("2", "Jamie Smith"),
        ("3", "Taylor Wilson"),
        ("4", "Jordan Lee"),
        ("5", "Casey Brown"),
    ]
    .iter()
    .map(|(id, name)| PinUser {
        id: id.to_string(),
        name: name.to_string(),
        avatar: Some(format!("https://i.pravatar.cc/150?img={}", id)),
    })
    .collect()
}

/// Generate `count` placeholder pins with ids `pin-1..=pin-count`
pub fn generate_mock_pins<R: RandomSource + ?Sized>(count: usize, rng: &mut R) -> Vec<Pin> {
    let users = mock_users();

    (1..=count)
        .map(|i| {
            let category = CATEGORIES[rng.next_index(CATEGORIES.len())];
            let user = users[rng.next_index(users.len())].clone();
            let height = rng.next_in_range(200, 500);
            let lower = category.to_lowercase();

            Pin {
                id: format!("pin-{}", i),
                title: format!("{} Inspiration {}", category, i),
                description: Some(format!(
                    "Beautiful {} inspiration for your next project",
                    lower
                )),
                image: format!(
                    "https://source.unsplash.com/random/300x{}?{}",
                    height, lower
                ),
                user,
                saves: rng.next_in_range(5, 200),
                category: Some(category.to_string()),
            }
        })
        .collect()
}

/// Case-insensitive match over title, description and category
pub fn search_pins<'a>(pins: &'a [Pin], query: &str) -> Vec<&'a Pin> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return pins.iter().collect();
    }

    pins.iter()
        .filter(|pin| {
            pin.title.to_lowercase().contains(&query)
                || pin
                    .description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&query))
                || pin
                    .category
                    .as_deref()
                    .is_some_and(|c| c.to_lowercase().contains(&query))
        })
        .collect()
}

pub fn pins_by_category<'a>(pins: &'a [Pin], category: &str) -> Vec<&'a Pin> {
    pins.iter()
        .filter(|pin| pin.category.as_deref() == Some(category))
        .collect()
}

/// Per-category summary for the explore view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub name: String,
    pub count: usize,
    /// Image of a randomly picked pin, `None` when the category is empty
    pub image: Option<String>,
}

/// Pin count and a cover image for every entry in `CATEGORIES`, in order
pub fn category_stats<R: RandomSource + ?Sized>(
    pins: &[Pin],
    rng: &mut R,
) -> Vec<CategoryStats> {
    CATEGORIES
        .iter()
        .map(|&name| {
            let matching = pins_by_category(pins, name);
            let image = if matching.is_empty() {
                None
            } else {
                Some(matching[rng.next_index(matching.len())].image.clone())
            };
            CategoryStats {
                name: name.to_string(),
                count: matching.len(),
                image,
            }
        })
        .collect()
}

/// Search term for pins related to `pin`: its category, else the first
/// word of its title
pub fn related_query(pin: &Pin) -> &str {
    pin.category
        .as_deref()
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| pin.title.split_whitespace().next().unwrap_or(""))
}

/// Convert search results into related pins, leaving out the pin `id` itself
pub fn related_pins(photos: &[UnsplashPhoto], id: &str) -> Vec<Pin> {
    photos
        .iter()
        .map(photo_to_pin)
        .filter(|pin| pin.id != id)
        .collect()
}

/// Convert an Unsplash photo into a pin
pub fn photo_to_pin(photo: &UnsplashPhoto) -> Pin {
    Pin {
        id: photo.id.clone(),
        title: photo
            .alt_description
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "Untitled".to_string()),
        description: photo.description.clone(),
        image: photo.urls.regular.clone(),
        user: PinUser {
            id: photo.user.id.clone(),
            name: photo.user.display_name().to_string(),
            avatar: photo.user.avatar().map(str::to_string),
        },
        saves: photo.likes,
        category: photo.first_tag().map(str::to_string),
    }
}

/// In-memory pin collection backing the board views
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PinBoard {
    pins: Vec<Pin>,
}

impl PinBoard {
    pub fn new(pins: Vec<Pin>) -> Self {
        Self { pins }
    }

    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Pin> {
        self.pins.iter().find(|pin| pin.id == id)
    }

    /// Replace a pin with the same id, or add it under a fresh id.
    ///
    /// Returns the id the pin is stored under.
    pub fn upsert(&mut self, pin: Pin) -> String {
        if let Some(existing) = self.pins.iter_mut().find(|p| p.id == pin.id) {
            *existing = pin;
            return existing.id.clone();
        }

        let mut id = format!("pin-{}", chrono::Utc::now().timestamp_millis());
        while self.get(&id).is_some() {
            id.push('x');
        }
        log::debug!("Adding pin '{}' as {}", pin.title, id);
        self.pins.push(Pin { id: id.clone(), ..pin });
        id
    }

    pub fn search(&self, query: &str) -> Vec<&Pin> {
        search_pins(&self.pins, query)
    }

    pub fn by_category(&self, category: &str) -> Vec<&Pin> {
        pins_by_category(&self.pins, category)
    }
}
