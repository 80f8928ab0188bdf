//! Pin Gallery CLI
//!
//! Fetches category images, searches Unsplash, lists mock pins and manages the
//! saved-pin collection from the command line.

use clap::{Parser, Subcommand};
use pin_gallery::pins::{
    category_stats, generate_mock_pins, photo_to_pin, related_pins, related_query, PinBoard,
};
use pin_gallery::random::XorShiftRng;
use pin_gallery::scroll::{attach, scroll_channel, ScrollMetrics, ScrollOptions};
use pin_gallery::{
    ApiConfig, GalleryConfig, ImageDescriptor, ImageFetchCache, SavedPins, UnsplashClient,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Pin gallery content tools
#[derive(Parser, Debug)]
#[command(name = "pin_gallery")]
#[command(version, about, long_about = None)]
struct Args {
    /// Unsplash API base URL
    #[arg(long, default_value = pin_gallery::config::DEFAULT_API_URL)]
    api_url: String,

    /// Total fetch attempts before falling back to bundled images
    #[arg(long, default_value_t = 3)]
    max_attempts: u32,

    /// Base retry delay in milliseconds (multiplied by the attempt number)
    #[arg(long, default_value_t = 1000)]
    retry_delay_ms: u64,

    /// Path to the saved pins file
    #[arg(long, default_value_t = default_saved_path())]
    saved_file: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch one page of category images and print them as JSON
    Fetch {
        #[arg(short, long, default_value = "Nature")]
        category: String,
        #[arg(short = 'n', long, default_value_t = 12)]
        count: usize,
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Load several pages the way the infinite scroll board does
    Browse {
        #[arg(short, long, default_value = "Nature")]
        category: String,
        #[arg(short = 'n', long, default_value_t = 12)]
        count: usize,
        /// Number of pages to load
        #[arg(long, default_value_t = 3)]
        pages: u32,
    },
    /// Search Unsplash and print the results as pins
    Search {
        query: String,
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 30)]
        per_page: usize,
    },
    /// List mock pins, optionally filtered
    Pins {
        #[arg(short, long)]
        query: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short = 'n', long, default_value_t = 50)]
        count: usize,
        /// Seed for reproducible mock pins
        #[arg(long, default_value_t = 1)]
        seed: u64,
    },
    /// Print pin counts and a cover image per category
    Explore {
        #[arg(short = 'n', long, default_value_t = 50)]
        count: usize,
        #[arg(long, default_value_t = 1)]
        seed: u64,
    },
    /// Search Unsplash for pins related to a mock pin
    Related {
        id: String,
        #[arg(long, default_value_t = 1)]
        seed: u64,
        #[arg(long, default_value_t = 8)]
        per_page: usize,
    },
    /// Manage saved pins
    Saved {
        #[command(subcommand)]
        action: SavedAction,
    },
}

#[derive(Subcommand, Debug)]
enum SavedAction {
    /// Print saved pins
    List,
    /// Save a mock pin by id
    Add {
        id: String,
        #[arg(long, default_value_t = 1)]
        seed: u64,
    },
    /// Remove a saved pin by id
    Remove { id: String },
}

/// Returns the default saved pins path: ~/.local/share/pin_gallery/saved_pins.json
fn default_saved_path() -> String {
    SavedPins::default_path().to_string_lossy().to_string()
}

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = GalleryConfig {
        api: ApiConfig::from_env().with_base_url(args.api_url.clone()),
        ..GalleryConfig::default()
    };
    config.cache.max_attempts = args.max_attempts;
    config.cache.retry_base_delay = Duration::from_millis(args.retry_delay_ms);

    let result = match args.command {
        Command::Fetch {
            category,
            count,
            page,
        } => run_fetch(&config, &category, count, page).await,
        Command::Browse {
            category,
            count,
            pages,
        } => run_browse(&config, category, count, pages).await,
        Command::Search {
            query,
            page,
            per_page,
        } => run_search(&config, &query, page, per_page).await,
        Command::Pins {
            query,
            category,
            count,
            seed,
        } => run_pins(query.as_deref(), category.as_deref(), count, seed),
        Command::Explore { count, seed } => run_explore(count, seed),
        Command::Related { id, seed, per_page } => {
            run_related(&config, &id, seed, per_page).await
        }
        Command::Saved { action } => run_saved(PathBuf::from(&args.saved_file), action),
    };

    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn print_json<T: Serialize>(value: &T) -> pin_gallery::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn build_cache(config: &GalleryConfig) -> pin_gallery::Result<ImageFetchCache> {
    let client = UnsplashClient::new(config.api.clone());
    ImageFetchCache::new(client, config.cache.clone())
}

async fn run_fetch(
    config: &GalleryConfig,
    category: &str,
    count: usize,
    page: u32,
) -> pin_gallery::Result<()> {
    let cache = build_cache(config)?;
    let images = cache.fetch_images(category, count, page).await;
    let fallback = images.iter().filter(|img| img.is_fallback()).count();
    log::info!(
        "Fetched {} images for {} page {} ({} from fallback pool)",
        images.len(),
        category,
        page,
        fallback
    );
    print_json(&images)
}

/// Feed synthetic near-bottom scroll events and load one page per trigger
async fn run_browse(
    config: &GalleryConfig,
    category: String,
    count: usize,
    pages: u32,
) -> pin_gallery::Result<()> {
    let cache = Arc::new(build_cache(config)?);
    cache.start_sweeper();

    let board = Arc::new(tokio::sync::Mutex::new(Vec::<ImageDescriptor>::new()));
    let next_page = Arc::new(std::sync::atomic::AtomicU32::new(1));

    let (events, rx) = scroll_channel();
    let loader = {
        let cache = Arc::clone(&cache);
        let board = Arc::clone(&board);
        let next_page = Arc::clone(&next_page);
        let category = category.clone();
        move || {
            let cache = Arc::clone(&cache);
            let board = Arc::clone(&board);
            let page = next_page.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            let category = category.clone();
            async move {
                let images = cache.fetch_images(&category, count, page).await;
                log::info!("Loaded page {} ({} images)", page, images.len());
                board.lock().await.extend(images);
                Ok::<(), pin_gallery::GalleryError>(())
            }
        }
    };

    let options = ScrollOptions {
        debounce: Duration::from_millis(100),
        ..ScrollOptions::default()
    };
    let attachment = attach(rx, loader, options);

    // Each viewport is 800px, content always ends just below it
    let at_bottom = ScrollMetrics::new(2000.0, 1200.0, 800.0);
    while attachment.load_count() < pages as usize {
        if !attachment.is_loading() {
            let _ = events.send(at_bottom);
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    while attachment.is_loading() {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    attachment.detach();
    cache.dispose();

    let images = board.lock().await;
    print_json(&*images)
}

async fn run_search(
    config: &GalleryConfig,
    query: &str,
    page: u32,
    per_page: usize,
) -> pin_gallery::Result<()> {
    let client = UnsplashClient::new(config.api.clone());
    let photos = client.search_photos(query, page, per_page).await?;
    let pins: Vec<_> = photos.iter().map(photo_to_pin).collect();
    log::info!("Found {} pins for '{}'", pins.len(), query);
    print_json(&pins)
}

fn run_pins(
    query: Option<&str>,
    category: Option<&str>,
    count: usize,
    seed: u64,
) -> pin_gallery::Result<()> {
    let board = PinBoard::new(generate_mock_pins(count, &mut XorShiftRng::seeded(seed)));

    let mut pins: Vec<_> = match query {
        Some(q) => board.search(q),
        None => board.pins().iter().collect(),
    };
    if let Some(category) = category {
        pins.retain(|pin| pin.category.as_deref() == Some(category));
    }

    print_json(&pins)
}

fn run_explore(count: usize, seed: u64) -> pin_gallery::Result<()> {
    let mut rng = XorShiftRng::seeded(seed);
    let pins = generate_mock_pins(count, &mut rng);
    print_json(&category_stats(&pins, &mut rng))
}

async fn run_related(
    config: &GalleryConfig,
    id: &str,
    seed: u64,
    per_page: usize,
) -> pin_gallery::Result<()> {
    let board = PinBoard::new(generate_mock_pins(50, &mut XorShiftRng::seeded(seed)));
    let Some(pin) = board.get(id) else {
        log::warn!("No pin with id {}", id);
        return Ok(());
    };

    let query = related_query(pin);
    let client = UnsplashClient::new(config.api.clone());
    let photos = client.search_photos(query, 1, per_page).await?;
    let related = related_pins(&photos, id);
    log::info!("Found {} pins related to {} ('{}')", related.len(), id, query);
    print_json(&related)
}

fn run_saved(path: PathBuf, action: SavedAction) -> pin_gallery::Result<()> {
    let mut saved = SavedPins::load(&path);

    match action {
        SavedAction::List => return print_json(&saved.saved_pins()),
        SavedAction::Add { id, seed } => {
            let board = PinBoard::new(generate_mock_pins(50, &mut XorShiftRng::seeded(seed)));
            match board.get(&id) {
                Some(pin) => {
                    saved.save_pin(pin.clone());
                    log::info!("Saved {}", id);
                }
                None => {
                    log::warn!("No pin with id {}", id);
                    return Ok(());
                }
            }
        }
        SavedAction::Remove { id } => {
            if saved.remove_pin(&id) {
                log::info!("Removed {}", id);
            } else {
                log::warn!("{} was not saved", id);
            }
        }
    }

    saved.save()
}
