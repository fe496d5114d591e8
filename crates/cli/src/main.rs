use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use rand::Rng;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::watch;

use engine::{FavouritesEngine, FavouritesSnapshot, PipelineState, SwipeEvent};
use pipeline::{FetchError, FixedLocation, PreferencesHub, RestaurantFetcher};
use swipe_data::{document, Coordinate, RestaurantId, RestaurantRecord, TimeWindow, UserPreferences};

use std::sync::Arc;

/// SwipeByte - community favourites ranking engine
#[derive(Parser)]
#[command(name = "swipebyte")]
#[command(about = "Rank community-favourite restaurants from swipe votes", long_about = None)]
struct Cli {
    /// Path to the restaurant documents JSON file
    #[arg(long, default_value = "data/restaurants.json")]
    restaurants: PathBuf,

    /// Path to the swipe documents JSON file
    #[arg(long, default_value = "data/swipes.json")]
    swipes: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum WindowArg {
    /// Rank by all-time net votes
    AllTime,
    /// Rank by the last 24 hours only
    Recent,
}

impl From<WindowArg> for TimeWindow {
    fn from(window: WindowArg) -> Self {
        match window {
            WindowArg::AllTime => TimeWindow::AllTime,
            WindowArg::Recent => TimeWindow::Last24Hours,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Rank community favourites around a location
    Favourites {
        /// User latitude in degrees
        #[arg(long)]
        lat: f64,

        /// User longitude in degrees
        #[arg(long)]
        lon: f64,

        /// Search radius in kilometers
        #[arg(long, default_value = "5.0")]
        radius: f64,

        /// Tally window to rank by
        #[arg(long, value_enum, default_value = "all-time")]
        window: WindowArg,

        /// Number of entries to print
        #[arg(long, default_value = "10")]
        top: usize,
    },

    /// Replay a simulated live swipe stream and print list updates
    Simulate {
        /// User latitude in degrees
        #[arg(long)]
        lat: f64,

        /// User longitude in degrees
        #[arg(long)]
        lon: f64,

        /// Search radius in kilometers
        #[arg(long, default_value = "5.0")]
        radius: f64,

        /// Number of simulated swipe bursts
        #[arg(long, default_value = "5")]
        rounds: usize,

        /// Swipes generated per burst
        #[arg(long, default_value = "25")]
        swipes_per_round: usize,
    },
}

/// Fetcher backed by the restaurant documents file.
struct FileFetcher {
    records: HashMap<RestaurantId, RestaurantRecord>,
}

impl FileFetcher {
    fn load(path: &Path) -> Result<Self> {
        let docs = load_documents(path)?;
        let mut records = HashMap::new();
        for doc in &docs {
            match document::decode_restaurant(doc) {
                Ok(record) => {
                    records.insert(record.id.clone(), record);
                }
                Err(err) => tracing::warn!("skipping malformed restaurant document: {err}"),
            }
        }
        println!(
            "{} Loaded {} restaurants from {}",
            "✓".green(),
            records.len(),
            path.display()
        );
        Ok(Self { records })
    }

    fn ids(&self) -> Vec<RestaurantId> {
        self.records.keys().cloned().collect()
    }
}

impl RestaurantFetcher for FileFetcher {
    async fn fetch_restaurant(
        &self,
        id: &RestaurantId,
    ) -> Result<Option<RestaurantRecord>, FetchError> {
        Ok(self.records.get(id).cloned())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Favourites {
            lat,
            lon,
            radius,
            window,
            top,
        } => {
            handle_favourites(
                &cli.restaurants,
                &cli.swipes,
                Coordinate::new(lat, lon),
                radius,
                window.into(),
                top,
            )
            .await?
        }
        Commands::Simulate {
            lat,
            lon,
            radius,
            rounds,
            swipes_per_round,
        } => {
            handle_simulate(
                &cli.restaurants,
                &cli.swipes,
                Coordinate::new(lat, lon),
                radius,
                rounds,
                swipes_per_round,
            )
            .await?
        }
    }

    Ok(())
}

fn load_documents(path: &Path) -> Result<Vec<Value>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Wait until the engine publishes a fresh Ready snapshot.
async fn await_ready(rx: &mut watch::Receiver<FavouritesSnapshot>) -> Result<FavouritesSnapshot> {
    loop {
        {
            let snap = rx.borrow_and_update();
            if snap.state == PipelineState::Ready && snap.source_error.is_none() {
                return Ok(snap.clone());
            }
        }
        rx.changed().await.context("favourites engine stopped")?;
    }
}

/// Handle the 'favourites' command
async fn handle_favourites(
    restaurants: &Path,
    swipes: &Path,
    location: Coordinate,
    radius: f64,
    window: TimeWindow,
    top: usize,
) -> Result<()> {
    let fetcher = FileFetcher::load(restaurants)?;
    let swipe_docs = load_documents(swipes)?;
    println!(
        "{} Loaded {} swipe documents from {}",
        "✓".green(),
        swipe_docs.len(),
        swipes.display()
    );

    let hub = Arc::new(PreferencesHub::new(
        UserPreferences::with_radius(radius).context("Invalid search radius")?,
    ));
    let engine = FavouritesEngine::spawn(fetcher, FixedLocation(Some(location)), hub);
    engine.set_active_window(window);

    let mut rx = engine.subscribe();
    engine.push_event(SwipeEvent::Snapshot(swipe_docs));

    let snapshot = await_ready(&mut rx).await?;
    print_favourites(&snapshot, top);
    Ok(())
}

/// Handle the 'simulate' command
async fn handle_simulate(
    restaurants: &Path,
    swipes: &Path,
    location: Coordinate,
    radius: f64,
    rounds: usize,
    swipes_per_round: usize,
) -> Result<()> {
    let fetcher = FileFetcher::load(restaurants)?;
    let ids = fetcher.ids();
    anyhow::ensure!(!ids.is_empty(), "no valid restaurants to swipe on");

    let mut swipe_docs = load_documents(swipes).unwrap_or_default();

    let hub = Arc::new(PreferencesHub::new(
        UserPreferences::with_radius(radius).context("Invalid search radius")?,
    ));
    let engine = FavouritesEngine::spawn(fetcher, FixedLocation(Some(location)), hub);
    let mut rx = engine.subscribe();

    engine.push_event(SwipeEvent::Snapshot(swipe_docs.clone()));
    let snapshot = await_ready(&mut rx).await?;
    println!("{}", "Initial list:".bold().blue());
    print_favourites(&snapshot, 10);

    for round in 1..=rounds {
        // A burst of community swipes, mostly likes
        {
            let mut rng = rand::rng();
            for _ in 0..swipes_per_round {
                let id = &ids[rng.random_range(0..ids.len())];
                let value = if rng.random_bool(0.7) { 1 } else { -1 };
                swipe_docs.push(serde_json::json!({
                    "restaurantId": id,
                    "value": value,
                    "timestamp": now_ms(),
                }));
            }
        }

        engine.push_event(SwipeEvent::Snapshot(swipe_docs.clone()));
        let snapshot = await_ready(&mut rx).await?;

        println!();
        println!(
            "{}",
            format!("After round {} ({} swipes):", round, swipe_docs.len())
                .bold()
                .blue()
        );
        print_favourites(&snapshot, 10);
        tokio::time::sleep(Duration::from_millis(250)).await;
    }

    Ok(())
}

/// Helper function to format and print the favourites list
fn print_favourites(snapshot: &FavouritesSnapshot, top: usize) {
    if snapshot.favourites.is_empty() {
        println!("{}", "No community favourites within your radius yet.".yellow());
        return;
    }

    for (i, favourite) in snapshot.favourites.iter().take(top).enumerate() {
        let restaurant = &favourite.restaurant;
        let price = "$".repeat(restaurant.price.level() as usize);
        let cuisines = restaurant.cuisines.join(", ");
        println!(
            "{}. {} [{}] {} - {} votes, {:.1} km",
            (i + 1).to_string().green(),
            restaurant.name.bold(),
            cuisines,
            price,
            favourite.net_votes,
            favourite.distance_km
        );
    }
}
