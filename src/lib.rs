//! Reality-TV Castaway Season Tracker Library
//!
//! This library fetches published season/episode JSON with a daily cache,
//! derives the current-season timeline (last aired, next scheduled,
//! eliminations, advantage feed) and renders plain-text dashboard pages.
//!
//! # Examples
//!
//! ```rust,no_run
//! use castaway_tracker::config::Config;
//! use castaway_tracker::data_fetcher::{FileCacheStore, ResourceFetcher};
//! use castaway_tracker::error::AppError;
//! use castaway_tracker::views::SpoilerGate;
//! use castaway_tracker::views::current_season::CurrentSeasonView;
//! use chrono::{Local, Utc};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let config = Config::load().await?;
//!     let store = Arc::new(FileCacheStore::at_default_location());
//!     let fetcher = ResourceFetcher::new(&config, store)?;
//!
//!     // Load seasons + episodes (required) and details (optional)
//!     let data = fetcher.fetch_dashboard_data(Utc::now()).await?;
//!
//!     let today = Utc::now().with_timezone(&Local).date_naive();
//!     if let Some(view) = CurrentSeasonView::build(&data, 49, today) {
//!         print!("{}", view.render(&SpoilerGate::new(false)));
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod constants;
pub mod data_fetcher;
pub mod error;
pub mod views;

// Re-export commonly used types for convenience
pub use config::Config;
pub use data_fetcher::api::ResourceFetcher;
pub use data_fetcher::cache::{CacheStore, FileCacheStore, MemoryCacheStore};
pub use data_fetcher::models::{DashboardData, Episode, EpisodeDetail, Season};
pub use error::AppError;
pub use views::SpoilerGate;

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
