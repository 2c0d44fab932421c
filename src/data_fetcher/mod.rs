pub mod api;
pub mod cache;
pub mod models;
pub mod processors;
pub mod refresh_guard;

pub use api::ResourceFetcher;
pub use cache::{CacheRecord, CacheStore, FileCacheStore, MemoryCacheStore};
pub use models::{DashboardData, Episode, EpisodeDetail, Season};
pub use refresh_guard::{LoadToken, RefreshGuard};
