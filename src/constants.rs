//! Application-wide constants and configuration values
//!
//! This module centralizes all magic numbers and configuration constants
//! to improve maintainability and make the codebase more configurable.

#![allow(dead_code)]

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

/// The season the current-season page targets. Bumped once per airing cycle.
pub const CURRENT_SEASON_NUMBER: u32 = 49;

/// Default base URL for the published data files. The scraper pushes fresh
/// JSON to this host, so reads always see the newest data.
pub const DEFAULT_DATA_BASE_URL: &str =
    "https://raw.githubusercontent.com/trishadey44/survivor-api/main/data";

/// Resource file names published by the data repository
pub mod resources {
    /// Season metadata, required for every page
    pub const SEASONS: &str = "seasons.json";

    /// Episodes keyed by season number, required for every page
    pub const EPISODES: &str = "episodes.json";

    /// Per-episode outcome details. Published with a lag; optional.
    pub const EPISODE_DETAILS: &str = "episode_details.json";
}

/// Cache TTL (Time To Live) values
pub mod cache_ttl {
    /// The data files are regenerated upstream once per day, so a cached
    /// copy younger than this is served without a network call.
    pub const RESOURCE_TTL_HOURS: i64 = 24;
}

/// Environment variable names
pub mod env_vars {
    /// Environment variable for primary data base URL override
    pub const DATA_BASE_URL: &str = "CASTAWAY_DATA_URL";

    /// Environment variable for fallback data base URL override
    pub const FALLBACK_BASE_URL: &str = "CASTAWAY_FALLBACK_URL";

    /// Environment variable for log file path override
    pub const LOG_FILE: &str = "CASTAWAY_LOG_FILE";

    /// Environment variable for HTTP timeout in seconds (default: 30)
    pub const HTTP_TIMEOUT: &str = "CASTAWAY_HTTP_TIMEOUT";
}

/// Retry configuration for transient fetch failures
pub mod retry {
    /// Maximum number of retry attempts per source URL
    pub const MAX_ATTEMPTS: u32 = 3;

    /// Base delay for exponential backoff (milliseconds)
    pub const BASE_DELAY_MS: u64 = 250;
}

/// Recap derivation tuning
pub mod recap {
    /// How many advantage-event callouts the last-episode recap surfaces
    pub const MAX_ADVANTAGE_CALLOUTS: usize = 2;

    /// Substrings that classify an eliminated name as a medical
    /// evacuation or a quit. Matched case-insensitively against free
    /// text, so false positives are possible and accepted.
    pub const MEDEVAC_OR_QUIT_KEYWORDS: [&str; 3] = ["medic", "evac", "quit"];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_constant_is_reasonable() {
        // One refresh per day matches the upstream publish cadence
        assert_eq!(cache_ttl::RESOURCE_TTL_HOURS, 24);
    }

    #[test]
    fn test_retry_constants_are_reasonable() {
        assert!(retry::MAX_ATTEMPTS > 0);
        assert!(retry::BASE_DELAY_MS > 0);
    }

    #[test]
    fn test_resource_names_are_json_files() {
        for name in [
            resources::SEASONS,
            resources::EPISODES,
            resources::EPISODE_DETAILS,
        ] {
            assert!(name.ends_with(".json"), "resource {name} should be a json file");
        }
    }

    #[test]
    fn test_env_var_names_are_not_empty() {
        assert!(!env_vars::DATA_BASE_URL.is_empty());
        assert!(!env_vars::FALLBACK_BASE_URL.is_empty());
        assert!(!env_vars::LOG_FILE.is_empty());
        assert!(!env_vars::HTTP_TIMEOUT.is_empty());
    }

    #[test]
    fn test_recap_constants() {
        assert!(recap::MAX_ADVANTAGE_CALLOUTS >= 1);
        for kw in recap::MEDEVAC_OR_QUIT_KEYWORDS {
            assert_eq!(kw, kw.to_lowercase(), "keywords are matched lowercased");
        }
    }
}
