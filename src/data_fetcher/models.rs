use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Airing window of a season as published upstream. The strings are
/// display dates, not parsed timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AiringDates {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

/// One full competitive run, identified by a sequential number.
/// Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Season {
    pub season_number: u32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub airing_dates: Option<AiringDates>,
    #[serde(default)]
    pub num_episodes: Option<u32>,
    #[serde(default)]
    pub num_days: Option<u32>,
    #[serde(default)]
    pub num_castaways: Option<u32>,
    #[serde(default)]
    pub winner: Option<String>,
    #[serde(default)]
    pub tribes: Vec<String>,
    #[serde(default)]
    pub viewership_millions: Option<f64>,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub twists: Vec<String>,
}

impl Season {
    /// Display name, falling back to the season number when upstream has
    /// not published a title yet.
    pub fn display_title(&self) -> String {
        match &self.title {
            Some(title) => title.clone(),
            None => format!("Season {}", self.season_number),
        }
    }

    /// Theme/twists line for the season header: the twist list when
    /// present, otherwise the theme string.
    pub fn theme_line(&self) -> Option<String> {
        if !self.twists.is_empty() {
            Some(self.twists.join(", "))
        } else {
            self.theme.clone()
        }
    }
}

/// A single broadcast episode. `episode_in_season` is the 1-based index
/// within its season, distinct from `overall_episode_number` across all
/// seasons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    #[serde(default)]
    pub episode_in_season: u32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub air_date: Option<String>,
    #[serde(default)]
    pub overall_episode_number: Option<u32>,
    #[serde(default)]
    pub episode_type: Option<String>,
    #[serde(default)]
    pub us_viewers_millions: Option<f64>,
}

impl Episode {
    /// Episode title with the `Episode N` fallback used across the views.
    pub fn display_title(&self) -> String {
        match &self.title {
            Some(title) => title.clone(),
            None => format!("Episode {}", self.episode_in_season),
        }
    }
}

/// An in-game advantage/idol occurrence within an episode: either a bare
/// description string or a tagged record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdvantageEvent {
    Text(String),
    Tagged {
        #[serde(default)]
        text: Option<String>,
        #[serde(default)]
        tag: Option<String>,
    },
}

impl AdvantageEvent {
    /// Resolves to `(tag, text)`, defaulting the tag to `"event"` for
    /// bare strings and untagged records. Entries without text resolve
    /// to `None` and are discarded by consumers.
    pub fn resolve(&self) -> Option<(&str, &str)> {
        match self {
            AdvantageEvent::Text(text) if !text.is_empty() => Some(("event", text)),
            AdvantageEvent::Tagged {
                text: Some(text),
                tag,
            } if !text.is_empty() => Some((tag.as_deref().unwrap_or("event"), text)),
            _ => None,
        }
    }
}

/// Sparse per-episode outcome record. Published with a lag relative to
/// the episode feed; any field may be missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EpisodeDetail {
    #[serde(default)]
    pub episode_in_season: Option<u32>,
    #[serde(default)]
    pub immunity_winners: Vec<String>,
    #[serde(default)]
    pub eliminated: Vec<String>,
    #[serde(default)]
    pub advantage_events: Vec<AdvantageEvent>,
}

/// `seasons.json` payload: either `{ "seasons": [...] }` or a bare array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SeasonsPayload {
    Wrapped { seasons: Vec<Season> },
    Bare(Vec<Season>),
}

impl SeasonsPayload {
    pub fn into_seasons(self) -> Vec<Season> {
        match self {
            SeasonsPayload::Wrapped { seasons } => seasons,
            SeasonsPayload::Bare(seasons) => seasons,
        }
    }
}

/// `episodes.json` payload: `{ "episodes_by_season": {...} }` or a bare
/// map keyed by season number strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EpisodesPayload {
    Wrapped {
        episodes_by_season: HashMap<String, Vec<Episode>>,
    },
    Bare(HashMap<String, Vec<Episode>>),
}

impl EpisodesPayload {
    pub fn into_map(self) -> HashMap<String, Vec<Episode>> {
        match self {
            EpisodesPayload::Wrapped { episodes_by_season } => episodes_by_season,
            EpisodesPayload::Bare(map) => map,
        }
    }
}

/// `episode_details.json` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct DetailsPayload {
    #[serde(default)]
    pub episode_details_by_season: HashMap<String, Vec<EpisodeDetail>>,
}

/// Everything a page render needs, assembled from the three resources.
/// `details_by_season` is `None` when the optional details file was
/// unavailable, as opposed to published-but-empty.
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub seasons: Vec<Season>,
    pub episodes_by_season: HashMap<u32, Vec<Episode>>,
    pub details_by_season: Option<HashMap<u32, Vec<EpisodeDetail>>>,
}

impl DashboardData {
    pub fn season(&self, season_number: u32) -> Option<&Season> {
        self.seasons
            .iter()
            .find(|s| s.season_number == season_number)
    }

    /// Episodes of one season in ascending `episode_in_season` order.
    /// Returns an empty list for seasons without an episode entry.
    pub fn episodes_for_season(&self, season_number: u32) -> Vec<Episode> {
        let mut episodes = self
            .episodes_by_season
            .get(&season_number)
            .cloned()
            .unwrap_or_default();
        episodes.sort_by_key(|e| e.episode_in_season);
        episodes
    }

    /// Detail records of one season, or `None` when the details file was
    /// not available at all.
    pub fn details_for_season(&self, season_number: u32) -> Option<Vec<EpisodeDetail>> {
        self.details_by_season
            .as_ref()
            .map(|map| map.get(&season_number).cloned().unwrap_or_default())
    }

    /// Total episode count across every season, for the overview page.
    pub fn total_episodes(&self) -> usize {
        self.episodes_by_season.values().map(Vec::len).sum()
    }

    /// The newest season in the feed (highest season number).
    pub fn newest_season(&self) -> Option<&Season> {
        self.seasons.iter().max_by_key(|s| s.season_number)
    }
}

/// Re-keys a string-keyed season map to numeric season numbers, dropping
/// entries whose key is not a number.
pub fn rekey_by_season_number<T>(map: HashMap<String, Vec<T>>) -> HashMap<u32, Vec<T>> {
    let mut rekeyed = HashMap::with_capacity(map.len());
    for (key, value) in map {
        match key.parse::<u32>() {
            Ok(season_number) => {
                rekeyed.insert(season_number, value);
            }
            Err(_) => {
                debug!("Dropping season entry with non-numeric key: {key:?}");
            }
        }
    }
    rekeyed
}
