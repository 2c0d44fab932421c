//! Recap aggregation over the timeline and detail index
//!
//! Combines the last-aired episode with its detail record into a recap,
//! walks the season for the elimination ledger and the deduplicated
//! advantage feed, and derives the remaining-contestant estimate. None of
//! this redacts names; spoiler gating happens at the view boundary.

use crate::constants::recap;
use crate::data_fetcher::models::Episode;

use super::details::DetailIndex;

/// Summary of the most recently aired episode's outcomes.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeRecap {
    pub episode: Episode,
    pub immunity_winners: Vec<String>,
    pub eliminated: Vec<String>,
    /// Up to the first two resolvable advantage-event descriptions.
    pub advantage_callouts: Vec<String>,
}

/// One row of the cumulative elimination list.
#[derive(Debug, Clone, PartialEq)]
pub struct EliminationRow {
    pub episode_in_season: u32,
    pub title: String,
    pub names: Vec<String>,
}

/// One row of the season-to-date advantage feed.
#[derive(Debug, Clone, PartialEq)]
pub struct AdvantageFeedRow {
    pub episode_in_season: u32,
    pub title: String,
    pub tag: String,
    pub text: String,
}

/// Builds the last-episode recap. The detail record may be absent, in
/// which case the sub-collections default to empty; with no last-aired
/// episode there is nothing to recap.
pub fn build_recap(last_aired: Option<&Episode>, details: &DetailIndex) -> Option<EpisodeRecap> {
    let episode = last_aired?;
    let detail = details.get(episode.episode_in_season).cloned().unwrap_or_default();

    let advantage_callouts: Vec<String> = detail
        .advantage_events
        .iter()
        .filter_map(|event| event.resolve())
        .map(|(_, text)| text.to_string())
        .take(recap::MAX_ADVANTAGE_CALLOUTS)
        .collect();

    Some(EpisodeRecap {
        episode: episode.clone(),
        immunity_winners: detail.immunity_winners,
        eliminated: detail.eliminated,
        advantage_callouts,
    })
}

/// Walks the episodes in the given (ascending) order and collects one row
/// per episode with a non-empty eliminated list. Order is preserved as
/// given; no re-sorting.
pub fn build_elimination_ledger(episodes: &[Episode], details: &DetailIndex) -> Vec<EliminationRow> {
    let mut ledger = Vec::new();
    for episode in episodes {
        let Some(detail) = details.get(episode.episode_in_season) else {
            continue;
        };
        if detail.eliminated.is_empty() {
            continue;
        }
        ledger.push(EliminationRow {
            episode_in_season: episode.episode_in_season,
            title: episode.display_title(),
            names: detail.eliminated.clone(),
        });
    }
    ledger
}

/// Season-to-date advantage feed in first-seen order. Events without
/// resolvable text are skipped; duplicates collapse on
/// `(episode_in_season, text)`, so identical text in the same episode is
/// recorded once while the same text across episodes stays separate.
pub fn build_advantage_feed(episodes: &[Episode], details: &DetailIndex) -> Vec<AdvantageFeedRow> {
    let mut seen: std::collections::HashSet<(u32, String)> = std::collections::HashSet::new();
    let mut rows = Vec::new();
    for episode in episodes {
        let Some(detail) = details.get(episode.episode_in_season) else {
            continue;
        };
        for event in &detail.advantage_events {
            let Some((tag, text)) = event.resolve() else {
                continue;
            };
            let key = (episode.episode_in_season, text.to_string());
            if !seen.insert(key) {
                continue;
            }
            rows.push(AdvantageFeedRow {
                episode_in_season: episode.episode_in_season,
                title: episode.display_title(),
                tag: tag.to_string(),
                text: text.to_string(),
            });
        }
    }
    rows
}

/// Estimated contestants still in the game. Unknown when the starting
/// count is unknown or zero, and unknown (never a clamped zero) when the
/// ledger somehow exceeds it; a negative estimate would mean the data is
/// wrong, not the game.
pub fn estimate_remaining(
    starting_castaways: Option<u32>,
    ledger: &[EliminationRow],
) -> Option<u32> {
    let start = match starting_castaways {
        Some(start) if start > 0 => start,
        _ => return None,
    };
    let eliminated_total: u32 = ledger.iter().map(|row| row.names.len() as u32).sum();
    if eliminated_total > start {
        return None;
    }
    Some(start - eliminated_total)
}

/// Counts eliminated names that read like a medical evacuation or a quit.
/// This is a keyword heuristic over free-text names, not a structured
/// field; false positives and negatives are accepted.
pub fn count_medevac_or_quit(ledger: &[EliminationRow]) -> usize {
    ledger
        .iter()
        .flat_map(|row| row.names.iter())
        .filter(|name| {
            let lowered = name.to_lowercase();
            recap::MEDEVAC_OR_QUIT_KEYWORDS
                .iter()
                .any(|keyword| lowered.contains(keyword))
        })
        .count()
}
