//! Season timeline derivation: last aired, next scheduled, counts
//!
//! Pure functions over one season's episode list and a reference date.
//! Episodes whose air date is missing or unparseable are excluded from
//! classification entirely.

use chrono::NaiveDate;

use super::air_dates::{AirStatus, classify, parse_air_date};
use crate::data_fetcher::models::Episode;

/// Parsed air date of an episode, if it has one in the accepted format.
pub fn episode_air_date(episode: &Episode) -> Option<NaiveDate> {
    episode.air_date.as_deref().and_then(parse_air_date)
}

fn classified<'a>(
    episodes: &'a [Episode],
    today: NaiveDate,
) -> impl Iterator<Item = (&'a Episode, NaiveDate, AirStatus)> {
    episodes.iter().filter_map(move |episode| {
        episode_air_date(episode).map(|date| (episode, date, classify(date, today)))
    })
}

/// The most recently aired episode, if any has aired.
///
/// Episodes sharing an air date are resolved by the higher
/// `episode_in_season`: the later slot of a double-airing night is the
/// one that aired last. Deterministic regardless of input order.
pub fn last_aired(episodes: &[Episode], today: NaiveDate) -> Option<&Episode> {
    classified(episodes, today)
        .filter(|(_, _, status)| *status == AirStatus::Aired)
        .max_by_key(|(episode, date, _)| (*date, episode.episode_in_season))
        .map(|(episode, _, _)| episode)
}

/// The next scheduled episode, if any is still upcoming. Ties on the air
/// date go to the lower `episode_in_season`, mirroring `last_aired`.
pub fn next_scheduled(episodes: &[Episode], today: NaiveDate) -> Option<&Episode> {
    classified(episodes, today)
        .filter(|(_, _, status)| *status == AirStatus::Upcoming)
        .min_by_key(|(episode, date, _)| (*date, episode.episode_in_season))
        .map(|(episode, _, _)| episode)
}

/// How many episodes have aired on or before the reference date.
pub fn aired_count(episodes: &[Episode], today: NaiveDate) -> usize {
    classified(episodes, today)
        .filter(|(_, _, status)| *status == AirStatus::Aired)
        .count()
}

/// Episodes still to come out of the planned total. Unknown (not zero)
/// when the planned total itself is unknown or zero.
pub fn episodes_remaining(total_planned: Option<u32>, aired: usize) -> Option<u32> {
    match total_planned {
        Some(total) if total > 0 => Some(total.saturating_sub(aired as u32)),
        _ => None,
    }
}
