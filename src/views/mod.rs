//! Plain-text page rendering over the derived data
//!
//! Pages are assembled into view structs first and rendered to strings
//! second, so tests can assert on either. Nothing in here derives data;
//! everything comes from `data_fetcher`.

pub mod current_season;
pub mod dashboard;
pub mod season_detail;

use chrono::NaiveDate;

use crate::data_fetcher::models::Episode;
use crate::data_fetcher::processors::episode_air_date;

/// Uniform redaction of name-bearing fields at the render boundary.
/// Every outcome-revealing list (eliminations, immunity winners) goes
/// through the gate; the aggregation layer itself never redacts.
#[derive(Debug, Clone, Copy)]
pub struct SpoilerGate {
    reveal: bool,
}

impl SpoilerGate {
    pub fn new(reveal: bool) -> Self {
        Self { reveal }
    }

    pub fn is_revealed(&self) -> bool {
        self.reveal
    }

    /// Renders a name list: `Hidden` while gated, a placeholder when the
    /// list is empty, the joined names otherwise.
    pub fn names(&self, names: &[String]) -> String {
        if !self.reveal {
            "Hidden".to_string()
        } else if names.is_empty() {
            "-".to_string()
        } else {
            names.join(", ")
        }
    }
}

/// Short US date for display, e.g. `Sep 29, 2021`.
pub fn format_date_short(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// One-line episode label: title plus the short air date when it parses.
pub fn display_episode(episode: &Episode) -> String {
    match episode_air_date(episode) {
        Some(date) => format!(
            "{} ({})",
            episode.display_title(),
            format_date_short(date)
        ),
        None => episode.display_title(),
    }
}

/// Pads or truncates a cell to a fixed column width.
pub(crate) fn cell(value: &str, width: usize) -> String {
    let mut out: String = value.chars().take(width).collect();
    while out.chars().count() < width {
        out.push(' ');
    }
    out
}
