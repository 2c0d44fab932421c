//! The per-season page: summary lines and the episode table.

use std::fmt::Write;

use crate::data_fetcher::models::{DashboardData, Episode, Season};

use super::cell;

#[derive(Debug, Clone)]
pub struct SeasonDetailView {
    pub season: Season,
    /// Episodes in ascending `episode_in_season` order.
    pub episodes: Vec<Episode>,
}

impl SeasonDetailView {
    /// Returns `None` when the season is not in the feed.
    pub fn build(data: &DashboardData, season_number: u32) -> Option<Self> {
        let season = data.season(season_number)?.clone();
        let episodes = data.episodes_for_season(season_number);
        Some(Self { season, episodes })
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let season = &self.season;

        let _ = writeln!(
            out,
            "Season {}: {}",
            season.season_number,
            season.display_title()
        );
        let run = season
            .airing_dates
            .as_ref()
            .map(|dates| {
                format!(
                    "{} -> {}",
                    dates.start.as_deref().unwrap_or("?"),
                    dates.end.as_deref().unwrap_or("?")
                )
            })
            .unwrap_or_else(|| "?".to_string());
        let _ = writeln!(
            out,
            "Location: {} | Run: {}",
            season.location.as_deref().unwrap_or("?"),
            run
        );
        let _ = writeln!(
            out,
            "Episodes: {} | Days: {} | Castaways: {} | Winner: {}",
            season
                .num_episodes
                .map(|n| n.to_string())
                .unwrap_or_else(|| self.episodes.len().to_string()),
            season
                .num_days
                .map(|n| n.to_string())
                .unwrap_or_else(|| "?".to_string()),
            season
                .num_castaways
                .map(|n| n.to_string())
                .unwrap_or_else(|| "?".to_string()),
            season.winner.as_deref().unwrap_or("?")
        );
        let tribes = if season.tribes.is_empty() {
            "-".to_string()
        } else {
            season.tribes.join(", ")
        };
        let _ = writeln!(out, "Tribes: {tribes}");

        let _ = writeln!(out, "\nEPISODES");
        let _ = writeln!(
            out,
            "  {} {} {} {} {} {}",
            cell("#", 4),
            cell("Title", 36),
            cell("Air Date", 20),
            cell("Overall", 8),
            cell("Type", 12),
            cell("Viewers(M)", 10)
        );
        for episode in &self.episodes {
            let overall = episode
                .overall_episode_number
                .map(|n| n.to_string())
                .unwrap_or_else(|| "-".to_string());
            let viewers = episode
                .us_viewers_millions
                .map(|v| format!("{v:.2}"))
                .unwrap_or_else(|| "-".to_string());
            let _ = writeln!(
                out,
                "  {} {} {} {} {} {}",
                cell(&episode.episode_in_season.to_string(), 4),
                cell(episode.title.as_deref().unwrap_or("-"), 36),
                cell(episode.air_date.as_deref().unwrap_or("-"), 20),
                cell(&overall, 8),
                cell(episode.episode_type.as_deref().unwrap_or("-"), 12),
                cell(&viewers, 10)
            );
        }
        out
    }
}
