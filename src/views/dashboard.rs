//! The overview page: quick stats across every season plus a season table.

use std::fmt::Write;

use crate::data_fetcher::models::{DashboardData, Season};

use super::cell;

#[derive(Debug, Clone)]
pub struct OverviewView {
    pub total_seasons: usize,
    pub total_episodes: usize,
    pub newest_season: Option<Season>,
    /// Seasons in ascending season-number order for the table.
    pub seasons: Vec<Season>,
}

impl OverviewView {
    pub fn build(data: &DashboardData) -> Self {
        let mut seasons = data.seasons.clone();
        seasons.sort_by_key(|s| s.season_number);
        Self {
            total_seasons: seasons.len(),
            total_episodes: data.total_episodes(),
            newest_season: data.newest_season().cloned(),
            seasons,
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "QUICK STATS");
        let _ = writeln!(out, "  Total seasons: {}", self.total_seasons);
        let _ = writeln!(out, "  Total episodes: {}", self.total_episodes);
        if let Some(newest) = &self.newest_season {
            let _ = writeln!(
                out,
                "  Latest season: {} - {}",
                newest.season_number,
                newest.display_title()
            );
            if let Some(dates) = &newest.airing_dates {
                let _ = writeln!(
                    out,
                    "  Run: {} -> {}",
                    dates.start.as_deref().unwrap_or("?"),
                    dates.end.as_deref().unwrap_or("?")
                );
            }
        }

        let _ = writeln!(out, "\nSEASONS");
        let _ = writeln!(
            out,
            "  {} {} {} {} {} {}",
            cell("#", 4),
            cell("Title", 32),
            cell("Location", 24),
            cell("Winner", 20),
            cell("Eps", 4),
            cell("Viewers(M)", 10)
        );
        for season in &self.seasons {
            let episodes = season
                .num_episodes
                .map(|n| n.to_string())
                .unwrap_or_else(|| "-".to_string());
            let viewers = season
                .viewership_millions
                .map(|v| format!("{v:.1}"))
                .unwrap_or_else(|| "-".to_string());
            let _ = writeln!(
                out,
                "  {} {} {} {} {} {}",
                cell(&season.season_number.to_string(), 4),
                cell(&season.display_title(), 32),
                cell(season.location.as_deref().unwrap_or("-"), 24),
                cell(season.winner.as_deref().unwrap_or("-"), 20),
                cell(&episodes, 4),
                cell(&viewers, 10)
            );
        }
        out
    }
}
