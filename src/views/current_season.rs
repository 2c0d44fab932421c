//! The current-season page: header, next-episode card, last-episode
//! recap, tribe status, advantage tracker, and vote-outs to date.

use chrono::NaiveDate;
use std::fmt::Write;

use crate::data_fetcher::models::{DashboardData, Episode, Season};
use crate::data_fetcher::processors::{
    AdvantageFeedRow, DetailStatus, EliminationRow, EpisodeRecap, aired_count,
    build_advantage_feed, build_elimination_ledger, build_recap, count_medevac_or_quit,
    episode_air_date, episodes_remaining, estimate_remaining, last_aired, next_scheduled,
};

use super::{SpoilerGate, display_episode, format_date_short};

/// Everything the current-season page shows, derived once at build time.
#[derive(Debug, Clone)]
pub struct CurrentSeasonView {
    pub season: Season,
    pub aired_count: usize,
    pub episodes_remaining: Option<u32>,
    pub last_aired: Option<Episode>,
    pub next_episode: Option<Episode>,
    pub recap: Option<EpisodeRecap>,
    pub elimination_ledger: Vec<EliminationRow>,
    pub advantage_feed: Vec<AdvantageFeedRow>,
    pub remaining_estimate: Option<u32>,
    pub medevac_or_quit_count: usize,
    /// Whether the optional details file was published at all; drives the
    /// "not yet available" notes.
    pub details_published: bool,
}

impl CurrentSeasonView {
    /// Assembles the page for one season against a reference date.
    /// Returns `None` when the season is not in the feed.
    pub fn build(data: &DashboardData, season_number: u32, today: NaiveDate) -> Option<Self> {
        let season = data.season(season_number)?.clone();
        let episodes = data.episodes_for_season(season_number);
        let details = DetailStatus::from_records(data.details_for_season(season_number));
        let index = details.index();

        let last = last_aired(&episodes, today).cloned();
        let next = next_scheduled(&episodes, today).cloned();
        let aired = aired_count(&episodes, today);

        let ledger = build_elimination_ledger(&episodes, &index);
        let estimate = estimate_remaining(season.num_castaways, &ledger);

        Some(Self {
            aired_count: aired,
            episodes_remaining: episodes_remaining(season.num_episodes, aired),
            recap: build_recap(last.as_ref(), &index),
            advantage_feed: build_advantage_feed(&episodes, &index),
            medevac_or_quit_count: count_medevac_or_quit(&ledger),
            remaining_estimate: estimate,
            elimination_ledger: ledger,
            last_aired: last,
            next_episode: next,
            details_published: details.is_published(),
            season,
        })
    }

    /// Renders the page. Every name-bearing field goes through the gate.
    pub fn render(&self, gate: &SpoilerGate) -> String {
        let mut out = String::new();
        self.render_header(&mut out);
        self.render_next_episode(&mut out);
        self.render_recap(&mut out, gate);
        self.render_tribe_status(&mut out);
        self.render_advantage_tracker(&mut out);
        self.render_vote_outs(&mut out, gate);
        out
    }

    fn render_header(&self, out: &mut String) {
        let season = &self.season;
        let _ = writeln!(
            out,
            "S{}: {}",
            season.season_number,
            season.display_title()
        );
        let _ = writeln!(
            out,
            "Location: {}",
            season.location.as_deref().unwrap_or("-")
        );
        let _ = writeln!(
            out,
            "Theme/Twists: {}",
            season.theme_line().as_deref().unwrap_or("-")
        );
        let _ = writeln!(out, "Episodes so far: {}", self.aired_count);
        if let Some(days) = season.num_days {
            let _ = writeln!(out, "Days (season total): {days}");
        }
    }

    fn render_next_episode(&self, out: &mut String) {
        let _ = writeln!(out, "\nNEXT EPISODE");
        let Some(next) = &self.next_episode else {
            let _ = writeln!(
                out,
                "  No upcoming episode found (season may have ended or dates not posted)."
            );
            return;
        };

        let _ = writeln!(
            out,
            "  Episode: {}. {}",
            next.episode_in_season,
            next.title.as_deref().unwrap_or("TBA")
        );
        if let Some(date) = episode_air_date(next) {
            let _ = writeln!(out, "  Air Date: {}", format_date_short(date));
        }
        match self.episodes_remaining {
            Some(remaining) => {
                let _ = writeln!(out, "  Episodes Remaining: {remaining}");
            }
            None => {
                let _ = writeln!(out, "  Total episode count not known yet.");
            }
        }
    }

    fn render_recap(&self, out: &mut String, gate: &SpoilerGate) {
        let _ = writeln!(out, "\nLAST EPISODE RECAP");
        let Some(recap) = &self.recap else {
            let _ = writeln!(out, "  No completed last-episode record yet.");
            return;
        };

        let _ = writeln!(out, "  {}", display_episode(&recap.episode));
        let _ = writeln!(out, "  Immunity: {}", gate.names(&recap.immunity_winners));
        let _ = writeln!(out, "  Who Left: {}", gate.names(&recap.eliminated));
        let _ = writeln!(
            out,
            "  Notable Advantage Event: {}",
            recap
                .advantage_callouts
                .first()
                .map(String::as_str)
                .unwrap_or("-")
        );
        if !self.details_published {
            let _ = writeln!(
                out,
                "  Episode details aren't available yet. The recap will fill in once they are published."
            );
        }
    }

    fn render_tribe_status(&self, out: &mut String) {
        let _ = writeln!(out, "\nTRIBE STATUS");
        let tribes = if self.season.tribes.is_empty() {
            "-".to_string()
        } else {
            self.season.tribes.join(" / ")
        };
        let _ = writeln!(out, "  Tribes: {tribes}");
        let _ = writeln!(
            out,
            "  Estimated Remaining Players: {}",
            self.remaining_estimate
                .map(|n| n.to_string())
                .unwrap_or_else(|| "-".to_string())
        );
        if self.medevac_or_quit_count > 0 {
            let _ = writeln!(out, "  Med-evacs / Quits: {}", self.medevac_or_quit_count);
        }
    }

    fn render_advantage_tracker(&self, out: &mut String) {
        let _ = writeln!(out, "\nADVANTAGE TRACKER (TO DATE)");
        if !self.details_published {
            let _ = writeln!(
                out,
                "  Advantage events will appear once episode details are available."
            );
            return;
        }
        if self.advantage_feed.is_empty() {
            let _ = writeln!(out, "  No parsed advantage events yet.");
            return;
        }
        for row in &self.advantage_feed {
            let _ = writeln!(
                out,
                "  [{}] Ep {}: {}",
                row.tag, row.episode_in_season, row.text
            );
        }
    }

    fn render_vote_outs(&self, out: &mut String, gate: &SpoilerGate) {
        let _ = writeln!(out, "\nVOTE-OUTS TO DATE");
        if !self.details_published {
            let _ = writeln!(
                out,
                "  Vote-outs will appear once episode details are available."
            );
            return;
        }
        if self.elimination_ledger.is_empty() {
            let _ = writeln!(out, "  No eliminations parsed yet.");
            return;
        }
        for row in &self.elimination_ledger {
            let _ = writeln!(
                out,
                "  Ep {}: {} ({})",
                row.episode_in_season,
                gate.names(&row.names),
                row.title
            );
        }
    }
}
