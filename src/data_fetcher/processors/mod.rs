pub mod air_dates;
pub mod details;
pub mod recap;
pub mod timeline;

pub use air_dates::{AirStatus, classify, parse_air_date};
pub use details::{DetailIndex, DetailStatus};
pub use recap::{
    AdvantageFeedRow, EliminationRow, EpisodeRecap, build_advantage_feed,
    build_elimination_ledger, build_recap, count_medevac_or_quit, estimate_remaining,
};
pub use timeline::{
    aired_count, episode_air_date, episodes_remaining, last_aired, next_scheduled,
};
