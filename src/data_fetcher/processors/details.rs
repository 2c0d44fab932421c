//! Per-episode detail indexing
//!
//! Detail records arrive as a sparse list per season and are looked up by
//! `episode_in_season`. The index is rebuilt in full on every load.

use std::collections::BTreeMap;
use tracing::debug;

use crate::data_fetcher::models::EpisodeDetail;

/// Detail records of one season keyed by episode number. Records without
/// a numeric `episode_in_season` are dropped silently while building.
#[derive(Debug, Clone, Default)]
pub struct DetailIndex {
    entries: BTreeMap<u32, EpisodeDetail>,
}

impl DetailIndex {
    pub fn build(records: &[EpisodeDetail]) -> Self {
        let mut entries = BTreeMap::new();
        for record in records {
            match record.episode_in_season {
                Some(number) => {
                    entries.insert(number, record.clone());
                }
                None => {
                    debug!("Dropping detail record without an episode number");
                }
            }
        }
        Self { entries }
    }

    pub fn get(&self, episode_in_season: u32) -> Option<&EpisodeDetail> {
        self.entries.get(&episode_in_season)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Whether the details file has been published at all. An empty
/// `Published` index ("file exists, nothing parsed yet") renders
/// differently from `NotYetPublished` ("file not found").
#[derive(Debug, Clone)]
pub enum DetailStatus {
    Published(DetailIndex),
    NotYetPublished,
}

impl DetailStatus {
    /// Builds the status from an optional record list: `None` means the
    /// file itself was unavailable.
    pub fn from_records(records: Option<Vec<EpisodeDetail>>) -> Self {
        match records {
            Some(records) => DetailStatus::Published(DetailIndex::build(&records)),
            None => DetailStatus::NotYetPublished,
        }
    }

    /// The index to derive from. `NotYetPublished` derives over an empty
    /// index so timeline-only fields keep working.
    pub fn index(&self) -> DetailIndex {
        match self {
            DetailStatus::Published(index) => index.clone(),
            DetailStatus::NotYetPublished => DetailIndex::default(),
        }
    }

    pub fn is_published(&self) -> bool {
        matches!(self, DetailStatus::Published(_))
    }
}
