use std::cmp::{Ordering, Reverse};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::config::Config;
use crate::models::{CandidateRecord, ShowDate};

/// What happened when a candidate was offered for its date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    /// First candidate seen for the date.
    NewDate,
    /// Beat the current winner and took its place.
    Replaced,
    /// Lost to (or tied with) the current winner.
    Kept,
}

/// Picks the best recording among candidates that share a date.
///
/// Criteria, highest priority first:
/// 1. soundboard identifier
/// 2. preferred source token, earlier in the list is better
/// 3. downloads
/// 4. track count
/// 5. tracks with a non-empty title
/// 6. rating
///
/// Full ties go to the candidate seen first.
#[derive(Debug, Clone)]
pub struct Selector {
    soundboard_marker: String,
    preferred_sources: Vec<String>,
}

impl Selector {
    pub fn new(soundboard_marker: &str, preferred_sources: &[String]) -> Self {
        Self {
            soundboard_marker: soundboard_marker.to_lowercase(),
            preferred_sources: preferred_sources.iter().map(|s| s.to_lowercase()).collect(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.soundboard_marker, &config.preferred_sources)
    }

    pub fn is_soundboard(&self, identifier: &str) -> bool {
        identifier.to_lowercase().contains(&self.soundboard_marker)
    }

    /// Index of the best preferred source named by a token of `identifier`.
    /// Tokens are the alphanumeric runs, so `gd77-05-08.sbd.hicks.4982`
    /// yields `gd77`, `05`, `08`, `sbd`, `hicks`, `4982`.
    pub fn source_rank(&self, identifier: &str) -> Option<usize> {
        let identifier = identifier.to_lowercase();
        let tokens: Vec<&str> = identifier
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .collect();

        self.preferred_sources
            .iter()
            .position(|source| tokens.contains(&source.as_str()))
    }

    /// `Greater` means `a` is the better recording.
    pub fn compare(&self, a: &CandidateRecord, b: &CandidateRecord) -> Ordering {
        let source_key = |r: &CandidateRecord| self.source_rank(&r.identifier).map(Reverse);

        self.is_soundboard(&a.identifier)
            .cmp(&self.is_soundboard(&b.identifier))
            .then_with(|| source_key(a).cmp(&source_key(b)))
            .then(a.downloads.cmp(&b.downloads))
            .then(a.tracks.len().cmp(&b.tracks.len()))
            .then_with(|| a.titled_tracks().cmp(&b.titled_tracks()))
            .then(a.rating.total_cmp(&b.rating))
    }

    /// Winner of a group of same-date candidates, in the order they were seen.
    pub fn select<I>(&self, candidates: I) -> Option<CandidateRecord>
    where
        I: IntoIterator<Item = CandidateRecord>,
    {
        candidates.into_iter().reduce(|best, candidate| {
            if self.compare(&candidate, &best) == Ordering::Greater {
                candidate
            } else {
                best
            }
        })
    }

    /// Offers `candidate` against whatever currently holds its date.
    pub fn offer(
        &self,
        winners: &mut BTreeMap<ShowDate, CandidateRecord>,
        candidate: CandidateRecord,
    ) -> Offer {
        match winners.entry(candidate.date.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(candidate);
                Offer::NewDate
            }
            Entry::Occupied(mut slot) => {
                if self.compare(&candidate, slot.get()) == Ordering::Greater {
                    tracing::debug!(
                        "{}: {} replaces {}",
                        candidate.date,
                        candidate.identifier,
                        slot.get().identifier
                    );
                    slot.insert(candidate);
                    Offer::Replaced
                } else {
                    Offer::Kept
                }
            }
        }
    }

    /// Groups candidates by date and keeps one winner per date.
    pub fn reduce<I>(&self, candidates: I) -> BTreeMap<ShowDate, CandidateRecord>
    where
        I: IntoIterator<Item = CandidateRecord>,
    {
        let mut groups: BTreeMap<ShowDate, Vec<CandidateRecord>> = BTreeMap::new();
        for candidate in candidates {
            groups.entry(candidate.date.clone()).or_default().push(candidate);
        }

        groups
            .into_iter()
            .filter_map(|(date, group)| self.select(group).map(|winner| (date, winner)))
            .collect()
    }
}
