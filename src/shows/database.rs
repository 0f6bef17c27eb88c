use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::selection::{Offer, Selector};
use crate::error::Result;
use crate::models::{CandidateRecord, RawDocument, ShowDate};

const FIRST_PAGE: u32 = 1;

/// The one-winner-per-date show set plus the page a run should resume from.
///
/// Owned by the fetch loop and threaded through each page step by value;
/// the JSON file on disk is the only durable copy.
#[derive(Debug, Clone, PartialEq)]
pub struct ShowDatabase {
    shows: BTreeMap<ShowDate, CandidateRecord>,
    last_processed_page: u32,
}

/// Counts for a single merged page, used for progress logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageReport {
    pub documents: usize,
    pub candidates: usize,
    pub skipped: usize,
    pub new_dates: usize,
    pub replaced: usize,
}

impl PageReport {
    pub fn added(&self) -> usize {
        self.new_dates + self.replaced
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StoredDatabase<'a> {
    shows: Vec<&'a CandidateRecord>,
    last_processed_page: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoadedDatabase {
    #[serde(default)]
    shows: Vec<Value>,
    #[serde(default)]
    last_processed_page: Option<u32>,
}

impl Default for ShowDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl ShowDatabase {
    pub fn new() -> Self {
        Self {
            shows: BTreeMap::new(),
            last_processed_page: FIRST_PAGE,
        }
    }

    pub fn len(&self) -> usize {
        self.shows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shows.is_empty()
    }

    /// Winners in ascending date order.
    pub fn shows(&self) -> impl Iterator<Item = &CandidateRecord> {
        self.shows.values()
    }

    pub fn last_processed_page(&self) -> u32 {
        self.last_processed_page
    }

    pub fn with_last_processed_page(mut self, page: u32) -> Self {
        self.last_processed_page = page.max(FIRST_PAGE);
        self
    }

    /// Normalizes one page of search results and merges it into the set.
    ///
    /// Existing winners compete as the earliest-seen candidate for their
    /// date, so a re-fetched page never displaces them on a tie.
    pub fn merge_page(
        mut self,
        page: u32,
        docs: Vec<Value>,
        selector: &Selector,
    ) -> (Self, PageReport) {
        let mut report = PageReport {
            documents: docs.len(),
            ..Default::default()
        };

        for value in docs {
            let doc: RawDocument = match serde_json::from_value(value) {
                Ok(doc) => doc,
                Err(e) => {
                    tracing::warn!("Skipping malformed document on page {}: {}", page, e);
                    report.skipped += 1;
                    continue;
                }
            };

            let raw_date = doc.date.clone().unwrap_or_default();
            let identifier = doc.identifier.clone();
            let Some(candidate) = CandidateRecord::from_document(doc) else {
                tracing::warn!("Invalid date format: {:?} for {}", raw_date, identifier);
                report.skipped += 1;
                continue;
            };

            report.candidates += 1;
            match selector.offer(&mut self.shows, candidate) {
                Offer::NewDate => report.new_dates += 1,
                Offer::Replaced => report.replaced += 1,
                Offer::Kept => {}
            }
        }

        (self.with_last_processed_page(page), report)
    }

    /// Reads a database file. Returns `Ok(None)` when the file does not exist.
    ///
    /// Records that no longer parse are dropped with a warning, and duplicate
    /// dates collapse through `selector`.
    pub fn load(path: &Path, selector: &Selector) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)?;
        let loaded: LoadedDatabase = serde_json::from_str(&content)?;

        let records = loaded
            .shows
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<CandidateRecord>(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!("Dropping unreadable show from {:?}: {}", path, e);
                    None
                }
            });

        let db = Self {
            shows: selector.reduce(records),
            last_processed_page: FIRST_PAGE,
        };
        Ok(Some(
            db.with_last_processed_page(loaded.last_processed_page.unwrap_or(FIRST_PAGE)),
        ))
    }

    /// Loads the database, or writes an empty one so the file always exists.
    pub fn load_or_create(path: &Path, selector: &Selector) -> Result<Self> {
        match Self::load(path, selector)? {
            Some(db) => Ok(db),
            None => {
                let db = Self::new();
                db.save(path)?;
                Ok(db)
            }
        }
    }

    pub fn to_json(&self) -> Result<String> {
        let stored = StoredDatabase {
            shows: self.shows().collect(),
            last_processed_page: self.last_processed_page,
        };
        Ok(serde_json::to_string_pretty(&stored)?)
    }

    /// Writes the whole database. The file is replaced atomically, so a
    /// crash mid-write leaves the previous checkpoint intact.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, self.to_json()?)?;
        std::fs::rename(&tmp_path, path)?;
        Ok(())
    }
}
