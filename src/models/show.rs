use std::fmt;

use serde::{Deserialize, Serialize};

use super::RawDocument;
use crate::shows::{extract_location, extract_venue, normalize_date};

/// A show date in canonical `YYYY-MM-DD` form.
///
/// Only produced by [`normalize_date`], so ordering the inner string orders
/// the dates.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShowDate(String);

impl ShowDate {
    pub(crate) fn from_parts(year: &str, month: &str, day: &str) -> Self {
        Self(format!("{year}-{month:0>2}-{day:0>2}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn year(&self) -> &str {
        &self.0[..4]
    }
}

impl fmt::Display for ShowDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for ShowDate {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        normalize_date(&raw).ok_or_else(|| format!("undatable show date: {raw:?}"))
    }
}

impl From<ShowDate> for String {
    fn from(date: ShowDate) -> Self {
        date.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Track {
    pub fn has_title(&self) -> bool {
        self.title.as_deref().is_some_and(|t| !t.trim().is_empty())
    }
}

/// One recording of a show, normalized and ready to compete for its date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub date: ShowDate,
    pub venue: String,
    pub location: String,
    pub identifier: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub downloads: u64,
    #[serde(default)]
    pub tracks: Vec<Track>,
    #[serde(default)]
    pub rating: f64,
}

impl CandidateRecord {
    /// Builds a candidate from a search result, or `None` if the document
    /// carries no recognizable date.
    pub fn from_document(doc: RawDocument) -> Option<Self> {
        let date = normalize_date(doc.date.as_deref()?)?;
        let title = doc.title.unwrap_or_default();
        let venue = extract_venue(doc.venue.as_deref(), &title);
        let location = extract_location(doc.coverage.as_deref(), &title);
        let year = doc
            .year
            .filter(|y| !y.trim().is_empty())
            .unwrap_or_else(|| date.year().to_string());

        Some(Self {
            date,
            venue,
            location,
            identifier: doc.identifier,
            title,
            year,
            downloads: doc.downloads,
            tracks: doc.tracks,
            rating: doc.rating,
        })
    }

    pub fn titled_tracks(&self) -> usize {
        self.tracks.iter().filter(|t| t.has_title()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(identifier: &str, date: Option<&str>, title: Option<&str>) -> RawDocument {
        RawDocument {
            identifier: identifier.to_string(),
            date: date.map(str::to_string),
            title: title.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn builds_candidate_from_title_only_document() {
        let record = CandidateRecord::from_document(doc(
            "gd77-05-08.aud.unknown",
            Some("1977-05-08"),
            Some("Grateful Dead Live at Winterland on 1977-05-08"),
        ))
        .unwrap();

        assert_eq!(record.date.as_str(), "1977-05-08");
        assert_eq!(record.venue, "Winterland");
        assert_eq!(record.location, "Unknown Location");
        assert_eq!(record.year, "1977");
        assert_eq!(record.title, "Grateful Dead Live at Winterland on 1977-05-08");
    }

    #[test]
    fn undatable_documents_yield_nothing() {
        assert!(CandidateRecord::from_document(doc("a", None, None)).is_none());
        assert!(CandidateRecord::from_document(doc("b", Some("sometime in spring"), None)).is_none());
    }

    #[test]
    fn show_date_rejects_garbage_when_loaded() {
        let ok: ShowDate = serde_json::from_str("\"1972-08-27\"").unwrap();
        assert_eq!(ok.as_str(), "1972-08-27");
        assert_eq!(serde_json::to_string(&ok).unwrap(), "\"1972-08-27\"");

        assert!(serde_json::from_str::<ShowDate>("\"tbd\"").is_err());
    }

    #[test]
    fn blank_track_titles_do_not_count() {
        let mut record = CandidateRecord::from_document(doc("x", Some("77-05-08"), None)).unwrap();
        record.tracks = vec![
            Track { title: Some("Scarlet Begonias".into()) },
            Track { title: Some("  ".into()) },
            Track { title: None },
        ];
        assert_eq!(record.titled_tracks(), 1);
    }
}
