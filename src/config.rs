use std::path::{Path, PathBuf};
use std::time::Duration;

const SEARCH_URL: &str = "https://archive.org/advancedsearch.php";
const COLLECTION_QUERY: &str = "collection:(GratefulDead) AND mediatype:(etree)";
const SEARCH_FIELDS: &[&str] = &[
    "identifier",
    "date",
    "venue",
    "coverage",
    "title",
    "year",
    "downloads",
    "avg_rating",
    "tracks",
];
const SORT_ORDER: &str = "date asc";
const USER_AGENT: &str = "show-harvester/1.0";

const PAGE_SIZE: u32 = 100;
const BASE_DELAY: Duration = Duration::from_secs(1);
const MAX_DELAY: Duration = Duration::from_secs(60);
const OVERLOAD_COOLDOWN: Duration = Duration::from_secs(30);
const MAX_CONSECUTIVE_ERRORS: u32 = 3;

/// Relative to the package root, not the working directory, so every run
/// updates the same file the frontend build reads.
const DB_PATH: &str = "data/shows.json";

const SOUNDBOARD_MARKER: &str = "sbd";

/// Taper and transfer tokens, most trusted first.
const PREFERRED_SOURCES: &[&str] = &[
    "miller", "hicks", "bertrando", "seamons", "vernon", "menke", "bershaw", "ladner",
];

/// Every tunable of a run. There is no config file; `Config::default()` is
/// what the binary uses.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,

    pub search_url: String,
    pub query: String,
    pub fields: Vec<String>,
    pub sort: String,
    pub page_size: u32,
    pub user_agent: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,

    /// Pause between successful pages, and the starting point for backoff.
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub overload_cooldown: Duration,
    pub max_consecutive_errors: u32,

    pub soundboard_marker: String,
    pub preferred_sources: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: Path::new(env!("CARGO_MANIFEST_DIR")).join(DB_PATH),
            search_url: SEARCH_URL.to_string(),
            query: COLLECTION_QUERY.to_string(),
            fields: SEARCH_FIELDS.iter().map(|f| f.to_string()).collect(),
            sort: SORT_ORDER.to_string(),
            page_size: PAGE_SIZE,
            user_agent: USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            base_delay: BASE_DELAY,
            max_delay: MAX_DELAY,
            overload_cooldown: OVERLOAD_COOLDOWN,
            max_consecutive_errors: MAX_CONSECUTIVE_ERRORS,
            soundboard_marker: SOUNDBOARD_MARKER.to_string(),
            preferred_sources: PREFERRED_SOURCES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Config {
    /// Backoff delay after a failure, doubled from `current` and capped.
    pub fn next_backoff(&self, current: Duration) -> Duration {
        current.saturating_mul(2).min(self.max_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_until_ceiling() {
        let config = Config::default();
        let mut delay = config.base_delay;
        delay = config.next_backoff(delay);
        assert_eq!(delay, Duration::from_secs(2));
        delay = config.next_backoff(delay);
        assert_eq!(delay, Duration::from_secs(4));

        for _ in 0..10 {
            delay = config.next_backoff(delay);
        }
        assert_eq!(delay, config.max_delay);
    }

    #[test]
    fn database_path_is_anchored_to_package_root() {
        let config = Config::default();
        assert!(config.db_path.is_absolute());
        assert!(config.db_path.starts_with(env!("CARGO_MANIFEST_DIR")));
        assert!(config.db_path.ends_with("data/shows.json"));
    }

    #[test]
    fn field_list_requests_selection_inputs() {
        let config = Config::default();
        for field in ["identifier", "date", "downloads", "tracks", "avg_rating"] {
            assert!(config.fields.iter().any(|f| f == field), "missing {field}");
        }
    }
}
