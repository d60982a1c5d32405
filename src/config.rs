use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://fitnessprogramer.com/exercises/";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const DEFAULT_DELAY_MS: u64 = 1000;

/// Rows per batch in the `process` stage. Has no effect on the output.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Settings for the paginated crawl.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// First listing page; later pages are `page/N/` relative to it.
    pub base_url: String,
    pub user_agent: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Pause between two successful pages.
    pub delay: Duration,
    /// Extra attempts for a page whose fetch failed. Zero stops the crawl on
    /// the first failure.
    pub retries: u32,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
            retries: 0,
        }
    }
}

/// Locations of every table the stages read or write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub exercises: PathBuf,
    pub unique: PathBuf,
    pub repeated: PathBuf,
    pub consolidated: PathBuf,
    pub exercise_list: PathBuf,
    pub filled: PathBuf,
    pub processed: PathBuf,
}

impl DataPaths {
    /// Default file names, all placed under `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            exercises: dir.join("exercises.csv"),
            unique: dir.join("unique_exercises.csv"),
            repeated: dir.join("repeated_exercises.csv"),
            consolidated: dir.join("consolidated_exercises.csv"),
            exercise_list: dir.join("exercise list - Exercises.csv"),
            filled: dir.join("exercise list - Exercises_filled.csv"),
            processed: dir.join("processed_exercises.csv"),
        }
    }
}

impl Default for DataPaths {
    fn default() -> Self {
        Self::in_dir(".")
    }
}
