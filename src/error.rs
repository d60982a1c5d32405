use thiserror::Error;

/// Why a single page could not be fetched.
///
/// The pager treats every variant the same way: the page yields no records.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Timeout: {url} took longer than {millis}ms")]
    Timeout { url: String, millis: u128 },
    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Errors that prevent a scrape from starting at all.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Invalid CSS selector: {0}")]
    InvalidSelector(String),
    #[error("HTTP client setup failed: {0}")]
    Client(#[from] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum TableError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Missing column '{0}'")]
    MissingColumn(String),
}
