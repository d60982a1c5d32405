use std::time::Duration;

use url::Url;

use crate::config::ScrapeConfig;
use crate::error::{FetchError, ScrapeError};
use crate::extract::{extract_html, PageSelectors};
use crate::fetch::Fetcher;
use crate::record::ExerciseRecord;

/// URL of listing page `page`.
///
/// Page 1 is `base_url` exactly as given. Later pages are `page/N/` joined
/// onto it, which yields the parsed (normalized) form.
pub fn page_url(base_url: &str, page: u32) -> Result<String, url::ParseError> {
    let base = Url::parse(base_url)?;
    if page <= 1 {
        Ok(base_url.to_string())
    } else {
        Ok(base.join(&format!("page/{}/", page))?.into())
    }
}

/// Walks numbered listing pages until one comes back empty.
pub struct Pager<'a, F: ?Sized> {
    fetcher: &'a F,
    selectors: &'a PageSelectors,
    delay: Duration,
    retries: u32,
}

impl<'a, F: Fetcher + ?Sized> Pager<'a, F> {
    pub fn new(fetcher: &'a F, selectors: &'a PageSelectors, config: &ScrapeConfig) -> Self {
        Self {
            fetcher,
            selectors,
            delay: config.delay,
            retries: config.retries,
        }
    }

    /// Scrape pages 1, 2, ... and return all records in page order.
    ///
    /// Stops at the first page that yields no records, whether because the
    /// listing ran out or because the page could not be fetched.
    pub async fn scrape_all(&self, base_url: &str) -> Result<Vec<ExerciseRecord>, ScrapeError> {
        let mut records = Vec::new();
        let mut page_num = 1;

        loop {
            let url = page_url(base_url, page_num)
                .map_err(|e| ScrapeError::InvalidUrl(format!("{} page {}: {}", base_url, page_num, e)))?;
            log::info!("Scraping page {}: {}", page_num, url);

            let page_records = match self.fetch_page(&url).await {
                Ok(html) => extract_html(&html, self.selectors),
                Err(e) => {
                    log::error!("Failed to fetch {}: {}", url, e);
                    Vec::new()
                }
            };

            if page_records.is_empty() {
                log::info!("No more exercises found at page {}. Stopping.", page_num);
                break;
            }

            log::info!("Scraped {} exercises from page {}", page_records.len(), page_num);
            records.extend(page_records);
            page_num += 1;
            self.pause().await;
        }

        Ok(records)
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            log::debug!("Waiting {}ms before next request", self.delay.as_millis());
            tokio::time::sleep(self.delay).await;
        }
    }

    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        let mut attempt = 0;
        loop {
            match self.fetcher.fetch(url).await {
                Ok(html) => return Ok(html),
                Err(e) if attempt < self.retries => {
                    attempt += 1;
                    log::warn!("Retrying {} ({}/{}): {}", url, attempt, self.retries, e);
                    self.pause().await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
