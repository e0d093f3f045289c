//! E-utilities client settings.

use crate::error::{PubmedError, Result};
use std::time::Duration;

/// NCBI ESearch endpoint (identifier lookup)
pub const ESEARCH_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi";

/// NCBI EFetch endpoint (full records)
pub const EFETCH_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/efetch.fcgi";

/// Default number of identifiers requested from ESearch
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Pause after each parsed record, keeps us under the NCBI rate limit
pub const DEFAULT_DELAY_PER_RECORD: Duration = Duration::from_millis(500);

/// Settings for [`crate::pubmed::PubmedClient`]
#[derive(Debug, Clone)]
pub struct EutilsConfig {
    /// ESearch URL
    pub search_url: String,
    /// EFetch URL
    pub fetch_url: String,
    /// `retmax` sent to ESearch
    pub max_results: usize,
    /// Throttle applied after every parsed record
    pub delay_per_record: Duration,
    /// HTTP request timeout
    pub timeout: Duration,
    /// User-Agent header
    pub user_agent: String,
}

impl Default for EutilsConfig {
    fn default() -> Self {
        Self {
            search_url: ESEARCH_URL.to_string(),
            fetch_url: EFETCH_URL.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            delay_per_record: DEFAULT_DELAY_PER_RECORD,
            timeout: Duration::from_secs(30),
            user_agent: format!("rustpubmed/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl EutilsConfig {
    /// Check settings before building a client
    pub fn validate(&self) -> Result<()> {
        if self.search_url.trim().is_empty() {
            return Err(PubmedError::Config("search URL is empty".to_string()));
        }
        if self.fetch_url.trim().is_empty() {
            return Err(PubmedError::Config("fetch URL is empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EutilsConfig::default();
        assert_eq!(config.search_url, ESEARCH_URL);
        assert_eq!(config.fetch_url, EFETCH_URL);
        assert_eq!(config.max_results, 10);
        assert_eq!(config.delay_per_record, Duration::from_millis(500));
        assert!(config.user_agent.starts_with("rustpubmed/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let zero = EutilsConfig {
            max_results: 0,
            ..Default::default()
        };
        assert!(zero.validate().is_ok());

        let no_search = EutilsConfig {
            search_url: String::new(),
            ..Default::default()
        };
        assert!(matches!(no_search.validate(), Err(PubmedError::Config(_))));

        let no_url = EutilsConfig {
            fetch_url: "  ".to_string(),
            ..Default::default()
        };
        assert!(matches!(no_url.validate(), Err(PubmedError::Config(_))));
    }
}
