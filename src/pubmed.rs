//! NCBI E-utilities client for PubMed.
//!
//! Two calls, used in sequence by the pipeline:
//! - [`PubmedClient::locate`] asks ESearch for the identifiers matching a query
//! - [`PubmedClient::fetch_details`] asks EFetch for the full records of those identifiers
//!
//! Failures are never retried: a transport or parse error ends the run.

use crate::config::EutilsConfig;
use crate::error::{PubmedError, Result};
use crate::paper::Paper;
use crate::parser::ArticleSet;
use serde::Deserialize;
use tracing::{debug, info};

/// PubMed client with per-record throttling
pub struct PubmedClient {
    client: reqwest::Client,
    config: EutilsConfig,
}

impl PubmedClient {
    /// Create a new PubmedClient
    pub fn new(config: EutilsConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()
            .map_err(|e| PubmedError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Search PubMed and return up to `max_results` PMIDs, in relevance order.
    ///
    /// Zero matches (or a response without `esearchresult.idlist`) is an empty list.
    pub async fn locate(&self, query: &str, max_results: usize) -> Result<Vec<String>> {
        info!(query = query, max_results = max_results, "Searching PubMed");

        let retmax = max_results.to_string();
        let body = self
            .get(
                &self.config.search_url,
                &[
                    ("db", "pubmed"),
                    ("term", query),
                    ("retmax", retmax.as_str()),
                    ("retmode", "json"),
                ],
            )
            .await?;

        let ids = parse_search_response(&body)?;
        info!(count = ids.len(), "PubMed search complete");
        Ok(ids)
    }

    /// Fetch full records for `ids` in one batched EFetch request.
    ///
    /// Sleeps `delay_per_record` after each parsed record. An empty `ids`
    /// returns immediately without touching the network.
    pub async fn fetch_details(&self, ids: &[String]) -> Result<Vec<Paper>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        info!(count = ids.len(), "Fetching PubMed records");

        let joined = ids.join(",");
        let body = self
            .get(
                &self.config.fetch_url,
                &[("db", "pubmed"), ("id", joined.as_str()), ("retmode", "xml")],
            )
            .await?;

        let set = ArticleSet::parse(&body)?;
        let mut papers = Vec::with_capacity(ids.len());

        for paper in set.papers() {
            papers.push(paper);

            if !self.config.delay_per_record.is_zero() {
                tokio::time::sleep(self.config.delay_per_record).await;
            }
        }

        info!(
            requested = ids.len(),
            parsed = papers.len(),
            "PubMed fetch complete"
        );
        Ok(papers)
    }

    /// GET with query parameters, returning the body of a success response
    async fn get(&self, url: &str, params: &[(&str, &str)]) -> Result<String> {
        debug!(url = url, params = ?params, "E-utilities request");

        let response = self.client.get(url).query(params).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(PubmedError::Api {
                code: status.as_u16(),
                message: format!("E-utilities error: {}", status),
            });
        }

        Ok(response.text().await?)
    }
}

// === ESearch Response Types ===

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    esearchresult: Option<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    idlist: Vec<String>,
}

/// Pull `esearchresult.idlist` out of an ESearch JSON body
fn parse_search_response(json_str: &str) -> Result<Vec<String>> {
    let response: SearchResponse = serde_json::from_str(json_str)
        .map_err(|e| PubmedError::Parse(format!("Failed to parse ESearch response: {}", e)))?;

    Ok(response
        .esearchresult
        .map(|r| r.idlist)
        .unwrap_or_default())
}
