//! Search → fetch → filter → export, in one call.

use crate::config::EutilsConfig;
use crate::error::Result;
use crate::export::save_csv;
use crate::filter::filter_academic;
use crate::pubmed::PubmedClient;
use std::path::{Path, PathBuf};
use tracing::info;

/// Counts reported at the end of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSummary {
    /// CSV written
    pub output: PathBuf,
    /// Identifiers returned by the search stage
    pub total_fetched: usize,
    /// Papers written to the CSV
    pub kept: usize,
}

impl PipelineSummary {
    /// Identifiers minus kept papers.
    ///
    /// Counts identifiers that produced no record together with papers dropped
    /// by the affiliation filter.
    pub fn excluded(&self) -> usize {
        self.total_fetched.saturating_sub(self.kept)
    }
}

/// Run the whole pipeline for `query` and write the kept papers to `output`.
pub async fn run(config: EutilsConfig, query: &str, output: &Path) -> Result<PipelineSummary> {
    let max_results = config.max_results;
    let client = PubmedClient::new(config)?;

    // Stage 1: identifiers
    let ids = client.locate(query, max_results).await?;
    let total_fetched = ids.len();

    // Stage 2: full records
    let papers = client.fetch_details(&ids).await?;

    // Stage 3: affiliation filter
    let kept = filter_academic(papers);

    // Stage 4: export
    save_csv(&kept, output)?;

    let summary = PipelineSummary {
        output: output.to_path_buf(),
        total_fetched,
        kept: kept.len(),
    };
    info!(
        total = summary.total_fetched,
        kept = summary.kept,
        excluded = summary.excluded(),
        "Pipeline complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use std::time::Duration;
    use tempfile::TempDir;

    const ARTICLES: &str = r#"<PubmedArticleSet>
  <PubmedArticle><MedlineCitation><PMID>1</PMID><Article>
    <ArticleTitle>Mixed</ArticleTitle>
    <AuthorList>
      <Author><LastName>A</LastName><AffiliationInfo><Affiliation>Harvard University</Affiliation></AffiliationInfo></Author>
      <Author><LastName>B</LastName><AffiliationInfo><Affiliation>Pfizer Inc</Affiliation></AffiliationInfo></Author>
    </AuthorList>
  </Article></MedlineCitation></PubmedArticle>
  <PubmedArticle><MedlineCitation><PMID>2</PMID><Article>
    <ArticleTitle>Industry only</ArticleTitle>
    <AuthorList>
      <Author><LastName>C</LastName><AffiliationInfo><Affiliation>Google LLC</Affiliation></AffiliationInfo></Author>
    </AuthorList>
  </Article></MedlineCitation></PubmedArticle>
</PubmedArticleSet>"#;

    #[test]
    fn test_excluded_saturates() {
        let summary = PipelineSummary {
            output: PathBuf::from("out.csv"),
            total_fetched: 3,
            kept: 1,
        };
        assert_eq!(summary.excluded(), 2);

        let odd = PipelineSummary { kept: 5, ..summary };
        assert_eq!(odd.excluded(), 0);
    }

    #[tokio::test]
    async fn test_run_end_to_end() -> anyhow::Result<()> {
        let mut server = Server::new_async().await;
        let search = server
            .mock("GET", "/esearch.fcgi")
            .match_query(Matcher::UrlEncoded("term".to_string(), "crispr".to_string()))
            .with_status(200)
            .with_body(r#"{"esearchresult":{"idlist":["1","2","3"]}}"#)
            .expect(1)
            .create_async()
            .await;
        let fetch = server
            .mock("GET", "/efetch.fcgi")
            .match_query(Matcher::UrlEncoded("id".to_string(), "1,2,3".to_string()))
            .with_status(200)
            .with_body(ARTICLES)
            .expect(1)
            .create_async()
            .await;

        let config = EutilsConfig {
            search_url: format!("{}/esearch.fcgi", server.url()),
            fetch_url: format!("{}/efetch.fcgi", server.url()),
            delay_per_record: Duration::ZERO,
            ..Default::default()
        };
        let dir = TempDir::new()?;
        let output = dir.path().join("results.csv");

        let summary = run(config, "crispr", &output).await?;

        assert_eq!(summary.total_fetched, 3);
        assert_eq!(summary.kept, 1);
        // one record never came back, one was filtered
        assert_eq!(summary.excluded(), 2);

        let mut rdr = csv::Reader::from_path(&output)?;
        let rows: Vec<csv::StringRecord> = rdr.records().collect::<std::result::Result<_, _>>()?;
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "1");
        assert_eq!(&rows[0][2], "A, B");
        assert_eq!(&rows[0][5], "Harvard University; Pfizer Inc");

        search.assert_async().await;
        fetch.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_run_no_matches_writes_header() -> anyhow::Result<()> {
        let mut server = Server::new_async().await;
        let _search = server
            .mock("GET", "/esearch.fcgi")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"esearchresult":{"count":"0","idlist":[]}}"#)
            .create_async()
            .await;
        let fetch = server
            .mock("GET", "/efetch.fcgi")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let config = EutilsConfig {
            search_url: format!("{}/esearch.fcgi", server.url()),
            fetch_url: format!("{}/efetch.fcgi", server.url()),
            ..Default::default()
        };
        let dir = TempDir::new()?;
        let output = dir.path().join("none.csv");

        let summary = run(config, "no such topic", &output).await?;

        assert_eq!(summary.total_fetched, 0);
        assert_eq!(summary.kept, 0);
        assert_eq!(std::fs::read_to_string(&output)?.lines().count(), 1);
        fetch.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_run_zero_max_results_forwards_retmax() -> anyhow::Result<()> {
        let mut server = Server::new_async().await;
        let search = server
            .mock("GET", "/esearch.fcgi")
            .match_query(Matcher::UrlEncoded("retmax".to_string(), "0".to_string()))
            .with_status(200)
            .with_body(r#"{"esearchresult":{"count":"42","retmax":"0","idlist":[]}}"#)
            .expect(1)
            .create_async()
            .await;

        let config = EutilsConfig {
            search_url: format!("{}/esearch.fcgi", server.url()),
            fetch_url: format!("{}/efetch.fcgi", server.url()),
            max_results: 0,
            ..Default::default()
        };
        let dir = TempDir::new()?;
        let output = dir.path().join("zero.csv");

        let summary = run(config, "x", &output).await?;

        assert_eq!(summary.total_fetched, 0);
        assert_eq!(summary.kept, 0);
        assert_eq!(
            std::fs::read_to_string(&output)?,
            "PubmedID,Title,Authors,Journal,PublicationDate,Affiliations,Abstract\n"
        );
        search.assert_async().await;
        Ok(())
    }
}
