//! CSV export of filtered papers.

use crate::error::Result;
use crate::paper::Paper;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// CSV column order for exported papers
pub const EXPORT_COLUMNS: &[&str] = &[
    "PubmedID",
    "Title",
    "Authors",
    "Journal",
    "PublicationDate",
    "Affiliations",
    "Abstract",
];

/// One CSV row, borrowed from a [`Paper`]
#[derive(Debug, Serialize)]
struct PaperRow<'a> {
    pubmed_id: &'a str,
    title: &'a str,
    authors: String,
    journal: &'a str,
    publication_date: &'a str,
    affiliations: &'a str,
    abstract_text: &'a str,
}

impl<'a> From<&'a Paper> for PaperRow<'a> {
    fn from(paper: &'a Paper) -> Self {
        Self {
            pubmed_id: paper.pubmed_id.as_deref().unwrap_or_default(),
            title: &paper.title,
            authors: paper.authors_display(),
            journal: &paper.journal,
            publication_date: &paper.publication_date,
            affiliations: &paper.affiliations,
            abstract_text: &paper.abstract_text,
        }
    }
}

/// Write papers to `path`, replacing any existing file.
///
/// The header row is always written, so zero papers yields a header-only file.
/// Missing parent directories are created.
pub fn save_csv(papers: &[Paper], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    wtr.write_record(EXPORT_COLUMNS)?;
    for paper in papers {
        wtr.serialize(PaperRow::from(paper))?;
    }
    wtr.flush()?;

    info!(path = %path.display(), rows = papers.len(), "Saved CSV");
    Ok(())
}
