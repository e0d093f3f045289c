//! Literature record produced by the detail fetcher.

use serde::Serialize;

/// One PubMed article as parsed from EFetch XML.
///
/// Built once by [`crate::parser`]; later stages only read it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Paper {
    /// PMID; `None` when the fragment carries no `PMID` element
    pub pubmed_id: Option<String>,
    pub title: String,
    /// Display names, "Given Family"
    pub authors: Vec<String>,
    pub journal: String,
    /// YYYY-MM-DD, trailing empty parts dropped
    pub publication_date: String,
    /// All affiliations joined by "; "
    pub affiliations: String,
    pub abstract_text: String,
}

impl Paper {
    /// Authors joined for display (CSV cell)
    pub fn authors_display(&self) -> String {
        self.authors.join(", ")
    }

    /// PMID or a placeholder for log lines
    pub fn id_for_log(&self) -> &str {
        self.pubmed_id.as_deref().unwrap_or("<no pmid>")
    }
}
