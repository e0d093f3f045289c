//! Affiliation filter.
//!
//! Keeps papers where at least one affiliation fragment names an academic
//! institution. Papers whose affiliations are purely non-academic (industry,
//! hospitals without an academic keyword, etc.) and papers without any
//! affiliation text are dropped. Mixed papers are kept.

use crate::paper::Paper;
use tracing::{debug, info};

/// Substrings that mark an affiliation fragment as academic
pub const ACADEMIC_KEYWORDS: &[&str] = &[
    "university",
    "college",
    "institute",
    "school",
    "faculty",
    "department",
];

/// True if any comma-separated fragment of `affiliations` contains an academic keyword.
///
/// Empty text is never academic.
pub fn is_academic(affiliations: &str) -> bool {
    if affiliations.is_empty() {
        return false;
    }

    affiliations
        .to_lowercase()
        .split(',')
        .any(|fragment| ACADEMIC_KEYWORDS.iter().any(|kw| fragment.contains(kw)))
}

/// Keep papers with at least one academic affiliation, preserving input order.
pub fn filter_academic(papers: Vec<Paper>) -> Vec<Paper> {
    let total = papers.len();

    let kept: Vec<Paper> = papers
        .into_iter()
        .filter(|paper| {
            let keep = is_academic(&paper.affiliations);
            if !keep {
                debug!(pmid = paper.id_for_log(), "Excluded: no academic affiliation");
            }
            keep
        })
        .collect();

    info!(total = total, kept = kept.len(), "Affiliation filter complete");
    kept
}
