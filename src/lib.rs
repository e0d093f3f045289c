//! # rustpubmed
//!
//! PubMed 3-Stage Literature Pipeline: search, fetch full records, keep
//! papers with at least one academic affiliation, export to CSV.
//!
//! ## Modules
//!
//! - [`pubmed`] - E-utilities client (ESearch identifiers, EFetch records)
//! - [`parser`] - EFetch XML parsing
//! - [`filter`] - Academic affiliation heuristic
//! - [`export`] - CSV output
//! - [`pipeline`] - The stages wired together
//! - [`config`] - Endpoint and throttle settings
//! - [`error`] - Custom error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use rustpubmed::{config::EutilsConfig, filter, pubmed::PubmedClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = PubmedClient::new(EutilsConfig::default())?;
//!     let ids = client.locate("cancer immunotherapy", 10).await?;
//!     let papers = client.fetch_details(&ids).await?;
//!     let kept = filter::filter_academic(papers);
//!     println!("Kept {} of {} papers", kept.len(), ids.len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod paper;
pub mod parser;
pub mod pipeline;
pub mod pubmed;

pub use error::{PubmedError, Result};
pub use paper::Paper;
