//! Tonecheck Data Model
//!
//! Defines the data contracts shared by the analysis pipeline and the CLI:
//! - **Records:** Raw input text tagged with its position in a batch
//! - **Sentiment:** The three-way label (plus the `unavailable` sentinel)
//!   and a non-negative confidence
//! - **Comparison:** Per-row verdicts from several scoring sources, with
//!   CSV export and re-import
//! - **Dataset:** Uploaded CSV tables and text-column extraction
//!
//! Everything here is created per request and discarded after export.

pub mod comparison;
pub mod dataset;
pub mod record;
pub mod sentiment;

pub use comparison::*;
pub use dataset::*;
pub use record::*;
pub use sentiment::*;
