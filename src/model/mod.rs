//! # Measurement Data Model
//!
//! Types that carry one FRA sweep through the import stages:
//!
//! 1. **[`RawFraData`]**: what a parser pulled out of the file. Parallel
//!    frequency/magnitude (and optional phase) arrays plus free-text metadata.
//!    Not sorted, not de-duplicated, possibly containing NaN.
//!
//! 2. **[`ParseResult`]**: the envelope around a parse attempt, carrying a
//!    [`ParseStatus`], the data (absent when parsing failed), and the
//!    warnings/errors collected on the way.
//!
//! 3. **[`NormalizedFraData`]**: the canonical, analysis-ready dataset with
//!    strictly ascending finite frequencies and a controlled winding label.

mod error;
mod normalized;
mod raw;
mod result;

pub use error::ModelError;
pub use normalized::NormalizedFraData;
pub use raw::RawFraData;
pub use result::{ParseResult, ParseStatus};
