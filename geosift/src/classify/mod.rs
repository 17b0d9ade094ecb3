//! Thematic classification: class breaks and unique-value grouping.
//!
//! The classification engine consumes the filtered feature sequence and
//! derives the data used to symbolize it: ranked `[min, max]` class breaks
//! for choropleth rendering, or distinct-value group counts for
//! unique-value rendering. Numeric extraction and normalization live in
//! [extract], the binning algorithms in [breaks], and grouping in [unique].

mod breaks;
mod config;
mod extract;
mod unique;

pub use breaks::classify;
pub use config::{BreakMethod, Classification, Normalization, DEFAULT_BREAK_COUNT, DEFAULT_FIELD_DELIMITER};
pub use extract::extract_values;
pub use unique::{unique_values, UniqueValueGroup};
