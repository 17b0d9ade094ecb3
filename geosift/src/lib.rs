//! # Geosift - Feature Query and Classification Engine
//!
//! Geosift is a lightweight, embeddable query engine for geospatial feature
//! collections. It filters features with a SQL-like predicate language and
//! classifies a numeric field into class breaks or groups records by distinct
//! field values, the statistics that drive choropleth and categorized map
//! renderers.
//!
//! ## Key Features
//!
//! - **Predicate Filtering**: `WHERE`-style expressions with comparison,
//!   `LIKE`, `IN`, `IS [NOT] NULL`, and boolean combinators
//! - **Class Breaks**: equal-interval, quantile, natural-breaks (Jenks), and
//!   standard-deviation binning
//! - **Normalization**: per-record transforms (field ratio, log, percent of
//!   total) applied before break computation
//! - **Unique Values**: distinct-combination grouping over one to three
//!   fields with record counts
//! - **Two Options Schemas**: a native options document and a
//!   geoservices-style `classificationDef`, both collapsing into one
//!   canonical configuration
//! - **Pure Queries**: every call is a function of its inputs, safe to run
//!   concurrently over shared feature collections
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use geosift::{attrs, query_json};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let features = vec![
//!     attrs! { "Genus": "MAGNOLIA", "Trunk_Diameter": 13 },
//!     attrs! { "Genus": "PINUS", "Trunk_Diameter": 5 },
//! ];
//!
//! let outcome = query_json(
//!     &features,
//!     serde_json::json!({
//!         "where": "Trunk_Diameter > 0",
//!         "classification": {
//!             "type": "classes",
//!             "field": "Trunk_Diameter",
//!             "method": "equalInterval",
//!             "breakCount": 7
//!         }
//!     }),
//! )?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`classify`] - Break algorithms, value extraction, unique-value grouping
//! - [`common`] - Common types and utilities, including the attribute [Value]
//! - [`errors`] - Error types and result definitions
//! - [`expression`] - Predicate lexer, parser, and evaluator
//! - [`query`] - Options schemas and the query orchestrator

pub mod classify;
pub mod common;
pub mod errors;
pub mod expression;
pub mod query;

mod feature;

pub use common::{atomic, Atomic, Value};
pub use errors::{ErrorKind, GeosiftError, GeosiftResult};
pub use expression::{compile, evaluate, Expr};
pub use feature::Feature;
pub use query::{query, query_json, QueryOptions, QueryOutcome};
