//! The predicate expression engine.
//!
//! This module compiles a SQL-like predicate string into an abstract syntax
//! tree and evaluates the tree against one feature at a time. The grammar
//! mirrors the `where` clause of a geospatial feature-service REST API:
//!
//! - comparison operators `=`, `<>`, `<`, `<=`, `>`, `>=`
//! - `LIKE` with `%` (zero or more characters) and `_` (exactly one)
//! - `IN (literal, literal, ...)` set membership
//! - `IS NULL` / `IS NOT NULL`
//! - `AND`, `OR`, `NOT` with the usual precedence (OR loosest), and
//!   parentheses to override it
//!
//! Keywords are case-insensitive; field identifiers are case-sensitive and
//! may be bracket-quoted (`[Trunk Diameter]`) to embed whitespace. String
//! literals are single-quoted with `''` escaping an embedded quote.
//!
//! # Examples
//!
//! ```rust,ignore
//! use geosift::expression::{compile, evaluate};
//! use geosift::attrs;
//!
//! let expr = compile("Trunk_Diameter > 3 AND Genus LIKE 'MAG%'")?;
//! let tree = attrs! { "Trunk_Diameter": 13, "Genus": "MAGNOLIA" };
//! assert!(evaluate(&expr, &tree));
//! ```

mod ast;
mod eval;
mod lexer;
mod parser;

pub use ast::{CompareOp, Expr, LikePattern};
pub use eval::evaluate;

use crate::errors::GeosiftResult;

/// Compiles a predicate string into an expression tree.
///
/// The tree is fully resolved at compile time; evaluation never re-parses.
/// `LIKE` patterns are translated to anchored regular expressions here, once
/// per compile rather than once per record.
///
/// # Arguments
///
/// * `predicate` - The predicate string, e.g. `"OBJECTID<11310"`
///
/// # Returns
///
/// The compiled [Expr], or a `SyntaxError` when the predicate is malformed.
pub fn compile(predicate: &str) -> GeosiftResult<Expr> {
    let tokens = lexer::tokenize(predicate)?;
    parser::parse(tokens)
}
