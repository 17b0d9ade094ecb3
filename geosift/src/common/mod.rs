//! Common types and utilities shared across the engine.

mod type_utils;
mod value;

pub use type_utils::{atomic, Atomic};
pub use value::Value;
