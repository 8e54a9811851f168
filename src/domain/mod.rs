//! Domain layer types and invariants.

pub mod entities;
pub mod error;
pub mod lifecycle;
pub mod matching;
pub mod types;
pub mod validation;
