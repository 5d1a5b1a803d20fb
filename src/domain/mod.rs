//! # Domain Layer
//!
//! Core business types for financing pre-qualification.
//!
//! This layer contains:
//! - **Entities**: Applications, credit decisions, risk assessments, and results
//! - **Value Objects**: Immutable types with validation (amounts, identifiers, enums)
//! - **Errors**: Domain-specific error types
//!
//! Nothing here performs I/O; scoring and orchestration live in the
//! application layer.

pub mod entities;
pub mod errors;
pub mod value_objects;
