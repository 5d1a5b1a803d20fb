//! # Data Transfer Objects
//!
//! Inbound shapes validated before they reach the domain.

pub mod prequal_dto;

pub use prequal_dto::PreQualificationRequest;
