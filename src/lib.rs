//! # Financing Pre-Qualification Engine
//!
//! Scores an SME applicant, matches it to the financing partners that
//! offer the requested product, and returns a ranked, explainable list of
//! partners with indicative terms.
//!
//! ## Architecture
//!
//! This crate follows Domain-Driven Design with a layered architecture:
//!
//! - **Domain Layer** (`domain`): Profiles, requests, decisions, results, and value objects
//! - **Application Layer** (`application`): Scoring, ranking, caching, and the orchestrator
//! - **Infrastructure Layer** (`infrastructure`): Partner contract, registry, simulated partner
//! - **Configuration** (`config`): TOML file plus `PREQUAL_*` environment overrides
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use financing_prequal::application::PreQualificationOrchestrator;
//! use financing_prequal::domain::entities::{BusinessProfile, FinancingApplication, FinancingRequest};
//! use financing_prequal::domain::value_objects::{Amount, FinancingProduct, TenantId, UserId};
//! use financing_prequal::infrastructure::partners::{
//!     PartnerCapabilityRegistry, SimulatedPartner, SimulatedPartnerConfig,
//! };
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Arc::new(PartnerCapabilityRegistry::new());
//! registry
//!     .register_partner(Arc::new(SimulatedPartner::new(
//!         SimulatedPartnerConfig::new("quickcash", "QuickCash")
//!             .with_products(vec![FinancingProduct::InvoiceFinancing]),
//!     )))
//!     .await?;
//!
//! let orchestrator = PreQualificationOrchestrator::with_defaults(registry);
//! let application = FinancingApplication::new(
//!     TenantId::new("acme"),
//!     UserId::new("u-1"),
//!     BusinessProfile::builder()
//!         .years_in_business(4.0)
//!         .annual_revenue(Amount::from_units(12_000_000))
//!         .credit_score(730)
//!         .build(),
//!     FinancingRequest::new(Amount::from_units(1_000_000), FinancingProduct::InvoiceFinancing)?,
//! );
//!
//! let result = orchestrator.pre_qualify_default(&application).await?;
//! assert_eq!(result.approval_probability, 80);
//! assert_eq!(result.recommended_partners[0].partner_id.as_str(), "quickcash");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
