//! # Infrastructure Layer
//!
//! Adapters to the outside world.
//!
//! ## Partners
//!
//! - [`partners::FinancingPartner`]: capability contract every partner
//!   integration implements
//! - [`partners::PartnerCapabilityRegistry`]: directory of registered partners
//! - [`partners::SimulatedPartner`]: in-process partner for demos and tests

pub mod partners;
