//! # Financing Partners
//!
//! The partner capability contract, the registry that owns registered
//! partners, and a config-driven simulated partner.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │          PartnerCapabilityRegistry           │
//! │   RwLock<HashMap<PartnerId, Arc<dyn ...>>>   │
//! └──────────────────────┬───────────────────────┘
//!                        │ get_partners_by_product
//!          ┌─────────────┼─────────────┐
//!          ▼             ▼             ▼
//!   SimulatedPartner  (bank API)  (NBFC API)
//!          └─────── dyn FinancingPartner ───────┘
//! ```

pub mod error;
pub mod registry;
pub mod simulated;
pub mod traits;

pub use error::{PartnerError, PartnerResult};
pub use registry::{PartnerCapabilityRegistry, PartnerValidation, RegistryStats};
pub use simulated::{SimulatedPartner, SimulatedPartnerConfig};
pub use traits::{
    ApplicationStatus, EligibilityResponse, FinancingPartner, PartnerCapability, PartnerOffer,
    SubmissionReceipt, WebhookOutcome, WebhookPayload,
};
