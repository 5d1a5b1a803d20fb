//! # Partner Capability Registry
//!
//! Directory of financing partners and the products they support.
//!
//! The registry is the single source of truth for partner discovery.
//! Partners are registered once (usually at startup) and looked up on
//! every pre-qualification, so the map sits behind a read-write lock.
//!
//! # Registration Rules
//!
//! - A descriptor that fails [`PartnerCapabilityRegistry::validate_partner`]
//!   is refused and never becomes discoverable.
//! - Registering an ID that is already present is a logged no-op; the
//!   existing partner is kept.
//!
//! # Examples
//!
//! ```ignore
//! use financing_prequal::infrastructure::partners::PartnerCapabilityRegistry;
//!
//! let registry = PartnerCapabilityRegistry::new();
//! registry.register_partner(partner).await?;
//!
//! let candidates = registry
//!     .get_partners_by_product(FinancingProduct::InvoiceFinancing)
//!     .await;
//! ```

use crate::domain::entities::{PartnerCriteria, PartnerSummary};
use crate::domain::value_objects::{FinancingProduct, PartnerId, PartnerType};
use crate::infrastructure::partners::error::{PartnerError, PartnerResult};
use crate::infrastructure::partners::traits::{FinancingPartner, PartnerCapability};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Outcome of validating a partner descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerValidation {
    /// True when no errors were found.
    pub valid: bool,
    /// Every problem found.
    pub errors: Vec<String>,
}

/// Registry counts for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStats {
    /// Number of registered partners.
    pub total_partners: usize,
    /// Partners per type.
    pub by_type: BTreeMap<PartnerType, usize>,
    /// Partners supporting each product. A partner counts once per product.
    pub by_product: BTreeMap<FinancingProduct, usize>,
}

/// Registry of financing partners.
#[derive(Debug, Default)]
pub struct PartnerCapabilityRegistry {
    partners: RwLock<HashMap<PartnerId, Arc<dyn FinancingPartner>>>,
}

impl PartnerCapabilityRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks a descriptor for completeness.
    ///
    /// Reports a blank ID or name, an empty product list, and every
    /// required capability the partner does not declare.
    #[must_use]
    pub fn validate_partner(partner: &dyn FinancingPartner) -> PartnerValidation {
        let mut errors = Vec::new();

        if partner.partner_id().is_blank() {
            errors.push("partner_id is required".to_string());
        }
        if partner.partner_name().trim().is_empty() {
            errors.push("partner_name is required".to_string());
        }
        if partner.supported_products().is_empty() {
            errors.push("supported_products must not be empty".to_string());
        }

        let declared = partner.capabilities();
        for capability in PartnerCapability::REQUIRED {
            if !declared.contains(capability) {
                errors.push(format!("missing required capability: {capability}"));
            }
        }

        PartnerValidation {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Registers a partner.
    ///
    /// Returns `Ok(true)` if inserted and `Ok(false)` if a partner with the
    /// same ID was already registered (the existing one is kept).
    ///
    /// # Errors
    ///
    /// Returns [`PartnerError::InvalidDescriptor`] if validation fails.
    pub async fn register_partner(&self, partner: Arc<dyn FinancingPartner>) -> PartnerResult<bool> {
        let validation = Self::validate_partner(partner.as_ref());
        if !validation.valid {
            warn!(
                partner_id = %partner.partner_id(),
                errors = ?validation.errors,
                "refusing invalid partner registration"
            );
            return Err(PartnerError::InvalidDescriptor {
                partner_id: partner.partner_id().clone(),
                errors: validation.errors,
            });
        }

        let partner_id = partner.partner_id().clone();
        let mut partners = self.partners.write().await;
        if partners.contains_key(&partner_id) {
            warn!(partner_id = %partner_id, "partner already registered, ignoring");
            return Ok(false);
        }

        info!(
            partner_id = %partner_id,
            partner_type = %partner.partner_type(),
            products = partner.supported_products().len(),
            "registered financing partner"
        );
        partners.insert(partner_id, partner);
        Ok(true)
    }

    /// Removes a partner. Returns true if it was registered.
    pub async fn unregister_partner(&self, partner_id: &PartnerId) -> bool {
        let removed = self.partners.write().await.remove(partner_id).is_some();
        if removed {
            info!(partner_id = %partner_id, "unregistered financing partner");
        }
        removed
    }

    /// Gets a partner by ID.
    ///
    /// # Errors
    ///
    /// Returns [`PartnerError::NotFound`] listing the registered IDs.
    pub async fn get_partner(&self, partner_id: &PartnerId) -> PartnerResult<Arc<dyn FinancingPartner>> {
        let partners = self.partners.read().await;
        partners
            .get(partner_id)
            .map(Arc::clone)
            .ok_or_else(|| PartnerError::NotFound {
                partner_id: partner_id.clone(),
                available: sorted_ids(&partners),
            })
    }

    /// Gets a partner by ID, or `None`.
    pub async fn find_partner(&self, partner_id: &PartnerId) -> Option<Arc<dyn FinancingPartner>> {
        self.partners.read().await.get(partner_id).map(Arc::clone)
    }

    /// Partners supporting `product`, ordered by partner ID.
    pub async fn get_partners_by_product(
        &self,
        product: FinancingProduct,
    ) -> Vec<Arc<dyn FinancingPartner>> {
        self.select(|p| p.supports_product(product)).await
    }

    /// Partners supporting every product in `products`, ordered by ID.
    ///
    /// An empty list matches every partner.
    pub async fn get_partners_by_products(
        &self,
        products: &[FinancingProduct],
    ) -> Vec<Arc<dyn FinancingPartner>> {
        self.select(|p| products.iter().all(|product| p.supports_product(*product)))
            .await
    }

    /// Partners supporting at least one product in `products`, ordered by ID.
    ///
    /// An empty list matches nothing.
    pub async fn get_partners_by_any_product(
        &self,
        products: &[FinancingProduct],
    ) -> Vec<Arc<dyn FinancingPartner>> {
        self.select(|p| products.iter().any(|product| p.supports_product(*product)))
            .await
    }

    /// All partners, ordered by ID.
    pub async fn get_all(&self) -> Vec<Arc<dyn FinancingPartner>> {
        self.select(|_| true).await
    }

    /// Identity and type of every partner, ordered by ID.
    pub async fn summaries(&self) -> Vec<PartnerSummary> {
        self.get_all()
            .await
            .iter()
            .map(|partner| partner.summary())
            .collect()
    }

    /// Counts by type and by supported product.
    pub async fn get_registry_stats(&self) -> RegistryStats {
        let partners = self.partners.read().await;
        let mut stats = RegistryStats {
            total_partners: partners.len(),
            ..RegistryStats::default()
        };

        for partner in partners.values() {
            *stats.by_type.entry(partner.partner_type()).or_default() += 1;
            let products: BTreeSet<_> = partner.supported_products().iter().copied().collect();
            for product in products {
                *stats.by_product.entry(product).or_default() += 1;
            }
        }

        stats
    }

    /// Every product offered by at least one partner, sorted.
    pub async fn get_available_products(&self) -> Vec<FinancingProduct> {
        let partners = self.partners.read().await;
        let products: BTreeSet<_> = partners
            .values()
            .flat_map(|p| p.supported_products().iter().copied())
            .collect();
        products.into_iter().collect()
    }

    /// Picks the cheapest partner for `product` that meets `criteria`.
    ///
    /// Candidates are compared by advertised minimum rate, ties broken by
    /// partner ID.
    pub async fn find_best_partner(
        &self,
        product: FinancingProduct,
        criteria: &PartnerCriteria,
    ) -> Option<Arc<dyn FinancingPartner>> {
        self.get_partners_by_product(product)
            .await
            .into_iter()
            .map(|partner| {
                let terms = partner.terms();
                (partner, terms)
            })
            .filter(|(partner, terms)| criteria.accepts(partner.partner_type(), terms))
            .min_by(|(a, a_terms), (b, b_terms)| {
                a_terms
                    .min_rate
                    .cmp(&b_terms.min_rate)
                    .then_with(|| a.partner_id().cmp(b.partner_id()))
            })
            .map(|(partner, _)| partner)
    }

    /// Number of registered partners.
    pub async fn len(&self) -> usize {
        self.partners.read().await.len()
    }

    /// Returns true if no partners are registered.
    pub async fn is_empty(&self) -> bool {
        self.partners.read().await.is_empty()
    }

    /// Registered IDs, sorted.
    pub async fn partner_ids(&self) -> Vec<String> {
        sorted_ids(&*self.partners.read().await)
    }

    async fn select<F>(&self, predicate: F) -> Vec<Arc<dyn FinancingPartner>>
    where
        F: Fn(&dyn FinancingPartner) -> bool,
    {
        let partners = self.partners.read().await;
        let mut selected: Vec<_> = partners
            .values()
            .filter(|p| predicate(p.as_ref()))
            .map(Arc::clone)
            .collect();
        selected.sort_by(|a, b| a.partner_id().cmp(b.partner_id()));
        selected
    }
}

fn sorted_ids(partners: &HashMap<PartnerId, Arc<dyn FinancingPartner>>) -> Vec<String> {
    let mut ids: Vec<String> = partners.keys().map(|id| id.as_str().to_string()).collect();
    ids.sort();
    ids
}
