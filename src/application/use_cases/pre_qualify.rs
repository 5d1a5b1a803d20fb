//! # Pre-Qualify Use Case
//!
//! Top-level entry point of the engine.
//!
//! [`PreQualificationOrchestrator::pre_qualify`] runs:
//!
//! 1. Cache lookup by [`CacheKey`]; a fresh hit is returned as is.
//! 2. Credit scoring against the partners offering the requested product.
//! 3. Probability filter (`min_approval_probability`).
//! 4. Concurrent eligibility probes, each with its own timeout. A failed
//!    or timed-out probe keeps the partner with fallback estimates.
//! 5. Match scoring, ranking, truncation to `max_partners`.
//! 6. Risk assessment and suggestions.
//! 7. Cache insert.
//!
//! Concurrent calls with the same key are serialized on a per-key slot, so
//! only the first computes and the rest read its cached result.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::credit_scorer::{CreditScorer, RuleBasedScorer};
use crate::application::services::ranking::{self, Candidate, ProbeOutcome};
use crate::application::services::result_cache::{
    DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL, ResultCache,
};
use crate::application::services::risk_assessor::RiskAssessor;
use crate::application::services::suggestions::SuggestionGenerator;
use crate::domain::entities::{
    BusinessProfile, FinancingApplication, MAX_RECOMMENDED_PARTNERS, PartnerCriteria,
    PartnerListing, PreQualificationResult,
};
use crate::domain::value_objects::{
    Amount, AssessmentId, FinancingProduct, Recommendation, TenantId, UserId,
};
use crate::infrastructure::partners::{
    FinancingPartner, PartnerCapabilityRegistry, PartnerError, RegistryStats,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{Instrument, debug, error, info, info_span, warn};

/// Probability assumed for a partner the scorer did not score.
pub const DEFAULT_APPROVAL_PROBABILITY: u8 = 50;

/// Default probe timeout in milliseconds.
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 5000;

/// Per-call options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreQualifyOptions {
    /// Partners below this probability are dropped, 0-100.
    pub min_approval_probability: u8,
    /// Most partners returned.
    pub max_partners: usize,
}

impl Default for PreQualifyOptions {
    fn default() -> Self {
        Self {
            min_approval_probability: 50,
            max_partners: MAX_RECOMMENDED_PARTNERS,
        }
    }
}

impl PreQualifyOptions {
    /// Sets the probability floor.
    #[must_use]
    pub fn with_min_approval_probability(mut self, min: u8) -> Self {
        self.min_approval_probability = min;
        self
    }

    /// Sets the partner limit.
    #[must_use]
    pub fn with_max_partners(mut self, max: usize) -> Self {
        self.max_partners = max;
        self
    }

    /// Checks ranges.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a probability above 100 or a zero
    /// partner limit.
    pub fn validate(&self) -> ApplicationResult<()> {
        if self.min_approval_probability > 100 {
            return Err(ApplicationError::validation(format!(
                "min_approval_probability must be 0-100, got {}",
                self.min_approval_probability
            )));
        }
        if self.max_partners == 0 {
            return Err(ApplicationError::validation("max_partners must be at least 1"));
        }
        Ok(())
    }
}

/// Orchestrator configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Upper bound for any eligibility probe, in milliseconds.
    pub probe_timeout_ms: u64,
    /// Options used by [`PreQualificationOrchestrator::pre_qualify_default`].
    pub default_options: PreQualifyOptions,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            probe_timeout_ms: DEFAULT_PROBE_TIMEOUT_MS,
            default_options: PreQualifyOptions::default(),
        }
    }
}

impl OrchestratorConfig {
    /// Creates a configuration with the given probe timeout.
    #[must_use]
    pub fn with_timeout(probe_timeout_ms: u64) -> Self {
        Self {
            probe_timeout_ms,
            ..Default::default()
        }
    }

    /// Sets the default options.
    #[must_use]
    pub fn with_default_options(mut self, options: PreQualifyOptions) -> Self {
        self.default_options = options;
        self
    }
}

/// Fingerprint of a pre-qualification request.
///
/// Options are not part of the key: the first computation within the TTL
/// wins for a given applicant, amount, and product.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Tenant.
    pub tenant_id: TenantId,
    /// User.
    pub user_id: UserId,
    /// Requested amount (normalized).
    pub requested_amount: Amount,
    /// Product.
    pub financing_type: FinancingProduct,
}

impl CacheKey {
    /// Fingerprints an application.
    #[must_use]
    pub fn for_application(application: &FinancingApplication) -> Self {
        Self {
            tenant_id: application.tenant_id.clone(),
            user_id: application.user_id.clone(),
            requested_amount: application.request.requested_amount(),
            financing_type: application.request.financing_type(),
        }
    }
}

/// Cache of shared results.
pub type PreQualificationCache = ResultCache<CacheKey, PreQualificationResult>;

/// Matches applications to financing partners.
#[derive(Debug)]
pub struct PreQualificationOrchestrator {
    registry: Arc<PartnerCapabilityRegistry>,
    scorer: Arc<dyn CreditScorer>,
    cache: Arc<PreQualificationCache>,
    risk_assessor: RiskAssessor,
    suggestions: SuggestionGenerator,
    config: OrchestratorConfig,
}

impl PreQualificationOrchestrator {
    /// Creates an orchestrator with all dependencies.
    #[must_use]
    pub fn new(
        registry: Arc<PartnerCapabilityRegistry>,
        scorer: Arc<dyn CreditScorer>,
        cache: Arc<PreQualificationCache>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            registry,
            scorer,
            cache,
            risk_assessor: RiskAssessor::new(),
            suggestions: SuggestionGenerator::new(),
            config,
        }
    }

    /// Creates an orchestrator with the rule-based scorer, a default cache,
    /// and default configuration.
    #[must_use]
    pub fn with_defaults(registry: Arc<PartnerCapabilityRegistry>) -> Self {
        Self::new(
            registry,
            Arc::new(RuleBasedScorer::new()),
            Arc::new(ResultCache::new(DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL)),
            OrchestratorConfig::default(),
        )
    }

    /// Returns the partner registry.
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &Arc<PartnerCapabilityRegistry> {
        &self.registry
    }

    /// Returns the result cache.
    #[inline]
    #[must_use]
    pub fn cache(&self) -> &Arc<PreQualificationCache> {
        &self.cache
    }

    /// Returns the configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// [`pre_qualify`](Self::pre_qualify) with the configured default options.
    ///
    /// # Errors
    ///
    /// See [`pre_qualify`](Self::pre_qualify).
    pub async fn pre_qualify_default(
        &self,
        application: &FinancingApplication,
    ) -> ApplicationResult<Arc<PreQualificationResult>> {
        self.pre_qualify(application, self.config.default_options).await
    }

    /// Pre-qualifies an application.
    ///
    /// Identical applications within the cache TTL return the same
    /// `Arc` without re-scoring or re-probing.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Validation`] for out-of-range options, a
    /// blank tenant or user, or a non-positive amount. Partner failures are
    /// never returned.
    pub async fn pre_qualify(
        &self,
        application: &FinancingApplication,
        options: PreQualifyOptions,
    ) -> ApplicationResult<Arc<PreQualificationResult>> {
        options.validate()?;
        validate_application(application)?;

        let span = info_span!(
            "pre_qualify",
            tenant_id = %application.tenant_id,
            product = %application.request.financing_type(),
        );

        async {
            let key = CacheKey::for_application(application);

            if let Some(hit) = self.cache.get(&key) {
                debug!(assessment_id = %hit.assessment_id, "cache hit");
                return Ok(hit);
            }

            let slot = self.cache.slot(&key);
            let _guard = slot.lock().await;

            // Another caller may have filled the slot while we waited.
            if let Some(hit) = self.cache.get(&key) {
                debug!(assessment_id = %hit.assessment_id, "cache hit after wait");
                return Ok(hit);
            }
            debug!("cache miss");

            let started = Instant::now();
            let result = Arc::new(self.compute(application, options).await);
            let evicted = self.cache.insert(key, Arc::clone(&result));

            info!(
                assessment_id = %result.assessment_id,
                decision = %result.decision,
                partners = result.recommended_partners.len(),
                evicted = evicted.is_some(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "cached pre-qualification result"
            );
            Ok(result)
        }
        .instrument(span)
        .await
    }

    /// Counts partners by type and product.
    pub async fn registry_stats(&self) -> RegistryStats {
        self.registry.get_registry_stats().await
    }

    /// Products offered by at least one partner, sorted.
    pub async fn available_products(&self) -> Vec<FinancingProduct> {
        self.registry.get_available_products().await
    }

    /// Cheapest partner for `product` meeting `criteria`.
    pub async fn find_best_partner(
        &self,
        product: FinancingProduct,
        criteria: &PartnerCriteria,
    ) -> Option<PartnerListing> {
        self.registry
            .find_best_partner(product, criteria)
            .await
            .map(|partner| partner.listing())
    }

    /// Drops the cached result for `application`. Returns true if present.
    pub fn invalidate_cache(&self, application: &FinancingApplication) -> bool {
        self.cache.invalidate(&CacheKey::for_application(application))
    }

    async fn compute(
        &self,
        application: &FinancingApplication,
        options: PreQualifyOptions,
    ) -> PreQualificationResult {
        let profile = &application.profile;
        let request = &application.request;
        let product = request.financing_type();

        let partners = self.registry.get_partners_by_product(product).await;
        let summaries: Vec<_> = partners.iter().map(|p| p.summary()).collect();

        let decision = self.scorer.assess_application(profile, request, &summaries);
        debug!(
            scorer = self.scorer.name(),
            overall_score = decision.overall_score(),
            recommendation = %decision.recommendation(),
            candidates = partners.len(),
            "scored application"
        );

        let eligible: Vec<_> = partners
            .into_iter()
            .filter_map(|partner| {
                let probability = decision
                    .partner_score(partner.partner_id())
                    .unwrap_or(DEFAULT_APPROVAL_PROBABILITY);
                if probability >= options.min_approval_probability {
                    Some((partner, probability))
                } else {
                    debug!(
                        partner_id = %partner.partner_id(),
                        probability,
                        "partner below approval threshold"
                    );
                    None
                }
            })
            .collect();

        let candidates = self.probe_partners(profile, eligible).await;

        let requested = request.requested_amount();
        let recommendations = candidates
            .into_iter()
            .map(|candidate| ranking::build_recommendation(candidate, product, requested))
            .collect();
        let recommended_partners = ranking::rank(recommendations, options.max_partners);

        let final_decision = if recommended_partners.is_empty() {
            Recommendation::Decline
        } else {
            decision.recommendation()
        };

        let risk_assessment = self.risk_assessor.assess(profile, &decision);
        let suggestions = self.suggestions.generate(final_decision, &risk_assessment);

        PreQualificationResult {
            assessment_id: AssessmentId::new_v4(),
            decision: final_decision,
            approval_probability: decision.overall_score(),
            risk_score: decision.risk_score(),
            credit_score: decision.credit_score(),
            recommended_partners,
            partner_scores: decision.partner_scores().clone(),
            factors: decision.factors().to_vec(),
            risk_assessment,
            suggestions,
            assessed_at: Utc::now(),
            source: decision.source(),
            confidence: decision.confidence(),
        }
    }

    /// Probes every partner concurrently and waits for all of them.
    async fn probe_partners(
        &self,
        profile: &BusinessProfile,
        partners: Vec<(Arc<dyn FinancingPartner>, u8)>,
    ) -> Vec<Candidate> {
        let profile = Arc::new(profile.clone());
        let mut handles = Vec::with_capacity(partners.len());

        for (partner, probability) in partners {
            let timeout_ms = self.effective_timeout_ms(partner.as_ref());
            let profile = Arc::clone(&profile);
            let task_partner = Arc::clone(&partner);

            let handle = tokio::spawn(async move {
                let duration = Duration::from_millis(timeout_ms);
                timeout(duration, task_partner.check_eligibility(&profile))
                    .await
                    .unwrap_or(Err(PartnerError::Timeout { timeout_ms }))
            });

            handles.push((partner, probability, handle));
        }

        let mut candidates = Vec::with_capacity(handles.len());
        for (partner, probability, handle) in handles {
            let outcome = match handle.await {
                Ok(Ok(response)) => ProbeOutcome::Answered(response),
                Ok(Err(e)) => {
                    if e.is_probe_failure() {
                        warn!(
                            partner_id = %partner.partner_id(),
                            error = %e,
                            "eligibility probe failed, using fallback estimates"
                        );
                    } else {
                        error!(
                            partner_id = %partner.partner_id(),
                            error = %e,
                            "partner returned an unexpected error, using fallback estimates"
                        );
                    }
                    ProbeOutcome::Failed {
                        reason: e.to_string(),
                    }
                }
                Err(e) => {
                    error!(partner_id = %partner.partner_id(), error = %e, "probe task panicked");
                    ProbeOutcome::Failed {
                        reason: "partner check aborted".to_string(),
                    }
                }
            };

            candidates.push(Candidate {
                partner_id: partner.partner_id().clone(),
                partner_name: partner.partner_name().to_string(),
                approval_probability: probability,
                outcome,
            });
        }

        candidates
    }

    fn effective_timeout_ms(&self, partner: &dyn FinancingPartner) -> u64 {
        if partner.timeout_ms() > 0 {
            partner.timeout_ms().min(self.config.probe_timeout_ms)
        } else {
            self.config.probe_timeout_ms
        }
    }
}

fn validate_application(application: &FinancingApplication) -> ApplicationResult<()> {
    if application.tenant_id.is_blank() {
        return Err(ApplicationError::validation("tenant_id is required"));
    }
    if application.user_id.is_blank() {
        return Err(ApplicationError::validation("user_id is required"));
    }
    if !application.request.requested_amount().is_positive() {
        return Err(ApplicationError::validation("requested_amount must be positive"));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::domain::entities::{CreditDecision, FinancingRequest, PartnerSummary, PartnerTerms};
    use crate::domain::value_objects::{ApprovalTime, PartnerId, PartnerType, ScoreSource};
    use crate::infrastructure::partners::{
        ApplicationStatus, EligibilityResponse, PartnerError, PartnerOffer, PartnerResult,
        SubmissionReceipt, WebhookOutcome, WebhookPayload,
    };
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use FinancingProduct::{InvoiceFinancing, WorkingCapital};

    // ========================================================================
    // Mocks
    // ========================================================================

    #[derive(Debug, Clone)]
    enum Behavior {
        Answer(EligibilityResponse),
        Fail,
        Slow(u64),
        Panic,
    }

    #[derive(Debug)]
    struct MockPartner {
        partner_id: PartnerId,
        partner_type: PartnerType,
        products: Vec<FinancingProduct>,
        behavior: Behavior,
        calls: AtomicUsize,
    }

    impl MockPartner {
        fn new(id: &str, partner_type: PartnerType, behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                partner_id: PartnerId::new(id),
                partner_type,
                products: vec![InvoiceFinancing, WorkingCapital],
                behavior,
                calls: AtomicUsize::new(0),
            })
        }

        fn eligible(id: &str, partner_type: PartnerType, max: u64) -> Arc<Self> {
            Self::new(
                id,
                partner_type,
                Behavior::Answer(
                    EligibilityResponse::eligible()
                        .with_maximum_amount(Amount::from_units(max))
                        .with_estimated_rate(dec!(13))
                        .with_approval_time(ApprovalTime::from_hours(24, 48)),
                ),
            )
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl FinancingPartner for MockPartner {
        fn partner_id(&self) -> &PartnerId {
            &self.partner_id
        }

        fn partner_name(&self) -> &str {
            self.partner_id.as_str()
        }

        fn partner_type(&self) -> PartnerType {
            self.partner_type
        }

        fn supported_products(&self) -> &[FinancingProduct] {
            &self.products
        }

        fn terms(&self) -> PartnerTerms {
            PartnerTerms {
                max_amount: Amount::from_units(10_000_000),
                min_rate: dec!(13),
                typical_approval: ApprovalTime::from_hours(24, 48),
            }
        }

        async fn check_eligibility(
            &self,
            _profile: &BusinessProfile,
        ) -> PartnerResult<EligibilityResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.behavior {
                Behavior::Answer(response) => Ok(response.clone()),
                Behavior::Fail => Err(PartnerError::unavailable("503 from partner")),
                Behavior::Slow(ms) => {
                    tokio::time::sleep(Duration::from_millis(*ms)).await;
                    Ok(EligibilityResponse::eligible())
                }
                Behavior::Panic => panic!("adapter bug"),
            }
        }

        async fn submit_application(
            &self,
            _application: &FinancingApplication,
        ) -> PartnerResult<SubmissionReceipt> {
            unimplemented!()
        }

        async fn get_offers(&self, _reference: &str) -> PartnerResult<Vec<PartnerOffer>> {
            unimplemented!()
        }

        async fn track_status(&self, _reference: &str) -> PartnerResult<ApplicationStatus> {
            unimplemented!()
        }

        async fn handle_webhook(&self, _payload: &WebhookPayload) -> PartnerResult<WebhookOutcome> {
            unimplemented!()
        }
    }

    #[derive(Debug, Default)]
    struct CountingScorer {
        inner: RuleBasedScorer,
        calls: AtomicUsize,
    }

    impl CreditScorer for CountingScorer {
        fn assess_application(
            &self,
            profile: &BusinessProfile,
            request: &FinancingRequest,
            partners: &[PartnerSummary],
        ) -> CreditDecision {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.assess_application(profile, request, partners)
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    struct Harness {
        orchestrator: Arc<PreQualificationOrchestrator>,
        scorer: Arc<CountingScorer>,
    }

    async fn harness(partners: Vec<Arc<MockPartner>>, timeout_ms: u64) -> Harness {
        let registry = Arc::new(PartnerCapabilityRegistry::new());
        for partner in partners {
            registry.register_partner(partner).await.unwrap();
        }
        let scorer = Arc::new(CountingScorer::default());
        let orchestrator = PreQualificationOrchestrator::new(
            registry,
            scorer.clone(),
            Arc::new(ResultCache::default()),
            OrchestratorConfig::with_timeout(timeout_ms),
        );
        Harness {
            orchestrator: Arc::new(orchestrator),
            scorer,
        }
    }

    fn strong_profile() -> BusinessProfile {
        BusinessProfile::builder()
            .years_in_business(4.0)
            .annual_revenue(Amount::from_units(12_000_000))
            .credit_score(730)
            .build()
    }

    fn application(profile: BusinessProfile, amount: u64, product: FinancingProduct) -> FinancingApplication {
        FinancingApplication::new(
            TenantId::new("tenant-1"),
            UserId::new("user-1"),
            profile,
            FinancingRequest::new(Amount::from_units(amount), product).unwrap(),
        )
    }

    fn ids(result: &PreQualificationResult) -> Vec<&str> {
        result
            .recommended_partners
            .iter()
            .map(|p| p.partner_id.as_str())
            .collect()
    }

    // ========================================================================
    // Tests
    // ========================================================================

    mod caching {
        use super::*;

        #[tokio::test]
        async fn identical_request_is_served_from_cache() {
            let partner = MockPartner::eligible("P1", PartnerType::Fintech, 1_000_000);
            let h = harness(vec![partner.clone()], 1000).await;
            let app = application(strong_profile(), 1_000_000, InvoiceFinancing);

            let first = h.orchestrator.pre_qualify(&app, PreQualifyOptions::default()).await.unwrap();
            let second = h.orchestrator.pre_qualify(&app, PreQualifyOptions::default()).await.unwrap();

            assert!(Arc::ptr_eq(&first, &second));
            assert_eq!(h.scorer.calls.load(Ordering::SeqCst), 1);
            assert_eq!(partner.calls(), 1);
        }

        #[tokio::test]
        async fn different_amount_is_a_different_key() {
            let partner = MockPartner::eligible("P1", PartnerType::Fintech, 1_000_000);
            let h = harness(vec![partner.clone()], 1000).await;

            h.orchestrator
                .pre_qualify(&application(strong_profile(), 1_000_000, InvoiceFinancing), PreQualifyOptions::default())
                .await
                .unwrap();
            h.orchestrator
                .pre_qualify(&application(strong_profile(), 900_000, InvoiceFinancing), PreQualifyOptions::default())
                .await
                .unwrap();

            assert_eq!(h.scorer.calls.load(Ordering::SeqCst), 2);
            assert_eq!(h.orchestrator.cache().len(), 2);
        }

        #[tokio::test]
        async fn invalidate_forces_recompute() {
            let partner = MockPartner::eligible("P1", PartnerType::Fintech, 1_000_000);
            let h = harness(vec![partner.clone()], 1000).await;
            let app = application(strong_profile(), 1_000_000, InvoiceFinancing);

            let first = h.orchestrator.pre_qualify_default(&app).await.unwrap();
            assert!(h.orchestrator.invalidate_cache(&app));
            let second = h.orchestrator.pre_qualify_default(&app).await.unwrap();

            assert!(!Arc::ptr_eq(&first, &second));
            assert_ne!(first.assessment_id, second.assessment_id);
            assert_eq!(partner.calls(), 2);
        }

        #[tokio::test]
        async fn concurrent_identical_requests_compute_once() {
            let partner = MockPartner::new("P1", PartnerType::Fintech, Behavior::Slow(50));
            let h = harness(vec![partner.clone()], 1000).await;
            let app = application(strong_profile(), 1_000_000, InvoiceFinancing);

            let (a, b) = tokio::join!(
                h.orchestrator.pre_qualify_default(&app),
                h.orchestrator.pre_qualify_default(&app),
            );

            assert!(Arc::ptr_eq(&a.unwrap(), &b.unwrap()));
            assert_eq!(h.scorer.calls.load(Ordering::SeqCst), 1);
            assert_eq!(partner.calls(), 1);
            assert_eq!(h.orchestrator.cache().inflight(), 0);
        }
    }

    mod probes {
        use super::*;

        #[tokio::test]
        async fn failing_partner_is_kept_with_fallbacks() {
            let good = MockPartner::eligible("A-good", PartnerType::Fintech, 1_000_000);
            let bad = MockPartner::new("B-bad", PartnerType::Fintech, Behavior::Fail);
            let h = harness(vec![good, bad], 1000).await;

            let result = h
                .orchestrator
                .pre_qualify_default(&application(strong_profile(), 1_000_000, InvoiceFinancing))
                .await
                .unwrap();

            assert_eq!(ids(&result), vec!["A-good", "B-bad"]);
            let good = &result.recommended_partners[0];
            assert_eq!(good.estimated_rate, dec!(13));
            assert_eq!(good.rank, 1);

            let bad = &result.recommended_partners[1];
            assert_eq!(bad.estimated_rate, ranking::FALLBACK_RATE);
            assert_eq!(bad.estimated_amount, Amount::from_units(1_000_000));
            assert_eq!(bad.estimated_approval_time, ApprovalTime::fallback());
            assert_eq!(bad.rank, 2);
        }

        #[tokio::test(start_paused = true)]
        async fn slow_partner_times_out_to_fallbacks() {
            let slow = MockPartner::new("slow", PartnerType::Fintech, Behavior::Slow(10_000));
            let h = harness(vec![slow.clone()], 100).await;

            let result = h
                .orchestrator
                .pre_qualify_default(&application(strong_profile(), 1_000_000, InvoiceFinancing))
                .await
                .unwrap();

            assert_eq!(slow.calls(), 1);
            let rec = &result.recommended_partners[0];
            assert_eq!(rec.estimated_rate, ranking::FALLBACK_RATE);
            assert!(rec.considerations.iter().any(|c| c.contains("indicative")));
            assert!(rec.considerations.iter().any(|c| c.contains("timed out")));
        }

        #[tokio::test]
        async fn panicking_probe_is_isolated() {
            let good = MockPartner::eligible("good", PartnerType::Fintech, 1_000_000);
            let broken = MockPartner::new("broken", PartnerType::Fintech, Behavior::Panic);
            let h = harness(vec![good, broken], 1000).await;

            let result = h
                .orchestrator
                .pre_qualify_default(&application(strong_profile(), 1_000_000, InvoiceFinancing))
                .await
                .unwrap();

            assert_eq!(result.recommended_partners.len(), 2);
            assert_eq!(result.recommended_partners[0].partner_id.as_str(), "broken");
            assert_eq!(result.recommended_partners[1].estimated_rate, dec!(13));
        }

        #[tokio::test]
        async fn amount_penalty_reorders_partners() {
            // Same probability; A covers only 40% of the request.
            let a = MockPartner::eligible("A", PartnerType::Fintech, 400_000);
            let b = MockPartner::eligible("B", PartnerType::Fintech, 1_000_000);
            let h = harness(vec![a, b], 1000).await;

            let result = h
                .orchestrator
                .pre_qualify_default(&application(strong_profile(), 1_000_000, InvoiceFinancing))
                .await
                .unwrap();

            assert_eq!(ids(&result), vec!["B", "A"]);
            assert_eq!(result.recommended_partners[0].match_score, 80.0);
            assert_eq!(result.recommended_partners[1].match_score, 50.0);
        }
    }

    mod filtering {
        use super::*;

        #[tokio::test]
        async fn only_partners_for_the_product_are_scored() {
            let mut wc_only = MockPartner::eligible("wc", PartnerType::Fintech, 1_000_000);
            Arc::get_mut(&mut wc_only).unwrap().products = vec![WorkingCapital];
            let both = MockPartner::eligible("both", PartnerType::Fintech, 1_000_000);
            let h = harness(vec![wc_only.clone(), both], 1000).await;

            let result = h
                .orchestrator
                .pre_qualify_default(&application(strong_profile(), 1_000_000, InvoiceFinancing))
                .await
                .unwrap();

            assert_eq!(ids(&result), vec!["both"]);
            assert!(!result.partner_scores.contains_key(&PartnerId::new("wc")));
            assert_eq!(wc_only.calls(), 0);
        }

        #[tokio::test]
        async fn below_threshold_partners_are_dropped_without_probing() {
            // overall 80; conservative +10 = 90, bank 80, fintech 80
            let conservative = MockPartner::eligible("c", PartnerType::ConservativeNbfc, 1_000_000);
            let bank = MockPartner::eligible("b", PartnerType::Bank, 1_000_000);
            let h = harness(vec![conservative, bank.clone()], 1000).await;

            let options = PreQualifyOptions::default().with_min_approval_probability(85);
            let result = h
                .orchestrator
                .pre_qualify(&application(strong_profile(), 1_000_000, InvoiceFinancing), options)
                .await
                .unwrap();

            assert_eq!(ids(&result), vec!["c"]);
            assert_eq!(result.recommended_partners[0].approval_probability, 90);
            assert_eq!(bank.calls(), 0);
        }

        #[tokio::test]
        async fn no_qualifying_partner_forces_decline() {
            let partner = MockPartner::eligible("P1", PartnerType::Fintech, 1_000_000);
            let h = harness(vec![partner], 1000).await;

            let options = PreQualifyOptions::default().with_min_approval_probability(100);
            let result = h
                .orchestrator
                .pre_qualify(&application(strong_profile(), 1_000_000, InvoiceFinancing), options)
                .await
                .unwrap();

            assert!(!result.has_partners());
            assert_eq!(result.decision, Recommendation::Decline);
            assert_eq!(result.approval_probability, 80);
            assert!(!result.suggestions.is_empty());
        }

        #[tokio::test]
        async fn max_partners_truncates() {
            let partners = (0..4)
                .map(|i| MockPartner::eligible(&format!("P{i}"), PartnerType::Fintech, 1_000_000))
                .collect();
            let h = harness(partners, 1000).await;

            let options = PreQualifyOptions::default().with_max_partners(2);
            let result = h
                .orchestrator
                .pre_qualify(&application(strong_profile(), 1_000_000, InvoiceFinancing), options)
                .await
                .unwrap();

            assert_eq!(ids(&result), vec!["P0", "P1"]);
            assert_eq!(result.partner_scores.len(), 4);
        }
    }

    mod result_shape {
        use super::*;

        #[tokio::test]
        async fn result_carries_decision_and_risk() {
            let partner = MockPartner::eligible("P1", PartnerType::Fintech, 1_000_000);
            let h = harness(vec![partner], 1000).await;

            let result = h
                .orchestrator
                .pre_qualify_default(&application(strong_profile(), 1_000_000, InvoiceFinancing))
                .await
                .unwrap();

            assert_eq!(result.decision, Recommendation::Approve);
            assert_eq!(result.approval_probability + result.risk_score, 100);
            assert_eq!(result.credit_score, Some(730));
            assert_eq!(result.source, ScoreSource::RuleBased);
            assert_eq!(result.confidence, 80);
            assert_eq!(result.risk_assessment.factors.len(), 3);
            assert!(result.suggestions.len() <= 5);
            assert!(result.best_partner().unwrap().is_best());
        }
    }

    mod validation {
        use super::*;

        #[tokio::test]
        async fn invalid_options_are_rejected() {
            let h = harness(vec![], 1000).await;
            let app = application(strong_profile(), 1_000_000, InvoiceFinancing);

            let err = h
                .orchestrator
                .pre_qualify(&app, PreQualifyOptions::default().with_max_partners(0))
                .await
                .unwrap_err();
            assert!(err.is_validation());

            let err = h
                .orchestrator
                .pre_qualify(&app, PreQualifyOptions::default().with_min_approval_probability(101))
                .await
                .unwrap_err();
            assert!(err.is_validation());
            assert_eq!(h.scorer.calls.load(Ordering::SeqCst), 0);
        }

        #[tokio::test]
        async fn blank_tenant_is_rejected() {
            let h = harness(vec![], 1000).await;
            let mut app = application(strong_profile(), 1_000_000, InvoiceFinancing);
            app.tenant_id = TenantId::new("  ");

            let err = h.orchestrator.pre_qualify_default(&app).await.unwrap_err();
            assert!(err.to_string().contains("tenant_id"));
        }

        #[tokio::test]
        async fn empty_registry_declines() {
            let h = harness(vec![], 1000).await;
            let result = h
                .orchestrator
                .pre_qualify_default(&application(strong_profile(), 1_000_000, InvoiceFinancing))
                .await
                .unwrap();
            assert!(!result.has_partners());
            assert_eq!(result.decision, Recommendation::Decline);
        }
    }

    mod discovery {
        use super::*;

        #[tokio::test]
        async fn passes_through_to_registry() {
            let partner = MockPartner::eligible("P1", PartnerType::Bank, 1_000_000);
            let h = harness(vec![partner], 1000).await;

            assert_eq!(
                h.orchestrator.available_products().await,
                vec![InvoiceFinancing, WorkingCapital]
            );
            assert_eq!(h.orchestrator.registry_stats().await.total_partners, 1);

            let best = h
                .orchestrator
                .find_best_partner(InvoiceFinancing, &PartnerCriteria::default())
                .await
                .unwrap();
            assert_eq!(best.partner_id, PartnerId::new("P1"));
            assert_eq!(best.partner_type, PartnerType::Bank);
        }
    }
}
