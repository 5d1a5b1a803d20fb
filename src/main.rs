//! # Financing Pre-Qualification Engine
//!
//! Demo entry point: loads configuration, registers partners, and
//! pre-qualifies one request.
//!
//! ```text
//! financing-prequal [request.json]
//! ```
//!
//! Without a request file a sample applicant is used.

use anyhow::Context;
use financing_prequal::application::{PreQualificationOrchestrator, PreQualificationRequest};
use financing_prequal::config::{AppConfig, LogConfig, LogFormat};
use financing_prequal::domain::entities::BusinessProfile;
use financing_prequal::domain::value_objects::{Amount, FinancingProduct, PartnerType};
use financing_prequal::infrastructure::partners::{
    PartnerCapabilityRegistry, SimulatedPartner, SimulatedPartnerConfig,
};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("loading configuration")?;
    config.validate().context("validating configuration")?;

    init_tracing(&config.log);

    info!("Starting financing pre-qualification v{}", env!("CARGO_PKG_VERSION"));

    let registry = Arc::new(PartnerCapabilityRegistry::new());
    let partners = if config.partners.is_empty() {
        builtin_partners()
    } else {
        config.partners.clone()
    };
    for partner in partners {
        if !partner.is_enabled() {
            warn!(partner_id = %partner.partner_id(), "partner disabled in configuration");
        }
        registry
            .register_partner(Arc::new(SimulatedPartner::new(partner)))
            .await
            .context("registering partner")?;
    }

    let scorer = config.prequal.scorer.build(None)?;
    let orchestrator = PreQualificationOrchestrator::new(
        registry,
        scorer,
        Arc::new(config.cache.build()),
        config.orchestrator_config(),
    );

    let request = match std::env::args().nth(1) {
        Some(path) => {
            let body = std::fs::read_to_string(&path)
                .with_context(|| format!("reading request file {path}"))?;
            serde_json::from_str(&body).with_context(|| format!("parsing request file {path}"))?
        }
        None => sample_request(),
    };

    let (application, options) = request.into_application()?;
    let options = options.unwrap_or(orchestrator.config().default_options);
    let result = orchestrator.pre_qualify(&application, options).await?;

    println!("{}", serde_json::to_string_pretty(result.as_ref())?);

    info!(
        assessment_id = %result.assessment_id,
        decision = %result.decision,
        partners = result.recommended_partners.len(),
        "pre-qualification complete"
    );

    Ok(())
}

fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(log.include_target)
        .with_writer(std::io::stderr);

    match log.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}

fn builtin_partners() -> Vec<SimulatedPartnerConfig> {
    vec![
        SimulatedPartnerConfig::new("steady-capital", "Steady Capital")
            .with_partner_type(PartnerType::ConservativeNbfc)
            .with_products(vec![
                FinancingProduct::TermLoan,
                FinancingProduct::WorkingCapital,
                FinancingProduct::InvoiceFinancing,
            ])
            .with_min_rate(Decimal::from(12))
            .with_approval_hours(72, 120)
            .with_min_years_in_business(2.0)
            .with_min_credit_score(680),
        SimulatedPartnerConfig::new("quickcash", "QuickCash")
            .with_partner_type(PartnerType::Fintech)
            .with_products(vec![
                FinancingProduct::InvoiceFinancing,
                FinancingProduct::WorkingCapital,
            ])
            .with_min_rate(Decimal::from(15))
            .with_approval_hours(24, 48),
        SimulatedPartnerConfig::new("national-bank", "National Bank")
            .with_partner_type(PartnerType::Bank)
            .with_products(vec![
                FinancingProduct::TermLoan,
                FinancingProduct::CreditLine,
                FinancingProduct::EquipmentFinancing,
                FinancingProduct::InvoiceFinancing,
            ])
            .with_max_amount(Amount::from_units(50_000_000))
            .with_min_rate(Decimal::from(10))
            .with_approval_hours(120, 240)
            .with_min_years_in_business(3.0)
            .with_min_credit_score(700),
    ]
}

fn sample_request() -> PreQualificationRequest {
    PreQualificationRequest::new(
        "demo-tenant",
        "demo-user",
        BusinessProfile::builder()
            .years_in_business(4.0)
            .annual_revenue(Amount::from_units(12_000_000))
            .credit_score(730)
            .business_name("Demo Traders")
            .build(),
        Decimal::from(1_000_000),
        FinancingProduct::InvoiceFinancing,
    )
}
