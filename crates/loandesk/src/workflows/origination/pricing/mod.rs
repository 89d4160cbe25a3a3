mod calculator;
mod config;
mod schedule;

pub use config::{PricingConfig, DEFAULT_MINIMUM_PRINCIPAL};
pub use schedule::RepaymentInstallment;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::catalog::ProductCatalog;
use super::domain::{CustomerClass, PricingRequest, ValidationError};
use super::eligibility::{self, AmountCheck};

/// Stateless pricing pass over immutable catalog data.
///
/// Every call re-derives the result from scratch: revalidate, rematch the
/// product, reselect the tier, recompute figures, regenerate the schedule.
/// Same inputs always produce the identical outcome.
pub struct PricingEngine {
    catalog: ProductCatalog,
    config: PricingConfig,
}

impl PricingEngine {
    pub fn new(catalog: ProductCatalog, config: PricingConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    pub fn quote(&self, request: &PricingRequest, start_date: NaiveDate) -> PricingOutcome {
        let customer_class = CustomerClass::from_history(&request.prior_loans);

        let (principal, mut errors) = match eligibility::check_amount(
            request.principal,
            request.approved_limit,
            self.config.minimum_principal,
        ) {
            AmountCheck::NotEntered => return PricingOutcome::NotEntered,
            AmountCheck::Invalid(error) => {
                return PricingOutcome::Rejected {
                    customer_class,
                    errors: vec![error],
                }
            }
            AmountCheck::Entered { principal, errors } => (principal, errors),
        };

        let product = match self.catalog.match_product(principal) {
            Some(product) => product,
            None => {
                errors.push(ValidationError::NoProductMatch);
                return PricingOutcome::Rejected {
                    customer_class,
                    errors,
                };
            }
        };

        let tier = match self.catalog.select_type(
            &product.id,
            request.selected_type_id.as_deref(),
            request.duration_weeks,
        ) {
            Some(tier) => tier,
            None => {
                errors.push(ValidationError::NoPricingTierAvailable {
                    product_id: product.id.clone(),
                });
                return PricingOutcome::Rejected {
                    customer_class,
                    errors,
                };
            }
        };

        if !errors.is_empty() {
            return PricingOutcome::Rejected {
                customer_class,
                errors,
            };
        }

        let figures = calculator::compute_figures(principal, product, tier, customer_class);
        let schedule = schedule::build_schedule(&figures, tier.duration_weeks, start_date);

        PricingOutcome::Priced(LoanQuote {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            type_id: tier.id.clone(),
            type_name: tier.name.clone(),
            customer_class,
            principal,
            processing_fee: figures.processing_fee,
            registration_fee: figures.registration_fee,
            interest_rate: tier.interest_rate,
            total_interest: figures.total_interest,
            total_payable: figures.total_payable,
            weekly_installment: figures.weekly_installment,
            duration_weeks: tier.duration_weeks,
            schedule,
        })
    }
}

/// Result of one full pricing pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PricingOutcome {
    /// No usable amount entered; not an error state.
    NotEntered,
    /// One or more error codes that must block booking.
    Rejected {
        customer_class: CustomerClass,
        errors: Vec<ValidationError>,
    },
    /// Error-free result ready to hand to the booking command.
    Priced(LoanQuote),
}

impl PricingOutcome {
    pub fn errors(&self) -> &[ValidationError] {
        match self {
            PricingOutcome::Rejected { errors, .. } => errors,
            _ => &[],
        }
    }

    pub fn is_bookable(&self) -> bool {
        matches!(self, PricingOutcome::Priced(_))
    }
}

/// Fully priced, bookable quote with its expanded schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanQuote {
    pub product_id: String,
    pub product_name: String,
    pub type_id: String,
    pub type_name: String,
    pub customer_class: CustomerClass,
    pub principal: Decimal,
    pub processing_fee: Decimal,
    pub registration_fee: Decimal,
    pub interest_rate: Decimal,
    pub total_interest: Decimal,
    pub total_payable: Decimal,
    pub weekly_installment: Decimal,
    pub duration_weeks: u32,
    pub schedule: Vec<RepaymentInstallment>,
}
