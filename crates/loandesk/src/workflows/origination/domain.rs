use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for booked loans.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoanId(pub String);

/// Identifier wrapper for the customer whose history drives classification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub String);

/// Amount range and product-level fee for one bookable loan product.
///
/// Ranges are administered externally; the engine only reads them. Across a
/// catalog the ranges must be non-overlapping, which `ProductCatalog::validate`
/// checks at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanProduct {
    pub id: String,
    pub name: String,
    /// Inclusive lower bound of the amount range.
    pub min_amount: Decimal,
    /// Inclusive upper bound; `None` means unbounded above.
    pub max_amount: Option<Decimal>,
    pub registration_fee: Decimal,
}

impl LoanProduct {
    pub fn contains(&self, amount: Decimal) -> bool {
        if amount < self.min_amount {
            return false;
        }
        match self.max_amount {
            Some(max) => amount <= max,
            None => true,
        }
    }
}

/// How a tier's processing fee rate is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeMode {
    /// The rate is a currency amount charged as-is.
    Flat,
    /// The rate is a percentage of the principal.
    Percentage,
}

/// Pricing tier attached to a product's amount range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductType {
    pub id: String,
    pub product_id: String,
    pub name: String,
    pub duration_weeks: u32,
    /// Percent of principal, flat over the whole tenor, not annualized.
    pub interest_rate: Decimal,
    pub processing_fee_rate: Decimal,
    pub processing_fee_mode: FeeMode,
    /// Carried from the catalog contract; pricing reads the product-level fee.
    pub registration_fee: Decimal,
    /// Carried through for downstream collections tooling; unused here.
    pub penalty_rate: Decimal,
}

/// Lifecycle status of a recorded loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    PendingApproval,
    PendingDisbursement,
    Disbursed,
    Repaid,
    Declined,
}

impl LoanStatus {
    pub const fn label(self) -> &'static str {
        match self {
            LoanStatus::PendingApproval => "pending_approval",
            LoanStatus::PendingDisbursement => "pending_disbursement",
            LoanStatus::Disbursed => "disbursed",
            LoanStatus::Repaid => "repaid",
            LoanStatus::Declined => "declined",
        }
    }

    /// Whether a loan in this status counts toward repeat classification.
    pub const fn counts_as_taken(self) -> bool {
        matches!(
            self,
            LoanStatus::Disbursed | LoanStatus::PendingDisbursement
        )
    }
}

/// Prior loan snapshot consumed from the customer-history collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerLoanRecord {
    pub status: LoanStatus,
}

/// New-versus-repeat classification; controls registration-fee eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerClass {
    New,
    Repeat,
}

impl CustomerClass {
    /// `New` iff no prior loan was ever disbursed or is pending disbursement.
    pub fn from_history(prior_loans: &[CustomerLoanRecord]) -> Self {
        if prior_loans.iter().any(|loan| loan.status.counts_as_taken()) {
            CustomerClass::Repeat
        } else {
            CustomerClass::New
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            CustomerClass::New => "new",
            CustomerClass::Repeat => "repeat",
        }
    }
}

/// Inputs for one pricing pass, resolved by the caller before invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRequest {
    /// `None` when the operator has not entered an amount yet.
    pub principal: Option<Decimal>,
    pub approved_limit: Decimal,
    pub prior_loans: Vec<CustomerLoanRecord>,
    /// Explicit tier choice; ignored once stale for the matched product.
    pub selected_type_id: Option<String>,
    /// Duration the operator currently holds, used by tier auto-selection.
    pub duration_weeks: Option<u32>,
}

/// Reasons a pricing pass must block booking. Reported as data on the
/// outcome, never raised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationError {
    #[error("amount is not a valid loan principal")]
    InvalidAmount,
    #[error("amount exceeds the approved limit of {approved_limit}")]
    ExceedsApprovedLimit { approved_limit: Decimal },
    #[error("amount is below the minimum bookable amount of {minimum}")]
    BelowMinimumBookable { minimum: Decimal },
    #[error("no loan product covers the requested amount")]
    NoProductMatch,
    #[error("product {product_id} has no pricing tier configured")]
    NoPricingTierAvailable { product_id: String },
}

impl ValidationError {
    pub const fn code(&self) -> &'static str {
        match self {
            ValidationError::InvalidAmount => "invalid_amount",
            ValidationError::ExceedsApprovedLimit { .. } => "exceeds_approved_limit",
            ValidationError::BelowMinimumBookable { .. } => "below_minimum_bookable",
            ValidationError::NoProductMatch => "no_product_match",
            ValidationError::NoPricingTierAvailable { .. } => "no_pricing_tier_available",
        }
    }
}
