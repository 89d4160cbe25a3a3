use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::catalog::ProductCatalog;
use super::domain::{CustomerId, LoanId, LoanStatus, PricingRequest, ValidationError};
use super::pricing::{PricingConfig, PricingEngine, PricingOutcome};
use super::repository::{
    AlertError, AlertPublisher, BookedLoanRecord, BookingAlert, BookingMetadata, LoanRepository,
    RepositoryError,
};

/// Service composing the pricing engine, repository, and alert hook.
pub struct LoanOriginationService<R, A> {
    engine: Arc<PricingEngine>,
    repository: Arc<R>,
    alerts: Arc<A>,
}

static LOAN_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_loan_id() -> LoanId {
    let id = LOAN_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    LoanId(format!("loan-{id:06}"))
}

/// Per-request pricing inputs that pair with repository-provided history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteInputs {
    pub principal: Option<Decimal>,
    pub approved_limit: Decimal,
    pub selected_type_id: Option<String>,
    pub duration_weeks: Option<u32>,
}

/// Command handed to `book` once a quote is accepted by the operator.
#[derive(Debug, Clone)]
pub struct BookLoanCommand {
    pub customer_id: CustomerId,
    pub inputs: QuoteInputs,
    pub start_date: NaiveDate,
    pub metadata: BookingMetadata,
}

impl<R, A> LoanOriginationService<R, A>
where
    R: LoanRepository + 'static,
    A: AlertPublisher + 'static,
{
    pub fn new(
        repository: Arc<R>,
        alerts: Arc<A>,
        catalog: ProductCatalog,
        config: PricingConfig,
    ) -> Self {
        Self {
            engine: Arc::new(PricingEngine::new(catalog, config)),
            repository,
            alerts,
        }
    }

    pub fn engine(&self) -> &PricingEngine {
        &self.engine
    }

    /// Price a request against the customer's recorded loan history.
    pub fn quote(
        &self,
        customer_id: &CustomerId,
        inputs: &QuoteInputs,
        start_date: NaiveDate,
    ) -> Result<PricingOutcome, OriginationServiceError> {
        let prior_loans = self.repository.history(customer_id)?;
        let request = PricingRequest {
            principal: inputs.principal,
            approved_limit: inputs.approved_limit,
            prior_loans,
            selected_type_id: inputs.selected_type_id.clone(),
            duration_weeks: inputs.duration_weeks,
        };
        Ok(self.engine.quote(&request, start_date))
    }

    /// Book a loan. The request is re-priced from scratch so the figures
    /// persisted always reflect the latest inputs; anything short of a clean
    /// quote refuses the booking.
    pub fn book(
        &self,
        command: BookLoanCommand,
    ) -> Result<BookedLoanRecord, OriginationServiceError> {
        let quote = match self.quote(&command.customer_id, &command.inputs, command.start_date)? {
            PricingOutcome::Priced(quote) => quote,
            PricingOutcome::Rejected { errors, .. } => {
                return Err(OriginationServiceError::QuoteRejected { errors })
            }
            PricingOutcome::NotEntered => return Err(OriginationServiceError::AmountMissing),
        };

        let record = BookedLoanRecord {
            loan_id: next_loan_id(),
            customer_id: command.customer_id,
            quote,
            start_date: command.start_date,
            status: LoanStatus::PendingDisbursement,
            metadata: command.metadata,
        };

        let stored = self.repository.insert(record)?;

        let mut details = BTreeMap::new();
        details.insert("customer_id".to_string(), stored.customer_id.0.clone());
        details.insert(
            "total_payable".to_string(),
            stored.quote.total_payable.to_string(),
        );
        self.alerts.publish(BookingAlert {
            template: "loan_booked".to_string(),
            loan_id: stored.loan_id.clone(),
            details,
        })?;

        info!(
            loan_id = %stored.loan_id.0,
            customer_id = %stored.customer_id.0,
            "loan booked"
        );

        Ok(stored)
    }

    /// Fetch a booked loan for API responses.
    pub fn get(&self, loan_id: &LoanId) -> Result<BookedLoanRecord, OriginationServiceError> {
        let record = self
            .repository
            .fetch(loan_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }
}

/// Error raised by the origination service.
#[derive(Debug, thiserror::Error)]
pub enum OriginationServiceError {
    #[error("no loan amount entered")]
    AmountMissing,
    #[error("quote rejected: {}", .errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    QuoteRejected { errors: Vec<ValidationError> },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Alert(#[from] AlertError),
}
