use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::domain::{CustomerId, CustomerLoanRecord, LoanId, LoanStatus};
use super::pricing::LoanQuote;

/// Booking metadata stamped by the caller. Opaque pass-through data: the
/// engine never computes or inspects these fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingMetadata {
    pub officer_id: String,
    pub branch_id: String,
    pub tenant_id: String,
    pub booked_at: DateTime<Utc>,
}

/// Repository record for a booked loan awaiting disbursement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookedLoanRecord {
    pub loan_id: LoanId,
    pub customer_id: CustomerId,
    pub quote: LoanQuote,
    pub start_date: NaiveDate,
    pub status: LoanStatus,
    pub metadata: BookingMetadata,
}

impl BookedLoanRecord {
    pub fn status_view(&self) -> BookedLoanView {
        BookedLoanView {
            loan_id: self.loan_id.clone(),
            customer_id: self.customer_id.clone(),
            status: self.status.label(),
            product_name: self.quote.product_name.clone(),
            type_name: self.quote.type_name.clone(),
            customer_class: self.quote.customer_class.label(),
            principal: self.quote.principal,
            total_payable: self.quote.total_payable,
            weekly_installment: self.quote.weekly_installment,
            duration_weeks: self.quote.duration_weeks,
            first_due_date: self.quote.schedule.first().map(|entry| entry.due_date),
        }
    }
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait LoanRepository: Send + Sync {
    fn insert(&self, record: BookedLoanRecord) -> Result<BookedLoanRecord, RepositoryError>;
    fn fetch(&self, id: &LoanId) -> Result<Option<BookedLoanRecord>, RepositoryError>;
    /// Prior loans for classification, most recent ordering not required.
    fn history(&self, customer: &CustomerId) -> Result<Vec<CustomerLoanRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Trait describing outbound notification hooks (e.g., SMS or e-mail
/// adapters wired up by the host application).
pub trait AlertPublisher: Send + Sync {
    fn publish(&self, alert: BookingAlert) -> Result<(), AlertError>;
}

/// Notification payload emitted when a loan is booked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingAlert {
    pub template: String,
    pub loan_id: LoanId,
    pub details: BTreeMap<String, String>,
}

/// Alert dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error("alert transport unavailable: {0}")]
    Transport(String),
}

/// Sanitized representation of a booked loan for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct BookedLoanView {
    pub loan_id: LoanId,
    pub customer_id: CustomerId,
    pub status: &'static str,
    pub product_name: String,
    pub type_name: String,
    pub customer_class: &'static str,
    pub principal: Decimal,
    pub total_payable: Decimal,
    pub weekly_installment: Decimal,
    pub duration_weeks: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_due_date: Option<NaiveDate>,
}
