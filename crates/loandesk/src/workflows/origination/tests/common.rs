use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::workflows::origination::catalog::ProductCatalog;
use crate::workflows::origination::domain::{
    CustomerId, CustomerLoanRecord, FeeMode, LoanId, LoanProduct, LoanStatus, PricingRequest,
    ProductType,
};
use crate::workflows::origination::pricing::{PricingConfig, PricingEngine};
use crate::workflows::origination::repository::{
    AlertError, AlertPublisher, BookedLoanRecord, BookingAlert, BookingMetadata, LoanRepository,
    RepositoryError,
};
use crate::workflows::origination::service::{LoanOriginationService, QuoteInputs};

pub(super) fn starter_product() -> LoanProduct {
    LoanProduct {
        id: "prod-starter".to_string(),
        name: "Starter".to_string(),
        min_amount: dec!(1000),
        max_amount: Some(dec!(50000)),
        registration_fee: dec!(200),
    }
}

pub(super) fn growth_product() -> LoanProduct {
    LoanProduct {
        id: "prod-growth".to_string(),
        name: "Growth".to_string(),
        min_amount: dec!(50000.01),
        max_amount: Some(dec!(200000)),
        registration_fee: dec!(350),
    }
}

pub(super) fn enterprise_product() -> LoanProduct {
    LoanProduct {
        id: "prod-enterprise".to_string(),
        name: "Enterprise".to_string(),
        min_amount: dec!(200000.01),
        max_amount: None,
        registration_fee: dec!(500),
    }
}

pub(super) fn starter_four_week() -> ProductType {
    ProductType {
        id: "type-starter-4w".to_string(),
        product_id: "prod-starter".to_string(),
        name: "4 week standard".to_string(),
        duration_weeks: 4,
        interest_rate: dec!(10),
        processing_fee_rate: dec!(2),
        processing_fee_mode: FeeMode::Percentage,
        registration_fee: dec!(200),
        penalty_rate: dec!(5),
    }
}

pub(super) fn starter_eight_week() -> ProductType {
    ProductType {
        id: "type-starter-8w".to_string(),
        product_id: "prod-starter".to_string(),
        name: "8 week extended".to_string(),
        duration_weeks: 8,
        interest_rate: dec!(18),
        processing_fee_rate: dec!(150),
        processing_fee_mode: FeeMode::Flat,
        registration_fee: dec!(200),
        penalty_rate: dec!(5),
    }
}

pub(super) fn growth_twelve_week() -> ProductType {
    ProductType {
        id: "type-growth-12w".to_string(),
        product_id: "prod-growth".to_string(),
        name: "12 week growth".to_string(),
        duration_weeks: 12,
        interest_rate: dec!(22),
        processing_fee_rate: dec!(2.5),
        processing_fee_mode: FeeMode::Percentage,
        registration_fee: dec!(350),
        penalty_rate: dec!(5),
    }
}

/// Catalog fixture; the enterprise product deliberately has no tiers so the
/// no-tier path can be exercised.
pub(super) fn catalog() -> ProductCatalog {
    ProductCatalog::new(
        vec![starter_product(), growth_product(), enterprise_product()],
        vec![starter_four_week(), starter_eight_week(), growth_twelve_week()],
    )
}

pub(super) fn engine() -> PricingEngine {
    PricingEngine::new(catalog(), PricingConfig::default())
}

pub(super) fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 3).expect("valid date")
}

pub(super) fn new_customer_history() -> Vec<CustomerLoanRecord> {
    vec![CustomerLoanRecord {
        status: LoanStatus::Declined,
    }]
}

pub(super) fn repeat_customer_history() -> Vec<CustomerLoanRecord> {
    vec![
        CustomerLoanRecord {
            status: LoanStatus::Repaid,
        },
        CustomerLoanRecord {
            status: LoanStatus::Disbursed,
        },
    ]
}

pub(super) fn request(principal: Decimal) -> PricingRequest {
    PricingRequest {
        principal: Some(principal),
        approved_limit: dec!(100000),
        prior_loans: Vec::new(),
        selected_type_id: None,
        duration_weeks: None,
    }
}

pub(super) fn quote_inputs(principal: Decimal) -> QuoteInputs {
    QuoteInputs {
        principal: Some(principal),
        approved_limit: dec!(100000),
        selected_type_id: None,
        duration_weeks: None,
    }
}

pub(super) fn metadata() -> BookingMetadata {
    BookingMetadata {
        officer_id: "officer-07".to_string(),
        branch_id: "branch-main".to_string(),
        tenant_id: "acme-finance".to_string(),
        booked_at: Utc
            .with_ymd_and_hms(2025, 3, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp"),
    }
}

pub(super) fn build_service() -> (
    LoanOriginationService<MemoryRepository, MemoryAlerts>,
    Arc<MemoryRepository>,
    Arc<MemoryAlerts>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let alerts = Arc::new(MemoryAlerts::default());
    let service = LoanOriginationService::new(
        repository.clone(),
        alerts.clone(),
        catalog(),
        PricingConfig::default(),
    );
    (service, repository, alerts)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<LoanId, BookedLoanRecord>>>,
    pub(super) history: Arc<Mutex<HashMap<CustomerId, Vec<CustomerLoanRecord>>>>,
}

impl MemoryRepository {
    pub(super) fn seed_history(&self, customer: CustomerId, records: Vec<CustomerLoanRecord>) {
        let mut guard = self.history.lock().expect("history mutex poisoned");
        guard.entry(customer).or_default().extend(records);
    }
}

impl LoanRepository for MemoryRepository {
    fn insert(&self, record: BookedLoanRecord) -> Result<BookedLoanRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.loan_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.loan_id.clone(), record.clone());

        let mut history = self.history.lock().expect("history mutex poisoned");
        history
            .entry(record.customer_id.clone())
            .or_default()
            .push(CustomerLoanRecord {
                status: record.status,
            });

        Ok(record)
    }

    fn fetch(&self, id: &LoanId) -> Result<Option<BookedLoanRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn history(&self, customer: &CustomerId) -> Result<Vec<CustomerLoanRecord>, RepositoryError> {
        let guard = self.history.lock().expect("history mutex poisoned");
        Ok(guard.get(customer).cloned().unwrap_or_default())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryAlerts {
    events: Arc<Mutex<Vec<BookingAlert>>>,
}

impl MemoryAlerts {
    pub(super) fn events(&self) -> Vec<BookingAlert> {
        self.events.lock().expect("alert mutex poisoned").clone()
    }
}

impl AlertPublisher for MemoryAlerts {
    fn publish(&self, alert: BookingAlert) -> Result<(), AlertError> {
        self.events
            .lock()
            .expect("alert mutex poisoned")
            .push(alert);
        Ok(())
    }
}

pub(super) struct ConflictRepository;

impl LoanRepository for ConflictRepository {
    fn insert(&self, _record: BookedLoanRecord) -> Result<BookedLoanRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn fetch(&self, _id: &LoanId) -> Result<Option<BookedLoanRecord>, RepositoryError> {
        Ok(None)
    }

    fn history(&self, _customer: &CustomerId) -> Result<Vec<CustomerLoanRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl LoanRepository for UnavailableRepository {
    fn insert(&self, _record: BookedLoanRecord) -> Result<BookedLoanRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &LoanId) -> Result<Option<BookedLoanRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn history(&self, _customer: &CustomerId) -> Result<Vec<CustomerLoanRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}
