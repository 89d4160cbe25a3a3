use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use loandesk::workflows::origination::{
    AlertError, AlertPublisher, BookedLoanRecord, BookingAlert, CustomerId, CustomerLoanRecord,
    FeeMode, LoanId, LoanProduct, LoanRepository, ProductCatalog, ProductType, RepositoryError,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryLoanRepository {
    records: Arc<Mutex<HashMap<LoanId, BookedLoanRecord>>>,
    history: Arc<Mutex<HashMap<CustomerId, Vec<CustomerLoanRecord>>>>,
}

impl LoanRepository for InMemoryLoanRepository {
    fn insert(&self, record: BookedLoanRecord) -> Result<BookedLoanRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.loan_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.loan_id.clone(), record.clone());

        // Bookings feed straight back into the customer's history so the
        // next quote classifies them as a repeat customer.
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
pub(crate) struct InMemoryAlertPublisher {
    events: Arc<Mutex<Vec<BookingAlert>>>,
}

impl AlertPublisher for InMemoryAlertPublisher {
    fn publish(&self, alert: BookingAlert) -> Result<(), AlertError> {
        let mut guard = self.events.lock().expect("alert mutex poisoned");
        guard.push(alert);
        Ok(())
    }
}

impl InMemoryAlertPublisher {
    pub(crate) fn events(&self) -> Vec<BookingAlert> {
        self.events.lock().expect("alert mutex poisoned").clone()
    }
}

/// Built-in product grid served when no console export is configured.
pub(crate) fn standard_catalog() -> ProductCatalog {
    let products = vec![
        LoanProduct {
            id: "prod-micro".to_string(),
            name: "Micro".to_string(),
            min_amount: dec!(1000),
            max_amount: Some(dec!(50000)),
            registration_fee: dec!(200),
        },
        LoanProduct {
            id: "prod-growth".to_string(),
            name: "Growth".to_string(),
            min_amount: dec!(50000.01),
            max_amount: Some(dec!(200000)),
            registration_fee: dec!(350),
        },
        LoanProduct {
            id: "prod-enterprise".to_string(),
            name: "Enterprise".to_string(),
            min_amount: dec!(200000.01),
            max_amount: None,
            registration_fee: dec!(500),
        },
    ];

    let types = vec![
        ProductType {
            id: "type-micro-4w".to_string(),
            product_id: "prod-micro".to_string(),
            name: "4 week standard".to_string(),
            duration_weeks: 4,
            interest_rate: dec!(10),
            processing_fee_rate: dec!(2),
            processing_fee_mode: FeeMode::Percentage,
            registration_fee: dec!(200),
            penalty_rate: dec!(5),
        },
        ProductType {
            id: "type-micro-8w".to_string(),
            product_id: "prod-micro".to_string(),
            name: "8 week extended".to_string(),
            duration_weeks: 8,
            interest_rate: dec!(18),
            processing_fee_rate: dec!(2),
            processing_fee_mode: FeeMode::Percentage,
            registration_fee: dec!(200),
            penalty_rate: dec!(5),
        },
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
        },
        ProductType {
            id: "type-enterprise-24w".to_string(),
            product_id: "prod-enterprise".to_string(),
            name: "24 week enterprise".to_string(),
            duration_weeks: 24,
            interest_rate: dec!(30),
            processing_fee_rate: dec!(1000),
            processing_fee_mode: FeeMode::Flat,
            registration_fee: dec!(500),
            penalty_rate: dec!(5),
        },
    ];

    ProductCatalog::new(products, types)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_amount(raw: &str) -> Result<Decimal, String> {
    raw.trim()
        .parse::<Decimal>()
        .map_err(|err| format!("failed to parse '{raw}' as a currency amount ({err})"))
}
