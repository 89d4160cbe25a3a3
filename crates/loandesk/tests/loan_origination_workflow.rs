//! Integration specifications for the loan quoting and booking workflow.
//!
//! Scenarios drive the public service facade and HTTP router end to end so
//! pricing, schedule generation, and booking can be validated without
//! reaching into private modules.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use rust_decimal_macros::dec;

    use loandesk::workflows::origination::{
        AlertError, AlertPublisher, BookedLoanRecord, BookingAlert, CustomerId,
        CustomerLoanRecord, FeeMode, LoanId, LoanOriginationService, LoanProduct, LoanRepository,
        PricingConfig, ProductCatalog, ProductType, RepositoryError,
    };

    pub(super) fn catalog() -> ProductCatalog {
        let products = vec![
            LoanProduct {
                id: "prod-starter".to_string(),
                name: "Starter".to_string(),
                min_amount: dec!(1000),
                max_amount: Some(dec!(50000)),
                registration_fee: dec!(200),
            },
            LoanProduct {
                id: "prod-growth".to_string(),
                name: "Growth".to_string(),
                min_amount: dec!(50000.01),
                max_amount: None,
                registration_fee: dec!(350),
            },
        ];
        let types = vec![
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
        ];
        ProductCatalog::new(products, types)
    }

    pub(super) fn build_service() -> LoanOriginationService<MemoryRepository, MemoryAlerts> {
        LoanOriginationService::new(
            Arc::new(MemoryRepository::default()),
            Arc::new(MemoryAlerts::default()),
            catalog(),
            PricingConfig::default(),
        )
    }

    #[derive(Default, Clone)]
    pub(super) struct MemoryRepository {
        records: Arc<Mutex<HashMap<LoanId, BookedLoanRecord>>>,
        history: Arc<Mutex<HashMap<CustomerId, Vec<CustomerLoanRecord>>>>,
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

        fn history(
            &self,
            customer: &CustomerId,
        ) -> Result<Vec<CustomerLoanRecord>, RepositoryError> {
            let guard = self.history.lock().expect("history mutex poisoned");
            Ok(guard.get(customer).cloned().unwrap_or_default())
        }
    }

    #[derive(Default, Clone)]
    pub(super) struct MemoryAlerts {
        events: Arc<Mutex<Vec<BookingAlert>>>,
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
}

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tower::ServiceExt;

use loandesk::workflows::origination::origination_router;

fn router() -> Router {
    origination_router(Arc::new(common::build_service()))
}

fn post_json(uri: &str, payload: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request builds")
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json payload")
}

fn amount(value: &Value) -> Decimal {
    value
        .as_str()
        .expect("amount serialized as string")
        .parse()
        .expect("amount parses")
}

fn quote_payload(principal: &str) -> Value {
    json!({
        "customer_id": "cust-900",
        "principal": principal,
        "approved_limit": "100000",
        "start_date": "2025-03-03",
    })
}

fn book_payload(principal: &str) -> Value {
    json!({
        "customer_id": "cust-900",
        "principal": principal,
        "approved_limit": "100000",
        "start_date": "2025-03-03",
        "officer_id": "officer-07",
        "branch_id": "branch-main",
        "tenant_id": "acme-finance",
    })
}

#[tokio::test]
async fn quote_then_book_then_requote_as_repeat() {
    let app = router();

    // A fresh customer prices as new, registration fee included.
    let response = app
        .clone()
        .oneshot(post_json("/api/v1/loans/quote", quote_payload("10000")))
        .await
        .expect("quote request");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["status"], "priced");
    assert_eq!(body["customer_class"], "new");
    let quote = &body["quote"];
    assert_eq!(amount(&quote["total_interest"]), dec!(1000));
    assert_eq!(amount(&quote["processing_fee"]), dec!(200));
    assert_eq!(amount(&quote["registration_fee"]), dec!(200));
    assert_eq!(amount(&quote["total_payable"]), dec!(11000));
    assert_eq!(amount(&quote["weekly_installment"]), dec!(2750));
    assert_eq!(quote["schedule"].as_array().expect("schedule").len(), 4);
    assert_eq!(quote["schedule"][0]["due_date"], "2025-03-10");

    // Booking persists the same figures and returns the stored view.
    let response = app
        .clone()
        .oneshot(post_json("/api/v1/loans", book_payload("10000")))
        .await
        .expect("book request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    assert_eq!(body["status"], "pending_disbursement");
    let loan_id = body["loan_id"].as_str().expect("loan id").to_string();
    assert_eq!(amount(&body["weekly_installment"]), dec!(2750));

    // The booked loan is readable through the status endpoint.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/loans/{loan_id}"))
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("status request");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["loan_id"], loan_id.as_str());
    assert_eq!(body["first_due_date"], "2025-03-10");

    // The pending disbursement now classifies the customer as repeat: the
    // registration fee disappears while the amortized figures stay put.
    let response = app
        .clone()
        .oneshot(post_json("/api/v1/loans/quote", quote_payload("10000")))
        .await
        .expect("requote request");
    let body = read_json(response).await;
    assert_eq!(body["customer_class"], "repeat");
    let quote = &body["quote"];
    assert_eq!(amount(&quote["registration_fee"]), dec!(0));
    assert_eq!(amount(&quote["total_payable"]), dec!(11000));
    assert_eq!(amount(&quote["weekly_installment"]), dec!(2750));
}

#[tokio::test]
async fn schedule_reconciles_through_the_http_surface() {
    let app = router();

    let response = app
        .oneshot(post_json("/api/v1/loans/quote", quote_payload("1234.56")))
        .await
        .expect("quote request");
    let body = read_json(response).await;
    let quote = &body["quote"];

    let total_payable = amount(&quote["total_payable"]);
    let schedule = quote["schedule"].as_array().expect("schedule");
    let total: Decimal = schedule
        .iter()
        .map(|entry| amount(&entry["total_due"]))
        .sum();
    assert_eq!(total, total_payable);
}

#[tokio::test]
async fn overlimit_amounts_cannot_be_booked() {
    let app = router();

    let response = app
        .oneshot(post_json("/api/v1/loans", book_payload("100000.01")))
        .await
        .expect("book request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json(response).await;
    assert_eq!(body["details"][0]["code"], "exceeds_approved_limit");
}

#[tokio::test]
async fn larger_amounts_route_to_the_growth_product() {
    let app = router();

    let response = app
        .oneshot(post_json("/api/v1/loans/quote", quote_payload("60000")))
        .await
        .expect("quote request");
    let body = read_json(response).await;

    assert_eq!(body["status"], "priced");
    assert_eq!(body["quote"]["product_id"], "prod-growth");
    assert_eq!(body["quote"]["type_id"], "type-growth-12w");
    assert_eq!(
        body["quote"]["schedule"].as_array().expect("schedule").len(),
        12
    );
}
