use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{CustomerId, LoanId};
use super::pricing::{LoanQuote, PricingOutcome};
use super::repository::{AlertPublisher, BookingMetadata, LoanRepository, RepositoryError};
use super::service::{
    BookLoanCommand, LoanOriginationService, OriginationServiceError, QuoteInputs,
};

/// Router builder exposing HTTP endpoints for quoting and booking.
pub fn origination_router<R, A>(service: Arc<LoanOriginationService<R, A>>) -> Router
where
    R: LoanRepository + 'static,
    A: AlertPublisher + 'static,
{
    Router::new()
        .route("/api/v1/loans/quote", post(quote_handler::<R, A>))
        .route("/api/v1/loans", post(book_handler::<R, A>))
        .route("/api/v1/loans/:loan_id", get(status_handler::<R, A>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub struct QuoteRequestBody {
    pub customer_id: String,
    #[serde(default)]
    pub principal: Option<Decimal>,
    pub approved_limit: Decimal,
    #[serde(default)]
    pub type_id: Option<String>,
    #[serde(default)]
    pub duration_weeks: Option<u32>,
    /// Disbursement start date anchoring the schedule; defaults to today.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct BookLoanRequestBody {
    pub customer_id: String,
    pub principal: Decimal,
    pub approved_limit: Decimal,
    #[serde(default)]
    pub type_id: Option<String>,
    #[serde(default)]
    pub duration_weeks: Option<u32>,
    pub start_date: NaiveDate,
    pub officer_id: String,
    pub branch_id: String,
    pub tenant_id: String,
}

/// Quote response shaped for console consumption: the outcome kind, the
/// violated bounds when rejected, and the full quote when bookable.
#[derive(Debug, Serialize)]
pub struct QuoteResponseView {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_class: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<QuoteErrorView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<LoanQuote>,
}

#[derive(Debug, Serialize)]
pub struct QuoteErrorView {
    pub code: &'static str,
    pub message: String,
}

impl QuoteResponseView {
    pub fn from_outcome(outcome: PricingOutcome) -> Self {
        match outcome {
            PricingOutcome::NotEntered => Self {
                status: "not_entered",
                customer_class: None,
                errors: Vec::new(),
                quote: None,
            },
            PricingOutcome::Rejected {
                customer_class,
                errors,
            } => Self {
                status: "rejected",
                customer_class: Some(customer_class.label()),
                errors: errors
                    .iter()
                    .map(|error| QuoteErrorView {
                        code: error.code(),
                        message: error.to_string(),
                    })
                    .collect(),
                quote: None,
            },
            PricingOutcome::Priced(quote) => Self {
                status: "priced",
                customer_class: Some(quote.customer_class.label()),
                errors: Vec::new(),
                quote: Some(quote),
            },
        }
    }
}

pub(crate) async fn quote_handler<R, A>(
    State(service): State<Arc<LoanOriginationService<R, A>>>,
    axum::Json(body): axum::Json<QuoteRequestBody>,
) -> Response
where
    R: LoanRepository + 'static,
    A: AlertPublisher + 'static,
{
    let customer_id = CustomerId(body.customer_id);
    let inputs = QuoteInputs {
        principal: body.principal,
        approved_limit: body.approved_limit,
        selected_type_id: body.type_id,
        duration_weeks: body.duration_weeks,
    };
    let start_date = body
        .start_date
        .unwrap_or_else(|| Local::now().date_naive());

    match service.quote(&customer_id, &inputs, start_date) {
        Ok(outcome) => (
            StatusCode::OK,
            axum::Json(QuoteResponseView::from_outcome(outcome)),
        )
            .into_response(),
        Err(error) => internal_error_response(error),
    }
}

pub(crate) async fn book_handler<R, A>(
    State(service): State<Arc<LoanOriginationService<R, A>>>,
    axum::Json(body): axum::Json<BookLoanRequestBody>,
) -> Response
where
    R: LoanRepository + 'static,
    A: AlertPublisher + 'static,
{
    let command = BookLoanCommand {
        customer_id: CustomerId(body.customer_id),
        inputs: QuoteInputs {
            principal: Some(body.principal),
            approved_limit: body.approved_limit,
            selected_type_id: body.type_id,
            duration_weeks: body.duration_weeks,
        },
        start_date: body.start_date,
        metadata: BookingMetadata {
            officer_id: body.officer_id,
            branch_id: body.branch_id,
            tenant_id: body.tenant_id,
            booked_at: Utc::now(),
        },
    };

    match service.book(command) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.status_view())).into_response(),
        Err(OriginationServiceError::QuoteRejected { errors }) => {
            let payload = json!({
                "error": "quote is not bookable",
                "details": errors
                    .iter()
                    .map(|error| json!({ "code": error.code(), "message": error.to_string() }))
                    .collect::<Vec<_>>(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(OriginationServiceError::AmountMissing) => {
            let payload = json!({ "error": "no loan amount entered" });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(OriginationServiceError::Repository(RepositoryError::Conflict)) => {
            let payload = json!({ "error": "loan already exists" });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error_response(other),
    }
}

pub(crate) async fn status_handler<R, A>(
    State(service): State<Arc<LoanOriginationService<R, A>>>,
    Path(loan_id): Path<String>,
) -> Response
where
    R: LoanRepository + 'static,
    A: AlertPublisher + 'static,
{
    let id = LoanId(loan_id);
    match service.get(&id) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(OriginationServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({ "error": "loan not found", "loan_id": id.0 });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error_response(other),
    }
}

fn internal_error_response(error: OriginationServiceError) -> Response {
    let payload = json!({ "error": error.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
