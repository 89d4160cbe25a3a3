use crate::infra::{
    parse_amount, parse_date, standard_catalog, InMemoryAlertPublisher, InMemoryLoanRepository,
};
use chrono::{Local, NaiveDate, Utc};
use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::path::PathBuf;
use std::sync::Arc;

use loandesk::error::AppError;
use loandesk::workflows::origination::{
    BookLoanCommand, BookingMetadata, CatalogImporter, CustomerId, CustomerLoanRecord,
    LoanOriginationService, LoanQuote, LoanStatus, PricingConfig, PricingEngine, PricingOutcome,
    PricingRequest, QuoteInputs,
};

#[derive(Args, Debug)]
pub(crate) struct QuoteArgs {
    /// Requested principal amount
    #[arg(long, value_parser = parse_amount)]
    pub(crate) principal: Decimal,
    /// Approved credit limit from underwriting
    #[arg(long, value_parser = parse_amount)]
    pub(crate) approved_limit: Decimal,
    /// Price as a returning customer with a disbursed loan on record
    #[arg(long)]
    pub(crate) repeat: bool,
    /// Preferred pricing tier id, if the operator already chose one
    #[arg(long)]
    pub(crate) type_id: Option<String>,
    /// Currently held duration in weeks, used for tier auto-selection
    #[arg(long)]
    pub(crate) duration_weeks: Option<u32>,
    /// Disbursement start date (YYYY-MM-DD); defaults to today
    #[arg(long, value_parser = parse_date)]
    pub(crate) start_date: Option<NaiveDate>,
    /// Optional console catalog export to price against
    #[arg(long)]
    pub(crate) catalog_csv: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Disbursement start date (YYYY-MM-DD); defaults to today
    #[arg(long, value_parser = parse_date)]
    pub(crate) start_date: Option<NaiveDate>,
}

pub(crate) fn run_quote(args: QuoteArgs) -> Result<(), AppError> {
    let catalog = match args.catalog_csv {
        Some(path) => CatalogImporter::from_path(path)?,
        None => standard_catalog(),
    };
    let engine = PricingEngine::new(catalog, PricingConfig::default());

    let prior_loans = if args.repeat {
        vec![CustomerLoanRecord {
            status: LoanStatus::Disbursed,
        }]
    } else {
        Vec::new()
    };

    let request = PricingRequest {
        principal: Some(args.principal),
        approved_limit: args.approved_limit,
        prior_loans,
        selected_type_id: args.type_id,
        duration_weeks: args.duration_weeks,
    };
    let start_date = args.start_date.unwrap_or_else(|| Local::now().date_naive());

    render_outcome(&engine.quote(&request, start_date));
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let start_date = args.start_date.unwrap_or_else(|| Local::now().date_naive());
    let repository = Arc::new(InMemoryLoanRepository::default());
    let alerts = Arc::new(InMemoryAlertPublisher::default());
    let service = LoanOriginationService::new(
        repository,
        alerts.clone(),
        standard_catalog(),
        PricingConfig::default(),
    );

    let customer = CustomerId("demo-customer".to_string());
    let inputs = QuoteInputs {
        principal: Some(dec!(10000)),
        approved_limit: dec!(100000),
        selected_type_id: None,
        duration_weeks: None,
    };

    println!("Loan origination demo");
    println!("Disbursement start: {start_date}\n");

    println!("Step 1: quote for a first-time customer");
    let outcome = service.quote(&customer, &inputs, start_date)?;
    render_outcome(&outcome);

    println!("\nStep 2: book the loan");
    let record = service
        .book(BookLoanCommand {
            customer_id: customer.clone(),
            inputs: inputs.clone(),
            start_date,
            metadata: BookingMetadata {
                officer_id: "officer-demo".to_string(),
                branch_id: "branch-demo".to_string(),
                tenant_id: "tenant-demo".to_string(),
                booked_at: Utc::now(),
            },
        })?;
    println!(
        "Booked {} for {} ({}), status {}",
        record.loan_id.0,
        record.customer_id.0,
        record.quote.product_name,
        record.status.label()
    );
    println!("Alerts published: {}", alerts.events().len());

    println!("\nStep 3: requote the same customer");
    let outcome = service.quote(&customer, &inputs, start_date)?;
    render_outcome(&outcome);

    println!("\nStep 4: an amount over the approved limit cannot be booked");
    let mut over_limit = inputs;
    over_limit.principal = Some(dec!(250000));
    let outcome = service.quote(&customer, &over_limit, start_date)?;
    render_outcome(&outcome);

    Ok(())
}

fn render_outcome(outcome: &PricingOutcome) {
    match outcome {
        PricingOutcome::NotEntered => println!("No amount entered; nothing to price."),
        PricingOutcome::Rejected {
            customer_class,
            errors,
        } => {
            println!("Quote rejected ({} customer):", customer_class.label());
            for error in errors {
                println!("- {error}");
            }
        }
        PricingOutcome::Priced(quote) => render_quote(quote),
    }
}

fn render_quote(quote: &LoanQuote) {
    println!(
        "Product: {} / {} ({} customer)",
        quote.product_name,
        quote.type_name,
        quote.customer_class.label()
    );
    println!(
        "Principal {} | interest {}% = {} | total payable {}",
        quote.principal, quote.interest_rate, quote.total_interest, quote.total_payable
    );
    println!(
        "Processing fee {} | registration fee {} (billed with week 1)",
        quote.processing_fee, quote.registration_fee
    );
    println!(
        "{} weekly installments of {}",
        quote.duration_weeks, quote.weekly_installment
    );

    println!("Week | Due date   | Installment | Interest | Fees due");
    for entry in &quote.schedule {
        let fees = entry.processing_fee_due + entry.registration_fee_due;
        println!(
            "{:>4} | {} | {:>11} | {:>8} | {:>8}",
            entry.week_number, entry.due_date, entry.total_due, entry.interest_portion, fees
        );
    }
}
