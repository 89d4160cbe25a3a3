//! Loan pricing, quoting, and booking for the origination workflow.
//!
//! The pricing engine is a pure pass over immutable inputs: catalog, prior
//! loans, and the operator's working amount. The surrounding service, the
//! repository seam, and the HTTP router make the engine usable from the
//! console without the engine itself touching any I/O.

pub mod catalog;
pub mod domain;
pub(crate) mod eligibility;
pub mod pricing;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::import::{CatalogImporter, CatalogImportError};
pub use catalog::{CatalogError, ProductCatalog};
pub use domain::{
    CustomerClass, CustomerId, CustomerLoanRecord, FeeMode, LoanId, LoanProduct, LoanStatus,
    PricingRequest, ProductType, ValidationError,
};
pub use pricing::{
    LoanQuote, PricingConfig, PricingEngine, PricingOutcome, RepaymentInstallment,
    DEFAULT_MINIMUM_PRINCIPAL,
};
pub use repository::{
    AlertError, AlertPublisher, BookedLoanRecord, BookedLoanView, BookingAlert, BookingMetadata,
    LoanRepository, RepositoryError,
};
pub use router::{origination_router, QuoteErrorView, QuoteResponseView};
pub use service::{BookLoanCommand, LoanOriginationService, OriginationServiceError, QuoteInputs};
