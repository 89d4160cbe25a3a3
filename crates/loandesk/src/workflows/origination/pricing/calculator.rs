use rust_decimal::{Decimal, RoundingStrategy};

use super::super::domain::{CustomerClass, FeeMode, LoanProduct, ProductType};

/// Monetary figures for one priced request, before schedule expansion.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct QuoteFigures {
    pub(crate) processing_fee: Decimal,
    pub(crate) registration_fee: Decimal,
    pub(crate) total_interest: Decimal,
    pub(crate) total_payable: Decimal,
    pub(crate) weekly_installment: Decimal,
}

/// Round a persisted currency amount to two decimal places. Intermediate
/// arithmetic keeps full precision; only figures that leave the calculator
/// pass through here.
pub(crate) fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub(crate) fn compute_figures(
    principal: Decimal,
    product: &LoanProduct,
    tier: &ProductType,
    customer_class: CustomerClass,
) -> QuoteFigures {
    // Registration fee is a product-level property, charged once and only
    // for customers with no disbursed history.
    let registration_fee = match customer_class {
        CustomerClass::New => product.registration_fee,
        CustomerClass::Repeat => Decimal::ZERO,
    };

    let processing_fee = match tier.processing_fee_mode {
        FeeMode::Percentage => {
            round_currency(principal * tier.processing_fee_rate / Decimal::ONE_HUNDRED)
        }
        FeeMode::Flat => tier.processing_fee_rate,
    };

    // Flat simple interest over the whole tenor, never compounded.
    let total_interest = round_currency(principal * tier.interest_rate / Decimal::ONE_HUNDRED);

    // Fees are billed alongside week one and stay out of the amortization
    // base: the installments repay principal plus interest only.
    let total_payable = principal + total_interest;
    let weekly_installment = round_currency(total_payable / Decimal::from(tier.duration_weeks));

    QuoteFigures {
        processing_fee,
        registration_fee,
        total_interest,
        total_payable,
        weekly_installment,
    }
}
