use rust_decimal::Decimal;

use super::domain::ValidationError;

/// Outcome of amount validation ahead of product matching.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum AmountCheck {
    /// Nothing usable entered yet; distinct from a rejection.
    NotEntered,
    /// The amount can never price (negative input); matching is pointless.
    Invalid(ValidationError),
    /// A usable amount, with any violated bounds accumulated so the caller
    /// can name every one of them.
    Entered {
        principal: Decimal,
        errors: Vec<ValidationError>,
    },
}

/// Validate a principal against the approved limit and the bookable floor.
///
/// A missing or zero amount is "nothing entered", never an error: the caller
/// resets the working amount to zero after a limit rejection, and that reset
/// must not itself trigger a new rejection.
pub(crate) fn check_amount(
    principal: Option<Decimal>,
    approved_limit: Decimal,
    minimum: Decimal,
) -> AmountCheck {
    let principal = match principal {
        Some(principal) => principal,
        None => return AmountCheck::NotEntered,
    };

    if principal.is_zero() {
        return AmountCheck::NotEntered;
    }

    if principal < Decimal::ZERO {
        return AmountCheck::Invalid(ValidationError::InvalidAmount);
    }

    let mut errors = Vec::new();
    if principal > approved_limit {
        errors.push(ValidationError::ExceedsApprovedLimit { approved_limit });
    }
    if principal < minimum {
        errors.push(ValidationError::BelowMinimumBookable { minimum });
    }

    AmountCheck::Entered { principal, errors }
}
