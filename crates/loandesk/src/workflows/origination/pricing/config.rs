use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Floor for bookable principals; currency-unit agnostic.
pub const DEFAULT_MINIMUM_PRINCIPAL: Decimal = dec!(1000);

/// Engine knobs that live outside the product catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    pub minimum_principal: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            minimum_principal: DEFAULT_MINIMUM_PRINCIPAL,
        }
    }
}
