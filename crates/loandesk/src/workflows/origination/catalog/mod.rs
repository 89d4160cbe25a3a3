pub mod import;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::domain::{LoanProduct, ProductType};

/// Read-only lookup over the tenant's loan products and pricing tiers.
///
/// Products and tiers are held in catalog (creation) order. The engine never
/// mutates the catalog; administration happens upstream and arrives here as
/// immutable data, either directly or through the CSV importer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductCatalog {
    products: Vec<LoanProduct>,
    types: Vec<ProductType>,
}

impl ProductCatalog {
    pub fn new(products: Vec<LoanProduct>, types: Vec<ProductType>) -> Self {
        Self { products, types }
    }

    pub fn products(&self) -> &[LoanProduct] {
        &self.products
    }

    pub fn types(&self) -> &[ProductType] {
        &self.types
    }

    /// Select the product whose amount range contains `principal`.
    ///
    /// Negative principals never match; gaps in a misconfigured catalog
    /// surface as `None` and are reported by the engine as `NoProductMatch`.
    pub fn match_product(&self, principal: Decimal) -> Option<&LoanProduct> {
        if principal < Decimal::ZERO {
            return None;
        }
        self.products.iter().find(|product| product.contains(principal))
    }

    /// Tiers belonging to `product_id`, in catalog order.
    pub fn types_for_product(&self, product_id: &str) -> Vec<&ProductType> {
        self.types
            .iter()
            .filter(|tier| tier.product_id == product_id)
            .collect()
    }

    /// Resolve the tier a pricing pass should use.
    ///
    /// An explicit selection wins while it still belongs to the product; a
    /// tier matching the held duration is kept next. The fallback is the tier
    /// with the lowest duration, ties broken by id, so reselection never
    /// depends on incidental list order. Tiers that cannot amortize (zero
    /// duration) are never selectable.
    pub fn select_type(
        &self,
        product_id: &str,
        selected_type_id: Option<&str>,
        duration_weeks: Option<u32>,
    ) -> Option<&ProductType> {
        let available: Vec<&ProductType> = self
            .types_for_product(product_id)
            .into_iter()
            .filter(|tier| tier.duration_weeks > 0)
            .collect();

        if let Some(selected) = selected_type_id {
            if let Some(tier) = available.iter().find(|tier| tier.id == selected) {
                return Some(*tier);
            }
        }

        if let Some(weeks) = duration_weeks {
            if let Some(tier) = available.iter().find(|tier| tier.duration_weeks == weeks) {
                return Some(*tier);
            }
        }

        available.into_iter().min_by(|a, b| {
            a.duration_weeks
                .cmp(&b.duration_weeks)
                .then_with(|| a.id.cmp(&b.id))
        })
    }

    /// Check the administration invariants before the catalog is served.
    ///
    /// Range gaps are deliberately not rejected here: the granularity of a
    /// gap cannot be told apart from cent-level contiguity, so gaps surface
    /// per-request as `NoProductMatch` instead.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.products.is_empty() {
            return Err(CatalogError::Empty);
        }

        for product in &self.products {
            if product.min_amount < Decimal::ZERO || product.registration_fee < Decimal::ZERO {
                return Err(CatalogError::NegativeAmount {
                    product_id: product.id.clone(),
                });
            }
            if let Some(max) = product.max_amount {
                if max < product.min_amount {
                    return Err(CatalogError::InvertedRange {
                        product_id: product.id.clone(),
                        min: product.min_amount,
                        max,
                    });
                }
            }
        }

        for (index, first) in self.products.iter().enumerate() {
            for second in &self.products[index + 1..] {
                if ranges_overlap(first, second) {
                    return Err(CatalogError::OverlappingRanges {
                        first: first.id.clone(),
                        second: second.id.clone(),
                    });
                }
            }
        }

        for tier in &self.types {
            if !self.products.iter().any(|product| product.id == tier.product_id) {
                return Err(CatalogError::OrphanType {
                    type_id: tier.id.clone(),
                    product_id: tier.product_id.clone(),
                });
            }
            if tier.duration_weeks == 0 {
                return Err(CatalogError::ZeroDuration {
                    type_id: tier.id.clone(),
                });
            }
            if tier.interest_rate < Decimal::ZERO
                || tier.processing_fee_rate < Decimal::ZERO
                || tier.registration_fee < Decimal::ZERO
                || tier.penalty_rate < Decimal::ZERO
            {
                return Err(CatalogError::NegativeRate {
                    type_id: tier.id.clone(),
                });
            }
        }

        Ok(())
    }
}

fn ranges_overlap(first: &LoanProduct, second: &LoanProduct) -> bool {
    let first_reaches_second = match first.max_amount {
        Some(max) => second.min_amount <= max,
        None => true,
    };
    let second_reaches_first = match second.max_amount {
        Some(max) => first.min_amount <= max,
        None => true,
    };
    first_reaches_second && second_reaches_first
}

/// Configuration faults detected when a catalog is loaded.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog has no products")]
    Empty,
    #[error("product {product_id} carries a negative amount bound or fee")]
    NegativeAmount { product_id: String },
    #[error("product {product_id} range is inverted (min {min} > max {max})")]
    InvertedRange {
        product_id: String,
        min: Decimal,
        max: Decimal,
    },
    #[error("products {first} and {second} cover overlapping amount ranges")]
    OverlappingRanges { first: String, second: String },
    #[error("tier {type_id} references unknown product {product_id}")]
    OrphanType { type_id: String, product_id: String },
    #[error("tier {type_id} must run for at least one week")]
    ZeroDuration { type_id: String },
    #[error("tier {type_id} carries a negative rate or fee")]
    NegativeRate { type_id: String },
}
