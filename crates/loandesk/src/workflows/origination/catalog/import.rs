use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

use super::super::domain::{FeeMode, LoanProduct, ProductType};
use super::{CatalogError, ProductCatalog};

/// Errors raised while hydrating a catalog from a console export.
#[derive(Debug, thiserror::Error)]
pub enum CatalogImportError {
    #[error("failed to read catalog export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalog CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("catalog field {field} holds unusable value '{value}'")]
    Field { field: &'static str, value: String },
    #[error("imported catalog is misconfigured: {0}")]
    Catalog(#[from] CatalogError),
}

/// Builds a `ProductCatalog` from the admin console's denormalized export:
/// one row per pricing tier, with the owning product's columns repeated.
pub struct CatalogImporter;

impl CatalogImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<ProductCatalog, CatalogImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<ProductCatalog, CatalogImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut products = Vec::new();
        let mut seen_products: HashSet<String> = HashSet::new();
        let mut types = Vec::new();

        for row in csv_reader.deserialize::<CatalogRow>() {
            let row = row?;

            // First-seen wins: repeated product columns on later tier rows
            // never overwrite the range already imported.
            if seen_products.insert(row.product_id.clone()) {
                products.push(LoanProduct {
                    id: row.product_id.clone(),
                    name: row.product_name.clone(),
                    min_amount: parse_amount("Minimum Amount", &row.min_amount)?,
                    max_amount: row
                        .max_amount
                        .as_deref()
                        .map(|raw| parse_amount("Maximum Amount", raw))
                        .transpose()?,
                    registration_fee: parse_amount("Registration Fee", &row.registration_fee)?,
                });
            }

            let registration_fee = parse_amount("Registration Fee", &row.registration_fee)?;
            types.push(ProductType {
                id: row.type_id,
                product_id: row.product_id,
                name: row.type_name,
                duration_weeks: parse_weeks(&row.duration_weeks)?,
                interest_rate: parse_amount("Interest Rate", &row.interest_rate)?,
                processing_fee_rate: parse_amount(
                    "Processing Fee Rate",
                    &row.processing_fee_rate,
                )?,
                processing_fee_mode: parse_mode(&row.processing_fee_mode)?,
                registration_fee,
                penalty_rate: row
                    .penalty_rate
                    .as_deref()
                    .map(|raw| parse_amount("Penalty Rate", raw))
                    .transpose()?
                    .unwrap_or(Decimal::ZERO),
            });
        }

        let catalog = ProductCatalog::new(products, types);
        catalog.validate()?;
        Ok(catalog)
    }
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(rename = "Product ID")]
    product_id: String,
    #[serde(rename = "Product Name")]
    product_name: String,
    #[serde(rename = "Minimum Amount")]
    min_amount: String,
    #[serde(rename = "Maximum Amount", default, deserialize_with = "empty_string_as_none")]
    max_amount: Option<String>,
    #[serde(rename = "Registration Fee")]
    registration_fee: String,
    #[serde(rename = "Type ID")]
    type_id: String,
    #[serde(rename = "Type Name")]
    type_name: String,
    #[serde(rename = "Duration Weeks")]
    duration_weeks: String,
    #[serde(rename = "Interest Rate")]
    interest_rate: String,
    #[serde(rename = "Processing Fee Rate")]
    processing_fee_rate: String,
    #[serde(rename = "Processing Fee Mode")]
    processing_fee_mode: String,
    #[serde(rename = "Penalty Rate", default, deserialize_with = "empty_string_as_none")]
    penalty_rate: Option<String>,
}

fn parse_amount(field: &'static str, raw: &str) -> Result<Decimal, CatalogImportError> {
    raw.trim()
        .parse::<Decimal>()
        .map_err(|_| CatalogImportError::Field {
            field,
            value: raw.to_string(),
        })
}

fn parse_weeks(raw: &str) -> Result<u32, CatalogImportError> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| CatalogImportError::Field {
            field: "Duration Weeks",
            value: raw.to_string(),
        })
}

fn parse_mode(raw: &str) -> Result<FeeMode, CatalogImportError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "flat" => Ok(FeeMode::Flat),
        "percentage" | "percent" => Ok(FeeMode::Percentage),
        _ => Err(CatalogImportError::Field {
            field: "Processing Fee Mode",
            value: raw.to_string(),
        }),
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|value| !value.trim().is_empty()))
}
