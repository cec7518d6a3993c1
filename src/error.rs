use std::path::PathBuf;
use thiserror::Error;

use crate::layout::WordsError;

#[derive(Error, Debug)]
pub enum BillingError {
    #[error("Config directory not found at {0}. Run 'billing init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Customer '{0}' not found in customers.toml")]
    CustomerNotFound(String),

    #[error("Product '{0}' not found in catalog.toml")]
    ProductNotFound(String),

    #[error("Category '{0}' not found in catalog.toml")]
    CategoryNotFound(String),

    #[error("Subcategory '{0}' not found in catalog.toml")]
    SubcategoryNotFound(String),

    #[error("Catalog entry '{entry}' refers to unknown {kind} '{target}'")]
    CatalogIntegrity {
        entry: String,
        kind: &'static str,
        target: String,
    },

    #[error("Category '{0}' already exists, unable to save")]
    DuplicateCategory(String),

    #[error("Subcategory '{name}' already exists under category '{category}', unable to save")]
    DuplicateSubcategory { name: String, category: String },

    #[error("Product '{0}' already exists under the same subcategory and HSN code, unable to save")]
    DuplicateProduct(String),

    #[error("A {kind} with id '{id}' already exists in catalog.toml")]
    CatalogIdTaken { kind: &'static str, id: String },

    #[error("Catalog {0} must not be empty")]
    EmptyCatalogField(&'static str),

    #[error("Invalid item format '{0}'. Expected 'product:quantity:price' (e.g., 'copper-wire:2:1450')")]
    InvalidItemFormat(String),

    #[error("Invalid quantity '{qty}' for product '{product}': {reason}")]
    InvalidQuantity {
        product: String,
        qty: String,
        reason: String,
    },

    #[error("Invalid price '{price}' for product '{product}': {reason}")]
    InvalidPrice {
        product: String,
        price: String,
        reason: String,
    },

    #[error("No items specified. Use --item <product>:<quantity>:<price> to add line items.")]
    NoItems,

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid date_format '{0}' in config.toml")]
    InvalidDateFormat(String),

    #[error("Order date (from) {from} is later than order date (to) {to}")]
    InvalidDateRange { from: String, to: String },

    #[error("Invoice '{0}' not found in sales record")]
    InvoiceNotFound(String),

    #[error("Invalid invoice index '{0}'. Use 'billing sales' to see recorded invoices.")]
    InvalidInvoiceIndex(String),

    #[error("Invoice file not found: {0}")]
    InvoiceFileNotFound(PathBuf),

    #[error("Amount {0:.2} is too large to spell out (must be below 1,000,000,000)")]
    AmountOverflow(f64),

    #[error("Amount {0} cannot be spelled out")]
    InvalidAmount(f64),

    #[error("Failed to generate PDF: {0}")]
    PdfGeneration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<WordsError> for BillingError {
    fn from(err: WordsError) -> Self {
        match err {
            WordsError::Overflow(amount) => BillingError::AmountOverflow(amount),
            WordsError::Invalid(amount) => BillingError::InvalidAmount(amount),
        }
    }
}

pub type Result<T> = std::result::Result<T, BillingError>;
