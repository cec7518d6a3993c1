pub mod config;
pub mod error;
pub mod invoice;
pub mod layout;
pub mod pdf;

pub use config::{Catalog, Config, Customer, SaleRecord, State};
pub use error::{BillingError, Result};
pub use invoice::{generate_invoice, GenerateRequest, InvoiceData};
pub use layout::{layout_invoice, number_to_words, DisplayList, LayoutOptions};
pub use pdf::{render_invoice, RenderedInvoice};
