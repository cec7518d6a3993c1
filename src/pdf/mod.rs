//! PDF output for laid-out invoices.

mod render;

pub use render::render_pdf;

use tracing::warn;

use crate::error::Result;
use crate::invoice::InvoiceData;
use crate::layout::{layout_invoice, DisplayList, LayoutOptions};

/// A finished invoice document.
#[derive(Debug, Clone)]
pub struct RenderedInvoice {
    pub bytes: Vec<u8>,
    /// Grand total recomputed from the table rows, rounded to paise.
    pub grand_total: f64,
    pub amount_in_words: String,
    pub page_count: usize,
    /// The recorded drawing commands the bytes were produced from.
    pub layout: DisplayList,
}

/// Lay out `invoice` and serialise it to PDF.
///
/// A grand total that cannot be spelled out aborts the run with
/// [`BillingError::AmountOverflow`](crate::error::BillingError::AmountOverflow)
/// before any bytes are produced.
pub fn render_invoice(invoice: &InvoiceData, options: &LayoutOptions) -> Result<RenderedInvoice> {
    let mut layout = DisplayList::a4();
    let summary = layout_invoice(&mut layout, invoice, options).map_err(|e| {
        warn!(invoice = invoice.invoice_no().unwrap_or("unknown"), error = %e, "layout aborted");
        e
    })?;

    let title = match invoice.invoice_no() {
        Some(no) => format!("Invoice {no}"),
        None => "Invoice".to_string(),
    };
    let bytes = render_pdf(&layout, &title)?;

    Ok(RenderedInvoice {
        bytes,
        grand_total: summary.grand_total,
        amount_in_words: summary.amount_in_words,
        page_count: summary.page_count,
        layout,
    })
}
