use chrono::format::{Item, StrftimeItems};
use chrono::{Datelike, Local, NaiveDate};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::data::{InvoiceData, LineItem, OrderInfo};
use crate::config::{
    load_catalog, load_config, load_customers, load_state, resolve_output_dir, save_state,
    Catalog, Config, Customer, SaleRecord,
};
use crate::error::{BillingError, Result};
use crate::pdf::render_invoice;

/// Everything the operator supplies for one invoice.
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    /// Billed customer id from customers.toml.
    pub customer: String,
    /// Ship-to customer id; `None` ships to the billed customer.
    pub ship_to: Option<String>,
    pub order_no: String,
    /// Defaults to the invoice date.
    pub order_date: Option<NaiveDate>,
    /// Item inputs in `product:quantity:price` form.
    pub items: Vec<String>,
    /// Defaults to `[invoice] payment_mode` from config.toml.
    pub payment_mode: Option<String>,
    /// Custom output file path.
    pub output: Option<PathBuf>,
    /// Also write the recorded layout as JSON to this path.
    pub dump_layout: Option<PathBuf>,
}

/// Result of a successful generation.
#[derive(Debug, Clone)]
pub struct GeneratedInvoice {
    pub invoice_no: String,
    pub path: PathBuf,
    pub total: f64,
    pub amount_in_words: String,
    pub page_count: usize,
}

/// Parse item input like "copper-wire:2:1450" into (product_id, quantity, unit_price)
pub fn parse_item_input(input: &str) -> Result<(&str, f64, f64)> {
    let parts: Vec<&str> = input.split(':').collect();
    if parts.len() != 3 || parts[0].trim().is_empty() {
        return Err(BillingError::InvalidItemFormat(input.to_string()));
    }

    let product_id = parts[0].trim();
    let qty_str = parts[1].trim();
    let price_str = parts[2].trim();

    let quantity: f64 = qty_str.parse().map_err(|_| BillingError::InvalidQuantity {
        product: product_id.to_string(),
        qty: qty_str.to_string(),
        reason: "must be a number".to_string(),
    })?;
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(BillingError::InvalidQuantity {
            product: product_id.to_string(),
            qty: qty_str.to_string(),
            reason: "must be greater than 0".to_string(),
        });
    }

    let price: f64 = price_str.parse().map_err(|_| BillingError::InvalidPrice {
        product: product_id.to_string(),
        price: price_str.to_string(),
        reason: "must be a number".to_string(),
    })?;
    if !price.is_finite() || price <= 0.0 {
        return Err(BillingError::InvalidPrice {
            product: product_id.to_string(),
            price: price_str.to_string(),
            reason: "must be greater than 0".to_string(),
        });
    }

    Ok((product_id, quantity, price))
}

/// Format invoice number from template
pub fn format_invoice_number(format: &str, year: u32, seq: u32) -> String {
    format
        .replace("{year}", &year.to_string())
        .replace("{next_yy}", &format!("{:02}", (year + 1) % 100))
        .replace("{seq:03}", &format!("{:03}", seq))
        .replace("{seq:04}", &format!("{:04}", seq))
        .replace("{seq:05}", &format!("{:05}", seq))
        .replace("{seq}", &seq.to_string())
}

/// Turn item inputs into numbered line items using catalog descriptions
/// and HSN codes.
pub fn build_line_items(catalog: &Catalog, inputs: &[String]) -> Result<Vec<LineItem>> {
    if inputs.is_empty() {
        return Err(BillingError::NoItems);
    }

    inputs
        .iter()
        .enumerate()
        .map(|(i, input)| {
            let (product_id, qty, price) = parse_item_input(input)?;
            let product = catalog.product(product_id)?;
            Ok(LineItem::new(
                i as u32 + 1,
                product.hsn.clone(),
                product.description.clone(),
                qty,
                price,
            ))
        })
        .collect()
}

fn find_customer<'a>(customers: &'a HashMap<String, Customer>, id: &str) -> Result<&'a Customer> {
    customers
        .get(id)
        .ok_or_else(|| BillingError::CustomerNotFound(id.to_string()))
}

/// Format `date` with a configured strftime pattern, rejecting patterns
/// chrono cannot render.
pub fn format_date(date: NaiveDate, pattern: &str) -> Result<String> {
    let items: Vec<Item> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(BillingError::InvalidDateFormat(pattern.to_string()));
    }
    Ok(date.format_with_items(items.into_iter()).to_string())
}

/// Assemble the layout input for one invoice. Pure: no I/O, no clock.
pub fn build_invoice_data(
    config: &Config,
    customers: &HashMap<String, Customer>,
    catalog: &Catalog,
    request: &GenerateRequest,
    invoice_no: &str,
    invoice_date: NaiveDate,
) -> Result<InvoiceData> {
    let bill_to = find_customer(customers, &request.customer)?.to_party();
    let ship_to = match request.ship_to.as_deref() {
        Some(id) => find_customer(customers, id)?.to_party(),
        None => bill_to.clone(),
    };
    let line_items = build_line_items(catalog, &request.items)?;

    let date_format = config.invoice.date_format.as_str();
    let order_date = request.order_date.unwrap_or(invoice_date);
    let order = OrderInfo::new()
        .with("OrderNo", request.order_no.clone())
        .with("OrderDate", format_date(order_date, date_format)?)
        .with("InvoiceNo", invoice_no)
        .with("InvoiceDate", format_date(invoice_date, date_format)?);

    let payment_mode = request
        .payment_mode
        .clone()
        .unwrap_or_else(|| config.invoice.payment_mode.clone());

    Ok(InvoiceData {
        seller: config.seller.to_seller(),
        order,
        bill_to,
        ship_to,
        line_items,
        payment_mode,
    })
}

/// File name of an invoice PDF.
pub fn invoice_file_name(invoice_no: &str) -> String {
    format!("Invoice_{invoice_no}.pdf")
}

/// Generate a new invoice: number it, lay it out, write the PDF and append
/// the sale to the sales record.
///
/// The counter only advances, and the sale is only recorded, once the PDF
/// has been written.
pub fn generate_invoice(cfg_dir: &Path, request: &GenerateRequest) -> Result<GeneratedInvoice> {
    let config = load_config(cfg_dir)?;
    let customers = load_customers(cfg_dir)?;
    let catalog = load_catalog(cfg_dir)?;
    let mut state = load_state(cfg_dir)?;

    let today = Local::now().date_naive();
    let current_year = today.year() as u32;
    let seq = state.counter.next_for(current_year);
    let invoice_no = format_invoice_number(&config.invoice.number_format, current_year, seq);
    debug!(%invoice_no, seq, "assigned invoice number");

    let data = build_invoice_data(&config, &customers, &catalog, request, &invoice_no, today)?;
    let rendered = render_invoice(&data, &config.layout_options())?;

    let file_name = invoice_file_name(&invoice_no);
    let (pdf_path, recorded_file) = match &request.output {
        Some(path) => {
            fs::write(path, &rendered.bytes)?;
            let absolute = fs::canonicalize(path)?;
            (path.clone(), absolute.display().to_string())
        }
        None => {
            let output_dir = resolve_output_dir(&config.pdf.output_dir, cfg_dir);
            fs::create_dir_all(&output_dir)?;
            let path = output_dir.join(&file_name);
            fs::write(&path, &rendered.bytes)?;
            (path, file_name)
        }
    };

    if let Some(dump) = &request.dump_layout {
        let json = rendered
            .layout
            .to_json()
            .map_err(|e| BillingError::PdfGeneration(e.to_string()))?;
        fs::write(dump, json)?;
    }

    state.counter.last_number = seq;
    state.counter.last_year = current_year;
    state.sales.push(SaleRecord {
        order_no: request.order_no.clone(),
        order_date: request.order_date.unwrap_or(today),
        invoice_no: invoice_no.clone(),
        invoice_date: today,
        total: rendered.grand_total,
        file: recorded_file,
        customer: request.customer.clone(),
        items: request.items.clone(),
    });
    save_state(cfg_dir, &state)?;

    info!(
        %invoice_no,
        total = rendered.grand_total,
        pages = rendered.page_count,
        path = %pdf_path.display(),
        "invoice generated"
    );

    Ok(GeneratedInvoice {
        invoice_no,
        path: pdf_path,
        total: rendered.grand_total,
        amount_in_words: rendered.amount_in_words,
        page_count: rendered.page_count,
    })
}

/// Get the PDF path for a recorded invoice
pub fn get_invoice_path(cfg_dir: &Path, invoice_no: &str) -> Result<PathBuf> {
    let config = load_config(cfg_dir)?;
    let state = load_state(cfg_dir)?;

    let record = state
        .sales
        .iter()
        .find(|r| r.invoice_no == invoice_no)
        .ok_or_else(|| BillingError::InvoiceNotFound(invoice_no.to_string()))?;

    let recorded = PathBuf::from(&record.file);
    let pdf_path = if recorded.is_absolute() {
        recorded
    } else {
        resolve_output_dir(&config.pdf.output_dir, cfg_dir).join(recorded)
    };

    if !pdf_path.exists() {
        return Err(BillingError::InvoiceFileNotFound(pdf_path));
    }

    Ok(pdf_path)
}

/// Resolve an invoice reference to the actual invoice number.
/// Accepts either an index (1-based, newest first) from 'sales' or the
/// full invoice number.
pub fn resolve_invoice_number(records: &[SaleRecord], reference: &str) -> Result<String> {
    if let Ok(idx) = reference.parse::<usize>() {
        if idx == 0 || idx > records.len() {
            return Err(BillingError::InvalidInvoiceIndex(reference.to_string()));
        }
        return Ok(records[records.len() - idx].invoice_no.clone());
    }

    if records.iter().any(|r| r.invoice_no == reference) {
        Ok(reference.to_string())
    } else {
        Err(BillingError::InvoiceNotFound(reference.to_string()))
    }
}
