mod data;
mod generator;
mod sales;

pub use data::{round2, spaced_label, BankDetails, InvoiceData, LineItem, OrderInfo, Party, Seller};
pub use generator::{
    build_invoice_data, build_line_items, format_date, format_invoice_number, generate_invoice,
    get_invoice_path, invoice_file_name, parse_item_input, resolve_invoice_number,
    GenerateRequest, GeneratedInvoice,
};
pub use sales::{parse_date, search_sales, SalesQuery};
