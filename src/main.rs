use chrono::{Datelike, Local};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use billing::config::{
    config_dir, default_id, load_catalog, load_config, load_customers, load_state, save_catalog,
    CATALOG_TEMPLATE, CONFIG_TEMPLATE, CUSTOMERS_TEMPLATE,
};
use billing::error::{BillingError, Result};
use billing::invoice::{
    format_invoice_number, generate_invoice, get_invoice_path, parse_date, resolve_invoice_number,
    search_sales, GenerateRequest, SalesQuery,
};
use billing::layout::number_to_words;

#[derive(Parser)]
#[command(name = "billing")]
#[command(version, about = "Bill of supply generator with paginated PDF invoices", long_about = None)]
struct Cli {
    /// Path to config directory (default: XDG config dir or ~/.billing)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with template files
    Init,

    /// Generate a new invoice
    Generate {
        /// Customer identifier from customers.toml
        #[arg(short, long)]
        customer: String,

        /// Ship-to customer identifier (default: same as billing)
        #[arg(long, value_name = "CUSTOMER")]
        ship_to: Option<String>,

        /// Order number printed on the invoice
        #[arg(long)]
        order: String,

        /// Order date as YYYY-MM-DD (default: today)
        #[arg(long, value_name = "DATE")]
        order_date: Option<String>,

        /// Line items in format "product:quantity:price" (can be repeated)
        #[arg(short, long, value_name = "PRODUCT:QTY:PRICE")]
        item: Vec<String>,

        /// Payment mode (default: from config.toml)
        #[arg(short, long)]
        payment: Option<String>,

        /// Custom output file path (default: output_dir/Invoice_<no>.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the laid-out pages as JSON to this file
        #[arg(long, value_name = "FILE")]
        dump_layout: Option<PathBuf>,

        /// Open generated PDF with system default viewer
        #[arg(long)]
        open: bool,
    },

    /// List catalog products, or add catalog entries
    #[command(args_conflicts_with_subcommands = true)]
    Catalog {
        #[command(subcommand)]
        action: Option<CatalogAction>,

        /// Only products in this category
        #[arg(long)]
        category: Option<String>,

        /// Only products in this subcategory
        #[arg(long)]
        subcategory: Option<String>,
    },

    /// List configured customers
    Customers,

    /// Show configuration summary and next invoice number
    Status,

    /// List or search recorded sales
    Sales {
        /// Only the sale with this order number
        #[arg(long)]
        order: Option<String>,

        /// Earliest order date (YYYY-MM-DD, inclusive)
        #[arg(long, value_name = "DATE")]
        from: Option<String>,

        /// Latest order date (YYYY-MM-DD, inclusive)
        #[arg(long, value_name = "DATE")]
        to: Option<String>,

        /// Number of sales to show (default: all)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Open an invoice PDF
    Open {
        /// Invoice number or index from 'sales'
        invoice: String,
    },

    /// Spell out an amount in Indian-system words
    Words {
        #[arg(allow_negative_numbers = true)]
        amount: f64,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Add a category, subcategory or product to catalog.toml
    Add {
        #[command(subcommand)]
        entry: CatalogEntry,
    },
}

#[derive(Subcommand)]
enum CatalogEntry {
    /// Add a category
    Category {
        /// Display name
        #[arg(long)]
        name: String,

        /// Identifier (default: derived from the name)
        #[arg(long)]
        id: Option<String>,
    },

    /// Add a subcategory under an existing category
    Subcategory {
        /// Display name
        #[arg(long)]
        name: String,

        /// Owning category id
        #[arg(long)]
        category: String,

        /// Identifier (default: derived from the name)
        #[arg(long)]
        id: Option<String>,
    },

    /// Add a product under an existing subcategory
    Product {
        /// Description printed on invoices
        #[arg(long)]
        description: String,

        /// HSN code
        #[arg(long)]
        hsn: String,

        /// Owning subcategory id
        #[arg(long)]
        subcategory: String,

        /// Identifier used in --item (default: derived from the description)
        #[arg(long)]
        id: Option<String>,
    },
}

fn main() {
    init_tracing();
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("BILLING_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Generate {
            customer,
            ship_to,
            order,
            order_date,
            item,
            payment,
            output,
            dump_layout,
            open,
        } => {
            let request = GenerateRequest {
                customer,
                ship_to,
                order_no: order,
                order_date: order_date.as_deref().map(parse_date).transpose()?,
                items: item,
                payment_mode: payment,
                output,
                dump_layout,
            };
            cmd_generate(&cfg_dir, &request, open)
        }
        Commands::Catalog {
            action: Some(CatalogAction::Add { entry }),
            ..
        } => cmd_catalog_add(&cfg_dir, entry),
        Commands::Catalog {
            action: None,
            category,
            subcategory,
        } => cmd_catalog(&cfg_dir, category.as_deref(), subcategory.as_deref()),
        Commands::Customers => cmd_customers(&cfg_dir),
        Commands::Status => cmd_status(&cfg_dir),
        Commands::Sales {
            order,
            from,
            to,
            limit,
        } => {
            let query = SalesQuery {
                order_no: order,
                from: from.as_deref().map(parse_date).transpose()?,
                to: to.as_deref().map(parse_date).transpose()?,
            };
            cmd_sales(&cfg_dir, &query, limit)
        }
        Commands::Open { invoice } => cmd_open(&cfg_dir, &invoice),
        Commands::Words { amount } => cmd_words(amount),
    }
}

fn ensure_initialized(cfg_dir: &Path) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(BillingError::ConfigNotFound(cfg_dir.to_path_buf()));
    }
    Ok(())
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    if cfg_dir.exists() {
        return Err(BillingError::AlreadyInitialized(cfg_dir.to_path_buf()));
    }

    fs::create_dir_all(cfg_dir)?;
    fs::create_dir_all(cfg_dir.join("output"))?;

    fs::write(cfg_dir.join("config.toml"), CONFIG_TEMPLATE)?;
    fs::write(cfg_dir.join("customers.toml"), CUSTOMERS_TEMPLATE)?;
    fs::write(cfg_dir.join("catalog.toml"), CATALOG_TEMPLATE)?;

    println!("Initialized billing config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Edit your firm and bank details:  $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!(
        "  2. Add your customers:               $EDITOR {}/customers.toml",
        cfg_dir.display()
    );
    println!(
        "  3. Fill in the product catalog:      $EDITOR {}/catalog.toml",
        cfg_dir.display()
    );
    println!();
    println!("Then generate your first invoice:");
    println!("  billing generate --customer <id> --order <no> --item <product>:<qty>:<price>");

    Ok(())
}

#[derive(Tabled)]
struct CustomerRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "PHONE")]
    phone: String,
    #[tabled(rename = "DISTRICT")]
    district: String,
}

#[derive(Tabled)]
struct ProductRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "DESCRIPTION")]
    description: String,
    #[tabled(rename = "HSN")]
    hsn: String,
    #[tabled(rename = "SUBCATEGORY")]
    subcategory: String,
    #[tabled(rename = "CATEGORY")]
    category: String,
}

#[derive(Tabled)]
struct SaleRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "INVOICE")]
    invoice_no: String,
    #[tabled(rename = "ORDER")]
    order_no: String,
    #[tabled(rename = "ORDER DATE")]
    order_date: String,
    #[tabled(rename = "INVOICE DATE")]
    invoice_date: String,
    #[tabled(rename = "TOTAL")]
    total: String,
    #[tabled(rename = "CUSTOMER")]
    customer: String,
}

/// List configured customers
fn cmd_customers(cfg_dir: &Path) -> Result<()> {
    ensure_initialized(cfg_dir)?;

    let customers = load_customers(cfg_dir)?;

    if customers.is_empty() {
        println!("No customers configured.");
        println!("Add customers to: {}/customers.toml", cfg_dir.display());
        return Ok(());
    }

    let mut sorted: Vec<_> = customers.iter().collect();
    sorted.sort_by_key(|(k, _)| *k);

    let rows: Vec<CustomerRow> = sorted
        .iter()
        .map(|(id, customer)| CustomerRow {
            id: id.to_string(),
            name: customer.name.clone(),
            phone: customer.phone.clone(),
            district: customer.district.clone(),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    Ok(())
}

/// List catalog products, optionally filtered
fn cmd_catalog(cfg_dir: &Path, category: Option<&str>, subcategory: Option<&str>) -> Result<()> {
    ensure_initialized(cfg_dir)?;

    let catalog = load_catalog(cfg_dir)?;
    let products = catalog.filter_products(category, subcategory)?;

    if products.is_empty() {
        println!("No products found.");
        println!("Add products to: {}/catalog.toml", cfg_dir.display());
        return Ok(());
    }

    let rows: Vec<ProductRow> = products
        .iter()
        .map(|(id, product)| {
            let sub = catalog.subcategories.get(&product.subcategory);
            let cat = sub.and_then(|s| catalog.categories.get(&s.category));
            ProductRow {
                id: id.to_string(),
                description: product.description.clone(),
                hsn: product.hsn.clone(),
                subcategory: sub.map(|s| s.name.clone()).unwrap_or_default(),
                category: cat.map(|c| c.name.clone()).unwrap_or_default(),
            }
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    Ok(())
}

/// Add an entry to catalog.toml
fn cmd_catalog_add(cfg_dir: &Path, entry: CatalogEntry) -> Result<()> {
    ensure_initialized(cfg_dir)?;

    let mut catalog = load_catalog(cfg_dir)?;
    let (kind, id, warning) = match entry {
        CatalogEntry::Category { name, id } => {
            let id = id.unwrap_or_else(|| default_id(&name));
            catalog.add_category(&id, &name)?;
            ("category", id, None)
        }
        CatalogEntry::Subcategory { name, category, id } => {
            let id = id.unwrap_or_else(|| default_id(&name));
            let warning = catalog.add_subcategory(&id, &name, &category)?;
            ("subcategory", id, warning)
        }
        CatalogEntry::Product {
            description,
            hsn,
            subcategory,
            id,
        } => {
            let id = id.unwrap_or_else(|| default_id(&description));
            let warning = catalog.add_product(&id, &description, &hsn, &subcategory)?;
            ("product", id, warning)
        }
    };

    save_catalog(cfg_dir, &catalog)?;

    println!("Added {kind} '{id}'");
    if let Some(warning) = warning {
        eprintln!("Warning: {warning}");
    }
    Ok(())
}

/// Show configuration summary
fn cmd_status(cfg_dir: &Path) -> Result<()> {
    ensure_initialized(cfg_dir)?;

    let config = load_config(cfg_dir)?;
    let customers = load_customers(cfg_dir)?;
    let catalog = load_catalog(cfg_dir)?;
    let state = load_state(cfg_dir)?;

    let current_year = Local::now().year() as u32;
    let next_seq = state.counter.next_for(current_year);
    let next_number = format_invoice_number(&config.invoice.number_format, current_year, next_seq);

    println!("Billing Status");
    println!("{}", "-".repeat(50));
    println!("Config directory: {}", cfg_dir.display());
    println!("Seller:           {}", config.seller.name);
    println!("Customers:        {}", customers.len());
    println!("Products:         {}", catalog.products.len());
    println!("Next invoice:     {}", next_number);

    if !state.sales.is_empty() {
        println!();
        println!("Recent invoices:");
        for sale in state.sales.iter().rev().take(5) {
            println!(
                "  {} - {} - {} {:.2}",
                sale.invoice_no, sale.customer, config.invoice.currency_marker, sale.total
            );
        }
    }

    Ok(())
}

/// Generate a new invoice
fn cmd_generate(cfg_dir: &Path, request: &GenerateRequest, open: bool) -> Result<()> {
    ensure_initialized(cfg_dir)?;

    if request.items.is_empty() {
        return Err(BillingError::NoItems);
    }

    let config = load_config(cfg_dir)?;
    let generated = generate_invoice(cfg_dir, request)?;

    println!("Generated {}", generated.invoice_no);
    println!("  Customer: {}", request.customer);
    println!(
        "  Total:    {} {:.2}",
        config.invoice.currency_marker, generated.total
    );
    println!("  In words: {}", generated.amount_in_words);
    println!("  Pages:    {}", generated.page_count);
    println!("  Saved:    {}", generated.path.display());

    if open {
        open_path(&generated.path)?;
    }
    Ok(())
}

/// List or search recorded sales
fn cmd_sales(cfg_dir: &Path, query: &SalesQuery, limit: Option<usize>) -> Result<()> {
    ensure_initialized(cfg_dir)?;

    let config = load_config(cfg_dir)?;
    let state = load_state(cfg_dir)?;

    let found = search_sales(&state.sales, query)?;
    if state.sales.is_empty() {
        println!("No invoices generated yet.");
        return Ok(());
    }
    if found.is_empty() {
        println!("No matching sales.");
        return Ok(());
    }

    let shown = match limit {
        Some(n) => &found[..n.min(found.len())],
        None => &found[..],
    };

    let marker = &config.invoice.currency_marker;
    let rows: Vec<SaleRow> = shown
        .iter()
        .map(|(index, sale)| SaleRow {
            index: *index,
            invoice_no: sale.invoice_no.clone(),
            order_no: sale.order_no.clone(),
            order_date: sale.order_date.to_string(),
            invoice_date: sale.invoice_date.to_string(),
            total: format!("{marker} {:.2}", sale.total),
            customer: sale.customer.clone(),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    let shown_total: f64 = shown.iter().map(|(_, sale)| sale.total).sum();
    println!();
    println!(
        "Total: {} of {} invoices, {marker} {:.2}",
        shown.len(),
        state.sales.len(),
        shown_total
    );
    println!("Use the index number with open (e.g., 'billing open 1')");

    Ok(())
}

/// Open an invoice PDF
fn cmd_open(cfg_dir: &Path, invoice_ref: &str) -> Result<()> {
    ensure_initialized(cfg_dir)?;

    let state = load_state(cfg_dir)?;
    let invoice_no = resolve_invoice_number(&state.sales, invoice_ref)?;
    let pdf_path = get_invoice_path(cfg_dir, &invoice_no)?;

    open_path(&pdf_path)?;

    println!("Opened {}", pdf_path.display());
    Ok(())
}

/// Print an amount in words
fn cmd_words(amount: f64) -> Result<()> {
    println!("{}", number_to_words(amount)?);
    Ok(())
}

fn open_path(pdf_path: &Path) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(pdf_path).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(pdf_path).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", ""])
            .arg(pdf_path)
            .spawn()?;
    }
    Ok(())
}
