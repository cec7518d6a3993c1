mod catalog;
mod customer;
mod seller;
mod state;

pub use catalog::{default_id, Catalog, CatalogWarning, Category, Product, Subcategory};
pub use customer::Customer;
pub use seller::{BankConfig, Config, InvoiceSettings, PdfSettings, SellerConfig};
pub use state::{Counter, SaleRecord, State};

use crate::error::{BillingError, Result};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Get the config directory path (XDG config dir, or ~/.billing/)
pub fn config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "billing") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    let home = dirs_home().ok_or_else(|| {
        BillingError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".billing"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_home() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Output directory from config; relative paths are taken from the config dir.
pub fn resolve_output_dir(output_dir: &str, cfg_dir: &Path) -> PathBuf {
    let path = expand_path(output_dir);
    if path.is_absolute() {
        path
    } else {
        cfg_dir.join(path)
    }
}

fn load_toml<T: DeserializeOwned>(path: PathBuf) -> Result<T> {
    if !path.exists() {
        return Err(BillingError::ConfigFileNotFound(path));
    }
    debug!(path = %path.display(), "loading");
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| BillingError::ConfigParse { path, source: e })
}

/// Load the main config.toml
pub fn load_config(config_dir: &Path) -> Result<Config> {
    load_toml(config_dir.join("config.toml"))
}

/// Load customers.toml as a HashMap keyed by customer id
pub fn load_customers(config_dir: &Path) -> Result<HashMap<String, Customer>> {
    load_toml(config_dir.join("customers.toml"))
}

/// Load catalog.toml and check its references
pub fn load_catalog(config_dir: &Path) -> Result<Catalog> {
    let catalog: Catalog = load_toml(config_dir.join("catalog.toml"))?;
    catalog.validate()?;
    Ok(catalog)
}

/// Load state.toml (default if missing)
pub fn load_state(config_dir: &Path) -> Result<State> {
    let path = config_dir.join("state.toml");
    if !path.exists() {
        return Ok(State::default());
    }
    load_toml(path)
}

fn save_toml<T: serde::Serialize>(path: PathBuf, value: &T) -> Result<()> {
    let content = toml::to_string_pretty(value).map_err(|e| {
        BillingError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e.to_string(),
        ))
    })?;
    debug!(path = %path.display(), "saving");
    fs::write(path, content)?;
    Ok(())
}

/// Save state.toml
pub fn save_state(config_dir: &Path, state: &State) -> Result<()> {
    save_toml(config_dir.join("state.toml"), state)
}

/// Save catalog.toml; comments in the file are not preserved.
pub fn save_catalog(config_dir: &Path, catalog: &Catalog) -> Result<()> {
    save_toml(config_dir.join("catalog.toml"), catalog)
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[seller]
name = "Your Firm Name"
address = "Building, Street"
district = "District"
state = "State"
pincode = "000000"
phone = "0000000000"
email = "sales@yourfirm.example"
gst = "00AAAAA0000A0Z0"

[seller.bank]
account_no = "000000000000"
name = "Bank Name"
branch = "Branch"
ifsc = "BANK0000000"

[invoice]
# Placeholders: {year}, {next_yy} (two-digit following year), {seq},
# {seq:03}, {seq:04}, {seq:05}
number_format = "OT-{year}-{next_yy}-{seq}"   # e.g., OT-2026-27-1
currency_marker = "Rs."
date_format = "%d-%m-%Y"
payment_mode = "Cash"                         # default for --payment

[pdf]
output_dir = "output"   # relative to this directory, or absolute / ~/...
# title = "BILL OF SUPPLY"
# subtitle = "(Composition Taxable Person, Not Eligible To Collect Tax on Supplies)"
# footer = "Thank you for your business!"
# stamp_note = "(Rubber stamp of the firm)"
"#;

/// Template content for customers.toml
pub const CUSTOMERS_TEMPLATE: &str = r#"# Define your customers here. The table name (e.g., [example-customer]) is
# used as the customer identifier in the generate command.
#
# Example:
#   billing generate --customer example-customer --order A-1 --item copper-wire:2:1450

[example-customer]
name = "Example Customer"
phone = "9000000000"
email = "customer@example.com"   # optional
address = "House No, Street"
district = "District"
state = "State"
pincode = "000000"
"#;

/// Template content for catalog.toml
pub const CATALOG_TEMPLATE: &str = r#"# Categories group subcategories; subcategories group products.
# Product ids (e.g., [products.copper-wire]) are used in --item.

[categories.electrical]
name = "Electrical"

[subcategories.wires]
name = "Wires & Cables"
category = "electrical"

[subcategories.switches]
name = "Switches & Sockets"
category = "electrical"

[products.copper-wire]
description = "Copper wire 1.5 sq mm, 90 m coil"
hsn = "8544"
subcategory = "wires"

[products.modular-switch]
description = "Modular switch 6A, one way"
hsn = "8536"
subcategory = "switches"
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_parse() {
        let config: Config = toml::from_str(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.invoice.currency_marker, "Rs.");
        let customers: HashMap<String, Customer> = toml::from_str(CUSTOMERS_TEMPLATE).unwrap();
        assert!(customers.contains_key("example-customer"));
        let catalog: Catalog = toml::from_str(CATALOG_TEMPLATE).unwrap();
        assert!(catalog.validate().is_ok());
    }

    #[test]
    fn test_relative_output_dir_is_under_config_dir() {
        let cfg = Path::new("/tmp/billing-cfg");
        assert_eq!(resolve_output_dir("output", cfg), cfg.join("output"));
        assert_eq!(resolve_output_dir("/srv/pdf", cfg), PathBuf::from("/srv/pdf"));
    }

    #[test]
    fn test_missing_file_and_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_config(dir.path()),
            Err(BillingError::ConfigFileNotFound(_))
        ));
        fs::write(dir.path().join("customers.toml"), "[broken").unwrap();
        assert!(matches!(
            load_customers(dir.path()),
            Err(BillingError::ConfigParse { .. })
        ));
        assert!(load_state(dir.path()).unwrap().sales.is_empty());
    }

    #[test]
    fn test_saved_catalog_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog: Catalog = toml::from_str(CATALOG_TEMPLATE).unwrap();
        catalog.add_category("lighting", "Lighting").unwrap();
        catalog
            .add_subcategory("led-bulbs", "LED Bulbs", "lighting")
            .unwrap();
        catalog
            .add_product("led-9w", "LED bulb 9W", "8539", "led-bulbs")
            .unwrap();
        save_catalog(dir.path(), &catalog).unwrap();

        let loaded = load_catalog(dir.path()).unwrap();
        assert_eq!(loaded.products.len(), 3);
        assert_eq!(loaded.category_of(loaded.product("led-9w").unwrap()), Some("lighting"));
        assert!(loaded.product("copper-wire").is_ok());
    }
}
