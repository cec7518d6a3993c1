use serde::{Deserialize, Serialize};

use crate::invoice::{BankDetails, Seller};
use crate::layout::LayoutOptions;

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub seller: SellerConfig,
    #[serde(default)]
    pub invoice: InvoiceSettings,
    #[serde(default)]
    pub pdf: PdfSettings,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SellerConfig {
    pub name: String,
    pub address: String,
    pub district: String,
    pub state: String,
    pub pincode: String,
    pub phone: String,
    pub email: String,
    /// GST registration number.
    pub gst: String,
    pub bank: BankConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BankConfig {
    pub account_no: String,
    pub name: String,
    pub branch: String,
    pub ifsc: String,
}

impl SellerConfig {
    pub fn to_seller(&self) -> Seller {
        Seller {
            name: self.name.clone(),
            address_lines: vec![
                self.address.clone(),
                format!("{}, {} - {}", self.district, self.state, self.pincode),
            ],
            phone: self.phone.clone(),
            email: self.email.clone(),
            tax_id: self.gst.clone(),
            bank: BankDetails {
                account_no: self.bank.account_no.clone(),
                bank_name: self.bank.name.clone(),
                branch: self.bank.branch.clone(),
                ifsc_code: self.bank.ifsc.clone(),
            },
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct InvoiceSettings {
    pub number_format: String,
    pub currency_marker: String,
    /// chrono format string used for dates printed on the invoice.
    pub date_format: String,
    pub payment_mode: String,
}

impl Default for InvoiceSettings {
    fn default() -> Self {
        Self {
            number_format: "OT-{year}-{next_yy}-{seq}".to_string(),
            currency_marker: "Rs.".to_string(),
            date_format: "%d-%m-%Y".to_string(),
            payment_mode: "Cash".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct PdfSettings {
    pub output_dir: String,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub footer: Option<String>,
    pub stamp_note: Option<String>,
}

impl Default for PdfSettings {
    fn default() -> Self {
        Self {
            output_dir: "output".to_string(),
            title: None,
            subtitle: None,
            footer: None,
            stamp_note: None,
        }
    }
}

impl Config {
    /// Fixed invoice texts, falling back to the built-in wording for
    /// anything the config leaves out.
    pub fn layout_options(&self) -> LayoutOptions {
        let defaults = LayoutOptions::default();
        LayoutOptions {
            title: self.pdf.title.clone().unwrap_or(defaults.title),
            subtitle: self.pdf.subtitle.clone().unwrap_or(defaults.subtitle),
            footer: self.pdf.footer.clone().unwrap_or(defaults.footer),
            stamp_note: self.pdf.stamp_note.clone().unwrap_or(defaults.stamp_note),
            currency_marker: self.invoice.currency_marker.clone(),
        }
    }
}
