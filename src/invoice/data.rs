use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankDetails {
    pub account_no: String,
    pub bank_name: String,
    pub branch: String,
    pub ifsc_code: String,
}

/// The issuing firm as printed in the header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seller {
    pub name: String,
    pub address_lines: Vec<String>,
    pub phone: String,
    pub email: String,
    pub tax_id: String,
    pub bank: BankDetails,
}

impl Seller {
    /// Detail column under the seller name.
    pub fn detail_lines(&self) -> Vec<String> {
        let mut lines = self.address_lines.clone();
        lines.push(format!("Phone: {}", self.phone));
        lines.push(format!("Email: {}", self.email));
        lines.push(format!("GST No: {}", self.tax_id));
        lines
    }
}

/// Billed or shipped-to customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Party {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    pub address_lines: Vec<String>,
    pub district: String,
    pub state: String,
    pub pincode: String,
}

impl Party {
    pub fn locality_line(&self) -> String {
        format!("{}, {} - {}", self.district, self.state, self.pincode)
    }
}

/// Ordered label/value pairs shown under "Invoice Details".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderInfo(Vec<(String, String)>);

impl OrderInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.push((key.into(), value.into()));
        self
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `"<Spaced Label>: <value>"` for each entry, in insertion order.
    pub fn display_lines(&self) -> Vec<String> {
        self.0
            .iter()
            .map(|(key, value)| format!("{}: {}", spaced_label(key), value))
            .collect()
    }
}

/// Insert a space before every capital letter after the first character:
/// `InvoiceDate` → `Invoice Date`.
pub fn spaced_label(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if i > 0 && c.is_ascii_uppercase() && !out.ends_with(' ') {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub serial: u32,
    pub hsn_code: String,
    pub description: String,
    pub qty: f64,
    pub unit_price: f64,
    /// `qty * unit_price` rounded to two decimals.
    pub line_total: f64,
}

impl LineItem {
    pub fn new(
        serial: u32,
        hsn_code: impl Into<String>,
        description: impl Into<String>,
        qty: f64,
        unit_price: f64,
    ) -> Self {
        Self {
            serial,
            hsn_code: hsn_code.into(),
            description: description.into(),
            qty,
            unit_price,
            line_total: round2(qty * unit_price),
        }
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Everything one layout run needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceData {
    pub seller: Seller,
    pub order: OrderInfo,
    pub bill_to: Party,
    pub ship_to: Party,
    pub line_items: Vec<LineItem>,
    pub payment_mode: String,
}

impl InvoiceData {
    pub fn invoice_no(&self) -> Option<&str> {
        self.order.get("InvoiceNo")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spaced_label() {
        assert_eq!(spaced_label("OrderNo"), "Order No");
        assert_eq!(spaced_label("InvoiceDate"), "Invoice Date");
        assert_eq!(spaced_label("Reference"), "Reference");
        assert_eq!(spaced_label("Due Date"), "Due Date");
    }

    #[test]
    fn test_order_info_keeps_insertion_order() {
        let order = OrderInfo::new()
            .with("OrderNo", "A-17")
            .with("OrderDate", "01-04-2026")
            .with("InvoiceNo", "OT-2026-27-1");
        assert_eq!(
            order.display_lines(),
            vec![
                "Order No: A-17".to_string(),
                "Order Date: 01-04-2026".to_string(),
                "Invoice No: OT-2026-27-1".to_string(),
            ]
        );
        assert_eq!(order.get("InvoiceNo"), Some("OT-2026-27-1"));
    }

    #[test]
    fn test_line_total_rounds_to_paise() {
        let item = LineItem::new(1, "8544", "Wire", 3.0, 33.33);
        assert_eq!(item.line_total, 99.99);
        let item = LineItem::new(2, "8536", "Switch", 2.0, 10.25);
        assert_eq!(item.line_total, 20.5);
    }
}
