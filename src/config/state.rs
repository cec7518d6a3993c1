use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct State {
    pub counter: Counter,
    #[serde(default)]
    pub sales: Vec<SaleRecord>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Counter {
    pub last_number: u32,
    pub last_year: u32,
}

impl Default for Counter {
    fn default() -> Self {
        Self {
            last_number: 0,
            last_year: Local::now().year() as u32,
        }
    }
}

impl Counter {
    /// Sequence number the next invoice issued in `year` receives; the
    /// count restarts at 1 every calendar year.
    pub fn next_for(&self, year: u32) -> u32 {
        if self.last_year == year {
            self.last_number + 1
        } else {
            1
        }
    }
}

/// One generated invoice as kept in the sales record.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SaleRecord {
    pub order_no: String,
    pub order_date: NaiveDate,
    pub invoice_no: String,
    pub invoice_date: NaiveDate,
    pub total: f64,
    /// PDF file name relative to the output directory, or an absolute path
    /// when `--output` was given.
    pub file: String,
    pub customer: String,
    /// Original item inputs (e.g., ["copper-wire:2:1450"])
    #[serde(default)]
    pub items: Vec<String>,
}
