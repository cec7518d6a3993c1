//! Searching the sales record by order number and order-date range.

use chrono::NaiveDate;

use crate::config::SaleRecord;
use crate::error::{BillingError, Result};

/// Parse a `YYYY-MM-DD` command-line date.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| BillingError::InvalidDate(input.to_string()))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesQuery {
    pub order_no: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl SalesQuery {
    /// Both bounds are inclusive; `from` may not be after `to`.
    pub fn validate(&self) -> Result<()> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err(BillingError::InvalidDateRange {
                    from: from.to_string(),
                    to: to.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn matches(&self, record: &SaleRecord) -> bool {
        let order_matches = self
            .order_no
            .as_deref()
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map_or(true, |o| record.order_no.eq_ignore_ascii_case(o));
        let after_from = self.from.map_or(true, |from| record.order_date >= from);
        let before_to = self.to.map_or(true, |to| record.order_date <= to);
        order_matches && after_from && before_to
    }
}

/// Matching records, newest first, each paired with its 1-based index in
/// the newest-first listing.
pub fn search_sales<'a>(
    records: &'a [SaleRecord],
    query: &SalesQuery,
) -> Result<Vec<(usize, &'a SaleRecord)>> {
    query.validate()?;
    Ok(records
        .iter()
        .rev()
        .enumerate()
        .filter(|(_, r)| query.matches(r))
        .map(|(i, r)| (i + 1, r))
        .collect())
}
