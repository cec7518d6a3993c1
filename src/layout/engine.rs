use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::blocks::{draw_billing_shipping, draw_heading, draw_page_frame, draw_seller_and_order};
use super::summary::{
    draw_closing_block, draw_footer, draw_grand_total, measure_band, stamp_page_numbers,
    CLOSING_BLOCK_HEIGHT, CLOSING_LIMIT,
};
use super::display_list::{PAGE_HEIGHT, PAGE_WIDTH};
use super::surface::Surface;
use super::table::{draw_product_table, TableGeometry, TableRow};
use super::words::{number_to_words, WordsError};
use crate::invoice::{round2, InvoiceData};

/// Cursor position of the first block below the heading.
const CONTENT_TOP: f32 = 45.0;
/// Gap between the billing divider and the table header anchor.
const TABLE_GAP: f32 = 3.0;
/// Gap between the last table row and the grand-total band.
const BAND_GAP: f32 = 6.0;

/// Fixed texts printed on every invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    pub title: String,
    pub subtitle: String,
    pub footer: String,
    pub stamp_note: String,
    pub currency_marker: String,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            title: "BILL OF SUPPLY".to_string(),
            subtitle: "(Composition Taxable Person, Not Eligible To Collect Tax on Supplies)"
                .to_string(),
            footer: "Thank you for your business!".to_string(),
            stamp_note: "(Rubber stamp of the firm)".to_string(),
            currency_marker: "Rs.".to_string(),
        }
    }
}

/// Mutable state of one layout run.
#[derive(Debug, Clone, Copy, PartialEq)]
struct LayoutState {
    y: f32,
    page: usize,
    grand_total: f64,
}

/// What a finished layout run reports back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutSummary {
    /// Sum of the table's totals, rounded to paise.
    pub grand_total: f64,
    pub amount_in_words: String,
    pub page_count: usize,
}

/// Lay out a complete invoice on `surface`.
///
/// The surface must be freshly created with one empty page. Fails only when
/// the grand total cannot be spelled out; in that case the surface contents
/// are incomplete and must be discarded.
pub fn layout_invoice<S: Surface + ?Sized>(
    surface: &mut S,
    invoice: &InvoiceData,
    options: &LayoutOptions,
) -> Result<LayoutSummary, WordsError> {
    let geometry = TableGeometry::default();
    let mut state = LayoutState {
        y: CONTENT_TOP,
        page: surface.current_page(),
        grand_total: 0.0,
    };

    draw_page_frame(surface, PAGE_WIDTH, PAGE_HEIGHT);
    draw_heading(surface, &options.title, &options.subtitle);

    state.y = draw_seller_and_order(surface, &invoice.seller, &invoice.order, state.y);
    state.y = draw_billing_shipping(surface, &invoice.bill_to, &invoice.ship_to, state.y);

    let rows: Vec<TableRow> = invoice.line_items.iter().map(TableRow::from).collect();
    let outcome = draw_product_table(surface, &rows, state.y + TABLE_GAP, &geometry);
    state.y = outcome.y + BAND_GAP;
    state.page = outcome.last_page;
    state.grand_total = outcome.grand_total;

    let grand_total = round2(state.grand_total);
    let words = number_to_words(grand_total)?;

    surface.set_page(state.page);
    let (_, band) = measure_band(surface, &words, &options.currency_marker, &geometry);
    if state.y + band + CLOSING_BLOCK_HEIGHT > CLOSING_LIMIT {
        state.page = surface.add_page();
        state.y = geometry.continuation_top;
        debug!(page = state.page, "grand total moves to a new page");
    }

    let band_bottom = draw_grand_total(
        surface,
        state.y,
        grand_total,
        &words,
        &options.currency_marker,
        &geometry,
    );
    draw_closing_block(
        surface,
        band_bottom,
        &invoice.seller,
        &invoice.payment_mode,
        &options.stamp_note,
    );
    draw_footer(surface, &options.footer);

    stamp_page_numbers(surface);

    let page_count = surface.page_count();
    info!(
        invoice = invoice.invoice_no().unwrap_or("unknown"),
        rows = rows.len(),
        pages = page_count,
        grand_total,
        "invoice laid out"
    );

    Ok(LayoutSummary {
        grand_total,
        amount_in_words: words,
        page_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::{BankDetails, LineItem, OrderInfo, Party, Seller};
    use crate::layout::display_list::{DisplayList, DrawOp};
    use crate::layout::surface::Paint;

    fn party(name: &str) -> Party {
        Party {
            name: name.to_string(),
            phone: "9847012345".to_string(),
            email: Some("buyer@example.com".to_string()),
            address_lines: vec!["14/220 Temple Road, Near Bus Stand".to_string()],
            district: "Thrissur".to_string(),
            state: "Kerala".to_string(),
            pincode: "680001".to_string(),
        }
    }

    fn invoice(items: Vec<LineItem>) -> InvoiceData {
        InvoiceData {
            seller: Seller {
                name: "Omnibus Traders".to_string(),
                address_lines: vec![
                    "Main Road, Perumbavoor".to_string(),
                    "Ernakulam, Kerala - 683542".to_string(),
                ],
                phone: "9447000000".to_string(),
                email: "omnibus@example.com".to_string(),
                tax_id: "32AAAAA0000A1Z5".to_string(),
                bank: BankDetails {
                    account_no: "0123456789".to_string(),
                    bank_name: "State Bank of India".to_string(),
                    branch: "Perumbavoor".to_string(),
                    ifsc_code: "SBIN0000001".to_string(),
                },
            },
            order: OrderInfo::new()
                .with("OrderNo", "A-1001")
                .with("OrderDate", "02-04-2026")
                .with("InvoiceNo", "OT-2026-27-1")
                .with("InvoiceDate", "03-04-2026"),
            bill_to: party("Anitha Menon"),
            ship_to: party("Anitha Menon"),
            line_items: items,
            payment_mode: "UPI".to_string(),
        }
    }

    fn items(n: u32) -> Vec<LineItem> {
        (1..=n)
            .map(|i| LineItem::new(i, "8539", "LED bulb 9W", 2.0, 60.5))
            .collect()
    }

    fn band_page(doc: &DisplayList) -> usize {
        doc.pages
            .iter()
            .position(|p| p.contains_text("Grand Total:"))
            .expect("grand total drawn")
    }

    #[test]
    fn test_single_page_invoice() {
        let mut doc = DisplayList::a4();
        let summary = layout_invoice(&mut doc, &invoice(items(3)), &LayoutOptions::default()).unwrap();

        assert_eq!(summary.page_count, 1);
        assert_eq!(summary.grand_total, 363.0);
        assert_eq!(summary.amount_in_words, "Three Hundred Sixty Three Rupees Only");
        let page = &doc.pages[0];
        assert!(page.contains_text("BILL OF SUPPLY"));
        assert!(page.contains_text("Invoice No: OT-2026-27-1"));
        assert!(page.contains_text("363.00"));
        assert!(page.contains_text("For Omnibus Traders"));
        assert!(page.contains_text("Thank you for your business!"));
        assert!(page.contains_text("Page 1 of 1"));
    }

    #[test]
    fn test_layout_is_deterministic() {
        let data = invoice(items(45));
        let options = LayoutOptions::default();
        let mut first = DisplayList::a4();
        let mut second = DisplayList::a4();
        layout_invoice(&mut first, &data, &options).unwrap();
        layout_invoice(&mut second, &data, &options).unwrap();
        assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
    }

    #[test]
    fn test_summary_follows_table_onto_its_last_page() {
        let mut doc = DisplayList::a4();
        let summary = layout_invoice(&mut doc, &invoice(items(30)), &LayoutOptions::default()).unwrap();

        assert_eq!(summary.page_count, 2);
        assert_eq!(band_page(&doc), 1);
        assert!(doc.pages[1].contains_text("30"));
        for (i, page) in doc.pages.iter().enumerate() {
            assert!(page.contains_text(&format!("Page {} of {}", i + 1, summary.page_count)));
        }
        // The frame is drawn once, on the first page.
        let frames = doc
            .pages
            .iter()
            .map(|p| p.ops.iter().filter(|op| matches!(op, DrawOp::RoundedRect { .. })).count())
            .collect::<Vec<_>>();
        assert_eq!(frames[0], 1);
        assert!(frames[1..].iter().all(|&n| n == 0));
    }

    #[test]
    fn test_band_and_closing_block_move_together() {
        // Find an item count whose table ends too low for the closing block.
        for n in 1..60 {
            let mut doc = DisplayList::a4();
            layout_invoice(&mut doc, &invoice(items(n)), &LayoutOptions::default()).unwrap();
            let page = band_page(&doc);
            let last = &doc.pages[page];
            assert!(last.contains_text("Payment Mode:"));
            assert!(last.contains_text("(Rubber stamp of the firm)"));
            for (text, _, y) in last.texts() {
                if text == "(Rubber stamp of the firm)" {
                    assert!(y <= CLOSING_LIMIT + 1e-3, "{n} items: stamp note at {y}");
                }
            }
        }
    }

    #[test]
    fn test_band_alone_on_overflow_page_has_no_table_rows() {
        let mut moved = false;
        for n in 1..60 {
            let mut doc = DisplayList::a4();
            layout_invoice(&mut doc, &invoice(items(n)), &LayoutOptions::default()).unwrap();
            let page = band_page(&doc);
            let stroked = doc.pages[page]
                .ops
                .iter()
                .any(|op| matches!(op, DrawOp::Rect { paint: Paint::Stroke(_), .. }));
            if !stroked {
                moved = true;
                assert_eq!(page, doc.page_count() - 1);
            }
        }
        assert!(moved, "no item count pushed the summary onto its own page");
    }

    #[test]
    fn test_overflowing_total_is_an_error() {
        let big = vec![LineItem::new(1, "8703", "Fleet", 10.0, 100_000_000.0)];
        let mut doc = DisplayList::a4();
        let err = layout_invoice(&mut doc, &invoice(big), &LayoutOptions::default()).unwrap_err();
        assert!(matches!(err, WordsError::Overflow(_)));
    }
}
