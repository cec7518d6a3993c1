//! Everything below the line-item table: the grand-total band, payment and
//! bank details, the signature block, the footer and page numbers.

use super::blocks::{section_style, MARGIN_LEFT, RIGHT_COLUMN_X, SUBTITLE_COLOR, TITLE_COLOR};
use super::display_list::{PAGE_HEIGHT, PAGE_WIDTH};
use super::surface::{Align, Color, Font, Paint, Rect, Surface, TextOptions, TextStyle};
use super::table::TableGeometry;
use crate::invoice::Seller;

const BAND_FILL: &str = "#ecf0f1";
const MUTED: &str = "#7f8c8d";

const BAND_MIN_HEIGHT: f32 = 14.0;
const BAND_LINE_HEIGHT: f32 = 5.0;
const BAND_PADDING: f32 = 8.0;
const LABEL: &str = "Grand Total:";
const LABEL_FONT: Font = Font::bold(10.0);
const WORDS_FONT: Font = Font::regular(10.0);

/// Distance from the band's bottom edge to the stamp note baseline.
pub const CLOSING_BLOCK_HEIGHT: f32 = 15.0 + 18.0 + 8.0 + 6.0 * 3.0 + 5.0 * 3.0;

/// Baseline of the footer message.
pub const FOOTER_Y: f32 = PAGE_HEIGHT - 30.0;

/// Lowest baseline for the stamp note. The signature column sits right of
/// the footer message, so only the page number below constrains it.
pub const CLOSING_LIMIT: f32 = PAGE_HEIGHT - 22.0;

const PAGE_NUMBER_X: f32 = PAGE_WIDTH - 40.0;
const PAGE_NUMBER_Y: f32 = PAGE_HEIGHT - 15.0;

fn words_x<S: Surface + ?Sized>(surface: &S, geometry: &TableGeometry) -> f32 {
    geometry.start_x + 2.0 + surface.text_width(LABEL, WORDS_FONT) + 4.0
}

fn marker_x(geometry: &TableGeometry) -> f32 {
    geometry.column_x(4) + geometry.column_widths[4] * 0.88
}

/// Wrap width of the amount in words.
///
/// Nominally the span from 40% into the HSN column to the end of the unit
/// price column, cut short so the words never run under the currency marker.
pub fn words_width<S: Surface + ?Sized>(surface: &S, marker: &str, geometry: &TableGeometry) -> f32 {
    let w = &geometry.column_widths;
    let span = 0.4 * w[1] + w[2] + w[3] + w[4];
    let marker_left = marker_x(geometry) - surface.text_width(marker, LABEL_FONT) / 2.0;
    span.min(marker_left - 2.0 - words_x(surface, geometry))
}

pub fn band_height(lines: usize) -> f32 {
    (lines as f32 * BAND_LINE_HEIGHT + BAND_PADDING).max(BAND_MIN_HEIGHT)
}

/// Wrapped amount-in-words lines and the band height they need.
pub fn measure_band<S: Surface + ?Sized>(
    surface: &S,
    words: &str,
    marker: &str,
    geometry: &TableGeometry,
) -> (Vec<String>, f32) {
    let lines = surface.split_text_to_size(words, words_width(surface, marker, geometry), WORDS_FONT);
    let height = band_height(lines.len());
    (lines, height)
}

/// Draw the shaded grand-total band with its top edge at `y`. Returns the
/// band's bottom edge.
pub fn draw_grand_total<S: Surface + ?Sized>(
    surface: &mut S,
    y: f32,
    grand_total: f64,
    words: &str,
    marker: &str,
    geometry: &TableGeometry,
) -> f32 {
    let (lines, height) = measure_band(surface, words, marker, geometry);
    let width = geometry.table_width();
    let mid = y + height / 2.0;
    let ink = Color::hex(TITLE_COLOR);

    surface.rect(
        Rect::new(geometry.start_x, y, width, height),
        Paint::Fill(Color::hex(BAND_FILL)),
    );
    surface.text(
        LABEL,
        geometry.start_x + 2.0,
        mid,
        TextStyle::new(LABEL_FONT, ink),
        TextOptions::middle(Align::Left),
    );

    let x = words_x(surface, geometry);
    let first = mid - (lines.len() as f32 - 1.0) * BAND_LINE_HEIGHT / 2.0;
    for (i, line) in lines.iter().enumerate() {
        surface.text(
            line,
            x,
            first + i as f32 * BAND_LINE_HEIGHT,
            TextStyle::new(WORDS_FONT, ink),
            TextOptions::middle(Align::Left),
        );
    }

    surface.text(
        &format!("{grand_total:.2}"),
        geometry.start_x + width - 6.0,
        mid,
        TextStyle::new(LABEL_FONT, ink),
        TextOptions::middle(Align::Right),
    );
    surface.text(
        marker,
        marker_x(geometry),
        mid + 1.2,
        TextStyle::new(LABEL_FONT, Color::hex(SUBTITLE_COLOR)),
        TextOptions::aligned(Align::Center),
    );

    y + height
}

/// Payment mode, bank details and the signature block, starting below a
/// band whose bottom edge is `y`. Returns the stamp note baseline.
pub fn draw_closing_block<S: Surface + ?Sized>(
    surface: &mut S,
    y: f32,
    seller: &Seller,
    payment_mode: &str,
    stamp_note: &str,
) -> f32 {
    let heading = section_style();
    let value_font = Font::regular(12.0);
    let value = TextStyle::new(value_font, Color::BLACK);

    let mut y = y + 15.0;
    surface.text("Payment Mode:", MARGIN_LEFT, y, heading, TextOptions::LEFT);
    let offset = surface.text_width("Payment Mode:", heading.font) + 3.0;
    surface.text(payment_mode, MARGIN_LEFT + offset, y, value, TextOptions::LEFT);

    y += 18.0;
    surface.text("Bank Details:", MARGIN_LEFT, y, heading, TextOptions::LEFT);
    y += 8.0;

    let bank = &seller.bank;
    let fields = [
        ("A/C No:", bank.account_no.as_str()),
        ("IFSC:", bank.ifsc_code.as_str()),
        ("Bank Name:", bank.bank_name.as_str()),
        ("Branch:", bank.branch.as_str()),
    ];
    for (i, (label, text)) in fields.iter().enumerate() {
        if i > 0 {
            y += 6.0;
        }
        surface.text(label, MARGIN_LEFT, y, value, TextOptions::LEFT);
        let offset = surface.text_width(label, value_font) + 2.0;
        surface.text(text, MARGIN_LEFT + offset, y, value, TextOptions::LEFT);
    }

    y += 5.0;
    surface.text("Signature:", RIGHT_COLUMN_X, y, value, TextOptions::LEFT);
    y += 5.0;
    surface.text(
        &format!("For {}", seller.name),
        RIGHT_COLUMN_X,
        y,
        TextStyle::new(Font::bold(14.0), Color::BLACK),
        TextOptions::LEFT,
    );
    y += 5.0;
    surface.text(
        stamp_note,
        RIGHT_COLUMN_X,
        y,
        TextStyle::new(Font::regular(10.0), Color::BLACK),
        TextOptions::LEFT,
    );
    y
}

pub fn draw_footer<S: Surface + ?Sized>(surface: &mut S, message: &str) {
    surface.text(
        message,
        PAGE_WIDTH / 2.0,
        FOOTER_Y,
        TextStyle::new(Font::italic(12.0), Color::hex(MUTED)),
        TextOptions::aligned(Align::Center),
    );
}

/// Stamp `Page i of N` on every page. Must run after all content is laid
/// out; leaves the last page selected.
pub fn stamp_page_numbers<S: Surface + ?Sized>(surface: &mut S) {
    let total = surface.page_count();
    let style = TextStyle::new(Font::regular(8.0), Color::hex(MUTED));
    for page in 0..total {
        surface.set_page(page);
        surface.text(
            &format!("Page {} of {}", page + 1, total),
            PAGE_NUMBER_X,
            PAGE_NUMBER_Y,
            style,
            TextOptions::LEFT,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::BankDetails;
    use crate::layout::display_list::{DisplayList, DrawOp};

    fn seller() -> Seller {
        Seller {
            name: "Omnibus Traders".to_string(),
            address_lines: vec!["Market Road".to_string()],
            phone: "0484 200100".to_string(),
            email: "sales@omnibus.example".to_string(),
            tax_id: "32ABCDE1234F1Z5".to_string(),
            bank: BankDetails {
                account_no: "12345678901".to_string(),
                bank_name: "Federal Bank".to_string(),
                branch: "Aluva".to_string(),
                ifsc_code: "FDRL0000123".to_string(),
            },
        }
    }

    fn text_at(doc: &DisplayList, needle: &str) -> Option<(f32, f32)> {
        doc.pages
            .iter()
            .flat_map(|p| p.texts())
            .find(|(text, _, _)| *text == needle)
            .map(|(_, x, y)| (x, y))
    }

    #[test]
    fn test_band_height_has_a_floor() {
        assert_eq!(band_height(1), 14.0);
        assert_eq!(band_height(2), 18.0);
        assert_eq!(band_height(3), 23.0);
    }

    #[test]
    fn test_words_stay_clear_of_currency_marker() {
        let doc = DisplayList::a4();
        let geometry = TableGeometry::default();
        let width = words_width(&doc, "Rs.", &geometry);
        let end = words_x(&doc, &geometry) + width;
        let marker_left = marker_x(&geometry) - doc.text_width("Rs.", LABEL_FONT) / 2.0;
        assert!(end < marker_left);
        assert!(width > 100.0);
    }

    #[test]
    fn test_grand_total_band_contents() {
        let mut doc = DisplayList::a4();
        let geometry = TableGeometry::default();
        let words = "Thirty Five Rupees and Seventy Five Paise Only";
        let bottom = draw_grand_total(&mut doc, 150.0, 35.75, words, "Rs.", &geometry);

        assert_eq!(bottom, 164.0);
        let (x, y) = text_at(&doc, "35.75").unwrap();
        assert_eq!(x, geometry.start_x + geometry.table_width() - 6.0);
        assert_eq!(y, 157.0);
        assert!(doc.pages[0].contains_text(words));
        assert!(doc.pages[0].contains_text("Rs."));
        assert!(matches!(
            doc.pages[0].ops[0],
            DrawOp::Rect {
                paint: Paint::Fill(_),
                ..
            }
        ));
    }

    #[test]
    fn test_closing_block_height_matches_constant() {
        let mut doc = DisplayList::a4();
        let end = draw_closing_block(&mut doc, 100.0, &seller(), "Cash", "(Rubber stamp)");
        assert_eq!(end, 100.0 + CLOSING_BLOCK_HEIGHT);
        assert!(doc.pages[0].contains_text("For Omnibus Traders"));
        assert!(doc.pages[0].contains_text("FDRL0000123"));
    }

    #[test]
    fn test_bank_values_follow_their_labels() {
        let mut doc = DisplayList::a4();
        draw_closing_block(&mut doc, 100.0, &seller(), "Cash", "(Rubber stamp)");
        let label_width = doc.text_width("Bank Name:", Font::regular(12.0));
        let (x, _) = text_at(&doc, "Federal Bank").unwrap();
        assert!(x > MARGIN_LEFT + label_width);
    }

    #[test]
    fn test_page_numbers_on_every_page() {
        let mut doc = DisplayList::a4();
        doc.add_page();
        doc.add_page();
        stamp_page_numbers(&mut doc);

        for (i, page) in doc.pages.iter().enumerate() {
            assert!(page.contains_text(&format!("Page {} of 3", i + 1)));
        }
        assert_eq!(doc.current_page(), 2);
    }
}
