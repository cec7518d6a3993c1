//! The line-item table: wrapped descriptions, centred cells and page breaks
//! that never split a row.

use serde::Serialize;
use tracing::debug;

use super::surface::{Align, Color, Font, Paint, Rect, Stroke, Surface, TextOptions, TextStyle};
use crate::invoice::LineItem;

pub const HEADERS: [&str; 6] = ["Sl No", "HSN Code", "Description", "Qty", "Unit Price", "Total"];

pub const COLUMN_WIDTHS: [f32; 6] = [15.0, 30.0, 66.0, 15.0, 27.0, 27.0];

const DESCRIPTION: usize = 2;
const TOTAL: usize = 5;

/// Header band extends this far above and below its anchor line.
pub const HEADER_HALF_HEIGHT: f32 = 5.0;

const HEADER_FONT: Font = Font::bold(12.0);
const ROW_FONT: Font = Font::regular(10.0);

const HEADER_FILL: &str = "#ecf0f1";
const HEADER_TEXT: &str = "#34495e";
const BORDER: &str = "#7f8c8d";
const BORDER_WIDTH: f32 = 0.3;

/// One table row as rendered cell text, in [`HEADERS`] order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub cells: [String; 6],
}

impl TableRow {
    pub fn new(
        serial: impl Into<String>,
        hsn: impl Into<String>,
        description: impl Into<String>,
        qty: impl Into<String>,
        unit_price: impl Into<String>,
        total: impl Into<String>,
    ) -> Self {
        Self {
            cells: [
                serial.into(),
                hsn.into(),
                description.into(),
                qty.into(),
                unit_price.into(),
                total.into(),
            ],
        }
    }

    pub fn description(&self) -> &str {
        &self.cells[DESCRIPTION]
    }

    /// Numeric value of the total cell; anything unparseable counts as zero.
    pub fn total_value(&self) -> f64 {
        self.cells[TOTAL]
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }
}

impl From<&LineItem> for TableRow {
    fn from(item: &LineItem) -> Self {
        TableRow::new(
            item.serial.to_string(),
            item.hsn_code.clone(),
            item.description.clone(),
            format_quantity(item.qty),
            format!("{:.2}", item.unit_price),
            format!("{:.2}", item.line_total),
        )
    }
}

/// Whole quantities print without decimals, fractional ones without
/// trailing zeros.
pub fn format_quantity(qty: f64) -> String {
    if qty.fract() == 0.0 {
        format!("{qty:.0}")
    } else {
        let s = format!("{qty:.3}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Placement and pagination parameters for the table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableGeometry {
    pub start_x: f32,
    pub column_widths: [f32; 6],
    /// Rows may not extend below this line.
    pub bottom_limit: f32,
    /// Header anchor on continuation pages.
    pub continuation_top: f32,
    pub line_height: f32,
    pub vertical_padding: f32,
    /// Horizontal room kept free inside the description cell.
    pub description_inset: f32,
}

impl Default for TableGeometry {
    fn default() -> Self {
        Self {
            start_x: 15.0,
            column_widths: COLUMN_WIDTHS,
            bottom_limit: 280.0,
            continuation_top: 20.0,
            line_height: 4.5,
            vertical_padding: 2.5,
            description_inset: 8.0,
        }
    }
}

impl TableGeometry {
    pub fn table_width(&self) -> f32 {
        self.column_widths.iter().sum()
    }

    /// Left edge of column `index`.
    pub fn column_x(&self, index: usize) -> f32 {
        self.start_x + self.column_widths[..index].iter().sum::<f32>()
    }

    pub fn column_center(&self, index: usize) -> f32 {
        self.column_x(index) + self.column_widths[index] / 2.0
    }

    pub fn description_width(&self) -> f32 {
        self.column_widths[DESCRIPTION] - self.description_inset
    }

    /// Height of a row whose description wraps to `lines` lines.
    pub fn row_height(&self, lines: usize) -> f32 {
        lines as f32 * self.line_height + self.vertical_padding * 2.0
    }

    /// Most description lines a row may carry within `height`.
    pub fn lines_fitting(&self, height: f32) -> usize {
        let usable = height - self.vertical_padding * 2.0;
        (usable / self.line_height + 1e-4).floor().max(0.0) as usize
    }

    /// Description lines that fit under the header of a continuation page.
    pub fn page_capacity(&self) -> usize {
        self.lines_fitting(self.bottom_limit - self.continuation_top - HEADER_HALF_HEIGHT)
            .max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableOutcome {
    /// Cursor just below the last row.
    pub y: f32,
    /// Unrounded sum of the row totals.
    pub grand_total: f64,
    /// Page holding the last row.
    pub last_page: usize,
}

/// Draw the header band anchored on `y` (the band spans `y ± 5`).
pub fn draw_header<S: Surface + ?Sized>(surface: &mut S, y: f32, geometry: &TableGeometry) {
    let top = y - HEADER_HALF_HEIGHT;
    let bottom = y + HEADER_HALF_HEIGHT;
    let width = geometry.table_width();

    surface.rect(
        Rect::new(geometry.start_x, top, width, bottom - top),
        Paint::Fill(Color::hex(HEADER_FILL)),
    );

    let style = TextStyle::new(HEADER_FONT, Color::hex(HEADER_TEXT));
    for (i, header) in HEADERS.iter().enumerate() {
        surface.text(
            header,
            geometry.column_center(i),
            y,
            style,
            TextOptions::middle(Align::Center),
        );
    }

    let stroke = Stroke::new(Color::hex(BORDER), BORDER_WIDTH);
    for i in 0..=geometry.column_widths.len() {
        let x = geometry.column_x(i);
        surface.line((x, top), (x, bottom), stroke);
    }
    surface.line((geometry.start_x, top), (geometry.start_x + width, top), stroke);
    surface.line(
        (geometry.start_x, bottom),
        (geometry.start_x + width, bottom),
        stroke,
    );
}

/// Lay out `rows` below a header anchored at `start_y`.
///
/// Before each row the remaining space is checked; a row that would cross
/// `bottom_limit` moves to a fresh page where the header is drawn again.
/// A row whose description is taller than a whole page fills the page it
/// starts on and carries on in description-only continuation rows.
/// The header is never left on a page without a row under it.
pub fn draw_product_table<S: Surface + ?Sized>(
    surface: &mut S,
    rows: &[TableRow],
    start_y: f32,
    geometry: &TableGeometry,
) -> TableOutcome {
    let wrapped: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            surface.split_text_to_size(row.description(), geometry.description_width(), ROW_FONT)
        })
        .collect();
    let capacity = geometry.page_capacity();

    let mut header_y = start_y;
    if let Some(first) = wrapped.first() {
        let needed = geometry.row_height(first.len().min(capacity));
        if start_y + HEADER_HALF_HEIGHT + needed > geometry.bottom_limit {
            let page = surface.add_page();
            debug!(page, "table starts on new page");
            header_y = geometry.continuation_top;
        }
    }
    draw_header(surface, header_y, geometry);

    let mut y = header_y + HEADER_HALF_HEIGHT;
    let mut page_has_rows = false;
    let mut grand_total = 0.0_f64;

    for (row, lines) in rows.iter().zip(wrapped) {
        let mut lines = lines;
        let mut continuation = false;

        loop {
            let room = geometry.lines_fitting(geometry.bottom_limit - y);
            if lines.len() <= room {
                y += draw_row(surface, row, &lines, y, continuation, geometry);
                page_has_rows = true;
                break;
            }

            if lines.len() > capacity || !page_has_rows {
                let take = if page_has_rows { room } else { room.max(1) };
                if take > 0 {
                    let rest = lines.split_off(take);
                    y += draw_row(surface, row, &lines, y, continuation, geometry);
                    page_has_rows = true;
                    debug!(row = %row.cells[0], lines = take, "row continues on next page");
                    lines = rest;
                    continuation = true;
                    if lines.is_empty() {
                        break;
                    }
                }
            }

            let page = surface.add_page();
            debug!(page, row = %row.cells[0], "table continues on new page");
            draw_header(surface, geometry.continuation_top, geometry);
            y = geometry.continuation_top + HEADER_HALF_HEIGHT;
            page_has_rows = false;
        }

        grand_total += row.total_value();
    }

    TableOutcome {
        y,
        grand_total,
        last_page: surface.current_page(),
    }
}

/// Draw one row (or a continuation of one) with its top at `y`; returns the
/// row height. Continuation rows carry only description lines.
fn draw_row<S: Surface + ?Sized>(
    surface: &mut S,
    row: &TableRow,
    lines: &[String],
    y: f32,
    continuation: bool,
    geometry: &TableGeometry,
) -> f32 {
    let style = TextStyle::new(ROW_FONT, Color::BLACK);
    let stroke = Stroke::new(Color::hex(BORDER), BORDER_WIDTH);
    let row_height = geometry.row_height(lines.len());
    let center_y = y + row_height / 2.0;

    if !continuation {
        for (i, cell) in row.cells.iter().enumerate() {
            if i == DESCRIPTION {
                continue;
            }
            surface.text(
                cell,
                geometry.column_center(i),
                center_y,
                style,
                TextOptions::middle(Align::Center),
            );
        }
    }

    let first_line_y = center_y - (lines.len() as f32 - 1.0) * geometry.line_height / 2.0;
    for (i, line) in lines.iter().enumerate() {
        surface.text(
            line,
            geometry.column_center(DESCRIPTION),
            first_line_y + i as f32 * geometry.line_height,
            style,
            TextOptions::middle(Align::Center),
        );
    }

    for (i, width) in geometry.column_widths.iter().enumerate() {
        surface.rect(
            Rect::new(geometry.column_x(i), y, *width, row_height),
            Paint::Stroke(stroke),
        );
    }

    row_height
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::display_list::{DisplayList, DrawOp};

    fn row(serial: usize, description: &str, total: &str) -> TableRow {
        TableRow::new(serial.to_string(), "8544", description, "1", total, total)
    }

    fn cell_rects(doc: &DisplayList, page: usize) -> Vec<Rect> {
        doc.pages[page]
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Rect {
                    rect,
                    paint: Paint::Stroke(_),
                } => Some(*rect),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_grand_total_skips_malformed_totals() {
        let rows = vec![
            row(1, "Switch", "10.00"),
            row(2, "Socket", "20.50"),
            row(3, "Holder", "bad"),
            row(4, "Tape", "5.25"),
        ];
        let mut doc = DisplayList::a4();
        let outcome = draw_product_table(&mut doc, &rows, 100.0, &TableGeometry::default());
        assert!((outcome.grand_total - 35.75).abs() < 1e-9);
        assert_eq!(outcome.last_page, 0);
    }

    #[test]
    fn test_non_finite_total_counts_as_zero() {
        assert_eq!(row(1, "x", "NaN").total_value(), 0.0);
        assert_eq!(row(1, "x", "inf").total_value(), 0.0);
        assert_eq!(row(1, "x", " 12.5 ").total_value(), 12.5);
    }

    #[test]
    fn test_row_height_follows_wrapped_description() {
        let geometry = TableGeometry::default();
        let long = "Heavy duty three core flexible copper cable with PVC sheath, \
                    rated for industrial use, supplied in ninety metre coils";
        let rows = vec![row(1, "Short", "1.00"), row(2, long, "2.00")];
        let mut doc = DisplayList::a4();
        draw_product_table(&mut doc, &rows, 50.0, &geometry);

        let rects = cell_rects(&doc, 0);
        assert_eq!(rects.len(), 12);
        let single = geometry.row_height(1);
        assert!((rects[0].height - single).abs() < 1e-4);
        assert!(rects[6].height > single);
        // Every cell of a row shares the row height.
        assert!(rects[6..12].iter().all(|r| (r.height - rects[6].height).abs() < 1e-4));
    }

    #[test]
    fn test_pagination_never_splits_rows() {
        let geometry = TableGeometry::default();
        let description = "Galvanised iron conduit pipe, medium gauge, twenty five millimetre \
                           diameter, three metre length";
        let rows: Vec<TableRow> = (1..=60).map(|i| row(i, description, "100.00")).collect();
        let mut doc = DisplayList::a4();
        let outcome = draw_product_table(&mut doc, &rows, 120.0, &geometry);

        assert!(doc.page_count() > 1);
        assert_eq!(outcome.last_page, doc.page_count() - 1);
        for page in 0..doc.page_count() {
            for rect in cell_rects(&doc, page) {
                assert!(rect.bottom() <= geometry.bottom_limit + 1e-3);
            }
        }
        assert!((outcome.grand_total - 6000.0).abs() < 1e-6);
    }

    #[test]
    fn test_header_repeats_on_every_page_with_rows() {
        let rows: Vec<TableRow> = (1..=80).map(|i| row(i, "Bulb", "1.00")).collect();
        let mut doc = DisplayList::a4();
        draw_product_table(&mut doc, &rows, 150.0, &TableGeometry::default());

        assert!(doc.page_count() >= 2);
        let header_ops = |page: usize| -> Vec<DrawOp> {
            doc.pages[page]
                .ops
                .iter()
                .filter(|op| match op {
                    DrawOp::Text { text, .. } => HEADERS.contains(&text.as_str()),
                    _ => false,
                })
                .cloned()
                .collect()
        };
        for page in 0..doc.page_count() {
            assert!(!cell_rects(&doc, page).is_empty());
            assert_eq!(header_ops(page).len(), HEADERS.len());
        }
        // Continuation pages share an identical header.
        for page in 2..doc.page_count() {
            assert_eq!(header_ops(page), header_ops(1));
        }
    }

    #[test]
    fn test_serials_stay_sequential_across_pages() {
        let rows: Vec<TableRow> = (1..=70).map(|i| row(i, "Fuse", "1.00")).collect();
        let mut doc = DisplayList::a4();
        let geometry = TableGeometry::default();
        draw_product_table(&mut doc, &rows, 150.0, &geometry);

        let serial_x = geometry.column_center(0);
        let serials: Vec<String> = doc
            .pages
            .iter()
            .flat_map(|p| p.texts())
            .filter(|(text, x, _)| (*x - serial_x).abs() < 1e-4 && *text != "Sl No")
            .map(|(text, _, _)| text.to_string())
            .collect();
        let expected: Vec<String> = (1..=70).map(|i| i.to_string()).collect();
        assert_eq!(serials, expected);
    }

    fn header_count(doc: &DisplayList, page: usize) -> usize {
        doc.pages[page]
            .texts()
            .filter(|(text, _, _)| *text == HEADERS[0])
            .count()
    }

    #[test]
    fn test_row_taller_than_a_page_continues_on_next_page() {
        let geometry = TableGeometry::default();
        let description = vec!["insulated"; 400].join(" ");
        let rows = vec![row(1, &description, "250.00"), row(2, "Fuse", "5.00")];
        let mut doc = DisplayList::a4();
        let outcome = draw_product_table(&mut doc, &rows, 130.0, &geometry);

        assert!(doc.page_count() >= 2);
        for page in 0..doc.page_count() {
            let rects = cell_rects(&doc, page);
            assert!(!rects.is_empty(), "page {page} has no rows");
            assert!(rects.iter().all(|r| r.bottom() <= geometry.bottom_limit + 1e-3));
        }

        let description_x = geometry.column_center(DESCRIPTION);
        let words: usize = doc
            .pages
            .iter()
            .flat_map(|p| p.texts())
            .filter(|(text, x, _)| (*x - description_x).abs() < 1e-4 && text.starts_with("insulated"))
            .map(|(text, _, _)| text.split_whitespace().count())
            .sum();
        assert_eq!(words, 400);

        // Serial and total print once, on the first segment.
        let serial_x = geometry.column_center(0);
        let serials: Vec<&str> = doc
            .pages
            .iter()
            .flat_map(|p| p.texts())
            .filter(|(text, x, _)| (*x - serial_x).abs() < 1e-4 && *text != "Sl No")
            .map(|(text, _, _)| text)
            .collect();
        assert_eq!(serials, vec!["1", "2"]);
        assert!((outcome.grand_total - 255.0).abs() < 1e-9);
    }

    #[test]
    fn test_header_moves_with_first_row_when_no_room() {
        let geometry = TableGeometry::default();
        let description = "Galvanised iron conduit pipe, medium gauge, twenty five millimetre \
                           diameter, three metre length";
        let rows = vec![row(1, description, "10.00")];
        let mut doc = DisplayList::a4();
        let outcome = draw_product_table(&mut doc, &rows, 270.0, &geometry);

        assert_eq!(doc.page_count(), 2);
        assert_eq!(header_count(&doc, 0), 0);
        assert!(cell_rects(&doc, 0).is_empty());
        assert_eq!(header_count(&doc, 1), 1);
        assert!(!cell_rects(&doc, 1).is_empty());
        assert_eq!(outcome.last_page, 1);
    }

    #[test]
    fn test_lines_fitting() {
        let geometry = TableGeometry::default();
        assert_eq!(geometry.lines_fitting(geometry.row_height(3)), 3);
        assert_eq!(geometry.lines_fitting(geometry.row_height(3) - 0.1), 2);
        assert_eq!(geometry.lines_fitting(2.0), 0);
        assert_eq!(geometry.page_capacity(), 55);
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(3.0), "3");
        assert_eq!(format_quantity(2.5), "2.5");
        assert_eq!(format_quantity(0.125), "0.125");
    }
}
