//! Heading, seller/order details and the billing/shipping columns.

use super::display_list::PAGE_WIDTH;
use super::surface::{Align, Color, Font, Rect, Stroke, Surface, TextOptions, TextStyle};
use crate::invoice::{OrderInfo, Party, Seller};

pub const MARGIN_LEFT: f32 = 15.0;
pub const RIGHT_COLUMN_X: f32 = 140.0;

/// Vertical advance per wrapped line in the party blocks.
pub const PARTY_LINE_HEIGHT: f32 = 5.0;

pub(crate) const TITLE_COLOR: &str = "#2c3e50";
pub(crate) const SUBTITLE_COLOR: &str = "#34495e";
pub(crate) const SECTION_COLOR: &str = "#2980b9";
const DIVIDER_COLOR: &str = "#bdc3c7";
const FRAME_COLOR: &str = "#34495e";

const SECTION_FONT: Font = Font::bold(14.0);
const BODY_FONT: Font = Font::regular(10.0);

/// Wrap width of the left party column.
pub fn left_column_width() -> f32 {
    RIGHT_COLUMN_X - MARGIN_LEFT - 10.0
}

/// Wrap width of the right party column.
pub fn right_column_width() -> f32 {
    PAGE_WIDTH - RIGHT_COLUMN_X - 20.0
}

pub fn section_style() -> TextStyle {
    TextStyle::new(SECTION_FONT, Color::hex(SECTION_COLOR))
}

fn body_style() -> TextStyle {
    TextStyle::new(BODY_FONT, Color::BLACK)
}

pub fn draw_page_frame<S: Surface + ?Sized>(surface: &mut S, width: f32, height: f32) {
    surface.rounded_rect(
        Rect::new(10.0, 10.0, width - 20.0, height - 20.0),
        7.0,
        Stroke::new(Color::hex(FRAME_COLOR), 1.2),
    );
}

pub fn draw_heading<S: Surface + ?Sized>(surface: &mut S, title: &str, subtitle: &str) {
    let center = PAGE_WIDTH / 2.0;
    surface.text(
        title,
        center,
        23.0,
        TextStyle::new(Font::bold(20.0), Color::hex(TITLE_COLOR)),
        TextOptions::aligned(Align::Center),
    );
    surface.text(
        subtitle,
        center,
        30.0,
        TextStyle::new(Font::regular(12.0), Color::hex(SUBTITLE_COLOR)),
        TextOptions::aligned(Align::Center),
    );
}

pub fn draw_divider<S: Surface + ?Sized>(surface: &mut S, y: f32) {
    surface.line(
        (MARGIN_LEFT, y),
        (PAGE_WIDTH - MARGIN_LEFT, y),
        Stroke::new(Color::hex(DIVIDER_COLOR), 0.3),
    );
}

/// Draw two columns of logical lines side by side starting at `y`.
///
/// Each logical line is wrapped to its own column width. The taller of the
/// two wrapped counts at a given index decides how far the cursor moves, so
/// the shorter side is padded with blank space instead of pulling its later
/// lines upwards. Returns the cursor below the last line.
pub fn draw_aligned_columns<S: Surface + ?Sized>(
    surface: &mut S,
    left: &[String],
    right: &[String],
    y: f32,
) -> f32 {
    let style = body_style();
    let rows = left.len().max(right.len());
    let mut y = y;

    for i in 0..rows {
        let wrap = |surface: &S, lines: &[String], width: f32| match lines.get(i) {
            Some(line) => surface.split_text_to_size(line, width, BODY_FONT),
            None => Vec::new(),
        };
        let left_lines = wrap(&*surface, left, left_column_width());
        let right_lines = wrap(&*surface, right, right_column_width());
        let height = left_lines.len().max(right_lines.len()).max(1);

        for j in 0..height {
            if let Some(line) = left_lines.get(j) {
                surface.text(line, MARGIN_LEFT, y, style, TextOptions::LEFT);
            }
            if let Some(line) = right_lines.get(j) {
                surface.text(line, RIGHT_COLUMN_X, y, style, TextOptions::LEFT);
            }
            y += PARTY_LINE_HEIGHT;
        }
    }

    y
}

/// Seller identity on the left, order details on the right, closed by a
/// divider. Returns the cursor for the next block.
pub fn draw_seller_and_order<S: Surface + ?Sized>(
    surface: &mut S,
    seller: &Seller,
    order: &OrderInfo,
    y: f32,
) -> f32 {
    let style = section_style();
    surface.text(&seller.name, MARGIN_LEFT, y, style, TextOptions::LEFT);
    // The order heading sits 1 mm below the seller name.
    let y = y + 1.0;
    surface.text("Invoice Details", RIGHT_COLUMN_X, y, style, TextOptions::LEFT);
    let y = y + 6.0;

    let y = draw_aligned_columns(surface, &seller.detail_lines(), &order.display_lines(), y);

    draw_divider(surface, y);
    y + 7.0
}

/// Logical lines of a party column; the address is pre-wrapped to `width`
/// so each address fragment occupies its own logical index.
pub fn party_lines<S: Surface + ?Sized>(surface: &S, party: &Party, width: f32) -> Vec<String> {
    let mut lines = vec![party.name.clone()];
    for address in &party.address_lines {
        lines.extend(surface.split_text_to_size(address, width, BODY_FONT));
    }
    lines.push(party.locality_line());
    lines.push(format!("Phone: {}", party.phone));
    if let Some(email) = party.email.as_deref().filter(|e| !e.trim().is_empty()) {
        lines.push(format!("Email: {email}"));
    }
    lines
}

pub fn draw_billing_shipping<S: Surface + ?Sized>(
    surface: &mut S,
    bill_to: &Party,
    ship_to: &Party,
    y: f32,
) -> f32 {
    let style = section_style();
    surface.text("Billing Details", MARGIN_LEFT, y, style, TextOptions::LEFT);
    surface.text("Shipping Details", RIGHT_COLUMN_X, y, style, TextOptions::LEFT);
    let y = y + 6.0;

    let bill = party_lines(surface, bill_to, left_column_width());
    let ship = party_lines(surface, ship_to, right_column_width());
    let y = draw_aligned_columns(surface, &bill, &ship, y);

    draw_divider(surface, y - 3.0);
    y + 7.0
}
