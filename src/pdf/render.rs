use std::f32::consts::FRAC_PI_2;

use printpdf::lopdf::{self, Object, StringFormat};
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color as PdfColor, IndirectFontRef, Line, Mm, OffsetDateTime, PdfDocument,
    PdfLayerReference, Point, Rect as PdfRect, Rgb,
};
use tracing::debug;

use crate::error::{BillingError, Result};
use crate::layout::{
    text_width, Align, Baseline, Color, DisplayList, DrawOp, FontFace, Paint, Rect, Stroke,
    TextOptions, TextStyle, CAP_HEIGHT, PT_TO_MM,
};

/// Segments per quarter circle when flattening rounded corners.
const CORNER_STEPS: usize = 6;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
}

impl Fonts {
    fn get(&self, face: FontFace) -> &IndirectFontRef {
        match face {
            FontFace::Regular => &self.regular,
            FontFace::Bold => &self.bold,
            FontFace::Italic => &self.italic,
        }
    }
}

fn pdf_err(e: impl ToString) -> BillingError {
    BillingError::PdfGeneration(e.to_string())
}

fn rgb(color: Color) -> PdfColor {
    let (r, g, b) = color.unit();
    PdfColor::Rgb(Rgb::new(r, g, b, None))
}

/// Stamped into the info dictionary instead of the wall clock.
const DOCUMENT_DATE: OffsetDateTime = OffsetDateTime::UNIX_EPOCH;

/// Serialise a laid-out document to PDF bytes.
///
/// Layout coordinates have their origin at the top-left; PDF user space
/// starts bottom-left, so every `y` is flipped against the page height.
/// The same list and title always serialise to the same bytes: dates are
/// fixed and the trailer `/ID` is derived from `title`.
pub fn render_pdf(list: &DisplayList, title: &str) -> Result<Vec<u8>> {
    let width = Mm(list.width);
    let height = Mm(list.height);
    let (doc, page1, layer1) = PdfDocument::new(title, width, height, "Layer 1");
    let doc = doc
        .with_document_id(title.to_string())
        .with_creation_date(DOCUMENT_DATE)
        .with_mod_date(DOCUMENT_DATE)
        .with_metadata_date(DOCUMENT_DATE);

    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(pdf_err)?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_err)?,
        italic: doc
            .add_builtin_font(BuiltinFont::HelveticaOblique)
            .map_err(pdf_err)?,
    };

    for (index, page) in list.pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(page1).get_layer(layer1)
        } else {
            let (page, layer) = doc.add_page(width, height, "Layer 1");
            doc.get_page(page).get_layer(layer)
        };
        let painter = Painter {
            layer: &layer,
            fonts: &fonts,
            page_height: list.height,
        };
        for op in &page.ops {
            painter.draw(op);
        }
    }

    debug!(pages = list.pages.len(), "serialising PDF");
    let bytes = doc.save_to_bytes().map_err(pdf_err)?;
    stamp_trailer_id(&bytes, title)
}

/// printpdf fills the trailer `/ID` pair with random strings; replace both
/// halves with `id`.
fn stamp_trailer_id(bytes: &[u8], id: &str) -> Result<Vec<u8>> {
    let mut pdf = lopdf::Document::load_mem(bytes).map_err(pdf_err)?;
    let id = Object::String(id.as_bytes().to_vec(), StringFormat::Literal);
    pdf.trailer.set("ID", Object::Array(vec![id.clone(), id]));

    let mut out = Vec::with_capacity(bytes.len());
    pdf.save_to(&mut out).map_err(pdf_err)?;
    Ok(out)
}

struct Painter<'a> {
    layer: &'a PdfLayerReference,
    fonts: &'a Fonts,
    page_height: f32,
}

impl Painter<'_> {
    fn point(&self, x: f32, y: f32) -> Point {
        Point::new(Mm(x), Mm(self.page_height - y))
    }

    fn draw(&self, op: &DrawOp) {
        match op {
            DrawOp::Text {
                text,
                x,
                y,
                style,
                options,
            } => self.text(text, *x, *y, *style, *options),
            DrawOp::Rect { rect, paint } => self.rect(*rect, *paint),
            DrawOp::RoundedRect {
                rect,
                radius,
                stroke,
            } => self.rounded_rect(*rect, *radius, *stroke),
            DrawOp::Line { from, to, stroke } => {
                self.set_stroke(*stroke);
                self.polyline(vec![self.point(from.0, from.1), self.point(to.0, to.1)], false);
            }
        }
    }

    fn text(&self, text: &str, x: f32, y: f32, style: TextStyle, options: TextOptions) {
        let width = text_width(text, style.font);
        let x = match options.align {
            Align::Left => x,
            Align::Center => x - width / 2.0,
            Align::Right => x - width,
        };
        let baseline = match options.baseline {
            Baseline::Alphabetic => y,
            Baseline::Middle => y + CAP_HEIGHT / 1000.0 * style.font.size * PT_TO_MM / 2.0,
        };

        self.layer.set_fill_color(rgb(style.color));
        self.layer.use_text(
            text,
            style.font.size,
            Mm(x),
            Mm(self.page_height - baseline),
            self.fonts.get(style.font.face),
        );
    }

    fn rect(&self, rect: Rect, paint: Paint) {
        let mode = match paint {
            Paint::Fill(color) => {
                self.layer.set_fill_color(rgb(color));
                PaintMode::Fill
            }
            Paint::Stroke(stroke) => {
                self.set_stroke(stroke);
                PaintMode::Stroke
            }
        };
        let shape = PdfRect::new(
            Mm(rect.x),
            Mm(self.page_height - rect.bottom()),
            Mm(rect.x + rect.width),
            Mm(self.page_height - rect.y),
        )
        .with_mode(mode);
        self.layer.add_rect(shape);
    }

    /// Rounded corners are flattened into short chords.
    fn rounded_rect(&self, rect: Rect, radius: f32, stroke: Stroke) {
        let r = radius.min(rect.width / 2.0).min(rect.height / 2.0);
        let corners = [
            (rect.x + rect.width - r, rect.y + r, -FRAC_PI_2),
            (rect.x + rect.width - r, rect.bottom() - r, 0.0),
            (rect.x + r, rect.bottom() - r, FRAC_PI_2),
            (rect.x + r, rect.y + r, 2.0 * FRAC_PI_2),
        ];

        let mut points = Vec::with_capacity(corners.len() * (CORNER_STEPS + 1));
        for (cx, cy, start) in corners {
            for step in 0..=CORNER_STEPS {
                let angle = start + FRAC_PI_2 * step as f32 / CORNER_STEPS as f32;
                points.push(self.point(cx + r * angle.cos(), cy + r * angle.sin()));
            }
        }

        self.set_stroke(stroke);
        self.polyline(points, true);
    }

    fn polyline(&self, points: Vec<Point>, is_closed: bool) {
        self.layer.add_line(Line {
            points: points.into_iter().map(|p| (p, false)).collect(),
            is_closed,
        });
    }

    fn set_stroke(&self, stroke: Stroke) {
        self.layer.set_outline_color(rgb(stroke.color));
        self.layer.set_outline_thickness(stroke.width / PT_TO_MM);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Font, Surface};

    #[test]
    fn test_renders_every_page() {
        let mut list = DisplayList::a4();
        let style = TextStyle::new(Font::regular(10.0), Color::BLACK);
        list.text("first", 20.0, 20.0, style, TextOptions::LEFT);
        list.rounded_rect(Rect::new(10.0, 10.0, 190.0, 277.0), 7.0, Stroke::new(Color::BLACK, 1.2));
        list.add_page();
        list.text("second", 105.0, 20.0, style, TextOptions::middle(Align::Center));
        list.rect(Rect::new(15.0, 30.0, 180.0, 10.0), Paint::Fill(Color::hex("#ecf0f1")));

        let bytes = render_pdf(&list, "Test").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn test_same_list_gives_identical_bytes() {
        let mut list = DisplayList::a4();
        let style = TextStyle::new(Font::bold(12.0), Color::BLACK);
        list.text("BILL OF SUPPLY", 105.0, 23.0, style, TextOptions::middle(Align::Center));

        let first = render_pdf(&list, "Invoice OT-2026-27-1").unwrap();
        std::thread::sleep(std::time::Duration::from_millis(1100));
        let second = render_pdf(&list, "Invoice OT-2026-27-1").unwrap();
        assert_eq!(first, second);

        let other = render_pdf(&list, "Invoice OT-2026-27-2").unwrap();
        assert_ne!(first, other);
    }

    #[test]
    fn test_trailer_id_follows_title() {
        let bytes = render_pdf(&DisplayList::a4(), "Invoice OT-2026-27-1").unwrap();
        let pdf = lopdf::Document::load_mem(&bytes).unwrap();
        let id = pdf.trailer.get(b"ID").unwrap().as_array().unwrap();
        assert_eq!(id.len(), 2);
        assert_eq!(id[0].as_str().unwrap(), b"Invoice OT-2026-27-1");
        assert_eq!(id[1].as_str().unwrap(), b"Invoice OT-2026-27-1");
    }

    #[test]
    fn test_empty_document_still_renders() {
        let bytes = render_pdf(&DisplayList::a4(), "Empty").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
