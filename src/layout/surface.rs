use serde::Serialize;

use super::metrics;

/// RGB color with 8-bit channels, parsed from `#rrggbb` / `#rgb` literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a CSS-style hex color. Unparseable input falls back to black.
    pub fn hex(value: &str) -> Self {
        let digits = value.trim_start_matches('#');
        if !digits.is_ascii() {
            return Color::BLACK;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        let parsed = match digits.len() {
            6 => channel(&digits[0..2])
                .zip(channel(&digits[2..4]))
                .zip(channel(&digits[4..6]))
                .map(|((r, g), b)| Color::rgb(r, g, b)),
            3 => {
                let expand = |c: &str| channel(c).map(|v| v * 17);
                expand(&digits[0..1])
                    .zip(expand(&digits[1..2]))
                    .zip(expand(&digits[2..3]))
                    .map(|((r, g), b)| Color::rgb(r, g, b))
            }
            _ => None,
        };
        parsed.unwrap_or(Color::BLACK)
    }

    /// Channels scaled to `0.0..=1.0`.
    pub fn unit(&self) -> (f32, f32, f32) {
        (
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FontFace {
    Regular,
    Bold,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Font {
    pub face: FontFace,
    /// Size in points.
    pub size: f32,
}

impl Font {
    pub const fn regular(size: f32) -> Self {
        Self {
            face: FontFace::Regular,
            size,
        }
    }

    pub const fn bold(size: f32) -> Self {
        Self {
            face: FontFace::Bold,
            size,
        }
    }

    pub const fn italic(size: f32) -> Self {
        Self {
            face: FontFace::Italic,
            size,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextStyle {
    pub font: Font,
    pub color: Color,
}

impl TextStyle {
    pub const fn new(font: Font, color: Color) -> Self {
        Self { font, color }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical anchor of the `y` coordinate passed with a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Baseline {
    #[default]
    Alphabetic,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TextOptions {
    pub align: Align,
    pub baseline: Baseline,
}

impl TextOptions {
    pub const LEFT: TextOptions = TextOptions {
        align: Align::Left,
        baseline: Baseline::Alphabetic,
    };

    pub const fn aligned(align: Align) -> Self {
        Self {
            align,
            baseline: Baseline::Alphabetic,
        }
    }

    pub const fn middle(align: Align) -> Self {
        Self {
            align,
            baseline: Baseline::Middle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stroke {
    pub color: Color,
    /// Line width in millimetres.
    pub width: f32,
}

impl Stroke {
    pub const fn new(color: Color, width: f32) -> Self {
        Self { color, width }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Paint {
    Stroke(Stroke),
    Fill(Color),
}

/// Axis-aligned rectangle in page coordinates (millimetres, origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Drawing target used by the layout engine.
///
/// Coordinates are millimetres with the origin at the top-left corner of the
/// page. Every drawing call targets the page picked by [`Surface::set_page`]
/// (or the page most recently added).
pub trait Surface {
    /// Width of `text` in millimetres when set in `font`.
    fn text_width(&self, text: &str, font: Font) -> f32 {
        metrics::text_width(text, font)
    }

    /// Greedy word wrap of `text` to `max_width` millimetres.
    fn split_text_to_size(&self, text: &str, max_width: f32, font: Font) -> Vec<String> {
        metrics::split_text_to_size(text, max_width, font)
    }

    fn text(&mut self, text: &str, x: f32, y: f32, style: TextStyle, options: TextOptions);

    fn rect(&mut self, rect: Rect, paint: Paint);

    fn rounded_rect(&mut self, rect: Rect, radius: f32, stroke: Stroke);

    fn line(&mut self, from: (f32, f32), to: (f32, f32), stroke: Stroke);

    /// Append a page, select it and return its zero-based index.
    fn add_page(&mut self) -> usize;

    fn set_page(&mut self, index: usize);

    fn current_page(&self) -> usize;

    fn page_count(&self) -> usize;
}
