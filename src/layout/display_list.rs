use serde::Serialize;

use super::surface::{Paint, Rect, Stroke, Surface, TextOptions, TextStyle};

/// A4 portrait, millimetres.
pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;

/// One recorded drawing command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    Text {
        text: String,
        x: f32,
        y: f32,
        style: TextStyle,
        options: TextOptions,
    },
    Rect {
        rect: Rect,
        paint: Paint,
    },
    RoundedRect {
        rect: Rect,
        radius: f32,
        stroke: Stroke,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        stroke: Stroke,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    /// Text runs on this page, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = (&str, f32, f32)> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, x, y, .. } => Some((text.as_str(), *x, *y)),
            _ => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|(text, _, _)| text == needle)
    }
}

/// Recording [`Surface`]: a paginated display list that the PDF back end
/// replays. It starts with a single empty page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayList {
    pub width: f32,
    pub height: f32,
    pub pages: Vec<Page>,
    #[serde(skip)]
    current: usize,
}

impl DisplayList {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            pages: vec![Page::default()],
            current: 0,
        }
    }

    pub fn a4() -> Self {
        Self::new(PAGE_WIDTH, PAGE_HEIGHT)
    }

    fn push(&mut self, op: DrawOp) {
        self.pages[self.current].ops.push(op);
    }

    /// JSON snapshot of the whole document.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for DisplayList {
    fn default() -> Self {
        Self::a4()
    }
}

impl Surface for DisplayList {
    fn text(&mut self, text: &str, x: f32, y: f32, style: TextStyle, options: TextOptions) {
        if text.is_empty() {
            return;
        }
        self.push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            style,
            options,
        });
    }

    fn rect(&mut self, rect: Rect, paint: Paint) {
        self.push(DrawOp::Rect { rect, paint });
    }

    fn rounded_rect(&mut self, rect: Rect, radius: f32, stroke: Stroke) {
        self.push(DrawOp::RoundedRect {
            rect,
            radius,
            stroke,
        });
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), stroke: Stroke) {
        self.push(DrawOp::Line { from, to, stroke });
    }

    fn add_page(&mut self) -> usize {
        self.pages.push(Page::default());
        self.current = self.pages.len() - 1;
        self.current
    }

    fn set_page(&mut self, index: usize) {
        // Out-of-range selections clamp to the last page.
        self.current = index.min(self.pages.len() - 1);
    }

    fn current_page(&self) -> usize {
        self.current
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::surface::{Color, Font};

    #[test]
    fn test_drawing_targets_selected_page() {
        let mut doc = DisplayList::a4();
        let style = TextStyle::new(Font::regular(10.0), Color::BLACK);
        doc.text("first", 10.0, 10.0, style, TextOptions::LEFT);
        assert_eq!(doc.add_page(), 1);
        doc.text("second", 10.0, 10.0, style, TextOptions::LEFT);
        doc.set_page(0);
        doc.text("back on first", 10.0, 20.0, style, TextOptions::LEFT);

        assert_eq!(doc.page_count(), 2);
        assert!(doc.pages[0].contains_text("first"));
        assert!(doc.pages[0].contains_text("back on first"));
        assert!(doc.pages[1].contains_text("second"));
    }

    #[test]
    fn test_empty_text_is_not_recorded() {
        let mut doc = DisplayList::a4();
        let style = TextStyle::new(Font::regular(10.0), Color::BLACK);
        doc.text("", 10.0, 10.0, style, TextOptions::LEFT);
        assert!(doc.pages[0].ops.is_empty());
    }
}
