//! Invoice layout engine.
//!
//! Turns an [`InvoiceData`](crate::invoice::InvoiceData) into positioned
//! drawing commands on a [`Surface`]. Nothing here touches the filesystem;
//! the recorded [`DisplayList`] is handed to [`crate::pdf`] for output.

mod blocks;
mod display_list;
mod engine;
mod metrics;
mod summary;
mod surface;
mod table;
mod words;

pub use display_list::{DisplayList, DrawOp, Page, PAGE_HEIGHT, PAGE_WIDTH};
pub use engine::{layout_invoice, LayoutOptions, LayoutSummary};
pub use metrics::{split_text_to_size, text_width, CAP_HEIGHT, PT_TO_MM};
pub use surface::{
    Align, Baseline, Color, Font, FontFace, Paint, Rect, Stroke, Surface, TextOptions, TextStyle,
};
pub use table::{draw_product_table, format_quantity, TableGeometry, TableOutcome, TableRow};
pub use words::{number_to_words, WordsError, WORDS_LIMIT};
