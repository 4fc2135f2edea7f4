//! Built-in PDF engine: lays the text of an XHTML page out on A4 pages with the standard
//! Helvetica fonts. Inline `<style>` rules may hide elements or change font size and
//! weight; linked stylesheets and images are not loaded.

use std::mem;

use async_trait::async_trait;
use lopdf::{
    Document, Object, StringFormat,
    content::{Content, Operation},
    dictionary, Stream,
};
use tracing::debug;

use crate::render::{
    RenderError,
    engine::PdfEngine,
    html::{Block, TextStyle, extract_blocks},
};

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 50.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

const LINE_SPACING: f32 = 1.4;
const CELL_PADDING: f32 = 6.0;

/// Average Helvetica glyph width as a fraction of the font size, rounded up.
const GLYPH_WIDTH: f32 = 0.55;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    const fn of(style: TextStyle) -> Self {
        if style.bold { Font::Bold } else { Font::Regular }
    }

    const fn resource(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

/// Pure-Rust engine backed by `lopdf`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextLayoutEngine;

impl TextLayoutEngine {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Lay out `html` and return the encoded PDF.
    ///
    /// # Errors
    ///
    /// Returns an error if `html` is not well-formed or the PDF cannot be encoded.
    pub fn layout(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        let blocks = extract_blocks(html)?;
        let mut layout = Layout::new();

        for block in &blocks {
            match block {
                Block::Text(text, style) => layout.paragraph(text, *style),
                Block::Row(cells, style) => layout.row(cells, *style),
                Block::Rule => layout.rule(),
            }
        }

        let pages = layout.finish();

        debug!(blocks = blocks.len(), pages = pages.len(), "laid out document");

        encode(pages)
    }
}

#[async_trait]
impl PdfEngine for TextLayoutEngine {
    async fn render(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        self.layout(html)
    }

    fn name(&self) -> &'static str {
        "text"
    }
}

/// Content operations per page, filled top to bottom.
struct Layout {
    pages: Vec<Vec<Operation>>,
    current: Vec<Operation>,
    y: f32,
}

impl Layout {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Vec::new(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    /// Start a new page unless `height` still fits on this one.
    fn reserve(&mut self, height: f32) {
        if self.y - height < MARGIN && !self.current.is_empty() {
            self.pages.push(mem::take(&mut self.current));
            self.y = PAGE_HEIGHT - MARGIN;
        }
    }

    fn paragraph(&mut self, text: &str, style: TextStyle) {
        let line_height = style.size * LINE_SPACING;

        for line in wrap(text, style.size, CONTENT_WIDTH) {
            self.reserve(line_height);
            self.y -= line_height;
            self.text(Font::of(style), style.size, MARGIN, self.y, &line);
        }

        self.y -= style.size * 0.4;
    }

    fn row(&mut self, cells: &[String], style: TextStyle) {
        let column_width = CONTENT_WIDTH / cells.len().max(1) as f32;
        let line_height = style.size * LINE_SPACING;

        let wrapped: Vec<Vec<String>> = cells
            .iter()
            .map(|cell| wrap(cell, style.size, column_width - CELL_PADDING))
            .collect();

        let lines = wrapped.iter().map(Vec::len).max().unwrap_or(0).max(1);
        let height = lines as f32 * line_height + CELL_PADDING;

        self.reserve(height);

        for (column, cell_lines) in wrapped.iter().enumerate() {
            let x = MARGIN + column as f32 * column_width;

            for (index, line) in cell_lines.iter().enumerate() {
                let y = self.y - (index + 1) as f32 * line_height;
                self.text(Font::of(style), style.size, x, y, line);
            }
        }

        self.y -= height;
        self.line(MARGIN, self.y + CELL_PADDING / 2.0, MARGIN + CONTENT_WIDTH);
    }

    fn rule(&mut self) {
        self.reserve(CELL_PADDING * 2.0);
        self.y -= CELL_PADDING;
        self.line(MARGIN, self.y, MARGIN + CONTENT_WIDTH);
        self.y -= CELL_PADDING;
    }

    fn text(&mut self, font: Font, size: f32, x: f32, y: f32, text: &str) {
        self.current.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![font.resource().into(), size.into()]),
            Operation::new("Td", vec![x.into(), y.into()]),
            Operation::new(
                "Tj",
                vec![Object::String(to_win_ansi(text), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
        ]);
    }

    fn line(&mut self, x1: f32, y: f32, x2: f32) {
        self.current.extend([
            Operation::new("w", vec![0.5.into()]),
            Operation::new("m", vec![x1.into(), y.into()]),
            Operation::new("l", vec![x2.into(), y.into()]),
            Operation::new("S", vec![]),
        ]);
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }

        self.pages
    }
}

fn encode(pages: Vec<Vec<Operation>>) -> Result<Vec<u8>, RenderError> {
    let mut document = Document::with_version("1.5");
    let pages_id = document.new_object_id();

    let regular = document.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let bold = document.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });

    let resources_id = document.add_object(dictionary! {
        "Font" => dictionary! {
            Font::Regular.resource() => regular,
            Font::Bold.resource() => bold,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());

    for operations in pages {
        let content = Content { operations };
        let content_id = document.add_object(Stream::new(dictionary! {}, content.encode()?));

        let page_id = document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
            "Contents" => content_id,
            "Resources" => resources_id,
        });

        kids.push(page_id.into());
    }

    let count = i64::try_from(kids.len()).unwrap_or(i64::MAX);

    document.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = document.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });

    document.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    document.save_to(&mut bytes)?;

    Ok(bytes)
}

/// Greedy word wrap using an average glyph width.
fn wrap(text: &str, size: f32, width: f32) -> Vec<String> {
    let max_chars = ((width / (size * GLYPH_WIDTH)).floor() as usize).max(1);
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        while word.len() > max_chars {
            if !line.is_empty() {
                lines.push(mem::take(&mut line));
            }

            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let needed = if line.is_empty() {
            word.len()
        } else {
            line.chars().count() + 1 + word.len()
        };

        if needed > max_chars && !line.is_empty() {
            lines.push(mem::take(&mut line));
        }

        if !line.is_empty() {
            line.push(' ');
        }

        line.extend(word);
    }

    if !line.is_empty() {
        lines.push(line);
    }

    lines
}

/// Encode text for the standard fonts' `WinAnsiEncoding`.
fn to_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '€' => 0x80,
            '‚' => 0x82,
            '…' => 0x85,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            _ => u8::try_from(u32::from(c)).unwrap_or(b'?'),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;
    use crate::render::html::BODY_SIZE;

    fn page_count(bytes: &[u8]) -> TestResult<usize> {
        Ok(Document::load_mem(bytes)?.get_pages().len())
    }

    #[test]
    fn short_documents_fit_on_one_page() -> TestResult {
        let bytes = TextLayoutEngine::new().layout(
            "<h1>Invoice</h1><p>Invoice #1</p><table><tr><td>Package</td><td>Rp 150.000</td></tr></table>",
        )?;

        assert!(bytes.starts_with(b"%PDF-1.5"), "missing PDF header");
        assert_eq!(page_count(&bytes)?, 1);

        Ok(())
    }

    #[test]
    fn long_documents_paginate() -> TestResult {
        let html: String = (0..200)
            .map(|n| format!("<p>Line item number {n} with some descriptive text</p>"))
            .collect();

        let bytes = TextLayoutEngine::new().layout(&html)?;

        assert!(page_count(&bytes)? > 1, "200 paragraphs should not fit on one page");

        Ok(())
    }

    #[test]
    fn empty_html_still_yields_a_page() -> TestResult {
        let bytes = TextLayoutEngine::new().layout("")?;

        assert_eq!(page_count(&bytes)?, 1);

        Ok(())
    }

    /// Font size and text of every `Tj` in the document, in page order.
    fn shown_text(bytes: &[u8]) -> TestResult<Vec<(f32, String)>> {
        let document = Document::load_mem(bytes)?;
        let mut shown = Vec::new();

        for page_id in document.get_pages().into_values() {
            let content = Content::decode(&document.get_page_content(page_id)?)?;
            let mut size = 0.0;

            for operation in content.operations {
                match operation.operator.as_str() {
                    "Tf" => size = operation.operands[1].as_float()?,
                    "Tj" => shown.push((
                        size,
                        String::from_utf8_lossy(operation.operands[0].as_str()?).into_owned(),
                    )),
                    _ => {}
                }
            }
        }

        Ok(shown)
    }

    #[test]
    fn inline_styles_hide_and_resize_text() -> TestResult {
        let body = "<body><h1>Receipt</h1><p>Paid</p></body>";
        let engine = TextLayoutEngine::new();

        let plain = engine.layout(&format!("<html><head></head>{body}</html>"))?;
        let styled = engine.layout(&format!(
            "<html><head><style>h1 {{ display: none; }} body {{ font-size: 40pt; }}</style></head>{body}</html>"
        ))?;

        assert_eq!(
            shown_text(&plain)?,
            vec![(16.0, "Receipt".to_string()), (10.0, "Paid".to_string())]
        );
        assert_eq!(shown_text(&styled)?, vec![(40.0, "Paid".to_string())]);

        Ok(())
    }

    #[test]
    fn malformed_markup_is_an_error() {
        let result = TextLayoutEngine::new().layout("<p><b>Total</p>");

        assert!(
            matches!(result, Err(RenderError::Markup(_))),
            "expected Markup error, got {result:?}"
        );
    }

    #[test]
    fn wrap_breaks_on_words_and_splits_long_words() {
        let max_chars_width = 10.0 * BODY_SIZE * GLYPH_WIDTH;

        assert_eq!(
            wrap("alpha beta gamma", BODY_SIZE, max_chars_width),
            vec!["alpha beta", "gamma"]
        );
        assert_eq!(
            wrap("abcdefghijklmno", BODY_SIZE, max_chars_width),
            vec!["abcdefghij", "klmno"]
        );
        assert!(wrap("   ", BODY_SIZE, max_chars_width).is_empty(), "blank text");
    }

    #[test]
    fn win_ansi_maps_latin1_and_typographic_marks() {
        assert_eq!(to_win_ansi("Rp é–·"), vec![b'R', b'p', b' ', 0xE9, 0x96, 0xB7]);
        assert_eq!(to_win_ansi("✓"), vec![b'?']);
    }
}
