//! Flattens rendered invoice XHTML into styled blocks of plain text for the text layout
//! engine.
//!
//! Only the structure invoice templates use is understood: headings, paragraph-like
//! containers, table rows and horizontal rules. `<style>` elements feed the rules in
//! [`css`](crate::render::css); `<head>` and `<script>` content is dropped, as are images.
//! Markup must be well-formed XML, so void elements are written `<hr/>` and `<img .../>`.

use std::mem;

use quick_xml::{
    Reader,
    events::{BytesStart, BytesText, Event},
};

use crate::render::{
    RenderError,
    css::{FontSize, StyleRules},
};

/// Font size of body text, in points.
pub(crate) const BODY_SIZE: f32 = 10.0;

/// Font size of headings without a size of their own, in points.
pub(crate) const HEADING_SIZE: f32 = 16.0;

const HEADINGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

const BLOCKS: [&str; 12] = [
    "p", "div", "br", "li", "ul", "ol", "section", "header", "footer", "address", "article",
    "main",
];

/// Font settings for a block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TextStyle {
    pub(crate) size: f32,
    pub(crate) bold: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: BODY_SIZE,
            bold: false,
        }
    }
}

/// A unit of laid-out text.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Block {
    Text(String, TextStyle),
    Row(Vec<String>, TextStyle),
    Rule,
}

pub(crate) fn extract_blocks(html: &str) -> Result<Vec<Block>, RenderError> {
    let mut reader = Reader::from_str(html);
    reader.config_mut().trim_text(false);

    let mut extractor = Extractor::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(tag) => extractor.start(&tag)?,
            Event::Empty(tag) => {
                extractor.start(&tag)?;
                extractor.end(&element_name(&tag));
            }
            Event::End(tag) => extractor.end(&lowercase(tag.local_name().as_ref())),
            Event::Text(text) => extractor.text(&text)?,
            Event::CData(data) => extractor.raw(&String::from_utf8_lossy(&data)),
            Event::Eof => break,
            _ => {}
        }

        buf.clear();
    }

    Ok(extractor.finish())
}

fn lowercase(name: &[u8]) -> String {
    String::from_utf8_lossy(name).to_ascii_lowercase()
}

fn element_name(tag: &BytesStart) -> String {
    lowercase(tag.local_name().as_ref())
}

fn class_list(tag: &BytesStart) -> Result<Vec<String>, RenderError> {
    let mut classes = Vec::new();

    for attribute in tag.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::InvalidAttr)?;

        if attribute.key.local_name().as_ref() == b"class" {
            classes.extend(
                String::from_utf8_lossy(&attribute.value)
                    .split_whitespace()
                    .map(str::to_string),
            );
        }
    }

    Ok(classes)
}

/// HTML entities the templates use on top of the XML ones.
fn html_entity(name: &str) -> Option<&'static str> {
    match name {
        "amp" => Some("&"),
        "lt" => Some("<"),
        "gt" => Some(">"),
        "quot" => Some("\""),
        "apos" => Some("'"),
        "nbsp" => Some("\u{a0}"),
        "middot" => Some("·"),
        "ndash" => Some("–"),
        "mdash" => Some("—"),
        _ => None,
    }
}

/// Computed style of an open element.
#[derive(Debug, Clone, Copy, Default)]
struct Frame {
    hidden: bool,
    style: TextStyle,
}

#[derive(Debug, Default)]
struct Extractor {
    rules: StyleRules,
    stack: Vec<Frame>,
    blocks: Vec<Block>,
    text: String,
    text_style: TextStyle,
    row: Option<(Vec<String>, TextStyle)>,
    cell: Option<String>,
    css: Option<String>,
}

impl Extractor {
    fn current(&self) -> Frame {
        self.stack.last().copied().unwrap_or_default()
    }

    fn start(&mut self, tag: &BytesStart) -> Result<(), RenderError> {
        let name = element_name(tag);
        let parent = self.current();

        if name == "style" {
            self.css = Some(String::new());
            self.stack.push(Frame {
                hidden: true,
                ..parent
            });

            return Ok(());
        }

        let declared = self.rules.cascade(&name, &class_list(tag)?);
        let mut frame = parent;

        if HEADINGS.contains(&name.as_str()) {
            frame.style = TextStyle {
                size: HEADING_SIZE,
                bold: true,
            };
        }

        match declared.font_size {
            Some(FontSize::Points(points)) => frame.style.size = points,
            Some(FontSize::Scale(factor)) => frame.style.size = parent.style.size * factor,
            None => {}
        }

        if let Some(bold) = declared.bold {
            frame.style.bold = bold;
        }

        frame.hidden = parent.hidden
            || declared.hidden == Some(true)
            || matches!(name.as_str(), "head" | "script" | "title");

        self.stack.push(frame);

        if frame.hidden {
            return Ok(());
        }

        match name.as_str() {
            "tr" => {
                self.end_row();
                self.flush();
                self.row = Some((Vec::new(), frame.style));
            }
            "td" | "th" => {
                self.end_cell();
                self.cell = Some(String::new());
            }
            "table" | "thead" | "tbody" | "tfoot" => {
                self.end_row();
                self.flush();
            }
            "hr" => {
                self.flush();
                self.blocks.push(Block::Rule);
            }
            name if HEADINGS.contains(&name) || BLOCKS.contains(&name) => self.block_boundary(),
            _ => {}
        }

        Ok(())
    }

    fn end(&mut self, name: &str) {
        if name == "style" {
            if let Some(css) = self.css.take() {
                self.rules.extend(&css);
            }
        } else if !self.current().hidden {
            match name {
                "tr" | "table" | "thead" | "tbody" | "tfoot" => {
                    self.end_row();
                    self.flush();
                }
                "td" | "th" => self.end_cell(),
                name if HEADINGS.contains(&name) || BLOCKS.contains(&name) => self.block_boundary(),
                _ => {}
            }
        }

        self.stack.pop();
    }

    fn block_boundary(&mut self) {
        if let Some(cell) = &mut self.cell {
            push_collapsed(cell, " ");
        } else {
            self.flush();
        }
    }

    fn text(&mut self, text: &BytesText) -> Result<(), RenderError> {
        if let Some(css) = &mut self.css {
            css.push_str(&String::from_utf8_lossy(text));
            return Ok(());
        }

        if self.current().hidden {
            return Ok(());
        }

        let decoded = text.unescape_with(html_entity)?;
        self.push_text(&decoded);

        Ok(())
    }

    fn raw(&mut self, text: &str) {
        if let Some(css) = &mut self.css {
            css.push_str(text);
        } else if !self.current().hidden {
            self.push_text(text);
        }
    }

    fn push_text(&mut self, text: &str) {
        match &mut self.cell {
            Some(cell) => push_collapsed(cell, text),
            None => {
                if self.text.trim().is_empty() {
                    self.text_style = self.current().style;
                }

                push_collapsed(&mut self.text, text);
            }
        }
    }

    fn flush(&mut self) {
        let text = mem::take(&mut self.text);
        let text = text.trim();

        if !text.is_empty() {
            self.blocks
                .push(Block::Text(text.to_string(), self.text_style));
        }
    }

    fn end_cell(&mut self) {
        let Some(cell) = self.cell.take() else {
            return;
        };

        let cell = cell.trim().to_string();

        match &mut self.row {
            Some((cells, _)) => cells.push(cell),
            None => push_collapsed(&mut self.text, &cell),
        }
    }

    fn end_row(&mut self) {
        self.end_cell();

        let Some((cells, style)) = self.row.take() else {
            return;
        };

        if cells.iter().any(|cell| !cell.is_empty()) {
            self.blocks.push(Block::Row(cells, style));
        }

        // Whitespace between cells.
        self.text.clear();
    }

    fn finish(mut self) -> Vec<Block> {
        self.end_row();
        self.flush();

        self.blocks
    }
}

/// Append `text` collapsing runs of whitespace into single spaces.
fn push_collapsed(target: &mut String, text: &str) {
    for c in text.chars() {
        if c.is_whitespace() {
            if !target.is_empty() && !target.ends_with(' ') {
                target.push(' ');
            }
        } else {
            target.push(c);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADING: TextStyle = TextStyle {
        size: HEADING_SIZE,
        bold: true,
    };

    fn body() -> TextStyle {
        TextStyle::default()
    }

    fn text(value: &str, style: TextStyle) -> Block {
        Block::Text(value.to_string(), style)
    }

    fn row(cells: &[&str]) -> Block {
        Block::Row(cells.iter().map(|cell| (*cell).to_string()).collect(), body())
    }

    #[test]
    fn headings_paragraphs_and_rows_are_separated() -> Result<(), RenderError> {
        let blocks = extract_blocks(
            r#"<!DOCTYPE html>
            <html><head><meta charset="utf-8"/><title>ignored</title></head>
            <body>
              <h1>Invoice</h1>
              <p>Invoice #7</p>
              <table>
                <tr><th>Item</th><th>Total</th></tr>
                <tr><td>Package</td><td>Rp 150.000</td></tr>
              </table>
              <hr/>
              <ul><li>Pay by transfer</li><li>Ask on Discord</li></ul>
            </body></html>"#,
        )?;

        assert_eq!(
            blocks,
            vec![
                text("Invoice", HEADING),
                text("Invoice #7", body()),
                row(&["Item", "Total"]),
                row(&["Package", "Rp 150.000"]),
                Block::Rule,
                text("Pay by transfer", body()),
                text("Ask on Discord", body()),
            ]
        );

        Ok(())
    }

    #[test]
    fn entities_are_decoded_and_whitespace_collapsed() -> Result<(), RenderError> {
        let blocks = extract_blocks("<p>Fish &amp;   Chips&nbsp;&#8211; &#x41;\n  &middot;</p>")?;

        assert_eq!(blocks, vec![text("Fish & Chips – A ·", body())]);

        Ok(())
    }

    #[test]
    fn quoted_attribute_values_may_contain_angle_brackets() -> Result<(), RenderError> {
        let blocks = extract_blocks(r#"<table><tr><td data-x="a>b">Qty</td><td>2</td></tr></table>"#)?;

        assert_eq!(blocks, vec![row(&["Qty", "2"])]);

        Ok(())
    }

    #[test]
    fn empty_cells_keep_their_column() -> Result<(), RenderError> {
        let blocks = extract_blocks("<table><tr><td>Shipping</td><td></td><td>Rp 0</td></tr></table>")?;

        assert_eq!(blocks, vec![row(&["Shipping", "", "Rp 0"])]);

        Ok(())
    }

    #[test]
    fn comments_and_images_produce_nothing() -> Result<(), RenderError> {
        let blocks = extract_blocks(r#"<div><!-- note --><img src="file:///logo.svg" alt="Logo"/><p>Hi</p></div>"#)?;

        assert_eq!(blocks, vec![text("Hi", body())]);

        Ok(())
    }

    #[test]
    fn style_elements_hide_and_resize_content() -> Result<(), RenderError> {
        let blocks = extract_blocks(
            r#"<html><head><style>
              h1 { display: none; }
              body { font-size: 20pt; }
              .status { font-weight: bold; font-size: 50%; }
            </style></head>
            <body><h1>Invoice</h1><p>Sari</p><p class="status">UNPAID</p></body></html>"#,
        )?;

        assert_eq!(
            blocks,
            vec![
                text(
                    "Sari",
                    TextStyle {
                        size: 20.0,
                        bold: false
                    }
                ),
                text(
                    "UNPAID",
                    TextStyle {
                        size: 10.0,
                        bold: true
                    }
                ),
            ]
        );

        Ok(())
    }

    #[test]
    fn mismatched_tags_are_rejected() {
        let result = extract_blocks("<p>Unclosed <b>bold</p>");

        assert!(
            matches!(result, Err(RenderError::Markup(_))),
            "expected Markup error, got {result:?}"
        );
    }

    #[test]
    fn unknown_entities_are_rejected() {
        let result = extract_blocks("<p>Fish &bogus; Chips</p>");

        assert!(
            matches!(result, Err(RenderError::Markup(_))),
            "expected Markup error, got {result:?}"
        );
    }
}
