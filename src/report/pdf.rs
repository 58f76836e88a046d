// src/report/pdf.rs — Paginated PDF output
//
// A small flow layout on top of printpdf: a cursor walks down a US Letter
// page with 1" margins, wrapping text by an estimated Helvetica advance
// width and opening a new page when the cursor reaches the bottom margin.

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Rgb,
};

use super::layout::{Block, ReportLayout};
use crate::infra::errors::RubrixError;

const PAGE_W: f32 = 215.9;
const PAGE_H: f32 = 279.4;
const MARGIN: f32 = 25.4;
const PT_TO_MM: f32 = 0.352_778;
/// Average Helvetica glyph advance as a fraction of the font size.
const AVG_GLYPH_EM: f32 = 0.5;
const COURIER_GLYPH_EM: f32 = 0.6;
const LABEL_COLUMN: f32 = 50.8;

const TITLE_COLOR: &str = "#2C3E50";
const HEADING_COLOR: &str = "#3498DB";
const SUBHEADING_COLOR: &str = "#7F8C8D";
const BODY_COLOR: &str = "#000000";

#[derive(Debug)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

#[derive(Clone, Copy)]
struct Style {
    size: f32,
    /// Average glyph advance as a fraction of `size`.
    glyph_em: f32,
    weight: Weight,
    color: &'static str,
    space_before: f32,
    space_after: f32,
}

#[derive(Clone, Copy)]
enum Weight {
    Regular,
    Bold,
    Italic,
    Mono,
}

const TITLE: Style = Style {
    size: 24.0,
    glyph_em: AVG_GLYPH_EM,
    weight: Weight::Bold,
    color: TITLE_COLOR,
    space_before: 0.0,
    space_after: 10.0,
};
const SUBTITLE: Style = Style {
    size: 14.0,
    glyph_em: AVG_GLYPH_EM,
    weight: Weight::Regular,
    color: SUBHEADING_COLOR,
    space_before: 0.0,
    space_after: 14.0,
};
const HEADING: Style = Style {
    size: 16.0,
    glyph_em: AVG_GLYPH_EM,
    weight: Weight::Bold,
    color: HEADING_COLOR,
    space_before: 7.0,
    space_after: 4.0,
};
const SUBHEADING: Style = Style {
    size: 14.0,
    glyph_em: AVG_GLYPH_EM,
    weight: Weight::Bold,
    color: SUBHEADING_COLOR,
    space_before: 3.0,
    space_after: 3.0,
};
const BODY: Style = Style {
    size: 11.0,
    glyph_em: AVG_GLYPH_EM,
    weight: Weight::Regular,
    color: BODY_COLOR,
    space_before: 0.0,
    space_after: 2.0,
};
const BODY_BOLD: Style = Style {
    weight: Weight::Bold,
    ..BODY
};
const MONO: Style = Style {
    size: 9.0,
    glyph_em: COURIER_GLYPH_EM,
    weight: Weight::Mono,
    ..BODY
};

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
    mono: IndirectFontRef,
}

impl Fonts {
    fn get(&self, weight: Weight) -> &IndirectFontRef {
        match weight {
            Weight::Regular => &self.regular,
            Weight::Bold => &self.bold,
            Weight::Italic => &self.italic,
            Weight::Mono => &self.mono,
        }
    }
}

struct PdfWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    fonts: Fonts,
    /// Distance from the bottom edge, in mm.
    cursor: f32,
    page_count: usize,
    page_has_content: bool,
}

impl PdfWriter {
    fn new(title: &str) -> Result<Self, RubrixError> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
        let font = |f: BuiltinFont| doc.add_builtin_font(f).map_err(render_err);
        let fonts = Fonts {
            regular: font(BuiltinFont::Helvetica)?,
            bold: font(BuiltinFont::HelveticaBold)?,
            italic: font(BuiltinFont::HelveticaOblique)?,
            mono: font(BuiltinFont::Courier)?,
        };
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            layer,
            fonts,
            cursor: PAGE_H - MARGIN,
            page_count: 1,
            page_has_content: false,
        })
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(
            Mm(PAGE_W),
            Mm(PAGE_H),
            format!("Layer {}", self.page_count + 1),
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.cursor = PAGE_H - MARGIN;
        self.page_count += 1;
        self.page_has_content = false;
    }

    /// Break only if something is already on this page; never emit blanks.
    fn page_break(&mut self) {
        if self.page_has_content {
            self.new_page();
        }
    }

    fn space(&mut self, mm: f32) {
        if self.page_has_content {
            self.cursor -= mm;
        }
    }

    fn line_height(style: &Style) -> f32 {
        style.size * 1.25 * PT_TO_MM
    }

    fn ensure_room(&mut self, height: f32) {
        if self.cursor - height < MARGIN && self.page_has_content {
            self.new_page();
        }
    }

    fn draw_line(&mut self, text: &str, style: &Style, x: f32) {
        let lh = Self::line_height(style);
        self.ensure_room(lh);
        self.cursor -= lh;
        self.layer.set_fill_color(hex_color(style.color));
        self.layer.use_text(
            pdf_safe(text),
            style.size,
            Mm(x),
            Mm(self.cursor),
            self.fonts.get(style.weight),
        );
        self.page_has_content = true;
    }

    /// Wrapped paragraph starting at `indent` mm from the left margin.
    fn text(&mut self, text: &str, style: &Style, indent: f32) {
        self.space(style.space_before);
        let width = PAGE_W - 2.0 * MARGIN - indent;
        for line in wrap(text, max_chars(width, style)) {
            self.draw_line(&line, style, MARGIN + indent);
        }
        self.cursor -= style.space_after;
    }

    fn centered(&mut self, text: &str, style: &Style) {
        let est_width = text.chars().count() as f32 * style.size * style.glyph_em * PT_TO_MM;
        let x = ((PAGE_W - est_width) / 2.0).max(MARGIN);
        self.space(style.space_before);
        self.draw_line(text, style, x);
        self.cursor -= style.space_after;
    }

    fn field_row(&mut self, label: &str, value: &str) {
        let width = PAGE_W - 2.0 * MARGIN - LABEL_COLUMN;
        let lines = wrap(value, max_chars(width, &BODY));
        let lh = Self::line_height(&BODY);
        self.ensure_room(lh * lines.len() as f32);
        let top = self.cursor;
        self.draw_line(label, &BODY_BOLD, MARGIN);
        self.cursor = top;
        for line in &lines {
            self.draw_line(line, &BODY, MARGIN + LABEL_COLUMN);
        }
        self.cursor -= 2.8;
    }

    fn finish(self) -> Result<(Vec<u8>, usize), RubrixError> {
        let pages = self.page_count;
        let bytes = self.doc.save_to_bytes().map_err(render_err)?;
        Ok((bytes, pages))
    }
}

fn render_err(e: impl std::fmt::Display) -> RubrixError {
    RubrixError::Render(format!("PDF: {e}"))
}

fn hex_color(hex: &str) -> Color {
    let hex = hex.trim_start_matches('#');
    let channel = |i: usize| {
        hex.get(i..i + 2)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
            .unwrap_or(0) as f32
            / 255.0
    };
    Color::Rgb(Rgb::new(channel(0), channel(2), channel(4), None))
}

fn max_chars(width_mm: f32, style: &Style) -> usize {
    let glyph_mm = style.size * style.glyph_em * PT_TO_MM;
    ((width_mm / glyph_mm) as usize).max(10)
}

/// Greedy word wrap by character count. Words longer than a line are split.
fn wrap(text: &str, max: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word = word.to_string();
            while word.chars().count() > max {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let split: String = word.chars().take(max).collect();
                word = word.chars().skip(max).collect();
                lines.push(split);
            }
            let needed = current.chars().count() + word.chars().count() + 1;
            if !current.is_empty() && needed > max {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&word);
        }
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// The builtin PDF fonts only cover Latin-1; fold common typography to
/// ASCII and replace anything else outside that range.
fn pdf_safe(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2013}' | '\u{2014}' => '-',
            '\u{2022}' => '-',
            c if (c as u32) < 0x20 => ' ',
            c if (c as u32) <= 0xFF => c,
            _ => '?',
        })
        .collect()
}

/// Draw a layout as a PDF document.
pub fn render_pdf(layout: &ReportLayout) -> Result<RenderedPdf, RubrixError> {
    let mut w = PdfWriter::new(super::layout::REPORT_TITLE)?;

    for section in &layout.sections {
        if section.page_break_before {
            w.page_break();
        }
        if let Some(heading) = &section.heading {
            w.text(heading, &HEADING, 0.0);
        }

        for block in &section.blocks {
            match block {
                Block::Title { text, subtitle } => {
                    w.centered(text, &TITLE);
                    w.centered(subtitle, &SUBTITLE);
                }
                Block::Fields { rows } => {
                    for row in rows {
                        w.field_row(&row.label, &row.value);
                    }
                    w.cursor -= 6.0;
                }
                Block::Subheading { text } => w.text(text, &SUBHEADING, 0.0),
                Block::Paragraph { text } => w.text(text, &BODY, 0.0),
                Block::Preformatted { text } => w.text(text, &MONO, 0.0),
                Block::Labeled { label, text } => {
                    w.text(&format!("{label}:"), &Style { weight: Weight::Italic, ..BODY }, 0.0);
                    w.text(text, &BODY, 5.0);
                }
                Block::Bullets { label, items } => {
                    if let Some(label) = label {
                        w.text(&format!("{label}:"), &BODY_BOLD, 0.0);
                    }
                    for item in items {
                        w.text(&format!("- {item}"), &BODY, 5.0);
                    }
                }
                Block::Indicator { label, text, tone } => {
                    w.text(&format!("{label}:"), &BODY_BOLD, 0.0);
                    w.text(
                        text,
                        &Style {
                            color: tone.hex(),
                            weight: Weight::Bold,
                            ..BODY
                        },
                        5.0,
                    );
                }
            }
        }
        w.space(4.0);
    }

    let (bytes, page_count) = w.finish()?;
    tracing::debug!(pages = page_count, bytes = bytes.len(), "Rendered PDF report");
    Ok(RenderedPdf { bytes, page_count })
}
