//! Page layout for exported curricula and roadmaps.
//!
//! # Page-building states
//! `NewDocument → InPage (header drawn) → body rows … [page break → InPage …] → Finalized`
//!
//! `PageBuilder` owns the cursor. Every `add_page` closes the current page with
//! the decoration's footer and opens the next one with its header, so callers
//! never draw the brand band or page numbers themselves. Cells that would cross
//! the bottom margin trigger that break automatically.
//!
//! All coordinates are millimetres from the top-left corner of an A4 page.

use crate::render::encoding::{encode_win_ansi, EncodingError};
use crate::render::font_metrics::{get_metrics, FontStyle, PT_PER_MM};
use crate::render::sanitize::sanitize;

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_LEFT: f32 = 10.0;
const MARGIN_RIGHT: f32 = 10.0;
const MARGIN_TOP: f32 = 10.0;
/// Auto page break fires when a cell would end below `PAGE_HEIGHT_MM - this`.
const BREAK_MARGIN: f32 = 15.0;
/// Horizontal padding inside a cell.
const CELL_PADDING: f32 = 1.0;

pub const BRAND_TITLE: &str = "CurricuForge";
pub const BRAND_SUBTITLE: &str = "AI-Generated Learning Document";
pub const BODY_SECTION_TITLE: &str = "Curriculum / Roadmap";
pub const RUBRIC_SECTION_TITLE: &str = "Rubric & Bloom's Taxonomy";

const HEADER_BAND_HEIGHT: f32 = 25.0;
const HEADER_BAND_COLOR: Rgb = Rgb(30, 30, 60);
const SECTION_TITLE_FILL: Rgb = Rgb(230, 230, 250);
const FOOTER_GREY: Rgb = Rgb(120, 120, 120);
const BODY_ROW_HEIGHT: f32 = 7.0;

// ────────────────────────────────────────────────────────────────────────────
// Laid-out page model
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    FillRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Rgb,
    },
    Text {
        x: f32,
        /// Baseline position.
        y: f32,
        style: FontStyle,
        size_pt: f32,
        color: Rgb,
        text: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    /// 1-based.
    pub number: usize,
    pub elements: Vec<Element>,
}

#[cfg(test)]
impl PageLayout {
    /// Text runs on this page in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = (&str, FontStyle, f32)> {
        self.elements.iter().filter_map(|e| match e {
            Element::Text {
                text,
                style,
                size_pt,
                ..
            } => Some((text.as_str(), *style, *size_pt)),
            Element::FillRect { .. } => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    pub pages: Vec<PageLayout>,
}

impl DocumentLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Per-page decoration hook
// ────────────────────────────────────────────────────────────────────────────

/// Called by `PageBuilder` at the top and bottom of every page.
pub trait PageDecoration {
    fn header(&self, page: &mut PageBuilder<'_>);
    fn footer(&self, page: &mut PageBuilder<'_>);
}

/// Brand band across the top, centred page number at the bottom.
pub struct BrandDecoration;

impl PageDecoration for BrandDecoration {
    fn header(&self, page: &mut PageBuilder<'_>) {
        page.fill_rect(0.0, 0.0, PAGE_WIDTH_MM, HEADER_BAND_HEIGHT, HEADER_BAND_COLOR);

        page.set_text_color(Rgb::WHITE);
        page.cell(15.0, BRAND_TITLE, FontStyle::Bold, 18.0, Align::Center, None);
        page.cell(5.0, BRAND_SUBTITLE, FontStyle::Regular, 10.0, Align::Center, None);
        page.ln(10.0);

        page.set_text_color(Rgb::BLACK);
    }

    fn footer(&self, page: &mut PageBuilder<'_>) {
        page.set_y_from_bottom(15.0);
        page.set_text_color(FOOTER_GREY);
        let label = format!("Page {}", page.page_number());
        page.cell(10.0, &label, FontStyle::Italic, 9.0, Align::Center, None);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Page builder (state machine)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BuildState {
    NewDocument,
    InPage,
    Finalized,
}

pub struct PageBuilder<'a> {
    decoration: &'a dyn PageDecoration,
    state: BuildState,
    pages: Vec<PageLayout>,
    y: f32,
    text_color: Rgb,
    /// Suppresses auto page break while a header or footer is drawing.
    in_decoration: bool,
}

impl<'a> PageBuilder<'a> {
    pub fn new(decoration: &'a dyn PageDecoration) -> Self {
        Self {
            decoration,
            state: BuildState::NewDocument,
            pages: Vec::new(),
            y: MARGIN_TOP,
            text_color: Rgb::BLACK,
            in_decoration: false,
        }
    }

    pub fn page_number(&self) -> usize {
        self.pages.len()
    }

    /// Closes the current page (footer) and opens a new one (header).
    pub fn add_page(&mut self) {
        debug_assert!(self.state != BuildState::Finalized);
        if self.state == BuildState::InPage {
            self.run_footer();
        }

        self.pages.push(PageLayout {
            number: self.pages.len() + 1,
            elements: Vec::new(),
        });
        self.state = BuildState::InPage;
        self.y = MARGIN_TOP;

        let decoration = self.decoration;
        self.in_decoration = true;
        decoration.header(self);
        self.in_decoration = false;
    }

    fn run_footer(&mut self) {
        let decoration = self.decoration;
        let color = self.text_color;
        self.in_decoration = true;
        decoration.footer(self);
        self.in_decoration = false;
        self.text_color = color;
    }

    pub fn set_text_color(&mut self, color: Rgb) {
        self.text_color = color;
    }

    pub fn set_y_from_bottom(&mut self, distance: f32) {
        self.y = PAGE_HEIGHT_MM - distance;
    }

    pub fn ln(&mut self, h: f32) {
        self.y += h;
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb) {
        self.push(Element::FillRect { x, y, w, h, color });
    }

    /// One full-width row of text `h` mm high; the cursor moves below it.
    pub fn cell(
        &mut self,
        h: f32,
        text: &str,
        style: FontStyle,
        size_pt: f32,
        align: Align,
        fill: Option<Rgb>,
    ) {
        if self.state == BuildState::NewDocument {
            self.add_page();
        }
        if !self.in_decoration && self.y + h > PAGE_HEIGHT_MM - BREAK_MARGIN {
            self.add_page();
        }

        let width = PAGE_WIDTH_MM - MARGIN_LEFT - MARGIN_RIGHT;
        if let Some(color) = fill {
            self.fill_rect(MARGIN_LEFT, self.y, width, h, color);
        }

        if !text.is_empty() {
            let x = match align {
                Align::Left => MARGIN_LEFT + CELL_PADDING,
                Align::Center => {
                    let text_w = get_metrics(style).measure_mm(text, size_pt);
                    MARGIN_LEFT + (width - text_w) / 2.0
                }
            };
            let font_mm = size_pt / PT_PER_MM;
            let baseline = self.y + 0.5 * h + 0.3 * font_mm;
            self.push(Element::Text {
                x,
                y: baseline,
                style,
                size_pt,
                color: self.text_color,
                text: text.to_string(),
            });
        }

        self.y += h;
    }

    /// Word-wrapped block: one `cell` per wrapped row.
    pub fn multi_cell(
        &mut self,
        h: f32,
        text: &str,
        style: FontStyle,
        size_pt: f32,
        fill: Option<Rgb>,
    ) {
        let max_width = PAGE_WIDTH_MM - MARGIN_LEFT - MARGIN_RIGHT - 2.0 * CELL_PADDING;
        for row in get_metrics(style).wrap(text, size_pt, max_width) {
            self.cell(h, &row, style, size_pt, Align::Left, fill);
        }
    }

    /// Draws the last footer and returns the finished pages.
    pub fn finish(mut self) -> DocumentLayout {
        if self.state == BuildState::NewDocument {
            self.add_page();
        }
        self.run_footer();
        self.state = BuildState::Finalized;
        DocumentLayout { pages: self.pages }
    }

    fn push(&mut self, element: Element) {
        if let Some(page) = self.pages.last_mut() {
            page.elements.push(element);
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Body line classification
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    /// Helvetica-Bold 12.
    Heading,
    /// Helvetica 11.
    Body,
}

impl LineStyle {
    fn font(self) -> (FontStyle, f32) {
        match self {
            LineStyle::Heading => (FontStyle::Bold, 12.0),
            LineStyle::Body => (FontStyle::Regular, 11.0),
        }
    }
}

/// A line is a heading when its trimmed form ends with `:`. Nothing else is
/// inspected, so `See http:` is a heading too.
pub fn classify_line(line: &str) -> LineStyle {
    if line.trim().ends_with(':') {
        LineStyle::Heading
    } else {
        LineStyle::Body
    }
}

/// Splits on `\n` (carriage returns dropped) and classifies each line.
pub fn classify_body(text: &str) -> Vec<(LineStyle, String)> {
    text.split('\n')
        .map(|line| {
            let line = line.replace('\r', "");
            (classify_line(&line), line)
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Document layout
// ────────────────────────────────────────────────────────────────────────────

/// Lays out the exported document: title, body section, and an optional
/// rubric section on a fresh page.
///
/// Every input string is sanitized and must then be WinAnsi-encodable; the
/// first character that is not aborts the whole layout.
pub fn layout_document(
    title: &str,
    body: &str,
    rubric: Option<&str>,
) -> Result<DocumentLayout, EncodingError> {
    let title = checked(title)?;
    let body = checked(body)?;
    let rubric = rubric
        .filter(|r| !r.is_empty())
        .map(checked)
        .transpose()?;

    let decoration = BrandDecoration;
    let mut page = PageBuilder::new(&decoration);
    page.add_page();

    page.multi_cell(12.0, &title, FontStyle::Bold, 16.0, None);
    page.ln(5.0);

    section(&mut page, BODY_SECTION_TITLE, &body);

    if let Some(rubric) = rubric {
        page.add_page();
        section(&mut page, RUBRIC_SECTION_TITLE, &rubric);
    }

    Ok(page.finish())
}

fn checked(text: &str) -> Result<String, EncodingError> {
    let clean = sanitize(text);
    encode_win_ansi(&clean)?;
    Ok(clean)
}

fn section(page: &mut PageBuilder<'_>, title: &str, body: &str) {
    page.multi_cell(10.0, title, FontStyle::Bold, 14.0, Some(SECTION_TITLE_FILL));
    page.ln(3.0);

    for (style, line) in classify_body(body) {
        let (font, size) = style.font();
        page.multi_cell(BODY_ROW_HEIGHT, &line, font, size, None);
    }

    page.ln(4.0);
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn body_texts(layout: &DocumentLayout) -> Vec<(String, FontStyle, f32)> {
        layout
            .pages
            .iter()
            .flat_map(|p| p.texts().map(|(t, s, z)| (t.to_string(), s, z)))
            .filter(|(t, _, _)| {
                t != BRAND_TITLE && t != BRAND_SUBTITLE && !t.starts_with("Page ")
            })
            .collect()
    }

    #[test]
    fn test_classify_marks_colon_lines_as_headings() {
        let styles: Vec<LineStyle> = classify_body("Overview:\nThis course covers X.\nWeek 1:\nIntro")
            .into_iter()
            .map(|(s, _)| s)
            .collect();
        assert_eq!(
            styles,
            vec![
                LineStyle::Heading,
                LineStyle::Body,
                LineStyle::Heading,
                LineStyle::Body
            ]
        );
    }

    #[test]
    fn test_classify_trims_before_checking_colon() {
        assert_eq!(classify_line("  Week 2:   "), LineStyle::Heading);
        assert_eq!(classify_line("Week 2: Ownership"), LineStyle::Body);
    }

    #[test]
    fn test_classify_keeps_false_positives() {
        assert_eq!(classify_line("Docs at http:"), LineStyle::Heading);
    }

    #[test]
    fn test_classify_drops_carriage_returns() {
        let lines = classify_body("Goals:\r\nLearn\r\n");
        assert_eq!(lines[0], (LineStyle::Heading, "Goals:".to_string()));
        assert_eq!(lines[1], (LineStyle::Body, "Learn".to_string()));
        assert_eq!(lines[2], (LineStyle::Body, String::new()));
    }

    #[test]
    fn test_heading_lines_render_bold_12() {
        let layout =
            layout_document("Rust", "Overview:\nThis course covers X.\nWeek 1:\nIntro", None)
                .unwrap();
        let texts = body_texts(&layout);
        let find = |needle: &str| texts.iter().find(|(t, _, _)| t == needle).cloned().unwrap();
        assert_eq!(find("Overview:").1, FontStyle::Bold);
        assert_eq!(find("Overview:").2, 12.0);
        assert_eq!(find("This course covers X.").1, FontStyle::Regular);
        assert_eq!(find("This course covers X.").2, 11.0);
        assert_eq!(find("Week 1:").1, FontStyle::Bold);
        assert_eq!(find("Intro").1, FontStyle::Regular);
    }

    #[test]
    fn test_short_document_without_rubric_is_one_page() {
        let layout = layout_document("Rust (Undergraduate)", "Overview:\nIntro", None).unwrap();
        assert_eq!(layout.page_count(), 1);
        assert!(!body_texts(&layout)
            .iter()
            .any(|(t, _, _)| t == RUBRIC_SECTION_TITLE));
    }

    #[test]
    fn test_empty_rubric_adds_no_page() {
        let layout = layout_document("Rust", "Intro", Some("")).unwrap();
        assert_eq!(layout.page_count(), 1);
    }

    #[test]
    fn test_rubric_starts_on_new_page() {
        let layout =
            layout_document("Rust", "Overview:\nIntro", Some("Remember:\nRecall terms")).unwrap();
        assert_eq!(layout.page_count(), 2);
        let second: Vec<&str> = layout.pages[1].texts().map(|(t, _, _)| t).collect();
        assert!(second.contains(&RUBRIC_SECTION_TITLE));
        assert!(second.contains(&"Recall terms"));
        let first: Vec<&str> = layout.pages[0].texts().map(|(t, _, _)| t).collect();
        assert!(!first.contains(&RUBRIC_SECTION_TITLE));
    }

    #[test]
    fn test_every_page_has_header_and_footer() {
        let body = (1..=120)
            .map(|i| format!("Line {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let layout = layout_document("Long", &body, Some("Rubric:")).unwrap();
        assert!(layout.page_count() >= 3);
        for page in &layout.pages {
            let texts: Vec<&str> = page.texts().map(|(t, _, _)| t).collect();
            assert_eq!(texts[0], BRAND_TITLE);
            assert_eq!(texts[1], BRAND_SUBTITLE);
            assert_eq!(*texts.last().unwrap(), format!("Page {}", page.number));
            assert!(matches!(
                page.elements[0],
                Element::FillRect { color: HEADER_BAND_COLOR, .. }
            ));
        }
    }

    #[test]
    fn test_body_never_crosses_bottom_margin() {
        let body = "A line of body text\n".repeat(200);
        let layout = layout_document("Long", &body, None).unwrap();
        for page in &layout.pages {
            for element in &page.elements {
                if let Element::Text { y, text, .. } = element {
                    if !text.starts_with("Page ") {
                        assert!(*y < PAGE_HEIGHT_MM - BREAK_MARGIN, "{text} at {y}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_body_lines_keep_order_across_pages() {
        let body = (1..=80)
            .map(|i| format!("Item {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let layout = layout_document("Ordered", &body, None).unwrap();
        let items: Vec<String> = body_texts(&layout)
            .into_iter()
            .map(|(t, _, _)| t)
            .filter(|t| t.starts_with("Item "))
            .collect();
        let expected: Vec<String> = (1..=80).map(|i| format!("Item {i}")).collect();
        assert_eq!(items, expected);
    }

    #[test]
    fn test_inputs_are_sanitized() {
        let layout = layout_document(
            "\u{201C}Rust\u{201D}",
            "**Overview**:\nIt\u{2019}s *fun*",
            None,
        )
        .unwrap();
        let texts: Vec<String> = body_texts(&layout).into_iter().map(|(t, _, _)| t).collect();
        assert!(texts.contains(&"\"Rust\"".to_string()));
        assert!(texts.contains(&"Overview:".to_string()));
        assert!(texts.contains(&"It's fun".to_string()));
    }

    #[test]
    fn test_unencodable_character_fails() {
        let err = layout_document("Rust", "Week 1: \u{1F680} launch", None).unwrap_err();
        assert_eq!(err.character, '\u{1F680}');
    }

    #[test]
    fn test_unencodable_rubric_fails() {
        assert!(layout_document("Rust", "ok", Some("\u{2713} done")).is_err());
    }

    #[test]
    fn test_layout_is_deterministic() {
        let a = layout_document("Rust", "Overview:\nIntro", Some("Rubric")).unwrap();
        let b = layout_document("Rust", "Overview:\nIntro", Some("Rubric")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_finish_without_pages_emits_one_decorated_page() {
        let decoration = BrandDecoration;
        let layout = PageBuilder::new(&decoration).finish();
        assert_eq!(layout.page_count(), 1);
        let texts: Vec<&str> = layout.pages[0].texts().map(|(t, _, _)| t).collect();
        assert_eq!(texts, vec![BRAND_TITLE, BRAND_SUBTITLE, "Page 1"]);
    }
}
