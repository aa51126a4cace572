//! Serializes a `DocumentLayout` into PDF bytes with `lopdf`.
//!
//! Only the three standard Helvetica faces are referenced, so no font data is
//! embedded. Nothing time- or randomness-dependent is written: identical
//! layouts produce identical bytes.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream, StringFormat};

use crate::render::encoding::encode_win_ansi;
use crate::render::font_metrics::{FontStyle, PT_PER_MM};
use crate::render::layout::{DocumentLayout, Element, PageLayout, Rgb, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use crate::render::RenderError;

/// Writes `layout` as a complete PDF document.
pub fn write_pdf(layout: &DocumentLayout) -> Result<Vec<u8>, RenderError> {
    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();

    let mut fonts = Dictionary::new();
    for style in FontStyle::ALL {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => style.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(style.resource_name(), font_id);
    }
    let resources_id = doc.add_object(dictionary! { "Font" => fonts });

    let mut kids = Vec::with_capacity(layout.pages.len());
    for page in &layout.pages {
        let content = page_content(page)?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                real(0.0),
                real(0.0),
                real(PAGE_WIDTH_MM * PT_PER_MM),
                real(PAGE_HEIGHT_MM * PT_PER_MM),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).map_err(lopdf::Error::from)?;
    Ok(out)
}

fn page_content(page: &PageLayout) -> Result<Content, RenderError> {
    let mut operations = Vec::new();

    for element in &page.elements {
        match element {
            Element::FillRect { x, y, w, h, color } => {
                operations.push(fill_color(*color));
                operations.push(Operation::new(
                    "re",
                    vec![mm(*x), from_top(*y + *h), mm(*w), mm(*h)],
                ));
                operations.push(Operation::new("f", vec![]));
            }
            Element::Text {
                x,
                y,
                style,
                size_pt,
                color,
                text,
            } => {
                let bytes = encode_win_ansi(text)?;
                operations.push(Operation::new("BT", vec![]));
                operations.push(fill_color(*color));
                operations.push(Operation::new(
                    "Tf",
                    vec![Object::Name(style.resource_name().into()), real(*size_pt)],
                ));
                operations.push(Operation::new("Td", vec![mm(*x), from_top(*y)]));
                operations.push(Operation::new(
                    "Tj",
                    vec![Object::String(bytes, StringFormat::Literal)],
                ));
                operations.push(Operation::new("ET", vec![]));
            }
        }
    }

    Ok(Content { operations })
}

fn fill_color(Rgb(r, g, b): Rgb) -> Operation {
    Operation::new(
        "rg",
        vec![
            real(f32::from(r) / 255.0),
            real(f32::from(g) / 255.0),
            real(f32::from(b) / 255.0),
        ],
    )
}

/// Millimetres → points, rounded to 1/100 pt.
fn mm(v: f32) -> Object {
    real(v * PT_PER_MM)
}

/// Top-origin millimetres → PDF bottom-origin points.
fn from_top(y: f32) -> Object {
    mm(PAGE_HEIGHT_MM - y)
}

fn real(v: f32) -> Object {
    Object::Real(((v * 100.0).round() / 100.0).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::layout::layout_document;

    fn parse(bytes: &[u8]) -> Document {
        Document::load_mem(bytes).unwrap()
    }

    fn page_operations(doc: &Document) -> Vec<Vec<Operation>> {
        doc.get_pages()
            .values()
            .map(|id| {
                let raw = doc.get_page_content(*id).unwrap();
                Content::decode(&raw).unwrap().operations
            })
            .collect()
    }

    fn shown_text(ops: &[Operation]) -> Vec<String> {
        ops.iter()
            .filter(|op| op.operator == "Tj")
            .filter_map(|op| match op.operands.first() {
                Some(Object::String(bytes, _)) => Some(String::from_utf8_lossy(bytes).into_owned()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_output_is_a_pdf() {
        let layout = layout_document("Rust", "Overview:\nIntro", None).unwrap();
        let bytes = write_pdf(&layout).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.4"));
    }

    #[test]
    fn test_page_count_matches_layout() {
        let layout = layout_document("Rust", "Overview:\nIntro", Some("Rubric:\nApply")).unwrap();
        let doc = parse(&write_pdf(&layout).unwrap());
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn test_each_page_carries_brand_and_page_number() {
        let layout = layout_document("Rust", "Overview:\nIntro", Some("Rubric:\nApply")).unwrap();
        let doc = parse(&write_pdf(&layout).unwrap());
        for (i, ops) in page_operations(&doc).iter().enumerate() {
            let text = shown_text(ops);
            assert!(text.contains(&"CurricuForge".to_string()));
            assert!(text.contains(&format!("Page {}", i + 1)));
        }
    }

    #[test]
    fn test_heading_uses_bold_font_resource() {
        let layout = layout_document("T", "Week 1:", None).unwrap();
        let doc = parse(&write_pdf(&layout).unwrap());
        let ops = &page_operations(&doc)[0];
        let idx = ops
            .iter()
            .position(|op| {
                op.operator == "Tj"
                    && matches!(op.operands.first(), Some(Object::String(b, _)) if b == b"Week 1:")
            })
            .unwrap();
        let font = ops[..idx]
            .iter()
            .rev()
            .find(|op| op.operator == "Tf")
            .unwrap();
        assert!(matches!(&font.operands[0], Object::Name(n) if n == b"F2"));
    }

    #[test]
    fn test_latin1_text_written_as_win_ansi_bytes() {
        let layout = layout_document("Caf\u{e9}", "Intro", None).unwrap();
        let doc = parse(&write_pdf(&layout).unwrap());
        let ops = &page_operations(&doc)[0];
        assert!(ops.iter().any(|op| op.operator == "Tj"
            && matches!(op.operands.first(), Some(Object::String(b, _)) if b == &[b'C', b'a', b'f', 0xE9])));
    }

    #[test]
    fn test_identical_inputs_give_identical_bytes() {
        let render = || {
            let layout = layout_document("Rust", "Overview:\nIntro", Some("Rubric")).unwrap();
            write_pdf(&layout).unwrap()
        };
        assert_eq!(render(), render());
    }

    #[test]
    fn test_parentheses_survive_round_trip() {
        let layout = layout_document("Rust (Undergraduate)", "Intro", None).unwrap();
        let doc = parse(&write_pdf(&layout).unwrap());
        let text = shown_text(&page_operations(&doc)[0]);
        assert!(text.contains(&"Rust (Undergraduate)".to_string()));
    }
}
