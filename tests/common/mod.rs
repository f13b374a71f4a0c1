//! Synthetic PDF documents for integration tests.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};

/// One line of text placed on a page.
pub struct Line {
    pub text: &'static str,
    pub bold: bool,
    pub size: i64,
    pub x: i64,
    pub y: i64,
}

pub fn line(text: &'static str, bold: bool, size: i64, x: i64, y: i64) -> Line {
    Line {
        text,
        bold,
        size,
        x,
        y,
    }
}

pub fn body(text: &'static str, y: i64) -> Line {
    line(text, false, 11, 72, y)
}

/// Build a Letter-sized PDF with one page per entry of `pages`.
///
/// `F1` is Helvetica and `F2` Helvetica-Bold. Every line gets its own text
/// object. When `title` is set it is stored in the Info dictionary as a
/// UTF-16BE string.
pub fn build_pdf(pages: &[Vec<Line>], title: Option<&str>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular,
            "F2" => bold,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for lines in pages {
        let mut operations = Vec::new();
        for l in lines {
            let font = if l.bold { "F2" } else { "F1" };
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec![font.into(), l.size.into()]));
            operations.push(Operation::new("Td", vec![l.x.into(), l.y.into()]));
            operations.push(Operation::new("Tj", vec![Object::string_literal(l.text)]));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations }.encode().unwrap();
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    if let Some(title) = title {
        let mut encoded = vec![0xFE, 0xFF];
        for unit in title.encode_utf16() {
            encoded.extend_from_slice(&unit.to_be_bytes());
        }
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::String(encoded, StringFormat::Hexadecimal),
        });
        doc.trailer.set("Info", info_id);
    }

    let mut data = Vec::new();
    doc.save_to(&mut data).unwrap();
    data
}

/// A two-page report: a large bold title, one numbered section heading and
/// body sentences.
pub fn report_pdf(title: Option<&str>) -> Vec<u8> {
    build_pdf(
        &[
            vec![
                line("Annual Report 2024", true, 24, 180, 720),
                body("The results of the survey are shown in this report.", 660),
                body("It covers the work of the team over the whole year.", 646),
                body("Figures are given in thousands unless noted otherwise.", 632),
            ],
            vec![
                line("1. Introduction", true, 16, 72, 720),
                body("This section describes the scope of the report.", 690),
                body("The remaining sections follow the same structure.", 676),
            ],
        ],
        title,
    )
}
