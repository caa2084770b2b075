// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Small in-memory PDFs for integration tests.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};

/// Baselines (from the bottom of a 792pt page, 12pt text) landing in each band.
pub const HEADER: i64 = 760;
pub const BODY: i64 = 400;
pub const FOOTER: i64 = 40;

/// Left margin used by [`build_pdf`].
pub const LEFT: i64 = 72;

/// Bytes stored verbatim in a `DCTDecode` image stream.
pub const FAKE_JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0xFF, 0xD9];

fn name(value: &str) -> Object {
    Object::Name(value.as_bytes().to_vec())
}

fn text_operations(lines: &[(i64, i64, &str)]) -> Vec<Operation> {
    lines
        .iter()
        .flat_map(|(x, baseline, text)| {
            [
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec![name("F1"), Object::Integer(12)]),
                Operation::new("Td", vec![Object::Integer(*x), Object::Integer(*baseline)]),
                Operation::new(
                    "Tj",
                    vec![Object::String(text.as_bytes().to_vec(), StringFormat::Literal)],
                ),
                Operation::new("ET", vec![]),
            ]
        })
        .collect()
}

fn jpeg_xobject(doc: &mut Document) -> ObjectId {
    let mut dict = Dictionary::new();
    dict.set("Type", name("XObject"));
    dict.set("Subtype", name("Image"));
    dict.set("Width", Object::Integer(1));
    dict.set("Height", Object::Integer(1));
    dict.set("ColorSpace", name("DeviceRGB"));
    dict.set("BitsPerComponent", Object::Integer(8));
    dict.set("Filter", name("DCTDecode"));
    doc.add_object(Stream::new(dict, FAKE_JPEG.to_vec()))
}

/// Build a US Letter PDF with one left-aligned Helvetica line per
/// `(baseline, text)` pair. `jpeg_pages` lists the pages that also carry one
/// image XObject.
pub fn build_pdf(pages: &[&[(i64, &str)]], jpeg_pages: &[usize]) -> Vec<u8> {
    let placed: Vec<Vec<(i64, i64, &str)>> = pages
        .iter()
        .map(|lines| lines.iter().map(|&(y, text)| (LEFT, y, text)).collect())
        .collect();
    let placed: Vec<&[(i64, i64, &str)]> = placed.iter().map(Vec::as_slice).collect();
    build_placed_pdf(&placed, jpeg_pages)
}

/// Like [`build_pdf`], with an explicit `(x, baseline, text)` per string.
pub fn build_placed_pdf(pages: &[&[(i64, i64, &str)]], jpeg_pages: &[usize]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut font = Dictionary::new();
    font.set("Type", name("Font"));
    font.set("Subtype", name("Type1"));
    font.set("BaseFont", name("Helvetica"));
    let font_id = doc.add_object(font);

    let mut kids = Vec::new();
    for (index, lines) in pages.iter().enumerate() {
        let mut fonts = Dictionary::new();
        fonts.set("F1", Object::Reference(font_id));
        let mut resources = Dictionary::new();
        resources.set("Font", Object::Dictionary(fonts));
        if jpeg_pages.contains(&index) {
            let image_id = jpeg_xobject(&mut doc);
            let mut xobjects = Dictionary::new();
            xobjects.set("Im1", Object::Reference(image_id));
            resources.set("XObject", Object::Dictionary(xobjects));
        }

        let content = Content {
            operations: text_operations(lines),
        };
        let content_id = doc.add_object(Stream::new(
            Dictionary::new(),
            content.encode().expect("encode content"),
        ));

        let mut page = Dictionary::new();
        page.set("Type", name("Page"));
        page.set("Parent", Object::Reference(pages_id));
        page.set("Contents", Object::Reference(content_id));
        page.set("Resources", Object::Dictionary(resources));
        kids.push(Object::Reference(doc.add_object(page)));
    }

    let mut pages_dict = Dictionary::new();
    pages_dict.set("Type", name("Pages"));
    pages_dict.set("Count", Object::Integer(kids.len() as i64));
    pages_dict.set("Kids", Object::Array(kids));
    pages_dict.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(612),
            Object::Integer(792),
        ]),
    );
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let mut catalog = Dictionary::new();
    catalog.set("Type", name("Catalog"));
    catalog.set("Pages", Object::Reference(pages_id));
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("save fixture PDF");
    bytes
}

/// Six pages with headings on pages 0, 2, and 4. Page 1 repeats the first
/// chapter title as a running header.
pub fn book() -> Vec<u8> {
    build_pdf(
        &[
            &[(BODY, "Chapter 1 Origins"), (BODY - 20, "It began quietly.")],
            &[(HEADER, "Chapter 1 Origins"), (BODY, "More of the first chapter.")],
            &[(BODY, "Chapter 2: Growth?"), (FOOTER, "3")],
            &[(BODY, "Still growing.")],
            &[(BODY, "Section 3 Decline")],
            &[(BODY, "The end.")],
        ],
        &[],
    )
}
