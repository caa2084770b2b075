// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Embedded image extraction: pull image XObjects out of each page's
// resources. JPEG and JPEG 2000 streams are written through untouched;
// 8-bit RGB and grayscale bitmaps are re-encoded as PNG with `image`.

use std::io::Cursor;

use docsplit_core::error::{DocsplitError, Result};
use image::{DynamicImage, GrayImage, ImageFormat, RgbImage};
use lopdf::{Dictionary, Object, Stream};
use tracing::{debug, instrument, warn};

use super::reader::{PdfSource, inherited_attribute, resolve};
use super::text::number;
use crate::source::PageSource;

/// An image pulled out of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedImage {
    /// 0-based page the image is drawn on.
    pub page_index: usize,
    /// Position among the page's image XObjects, 0-based.
    pub image_index: usize,
    /// File extension matching `bytes` (`jpg`, `jp2`, or `png`).
    pub extension: &'static str,
    pub bytes: Vec<u8>,
}

impl EmbeddedImage {
    /// `<base>_page<p>_img<i>.<ext>`, 1-based.
    pub fn file_name(&self, base_name: &str) -> String {
        format!(
            "{}_page{}_img{}.{}",
            base_name,
            self.page_index + 1,
            self.image_index + 1,
            self.extension
        )
    }
}

impl PdfSource {
    /// Extract every image XObject referenced by the document's pages.
    ///
    /// Images in encodings that can't be written as a standalone file, or
    /// that fail to re-encode, are skipped. An image-free document yields an
    /// empty list.
    #[instrument(skip(self))]
    pub fn embedded_images(&self) -> Result<Vec<EmbeddedImage>> {
        let document = self.document();
        let mut images = Vec::new();

        for page_index in 0..self.page_count() {
            let page_id = self.page_id(page_index)?;
            let Some(xobjects) = inherited_attribute(document, page_id, b"Resources")
                .and_then(|res| resolve(document, res).as_dict().ok())
                .and_then(|res| res.get(b"XObject").ok())
                .and_then(|xo| resolve(document, xo).as_dict().ok())
            else {
                continue;
            };

            let mut image_index = 0;
            for (name, value) in xobjects.iter() {
                let Ok(stream) = resolve(document, value).as_stream() else {
                    continue;
                };
                if !is_image(&stream.dict) {
                    continue;
                }

                match encode_image(stream) {
                    Ok(Some((extension, bytes))) => images.push(EmbeddedImage {
                        page_index,
                        image_index,
                        extension,
                        bytes,
                    }),
                    Ok(None) => debug!(
                        page_index,
                        name = %String::from_utf8_lossy(name),
                        "Skipping image in unsupported encoding"
                    ),
                    Err(err) => warn!(
                        page_index,
                        name = %String::from_utf8_lossy(name),
                        error = %err,
                        "Skipping image that failed to encode"
                    ),
                }
                image_index += 1;
            }
        }

        debug!(count = images.len(), "Embedded images extracted");
        Ok(images)
    }
}

fn is_image(dict: &Dictionary) -> bool {
    matches!(dict.get(b"Subtype").and_then(Object::as_name), Ok(name) if name == b"Image")
}

/// Stream filters in application order.
fn filters(dict: &Dictionary) -> Vec<Vec<u8>> {
    match dict.get(b"Filter") {
        Ok(Object::Name(name)) => vec![name.clone()],
        Ok(Object::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_name().ok().map(<[u8]>::to_vec))
            .collect(),
        _ => Vec::new(),
    }
}

fn dimension(dict: &Dictionary, key: &[u8]) -> Option<u32> {
    dict.get(key)
        .ok()
        .and_then(number)
        .filter(|v| *v > 0.0)
        .map(|v| v as u32)
}

/// Turn an image stream into file bytes, or `None` when its encoding isn't
/// supported.
fn encode_image(stream: &Stream) -> Result<Option<(&'static str, Vec<u8>)>> {
    let dict = &stream.dict;
    let filters = filters(dict);

    match filters.last().map(Vec::as_slice) {
        Some(b"DCTDecode") if filters.len() == 1 => {
            return Ok(Some(("jpg", stream.content.clone())));
        }
        Some(b"JPXDecode") if filters.len() == 1 => {
            return Ok(Some(("jp2", stream.content.clone())));
        }
        Some(b"DCTDecode" | b"JPXDecode" | b"CCITTFaxDecode" | b"JBIG2Decode") => return Ok(None),
        _ => {}
    }

    let (Some(width), Some(height)) = (dimension(dict, b"Width"), dimension(dict, b"Height"))
    else {
        return Ok(None);
    };
    let bits = dict.get(b"BitsPerComponent").ok().and_then(number);
    let color_space = dict.get(b"ColorSpace").and_then(Object::as_name).ok();
    if bits != Some(8.0) {
        return Ok(None);
    }

    let raw = if filters.is_empty() {
        stream.content.clone()
    } else {
        match stream.decompressed_content() {
            Ok(raw) => raw,
            Err(err) => {
                debug!(%err, "Cannot decompress image stream");
                return Ok(None);
            }
        }
    };

    let pixels = width as usize * height as usize;
    let image = match color_space {
        Some(b"DeviceRGB") if raw.len() >= pixels * 3 => {
            RgbImage::from_raw(width, height, raw[..pixels * 3].to_vec())
                .map(DynamicImage::ImageRgb8)
        }
        Some(b"DeviceGray") if raw.len() >= pixels => {
            GrayImage::from_raw(width, height, raw[..pixels].to_vec())
                .map(DynamicImage::ImageLuma8)
        }
        _ => None,
    };
    let Some(image) = image else {
        return Ok(None);
    };

    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|err| DocsplitError::ImageError(format!("failed to encode PNG: {}", err)))?;
    Ok(Some(("png", out.into_inner())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImageView;
    use lopdf::Document;

    fn image_stream(entries: Vec<(&str, Object)>, content: Vec<u8>) -> Stream {
        let mut dict = Dictionary::new();
        dict.set("Type", Object::Name(b"XObject".to_vec()));
        dict.set("Subtype", Object::Name(b"Image".to_vec()));
        for (key, value) in entries {
            dict.set(key, value);
        }
        Stream::new(dict, content)
    }

    #[test]
    fn jpeg_passes_through() {
        let stream = image_stream(
            vec![("Filter", Object::Name(b"DCTDecode".to_vec()))],
            vec![0xFF, 0xD8, 0xFF, 0xD9],
        );
        let (ext, bytes) = encode_image(&stream).unwrap().unwrap();
        assert_eq!(ext, "jpg");
        assert_eq!(bytes, vec![0xFF, 0xD8, 0xFF, 0xD9]);
    }

    #[test]
    fn raw_gray_becomes_png() {
        let stream = image_stream(
            vec![
                ("Width", Object::Integer(2)),
                ("Height", Object::Integer(2)),
                ("BitsPerComponent", Object::Integer(8)),
                ("ColorSpace", Object::Name(b"DeviceGray".to_vec())),
            ],
            vec![0, 255, 255, 0],
        );
        let (ext, bytes) = encode_image(&stream).unwrap().unwrap();
        assert_eq!(ext, "png");
        assert_eq!(&bytes[1..4], b"PNG");
    }

    fn rgb_entries(width: i64, height: i64) -> Vec<(&'static str, Object)> {
        vec![
            ("Width", Object::Integer(width)),
            ("Height", Object::Integer(height)),
            ("BitsPerComponent", Object::Integer(8)),
            ("ColorSpace", Object::Name(b"DeviceRGB".to_vec())),
        ]
    }

    /// One page whose resources hold `streams` as `Im1`, `Im2`, ...
    fn source_with_images(streams: Vec<Stream>) -> PdfSource {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut xobjects = Dictionary::new();
        for (index, stream) in streams.into_iter().enumerate() {
            let id = doc.add_object(stream);
            xobjects.set(format!("Im{}", index + 1), Object::Reference(id));
        }
        let mut resources = Dictionary::new();
        resources.set("XObject", Object::Dictionary(xobjects));

        let mut page = Dictionary::new();
        page.set("Type", Object::Name(b"Page".to_vec()));
        page.set("Parent", Object::Reference(pages_id));
        page.set("Resources", Object::Dictionary(resources));
        let page_id = doc.add_object(page);

        let mut pages = Dictionary::new();
        pages.set("Type", Object::Name(b"Pages".to_vec()));
        pages.set("Count", Object::Integer(1));
        pages.set("Kids", Object::Array(vec![Object::Reference(page_id)]));
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(pages_id));
        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", Object::Reference(catalog_id));

        PdfSource::from_document(doc)
    }

    #[test]
    fn flate_rgb_becomes_png() {
        // A flat colour compresses well enough for `compress` to apply Flate.
        let mut stream = image_stream(rgb_entries(16, 8), [200u8, 40, 10].repeat(16 * 8));
        stream.compress().unwrap();
        assert!(filters(&stream.dict).contains(&b"FlateDecode".to_vec()));

        let (ext, bytes) = encode_image(&stream).unwrap().unwrap();
        assert_eq!(ext, "png");
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png).unwrap();
        assert_eq!(decoded.dimensions(), (16, 8));
        assert_eq!(decoded.to_rgb8().get_pixel(3, 5).0, [200, 40, 10]);
    }

    #[test]
    fn short_rgb_data_is_skipped() {
        let stream = image_stream(rgb_entries(2, 2), vec![0; 2 * 2 * 3 - 1]);
        assert!(encode_image(&stream).unwrap().is_none());
    }

    #[test]
    fn failing_image_does_not_drop_the_rest() {
        let mut broken = rgb_entries(1, 1);
        broken[0] = ("Width", Object::Real(0.5));
        let source = source_with_images(vec![
            image_stream(broken, vec![0; 3]),
            image_stream(
                vec![("Filter", Object::Name(b"DCTDecode".to_vec()))],
                vec![0xFF, 0xD8, 0xFF, 0xD9],
            ),
        ]);

        let images = source.embedded_images().unwrap();
        let jpeg = images.iter().find(|image| image.extension == "jpg").unwrap();
        assert_eq!(jpeg.bytes, vec![0xFF, 0xD8, 0xFF, 0xD9]);
        assert_eq!(jpeg.page_index, 0);
    }

    #[test]
    fn indexed_colour_is_skipped() {
        let stream = image_stream(
            vec![
                ("Width", Object::Integer(1)),
                ("Height", Object::Integer(1)),
                ("BitsPerComponent", Object::Integer(8)),
                ("ColorSpace", Object::Name(b"Indexed".to_vec())),
            ],
            vec![0],
        );
        assert!(encode_image(&stream).unwrap().is_none());
    }

    #[test]
    fn file_name_is_one_based() {
        let image = EmbeddedImage {
            page_index: 0,
            image_index: 2,
            extension: "jpg",
            bytes: Vec::new(),
        };
        assert_eq!(image.file_name("report"), "report_page1_img3.jpg");
    }
}
