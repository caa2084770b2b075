// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF page source: open existing PDF documents with `lopdf`, read their
// positioned text lines and page geometry, and copy page ranges out into
// standalone documents.

use std::collections::BTreeMap;
use std::path::Path;

use docsplit_core::Line;
use docsplit_core::error::{DocsplitError, Result};
use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, info, instrument};

use super::text::{assemble_lines, collect_runs, decode_latin1, number};
use crate::source::{PageRangeCopy, PageSource};

/// US Letter height, used when a page has no readable `/MediaBox`.
const DEFAULT_PAGE_HEIGHT: f64 = 792.0;

/// Guards the `/Parent` walk against cyclic page trees.
const MAX_TREE_DEPTH: usize = 32;

/// Reads an existing PDF as a [`PageSource`].
///
/// Wraps `lopdf::Document`. The document is owned by this value and released
/// when it is dropped, on every exit path.
pub struct PdfSource {
    /// The underlying lopdf document.
    document: Document,
    /// Page object ids in page order (index 0 is the first page).
    pages: Vec<ObjectId>,
    /// Source path, if opened from a file (useful for diagnostics).
    source_path: Option<String>,
}

impl PdfSource {
    // -- Construction ---------------------------------------------------------

    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_ref = path.as_ref();
        info!("Opening PDF: {}", path_ref.display());

        let document = Document::load(path_ref).map_err(|err| {
            DocsplitError::PdfError(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        let mut source = Self::from_document(document);
        source.source_path = Some(path_ref.display().to_string());
        debug!(pages = source.pages.len(), "PDF loaded");
        Ok(source)
    }

    /// Create a source from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data).map_err(|err| {
            DocsplitError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;

        let source = Self::from_document(document);
        debug!(pages = source.pages.len(), "PDF loaded from bytes");
        Ok(source)
    }

    /// Wrap an already-parsed document.
    pub fn from_document(document: Document) -> Self {
        let pages = document.get_pages().into_values().collect();
        Self {
            document,
            pages,
            source_path: None,
        }
    }

    // -- Inspection -----------------------------------------------------------

    /// Return the source path if the source was created via [`PdfSource::open`].
    pub fn source_path(&self) -> Option<&str> {
        self.source_path.as_deref()
    }

    pub(crate) fn document(&self) -> &Document {
        &self.document
    }

    pub(crate) fn page_id(&self, page_index: usize) -> Result<ObjectId> {
        self.pages
            .get(page_index)
            .copied()
            .ok_or(DocsplitError::PageOutOfRange {
                page: page_index,
                page_count: self.pages.len(),
            })
    }

    /// Font dictionaries from the page's (possibly inherited) resources, by
    /// resource name.
    fn page_fonts(&self, page_id: ObjectId) -> Vec<(Vec<u8>, &Dictionary)> {
        let document = &self.document;
        let Some(fonts) = inherited_attribute(document, page_id, b"Resources")
            .and_then(|res| resolve(document, res).as_dict().ok())
            .and_then(|res| res.get(b"Font").ok())
            .and_then(|fonts| resolve(document, fonts).as_dict().ok())
        else {
            return Vec::new();
        };

        fonts
            .iter()
            .filter_map(|(key, font)| {
                resolve(document, font)
                    .as_dict()
                    .ok()
                    .map(|dict| (key.clone(), dict))
            })
            .collect()
    }

    /// `(bottom, top)` of the page's media box.
    fn media_box(&self, page_id: ObjectId) -> (f64, f64) {
        let bounds = inherited_attribute(&self.document, page_id, b"MediaBox")
            .and_then(|obj| resolve(&self.document, obj).as_array().ok())
            .map(|arr| arr.iter().filter_map(number).collect::<Vec<_>>());

        match bounds.as_deref() {
            Some([_, lly, _, ury]) => (lly.min(*ury), lly.max(*ury)),
            _ => (0.0, DEFAULT_PAGE_HEIGHT),
        }
    }
}

impl PageSource for PdfSource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    #[instrument(skip(self))]
    fn lines(&self, page_index: usize) -> Result<Vec<Line>> {
        let page_id = self.page_id(page_index)?;

        let raw = self.document.get_page_content(page_id).map_err(|err| {
            DocsplitError::PdfError(format!(
                "cannot read content of page {}: {}",
                page_index + 1,
                err
            ))
        })?;
        if raw.is_empty() {
            return Ok(Vec::new());
        }
        let content = Content::decode(&raw).map_err(|err| {
            DocsplitError::PdfError(format!(
                "cannot decode content of page {}: {}",
                page_index + 1,
                err
            ))
        })?;

        let encodings: BTreeMap<Vec<u8>, _> = self
            .page_fonts(page_id)
            .into_iter()
            .filter_map(|(key, font)| {
                font.get_font_encoding(&self.document)
                    .ok()
                    .map(|encoding| (key, encoding))
            })
            .collect();

        let runs = collect_runs(&content.operations, |font_key, bytes| {
            encodings
                .get(font_key)
                .and_then(|encoding| Document::decode_text(encoding, bytes).ok())
                .unwrap_or_else(|| decode_latin1(bytes))
        });

        let (_, top) = self.media_box(page_id);
        let lines = assemble_lines(runs, top, page_index);
        debug!(page_index, lines = lines.len(), "Page lines extracted");
        Ok(lines)
    }

    fn page_height(&self, page_index: usize) -> Result<f64> {
        let page_id = self.page_id(page_index)?;
        let (bottom, top) = self.media_box(page_id);
        Ok(top - bottom)
    }

    /// Copy pages `start..=end` (0-indexed) into a new PDF.
    ///
    /// The document is cloned, pages outside the range are deleted, and
    /// objects no longer referenced are pruned before serialising.
    #[instrument(skip(self))]
    fn copy_page_range(&self, start: usize, end: usize) -> Result<PageRangeCopy> {
        let total = self.page_count();
        if end < start {
            return Ok(PageRangeCopy::empty());
        }
        if end >= total {
            return Err(DocsplitError::PageOutOfRange {
                page: end,
                page_count: total,
            });
        }

        let mut copy = self.document.clone();
        let unwanted: Vec<u32> = (0..total)
            .filter(|index| !(start..=end).contains(index))
            .map(|index| index as u32 + 1)
            .collect();
        copy.delete_pages(&unwanted);
        copy.prune_objects();
        copy.renumber_objects();
        copy.compress();

        let page_count = copy.get_pages().len();
        let mut bytes = Vec::new();
        copy.save_to(&mut bytes).map_err(|err| {
            DocsplitError::PdfError(format!("failed to serialise page range: {}", err))
        })?;

        debug!(start, end, page_count, output_bytes = bytes.len(), "Page range copied");
        Ok(PageRangeCopy { bytes, page_count })
    }
}

/// Follow a reference to the object it points at; other objects are returned
/// unchanged. Dangling references resolve to `Null`.
pub(crate) fn resolve<'a>(document: &'a Document, object: &'a Object) -> &'a Object {
    static NULL: Object = Object::Null;
    match object {
        Object::Reference(id) => document.get_object(*id).unwrap_or(&NULL),
        other => other,
    }
}

/// Look up a page attribute, walking `/Parent` for inheritable keys such as
/// `/MediaBox` and `/Resources`.
pub(crate) fn inherited_attribute<'a>(
    document: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Option<&'a Object> {
    let mut node = document.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = node.get(key) {
            return Some(value);
        }
        let parent = node.get(b"Parent").ok()?.as_reference().ok()?;
        node = document.get_dictionary(parent).ok()?;
    }
    None
}
