// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Segment materialization: turn planned segments into named standalone PDFs.

use std::path::{Path, PathBuf};

use docsplit_core::Segment;
use docsplit_core::error::Result;
use tracing::{debug, info, instrument, warn};

use crate::sanitize::sanitize_title;
use crate::source::PageSource;

/// One split document, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOutput {
    /// `<prefix>_<n>_<title>.pdf`, n 1-based.
    pub file_name: String,
    pub segment: Segment,
    pub page_count: usize,
    pub bytes: Vec<u8>,
}

/// Output file name for the segment at `index` (0-based).
pub fn split_file_name(prefix: &str, index: usize, label: &str, max_title_length: usize) -> String {
    format!("{}_{}_{}.pdf", prefix, index + 1, sanitize_title(label, max_title_length))
}

/// Copy each segment's page range out of `source`.
///
/// Outputs keep segment order. A segment whose copy has no pages is skipped;
/// its number is still consumed so later names match their segment.
#[instrument(skip(source, segments), fields(segments = segments.len()))]
pub fn materialize_segments(
    source: &impl PageSource,
    segments: &[Segment],
    name_prefix: &str,
    max_title_length: usize,
) -> Result<Vec<SplitOutput>> {
    let mut outputs = Vec::with_capacity(segments.len());

    for (index, segment) in segments.iter().enumerate() {
        let copy = source.copy_page_range(segment.start_page, segment.end_page)?;
        if copy.page_count == 0 {
            warn!(%segment, "Segment produced no pages, skipping");
            continue;
        }

        let file_name = split_file_name(name_prefix, index, &segment.label, max_title_length);
        debug!(file = %file_name, pages = copy.page_count, "Segment materialized");
        outputs.push(SplitOutput {
            file_name,
            segment: segment.clone(),
            page_count: copy.page_count,
            bytes: copy.bytes,
        });
    }

    info!(count = outputs.len(), "Split documents prepared");
    Ok(outputs)
}

/// Write outputs into `dir`, returning the written paths in order.
///
/// On the first failure every file already written by this call is removed
/// before the error is returned.
#[instrument(skip(outputs), fields(dir = %dir.display(), count = outputs.len()))]
pub fn write_outputs(outputs: &[SplitOutput], dir: &Path) -> Result<Vec<PathBuf>> {
    write_all_or_nothing(
        dir,
        outputs
            .iter()
            .map(|output| (output.file_name.as_str(), output.bytes.as_slice())),
    )
}

/// Write `(file name, contents)` pairs into `dir`; nothing is left behind on
/// failure.
pub(crate) fn write_all_or_nothing<'a>(
    dir: &Path,
    files: impl IntoIterator<Item = (&'a str, &'a [u8])>,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    for (file_name, bytes) in files {
        let path = dir.join(file_name);
        if let Err(err) = std::fs::write(&path, bytes) {
            warn!(file = %path.display(), error = %err, "Write failed, removing partial results");
            remove_files(&written);
            return Err(err.into());
        }
        written.push(path);
    }

    Ok(written)
}

/// Best-effort removal; failures are logged and otherwise ignored.
pub(crate) fn remove_files(paths: &[PathBuf]) {
    for path in paths {
        if let Err(err) = std::fs::remove_file(path) {
            debug!(file = %path.display(), error = %err, "Could not remove file");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use docsplit_core::Line;
    use docsplit_core::error::DocsplitError;

    use super::*;
    use crate::source::PageRangeCopy;

    /// Records requested ranges and returns the range as bytes.
    struct FakeSource {
        pages: usize,
        requests: RefCell<Vec<(usize, usize)>>,
    }

    impl FakeSource {
        fn new(pages: usize) -> Self {
            Self {
                pages,
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl PageSource for FakeSource {
        fn page_count(&self) -> usize {
            self.pages
        }

        fn lines(&self, _page_index: usize) -> Result<Vec<Line>> {
            Ok(Vec::new())
        }

        fn page_height(&self, _page_index: usize) -> Result<f64> {
            Ok(792.0)
        }

        fn copy_page_range(&self, start: usize, end: usize) -> Result<PageRangeCopy> {
            self.requests.borrow_mut().push((start, end));
            if end < start {
                return Ok(PageRangeCopy::empty());
            }
            if end >= self.pages {
                return Err(DocsplitError::PageOutOfRange {
                    page: end,
                    page_count: self.pages,
                });
            }
            Ok(PageRangeCopy {
                bytes: format!("{start}-{end}").into_bytes(),
                page_count: end - start + 1,
            })
        }
    }

    fn segment(start_page: usize, end_page: usize, label: &str) -> Segment {
        Segment {
            start_page,
            end_page,
            label_anchor_index: 0,
            label: label.into(),
        }
    }

    #[test]
    fn file_names_follow_prefix_index_title() {
        assert_eq!(
            split_file_name("Part", 0, "Chapter 1: The Beginning?!", 50),
            "Part_1_Chapter_1_The_Beginning!.pdf"
        );
        assert_eq!(split_file_name("Vol", 9, "", 50), "Vol_10_Untitled.pdf");
    }

    #[test]
    fn requests_each_segment_range_in_order() {
        let source = FakeSource::new(10);
        let segments = vec![segment(0, 3, "Chapter 1"), segment(4, 9, "Chapter 2")];
        let outputs = materialize_segments(&source, &segments, "Part", 50).unwrap();

        assert_eq!(*source.requests.borrow(), vec![(0, 3), (4, 9)]);
        let names: Vec<_> = outputs.iter().map(|o| o.file_name.as_str()).collect();
        assert_eq!(names, vec!["Part_1_Chapter_1.pdf", "Part_2_Chapter_2.pdf"]);
        assert_eq!(outputs[1].page_count, 6);
        assert_eq!(outputs[1].bytes, b"4-9");
    }

    #[test]
    fn empty_copies_are_skipped_without_renumbering() {
        let source = FakeSource::new(10);
        let segments = vec![
            segment(0, 3, "Chapter 1"),
            segment(5, 4, "Chapter 2"),
            segment(5, 9, "Chapter 3"),
        ];
        let outputs = materialize_segments(&source, &segments, "Part", 50).unwrap();
        let names: Vec<_> = outputs.iter().map(|o| o.file_name.as_str()).collect();
        assert_eq!(names, vec!["Part_1_Chapter_1.pdf", "Part_3_Chapter_3.pdf"]);
    }

    #[test]
    fn copy_failure_propagates() {
        let source = FakeSource::new(5);
        let segments = vec![segment(0, 9, "Chapter 1")];
        assert!(matches!(
            materialize_segments(&source, &segments, "Part", 50),
            Err(DocsplitError::PageOutOfRange { page: 9, .. })
        ));
    }

    #[test]
    fn write_outputs_writes_every_file() {
        let dir = tempfile::tempdir().unwrap();
        let outputs = vec![SplitOutput {
            file_name: "Part_1_A.pdf".into(),
            segment: segment(0, 0, "A"),
            page_count: 1,
            bytes: b"%PDF".to_vec(),
        }];
        let paths = write_outputs(&outputs, dir.path()).unwrap();
        assert_eq!(paths, vec![dir.path().join("Part_1_A.pdf")]);
        assert_eq!(std::fs::read(&paths[0]).unwrap(), b"%PDF");
    }

    #[test]
    fn failed_write_removes_earlier_files() {
        let dir = tempfile::tempdir().unwrap();
        // A directory with the second file's name makes that write fail.
        std::fs::create_dir(dir.path().join("Part_2_B.pdf")).unwrap();
        let outputs = vec![
            SplitOutput {
                file_name: "Part_1_A.pdf".into(),
                segment: segment(0, 0, "A"),
                page_count: 1,
                bytes: b"a".to_vec(),
            },
            SplitOutput {
                file_name: "Part_2_B.pdf".into(),
                segment: segment(1, 1, "B"),
                page_count: 1,
                bytes: b"b".to_vec(),
            },
        ];

        assert!(write_outputs(&outputs, dir.path()).is_err());
        assert!(!dir.path().join("Part_1_A.pdf").exists());
    }
}
