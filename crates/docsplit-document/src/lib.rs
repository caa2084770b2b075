// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docsplit-document — Document structure inference and segmentation.
//
// Reads PDFs into positioned line streams, detects chapter/section headings,
// plans page-range splits along them, strips running headers and footers,
// and packages the results.

pub mod archive;
pub mod materialize;
pub mod pdf;
pub mod pipeline;
pub mod sanitize;
pub mod source;
pub mod structure;

// Re-export the primary entry points so callers can use `docsplit_document::PdfSource` etc.
pub use archive::package_as_archive;
pub use materialize::{SplitOutput, materialize_segments, write_outputs};
pub use pdf::reader::PdfSource;
pub use pipeline::{FeatureWarning, Pipeline, ProcessReport};
pub use sanitize::{safe_filename, sanitize_title};
pub use source::{PageRangeCopy, PageSource};
pub use structure::headings::{HeadingPattern, detect_headings};
pub use structure::noise::{NoiseRules, classify_line, clean_noise};
pub use structure::segments::plan_segments;
