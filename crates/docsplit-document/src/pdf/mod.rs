// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module: page text geometry, page-range copies, and embedded images.

pub mod images;
pub mod reader;
pub mod text;

pub use images::EmbeddedImage;
pub use reader::PdfSource;
