// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Structure inference: rule-based heading detection, header/footer noise
// classification, and page-range planning. Everything here is driven by
// regular expressions and line positions; nothing is learned.

pub mod headings;
pub mod noise;
pub mod segments;

pub use headings::{HeadingPattern, detect_headings};
pub use noise::{NoiseRules, classify_line, clean_noise};
pub use segments::plan_segments;
