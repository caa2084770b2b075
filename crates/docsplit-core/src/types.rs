// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for document structure inference and segmentation.

use serde::{Deserialize, Serialize};

/// One line of text on a page, with its vertical position.
///
/// `y_position` is measured from the top edge of the page in PDF points, so
/// small values sit in the running-header band and large values in the
/// footer band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub text: String,
    pub y_position: f64,
    /// 0-based page index.
    pub page_index: usize,
}

impl Line {
    pub fn new(text: impl Into<String>, y_position: f64, page_index: usize) -> Self {
        Self {
            text: text.into(),
            y_position,
            page_index,
        }
    }
}

/// A detected heading and the page it starts on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingAnchor {
    /// Trimmed span matched by the heading pattern.
    pub title: String,
    /// 0-based page index.
    pub page_index: usize,
}

impl HeadingAnchor {
    pub fn new(title: impl Into<String>, page_index: usize) -> Self {
        Self {
            title: title.into(),
            page_index,
        }
    }
}

/// A contiguous, inclusive page range labelled by the first heading it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub start_page: usize,
    /// Inclusive.
    pub end_page: usize,
    /// Index into the anchor list the segment was planned from.
    pub label_anchor_index: usize,
    /// Title of the labelling anchor.
    pub label: String,
}

impl Segment {
    /// Number of pages covered; zero for an inverted range.
    pub fn page_count(&self) -> usize {
        (self.end_page + 1).saturating_sub(self.start_page)
    }

    pub fn is_empty(&self) -> bool {
        self.page_count() == 0
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "pages {}-{} ({})",
            self.start_page + 1,
            self.end_page + 1,
            self.label
        )
    }
}

/// Header/footer bands expressed as fractions of the page height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneThresholds {
    /// Lines with `y < header_margin * height` are in the header band.
    pub header_margin: f64,
    /// Lines with `y > footer_margin * height` are in the footer band.
    pub footer_margin: f64,
}

impl Default for ZoneThresholds {
    fn default() -> Self {
        Self {
            header_margin: 0.15,
            footer_margin: 0.85,
        }
    }
}

impl ZoneThresholds {
    pub fn is_header(&self, y_position: f64, page_height: f64) -> bool {
        y_position < page_height * self.header_margin
    }

    pub fn is_footer(&self, y_position: f64, page_height: f64) -> bool {
        y_position > page_height * self.footer_margin
    }
}

/// Per-line classification signals produced by the noise classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NoiseVerdict {
    pub is_valuable: bool,
    pub is_header_zone: bool,
    pub is_footer_zone: bool,
    pub is_noise_pattern: bool,
}

impl NoiseVerdict {
    /// Collapse the signals into a keep/drop decision.
    ///
    /// Valuable lines always survive; noise patterns only drop lines that sit
    /// inside the header or footer band.
    pub fn keep(&self) -> bool {
        if self.is_valuable {
            return true;
        }
        let in_zone = self.is_header_zone || self.is_footer_zone;
        !in_zone || !self.is_noise_pattern
    }
}

/// Features the processing pipeline can run on one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    ExtractImages,
    SmartSplit,
    CleanText,
    Package,
}

impl Feature {
    pub fn label(&self) -> &'static str {
        match self {
            Self::ExtractImages => "image extraction",
            Self::SmartSplit => "smart split",
            Self::CleanText => "header/footer cleaning",
            Self::Package => "archive packaging",
        }
    }
}
