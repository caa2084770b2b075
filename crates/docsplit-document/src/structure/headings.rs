// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Heading detection.
//
// Each page contributes at most one heading: the first matching line whose
// title differs from the previously accepted one. A title identical to the
// previous heading (a running chapter name, say) is skipped and the scan
// continues down the page.

use docsplit_core::HeadingAnchor;
use docsplit_core::config::DEFAULT_HEADING_PATTERN;
use docsplit_core::error::{DocsplitError, Result};
use regex::Regex;
use tracing::{debug, info, instrument};

use crate::source::PageSource;

/// Compiled heading pattern.
#[derive(Debug, Clone)]
pub struct HeadingPattern {
    regex: Regex,
}

impl HeadingPattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let regex =
            Regex::new(pattern).map_err(|err| DocsplitError::invalid_pattern(pattern, err))?;
        Ok(Self { regex })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// The trimmed matched span, if the line holds a non-blank match.
    pub fn candidate<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.regex
            .find(line)
            .map(|m| m.as_str().trim())
            .filter(|title| !title.is_empty())
    }
}

impl Default for HeadingPattern {
    fn default() -> Self {
        Self::new(DEFAULT_HEADING_PATTERN).expect("valid default heading pattern")
    }
}

/// Detect headings over `(page_index, lines)` pairs in page order.
pub fn detect_in_pages<'a, P, L>(pages: P, pattern: &HeadingPattern) -> Vec<HeadingAnchor>
where
    P: IntoIterator<Item = (usize, L)>,
    L: IntoIterator<Item = &'a str>,
{
    let (anchors, _) = pages.into_iter().fold(
        (Vec::new(), None::<String>),
        |(mut anchors, last_title), (page_index, lines)| {
            let accepted = lines
                .into_iter()
                .filter_map(|line| pattern.candidate(line))
                .find(|title| last_title.as_deref() != Some(*title));

            match accepted {
                Some(title) => {
                    anchors.push(HeadingAnchor::new(title, page_index));
                    (anchors, Some(title.to_string()))
                }
                None => (anchors, last_title),
            }
        },
    );
    anchors
}

/// Read every page of `source` and detect its headings.
///
/// A document without matches yields an empty list, which callers treat as
/// "splitting unavailable" rather than as a failure.
#[instrument(skip_all, fields(pattern = pattern.as_str()))]
pub fn detect_headings(
    source: &impl PageSource,
    pattern: &HeadingPattern,
) -> Result<Vec<HeadingAnchor>> {
    let mut pages = Vec::with_capacity(source.page_count());
    for page_index in 0..source.page_count() {
        let lines = source.lines(page_index)?;
        pages.push((page_index, lines));
    }

    let anchors = detect_in_pages(
        pages
            .iter()
            .map(|(index, lines)| (*index, lines.iter().map(|line| line.text.as_str()))),
        pattern,
    );

    for anchor in &anchors {
        debug!(page = anchor.page_index, title = %anchor.title, "Heading detected");
    }
    info!(count = anchors.len(), "Heading detection complete");
    Ok(anchors)
}
