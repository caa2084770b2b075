// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Header/footer noise classification and cleaned-text assembly.
//
// Precedence: a valuable line (URL, citation marker) is always kept; a line
// in the body band is always kept; a line in the header or footer band is
// dropped only when it matches a noise pattern.

use docsplit_core::config::{DEFAULT_NOISE_PATTERNS, DEFAULT_VALUABLE_PATTERNS};
use docsplit_core::error::{DocsplitError, Result};
use docsplit_core::{Line, NoiseVerdict, ProcessingConfig, ZoneThresholds};
use regex::Regex;
use tracing::{debug, info, instrument};

use crate::source::PageSource;

/// Zone thresholds plus the deny and allow pattern lists.
#[derive(Debug, Clone)]
pub struct NoiseRules {
    pub zones: ZoneThresholds,
    noise: Vec<Regex>,
    valuable: Vec<Regex>,
}

impl NoiseRules {
    pub fn new<S: AsRef<str>>(
        zones: ZoneThresholds,
        noise_patterns: &[S],
        valuable_patterns: &[S],
    ) -> Result<Self> {
        Ok(Self {
            zones,
            noise: compile_all(noise_patterns)?,
            valuable: compile_all(valuable_patterns)?,
        })
    }

    pub fn from_config(config: &ProcessingConfig) -> Result<Self> {
        Self::new(
            config.zones,
            config.noise_patterns.as_slice(),
            config.valuable_patterns.as_slice(),
        )
    }

    fn is_noise(&self, text: &str) -> bool {
        self.noise.iter().any(|p| p.is_match(text))
    }

    fn is_valuable(&self, text: &str) -> bool {
        self.valuable.iter().any(|p| p.is_match(text))
    }
}

impl Default for NoiseRules {
    fn default() -> Self {
        Self::new(
            ZoneThresholds::default(),
            DEFAULT_NOISE_PATTERNS,
            DEFAULT_VALUABLE_PATTERNS,
        )
        .expect("valid default noise patterns")
    }
}

fn compile_all<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| {
            let p = p.as_ref();
            Regex::new(p).map_err(|err| DocsplitError::invalid_pattern(p, err))
        })
        .collect()
}

/// Classify one line from its text and its distance from the top of a page of
/// height `page_height`.
pub fn classify_line(
    text: &str,
    y_position: f64,
    page_height: f64,
    rules: &NoiseRules,
) -> NoiseVerdict {
    NoiseVerdict {
        is_valuable: rules.is_valuable(text),
        is_header_zone: rules.zones.is_header(y_position, page_height),
        is_footer_zone: rules.zones.is_footer(y_position, page_height),
        is_noise_pattern: rules.is_noise(text),
    }
}

/// Kept lines of one page, each followed by a newline.
pub fn clean_page(lines: &[Line], page_height: f64, rules: &NoiseRules) -> String {
    let mut text = String::new();
    for line in lines {
        let verdict = classify_line(&line.text, line.y_position, page_height, rules);
        if verdict.keep() {
            text.push_str(&line.text);
            text.push('\n');
        } else {
            debug!(page = line.page_index, line = %line.text, "Dropping header/footer noise");
        }
    }
    text
}

/// Produce the cleaned text of the whole document.
///
/// Each page is introduced by a `--- Page N ---` separator with 1-based N;
/// pages with no kept lines still get their separator.
#[instrument(skip_all, fields(pages = source.page_count()))]
pub fn clean_noise(source: &impl PageSource, rules: &NoiseRules) -> Result<String> {
    let mut output = String::new();
    for page_index in 0..source.page_count() {
        let lines = source.lines(page_index)?;
        let height = source.page_height(page_index)?;
        let page_text = clean_page(&lines, height, rules);
        output.push_str(&format!("\n\n--- Page {} ---\n\n{}", page_index + 1, page_text));
    }
    info!(chars = output.len(), "Header/footer cleaning complete");
    Ok(output)
}
