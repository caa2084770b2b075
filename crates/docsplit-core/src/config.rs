// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Processing configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DocsplitError, Result};
use crate::types::ZoneThresholds;

/// Lines beginning with "Chapter N" or "Section N", case-insensitive.
pub const DEFAULT_HEADING_PATTERN: &str = r"(?i)^(Chapter\s+\d+.*|Section\s+\d+.*)";

/// Standalone page numbers and "page N" markers.
pub const DEFAULT_NOISE_PATTERNS: &[&str] = &[r"(?i)page\s*\d+", r"^\s*\d+\s*$"];

/// URLs and bracketed numeric citation markers.
pub const DEFAULT_VALUABLE_PATTERNS: &[&str] = &[r"https?://\S+", r"\[\d+\]"];

pub const DEFAULT_MAX_TITLE_LENGTH: usize = 50;

pub const DEFAULT_NAME_PREFIX: &str = "Part";

/// Which pipeline features run for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureSet {
    pub extract_images: bool,
    pub smart_split: bool,
    pub clean_text: bool,
    /// Pack every produced file into one `.zip` and remove the loose files.
    pub package: bool,
}

impl Default for FeatureSet {
    fn default() -> Self {
        Self {
            extract_images: true,
            smart_split: true,
            clean_text: false,
            package: true,
        }
    }
}

/// Settings for one processing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Regex whose first match on a page marks a heading.
    pub heading_pattern: String,
    /// Number of consecutive headings grouped into one split.
    pub group_size: usize,
    /// Upper bound on sanitized title length, in characters.
    pub max_title_length: usize,
    /// Leading component of split file names (`<prefix>_<n>_<title>.pdf`).
    pub name_prefix: String,
    pub zones: ZoneThresholds,
    pub noise_patterns: Vec<String>,
    pub valuable_patterns: Vec<String>,
    pub features: FeatureSet,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            heading_pattern: DEFAULT_HEADING_PATTERN.to_string(),
            group_size: 1,
            max_title_length: DEFAULT_MAX_TITLE_LENGTH,
            name_prefix: DEFAULT_NAME_PREFIX.to_string(),
            zones: ZoneThresholds::default(),
            noise_patterns: DEFAULT_NOISE_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            valuable_patterns: DEFAULT_VALUABLE_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            features: FeatureSet::default(),
        }
    }
}

impl ProcessingConfig {
    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), raw)?;
        Ok(())
    }

    /// Check numeric ranges and that every pattern compiles.
    pub fn validate(&self) -> Result<()> {
        if self.group_size == 0 {
            return Err(DocsplitError::InvalidConfig(
                "group_size must be at least 1".into(),
            ));
        }
        if self.name_prefix.is_empty() {
            return Err(DocsplitError::InvalidConfig(
                "name_prefix must not be empty".into(),
            ));
        }
        let ZoneThresholds {
            header_margin,
            footer_margin,
        } = self.zones;
        if !(0.0..=1.0).contains(&header_margin)
            || !(0.0..=1.0).contains(&footer_margin)
            || header_margin > footer_margin
        {
            return Err(DocsplitError::InvalidConfig(format!(
                "zone margins must satisfy \
                 0 <= header ({header_margin}) <= footer ({footer_margin}) <= 1"
            )));
        }

        for pattern in std::iter::once(&self.heading_pattern)
            .chain(&self.noise_patterns)
            .chain(&self.valuable_patterns)
        {
            regex::Regex::new(pattern)
                .map_err(|err| DocsplitError::invalid_pattern(pattern, err))?;
        }
        Ok(())
    }
}
