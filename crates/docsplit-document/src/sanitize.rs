// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Filename-safe title stems.

use std::sync::OnceLock;

use docsplit_core::config::DEFAULT_MAX_TITLE_LENGTH;
use regex::Regex;

const FALLBACK_TITLE: &str = "Untitled";

fn unsafe_chars_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"[\\/*?:"<>|]"#).expect("valid unsafe-character regex"))
}

fn whitespace_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace regex"))
}

fn underscore_run_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"_+").expect("valid underscore regex"))
}

/// Turn an arbitrary title into a filesystem-safe stem of at most
/// `max_length` characters.
///
/// The title is truncated first and cleaned afterwards, so cleaning can only
/// shorten it. Only `\ / * ? : " < > |` are removed; other punctuation is
/// kept. A title that cleans down to nothing becomes `Untitled` (cut to
/// `max_length` when that is shorter). `max_length` is at least 1.
pub fn sanitize_title(title: &str, max_length: usize) -> String {
    let max_length = max_length.max(1);
    let truncated: String = title.chars().take(max_length).collect();

    let stripped = unsafe_chars_regex().replace_all(&truncated, "");
    let underscored = whitespace_regex().replace_all(&stripped, "_");
    let collapsed = underscore_run_regex().replace_all(&underscored, "_");
    let trimmed = collapsed.trim_matches(|c: char| c == '_' || c == ' ');

    if trimmed.is_empty() {
        FALLBACK_TITLE.chars().take(max_length).collect()
    } else {
        trimmed.to_string()
    }
}

/// [`sanitize_title`] with the default 50-character limit.
pub fn safe_filename(title: &str) -> String {
    sanitize_title(title, DEFAULT_MAX_TITLE_LENGTH)
}
