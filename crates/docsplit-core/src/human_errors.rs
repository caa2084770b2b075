// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable warnings for per-feature failures.
//
// A failure in one feature (image extraction, splitting, cleaning) must not
// stop its siblings, so the pipeline turns each error into a `HumanError`
// and keeps going. Only a document that cannot be opened at all is fatal.

use crate::error::DocsplitError;

/// Severity of a failure from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The feature produced nothing, other features are unaffected.
    Warning,
    /// The user must change the input or the settings.
    ActionRequired,
    /// The document itself is unusable; nothing can be produced.
    Fatal,
}

/// A plain English message with an actionable suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HumanError {
    /// One-line summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    pub severity: Severity,
}

impl HumanError {
    /// A warning that is not backed by an error, e.g. "no headings found".
    pub fn notice(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: suggestion.into(),
            severity: Severity::Warning,
        }
    }
}

impl std::fmt::Display for HumanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.message, self.suggestion)
    }
}

/// Convert a `DocsplitError` into a `HumanError`.
pub fn humanize_error(err: &DocsplitError) -> HumanError {
    match err {
        DocsplitError::InvalidGroupSize { group_size, anchors } => HumanError {
            message: "The chapters can't be grouped that way.".into(),
            suggestion: if *anchors == 0 {
                "No headings were found, so there is nothing to split on.".into()
            } else {
                format!("Choose a group size between 1 and {anchors} (got {group_size}).")
            },
            severity: Severity::ActionRequired,
        },

        DocsplitError::InvalidPattern { pattern, .. } => HumanError {
            message: "One of the search patterns isn't valid.".into(),
            suggestion: format!("Check the regular expression `{pattern}` and try again."),
            severity: Severity::ActionRequired,
        },

        DocsplitError::PageOutOfRange { page, page_count } => HumanError {
            message: "A page outside the document was requested.".into(),
            suggestion: format!(
                "The document has {page_count} pages but page {} was asked for.",
                page + 1
            ),
            severity: Severity::Warning,
        },

        DocsplitError::InvalidConfig(detail) => HumanError {
            message: "The settings aren't valid.".into(),
            suggestion: format!("Fix the configuration and try again. ({detail})"),
            severity: Severity::ActionRequired,
        },

        DocsplitError::PdfError(detail) => humanize_pdf_error(detail),

        DocsplitError::ImageError(_) => HumanError {
            message: "An embedded image couldn't be saved.".into(),
            suggestion: "The image may use an unusual format. The other results are unaffected."
                .into(),
            severity: Severity::Warning,
        },

        DocsplitError::Archive(_) => HumanError {
            message: "The results couldn't be packed into an archive.".into(),
            suggestion: "The individual files were kept in the output folder instead.".into(),
            severity: Severity::Warning,
        },

        DocsplitError::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::NotFound => HumanError {
                message: "The file couldn't be found.".into(),
                suggestion: "It may have been moved or deleted. Check the path and try again."
                    .into(),
                severity: Severity::ActionRequired,
            },
            std::io::ErrorKind::PermissionDenied => HumanError {
                message: "Permission denied while reading or writing a file.".into(),
                suggestion: "Check the permissions on the input file and the output folder.".into(),
                severity: Severity::ActionRequired,
            },
            _ => HumanError {
                message: "There was a problem reading or writing a file.".into(),
                suggestion: "Try again. If this keeps happening, the disk may be full.".into(),
                severity: Severity::Warning,
            },
        },

        DocsplitError::Serialization(_) => HumanError {
            message: "The configuration file couldn't be read.".into(),
            suggestion: "Make sure it is valid JSON.".into(),
            severity: Severity::ActionRequired,
        },
    }
}

/// PDF failures are fatal when the document can't be loaded at all, and
/// per-feature warnings otherwise.
fn humanize_pdf_error(detail: &str) -> HumanError {
    let lower = detail.to_ascii_lowercase();

    if lower.contains("failed to open") || lower.contains("failed to load") {
        HumanError {
            message: "This PDF file can't be read.".into(),
            suggestion: "The file may be damaged or not a PDF. Try opening it in a viewer first."
                .into(),
            severity: Severity::Fatal,
        }
    } else if lower.contains("encrypt") {
        HumanError {
            message: "This PDF is password protected.".into(),
            suggestion: "Remove the password with your PDF viewer and try again.".into(),
            severity: Severity::Fatal,
        }
    } else {
        HumanError {
            message: "Part of this PDF couldn't be processed.".into(),
            suggestion: format!("The other results are unaffected. (Detail: {detail})"),
            severity: Severity::Warning,
        }
    }
}
