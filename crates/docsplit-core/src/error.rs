// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for docsplit.
//
// "Nothing found" is never an error here: zero pages, zero lines, and zero
// headings are reported as empty results by the structure passes.

use thiserror::Error;

/// Top-level error type for all docsplit operations.
#[derive(Debug, Error)]
pub enum DocsplitError {
    // -- Precondition violations --
    #[error("invalid group size {group_size} for {anchors} heading anchor(s)")]
    InvalidGroupSize { group_size: usize, anchors: usize },

    #[error("invalid pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("page {page} out of range (document has {page_count} pages)")]
    PageOutOfRange { page: usize, page_count: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // -- Collaborator failures --
    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("archive packaging failed: {0}")]
    Archive(String),

    // -- Storage --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DocsplitError {
    /// Build an [`DocsplitError::InvalidPattern`] from a failed regex compile.
    pub fn invalid_pattern(pattern: &str, err: regex::Error) -> Self {
        Self::InvalidPattern {
            pattern: pattern.to_string(),
            reason: err.to_string(),
        }
    }

    /// Whether the failure came from an external collaborator (document
    /// library, image codec, archive writer, filesystem) rather than from a
    /// caller precondition.
    pub fn is_collaborator_failure(&self) -> bool {
        matches!(
            self,
            Self::PdfError(_) | Self::ImageError(_) | Self::Archive(_) | Self::Io(_)
        )
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DocsplitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collaborator_failures_are_distinguished() {
        assert!(DocsplitError::PdfError("bad xref".into()).is_collaborator_failure());
        assert!(DocsplitError::Io(std::io::Error::other("disk")).is_collaborator_failure());
        assert!(
            !DocsplitError::InvalidGroupSize {
                group_size: 0,
                anchors: 3
            }
            .is_collaborator_failure()
        );
    }

    #[test]
    fn invalid_pattern_keeps_source_text() {
        let err = regex::Regex::new("(").unwrap_err();
        match DocsplitError::invalid_pattern("(", err) {
            DocsplitError::InvalidPattern { pattern, reason } => {
                assert_eq!(pattern, "(");
                assert!(!reason.is_empty());
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
