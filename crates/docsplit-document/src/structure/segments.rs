// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Segment planning: group consecutive heading anchors into contiguous page
// ranges.

use docsplit_core::error::{DocsplitError, Result};
use docsplit_core::{HeadingAnchor, Segment};
use tracing::{debug, instrument};

/// Plan `ceil(H / group_size)` segments over `H` anchors.
///
/// Segment `i` starts on the page of anchor `i * group_size` and runs up to
/// the page before the next group's first anchor; the final segment runs to
/// `last_page`. Each segment is labelled with its first anchor's title.
///
/// Anchors must have strictly increasing pages no later than `last_page`, as
/// produced by heading detection. An empty anchor list or a zero group size
/// is a precondition violation: callers should check for "no headings"
/// before planning.
#[instrument(skip(anchors), fields(anchor_count = anchors.len()))]
pub fn plan_segments(
    anchors: &[HeadingAnchor],
    group_size: usize,
    last_page: usize,
) -> Result<Vec<Segment>> {
    if anchors.is_empty() || group_size == 0 {
        return Err(DocsplitError::InvalidGroupSize {
            group_size,
            anchors: anchors.len(),
        });
    }
    if let Some(index) = anchors
        .windows(2)
        .position(|pair| pair[1].page_index <= pair[0].page_index)
    {
        return Err(DocsplitError::InvalidConfig(format!(
            "heading anchors must be on strictly increasing pages (anchor {} is not)",
            index + 1
        )));
    }
    if let Some(late) = anchors.iter().find(|a| a.page_index > last_page) {
        return Err(DocsplitError::PageOutOfRange {
            page: late.page_index,
            page_count: last_page + 1,
        });
    }

    let total = anchors.len();
    let segments: Vec<Segment> = (0..total.div_ceil(group_size))
        .map(|i| {
            let start_idx = i * group_size;
            let end_idx = ((i + 1) * group_size).min(total);
            let end_page = if end_idx < total {
                anchors[end_idx].page_index - 1
            } else {
                last_page
            };
            Segment {
                start_page: anchors[start_idx].page_index,
                end_page,
                label_anchor_index: start_idx,
                label: anchors[start_idx].title.clone(),
            }
        })
        .collect();

    debug!(count = segments.len(), group_size, "Segments planned");
    Ok(segments)
}
