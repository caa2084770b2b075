// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Header/footer cleaning over real lopdf documents.

mod common;

use common::{BODY, FOOTER, HEADER, LEFT, build_pdf, build_placed_pdf};
use docsplit_core::ZoneThresholds;
use docsplit_document::{NoiseRules, PdfSource, clean_noise};

fn report() -> Vec<u8> {
    build_pdf(
        &[
            &[
                (HEADER, "Page 1"),
                (BODY, "42"),
                (FOOTER + 15, "[3] Page 3"),
                (FOOTER, "7"),
            ],
            &[(HEADER, "The Annual Report"), (BODY, "Body")],
        ],
        &[],
    )
}

#[test]
fn drops_zone_noise_and_keeps_citations() {
    let source = PdfSource::from_bytes(&report()).unwrap();
    let text = clean_noise(&source, &NoiseRules::default()).unwrap();
    assert_eq!(
        text,
        "\n\n--- Page 1 ---\n\n42\n[3] Page 3\n\n\n--- Page 2 ---\n\nThe Annual Report\nBody\n"
    );
}

#[test]
fn zero_margins_keep_everything() {
    let rules = NoiseRules::new(
        ZoneThresholds {
            header_margin: 0.0,
            footer_margin: 1.0,
        },
        &[r"(?i)page\s*\d+", r"^\s*\d+\s*$"],
        &[],
    )
    .unwrap();
    let source = PdfSource::from_bytes(&report()).unwrap();
    let text = clean_noise(&source, &rules).unwrap();
    assert!(text.contains("Page 1\n"));
    assert!(text.contains("\n7\n"));
}

#[test]
fn empty_pages_keep_their_separator() {
    let pdf = build_pdf(&[&[], &[(BODY, "only text")]], &[]);
    let source = PdfSource::from_bytes(&pdf).unwrap();
    let text = clean_noise(&source, &NoiseRules::default()).unwrap();
    assert_eq!(text, "\n\n--- Page 1 ---\n\n\n\n--- Page 2 ---\n\nonly text\n");
}

#[test]
fn footer_beside_page_number_survives() {
    let pdf = build_placed_pdf(
        &[&[
            (LEFT, BODY, "Quarterly results"),
            (LEFT, FOOTER, "Copyright 2026 ACME Corp"),
            (500, FOOTER, "Page 3"),
        ]],
        &[],
    );
    let source = PdfSource::from_bytes(&pdf).unwrap();
    let text = clean_noise(&source, &NoiseRules::default()).unwrap();
    assert_eq!(
        text,
        "\n\n--- Page 1 ---\n\nQuarterly results\nCopyright 2026 ACME Corp\n"
    );
}
