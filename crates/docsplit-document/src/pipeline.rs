// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Processing pipeline: open a document once and run the enabled features
// (image extraction, smart split, header/footer cleaning) against it.
//
// Each feature is isolated. A feature that fails contributes a warning and
// produces nothing; the others still run. Only a document that cannot be
// opened aborts the whole run.

use std::path::{Path, PathBuf};

use docsplit_core::error::{DocsplitError, Result};
use docsplit_core::human_errors::{HumanError, humanize_error};
use docsplit_core::{Feature, HeadingAnchor, ProcessingConfig, Segment};
use tracing::{info, instrument, warn};

use crate::archive::{archive_path, package_as_archive};
use crate::materialize::{materialize_segments, write_all_or_nothing, write_outputs};
use crate::pdf::PdfSource;
use crate::source::PageSource;
use crate::structure::headings::{HeadingPattern, detect_headings};
use crate::structure::noise::{NoiseRules, clean_noise};
use crate::structure::segments::plan_segments;

/// Base name used when the input path has no usable file stem.
const FALLBACK_BASE_NAME: &str = "document";

/// A user-visible warning, tagged with the feature that raised it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureWarning {
    /// `None` for run-level warnings such as "nothing was produced".
    pub feature: Option<Feature>,
    pub warning: HumanError,
}

impl std::fmt::Display for FeatureWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.feature {
            Some(feature) => write!(f, "[{}] {}", feature.label(), self.warning),
            None => write!(f, "{}", self.warning),
        }
    }
}

/// Everything a run produced.
#[derive(Debug, Clone, Default)]
pub struct ProcessReport {
    /// Files left in the output directory (empty when packaged).
    pub outputs: Vec<PathBuf>,
    /// The archive, when packaging ran and succeeded.
    pub archive: Option<PathBuf>,
    pub headings: Vec<HeadingAnchor>,
    pub warnings: Vec<FeatureWarning>,
}

impl ProcessReport {
    fn warn(&mut self, feature: Option<Feature>, warning: HumanError) {
        warn!(feature = ?feature, message = %warning.message, "Feature warning");
        self.warnings.push(FeatureWarning { feature, warning });
    }

    fn fail(&mut self, feature: Feature, err: &DocsplitError) {
        warn!(
            feature = feature.label(),
            collaborator = err.is_collaborator_failure(),
            error = %err,
            "Feature failed"
        );
        self.warnings.push(FeatureWarning {
            feature: Some(feature),
            warning: humanize_error(err),
        });
    }

    /// Files the caller should look at: the archive if there is one,
    /// otherwise the loose outputs.
    pub fn delivered(&self) -> Vec<PathBuf> {
        match &self.archive {
            Some(archive) => vec![archive.clone()],
            None => self.outputs.clone(),
        }
    }
}

/// A validated configuration with its patterns compiled.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: ProcessingConfig,
    heading_pattern: HeadingPattern,
    noise_rules: NoiseRules,
}

impl Pipeline {
    pub fn new(config: ProcessingConfig) -> Result<Self> {
        config.validate()?;
        let heading_pattern = HeadingPattern::new(&config.heading_pattern)?;
        let noise_rules = NoiseRules::from_config(&config)?;
        Ok(Self {
            config,
            heading_pattern,
            noise_rules,
        })
    }

    pub fn config(&self) -> &ProcessingConfig {
        &self.config
    }

    // -- Individual features ------------------------------------------------

    pub fn headings(&self, source: &impl PageSource) -> Result<Vec<HeadingAnchor>> {
        detect_headings(source, &self.heading_pattern)
    }

    /// Plan segments for already-detected headings. No headings, or an empty
    /// document, plans nothing.
    pub fn plan(
        &self,
        source: &impl PageSource,
        anchors: &[HeadingAnchor],
    ) -> Result<Vec<Segment>> {
        match source.last_page() {
            Some(last_page) if !anchors.is_empty() => {
                plan_segments(anchors, self.config.group_size, last_page)
            }
            _ => Ok(Vec::new()),
        }
    }

    /// Split along `anchors` and write the parts into `out_dir`.
    pub fn split(
        &self,
        source: &impl PageSource,
        anchors: &[HeadingAnchor],
        out_dir: &Path,
    ) -> Result<Vec<PathBuf>> {
        let segments = self.plan(source, anchors)?;
        let outputs = materialize_segments(
            source,
            &segments,
            &self.config.name_prefix,
            self.config.max_title_length,
        )?;
        write_outputs(&outputs, out_dir)
    }

    /// Write the cleaned text to `<base>_cleaned.txt` in `out_dir`.
    pub fn clean(
        &self,
        source: &impl PageSource,
        base_name: &str,
        out_dir: &Path,
    ) -> Result<PathBuf> {
        let text = clean_noise(source, &self.noise_rules)?;
        let path = out_dir.join(format!("{base_name}_cleaned.txt"));
        std::fs::write(&path, text)?;
        Ok(path)
    }

    /// Write every embedded image into `out_dir`.
    pub fn images(
        &self,
        source: &PdfSource,
        base_name: &str,
        out_dir: &Path,
    ) -> Result<Vec<PathBuf>> {
        let images = source.embedded_images()?;
        let names: Vec<String> = images
            .iter()
            .map(|image| image.file_name(base_name))
            .collect();
        write_all_or_nothing(
            out_dir,
            names
                .iter()
                .zip(&images)
                .map(|(name, image)| (name.as_str(), image.bytes.as_slice())),
        )
    }

    // -- Whole run ------------------------------------------------------------

    /// Open `input` and run every enabled feature, writing into `out_dir`.
    ///
    /// Fails only when the document can't be opened or the output directory
    /// can't be created; everything else is reported as a warning.
    #[instrument(skip(self), fields(input = %input.display()))]
    pub fn run(&self, input: &Path, out_dir: &Path) -> Result<ProcessReport> {
        let source = PdfSource::open(input)?;
        std::fs::create_dir_all(out_dir)?;
        Ok(self.run_source(&source, &base_name(input), out_dir))
    }

    /// Run every enabled feature against an open document.
    pub fn run_source(&self, source: &PdfSource, base_name: &str, out_dir: &Path) -> ProcessReport {
        let features = self.config.features;
        let mut report = ProcessReport::default();

        if features.extract_images {
            match self.images(source, base_name, out_dir) {
                Ok(paths) if paths.is_empty() => report.warn(
                    Some(Feature::ExtractImages),
                    HumanError::notice(
                        "No images were found in this document.",
                        "Only embedded JPEG, JPEG 2000, and 8-bit RGB or grayscale images \
                         can be saved.",
                    ),
                ),
                Ok(paths) => report.outputs.extend(paths),
                Err(err) => report.fail(Feature::ExtractImages, &err),
            }
        }

        if features.smart_split {
            match self.headings(source) {
                Ok(anchors) if anchors.is_empty() => report.warn(
                    Some(Feature::SmartSplit),
                    HumanError::notice(
                        "No chapter or section headings were found.",
                        "Try a different heading pattern if this document uses other titles.",
                    ),
                ),
                Ok(anchors) => {
                    match self.split(source, &anchors, out_dir) {
                        Ok(paths) => report.outputs.extend(paths),
                        Err(err) => report.fail(Feature::SmartSplit, &err),
                    }
                    report.headings = anchors;
                }
                Err(err) => report.fail(Feature::SmartSplit, &err),
            }
        }

        if features.clean_text {
            match self.clean(source, base_name, out_dir) {
                Ok(path) => report.outputs.push(path),
                Err(err) => report.fail(Feature::CleanText, &err),
            }
        }

        if report.outputs.is_empty() {
            report.warn(
                None,
                HumanError::notice(
                    "Nothing was produced for this document.",
                    "Enable another feature or check the warnings above.",
                ),
            );
        } else if features.package {
            let target = archive_path(out_dir, base_name);
            match package_as_archive(&report.outputs, &target) {
                Ok(archive) => {
                    report.outputs.clear();
                    report.archive = Some(archive);
                }
                Err(err) => report.fail(Feature::Package, &err),
            }
        }

        info!(
            source = source.source_path().unwrap_or("<memory>"),
            outputs = report.outputs.len(),
            archived = report.archive.is_some(),
            warnings = report.warnings.len(),
            "Processing complete"
        );
        report
    }
}

/// File stem of `input`, or `document` when it has none.
pub fn base_name(input: &Path) -> String {
    input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| FALLBACK_BASE_NAME.to_string())
}
