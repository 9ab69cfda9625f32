//! Extraction stages and their outcomes.
//!
//! A run walks the stages in a fixed order:
//!
//! ```text
//! metadata? -> content (tables? inside) -> page headers? -> footers? -> footnotes -> images?
//! ```
//!
//! Disabled stages do no work and are reported as [`StageOutcome::Skipped`].
//! Content is load-bearing and its failure ends the run; every other stage
//! degrades to zero elements instead.

mod stream;

use serde::{Deserialize, Serialize};

pub use stream::ElementStream;

use crate::builder::Band;
use crate::parser::ExtractOptions;

/// One phase of an extraction run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Metadata,
    Content,
    /// Tables, extracted as part of the content stage
    Tables,
    PageHeaders,
    Footers,
    Footnotes,
    Images,
}

impl Stage {
    /// All stages in reporting order.
    pub const ALL: [Stage; 7] = [
        Stage::Metadata,
        Stage::Content,
        Stage::Tables,
        Stage::PageHeaders,
        Stage::Footers,
        Stage::Footnotes,
        Stage::Images,
    ];

    /// Whether the options enable this stage.
    pub fn enabled(&self, options: &ExtractOptions) -> bool {
        match self {
            Stage::Metadata => options.include_metadata,
            Stage::Content | Stage::Footnotes => true,
            Stage::Tables => options.include_tables,
            Stage::PageHeaders => options.include_headers,
            Stage::Footers => options.include_footers,
            Stage::Images => options.include_images,
        }
    }

    /// Ordering band of the stage's elements.
    pub fn band(&self) -> Band {
        match self {
            Stage::Metadata => Band::Metadata,
            Stage::Content | Stage::Tables => Band::Content,
            Stage::PageHeaders => Band::PageHeaders,
            Stage::Footers => Band::Footers,
            Stage::Footnotes => Band::Footnotes,
            Stage::Images => Band::Images,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Metadata => "metadata",
            Stage::Content => "content",
            Stage::Tables => "tables",
            Stage::PageHeaders => "page headers",
            Stage::Footers => "footers",
            Stage::Footnotes => "footnotes",
            Stage::Images => "images",
        };
        f.write_str(name)
    }
}

/// How a stage ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageOutcome {
    /// Ran to completion
    Complete,
    /// Ran, but some input was unusable
    Degraded {
        /// What went wrong
        warnings: Vec<String>,
    },
    /// Disabled by the options; no work was done
    Skipped,
}

impl StageOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, StageOutcome::Skipped)
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, StageOutcome::Degraded { .. })
    }
}

/// Outcome and element count of one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageReport {
    pub stage: Stage,
    pub outcome: StageOutcome,
    /// Elements emitted (or queued for emission) by the stage
    pub elements: usize,
}

/// Per-stage record of a run.
///
/// Stages that have not run yet are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub stages: Vec<StageReport>,
}

impl ExtractionReport {
    /// Report for a stage, if it has run or been skipped.
    pub fn stage(&self, stage: Stage) -> Option<&StageReport> {
        self.stages.iter().find(|r| r.stage == stage)
    }

    /// Outcome of a stage.
    pub fn outcome(&self, stage: Stage) -> Option<&StageOutcome> {
        self.stage(stage).map(|r| &r.outcome)
    }

    /// All warnings recorded by degraded stages.
    pub fn warnings(&self) -> Vec<&str> {
        self.stages
            .iter()
            .filter_map(|r| match &r.outcome {
                StageOutcome::Degraded { warnings } => Some(warnings),
                _ => None,
            })
            .flatten()
            .map(String::as_str)
            .collect()
    }

    /// Whether any stage degraded.
    pub fn is_degraded(&self) -> bool {
        self.stages.iter().any(|r| r.outcome.is_degraded())
    }

    pub(crate) fn record(&mut self, stage: Stage, outcome: StageOutcome, elements: usize) {
        match self.stages.iter_mut().find(|r| r.stage == stage) {
            Some(report) => {
                report.outcome = outcome;
                report.elements = elements;
            }
            None => self.stages.push(StageReport {
                stage,
                outcome,
                elements,
            }),
        }
    }

    pub(crate) fn add_element(&mut self, stage: Stage) {
        if let Some(report) = self.stages.iter_mut().find(|r| r.stage == stage) {
            report.elements += 1;
        }
    }
}

/// Outcome from collected warnings.
pub(crate) fn outcome_from(warnings: Vec<String>) -> StageOutcome {
    if warnings.is_empty() {
        StageOutcome::Complete
    } else {
        StageOutcome::Degraded { warnings }
    }
}
