//! The lazy element stream.

use std::collections::VecDeque;
use std::sync::Arc;

use rayon::prelude::*;

use crate::builder::{Band, BandCursor, ElementBuilder};
use crate::container::{Part, PartReader, ZipContainer};
use crate::error::{Error, Result};
use crate::model::{Element, ElementKind, Metadata};
use crate::parser::{
    analyze_body, analyze_header_footer, analyze_notes, parse_core_properties, parse_style_names,
    resolve_main_part, BodyNode, ExtractOptions, PartPatterns, StyleClassifier,
    CORE_PROPERTIES_PART, ENDNOTES_PART, FOOTNOTES_PART, STYLES_PART,
};

use super::{outcome_from, ExtractionReport, Stage, StageOutcome};

const STAGE_ORDER: [Stage; 6] = [
    Stage::Metadata,
    Stage::Content,
    Stage::PageHeaders,
    Stage::Footers,
    Stage::Footnotes,
    Stage::Images,
];

/// Media parts still to be read, one per pull.
#[derive(Debug)]
struct ImageQueue {
    names: VecDeque<String>,
    cursor: BandCursor,
    warnings: Vec<String>,
    emitted: usize,
}

/// A pull-based sequence of elements from one document.
///
/// Each call to `next` does only the work needed for the next element: a
/// stage's part is analyzed when the stage is entered, and media parts are
/// read one at a time (unless parallel reading is enabled). The stream yields
/// at most one `Err`, after which it is exhausted. The container is released
/// as soon as the stream is exhausted, fails, or is dropped.
///
/// # Example
///
/// ```no_run
/// use undocx::{extract, ExtractOptions};
///
/// fn main() -> undocx::Result<()> {
///     let bytes = std::fs::read("report.docx")?;
///     for element in extract(bytes, ExtractOptions::default())? {
///         let element = element?;
///         println!("{} {}", element.id, element.element_type());
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct ElementStream {
    container: Option<ZipContainer>,
    options: ExtractOptions,
    builder: ElementBuilder,
    patterns: PartPatterns,
    main_part: String,
    plan: VecDeque<Stage>,
    pending: VecDeque<Element>,
    images: Option<ImageQueue>,
    report: ExtractionReport,
}

impl ElementStream {
    /// Open a document and prepare a run.
    ///
    /// The container and the presence of the main part are checked here, so
    /// a document without body content fails before any element is produced.
    pub fn new(bytes: impl Into<Arc<[u8]>>, options: ExtractOptions) -> Result<Self> {
        let mut container = ZipContainer::open(bytes)?;
        let main_part = resolve_main_part(&mut container)?;
        log::debug!("Main document part: {}", main_part);

        let builder = ElementBuilder::new(&options, StyleClassifier::new()?);
        Ok(Self {
            container: Some(container),
            options,
            builder,
            patterns: PartPatterns::new()?,
            main_part,
            plan: STAGE_ORDER.into_iter().collect(),
            pending: VecDeque::new(),
            images: None,
            report: ExtractionReport::default(),
        })
    }

    /// Per-stage outcomes so far.
    pub fn report(&self) -> &ExtractionReport {
        &self.report
    }

    /// Name of the main document part.
    pub fn main_part(&self) -> &str {
        &self.main_part
    }

    /// Options of this run.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Whether the stream is exhausted and the container released.
    pub fn is_done(&self) -> bool {
        self.container.is_none()
    }

    /// Drain the stream, returning all elements and the final report.
    pub fn collect_with_report(mut self) -> Result<(Vec<Element>, ExtractionReport)> {
        let mut elements = Vec::new();
        for element in self.by_ref() {
            elements.push(element?);
        }
        Ok((elements, self.report))
    }

    fn fail(&mut self, err: Error) -> Error {
        log::debug!("Extraction aborted: {}", err);
        self.container = None;
        self.plan.clear();
        self.pending.clear();
        self.images = None;
        err
    }

    fn run_stage(&mut self, stage: Stage) -> Result<()> {
        if !stage.enabled(&self.options) {
            log::debug!("Skipping {} stage", stage);
            self.report.record(stage, StageOutcome::Skipped, 0);
            return Ok(());
        }
        log::debug!("Entering {} stage", stage);

        match stage {
            Stage::Metadata => self.metadata_stage(),
            Stage::Content | Stage::Tables => return self.content_stage(),
            Stage::PageHeaders => self.header_footer_stage(Stage::PageHeaders),
            Stage::Footers => self.header_footer_stage(Stage::Footers),
            Stage::Footnotes => self.notes_stage(),
            Stage::Images => self.images_stage(),
        }
        Ok(())
    }

    fn metadata_stage(&mut self) {
        let Some(container) = self.container.as_mut() else {
            return;
        };

        let (metadata, warning) = match read_text(container, CORE_PROPERTIES_PART) {
            Ok(Some(xml)) => match parse_core_properties(CORE_PROPERTIES_PART, &xml) {
                Ok(metadata) => (metadata, None),
                Err(e) => (Metadata::default(), Some(format!("malformed metadata: {}", e))),
            },
            Ok(None) => (
                Metadata::default(),
                Some(format!("metadata part {} not found", CORE_PROPERTIES_PART)),
            ),
            Err(e) => (Metadata::default(), Some(format!("unreadable metadata: {}", e))),
        };

        if let Some(ref message) = warning {
            log::warn!("Using empty metadata: {}", message);
        }
        let element = self.builder.metadata(metadata, warning.clone());
        self.pending.push_back(element);
        self.report
            .record(Stage::Metadata, outcome_from(warning.into_iter().collect()), 1);
    }

    fn content_stage(&mut self) -> Result<()> {
        let Some(container) = self.container.as_mut() else {
            return Ok(());
        };

        let xml = read_text(container, &self.main_part)?
            .ok_or_else(|| Error::MissingPart(self.main_part.clone()))?;
        let analysis = analyze_body(&self.main_part, &xml)?;

        let mut warnings = Vec::new();
        let styles = read_text(container, STYLES_PART)
            .and_then(|xml| xml.map(|xml| parse_style_names(STYLES_PART, &xml)).transpose());
        match styles {
            Ok(Some(names)) => self
                .builder
                .set_classifier(StyleClassifier::with_display_names(names)?),
            Ok(None) => {}
            Err(e) => {
                log::warn!("Ignoring style definitions: {}", e);
                warnings.push(e.to_string());
            }
        }

        let include_tables = self.options.include_tables;
        let mut table_warnings = Vec::new();
        if let (true, Some(problem)) = (include_tables, analysis.table_error.as_ref()) {
            log::warn!(
                "Dropping {} table(s) from {}: {}",
                analysis.table_count(),
                self.main_part,
                problem
            );
            table_warnings.push(problem.clone());
        }
        let keep_tables = include_tables && analysis.table_error.is_none();

        let mut cursor = Band::Content.cursor();
        let (mut blocks, mut tables) = (0, 0);
        for node in analysis.nodes {
            let kind = match node {
                BodyNode::Paragraph(scan) => self.builder.paragraph(scan),
                BodyNode::Table(table) if keep_tables => self.builder.table(table),
                BodyNode::Table(_) => None,
            };
            if let Some(kind) = kind {
                if matches!(kind, ElementKind::Table(_)) {
                    tables += 1;
                } else {
                    blocks += 1;
                }
                let element = self.builder.element(&mut cursor, kind);
                self.pending.push_back(element);
            }
        }

        self.report
            .record(Stage::Content, outcome_from(warnings), blocks);
        let table_outcome = if include_tables {
            outcome_from(table_warnings)
        } else {
            StageOutcome::Skipped
        };
        self.report.record(Stage::Tables, table_outcome, tables);
        Ok(())
    }

    fn header_footer_stage(&mut self, stage: Stage) {
        let Some(container) = self.container.as_mut() else {
            return;
        };
        let footer = stage == Stage::Footers;
        let pattern = if footer {
            &self.patterns.footers
        } else {
            &self.patterns.headers
        };

        let mut kinds = Vec::new();
        let mut warnings = Vec::new();
        for name in container.part_names(pattern) {
            let scan = read_text(container, &name).and_then(|xml| {
                xml.map(|xml| analyze_header_footer(&name, &xml))
                    .transpose()
            });
            match scan {
                Ok(Some(scan)) => kinds.extend(self.builder.header_footer(&name, scan, footer)),
                Ok(None) => {}
                Err(e) => {
                    log::warn!("Skipping {} stage: {}", stage, e);
                    warnings.push(e.to_string());
                }
            }
        }

        self.emit_stage(stage, kinds, warnings);
    }

    fn notes_stage(&mut self) {
        let Some(container) = self.container.as_mut() else {
            return;
        };

        let mut kinds = Vec::new();
        let mut warnings = Vec::new();
        for part in [FOOTNOTES_PART, ENDNOTES_PART] {
            let notes = read_text(container, part)
                .and_then(|xml| xml.map(|xml| analyze_notes(part, &xml)).transpose());
            match notes {
                Ok(Some(notes)) => {
                    kinds.extend(notes.into_iter().filter_map(|n| self.builder.footnote(n)))
                }
                Ok(None) => {}
                Err(e) => {
                    log::warn!("Skipping footnotes stage: {}", e);
                    warnings.push(e.to_string());
                }
            }
        }

        self.emit_stage(Stage::Footnotes, kinds, warnings);
    }

    /// Queue a stage's elements. A stage with any warning contributes none.
    fn emit_stage(&mut self, stage: Stage, mut kinds: Vec<ElementKind>, warnings: Vec<String>) {
        if !warnings.is_empty() {
            kinds.clear();
        }
        let mut cursor = stage.band().cursor();
        let count = kinds.len();
        for kind in kinds {
            let element = self.builder.element(&mut cursor, kind);
            self.pending.push_back(element);
        }
        self.report.record(stage, outcome_from(warnings), count);
    }

    fn images_stage(&mut self) {
        let Some(container) = self.container.as_mut() else {
            return;
        };
        let names = container.part_names(&self.patterns.media);
        log::debug!("Found {} media parts", names.len());

        if !self.options.parallel {
            self.report.record(Stage::Images, StageOutcome::Complete, 0);
            self.images = Some(ImageQueue {
                names: names.into(),
                cursor: Band::Images.cursor(),
                warnings: Vec::new(),
                emitted: 0,
            });
            return;
        }

        let max = self.options.max_image_size_bytes;
        let results = read_media_parallel(container.bytes(), &names, max);

        let mut cursor = Band::Images.cursor();
        let mut warnings = Vec::new();
        let mut count = 0;
        for (name, result) in names.iter().zip(results) {
            match result {
                Ok(Some(data)) => {
                    let kind = self.builder.image(name, data);
                    let element = self.builder.element(&mut cursor, kind);
                    self.pending.push_back(element);
                    count += 1;
                }
                Ok(None) => {}
                Err(e) => {
                    log::warn!("Skipping image {}: {}", name, e);
                    warnings.push(e.to_string());
                }
            }
        }
        self.report
            .record(Stage::Images, outcome_from(warnings), count);
    }

    fn next_image(&mut self) -> Option<Element> {
        let max = self.options.max_image_size_bytes;
        loop {
            let queue = self.images.as_mut()?;
            let Some(name) = queue.names.pop_front() else {
                if let Some(queue) = self.images.take() {
                    self.report.record(
                        Stage::Images,
                        outcome_from(queue.warnings),
                        queue.emitted,
                    );
                }
                return None;
            };
            let container = self.container.as_mut()?;

            if exceeds_limit(container, &name, max) {
                continue;
            }
            match container.read_part(&name) {
                Ok(Some(data)) if data.len() > max => {
                    log::debug!("Skipping {}: {} bytes exceeds limit", name, data.len());
                }
                Ok(Some(data)) => {
                    let kind = self.builder.image(&name, data);
                    let element = self.builder.element(&mut queue.cursor, kind);
                    queue.emitted += 1;
                    self.report.add_element(Stage::Images);
                    return Some(element);
                }
                Ok(None) => {}
                Err(e) => {
                    log::warn!("Skipping image {}: {}", name, e);
                    queue.warnings.push(e.to_string());
                }
            }
        }
    }
}

impl Iterator for ElementStream {
    type Item = Result<Element>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(element) = self.pending.pop_front() {
                return Some(Ok(element));
            }

            if self.images.is_some() {
                if let Some(element) = self.next_image() {
                    return Some(Ok(element));
                }
                continue;
            }

            let Some(stage) = self.plan.pop_front() else {
                if self.container.take().is_some() {
                    log::debug!("Extraction finished");
                }
                return None;
            };
            if let Err(e) = self.run_stage(stage) {
                return Some(Err(self.fail(e)));
            }
        }
    }
}

impl std::iter::FusedIterator for ElementStream {}

/// Read a part as UTF-8 text.
fn read_text(container: &mut ZipContainer, name: &str) -> Result<Option<String>> {
    match container.read_part(name)? {
        Some(data) => {
            let part = Part::new(name, data);
            part.text().map(|text| Some(text.to_string()))
        }
        None => Ok(None),
    }
}

/// Whether the archive declares a part larger than `max` bytes.
fn exceeds_limit(container: &mut ZipContainer, name: &str, max: usize) -> bool {
    match container.declared_size(name) {
        Some(size) if size > max as u64 => {
            log::debug!("Skipping {}: {} bytes exceeds limit", name, size);
            true
        }
        _ => false,
    }
}

/// Read media parts on the rayon pool, one archive handle per worker.
///
/// Results come back in the order of `names`. Oversized parts read as `None`.
fn read_media_parallel(
    bytes: Arc<[u8]>,
    names: &[String],
    max: usize,
) -> Vec<Result<Option<Vec<u8>>>> {
    names
        .par_iter()
        .map_init(
            || ZipContainer::open(Arc::clone(&bytes)),
            |container, name| {
                let container = match container {
                    Ok(container) => container,
                    Err(e) => return Err(Error::InvalidContainer(e.to_string())),
                };
                if exceeds_limit(container, name, max) {
                    return Ok(None);
                }
                match container.read_part(name)? {
                    Some(data) if data.len() > max => {
                        log::debug!("Skipping {}: {} bytes exceeds limit", name, data.len());
                        Ok(None)
                    }
                    other => Ok(other),
                }
            },
        )
        .collect()
}
