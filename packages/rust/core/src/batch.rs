//! End-to-end `fill` batch: sources → extract → parse → merge → fill template.
//!
//! Sources are processed one at a time, in order. A failing source is
//! recorded and skipped; only template and output I/O can fail the batch.

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use answerfill_extract::ContentExtractionService;
use answerfill_markdown::{AnswerParser, TemplateDocument, TemplateFiller};
use answerfill_shared::{AnswerFillError, AnswerMap, AppConfig, ErrorKind, Result, SourceSpec};

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// What happened to one source.
#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    pub source: SourceSpec,
    #[serde(flatten)]
    pub outcome: SourceOutcome,
}

/// Per-source status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceOutcome {
    /// Extracted and parsed; `answers` entries found.
    Success { answers: usize },
    /// Extraction failed; the batch carried on without this source.
    Failed {
        kind: ErrorKind,
        error: String,
        retryable: bool,
    },
}

impl SourceReport {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, SourceOutcome::Success { .. })
    }
}

/// Summary of a completed batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// One entry per input source, in input order.
    pub sources: Vec<SourceReport>,
    /// Distinct answer keys after merging all sources.
    pub answers_total: usize,
    /// Placeholders actually replaced in the template.
    pub filled_count: usize,
    /// Question keys still carrying a placeholder.
    pub unresolved: Vec<String>,
    /// Where the filled document was written.
    pub output: PathBuf,
    pub elapsed_ms: u64,
}

impl BatchReport {
    pub fn failed_sources(&self) -> usize {
        self.sources.iter().filter(|s| !s.is_success()).count()
    }
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Progress callback for reporting batch status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called before a source is extracted.
    fn source_started(&self, source: &SourceSpec, current: usize, total: usize);
    /// Called once a source has succeeded or failed.
    fn source_finished(&self, report: &SourceReport);
    /// Called when the batch completes.
    fn done(&self, report: &BatchReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn source_started(&self, _source: &SourceSpec, _current: usize, _total: usize) {}
    fn source_finished(&self, _report: &SourceReport) {}
    fn done(&self, _report: &BatchReport) {}
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Drives extraction, parsing, and filling across a list of sources.
pub struct BatchOrchestrator {
    service: ContentExtractionService,
    parser: AnswerParser,
    filler: TemplateFiller,
}

impl BatchOrchestrator {
    pub fn new(
        service: ContentExtractionService,
        parser: AnswerParser,
        filler: TemplateFiller,
    ) -> Self {
        Self {
            service,
            parser,
            filler,
        }
    }

    /// Build the service, parser, and filler from application config.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self::new(
            ContentExtractionService::from_config(config)?,
            AnswerParser::from_config(&config.markdown),
            TemplateFiller::from_config(&config.markdown),
        ))
    }

    /// Extract and parse every source, merging answers in order.
    ///
    /// A key found in a later source replaces the same key from an earlier one.
    #[instrument(skip_all, fields(sources = sources.len()))]
    pub async fn collect_answers(
        &self,
        sources: &[SourceSpec],
        progress: &dyn ProgressReporter,
    ) -> (AnswerMap, Vec<SourceReport>) {
        let mut merged = AnswerMap::new();
        let mut reports = Vec::with_capacity(sources.len());
        let total = sources.len();

        for (i, spec) in sources.iter().enumerate() {
            progress.source_started(spec, i + 1, total);

            let outcome = match self.service.extract(spec).await {
                Ok(text) => {
                    let answers = self.parser.parse(&text);
                    let count = answers.len();
                    debug!(source = %spec, answers = count, "source parsed");
                    merged.extend(answers);
                    SourceOutcome::Success { answers: count }
                }
                Err(e) => {
                    warn!(source = %spec, error = %e, "source failed, continuing");
                    SourceOutcome::Failed {
                        kind: e.kind(),
                        error: e.to_string(),
                        retryable: e.is_retryable(),
                    }
                }
            };

            let report = SourceReport {
                source: spec.clone(),
                outcome,
            };
            progress.source_finished(&report);
            reports.push(report);
        }

        (merged, reports)
    }

    /// Run the full batch and write the filled template to `output`.
    ///
    /// 1. Read the template (fatal on failure)
    /// 2. Collect answers from every source
    /// 3. Fill the template, or copy it unchanged when no answers were found
    /// 4. Write the output, creating parent directories
    #[instrument(skip_all, fields(template = %template.display(), output = %output.display()))]
    pub async fn run(
        &self,
        sources: &[SourceSpec],
        template: &Path,
        output: &Path,
        progress: &dyn ProgressReporter,
    ) -> Result<BatchReport> {
        let start = Instant::now();
        info!(sources = sources.len(), "starting fill batch");

        // --- Phase 1: Template ---
        progress.phase("Reading template");
        let template_text = tokio::fs::read_to_string(template)
            .await
            .map_err(|e| AnswerFillError::io(template, e))?;

        // --- Phase 2: Sources ---
        progress.phase("Extracting answers");
        let (answers, reports) = self.collect_answers(sources, progress).await;

        // --- Phase 3: Fill ---
        progress.phase("Filling template");
        let (filled_text, filled_count, unresolved) = if answers.is_empty() {
            let doc = TemplateDocument::parse(&template_text, self.filler.placeholder());
            let unresolved: Vec<String> =
                doc.question_keys().into_iter().map(String::from).collect();
            (template_text, 0, unresolved)
        } else {
            let outcome = self.filler.fill(&template_text, &answers);
            (outcome.text, outcome.filled.len(), outcome.unresolved)
        };

        // --- Phase 4: Write ---
        progress.phase("Writing output");
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| AnswerFillError::io(parent, e))?;
            }
        }
        tokio::fs::write(output, filled_text)
            .await
            .map_err(|e| AnswerFillError::io(output, e))?;

        let report = BatchReport {
            sources: reports,
            answers_total: answers.len(),
            filled_count,
            unresolved,
            output: output.to_path_buf(),
            elapsed_ms: start.elapsed().as_millis() as u64,
        };

        progress.done(&report);

        info!(
            answers_total = report.answers_total,
            filled_count = report.filled_count,
            unresolved = report.unresolved.len(),
            failed_sources = report.failed_sources(),
            elapsed_ms = report.elapsed_ms,
            "fill batch complete"
        );

        Ok(report)
    }
}
