//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use answerfill_core::{
    BatchOrchestrator, BatchReport, ProgressReporter, SilentProgress, SourceOutcome, SourceReport,
};
use answerfill_extract::{ContentExtractionService, resolve, resolve_entry};
use answerfill_markdown::AnswerParser;
use answerfill_shared::{
    AppConfig, SourceKind, SourceList, SourceSpec, init_config, load_config, load_config_from,
};

/// Source used when neither positional sources nor a sources file are given.
const DEFAULT_SOURCE: &str = "answers.md";

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// answerfill: fill question templates from answer documents.
#[derive(Parser)]
#[command(
    name = "answerfill",
    version,
    about = "Extract answers from files, web pages, PDFs, DOCX, and images into a question template.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Config file to use instead of ~/.answerfill/answerfill.toml.
    #[arg(long, global = true, env = "ANSWERFILL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Fill the question template from one or more answer sources.
    Fill {
        /// Answer sources (paths or URLs). Defaults to answers.md.
        sources: Vec<String>,

        /// Question template (defaults to <data_dir>/questions.md).
        #[arg(short, long)]
        questions: Option<PathBuf>,

        /// Output document (defaults to <data_dir>/questions_filled.md).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON file listing sources: {"sources": [...]}.
        #[arg(long)]
        sources_file: Option<PathBuf>,

        /// Directory that relative source paths are read from.
        #[arg(long)]
        data_dir: Option<String>,

        /// Print the batch report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Extract the text of a single source.
    Extract {
        /// Path or URL.
        locator: String,

        /// Source type: file, url, image, pdf, or docx (inferred if omitted).
        #[arg(short, long)]
        kind: Option<SourceKind>,

        /// Directory that a relative path is read from.
        #[arg(long)]
        data_dir: Option<String>,

        /// Print the extraction result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Parse the answers found in a single source and print them as JSON.
    Parse {
        /// Path or URL.
        locator: String,

        /// Source type: file, url, image, pdf, or docx (inferred if omitted).
        #[arg(short, long)]
        kind: Option<SourceKind>,

        /// Directory that a relative path is read from.
        #[arg(long)]
        data_dir: Option<String>,
    },

    /// Show which extraction backends are available.
    Capabilities,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "answerfill=info",
        1 => "answerfill=debug",
        _ => "answerfill=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Fill {
            sources,
            questions,
            output,
            sources_file,
            data_dir,
            json,
        } => {
            let config = resolve_config(config_path, data_dir)?;
            let args = FillArgs {
                sources,
                questions,
                output,
                sources_file,
                json,
            };
            cmd_fill(&config, args).await
        }
        Command::Extract {
            locator,
            kind,
            data_dir,
            json,
        } => {
            let config = resolve_config(config_path, data_dir)?;
            cmd_extract(&config, &locator, kind, json).await
        }
        Command::Parse {
            locator,
            kind,
            data_dir,
        } => {
            let config = resolve_config(config_path, data_dir)?;
            cmd_parse(&config, &locator, kind).await
        }
        Command::Capabilities => {
            let config = resolve_config(config_path, None)?;
            cmd_capabilities(&config)
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

/// Load config from `--config` or the default location, then apply flag overrides.
fn resolve_config(path: Option<&Path>, data_dir: Option<String>) -> Result<AppConfig> {
    let mut config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    if let Some(dir) = data_dir {
        config.defaults.data_dir = dir;
    }
    Ok(config)
}

// ---------------------------------------------------------------------------
// fill
// ---------------------------------------------------------------------------

struct FillArgs {
    sources: Vec<String>,
    questions: Option<PathBuf>,
    output: Option<PathBuf>,
    sources_file: Option<PathBuf>,
    json: bool,
}

/// Positional sources first, then sources-file entries; the default source if both are empty.
fn collect_sources(sources: &[String], sources_file: Option<&Path>) -> Result<Vec<SourceSpec>> {
    let mut specs: Vec<SourceSpec> = sources.iter().map(|s| resolve(s, None)).collect();

    if let Some(path) = sources_file {
        let list = SourceList::load(path)?;
        specs.extend(list.sources.iter().map(resolve_entry));
    }

    if specs.is_empty() {
        specs.push(resolve(DEFAULT_SOURCE, None));
    }
    Ok(specs)
}

async fn cmd_fill(config: &AppConfig, args: FillArgs) -> Result<()> {
    let specs = collect_sources(&args.sources, args.sources_file.as_deref())?;
    let questions = args
        .questions
        .unwrap_or_else(|| config.defaults.questions_path());
    let output = args.output.unwrap_or_else(|| config.defaults.output_path());

    if !questions.is_file() {
        return Err(eyre!(
            "no question template found at '{}' (set --questions or [defaults] questions)",
            questions.display()
        ));
    }

    info!(
        sources = specs.len(),
        questions = %questions.display(),
        output = %output.display(),
        "filling question template"
    );

    let orchestrator = BatchOrchestrator::from_config(config)?;

    let report = if args.json {
        orchestrator
            .run(&specs, &questions, &output, &SilentProgress)
            .await?
    } else {
        let reporter = CliProgress::new();
        orchestrator
            .run(&specs, &questions, &output, &reporter)
            .await?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_fill_summary(&report);
    }

    Ok(())
}

fn print_fill_summary(report: &BatchReport) {
    println!();
    for source in &report.sources {
        match &source.outcome {
            SourceOutcome::Success { answers } => {
                println!("  ok      {}: {answers} answers", source.source);
            }
            SourceOutcome::Failed { error, .. } => {
                println!("  failed  {}: {error}", source.source);
            }
        }
    }
    println!();
    println!("  Answers:    {}", report.answers_total);
    println!("  Filled:     {}", report.filled_count);
    if !report.unresolved.is_empty() {
        println!("  Unresolved: {}", report.unresolved.join(", "));
    }
    println!("  Output:     {}", report.output.display());
    println!(
        "  Time:       {:.1}s",
        report.elapsed_ms as f64 / 1000.0
    );
    println!();
}

// ---------------------------------------------------------------------------
// extract / parse / capabilities
// ---------------------------------------------------------------------------

async fn cmd_extract(
    config: &AppConfig,
    locator: &str,
    kind: Option<SourceKind>,
    json: bool,
) -> Result<()> {
    let service = ContentExtractionService::from_config(config)?;
    let spec = resolve(locator, kind);
    info!(source = %spec, "extracting source");

    if json {
        let result = service.extract_result(spec).await;
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let text = extract_text(&service, &spec).await?;
    println!("{text}");
    Ok(())
}

async fn cmd_parse(config: &AppConfig, locator: &str, kind: Option<SourceKind>) -> Result<()> {
    let service = ContentExtractionService::from_config(config)?;
    let spec = resolve(locator, kind);

    let text = extract_text(&service, &spec).await?;

    let answers = AnswerParser::from_config(&config.markdown).parse(&text);
    info!(source = %spec, answers = answers.len(), "parsed answers");
    println!("{}", serde_json::to_string_pretty(&answers)?);
    Ok(())
}

/// Extract one source, treating failure as fatal for single-source commands.
async fn extract_text(
    service: &ContentExtractionService,
    spec: &SourceSpec,
) -> answerfill_shared::Result<String> {
    Ok(service.extract(spec).await?)
}

fn cmd_capabilities(config: &AppConfig) -> Result<()> {
    let service = ContentExtractionService::from_config(config)?;
    let report = service.registry().report();
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(path: Option<&Path>) -> Result<()> {
    let config = resolve_config(path, None)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn source_started(&self, source: &SourceSpec, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Extracting [{current}/{total}] {source}"));
    }

    fn source_finished(&self, report: &SourceReport) {
        if let SourceOutcome::Failed { error, .. } = &report.outcome {
            self.spinner
                .println(format!("  skipped {}: {error}", report.source));
        }
    }

    fn done(&self, _report: &BatchReport) {
        self.spinner.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn fill_defaults_to_answers_md() {
        let specs = collect_sources(&[], None).unwrap();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].locator, "answers.md");
        assert_eq!(specs[0].kind, SourceKind::TextFile);
    }

    #[test]
    fn fill_combines_positional_and_file_sources() {
        let sources_file = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../fixtures/sources.json");
        let specs = collect_sources(&["scan.pdf".to_string()], Some(&sources_file)).unwrap();

        let kinds: Vec<SourceKind> = specs.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SourceKind::Pdf,
                SourceKind::TextFile,
                SourceKind::TextFile,
                SourceKind::Url
            ]
        );
        assert_eq!(specs[3].query.as_deref(), Some("dependencies"));
    }

    #[test]
    fn parses_fill_flags() {
        let cli = Cli::try_parse_from([
            "answerfill",
            "-vv",
            "fill",
            "a.md",
            "https://example.com/faq",
            "--questions",
            "q.md",
            "--json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Fill {
                sources,
                questions,
                json,
                ..
            } => {
                assert_eq!(sources, vec!["a.md", "https://example.com/faq"]);
                assert_eq!(questions, Some(PathBuf::from("q.md")));
                assert!(json);
            }
            _ => panic!("expected fill"),
        }
    }

    #[tokio::test]
    async fn single_source_failure_is_an_extraction_error() {
        use answerfill_extract::{Capabilities, ExtractorRegistry};
        use answerfill_shared::{AnswerFillError, ErrorKind, ExtractionConfig};

        let registry =
            ExtractorRegistry::new(Capabilities::none(), &ExtractionConfig::default()).unwrap();
        let service = ContentExtractionService::new(registry);

        let err = extract_text(&service, &resolve("report.pdf", None))
            .await
            .unwrap_err();
        match &err {
            AnswerFillError::Extraction(inner) => {
                assert_eq!(inner.kind(), ErrorKind::CapabilityUnavailable)
            }
            other => panic!("expected extraction error, got {other:?}"),
        }
        assert!(err.to_string().contains("pdf extraction not available"));

        let err = extract_text(&service, &resolve("/no/such/dir/answers.md", None))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AnswerFillError::Extraction(ref inner) if inner.kind() == ErrorKind::NotFound
        ));
    }

    #[test]
    fn parses_explicit_kind() {
        let cli = Cli::try_parse_from(["answerfill", "extract", "notes.bin", "--kind", "text"])
            .unwrap();
        match cli.command {
            Command::Extract { kind, .. } => assert_eq!(kind, Some(SourceKind::TextFile)),
            _ => panic!("expected extract"),
        }
        assert!(Cli::try_parse_from(["answerfill", "extract", "x", "--kind", "video"]).is_err());
    }
}
