//! CLI binary for docbrief.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `SummaryConfig`, shows notifications on a spinner, and prints the
//! normalized record.

use anyhow::{Context, Result};
use clap::Parser;
use docbrief::display::{render_raw_text, render_text};
use docbrief::notify::{Notification, NotificationKind, Notifier};
use docbrief::summarize::write_record;
use docbrief::{normalize, summarize, SummaryConfig, SummaryMode};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── Spinner notifier ─────────────────────────────────────────────────────────

/// One spinner line; each notification replaces the previous message, and
/// terminal notifications (succeeded/failed) are also logged above it.
struct SpinnerNotifier {
    bar: ProgressBar,
}

impl SpinnerNotifier {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("docbrief");
        bar.set_message("Extracting text…");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Notifier for SpinnerNotifier {
    fn notify(&self, n: &Notification) {
        self.bar.set_prefix(n.operation.to_string());
        self.bar.set_message(n.message.clone());
        match n.kind {
            NotificationKind::Succeeded => {
                self.bar.println(format!("  {} {}", green("✓"), n.message));
            }
            NotificationKind::Failed => {
                self.bar.println(format!("  {} {}", red("✗"), n.message));
            }
            NotificationKind::Retrying => {
                self.bar.println(format!("  {} {}", yellow("↻"), n.message));
            }
            NotificationKind::Fetching => {}
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Local extractive summary (no API key needed)
  docbrief tender.pdf

  # LLM summary with structured fields
  docbrief --ai tender.pdf

  # Pick a model and provider explicitly
  docbrief --ai --provider openai --model gpt-4.1-nano tender.pdf

  # JSON record on stdout, or written to a file
  docbrief --ai --json tender.pdf
  docbrief --ai tender.pdf -o brief.json

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY          Google Gemini API key (preferred when set)
  OPENAI_API_KEY          OpenAI API key
  ANTHROPIC_API_KEY       Anthropic API key
  EDGEQUAKE_LLM_PROVIDER  Override provider (gemini, openai, anthropic, ollama)
  EDGEQUAKE_MODEL         Override model ID
  PDFIUM_LIB_PATH         Directory containing libpdfium
"#;

/// Summarise PDF documents into structured briefs.
#[derive(Parser, Debug)]
#[command(
    name = "docbrief",
    version,
    about = "Summarise PDF documents into structured briefs, locally or with an LLM",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path.
    input: String,

    /// Use the LLM summarizer instead of the local one.
    #[arg(long, env = "DOCBRIEF_AI")]
    ai: bool,

    /// Also write the JSON record to this file.
    #[arg(short, long, env = "DOCBRIEF_OUTPUT")]
    output: Option<PathBuf>,

    /// LLM model ID (default: gemini-2.0-flash).
    #[arg(long, env = "EDGEQUAKE_MODEL")]
    model: Option<String>,

    /// LLM provider: gemini, openai, anthropic, ollama, azure.
    #[arg(long, env = "EDGEQUAKE_PROVIDER")]
    provider: Option<String>,

    /// Print the record as JSON instead of text panels.
    #[arg(long, env = "DOCBRIEF_JSON")]
    json: bool,

    /// Also print the extracted raw text.
    #[arg(long, env = "DOCBRIEF_RAW")]
    raw: bool,

    /// Sentences kept by the local summarizer.
    #[arg(long, env = "DOCBRIEF_SENTENCES", default_value_t = 5)]
    sentences: usize,

    /// Structure the extracted text directly, skipping the free-form draft.
    #[arg(long, env = "DOCBRIEF_NO_DRAFT")]
    no_draft: bool,

    /// Per-call LLM timeout in seconds.
    #[arg(long, env = "DOCBRIEF_API_TIMEOUT", default_value_t = 60,
          value_parser = clap::value_parser!(u64).range(1..))]
    api_timeout: u64,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "DOCBRIEF_TEMPERATURE", default_value_t = 0.1)]
    temperature: f32,

    /// Max LLM output tokens per call.
    #[arg(long, env = "DOCBRIEF_MAX_TOKENS", default_value_t = 2048)]
    max_tokens: usize,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "DOCBRIEF_PASSWORD")]
    password: Option<String>,

    /// Disable the status spinner.
    #[arg(long, env = "DOCBRIEF_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "DOCBRIEF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except the result and errors.
    #[arg(short, long, env = "DOCBRIEF_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner carries the status; library INFO logs would tear it.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let spinner = show_progress.then(SpinnerNotifier::new);
    let config = build_config(&cli, spinner.clone())?;

    // ── Run ──────────────────────────────────────────────────────────────
    let record = summarize(&cli.input, &config).await;
    if let Some(ref s) = spinner {
        s.finish();
    }

    if let Some(ref path) = cli.output {
        write_record(path, &record)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        if !cli.quiet {
            eprintln!("{} {}", green("✔"), bold(&path.display().to_string()));
        }
    }

    let view = normalize(&record);
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if cli.json {
        let json = serde_json::to_string_pretty(&record).context("Failed to serialise record")?;
        writeln!(handle, "{json}").context("Failed to write to stdout")?;
    } else {
        handle
            .write_all(render_text(&view).as_bytes())
            .context("Failed to write to stdout")?;
        if cli.raw {
            writeln!(handle, "\nRaw Text\n────────\n{}", render_raw_text(&view))
                .context("Failed to write to stdout")?;
        }
    }

    Ok(if view.is_failure() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Map CLI args to `SummaryConfig`.
fn build_config(cli: &Cli, spinner: Option<Arc<SpinnerNotifier>>) -> Result<SummaryConfig> {
    let mode = if cli.ai {
        SummaryMode::Ai
    } else {
        SummaryMode::Local
    };

    let mut builder = SummaryConfig::builder()
        .mode(mode)
        .local_sentences(cli.sentences)
        .draft_summary(!cli.no_draft)
        .api_timeout_secs(cli.api_timeout)
        .temperature(cli.temperature)
        .max_tokens(cli.max_tokens);

    if let Some(ref model) = cli.model {
        builder = builder.model(model.clone());
    }
    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider.clone());
    }
    if let Some(ref password) = cli.password {
        builder = builder.password(password.clone());
    }
    if let Some(s) = spinner {
        builder = builder.notifier(s as Arc<dyn Notifier>);
    }

    builder.build().context("Invalid configuration")
}
