//! pdf-a11y: audit, score and repair PDF accessibility
//!
//! Runs the WCAG 2.1 AA checks from `a11y-engine` over a PDF, prints the
//! findings and score, applies the automatic fixes from `a11y-remediate` and
//! renders a printable summary with `a11y-report`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{debug, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;

use commands::{Format, RemediateOptions};
use config::Config;

/// Command-line arguments for pdf-a11y
#[derive(Parser, Debug)]
#[command(name = "pdf-a11y", version)]
#[command(about = "WCAG 2.1 AA accessibility audit and repair for PDF files")]
struct Args {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run every check and print the findings
    Analyze {
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Print the 0-100 score
    Score {
        #[arg(required_unless_present = "findings")]
        file: Option<PathBuf>,
        /// Findings saved by `analyze --format json`
        #[arg(long, conflicts_with = "file")]
        findings: Option<PathBuf>,
    },
    /// Set the document title
    FixTitle { file: PathBuf, title: String },
    /// Set the document language (BCP-47, e.g. en-US)
    FixLanguage { file: PathBuf, code: String },
    /// Add an OCR text layer to scanned pages
    Ocr {
        file: PathBuf,
        #[arg(long, default_value = "en")]
        lang: String,
    },
    /// Apply fixes, then print the score before and after
    Remediate {
        file: PathBuf,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        lang: Option<String>,
        #[arg(long)]
        ocr: bool,
    },
    /// Write a PDF summary of the audit
    Report {
        file: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the WCAG criteria that are checked
    Rules,
}

fn run(command: Command, config: &Config, out: &mut impl std::io::Write) -> anyhow::Result<()> {
    match command {
        Command::Analyze { file, format } => commands::analyze(&file, format, out),
        Command::Score { file, findings } => {
            commands::score_command(file.as_deref(), findings.as_deref(), out)
        }
        Command::FixTitle { file, title } => commands::fix_title(&file, &title, out),
        Command::FixLanguage { file, code } => commands::fix_language(&file, &code, out),
        Command::Ocr { file, lang } => commands::ocr(&file, &lang, config, out),
        Command::Remediate {
            file,
            title,
            lang,
            ocr,
        } => commands::remediate(
            &file,
            RemediateOptions {
                title: title.as_deref(),
                lang: lang.as_deref(),
                ocr,
            },
            config,
            out,
        ),
        Command::Report { file, output } => {
            commands::report(&file, output.as_deref(), config, out).map(|_| ())
        }
        Command::Rules => commands::rules(out),
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::from_default_env()
                .add_directive(log_level.into())
                // lopdf logs every text decode at info
                .add_directive("lopdf=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    debug!(?config, "configuration loaded");

    let stdout = std::io::stdout();
    run(args.command, &config, &mut stdout.lock())
}
