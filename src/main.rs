// SPDX-License-Identifier: PMPL-1.0-or-later
//! Gradebot CLI - grades HTML/CSS exercise submissions

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use gradebot::config::{self, Config};
use gradebot::document::Document;
use gradebot::lint::{css, html};
use gradebot::matchers::html_lint_results_contain_no_errors;
use gradebot::report::{generate_batch_report, generate_report, OutputFormat};
use gradebot::scanner;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Conformance grader for introductory HTML/CSS exercises
#[derive(Parser)]
#[command(name = "gradebot")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade one submission
    Check {
        /// Submission root containing index.html
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Configuration file (defaults to DIR/gradebot.toml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: FormatArg,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Enable verbose logging
        #[arg(long, short)]
        verbose: bool,
    },

    /// Grade every submission found under a directory
    Batch {
        /// Directory holding submissions
        dir: PathBuf,

        /// Configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: FormatArg,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Enable verbose logging
        #[arg(long, short)]
        verbose: bool,
    },

    /// Run only the markup linter on a document
    LintHtml {
        /// Document to lint
        file: PathBuf,

        /// Configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Enable verbose logging
        #[arg(long, short)]
        verbose: bool,
    },

    /// Run only the stylesheet linter and print its JSON output
    LintCss {
        /// Stylesheets to lint
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Enable verbose logging
        #[arg(long, short)]
        verbose: bool,
    },

    /// Write the default configuration file
    Init {
        /// Where to write it; `.yaml`/`.yml` selects YAML
        #[arg(long, default_value = "gradebot.toml")]
        path: PathBuf,
    },
}

/// Output format CLI argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Human-readable text
    Text,
    /// Structured JSON
    Json,
    /// JUnit XML for CI
    Junit,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Junit => OutputFormat::Junit,
        }
    }
}

/// `RUST_LOG` wins; otherwise `-v` or the configured level
fn init_logging(verbose: bool, config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, config)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Filter used when `RUST_LOG` is unset
fn default_directive(verbose: bool, config: &Config) -> String {
    if verbose {
        "gradebot=debug".to_string()
    } else {
        format!("gradebot={}", config.log.level)
    }
}

fn load(path: Option<&Path>, fallback: PathBuf) -> anyhow::Result<Config> {
    let path = path.map(Path::to_path_buf).unwrap_or(fallback);
    config::load_config(&path).with_context(|| format!("Failed to load config {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { dir, config, format, output, verbose } => {
            let config = load(config.as_deref(), dir.join(config::default_config_path()))?;
            init_logging(verbose, &config);

            let report = scanner::grade_submission(&dir, &config);
            write_output(&generate_report(&report, format.into()), output.as_deref())?;

            if report.has_failures() {
                std::process::exit(1);
            }
        }

        Commands::Batch { dir, config, format, output, verbose } => {
            let config = load(config.as_deref(), config::default_config_path())?;
            init_logging(verbose, &config);

            let reports = scanner::grade_directory(&dir, &config);
            write_output(&generate_batch_report(&reports, format.into()), output.as_deref())?;

            if reports.iter().any(|r| r.has_failures()) {
                std::process::exit(1);
            }
        }

        Commands::LintHtml { file, config, verbose } => {
            let config = load(config.as_deref(), config::default_config_path())?;
            init_logging(verbose, &config);

            let document = Document::load(&file)?;
            let issues = html::lint(document.source(), &config.markup_lint);
            for issue in &issues {
                println!("{}: {}", issue, issue.message);
            }

            let outcome = html_lint_results_contain_no_errors(&issues);
            if !outcome.pass {
                eprint!("{}", outcome.message);
                std::process::exit(1);
            }
        }

        Commands::LintCss { files, config, verbose } => {
            let config = load(config.as_deref(), config::default_config_path())?;
            init_logging(verbose, &config);

            let result = css::lint_files(&files, &config.style_lint)?;
            println!("{}", result.output);

            if result.errored {
                std::process::exit(1);
            }
        }

        Commands::Init { path } => {
            config::write_default_config(&path)?;
            println!("Default configuration written to {}", path.display());
        }
    }

    Ok(())
}

/// Write output to file or stdout
fn write_output(content: &str, path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(p) => {
            std::fs::write(p, content)?;
            eprintln!("Report written to {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
