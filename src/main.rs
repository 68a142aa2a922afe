use anyhow::{Context, Result};
use astpath::config::{load_or_default, SearchConfig};
use astpath::logging::init_logging;
use astpath::{
    discover_files, render, search_files, OutputError, PrintMode, Query, SearchOptions,
    SourceLang, Template,
};
use clap::{ArgAction, Parser};
use colored::Colorize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "astpath")]
#[command(about = "Query Go and Rust syntax trees with XPath", long_about = None)]
#[command(version)]
struct Cli {
    /// XPath expression selecting syntax nodes, e.g. "//BinaryExpression[@op='!=']"
    query: String,

    /// File or directory to search
    #[arg(default_value = ".")]
    root: PathBuf,

    /// How each match is printed
    #[arg(short = 'm', long, value_enum)]
    print_mode: Option<PrintMode>,

    /// Output template, e.g. "{position}: {source}" (implies --print-mode template)
    #[arg(short, long)]
    format: Option<String>,

    /// Only search files of these languages (repeatable)
    #[arg(short, long = "lang", value_enum)]
    lang: Vec<SourceLang>,

    /// Number of files processed in parallel
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Report failing files and continue with the rest
    #[arg(long)]
    keep_going: bool,

    /// Search config file (defaults to $ASTPATH_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

/// Settings after merging the config file with command-line flags.
struct Settings {
    mode: PrintMode,
    template: Option<Template>,
    languages: Vec<SourceLang>,
    options: SearchOptions,
}

fn settings(cli: &Cli, config: SearchConfig) -> Result<Settings> {
    let mode = match (cli.print_mode, &cli.format) {
        (Some(mode), _) => mode,
        (None, Some(_)) => PrintMode::Template,
        (None, None) => config.print_mode,
    };

    let format = cli.format.clone().or(config.format);
    let template = match mode {
        PrintMode::Template => {
            let format = format.ok_or(OutputError::MissingTemplate)?;
            Some(Template::parse(&format)?)
        }
        _ => None,
    };

    let languages = if cli.lang.is_empty() {
        config.languages
    } else {
        cli.lang.clone()
    };

    Ok(Settings {
        mode,
        template,
        languages,
        options: SearchOptions {
            jobs: cli.jobs.unwrap_or(config.jobs),
            keep_going: cli.keep_going || config.keep_going,
        },
    })
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_or_default(cli.config.as_deref())?;
    let settings = settings(&cli, config)?;

    // malformed queries fail before the tree is walked
    Query::compile(&cli.query)?;

    let files = discover_files(&cli.root, &settings.languages)?;
    let report = search_files(&files, &cli.query, &settings.options)?;

    // render everything first so a rendering error prints no partial output
    let lines = report
        .results
        .iter()
        .map(|result| render(result, settings.mode, settings.template.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in &lines {
        writeln!(out, "{line}").context("failed to write results")?;
    }
    out.flush().context("failed to write results")?;

    if report.is_success() {
        return Ok(ExitCode::SUCCESS);
    }
    for failure in &report.failures {
        eprintln!("{} {}", "error:".red().bold(), failure);
    }
    eprintln!(
        "{} of {} files failed",
        report.failures.len(),
        report.files
    );
    Ok(ExitCode::FAILURE)
}
