//! # Fluentpad
//!
//! Headless driver for the Fluentpad editing core. It loads a document,
//! replays editing intents given on the command line, and prints the
//! resulting status line, search results and gutter.
//!
//! ```bash
//! # Find the second "TODO" and show the lines around it
//! fluentpad notes.txt -c find:TODO -c find:TODO --gutter
//!
//! # Append a line and save the result elsewhere
//! fluentpad notes.txt -c move:end -c 'insert:\ndone' -o notes.out.txt
//! ```

use anyhow::Context;
use clap::Parser;
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use fluentpad_core::session::is_history_exhausted;
use fluentpad_core::{Command, CommandOutcome, Config, EditingSession};

/// Fluentpad - replay editing intents against a text file
#[derive(Parser, Debug)]
#[command(name = "fluentpad")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File to open
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Intent to run, e.g. `find:word`, `insert:text`, `undo` (repeatable)
    #[arg(short, long = "command", value_name = "INTENT")]
    commands: Vec<String>,

    /// Write the resulting text to this file
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Config file (defaults to the user config directory)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Match case in find intents
    #[arg(long)]
    case_sensitive: bool,

    /// Do not wrap around the document in find intents
    #[arg(long)]
    no_wrap: bool,

    /// Report how many times a pattern occurs
    #[arg(long, value_name = "PATTERN")]
    count: Option<String>,

    /// Print the visible lines with their gutter numbers
    #[arg(short, long)]
    gutter: bool,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .init();

    tracing::info!("Starting Fluentpad v{}", env!("CARGO_PKG_VERSION"));

    let report = run(&args)?;
    print!("{report}");
    Ok(())
}

/// Runs the session described by `args` and returns the report text.
fn run(args: &Args) -> anyhow::Result<String> {
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load(),
    };
    if args.case_sensitive {
        config.search.case_sensitive = true;
    }
    if args.no_wrap {
        config.search.wrap = false;
    }

    let text = match &args.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => String::new(),
    };
    let mut session = EditingSession::from_text(&text, config);
    let mut report = String::new();

    for raw in &args.commands {
        let command: Command = raw.parse()?;
        match session.execute(&command) {
            Ok(CommandOutcome::Found(Some(m))) => {
                let line = session.buffer().line_of_offset(m.start);
                let column = session.buffer().column_of_offset(m.start);
                writeln!(report, "{raw}: match at Ln {}, Col {}", line + 1, column + 1)?;
            }
            Ok(CommandOutcome::Found(None)) => writeln!(report, "{raw}: not found")?,
            Ok(_) => {}
            Err(err) if is_history_exhausted(&err) => writeln!(report, "{raw}: {err}")?,
            Err(err) => return Err(err).with_context(|| format!("Intent `{raw}` failed")),
        }
    }

    if let Some(pattern) = &args.count {
        let count = session.match_count(pattern, session.config().search.case_sensitive)?;
        writeln!(report, "{count} matches for {pattern:?}")?;
    }

    if let Some(path) = &args.output {
        std::fs::write(path, session.text().as_bytes())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        session.mark_saved();
        tracing::info!("Saved {}", path.display());
    }

    if args.gutter {
        write_gutter(&session, &mut report)?;
    }

    let dirty = if session.is_dirty() { "  modified" } else { "" };
    writeln!(report, "{}{dirty}", session.status())?;
    Ok(report)
}

fn write_gutter(session: &EditingSession, out: &mut String) -> anyhow::Result<()> {
    let width = session.buffer().line_count().to_string().len();
    let highlight = session.config().view.highlight_current_line;

    for row in session.gutter() {
        let marker = if highlight && row.is_current { '>' } else { ' ' };
        let line = session.buffer().line_text(row.index)?;
        writeln!(out, "{:>width$} {marker} {line}", row.number())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        let args = Args::parse_from(["fluentpad"]);
        assert!(args.file.is_none());
        assert!(args.commands.is_empty());
        assert!(!args.gutter);
    }

    #[test]
    fn test_args_with_commands() {
        let args = Args::parse_from(["fluentpad", "notes.txt", "-c", "undo", "-c", "find:x"]);
        assert_eq!(args.file, Some(PathBuf::from("notes.txt")));
        assert_eq!(args.commands, vec!["undo", "find:x"]);
    }

    #[test]
    fn test_run_edits_and_saves() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.txt");
        let output = dir.path().join("out.txt");
        let config = dir.path().join("config.toml");
        std::fs::write(&input, "alpha\nbeta\ngamma").unwrap();
        std::fs::write(&config, "").unwrap();

        let args = Args::parse_from([
            "fluentpad",
            input.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
            "-c",
            "find:beta",
            "-c",
            "insert:BETA",
            "-c",
            "redo",
            "--count",
            "a",
            "-o",
            output.to_str().unwrap(),
            "--gutter",
        ]);
        let report = run(&args).unwrap();

        assert_eq!(std::fs::read_to_string(&output).unwrap(), "alpha\nBETA\ngamma");
        assert!(report.contains("find:beta: match at Ln 2, Col 1"));
        assert!(report.contains("redo: Buffer error: Nothing to redo"));
        assert!(report.contains("5 matches for \"a\""));
        assert!(report.contains("2 > BETA"));
        assert!(report.ends_with("Ln 2, Col 5  16 characters  100%\n"));
    }

    #[test]
    fn test_run_rejects_unknown_intent() {
        let args = Args::parse_from(["fluentpad", "-c", "teleport"]);
        assert!(run(&args).is_err());
    }
}
