use std::io::IsTerminal as _;
use std::process::ExitCode;

use anyhow::Context as _;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use classy_errors::Renderer;
use classy_ide::{Analysis, FilePosition, Vocabulary};
use serde::Serialize;
use text_size::TextSize;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Utility-class strings: rules, diagnostics, completion and hover.
#[derive(Parser)]
#[command(version)]
enum Options {
    /// Print the rules of a file as JSON.
    Parse {
        /// File to read, `-` for stdin.
        path: Utf8PathBuf,
        /// Only rules at this byte offset.
        #[arg(long)]
        offset: Option<u32>,
        /// The single, possibly unterminated, rule being typed at `--offset`.
        #[arg(long, requires = "offset")]
        exact: bool,
    },
    /// Report unknown variants and utilities.
    Check {
        path: Utf8PathBuf,
        #[arg(long)]
        vocabulary: Option<Utf8PathBuf>,
    },
    /// Print completions at a byte offset as JSON.
    Complete {
        path: Utf8PathBuf,
        #[arg(long)]
        offset: u32,
        #[arg(long)]
        vocabulary: Option<Utf8PathBuf>,
    },
    /// Print hover information at a byte offset as JSON.
    Hover {
        path: Utf8PathBuf,
        #[arg(long)]
        offset: u32,
        #[arg(long)]
        vocabulary: Option<Utf8PathBuf>,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let filter = EnvFilter::try_from_env("CLASSY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    match Options::parse() {
        Options::Parse { path, offset, exact } => {
            let text = read(&path)?;
            match offset.map(TextSize::new) {
                Some(offset) if exact => print_json(&classy_parse::parse_exact(&text, offset))?,
                Some(offset) => print_json(&classy_parse::parse_at(&text, offset))?,
                None => print_json(&classy_parse::parse(&text))?,
            }
            Ok(ExitCode::SUCCESS)
        }
        Options::Check { path, vocabulary } => {
            let analysis = Analysis::new(vocabulary_at(vocabulary.as_deref())?);
            let file = analysis.add_file(path.clone(), read(&path)?);
            let diagnostics = analysis.diagnostics(file);

            let renderer =
                if std::io::stderr().is_terminal() { Renderer::styled() } else { Renderer::plain() };
            let text = file.text(analysis.db());

            for diagnostic in &diagnostics {
                eprintln!("{}", diagnostic.render(&renderer, path.as_str(), text));
            }

            Ok(if diagnostics.is_empty() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Options::Complete { path, offset, vocabulary } => {
            let analysis = Analysis::new(vocabulary_at(vocabulary.as_deref())?);
            let file = analysis.add_file(path.clone(), read(&path)?);
            print_json(&analysis.completions(FilePosition { file, offset: offset.into() }))?;
            Ok(ExitCode::SUCCESS)
        }
        Options::Hover { path, offset, vocabulary } => {
            let analysis = Analysis::new(vocabulary_at(vocabulary.as_deref())?);
            let file = analysis.add_file(path.clone(), read(&path)?);
            print_json(&analysis.hover(FilePosition { file, offset: offset.into() }))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn read(path: &Utf8Path) -> anyhow::Result<String> {
    if path.as_str() == "-" {
        return std::io::read_to_string(std::io::stdin()).context("failed to read stdin");
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read `{path}`"))
}

fn vocabulary_at(path: Option<&Utf8Path>) -> anyhow::Result<Vocabulary> {
    match path {
        Some(path) => Vocabulary::load(path),
        None => Ok(Vocabulary::builtin()),
    }
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{json}");
    Ok(())
}
