use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use merge_regions::{DiffAlgorithm, Markers, MergeState, Merger, Side};

#[derive(Parser)]
#[command(version, about = "Show the changes from ORIGINAL to CANDIDATE as conflict regions")]
struct Args {
    /// Path to ORIGINAL
    original_path: PathBuf,

    /// Path to CANDIDATE
    candidate_path: PathBuf,

    /// Matching algorithm
    #[clap(long, short, value_enum, default_value_t = Algorithm::Myers)]
    algorithm: Algorithm,

    /// Resolve every region, keeping this side
    #[clap(long, value_enum)]
    accept: Option<AcceptSide>,

    /// Print merged lines and regions as JSON
    #[clap(long)]
    json: bool,

    /// Prefix each line with its role in the merge
    #[clap(long, short)]
    gutter: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[clap(long, short)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Algorithm {
    Myers,
    Patience,
    SequenceMatcher,
}

impl From<Algorithm> for DiffAlgorithm {
    fn from(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Myers => DiffAlgorithm::Myers,
            Algorithm::Patience => DiffAlgorithm::Patience,
            Algorithm::SequenceMatcher => DiffAlgorithm::SequenceMatcher,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum AcceptSide {
    Old,
    New,
}

impl From<AcceptSide> for Side {
    fn from(side: AcceptSide) -> Self {
        match side {
            AcceptSide::Old => Side::Old,
            AcceptSide::New => Side::New,
        }
    }
}

/// Split into lines, each keeping its own terminator.
fn split_lines(text: &str) -> Vec<String> {
    text.split_inclusive('\n').map(str::to_string).collect()
}

/// Line ending used by `text`, for the marker lines.
fn line_ending(text: &str) -> &'static str {
    if text.contains("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

fn markers_with_ending(eol: &str) -> Markers {
    let markers = Markers::default();
    Markers::new(
        &format!("{}{}", markers.old, eol),
        &format!("{}{}", markers.separator, eol),
        &format!("{}{}", markers.new, eol),
    )
}

/// Concatenate the merged lines. A line without a terminator only stays
/// unterminated when it is the last one.
fn render(state: &MergeState, eol: &str, gutter: bool) -> String {
    let mut out = String::new();
    let roles = state.line_roles();
    let count = state.lines().len();
    for (i, (line, role)) in state.lines().iter().zip(roles).enumerate() {
        if gutter {
            out.push(role.gutter());
            out.push(' ');
        }
        out.push_str(line);
        if !line.ends_with('\n') && i + 1 < count {
            out.push_str(eol);
        }
    }
    out
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn run(args: &Args) -> Result<()> {
    let original = read_file(&args.original_path)?;
    let candidate = read_file(&args.candidate_path)?;
    let eol = line_ending(if original.is_empty() { &candidate } else { &original });

    let merger = Merger::new()
        .with_algorithm(args.algorithm.into())
        .with_markers(markers_with_ending(eol));
    let mut state = merger.merge(&split_lines(&original), &split_lines(&candidate))?;
    if let Some(side) = args.accept {
        state = state.resolve_all(side.into())?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        print!("{}", render(&state, eol, args.gutter));
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
