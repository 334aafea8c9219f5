mod parser;

use std::ffi::OsStr;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::warn;

use parser::markers::{classify_line, LineClass};

#[derive(Parser)]
#[command(name = "report_parser", about = "Structure loosely formatted HR report text into render-ready sections")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a development-plan text into a section tree (JSON)
    Plan {
        /// Input file, or - for stdin
        input: PathBuf,
        /// Pretty-print the JSON output
        #[arg(short, long)]
        pretty: bool,
    },
    /// Parse an interview-question text into tabular rows (JSON)
    Questions {
        /// Input file, or - for stdin
        input: PathBuf,
        /// Pretty-print the JSON output
        #[arg(short, long)]
        pretty: bool,
    },
    /// Dump the per-line marker classification (audits upstream heading coverage)
    Inspect {
        /// Input file, or - for stdin
        input: PathBuf,
    },
    /// Parse every .txt report in a directory, writing one JSON file per input
    Batch {
        /// Directory holding raw .txt report texts
        #[arg(short, long)]
        dir: PathBuf,
        /// Directory for the parsed JSON output
        #[arg(short, long)]
        out: PathBuf,
        /// Report layout to parse
        #[arg(short, long, value_enum, default_value = "plan")]
        kind: ReportKind,
        /// Max files to process (default: all)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportKind {
    Plan,
    Questions,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Plan { input, pretty } => {
            let text = read_input(&input)?;
            if text.trim().is_empty() {
                // "No data" placeholder, checked on the raw text before parsing
                println!("-");
                return Ok(());
            }
            print_json(&parser::parse_plan(&text), pretty)
        }
        Commands::Questions { input, pretty } => {
            let text = read_input(&input)?;
            if text.trim().is_empty() {
                println!("-");
                return Ok(());
            }
            print_json(&parser::parse_questions(&text), pretty)
        }
        Commands::Inspect { input } => {
            let text = read_input(&input)?;
            let lines = parser::lines::normalize(&text);
            if lines.is_empty() {
                println!("No classifiable lines.");
                return Ok(());
            }
            for line in &lines {
                match classify_line(line) {
                    LineClass::Marker { kind, label, locale, inline } => println!(
                        "{:<18} {:<4} {:<20} {}",
                        format!("{:?}", kind),
                        format!("{:?}", locale),
                        label,
                        inline.as_deref().unwrap_or("")
                    ),
                    LineClass::Labeled { label, value } => {
                        println!("{:<18} {:<4} {:<20} {}", "Labeled", "", label, value)
                    }
                    LineClass::Plain => println!("{:<18} {:<4} {:<20} {}", "Plain", "", "", line),
                }
            }
            Ok(())
        }
        Commands::Batch { dir, out, kind, limit } => run_batch(&dir, &out, kind, limit),
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }

    result
}

fn run_batch(dir: &Path, out: &Path, kind: ReportKind, limit: Option<usize>) -> Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("reading {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    files.sort();
    if let Some(n) = limit {
        files.truncate(n);
    }
    if files.is_empty() {
        println!("No .txt reports found in {}", dir.display());
        return Ok(());
    }
    fs::create_dir_all(out).with_context(|| format!("creating {}", out.display()))?;

    println!("Parsing {} reports...", files.len());
    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec})")?
            .progress_chars("=> "),
    );

    let results: Vec<(PathBuf, Result<FileCounts>)> = files
        .par_iter()
        .map(|path| {
            let res = parse_one(path, out, kind);
            pb.inc(1);
            (path.clone(), res)
        })
        .collect();
    pb.finish_and_clear();

    let mut counts = BatchCounts::default();
    for (path, res) in results {
        match res {
            Ok(file) => counts.add(&file),
            Err(e) => {
                warn!("Failed on {}: {}", path.display(), e);
                counts.errors += 1;
            }
        }
    }
    counts.print();
    Ok(())
}

#[derive(Default)]
struct FileCounts {
    sections: usize,
    items: usize,
    rows: usize,
    empty: bool,
}

#[derive(Default)]
struct BatchCounts {
    files: usize,
    sections: usize,
    items: usize,
    rows: usize,
    empty: usize,
    errors: usize,
}

impl BatchCounts {
    fn add(&mut self, file: &FileCounts) {
        self.files += 1;
        self.sections += file.sections;
        self.items += file.items;
        self.rows += file.rows;
        if file.empty {
            self.empty += 1;
        }
    }

    fn print(&self) {
        println!(
            "Saved {} reports ({} sections, {} items, {} rows); {} empty, {} failed.",
            self.files, self.sections, self.items, self.rows, self.empty, self.errors,
        );
    }
}

/// Parse a single report file and write its JSON next to the others.
/// Empty files produce no output; the renderer shows a placeholder for those.
fn parse_one(path: &Path, out_dir: &Path, kind: ReportKind) -> Result<FileCounts> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    if text.trim().is_empty() {
        return Ok(FileCounts { empty: true, ..FileCounts::default() });
    }

    let (json, counts) = match kind {
        ReportKind::Plan => {
            let sections = parser::parse_plan(&text);
            let items = sections.iter().map(|s| s.items.len()).sum();
            let counts = FileCounts { sections: sections.len(), items, ..FileCounts::default() };
            (serde_json::to_string_pretty(&sections)?, counts)
        }
        ReportKind::Questions => {
            let sections = parser::parse_questions(&text);
            let rows = sections.iter().map(|s| s.rows.len()).sum();
            let counts = FileCounts { sections: sections.len(), rows, ..FileCounts::default() };
            (serde_json::to_string_pretty(&sections)?, counts)
        }
    };

    let stem = path.file_stem().unwrap_or_else(|| OsStr::new("report"));
    let target = out_dir.join(stem).with_extension("json");
    fs::write(&target, json).with_context(|| format!("writing {}", target.display()))?;
    Ok(counts)
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading stdin")?;
        Ok(buf)
    } else {
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}
