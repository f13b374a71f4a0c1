//! pdf-outline CLI - PDF title and outline inference tool

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdf_outline::analysis::{DEFAULT_MAX_HEADINGS, DEFAULT_MAX_PAGES, DEFAULT_TIME_BUDGET};
use pdf_outline::detect::detect_pdf_file;
use pdf_outline::lang::detect_document_language;
use pdf_outline::render::{to_json, write_json};
use pdf_outline::{
    BatchItem, Extractor, JsonFormat, OutlineExtractor, OutlineOptions, ProcessingResult,
    ScriptDetector, StatisticalDetector,
};

#[derive(Parser)]
#[command(name = "pdf-outline")]
#[command(version)]
#[command(about = "Infer the title and heading outline of PDF documents", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output JSON file (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    #[command(flatten)]
    outline: OutlineArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Options shared by every command that produces outlines.
#[derive(Args, Clone)]
struct OutlineArgs {
    /// Emit a nested heading tree instead of a flat list
    #[arg(long, global = true, env = "PDF_OUTLINE_NESTED")]
    nested: bool,

    /// Output compact JSON
    #[arg(long, global = true, env = "PDF_OUTLINE_COMPACT")]
    compact: bool,

    /// Maximum number of pages to read per document
    #[arg(long, global = true, env = "PDF_OUTLINE_MAX_PAGES", default_value_t = DEFAULT_MAX_PAGES)]
    max_pages: u32,

    /// Maximum number of headings per document
    #[arg(
        long,
        global = true,
        env = "PDF_OUTLINE_MAX_HEADINGS",
        default_value_t = DEFAULT_MAX_HEADINGS
    )]
    max_headings: usize,

    /// Force a language tag (e.g. "en", "ja") instead of detecting it
    #[arg(long, global = true, env = "PDF_OUTLINE_LANGUAGE")]
    language: Option<String>,

    /// Ignore the title stored in the document metadata
    #[arg(long, global = true, env = "PDF_OUTLINE_NO_METADATA_TITLE")]
    no_metadata_title: bool,

    /// Process batch documents one at a time
    #[arg(long, global = true, env = "PDF_OUTLINE_SEQUENTIAL")]
    sequential: bool,

    /// Detect languages statistically, falling back to script ranges
    #[arg(long, global = true, env = "PDF_OUTLINE_STATISTICAL_LANGUAGE")]
    statistical_language: bool,
}

impl OutlineArgs {
    fn options(&self) -> OutlineOptions {
        let mut options = OutlineOptions::new()
            .with_hierarchy(self.nested)
            .with_max_pages(self.max_pages)
            .with_max_headings(self.max_headings)
            .with_metadata_title(!self.no_metadata_title)
            .with_parallel(!self.sequential);
        if let Some(language) = &self.language {
            options = options.with_language(language.clone());
        }
        options
    }

    fn extractor(&self) -> pdf_outline::Result<OutlineExtractor> {
        let extractor = OutlineExtractor::with_options(self.options())?;
        Ok(if self.statistical_language {
            extractor.with_detector(StatisticalDetector::new())
        } else {
            extractor
        })
    }

    fn format(&self) -> JsonFormat {
        if self.compact {
            JsonFormat::Compact
        } else {
            JsonFormat::Pretty
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Outline every PDF in a directory, one JSON file per document
    Batch {
        /// Directory containing PDF files
        #[arg(value_name = "INPUT_DIR")]
        input_dir: PathBuf,

        /// Directory for the JSON results
        #[arg(value_name = "OUTPUT_DIR")]
        output_dir: PathBuf,
    },

    /// Show what extraction finds in a document
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print the information as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Batch {
            input_dir,
            output_dir,
        }) => cmd_batch(&input_dir, &output_dir, &cli.outline),
        Some(Commands::Info { input, json }) => cmd_info(&input, json, &cli.outline),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            if let Some(input) = cli.input {
                cmd_outline(&input, cli.output.as_deref(), &cli.outline)
            } else {
                println!("{}", "Usage: pdf-outline <FILE> [-o OUTPUT]".yellow());
                println!("       pdf-outline batch <INPUT_DIR> <OUTPUT_DIR>");
                println!("       pdf-outline --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_outline(input: &Path, output: Option<&Path>, args: &OutlineArgs) -> CliResult<()> {
    if !input.exists() {
        return Err(format!("input file '{}' does not exist", input.display()).into());
    }
    if !has_pdf_extension(input) {
        return Err(format!("input file '{}' is not a PDF file", input.display()).into());
    }

    let extractor = args.extractor()?;
    let started = Instant::now();
    let result = extractor.process_file(input);
    let elapsed = started.elapsed();

    match output {
        Some(path) => {
            write_json(&result, path, args.format())?;
            println!("{} {}", "Saved to".green(), path.display());
            print_summary(&result, elapsed);
        }
        None => println!("{}", to_json(&result, args.format())?),
    }

    Ok(())
}

fn cmd_batch(input_dir: &Path, output_dir: &Path, args: &OutlineArgs) -> CliResult<()> {
    if !input_dir.is_dir() {
        return Err(format!("input directory '{}' not found", input_dir.display()).into());
    }

    let files = pdf_files(input_dir)?;
    if files.is_empty() {
        println!("{}", "No PDF files found in input directory".yellow());
        return Ok(());
    }
    fs::create_dir_all(output_dir)?;

    println!(
        "{} {} PDF file(s) to process",
        "Found".cyan().bold(),
        files.len()
    );

    let extractor = args.extractor()?;
    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let started = Instant::now();
    let items = extractor.process_batch_with(&files, |item| {
        pb.set_message(file_name(&item.path));
        pb.inc(1);
    });
    pb.finish_and_clear();

    let mut failed = 0;
    for item in &items {
        let output_file = output_dir.join(format!("{}.json", file_stem(&item.path)));
        write_json(&item.result, &output_file, args.format())?;
        if !item.is_ok() {
            failed += 1;
        }
        report_item(item, &output_file);
    }

    println!();
    println!("{}", "Processing complete!".green().bold());
    println!("  {} Total files processed: {}", "├─".dimmed(), items.len());
    if failed > 0 {
        println!("  {} Degraded: {}", "├─".dimmed(), failed.to_string().red());
    }
    println!(
        "  {} Total execution time: {:.2}s",
        "├─".dimmed(),
        started.elapsed().as_secs_f64()
    );
    println!("  {} Output directory: {}", "└─".dimmed(), output_dir.display());

    Ok(())
}

fn cmd_info(input: &Path, json: bool, args: &OutlineArgs) -> CliResult<()> {
    let header = detect_pdf_file(input)?;
    let doc = Extractor::probe().extract_file(input, args.max_pages)?;
    let language = match &args.language {
        Some(language) => language.clone(),
        None if args.statistical_language => {
            detect_document_language(&doc.fragments, &StatisticalDetector::new())
        }
        None => detect_document_language(&doc.fragments, &ScriptDetector),
    };

    if json {
        let info = serde_json::json!({
            "file": input.display().to_string(),
            "version": header.version,
            "pages": doc.page_count,
            "truncated": doc.truncated,
            "fragments": doc.fragments.len(),
            "metadata_title": doc.metadata_title,
            "language": language,
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Format".bold(), header);
    println!("{}: {}", "Pages".bold(), doc.page_count);
    if doc.truncated {
        println!(
            "{}: first {} pages read",
            "Truncated".bold().yellow(),
            args.max_pages
        );
    }
    println!("{}: {}", "Text lines".bold(), doc.fragments.len());
    println!("{}: {}", "Language".bold(), language);
    if let Some(ref title) = doc.metadata_title {
        println!("{}: {}", "Metadata title".bold(), title);
    }

    Ok(())
}

fn cmd_version() {
    println!(
        "{} {}",
        "pdf-outline".cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("PDF title and heading outline inference tool");
    println!();
    println!("License: MIT");
}

fn print_summary(result: &ProcessingResult, elapsed: Duration) {
    println!("{}: {}", "Title".bold(), result.title);
    println!("{}: {}", "Language".bold(), result.language);
    println!("{}: {}", "Headings".bold(), result.heading_count());
    println!("{}", timing_line(elapsed));
}

fn report_item(item: &BatchItem, output_file: &Path) {
    let name = file_name(&item.path);
    match &item.error {
        None => println!("{} {}", "✓".green(), name),
        Some(e) => println!("{} {}: {}", "✗".red(), name, e),
    }
    println!("  {} Title: {}", "├─".dimmed(), item.result.title);
    println!("  {} Headings: {}", "├─".dimmed(), item.result.heading_count());
    println!("  {} {}", "├─".dimmed(), timing_line(item.elapsed));
    println!("  {} Output: {}", "└─".dimmed(), file_name(output_file));
}

fn timing_line(elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    if elapsed > DEFAULT_TIME_BUDGET {
        format!(
            "Processing time: {:.2}s {}",
            secs,
            format!("(over the {}s limit)", DEFAULT_TIME_BUDGET.as_secs()).yellow()
        )
    } else {
        format!("Processing time: {:.2}s", secs)
    }
}

/// PDF files directly inside `dir`, sorted by name.
fn pdf_files(dir: &Path) -> CliResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_pdf_extension(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned()
}
