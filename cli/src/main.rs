//! docweave CLI - document structure recovery tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use docweave::{
    DocumentInput, JsonFormat, OutlineSource, Pipeline, PipelineOptions, Recipe, RenderOptions,
    RunStats,
};

#[derive(Parser)]
#[command(name = "docweave")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Recover structured documents from PDF layout-detection output", long_about = None)]
struct Cli {
    /// Input detection file (JSON)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Heading recipe file (JSON)
    #[arg(long, value_name = "FILE")]
    recipe: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a detection file and write all outputs (Markdown, JSON, segments)
    Convert {
        /// Input detection file (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Heading recipe file (JSON)
        #[arg(long, value_name = "FILE")]
        recipe: Option<PathBuf>,

        /// Segment character budget
        #[arg(long)]
        budget: Option<usize>,
    },

    /// Render a detection file as Markdown
    #[command(alias = "md")]
    Markdown {
        /// Input detection file (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Include YAML frontmatter
        #[arg(short, long)]
        frontmatter: bool,

        /// Maximum heading level (1-6)
        #[arg(long, default_value = "6")]
        max_heading: u8,

        /// Heading recipe file (JSON)
        #[arg(long, value_name = "FILE")]
        recipe: Option<PathBuf>,
    },

    /// Process a detection file and dump the document model as JSON
    Json {
        /// Input detection file (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Heading recipe file (JSON)
        #[arg(long, value_name = "FILE")]
        recipe: Option<PathBuf>,
    },

    /// Show the recovered outline
    Outline {
        /// Input detection file (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Heading recipe file (JSON)
        #[arg(long, value_name = "FILE")]
        recipe: Option<PathBuf>,
    },

    /// List segments, or write one Markdown file per segment
    Segments {
        /// Input detection file (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Write segment files into this directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Segment character budget
        #[arg(long)]
        budget: Option<usize>,

        /// Heading recipe file (JSON)
        #[arg(long, value_name = "FILE")]
        recipe: Option<PathBuf>,
    },

    /// Show document information
    Info {
        /// Input detection file (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Process every detection file in a directory
    Batch {
        /// Directory of detection files (*.json)
        #[arg(value_name = "DIR")]
        input: PathBuf,

        /// Output directory for Markdown files
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Process documents one at a time
        #[arg(long)]
        sequential: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert {
            input,
            output,
            recipe,
            budget,
        }) => cmd_convert(&input, output.as_deref(), recipe.as_deref(), budget),
        Some(Commands::Markdown {
            input,
            output,
            frontmatter,
            max_heading,
            recipe,
        }) => cmd_markdown(
            &input,
            output.as_deref(),
            frontmatter,
            max_heading,
            recipe.as_deref(),
        ),
        Some(Commands::Json {
            input,
            output,
            compact,
            recipe,
        }) => cmd_json(&input, output.as_deref(), compact, recipe.as_deref()),
        Some(Commands::Outline { input, recipe }) => cmd_outline(&input, recipe.as_deref()),
        Some(Commands::Segments {
            input,
            output,
            budget,
            recipe,
        }) => cmd_segments(&input, output.as_deref(), budget, recipe.as_deref()),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Batch {
            input,
            output,
            sequential,
        }) => cmd_batch(&input, output.as_deref(), sequential),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: convert if input is provided
            if let Some(input) = cli.input {
                cmd_convert(&input, cli.output.as_deref(), cli.recipe.as_deref(), None)
            } else {
                println!("{}", "Usage: docweave <FILE> [OUTPUT]".yellow());
                println!("       docweave --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Build a pipeline from the shared CLI flags.
fn build_pipeline(
    recipe: Option<&Path>,
    budget: Option<usize>,
) -> Result<Pipeline, Box<dyn std::error::Error>> {
    let mut options = PipelineOptions::new();
    if let Some(chars) = budget {
        options = options.with_segment_budget(chars);
    }
    let mut pipeline = Pipeline::with_options(options);
    if let Some(path) = recipe {
        let json = fs::read_to_string(path)?;
        pipeline = pipeline.with_recipe(Recipe::from_json(&json)?);
    }
    Ok(pipeline)
}

fn process_document(
    input: &Path,
    recipe: Option<&Path>,
    budget: Option<usize>,
) -> Result<docweave::Document, Box<dyn std::error::Error>> {
    let pipeline = build_pipeline(recipe, budget)?;
    let doc_input = DocumentInput::from_file(input)?;
    Ok(pipeline.process(&doc_input)?)
}

fn cmd_convert(
    input: &Path,
    output: Option<&Path>,
    recipe: Option<&Path>,
    budget: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = output.map(|p| p.to_path_buf()).unwrap_or_else(|| {
        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        PathBuf::from(format!("{}_output", stem))
    });

    fs::create_dir_all(&output_dir)?;

    let pb = ProgressBar::new(4);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    pb.set_message("Recovering structure...");
    let doc = process_document(input, recipe, budget)?;
    pb.inc(1);

    pb.set_message("Generating Markdown...");
    let render_options = RenderOptions::new().with_frontmatter(true);
    let markdown = docweave::render::to_markdown_with_options(&doc, &render_options);
    fs::write(output_dir.join("document.md"), &markdown)?;
    pb.inc(1);

    pb.set_message("Generating JSON...");
    let json = docweave::render::to_json(&doc, JsonFormat::Pretty)?;
    fs::write(output_dir.join("document.json"), &json)?;
    pb.inc(1);

    pb.set_message("Writing segments...");
    let segments_dir = output_dir.join("segments");
    fs::create_dir_all(&segments_dir)?;
    for (i, segment) in doc.segments.iter().enumerate() {
        let body = docweave::render::segment_markdown(&doc, segment);
        fs::write(segments_dir.join(format!("{:04}.md", i)), body)?;
    }
    pb.inc(1);

    pb.finish_with_message("Done!");

    println!("\n{}", "Output files:".green().bold());
    println!("  {} document.md", "├─".dimmed());
    println!("  {} document.json", "├─".dimmed());
    println!(
        "  {} segments/ ({} files)",
        "└─".dimmed(),
        doc.segments.len()
    );

    Ok(())
}

fn cmd_markdown(
    input: &Path,
    output: Option<&Path>,
    frontmatter: bool,
    max_heading: u8,
    recipe: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = process_document(input, recipe, None)?;

    let render_options = RenderOptions::new()
        .with_frontmatter(frontmatter)
        .with_max_heading(max_heading);
    let markdown = docweave::render::to_markdown_with_options(&doc, &render_options);

    if let Some(path) = output {
        fs::write(path, &markdown)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", markdown);
    }

    Ok(())
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    recipe: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = process_document(input, recipe, None)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = docweave::render::to_json(&doc, format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_outline(input: &Path, recipe: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let doc = process_document(input, recipe, None)?;

    if doc.outline.is_empty() {
        println!("{}", "No outline recovered".yellow());
        return Ok(());
    }

    let label = match doc.meta.outline_source {
        Some(OutlineSource::Native) => "native bookmarks",
        Some(OutlineSource::Inferred) => "inferred from layout",
        None => "unknown",
    };
    println!("{} ({})", "Outline".cyan().bold(), label);
    println!("{}", "─".repeat(40).dimmed());

    for entry in &doc.outline {
        let indent = "  ".repeat(entry.level.saturating_sub(1) as usize);
        let page = format!("p.{}", entry.page);
        if entry.appendix {
            println!(
                "{}{} {} {}",
                indent,
                entry.title,
                page.dimmed(),
                "[appendix]".yellow()
            );
        } else {
            println!("{}{} {}", indent, entry.title, page.dimmed());
        }
    }

    Ok(())
}

fn cmd_segments(
    input: &Path,
    output: Option<&Path>,
    budget: Option<usize>,
    recipe: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = process_document(input, recipe, budget)?;

    if let Some(dir) = output {
        fs::create_dir_all(dir)?;
        for (i, segment) in doc.segments.iter().enumerate() {
            let body = docweave::render::segment_markdown(&doc, segment);
            let filename = format!("{:04}.md", i);
            fs::write(dir.join(&filename), body)?;
            println!("{} {}", "Wrote".green(), filename);
        }
        println!(
            "\n{} {} segments written",
            "Done!".green().bold(),
            doc.segments.len()
        );
        return Ok(());
    }

    println!("{}", "Segments".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for (i, segment) in doc.segments.iter().enumerate() {
        let chars = doc.range_text(segment.start, segment.end).chars().count();
        let restored = if segment.restored.is_empty() {
            String::new()
        } else {
            format!("  (+{} restored)", segment.restored.len())
        };
        println!(
            "{:>4}  blocks {:>4}..{:<4}  {:>7} chars{}",
            i, segment.start, segment.end, chars, restored
        );
    }

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let doc = process_document(input, None, None)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    if let Some(ref source) = doc.meta.source {
        println!("{}: {}", "Source".bold(), source);
    }
    println!("{}: {}", "Pages".bold(), doc.page_count());
    let outline_label = match doc.meta.outline_source {
        Some(OutlineSource::Native) => "native",
        Some(OutlineSource::Inferred) => "inferred",
        None => "none",
    };
    println!("{}: {}", "Outline".bold(), outline_label);

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let stats = &doc.stats;
    println!("{}: {}", "Blocks".bold(), stats.blocks);
    println!("{}: {}", "Outline entries".bold(), stats.outline_entries);
    println!(
        "{}: {} aligned, {} unresolved",
        "Headings".bold(),
        stats.headings_aligned,
        stats.headings_unaligned
    );
    println!(
        "{}: {} ({} placeholder ids)",
        "Entities".bold(),
        stats.entities,
        stats.generated_ids
    );
    println!("{}: {}", "References".bold(), stats.reference_entries);
    println!(
        "{}: {} ({} entities restored)",
        "Segments".bold(),
        stats.segments,
        stats.restored_entities
    );

    let text = doc.plain_text();
    let words: usize = text.split_whitespace().count();
    println!("{}: {}", "Words".bold(), words);
    println!("{}: {}", "Characters".bold(), text.chars().count());

    Ok(())
}

fn cmd_batch(
    input: &Path,
    output: Option<&Path>,
    sequential: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut files: Vec<PathBuf> = fs::read_dir(input)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();

    if files.is_empty() {
        println!("{}", "No .json detection files found".yellow());
        return Ok(());
    }

    let output_dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&output_dir)?;

    let mut inputs = Vec::with_capacity(files.len());
    for path in &files {
        inputs.push(DocumentInput::from_file(path)?);
    }

    let options = PipelineOptions::new().with_parallel(!sequential);
    let pipeline = Pipeline::with_options(options);
    let results = pipeline.process_batch(&inputs);

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut totals = RunStats::default();
    let mut failed = 0usize;
    for (path, result) in files.iter().zip(results) {
        let stem = input_stem(path);
        pb.set_message(stem.clone());
        match result {
            Ok(doc) => {
                let markdown = docweave::render::to_markdown(&doc);
                fs::write(output_dir.join(format!("{}.md", stem)), markdown)?;
                totals.merge(&doc.stats);
            }
            Err(e) => {
                pb.println(format!(
                    "{} {}: {}",
                    "Failed".red().bold(),
                    path.display(),
                    e
                ));
                failed += 1;
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("Done!");

    println!(
        "\n{} {} documents, {} blocks, {} segments",
        "Processed".green().bold(),
        files.len() - failed,
        totals.blocks,
        totals.segments
    );
    if failed > 0 {
        println!("{} {} documents failed", "Warning:".yellow().bold(), failed);
    }

    Ok(())
}

fn input_stem(path: &Path) -> String {
    path.file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned()
}

fn cmd_version() {
    println!("{} {}", "docweave".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Document structure recovery tool");
    println!();
    println!(
        "Repository: {}",
        "https://github.com/iyulab/docweave".dimmed()
    );
    println!("License: MIT");
}
