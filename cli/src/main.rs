//! undocx CLI - DOCX content extraction tool

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;

use undocx::{
    detect_format_from_bytes, extract, render, ExtractOptions, JsonFormat, RenderOptions, Source,
    Stage, StageOutcome, DEFAULT_MAX_IMAGE_SIZE,
};

#[derive(Parser)]
#[command(name = "undocx")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract DOCX content to JSON, text, and Markdown", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stream elements as JSON lines (or a JSON array)
    Elements {
        /// Input DOCX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Write one pretty-printed JSON array instead of JSON lines
        #[arg(long)]
        pretty: bool,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Convert DOCX to plain text
    Text {
        /// Input DOCX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Convert DOCX to Markdown
    #[command(alias = "md")]
    Markdown {
        /// Input DOCX file
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

        /// Prefix for image links
        #[arg(long, default_value = "")]
        image_prefix: String,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Write embedded images to a directory
    Images {
        /// Input DOCX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Largest image to write, in bytes
        #[arg(long, default_value_t = DEFAULT_MAX_IMAGE_SIZE)]
        max_image_size: usize,

        /// Read images in parallel
        #[arg(long)]
        parallel: bool,
    },

    /// Show document information
    Info {
        /// Input DOCX file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

/// Flags shared by the extracting subcommands.
#[derive(Args, Debug, Clone)]
struct ExtractArgs {
    /// Include page headers
    #[arg(long)]
    headers: bool,

    /// Include page footers
    #[arg(long)]
    footers: bool,

    /// Skip images
    #[arg(long)]
    no_images: bool,

    /// Skip tables
    #[arg(long)]
    no_tables: bool,

    /// Skip document metadata
    #[arg(long)]
    no_metadata: bool,

    /// Keep whitespace as written
    #[arg(long)]
    raw_whitespace: bool,

    /// Drop formatting information
    #[arg(long)]
    no_formatting: bool,

    /// Largest image to include, in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_IMAGE_SIZE, env = "UNDOCX_MAX_IMAGE_SIZE")]
    max_image_size: usize,

    /// Read images in parallel
    #[arg(long)]
    parallel: bool,
}

impl From<&ExtractArgs> for ExtractOptions {
    fn from(args: &ExtractArgs) -> Self {
        ExtractOptions::new()
            .with_headers(args.headers)
            .with_footers(args.footers)
            .with_images(!args.no_images)
            .with_tables(!args.no_tables)
            .with_metadata(!args.no_metadata)
            .with_normalize_whitespace(!args.raw_whitespace)
            .with_formatting(!args.no_formatting)
            .with_max_image_size(args.max_image_size)
            .with_parallel(args.parallel)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Elements {
            input,
            output,
            pretty,
            extract,
        } => cmd_elements(&input, output.as_deref(), pretty, &extract),
        Commands::Text {
            input,
            output,
            extract,
        } => cmd_text(&input, output.as_deref(), &extract),
        Commands::Markdown {
            input,
            output,
            frontmatter,
            max_heading,
            image_prefix,
            extract,
        } => cmd_markdown(
            &input,
            output.as_deref(),
            frontmatter,
            max_heading,
            &image_prefix,
            &extract,
        ),
        Commands::Images {
            input,
            output,
            max_image_size,
            parallel,
        } => cmd_images(&input, output.as_deref(), max_image_size, parallel),
        Commands::Info { input } => cmd_info(&input),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn read_input(input: &Path) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    Ok(Source::path(input).into_bytes()?)
}

fn write_output(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_elements(
    input: &Path,
    output: Option<&Path>,
    pretty: bool,
    args: &ExtractArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let stream = extract(read_input(input)?, args.into())?;

    if pretty {
        let elements = stream.collect::<undocx::Result<Vec<_>>>()?;
        let json = render::to_json(&elements, JsonFormat::Pretty)?;
        return write_output(output, &json);
    }

    let count = match output {
        Some(path) => {
            let mut writer = BufWriter::new(fs::File::create(path)?);
            let count = render::write_json_lines(stream, &mut writer)?;
            println!("{} {} elements to {}", "Wrote".green(), count, path.display());
            count
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            render::write_json_lines(stream, &mut writer)?
        }
    };
    log::debug!("Streamed {} elements", count);

    Ok(())
}

fn cmd_text(
    input: &Path,
    output: Option<&Path>,
    args: &ExtractArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let stream = extract(read_input(input)?, args.into())?;
    let text = undocx::extract_text(stream)?;
    write_output(output, &text)
}

fn cmd_markdown(
    input: &Path,
    output: Option<&Path>,
    frontmatter: bool,
    max_heading: u8,
    image_prefix: &str,
    args: &ExtractArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut options: ExtractOptions = args.into();
    if frontmatter {
        options = options.with_metadata(true);
    }
    let elements = undocx::collect_all(extract(read_input(input)?, options)?)?;

    let render_options = RenderOptions::new()
        .with_frontmatter(frontmatter)
        .with_max_heading(max_heading)
        .with_image_prefix(image_prefix)
        .with_page_furniture(args.headers || args.footers);

    let markdown = render::to_markdown(&elements, &render_options)?;
    write_output(output, &markdown)
}

fn cmd_images(
    input: &Path,
    output: Option<&Path>,
    max_image_size: usize,
    parallel: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = ExtractOptions::new()
        .text_only()
        .with_images(true)
        .with_max_image_size(max_image_size)
        .with_parallel(parallel);
    let images = undocx::extract_images(extract(read_input(input)?, options)?)?;

    let output_dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&output_dir)?;

    for image in &images {
        let path = output_dir.join(&image.filename);
        fs::write(&path, &image.data)?;
        println!(
            "  {} {} ({}, {} bytes)",
            "├─".dimmed(),
            image.filename,
            image.mime_type,
            image.size
        );
    }

    println!(
        "{} {} images to {}",
        "Extracted".green().bold(),
        images.len(),
        output_dir.display()
    );

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let data = read_input(input)?;
    let format = detect_format_from_bytes(&data)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Format".bold(), format);
    println!("{}: {}", "Headers".bold(), format.header_count);
    println!("{}: {}", "Footers".bold(), format.footer_count);
    println!("{}: {}", "Media".bold(), format.media_count);

    let options = ExtractOptions::new().everything();
    let (elements, report) = extract(data, options)?.collect_with_report()?;

    if let Some(metadata) = elements.iter().find_map(|e| e.as_metadata()) {
        if let Some(ref title) = metadata.title {
            println!("{}: {}", "Title".bold(), title);
        }
        if let Some(ref author) = metadata.author {
            println!("{}: {}", "Author".bold(), author);
        }
        if let Some(ref created) = metadata.created {
            println!("{}: {}", "Created".bold(), created);
        }
        if let Some(ref modified) = metadata.modified {
            println!("{}: {}", "Modified".bold(), modified);
        }
    }

    println!();
    println!("{}", "Stages".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for stage in Stage::ALL {
        let Some(stage_report) = report.stage(stage) else {
            continue;
        };
        let status = match &stage_report.outcome {
            StageOutcome::Complete => "complete".green(),
            StageOutcome::Degraded { .. } => "degraded".yellow(),
            StageOutcome::Skipped => "skipped".dimmed(),
        };
        println!(
            "{}: {} ({} elements)",
            stage.to_string().bold(),
            status,
            stage_report.elements
        );
        if let StageOutcome::Degraded { warnings } = &stage_report.outcome {
            for warning in warnings {
                println!("  {} {}", "└─".dimmed(), warning);
            }
        }
    }

    let text = render::to_text(&elements);
    println!();
    println!("{}: {}", "Words".bold(), text.split_whitespace().count());
    println!("{}: {}", "Characters".bold(), text.chars().count());

    Ok(())
}
