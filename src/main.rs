#![warn(clippy::pedantic)]

mod server;

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use log::{LevelFilter, info};

use mdtoc::toc::{render_lines, render_markdown};
use mdtoc::{Error, TocConfig, check, extract};

#[derive(Parser)]
#[command(name = "mdtoc")]
#[command(about = "Markdown heading extraction and table-of-contents builder", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Heading levels forming the top of the outline, comma separated (defaults to 2,3)
    #[arg(long, value_delimiter = ',', global = true)]
    levels: Option<Vec<u8>>,

    /// Enable debug logging
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the table of contents of a Markdown file
    Extract {
        /// Markdown file, `-` or nothing for stdin
        input: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Verify heading slugs against an independent Markdown parser
    Check {
        /// Markdown files, stdin when empty
        inputs: Vec<PathBuf>,
    },
    /// Serve the outline tools over MCP on stdio
    Serve,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Markdown,
    Lines,
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn read_input(input: Option<&Path>) -> mdtoc::Result<String> {
    match input {
        Some(path) if path != Path::new("-") => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn run_extract(input: Option<&Path>, format: Format, config: &TocConfig) -> mdtoc::Result<String> {
    let markdown = read_input(input)?;
    let toc = extract(&markdown, config);

    Ok(match format {
        Format::Json => serde_json::to_string_pretty(&toc)?,
        Format::Markdown => render_markdown(&toc.outline),
        Format::Lines => render_lines(&toc.headings),
    })
}

fn run_check(inputs: &[PathBuf], config: &TocConfig) -> mdtoc::Result<()> {
    let sources: Vec<Option<&Path>> = if inputs.is_empty() {
        vec![None]
    } else {
        inputs.iter().map(|p| Some(p.as_path())).collect()
    };

    let mut failures = 0;
    for source in sources {
        let name = source.map_or_else(|| "<stdin>".to_string(), |p| p.display().to_string());
        let report = check::verify(&read_input(source)?, config);

        if report.is_ok() {
            println!("{name}: {} headings ok", report.checked);
        } else {
            for mismatch in &report.mismatches {
                println!("{name}: {mismatch}");
            }
            failures += report.mismatches.len();
        }
    }

    if failures > 0 {
        return Err(Error::Regression { count: failures });
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match cli.levels {
        Some(levels) => TocConfig::new(levels)?,
        None => TocConfig::default(),
    };
    info!("top level h{}", config.top_level());

    match cli.command {
        Commands::Extract { input, format } => {
            println!("{}", run_extract(input.as_deref(), format, &config)?);
        }
        Commands::Check { inputs } => run_check(&inputs, &config)?,
        Commands::Serve => server::serve(config).await?,
    }

    Ok(())
}
