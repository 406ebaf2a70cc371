//! mbox2eml command line tool
//!
//! # Usage
//!
//! ```bash
//! # Split an archive into output/1.eml, output/2.eml, ...
//! mbox2eml convert --file 1.mbox --output-dir output
//!
//! # Show subject, sender, recipients, date and plain text body
//! mbox2eml read output/1.eml
//!
//! # Replace the To header
//! mbox2eml modify output/1.eml modified.eml --value user@example.com
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use mbox2eml::eml::{self, EmlSummary, LineEnding};
use mbox2eml::{Config, Converter};
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "mbox2eml", version)]
#[command(about = "Convert mbox archives to individual .eml files", long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an mbox file into numbered .eml files
    Convert {
        /// Path to the input mbox file, eg. 1.mbox
        #[arg(short, long)]
        file: PathBuf,
        /// Path to the output directory, eg. output
        #[arg(short, long, alias = "output_dir")]
        output_dir: PathBuf,
        /// Line terminators for the written files
        #[arg(long, value_enum)]
        line_ending: Option<LineEnding>,
    },
    /// Print the envelope and plain text body of an .eml file
    Read {
        /// Path to the .eml file
        eml_file: PathBuf,
    },
    /// Replace a header in an .eml file and write the result
    Modify {
        /// Input .eml file
        input: PathBuf,
        /// Output .eml file
        output: PathBuf,
        /// Header to replace
        #[arg(long, default_value = "To")]
        header: String,
        /// New header value
        #[arg(long, default_value = "user@example.com")]
        value: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }

    mbox2eml::logging::init(&config.logging)?;
    debug!("mbox2eml v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Convert {
            file,
            output_dir,
            line_ending,
        } => {
            if let Some(line_ending) = line_ending {
                config.convert.line_ending = line_ending;
            }

            let report = Converter::new(&config.convert)
                .convert(&file, &output_dir)
                .with_context(|| format!("Failed to convert {}", file.display()))?;

            info!(output = %output_dir.display(), "Done");
            println!(
                "Converted {} message(s), {} failed",
                report.converted, report.failed
            );
        }
        Commands::Read { eml_file } => {
            let summary = EmlSummary::from_file(&eml_file)
                .with_context(|| format!("Failed to read {}", eml_file.display()))?;
            println!("{summary}");
        }
        Commands::Modify {
            input,
            output,
            header,
            value,
        } => {
            eml::rewrite_file(&input, &output, &header, &value)
                .with_context(|| format!("Failed to modify {}", input.display()))?;
            println!("Modified content written to {}", output.display());
        }
    }

    Ok(())
}
