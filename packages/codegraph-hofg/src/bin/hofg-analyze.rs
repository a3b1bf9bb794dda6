//! HOFG Analysis CLI
//!
//! # Usage
//!
//! ```bash
//! # Text report of a JSON-serialized IR module
//! hofg-analyze leak.json
//!
//! # Custom allocator wrapper, JSON report written to a file
//! hofg-analyze leak.json --wrapper xmalloc --format json --output report.json
//!
//! # Graphviz view of the compacted flow graph
//! hofg-analyze leak.json --format dot | dot -Tsvg > hofg.svg
//! ```
//!
//! Exit status is 0 whenever the analysis completed, whatever it found, and
//! 2 when the input or the configuration could not be read or validated.

use clap::Parser;
use codegraph_hofg::config::{HofgConfig, Preset};
use codegraph_hofg::errors::{HofgError, Result};
use codegraph_hofg::features::heap_flow::{HeapFlowAnalysisService, HeapFlowAnalyzerPort};
use codegraph_hofg::features::ir_loading::{IrProvider, JsonIrProvider};
use codegraph_hofg::report::ReportFormat;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hofg-analyze")]
#[command(about = "Heap leak and dangling-pointer detection over a Heap Object Flow Graph", long_about = None)]
struct Cli {
    /// JSON-serialized IR module
    input: PathBuf,

    /// YAML configuration file (version 1 schema)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Preset: fast, balanced, thorough, custom
    #[arg(short, long)]
    preset: Option<String>,

    /// Report format: text, json, dot
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Additional allocator function (repeatable)
    #[arg(long = "allocator")]
    allocators: Vec<String>,

    /// Additional deallocator function (repeatable)
    #[arg(long = "deallocator")]
    deallocators: Vec<String>,

    /// Allocator wrapper symbol (repeatable)
    #[arg(long = "wrapper")]
    wrappers: Vec<String>,

    /// Fixpoint round cap
    #[arg(long)]
    max_rounds: Option<usize>,

    /// Path enumeration cutoff
    #[arg(long)]
    max_paths: Option<usize>,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> Result<HofgConfig> {
        let mut config = match (&self.config, &self.preset) {
            (Some(path), _) => HofgConfig::from_yaml(path)?,
            (None, Some(name)) => HofgConfig::from_preset(Preset::from_str(name)?),
            (None, None) => HofgConfig::default(),
        };

        for name in &self.allocators {
            config = config.add_allocator(name.as_str());
        }
        for name in &self.deallocators {
            config = config.add_deallocator(name.as_str());
        }
        for name in &self.wrappers {
            config = config.add_allocator_wrapper(name.as_str());
        }
        if let Some(v) = self.max_rounds {
            config = config.max_rounds(v);
        }
        if let Some(v) = self.max_paths {
            config = config.max_paths(v);
        }

        config.validate()?;
        Ok(config)
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli, format: ReportFormat) -> Result<String> {
    let config = cli.config()?;

    let module = JsonIrProvider::from_path(&cli.input).load()?;
    let result = HeapFlowAnalysisService::new(config).analyze(&module)?;

    format.render(&result)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let format = match ReportFormat::from_str(&cli.format) {
        Ok(format) => format,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            return ExitCode::from(2);
        }
    };

    let report = match run(&cli, format) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            return match e {
                HofgError::Report(_) => ExitCode::FAILURE,
                _ => ExitCode::from(2),
            };
        }
    };

    match &cli.output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, report) {
                eprintln!("❌ Failed to write {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
            tracing::info!("Report written to {}", path.display());
        }
        None => print!("{}", report),
    }

    ExitCode::SUCCESS
}
