use clap::{Args, Parser, Subcommand};
use sbfl::config::{SbflConfig, CONFIG_FILENAME};
use sbfl::coverage::{load_coverage, load_failed_tests};
use sbfl::localization::{compute_suspiciousness, CoverageMatrix, FailedTests};
use sbfl::report::{LocalizationReport, ReportFormat};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sbfl")]
#[command(version, about = "Spectrum-based fault localization using the Ochiai formula", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    /// Configuration file
    #[arg(long, global = true, default_value = CONFIG_FILENAME)]
    config: PathBuf,
}

/// Coverage and test outcome inputs shared by every command.
#[derive(Args, Debug)]
struct InputArgs {
    /// Coverage XML file (one <test> element per test)
    #[arg(long)]
    coverage: PathBuf,

    /// File listing failed tests, one per line
    #[arg(long)]
    failed: Option<PathBuf>,

    /// Failed test identifier (repeatable)
    #[arg(long = "failed-test")]
    failed_tests: Vec<String>,
}

impl InputArgs {
    fn load(&self) -> anyhow::Result<(CoverageMatrix, FailedTests)> {
        let matrix = load_coverage(&self.coverage)?;
        let mut failed = match &self.failed {
            Some(path) => load_failed_tests(path)?,
            None => FailedTests::new(),
        };
        failed.extend(self.failed_tests.iter().cloned());
        Ok((matrix, failed))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Score and rank one line (e.g. the known buggy line)
    Rank {
        #[command(flatten)]
        input: InputArgs,

        /// Line identifier to locate
        #[arg(long)]
        line: String,

        /// Output format
        #[arg(long, value_enum)]
        format: Option<ReportFormat>,
    },

    /// List the most suspicious lines
    Top {
        #[command(flatten)]
        input: InputArgs,

        /// Number of lines to list
        #[arg(long)]
        top_n: Option<usize>,

        /// Output format
        #[arg(long, value_enum)]
        format: Option<ReportFormat>,
    },
}

fn cmd_rank(
    input: &InputArgs,
    line: &str,
    format: ReportFormat,
) -> anyhow::Result<()> {
    let (matrix, failed) = input.load()?;
    let scores = compute_suspiciousness(&matrix, &failed)?;
    let report = LocalizationReport::new(&matrix, &failed, &scores).with_target(&scores, line)?;
    print!("{}", report.render(format)?);
    Ok(())
}

fn cmd_top(input: &InputArgs, top_n: usize, format: ReportFormat) -> anyhow::Result<()> {
    let (matrix, failed) = input.load()?;
    let scores = compute_suspiciousness(&matrix, &failed)?;
    let report = LocalizationReport::new(&matrix, &failed, &scores).with_top(&scores, top_n);
    print!("{}", report.render(format)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter_layer = if cli.debug {
        tracing_subscriber::EnvFilter::new("debug")
    } else if cli.verbose {
        tracing_subscriber::EnvFilter::new("info")
    } else {
        tracing_subscriber::EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("sbfl v{}", env!("CARGO_PKG_VERSION"));

    let config = SbflConfig::load_or_default(&cli.config)?;
    debug!("Using configuration {:?}", config);

    match cli.command {
        Commands::Rank {
            input,
            line,
            format,
        } => {
            info!("Ranking {} using {:?}", line, input.coverage);
            cmd_rank(&input, &line, format.unwrap_or(config.report.format))?;
        }
        Commands::Top {
            input,
            top_n,
            format,
        } => {
            let top_n = top_n.unwrap_or(config.report.top_n);
            info!("Listing top {} lines using {:?}", top_n, input.coverage);
            cmd_top(&input, top_n, format.unwrap_or(config.report.format))?;
        }
    }

    Ok(())
}
