use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};

use coach_rankings::fit::analyze_fit;
use coach_rankings::report::{output_report, publish, OutputFormat};
use coach_rankings::*;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum InputArg {
    Csv,
    Json,
}

impl From<InputArg> for InputFormat {
    fn from(arg: InputArg) -> Self {
        match arg {
            InputArg::Csv => InputFormat::Csv,
            InputArg::Json => InputFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputArg {
    /// `const finalData = [...];`, ready to be dropped into a web page
    Js,
    Json,
}

impl From<OutputArg> for OutputFormat {
    fn from(arg: OutputArg) -> Self {
        match arg {
            OutputArg::Js => OutputFormat::Js,
            OutputArg::Json => OutputFormat::Json,
        }
    }
}

/// Rebuilds the per-season coach rankings from the league's data exports
#[derive(Parser)]
#[command(name = "coach_rankings", version)]
struct Args {
    /// Directory holding naf_game, naf_tournament, naf_tournamentcoach and CoachExport
    #[arg(short, long, value_name = "DIR", default_value = "data")]
    data_dir: PathBuf,

    #[arg(long, value_enum, default_value_t = InputArg::Csv)]
    input_format: InputArg,

    #[arg(short, long, value_name = "FILE", default_value = "exports/finalData.js")]
    output: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputArg::Js)]
    output_format: OutputArg,

    /// JSON file overriding the model defaults
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Abort when a rated match has no K-factor instead of skipping it
    #[arg(long)]
    strict: bool,

    /// Recalculate even if the output file already exists
    #[arg(short, long)]
    force: bool,

    /// Print the top N coaches of every season
    #[arg(long, value_name = "N")]
    report: Option<usize>,

    /// Print how well pre-match expectations matched the results
    #[arg(long)]
    fit: bool,

    #[arg(short, long, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level)?;

    if args.output.exists() && !args.force {
        info!("{} already exists, pass --force to recalculate", args.output.display());
        return Ok(());
    }

    let mut ranking_context = match &args.config {
        Some(path) => RankingContext::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RankingContext::default(),
    };
    if args.strict {
        ranking_context.abort_on_missing_k_factor = true;
    }

    let records = load_data(&args.data_dir, args.input_format.into())
        .with_context(|| format!("loading exports from {}", args.data_dir.display()))?;

    let outcome = gen_rankings(&records, &ranking_context)?;
    if outcome.report.skipped_missing_k_factor > 0 {
        warn!(
            skipped = outcome.report.skipped_missing_k_factor,
            "matches left unrated for lack of a K-factor"
        );
    }

    if let Some(top) = args.report {
        output_report(&outcome.rankings, top);
    }
    if args.fit {
        analyze_fit(&outcome.games, true);
    }

    publish(&outcome.rankings, &args.output, args.output_format.into())?;

    Ok(())
}
