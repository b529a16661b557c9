use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};

use datebench::{logging, BenchPlan, HarnessBuilder, PlanLoader, ReportWriter};

#[derive(Debug, Parser)]
#[command(author, version, about = "Date rollback micro-benchmark")]
struct Cli {
    /// Log level, overridden by RUST_LOG (defaults to the plan's level)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Measure every variant for every plan date
    Run {
        #[command(flatten)]
        plan: PlanArgs,

        /// Directory for the JSON report
        #[arg(long)]
        out: Option<PathBuf>,

        /// Print the report as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Check every variant against chrono for the plan dates
    Verify {
        #[command(flatten)]
        plan: PlanArgs,
    },
}

#[derive(Debug, Args)]
struct PlanArgs {
    /// Path to a plan YAML file (built-in plan when omitted)
    #[arg(long)]
    plan: Option<PathBuf>,

    /// Override the number of days to subtract
    #[arg(long)]
    days_before: Option<i32>,
}

impl PlanArgs {
    fn resolve(&self) -> Result<BenchPlan> {
        let mut plan = match &self.plan {
            Some(path) => PlanLoader::new(".").load(path)?,
            None => BenchPlan::default(),
        };
        if let Some(days_before) = self.days_before {
            plan.days_before = days_before;
        }
        plan.validate()?;
        Ok(plan)
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let plan = match &cli.command {
        Command::Run { plan, .. } | Command::Verify { plan } => plan.resolve()?,
    };
    let level = cli.log_level.as_deref().unwrap_or(&plan.logging.level);
    logging::init(level)?;

    match cli.command {
        Command::Run { out, json, .. } => {
            let mut harness = HarnessBuilder::for_plan(&plan).with_builtin_variants().build();
            info!(
                plan = %plan.name,
                dates = plan.dates.len(),
                variants = harness.variant_names().len(),
                "starting benchmark"
            );
            let report = harness.run_with_hook(&plan, |record| {
                info!(
                    variant = %record.variant,
                    date = %record.date,
                    avg_ns = record.avg_ns,
                    stddev_ns = record.stddev_ns,
                    "measured"
                );
            })?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{report}");
            }
            if let Some(dir) = out {
                ReportWriter::new(dir)?.write(&report)?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Verify { .. } => {
            let harness = HarnessBuilder::for_plan(&plan).with_builtin_variants().build();
            let mismatches = harness.verify(&plan)?;
            if mismatches.is_empty() {
                println!(
                    "All variants match chrono for {} dates at -{} days",
                    plan.dates.len(),
                    plan.days_before
                );
                return Ok(ExitCode::SUCCESS);
            }
            for mismatch in &mismatches {
                println!(
                    "{} {} -{}: expected {:?}, got {:?}",
                    mismatch.variant, mismatch.date, mismatch.days_before, mismatch.expected, mismatch.actual
                );
            }
            error!(count = mismatches.len(), "variants disagree with chrono");
            Ok(ExitCode::FAILURE)
        }
    }
}
