//! Command runners for the semaforo CLI
//!
//! Each command resolves the layered configuration, builds the sources and
//! runs the pipeline; `main` only owns the runtime and Ctrl-C handling.

use crate::cli::{Args, Command, SourceArgs};
use crate::config::PipelineConfig;
use crate::constants::{PRIMARY_TABLE_NAME, SECONDARY_TABLE_NAME};
use crate::export::write_csv;
use crate::models::{View, format_duration};
use crate::pipeline::Pipeline;
use crate::report::{render_detail, render_grid, render_overview, render_summary};
use crate::runner::PipelineRunner;
use crate::source::{CsvTableSource, TableSource};
use crate::timer::plan_timers;
use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Set up structured logging on stderr; `RUST_LOG` takes precedence over flags
pub fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("logistics_semaphore={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Defaults, config file, environment, then command-line flags
pub fn resolve_config(args: &Args) -> Result<PipelineConfig> {
    let mut config = PipelineConfig::load_layered(args.config.as_deref())
        .context("Failed to load configuration")?;
    args.apply_overrides(&mut config);
    config.validate().context("Invalid configuration")?;
    debug!("Resolved configuration: {:?}", config);
    Ok(config)
}

pub async fn run(args: Args, cancel: CancellationToken) -> Result<()> {
    setup_logging(&args)?;
    let config = resolve_config(&args)?;

    match &args.command {
        Command::Classify {
            sources,
            view,
            output,
            no_grid,
        } => {
            run_classify(
                &args,
                config,
                sources,
                *view,
                output.as_deref(),
                *no_grid,
            )
            .await
        }
        Command::Overview { sources } => run_overview(&args, config, sources).await,
        Command::Watch { sources, view, .. } => run_watch(config, sources, *view, cancel).await,
        Command::Timers { primary, now } => run_timers(config, primary, now.as_deref()),
    }
}

fn build_runner(config: PipelineConfig, sources: &SourceArgs) -> PipelineRunner {
    let primary: Arc<dyn TableSource> =
        Arc::new(CsvTableSource::new(PRIMARY_TABLE_NAME, &sources.primary));
    let secondary: Arc<dyn TableSource> =
        Arc::new(CsvTableSource::new(SECONDARY_TABLE_NAME, &sources.secondary));
    PipelineRunner::new(primary, secondary, Pipeline::new(config))
}

fn spinner(args: &Args, message: &'static str) -> Option<ProgressBar> {
    if !args.show_progress() {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

async fn run_classify(
    args: &Args,
    config: PipelineConfig,
    sources: &SourceArgs,
    view: View,
    output: Option<&std::path::Path>,
    no_grid: bool,
) -> Result<()> {
    let runner = build_runner(config, sources);

    let pb = spinner(args, "Classifying records...");
    let run = runner.run_once(view).await;
    if let Some(pb) = &pb {
        pb.finish_and_clear();
    }
    let run = run.with_context(|| format!("Classification of view '{view}' failed"))?;

    print!("{}", render_summary(&run.output));
    println!();
    if no_grid {
        print!("{}", render_detail(&run.output.records));
    } else {
        print!("{}", render_grid(&run.output.records));
    }
    info!("{}", run.output.stats.summary());

    if let Some(path) = output {
        write_csv(path, &run.output)
            .with_context(|| format!("Failed to export to {}", path.display()))?;
        println!(
            "\n{} {}",
            "Exported to".bright_green(),
            path.display().to_string().bright_white()
        );
    }
    Ok(())
}

async fn run_overview(args: &Args, config: PipelineConfig, sources: &SourceArgs) -> Result<()> {
    let runner = build_runner(config, sources);

    let pb = spinner(args, "Loading worksheets...");
    let loaded = runner.load_snapshots().await;
    if let Some(pb) = &pb {
        pb.finish_and_clear();
    }
    let (primary, secondary) = loaded.context("Failed to load worksheets")?;

    let overview = runner
        .pipeline()
        .overview(&primary, &secondary)
        .context("Overview failed")?;
    print!("{}", render_overview(&overview));
    Ok(())
}

async fn run_watch(
    config: PipelineConfig,
    sources: &SourceArgs,
    view: View,
    cancel: CancellationToken,
) -> Result<()> {
    let interval = Duration::from_secs(config.refresh_interval_secs);
    let runner = build_runner(config, sources);

    println!(
        "{} view '{}' every {}s (Ctrl-C to stop)",
        "Watching".bright_green().bold(),
        view.name().bright_white(),
        interval.as_secs()
    );

    let passes = runner
        .watch(view, interval, cancel, |result| match result {
            Ok(run) => {
                println!(
                    "\n{} pass {} at {}",
                    "▶".bright_cyan(),
                    run.generation,
                    run.finished_at.format("%H:%M:%S")
                );
                print!("{}", render_summary(&run.output));
                print!("{}", render_grid(&run.output.records));
            }
            Err(e) => eprintln!("{} {}", "Pass failed:".bright_red(), e),
        })
        .await;

    info!("Watch finished after {} passes", passes);
    Ok(())
}

fn run_timers(config: PipelineConfig, primary: &std::path::Path, now: Option<&str>) -> Result<()> {
    let now = match now {
        Some(raw) => parse_reference_time(raw)?,
        None => Local::now().naive_local(),
    };

    let table = CsvTableSource::new(PRIMARY_TABLE_NAME, primary)
        .load()
        .context("Failed to load the primary worksheet")?;
    let plans = plan_timers(&table, &config, now)?;

    println!("\n{}", "Stopwatches".bright_green().bold());
    for plan in plans.iter().filter(|p| !p.remision.is_empty()) {
        println!(
            "  {:<12} {:>10}  {}",
            plan.remision.bright_white(),
            plan.elapsed,
            plan.after
        );
        for (column, value) in &plan.writes {
            println!(
                "      {} {} = {}",
                "would write".bright_black(),
                column.bright_cyan(),
                value
            );
        }
    }

    let pending_writes: usize = plans.iter().map(|p| p.writes.len()).sum();
    println!(
        "\n{} {} field writes pending (not applied)",
        "Total:".bright_cyan(),
        pending_writes.to_string().bright_white().bold()
    );
    debug!(
        "Longest running: {}",
        plans
            .iter()
            .map(|p| p.after.elapsed(now))
            .max()
            .map(format_duration)
            .unwrap_or_default()
    );
    Ok(())
}

fn parse_reference_time(raw: &str) -> Result<NaiveDateTime> {
    crate::classify::parse_timestamp(raw)
        .with_context(|| format!("Invalid --now '{raw}', expected dd/mm/yyyy HH:MM:SS"))
}
