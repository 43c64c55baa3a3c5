#[macro_use]
extern crate log;

use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, FixedOffset, NaiveDate, TimeDelta, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use dotenv::dotenv;
use sleepscore::{
    JsonFileSource, SampleDataSource, SleepDataSource, SleepScoreService, SnapshotStore,
    generate_sample_intervals,
};
use sleepscore_algos::{ScoringPolicy, WeeklySummary, helpers::format_hm::FormatHM};
use sleepscore_types::SummarySnapshot;

#[derive(Parser)]
pub struct SleepScoreCli {
    /// Time zone used for calendar-day bucketing, e.g. `+02:00`. Always
    /// explicit; the host zone is never consulted.
    #[arg(env, long, default_value = "+00:00")]
    pub timezone: FixedOffset,
    #[clap(subcommand)]
    pub subcommand: SleepScoreCommand,
}

#[derive(Subcommand)]
pub enum SleepScoreCommand {
    ///
    /// Run the pipeline over the last week and print per-day metrics
    ///
    WeeklyStats {
        #[clap(flatten)]
        source: SourceArgs,
    },
    ///
    /// Print the metrics of a single day
    ///
    DayStats {
        date: NaiveDate,
        #[clap(flatten)]
        source: SourceArgs,
    },
    ///
    /// Run the pipeline and persist the snapshot blob for the display surface
    ///
    RefreshSnapshot {
        #[arg(long, env)]
        snapshot_path: PathBuf,
        /// Recompute even if the stored snapshot is still fresh
        #[arg(long)]
        force: bool,
        #[clap(flatten)]
        source: SourceArgs,
    },
    ///
    /// Write a randomly generated interval export for trying things out
    ///
    GenerateSample {
        #[arg(long)]
        output: PathBuf,
        #[arg(long, default_value_t = 7)]
        days: u8,
    },
}

#[derive(clap::Args)]
pub struct SourceArgs {
    /// Path to a sleep-interval export (JSON array)
    #[arg(long, env)]
    pub input: Option<PathBuf>,
    /// Use randomly generated sample data instead of an export
    #[arg(long)]
    pub sample: bool,
    #[arg(long, value_enum, default_value_t)]
    pub policy: PolicyArg,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum PolicyArg {
    #[default]
    TwoFactor,
    ThreeFactor,
}

impl From<PolicyArg> for ScoringPolicy {
    fn from(value: PolicyArg) -> Self {
        match value {
            PolicyArg::TwoFactor => ScoringPolicy::TwoFactor,
            PolicyArg::ThreeFactor => ScoringPolicy::ThreeFactor,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(error) = dotenv() {
        println!("{}", error);
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = SleepScoreCli::parse();
    let zone = cli.timezone;
    let now = Utc::now();

    match cli.subcommand {
        SleepScoreCommand::WeeklyStats { source } => {
            let summary = run_pipeline(&source, &zone, now).await?;
            print_summary(&summary);
            Ok(())
        }
        SleepScoreCommand::DayStats { date, source } => {
            let summary = run_pipeline(&source, &zone, now).await?;
            match summary.day(date) {
                Some(metrics) => {
                    println!(
                        "{}: score {}, sleep {}, deep {}%, efficiency {}%",
                        metrics.day,
                        metrics.score,
                        metrics.total_sleep.format_hm(),
                        metrics.deep_sleep_pct,
                        metrics.sleep_efficiency
                    );
                }
                None => println!("No sleep data for {}", date),
            }
            Ok(())
        }
        SleepScoreCommand::RefreshSnapshot {
            snapshot_path,
            force,
            source,
        } => {
            let store = SnapshotStore::new(snapshot_path);

            if !force {
                if let Some(snapshot) = store.load()? {
                    if snapshot.is_fresh(now) {
                        info!("snapshot still fresh, skipping pipeline run");
                        print_snapshot(&snapshot);
                        return Ok(());
                    }
                }
            }

            match run_pipeline(&source, &zone, now).await {
                Ok(summary) => {
                    let snapshot = store.save(&summary, now)?;
                    print_snapshot(&snapshot);
                    Ok(())
                }
                Err(error) => {
                    // Prefer a stale-but-valid snapshot over an error screen
                    // as long as it is inside the freshness window.
                    if let Some(snapshot) = store.load()?.filter(|s| s.is_fresh(now)) {
                        warn!("refresh failed, reusing stored snapshot: {}", error);
                        print_snapshot(&snapshot);
                        return Ok(());
                    }
                    Err(error)
                }
            }
        }
        SleepScoreCommand::GenerateSample { output, days } => {
            let start = now - TimeDelta::days(i64::from(days));
            let intervals = generate_sample_intervals(start, now);

            let json = serde_json::to_vec_pretty(&intervals)?;
            std::fs::write(&output, json)
                .with_context(|| format!("failed to write {}", output.display()))?;

            info!("wrote {} intervals to {}", intervals.len(), output.display());
            Ok(())
        }
    }
}

async fn run_pipeline(
    source: &SourceArgs,
    zone: &FixedOffset,
    now: DateTime<Utc>,
) -> anyhow::Result<WeeklySummary> {
    let policy = source.policy.into();

    if source.sample {
        compute(SampleDataSource, policy, zone, now).await
    } else {
        let input = source
            .input
            .clone()
            .context("either --input or --sample is required")?;
        compute(JsonFileSource::new(input), policy, zone, now).await
    }
}

async fn compute<S: SleepDataSource>(
    source: S,
    policy: ScoringPolicy,
    zone: &FixedOffset,
    now: DateTime<Utc>,
) -> anyhow::Result<WeeklySummary> {
    let service = SleepScoreService::new(source, policy);
    Ok(service.compute_weekly_summary(zone, now).await?)
}

fn print_summary(summary: &WeeklySummary) {
    if summary.is_empty() {
        println!("No sleep data in the last week");
        return;
    }

    for metrics in summary.days() {
        let marker = if summary.selected_day() == Some(metrics) {
            "*"
        } else {
            " "
        };
        println!(
            "{} {}: score {:>3}, sleep {}, deep {}%, efficiency {}%",
            marker,
            metrics.day,
            metrics.score,
            metrics.total_sleep.format_hm(),
            metrics.deep_sleep_pct,
            metrics.sleep_efficiency
        );
    }

    println!("\nWeek: {}", summary.averages());
}

fn print_snapshot(snapshot: &SummarySnapshot) {
    for day in &snapshot.days {
        println!(
            "{}: score {:>3}, sleep {}",
            day.day,
            day.score,
            TimeDelta::seconds(day.duration_seconds).format_hm()
        );
    }
    println!("Last update: {}", snapshot.last_update);
}
