//! Pulseboard CLI
//!
//! Terminal front end for the analytics dashboard:
//! - Render the dashboard (cards, timeline, single day, distribution)
//! - Show service status, hall of fame and missed words
//! - Generate a default config file

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use pulseboard::config::{generate_default_config, Config};
use pulseboard::remote::DailyReportEntry;
use pulseboard::view::format::{format_axis_date, format_number, platform_count_label};
use pulseboard::view::{
    hall_of_fame, missed_words_page, service_statuses, DashboardInputs, DashboardView,
    DashboardViewModel, DaySelection, ReportCharts, ReportPanel, Selections, SummaryPanel,
    TimeRangeSelection,
};
use pulseboard::{logging, DashboardQueries, QueryCache, QuerySnapshot, RemoteClient};

const BAR_WIDTH: usize = 40;

#[derive(Parser)]
#[command(name = "pulseboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Usage analytics dashboard for the app and notebot platforms")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the analytics backend base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the analytics dashboard
    Dashboard {
        /// Timeline range (7days, 30days, all)
        #[arg(short, long, default_value = "7days")]
        range: TimeRangeSelection,
        /// Single-day view (today, yesterday)
        #[arg(short, long, default_value = "today")]
        day: DaySelection,
        /// Refetch and redraw every N seconds
        #[arg(short, long)]
        watch: Option<u64>,
    },

    /// Show analytics and notebot status
    Status,

    /// Show the game hall of fame
    Scores,

    /// Show missed words
    MissedWords,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Cli {
        command,
        config,
        base_url,
        format,
    } = Cli::parse();

    match command {
        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("writing config to {}", path.display()))?;
                    println!("Wrote default config to {}", path.display());
                }
                None => print!("{}", content),
            }
        }

        Commands::Dashboard { range, day, watch } => {
            let queries = connect(config.as_deref(), base_url.as_deref())?;
            run_dashboard(&queries, Selections { range, day }, watch, format).await?;
        }

        Commands::Status => {
            let queries = connect(config.as_deref(), base_url.as_deref())?;
            let query = queries.platform_status()?;
            let _ = query.fetch().await;
            let snapshot = query.snapshot();

            let statuses = service_statuses(snapshot.data());
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&statuses)?),
                OutputFormat::Table => {
                    println!("Platform Status");
                    println!("  Analytics: {}", statuses.analytics.indicator());
                    println!("  Notebot:   {}", statuses.notebot.indicator());
                }
            }
        }

        Commands::Scores => {
            let queries = connect(config.as_deref(), base_url.as_deref())?;
            let query = queries.game_scores()?;
            let _ = query.fetch().await;
            let snapshot = query.snapshot();
            if report_failure(&snapshot, "game scores") {
                return Ok(());
            }

            let rows = hall_of_fame(snapshot.data());
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
                OutputFormat::Table => {
                    println!("Hall of Fame");
                    if rows.is_empty() {
                        println!("  No scores yet");
                    }
                    for row in rows {
                        println!(
                            "  {:>3}. {:<20} {:>10}  {}",
                            row.rank, row.user_name, row.score, row.date
                        );
                    }
                }
            }
        }

        Commands::MissedWords => {
            let queries = connect(config.as_deref(), base_url.as_deref())?;
            let query = queries.missed_words()?;
            let _ = query.fetch().await;
            let snapshot = query.snapshot();
            if report_failure(&snapshot, "missed words") {
                return Ok(());
            }

            let page = missed_words_page(snapshot.data());
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&page)?),
                OutputFormat::Table => {
                    println!("Missed Words ({})", page.summary);
                    for word in page.words {
                        println!("  - {}", word);
                    }
                }
            }
        }
    }

    Ok(())
}

/// Load config, start logging, and build the shared query handles
fn connect(config_path: Option<&Path>, base_url: Option<&str>) -> anyhow::Result<DashboardQueries> {
    let mut config = match config_path {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::load_default(),
    };
    if let Some(url) = base_url {
        config.endpoints.base_url = url.to_string();
    }

    logging::init(&config.logging).map_err(|e| anyhow::anyhow!(e))?;

    let client = RemoteClient::new(config.endpoints.clone(), &config.http)?;
    Ok(DashboardQueries::new(client, Arc::new(QueryCache::new())))
}

/// Fetch the dashboard resources, render them, and optionally keep refreshing
async fn run_dashboard(
    queries: &DashboardQueries,
    selections: Selections,
    watch: Option<u64>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let report = queries.daily_report()?;
    let summary = queries.daily_summary()?;
    let status = queries.platform_status()?;
    let view_model = DashboardViewModel::new();

    let _ = tokio::join!(report.fetch(), summary.fetch(), status.fetch());

    loop {
        let view = view_model.derive_now(
            DashboardInputs {
                report: &report.snapshot(),
                summary: &summary.snapshot(),
                status: &status.snapshot(),
            },
            selections,
        );

        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
            OutputFormat::Table => print_dashboard(&view),
        }

        let Some(interval) = watch else {
            return Ok(());
        };

        tokio::select! {
            _ = tokio::time::sleep(Duration::from_secs(interval)) => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, stopping dashboard refresh");
                return Ok(());
            }
        }

        tracing::info!("Refreshing dashboard");
        let _ = tokio::join!(report.refetch(), summary.refetch(), status.refetch());
    }
}

/// Print the error line for a failed secondary resource; true if it failed
fn report_failure<T>(snapshot: &QuerySnapshot<T>, what: &str) -> bool {
    match &snapshot.error {
        Some(err) if snapshot.data.is_none() => {
            eprintln!("Error loading {}: {}", what, err);
            true
        }
        _ => false,
    }
}

fn print_dashboard(view: &DashboardView) {
    let (summary, report) = match view {
        DashboardView::Error { message } => {
            println!("! {}", message);
            return;
        }
        DashboardView::Ready { summary, report } => (summary, report),
    };

    println!("Analytics Dashboard");
    println!();

    match summary {
        SummaryPanel::Loading => println!("  (loading summary...)"),
        SummaryPanel::Ready {
            status,
            cards,
            refreshing,
        } => {
            if *refreshing {
                println!("  (refreshing...)");
            }
            println!(
                "Platform Status   Analytics: {}   Notebot: {}",
                status.analytics.indicator(),
                status.notebot.indicator()
            );
            println!(
                "Peak Activity     Highest: {}   Lowest: {}",
                or_dash(&cards.highest_date),
                or_dash(&cards.lowest_date)
            );
            println!(
                "Platform Peaks    App: {}   Bot: {}",
                cards.highest_app_count, cards.highest_bot_count
            );
            println!(
                "Platform Usage    App: {}   Bot: {}",
                cards.total_app_count, cards.total_bot_count
            );
        }
    }
    println!();

    match report {
        ReportPanel::Loading => println!("  (loading report...)"),
        ReportPanel::Ready(charts) => print_charts(charts),
    }
}

fn print_charts(charts: &ReportCharts) {
    if charts.refreshing {
        println!("  (refreshing...)");
    }
    println!("Timeline ({})", charts.range.label());
    print_bars(&charts.timeline, charts.show_bar_labels);
    println!();

    println!("{}", capitalize(charts.day.as_str()));
    if charts.day_entries.is_empty() {
        println!("  No data available for {}", charts.day);
    } else {
        for entry in &charts.day_entries {
            println!("  {}", platform_count_label(entry));
        }
    }
    println!();

    println!("Distribution");
    for slice in &charts.distribution {
        println!("  {}", slice.label());
    }
}

fn print_bars(entries: &[DailyReportEntry], labels: bool) {
    if entries.is_empty() {
        println!("  No interactions in range");
        return;
    }

    let max = entries.iter().map(|e| e.count).max().unwrap_or(0).max(1);
    for entry in entries {
        let width = (entry.count as f64 / max as f64 * BAR_WIDTH as f64).round() as usize;
        let bar = "#".repeat(width);
        if labels {
            println!(
                "  {:>9} {:<3} {:<w$} {}",
                format_axis_date(&entry.date),
                entry.platform,
                bar,
                format_number(entry.count),
                w = BAR_WIDTH
            );
        } else {
            println!(
                "  {:>9} {:<3} {}",
                format_axis_date(&entry.date),
                entry.platform,
                bar
            );
        }
    }
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_config_command_parses_without_connecting() {
        let cli = Cli::try_parse_from(["pulseboard", "config", "--output", "out.toml"]).unwrap();
        match cli.command {
            Commands::Config { output } => assert_eq!(output, Some(PathBuf::from("out.toml"))),
            _ => panic!("expected config command"),
        }
    }

    #[test]
    fn test_dashboard_defaults() {
        let cli = Cli::try_parse_from(["pulseboard", "dashboard", "--base-url", "http://x"]).unwrap();
        assert_eq!(cli.base_url.as_deref(), Some("http://x"));
        assert_eq!(cli.format, OutputFormat::Table);
        match cli.command {
            Commands::Dashboard { range, day, watch } => {
                assert_eq!(range, TimeRangeSelection::Last7Days);
                assert_eq!(day, DaySelection::Today);
                assert_eq!(watch, None);
            }
            _ => panic!("expected dashboard command"),
        }
        assert!(Cli::try_parse_from(["pulseboard", "dashboard", "--range", "90days"]).is_err());
    }
}
