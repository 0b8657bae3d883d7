use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use energyboard::{
    aggregate::Extreme,
    config::{self, Config},
    process,
    views::{
        dashboard::{self, RemoteData},
        distribution, forecast, overview, recommendation, PREVIEW_ROWS,
    },
};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about = "Energy-usage dataset dashboard")]
struct Args {
    /// Directory holding the stored dataset
    #[arg(long, global = true, default_value = config::DEFAULT_STORE_DIR)]
    store_dir: PathBuf,

    /// Base URL of the forecasting/recommendation service
    #[arg(long, global = true, default_value = config::DEFAULT_ANALYTICS_URL)]
    analytics_url: String,

    #[arg(long, global = true, default_value_t = config::DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Print views as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a delimited text file and store it as the current dataset
    Upload { file: PathBuf },
    /// Totals, daily and monthly trends
    Overview,
    /// Per-appliance totals, one appliance by month, or all appliances stacked by month
    Distribution {
        #[arg(long, conflicts_with = "stacked")]
        appliance: Option<String>,
        #[arg(long)]
        stacked: bool,
    },
    /// Summary cards plus forecast and recommendation highlights
    Dashboard,
    /// Ask the service for a forecast
    Forecast {
        #[arg(long, default_value_t = dashboard::DEFAULT_FORECAST_DAYS,
              value_parser = clap::value_parser!(u32).range(1..))]
        days: u32,
    },
    /// Appliance recommendations from the service, grouped per appliance
    Recommendations,
    /// Forget the stored dataset
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();
    let cfg = Config::new(&args.store_dir, &args.analytics_url, args.timeout_secs)?;
    info!(store = %cfg.store_dir.display(), analytics = %cfg.analytics_url, "startup");
    let store = cfg.open_store()?;

    match args.command {
        Command::Upload { file } => {
            let raw = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            let grid = process::parse_text(&raw).with_context(|| {
                format!(
                    "{}: make sure it is CSV/TSV or whitespace-separated with a header row",
                    file.display()
                )
            })?;
            store.save(&grid)?;
            info!(records = grid.record_count(), "dataset uploaded");
            emit(args.json, &grid.preview(PREVIEW_ROWS), |rows| {
                for row in *rows {
                    println!("{}", row.join(" | "));
                }
                println!("Dataset uploaded: {} records.", grid.record_count());
            })?;
        }

        Command::Overview => {
            let ov = overview::build(&store.require()?)?;
            emit(args.json, &ov, |ov| {
                println!("Total Energy:       {:.2} kWh", ov.total_energy);
                println!("Average per Day:    {:.2} kWh/day", ov.average_per_day);
                println!("Total Records:      {}", ov.total_records);
                println!("Highest Month:      {}", extreme(&ov.highest_month));
                println!("Lowest Month:       {}", extreme(&ov.lowest_month));
                println!("\nDaily usage:");
                for p in &ov.daily {
                    println!("  {:<12} {:>10.2}", p.label, p.units);
                }
                println!("\nMonthly usage:");
                for p in &ov.monthly {
                    println!("  {:<12} {:>10.2}", p.label, p.units);
                }
            })?;
        }

        Command::Distribution { appliance, stacked } => {
            let grid = store.require()?;
            if let Some(label) = appliance {
                let monthly = distribution::appliance_by_month(&grid, &label)?;
                emit(args.json, &monthly, |m| {
                    println!("Month-wise usage - {}", m.appliance);
                    if m.points.is_empty() {
                        println!("  no monthly data found");
                    }
                    for p in &m.points {
                        println!("  {:<12} {:>10.2}", p.label, p.units);
                    }
                })?;
            } else if stacked {
                let s = distribution::stacked_by_month(&grid)?;
                emit(args.json, &s, |s| {
                    print!("{:<12}", "Month");
                    for series in &s.series {
                        print!(" {:>10}", series.appliance);
                    }
                    println!();
                    for (i, label) in s.labels.iter().enumerate() {
                        print!("{:<12}", label);
                        for series in &s.series {
                            print!(" {:>10.2}", series.values[i]);
                        }
                        println!();
                    }
                })?;
            } else {
                let totals = distribution::appliance_totals(&grid)?;
                emit(args.json, &totals, |totals| {
                    for t in totals {
                        println!("{:<16} {:>10.2}", t.label, t.total);
                    }
                })?;
            }
        }

        Command::Dashboard => {
            let grid = store.require()?;
            let client = cfg.analytics_client()?;
            let remote: RemoteData =
                dashboard::fetch_remote(&client, dashboard::DEFAULT_FORECAST_DAYS).await;
            let dash = dashboard::build(&grid, &remote)?;
            emit(args.json, &dash, |d| {
                println!("Total Energy Used:        {:.2} kWh", d.total_energy);
                println!("Average Energy per Month: {:.2} kWh", d.average_per_month);
                println!("Highest Consumption:      {}", extreme(&d.highest_month));
                println!("Lowest Consumption:       {}", extreme(&d.lowest_month));
                println!("Forecasted Days:          {}", d.forecast_days);
                println!("\nKey recommendations:");
                if d.recommendations.is_empty() {
                    println!("  none available");
                }
                for r in &d.recommendations {
                    println!("  {}: {}", r.appliance, r.recommendation);
                }
            })?;
        }

        Command::Forecast { days } => {
            let reply = cfg.analytics_client()?.forecast(days).await?;
            let view = forecast::merge(&reply);
            emit(args.json, &view, |v| {
                println!("{}", v.message);
                println!("{:<12} {:>10} {:>10}", "Date", "Actual", "Forecast");
                for p in &v.points {
                    println!(
                        "{:<12} {:>10} {:>10}",
                        p.date,
                        p.actual.map(|a| format!("{:.2}", a)).unwrap_or_default(),
                        p.forecast.map(|f| format!("{:.2}", f)).unwrap_or_default()
                    );
                }
                if let Some(mae) = v.metrics.mae {
                    println!("MAE: {}", mae);
                }
                if let Some(rmse) = v.metrics.rmse {
                    println!("RMSE: {}", rmse);
                }
                if let Some(mape) = v.metrics.mape_pct {
                    println!("MAPE (%): {}", mape);
                }
            })?;
        }

        Command::Recommendations => {
            let items = cfg.analytics_client()?.recommendations().await?;
            let insights = recommendation::combine(&items);
            emit(args.json, &insights, |insights| {
                for i in insights {
                    println!("{}", i.appliance);
                    if !i.usage_message.is_empty() {
                        println!("  usage:   {}", i.usage_message);
                    }
                    if !i.unit_message.is_empty() {
                        println!("  energy:  {}", i.unit_message);
                    }
                    println!("  insight: {}", i.insight);
                }
            })?;
        }

        Command::Clear => {
            store.clear()?;
            info!("dataset cleared");
        }
    }

    Ok(())
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce(&T)) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        text(value);
    }
    Ok(())
}

fn extreme(e: &Option<Extreme>) -> String {
    match e {
        Some(e) => format!(
            "{} ({:.2} kWh)",
            energyboard::process::date_parser::month_label(&e.key).unwrap_or_else(|| e.key.clone()),
            e.total
        ),
        None => "-".to_string(),
    }
}
