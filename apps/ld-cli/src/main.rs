use clap::{Args, Parser, Subcommand};
use ld_app::{
    AppError, AppResult, Dashboard, DashboardConfig, PeriodKind, ProposalRange, SimulationClient,
    config, parse_metric, series_to_csv,
};
use ld_core::StationId;
use ld_results::{MAX_RUN, RunStore, generate_runs};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ld-cli")]
#[command(about = "LineDash CLI - Production line simulation dashboard", long_about = None)]
struct Cli {
    /// Dashboard config YAML (service URL, stations, default period)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Simulation service base URL, overrides the config
    #[arg(long, global = true, conflicts_with = "results_dir")]
    url: Option<String>,
    /// Read runs from single_run_N.csv files instead of the service
    #[arg(long, global = true)]
    results_dir: Option<PathBuf>,
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Default)]
struct ViewArgs {
    /// Period kind: day, week, month or quarter
    #[arg(long)]
    period: Option<PeriodKind>,
    /// First run of the window (clamped to the calendar)
    #[arg(long)]
    start: Option<i64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Production and time averages for the selected window
    Summary {
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Per-station occupancy, wait time and downtime
    Stations {
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Rank stations by downtime and describe the main bottlenecks
    Bottleneck {
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Project the effect of lowering a station's failure rate
    Optimize {
        #[command(flatten)]
        view: ViewArgs,
        /// Station number (defaults to the worst bottleneck)
        #[arg(long)]
        station: Option<u32>,
        /// Proposed failure rate in whole percent
        #[arg(long)]
        rate: Option<u32>,
    },
    /// Export one metric across the window's runs as CSV
    ExportSeries {
        #[command(flatten)]
        view: ViewArgs,
        /// Metric name, e.g. "Production Time" or "Station 4 Downtime"
        metric: String,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Ask the service to run a new simulation batch, then show the summary
    RunSimulation,
    /// Write synthetic runs as single_run_N.csv files
    Generate {
        /// Output directory
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = MAX_RUN)]
        runs: u32,
        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => DashboardConfig::default(),
    };
    let ctx = Context {
        settings,
        url: cli.url,
        results_dir: cli.results_dir,
        json: cli.json,
    };

    match cli.command {
        Commands::Summary { view } => cmd_summary(&ctx, &view).await,
        Commands::Stations { view } => cmd_stations(&ctx, &view).await,
        Commands::Bottleneck { view } => cmd_bottleneck(&ctx, &view).await,
        Commands::Optimize {
            view,
            station,
            rate,
        } => cmd_optimize(&ctx, &view, station, rate).await,
        Commands::ExportSeries {
            view,
            metric,
            output,
        } => cmd_export_series(&ctx, &view, &metric, output.as_deref()).await,
        Commands::RunSimulation => cmd_run_simulation(&ctx).await,
        Commands::Generate { out, runs, seed } => cmd_generate(&out, runs, seed),
    }
}

struct Context {
    settings: DashboardConfig,
    url: Option<String>,
    results_dir: Option<PathBuf>,
    json: bool,
}

impl Context {
    fn client(&self) -> AppResult<SimulationClient> {
        let url = self.url.as_deref().unwrap_or(&self.settings.service_url);
        SimulationClient::new(url, self.settings.request_timeout())
    }

    /// Build a dashboard with runs loaded and the requested window applied.
    async fn dashboard(&self, view: &ViewArgs) -> AppResult<Dashboard> {
        let mut dash = Dashboard::from_config(&self.settings)?;

        match &self.results_dir {
            Some(dir) => {
                let count = dash.load_from_store(&RunStore::open(dir.clone()))?;
                info!(count, dir = %dir.display(), "loaded runs from results directory");
            }
            None => {
                dash.reload(&self.client()?).await;
            }
        }

        if let Some(kind) = view.period {
            dash.set_period_kind(kind)?;
        }
        if let Some(start) = view.start {
            dash.set_window_start(start);
        }
        Ok(dash)
    }

    fn print_json<T: Serialize>(&self, value: &T) -> AppResult<()> {
        let text = serde_json::to_string_pretty(value)
            .map_err(|e| AppError::InvalidInput(format!("Failed to encode JSON: {}", e)))?;
        println!("{}", text);
        Ok(())
    }
}

async fn cmd_summary(ctx: &Context, view: &ViewArgs) -> AppResult<()> {
    let dash = ctx.dashboard(view).await?;
    let agg = dash.aggregate();
    if ctx.json {
        return ctx.print_json(&agg);
    }

    println!("{} ({})", dash.period().describe(), dash.source());
    if agg.run_count == 0 {
        println!("No data available for this period");
        return Ok(());
    }
    println!("Runs in window: {}", agg.run_count);
    println!("Production:");
    println!("  Total production:   {:.2}", agg.production.total_production);
    println!("  Faulty products:    {:.2}", agg.production.faulty_products);
    println!(
        "  Faulty rate:        {:.2}%",
        agg.production.faulty_rate * 100.0
    );
    println!("Time:");
    println!("  Production time:    {:.2}", agg.time.production_time);
    println!("  Fixing time:        {:.2}", agg.time.fixing_time);
    println!(
        "  Supplier occupancy: {:.2}",
        agg.time.supplier_occupancy
    );
    Ok(())
}

async fn cmd_stations(ctx: &Context, view: &ViewArgs) -> AppResult<()> {
    let dash = ctx.dashboard(view).await?;
    let view = dash.view();
    if ctx.json {
        return ctx.print_json(&view);
    }

    println!("{} ({})", view.range_text, view.source);
    if !view.has_data() {
        println!("No data available for this period");
        return Ok(());
    }

    let occupancy_labels: Vec<&str> = match &view.occupancy_coloring {
        ld_app::OccupancyColoring::Uniform => vec!["-"; view.aggregate.stations.len()],
        ld_app::OccupancyColoring::Banded(bands) => bands.iter().map(|b| b.label()).collect(),
    };

    println!(
        "  {:<24} {:>10} {:>10} {:>10}  {:<10} {:<10}",
        "Station", "Occupancy", "Wait", "Downtime", "Occ.", "Downtime"
    );
    for ((station, occ_label), band) in view
        .aggregate
        .stations
        .iter()
        .zip(occupancy_labels)
        .zip(&view.downtime_bands)
    {
        let name = dash.catalog().name(station.station).unwrap_or_default();
        println!(
            "  {:<24} {:>9.1}% {:>10.2} {:>10.2}  {:<10} {:<10}",
            format!("{} ({})", station.station, name),
            station.occupancy_rate * 100.0,
            station.wait_time,
            station.downtime,
            occ_label,
            band.label()
        );
    }
    if view.occupancy.significant {
        println!(
            "Occupancy varies by {:.1} points across stations",
            view.occupancy.variation * 100.0
        );
    }
    Ok(())
}

async fn cmd_bottleneck(ctx: &Context, view: &ViewArgs) -> AppResult<()> {
    let dash = ctx.dashboard(view).await?;
    let view = dash.view();
    if ctx.json {
        return ctx.print_json(&serde_json::json!({
            "range": view.range_text,
            "flow": view.flow,
            "insight": view.insight,
        }));
    }

    println!("{} ({})", view.range_text, view.source);
    let Some(insight) = &view.insight else {
        println!("No data available for this period");
        return Ok(());
    };

    println!("Bottleneck flow (worst first):");
    for node in &view.flow {
        println!(
            "  {} ({}): downtime {:.1}, {:.0}% of total, {}",
            node.station,
            node.name,
            node.downtime,
            node.share * 100.0,
            node.criticality.label()
        );
    }
    println!("Identified issues:");
    for line in insight.statements() {
        println!("  {}", line);
    }
    Ok(())
}

async fn cmd_optimize(
    ctx: &Context,
    view: &ViewArgs,
    station: Option<u32>,
    rate: Option<u32>,
) -> AppResult<()> {
    let dash = ctx.dashboard(view).await?;

    let (station, range) = match station {
        Some(number) => {
            let id = StationId::new(number)?;
            let spec = dash.catalog().spec(id)?;
            (id, ProposalRange::for_rate(spec.failure_rate))
        }
        None => {
            let target = dash.optimization_target()?;
            (target.station, target.range)
        }
    };

    let pct = rate.unwrap_or(range.default_pct);
    if !range.contains(pct) {
        return Err(AppError::InvalidInput(format!(
            "Proposed rate {}% is outside {}% - {}%",
            pct, range.min_pct, range.max_pct
        )));
    }

    let result = dash.optimize(station, f64::from(pct) / 100.0)?;
    if ctx.json {
        return ctx.print_json(&result);
    }

    let c = &result.comparison;
    println!("{}", result.title());
    println!("  {}", dash.period().describe());
    println!(
        "  {:<18} {:>12} {:>12}",
        "", "Current", "Optimized"
    );
    println!(
        "  {:<18} {:>12.2} {:>12.2}",
        "Total production", c.current.total_production, c.optimized.total_production
    );
    println!(
        "  {:<18} {:>12.2} {:>12.2}",
        "Faulty products", c.current.faulty_products, c.optimized.faulty_products
    );
    println!(
        "  {:<18} {:>11.2}% {:>11.2}%",
        "Faulty rate",
        c.current.faulty_rate * 100.0,
        c.optimized.faulty_rate * 100.0
    );
    println!(
        "  Share of defects: {:.0}% → {:.0}%",
        result.contribution_before, result.contribution_after
    );
    Ok(())
}

async fn cmd_export_series(
    ctx: &Context,
    view: &ViewArgs,
    metric: &str,
    output: Option<&Path>,
) -> AppResult<()> {
    let metric = parse_metric(metric)?;
    let dash = ctx.dashboard(view).await?;
    let series = dash.series(metric);
    let csv = series_to_csv(&series);

    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!(
            "✓ Exported {} data points to {}",
            series.points.len(),
            path.display()
        );
    } else {
        print!("{}", csv);
    }

    Ok(())
}

async fn cmd_run_simulation(ctx: &Context) -> AppResult<()> {
    if ctx.results_dir.is_some() {
        return Err(AppError::InvalidInput(
            "run-simulation needs the simulation service, not --results-dir".to_string(),
        ));
    }

    let client = ctx.client()?;
    let mut dash = Dashboard::from_config(&ctx.settings)?;
    println!("Running simulation via {}", client.base_url());

    let outcome = dash.run_simulation_and_reload(&client).await?;
    if ctx.json {
        return ctx.print_json(&serde_json::json!({
            "completed_at": outcome.completed_at.to_rfc3339(),
            "output": outcome.output,
            "runs": dash.runs().len(),
            "source": dash.source().to_string(),
        }));
    }

    println!(
        "✓ Simulation completed at {}",
        outcome.completed_at.format("%Y-%m-%d %H:%M:%S")
    );
    if !outcome.output.trim().is_empty() {
        println!("{}", outcome.output.trim_end());
    }
    println!("✓ Loaded {} runs from {}", dash.runs().len(), dash.source());
    Ok(())
}

fn cmd_generate(out: &Path, runs: u32, seed: Option<u64>) -> AppResult<()> {
    let store = RunStore::new(out.to_path_buf())?;
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let generated = generate_runs(&mut rng, runs);
    for run in &generated {
        store.save_run(run)?;
    }

    println!(
        "✓ Wrote {} synthetic runs to {}",
        generated.len(),
        out.display()
    );
    Ok(())
}
