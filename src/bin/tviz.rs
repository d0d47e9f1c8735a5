use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use travel_viz::dodge::{self, DodgeOptions};
use travel_viz::format::format_count;
use travel_viz::viz::{self, Choropleth, SlopeChart, SlopeChartConfig};
use travel_viz::{Direction, YearMonth, stats, storage};

#[derive(Parser, Debug)]
#[command(
    name = "tviz",
    version,
    about = "Chart & summarize monthly passenger arrivals and departures"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a slope chart comparing two months.
    Slope(SlopeArgs),
    /// Per-country values and fill colors for one month (choropleth data).
    Map(MapArgs),
    /// Spread label positions apart (reads numbers, prints adjusted numbers).
    Dodge(DodgeArgs),
    /// List the months present in the dataset.
    Dates(DataArgs),
    /// Print per-country statistics.
    Stats(DataArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DirectionArg {
    Arrivals,
    Departures,
}

impl From<DirectionArg> for Direction {
    fn from(d: DirectionArg) -> Self {
        match d {
            DirectionArg::Arrivals => Direction::Arrivals,
            DirectionArg::Departures => Direction::Departures,
        }
    }
}

#[derive(Args, Debug)]
struct DataArgs {
    /// CSV with monthly arrivals (month,countries,value,country_code).
    #[arg(long)]
    arrivals: PathBuf,
    /// CSV with monthly departures (same columns).
    #[arg(long)]
    departures: PathBuf,
}

#[derive(Args, Debug)]
struct SlopeArgs {
    #[command(flatten)]
    data: DataArgs,
    #[arg(long, value_enum, default_value = "arrivals")]
    direction: DirectionArg,
    /// Left month (YYYY-MM).
    #[arg(long, default_value = "2009-08")]
    left: YearMonth,
    /// Right month (YYYY-MM).
    #[arg(long, default_value = "2019-08")]
    right: YearMonth,
    /// Output path (.svg, or .png together with --font).
    #[arg(long)]
    out: PathBuf,
    #[arg(long, default_value_t = 960)]
    width: u32,
    #[arg(long, default_value_t = 500)]
    height: u32,
    /// Minimum vertical gap between labels, in pixels.
    #[arg(long, default_value_t = 15.0)]
    separation: f64,
    #[arg(long, default_value_t = dodge::DEFAULT_MAX_ITERATIONS)]
    max_iterations: usize,
    #[arg(long, default_value_t = dodge::DEFAULT_MAX_ERROR)]
    max_error: f64,
    /// TrueType/OpenType font used for PNG output.
    #[arg(long)]
    font: Option<PathBuf>,
    /// Print a per-country summary of the comparison.
    #[arg(long, default_value_t = false)]
    summary: bool,
}

#[derive(Args, Debug)]
struct MapArgs {
    #[command(flatten)]
    data: DataArgs,
    #[arg(long, value_enum, default_value = "arrivals")]
    direction: DirectionArg,
    /// Month (YYYY-MM).
    #[arg(long, default_value = "2019-08")]
    date: YearMonth,
    /// Save entries to .csv or .json instead of printing them.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Write the color legend as SVG.
    #[arg(long)]
    legend: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct DodgeArgs {
    /// Minimum gap between adjacent positions.
    #[arg(long)]
    separation: f64,
    #[arg(long, default_value_t = dodge::DEFAULT_MAX_ITERATIONS)]
    max_iterations: usize,
    #[arg(long, default_value_t = dodge::DEFAULT_MAX_ERROR)]
    max_error: f64,
    /// Positions, in label order.
    #[arg(allow_negative_numbers = true)]
    positions: Vec<f64>,
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => format_count(x),
        _ => "NA".to_string(),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Slope(args) => cmd_slope(args),
        Command::Map(args) => cmd_map(args),
        Command::Dodge(args) => cmd_dodge(args),
        Command::Dates(args) => cmd_dates(args),
        Command::Stats(args) => cmd_stats(args),
    }
}

fn cmd_slope(args: SlopeArgs) -> Result<()> {
    let data = storage::load_dataset(&args.data.arrivals, &args.data.departures)?;
    if let Some(font) = args.font.as_ref() {
        viz::fonts::register_font_file(font)?;
    }
    let config = SlopeChartConfig {
        width: args.width,
        height: args.height,
        label_separation: args.separation,
        max_iterations: args.max_iterations,
        max_error: args.max_error,
        ..SlopeChartConfig::default()
    };
    let direction = args.direction.into();
    let chart = SlopeChart::build(&data, direction, args.left, args.right, &config)?;
    viz::plot_slope_chart(&chart, &args.out)?;
    eprintln!("Wrote slope chart to {}", args.out.display());

    if args.summary {
        for s in &chart.slopes {
            println!("{}\n", s.summary(direction, args.left, args.right));
        }
    }
    Ok(())
}

fn cmd_map(args: MapArgs) -> Result<()> {
    let data = storage::load_dataset(&args.data.arrivals, &args.data.departures)?;
    let direction = args.direction.into();
    let map = Choropleth::build(&data, direction, args.date)?;

    if let Some(path) = args.legend.as_ref() {
        std::fs::write(path, viz::choropleth_legend_svg(&map, 320)?)?;
        eprintln!("Wrote legend to {}", path.display());
    }

    match args.out.as_ref() {
        Some(path) => {
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("csv")
                .to_ascii_lowercase();
            match ext.as_str() {
                "csv" => map.save_csv(path)?,
                "json" => map.save_json(path)?,
                other => anyhow::bail!("unsupported format: {}", other),
            }
            eprintln!("Saved {} rows to {}", map.entries.len(), path.display());
        }
        None => {
            for e in &map.entries {
                println!(
                    "{}\t{}\t{}\t{}",
                    e.code,
                    e.name,
                    fmt_opt(e.value),
                    e.fill.as_deref().unwrap_or("none")
                );
            }
        }
    }
    Ok(())
}

fn cmd_dodge(args: DodgeArgs) -> Result<()> {
    let opts = DodgeOptions::new(args.separation)
        .max_iterations(args.max_iterations)
        .max_error(args.max_error);
    let report = dodge::dodge_report(&args.positions, &opts)?;
    if !report.converged {
        log::warn!(
            "no convergence after {} passes; spacing is best effort",
            report.iterations
        );
    }
    for v in report.positions {
        println!("{v}");
    }
    Ok(())
}

fn cmd_dates(args: DataArgs) -> Result<()> {
    let data = storage::load_dataset(&args.arrivals, &args.departures)?;
    for d in data.dates() {
        println!("{d}");
    }
    if let Some((lo, hi)) = data.year_range() {
        eprintln!("Years {lo}..={hi}");
    }
    Ok(())
}

fn cmd_stats(args: DataArgs) -> Result<()> {
    let data = storage::load_dataset(&args.arrivals, &args.departures)?;
    for s in stats::grouped_summary(&data.records) {
        println!(
            "{} • {} ({})  count={} missing={}  min={} max={} mean={} median={} peak={}",
            s.key.direction,
            s.name,
            s.key.code,
            s.count,
            s.missing,
            fmt_opt(s.min),
            fmt_opt(s.max),
            fmt_opt(s.mean),
            fmt_opt(s.median),
            s.peak.map(|p| p.to_string()).unwrap_or_else(|| "NA".into())
        );
    }
    Ok(())
}
