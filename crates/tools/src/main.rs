use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use compute::{BucketedDataset, ContainmentIndexer, Season};
use formats::{load_fire_records, load_regions};
use foundation::math::Equirectangular;
use foundation::time::Time;
use scene::viewport::ViewportSize;
use serde::Serialize;
use session::{Explorer, ExplorerConfig, Surface};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless wildfire hotspot explorer")]
struct Cli {
    /// Explorer settings as JSON; defaults apply to anything omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the filter pipeline once and print what would be on screen
    Summary(SummaryArgs),

    /// Record counts per brightness notch
    Buckets {
        /// Hotspot GeoJSON FeatureCollection
        #[arg(long)]
        fires: PathBuf,
    },

    /// Record counts per region after containment indexing
    Regions {
        #[arg(long)]
        fires: PathBuf,

        /// Region boundary GeoJSON FeatureCollection (NAME property)
        #[arg(long)]
        regions: PathBuf,
    },
}

#[derive(Args, Debug)]
struct SummaryArgs {
    #[arg(long)]
    fires: PathBuf,

    #[arg(long)]
    regions: PathBuf,

    /// Minimum brightness; snapped to the nearest notch
    #[arg(long)]
    threshold: Option<f64>,

    /// Season to include (repeatable); all seasons when omitted
    #[arg(long = "season")]
    seasons: Vec<Season>,

    /// Region name to select (repeatable)
    #[arg(long = "region")]
    selected: Vec<String>,

    /// Map width in pixels for the fit transform
    #[arg(long, default_value_t = 975.0)]
    width: f64,

    /// Map height in pixels for the fit transform
    #[arg(long, default_value_t = 610.0)]
    height: f64,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct SummaryReport {
    records: usize,
    visible: usize,
    threshold: f64,
    seasons: Vec<Season>,
    regions_subtitle: String,
    time_frame_subtitle: String,
    monthly_averages: Vec<(u32, Option<f64>)>,
    fit: Option<FitReport>,
}

#[derive(Serialize)]
struct FitReport {
    scale: f64,
    translate_x: f64,
    translate_y: f64,
    svg_transform: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Summary(args) => cmd_summary(config, args),
        Command::Buckets { fires } => cmd_buckets(&config, &fires),
        Command::Regions { fires, regions } => cmd_regions(&config, &fires, &regions),
    }
}

fn load_config(path: Option<&Path>) -> Result<ExplorerConfig, String> {
    match path {
        Some(p) => ExplorerConfig::load(p).map_err(|e| e.to_string()),
        None => Ok(ExplorerConfig::default()),
    }
}

fn cmd_summary(mut config: ExplorerConfig, args: SummaryArgs) -> Result<(), String> {
    let records = load_fire_records(&args.fires).map_err(|e| e.to_string())?;
    let regions = load_regions(&args.regions).map_err(|e| e.to_string())?;
    let total = records.len();
    if !args.seasons.is_empty() {
        config.initial_seasons = args.seasons.clone();
    }

    let map = ViewportSize::new(args.width, args.height);
    let mut explorer = Explorer::new(
        records,
        regions,
        config,
        Box::new(Equirectangular::conus(args.width, args.height)),
        Surface {
            map,
            ..Surface::default()
        },
        Time(0.0),
    )
    .map_err(|e| e.to_string())?;
    explorer.finish_loading();

    if let Some(t) = args.threshold {
        explorer.on_brightness_change(t);
    }
    for name in &args.selected {
        if explorer.regions().id_of(name).is_none() {
            return Err(format!("unknown region: {name}"));
        }
        explorer.on_region_click(name);
    }
    let fit = explorer.fit_to_selection().map(|c| FitReport {
        scale: c.transform.scale,
        translate_x: c.transform.translate_x,
        translate_y: c.transform.translate_y,
        svg_transform: c.transform.svg_transform(),
    });

    let subtitles = explorer.subtitles();
    let report = SummaryReport {
        records: total,
        visible: explorer.visible().len(),
        threshold: explorer.filter().brightness_threshold,
        seasons: explorer.filter().selected_seasons.iter().collect(),
        regions_subtitle: subtitles.regions,
        time_frame_subtitle: subtitles.time_frame,
        monthly_averages: explorer
            .monthly_averages()
            .iter()
            .map(|(m, v)| (m.number(), v))
            .collect(),
        fit,
    };

    if args.json {
        let text = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
        println!("{text}");
        return Ok(());
    }

    println!("records:    {}", report.records);
    println!("visible:    {}", report.visible);
    println!("threshold:  {}", report.threshold);
    println!("{}", report.regions_subtitle);
    println!("{}", report.time_frame_subtitle);
    println!("monthly average brightness:");
    for (month, avg) in &report.monthly_averages {
        match avg {
            Some(v) => println!("  {month:>2}  {v:.2}"),
            None => println!("  {month:>2}  -"),
        }
    }
    if let Some(fit) = &report.fit {
        println!(
            "fit: scale {:.4} translate ({:.1}, {:.1})",
            fit.scale, fit.translate_x, fit.translate_y
        );
    }
    Ok(())
}

fn cmd_buckets(config: &ExplorerConfig, fires: &Path) -> Result<(), String> {
    let notches = config.notch_set().map_err(|e| e.to_string())?;
    let records = load_fire_records(fires).map_err(|e| e.to_string())?;
    let buckets = BucketedDataset::build(&records, notches);
    println!("records: {}", records.len());
    for (notch, count) in buckets.counts() {
        println!("  >= {notch:>5}  {count}");
    }
    Ok(())
}

fn cmd_regions(config: &ExplorerConfig, fires: &Path, regions: &Path) -> Result<(), String> {
    let mut records = load_fire_records(fires).map_err(|e| e.to_string())?;
    let table = load_regions(regions).map_err(|e| e.to_string())?;
    let summary = ContainmentIndexer::new(&table, config.bbox_padding_deg).run(&mut records);
    info!(exact_tests = summary.exact_tests, "indexing finished");

    let mut counts = vec![0usize; table.len()];
    for r in &records {
        for id in r.containing_regions() {
            if let Some(c) = counts.get_mut(id.index() as usize) {
                *c += 1;
            }
        }
    }
    let mut rows: Vec<(&str, usize)> = table
        .iter()
        .map(|region| (region.name.as_str(), counts[region.id.index() as usize]))
        .collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    for (name, count) in rows {
        println!("{count:>8}  {name}");
    }
    println!("{:>8}  Unknown", summary.unknown);
    Ok(())
}
