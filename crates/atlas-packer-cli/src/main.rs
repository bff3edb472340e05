use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use atlas_packer_core::{InputRect, PackStats, PackerConfig, pack_rects_with_progress};
use clap::{ArgAction, Parser, Subcommand};
use serde::Deserialize;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "atlas-packer",
    about = "Pack named rectangles into sprite atlas pages",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Show a progress bar (disable with --progress false or --quiet)
    #[arg(long, default_value_t = true, action = ArgAction::Set, global = true, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack a JSON manifest of named sizes into atlas pages
    Pack(PackArgs),
    /// Simple timing bench (packs seeded random rects, prints time + occupancy)
    Bench(BenchArgs),
}

#[derive(Parser, Debug, Clone)]
struct PackArgs {
    // Input/Output
    /// Input manifest: JSON array of {"key", "w", "h", "allow_rotation"?}
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Output directory
    #[arg(short, long, default_value = "out", help_heading = "Input/Output")]
    out_dir: PathBuf,
    /// Atlas base name (pages are written to name.json)
    #[arg(short, long, default_value = "atlas", help_heading = "Input/Output")]
    name: String,
    /// YAML config file path (overrides layout options)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,

    // Layout
    /// Min page width
    #[arg(long, default_value_t = 16, help_heading = "Layout")]
    min_width: u32,
    /// Min page height
    #[arg(long, default_value_t = 16, help_heading = "Layout")]
    min_height: u32,
    /// Max page width
    #[arg(long, default_value_t = 1024, help_heading = "Layout")]
    max_width: u32,
    /// Max page height
    #[arg(long, default_value_t = 1024, help_heading = "Layout")]
    max_height: u32,
    /// Horizontal padding between frames
    #[arg(long, default_value_t = 2, help_heading = "Layout")]
    padding_x: u32,
    /// Vertical padding between frames
    #[arg(long, default_value_t = 2, help_heading = "Layout")]
    padding_y: u32,
    /// Reserve padding along page borders
    #[arg(long, default_value_t = true, action = ArgAction::Set, help_heading = "Layout")]
    edge_padding: bool,
    /// Page edges get half padding (pixels duplicated into the gap downstream)
    #[arg(long, default_value_t = false, help_heading = "Layout")]
    duplicate_padding: bool,
    /// Allow rotation (90deg)
    #[arg(long, default_value_t = false, help_heading = "Layout")]
    allow_rotation: bool,
    /// Force square pages
    #[arg(long, default_value_t = false, help_heading = "Layout")]
    square: bool,
    /// Page dims forced to powers of two
    #[arg(long, default_value_t = true, action = ArgAction::Set, help_heading = "Layout")]
    pot: bool,
    /// Page dims forced to multiples of four
    #[arg(long, default_value_t = false, help_heading = "Layout")]
    multiple_of_four: bool,
    /// Greedy single-pass packing (faster, usually looser)
    #[arg(long, default_value_t = false, help_heading = "Layout")]
    fast: bool,

    // Export
    /// Export packing stats (JSON) to this file
    #[arg(long, help_heading = "Export")]
    export_stats: Option<PathBuf>,
    /// Print the merged configuration (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
}

#[derive(Parser, Debug, Clone)]
struct BenchArgs {
    /// Number of random rects to generate
    #[arg(long, default_value_t = 200)]
    count: usize,
    /// RNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Smallest rect side
    #[arg(long, default_value_t = 4)]
    min_size: u32,
    /// Largest rect side
    #[arg(long, default_value_t = 128)]
    max_size: u32,
    /// Max page width
    #[arg(long, default_value_t = 1024)]
    max_width: u32,
    /// Max page height
    #[arg(long, default_value_t = 1024)]
    max_height: u32,
    /// Allow rotation (90deg)
    #[arg(long, default_value_t = false)]
    allow_rotation: bool,
    /// Greedy single-pass packing
    #[arg(long, default_value_t = false)]
    fast: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Pack(args) => run_pack(args, cli.progress && !cli.quiet),
        Commands::Bench(args) => run_bench(args),
    }
}

fn run_pack(args: &PackArgs, show_progress: bool) -> anyhow::Result<()> {
    let mut cfg = PackerConfig {
        min_width: args.min_width,
        min_height: args.min_height,
        max_width: args.max_width,
        max_height: args.max_height,
        padding_x: args.padding_x,
        padding_y: args.padding_y,
        edge_padding: args.edge_padding,
        duplicate_padding: args.duplicate_padding,
        allow_rotation: args.allow_rotation,
        square: args.square,
        pot: args.pot,
        multiple_of_four: args.multiple_of_four,
        fast: args.fast,
    };
    // Config file sets layout options en bloc on top of the CLI flags.
    if let Some(path) = &args.config {
        let file = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let overrides: YamlConfig = serde_yaml::from_str(&file)?;
        cfg = overrides.into_packer_config(cfg);
    }

    if args.print_config {
        match args.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&cfg)?),
            _ => println!("{}", serde_json::to_string_pretty(&cfg)?),
        }
        return Ok(());
    }

    let manifest = fs::read_to_string(&args.input)
        .with_context(|| format!("read {}", args.input.display()))?;
    let inputs: Vec<InputRect> =
        serde_json::from_str(&manifest).with_context(|| format!("parse {}", args.input.display()))?;
    info!(count = inputs.len(), "loaded input manifest");

    let bar = if show_progress {
        use indicatif::{ProgressBar, ProgressStyle};
        let b = ProgressBar::new(inputs.len() as u64);
        b.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} packing {pos}/{len} [{elapsed_precise}] {wide_msg}",
            )
            .unwrap(),
        );
        Some(b)
    } else {
        None
    };
    let pages = pack_rects_with_progress(inputs, cfg, |p| {
        if let Some(b) = &bar {
            b.set_position(p.placed as u64);
            b.set_message(format!("page {}", p.pages));
        }
        true
    })?;
    if let Some(b) = &bar {
        b.finish_and_clear();
    }

    let stats = PackStats::from_pages(&pages);
    info!(
        pages = stats.num_pages,
        frames = stats.num_frames,
        occupancy = format!("{:.2}%", stats.occupancy * 100.0),
        "stats"
    );

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create out_dir {}", args.out_dir.display()))?;
    let json_path = args.out_dir.join(format!("{}.json", args.name));
    fs::write(&json_path, serde_json::to_string_pretty(&pages)?)
        .with_context(|| format!("write {}", json_path.display()))?;
    info!(?json_path, pages = pages.len(), "atlas written");

    if let Some(stats_path) = &args.export_stats {
        fs::write(stats_path, serde_json::to_string_pretty(&stats)?)
            .with_context(|| format!("write {}", stats_path.display()))?;
        info!(?stats_path, "stats exported");
    }
    Ok(())
}

fn run_bench(args: &BenchArgs) -> anyhow::Result<()> {
    use rand::{Rng, SeedableRng};
    let mut rng = rand::rngs::StdRng::seed_from_u64(args.seed);
    let inputs: Vec<InputRect> = (0..args.count)
        .map(|i| {
            let w = rng.gen_range(args.min_size..=args.max_size);
            let h = rng.gen_range(args.min_size..=args.max_size);
            InputRect::new(format!("rect_{i:04}"), w, h)
        })
        .collect();
    let cfg = PackerConfig {
        max_width: args.max_width,
        max_height: args.max_height,
        allow_rotation: args.allow_rotation,
        fast: args.fast,
        ..Default::default()
    };
    let start = Instant::now();
    let pages = pack_rects_with_progress(inputs, cfg, |_| true)?;
    let dur = start.elapsed();
    let stats = PackStats::from_pages(&pages);
    println!(
        "pages={} frames={} occupancy={:.2}% time={}",
        stats.num_pages,
        stats.num_frames,
        stats.occupancy * 100.0,
        fmt_dur(dur)
    );
    Ok(())
}

fn fmt_dur(d: Duration) -> String {
    let ms = d.as_secs_f64() * 1000.0;
    if ms >= 1.0 {
        format!("{:.1}ms", ms)
    } else {
        format!("{}us", d.as_micros())
    }
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}

#[derive(Debug, Deserialize, Default)]
struct YamlConfig {
    min_width: Option<u32>,
    min_height: Option<u32>,
    max_width: Option<u32>,
    max_height: Option<u32>,
    padding_x: Option<u32>,
    padding_y: Option<u32>,
    edge_padding: Option<bool>,
    duplicate_padding: Option<bool>,
    allow_rotation: Option<bool>,
    square: Option<bool>,
    pot: Option<bool>,
    multiple_of_four: Option<bool>,
    fast: Option<bool>,
}

impl YamlConfig {
    fn into_packer_config(self, mut cfg: PackerConfig) -> PackerConfig {
        if let Some(v) = self.min_width {
            cfg.min_width = v;
        }
        if let Some(v) = self.min_height {
            cfg.min_height = v;
        }
        if let Some(v) = self.max_width {
            cfg.max_width = v;
        }
        if let Some(v) = self.max_height {
            cfg.max_height = v;
        }
        if let Some(v) = self.padding_x {
            cfg.padding_x = v;
        }
        if let Some(v) = self.padding_y {
            cfg.padding_y = v;
        }
        if let Some(v) = self.edge_padding {
            cfg.edge_padding = v;
        }
        if let Some(v) = self.duplicate_padding {
            cfg.duplicate_padding = v;
        }
        if let Some(v) = self.allow_rotation {
            cfg.allow_rotation = v;
        }
        if let Some(v) = self.square {
            cfg.square = v;
        }
        if let Some(v) = self.pot {
            cfg.pot = v;
        }
        if let Some(v) = self.multiple_of_four {
            cfg.multiple_of_four = v;
        }
        if let Some(v) = self.fast {
            cfg.fast = v;
        }
        cfg
    }
}
