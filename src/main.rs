use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use community_plot::generate::{GenerateOptions, generate_matrix, write_csv};
use community_plot::{
    Axis, ColorScheme, LabelledMatrix, MajorityTieBreak, PlotConfig, PlotMode, Plotter,
    RenderOptions, SvgRenderer,
};

#[derive(Parser)]
#[command(name = "community-plot")]
#[command(about = "Plot a community array, optionally reordered by the majority rule.", long_about = None)]
struct Cli {
    /// Log more (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a labelled CSV community array to SVG.
    Plot(PlotArgs),
    /// Write a random labelled CSV community array.
    Generate(GenerateArgs),
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Original,
    Order1,
    Order2,
}

#[derive(Clone, Copy, ValueEnum)]
enum TieBreak {
    Lowest,
    Ranked,
}

#[derive(Args)]
struct PlotArgs {
    /// CSV with column names in the header and the row name first on each line.
    input: PathBuf,

    #[arg(short, long, value_enum, default_value = "original")]
    mode: Mode,

    /// With order1, reorder columns instead of rows.
    #[arg(long)]
    columns: bool,

    /// Output file (defaults to original.svg, order1.svg or order2.svg).
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Use random lightness and saturation from this seed.
    #[arg(long, value_name = "N")]
    jitter_seed: Option<u64>,

    /// How to pick a row or column majority when labels tie.
    #[arg(long, value_enum, default_value = "lowest")]
    tie_break: TieBreak,

    /// Side of one cell in pixels.
    #[arg(long, value_name = "N", default_value_t = 24)]
    cell_size: u32,

    #[arg(long, value_name = "N", default_value_t = 12)]
    font_size: u32,

    #[arg(long)]
    no_legend: bool,
}

#[derive(Args)]
struct GenerateArgs {
    /// Where to write the CSV.
    output: PathBuf,

    #[arg(long, default_value_t = 20)]
    rows: usize,

    #[arg(long, default_value_t = 12)]
    cols: usize,

    #[arg(long, default_value_t = 5)]
    communities: u64,

    /// Chance that a cell takes its row's dominant community.
    #[arg(long, default_value_t = 0.6)]
    cohesion: f64,

    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn plot(args: PlotArgs) -> Result<()> {
    // 1. Read data
    let LabelledMatrix {
        matrix,
        row_names,
        col_names,
    } = LabelledMatrix::from_csv_path(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    info!(rows = matrix.rows(), cols = matrix.cols(), "loaded community array");

    // 2. Configure
    let mode = match args.mode {
        Mode::Original => PlotMode::Original,
        Mode::Order1 if args.columns => PlotMode::OrderOne(Axis::Column),
        Mode::Order1 => PlotMode::OrderOne(Axis::Row),
        Mode::Order2 => PlotMode::OrderBoth,
    };
    let colors = match args.jitter_seed {
        Some(seed) => ColorScheme::Jitter { seed },
        None => ColorScheme::default(),
    };
    let tie_break = match args.tie_break {
        TieBreak::Lowest => MajorityTieBreak::LowestLabel,
        TieBreak::Ranked => MajorityTieBreak::BestRanked,
    };
    let config = PlotConfig::new().with_colors(colors).with_tie_break(tie_break);
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("{}.svg", mode.file_stem())));
    let renderer = SvgRenderer::new(&output).with_options(RenderOptions {
        cell_size: args.cell_size,
        font_size: args.font_size,
        legend: !args.no_legend,
    });

    // 3. Arrange and render
    let mut plotter = Plotter::new(config, renderer);
    let arrangement = plotter
        .plot(&matrix, &row_names, &col_names, mode)
        .with_context(|| format!("plotting {}", output.display()))?;

    // 4. Print the orders
    println!("Rows ({}):", arrangement.row_names.len());
    for name in &arrangement.row_names {
        println!("  {}", name);
    }
    println!("Columns ({}):", arrangement.col_names.len());
    for name in &arrangement.col_names {
        println!("  {}", name);
    }
    println!("{} communities -> {}", arrangement.colors.len(), output.display());
    Ok(())
}

fn generate(args: GenerateArgs) -> Result<()> {
    let options = GenerateOptions {
        rows: args.rows,
        cols: args.cols,
        communities: args.communities,
        cohesion: args.cohesion,
        seed: args.seed,
    };
    let labelled = generate_matrix(&options)?;
    write_csv(&labelled, &args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Plot(args) => plot(args),
        Command::Generate(args) => generate(args),
    }
}
