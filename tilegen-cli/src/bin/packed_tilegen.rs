use clap::Parser;
use std::path::PathBuf;
use tilegen::{build_packed, decode_raster, PackParams, TileGenResult};
use tilegen_cli::{exit_with, init_tracing, parse_direction, FormatArg, RunReport};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Pack the coarse zoom levels of one root tile into a single indexed archive"
)]
struct Cli {
    /// Source raster (.png or .ppm).
    input: PathBuf,
    /// Root of the output directory tree.
    output_dir: PathBuf,
    /// Root tile X address within the global grid.
    tile_x: u32,
    /// Root tile Y address within the global grid.
    tile_y: u32,
    /// Cardinal orientation of this quadrant (N, E, S or W).
    direction: Option<String>,
    /// Tile image format for the packed payload.
    #[arg(long, value_enum, default_value = "png")]
    format: FormatArg,
    /// Write a JSON run summary to this path.
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,
    /// Enable tracing output for progress and profiling.
    #[arg(long)]
    trace: bool,
}

fn run(cli: &Cli) -> TileGenResult<()> {
    tracing::info!("reading {}", cli.input.display());
    let raster = decode_raster(&cli.input)?;
    let direction = parse_direction(cli.direction.as_deref())?;

    let summary = build_packed(
        raster,
        &PackParams {
            out_dir: &cli.output_dir,
            root_x: cli.tile_x,
            root_y: cli.tile_y,
            direction,
            format: cli.format.into(),
        },
    )?;
    tracing::info!("packed {} tiles", summary.total_tiles());

    if let Some(report_path) = &cli.report {
        RunReport::new(&cli.input, &cli.output_dir, &summary).write(report_path)?;
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.trace);
    if let Err(err) = run(&cli) {
        exit_with(err);
    }
}
