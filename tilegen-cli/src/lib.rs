//! Shared plumbing for the `tilegen` and `packed_tilegen` binaries:
//! tracing setup, direction parsing, and the JSON run report.

use clap::ValueEnum;
use serde::Serialize;
use std::path::Path;
use tilegen::{Direction, LevelStats, PyramidSummary, TileFormat, TileGenError, TileGenResult};
use tracing_subscriber::EnvFilter;

/// Tile format argument shared by both binaries.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FormatArg {
    Png,
    Jpeg,
}

impl From<FormatArg> for TileFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Png => TileFormat::Png,
            FormatArg::Jpeg => TileFormat::Jpeg,
        }
    }
}

/// Installs the fmt subscriber when `--trace` is passed.
pub fn init_tracing(enabled: bool) {
    if enabled {
        let filter = EnvFilter::from_default_env()
            .add_directive("tilegen=info".parse().expect("static directive parses"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}

/// Parses the optional positional direction argument; `None` means north.
pub fn parse_direction(arg: Option<&str>) -> TileGenResult<Direction> {
    match arg {
        Some(code) => code.parse(),
        None => Ok(Direction::North),
    }
}

/// One level of the JSON run report.
#[derive(Debug, Serialize)]
pub struct LevelRecord {
    pub zoom: i32,
    pub tiles_per_side: usize,
    pub tiles_written: u32,
}

impl From<&LevelStats> for LevelRecord {
    fn from(value: &LevelStats) -> Self {
        Self {
            zoom: value.zoom,
            tiles_per_side: value.tiles_per_side,
            tiles_written: value.tiles_written,
        }
    }
}

/// JSON run report written by `--report`.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub input: String,
    pub output_dir: String,
    pub levels: Vec<LevelRecord>,
    pub total_tiles: u64,
}

impl RunReport {
    pub fn new(input: &Path, output_dir: &Path, summary: &PyramidSummary) -> Self {
        Self {
            input: input.display().to_string(),
            output_dir: output_dir.display().to_string(),
            levels: summary.levels.iter().map(LevelRecord::from).collect(),
            total_tiles: summary.total_tiles(),
        }
    }

    /// Serializes the report to `path` as pretty-printed JSON.
    pub fn write(&self, path: &Path) -> TileGenResult<()> {
        let json = serde_json::to_string_pretty(self).map_err(|err| TileGenError::Io {
            reason: err.to_string(),
        })?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Reports the error and exits with its stable numeric code.
pub fn exit_with(err: TileGenError) -> ! {
    eprintln!("error: {err}");
    std::process::exit(err.exit_code());
}
