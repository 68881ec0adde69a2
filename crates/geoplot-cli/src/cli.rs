use clap::{Parser, Subcommand};
use geoplot_core::config::CliConfigOverrides;
use geoplot_core::models::CoordinateSpace;
use std::path::PathBuf;

/// GeoPlot - Place shapes on a map without overlaps
#[derive(Parser, Debug)]
#[command(name = "geoplot")]
#[command(about = "Place shapes on a map without overlaps", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to ./geoplot.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Maximum number of polygons
    #[arg(long, global = true, value_name = "N")]
    pub max_polygons: Option<usize>,

    /// Maximum number of rectangles
    #[arg(long, global = true, value_name = "N")]
    pub max_rectangles: Option<usize>,

    /// Maximum number of circles
    #[arg(long, global = true, value_name = "N")]
    pub max_circles: Option<usize>,

    /// Maximum number of line strings
    #[arg(long, global = true, value_name = "N")]
    pub max_line_strings: Option<usize>,

    /// How coordinates are interpreted
    #[arg(long, global = true)]
    pub coordinate_space: Option<CoordinateSpaceArg>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Configuration values given on the command line
    pub fn config_overrides(&self) -> CliConfigOverrides {
        CliConfigOverrides {
            max_polygons: self.max_polygons,
            max_rectangles: self.max_rectangles,
            max_circles: self.max_circles,
            max_line_strings: self.max_line_strings,
            coordinate_space: self.coordinate_space.map(Into::into),
        }
    }
}

/// Coordinate space selection
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CoordinateSpaceArg {
    /// Cartesian x/y, areas in square units
    Planar,
    /// Longitude/latitude in degrees, areas in square meters
    Geographic,
}

impl From<CoordinateSpaceArg> for CoordinateSpace {
    fn from(arg: CoordinateSpaceArg) -> Self {
        match arg {
            CoordinateSpaceArg::Planar => CoordinateSpace::Planar,
            CoordinateSpaceArg::Geographic => CoordinateSpace::Geographic,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add every shape from a GeoJSON file, in order
    Apply(ApplyArgs),

    /// Show the effective configuration and where each value came from
    Config,
}

#[derive(Parser, Debug)]
pub struct ApplyArgs {
    /// GeoJSON file with the shape requests
    pub input: PathBuf,

    /// Write the accepted shapes to this GeoJSON file
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,
}
