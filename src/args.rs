use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Clone, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArguments {
    #[command(flatten)]
    pub common: CommonOptions,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Clone, Debug)]
pub struct CommonOptions {
    /// YAML file with drawing options (line widths, courtyard offsets, name templates)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory the .kicad_mod file is written to
    #[arg(short, long, global = true, default_value = ".")]
    pub output: PathBuf,

    /// Print the render tree instead of writing the footprint
    #[arg(long, global = true)]
    pub tree: bool,

    /// Show extra information while generating the footprint
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Command {
    /// Straight through hole pin header
    PinHeader {
        /// Number of pins per column
        #[arg(long)]
        rows: u32,

        #[arg(long, default_value_t = 1)]
        cols: u32,

        /// Pin pitch in mm
        #[arg(long, default_value_t = 2.54)]
        pitch: f64,

        /// Drill diameter in mm
        #[arg(long, default_value_t = 1.0)]
        drill: f64,

        /// Pad diameter in mm
        #[arg(long, default_value_t = 1.7)]
        pad_size: f64,
    },

    /// JST PH side entry SMD connector
    JstPhSmd {
        /// Number of pins of the connector
        #[arg(long)]
        pins: u32,
    },
}
