use crate::args::{CliArguments, Command};
use anyhow::Context;
use clap::Parser;
use kicadmodtree::config::GeneratorConfig;
use kicadmodtree::generators::pin_header::PinHeaderParams;
use kicadmodtree::generators::{jst_ph, pin_header};
use kicadmodtree::geometry::Point;
use kicadmodtree::writer::FootprintWriter;
use tracing_subscriber::EnvFilter;

mod args;

fn main() -> anyhow::Result<()> {
    let cli = CliArguments::parse();

    let default_level = if cli.common.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    let config = match &cli.common.config {
        Some(path) => GeneratorConfig::load(path).with_context(|| format!("Unable to load configuration from {}", path.display()))?,
        None => GeneratorConfig::default(),
    };

    let footprint = match cli.command {
        Command::PinHeader { rows, cols, pitch, drill, pad_size } => {
            let params = PinHeaderParams {
                rows,
                cols,
                pitch,
                drill,
                pad_size: Point::splat(pad_size),
            };
            pin_header::straight(&config, &params)?
        }
        Command::JstPhSmd { pins } => jst_ph::smd_side(&config, pins)?,
    };

    if cli.common.tree {
        println!("{}", footprint.virtual_render_tree()?);
        return Ok(());
    }

    let path = FootprintWriter::new(&footprint)?.write_to(&cli.common.output)?;
    println!("{}", path.display());
    Ok(())
}
