use anyhow::{Context, Result};
use clap::Parser;
use geotrace::{config, reverse};

#[derive(Parser, Debug)]
#[command(name = "location")]
#[command(about = "Reverse-geocode a CSV of timestamp,latitude,longitude,speed rows and write addresses, distances and calculated speeds as CSV and a KML path.", long_about = None)]
struct Cli {
    #[command(flatten)]
    pipeline: config::PipelineArgs,
}

fn main() -> Result<()> {
    config::init();
    let cli = Cli::parse();

    let geocoder = cli.pipeline.geocoder().context("building geocoding client")?;
    let rows = reverse::process_location(
        &cli.pipeline.input,
        &cli.pipeline.out,
        &geocoder,
        cli.pipeline.print,
    )
    .with_context(|| format!("processing {}", cli.pipeline.input.display()))?;

    println!(
        "Resolved {} locations into {}.csv and {}.kml",
        rows.len().saturating_sub(1),
        cli.pipeline.out.display(),
        cli.pipeline.out.display()
    );
    Ok(())
}
