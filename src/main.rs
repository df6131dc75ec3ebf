use anyhow::{Context, Result};
use clap::Parser;
use geotrace::{config, forward};

#[derive(Parser, Debug)]
#[command(name = "address")]
#[command(about = "Geocode a CSV of name,address rows and write coordinates, distances and map links as CSV and KML points.", long_about = None)]
struct Cli {
    #[command(flatten)]
    pipeline: config::PipelineArgs,
}

fn main() -> Result<()> {
    config::init();
    let cli = Cli::parse();

    let geocoder = cli.pipeline.geocoder().context("building geocoding client")?;
    let rows = forward::process_address(
        &cli.pipeline.input,
        &cli.pipeline.out,
        &geocoder,
        cli.pipeline.print,
    )
    .with_context(|| format!("processing {}", cli.pipeline.input.display()))?;

    println!(
        "Geocoded {} addresses into {}.csv and {}.kml",
        rows.len().saturating_sub(1),
        cli.pipeline.out.display(),
        cli.pipeline.out.display()
    );
    Ok(())
}
