use std::path::PathBuf;

use clap::Args;
use tracing_subscriber::EnvFilter;

use crate::error::Result;
use crate::geocoder::{GoogleGeocoder, DEFAULT_ENDPOINT};

/// Arguments shared by both pipelines.
#[derive(Args, Debug)]
pub struct PipelineArgs {
    /// Input CSV. The first line is a header and is skipped.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output base path. `.csv` and `.kml` are appended.
    #[arg(short, long)]
    pub out: PathBuf,

    /// Also print every output row to stdout.
    #[arg(long, default_value_t = false)]
    pub print: bool,

    /// Geocoding service API key.
    #[arg(long, env = "GOOGLE_MAPS_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Geocoding service endpoint.
    #[arg(long, env = "GEOCODER_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

impl PipelineArgs {
    pub fn geocoder(&self) -> Result<GoogleGeocoder> {
        GoogleGeocoder::new(&self.endpoint, &self.api_key)
    }
}

/// Load `.env` if present and install the log subscriber. `RUST_LOG`
/// overrides the default `info` level. Logs go to stderr so printed rows
/// stay alone on stdout.
pub fn init() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
