use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("CSV error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("KML write error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("row {row} has no field {index} ({name})")]
    MissingField {
        row: usize,
        index: usize,
        name: &'static str,
    },

    #[error("row {row}: cannot parse {name} from {value:?}: {message}")]
    InvalidField {
        row: usize,
        name: &'static str,
        value: String,
        message: String,
    },

    #[error("row {row}: non-zero distance covered in zero elapsed time")]
    ZeroElapsed { row: usize },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("geocoding service returned status {status}: {message}")]
    Service { status: String, message: String },

    #[error("geocoding service returned no results for {query}")]
    NoResults { query: String },
}
