//! Address -> Location: geocode each `[name, address]` row and measure the
//! distance from the previous address.

use std::path::Path;

use tracing::{debug, info};

use crate::error::Result;
use crate::geo::{haversine_km, Coordinate};
use crate::geocoder::Geocoder;
use crate::kml::{write_point_kml, PointFields};
use crate::links::{map_address_url, map_location_url};
use crate::output_path;
use crate::table::{field, read_rows, write_rows, Row};

pub const HEADER: [&str; 7] = [
    "Name",
    "Address",
    "Latitude",
    "Longitude",
    "Distance",
    "Map Address",
    "Map Location",
];

/// Point markers are named by `Name` and placed at `Longitude`/`Latitude`.
pub const POINT_FIELDS: PointFields = PointFields {
    name: 0,
    longitude: 3,
    latitude: 2,
};

#[derive(Clone, Debug, PartialEq)]
pub struct LocatedAddress {
    pub name: String,
    pub address: String,
    pub coordinate: Coordinate,
    /// Kilometers from the previous address, absent for the first one.
    pub distance_km: Option<f64>,
}

impl LocatedAddress {
    pub fn to_row(&self) -> Row {
        vec![
            self.name.clone(),
            self.address.clone(),
            format!("{:?}", self.coordinate.latitude),
            format!("{:?}", self.coordinate.longitude),
            self.distance_km.unwrap_or(0.0).to_string(),
            map_address_url(&self.address),
            map_location_url(self.coordinate),
        ]
    }
}

/// Geocode every row in order. The first failed lookup or short row aborts.
pub fn locate_addresses(rows: &[Row], geocoder: &dyn Geocoder) -> Result<Vec<LocatedAddress>> {
    let mut located = Vec::with_capacity(rows.len());
    let mut previous: Option<Coordinate> = None;

    for (i, row) in rows.iter().enumerate() {
        let row_number = i + 1;
        let name = field(row, 0, row_number, "name")?;
        let address = field(row, 1, row_number, "address")?;
        let coordinate = geocoder.geocode(address)?;
        let distance_km = previous.map(|p| haversine_km(p, coordinate));
        debug!(row = row_number, %address, ?coordinate, ?distance_km, "located address");

        located.push(LocatedAddress {
            name: name.to_string(),
            address: address.to_string(),
            coordinate,
            distance_km,
        });
        previous = Some(coordinate);
    }
    Ok(located)
}

/// Header row followed by one row per located address.
pub fn to_rows(located: &[LocatedAddress]) -> Vec<Row> {
    let mut rows = Vec::with_capacity(located.len() + 1);
    rows.push(HEADER.iter().map(|h| h.to_string()).collect());
    rows.extend(located.iter().map(LocatedAddress::to_row));
    rows
}

/// Read `input`, geocode it, and write `<output>.csv` and `<output>.kml`.
pub fn process_address(
    input: &Path,
    output: &Path,
    geocoder: &dyn Geocoder,
    print_result: bool,
) -> Result<Vec<Row>> {
    let rows = read_rows(input)?;
    info!(input = %input.display(), rows = rows.len(), "geocoding addresses");

    let located = locate_addresses(&rows, geocoder)?;
    let result = to_rows(&located);

    let csv_path = output_path(output, "csv");
    let kml_path = output_path(output, "kml");
    write_rows(&csv_path, &result)?;
    write_point_kml(&kml_path, &result, POINT_FIELDS)?;
    info!(csv = %csv_path.display(), kml = %kml_path.display(), "wrote results");

    if print_result {
        for row in &result {
            println!("{:?}", row);
        }
    }
    Ok(result)
}
