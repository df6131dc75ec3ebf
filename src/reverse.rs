//! Location -> Address: reverse-geocode each timestamped GPS fix and derive
//! the distance and average speed since the previous fix.

use std::path::Path;

use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::geo::{haversine_km, speed_kmh, Coordinate};
use crate::geocoder::Geocoder;
use crate::kml::{write_path_kml, PathFields};
use crate::links::{map_address_url, map_location_url};
use crate::output_path;
use crate::table::{field, read_rows, write_rows, Row};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Column names of the CSV output. There is one name fewer than fields per
/// row, and the first field of each row is the timestamp.
pub const HEADER: [&str; 8] = [
    "Latitude",
    "Longitude",
    "Speed",
    "Address",
    "Distance",
    "Calculated Speed",
    "Map Location",
    "Map Address",
];

/// The path follows the emitted latitude/longitude fields.
pub const PATH_FIELDS: PathFields = PathFields {
    longitude: 2,
    latitude: 1,
};

/// One input row: `[timestamp, latitude, longitude, reported_speed]`.
#[derive(Clone, Debug, PartialEq)]
pub struct LocationSample {
    pub timestamp: NaiveDateTime,
    pub coordinate: Coordinate,
    /// Speed reported by the GPS device, passed through unchanged.
    pub reported_speed: i64,
}

impl LocationSample {
    pub fn from_row(row: &[String], row_number: usize) -> Result<Self> {
        let raw = field(row, 0, row_number, "timestamp")?;
        let timestamp = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
            .map_err(|e| invalid(row_number, "timestamp", raw, e))?;
        let latitude = parse(row, 1, row_number, "latitude")?;
        let longitude = parse(row, 2, row_number, "longitude")?;
        let reported_speed = parse(row, 3, row_number, "speed")?;
        Ok(Self {
            timestamp,
            coordinate: Coordinate::new(latitude, longitude),
            reported_speed,
        })
    }
}

fn parse<T>(row: &[String], index: usize, row_number: usize, name: &'static str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = field(row, index, row_number, name)?;
    raw.trim()
        .parse()
        .map_err(|e| invalid(row_number, name, raw, e))
}

fn invalid(row: usize, name: &'static str, value: &str, e: impl std::fmt::Display) -> Error {
    Error::InvalidField {
        row,
        name,
        value: value.to_string(),
        message: e.to_string(),
    }
}

/// Movement between two consecutive samples.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Leg {
    pub distance_km: f64,
    /// `None` when the two samples are at the same place.
    pub speed_kmh: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedLocation {
    pub sample: LocationSample,
    pub address: String,
    /// Absent for the first sample.
    pub leg: Option<Leg>,
}

impl ResolvedLocation {
    pub fn to_row(&self) -> Row {
        let (distance, calculated_speed) = match self.leg {
            None => ("0".to_string(), "0".to_string()),
            Some(leg) => (
                leg.distance_km.to_string(),
                leg.speed_kmh.unwrap_or(0.0).to_string(),
            ),
        };
        vec![
            self.sample.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            format!("{:?}", self.sample.coordinate.latitude),
            format!("{:?}", self.sample.coordinate.longitude),
            self.sample.reported_speed.to_string(),
            self.address.clone(),
            distance,
            calculated_speed,
            map_location_url(self.sample.coordinate),
            map_address_url(&self.address),
        ]
    }
}

/// Reverse-geocode every row in order. The first malformed row or failed
/// lookup aborts, as does a non-zero distance covered in zero elapsed time.
pub fn resolve_locations(rows: &[Row], geocoder: &dyn Geocoder) -> Result<Vec<ResolvedLocation>> {
    let mut resolved = Vec::with_capacity(rows.len());
    let mut previous: Option<LocationSample> = None;

    for (i, row) in rows.iter().enumerate() {
        let row_number = i + 1;
        let sample = LocationSample::from_row(row, row_number)?;
        let address = geocoder.reverse_geocode(sample.coordinate)?;

        let leg = match &previous {
            None => None,
            Some(prev) => {
                let distance_km = haversine_km(prev.coordinate, sample.coordinate);
                let speed = speed_kmh(sample.timestamp, prev.timestamp, distance_km);
                if speed.is_some_and(f64::is_infinite) {
                    return Err(Error::ZeroElapsed { row: row_number });
                }
                Some(Leg {
                    distance_km,
                    speed_kmh: speed,
                })
            }
        };
        debug!(row = row_number, %address, ?leg, "resolved location");

        previous = Some(sample.clone());
        resolved.push(ResolvedLocation {
            sample,
            address,
            leg,
        });
    }
    Ok(resolved)
}

/// Header row followed by one row per resolved location.
pub fn to_rows(resolved: &[ResolvedLocation]) -> Vec<Row> {
    let mut rows = Vec::with_capacity(resolved.len() + 1);
    rows.push(HEADER.iter().map(|h| h.to_string()).collect());
    rows.extend(resolved.iter().map(ResolvedLocation::to_row));
    rows
}

/// Read `input`, reverse-geocode it, and write `<output>.csv` and
/// `<output>.kml`. The path is named after the KML file.
pub fn process_location(
    input: &Path,
    output: &Path,
    geocoder: &dyn Geocoder,
    print_result: bool,
) -> Result<Vec<Row>> {
    let rows = read_rows(input)?;
    info!(input = %input.display(), rows = rows.len(), "reverse geocoding locations");

    let resolved = resolve_locations(&rows, geocoder)?;
    let result = to_rows(&resolved);

    let csv_path = output_path(output, "csv");
    let kml_path = output_path(output, "kml");
    write_rows(&csv_path, &result)?;
    write_path_kml(
        &kml_path,
        &kml_path.to_string_lossy(),
        &result,
        PATH_FIELDS,
    )?;
    info!(csv = %csv_path.display(), kml = %kml_path.display(), "wrote results");

    if print_result {
        for row in &result {
            println!("{:?}", row);
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> Row {
        fields.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn parses_a_sample() {
        let sample =
            LocationSample::from_row(&row(&["2019-07-14 09:30:05", "46.81", "-71.2", "87"]), 1)
                .unwrap();
        assert_eq!(
            sample.timestamp,
            NaiveDateTime::parse_from_str("2019-07-14 09:30:05", TIMESTAMP_FORMAT).unwrap()
        );
        assert_eq!(sample.coordinate, Coordinate::new(46.81, -71.2));
        assert_eq!(sample.reported_speed, 87);
    }

    #[test]
    fn bad_fields_name_the_row_and_field() {
        let cases = [
            (row(&["2019-07-14T09:30:05", "46.81", "-71.2", "87"]), "timestamp"),
            (row(&["2019-07-14 09:30:05", "north", "-71.2", "87"]), "latitude"),
            (row(&["2019-07-14 09:30:05", "46.81", "", "87"]), "longitude"),
            (row(&["2019-07-14 09:30:05", "46.81", "-71.2", "87.5"]), "speed"),
        ];
        for (r, expected) in cases {
            match LocationSample::from_row(&r, 4) {
                Err(Error::InvalidField { row, name, .. }) => {
                    assert_eq!((row, name), (4, expected));
                }
                other => panic!("expected InvalidField for {}, got {:?}", expected, other),
            }
        }
    }

    #[test]
    fn short_row_is_missing_field() {
        let err = LocationSample::from_row(&row(&["2019-07-14 09:30:05", "46.81"]), 2).unwrap_err();
        assert!(matches!(err, Error::MissingField { row: 2, index: 2, .. }));
    }

    #[test]
    fn first_row_renders_zero_distance_and_speed() {
        let resolved = ResolvedLocation {
            sample: LocationSample::from_row(
                &row(&["2019-07-14 09:30:05", "46.5", "-71.25", "0"]),
                1,
            )
            .unwrap(),
            address: "1 Rue Principale".to_string(),
            leg: None,
        };
        assert_eq!(
            resolved.to_row(),
            row(&[
                "2019-07-14 09:30:05",
                "46.5",
                "-71.25",
                "0",
                "1 Rue Principale",
                "0",
                "0",
                "https://www.google.com/maps/place/46.5,-71.25",
                "https://www.google.com/maps/place/1+Rue+Principale",
            ])
        );
    }

    #[test]
    fn whole_degrees_render_as_floats() {
        let resolved = ResolvedLocation {
            sample: LocationSample::from_row(&row(&["2019-07-14 09:30:05", "46", "-71", "0"]), 1)
                .unwrap(),
            address: "x".to_string(),
            leg: None,
        };
        let rendered = resolved.to_row();
        assert_eq!(rendered[1], "46.0");
        assert_eq!(rendered[2], "-71.0");
        assert_eq!(rendered[7], "https://www.google.com/maps/place/46.0,-71.0");
    }

    #[test]
    fn stationary_leg_renders_zero_speed() {
        let mut resolved = ResolvedLocation {
            sample: LocationSample::from_row(&row(&["2019-07-14 09:30:05", "1", "2", "0"]), 1)
                .unwrap(),
            address: "x".to_string(),
            leg: Some(Leg {
                distance_km: 0.0,
                speed_kmh: None,
            }),
        };
        assert_eq!(resolved.to_row()[5..7], ["0".to_string(), "0".to_string()]);

        resolved.leg = Some(Leg {
            distance_km: 12.5,
            speed_kmh: Some(50.0),
        });
        assert_eq!(resolved.to_row()[5..7], ["12.5".to_string(), "50".to_string()]);
    }
}
