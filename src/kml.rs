//! KML 2.2 writers for point markers and a single styled path.
//!
//! Both writers take the same row sequence as the tabular output: the first
//! row is a header and is skipped, the remaining rows are read positionally.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use tracing::debug;

use crate::error::{Error, Result};
use crate::table::{field, Row};

const KML_NS: &str = "http://www.opengis.net/kml/2.2";

/// Opaque blue, KML colors are `aabbggrr`.
pub const PATH_COLOR: &str = "ffff0000";
pub const PATH_WIDTH: u32 = 5;

/// Column indexes used to build one point marker per row.
#[derive(Copy, Clone, Debug)]
pub struct PointFields {
    pub name: usize,
    pub longitude: usize,
    pub latitude: usize,
}

/// Column indexes used to build one path vertex per row.
#[derive(Copy, Clone, Debug)]
pub struct PathFields {
    pub longitude: usize,
    pub latitude: usize,
}

/// Write one named `<Placemark><Point>` per data row.
pub fn write_point_kml(path: &Path, rows: &[Row], fields: PointFields) -> Result<()> {
    let mut writer = open(path)?;
    start_document(&mut writer)?;
    for (i, row) in rows.iter().enumerate().skip(1) {
        let name = field(row, fields.name, i, "name")?;
        let coord = coordinate_text(row, fields.longitude, fields.latitude, i)?;
        start(&mut writer, "Placemark")?;
        text_element(&mut writer, "name", name)?;
        start(&mut writer, "Point")?;
        text_element(&mut writer, "coordinates", &coord)?;
        end(&mut writer, "Point")?;
        end(&mut writer, "Placemark")?;
    }
    end_document(writer, path)?;
    debug!(path = %path.display(), points = rows.len().saturating_sub(1), "wrote point KML");
    Ok(())
}

/// Write a single blue `<LineString>` through every data row in order.
pub fn write_path_kml(path: &Path, name: &str, rows: &[Row], fields: PathFields) -> Result<()> {
    let coords = rows
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, row)| coordinate_text(row, fields.longitude, fields.latitude, i))
        .collect::<Result<Vec<_>>>()?;

    let mut writer = open(path)?;
    start_document(&mut writer)?;
    start(&mut writer, "Placemark")?;
    text_element(&mut writer, "name", name)?;
    start(&mut writer, "Style")?;
    start(&mut writer, "LineStyle")?;
    text_element(&mut writer, "color", PATH_COLOR)?;
    text_element(&mut writer, "width", &PATH_WIDTH.to_string())?;
    end(&mut writer, "LineStyle")?;
    end(&mut writer, "Style")?;
    start(&mut writer, "LineString")?;
    text_element(&mut writer, "coordinates", &coords.join(" "))?;
    end(&mut writer, "LineString")?;
    end(&mut writer, "Placemark")?;
    end_document(writer, path)?;
    debug!(path = %path.display(), vertices = coords.len(), "wrote path KML");
    Ok(())
}

fn coordinate_text(row: &[String], lon: usize, lat: usize, row_number: usize) -> Result<String> {
    let longitude = parse_degrees(field(row, lon, row_number, "longitude")?, row_number, "longitude")?;
    let latitude = parse_degrees(field(row, lat, row_number, "latitude")?, row_number, "latitude")?;
    Ok(format!("{:?},{:?},0.0", longitude, latitude))
}

fn parse_degrees(value: &str, row: usize, name: &'static str) -> Result<f64> {
    value.trim().parse().map_err(|e: std::num::ParseFloatError| Error::InvalidField {
        row,
        name,
        value: value.to_string(),
        message: e.to_string(),
    })
}

type KmlWriter = Writer<BufWriter<File>>;

fn open(path: &Path) -> Result<KmlWriter> {
    let file = File::create(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Writer::new_with_indent(BufWriter::new(file), b' ', 2))
}

fn start_document(writer: &mut KmlWriter) -> Result<()> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(
        BytesStart::new("kml").with_attributes([("xmlns", KML_NS)]),
    ))?;
    start(writer, "Document")
}

fn end_document(mut writer: KmlWriter, path: &Path) -> Result<()> {
    end(&mut writer, "Document")?;
    end(&mut writer, "kml")?;
    writer.into_inner().flush().map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn start(writer: &mut KmlWriter, tag: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    Ok(())
}

fn end(writer: &mut KmlWriter, tag: &str) -> Result<()> {
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn text_element(writer: &mut KmlWriter, tag: &str, text: &str) -> Result<()> {
    start(writer, tag)?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    end(writer, tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[&str]]) -> Vec<Row> {
        data.iter()
            .map(|r| r.iter().map(|f| f.to_string()).collect())
            .collect()
    }

    #[test]
    fn points_skip_header_and_escape_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("points.kml");
        let data = rows(&[
            &["Name", "Address", "Latitude", "Longitude"],
            &["Fish & Chips", "x", "51.5", "-0.12"],
            &["Home", "y", "45", "-73.5"],
        ]);
        write_point_kml(
            &path,
            &data,
            PointFields {
                name: 0,
                longitude: 3,
                latitude: 2,
            },
        )
        .unwrap();

        let kml = std::fs::read_to_string(&path).unwrap();
        assert!(kml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(kml.contains("<kml xmlns=\"http://www.opengis.net/kml/2.2\">"));
        assert_eq!(kml.matches("<Placemark>").count(), 2);
        assert!(kml.contains("<name>Fish &amp; Chips</name>"));
        assert!(kml.contains("<coordinates>-0.12,51.5,0.0</coordinates>"));
        assert!(kml.contains("<coordinates>-73.5,45.0,0.0</coordinates>"));
        assert!(!kml.contains("<name>Name</name>"));
    }

    #[test]
    fn path_is_one_styled_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("path.kml");
        let data = rows(&[
            &["Latitude", "Longitude"],
            &["1.5", "2.5"],
            &["3.5", "4.5"],
        ]);
        write_path_kml(
            &path,
            "path.kml",
            &data,
            PathFields {
                longitude: 1,
                latitude: 0,
            },
        )
        .unwrap();

        let kml = std::fs::read_to_string(&path).unwrap();
        assert_eq!(kml.matches("<Placemark>").count(), 1);
        assert!(kml.contains("<color>ffff0000</color>"));
        assert!(kml.contains("<width>5</width>"));
        assert!(kml.contains("<coordinates>2.5,1.5,0.0 4.5,3.5,0.0</coordinates>"));
    }

    #[test]
    fn non_numeric_coordinate_fails() {
        let dir = tempfile::tempdir().unwrap();
        let data = rows(&[&["h", "h"], &["north", "2.5"]]);
        let err = write_path_kml(
            &dir.path().join("bad.kml"),
            "bad",
            &data,
            PathFields {
                longitude: 1,
                latitude: 0,
            },
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidField { name: "latitude", row: 1, .. }));
    }
}
