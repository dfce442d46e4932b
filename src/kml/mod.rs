//! KML placemark ingestion.

pub mod attributes;
pub mod description;
pub mod importer;
pub mod parser;
pub mod style;
pub mod xml;

pub use importer::import_kml_points;
pub use parser::parse_kml;

use crate::model::CustomProperties;

/// One placemark as read from the document, before it becomes a `Point`.
#[derive(Debug, Clone, PartialEq)]
pub struct KmlPoint {
    pub name: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    /// `#rrggbb`
    pub color: String,
    pub custom_properties: CustomProperties,
}

/// Result of parsing one document.
#[derive(Debug, Clone, Default)]
pub struct KmlParse {
    pub points: Vec<KmlPoint>,
    /// Placemarks without usable point geometry.
    pub skipped: usize,
}
