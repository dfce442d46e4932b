//! Writing the store back out: KML for Google Earth and a flat CSV of
//! drive-test attributes.

pub mod csv;
pub mod kml;

pub use self::csv::export_point_attributes_csv;
pub use self::kml::{escape_xml, export_kml, ExportMode};
