use roxmltree::Node;

use super::attributes::{extract_properties, PlacemarkSource};
use super::style::{resolve_color, StyleIndex};
use super::xml::{find_descendants_by_local_name, first_descendant, first_text, parse_document};
use super::{KmlParse, KmlPoint};
use crate::error::Result;
use crate::tabular::number::parse_float_prefix;

const UNTITLED: &str = "Untitled Point";

/// Parse a KML document into located points.
///
/// Fails only when the text is not well-formed XML; in that case nothing is
/// returned. Placemarks without a usable `Point/coordinates` are skipped.
pub fn parse_kml(xml_text: &str) -> Result<KmlParse> {
    let doc = parse_document(xml_text)?;
    let styles = StyleIndex::build(&doc);

    let mut parsed = KmlParse::default();
    for placemark in find_descendants_by_local_name(doc.root(), "Placemark") {
        match parse_placemark(placemark, &styles) {
            Some(point) => parsed.points.push(point),
            None => parsed.skipped += 1,
        }
    }

    log::debug!(
        "KML: {} points, {} placemarks skipped, {} styles",
        parsed.points.len(),
        parsed.skipped,
        styles.len()
    );
    Ok(parsed)
}

fn parse_placemark(placemark: Node<'_, '_>, styles: &StyleIndex) -> Option<KmlPoint> {
    let point = first_descendant(placemark, "Point")?;
    let (longitude, latitude) = parse_coordinates(&first_text(point, "coordinates"))?;

    let name = first_text(placemark, "name");
    let name = if name.is_empty() { UNTITLED.to_string() } else { name };
    let description = first_text(placemark, "description");

    let color = resolve_color(placemark, styles);
    let custom_properties = extract_properties(&PlacemarkSource {
        node: placemark,
        description: &description,
    });

    Some(KmlPoint {
        name,
        description,
        latitude,
        longitude,
        color,
        custom_properties,
    })
}

/// `lon,lat[,alt]` → `(lon, lat)`. Only the first tuple is read.
pub fn parse_coordinates(text: &str) -> Option<(f64, f64)> {
    if text.is_empty() {
        return None;
    }
    let mut parts = text.split(',').map(str::trim);
    let lon = parse_float_prefix(parts.next()?)?;
    let lat = parse_float_prefix(parts.next()?)?;
    Some((lon, lat))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImportError;

    const DOC: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2" xmlns:gx="http://www.google.com/kml/ext/2.2">
<Document>
  <Style id="red"><IconStyle><color>ff0000ff</color></IconStyle></Style>
  <Folder>
    <Placemark>
      <name>Cell A</name>
      <styleUrl>#red</styleUrl>
      <Style><IconStyle><color>ff00ff00</color></IconStyle></Style>
      <description><![CDATA[RSRP = -80<br>SINR = 12]]></description>
      <ExtendedData>
        <SchemaData schemaUrl="#drive">
          <SimpleData name="RSRP">-101.5</SimpleData>
        </SchemaData>
      </ExtendedData>
      <Point><coordinates> 2.35 , 48.85 ,0</coordinates></Point>
    </Placemark>
    <Placemark>
      <name>Broken</name>
      <Point><coordinates>abc,12.3</coordinates></Point>
    </Placemark>
    <Placemark>
      <name>Line only</name>
      <LineString><coordinates>1,2,0 3,4,0</coordinates></LineString>
    </Placemark>
    <Placemark>
      <styleUrl>#red</styleUrl>
      <gx:Track/>
      <Point><coordinates>-0.12,51.5</coordinates></Point>
    </Placemark>
  </Folder>
</Document>
</kml>"##;

    #[test]
    fn parses_valid_placemarks_and_skips_the_rest() {
        let parsed = parse_kml(DOC).unwrap();
        assert_eq!(parsed.points.len(), 2);
        assert_eq!(parsed.skipped, 2);

        let a = &parsed.points[0];
        assert_eq!(a.name, "Cell A");
        assert_eq!((a.longitude, a.latitude), (2.35, 48.85));
        assert_eq!(a.color, "#00ff00");
        assert_eq!(a.custom_properties.get("RSRP"), Some("-101.5"));
        assert_eq!(a.custom_properties.get("SINR"), Some("12"));

        let b = &parsed.points[1];
        assert_eq!(b.name, "Untitled Point");
        assert_eq!(b.color, "#ff0000");
        assert_eq!(b.description, "");
    }

    #[test]
    fn malformed_xml_fails_whole_document() {
        let truncated = &DOC[..DOC.len() / 2];
        let err = parse_kml(truncated).unwrap_err();
        assert!(matches!(err, ImportError::MalformedDocument { .. }));
    }

    #[test]
    fn coordinates() {
        assert_eq!(parse_coordinates("2.5,48.1,120"), Some((2.5, 48.1)));
        assert_eq!(parse_coordinates(" 2.5 , 48.1 "), Some((2.5, 48.1)));
        assert_eq!(parse_coordinates("abc,12.3"), None);
        assert_eq!(parse_coordinates("12.3"), None);
        assert_eq!(parse_coordinates(""), None);
    }

    #[test]
    fn empty_document_has_no_points() {
        let parsed = parse_kml("<kml><Document/></kml>").unwrap();
        assert!(parsed.points.is_empty());
        assert_eq!(parsed.skipped, 0);
    }
}
