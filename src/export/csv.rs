use crate::error::{ImportError, Result};
use crate::model::{Point, PointKind};

const HEADER: [&str; 4] = ["Latitude", "Longitude", "Attribute", "Value"];

/// One `Latitude,Longitude,Attribute,Value` line per custom property of
/// every imported KML point. Other points are ignored.
pub fn export_point_attributes_csv<'a, I>(points: I) -> Result<String>
where
    I: IntoIterator<Item = &'a Point>,
{
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(HEADER)?;

    let mut lines = 0;
    for point in points.into_iter().filter(|p| p.kind == PointKind::KmlPoint) {
        let lat = point.latitude.to_string();
        let lon = point.longitude.to_string();
        for prop in &point.custom_properties {
            wtr.write_record([lat.as_str(), lon.as_str(), prop.name.as_str(), prop.value.as_str()])?;
            lines += 1;
        }
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    log::debug!("exported {} attribute lines", lines);
    String::from_utf8(bytes).map_err(|e| ImportError::InvalidInput(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CustomProperties, CustomProperty, MarkerShape};

    fn point(kind: PointKind, props: &[(&str, &str)]) -> Point {
        Point {
            id: "p".into(),
            name: "p".into(),
            latitude: 48.5,
            longitude: -1.25,
            description: String::new(),
            kind,
            group: "drive.kml".into(),
            color: "#ef4444".into(),
            shape: MarkerShape::Circle,
            size: 10,
            custom_properties: props
                .iter()
                .map(|(k, v)| CustomProperty::new(*k, *v))
                .collect::<CustomProperties>(),
        }
    }

    #[test]
    fn one_line_per_property() {
        let points = vec![
            point(PointKind::KmlPoint, &[("RSRP", "-95"), ("Note", "say \"hi\", ok")]),
            point(PointKind::Point, &[("Ignored", "1")]),
            point(PointKind::KmlPoint, &[]),
        ];
        let out = export_point_attributes_csv(&points).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Latitude,Longitude,Attribute,Value",
                "48.5,-1.25,RSRP,-95",
                "48.5,-1.25,Note,\"say \"\"hi\"\", ok\"",
            ]
        );
    }

    #[test]
    fn header_only_when_nothing_to_export() {
        let out = export_point_attributes_csv(&Vec::<Point>::new()).unwrap();
        assert_eq!(out, "Latitude,Longitude,Attribute,Value\n");
    }
}
