use super::KmlPoint;
use crate::config::PointDefaults;
use crate::model::{IdGenerator, Point, PointKind};

/// Turn parsed placemarks into `kml_point` markers grouped under `filename`.
///
/// Every call mints fresh ids; importing the same file twice yields two
/// copies of each point.
pub fn import_kml_points(
    points: Vec<KmlPoint>,
    filename: &str,
    defaults: &PointDefaults,
    ids: &IdGenerator,
) -> Vec<Point> {
    points
        .into_iter()
        .map(|p| Point {
            id: ids.next_prefixed("kml"),
            name: p.name,
            latitude: p.latitude,
            longitude: p.longitude,
            description: p.description,
            kind: PointKind::KmlPoint,
            group: filename.to_string(),
            color: if p.color.is_empty() {
                defaults.color.clone()
            } else {
                p.color
            },
            shape: defaults.shape,
            size: defaults.size,
            custom_properties: p.custom_properties,
        })
        .collect()
}
