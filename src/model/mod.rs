pub mod color;
pub mod id;
pub mod properties;
pub mod store;

pub use color::{DEFAULT_POINT_COLOR, DEFAULT_SECTOR_COLOR};
pub use id::IdGenerator;
pub use properties::{CustomProperties, CustomProperty};
pub use store::SiteStore;

use serde::{Deserialize, Serialize};

/// A cell site: one location carrying zero or more antenna sectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub description: String,
    /// Import batch or source name.
    pub group: String,
    #[serde(default)]
    pub sectors: Vec<Sector>,
}

impl Site {
    /// Latitude within [-90, 90] and longitude within [-180, 180].
    pub fn has_valid_coordinates(&self) -> bool {
        valid_coordinates(self.latitude, self.longitude)
    }
}

/// Directional coverage wedge owned by a [`Site`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sector {
    #[serde(default)]
    pub name: String,
    /// Main lobe direction, degrees clockwise from north.
    pub azimuth: f64,
    /// Angular spread in degrees.
    pub beamwidth: f64,
    /// Coverage radius in meters.
    pub range: f64,
    pub color: String,
    pub opacity: f64,
    #[serde(default)]
    pub technology: String,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub pci: String,
    #[serde(default)]
    pub cell_name: String,
    #[serde(default)]
    pub custom_properties: CustomProperties,
}

impl Sector {
    pub const DEFAULT_BEAMWIDTH: f64 = 65.0;
    pub const DEFAULT_RANGE: f64 = 500.0;
    pub const DEFAULT_OPACITY: f64 = 0.5;

    /// Sector pointing at `azimuth` with every other field at its default.
    pub fn with_azimuth(azimuth: f64) -> Self {
        Self {
            name: String::new(),
            azimuth,
            beamwidth: Self::DEFAULT_BEAMWIDTH,
            range: Self::DEFAULT_RANGE,
            color: DEFAULT_SECTOR_COLOR.to_string(),
            opacity: Self::DEFAULT_OPACITY,
            technology: String::new(),
            frequency: String::new(),
            pci: String::new(),
            cell_name: String::new(),
            custom_properties: CustomProperties::new(),
        }
    }

    /// Look up a standard field by its canonical name.
    pub fn field(&self, name: &str) -> Option<String> {
        let v = match name {
            "name" | "sector_name" => self.name.clone(),
            "azimuth" => self.azimuth.to_string(),
            "beamwidth" => self.beamwidth.to_string(),
            "range" => self.range.to_string(),
            "color" => self.color.clone(),
            "opacity" => self.opacity.to_string(),
            "technology" => self.technology.clone(),
            "frequency" => self.frequency.clone(),
            "pci" => self.pci.clone(),
            "cell_name" => self.cell_name.clone(),
            _ => return None,
        };
        Some(v)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointKind {
    /// Placed by hand.
    Point,
    /// Imported from a KML placemark.
    KmlPoint,
}

impl PointKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PointKind::Point => "point",
            PointKind::KmlPoint => "kml_point",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerShape {
    #[default]
    Default,
    Circle,
    Square,
    Triangle,
    Star,
    Diamond,
    #[serde(rename = "3d-sphere")]
    Sphere3d,
    #[serde(rename = "3d-cube")]
    Cube3d,
    #[serde(rename = "3d-cylinder")]
    Cylinder3d,
}

/// A standalone located marker, distinct from a [`Site`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: PointKind,
    pub group: String,
    pub color: String,
    #[serde(default)]
    pub shape: MarkerShape,
    pub size: u32,
    #[serde(default)]
    pub custom_properties: CustomProperties,
}

impl Point {
    /// Look up a standard field or, failing that, a custom property.
    pub fn attribute(&self, name: &str) -> Option<String> {
        match name {
            "name" => Some(self.name.clone()),
            "group" => Some(self.group.clone()),
            "description" => Some(self.description.clone()),
            "color" => Some(self.color.clone()),
            _ => self.custom_properties.get(name).map(str::to_string),
        }
    }
}

pub fn valid_coordinates(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude)
}
