//! Import-time defaults.

use crate::model::{MarkerShape, DEFAULT_POINT_COLOR};

/// Group tag given to sites that come from a spreadsheet.
pub const DEFAULT_TABULAR_GROUP: &str = "CSV Import";

/// Marker styling applied to KML-imported points.
#[derive(Debug, Clone, PartialEq)]
pub struct PointDefaults {
    pub shape: MarkerShape,
    pub size: u32,
    /// Used when a placemark resolved no colour of its own.
    pub color: String,
}

impl Default for PointDefaults {
    fn default() -> Self {
        Self {
            shape: MarkerShape::Circle,
            size: 10,
            color: DEFAULT_POINT_COLOR.to_string(),
        }
    }
}

/// Options shared by the tabular and KML importers.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOptions {
    /// Group tag for tabular imports. KML imports use the file name.
    pub group: String,
    pub point_defaults: PointDefaults,
}

impl ImportOptions {
    pub fn new() -> Self {
        Self {
            group: DEFAULT_TABULAR_GROUP.to_string(),
            point_defaults: PointDefaults::default(),
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    pub fn with_point_defaults(mut self, defaults: PointDefaults) -> Self {
        self.point_defaults = defaults;
        self
    }
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self::new()
    }
}
