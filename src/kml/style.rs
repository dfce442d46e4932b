//! Style lookup and placemark colour resolution.

use std::collections::HashMap;

use roxmltree::{Document, Node};

use super::xml::{find_descendants_by_local_name, first_descendant, first_text};
use crate::model::color::kml_color_to_hex;
use crate::model::DEFAULT_POINT_COLOR;

/// Raw `IconStyle/color` values keyed by `#style-id`.
///
/// `StyleMap`s are folded in through their `normal` pair so a placemark
/// referencing the map gets the colour of the style it points at.
#[derive(Debug, Clone, Default)]
pub struct StyleIndex {
    colors: HashMap<String, String>,
}

impl StyleIndex {
    pub fn build(doc: &Document<'_>) -> Self {
        let mut colors = HashMap::new();

        for style in find_descendants_by_local_name(doc.root(), "Style") {
            let Some(id) = style.attribute("id").filter(|id| !id.is_empty()) else {
                continue;
            };
            if let Some(color) = icon_color(style) {
                colors.insert(format!("#{}", id), color);
            }
        }

        for map in find_descendants_by_local_name(doc.root(), "StyleMap") {
            let Some(id) = map.attribute("id").filter(|id| !id.is_empty()) else {
                continue;
            };
            let key = format!("#{}", id);
            if colors.contains_key(&key) {
                continue;
            }
            let normal = find_descendants_by_local_name(map, "Pair")
                .into_iter()
                .find(|pair| first_text(*pair, "key") == "normal")
                .map(|pair| first_text(pair, "styleUrl"));
            if let Some(color) = normal.and_then(|url| colors.get(&url).cloned()) {
                colors.insert(key, color);
            }
        }

        log::debug!("Style index: {} coloured styles", colors.len());
        Self { colors }
    }

    /// Raw KML colour for a `styleUrl` such as `#red`.
    pub fn get(&self, style_url: &str) -> Option<&str> {
        self.colors.get(style_url).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Non-empty `IconStyle/color` text below `style`.
fn icon_color(style: Node<'_, '_>) -> Option<String> {
    let icon = first_descendant(style, "IconStyle")?;
    let color = first_text(icon, "color");
    (!color.is_empty()).then_some(color)
}

/// Resolve a placemark's marker colour.
///
/// Later steps override earlier ones: default → `styleUrl` lookup →
/// inline `Style/IconStyle/color`. A colour that is present but not valid
/// `aabbggrr` resets to the default.
pub fn resolve_color(placemark: Node<'_, '_>, styles: &StyleIndex) -> String {
    let mut color = DEFAULT_POINT_COLOR.to_string();

    let style_url = first_text(placemark, "styleUrl");
    if let Some(raw) = styles.get(&style_url) {
        color = to_hex_or_default(raw);
    }

    if let Some(raw) = first_descendant(placemark, "Style").and_then(icon_color) {
        color = to_hex_or_default(&raw);
    }

    color
}

fn to_hex_or_default(raw: &str) -> String {
    kml_color_to_hex(raw).unwrap_or_else(|| DEFAULT_POINT_COLOR.to_string())
}
