//! Colour conversions between KML and web notation.
//!
//! KML stores colours as `aabbggrr`; everything else in the crate uses
//! `#rrggbb` strings.

/// Default marker colour for points that carry no usable style.
pub const DEFAULT_POINT_COLOR: &str = "#ef4444";

/// Default sector fill colour.
pub const DEFAULT_SECTOR_COLOR: &str = "#3388ff";

/// Convert a KML `aabbggrr` colour into `#rrggbb`, dropping alpha.
///
/// Anything that is not exactly eight hex digits yields `None`.
pub fn kml_color_to_hex(kml: &str) -> Option<String> {
    let kml = kml.trim();
    if kml.len() != 8 || !kml.is_ascii() {
        return None;
    }
    u8::from_str_radix(&kml[0..2], 16).ok()?;
    let b = u8::from_str_radix(&kml[2..4], 16).ok()?;
    let g = u8::from_str_radix(&kml[4..6], 16).ok()?;
    let r = u8::from_str_radix(&kml[6..8], 16).ok()?;
    Some(format!("#{:02x}{:02x}{:02x}", r, g, b))
}

/// Parse `#rgb` or `#rrggbb` into its three channels.
pub fn parse_hex_rgb(val: &str) -> Option<[u8; 3]> {
    let v = val.trim();
    let hex = v.strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
            Some([r, g, b])
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some([r, g, b])
        }
        _ => None,
    }
}

/// Convert `#rrggbb` into KML `aabbggrr` with the given alpha.
///
/// Unparsable input falls back to the default sector colour.
pub fn hex_to_kml_color(hex: &str, alpha: u8) -> String {
    let [r, g, b] = parse_hex_rgb(hex)
        .or_else(|| parse_hex_rgb(DEFAULT_SECTOR_COLOR))
        .unwrap_or([0x33, 0x88, 0xff]);
    format!("{:02x}{:02x}{:02x}{:02x}", alpha, b, g, r)
}
