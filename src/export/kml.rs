use std::fmt::Write;

use crate::geo::{arc, destination, LatLng};
use crate::model::color::hex_to_kml_color;
use crate::model::{Sector, Site};

const SITE_ICON_COLOR: &str = "ff6366f1";
const SITE_ICON_HREF: &str = "http://maps.google.com/mapfiles/kml/shapes/placemark_circle.png";
const SECTOR_ALPHA: u8 = 0x80;
const ARC_STEPS: usize = 10;
const LABEL_FRACTION: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportMode {
    /// One placemark per site.
    #[default]
    Sites,
    /// Sites plus a wedge polygon per sector.
    Full,
}

/// Escape the five XML special characters.
pub fn escape_xml(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render `sites` as a KML document.
pub fn export_kml(sites: &[Site], mode: ExportMode) -> String {
    let mut kml = String::new();
    // Writing into a String cannot fail.
    let _ = write_document(&mut kml, sites, mode);
    log::debug!("exported {} sites as KML ({:?})", sites.len(), mode);
    kml
}

fn write_document(out: &mut String, sites: &[Site], mode: ExportMode) -> std::fmt::Result {
    writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(out, r#"<kml xmlns="http://www.opengis.net/kml/2.2">"#)?;
    writeln!(out, "  <Document>")?;
    writeln!(out, "    <name>Site Sector Map</name>")?;
    writeln!(out, "    <description>Exported from Site Sector Mapper</description>")?;
    writeln!(out, r#"    <Style id="siteIcon">"#)?;
    writeln!(out, "      <IconStyle>")?;
    writeln!(out, "        <color>{}</color>", SITE_ICON_COLOR)?;
    writeln!(out, "        <scale>1.2</scale>")?;
    writeln!(out, "        <Icon><href>{}</href></Icon>", SITE_ICON_HREF)?;
    writeln!(out, "      </IconStyle>")?;
    writeln!(out, "    </Style>")?;

    for site in sites {
        write_site(out, site)?;
        if mode == ExportMode::Full {
            for (i, sector) in site.sectors.iter().enumerate() {
                write_sector(out, site, sector, i + 1)?;
            }
        }
    }

    writeln!(out, "  </Document>")?;
    write!(out, "</kml>")
}

fn write_site(out: &mut String, site: &Site) -> std::fmt::Result {
    let name = escape_xml(&site.name);
    writeln!(out, "    <Placemark>")?;
    writeln!(out, "      <name>{}</name>", name)?;
    writeln!(out, "      <description><![CDATA[")?;
    writeln!(out, "        <h3>{}</h3>", name)?;
    if !site.description.is_empty() {
        writeln!(out, "        <p>{}</p>", escape_xml(&site.description))?;
    }
    writeln!(
        out,
        "        <p><strong>Coordinates:</strong> {}, {}</p>",
        site.latitude, site.longitude
    )?;
    writeln!(out, "        <p><strong>Sectors:</strong> {}</p>", site.sectors.len())?;
    writeln!(out, "      ]]></description>")?;
    writeln!(out, "      <styleUrl>#siteIcon</styleUrl>")?;
    writeln!(
        out,
        "      <Point><coordinates>{},{},0</coordinates></Point>",
        site.longitude, site.latitude
    )?;
    writeln!(out, "    </Placemark>")
}

fn write_sector(out: &mut String, site: &Site, sector: &Sector, number: usize) -> std::fmt::Result {
    let center = LatLng {
        lat: site.latitude,
        lng: site.longitude,
    };
    let color = hex_to_kml_color(&sector.color, SECTOR_ALPHA);

    let mut ring = format!("{},{},0 ", center.lng, center.lat);
    for p in arc(center, sector.azimuth, sector.beamwidth, sector.range, ARC_STEPS) {
        write!(ring, "{},{},0 ", p.lng, p.lat)?;
    }
    write!(ring, "{},{},0", center.lng, center.lat)?;

    let label = destination(center.lat, center.lng, sector.azimuth, sector.range * LABEL_FRACTION);

    writeln!(out, "    <Placemark>")?;
    writeln!(out, "      <name>{} - Sector {}</name>", escape_xml(&site.name), number)?;
    writeln!(out, "      <Style>")?;
    writeln!(out, "        <IconStyle><scale>0</scale></IconStyle>")?;
    writeln!(out, "        <LineStyle><color>{}</color><width>1</width></LineStyle>", color)?;
    writeln!(out, "        <PolyStyle><color>{}</color></PolyStyle>", color)?;
    writeln!(out, "      </Style>")?;
    writeln!(out, "      <MultiGeometry>")?;
    writeln!(
        out,
        "        <Point><coordinates>{},{},0</coordinates></Point>",
        label.lng, label.lat
    )?;
    writeln!(out, "        <Polygon><outerBoundaryIs><LinearRing>")?;
    writeln!(out, "          <coordinates>{}</coordinates>", ring)?;
    writeln!(out, "        </LinearRing></outerBoundaryIs></Polygon>")?;
    writeln!(out, "      </MultiGeometry>")?;
    writeln!(out, "    </Placemark>")
}
