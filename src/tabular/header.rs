//! Column header normalization.
//!
//! Spreadsheet exports from planning tools name the same field a dozen ways
//! ("Lat.", "LATITUDE", "Breite", "Site Name (Primary)"). Every header is
//! squashed (lower-case, no whitespace, dots, underscores or hyphens) and
//! matched against a fixed vocabulary.

use std::fmt;
use std::str::FromStr;

/// The canonical attribute vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CanonicalKey {
    SiteName,
    Latitude,
    Longitude,
    Azimuth,
    Beamwidth,
    Range,
    Description,
    SectorName,
    Color,
    Opacity,
    Technology,
    Frequency,
    Pci,
    CellName,
}

impl CanonicalKey {
    pub const ALL: [CanonicalKey; 14] = [
        CanonicalKey::SiteName,
        CanonicalKey::Latitude,
        CanonicalKey::Longitude,
        CanonicalKey::Azimuth,
        CanonicalKey::Beamwidth,
        CanonicalKey::Range,
        CanonicalKey::Description,
        CanonicalKey::SectorName,
        CanonicalKey::Color,
        CanonicalKey::Opacity,
        CanonicalKey::Technology,
        CanonicalKey::Frequency,
        CanonicalKey::Pci,
        CanonicalKey::CellName,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalKey::SiteName => "site_name",
            CanonicalKey::Latitude => "latitude",
            CanonicalKey::Longitude => "longitude",
            CanonicalKey::Azimuth => "azimuth",
            CanonicalKey::Beamwidth => "beamwidth",
            CanonicalKey::Range => "range",
            CanonicalKey::Description => "description",
            CanonicalKey::SectorName => "sector_name",
            CanonicalKey::Color => "color",
            CanonicalKey::Opacity => "opacity",
            CanonicalKey::Technology => "technology",
            CanonicalKey::Frequency => "frequency",
            CanonicalKey::Pci => "pci",
            CanonicalKey::CellName => "cell_name",
        }
    }

    /// Known spellings, English first, then French/German/Spanish exports.
    fn variants(&self) -> &'static [&'static str] {
        match self {
            CanonicalKey::SiteName => &[
                "site", "name", "sitename", "site name", "site_name", "identifier",
                "nom du site", "nom site", "standort", "sitio",
            ],
            CanonicalKey::Latitude => &["lat", "latitude", "lat.", "y", "breite", "latitud"],
            CanonicalKey::Longitude => &[
                "lon", "lng", "long", "longitude", "long.", "x", "laenge", "länge", "longitud",
            ],
            CanonicalKey::Azimuth => &[
                "azimuth", "azi", "heading", "dir", "direction", "bearing", "azimut",
            ],
            CanonicalKey::Beamwidth => &[
                "beamwidth", "beam", "hbws", "bw", "h_beamwidth", "bandwith",
                "ouverture", "largeur faisceau", "keulenbreite",
            ],
            CanonicalKey::Range => &[
                "range", "radius", "dist", "distance", "rang", "portee", "portée", "rayon",
                "reichweite",
            ],
            CanonicalKey::Description => &[
                "description", "desc", "notes", "comment", "remarque", "beschreibung",
            ],
            CanonicalKey::SectorName => &[
                "sector", "sector name", "sector_name", "cell", "sectorid", "secteur",
                "nom secteur", "sektor",
            ],
            CanonicalKey::Color => &["color", "colour", "rgb", "couleur", "farbe"],
            CanonicalKey::Opacity => &[
                "opacity", "alpha", "transparency", "opacite", "opacité", "deckkraft",
            ],
            CanonicalKey::Technology => &[
                "technology", "tech", "system", "rat", "technologie", "tecnologia",
            ],
            CanonicalKey::Frequency => &[
                "frequency", "freq", "band", "frequence", "fréquence", "frequenz", "frecuencia",
            ],
            CanonicalKey::Pci => &[
                "pci", "physical_cell_id", "physical cell id", "sc physical cell id",
                "id cellule physique",
            ],
            CanonicalKey::CellName => &[
                "cell_name", "cell name", "cellname", "cellid", "nom cellule", "zellname",
            ],
        }
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CanonicalKey {
    type Err = ();

    /// Exact canonical name only; use [`normalize_header`] for raw headers.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CanonicalKey::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or(())
    }
}

/// Lower-case and drop whitespace, dots, underscores and hyphens.
pub fn squash(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '.' | '_' | '-'))
        .collect()
}

/// Map a raw column header onto the canonical vocabulary.
///
/// Exact matches (canonical name or any variant) win. Otherwise the header
/// may carry a qualifier after a known variant ("Site Name (Primary)"); the
/// first key, in vocabulary order, with a variant that prefixes it decides.
pub fn normalize_header(raw: &str) -> Option<CanonicalKey> {
    let normalized = squash(raw);
    if normalized.is_empty() {
        return None;
    }

    for key in CanonicalKey::ALL {
        if squash(key.as_str()) == normalized
            || key.variants().iter().any(|v| squash(v) == normalized)
        {
            return Some(key);
        }
    }

    CanonicalKey::ALL.into_iter().find(|key| {
        key.variants()
            .iter()
            .any(|v| normalized.starts_with(&squash(v)))
    })
}

/// Build the raw → canonical mapping for a header row, in column order.
/// Unmapped headers are absent from the result.
pub fn header_map<'a, I>(headers: I) -> Vec<(String, CanonicalKey)>
where
    I: IntoIterator<Item = &'a str>,
{
    headers
        .into_iter()
        .filter_map(|h| normalize_header(h).map(|k| (h.to_string(), k)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_keys_are_fixed_points() {
        for key in CanonicalKey::ALL {
            assert_eq!(normalize_header(key.as_str()), Some(key), "{}", key);
            assert_eq!(key.as_str().parse::<CanonicalKey>(), Ok(key));
        }
    }

    #[test]
    fn exact_variants() {
        assert_eq!(normalize_header("Site"), Some(CanonicalKey::SiteName));
        assert_eq!(normalize_header("LAT."), Some(CanonicalKey::Latitude));
        assert_eq!(normalize_header("Lon"), Some(CanonicalKey::Longitude));
        assert_eq!(normalize_header("Azimut"), Some(CanonicalKey::Azimuth));
        assert_eq!(normalize_header("BW"), Some(CanonicalKey::Beamwidth));
        assert_eq!(normalize_header(" h-beamwidth "), Some(CanonicalKey::Beamwidth));
        assert_eq!(normalize_header("Physical Cell ID"), Some(CanonicalKey::Pci));
        assert_eq!(normalize_header("Cell Name"), Some(CanonicalKey::CellName));
        assert_eq!(normalize_header("CellID"), Some(CanonicalKey::CellName));
        assert_eq!(normalize_header("Fréquence"), Some(CanonicalKey::Frequency));
        assert_eq!(normalize_header("x"), Some(CanonicalKey::Longitude));
    }

    #[test]
    fn prefix_fallback() {
        assert_eq!(normalize_header("Site Name (Primary)"), Some(CanonicalKey::SiteName));
        assert_eq!(normalize_header("Latitude WGS84"), Some(CanonicalKey::Latitude));
        assert_eq!(normalize_header("Azimuth_deg"), Some(CanonicalKey::Azimuth));
        assert_eq!(normalize_header("X_Coord"), Some(CanonicalKey::Longitude));
        assert_eq!(normalize_header("Y_Coord"), Some(CanonicalKey::Latitude));
        // vocabulary order decides, not the longest variant
        assert_eq!(normalize_header("Cellname_Primary"), Some(CanonicalKey::SectorName));
    }

    #[test]
    fn unknown_headers_pass_through() {
        assert_eq!(normalize_header("Owner"), None);
        assert_eq!(normalize_header(""), None);
        let map = header_map(["Site", "Owner", "Lat"]);
        assert_eq!(
            map,
            vec![
                ("Site".to_string(), CanonicalKey::SiteName),
                ("Lat".to_string(), CanonicalKey::Latitude),
            ]
        );
    }
}
