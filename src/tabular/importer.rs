//! Group flat spreadsheet rows into Site + Sector aggregates.

use std::collections::HashMap;

use super::header::{header_map, CanonicalKey};
use super::number::parse_number;
use super::row::Row;
use crate::config::ImportOptions;
use crate::error::{EmptyReason, ImportError, Result};
use crate::model::{CustomProperties, IdGenerator, Sector, Site, DEFAULT_SECTOR_COLOR};

/// Outcome of a tabular import.
#[derive(Debug, Clone)]
pub struct TabularImport {
    /// Sites in order of first appearance of their name.
    pub sites: Vec<Site>,
    pub accepted_rows: usize,
    /// Rows without a site name or usable coordinates.
    pub rejected_rows: usize,
}

impl TabularImport {
    pub fn sector_count(&self) -> usize {
        self.sites.iter().map(|s| s.sectors.len()).sum()
    }
}

/// Rewrite every row's keys to canonical names using the header map
/// derived from the first row. Unmapped keys are kept verbatim.
pub fn canonicalize_rows(rows: &[Row]) -> Vec<Row> {
    let Some(first) = rows.first() else {
        return Vec::new();
    };
    let map: HashMap<String, CanonicalKey> = header_map(first.keys()).into_iter().collect();

    rows.iter()
        .map(|row| {
            row.iter()
                .map(|(k, v)| {
                    let key = map.get(k).map(|c| c.as_str()).unwrap_or(k);
                    (key.to_string(), v.to_string())
                })
                .collect()
        })
        .collect()
}

/// A row is usable when it names a site and both coordinates parse.
fn is_valid_row(row: &Row) -> bool {
    row.non_empty(CanonicalKey::SiteName.as_str()).is_some()
        && coordinate(row, CanonicalKey::Latitude).is_some()
        && coordinate(row, CanonicalKey::Longitude).is_some()
}

fn coordinate(row: &Row, key: CanonicalKey) -> Option<f64> {
    row.get(key.as_str()).and_then(|v| parse_number(v, true))
}

/// Missing, unparsable and zero all fall back to the default.
fn number_or(row: &Row, key: CanonicalKey, default: f64) -> f64 {
    row.get(key.as_str())
        .and_then(|v| parse_number(v, false))
        .filter(|v| *v != 0.0)
        .unwrap_or(default)
}

fn text_or(row: &Row, key: CanonicalKey, default: &str) -> String {
    row.non_empty(key.as_str()).unwrap_or(default).to_string()
}

fn build_sector(row: &Row, azimuth: f64) -> Sector {
    let mut custom_properties = CustomProperties::new();
    for (k, v) in row.iter() {
        if k.parse::<CanonicalKey>().is_err() {
            custom_properties.push_raw(k, v);
        }
    }

    Sector {
        name: text_or(row, CanonicalKey::SectorName, ""),
        azimuth,
        beamwidth: number_or(row, CanonicalKey::Beamwidth, Sector::DEFAULT_BEAMWIDTH),
        range: number_or(row, CanonicalKey::Range, Sector::DEFAULT_RANGE),
        color: text_or(row, CanonicalKey::Color, DEFAULT_SECTOR_COLOR),
        opacity: number_or(row, CanonicalKey::Opacity, Sector::DEFAULT_OPACITY),
        technology: text_or(row, CanonicalKey::Technology, ""),
        frequency: text_or(row, CanonicalKey::Frequency, ""),
        pci: text_or(row, CanonicalKey::Pci, ""),
        cell_name: text_or(row, CanonicalKey::CellName, ""),
        custom_properties,
    }
}

/// Normalize headers, drop unusable rows, and group the rest by site name.
///
/// The first row of each name seeds the site; every row with a parsable
/// azimuth adds a sector to it. Rows without an azimuth only contribute
/// to the site itself.
pub fn import_tabular(rows: &[Row], options: &ImportOptions, ids: &IdGenerator) -> Result<TabularImport> {
    if rows.is_empty() {
        return Err(ImportError::NoValidRecords {
            reason: EmptyReason::EmptyInput,
        });
    }

    let canonical = canonicalize_rows(rows);
    let (valid, rejected): (Vec<&Row>, Vec<&Row>) = canonical.iter().partition(|r| is_valid_row(r));

    if valid.is_empty() {
        log::warn!("Tabular import: all {} rows rejected", rejected.len());
        return Err(ImportError::NoValidRecords {
            reason: EmptyReason::NoValidRows {
                rejected: rejected.len(),
            },
        });
    }

    let mut sites: Vec<Site> = Vec::new();
    let mut by_name: HashMap<&str, usize> = HashMap::new();

    for row in &valid {
        let name = row.non_empty(CanonicalKey::SiteName.as_str()).unwrap_or_default();

        let idx = match by_name.get(name) {
            Some(&idx) => idx,
            None => {
                sites.push(Site {
                    id: ids.next_id(),
                    name: name.to_string(),
                    latitude: coordinate(row, CanonicalKey::Latitude).unwrap_or_default(),
                    longitude: coordinate(row, CanonicalKey::Longitude).unwrap_or_default(),
                    description: text_or(row, CanonicalKey::Description, ""),
                    group: options.group.clone(),
                    sectors: Vec::new(),
                });
                by_name.insert(name, sites.len() - 1);
                sites.len() - 1
            }
        };

        let azimuth = row
            .get(CanonicalKey::Azimuth.as_str())
            .and_then(|v| parse_number(v, false));
        if let Some(azimuth) = azimuth {
            sites[idx].sectors.push(build_sector(row, azimuth));
        }
    }

    let result = TabularImport {
        sites,
        accepted_rows: valid.len(),
        rejected_rows: rejected.len(),
    };
    log::info!(
        "Tabular import: {} sites, {} sectors ({} rows accepted, {} rejected)",
        result.sites.len(),
        result.sector_count(),
        result.accepted_rows,
        result.rejected_rows
    );
    Ok(result)
}
