//! Top-level collections that own every Site and Point.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{Point, PointKind, Sector, Site};
use crate::error::{ImportError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteStore {
    pub sites: Vec<Site>,
    pub points: Vec<Point>,
}

impl SiteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append sites, dropping any whose coordinates are out of range.
    /// Returns how many were accepted.
    pub fn add_sites(&mut self, sites: Vec<Site>) -> usize {
        let before = self.sites.len();
        for site in sites {
            if !site.has_valid_coordinates() {
                log::warn!(
                    "Dropping site '{}': coordinates ({}, {}) out of range",
                    site.name,
                    site.latitude,
                    site.longitude
                );
                continue;
            }
            self.sites.push(site);
        }
        self.sites.len() - before
    }

    /// Append points. Existing points are never deduplicated against.
    pub fn add_points(&mut self, points: Vec<Point>) -> usize {
        let n = points.len();
        self.points.extend(points);
        n
    }

    pub fn site(&self, id: &str) -> Option<&Site> {
        self.sites.iter().find(|s| s.id == id)
    }

    pub fn point(&self, id: &str) -> Option<&Point> {
        self.points.iter().find(|p| p.id == id)
    }

    pub fn remove_site(&mut self, id: &str) -> Option<Site> {
        let idx = self.sites.iter().position(|s| s.id == id)?;
        Some(self.sites.remove(idx))
    }

    pub fn remove_point(&mut self, id: &str) -> Option<Point> {
        let idx = self.points.iter().position(|p| p.id == id)?;
        Some(self.points.remove(idx))
    }

    /// Edit a site's identity fields in place. Sectors are untouched.
    pub fn edit_site(
        &mut self,
        id: &str,
        name: &str,
        latitude: f64,
        longitude: f64,
        description: &str,
    ) -> Result<()> {
        if name.is_empty() || !super::valid_coordinates(latitude, longitude) {
            return Err(ImportError::InvalidInput(
                "site name and valid coordinates are required".into(),
            ));
        }
        let site = self
            .sites
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| ImportError::InvalidInput(format!("no site with id {}", id)))?;
        site.name = name.to_string();
        site.latitude = latitude;
        site.longitude = longitude;
        site.description = description.to_string();
        Ok(())
    }

    pub fn remove_site_group(&mut self, group: &str) -> usize {
        let before = self.sites.len();
        self.sites.retain(|s| s.group != group);
        before - self.sites.len()
    }

    pub fn remove_point_group(&mut self, group: &str) -> usize {
        let before = self.points.len();
        self.points.retain(|p| p.group != group);
        before - self.points.len()
    }

    pub fn rename_site_group(&mut self, old: &str, new: &str) -> usize {
        let mut n = 0;
        for site in self.sites.iter_mut().filter(|s| s.group == old) {
            site.group = new.to_string();
            n += 1;
        }
        n
    }

    pub fn rename_point_group(&mut self, old: &str, new: &str) -> usize {
        let mut n = 0;
        for point in self.points.iter_mut().filter(|p| p.group == old) {
            point.group = new.to_string();
            n += 1;
        }
        n
    }

    /// Remove every KML-imported point; manual points stay.
    pub fn clear_kml_points(&mut self) -> usize {
        let before = self.points.len();
        self.points.retain(|p| p.kind != PointKind::KmlPoint);
        before - self.points.len()
    }

    /// Overwrite beamwidth and/or range on every sector of every site.
    /// Returns the number of sectors touched.
    pub fn bulk_edit_sectors(&mut self, beamwidth: Option<f64>, range: Option<f64>) -> Result<usize> {
        if beamwidth.is_none() && range.is_none() {
            return Err(ImportError::InvalidInput(
                "at least one of beamwidth or range is required".into(),
            ));
        }
        let mut n = 0;
        for sector in self.sites.iter_mut().flat_map(|s| s.sectors.iter_mut()) {
            if let Some(bw) = beamwidth {
                sector.beamwidth = bw;
            }
            if let Some(r) = range {
                sector.range = r;
            }
            n += 1;
        }
        Ok(n)
    }

    pub fn sectors(&self) -> impl Iterator<Item = &Sector> {
        self.sites.iter().flat_map(|s| s.sectors.iter())
    }

    pub fn kml_points(&self) -> impl Iterator<Item = &Point> {
        self.points.iter().filter(|p| p.kind == PointKind::KmlPoint)
    }

    /// Sorted, unique custom-property names found on sectors.
    pub fn sector_attribute_names(&self) -> Vec<String> {
        let names: BTreeSet<&str> = self
            .sectors()
            .flat_map(|s| s.custom_properties.names())
            .collect();
        names.into_iter().map(str::to_string).collect()
    }

    /// Sorted, unique custom-property names found on KML points.
    pub fn point_attribute_names(&self) -> Vec<String> {
        let names: BTreeSet<&str> = self
            .kml_points()
            .flat_map(|p| p.custom_properties.names())
            .collect();
        names.into_iter().map(str::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CustomProperties, MarkerShape};

    fn site(id: &str, group: &str, lat: f64, sectors: usize) -> Site {
        Site {
            id: id.into(),
            name: format!("Site {}", id),
            latitude: lat,
            longitude: 10.0,
            description: String::new(),
            group: group.into(),
            sectors: (0..sectors).map(|i| Sector::with_azimuth(i as f64 * 120.0)).collect(),
        }
    }

    fn point(id: &str, kind: PointKind, group: &str, prop: &str) -> Point {
        let mut custom_properties = CustomProperties::new();
        custom_properties.insert(prop, "1");
        Point {
            id: id.into(),
            name: id.into(),
            latitude: 1.0,
            longitude: 1.0,
            description: String::new(),
            kind,
            group: group.into(),
            color: "#ef4444".into(),
            shape: MarkerShape::Circle,
            size: 10,
            custom_properties,
        }
    }

    #[test]
    fn add_sites_drops_out_of_range() {
        let mut store = SiteStore::new();
        let accepted = store.add_sites(vec![site("a", "g", 45.0, 1), site("b", "g", 123.4, 1)]);
        assert_eq!(accepted, 1);
        assert!(store.site("a").is_some());
        assert!(store.site("b").is_none());
    }

    #[test]
    fn group_operations() {
        let mut store = SiteStore::new();
        store.add_sites(vec![site("a", "csv", 1.0, 0), site("b", "csv", 2.0, 0), site("c", "x", 3.0, 0)]);
        assert_eq!(store.rename_site_group("csv", "north"), 2);
        assert_eq!(store.remove_site_group("north"), 2);
        assert_eq!(store.sites.len(), 1);

        store.add_points(vec![
            point("p1", PointKind::KmlPoint, "a.kml", "RSRP"),
            point("p2", PointKind::Point, "manual", "Note"),
        ]);
        assert_eq!(store.rename_point_group("a.kml", "b.kml"), 1);
        assert_eq!(store.remove_point_group("b.kml"), 1);
        assert_eq!(store.points.len(), 1);
    }

    #[test]
    fn clear_kml_keeps_manual_points() {
        let mut store = SiteStore::new();
        store.add_points(vec![
            point("p1", PointKind::KmlPoint, "a.kml", "RSRP"),
            point("p2", PointKind::KmlPoint, "a.kml", "SINR"),
            point("p3", PointKind::Point, "manual", "Note"),
        ]);
        assert_eq!(store.point_attribute_names(), vec!["RSRP", "SINR"]);
        assert_eq!(store.clear_kml_points(), 2);
        assert_eq!(store.points[0].id, "p3");
        assert!(store.point_attribute_names().is_empty());
    }

    #[test]
    fn bulk_edit_touches_every_sector() {
        let mut store = SiteStore::new();
        store.add_sites(vec![site("a", "g", 1.0, 3), site("b", "g", 2.0, 2)]);
        assert_eq!(store.bulk_edit_sectors(Some(90.0), None).unwrap(), 5);
        assert!(store.sectors().all(|s| s.beamwidth == 90.0 && s.range == 500.0));
        assert!(store.bulk_edit_sectors(None, None).is_err());
    }

    #[test]
    fn edit_and_remove() {
        let mut store = SiteStore::new();
        store.add_sites(vec![site("a", "g", 1.0, 1)]);
        store.edit_site("a", "Renamed", 5.0, 6.0, "moved").unwrap();
        let s = store.site("a").unwrap();
        assert_eq!((s.name.as_str(), s.latitude, s.sectors.len()), ("Renamed", 5.0, 1));
        assert!(store.edit_site("a", "", 5.0, 6.0, "").is_err());
        assert!(store.edit_site("zzz", "X", 5.0, 6.0, "").is_err());
        assert!(store.remove_site("a").is_some());
        assert!(store.remove_site("a").is_none());
    }
}
