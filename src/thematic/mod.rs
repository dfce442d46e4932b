//! Thematic colouring: decide whether an attribute is categorical or
//! numerical, then build a value → colour legend for it.

pub mod config;
pub mod legend;

pub use config::{MetricThresholds, RangeSpec, ThematicConfig};
pub use legend::{attributes_equivalent, unify_legends};

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::model::{Point, Sector, SiteStore};
use crate::tabular::number::{parse_float_prefix, parse_number};

const CUSTOM_PREFIX: &str = "custom:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
    Categorical,
    Numerical,
}

/// Which layer a legend colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Every sector of every site.
    Sites,
    /// Imported KML points only.
    Kml,
}

/// Anything a legend can be computed over.
pub trait Attributed {
    fn standard_field(&self, name: &str) -> Option<String>;
    fn custom_property(&self, name: &str) -> Option<&str>;
}

impl Attributed for Sector {
    fn standard_field(&self, name: &str) -> Option<String> {
        self.field(name)
    }

    fn custom_property(&self, name: &str) -> Option<&str> {
        self.custom_properties.get(name)
    }
}

impl Attributed for Point {
    fn standard_field(&self, name: &str) -> Option<String> {
        self.attribute(name)
    }

    fn custom_property(&self, name: &str) -> Option<&str> {
        self.custom_properties.get(name)
    }
}

/// A numeric band of a legend. `None` bounds are open-ended.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub color: String,
    pub label: String,
    pub count: usize,
}

impl ValueRange {
    /// Both bounds inclusive, so a value on a shared edge lands in the
    /// earlier range.
    pub fn contains(&self, v: f64) -> bool {
        self.min.map_or(true, |m| v >= m) && self.max.map_or(true, |m| v <= m)
    }
}

impl From<&RangeSpec> for ValueRange {
    fn from(band: &RangeSpec) -> Self {
        Self {
            min: band.min,
            max: band.max,
            color: band.color.clone(),
            label: band.label.clone(),
            count: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThematicSettings {
    pub source: Source,
    /// Attribute name without the `custom:` prefix.
    pub attribute: String,
    pub is_custom: bool,
    pub kind: AttributeKind,
    /// Number of items carrying a non-empty value.
    pub total: usize,
    pub counts: BTreeMap<String, usize>,
    pub unique_values: Vec<String>,
    /// Categorical legends only.
    pub mapping: BTreeMap<String, String>,
    /// Numerical legends only.
    pub ranges: Vec<ValueRange>,
    pub fallback_color: String,
}

impl ThematicSettings {
    /// Colour for a raw attribute value, or the fallback colour.
    pub fn color_for(&self, value: Option<&str>) -> &str {
        let Some(value) = value else {
            return &self.fallback_color;
        };
        let hit = match self.kind {
            AttributeKind::Categorical => self.mapping.get(value).map(String::as_str),
            AttributeKind::Numerical => parse_float_prefix(value)
                .and_then(|v| self.ranges.iter().find(|r| r.contains(v)))
                .map(|r| r.color.as_str()),
        };
        hit.unwrap_or(&self.fallback_color)
    }

    /// Colour for an item, looking its value up the same way the legend was built.
    pub fn color_of<T: Attributed>(&self, item: &T) -> &str {
        let value = value_of(item, &self.attribute, self.is_custom);
        self.color_for(value.as_deref())
    }
}

/// `custom:<name>` selects a custom property; anything else a standard field.
pub fn split_attribute(attribute: &str) -> (&str, bool) {
    match attribute.strip_prefix(CUSTOM_PREFIX) {
        Some(name) => (name, true),
        None => (attribute, false),
    }
}

fn value_of<T: Attributed>(item: &T, name: &str, is_custom: bool) -> Option<String> {
    if is_custom {
        item.custom_property(name).map(str::to_string)
    } else {
        item.standard_field(name)
    }
}

/// Categorical or numerical, by name first and by the observed values otherwise.
pub fn classify(attribute: &str, values: &[&str], config: &ThematicConfig) -> AttributeKind {
    let lower = attribute.to_lowercase();

    if config.categorical_substrings.iter().any(|s| lower.contains(s.as_str()))
        || config.categorical_names.iter().any(|n| *n == lower)
    {
        return AttributeKind::Categorical;
    }
    if config.numerical_substrings.iter().any(|s| lower.contains(s.as_str())) {
        return AttributeKind::Numerical;
    }

    let all_numeric = values.iter().all(|v| parse_number(v, false).is_some());
    let distinct = values.iter().collect::<BTreeSet<_>>().len();
    if all_numeric && distinct > config.categorical_max_distinct {
        AttributeKind::Numerical
    } else {
        AttributeKind::Categorical
    }
}

/// Build a legend for `attribute` over `items`.
///
/// Returns `None` when there are no items or none of them carries a value.
pub fn generate<'a, T, I>(
    source: Source,
    attribute: &str,
    items: I,
    config: &ThematicConfig,
) -> Option<ThematicSettings>
where
    T: Attributed + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let (name, is_custom) = split_attribute(attribute);

    let values: Vec<String> = items
        .into_iter()
        .filter_map(|item| value_of(item, name, is_custom))
        .filter(|v| !v.is_empty())
        .collect();
    if values.is_empty() {
        return None;
    }

    let mut counts = BTreeMap::new();
    for v in &values {
        *counts.entry(v.clone()).or_insert(0) += 1;
    }
    let unique_values: Vec<String> = counts.keys().cloned().collect();

    let refs: Vec<&str> = values.iter().map(String::as_str).collect();
    let kind = classify(name, &refs, config);

    let mut settings = ThematicSettings {
        source,
        attribute: name.to_string(),
        is_custom,
        kind,
        total: values.len(),
        counts,
        unique_values,
        mapping: BTreeMap::new(),
        ranges: Vec::new(),
        fallback_color: config.fallback_color.clone(),
    };

    match kind {
        AttributeKind::Numerical => {
            let numbers: Vec<f64> = refs.iter().filter_map(|v| parse_number(v, false)).collect();
            settings.ranges = numeric_ranges(name, &numbers, config);
        }
        AttributeKind::Categorical => {
            settings.mapping = palette_mapping(&settings.unique_values, &config.categorical_palette);
        }
    }

    log::debug!(
        "thematic {:?}/{}: {:?}, {} values, {} distinct",
        source,
        settings.attribute,
        kind,
        settings.total,
        settings.unique_values.len()
    );
    Some(settings)
}

/// Legend for one layer of a store.
pub fn generate_for_store(
    store: &SiteStore,
    source: Source,
    attribute: &str,
    config: &ThematicConfig,
) -> Option<ThematicSettings> {
    match source {
        Source::Sites => generate(source, attribute, store.sectors(), config),
        Source::Kml => generate(source, attribute, store.kml_points(), config),
    }
}

pub(crate) fn palette_mapping(values: &[String], palette: &[String]) -> BTreeMap<String, String> {
    if palette.is_empty() {
        return BTreeMap::new();
    }
    values
        .iter()
        .enumerate()
        .map(|(i, v)| (v.clone(), palette[i % palette.len()].clone()))
        .collect()
}

fn numeric_ranges(name: &str, numbers: &[f64], config: &ThematicConfig) -> Vec<ValueRange> {
    let mut ranges: Vec<ValueRange> = match config.thresholds_for(name) {
        Some(table) => table.ranges.iter().map(ValueRange::from).collect(),
        None => equal_width_buckets(numbers, config),
    };
    for &v in numbers {
        if let Some(r) = ranges.iter_mut().find(|r| r.contains(v)) {
            r.count += 1;
        }
    }
    ranges
}

fn equal_width_buckets(numbers: &[f64], config: &ThematicConfig) -> Vec<ValueRange> {
    let n = config.bucket_count.max(1);
    let min = numbers.iter().copied().fold(f64::INFINITY, f64::min);
    let max = numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    let step = (max - min) / n as f64;

    (0..n)
        .map(|i| {
            let lo = min + i as f64 * step;
            // Pin the top edge so rounding never leaves the maximum outside.
            let hi = if i + 1 == n { max } else { min + (i + 1) as f64 * step };
            let color = config
                .numeric_ramp
                .get(i)
                .or_else(|| config.numeric_ramp.last())
                .cloned()
                .unwrap_or_else(|| config.fallback_color.clone());
            ValueRange {
                min: Some(lo),
                max: Some(hi),
                color,
                label: format!("{} - {}", lo.round(), hi.round()),
                count: 0,
            }
        })
        .collect()
}

/// Fixed colour per radio generation, used when no legend is active.
pub fn technology_color(technology: &str) -> &'static str {
    let tech = technology.to_lowercase();
    if tech.contains("5g") {
        "#8b5cf6"
    } else if tech.contains("4g") || tech.contains("lte") {
        "#6366f1"
    } else if tech.contains("3g") {
        "#10b981"
    } else if tech.contains("2g") {
        "#f59e0b"
    } else {
        "#ec4899"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sector(tech: &str, rsrp: &str) -> Sector {
        let mut s = Sector::with_azimuth(0.0);
        s.technology = tech.into();
        if !rsrp.is_empty() {
            s.custom_properties.insert("RSRP", rsrp);
        }
        s
    }

    #[test]
    fn forced_kinds() {
        let cfg = ThematicConfig::default();
        let many = ["1", "2", "3", "4", "5", "6", "7"];
        assert_eq!(classify("PCI", &many, &cfg), AttributeKind::Categorical);
        assert_eq!(classify("DL EARFCN", &many, &cfg), AttributeKind::Categorical);
        assert_eq!(classify("Cell_Name", &many, &cfg), AttributeKind::Categorical);
        assert_eq!(classify("RSRP", &["a", "b"], &cfg), AttributeKind::Numerical);
    }

    #[test]
    fn heuristic_needs_more_than_five_distinct_numbers() {
        let cfg = ThematicConfig::default();
        assert_eq!(classify("height", &["1", "2", "3", "4", "5"], &cfg), AttributeKind::Categorical);
        assert_eq!(
            classify("height", &["1", "2", "3", "4", "5", "6"], &cfg),
            AttributeKind::Numerical
        );
        assert_eq!(
            classify("height", &["1", "2", "3", "4", "5", "x"], &cfg),
            AttributeKind::Categorical
        );
    }

    #[test]
    fn categorical_legend_cycles_palette_in_sorted_order() {
        let cfg = ThematicConfig::default();
        let sectors = vec![sector("LTE", ""), sector("GSM", ""), sector("LTE", ""), sector("", "")];
        let s = generate(Source::Sites, "technology", &sectors, &cfg).unwrap();
        assert_eq!(s.kind, AttributeKind::Categorical);
        assert_eq!(s.total, 3);
        assert_eq!(s.unique_values, vec!["GSM", "LTE"]);
        assert_eq!(s.counts["LTE"], 2);
        assert_eq!(s.mapping["GSM"], "#3b82f6");
        assert_eq!(s.mapping["LTE"], "#ef4444");
        assert_eq!(s.color_of(&sectors[0]), "#ef4444");
        assert_eq!(s.color_of(&sectors[3]), "#999999");
    }

    #[test]
    fn rsrp_uses_fixed_thresholds() {
        let cfg = ThematicConfig::default();
        let sectors = vec![sector("", "-115"), sector("", "-110"), sector("", "-105"), sector("", "-90")];
        let s = generate(Source::Sites, "custom:RSRP", &sectors, &cfg).unwrap();
        assert!(s.is_custom);
        assert_eq!(s.kind, AttributeKind::Numerical);
        assert_eq!(s.ranges.len(), 3);
        assert_eq!(s.ranges.iter().map(|r| r.count).collect::<Vec<_>>(), vec![2, 1, 1]);
        assert_eq!(s.color_for(Some("-120")), "#ef4444");
        assert_eq!(s.color_for(Some("-104.5 dBm")), "#eab308");
        assert_eq!(s.color_for(Some("-80")), "#22c55e");
        assert_eq!(s.color_for(Some("n/a")), "#999999");
        assert_eq!(s.color_for(None), "#999999");
    }

    #[test]
    fn generic_numbers_get_five_buckets() {
        let cfg = ThematicConfig::default();
        let mut generic = Vec::new();
        for i in 0..=10 {
            let mut sec = Sector::with_azimuth(0.0);
            sec.custom_properties.insert("Height", (i * 10).to_string());
            generic.push(sec);
        }
        let s = generate(Source::Sites, "custom:Height", &generic, &cfg).unwrap();
        assert_eq!(s.kind, AttributeKind::Numerical);
        assert_eq!(s.ranges.len(), 5);
        assert_eq!(s.ranges[0].label, "0 - 20");
        assert_eq!(s.ranges[4].max, Some(100.0));
        assert_eq!(s.ranges[0].color, "#fee2e2");
        assert_eq!(s.ranges.iter().map(|r| r.count).sum::<usize>(), 11);
        assert_eq!(s.color_for(Some("100")), "#b91c1c");
    }

    #[test]
    fn no_values_means_no_legend() {
        let cfg = ThematicConfig::default();
        let sectors = vec![sector("", "")];
        assert!(generate(Source::Sites, "custom:RSRP", &sectors, &cfg).is_none());
        let none: Vec<Sector> = Vec::new();
        assert!(generate(Source::Sites, "technology", &none, &cfg).is_none());
    }

    #[test]
    fn technology_palette() {
        assert_eq!(technology_color("5G NR"), "#8b5cf6");
        assert_eq!(technology_color("LTE"), "#6366f1");
        assert_eq!(technology_color("3G"), "#10b981");
        assert_eq!(technology_color("2g"), "#f59e0b");
        assert_eq!(technology_color(""), "#ec4899");
    }
}
