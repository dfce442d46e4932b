//! Tunable defaults for thematic classification.
//!
//! Everything here can be overridden from a JSON file; omitted fields keep
//! their default.

use serde::{Deserialize, Serialize};

/// One band of a fixed threshold table. `None` bounds are open-ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeSpec {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub color: String,
    pub label: String,
}

impl RangeSpec {
    fn new(min: Option<f64>, max: Option<f64>, color: &str, label: &str) -> Self {
        Self {
            min,
            max,
            color: color.into(),
            label: label.into(),
        }
    }
}

/// Fixed ranges for attributes whose name contains any of `patterns`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricThresholds {
    pub patterns: Vec<String>,
    pub ranges: Vec<RangeSpec>,
}

const POOR: &str = "#ef4444";
const FAIR: &str = "#eab308";
const GOOD: &str = "#22c55e";

fn three_band(patterns: &[&str], low: f64, high: f64, labels: [&str; 3]) -> MetricThresholds {
    MetricThresholds {
        patterns: patterns.iter().map(|p| p.to_string()).collect(),
        ranges: vec![
            RangeSpec::new(None, Some(low), POOR, labels[0]),
            RangeSpec::new(Some(low), Some(high), FAIR, labels[1]),
            RangeSpec::new(Some(high), None, GOOD, labels[2]),
        ],
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThematicConfig {
    /// Cycled through for categorical values, in sorted value order.
    pub categorical_palette: Vec<String>,
    /// One colour per equal-width bucket, low to high.
    pub numeric_ramp: Vec<String>,
    pub bucket_count: usize,
    /// Colour for values that match no category or range.
    pub fallback_color: String,
    /// A numeric-looking attribute needs more distinct values than this
    /// to be treated as numerical.
    pub categorical_max_distinct: usize,
    /// Lower-cased attribute names that are always categorical.
    pub categorical_names: Vec<String>,
    /// Substrings that force categorical treatment, checked first.
    pub categorical_substrings: Vec<String>,
    /// Substrings that force numerical treatment.
    pub numerical_substrings: Vec<String>,
    /// Checked in order; first table whose pattern matches wins.
    pub metric_thresholds: Vec<MetricThresholds>,
}

impl Default for ThematicConfig {
    fn default() -> Self {
        let strings = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            categorical_palette: strings(&[
                "#3b82f6", "#ef4444", "#10b981", "#f59e0b", "#8b5cf6", "#ec4899", "#6366f1",
                "#14b8a6",
            ]),
            numeric_ramp: strings(&["#fee2e2", "#fca5a5", "#f87171", "#ef4444", "#b91c1c"]),
            bucket_count: 5,
            fallback_color: "#999999".into(),
            categorical_max_distinct: 5,
            categorical_names: strings(&[
                "technology",
                "name",
                "group",
                "sc physical cell id",
                "physical cell id",
                "pci",
                "cell name",
                "cell_name",
            ]),
            categorical_substrings: strings(&["earfcn"]),
            numerical_substrings: strings(&[
                "throughput", "couverture", "rsrp", "rxlev", "rscp", "sinr", "rsrq",
            ]),
            metric_thresholds: vec![
                three_band(
                    &["throughput", "http download"],
                    2000.0,
                    5000.0,
                    ["Poor (< 2000)", "Fair (2000-5000)", "Excellent (> 5000)"],
                ),
                three_band(
                    &["couverture", "rsrp"],
                    -110.0,
                    -100.0,
                    ["Poor (<= -110)", "Fair (-110 to -100)", "Excellent (> -100)"],
                ),
                three_band(
                    &["rxlev"],
                    -95.0,
                    -85.0,
                    ["Poor (<= -95)", "Fair (-95 to -85)", "Excellent (> -85)"],
                ),
                three_band(
                    &["rscp"],
                    -100.0,
                    -90.0,
                    ["Poor (<= -100)", "Fair (-100 to -90)", "Excellent (> -90)"],
                ),
                three_band(
                    &["sinr"],
                    0.0,
                    15.0,
                    ["Poor (< 0 dB)", "Fair (0-15 dB)", "Excellent (> 15 dB)"],
                ),
                three_band(
                    &["rsrq"],
                    -15.0,
                    -10.0,
                    ["Poor (< -15 dB)", "Fair (-15 to -10 dB)", "Excellent (> -10 dB)"],
                ),
            ],
        }
    }
}

impl ThematicConfig {
    pub fn from_json(text: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Threshold table for an attribute name, if it names a known RF metric.
    pub fn thresholds_for(&self, attribute: &str) -> Option<&MetricThresholds> {
        let lower = attribute.to_lowercase();
        self.metric_thresholds
            .iter()
            .find(|t| t.patterns.iter().any(|p| lower.contains(p.as_str())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = ThematicConfig::from_json(r##"{"fallback_color": "#000000", "bucket_count": 4}"##).unwrap();
        assert_eq!(cfg.fallback_color, "#000000");
        assert_eq!(cfg.bucket_count, 4);
        assert_eq!(cfg.categorical_palette.len(), 8);
    }

    #[test]
    fn rsrp_thresholds() {
        let cfg = ThematicConfig::default();
        let t = cfg.thresholds_for("Serving RSRP (dBm)").unwrap();
        assert_eq!(t.ranges[0].max, Some(-110.0));
        assert_eq!(t.ranges[2].min, Some(-100.0));
        assert!(cfg.thresholds_for("Owner").is_none());
    }
}
