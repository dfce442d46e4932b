//! Match rows of an alarm export against a site name.

use crate::tabular::Row;

/// Columns that name the alarmed site, as exported by common OSS tools.
const SITE_COLUMNS: [&str; 7] = ["Site", "Site Name", "SITE", "Site_Name", "Sitename", "Node", "NodeName"];

fn same_name(value: &str, target: &str) -> bool {
    value.trim().to_lowercase() == target
}

/// Alarm rows that belong to `site_name`, compared trimmed and
/// case-insensitively.
///
/// The first site column of a row decides. A row without one, or with an
/// empty one, matches if any of its values equals the name.
pub fn alarms_for_site<'a>(rows: &'a [Row], site_name: &str) -> Vec<&'a Row> {
    let target = site_name.trim().to_lowercase();
    rows.iter()
        .filter(|row| {
            let named = row
                .iter()
                .find(|(k, _)| SITE_COLUMNS.contains(k))
                .map(|(_, v)| v)
                .filter(|v| !v.is_empty());
            match named {
                Some(v) => same_name(v, &target),
                None => row.values().any(|v| !v.is_empty() && same_name(v, &target)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[(&str, &str)]) -> Row {
        cells.iter().copied().collect()
    }

    #[test]
    fn matches_site_column_case_insensitively() {
        let rows = vec![
            row(&[("Severity", "Major"), ("Site Name", " PAR_001 ")]),
            row(&[("Severity", "Minor"), ("Site Name", "LYO_002")]),
            row(&[("NodeName", "par_001"), ("Site", "other")]),
        ];
        let hits = alarms_for_site(&rows, "par_001");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].get("Severity"), Some("Major"));
        assert_eq!(hits[1].get("Site"), Some("other"));
    }

    #[test]
    fn falls_back_to_any_value() {
        let rows = vec![
            row(&[("Object", "PAR_001"), ("Text", "Link down")]),
            row(&[("Object", "PAR_0011")]),
            row(&[("Site", ""), ("Equipment", "par_001")]),
        ];
        let hits = alarms_for_site(&rows, "PAR_001");
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn empty_input() {
        assert!(alarms_for_site(&[], "x").is_empty());
    }
}
