use std::collections::BTreeSet;

use super::{palette_mapping, AttributeKind, ThematicConfig, ThematicSettings};

fn normalized(name: &str) -> String {
    name.to_lowercase().replace('_', " ")
}

/// Whether two attribute names probably describe the same quantity, e.g.
/// `SC Physical Cell ID` on sectors and `PCI` on drive-test points.
pub fn attributes_equivalent(a: &str, b: &str) -> bool {
    let a = normalized(a);
    let b = normalized(b);

    if a == b || a.replacen("sc ", "", 1) == b.replacen("sc ", "", 1) {
        return true;
    }
    if (a == "pci" && b.contains("physical cell id")) || (b == "pci" && a.contains("physical cell id")) {
        return true;
    }
    let cell_name = |s: &str| s.contains("cell") && s.contains("name");
    cell_name(&a) && cell_name(&b)
}

/// Give two categorical legends over equivalent attributes a single shared
/// mapping, so a value has the same colour on both layers.
///
/// Returns `false` and leaves both untouched when the attributes are not
/// equivalent or either legend is numerical.
pub fn unify_legends(sites: &mut ThematicSettings, kml: &mut ThematicSettings, config: &ThematicConfig) -> bool {
    if sites.kind != AttributeKind::Categorical || kml.kind != AttributeKind::Categorical {
        return false;
    }
    if !attributes_equivalent(&sites.attribute, &kml.attribute) {
        return false;
    }

    let values: Vec<String> = sites
        .unique_values
        .iter()
        .chain(&kml.unique_values)
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let mapping = palette_mapping(&values, &config.categorical_palette);

    for settings in [sites, kml] {
        settings.mapping = mapping.clone();
        settings.unique_values = values.clone();
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Sector;
    use crate::thematic::{generate, Source};

    #[test]
    fn equivalence() {
        assert!(attributes_equivalent("SC Physical Cell ID", "Physical_Cell_ID"));
        assert!(attributes_equivalent("pci", "Physical Cell ID"));
        assert!(attributes_equivalent("cell_name", "Serving Cell Name"));
        assert!(attributes_equivalent("Band", "band"));
        assert!(!attributes_equivalent("pci", "earfcn"));
    }

    fn with_prop(name: &str, value: &str) -> Sector {
        let mut s = Sector::with_azimuth(0.0);
        s.custom_properties.insert(name, value);
        s
    }

    #[test]
    fn merges_both_value_sets() {
        let cfg = ThematicConfig::default();
        let left = vec![with_prop("PCI", "12"), with_prop("PCI", "40")];
        let right = vec![with_prop("Physical Cell ID", "7"), with_prop("Physical Cell ID", "12")];
        let mut a = generate(Source::Sites, "custom:PCI", &left, &cfg).unwrap();
        let mut b = generate(Source::Kml, "custom:Physical Cell ID", &right, &cfg).unwrap();

        assert!(unify_legends(&mut a, &mut b, &cfg));
        assert_eq!(a.unique_values, vec!["12", "40", "7"]);
        assert_eq!(a.mapping, b.mapping);
        assert_eq!(a.color_for(Some("12")), b.color_for(Some("12")));
        assert_eq!(b.color_for(Some("40")), "#ef4444");
    }

    #[test]
    fn unrelated_attributes_untouched() {
        let cfg = ThematicConfig::default();
        let left = vec![with_prop("Vendor", "A")];
        let right = vec![with_prop("Band", "B3")];
        let mut a = generate(Source::Sites, "custom:Vendor", &left, &cfg).unwrap();
        let mut b = generate(Source::Kml, "custom:Band", &right, &cfg).unwrap();
        assert!(!unify_legends(&mut a, &mut b, &cfg));
        assert_eq!(a.unique_values, vec!["A"]);
    }
}
