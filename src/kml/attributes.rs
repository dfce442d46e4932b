//! The placemark attribute cascade.
//!
//! Four independent sources are scanned in a fixed order and merged into one
//! list. Each stage only adds names that are still absent, so structured
//! `ExtendedData` beats anything scraped from the description, and the HTML
//! table beats loose `Key = Value` text.

use roxmltree::Node;

use super::description::{table_pairs, text_pairs};
use super::xml::{find_descendants_by_local_name, first_text, text_content};
use crate::model::CustomProperties;

/// What the cascade needs to know about one placemark.
#[derive(Debug, Clone, Copy)]
pub struct PlacemarkSource<'a, 'input> {
    pub node: Node<'a, 'input>,
    pub description: &'a str,
}

/// Run every stage in order.
pub fn extract_properties(src: &PlacemarkSource<'_, '_>) -> CustomProperties {
    let props = CustomProperties::new();
    let props = from_data(props, src);
    let props = from_simple_data(props, src);
    let props = from_html_table(props, src);
    from_text_lines(props, src)
}

/// `<Data name="k"><value>v</value></Data>`
pub fn from_data(mut props: CustomProperties, src: &PlacemarkSource<'_, '_>) -> CustomProperties {
    for data in find_descendants_by_local_name(src.node, "Data") {
        let Some(name) = data.attribute("name").filter(|n| !n.is_empty()) else {
            continue;
        };
        let value = first_text(data, "value");
        if !value.is_empty() {
            props.insert(name, value);
        }
    }
    props
}

/// `<SimpleData name="k">v</SimpleData>`, usually inside `SchemaData`.
pub fn from_simple_data(mut props: CustomProperties, src: &PlacemarkSource<'_, '_>) -> CustomProperties {
    for data in find_descendants_by_local_name(src.node, "SimpleData") {
        let Some(name) = data.attribute("name").filter(|n| !n.is_empty()) else {
            continue;
        };
        let value = text_content(data);
        let value = value.trim();
        if !value.is_empty() {
            props.insert(name, value);
        }
    }
    props
}

/// Two-column HTML table embedded in the description.
pub fn from_html_table(mut props: CustomProperties, src: &PlacemarkSource<'_, '_>) -> CustomProperties {
    if !src.description.contains("<table") {
        return props;
    }
    for (key, value) in table_pairs(src.description) {
        props.insert(key, value);
    }
    props
}

/// `Key = Value` lines separated by `<br>`.
pub fn from_text_lines(mut props: CustomProperties, src: &PlacemarkSource<'_, '_>) -> CustomProperties {
    if src.description.is_empty() {
        return props;
    }
    for (key, value) in text_pairs(src.description) {
        props.insert(key, value);
    }
    props
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kml::xml::{first_descendant, parse_document};

    fn props_for(xml: &str) -> CustomProperties {
        let doc = parse_document(xml).unwrap();
        let pm = first_descendant(doc.root(), "Placemark").unwrap();
        let description = first_text(pm, "description");
        extract_properties(&PlacemarkSource {
            node: pm,
            description: &description,
        })
    }

    #[test]
    fn structured_data_beats_description() {
        let props = props_for(
            r##"<kml><Placemark>
                <description><![CDATA[RSRP = -80<br>Band = B20]]></description>
                <ExtendedData><SchemaData schemaUrl="#s">
                    <SimpleData name="RSRP">-101</SimpleData>
                </SchemaData></ExtendedData>
            </Placemark></kml>"##,
        );
        assert_eq!(props.get("RSRP"), Some("-101"));
        assert_eq!(props.get("Band"), Some("B20"));
        assert_eq!(props.names().collect::<Vec<_>>(), vec!["RSRP", "Band"]);
    }

    #[test]
    fn data_beats_simple_data() {
        let props = props_for(
            r#"<kml><Placemark><ExtendedData>
                <Data name="PCI"><value>101</value></Data>
                <Data name="Blank"><value>  </value></Data>
                <Data><value>nameless</value></Data>
                <SchemaData><SimpleData name="PCI">999</SimpleData><SimpleData name="TAC">7</SimpleData></SchemaData>
            </ExtendedData></Placemark></kml>"#,
        );
        assert_eq!(props.get("PCI"), Some("101"));
        assert_eq!(props.get("TAC"), Some("7"));
        assert!(!props.contains("Blank"));
        assert_eq!(props.len(), 2);
    }

    #[test]
    fn table_beats_text_lines() {
        let props = props_for(
            r#"<kml><Placemark><description><![CDATA[
                <table><tr><td>Cell:</td><td>C1</td></tr></table>
                <br>Cell = C2<br>Tech = LTE
            ]]></description></Placemark></kml>"#,
        );
        assert_eq!(props.get("Cell"), Some("C1"));
        assert_eq!(props.get("Tech"), Some("LTE"));
    }

    #[test]
    fn nothing_to_extract() {
        let props = props_for("<kml><Placemark><name>x</name></Placemark></kml>");
        assert!(props.is_empty());
    }
}
