//! Namespace-oblivious element lookup over a `roxmltree` document.
//!
//! KML files routinely mix the default namespace with vendor extensions
//! (`gx:`, `atom:`, tool-specific prefixes). Lookups here compare the local
//! tag name only.

use roxmltree::{Document, Node, ParsingOptions};

use crate::error::{ImportError, Result};

/// Parse XML text, mapping any structural error to `MalformedDocument`.
pub fn parse_document(text: &str) -> Result<Document<'_>> {
    let opts = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    Document::parse_with_options(text, opts).map_err(|e| ImportError::MalformedDocument {
        message: e.to_string(),
    })
}

/// Every element below `node` (not `node` itself) whose local name is
/// `name`, in document order.
pub fn find_descendants_by_local_name<'a, 'input>(
    node: Node<'a, 'input>,
    name: &str,
) -> Vec<Node<'a, 'input>> {
    let mut out = Vec::new();
    collect(node, name, &mut out);
    out
}

fn collect<'a, 'input>(node: Node<'a, 'input>, name: &str, out: &mut Vec<Node<'a, 'input>>) {
    for child in node.children().filter(|n| n.is_element()) {
        if child.tag_name().name() == name {
            out.push(child);
        }
        collect(child, name, out);
    }
}

/// First descendant with the given local name, in document order.
pub fn first_descendant<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    for child in node.children().filter(|n| n.is_element()) {
        if child.tag_name().name() == name {
            return Some(child);
        }
        if let Some(found) = first_descendant(child, name) {
            return Some(found);
        }
    }
    None
}

/// Concatenated text of every text and CDATA node below `node`.
pub fn text_content(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

/// Trimmed text of the first descendant called `name`, or `""`.
pub fn first_text(node: Node<'_, '_>, name: &str) -> String {
    first_descendant(node, name)
        .map(|n| text_content(n).trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"<?xml version="1.0"?>
<kml xmlns="http://www.opengis.net/kml/2.2" xmlns:gx="http://www.google.com/kml/ext/2.2">
  <Placemark>
    <name> Alpha </name>
    <ExtendedData>
      <Data name="a"><value>1</value></Data>
      <gx:Data name="b"><gx:value>2</gx:value></gx:Data>
    </ExtendedData>
    <description><![CDATA[<b>x</b>]]></description>
  </Placemark>
</kml>"#;

    #[test]
    fn local_name_ignores_prefix() {
        let doc = parse_document(DOC).unwrap();
        let data = find_descendants_by_local_name(doc.root(), "Data");
        assert_eq!(data.len(), 2);
        assert_eq!(data[1].attribute("name"), Some("b"));
        assert_eq!(first_text(data[1], "value"), "2");
    }

    #[test]
    fn text_helpers() {
        let doc = parse_document(DOC).unwrap();
        let pm = first_descendant(doc.root(), "Placemark").unwrap();
        assert_eq!(first_text(pm, "name"), "Alpha");
        assert_eq!(first_text(pm, "description"), "<b>x</b>");
        assert_eq!(first_text(pm, "missing"), "");
    }

    #[test]
    fn self_is_not_a_descendant() {
        let doc = parse_document(DOC).unwrap();
        let pm = first_descendant(doc.root(), "Placemark").unwrap();
        assert!(find_descendants_by_local_name(pm, "Placemark").is_empty());
    }

    #[test]
    fn malformed_is_reported() {
        let err = parse_document("<kml><Placemark></kml>").unwrap_err();
        assert!(matches!(err, ImportError::MalformedDocument { .. }));
    }
}
