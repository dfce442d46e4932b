//! Attribute extraction from free-form placemark descriptions.
//!
//! Tools that cannot write `ExtendedData` tend to stuff attributes into the
//! description instead, either as an HTML table or as `Key = Value` lines
//! separated by `<br>`.

use scraper::{ElementRef, Html, Selector};

/// `(key, value)` pairs from every `<tr>` with at least two `<td>` cells.
///
/// The first cell is the key (one trailing `:` removed), the second the
/// value. Rows with an empty key or value are dropped.
pub fn table_pairs(html: &str) -> Vec<(String, String)> {
    let fragment = Html::parse_fragment(html);
    let (Ok(tr), Ok(td)) = (Selector::parse("tr"), Selector::parse("td")) else {
        return Vec::new();
    };

    let mut pairs = Vec::new();
    for row in fragment.select(&tr) {
        let cells: Vec<ElementRef<'_>> = row.select(&td).collect();
        if cells.len() < 2 {
            continue;
        }
        let key = cell_text(cells[0]);
        let key = key.strip_suffix(':').unwrap_or(&key).trim_end().to_string();
        let value = cell_text(cells[1]);
        if !key.is_empty() && !value.is_empty() {
            pairs.push((key, value));
        }
    }
    pairs
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// `(key, value)` pairs from `Key = Value` lines split on `<br>` tags.
///
/// Lines that start with a tag are markup, not data. Only the first `=`
/// separates key from value, so values may contain `=` themselves.
pub fn text_pairs(description: &str) -> Vec<(String, String)> {
    split_on_br(description)
        .into_iter()
        .filter(|line| !line.trim_start().starts_with('<'))
        .filter_map(|line| {
            let (key, value) = line.split_once('=')?;
            let (key, value) = (key.trim(), value.trim());
            (!key.is_empty() && !value.is_empty()).then(|| (key.to_string(), value.to_string()))
        })
        .collect()
}

/// Split on `<br>`, `<br/>`, `<br />` in any letter case.
fn split_on_br(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'<' {
            if let Some(len) = br_tag_len(&bytes[i..]) {
                lines.push(&text[start..i]);
                i += len;
                start = i;
                continue;
            }
        }
        i += 1;
    }
    lines.push(&text[start..]);
    lines
}

/// Length of a `<br\s*/?>` tag at the start of `s`.
fn br_tag_len(s: &[u8]) -> Option<usize> {
    if s.len() < 4 || !s[1].eq_ignore_ascii_case(&b'b') || !s[2].eq_ignore_ascii_case(&b'r') {
        return None;
    }
    let mut i = 3;
    while i < s.len() && s[i].is_ascii_whitespace() {
        i += 1;
    }
    if i < s.len() && s[i] == b'/' {
        i += 1;
    }
    (i < s.len() && s[i] == b'>').then_some(i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_table_rows() {
        let html = r#"
            <table>
              <tr><th>Header</th><th>Ignored</th></tr>
              <tr><td>Site ID:</td><td> PAR-001 </td></tr>
              <tr><td>Band</td><td><b>B3</b></td><td>extra</td></tr>
              <tr><td>Empty</td><td></td></tr>
              <tr><td>Lonely</td></tr>
            </table>"#;
        assert_eq!(
            table_pairs(html),
            vec![
                ("Site ID".to_string(), "PAR-001".to_string()),
                ("Band".to_string(), "B3".to_string()),
            ]
        );
    }

    #[test]
    fn key_value_lines() {
        let desc = "Site ID = CoMPT01<br>Formula = a=b<BR/>  <b>bold</b> = no<br />Empty =<br>NoEquals";
        assert_eq!(
            text_pairs(desc),
            vec![
                ("Site ID".to_string(), "CoMPT01".to_string()),
                ("Formula".to_string(), "a=b".to_string()),
            ]
        );
    }

    #[test]
    fn br_variants() {
        assert_eq!(split_on_br("a<br>b<Br  />c<bR/>d"), vec!["a", "b", "c", "d"]);
        assert_eq!(split_on_br("a<b>c</b>"), vec!["a<b>c</b>"]);
        assert_eq!(split_on_br("<br"), vec!["<br"]);
    }
}
