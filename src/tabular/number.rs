//! Lenient numeric parsing for spreadsheet cells.
//!
//! Handles European decimal commas, dotted thousands separators and
//! coordinates exported without a decimal point.

/// Upper bound on the divide-by-ten repair loop.
const MAX_SCALE_ITERATIONS: usize = 15;

/// Parse a cell into a finite number.
///
/// * more than one `.` → every dot is a thousands separator (`1.234.567`)
/// * otherwise a `,` with no `.` is a decimal comma (`48,5`)
/// * a numeric prefix is enough (`12 dBm` → 12), like a lenient float parse
///
/// With `is_coordinate`, values beyond ±180 are divided by ten until they fit,
/// at most 15 times. This is a deliberate repair for coordinates exported
/// without their decimal point (`3356858611` → `33.56858611`). It cannot
/// tell a broken export from a genuinely bad value and the last digits are
/// subject to float rounding.
pub fn parse_number(value: &str, is_coordinate: bool) -> Option<f64> {
    let clean = value.trim();
    if clean.is_empty() {
        return None;
    }

    let dots = clean.matches('.').count();
    let clean = if dots > 1 {
        clean.replace('.', "")
    } else if clean.contains(',') && dots == 0 {
        clean.replacen(',', ".", 1)
    } else {
        clean.to_string()
    };

    let num = parse_float_prefix(&clean)?;
    Some(if is_coordinate { scale_coordinate(num) } else { num })
}

/// Same rules for a JSON cell: numbers are taken as-is, strings go through
/// [`parse_number`], anything else is `None`.
pub fn parse_number_value(value: &serde_json::Value, is_coordinate: bool) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => {
            let num = n.as_f64().filter(|v| v.is_finite())?;
            Some(if is_coordinate { scale_coordinate(num) } else { num })
        }
        serde_json::Value::String(s) => parse_number(s, is_coordinate),
        _ => None,
    }
}

fn scale_coordinate(mut num: f64) -> f64 {
    let mut iterations = 0;
    while (num > 180.0 || num < -180.0) && iterations < MAX_SCALE_ITERATIONS {
        num /= 10.0;
        iterations += 1;
    }
    num
}

/// Parse the longest leading float literal: sign, digits, fraction, exponent.
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }
    if digits == 0 {
        return None;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}
