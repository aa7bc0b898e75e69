//! Number formatting for advisory messages.
//!
//! Amounts are shown the way the web client prints them: rounded to whole
//! units, comma thousands separator, `$` prefix.

/// Round to the nearest integer, halves towards positive infinity.
pub fn round_half_up(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    (value + 0.5).floor() as i64
}

/// Whole-unit amount with thousands separators, e.g. `1,235` for `1234.6`.
pub fn whole_amount(value: f64) -> String {
    let rounded = round_half_up(value);
    let digits = format_with_thousands(rounded.unsigned_abs(), ',');
    if rounded < 0 {
        format!("-{digits}")
    } else {
        digits
    }
}

/// Whole-unit amount with a `$` prefix, e.g. `$1,200`.
pub fn dollars(value: f64) -> String {
    format!("${}", whole_amount(value))
}

/// Rounded percentage without the sign, e.g. `33` for `33.4`.
pub fn whole_percent(value: f64) -> String {
    round_half_up(value).to_string()
}

fn format_with_thousands(n: u64, sep: char) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);

    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(sep);
        }
        result.push(c);
    }

    result
}
