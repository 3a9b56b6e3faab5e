//! Display formatting for KPI values.

/// Shown wherever a value is absent or unusable.
pub const DASH: &str = "—";

const BYTES_PER_MB: f64 = 1_048_576.0;

/// Plain number text: `28`, `1.5`. Non-finite input renders as `0`.
pub fn number(v: f64) -> String {
    if v.is_finite() {
        format!("{}", v)
    } else {
        "0".to_string()
    }
}

/// Number with thousands separators (`1,234,567`); fractions keep up to three digits.
pub fn grouped(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let neg = v < 0.0;
    let rounded = format!("{:.3}", v.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(int_part.len() + int_part.len() / 3 + frac.len() + 2);
    if neg && (int_part != "0" || !frac.is_empty()) {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Fixed decimals, treating an absent value as 0.
pub fn fixed_or_zero(v: Option<f64>, decimals: usize) -> String {
    format!("{:.*}", decimals, v.unwrap_or(0.0))
}

/// Fixed decimals, or [`DASH`] when absent.
pub fn fixed_or_dash(v: Option<f64>, decimals: usize) -> String {
    match v {
        Some(x) => format!("{:.*}", decimals, x),
        None => DASH.to_string(),
    }
}

pub fn megabytes(bytes: f64) -> String {
    format!("{:.2} MB", bytes / BYTES_PER_MB)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grouped_inserts_separators() {
        assert_eq!(grouped(0.0), "0");
        assert_eq!(grouped(999.0), "999");
        assert_eq!(grouped(1000.0), "1,000");
        assert_eq!(grouped(1_234_567.0), "1,234,567");
        assert_eq!(grouped(-45_000.0), "-45,000");
        assert_eq!(grouped(12_345.5), "12,345.5");
        assert_eq!(grouped(0.1234), "0.123");
        assert_eq!(grouped(f64::NAN), "0");
    }

    #[test]
    fn number_matches_plain_text() {
        assert_eq!(number(28.0), "28");
        assert_eq!(number(1.5), "1.5");
        assert_eq!(number(f64::INFINITY), "0");
    }

    #[test]
    fn fixed_variants() {
        assert_eq!(fixed_or_zero(Some(1834.25), 3), "1834.250");
        assert_eq!(fixed_or_zero(None, 2), "0.00");
        assert_eq!(fixed_or_dash(Some(4.0), 3), "4.000");
        assert_eq!(fixed_or_dash(None, 3), DASH);
    }

    #[test]
    fn megabytes_two_decimals() {
        assert_eq!(megabytes(7_340_032.0), "7.00 MB");
        assert_eq!(megabytes(1_572_864.0), "1.50 MB");
    }
}
