//! Cell normalisation and answer formatting helpers.

/// Cell spellings that mean "no value" in exported tables.
const MISSING_MARKERS: &[&str] = &["", "nan", "none", "null", "nat", "n/a"];

/// Whether a raw cell carries no usable value.
pub fn is_missing(cell: &str) -> bool {
    let trimmed = cell.trim();
    MISSING_MARKERS
        .iter()
        .any(|m| trimmed.eq_ignore_ascii_case(m))
}

/// Boolean-like cell: `True`, `"True"`, `Yes`, `Y`, `1` all count as true.
pub fn is_truthy(cell: &str) -> bool {
    matches!(
        cell.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "y" | "1"
    )
}

/// Parse a numeric cell, tolerating `$` and thousands separators.
pub fn parse_number(cell: &str) -> Option<f64> {
    let cleaned: String = cell
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '$')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Format an amount as US currency: `61933.0` → `$61,933.00`.
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let digits = (cents / 100).to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}

/// Capitalise the first letter of every word, lower-case the rest.
///
/// A "word" starts after any non-alphabetic character, so `o'neil` becomes
/// `O'Neil` and `new york` becomes `New York`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_grouping() {
        assert_eq!(format_currency(61933.0), "$61,933.00");
        assert_eq!(format_currency(1234567.891), "$1,234,567.89");
        assert_eq!(format_currency(999.5), "$999.50");
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(-1500.0), "-$1,500.00");
    }

    #[test]
    fn title_case_words() {
        assert_eq!(title_case("miami"), "Miami");
        assert_eq!(title_case("new york"), "New York");
        assert_eq!(title_case("SALES team"), "Sales Team");
        assert_eq!(title_case("o'neil"), "O'Neil");
    }

    #[test]
    fn truthy_variants() {
        for v in ["True", "true", "Yes", "YES", "y", "1", " True "] {
            assert!(is_truthy(v), "{v} should be truthy");
        }
        for v in ["False", "No", "", "0", "maybe"] {
            assert!(!is_truthy(v), "{v} should be falsy");
        }
    }

    #[test]
    fn numbers_with_separators() {
        assert_eq!(parse_number("61,933"), Some(61933.0));
        assert_eq!(parse_number("$85,000.50"), Some(85000.5));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("NaN"), None);
    }

    #[test]
    fn missing_markers() {
        assert!(is_missing(""));
        assert!(is_missing("NaN"));
        assert!(is_missing(" none "));
        assert!(!is_missing("Austin"));
    }
}
