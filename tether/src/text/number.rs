//! Decimal number formatting with configurable separators.

use crate::error::ParseError;

/// Format `value` with a fixed number of fraction digits.
pub(crate) fn format(value: f64, fraction_digits: usize, decimal: char, grouping: Option<char>) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let plain = format!("{:.*}", fraction_digits, value.abs());
    let (integer, fraction) = match plain.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (plain.as_str(), None),
    };

    let mut out = String::with_capacity(plain.len() + integer.len() / 3 + 1);
    if value.is_sign_negative() && plain.chars().any(|c| c != '0' && c != '.') {
        out.push('-');
    }
    let len = integer.len();
    for (index, digit) in integer.chars().enumerate() {
        if index > 0
            && (len - index) % 3 == 0
            && let Some(separator) = grouping
        {
            out.push(separator);
        }
        out.push(digit);
    }
    if let Some(fraction) = fraction {
        out.push(decimal);
        out.push_str(fraction);
    }
    out
}

/// Parse text produced by [`format`] or typed by a user.
///
/// Grouping separators are ignored anywhere in the integer part.
pub(crate) fn parse(text: &str, decimal: char, grouping: Option<char>) -> Result<f64, ParseError> {
    let trimmed = text.trim();
    let normalized: String = trimmed
        .chars()
        .filter(|c| Some(*c) != grouping)
        .map(|c| if c == decimal { '.' } else { c })
        .collect();

    let valid_chars = normalized
        .chars()
        .enumerate()
        .all(|(index, c)| c.is_ascii_digit() || c == '.' || (index == 0 && (c == '-' || c == '+')));
    if normalized.is_empty() || !valid_chars {
        return Err(ParseError::new(text, "number"));
    }

    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ParseError::new(text, "number")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_groups_thousands() {
        assert_eq!(format(1234567.891, 2, '.', Some(',')), "1,234,567.89");
        assert_eq!(format(-1234.5, 1, ',', Some('.')), "-1.234,5");
        assert_eq!(format(999.0, 0, '.', Some(',')), "999");
    }

    #[test]
    fn test_format_negative_zero() {
        assert_eq!(format(-0.001, 2, '.', None), "0.00");
    }

    #[test]
    fn test_parse_with_separators() {
        assert_eq!(parse(" 1,234.5 ", '.', Some(',')), Ok(1234.5));
        assert_eq!(parse("1.234,5", ',', Some('.')), Ok(1234.5));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse("12a", '.', Some(',')).is_err());
        assert!(parse("", '.', None).is_err());
        assert!(parse("inf", '.', None).is_err());
        assert!(parse("1.2.3", '.', None).is_err());
    }
}
