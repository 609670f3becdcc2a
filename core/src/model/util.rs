use serde::{Deserialize, Deserializer};

/// Sizes written by older clients may be numbers, strings (`"2.40"`,
/// `"2.4 MB"`) or `null`. Strings are read up to the end of their leading
/// number. Anything without one becomes `NaN`.
pub fn deserialize_lenient_size<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(serde_json::Value::String(s)) => parse_leading_number(&s),
        _ => f64::NAN,
    })
}

/// Parses the longest decimal number at the start of `text` after leading
/// whitespace, ignoring whatever follows. `NaN` if there is none.
pub fn parse_leading_number(text: &str) -> f64 {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let digits_from = |from: usize| {
        bytes
            .get(from..)
            .map_or(0, |rest| rest.iter().take_while(|b| b.is_ascii_digit()).count())
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    if text[end..].starts_with("Infinity") {
        return if text.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_digits = digits_from(end);
    end += int_digits;
    if bytes.get(end) == Some(&b'.') {
        let frac_digits = digits_from(end + 1);
        if frac_digits > 0 {
            end += 1 + frac_digits;
        } else if int_digits == 0 {
            return f64::NAN;
        }
    } else if int_digits == 0 {
        return f64::NAN;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_start = end + 1;
        if matches!(bytes.get(exp_start), Some(b'+' | b'-')) {
            exp_start += 1;
        }
        let exp_digits = digits_from(exp_start);
        if exp_digits > 0 {
            end = exp_start + exp_digits;
        }
    }

    text[..end].parse().unwrap_or(f64::NAN)
}

pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod test {
    use serde::Deserialize;

    use super::*;

    #[derive(Deserialize)]
    struct Sized {
        #[serde(default, deserialize_with = "deserialize_lenient_size")]
        size: f64,
    }

    fn size_of(json: &str) -> f64 {
        serde_json::from_str::<Sized>(json).unwrap().size
    }

    #[test]
    fn lenient_size_accepts_numbers_and_numeric_strings() {
        assert_eq!(size_of(r#"{"size": 2.5}"#), 2.5);
        assert_eq!(size_of(r#"{"size": "2.40"}"#), 2.4);
        assert_eq!(size_of(r#"{}"#), 0.0);
    }

    #[test]
    fn lenient_size_reads_the_leading_number() {
        assert_eq!(size_of(r#"{"size": "2.4 MB"}"#), 2.4);
        assert_eq!(size_of(r#"{"size": "  3e2kb"}"#), 300.0);
        assert_eq!(size_of(r#"{"size": "-1.5e-1x"}"#), -0.15);
    }

    #[test]
    fn leading_number_edge_cases() {
        assert_eq!(parse_leading_number("7."), 7.0);
        assert_eq!(parse_leading_number(".5MB"), 0.5);
        assert_eq!(parse_leading_number("1e"), 1.0);
        assert_eq!(parse_leading_number("+4,5"), 4.0);
        assert_eq!(parse_leading_number("Infinity and beyond"), f64::INFINITY);
        assert_eq!(parse_leading_number("-Infinity"), f64::NEG_INFINITY);
        assert!(parse_leading_number(".").is_nan());
        assert!(parse_leading_number("-").is_nan());
        assert!(parse_leading_number("MB 2").is_nan());
        assert!(parse_leading_number("").is_nan());
    }

    #[test]
    fn lenient_size_is_nan_for_garbage() {
        assert!(size_of(r#"{"size": "big"}"#).is_nan());
        assert!(size_of(r#"{"size": null}"#).is_nan());
        assert!(size_of(r#"{"size": [1]}"#).is_nan());
    }

    #[test]
    fn rounds_to_two_decimals() {
        assert_eq!(round_to_hundredths(2.456), 2.46);
        assert_eq!(round_to_hundredths(0.001), 0.0);
    }
}
