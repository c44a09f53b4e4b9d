//! Display formatting for money amounts.

pub const DEFAULT_CURRENCY_SUFFIX: &str = "тг.";

const GROUP_SEPARATOR: char = ' ';

/// Formats `value` with the default `тг.` suffix.
///
/// Zero and NaN render as an empty string so that unset amounts stay blank.
pub fn format_currency(value: f64) -> String {
    CurrencyFormatter::default().format(value)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormatter {
    suffix: String,
}

impl Default for CurrencyFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_CURRENCY_SUFFIX)
    }
}

impl CurrencyFormatter {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }

    pub fn format(&self, value: f64) -> String {
        if value == 0.0 || value.is_nan() {
            return String::new();
        }

        // f64 的 Display 不會輸出多餘的 ".0"，與整數金額一致
        let text = value.to_string();
        let (sign, unsigned) = match text.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", text.as_str()),
        };
        let (integer, fraction) = match unsigned.split_once('.') {
            Some((integer, fraction)) => (integer, Some(fraction)),
            None => (unsigned, None),
        };

        let mut out = String::with_capacity(text.len() + integer.len() / 3 + self.suffix.len() + 2);
        out.push_str(sign);
        out.push_str(&group_digits(integer));
        if let Some(fraction) = fraction {
            out.push('.');
            out.push_str(fraction);
        }
        out.push(' ');
        out.push_str(&self.suffix);
        out
    }

    pub fn format_optional(&self, value: Option<f64>) -> String {
        value.map(|v| self.format(v)).unwrap_or_default()
    }
}

fn group_digits(digits: &str) -> String {
    let len = digits.chars().count();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(GROUP_SEPARATOR);
        }
        grouped.push(ch);
    }
    grouped
}
