use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("EUR")
    }
}

/// Locale-aware formatting preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            language_tag: "en-US".into(),
            decimal_separator: '.',
            grouping_separator: ',',
        }
    }
}

impl LocaleConfig {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "de-DE" | "it-IT" | "es-ES" | "nl-NL" | "pt-PT" => Self {
                language_tag: tag.into(),
                decimal_separator: ',',
                grouping_separator: '.',
            },
            "fr-FR" => Self {
                language_tag: tag.into(),
                decimal_separator: ',',
                grouping_separator: ' ',
            },
            _ => Self {
                language_tag: tag.into(),
                ..Self::default()
            },
        }
    }
}

/// Currency plus locale, the pair every amount on screen is rendered with.
#[derive(Debug, Clone, Default)]
pub struct MoneyFormat {
    pub code: CurrencyCode,
    pub locale: LocaleConfig,
}

impl MoneyFormat {
    pub fn new(code: CurrencyCode, locale: LocaleConfig) -> Self {
        Self { code, locale }
    }

    pub fn format(&self, amount: f64) -> String {
        format_currency_value(amount, &self.code, &self.locale)
    }
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        "CHF" => "CHF ".into(),
        _ => format!("{code} "),
    }
}

pub fn minor_units_for(code: &str) -> u8 {
    match code {
        "JPY" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

pub fn format_number(locale: &LocaleConfig, value: f64, precision: u8) -> String {
    let mut body = format!("{:.*}", precision as usize, value);
    if locale.decimal_separator != '.' {
        if let Some(pos) = body.find('.') {
            body.replace_range(pos..=pos, &locale.decimal_separator.to_string());
        }
    }
    if let Some(pos) = body.find(locale.decimal_separator) {
        let int_part = group_digits(&body[..pos], locale.grouping_separator);
        body = format!("{}{}", int_part, &body[pos..]);
    } else {
        body = group_digits(&body, locale.grouping_separator);
    }
    body
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}

/// Renders an amount with its currency symbol, rounding to the currency's
/// minor units. Negative amounts keep a leading sign.
pub fn format_currency_value(amount: f64, code: &CurrencyCode, locale: &LocaleConfig) -> String {
    let precision = minor_units_for(code.as_str());
    let body = format_number(locale, amount.abs(), precision);
    let symbol = symbol_for(code.as_str());
    if amount < 0.0 {
        format!("-{}{}", symbol, body)
    } else {
        format!("{}{}", symbol, body)
    }
}

pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    format!(
        "{:02} {} {} {}",
        value.day(),
        month_label(value.month()),
        value.year(),
        value.format("%H:%M")
    )
}

fn month_label(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        12 => "Dec",
        _ => "",
    }
}
