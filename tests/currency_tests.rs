use chrono::{TimeZone, Utc};
use donation_desk::currency::{
    format_currency_value, format_timestamp, CurrencyCode, LocaleConfig, MoneyFormat,
};

#[test]
fn formats_currency_with_locale() {
    let locale = LocaleConfig::from_tag("de-DE");
    let code = CurrencyCode::new("EUR");
    assert_eq!(format_currency_value(1234.5, &code, &locale), "€1.234,50");
    assert_eq!(format_currency_value(-20.0, &code, &locale), "-€20,00");
}

#[test]
fn default_money_format_is_euro() {
    let money = MoneyFormat::default();
    assert_eq!(money.format(6.0), "€6.00");
    assert_eq!(money.format(40.0), "€40.00");
}

#[test]
fn currency_minor_units_are_respected() {
    let yen = MoneyFormat::new(CurrencyCode::new("JPY"), LocaleConfig::default());
    assert_eq!(yen.format(1500.4), "¥1,500");

    let unknown = MoneyFormat::new(CurrencyCode::new("HRK"), LocaleConfig::default());
    assert_eq!(unknown.format(7.5), "HRK 7.50");
}

#[test]
fn timestamps_render_day_month_year_time() {
    let value = Utc.with_ymd_and_hms(2025, 3, 1, 10, 15, 0).unwrap();
    assert_eq!(format_timestamp(&value), "01 Mar 2025 10:15");
}
