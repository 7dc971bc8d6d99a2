//! Locale-aware number, currency and date rendering.
//!
//! Only the handful of conventions the ledger needs are modelled: grouping and
//! decimal separators, the currency symbol and its placement, a numeric date
//! pattern and month names for the dashboard month selector.

use chrono::{Datelike as _, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

const MONTHS_ES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

const MONTHS_EN: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOrder {
    DayMonthYear,
    MonthDayYear,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    pub tag: &'static str,
    pub group_separator: char,
    pub decimal_separator: char,
    pub currency_symbol: &'static str,
    /// Maximum fraction digits shown for currency amounts; trailing zeros are dropped.
    pub currency_fraction_digits: u32,
    /// Maximum fraction digits shown for plain numbers.
    pub number_fraction_digits: u32,
    pub date_order: DateOrder,
    pub month_names: &'static [&'static str; 12],
    /// Joins month name and year, e.g. "marzo de 2025".
    pub month_year_joiner: &'static str,
}

impl Default for Locale {
    fn default() -> Self {
        Self::es_co()
    }
}

impl Locale {
    /// Colombian Spanish, the ledger's home locale.
    pub fn es_co() -> Self {
        Self {
            tag: "es-CO",
            group_separator: '.',
            decimal_separator: ',',
            currency_symbol: "$",
            currency_fraction_digits: 2,
            number_fraction_digits: 3,
            date_order: DateOrder::DayMonthYear,
            month_names: &MONTHS_ES,
            month_year_joiner: " de ",
        }
    }

    pub fn en_us() -> Self {
        Self {
            tag: "en-US",
            group_separator: ',',
            decimal_separator: '.',
            currency_symbol: "$",
            currency_fraction_digits: 2,
            number_fraction_digits: 3,
            date_order: DateOrder::MonthDayYear,
            month_names: &MONTHS_EN,
            month_year_joiner: " ",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().replace('_', "-").as_str() {
            "es-co" | "es" => Some(Self::es_co()),
            "en-us" | "en" => Some(Self::en_us()),
            _ => None,
        }
    }

    /// Groups the integer part and renders at most `number_fraction_digits` decimals.
    pub fn format_number(&self, value: Decimal) -> String {
        self.format_decimal(value, self.number_fraction_digits)
    }

    /// Renders an amount as `$ 15.000` (es-CO) or `$ 15,000` (en-US).
    pub fn format_currency(&self, value: Decimal) -> String {
        let digits = self.format_decimal(value.abs(), self.currency_fraction_digits);
        if value.is_sign_negative() && !value.is_zero() {
            format!("-{} {digits}", self.currency_symbol)
        } else {
            format!("{} {digits}", self.currency_symbol)
        }
    }

    pub fn format_date(&self, date: NaiveDate) -> String {
        match self.date_order {
            DateOrder::DayMonthYear => date.format("%d/%m/%Y").to_string(),
            DateOrder::MonthDayYear => date.format("%m/%d/%Y").to_string(),
        }
    }

    pub fn month_name(&self, month: u32) -> &'static str {
        let index = month.clamp(1, 12) - 1;
        self.month_names[index as usize]
    }

    /// "marzo de 2025" for es-CO.
    pub fn format_month_year(&self, year: i32, month: u32) -> String {
        format!(
            "{}{}{year}",
            self.month_name(month),
            self.month_year_joiner
        )
    }

    /// Renders a `YYYY-MM` key (as used by monthly reports) as a month label.
    ///
    /// Unparseable keys are returned unchanged.
    pub fn format_month_key(&self, key: &str) -> String {
        let parsed = key
            .split_once('-')
            .and_then(|(y, m)| Some((y.parse::<i32>().ok()?, m.parse::<u32>().ok()?)))
            .filter(|(_, m)| (1..=12).contains(m));
        match parsed {
            Some((year, month)) => self.format_month_year(year, month),
            None => key.to_owned(),
        }
    }

    pub fn format_month_of(&self, date: NaiveDate) -> String {
        self.format_month_year(date.year(), date.month())
    }

    fn format_decimal(&self, value: Decimal, max_fraction: u32) -> String {
        let rounded = value
            .round_dp_with_strategy(max_fraction, RoundingStrategy::MidpointAwayFromZero)
            .normalize();
        let text = rounded.abs().to_string();
        let (int_part, frac_part) = match text.split_once('.') {
            Some((i, f)) => (i.to_owned(), Some(f.to_owned())),
            None => (text, None),
        };

        let mut out = String::new();
        if rounded.is_sign_negative() && !rounded.is_zero() {
            out.push('-');
        }
        out.push_str(&group_digits(&int_part, self.group_separator));
        if let Some(frac) = frac_part.filter(|f| !f.is_empty()) {
            out.push(self.decimal_separator);
            out.push_str(&frac);
        }
        out
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr as _;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_currency_es_co_groups_thousands() {
        let locale = Locale::es_co();
        let formatted = locale.format_currency(Decimal::from(15000));
        assert!(formatted.contains("15.000"), "got {formatted}");
        assert!(formatted.contains('$'), "got {formatted}");
        assert_eq!(formatted, "$ 15.000");
    }

    #[test]
    fn test_currency_keeps_significant_cents() {
        let locale = Locale::es_co();
        assert_eq!(locale.format_currency(dec("1234567.50")), "$ 1.234.567,5");
        assert_eq!(locale.format_currency(dec("-80.125")), "-$ 80,13");
    }

    #[test]
    fn test_number_grouping() {
        let locale = Locale::es_co();
        assert_eq!(locale.format_number(dec("999")), "999");
        assert_eq!(locale.format_number(dec("1000")), "1.000");
        assert_eq!(locale.format_number(dec("1234.5")), "1.234,5");
        assert_eq!(Locale::en_us().format_number(dec("1234567")), "1,234,567");
    }

    #[test]
    fn test_dates_and_months() {
        let locale = Locale::es_co();
        let date = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        assert_eq!(locale.format_date(date), "15/03/2025");
        assert_eq!(locale.format_month_of(date), "marzo de 2025");
        assert_eq!(locale.format_month_key("2024-12"), "diciembre de 2024");
        assert_eq!(locale.format_month_key("garbage"), "garbage");
        assert_eq!(Locale::en_us().format_date(date), "03/15/2025");
    }

    #[test]
    fn test_from_tag() {
        assert_eq!(Locale::from_tag("es_CO"), Some(Locale::es_co()));
        assert_eq!(Locale::from_tag("EN"), Some(Locale::en_us()));
        assert!(Locale::from_tag("fr-FR").is_none());
    }
}
