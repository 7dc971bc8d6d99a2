//! Cell rendering.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::{BadgeColor, CellValue, ColumnDescriptor, ColumnType};
use crate::locale::Locale;

/// Shown for empty or unrenderable values.
pub const PLACEHOLDER: &str = "-";

/// Renders `value` for `column`: an explicit formatter wins, otherwise the column type decides.
pub fn format_cell(column: &ColumnDescriptor, value: &CellValue, locale: &Locale) -> String {
    if let Some(formatter) = column.custom_formatter() {
        return formatter(value);
    }

    match column.kind {
        ColumnType::Currency => match value.as_decimal() {
            Some(amount) => locale.format_currency(amount),
            None => plain(value),
        },
        ColumnType::Number => match value.as_decimal() {
            Some(n) => locale.format_number(n),
            None => plain(value),
        },
        ColumnType::Date => match parse_date(value) {
            Some(date) => locale.format_date(date),
            None => PLACEHOLDER.to_owned(),
        },
        ColumnType::Text | ColumnType::Badge | ColumnType::Custom => plain(value),
    }
}

/// Badge color for `value`: the column's mapper if it has one, else [`BadgeColor::Default`].
pub fn badge_color(column: &ColumnDescriptor, value: &CellValue) -> BadgeColor {
    column
        .badge_mapper()
        .map_or(BadgeColor::Default, |mapper| mapper(value))
}

fn plain(value: &CellValue) -> String {
    match value {
        CellValue::Null => PLACEHOLDER.to_owned(),
        CellValue::Text(s) if s.is_empty() => PLACEHOLDER.to_owned(),
        other => other.to_string(),
    }
}

/// Accepts real dates plus `YYYY-MM-DD` and timestamp strings.
fn parse_date(value: &CellValue) -> Option<NaiveDate> {
    match value {
        CellValue::Date(d) => Some(*d),
        CellValue::Text(s) => {
            let s = s.trim();
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
                .or_else(|| {
                    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                        .ok()
                        .map(|dt| dt.date())
                })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn column(kind: ColumnType) -> ColumnDescriptor {
        ColumnDescriptor::new("value", "Valor").kind(kind)
    }

    #[test]
    fn test_currency_column_uses_locale_grouping() {
        let locale = Locale::es_co();
        let rendered = format_cell(
            &column(ColumnType::Currency),
            &CellValue::from(Decimal::from(15000)),
            &locale,
        );
        assert!(rendered.contains("15.000"), "got {rendered}");
        assert!(rendered.contains('$'), "got {rendered}");

        let from_text = format_cell(
            &column(ColumnType::Currency),
            &CellValue::from("2500.00"),
            &locale,
        );
        assert_eq!(from_text, "$ 2.500");
    }

    #[test]
    fn test_date_column_placeholder_for_bad_values() {
        let locale = Locale::es_co();
        let col = column(ColumnType::Date);
        assert_eq!(
            format_cell(&col, &CellValue::from("2025-03-15"), &locale),
            "15/03/2025"
        );
        assert_eq!(
            format_cell(&col, &CellValue::from("2025-03-15T08:30:00Z"), &locale),
            "15/03/2025"
        );
        assert_eq!(format_cell(&col, &CellValue::from(""), &locale), PLACEHOLDER);
        assert_eq!(
            format_cell(&col, &CellValue::from("not a date"), &locale),
            PLACEHOLDER
        );
        assert_eq!(format_cell(&col, &CellValue::Null, &locale), PLACEHOLDER);
    }

    #[test]
    fn test_number_and_default_columns() {
        let locale = Locale::es_co();
        assert_eq!(
            format_cell(
                &column(ColumnType::Number),
                &CellValue::from(1234_i64),
                &locale
            ),
            "1.234"
        );
        assert_eq!(
            format_cell(
                &column(ColumnType::Number),
                &CellValue::from("98765"),
                &locale
            ),
            "98.765"
        );
        assert_eq!(
            format_cell(&column(ColumnType::Number), &CellValue::from("n/a"), &locale),
            "n/a"
        );
        assert_eq!(
            format_cell(&column(ColumnType::Text), &CellValue::Null, &locale),
            PLACEHOLDER
        );
        assert_eq!(
            format_cell(&column(ColumnType::Text), &CellValue::from(true), &locale),
            "true"
        );
    }

    #[test]
    fn test_explicit_formatter_wins() {
        let col = column(ColumnType::Currency)
            .formatter(|v| format!("<{v}>"));
        assert_eq!(
            format_cell(&col, &CellValue::from(5_i64), &Locale::es_co()),
            "<5>"
        );
    }

    #[test]
    fn test_badge_color_falls_back_to_default() {
        let plain_col = column(ColumnType::Badge);
        assert_eq!(
            badge_color(&plain_col, &CellValue::from("Salud")),
            BadgeColor::Default
        );

        let mapped = column(ColumnType::Badge).badge_color(|v| match v.as_text() {
            Some("Salud") => BadgeColor::Danger,
            _ => BadgeColor::Default,
        });
        assert_eq!(
            badge_color(&mapped, &CellValue::from("Salud")),
            BadgeColor::Danger
        );
    }
}
