use chrono::{Datelike as _, Months, NaiveDate};

use super::{FieldError, Form, FormErrors, Touched};
use crate::api::ExportFormat;

/// A validated, inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// First and last day of the month containing `day`.
    pub fn month_of(day: NaiveDate) -> Self {
        let start = day.with_day(1).unwrap_or(day);
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(day);
        Self { start, end }
    }

    /// `reporte_gastos_<start>_<end>.<ext>` with ISO dates.
    pub fn filename(&self, format: ExportFormat) -> String {
        format!(
            "reporte_gastos_{}_{}.{}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d"),
            format.extension()
        )
    }
}

/// Start/end buffer for the reports screen.
#[derive(Debug, Clone)]
pub struct ReportRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    touched: Touched,
}

impl ReportRange {
    /// Defaults to the month containing `today`.
    pub fn current_month(today: NaiveDate) -> Self {
        let range = DateRange::month_of(today);
        Self {
            start: Some(range.start),
            end: Some(range.end),
            touched: Touched::default(),
        }
    }

    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self {
            start,
            end,
            touched: Touched::default(),
        }
    }
}

impl Form for ReportRange {
    type Output = DateRange;

    const FIELDS: &'static [&'static str] = &["start_date", "end_date"];

    fn check(&self) -> Result<DateRange, FormErrors> {
        let mut errors = FormErrors::default();
        match (self.start, self.end) {
            (Some(start), Some(end)) if start > end => {
                errors.push("start_date", FieldError::RangeInverted);
                Err(errors)
            }
            (Some(start), Some(end)) => Ok(DateRange { start, end }),
            (start, end) => {
                if start.is_none() {
                    errors.push("start_date", FieldError::Required);
                }
                if end.is_none() {
                    errors.push("end_date", FieldError::Required);
                }
                Err(errors)
            }
        }
    }

    fn touched(&self) -> &Touched {
        &self.touched
    }

    fn touched_mut(&mut self) -> &mut Touched {
        &mut self.touched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_defaults_to_current_month() {
        let range = ReportRange::current_month(date(2024, 2, 10));
        assert_eq!(range.start, Some(date(2024, 2, 1)));
        assert_eq!(range.end, Some(date(2024, 2, 29)));

        let december = DateRange::month_of(date(2025, 12, 31));
        assert_eq!(december.end, date(2025, 12, 31));
    }

    #[test]
    fn test_range_validation() {
        let mut missing = ReportRange::new(Some(date(2025, 1, 1)), None);
        let errors = missing.commit().unwrap_err();
        assert_eq!(errors.get("end_date"), Some(&FieldError::Required));
        assert!(errors.get("start_date").is_none());

        let mut inverted = ReportRange::new(Some(date(2025, 2, 1)), Some(date(2025, 1, 1)));
        assert_eq!(
            inverted.commit().unwrap_err().get("start_date"),
            Some(&FieldError::RangeInverted)
        );

        let mut same_day = ReportRange::new(Some(date(2025, 1, 1)), Some(date(2025, 1, 1)));
        let range = same_day.commit().unwrap();
        assert_eq!(
            range.filename(ExportFormat::Excel),
            "reporte_gastos_2025-01-01_2025-01-01.xlsx"
        );
    }
}
