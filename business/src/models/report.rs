use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::null_as_default;

/// One cost inside a monthly report, with the month's running total up to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub category: String,
    /// Running total up to and including this entry.
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyReport {
    /// `YYYY-MM`
    pub month: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub entries: Vec<ReportEntry>,
}
