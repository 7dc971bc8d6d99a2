use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ustr::Ustr;

use super::null_as_default;
use crate::table::{CellValue, TableRow};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cost {
    pub id: u64,
    pub category: u64,
    #[serde(default)]
    pub category_name: String,
    pub date_incurred: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl TableRow for Cost {
    fn row_id(&self) -> Ustr {
        Ustr::from(self.id.to_string().as_str())
    }

    fn field(&self, key: &str) -> CellValue {
        match key {
            "id" => self.id.into(),
            "category" => self.category.into(),
            "category_name" => self.category_name.as_str().into(),
            "date_incurred" => self.date_incurred.into(),
            "description" => self.description.as_str().into(),
            "amount" => self.amount.into(),
            "notes" => self.notes.clone().into(),
            "created_at" => self.created_at.clone().into(),
            "updated_at" => self.updated_at.clone().into(),
            _ => CellValue::Null,
        }
    }
}

/// Body for creating or updating a cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CostPayload {
    pub category: u64,
    pub date_incurred: NaiveDate,
    pub amount: Decimal,
    pub description: String,
    pub notes: String,
}

/// Query filters for `GET /costs/costs/`. Unset fields are not sent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CostFilters {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub category: Option<u64>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    pub search: Option<String>,
}

impl CostFilters {
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Self::default()
        }
    }

    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        let mut push = |name: &str, value: Option<String>| {
            if let Some(value) = value {
                query.push((name.to_owned(), value));
            }
        };

        push("page", self.page.map(|v| v.to_string()));
        push("page_size", self.page_size.map(|v| v.to_string()));
        push("category", self.category.map(|v| v.to_string()));
        push(
            "date_from",
            self.date_from.map(|d| d.format("%Y-%m-%d").to_string()),
        );
        push(
            "date_to",
            self.date_to.map(|d| d.format("%Y-%m-%d").to_string()),
        );
        push("min_amount", self.min_amount.map(|v| v.to_string()));
        push("max_amount", self.max_amount.map(|v| v.to_string()));
        push(
            "search",
            self.search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned),
        );
        query
    }
}

/// `GET /costs/costs/total_month/` and `/year-to-date/` payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MonthTotal {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: u64,
}

impl MonthTotal {
    /// Average cost, or zero when there are no costs.
    pub fn average(&self) -> Decimal {
        if self.count == 0 {
            Decimal::ZERO
        } else {
            self.total / Decimal::from(self.count)
        }
    }
}

/// One row of `GET /costs/costs/monthly_report/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: Decimal,
}
