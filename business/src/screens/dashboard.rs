use chrono::{Datelike as _, Months, NaiveDate};
use log::debug;
use rust_decimal::Decimal;

use super::{Services, report_failure};
use crate::error::{ApiError, ApiResult};
use crate::locale::Locale;
use crate::models::CategoryTotal;

/// Number of months offered by the selector, current month included.
pub const MONTH_WINDOW: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MonthOption {
    pub year: i32,
    pub month: u32,
}

impl MonthOption {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// `months` months earlier.
    pub fn back(self, months: u32) -> Self {
        self.first_day()
            .and_then(|d| d.checked_sub_months(Months::new(months)))
            .map_or(self, Self::of)
    }

    /// "marzo de 2025"
    pub fn label(self, locale: &Locale) -> String {
        locale.format_month_year(self.year, self.month)
    }
}

/// Month-over-month change of the selected month's total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendChange {
    /// Absolute percentage.
    pub percentage: Decimal,
    /// True when spending went up or stayed flat.
    pub is_positive: bool,
}

impl TrendChange {
    /// `None` unless the previous total is positive.
    pub fn between(current: Decimal, previous: Decimal) -> Option<Self> {
        if previous <= Decimal::ZERO {
            return None;
        }
        let change = (current - previous) / previous * Decimal::ONE_HUNDRED;
        Some(Self {
            percentage: change.abs(),
            is_positive: change >= Decimal::ZERO,
        })
    }

    /// One decimal, e.g. "12.5".
    pub fn label(&self) -> String {
        format!("{:.1}", self.percentage.round_dp(1))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DashboardStats {
    pub total_month: Decimal,
    pub total_year: Decimal,
    /// Movement categories.
    pub categories_active: usize,
    pub costs_count: u64,
    pub average_cost: Decimal,
    /// Largest category total of the month.
    pub max_cost: Decimal,
    pub comparison: Option<TrendChange>,
}

#[derive(Debug)]
pub struct DashboardScreen {
    services: Services,
    months: Vec<MonthOption>,
    selected: usize,
    stats: DashboardStats,
    category_totals: Vec<CategoryTotal>,
    loading: bool,
}

impl DashboardScreen {
    /// The selector covers the [`MONTH_WINDOW`] months ending with `today`'s; index 0 is current.
    pub fn new(services: Services, today: NaiveDate) -> Self {
        let current = MonthOption::of(today);
        let months = (0..MONTH_WINDOW as u32).map(|i| current.back(i)).collect();
        Self {
            services,
            months,
            selected: 0,
            stats: DashboardStats::default(),
            category_totals: Vec::new(),
            loading: false,
        }
    }

    pub fn months(&self) -> &[MonthOption] {
        &self.months
    }

    pub fn month_labels(&self) -> Vec<String> {
        self.months
            .iter()
            .map(|m| m.label(&self.services.locale))
            .collect()
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_month(&self) -> MonthOption {
        self.months[self.selected]
    }

    /// The month the selected one is compared against.
    pub fn comparison_month(&self) -> MonthOption {
        self.selected_month().back(1)
    }

    pub fn stats(&self) -> &DashboardStats {
        &self.stats
    }

    /// Category totals of the selected month, largest first.
    pub fn category_totals(&self) -> &[CategoryTotal] {
        &self.category_totals
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_previous(&self) -> bool {
        self.selected + 1 < self.months.len()
    }

    pub fn has_next(&self) -> bool {
        self.selected > 0
    }

    /// Bar width for `total` relative to the month's largest category, in percent.
    pub fn percentage_width(&self, total: Decimal) -> Decimal {
        if self.stats.max_cost.is_zero() {
            return Decimal::ZERO;
        }
        total / self.stats.max_cost * Decimal::ONE_HUNDRED
    }

    /// Selects month `index` and reloads. Out-of-range indexes are ignored.
    pub async fn select_month(&mut self, index: usize) -> Option<ApiResult<()>> {
        if index >= self.months.len() {
            return None;
        }
        self.selected = index;
        Some(self.load().await)
    }

    /// One month further into the past.
    pub async fn show_previous_month(&mut self) -> Option<ApiResult<()>> {
        if !self.has_previous() {
            return None;
        }
        self.select_month(self.selected + 1).await
    }

    /// One month closer to the present.
    pub async fn show_next_month(&mut self) -> Option<ApiResult<()>> {
        if !self.has_next() {
            return None;
        }
        self.select_month(self.selected - 1).await
    }

    /// Reloads every figure for the selected month.
    ///
    /// Each figure is fetched on its own; a failure is reported and leaves that
    /// figure as it was while the others still load. The first failure is returned.
    pub async fn load(&mut self) -> ApiResult<()> {
        self.loading = true;
        let month = self.selected_month();
        let previous = self.comparison_month();
        let api = &self.services.api;
        let mut first_error: Option<ApiError> = None;
        let mut keep = |result: ApiResult<()>| {
            if let Err(err) = result {
                report_failure(&self.services.notifier, &err);
                first_error.get_or_insert(err);
            }
        };

        let totals = api.total_month(month.year, month.month).await;
        keep(totals.map(|total| {
            self.stats.total_month = total.total;
            self.stats.costs_count = total.count;
            self.stats.average_cost = total.average();
        }));

        let categories = api.category_totals(month.year, month.month).await;
        keep(categories.map(|mut rows| {
            rows.sort_by(|a, b| b.total.cmp(&a.total));
            self.stats.max_cost = rows.first().map_or(Decimal::ZERO, |r| r.total);
            self.category_totals = rows;
        }));

        let earlier = api.total_month(previous.year, previous.month).await;
        keep(earlier.map(|total| {
            self.stats.comparison = TrendChange::between(self.stats.total_month, total.total);
        }));

        let year = api.year_to_date(month.year).await;
        keep(year.map(|total| self.stats.total_year = total.total));

        let catalog = api.list_categories().await;
        keep(catalog.map(|all| {
            self.stats.categories_active = all.iter().filter(|c| c.is_movement).count();
        }));

        self.loading = false;
        debug!("dashboard loaded for {}-{:02}", month.year, month.month);
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
