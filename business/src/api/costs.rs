use super::ApiClient;
use crate::envelope::Pagination;
use crate::error::ApiResult;
use crate::models::{CategoryTotal, Cost, CostFilters, CostPayload, MonthTotal};

impl ApiClient {
    /// GET `/costs/costs/` with the set filters, returning the page and its pagination block.
    pub async fn list_costs(
        &self,
        filters: &CostFilters,
    ) -> ApiResult<(Vec<Cost>, Option<Pagination>)> {
        let request = self.get("/costs/costs/").query_pairs(filters.to_query());
        self.fetch(request, "cost list")
            .await?
            .into_page("cost list")
    }

    /// GET `/costs/costs/{id}/`
    pub async fn get_cost(&self, id: u64) -> ApiResult<Cost> {
        self.fetch_data(self.get(&format!("/costs/costs/{id}/")), "cost")
            .await
    }

    /// POST `/costs/costs/`
    pub async fn create_cost(&self, payload: &CostPayload) -> ApiResult<Cost> {
        let request = self.post("/costs/costs/", payload)?;
        self.fetch_data(request, "created cost").await
    }

    /// PUT `/costs/costs/{id}/`
    pub async fn update_cost(&self, id: u64, payload: &CostPayload) -> ApiResult<Cost> {
        let request = self.put(&format!("/costs/costs/{id}/"), payload)?;
        self.fetch_data(request, "updated cost").await
    }

    /// DELETE `/costs/costs/{id}/`
    pub async fn delete_cost(&self, id: u64) -> ApiResult<()> {
        self.fetch_ack(self.delete(&format!("/costs/costs/{id}/")), "cost deletion")
            .await
    }

    /// GET `/costs/costs/summary/`. The summary has no fixed shape, so it is returned as JSON.
    pub async fn costs_summary(&self, filters: &CostFilters) -> ApiResult<serde_json::Value> {
        let request = self
            .get("/costs/costs/summary/")
            .query_pairs(filters.to_query());
        self.fetch_data(request, "cost summary").await
    }

    /// GET `/costs/costs/total_month/?year&month`
    pub async fn total_month(&self, year: i32, month: u32) -> ApiResult<MonthTotal> {
        let request = self
            .get("/costs/costs/total_month/")
            .query("year", year)
            .query("month", month);
        self.fetch_data(request, "month total").await
    }

    /// GET `/costs/costs/monthly_report/?year&month`: totals per category.
    pub async fn category_totals(&self, year: i32, month: u32) -> ApiResult<Vec<CategoryTotal>> {
        let request = self
            .get("/costs/costs/monthly_report/")
            .query("year", year)
            .query("month", month);
        self.fetch_data(request, "category totals").await
    }

    /// GET `/costs/costs/year-to-date/?year`
    pub async fn year_to_date(&self, year: i32) -> ApiResult<MonthTotal> {
        let request = self.get("/costs/costs/year-to-date/").query("year", year);
        self.fetch_data(request, "year to date total").await
    }
}
