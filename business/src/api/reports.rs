use chrono::NaiveDate;

use super::ApiClient;
use crate::error::ApiResult;
use crate::http::RequestBuilder;
use crate::models::MonthlyReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Excel,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Excel => "xlsx",
        }
    }

    fn path(self) -> &'static str {
        match self {
            Self::Pdf => "/costs/reports/export-pdf/",
            Self::Excel => "/costs/reports/export-excel/",
        }
    }
}

fn with_range(request: RequestBuilder, start: NaiveDate, end: NaiveDate) -> RequestBuilder {
    request
        .query("start_date", start.format("%Y-%m-%d"))
        .query("end_date", end.format("%Y-%m-%d"))
}

impl ApiClient {
    /// GET `/costs/reports/monthly-report/?start_date&end_date`, one entry per month.
    pub async fn monthly_reports(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ApiResult<Vec<MonthlyReport>> {
        let request = with_range(self.get("/costs/reports/monthly-report/"), start, end);
        self.fetch_data(request, "monthly report").await
    }

    /// Raw bytes of the exported report.
    pub async fn export_report(
        &self,
        format: ExportFormat,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ApiResult<Vec<u8>> {
        let request = with_range(self.get(format.path()), start, end);
        self.fetch_bytes(request).await
    }
}
