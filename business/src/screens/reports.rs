use chrono::NaiveDate;
use log::info;
use rust_decimal::Decimal;

use super::{Services, SubmitError, track};
use crate::api::ExportFormat;
use crate::forms::{DateRange, FieldError, Form as _, FormErrors, ReportRange};
use crate::models::MonthlyReport;
use crate::table::{
    Align, BadgeColor, CellValue, ColumnDescriptor, ColumnType, DataTable, Record, TableConfig,
};

pub const MSG_SELECT_DATES: &str = "Por favor selecciona ambas fechas";
pub const MSG_NO_DATA: &str = "No se encontraron datos para el período seleccionado";
pub const MSG_REPORT_FAILED: &str = "Error al generar el reporte";
pub const MSG_NO_DOWNLOAD: &str = "No hay datos para descargar";

/// Badge color for a category name.
pub fn category_badge(name: &str) -> BadgeColor {
    match name {
        "Alimentación" | "Ejemplo 3" => BadgeColor::Success,
        "Transporte" | "Ejemplo 2" => BadgeColor::Info,
        "Servicios" => BadgeColor::Warning,
        "Entretenimiento" | "Ejemplo 1" => BadgeColor::Primary,
        "Salud" => BadgeColor::Danger,
        "Educación" => BadgeColor::Secondary,
        _ => BadgeColor::Default,
    }
}

fn columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::new("date", "Fecha")
            .sortable()
            .kind(ColumnType::Date)
            .width(12),
        ColumnDescriptor::new("description", "Descripción").sortable(),
        ColumnDescriptor::new("amount", "Monto")
            .sortable()
            .kind(ColumnType::Currency)
            .align(Align::Right)
            .width(15),
        ColumnDescriptor::new("category", "Categoría")
            .sortable()
            .kind(ColumnType::Badge)
            .width(15)
            .badge_color(|value: &CellValue| category_badge(value.as_text().unwrap_or_default())),
        ColumnDescriptor::new("total", "Total Acumulado")
            .sortable()
            .kind(ColumnType::Currency)
            .align(Align::Right)
            .width(17),
    ]
}

fn rows(reports: &[MonthlyReport]) -> Vec<Record> {
    reports
        .iter()
        .flat_map(|report| &report.entries)
        .enumerate()
        .map(|(index, entry)| {
            Record::new(index.to_string())
                .with("date", entry.date)
                .with("description", entry.description.as_str())
                .with("amount", entry.amount)
                .with("category", entry.category.as_str())
                .with("total", entry.total)
        })
        .collect()
}

/// An exported report, ready to be written out under `filename`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

fn range_message(errors: &FormErrors) -> &'static str {
    if errors.iter().any(|(_, e)| *e == FieldError::RangeInverted) {
        "La fecha inicial no puede ser mayor que la fecha final"
    } else {
        MSG_SELECT_DATES
    }
}

fn export_failed(format: ExportFormat) -> String {
    let name = match format {
        ExportFormat::Pdf => "PDF",
        ExportFormat::Excel => "Excel",
    };
    format!("Error al descargar el {name}. Por favor intenta de nuevo.")
}

/// Monthly cost report over a date range, with PDF/Excel export.
#[derive(Debug)]
pub struct ReportsScreen {
    services: Services,
    today: NaiveDate,
    range: ReportRange,
    reports: Vec<MonthlyReport>,
    table: DataTable<Record>,
    error_message: Option<String>,
    loading: bool,
}

impl ReportsScreen {
    /// The range starts out as the month containing `today`.
    pub fn new(services: Services, today: NaiveDate) -> Self {
        let config = TableConfig {
            page_size: 10,
            ..TableConfig::default()
        };
        Self {
            services,
            today,
            range: ReportRange::current_month(today),
            reports: Vec::new(),
            table: DataTable::with_config(columns(), config),
            error_message: None,
            loading: false,
        }
    }

    pub fn range(&self) -> &ReportRange {
        &self.range
    }

    pub fn range_mut(&mut self) -> &mut ReportRange {
        &mut self.range
    }

    pub fn reports(&self) -> &[MonthlyReport] {
        &self.reports
    }

    /// Every entry of every month, flattened.
    pub fn table(&self) -> &DataTable<Record> {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut DataTable<Record> {
        &mut self.table
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error_message = None;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn total_general(&self) -> Decimal {
        self.reports.iter().map(|r| r.total).sum()
    }

    pub fn total_entries(&self) -> usize {
        self.reports.iter().map(|r| r.entries.len()).sum()
    }

    pub fn month_label(&self, report: &MonthlyReport) -> String {
        self.services.locale.format_month_key(&report.month)
    }

    fn checked_range(&mut self) -> Result<DateRange, SubmitError> {
        match self.range.commit() {
            Ok(range) => {
                self.error_message = None;
                Ok(range)
            }
            Err(errors) => {
                self.error_message = Some(range_message(&errors).to_owned());
                Err(errors.into())
            }
        }
    }

    /// Fetches the report for the current range. Existing results stay on failure.
    pub async fn generate(&mut self) -> Result<(), SubmitError> {
        let range = self.checked_range()?;
        self.table.set_loading(true);
        let result = track(
            &mut self.loading,
            &self.services.notifier,
            self.services.api.monthly_reports(range.start, range.end),
        )
        .await;
        self.table.set_loading(false);

        match result {
            Ok(reports) => {
                info!(
                    "report {}..{}: {} months",
                    range.start,
                    range.end,
                    reports.len()
                );
                if reports.is_empty() {
                    self.error_message = Some(MSG_NO_DATA.to_owned());
                }
                self.table.set_rows(rows(&reports));
                self.reports = reports;
                Ok(())
            }
            Err(err) => {
                let message = err.backend_message().unwrap_or(MSG_REPORT_FAILED);
                self.error_message = Some(message.to_owned());
                Err(err.into())
            }
        }
    }

    /// Downloads the current range in `format`. Needs a generated, non-empty report.
    pub async fn export(&mut self, format: ExportFormat) -> Result<ExportFile, SubmitError> {
        let range = self.checked_range()?;
        if self.reports.is_empty() {
            self.error_message = Some(MSG_NO_DOWNLOAD.to_owned());
            return Err(SubmitError::Unavailable(MSG_NO_DOWNLOAD));
        }

        let result = track(
            &mut self.loading,
            &self.services.notifier,
            self.services.api.export_report(format, range.start, range.end),
        )
        .await;
        match result {
            Ok(bytes) => {
                let filename = range.filename(format);
                info!("exported {filename} ({} bytes)", bytes.len());
                Ok(ExportFile { filename, bytes })
            }
            Err(err) => {
                self.error_message = Some(export_failed(format));
                Err(err.into())
            }
        }
    }

    /// Drops the results and resets the range to the current month.
    pub fn clear(&mut self) {
        self.reports.clear();
        self.table.set_rows(Vec::new());
        self.error_message = None;
        self.range = ReportRange::current_month(self.today);
    }
}
