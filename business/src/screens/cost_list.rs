use chrono::NaiveDate;
use log::{debug, info};

use super::{Services, SubmitError, track};
use crate::envelope::Pagination;
use crate::error::ApiResult;
use crate::forms::{CostForm, Form as _};
use crate::models::{Category, Cost, CostFilters};
use crate::table::{Align, ColumnDescriptor, ColumnType, DataTable, TableConfig};

pub const MSG_CREATED: &str = "Costo registrado exitosamente";
pub const MSG_UPDATED: &str = "Costo actualizado exitosamente";
pub const MSG_DELETED: &str = "Costo eliminado exitosamente";

fn columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::new("date_incurred", "Fecha")
            .sortable()
            .kind(ColumnType::Date),
        ColumnDescriptor::new("category_name", "Categoría"),
        ColumnDescriptor::new("description", "Descripción"),
        ColumnDescriptor::new("amount", "Monto")
            .sortable()
            .kind(ColumnType::Currency)
            .align(Align::Right),
    ]
}

/// Server-paged cost list. The table only sorts and searches within the loaded page.
#[derive(Debug)]
pub struct CostListScreen {
    services: Services,
    table: DataTable<Cost>,
    filters: CostFilters,
    pagination: Option<Pagination>,
    loading: bool,
}

impl CostListScreen {
    pub fn new(services: Services) -> Self {
        let config = TableConfig {
            paginated: false,
            ..TableConfig::default()
        };
        Self {
            services,
            table: DataTable::with_config(columns(), config),
            filters: CostFilters::page(1),
            pagination: None,
            loading: false,
        }
    }

    pub fn table(&self) -> &DataTable<Cost> {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut DataTable<Cost> {
        &mut self.table
    }

    pub fn costs(&self) -> &[Cost] {
        self.table.rows()
    }

    pub fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }

    pub fn filters(&self) -> &CostFilters {
        &self.filters
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Filters applied to every subsequent load. The page is reset to 1.
    pub fn set_filters(&mut self, filters: CostFilters) {
        self.filters = CostFilters {
            page: Some(1),
            ..filters
        };
    }

    /// "Mostrando 10 de 25 registros"
    pub fn summary(&self) -> Option<String> {
        self.pagination.as_ref().map(|p| {
            format!(
                "Mostrando {} de {} registros",
                self.table.rows().len(),
                p.count
            )
        })
    }

    /// "Página 1 de 3"
    pub fn page_label(&self) -> Option<String> {
        self.pagination
            .as_ref()
            .map(|p| format!("Página {} de {}", p.current_page, p.total_pages))
    }

    pub async fn load(&mut self) -> ApiResult<()> {
        let page = self.filters.page.unwrap_or(1);
        self.load_page(page).await
    }

    /// Fetches page `page`; on failure rows and pagination stay as they were.
    pub async fn load_page(&mut self, page: u32) -> ApiResult<()> {
        let filters = CostFilters {
            page: Some(page.max(1)),
            ..self.filters.clone()
        };
        self.table.set_loading(true);
        let result = track(
            &mut self.loading,
            &self.services.notifier,
            self.services.api.list_costs(&filters),
        )
        .await;
        self.table.set_loading(false);

        let (costs, pagination) = result?;
        info!("loaded {} costs (page {page})", costs.len());
        self.filters = filters;
        self.table.set_rows(costs);
        self.pagination = pagination;
        Ok(())
    }

    /// Loads the next page when the backend reports one.
    pub async fn next_page(&mut self) -> Option<ApiResult<()>> {
        let pagination = self.pagination.as_ref().filter(|p| p.has_next())?;
        let page = pagination.current_page + 1;
        Some(self.load_page(page).await)
    }

    pub async fn previous_page(&mut self) -> Option<ApiResult<()>> {
        let pagination = self.pagination.as_ref().filter(|p| p.has_previous())?;
        let page = pagination.current_page.saturating_sub(1);
        Some(self.load_page(page).await)
    }

    pub fn edit_form(&self, id: u64, categories: Vec<Category>, today: NaiveDate) -> Option<CostForm> {
        let cost = self.table.rows().iter().find(|c| c.id == id)?;
        Some(CostForm::edit(cost, categories, today))
    }

    /// Creates or updates depending on the form mode, then reloads the current page.
    pub async fn save(&mut self, form: &mut CostForm) -> Result<Cost, SubmitError> {
        let payload = form.commit()?;
        let (saved, message) = match form.editing_id() {
            Some(id) => {
                let saved = track(
                    &mut self.loading,
                    &self.services.notifier,
                    self.services.api.update_cost(id, &payload),
                )
                .await?;
                (saved, MSG_UPDATED)
            }
            None => {
                let saved = track(
                    &mut self.loading,
                    &self.services.notifier,
                    self.services.api.create_cost(&payload),
                )
                .await?;
                (saved, MSG_CREATED)
            }
        };
        self.services.notifier.success(message);
        if let Err(err) = self.load().await {
            debug!("reload failed: {err}");
        }
        Ok(saved)
    }

    pub async fn delete(&mut self, id: u64) -> ApiResult<()> {
        track(
            &mut self.loading,
            &self.services.notifier,
            self.services.api.delete_cost(id),
        )
        .await?;
        self.services.notifier.success(MSG_DELETED);
        if let Err(err) = self.load().await {
            debug!("reload failed: {err}");
        }
        Ok(())
    }
}
