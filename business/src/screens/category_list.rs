use log::{debug, info};

use super::{Services, SubmitError, track};
use crate::error::ApiResult;
use crate::forms::{CategoryForm, Form as _};
use crate::models::{Category, CategoryTree};
use crate::table::{CellValue, ColumnDescriptor, ColumnType, DataTable};

pub const MSG_CREATED: &str = "Categoría creada exitosamente";
pub const MSG_UPDATED: &str = "Categoría actualizada exitosamente";
pub const MSG_DELETED: &str = "Categoría eliminada exitosamente";

fn yes_no(value: &CellValue) -> String {
    match value {
        CellValue::Bool(true) => "Sí".to_owned(),
        _ => "No".to_owned(),
    }
}

fn columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::new("code", "Código").sortable(),
        ColumnDescriptor::new("name", "Nombre").sortable(),
        ColumnDescriptor::new("level", "Nivel")
            .sortable()
            .kind(ColumnType::Number),
        ColumnDescriptor::new("is_movement", "Permite Movimiento")
            .kind(ColumnType::Custom)
            .formatter(yes_no),
    ]
}

/// All categories in a client-side table, plus the hierarchical view.
#[derive(Debug)]
pub struct CategoryListScreen {
    services: Services,
    table: DataTable<Category>,
    tree: Vec<CategoryTree>,
    loading: bool,
}

impl CategoryListScreen {
    pub fn new(services: Services) -> Self {
        Self {
            services,
            table: DataTable::new(columns()),
            tree: Vec::new(),
            loading: false,
        }
    }

    pub fn table(&self) -> &DataTable<Category> {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut DataTable<Category> {
        &mut self.table
    }

    pub fn categories(&self) -> &[Category] {
        self.table.rows()
    }

    pub fn tree(&self) -> &[CategoryTree] {
        &self.tree
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Replaces the table rows with the current catalog. On failure the old rows stay.
    pub async fn load(&mut self) -> ApiResult<()> {
        self.table.set_loading(true);
        let result = track(
            &mut self.loading,
            &self.services.notifier,
            self.services.api.list_categories(),
        )
        .await;
        self.table.set_loading(false);

        let categories = result?;
        info!("loaded {} categories", categories.len());
        self.table.set_rows(categories);
        Ok(())
    }

    pub async fn load_tree(&mut self) -> ApiResult<()> {
        self.tree = track(
            &mut self.loading,
            &self.services.notifier,
            self.services.api.category_tree(),
        )
        .await?;
        Ok(())
    }

    /// Category-first flattening of the tree, with depths.
    pub fn tree_lines(&self) -> Vec<(usize, &Category)> {
        self.tree.iter().flat_map(CategoryTree::walk).collect()
    }

    pub fn new_form(&self) -> CategoryForm {
        CategoryForm::new(self.table.rows().to_vec())
    }

    pub fn edit_form(&self, id: u64) -> Option<CategoryForm> {
        let rows = self.table.rows();
        let category = rows.iter().find(|c| c.id == id)?;
        Some(CategoryForm::edit(category, rows.to_vec()))
    }

    /// Creates or updates depending on the form mode, then reloads.
    pub async fn save(&mut self, form: &mut CategoryForm) -> Result<Category, SubmitError> {
        let payload = form.commit()?;
        let (saved, message) = match form.editing_id() {
            Some(id) => {
                let saved = track(
                    &mut self.loading,
                    &self.services.notifier,
                    self.services.api.update_category(id, &payload),
                )
                .await?;
                (saved, MSG_UPDATED)
            }
            None => {
                let saved = track(
                    &mut self.loading,
                    &self.services.notifier,
                    self.services.api.create_category(&payload),
                )
                .await?;
                (saved, MSG_CREATED)
            }
        };
        self.services.notifier.success(message);
        // A failed reload is already reported and does not undo the save.
        if let Err(err) = self.load().await {
            debug!("reload failed: {err}");
        }
        Ok(saved)
    }

    pub async fn delete(&mut self, id: u64) -> ApiResult<()> {
        track(
            &mut self.loading,
            &self.services.notifier,
            self.services.api.delete_category(id),
        )
        .await?;
        self.services.notifier.success(MSG_DELETED);
        if let Err(err) = self.load().await {
            debug!("reload failed: {err}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_column_renders_yes_no() {
        let locale = crate::Locale::es_co();
        let column = &columns()[3];
        let category = Category {
            id: 1,
            code: "1".to_owned(),
            name: "Alimentación".to_owned(),
            description: None,
            parent: None,
            level: 1,
            is_movement: true,
        };
        let table: DataTable<Category> = DataTable::new(columns());
        assert_eq!(table.format_cell(&category, column, &locale), "Sí");
        let leaf = Category {
            is_movement: false,
            ..category
        };
        assert_eq!(table.format_cell(&leaf, column, &locale), "No");
    }

    #[test]
    fn test_only_descriptive_columns_sort() {
        let sortable: Vec<bool> = columns().iter().map(|c| c.sortable).collect();
        assert_eq!(sortable, vec![true, true, true, false]);
    }
}
