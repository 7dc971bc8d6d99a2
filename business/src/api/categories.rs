use super::ApiClient;
use crate::error::ApiResult;
use crate::models::{Category, CategoryPayload, CategoryTree};

impl ApiClient {
    /// GET `/costs/categories/`
    pub async fn list_categories(&self) -> ApiResult<Vec<Category>> {
        self.fetch_data(self.get("/costs/categories/"), "category list")
            .await
    }

    /// GET `/costs/categories/{id}/`
    pub async fn get_category(&self, id: u64) -> ApiResult<Category> {
        self.fetch_data(self.get(&format!("/costs/categories/{id}/")), "category")
            .await
    }

    /// GET `/costs/categories/tree/`
    pub async fn category_tree(&self) -> ApiResult<Vec<CategoryTree>> {
        self.fetch_data(self.get("/costs/categories/tree/"), "category tree")
            .await
    }

    /// POST `/costs/categories/`
    pub async fn create_category(&self, payload: &CategoryPayload) -> ApiResult<Category> {
        let request = self.post("/costs/categories/", payload)?;
        self.fetch_data(request, "created category").await
    }

    /// PUT `/costs/categories/{id}/`
    pub async fn update_category(&self, id: u64, payload: &CategoryPayload) -> ApiResult<Category> {
        let request = self.put(&format!("/costs/categories/{id}/"), payload)?;
        self.fetch_data(request, "updated category").await
    }

    /// DELETE `/costs/categories/{id}/`
    pub async fn delete_category(&self, id: u64) -> ApiResult<()> {
        self.fetch_ack(
            self.delete(&format!("/costs/categories/{id}/")),
            "category deletion",
        )
        .await
    }
}
