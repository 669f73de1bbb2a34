//! Catalog service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;

use crate::{
    api::{ApiClient, ApiError},
    catalog::{Category, CategoryId, Product},
};

#[derive(Debug, Clone)]
pub struct HttpCatalogService {
    api: Arc<ApiClient>,
}

impl HttpCatalogService {
    #[must_use]
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl CatalogService for HttpCatalogService {
    async fn products(&self, category: Option<CategoryId>) -> Result<Vec<Product>, ApiError> {
        match category {
            Some(category) => {
                let category = category.to_string();

                self.api
                    .get_with_query("/products/", &[("category", category.as_str())])
                    .await
            }
            None => self.api.get("/products/").await,
        }
    }

    async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        self.api.get("/categories/").await
    }
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Products, optionally limited to one category.
    async fn products(&self, category: Option<CategoryId>) -> Result<Vec<Product>, ApiError>;

    /// Every category.
    async fn categories(&self) -> Result<Vec<Category>, ApiError>;
}
