use crate::{
    domain::responses::{ApiResponse, CategoryResponse, ProductDetailResponse, ProductsPage},
    errors::{RepositoryError, ServiceError},
    model::{Product as ProductModel, ProductImage as ProductImageModel},
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type DynProductQueryRepository = Arc<dyn ProductQueryRepositoryTrait + Send + Sync>;
pub type DynProductQueryService = Arc<dyn ProductQueryServiceTrait + Send + Sync>;

#[async_trait]
pub trait ProductQueryRepositoryTrait {
    async fn find_active(&self) -> Result<Vec<ProductModel>, RepositoryError>;
    /// Up to `limit` featured products picked at random.
    async fn find_featured_sample(&self, limit: usize)
    -> Result<Vec<ProductModel>, RepositoryError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<ProductModel>, RepositoryError>;
    async fn find_images(&self, product_id: i32)
    -> Result<Vec<ProductImageModel>, RepositoryError>;
}

#[async_trait]
pub trait ProductQueryServiceTrait {
    async fn list_products(&self) -> Result<ApiResponse<ProductsPage>, ServiceError>;
    async fn find_categories(&self) -> Result<ApiResponse<Vec<CategoryResponse>>, ServiceError>;
    async fn find_by_id(&self, id: i32)
    -> Result<ApiResponse<ProductDetailResponse>, ServiceError>;
}
