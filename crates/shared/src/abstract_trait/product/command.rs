use crate::{
    domain::{
        images::ImageChanges,
        requests::{CreateProductRequest, ProductForm, UpdateProductRequest},
        responses::{ApiResponse, ProductDetailResponse, ProductResponse},
    },
    errors::{RepositoryError, ServiceError},
    model::Product as ProductModel,
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type DynProductCommandRepository = Arc<dyn ProductCommandRepositoryTrait + Send + Sync>;
pub type DynProductCommandService = Arc<dyn ProductCommandServiceTrait + Send + Sync>;

#[async_trait]
pub trait ProductCommandRepositoryTrait {
    /// Inserts the product and one image row per URL as a single unit.
    async fn create_product(
        &self,
        req: &CreateProductRequest,
        image_urls: &[String],
    ) -> Result<ProductModel, RepositoryError>;
    /// Updates the product row and applies the image changes as a single unit.
    async fn update_product(
        &self,
        req: &UpdateProductRequest,
        images: &ImageChanges,
    ) -> Result<ProductModel, RepositoryError>;
    async fn set_featured(&self, id: i32, featured: bool) -> Result<ProductModel, RepositoryError>;
    async fn delete_product(&self, id: i32) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait ProductCommandServiceTrait {
    async fn create_product(
        &self,
        form: &ProductForm,
    ) -> Result<ApiResponse<ProductDetailResponse>, ServiceError>;
    async fn update_product(
        &self,
        id: i32,
        form: &ProductForm,
    ) -> Result<ApiResponse<ProductDetailResponse>, ServiceError>;
    async fn delete_product(&self, id: i32) -> Result<ApiResponse<()>, ServiceError>;
    async fn toggle_featured(&self, id: i32)
    -> Result<ApiResponse<ProductResponse>, ServiceError>;
}
