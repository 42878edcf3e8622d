use crate::{errors::RepositoryError, model::Category as CategoryModel};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type DynCategoryRepository = Arc<dyn CategoryRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait CategoryRepositoryTrait {
    async fn find_all(&self) -> Result<Vec<CategoryModel>, RepositoryError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<CategoryModel>, RepositoryError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<CategoryModel>, RepositoryError>;
}
