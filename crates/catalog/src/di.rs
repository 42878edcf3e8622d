use anyhow::{Context, Result};
use prometheus_client::registry::Registry;
use shared::{
    abstract_trait::{
        DynCategoryRepository, DynProductCommandRepository, DynProductCommandService,
        DynProductQueryRepository, DynProductQueryService,
    },
    config::ConnectionPool,
    repository::{CategoryRepository, InMemoryCatalog, ProductRepository},
    service::ProductService,
};
use std::{fmt, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct DependenciesInject {
    pub product_query: DynProductQueryService,
    pub product_command: DynProductCommandService,
}

impl fmt::Debug for DependenciesInject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependenciesInject")
            .field("product_query", &"ProductQueryService")
            .field("product_command", &"ProductCommandService")
            .finish()
    }
}

/// Repositories the catalog services are built on.
#[derive(Clone)]
pub struct DependenciesInjectDeps {
    pub category: DynCategoryRepository,
    pub product_query: DynProductQueryRepository,
    pub product_command: DynProductCommandRepository,
}

impl DependenciesInjectDeps {
    pub fn postgres(pool: ConnectionPool) -> Self {
        let product = ProductRepository::new(pool.clone());

        Self {
            category: Arc::new(CategoryRepository::new(pool)) as DynCategoryRepository,
            product_query: product.query,
            product_command: product.command,
        }
    }

    pub fn in_memory(catalog: Arc<InMemoryCatalog>) -> Self {
        Self {
            category: catalog.clone() as DynCategoryRepository,
            product_query: catalog.clone() as DynProductQueryRepository,
            product_command: catalog as DynProductCommandRepository,
        }
    }
}

impl DependenciesInject {
    pub async fn new(deps: DependenciesInjectDeps, registry: Arc<Mutex<Registry>>) -> Result<Self> {
        let DependenciesInjectDeps {
            category,
            product_query,
            product_command,
        } = deps;

        let product = ProductService::new(category, product_query, product_command, registry)
            .await
            .context("failed initialize product service")?;

        Ok(Self {
            product_query: product.query,
            product_command: product.command,
        })
    }
}
