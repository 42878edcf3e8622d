use crate::di::{DependenciesInject, DependenciesInjectDeps};
use anyhow::{Context, Result};
use prometheus_client::registry::Registry;
use shared::{config::ConnectionPool, repository::InMemoryCatalog};
use std::{fmt, sync::Arc};
use tokio::sync::Mutex;
use tracing::info;

/// Categories the in-memory store starts with.
pub const DEFAULT_CATEGORIES: &[&str] = &["Books", "Electronics", "Tools"];

#[derive(Clone)]
pub struct AppState {
    pub di_container: DependenciesInject,
    pub registry: Arc<Mutex<Registry>>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("di_container", &self.di_container)
            .field("registry", &"Arc<Mutex<Registry>>")
            .finish()
    }
}

impl AppState {
    pub async fn new(pool: ConnectionPool) -> Result<Self> {
        info!("🗄️ Using Postgres catalog store");
        Self::build(DependenciesInjectDeps::postgres(pool)).await
    }

    pub async fn in_memory(catalog: Arc<InMemoryCatalog>) -> Result<Self> {
        info!("🧠 Using in-memory catalog store");
        Self::build(DependenciesInjectDeps::in_memory(catalog)).await
    }

    async fn build(deps: DependenciesInjectDeps) -> Result<Self> {
        let registry = Arc::new(Mutex::new(Registry::default()));

        let di_container = DependenciesInject::new(deps, registry.clone())
            .await
            .context("Failed to initialize dependency injection container")?;

        Ok(Self {
            di_container,
            registry,
        })
    }
}
