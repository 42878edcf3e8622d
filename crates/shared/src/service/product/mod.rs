mod command;
mod query;

pub use self::command::ProductCommandService;
pub use self::query::{FEATURED_SAMPLE_SIZE, ProductQueryService};

use crate::{
    abstract_trait::{
        DynCategoryRepository, DynProductCommandRepository, DynProductCommandService,
        DynProductQueryRepository, DynProductQueryService,
    },
    utils::Metrics,
};
use anyhow::Result;
use prometheus_client::registry::Registry;
use std::{fmt, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct ProductService {
    pub query: DynProductQueryService,
    pub command: DynProductCommandService,
}

impl fmt::Debug for ProductService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProductService")
            .field("query", &"Arc<dyn ProductQueryServiceTrait>")
            .field("command", &"Arc<dyn ProductCommandServiceTrait>")
            .finish()
    }
}

impl ProductService {
    pub async fn new(
        category: DynCategoryRepository,
        query: DynProductQueryRepository,
        command: DynProductCommandRepository,
        registry: Arc<Mutex<Registry>>,
    ) -> Result<Self> {
        let query_service = Arc::new(
            ProductQueryService::new(
                category.clone(),
                query.clone(),
                Arc::new(Mutex::new(Metrics::new())),
                registry.clone(),
            )
            .await,
        ) as DynProductQueryService;

        let command_service = Arc::new(
            ProductCommandService::new(
                category,
                query,
                command,
                Arc::new(Mutex::new(Metrics::new())),
                registry,
            )
            .await,
        ) as DynProductCommandService;

        Ok(Self {
            query: query_service,
            command: command_service,
        })
    }
}
