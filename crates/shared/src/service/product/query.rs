use crate::{
    abstract_trait::{DynCategoryRepository, DynProductQueryRepository, ProductQueryServiceTrait},
    domain::responses::{
        ApiResponse, CategoryResponse, ProductDetailResponse, ProductResponse, ProductsPage,
    },
    errors::ServiceError,
    model::Product as ProductModel,
    utils::{Method, Metrics, Status as StatusUtils},
};
use async_trait::async_trait;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::{sync::Mutex, time::Instant};
use tracing::{error, info};

/// Most featured products shown next to the listing.
pub const FEATURED_SAMPLE_SIZE: usize = 4;

pub struct ProductQueryService {
    pub category: DynCategoryRepository,
    pub query: DynProductQueryRepository,
    pub metrics: Arc<Mutex<Metrics>>,
}

impl ProductQueryService {
    pub async fn new(
        category: DynCategoryRepository,
        query: DynProductQueryRepository,
        metrics: Arc<Mutex<Metrics>>,
        registry: Arc<Mutex<Registry>>,
    ) -> Self {
        metrics.lock().await.register(
            &mut *registry.lock().await,
            "product_query_service",
            "ProductQueryService",
        );

        Self {
            category,
            query,
            metrics,
        }
    }

    fn start_operation(&self, operation_name: &str) -> Instant {
        info!("Starting operation: {operation_name}");
        Instant::now()
    }

    async fn complete_operation(
        &self,
        start_time: Instant,
        method: Method,
        is_success: bool,
        message: &str,
    ) {
        let status = if is_success {
            StatusUtils::Success
        } else {
            StatusUtils::Error
        };
        let elapsed = start_time.elapsed().as_secs_f64();

        if is_success {
            info!("✅ Operation completed successfully: {message}");
        } else {
            error!("❌ Operation failed: {message}");
        }

        self.metrics.lock().await.record(method, status, elapsed);
    }

    async fn load_detail(&self, id: i32) -> Result<ProductDetailResponse, ServiceError> {
        let product = self
            .query
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::product_not_found(id))?;

        product_detail(&self.category, &self.query, product).await
    }
}

/// Joins a product row with its category name and image URLs.
pub(super) async fn product_detail(
    category: &DynCategoryRepository,
    query: &DynProductQueryRepository,
    product: ProductModel,
) -> Result<ProductDetailResponse, ServiceError> {
    let category_name = category
        .find_by_id(product.category_id)
        .await?
        .map(|c| c.name);

    let images = query
        .find_images(product.product_id)
        .await?
        .into_iter()
        .map(|image| image.url)
        .collect();

    Ok(ProductDetailResponse {
        product: ProductResponse::from(product),
        category: category_name,
        images,
    })
}

#[async_trait]
impl ProductQueryServiceTrait for ProductQueryService {
    async fn list_products(&self) -> Result<ApiResponse<ProductsPage>, ServiceError> {
        info!("🔍 Listing active and featured products");

        let method = Method::Get;
        let start = self.start_operation("ListProducts");

        let result = async {
            let products = self.query.find_active().await?;
            let featured = self.query.find_featured_sample(FEATURED_SAMPLE_SIZE).await?;
            Ok::<_, ServiceError>((products, featured))
        }
        .await;

        match result {
            Ok((products, featured)) => {
                let page = ProductsPage {
                    products: products.into_iter().map(ProductResponse::from).collect(),
                    featured_products: featured.into_iter().map(ProductResponse::from).collect(),
                };

                self.complete_operation(
                    start,
                    method,
                    true,
                    &format!(
                        "Listed {} products, {} featured",
                        page.products.len(),
                        page.featured_products.len()
                    ),
                )
                .await;

                Ok(ApiResponse::success("Products retrieved successfully", page))
            }
            Err(err) => {
                self.complete_operation(
                    start,
                    method,
                    false,
                    &format!("Failed to list products: {err}"),
                )
                .await;
                Err(err)
            }
        }
    }

    async fn find_categories(&self) -> Result<ApiResponse<Vec<CategoryResponse>>, ServiceError> {
        let method = Method::Get;
        let start = self.start_operation("FindCategories");

        match self.category.find_all().await {
            Ok(categories) => {
                let data: Vec<CategoryResponse> =
                    categories.into_iter().map(CategoryResponse::from).collect();

                self.complete_operation(
                    start,
                    method,
                    true,
                    &format!("Found {} categories", data.len()),
                )
                .await;

                Ok(ApiResponse::success("Categories retrieved successfully", data))
            }
            Err(err) => {
                self.complete_operation(
                    start,
                    method,
                    false,
                    &format!("Failed to list categories: {err}"),
                )
                .await;
                Err(ServiceError::Repo(err))
            }
        }
    }

    async fn find_by_id(
        &self,
        id: i32,
    ) -> Result<ApiResponse<ProductDetailResponse>, ServiceError> {
        info!("🔍 Finding product by ID: {id}");

        let method = Method::Get;
        let start = self.start_operation("FindProductById");

        match self.load_detail(id).await {
            Ok(detail) => {
                self.complete_operation(start, method, true, &format!("Found product {id}"))
                    .await;

                Ok(ApiResponse::success("Product retrieved successfully", detail))
            }
            Err(err) => {
                self.complete_operation(start, method, false, &err.to_string())
                    .await;
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        abstract_trait::ProductCommandRepositoryTrait,
        domain::requests::CreateProductRequest,
        repository::InMemoryCatalog,
    };
    use assert_matches::assert_matches;

    async fn setup() -> (Arc<InMemoryCatalog>, ProductQueryService) {
        let store = Arc::new(InMemoryCatalog::with_categories(&["Tools", "Books"]).await);
        let service = ProductQueryService::new(
            store.clone(),
            store.clone(),
            Arc::new(Mutex::new(Metrics::new())),
            Arc::new(Mutex::new(Registry::default())),
        )
        .await;

        (store, service)
    }

    async fn seed(store: &InMemoryCatalog, sku: &str, featured: bool, active: bool) -> i32 {
        let request = CreateProductRequest {
            name: format!("Product {sku}"),
            sku: sku.into(),
            price: 10.0,
            description: None,
            category_id: 1,
            featured: false,
            active,
        };
        let product = store
            .create_product(&request, &["http://x/1.png".to_string()])
            .await
            .unwrap();
        if featured {
            store.set_featured(product.product_id, true).await.unwrap();
        }
        product.product_id
    }

    #[tokio::test]
    async fn listing_shows_only_active_products() {
        let (store, service) = setup().await;
        seed(&store, "ACTIVE01", false, true).await;
        seed(&store, "HIDDEN01", false, false).await;

        let page = service.list_products().await.unwrap().data;

        assert_eq!(page.products.len(), 1);
        assert_eq!(page.products[0].sku, "ACTIVE01");
        assert!(page.featured_products.is_empty());
    }

    #[tokio::test]
    async fn listing_caps_featured_products() {
        let (store, service) = setup().await;
        for i in 0..7 {
            seed(&store, &format!("FEATURE{i}"), true, true).await;
        }

        let page = service.list_products().await.unwrap().data;

        assert_eq!(page.products.len(), 7);
        assert_eq!(page.featured_products.len(), FEATURED_SAMPLE_SIZE);
        assert!(page.featured_products.iter().all(|p| p.featured));
    }

    #[tokio::test]
    async fn find_by_id_joins_category_and_images() {
        let (store, service) = setup().await;
        let id = seed(&store, "ABCD1234", false, true).await;

        let detail = service.find_by_id(id).await.unwrap().data;

        assert_eq!(detail.product.sku, "ABCD1234");
        assert_eq!(detail.category.as_deref(), Some("Tools"));
        assert_eq!(detail.images, vec!["http://x/1.png"]);
    }

    #[tokio::test]
    async fn find_by_id_of_unknown_product_is_not_found() {
        let (_store, service) = setup().await;

        let err = service.find_by_id(404).await.unwrap_err();

        assert_matches!(err, ServiceError::NotFound(msg) if msg.contains("404"));
    }

    #[tokio::test]
    async fn categories_are_sorted_by_name() {
        let (_store, service) = setup().await;

        let names: Vec<String> = service
            .find_categories()
            .await
            .unwrap()
            .data
            .into_iter()
            .map(|c| c.name)
            .collect();

        assert_eq!(names, vec!["Books", "Tools"]);
    }
}
