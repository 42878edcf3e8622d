use super::query::product_detail;
use crate::{
    abstract_trait::{
        DynCategoryRepository, DynProductCommandRepository, DynProductQueryRepository,
        ProductCommandServiceTrait,
    },
    domain::{
        images::reconcile_images,
        requests::{
            CreateProductRequest, ProductForm, UpdateProductRequest, validate_product_fields,
        },
        responses::{ApiResponse, ProductDetailResponse, ProductResponse},
    },
    errors::{FieldError, FieldErrorKind, FormErrors, RepositoryError, ServiceError},
    model::{Category as CategoryModel, Product as ProductModel},
    utils::{Method, Metrics, Status as StatusUtils},
};
use async_trait::async_trait;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::{sync::Mutex, time::Instant};
use tracing::{error, info};

pub struct ProductCommandService {
    pub category: DynCategoryRepository,
    pub query: DynProductQueryRepository,
    pub command: DynProductCommandRepository,
    pub metrics: Arc<Mutex<Metrics>>,
}

/// Turns a write failure into a service error. A duplicate sku becomes a
/// field error so the form can show it next to the input.
fn map_write_error(id: Option<i32>, err: RepositoryError) -> ServiceError {
    match err {
        RepositoryError::AlreadyExists(field) if field == "sku" => {
            ServiceError::Validation(FormErrors::single(
                "sku",
                FieldError::new(
                    FieldErrorKind::UniqueViolation,
                    "Product with this SKU already exists.",
                ),
            ))
        }
        RepositoryError::NotFound => match id {
            Some(id) => ServiceError::product_not_found(id),
            None => ServiceError::Repo(RepositoryError::NotFound),
        },
        other => ServiceError::Repo(other),
    }
}

impl ProductCommandService {
    pub async fn new(
        category: DynCategoryRepository,
        query: DynProductQueryRepository,
        command: DynProductCommandRepository,
        metrics: Arc<Mutex<Metrics>>,
        registry: Arc<Mutex<Registry>>,
    ) -> Self {
        metrics.lock().await.register(
            &mut *registry.lock().await,
            "product_command_service",
            "ProductCommandService",
        );

        Self {
            category,
            query,
            command,
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

    async fn finish<T>(
        &self,
        start_time: Instant,
        method: Method,
        result: Result<T, ServiceError>,
        success_message: impl FnOnce(&T) -> String,
    ) -> Result<T, ServiceError> {
        let (is_success, message) = match &result {
            Ok(value) => (true, success_message(value)),
            Err(err) => (false, err.to_string()),
        };

        self.complete_operation(start_time, method, is_success, &message)
            .await;
        result
    }

    async fn find_product(&self, id: i32) -> Result<ProductModel, ServiceError> {
        self.query
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::product_not_found(id))
    }

    async fn resolve_category(&self, name: Option<&str>) -> Result<CategoryModel, ServiceError> {
        let name = name.unwrap_or_default();

        self.category
            .find_by_name(name)
            .await?
            .ok_or_else(|| ServiceError::category_not_found(name))
    }

    async fn create(&self, form: &ProductForm) -> Result<ProductDetailResponse, ServiceError> {
        let product = validate_product_fields(form).map_err(ServiceError::Validation)?;
        let category = self.resolve_category(product.category.as_deref()).await?;

        let request = CreateProductRequest::new(&product, category.category_id);
        let created = self
            .command
            .create_product(&request, &product.image_urls)
            .await
            .map_err(|err| map_write_error(None, err))?;

        Ok(ProductDetailResponse {
            product: ProductResponse::from(created),
            category: Some(category.name),
            images: product.image_urls,
        })
    }

    async fn update(
        &self,
        id: i32,
        form: &ProductForm,
    ) -> Result<ProductDetailResponse, ServiceError> {
        let existing = self.find_product(id).await?;

        let product = validate_product_fields(form).map_err(ServiceError::Validation)?;
        let category = self.resolve_category(product.category.as_deref()).await?;

        let current: Vec<String> = self
            .query
            .find_images(existing.product_id)
            .await?
            .into_iter()
            .map(|image| image.url)
            .collect();
        let changes = reconcile_images(&current, &product.image_urls);

        let request = UpdateProductRequest::new(id, &product, category.category_id);
        let updated = self
            .command
            .update_product(&request, &changes)
            .await
            .map_err(|err| map_write_error(Some(id), err))?;

        product_detail(&self.category, &self.query, updated).await
    }
}

#[async_trait]
impl ProductCommandServiceTrait for ProductCommandService {
    async fn create_product(
        &self,
        form: &ProductForm,
    ) -> Result<ApiResponse<ProductDetailResponse>, ServiceError> {
        info!("🏗️ Creating new product: {:?}", form.name);

        let method = Method::Post;
        let start = self.start_operation("CreateProduct");

        let detail = self
            .finish(start, method, self.create(form).await, |detail| {
                format!("Created product {}", detail.product.id)
            })
            .await?;

        Ok(ApiResponse::success("Product created successfully", detail))
    }

    async fn update_product(
        &self,
        id: i32,
        form: &ProductForm,
    ) -> Result<ApiResponse<ProductDetailResponse>, ServiceError> {
        info!("🔄 Updating product ID: {id}");

        let method = Method::Put;
        let start = self.start_operation("UpdateProduct");

        let detail = self
            .finish(start, method, self.update(id, form).await, |detail| {
                format!(
                    "Updated product {} with {} image(s)",
                    detail.product.id,
                    detail.images.len()
                )
            })
            .await?;

        Ok(ApiResponse::success("Product updated successfully", detail))
    }

    async fn delete_product(&self, id: i32) -> Result<ApiResponse<()>, ServiceError> {
        info!("🗑️ Deleting product ID: {id}");

        let method = Method::Delete;
        let start = self.start_operation("DeleteProduct");

        let result = async {
            self.find_product(id).await?;
            self.command
                .delete_product(id)
                .await
                .map_err(|err| map_write_error(Some(id), err))
        }
        .await;

        self.finish(start, method, result, |_| format!("Deleted product {id}"))
            .await?;

        Ok(ApiResponse::success("Product deleted successfully", ()))
    }

    async fn toggle_featured(
        &self,
        id: i32,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        info!("⭐ Toggling featured flag of product ID: {id}");

        let method = Method::Post;
        let start = self.start_operation("ToggleFeatured");

        let result = async {
            let product = self.find_product(id).await?;
            self.command
                .set_featured(id, !product.featured)
                .await
                .map_err(|err| map_write_error(Some(id), err))
        }
        .await;

        let product = self
            .finish(start, method, result, |product| {
                format!("Product {id} featured={}", product.featured)
            })
            .await?;

        Ok(ApiResponse::success(
            "Product featured flag toggled",
            ProductResponse::from(product),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{abstract_trait::ProductQueryRepositoryTrait, repository::InMemoryCatalog};
    use assert_matches::assert_matches;

    async fn setup() -> (Arc<InMemoryCatalog>, ProductCommandService) {
        let store = Arc::new(InMemoryCatalog::with_categories(&["Tools", "Books"]).await);
        let service = ProductCommandService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            Arc::new(Mutex::new(Metrics::new())),
            Arc::new(Mutex::new(Registry::default())),
        )
        .await;

        (store, service)
    }

    fn widget_form() -> ProductForm {
        ProductForm {
            name: Some("Widget".into()),
            sku: Some("ABCD1234".into()),
            price: Some("19.99".into()),
            category: Some("Tools".into()),
            image_1: Some("http://x/1.png".into()),
            ..Default::default()
        }
    }

    async fn image_urls(store: &InMemoryCatalog, id: i32) -> Vec<String> {
        store
            .find_images(id)
            .await
            .unwrap()
            .into_iter()
            .map(|image| image.url)
            .collect()
    }

    #[tokio::test]
    async fn creates_widget_with_one_image() {
        let (store, service) = setup().await;

        let detail = service.create_product(&widget_form()).await.unwrap().data;

        assert_eq!(detail.product.name, "Widget");
        assert_eq!(detail.product.sku, "ABCD1234");
        assert_eq!(detail.product.price, 19.99);
        assert!(!detail.product.featured);
        assert!(detail.product.active);
        assert_eq!(detail.category.as_deref(), Some("Tools"));
        assert_eq!(
            image_urls(&store, detail.product.id).await,
            vec!["http://x/1.png"]
        );
    }

    #[tokio::test]
    async fn invalid_submission_creates_nothing() {
        let (store, service) = setup().await;
        let form = ProductForm {
            name: Some("Widget".into()),
            ..Default::default()
        };

        let err = service.create_product(&form).await.unwrap_err();

        assert_matches!(err, ServiceError::Validation(errors) => {
            assert!(errors.contains("sku"));
            assert!(errors.contains("price"));
            assert!(!errors.contains("name"));
        });
        assert_eq!(store.product_count().await, 0);
        assert_eq!(store.image_count().await, 0);
    }

    #[tokio::test]
    async fn create_with_unknown_category_is_not_found() {
        let (store, service) = setup().await;
        let form = ProductForm {
            category: Some("Garden".into()),
            ..widget_form()
        };

        let err = service.create_product(&form).await.unwrap_err();

        assert_matches!(err, ServiceError::NotFound(msg) if msg.contains("Garden"));
        assert_eq!(store.product_count().await, 0);
    }

    #[tokio::test]
    async fn create_without_category_is_not_found() {
        let (_store, service) = setup().await;
        let form = ProductForm {
            category: None,
            ..widget_form()
        };

        let err = service.create_product(&form).await.unwrap_err();

        assert_matches!(err, ServiceError::NotFound(_));
    }

    #[tokio::test]
    async fn duplicate_sku_is_a_field_error() {
        let (store, service) = setup().await;
        service.create_product(&widget_form()).await.unwrap();

        let err = service.create_product(&widget_form()).await.unwrap_err();

        assert_matches!(err, ServiceError::Validation(errors) => {
            assert_eq!(errors.kind_of("sku"), Some(FieldErrorKind::UniqueViolation));
        });
        assert_eq!(store.product_count().await, 1);
    }

    #[tokio::test]
    async fn edit_reconciles_images() {
        let (store, service) = setup().await;
        let form = ProductForm {
            image_1: Some("a".into()),
            image_2: Some("b".into()),
            image_3: Some("c".into()),
            ..widget_form()
        };
        let id = service.create_product(&form).await.unwrap().data.product.id;

        let edit = ProductForm {
            name: Some("Widget Pro".into()),
            category: Some("Books".into()),
            image_1: Some("b".into()),
            image_2: Some("c".into()),
            image_3: Some("d".into()),
            ..widget_form()
        };
        let detail = service.update_product(id, &edit).await.unwrap().data;

        assert_eq!(detail.product.name, "Widget Pro");
        assert_eq!(detail.category.as_deref(), Some("Books"));
        let mut urls = image_urls(&store, id).await;
        urls.sort();
        assert_eq!(urls, vec!["b", "c", "d"]);
    }

    #[tokio::test]
    async fn edit_with_unchanged_images_keeps_them() {
        let (store, service) = setup().await;
        let id = service
            .create_product(&widget_form())
            .await
            .unwrap()
            .data
            .product
            .id;
        let before = store.find_images(id).await.unwrap();

        service.update_product(id, &widget_form()).await.unwrap();

        assert_eq!(store.find_images(id).await.unwrap(), before);
    }

    #[tokio::test]
    async fn edit_can_keep_its_own_sku() {
        let (_store, service) = setup().await;
        let id = service
            .create_product(&widget_form())
            .await
            .unwrap()
            .data
            .product
            .id;

        let result = service.update_product(id, &widget_form()).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn edit_of_unknown_product_is_not_found() {
        let (_store, service) = setup().await;

        let err = service.update_product(99, &widget_form()).await.unwrap_err();

        assert_matches!(err, ServiceError::NotFound(msg) if msg.contains("99"));
    }

    #[tokio::test]
    async fn invalid_edit_leaves_product_untouched() {
        let (store, service) = setup().await;
        let id = service
            .create_product(&widget_form())
            .await
            .unwrap()
            .data
            .product
            .id;
        let edit = ProductForm {
            price: Some("-5".into()),
            image_1: None,
            ..widget_form()
        };

        let err = service.update_product(id, &edit).await.unwrap_err();

        assert_matches!(err, ServiceError::Validation(errors) => {
            assert_eq!(errors.kind_of("price"), Some(FieldErrorKind::RangeViolation));
        });
        let product = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(product.price, 19.99);
        assert_eq!(image_urls(&store, id).await, vec!["http://x/1.png"]);
    }

    #[tokio::test]
    async fn delete_cascades_to_images() {
        let (store, service) = setup().await;
        let id = service
            .create_product(&widget_form())
            .await
            .unwrap()
            .data
            .product
            .id;

        service.delete_product(id).await.unwrap();

        assert_eq!(store.product_count().await, 0);
        assert!(store.find_images(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_of_unknown_product_is_not_found() {
        let (_store, service) = setup().await;

        let err = service.delete_product(7).await.unwrap_err();

        assert_matches!(err, ServiceError::NotFound(_));
    }

    #[tokio::test]
    async fn repeated_image_urls_never_exceed_three_images() {
        let (store, service) = setup().await;
        let form = ProductForm {
            image_1: Some("x".into()),
            image_2: Some("x".into()),
            image_3: Some("x".into()),
            ..widget_form()
        };
        let id = service.create_product(&form).await.unwrap().data.product.id;
        assert_eq!(image_urls(&store, id).await, vec!["x"]);

        let edit = ProductForm {
            image_1: Some("x".into()),
            image_2: Some("y".into()),
            image_3: Some("z".into()),
            ..widget_form()
        };
        service.update_product(id, &edit).await.unwrap();

        let mut urls = image_urls(&store, id).await;
        urls.sort();
        assert_eq!(urls, vec!["x", "y", "z"]);
    }

    #[tokio::test]
    async fn toggling_twice_restores_featured() {
        let (_store, service) = setup().await;
        let id = service
            .create_product(&widget_form())
            .await
            .unwrap()
            .data
            .product
            .id;

        let once = service.toggle_featured(id).await.unwrap().data;
        let twice = service.toggle_featured(id).await.unwrap().data;

        assert!(once.featured);
        assert!(!twice.featured);
    }

    #[tokio::test]
    async fn operations_are_counted() {
        let (_store, service) = setup().await;
        service.create_product(&widget_form()).await.unwrap();
        let _ = service.create_product(&ProductForm::default()).await;

        let metrics = service.metrics.lock().await;
        assert_eq!(metrics.count(Method::Post, StatusUtils::Success), 1);
        assert_eq!(metrics.count(Method::Post, StatusUtils::Error), 1);
    }
}
