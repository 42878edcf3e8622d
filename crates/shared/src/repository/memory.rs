use crate::{
    abstract_trait::{
        CategoryRepositoryTrait, ProductCommandRepositoryTrait, ProductQueryRepositoryTrait,
    },
    domain::{
        images::ImageChanges,
        requests::{CreateProductRequest, UpdateProductRequest},
    },
    errors::RepositoryError,
    model::{Category as CategoryModel, Product as ProductModel, ProductImage as ProductImageModel},
};
use async_trait::async_trait;
use chrono::Utc;
use rand::seq::IndexedRandom;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::info;

#[derive(Default)]
struct Tables {
    categories: Vec<CategoryModel>,
    products: BTreeMap<i32, ProductModel>,
    images: Vec<ProductImageModel>,
    next_category_id: i32,
    next_product_id: i32,
    next_image_id: i32,
}

impl Tables {
    fn sku_taken(&self, sku: &str, except: Option<i32>) -> bool {
        self.products
            .values()
            .any(|p| p.sku == sku && Some(p.product_id) != except)
    }

    fn attach_images(&mut self, product_id: i32, urls: &[String]) {
        for url in urls {
            self.next_image_id += 1;
            self.images.push(ProductImageModel {
                image_id: self.next_image_id,
                product_id,
                url: url.clone(),
            });
        }
    }
}

/// Catalog tables kept in process memory.
///
/// Implements every catalog repository trait so it can stand in for Postgres
/// when no `DATABASE_URL` is configured. Each call holds the table lock for its
/// whole duration, so multi-row writes are atomic.
#[derive(Default)]
pub struct InMemoryCatalog {
    tables: RwLock<Tables>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_categories(names: &[&str]) -> Self {
        let catalog = Self::new();
        for name in names {
            catalog.add_category(name).await;
        }
        catalog
    }

    /// Adds a category, or returns the existing one with that name.
    pub async fn add_category(&self, name: &str) -> CategoryModel {
        let mut tables = self.tables.write().await;

        if let Some(existing) = tables.categories.iter().find(|c| c.name == name) {
            return existing.clone();
        }

        tables.next_category_id += 1;
        let category = CategoryModel {
            category_id: tables.next_category_id,
            name: name.to_string(),
        };
        tables.categories.push(category.clone());
        category
    }

    pub async fn product_count(&self) -> usize {
        self.tables.read().await.products.len()
    }

    pub async fn image_count(&self) -> usize {
        self.tables.read().await.images.len()
    }
}

#[async_trait]
impl CategoryRepositoryTrait for InMemoryCatalog {
    async fn find_all(&self) -> Result<Vec<CategoryModel>, RepositoryError> {
        let mut categories = self.tables.read().await.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<CategoryModel>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .categories
            .iter()
            .find(|c| c.category_id == id)
            .cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<CategoryModel>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.categories.iter().find(|c| c.name == name).cloned())
    }
}

#[async_trait]
impl ProductQueryRepositoryTrait for InMemoryCatalog {
    async fn find_active(&self) -> Result<Vec<ProductModel>, RepositoryError> {
        let tables = self.tables.read().await;

        let mut products: Vec<ProductModel> =
            tables.products.values().filter(|p| p.active).cloned().collect();
        products.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.product_id.cmp(&a.product_id))
        });

        Ok(products)
    }

    async fn find_featured_sample(
        &self,
        limit: usize,
    ) -> Result<Vec<ProductModel>, RepositoryError> {
        let tables = self.tables.read().await;

        let featured: Vec<&ProductModel> =
            tables.products.values().filter(|p| p.featured).collect();

        let sample = featured
            .choose_multiple(&mut rand::rng(), limit)
            .map(|p| (*p).clone())
            .collect();

        Ok(sample)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<ProductModel>, RepositoryError> {
        Ok(self.tables.read().await.products.get(&id).cloned())
    }

    async fn find_images(
        &self,
        product_id: i32,
    ) -> Result<Vec<ProductImageModel>, RepositoryError> {
        let tables = self.tables.read().await;

        Ok(tables
            .images
            .iter()
            .filter(|image| image.product_id == product_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ProductCommandRepositoryTrait for InMemoryCatalog {
    async fn create_product(
        &self,
        req: &CreateProductRequest,
        image_urls: &[String],
    ) -> Result<ProductModel, RepositoryError> {
        let mut tables = self.tables.write().await;

        if tables.sku_taken(&req.sku, None) {
            return Err(RepositoryError::AlreadyExists("sku".into()));
        }

        let now = Utc::now().naive_utc();
        tables.next_product_id += 1;
        let product = ProductModel {
            product_id: tables.next_product_id,
            name: req.name.clone(),
            sku: req.sku.clone(),
            price: req.price,
            description: req.description.clone(),
            category_id: req.category_id,
            featured: req.featured,
            active: req.active,
            created_at: Some(now),
            updated_at: Some(now),
        };

        tables.products.insert(product.product_id, product.clone());
        tables.attach_images(product.product_id, image_urls);

        info!("✅ Created product ID {} in memory", product.product_id);
        Ok(product)
    }

    async fn update_product(
        &self,
        req: &UpdateProductRequest,
        images: &ImageChanges,
    ) -> Result<ProductModel, RepositoryError> {
        let mut tables = self.tables.write().await;

        if !tables.products.contains_key(&req.id) {
            return Err(RepositoryError::NotFound);
        }
        if tables.sku_taken(&req.sku, Some(req.id)) {
            return Err(RepositoryError::AlreadyExists("sku".into()));
        }

        let updated = {
            let product = tables
                .products
                .get_mut(&req.id)
                .ok_or(RepositoryError::NotFound)?;
            product.name = req.name.clone();
            product.sku = req.sku.clone();
            product.price = req.price;
            product.description = req.description.clone();
            product.category_id = req.category_id;
            product.updated_at = Some(Utc::now().naive_utc());
            product.clone()
        };

        tables
            .images
            .retain(|image| image.product_id != req.id || !images.to_remove.contains(&image.url));
        tables.attach_images(req.id, &images.to_add);

        Ok(updated)
    }

    async fn set_featured(&self, id: i32, featured: bool) -> Result<ProductModel, RepositoryError> {
        let mut tables = self.tables.write().await;

        let product = tables
            .products
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound)?;
        product.featured = featured;
        product.updated_at = Some(Utc::now().naive_utc());

        Ok(product.clone())
    }

    async fn delete_product(&self, id: i32) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;

        if tables.products.remove(&id).is_none() {
            return Err(RepositoryError::NotFound);
        }
        tables.images.retain(|image| image.product_id != id);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn create_request(sku: &str, category_id: i32) -> CreateProductRequest {
        CreateProductRequest {
            name: "Widget".into(),
            sku: sku.into(),
            price: 19.99,
            description: None,
            category_id,
            featured: false,
            active: true,
        }
    }

    #[tokio::test]
    async fn duplicate_sku_is_rejected() {
        let catalog = InMemoryCatalog::new();
        catalog
            .create_product(&create_request("ABCD1234", 1), &[])
            .await
            .unwrap();

        let err = catalog
            .create_product(&create_request("ABCD1234", 1), &[])
            .await
            .unwrap_err();

        assert_matches!(err, RepositoryError::AlreadyExists(field) if field == "sku");
        assert_eq!(catalog.product_count().await, 1);
    }

    #[tokio::test]
    async fn image_removal_is_scoped_to_the_product() {
        let catalog = InMemoryCatalog::new();
        let shared = vec!["http://x/shared.png".to_string()];
        let first = catalog
            .create_product(&create_request("AAAA1111", 1), &shared)
            .await
            .unwrap();
        let second = catalog
            .create_product(&create_request("BBBB2222", 1), &shared)
            .await
            .unwrap();

        let update = UpdateProductRequest {
            id: first.product_id,
            name: first.name.clone(),
            sku: first.sku.clone(),
            price: first.price,
            description: None,
            category_id: 1,
        };
        let changes = ImageChanges {
            to_add: vec![],
            to_remove: shared.clone(),
        };
        catalog.update_product(&update, &changes).await.unwrap();

        assert!(catalog.find_images(first.product_id).await.unwrap().is_empty());
        assert_eq!(catalog.find_images(second.product_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn featured_sample_is_capped() {
        let catalog = InMemoryCatalog::new();
        for i in 0..6 {
            let product = catalog
                .create_product(&create_request(&format!("FEAT000{i}"), 1), &[])
                .await
                .unwrap();
            catalog.set_featured(product.product_id, true).await.unwrap();
        }

        let sample = catalog.find_featured_sample(4).await.unwrap();

        assert_eq!(sample.len(), 4);
        assert!(sample.iter().all(|p| p.featured));
    }

    #[tokio::test]
    async fn categories_are_listed_by_name() {
        let catalog = InMemoryCatalog::with_categories(&["Tools", "Books", "Tools"]).await;

        let names: Vec<String> = catalog
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();

        assert_eq!(names, vec!["Books", "Tools"]);
    }
}
