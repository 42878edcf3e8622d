use crate::{
    abstract_trait::ProductQueryRepositoryTrait,
    config::ConnectionPool,
    errors::RepositoryError,
    model::{Product as ProductModel, ProductImage as ProductImageModel},
};
use async_trait::async_trait;
use tracing::{error, info};

pub struct ProductQueryRepository {
    db: ConnectionPool,
}

impl ProductQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductQueryRepositoryTrait for ProductQueryRepository {
    async fn find_active(&self) -> Result<Vec<ProductModel>, RepositoryError> {
        info!("🟢 Fetching active products");

        let mut conn = self.db.acquire().await.map_err(|e| {
            error!("❌ DB connection failed: {:?}", e);
            RepositoryError::from(e)
        })?;

        let products = sqlx::query_as::<_, ProductModel>(
            r#"
            SELECT
                p.product_id,
                p.name,
                p.sku,
                p.price,
                p.description,
                p.category_id,
                p.featured,
                p.active,
                p.created_at,
                p.updated_at
            FROM products p
            WHERE p.active = TRUE
            ORDER BY p.created_at DESC, p.product_id DESC
            "#,
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Error fetching active products: {:?}", e);
            RepositoryError::from(e)
        })?;

        Ok(products)
    }

    async fn find_featured_sample(
        &self,
        limit: usize,
    ) -> Result<Vec<ProductModel>, RepositoryError> {
        info!("⭐ Sampling up to {limit} featured products");

        let mut conn = self.db.acquire().await.map_err(|e| {
            error!("❌ DB connection failed: {:?}", e);
            RepositoryError::from(e)
        })?;

        let products = sqlx::query_as::<_, ProductModel>(
            r#"
            SELECT
                p.product_id,
                p.name,
                p.sku,
                p.price,
                p.description,
                p.category_id,
                p.featured,
                p.active,
                p.created_at,
                p.updated_at
            FROM products p
            WHERE p.featured = TRUE
            ORDER BY random()
            LIMIT $1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Error sampling featured products: {:?}", e);
            RepositoryError::from(e)
        })?;

        Ok(products)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<ProductModel>, RepositoryError> {
        info!("🆔 Fetching product by ID: {id}");

        let mut conn = self.db.acquire().await.map_err(|e| {
            error!("❌ Failed to acquire DB connection: {:?}", e);
            RepositoryError::from(e)
        })?;

        let product = sqlx::query_as::<_, ProductModel>(
            r#"
            SELECT
                product_id, name, sku, price, description,
                category_id, featured, active, created_at, updated_at
            FROM products
            WHERE product_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch product ID {id}: {:?}", e);
            RepositoryError::from(e)
        })?;

        Ok(product)
    }

    async fn find_images(
        &self,
        product_id: i32,
    ) -> Result<Vec<ProductImageModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let images = sqlx::query_as::<_, ProductImageModel>(
            r#"
            SELECT image_id, product_id, url
            FROM product_images
            WHERE product_id = $1
            ORDER BY image_id
            "#,
        )
        .bind(product_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch images of product {product_id}: {:?}", e);
            RepositoryError::from(e)
        })?;

        Ok(images)
    }
}
