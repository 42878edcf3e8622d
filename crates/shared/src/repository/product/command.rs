use crate::{
    abstract_trait::ProductCommandRepositoryTrait,
    config::ConnectionPool,
    domain::{
        images::ImageChanges,
        requests::{CreateProductRequest, UpdateProductRequest},
    },
    errors::RepositoryError,
    model::Product as ProductModel,
};
use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use tracing::{error, info};

pub struct ProductCommandRepository {
    db: ConnectionPool,
}

impl ProductCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }

    async fn insert_images(
        tx: &mut Transaction<'_, Postgres>,
        product_id: i32,
        urls: &[String],
    ) -> Result<(), RepositoryError> {
        for url in urls {
            sqlx::query(
                r#"
                INSERT INTO product_images (product_id, url)
                VALUES ($1, $2)
                "#,
            )
            .bind(product_id)
            .bind(url)
            .execute(&mut **tx)
            .await
            .map_err(|err| {
                error!("❌ Failed to attach image {url} to product {product_id}: {:?}", err);
                RepositoryError::from(err)
            })?;
        }

        Ok(())
    }
}

#[async_trait]
impl ProductCommandRepositoryTrait for ProductCommandRepository {
    async fn create_product(
        &self,
        product: &CreateProductRequest,
        image_urls: &[String],
    ) -> Result<ProductModel, RepositoryError> {
        let mut tx = self.db.begin().await.map_err(RepositoryError::from)?;

        let result = sqlx::query_as::<_, ProductModel>(
            r#"
            INSERT INTO products
                (name, sku, price, description, category_id, featured, active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, current_timestamp, current_timestamp)
            RETURNING product_id, name, sku, price, description,
                      category_id, featured, active, created_at, updated_at
            "#,
        )
        .bind(&product.name)
        .bind(&product.sku)
        .bind(product.price)
        .bind(&product.description)
        .bind(product.category_id)
        .bind(product.featured)
        .bind(product.active)
        .fetch_one(&mut *tx)
        .await
        .map_err(|err| {
            error!("❌ Failed to create product {}: {:?}", product.name, err);
            RepositoryError::from(err)
        })?;

        Self::insert_images(&mut tx, result.product_id, image_urls).await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        info!(
            "✅ Created product ID {} ({}) with {} image(s)",
            result.product_id,
            result.name,
            image_urls.len()
        );
        Ok(result)
    }

    async fn update_product(
        &self,
        product: &UpdateProductRequest,
        images: &ImageChanges,
    ) -> Result<ProductModel, RepositoryError> {
        let mut tx = self.db.begin().await.map_err(RepositoryError::from)?;

        let result = sqlx::query_as::<_, ProductModel>(
            r#"
            UPDATE products
            SET name = $2,
                sku = $3,
                price = $4,
                description = $5,
                category_id = $6,
                updated_at = current_timestamp
            WHERE product_id = $1
            RETURNING product_id, name, sku, price, description,
                      category_id, featured, active, created_at, updated_at
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.sku)
        .bind(product.price)
        .bind(&product.description)
        .bind(product.category_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|err| {
            error!("❌ Failed to update product ID {}: {:?}", product.id, err);
            RepositoryError::from(err)
        })?
        .ok_or(RepositoryError::NotFound)?;

        if !images.to_remove.is_empty() {
            sqlx::query(
                r#"
                DELETE FROM product_images
                WHERE product_id = $1 AND url = ANY($2)
                "#,
            )
            .bind(product.id)
            .bind(&images.to_remove)
            .execute(&mut *tx)
            .await
            .map_err(|err| {
                error!(
                    "❌ Failed to detach images from product {}: {:?}",
                    product.id, err
                );
                RepositoryError::from(err)
            })?;
        }

        Self::insert_images(&mut tx, product.id, &images.to_add).await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        info!(
            "🔄 Updated product ID {} (+{} / -{} images)",
            result.product_id,
            images.to_add.len(),
            images.to_remove.len()
        );
        Ok(result)
    }

    async fn set_featured(&self, id: i32, featured: bool) -> Result<ProductModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query_as::<_, ProductModel>(
            r#"
            UPDATE products
            SET featured = $2,
                updated_at = current_timestamp
            WHERE product_id = $1
            RETURNING product_id, name, sku, price, description,
                      category_id, featured, active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(featured)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|err| {
            error!("❌ Failed to set featured on product {id}: {:?}", err);
            RepositoryError::from(err)
        })?
        .ok_or(RepositoryError::NotFound)?;

        info!("⭐ Product ID {id} featured={featured}");
        Ok(result)
    }

    async fn delete_product(&self, id: i32) -> Result<(), RepositoryError> {
        info!("❌ Deleting product: {}", id);

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query(
            r#"
            DELETE FROM products
            WHERE product_id = $1
            "#,
        )
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to delete product {}: {:?}", id, e);
            RepositoryError::from(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        info!("✅ Product ID {} deleted with its images", id);
        Ok(())
    }
}
