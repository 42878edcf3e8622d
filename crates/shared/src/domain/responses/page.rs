//! View models returned by the GET form pages and by rejected submissions.

use crate::{
    domain::{
        requests::ProductForm,
        responses::{CategoryResponse, ProductDetailResponse, ProductResponse},
    },
    errors::FormErrors,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ProductsPage {
    pub products: Vec<ProductResponse>,
    pub featured_products: Vec<ProductResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct CreateProductPage {
    pub categories: Vec<CategoryResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct EditProductPage {
    pub product: ProductDetailResponse,
    pub categories: Vec<CategoryResponse>,
    pub images: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct DeleteProductPage {
    pub product: ProductResponse,
}

/// Sent back with a 400 when a create or edit submission fails validation,
/// echoing the submission so the form can be filled in again.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ProductFormRejection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductDetailResponse>,
    pub categories: Vec<CategoryResponse>,
    pub errors: FormErrors,
    pub payload: ProductForm,
}
