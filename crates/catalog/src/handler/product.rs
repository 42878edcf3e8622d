use crate::state::AppState;
use axum::{
    Form, Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use shared::{
    abstract_trait::{DynProductCommandService, DynProductQueryService},
    domain::{
        requests::ProductForm,
        responses::{
            ApiResponse, CreateProductPage, DeleteProductPage, EditProductPage,
            ProductFormRejection, ProductsPage,
        },
    },
    errors::{ErrorResponse, FormErrors, HttpError, ServiceError},
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

const PRODUCTS_PATH: &str = "/products";

/// Answers a rejected submission with the errors, the categories and the
/// submitted values so the form can be shown again.
async fn reject_form(
    query: &DynProductQueryService,
    product_id: Option<i32>,
    errors: FormErrors,
    payload: ProductForm,
) -> Result<Response, HttpError> {
    let categories = query.find_categories().await?.data;

    let product = match product_id {
        Some(id) => Some(query.find_by_id(id).await?.data),
        None => None,
    };

    let body = ProductFormRejection {
        product,
        categories,
        errors,
        payload,
    };

    Ok((StatusCode::BAD_REQUEST, Json(body)).into_response())
}

#[utoipa::path(
    get,
    path = "/products",
    tag = "Product",
    responses(
        (status = 200, description = "Active products and a random sample of featured ones", body = ApiResponse<ProductsPage>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_products(
    Extension(query): Extension<DynProductQueryService>,
) -> Result<impl IntoResponse, HttpError> {
    let response = query.list_products().await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/products/create",
    tag = "Product",
    responses(
        (status = 200, description = "Data for the create form", body = ApiResponse<CreateProductPage>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn create_product_page(
    Extension(query): Extension<DynProductQueryService>,
) -> Result<impl IntoResponse, HttpError> {
    let categories = query.find_categories().await?.data;

    let response = ApiResponse::success(
        "Create product form",
        CreateProductPage { categories },
    );
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/products/create",
    tag = "Product",
    request_body(content = ProductForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Product created, redirect to the listing"),
        (status = 400, description = "Validation failed", body = ProductFormRejection),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn create_product(
    Extension(query): Extension<DynProductQueryService>,
    Extension(command): Extension<DynProductCommandService>,
    Form(form): Form<ProductForm>,
) -> Result<Response, HttpError> {
    match command.create_product(&form).await {
        Ok(_) => Ok(Redirect::to(PRODUCTS_PATH).into_response()),
        Err(ServiceError::Validation(errors)) => reject_form(&query, None, errors, form).await,
        Err(err) => Err(err.into()),
    }
}

#[utoipa::path(
    get,
    path = "/products/{id}/edit",
    tag = "Product",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Data for the edit form", body = ApiResponse<EditProductPage>),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn edit_product_page(
    Extension(query): Extension<DynProductQueryService>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let product = query.find_by_id(id).await?.data;
    let categories = query.find_categories().await?.data;
    let images = product.images.clone();

    let response = ApiResponse::success(
        "Edit product form",
        EditProductPage {
            product,
            categories,
            images,
        },
    );
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/products/{id}/edit",
    tag = "Product",
    params(("id" = i32, Path, description = "Product ID")),
    request_body(content = ProductForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Product updated, redirect to the listing"),
        (status = 400, description = "Validation failed", body = ProductFormRejection),
        (status = 404, description = "Product or category not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn edit_product(
    Extension(query): Extension<DynProductQueryService>,
    Extension(command): Extension<DynProductCommandService>,
    Path(id): Path<i32>,
    Form(form): Form<ProductForm>,
) -> Result<Response, HttpError> {
    match command.update_product(id, &form).await {
        Ok(_) => Ok(Redirect::to(PRODUCTS_PATH).into_response()),
        Err(ServiceError::Validation(errors)) => {
            reject_form(&query, Some(id), errors, form).await
        }
        Err(err) => Err(err.into()),
    }
}

#[utoipa::path(
    get,
    path = "/products/{id}/delete",
    tag = "Product",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product about to be deleted", body = ApiResponse<DeleteProductPage>),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
pub async fn delete_product_page(
    Extension(query): Extension<DynProductQueryService>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let product = query.find_by_id(id).await?.data.product;

    let response = ApiResponse::success("Confirm product deletion", DeleteProductPage { product });
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/products/{id}/delete",
    tag = "Product",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 303, description = "Product deleted, redirect to the listing"),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
pub async fn delete_product(
    Extension(command): Extension<DynProductCommandService>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    command.delete_product(id).await?;
    Ok(Redirect::to(PRODUCTS_PATH))
}

#[utoipa::path(
    post,
    path = "/products/{id}/toggle-featured",
    tag = "Product",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 303, description = "Featured flag flipped, redirect to the listing"),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
pub async fn toggle_featured(
    Extension(command): Extension<DynProductCommandService>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    command.toggle_featured(id).await?;
    Ok(Redirect::to(PRODUCTS_PATH))
}

pub fn product_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/products", get(list_products))
        .route(
            "/products/create",
            get(create_product_page).post(create_product),
        )
        .route(
            "/products/{id}/edit",
            get(edit_product_page).post(edit_product),
        )
        .route(
            "/products/{id}/delete",
            get(delete_product_page).post(delete_product),
        )
        .route(
            "/products/{id}/toggle-featured",
            get(toggle_featured).post(toggle_featured),
        )
        .layer(Extension(app_state.di_container.product_query.clone()))
        .layer(Extension(app_state.di_container.product_command.clone()))
}
