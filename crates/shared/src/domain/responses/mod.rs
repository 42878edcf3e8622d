mod api;
mod category;
mod page;
mod product;

pub use self::api::ApiResponse;
pub use self::category::CategoryResponse;
pub use self::page::{
    CreateProductPage, DeleteProductPage, EditProductPage, ProductFormRejection, ProductsPage,
};
pub use self::product::{ProductDetailResponse, ProductResponse};
