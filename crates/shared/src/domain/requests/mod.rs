mod product;

pub use self::product::{
    CreateProductRequest, MAX_IMAGES, MAX_PRICE, MIN_PRICE, NAME_MAX_LEN, ProductForm, SKU_LEN,
    UpdateProductRequest, ValidatedProduct, parse_price, validate_product_fields,
};
