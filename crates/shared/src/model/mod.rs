mod category;
mod product;
mod product_image;

pub use self::category::Category;
pub use self::product::Product;
pub use self::product_image::ProductImage;
