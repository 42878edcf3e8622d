mod product;

pub use self::product::ProductService;
