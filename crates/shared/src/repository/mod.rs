mod category;
mod memory;
mod product;

pub use self::category::CategoryRepository;
pub use self::memory::InMemoryCatalog;
pub use self::product::ProductRepository;
