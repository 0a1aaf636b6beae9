mod error;
mod index;
mod loader;
mod product;
mod supplier;

pub use error::{CatalogError, ProductError, SupplierError};
pub use index::{BuildTimes, Catalog, Comparison, Lookup, NameOrder};
pub use loader::{load_products, read_products};
pub use product::{
    EXPIRY_DISCOUNT, EXPIRY_DISCOUNT_DAYS, IdSequence, MAX_MARGIN, MIN_DESCRIPTION_LEN, MIN_MARGIN,
    Product, ProductKind,
};
pub use supplier::Supplier;
