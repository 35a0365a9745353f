pub mod catalog;
pub mod property;
pub mod query;

pub use catalog::{Catalog, CatalogError};
pub use property::{HEADER, Property, PropertyDetails, StatusKind};
pub use query::{CriteriaKind, QueryError, SearchCriteria, SortKey, SortOrder};
