pub mod aggregation;
pub mod discount;
pub mod filter;
pub mod metadata_search;
pub mod pagination;
pub mod service;
pub mod sort;

pub use aggregation::{sort_by_country, summarize_by_country};
pub use discount::DiscountCampaign;
pub use filter::{FilterBuilder, Predicate, Restriction};
pub use metadata_search::{document_text, DocumentPattern};
pub use pagination::{PageRequest, Pagination, Window};
pub use service::CatalogService;
pub use sort::SortResolver;
