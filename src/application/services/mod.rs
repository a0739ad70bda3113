//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, HttpClient, TemplateRenderer)
//! but are themselves concrete structs, not traits.

mod catalog;
mod fetch;
mod page;

pub use catalog::CatalogStore;
pub use fetch::{url_extension, FetchOptions, FetchReport, ImageFetcher};
pub use page::{
    PageBuilder, CARD_TEMPLATE, FOOTER_TEMPLATE, HEADER_TEMPLATE, INDEX_FILE,
};
