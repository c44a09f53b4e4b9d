// Adapters layer: concrete implementations for external systems (catalog http, page url).

pub mod catalog_http;
pub mod query_sync;
