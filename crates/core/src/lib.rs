//! Core types and shared functionality for vodsite.
//!
//! This crate provides:
//! - The process-scoped route cache with single-flight population
//! - The `DocumentStore` capability trait and document model
//! - Sitemap and route-list projections with XML rendering
//! - Configuration structures

pub mod config;
pub mod error;
pub mod routes;
pub mod sitemap;
pub mod store;

pub use config::AppConfig;
pub use error::Error;
pub use routes::{CollectionKind, RouteCache, RouteMap};
pub use sitemap::{SitemapConfig, SitemapEntry, VideoRecord};
pub use store::{DocumentPage, DocumentStore, PageCursor, RawDocument};
