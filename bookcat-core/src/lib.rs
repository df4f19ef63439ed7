//! Core of the bookcat project: the catalog's document shape, the storage
//! backend abstraction, and the fixed operation sequence the runner executes.
//!
//! This crate provides:
//!
//! - **Document traits** ([`document`]) - Core traits for defining and serializing documents
//! - **The book shape** ([`book`]) - The typed catalog document
//! - **Store backend abstraction** ([`backend`]) - Trait for implementing different storage backends
//! - **Query and filtering API** ([`query`]) - Type-safe query construction, sorting, and projection
//! - **Rollups** ([`aggregate`]) - Group/average/count aggregation request and row types
//! - **Index specifications** ([`index`]) - Index keys and conventional index names
//! - **Plan inspection** ([`explain`]) - Execution-statistics report type
//! - **Collections interface** ([`collection`]) - High-level API for one collection
//! - **Store handle** ([`store`]) - Scoped acquisition and release of the backend
//! - **Operation catalog** ([`ops`]) - The ordered operation list and the sequential driver
//! - **Error handling** ([`error`]) - Error and result types
//! - **Pagination** ([`page`]) - Page-number to limit/offset conversion
//!
//! # Example
//!
//! ```ignore
//! use bookcat_core::{book::Book, ops, store::CatalogStore};
//!
//! let store = CatalogStore::new(backend);
//! ops::run_catalog(&store).await?;
//! store.shutdown().await?;
//! ```

#[allow(unused_extern_crates)]
extern crate self as bookcat_core;

pub mod aggregate;
pub mod backend;
pub mod book;
pub mod collection;
pub mod document;
pub mod error;
pub mod explain;
pub mod index;
pub mod ops;
pub mod page;
pub mod query;
pub mod store;
