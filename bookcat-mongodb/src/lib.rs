//! MongoDB backend implementation for bookcat.
//!
//! This crate provides a MongoDB-based implementation of the `CatalogBackend`
//! trait. Filters, sorts, projections, rollup pipelines, index creation, and
//! plan inspection are all translated to the engine's native syntax and
//! executed by the MongoDB query planner; nothing is evaluated client-side.
//!
//! To use this backend, include the `mongodb` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! bookcat = { version = "x.y.z", features = ["mongodb"] }
//! ```
//!
//! # Connection
//!
//! The backend is constructed from a MongoDB connection string through the
//! builder pattern. The underlying client connects lazily; the first
//! operation performs the actual round-trip.
//!
//! # Example
//!
//! ```ignore
//! use bookcat_mongodb::MongoDbStore;
//! use bookcat_core::backend::CatalogBackendBuilder;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MongoDbStore::builder("mongodb://localhost:27017", "bookstore")
//!         .build()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as bookcat_mongodb;

pub mod query;
pub mod store;

pub use store::{MongoDbStore, MongoDbStoreBuilder};
