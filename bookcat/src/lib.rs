//! Main bookcat crate: a bookstore catalog query runner for document stores.
//!
//! This crate is the primary entry point for users of the bookcat project.
//! It re-exports the core types from the sub-crates, provides convenient
//! access to the storage backends, and ships the runner binary that executes
//! the fixed catalog sequence against a MongoDB instance.
//!
//! # What the runner does
//!
//! One invocation acquires a scoped connection, selects the `bookstore`
//! database and `books` collection, executes four groups of operations in a
//! fixed order (basic CRUD, advanced queries, aggregation rollups, index
//! management and plan inspection), logs every result, and releases the
//! connection whether or not an error occurred.
//!
//! # Quick Start
//!
//! ```ignore
//! use bookcat::{memory::InMemoryStore, ops, prelude::*};
//!
//! #[tokio::main]
//! async fn main() -> CatalogResult<()> {
//!     let store = CatalogStore::new(InMemoryStore::new());
//!
//!     let books = store.typed_collection::<Book>();
//!     books
//!         .insert(vec![Book::new("1984", "George Orwell", "Dystopian", 1949, 10.99, true)])
//!         .await?;
//!
//!     // Run the whole fixed sequence...
//!     ops::run_catalog(&store).await?;
//!
//!     // ...or a single operation.
//!     let outcome = ops::CatalogOp::FictionBooks.execute(&store).await?;
//!     println!("{outcome}");
//!
//!     store.shutdown().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Backends
//!
//! - [`memory`] - Fast in-memory storage for development and testing
//! - [`mongodb`] - MongoDB backend (requires the `mongodb` feature, on by default)

pub mod prelude;

pub use bookcat_core::{
    aggregate, backend, book, collection, document, error, explain, index, ops, page, query,
    store,
};

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend implementations.
pub mod memory {
    pub use bookcat_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// MongoDB storage backend implementations.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use bookcat_mongodb::{MongoDbStore, MongoDbStoreBuilder};
}
