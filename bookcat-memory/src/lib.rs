//! In-memory catalog backend for bookcat.
//!
//! This crate provides a thread-safe, in-memory implementation of the
//! `CatalogBackend` trait. It uses an async-aware read-write lock for
//! concurrent access and is the backend of choice for tests and development.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and writes using an async-aware RwLock
//! - **Insertion-ordered storage** - First-match updates/deletes and pagination are deterministic
//! - **Full query support** - Filtering, sorting, pagination, and field projection
//! - **Rollups** - In-process group/average/count aggregation
//! - **Plan inspection** - Honest collection-scan explain reports
//!
//! # Quick Start
//!
//! ```ignore
//! use bookcat::{memory::InMemoryStore, prelude::*};
//! use bookcat_core::book::Book;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = CatalogStore::new(InMemoryStore::new());
//!     let books = store.typed_collection::<Book>();
//!
//!     books
//!         .insert(vec![Book::new("1984", "George Orwell", "Dystopian", 1949, 10.99, true)])
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as bookcat_memory;

pub mod evaluator;
pub mod store;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
