//! Main store handle for interacting with catalog backends.
//!
//! The [`CatalogStore`] is the single shared resource of a run: it wraps the
//! backend (and therefore the connection), hands out collection handles, and
//! owns the release step. It is created once, passed explicitly to every
//! operation, and consumed by [`CatalogStore::shutdown`]; it is never a
//! hidden singleton.
//!
//! # Example
//!
//! ```ignore
//! use bookcat_core::{book::Book, store::CatalogStore};
//!
//! let store = CatalogStore::new(backend);
//! let books = store.typed_collection::<Book>();
//! // ... run operations ...
//! store.shutdown().await?;
//! ```

use crate::{
    backend::CatalogBackend,
    collection::{Collection, TypedCollection},
    document::Document,
    error::CatalogResult,
};

/// A strongly-typed store handle bound to a specific backend implementation.
///
/// # Type Parameters
///
/// * `B` - The backend implementation type
#[derive(Debug)]
pub struct CatalogStore<B: CatalogBackend> {
    backend: B,
}

impl<B: CatalogBackend> CatalogStore<B> {
    /// Creates a new store handle with the given backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Gets a typed collection for the specified document type.
    ///
    /// The collection name is determined by the document type's `collection_name()` method.
    pub fn typed_collection<'a, D: Document>(&'a self) -> TypedCollection<'a, B, D> {
        TypedCollection::new(D::collection_name().to_string(), &self.backend)
    }

    /// Gets an untyped collection with the given name.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the collection
    pub fn collection<'a>(&'a self, name: &str) -> Collection<'a, B> {
        Collection::new(name.to_string(), &self.backend)
    }

    /// Shuts down the store and releases backend resources.
    ///
    /// This consumes the store and must run whether or not the operation
    /// sequence succeeded; the caller owns that guarantee.
    ///
    /// # Errors
    ///
    /// Returns an error if the shutdown operation fails.
    pub async fn shutdown(self) -> CatalogResult<()> {
        self.backend.shutdown().await?;

        Ok(())
    }
}
