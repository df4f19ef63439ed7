//! Storage backend abstraction for the catalog.
//!
//! This module defines the trait that abstracts over different document-store
//! implementations, allowing the catalog operations to run against various
//! backends (an in-memory store for tests, a MongoDB server in production).
//!
//! # Overview
//!
//! The [`CatalogBackend`] trait provides a unified async interface for every
//! operation the runner issues: seeding, filtered finds, first-match updates
//! and deletes, rollups, index creation, and query-plan inspection. All of
//! the actual query planning and execution is owned by the backend; nothing
//! in this crate re-implements it.
//!
//! # Traits
//!
//! - [`CatalogBackend`]: The core trait for storage backends
//! - [`CatalogBackendBuilder`]: Factory trait for creating backend instances

use async_trait::async_trait;
use bson::{Bson, Document, Uuid};
use std::fmt::Debug;

use crate::{
    aggregate::{GroupAverage, GroupCount, GroupKey, RollupOrder},
    error::CatalogResult,
    explain::ExplainReport,
    index::IndexKey,
    query::{Expr, Query},
};

/// Abstract interface for catalog storage backends.
///
/// Implementers of this trait provide concrete storage strategies for the
/// catalog, from a simple in-memory map to a remote document database. Each
/// method is one round-trip to the store; none of them keep state between
/// calls.
///
/// # Thread Safety
///
/// All implementations must be thread-safe (`Send + Sync`). The runner itself
/// issues operations strictly sequentially, so no additional coordination is
/// required on top of what the backend already does.
///
/// # Error Handling
///
/// Operations return [`CatalogResult<T>`](crate::error::CatalogResult).
/// Implementers should wrap driver/storage errors at this boundary.
#[async_trait]
pub trait CatalogBackend: Send + Sync + Debug {
    /// Inserts new documents into a collection.
    ///
    /// This is the seeding path used by fixtures and tests; the runner itself
    /// never inserts. The collection is created automatically if it doesn't
    /// exist.
    ///
    /// # Arguments
    ///
    /// * `documents` - A vector of (UUID, BSON document) pairs to insert
    /// * `collection` - The name of the collection to insert into
    async fn insert_documents(
        &self,
        documents: Vec<(Uuid, Bson)>,
        collection: &str,
    ) -> CatalogResult<()>;

    /// Finds documents matching a structured query.
    ///
    /// Applies the query's filter, sort, skip, limit, and field projection and
    /// returns the matching documents. When the query carries a projection,
    /// results are reduced to exactly the projected fields with the identity
    /// field suppressed.
    ///
    /// # Arguments
    ///
    /// * `query` - The [`Query`] specifying filter, sort, pagination, and projection
    /// * `collection` - The name of the collection to query
    async fn find_documents(&self, query: Query, collection: &str) -> CatalogResult<Vec<Bson>>;

    /// Updates the first document matching `filter`, setting the fields of
    /// `changes` to the given values.
    ///
    /// # Returns
    ///
    /// The number of documents actually modified (0 or 1). Matching a document
    /// that already carries the target values counts as 0, per document-store
    /// convention.
    async fn update_first(
        &self,
        filter: Expr,
        changes: Document,
        collection: &str,
    ) -> CatalogResult<u64>;

    /// Deletes the first document matching `filter`.
    ///
    /// # Returns
    ///
    /// The number of documents deleted (0 or 1).
    async fn delete_first(&self, filter: Expr, collection: &str) -> CatalogResult<u64>;

    /// Rolls the collection up into buckets and averages `field` per bucket.
    ///
    /// Bucket emission order is engine-defined.
    ///
    /// # Arguments
    ///
    /// * `key` - How documents are bucketed
    /// * `field` - The numeric field to average within each bucket
    /// * `collection` - The name of the collection to aggregate
    async fn average_by_group(
        &self,
        key: GroupKey,
        field: &str,
        collection: &str,
    ) -> CatalogResult<Vec<GroupAverage>>;

    /// Rolls the collection up into buckets and counts documents per bucket.
    ///
    /// Rows are returned in the requested order, truncated to `limit` when
    /// given. Ties under [`RollupOrder::CountDesc`] are engine-defined.
    ///
    /// # Arguments
    ///
    /// * `key` - How documents are bucketed
    /// * `order` - The order in which buckets are emitted
    /// * `limit` - Maximum number of rows to return
    /// * `collection` - The name of the collection to aggregate
    async fn count_by_group(
        &self,
        key: GroupKey,
        order: RollupOrder,
        limit: Option<usize>,
        collection: &str,
    ) -> CatalogResult<Vec<GroupCount>>;

    /// Creates an index over the given keys and returns its name.
    ///
    /// Creating the same specification twice is idempotent: the existing index
    /// is left in place and its name returned, per the external database's
    /// index semantics.
    ///
    /// # Arguments
    ///
    /// * `keys` - The index keys, in order of precedence
    /// * `collection` - The name of the collection to index
    async fn create_index(&self, keys: Vec<IndexKey>, collection: &str) -> CatalogResult<String>;

    /// Explains how the engine executes `query`, without returning its results.
    ///
    /// # Returns
    ///
    /// An [`ExplainReport`] with the winning plan's stage chain and execution
    /// counters (documents examined, keys examined, documents returned).
    async fn explain_find(&self, query: Query, collection: &str)
    -> CatalogResult<ExplainReport>;

    /// Cleanly shuts down the backend, releasing all resources.
    ///
    /// Backends with external connections should override this; the default
    /// implementation is a no-op.
    async fn shutdown(self) -> CatalogResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

#[async_trait]
pub trait CatalogBackendBuilder {
    type Backend: CatalogBackend;

    async fn build(self) -> CatalogResult<Self::Backend>;
}
