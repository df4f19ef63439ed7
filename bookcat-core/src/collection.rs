//! Collection handles for catalog operations.
//!
//! This module provides collection abstractions that enable working with the
//! documents of a specific collection. It offers both a typed collection
//! (decoding results into a [`Document`] type) and an untyped collection
//! (explicit BSON, needed for projections that drop part of the shape).
//!
//! # Collection Types
//!
//! - [`Collection`] - Untyped collection with explicit BSON documents
//! - [`TypedCollection`] - Type-safe collection for a specific document type

use bson::{Bson, Document as BsonDocument, Uuid};
use std::marker::PhantomData;

use crate::{
    aggregate::{GroupAverage, GroupCount, GroupKey, RollupOrder},
    backend::CatalogBackend,
    document::{Document, DocumentExt},
    error::CatalogResult,
    explain::ExplainReport,
    index::IndexKey,
    query::{Expr, Query},
};

/// An untyped collection with a reference to a storage backend.
///
/// This struct provides access to a collection with explicit BSON document
/// handling, including the operations that do not produce whole documents:
/// projections, rollups, index creation, and plan inspection.
///
/// # Type Parameters
///
/// * `'a` - Lifetime of the backend reference
/// * `B` - The storage backend type
#[derive(Debug)]
pub struct Collection<'a, B: CatalogBackend> {
    name: String,
    backend: &'a B,
}

impl<'a, B: CatalogBackend> Collection<'a, B> {
    /// Creates a new collection reference (internal use).
    pub(crate) fn new(name: String, backend: &'a B) -> Self {
        Self { name, backend }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inserts new documents into the collection.
    ///
    /// # Arguments
    ///
    /// * `documents` - A vector of (ID, BSON document) pairs to insert
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`](crate::error::CatalogError) if the operation fails.
    pub async fn insert(&self, documents: Vec<(Uuid, Bson)>) -> CatalogResult<()> {
        Ok(self
            .backend
            .insert_documents(documents, self.name())
            .await?)
    }

    /// Finds documents in the collection using a structured query.
    ///
    /// # Arguments
    ///
    /// * `query` - The [`Query`] specifying filter, sort, pagination, and projection
    ///
    /// # Returns
    ///
    /// A vector of BSON documents matching the query criteria, reduced to the
    /// projected fields when the query carries a projection.
    pub async fn find(&self, query: Query) -> CatalogResult<Vec<Bson>> {
        Ok(self
            .backend
            .find_documents(query, self.name())
            .await?)
    }

    /// Updates the first document matching `filter`, setting the fields of `changes`.
    ///
    /// # Returns
    ///
    /// The number of documents modified (0 or 1).
    pub async fn update_first(&self, filter: Expr, changes: BsonDocument) -> CatalogResult<u64> {
        Ok(self
            .backend
            .update_first(filter, changes, self.name())
            .await?)
    }

    /// Deletes the first document matching `filter`.
    ///
    /// # Returns
    ///
    /// The number of documents deleted (0 or 1).
    pub async fn delete_first(&self, filter: Expr) -> CatalogResult<u64> {
        Ok(self
            .backend
            .delete_first(filter, self.name())
            .await?)
    }

    /// Buckets the collection by `key` and averages `field` per bucket.
    pub async fn average_by_group(
        &self,
        key: GroupKey,
        field: &str,
    ) -> CatalogResult<Vec<GroupAverage>> {
        Ok(self
            .backend
            .average_by_group(key, field, self.name())
            .await?)
    }

    /// Buckets the collection by `key` and counts documents per bucket.
    pub async fn count_by_group(
        &self,
        key: GroupKey,
        order: RollupOrder,
        limit: Option<usize>,
    ) -> CatalogResult<Vec<GroupCount>> {
        Ok(self
            .backend
            .count_by_group(key, order, limit, self.name())
            .await?)
    }

    /// Creates an index over `keys` and returns its name.
    ///
    /// Re-creating an existing index is idempotent.
    pub async fn create_index(&self, keys: Vec<IndexKey>) -> CatalogResult<String> {
        Ok(self
            .backend
            .create_index(keys, self.name())
            .await?)
    }

    /// Explains how the engine executes `query` against this collection.
    pub async fn explain(&self, query: Query) -> CatalogResult<ExplainReport> {
        Ok(self
            .backend
            .explain_find(query, self.name())
            .await?)
    }
}

/// A type-safe collection for a specific document type.
///
/// Results are decoded into `D`; operations that return partial documents
/// (projections) or summary rows live on the untyped [`Collection`].
#[derive(Debug)]
pub struct TypedCollection<'a, B: CatalogBackend, D: Document> {
    name: String,
    backend: &'a B,
    _marker: PhantomData<D>,
}

impl<'a, B: CatalogBackend, D: Document> TypedCollection<'a, B, D> {
    pub(crate) fn new(name: String, backend: &'a B) -> Self {
        Self { name, backend, _marker: PhantomData }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inserts new documents into the collection.
    ///
    /// # Arguments
    ///
    /// * `documents` - A vector of documents to insert
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`](crate::error::CatalogError) if serialization or insertion fails.
    pub async fn insert(&self, documents: Vec<D>) -> CatalogResult<()> {
        Ok(self
            .backend
            .insert_documents(
                documents
                    .into_iter()
                    .map(|d| {
                        d.to_bson()
                            .map(move |b| (d.id().clone(), b))
                    })
                    .collect::<Result<Vec<(Uuid, Bson)>, _>>()?,
                self.name(),
            )
            .await?)
    }

    /// Finds documents in the collection using a structured query.
    ///
    /// # Returns
    ///
    /// A vector of documents matching the query criteria, decoded into `D`.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`](crate::error::CatalogError) if deserialization or the query fails.
    pub async fn find(&self, query: Query) -> CatalogResult<Vec<D>> {
        Ok(self
            .backend
            .find_documents(query, self.name())
            .await?
            .into_iter()
            .map(|doc| D::from_bson(doc))
            .collect::<Result<Vec<D>, _>>()?)
    }

    /// Updates the first document matching `filter`, setting the fields of `changes`.
    ///
    /// # Returns
    ///
    /// The number of documents modified (0 or 1).
    pub async fn update_first(&self, filter: Expr, changes: BsonDocument) -> CatalogResult<u64> {
        Ok(self
            .backend
            .update_first(filter, changes, self.name())
            .await?)
    }

    /// Deletes the first document matching `filter`.
    ///
    /// # Returns
    ///
    /// The number of documents deleted (0 or 1).
    pub async fn delete_first(&self, filter: Expr) -> CatalogResult<u64> {
        Ok(self
            .backend
            .delete_first(filter, self.name())
            .await?)
    }
}
