//! Core traits for document representation and serialization.
//!
//! This module provides the fundamental trait that all stored documents must implement,
//! as well as utilities for converting documents between different formats (BSON, JSON).

use bson::{Bson, Uuid, de::deserialize_from_bson, ser::serialize_to_bson};
use serde::{Deserialize, Serialize};
use serde_json::{Value, from_value, to_value};

use crate::error::CatalogResult;

/// Core trait that all documents stored in a catalog collection must implement.
///
/// This trait defines the minimal interface required for a type to be used as a document.
/// Every document must have a unique identifier (UUID) and specify which collection it belongs to.
///
/// # Example
///
/// ```ignore
/// use bookcat_core::document::Document;
/// use bson::Uuid;
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct Review {
///     pub id: Uuid,
///     pub stars: i32,
/// }
///
/// impl Document for Review {
///     fn id(&self) -> &Uuid {
///         &self.id
///     }
///
///     fn collection_name() -> &'static str {
///         "reviews"
///     }
/// }
/// ```
pub trait Document: Serialize + for<'de> Deserialize<'de> + Send + Sync + Clone + 'static {
    /// Returns a reference to this document's unique identifier.
    fn id(&self) -> &Uuid;

    /// Returns the name of the collection this document belongs to.
    ///
    /// This should be a static, lowercase identifier (e.g., "books").
    fn collection_name() -> &'static str;
}

/// Extension trait providing serialization/deserialization utilities for documents.
///
/// This trait is automatically implemented for all types that implement [`Document`].
/// It provides convenient methods to convert documents to and from BSON and JSON formats.
pub trait DocumentExt: Document {
    /// Converts this document to a BSON value for storage.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn to_bson(&self) -> CatalogResult<Bson>;

    /// Creates a document from a BSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails or the structure is invalid.
    fn from_bson(bson: Bson) -> CatalogResult<Self>;

    /// Converts this document to a JSON value for serialization.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn to_json(&self) -> CatalogResult<Value>;

    /// Creates a document from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails or the structure is invalid.
    fn from_json(value: Value) -> CatalogResult<Self>;
}

impl<D: Document> DocumentExt for D {
    fn to_bson(&self) -> CatalogResult<Bson> {
        Ok(serialize_to_bson(self)?)
    }

    fn from_bson(bson: Bson) -> CatalogResult<Self> {
        Ok(deserialize_from_bson(bson)?)
    }

    fn to_json(&self) -> CatalogResult<Value> {
        Ok(to_value(self)?)
    }

    fn from_json(value: Value) -> CatalogResult<Self> {
        Ok(from_value(value)?)
    }
}
