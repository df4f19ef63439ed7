//! Convenient re-exports of commonly used types from bookcat.
//!
//! Import this prelude module to quickly access the most frequently used types
//! and traits without needing to import from multiple sub-modules:
//!
//! ```ignore
//! use bookcat::prelude::*;
//! ```
//!
//! This provides access to:
//! - The book document type and document traits
//! - Store backends, builders, and the store handle
//! - Query construction, filtering, sorting, and projection
//! - Rollup, index, and explain types
//! - The operation catalog and the sequential driver
//! - Error types

pub use bookcat_core::{
    aggregate::{GroupAverage, GroupCount, GroupKey, RollupOrder},
    backend::{CatalogBackend, CatalogBackendBuilder},
    book::Book,
    collection::{Collection, TypedCollection},
    document::{Document, DocumentExt},
    error::{CatalogError, CatalogResult},
    explain::ExplainReport,
    index::{IndexKey, index_name},
    ops::{CatalogOp, OpGroup, Outcome, run_catalog},
    page::PaginationParams,
    query::{Expr, FieldOp, Filter, Query, QueryBuilder, QueryVisitor, Sort, SortDirection},
    store::CatalogStore,
};
