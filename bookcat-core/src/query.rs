//! Query construction and filtering API for catalog collections.
//!
//! This module provides type-safe query construction with filtering, sorting,
//! pagination, field projection, and a visitor pattern for query execution
//! across different backends.
//!
//! # Query Building
//!
//! Queries can be constructed using the fluent builder API:
//!
//! ```ignore
//! use bookcat_core::query::{Query, Filter, SortDirection};
//!
//! let query = Query::builder()
//!     .filter(Filter::eq("genre", "Fiction"))
//!     .sort("price", SortDirection::Asc)
//!     .limit(5)
//!     .offset(0)
//!     .build();
//! ```
//!
//! # Filter Expression API
//!
//! The [`Filter`] struct provides a collection of static methods for building filter expressions:
//!
//! - Comparison: `eq`, `ne`, `gt`, `gte`, `lt`, `lte`
//! - Logical: `and`, `or`
//!
//! Expressions can be combined using chainable methods for more complex queries.

use bson::Bson;

use crate::error::CatalogError;

/// Sort direction for query results and index keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Ascending order (A to Z, 0 to 9, earliest to latest).
    Asc,
    /// Descending order (Z to A, 9 to 0, latest to earliest).
    Desc,
}

/// Sort specification for query results.
///
/// Specifies which field to sort by and in which direction.
#[derive(Debug, Clone)]
pub struct Sort {
    /// The field name to sort by.
    pub field: String,
    /// The sort direction.
    pub direction: SortDirection,
}

/// Field comparison operators for filter expressions.
#[derive(Debug, Clone)]
pub enum FieldOp {
    /// Equal to (exact match).
    Eq,
    /// Not equal to.
    Ne,
    /// Greater than.
    Gt,
    /// Greater than or equal to.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal to.
    Lte,
}

/// A filter expression for querying documents.
///
/// Expressions can be combined using logical operators (`And`, `Or`)
/// to build compound filter predicates.
///
/// # Example
///
/// ```ignore
/// use bookcat_core::query::Filter;
///
/// // Simple equality check
/// let expr1 = Filter::eq("genre", "Fiction");
///
/// // Compound expression
/// let expr2 = Filter::and(vec![
///     Filter::eq("in_stock", true),
///     Filter::gt("published_year", 2010),
/// ]);
/// ```
#[derive(Debug, Clone)]
pub enum Expr {
    /// Logical AND of multiple expressions (all must match).
    And(Vec<Expr>),
    /// Logical OR of multiple expressions (any must match).
    Or(Vec<Expr>),
    /// Field comparison expression.
    Field {
        /// The field name to compare.
        field: String,
        /// The comparison operator.
        op: FieldOp,
        /// The value to compare against.
        value: Bson,
    },
}

impl Expr {
    /// Creates a field comparison expression.
    pub fn field(field: String, op: FieldOp, value: Bson) -> Self {
        Expr::Field { field, op, value }
    }

    /// Combines this expression with another using logical AND.
    ///
    /// If this expression is already an AND, the other expression is appended
    /// to the list. Otherwise, a new AND expression is created.
    pub fn and(self, other: Expr) -> Self {
        match self {
            Expr::And(mut list) => {
                list.push(other);
                Expr::And(list)
            }
            _ => Expr::And(vec![self, other]),
        }
    }

    /// Combines this expression with another using logical OR.
    ///
    /// If this expression is already an OR, the other expression is appended
    /// to the list. Otherwise, a new OR expression is created.
    pub fn or(self, other: Expr) -> Self {
        match self {
            Expr::Or(mut list) => {
                list.push(other);
                Expr::Or(list)
            }
            _ => Expr::Or(vec![self, other]),
        }
    }
}

/// A structured query for retrieving and filtering documents.
///
/// This struct encapsulates filters, limits, offsets, sort, and projection
/// specifications for document queries. Use [`QueryBuilder`] for ergonomic
/// construction.
///
/// # Example
///
/// ```ignore
/// use bookcat_core::query::{Query, Filter, SortDirection};
///
/// let query = Query::builder()
///     .filter(Filter::gt("published_year", 2000))
///     .sort("price", SortDirection::Desc)
///     .build();
/// ```
#[derive(Debug, Clone, Default)]
pub struct Query {
    /// Optional filter expression to match documents.
    pub filter: Option<Expr>,
    /// Maximum number of documents to return.
    pub limit: Option<usize>,
    /// Number of documents to skip (for pagination).
    pub offset: Option<usize>,
    /// Sort specification for results.
    pub sort: Option<Sort>,
    /// Fields to retain in results. When set, matched documents are reduced to
    /// exactly these fields and the identity field is suppressed.
    pub projection: Option<Vec<String>>,
}

impl Query {
    /// Creates a new empty query with no filters or limits.
    pub fn new() -> Self {
        Query::default()
    }

    /// Creates a new query builder for fluent construction.
    pub fn builder() -> QueryBuilder {
        QueryBuilder::new()
    }
}

/// Helper struct for constructing filter expressions.
///
/// Provides static methods to construct common filter expressions in a type-safe manner.
/// All methods accept field names and values as `Into<String>` and `Into<Bson>` for ergonomics.
///
/// # Example
///
/// ```ignore
/// use bookcat_core::query::Filter;
///
/// let expr = Filter::eq("in_stock", true)
///     .and(Filter::gt("published_year", 2010));
/// ```
pub struct Filter;

impl Filter {
    /// Creates an equality filter expression.
    ///
    /// Matches documents where the field equals the specified value.
    pub fn eq(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field.into(), FieldOp::Eq, value.into())
    }

    /// Creates a not-equal filter expression.
    ///
    /// Matches documents where the field does not equal the specified value.
    pub fn ne(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field.into(), FieldOp::Ne, value.into())
    }

    /// Creates a greater-than filter expression.
    ///
    /// Matches documents where the field is strictly greater than the specified value.
    pub fn gt(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field.into(), FieldOp::Gt, value.into())
    }

    /// Creates a greater-than-or-equal filter expression.
    ///
    /// Matches documents where the field is greater than or equal to the specified value.
    pub fn gte(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field.into(), FieldOp::Gte, value.into())
    }

    /// Creates a less-than filter expression.
    ///
    /// Matches documents where the field is strictly less than the specified value.
    pub fn lt(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field.into(), FieldOp::Lt, value.into())
    }

    /// Creates a less-than-or-equal filter expression.
    ///
    /// Matches documents where the field is less than or equal to the specified value.
    pub fn lte(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field.into(), FieldOp::Lte, value.into())
    }

    /// Creates a logical AND filter expression.
    ///
    /// Combines multiple expressions such that all must match for a document to be included.
    pub fn and(exprs: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::And(exprs.into_iter().collect())
    }

    /// Creates a logical OR filter expression.
    ///
    /// Combines multiple expressions such that any can match for a document to be included.
    pub fn or(exprs: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::Or(exprs.into_iter().collect())
    }
}

#[derive(Debug, Clone)]
pub struct QueryBuilder {
    query: Query,
}

impl QueryBuilder {
    /// Creates a new query builder.
    pub fn new() -> Self {
        QueryBuilder { query: Query::default() }
    }

    /// Sets the filter expression for this query.
    ///
    /// # Arguments
    ///
    /// * `filter` - The filter expression to apply
    pub fn filter(mut self, filter: Expr) -> Self {
        self.query.filter = Some(filter);
        self
    }

    /// Sets the maximum number of documents to return.
    ///
    /// # Arguments
    ///
    /// * `limit` - The maximum number of documents to return
    pub fn limit(mut self, limit: usize) -> Self {
        self.query.limit = Some(limit);
        self
    }

    /// Sets the number of documents to skip (for pagination).
    ///
    /// # Arguments
    ///
    /// * `offset` - The number of documents to skip
    pub fn offset(mut self, offset: usize) -> Self {
        self.query.offset = Some(offset);
        self
    }

    /// Sets the sort specification for the query results.
    ///
    /// # Arguments
    ///
    /// * `field` - The field name to sort by
    /// * `direction` - The sort direction (ascending or descending)
    pub fn sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.query.sort = Some(Sort { field: field.into(), direction });
        self
    }

    /// Restricts results to the given fields, suppressing the identity field.
    ///
    /// Projection changes which fields are returned, never which documents match.
    ///
    /// # Arguments
    ///
    /// * `fields` - The field names to retain in every result document
    pub fn project(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.query.projection = Some(
            fields
                .into_iter()
                .map(Into::into)
                .collect(),
        );
        self
    }

    /// Builds and returns the final query.
    pub fn build(self) -> Query {
        self.query
    }
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub trait QueryVisitor {
    type Output;
    type Error: Into<CatalogError>;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error>;
    fn visit_or(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error>;
    fn visit_field(
        &mut self,
        field: &str,
        op: &FieldOp,
        value: &Bson,
    ) -> Result<Self::Output, Self::Error>;

    fn visit_expr(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        match expr {
            Expr::And(exprs) => self.visit_and(exprs),
            Expr::Or(exprs) => self.visit_or(exprs),
            Expr::Field { field, op, value } => self.visit_field(field, op, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_all_parts() {
        let query = Query::builder()
            .filter(Filter::eq("genre", "Fiction"))
            .sort("price", SortDirection::Asc)
            .limit(5)
            .offset(5)
            .project(["title", "author", "price"])
            .build();

        assert!(matches!(query.filter, Some(Expr::Field { .. })));
        assert_eq!(query.limit, Some(5));
        assert_eq!(query.offset, Some(5));
        assert_eq!(query.sort.as_ref().unwrap().field, "price");
        assert_eq!(
            query.projection.as_deref(),
            Some(&["title".to_string(), "author".to_string(), "price".to_string()][..])
        );
    }

    #[test]
    fn and_chaining_flattens() {
        let expr = Filter::eq("in_stock", true)
            .and(Filter::gt("published_year", 2010))
            .and(Filter::lt("price", 50.0));

        match expr {
            Expr::And(parts) => assert_eq!(parts.len(), 3),
            other => panic!("expected And, got {other:?}"),
        }
    }

    #[test]
    fn or_of_two_fields() {
        let expr = Filter::or([
            Filter::eq("genre", "Fiction"),
            Filter::eq("genre", "Fantasy"),
        ]);

        match expr {
            Expr::Or(parts) => assert_eq!(parts.len(), 2),
            other => panic!("expected Or, got {other:?}"),
        }
    }
}
