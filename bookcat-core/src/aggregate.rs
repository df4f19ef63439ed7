//! Rollup (aggregation) types for catalog collections.
//!
//! A rollup groups every document of a collection into buckets and reduces
//! each bucket to a single row. The staged transformation itself (group, sort,
//! limit) is executed by the backend; this module only describes the request
//! and the shape of the result rows.

use bson::Bson;

/// How documents are bucketed in a rollup.
#[derive(Debug, Clone)]
pub enum GroupKey {
    /// Group on the exact value of a field.
    Field(String),
    /// Group on the decade of an integer year field.
    ///
    /// The derived key is `floor(year / 10) * 10`, e.g. 1997 falls into the
    /// 1990 bucket.
    Decade(String),
}

impl GroupKey {
    /// Buckets documents by the exact value of `field`.
    pub fn field(field: impl Into<String>) -> Self {
        GroupKey::Field(field.into())
    }

    /// Buckets documents by the decade of the year stored in `field`.
    pub fn decade(field: impl Into<String>) -> Self {
        GroupKey::Decade(field.into())
    }

    /// Returns the document field the key is derived from.
    pub fn source_field(&self) -> &str {
        match self {
            GroupKey::Field(field) | GroupKey::Decade(field) => field,
        }
    }
}

/// Ordering applied to count-rollup rows before they are returned.
///
/// When several buckets tie under [`RollupOrder::CountDesc`], their relative
/// order is engine-defined; combined with a limit, which of the tied buckets
/// survives is therefore not deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollupOrder {
    /// Buckets sorted by group key, ascending.
    KeyAsc,
    /// Buckets sorted by document count, descending.
    CountDesc,
}

/// One bucket of an average rollup: the group key and the arithmetic mean of
/// the value field over exactly the documents in that bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupAverage {
    pub key: Bson,
    pub average: f64,
}

/// One bucket of a count rollup: the group key and the number of documents in
/// that bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupCount {
    pub key: Bson,
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::GroupKey;

    #[test]
    fn source_field_of_both_key_kinds() {
        assert_eq!(GroupKey::field("genre").source_field(), "genre");
        assert_eq!(GroupKey::decade("published_year").source_field(), "published_year");
    }
}
