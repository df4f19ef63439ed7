//! Index specifications for catalog collections.
//!
//! Indexes are server-maintained structures owned entirely by the backend;
//! this module only describes which fields an index covers and derives the
//! conventional name under which backends report it.

use std::fmt;

use crate::query::SortDirection;

/// One key of an index specification: a field name and its direction.
///
/// A single-field index has one key; a compound index has several, in order
/// of precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexKey {
    pub field: String,
    pub direction: SortDirection,
}

impl IndexKey {
    /// An ascending key on `field`.
    pub fn asc(field: impl Into<String>) -> Self {
        Self { field: field.into(), direction: SortDirection::Asc }
    }

    /// A descending key on `field`.
    pub fn desc(field: impl Into<String>) -> Self {
        Self { field: field.into(), direction: SortDirection::Desc }
    }
}

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.direction {
            SortDirection::Asc => 1,
            SortDirection::Desc => -1,
        };
        write!(f, "{}_{}", self.field, direction)
    }
}

/// Derives the conventional index name for a key list, e.g. `title_1` or
/// `author_1_published_year_-1`.
///
/// Matches the name the document database assigns when none is given, so
/// creating the same specification twice resolves to the same index.
pub fn index_name(keys: &[IndexKey]) -> String {
    keys.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
mod tests {
    use super::{IndexKey, index_name};

    #[test]
    fn single_field_name() {
        assert_eq!(index_name(&[IndexKey::asc("title")]), "title_1");
    }

    #[test]
    fn compound_name_keeps_key_order_and_direction() {
        let keys = [IndexKey::asc("author"), IndexKey::desc("published_year")];
        assert_eq!(index_name(&keys), "author_1_published_year_-1");
    }
}
