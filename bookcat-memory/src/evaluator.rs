//! Query expression evaluation for in-memory document filtering.
//!
//! This module provides the evaluation engine for query expressions,
//! enabling filtering and comparison operations on BSON documents.

use std::cmp::Ordering;

use bson::Bson;

use bookcat_core::{
    error::{CatalogError, CatalogResult},
    query::{Expr, FieldOp, QueryVisitor},
};

/// Type-erased, comparable representation of BSON values.
///
/// This enum wraps BSON values and provides comparison operations for
/// filtering and sorting. It normalizes numeric types to f64 so an Int32
/// year and a Double year compare the way the document store compares them.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// Numeric value (all integers and floats normalized to f64)
    Number(f64),
    /// String value
    String(&'a str),
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Number(*value as f64),
            Bson::Int64(value) => Comparable::Number(*value as f64),
            Bson::Double(value) => Comparable::Number(*value),
            Bson::String(value) => Comparable::String(value),
            _ => Comparable::Null, // Other types are not comparable
        }
    }
}

impl<'a> PartialEq for Comparable<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Number(a), Comparable::Number(b)) => a == b,
            (Comparable::String(a), Comparable::String(b)) => a == b,
            _ => false,
        }
    }
}

impl<'a> PartialOrd for Comparable<'a> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Comparable::Bool(a), Comparable::Bool(b)) => a.partial_cmp(b),
            (Comparable::Number(a), Comparable::Number(b)) => a.partial_cmp(b),
            (Comparable::String(a), Comparable::String(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

pub(crate) struct DocumentEvaluator<'a> {
    document: &'a Bson,
}

impl<'a> DocumentEvaluator<'a> {
    pub fn new(document: &'a Bson) -> Self {
        Self { document }
    }

    pub fn evaluate(&mut self, expr: &Expr) -> CatalogResult<bool> {
        self.visit_expr(expr)
    }

    pub fn filter_documents(
        documents: impl IntoIterator<Item = &'a Bson>,
        expr: &Expr,
    ) -> CatalogResult<Vec<Bson>> {
        Ok(documents
            .into_iter()
            .filter(|doc| {
                DocumentEvaluator::new(doc)
                    .evaluate(expr)
                    .unwrap_or(false)
            })
            .cloned()
            .collect::<Vec<_>>())
    }
}

impl<'a> QueryVisitor for DocumentEvaluator<'a> {
    type Output = bool;
    type Error = CatalogError;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        for expr in exprs {
            if !self.visit_expr(expr)? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn visit_or(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        for expr in exprs {
            if self.visit_expr(expr)? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn visit_field(
        &mut self,
        field: &str,
        op: &FieldOp,
        value: &Bson,
    ) -> Result<Self::Output, Self::Error> {
        let field_value = self
            .document
            .as_document()
            .and_then(|doc| doc.get(field));

        match field_value {
            Some(field_value) => match op {
                FieldOp::Eq => Ok(Comparable::from(field_value) == Comparable::from(value)),
                FieldOp::Ne => Ok(Comparable::from(field_value) != Comparable::from(value)),
                FieldOp::Gt | FieldOp::Gte | FieldOp::Lt | FieldOp::Lte => {
                    match Comparable::from(field_value).partial_cmp(&Comparable::from(value)) {
                        Some(ordering) => Ok(match op {
                            FieldOp::Gt => ordering == Ordering::Greater,
                            FieldOp::Gte => {
                                ordering == Ordering::Greater || ordering == Ordering::Equal
                            }
                            FieldOp::Lt => ordering == Ordering::Less,
                            FieldOp::Lte => {
                                ordering == Ordering::Less || ordering == Ordering::Equal
                            }
                            _ => unreachable!(),
                        }),
                        None => Ok(false),
                    }
                }
            },
            // Missing fields never match, not even Ne.
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use bson::doc;

    use super::DocumentEvaluator;
    use bookcat_core::query::Filter;

    fn sample() -> bson::Bson {
        bson::Bson::Document(doc! {
            "title": "1984",
            "author": "George Orwell",
            "published_year": 1949,
            "price": 10.99,
            "in_stock": true,
        })
    }

    #[test]
    fn equality_on_strings_and_booleans() {
        let doc = sample();
        assert!(DocumentEvaluator::new(&doc)
            .evaluate(&Filter::eq("author", "George Orwell"))
            .unwrap());
        assert!(DocumentEvaluator::new(&doc)
            .evaluate(&Filter::eq("in_stock", true))
            .unwrap());
        assert!(!DocumentEvaluator::new(&doc)
            .evaluate(&Filter::eq("title", "Moby Dick"))
            .unwrap());
    }

    #[test]
    fn range_comparisons_mix_integer_widths() {
        let doc = sample();
        // Query value is Int32, stored value compares as a number either way.
        assert!(DocumentEvaluator::new(&doc)
            .evaluate(&Filter::gt("published_year", 1900))
            .unwrap());
        assert!(!DocumentEvaluator::new(&doc)
            .evaluate(&Filter::gt("published_year", 2000))
            .unwrap());
        assert!(DocumentEvaluator::new(&doc)
            .evaluate(&Filter::lte("price", 10.99))
            .unwrap());
    }

    #[test]
    fn and_requires_all_parts() {
        let doc = sample();
        let both = Filter::eq("in_stock", true).and(Filter::gt("published_year", 1940));
        let one = Filter::eq("in_stock", true).and(Filter::gt("published_year", 2010));

        assert!(DocumentEvaluator::new(&doc).evaluate(&both).unwrap());
        assert!(!DocumentEvaluator::new(&doc).evaluate(&one).unwrap());
    }

    #[test]
    fn or_requires_any_part() {
        let doc = sample();
        let either = Filter::eq("genre", "Fantasy").or(Filter::eq("author", "George Orwell"));
        assert!(DocumentEvaluator::new(&doc).evaluate(&either).unwrap());
    }

    #[test]
    fn missing_fields_never_match() {
        let doc = sample();
        assert!(!DocumentEvaluator::new(&doc)
            .evaluate(&Filter::eq("genre", "Fiction"))
            .unwrap());
        assert!(!DocumentEvaluator::new(&doc)
            .evaluate(&Filter::ne("genre", "Fiction"))
            .unwrap());
    }

    #[test]
    fn incomparable_types_do_not_match_ranges() {
        let doc = sample();
        assert!(!DocumentEvaluator::new(&doc)
            .evaluate(&Filter::gt("title", 10))
            .unwrap());
    }
}
