//! Query translation from the catalog AST to MongoDB query syntax.
//!
//! This module translates the catalog's abstract query expressions into
//! MongoDB BSON documents, and builds the aggregation pipelines for the
//! rollup operations. Execution of both is left entirely to the MongoDB
//! query engine.

use bson::{Bson, Document, doc};

use bookcat_core::{
    aggregate::{GroupKey, RollupOrder},
    error::CatalogError,
    query::{Expr, FieldOp, QueryVisitor},
};

/// Translates catalog query expressions into MongoDB query documents.
///
/// This struct implements the [`QueryVisitor`] trait to convert abstract
/// query expressions into MongoDB's native BSON query syntax.
pub(crate) struct MongoQueryTranslator;

impl QueryVisitor for MongoQueryTranslator {
    type Output = Document;
    type Error = CatalogError;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            "$and": exprs
                .iter()
                .map(|expr| self.visit_expr(expr))
                .collect::<Result<Vec<_>, _>>()?,
        })
    }

    fn visit_or(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            "$or": exprs
                .iter()
                .map(|expr| self.visit_expr(expr))
                .collect::<Result<Vec<_>, _>>()?,
        })
    }

    fn visit_field(
        &mut self,
        field: &str,
        op: &FieldOp,
        value: &Bson,
    ) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            field: match op {
                FieldOp::Eq => doc! { "$eq": value },
                FieldOp::Ne => doc! { "$ne": value },
                FieldOp::Gt => doc! { "$gt": value },
                FieldOp::Gte => doc! { "$gte": value },
                FieldOp::Lt => doc! { "$lt": value },
                FieldOp::Lte => doc! { "$lte": value },
            }
        })
    }
}

/// The grouping expression placed in `$group`'s `_id`.
pub(crate) fn group_id_expr(key: &GroupKey) -> Bson {
    match key {
        GroupKey::Field(field) => Bson::String(format!("${field}")),
        // year - (year mod 10): same bucket as floor(year / 10) * 10 for the
        // year values the catalog stores, and the key stays an integer.
        GroupKey::Decade(field) => Bson::Document(doc! {
            "$subtract": [
                format!("${field}"),
                { "$mod": [ format!("${field}"), 10 ] },
            ]
        }),
    }
}

/// Pipeline averaging `field` per bucket. Bucket order is left to the engine.
pub(crate) fn average_pipeline(key: &GroupKey, field: &str) -> Vec<Document> {
    vec![doc! {
        "$group": {
            "_id": group_id_expr(key),
            "value": { "$avg": format!("${field}") },
        }
    }]
}

/// Pipeline counting documents per bucket, sorted per `order` and truncated
/// to `limit` when given.
pub(crate) fn count_pipeline(
    key: &GroupKey,
    order: RollupOrder,
    limit: Option<usize>,
) -> Vec<Document> {
    let mut pipeline = vec![doc! {
        "$group": {
            "_id": group_id_expr(key),
            "value": { "$sum": 1 },
        }
    }];

    pipeline.push(match order {
        RollupOrder::KeyAsc => doc! { "$sort": { "_id": 1 } },
        RollupOrder::CountDesc => doc! { "$sort": { "value": -1 } },
    });

    if let Some(limit) = limit {
        pipeline.push(doc! { "$limit": limit as i64 });
    }

    pipeline
}

#[cfg(test)]
mod tests {
    use bson::doc;

    use super::*;
    use bookcat_core::query::Filter;

    #[test]
    fn equality_and_range_filters() {
        let filter = MongoQueryTranslator
            .visit_expr(&Filter::eq("genre", "Fiction"))
            .unwrap();
        assert_eq!(filter, doc! { "genre": { "$eq": "Fiction" } });

        let filter = MongoQueryTranslator
            .visit_expr(&Filter::gt("published_year", 2000))
            .unwrap();
        assert_eq!(filter, doc! { "published_year": { "$gt": 2000 } });
    }

    #[test]
    fn compound_filter_nests_under_and() {
        let expr = Filter::eq("in_stock", true).and(Filter::gt("published_year", 2010));
        let filter = MongoQueryTranslator.visit_expr(&expr).unwrap();

        assert_eq!(
            filter,
            doc! {
                "$and": [
                    { "in_stock": { "$eq": true } },
                    { "published_year": { "$gt": 2010 } },
                ]
            }
        );
    }

    #[test]
    fn average_pipeline_groups_on_the_field() {
        let pipeline = average_pipeline(&GroupKey::field("genre"), "price");
        assert_eq!(
            pipeline,
            vec![doc! {
                "$group": { "_id": "$genre", "value": { "$avg": "$price" } }
            }]
        );
    }

    #[test]
    fn top_bucket_pipeline_sorts_and_limits() {
        let pipeline = count_pipeline(&GroupKey::field("author"), RollupOrder::CountDesc, Some(1));
        assert_eq!(
            pipeline,
            vec![
                doc! { "$group": { "_id": "$author", "value": { "$sum": 1 } } },
                doc! { "$sort": { "value": -1 } },
                doc! { "$limit": 1_i64 },
            ]
        );
    }

    #[test]
    fn decade_pipeline_derives_an_integer_key() {
        let pipeline = count_pipeline(
            &GroupKey::decade("published_year"),
            RollupOrder::KeyAsc,
            None,
        );
        assert_eq!(
            pipeline,
            vec![
                doc! {
                    "$group": {
                        "_id": {
                            "$subtract": [
                                "$published_year",
                                { "$mod": ["$published_year", 10] },
                            ]
                        },
                        "value": { "$sum": 1 },
                    }
                },
                doc! { "$sort": { "_id": 1 } },
            ]
        );
    }
}
