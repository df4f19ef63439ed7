//! In-memory storage implementation for the catalog.
//!
//! This module provides a simple but complete in-memory backend that stores
//! documents as BSON values behind an async-safe read-write lock. Documents
//! keep their insertion order, so first-match updates/deletes and pagination
//! behave deterministically.

use std::{cmp::Ordering, collections::HashMap, sync::Arc, time::Instant};

use async_trait::async_trait;
use bson::{Bson, Document, Uuid};
use indexmap::IndexMap;
use mea::rwlock::RwLock;

use bookcat_core::{
    aggregate::{GroupAverage, GroupCount, GroupKey, RollupOrder},
    backend::{CatalogBackend, CatalogBackendBuilder},
    error::{CatalogError, CatalogResult},
    explain::ExplainReport,
    index::{IndexKey, index_name},
    query::{Expr, Query, SortDirection},
};

use crate::evaluator::{Comparable, DocumentEvaluator};

type CollectionMap = IndexMap<String, Bson>;
type StoreMap = HashMap<String, CollectionMap>;

/// Thread-safe in-memory catalog backend.
///
/// This struct implements the [`CatalogBackend`] trait to provide a fully
/// functional document store that operates entirely in memory. All documents
/// are stored as BSON values indexed by their UUID, in insertion order.
///
/// # Thread Safety
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state,
/// allowing it to be safely shared across async tasks. Multiple clones of the
/// same instance share the same underlying data.
///
/// # Performance
///
/// Every query scans all documents in a collection. Created indexes are
/// recorded by name for idempotency but never consulted; explain reports are
/// honest about this and always describe a collection scan.
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// The main storage map: collection_name -> (document_id -> document)
    store: Arc<RwLock<StoreMap>>,
    /// Created index names per collection, for idempotent re-creation.
    indexes: Arc<RwLock<HashMap<String, Vec<String>>>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    ///
    /// The returned store is ready for use and contains no collections or documents.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
            indexes: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Creates a builder for constructing an `InMemoryStore`.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }
}

fn numeric(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(value) => Some(*value as f64),
        Bson::Int64(value) => Some(*value as f64),
        Bson::Double(value) => Some(*value),
        _ => None,
    }
}

/// Derives the bucket key of one document. Missing or non-numeric values fall
/// into the null bucket, matching document-store grouping semantics.
fn group_key(doc: &Bson, key: &GroupKey) -> Bson {
    let value = doc
        .as_document()
        .and_then(|doc| doc.get(key.source_field()));

    match key {
        GroupKey::Field(_) => value.cloned().unwrap_or(Bson::Null),
        GroupKey::Decade(_) => value
            .and_then(numeric)
            .map(|year| Bson::Int64(((year / 10.0).floor() * 10.0) as i64))
            .unwrap_or(Bson::Null),
    }
}

fn project_document(doc: &Bson, fields: &[String]) -> Bson {
    let mut projected = Document::new();

    if let Some(map) = doc.as_document() {
        for field in fields {
            if let Some(value) = map.get(field) {
                projected.insert(field.clone(), value.clone());
            }
        }
    }

    Bson::Document(projected)
}

fn sort_documents(docs: &mut [Bson], field: &str, direction: SortDirection) {
    docs.sort_by(|a, b| {
        let left = a
            .as_document()
            .and_then(|doc| doc.get(field))
            .map(Comparable::from)
            .unwrap_or(Comparable::Null);
        let right = b
            .as_document()
            .and_then(|doc| doc.get(field))
            .map(Comparable::from)
            .unwrap_or(Comparable::Null);

        match direction {
            SortDirection::Asc => left.partial_cmp(&right).unwrap_or(Ordering::Equal),
            SortDirection::Desc => right.partial_cmp(&left).unwrap_or(Ordering::Equal),
        }
    });
}

#[async_trait]
impl CatalogBackend for InMemoryStore {
    async fn insert_documents(
        &self,
        documents: Vec<(Uuid, Bson)>,
        collection: &str,
    ) -> CatalogResult<()> {
        let mut store = self.store.write().await;
        let collection_map = store
            .entry(collection.to_string())
            .or_default();

        for (id, doc) in documents {
            let key = id.to_string();

            if collection_map.contains_key(&key) {
                return Err(CatalogError::DocumentAlreadyExists(
                    key,
                    collection.to_string(),
                ));
            }

            collection_map.insert(key, doc);
        }

        Ok(())
    }

    async fn find_documents(&self, query: Query, collection: &str) -> CatalogResult<Vec<Bson>> {
        let store = self.store.read().await;
        let collection_map = match store.get(collection) {
            Some(col) => col,
            None => return Ok(vec![]),
        };

        // Apply filter expressions if present
        let mut docs = match &query.filter {
            Some(filter) => {
                DocumentEvaluator::filter_documents(collection_map.values(), filter)?
            }
            None => collection_map
                .values()
                .cloned()
                .collect::<Vec<_>>(),
        };

        // Sorting is stable, so ties keep their insertion order
        if let Some(sort) = &query.sort {
            sort_documents(&mut docs, &sort.field, sort.direction);
        }

        let docs = docs
            .into_iter()
            .skip(query.offset.unwrap_or(0))
            .take(query.limit.unwrap_or(usize::MAX))
            .collect::<Vec<_>>();

        Ok(match &query.projection {
            Some(fields) => docs
                .iter()
                .map(|doc| project_document(doc, fields))
                .collect(),
            None => docs,
        })
    }

    async fn update_first(
        &self,
        filter: Expr,
        changes: Document,
        collection: &str,
    ) -> CatalogResult<u64> {
        let mut store = self.store.write().await;
        let collection_map = match store.get_mut(collection) {
            Some(col) => col,
            None => return Ok(0),
        };

        for doc in collection_map.values_mut() {
            if !DocumentEvaluator::new(doc)
                .evaluate(&filter)
                .unwrap_or(false)
            {
                continue;
            }

            let map = match doc.as_document_mut() {
                Some(map) => map,
                None => {
                    return Err(CatalogError::InvalidDocument(
                        "expected a document".to_string(),
                    ));
                }
            };

            // A match that already carries the target values counts as zero
            // modified, matching the engine's update semantics.
            let mut changed = false;
            for (field, value) in changes.iter() {
                if map.get(field) != Some(value) {
                    map.insert(field.clone(), value.clone());
                    changed = true;
                }
            }

            return Ok(changed as u64);
        }

        Ok(0)
    }

    async fn delete_first(&self, filter: Expr, collection: &str) -> CatalogResult<u64> {
        let mut store = self.store.write().await;
        let collection_map = match store.get_mut(collection) {
            Some(col) => col,
            None => return Ok(0),
        };

        let key = collection_map
            .iter()
            .find_map(|(key, doc)| {
                DocumentEvaluator::new(doc)
                    .evaluate(&filter)
                    .unwrap_or(false)
                    .then(|| key.clone())
            });

        match key {
            Some(key) => {
                // shift_remove keeps the insertion order of the remainder
                collection_map.shift_remove(&key);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn average_by_group(
        &self,
        key: GroupKey,
        field: &str,
        collection: &str,
    ) -> CatalogResult<Vec<GroupAverage>> {
        let store = self.store.read().await;
        let collection_map = match store.get(collection) {
            Some(col) => col,
            None => return Ok(vec![]),
        };

        // Buckets keep first-seen order; emission order is engine-defined anyway.
        let mut buckets: Vec<(Bson, f64, u64)> = Vec::new();

        for doc in collection_map.values() {
            // Documents without a numeric value do not contribute.
            let value = match doc
                .as_document()
                .and_then(|doc| doc.get(field))
                .and_then(numeric)
            {
                Some(value) => value,
                None => continue,
            };

            let bucket = group_key(doc, &key);
            match buckets.iter_mut().find(|(k, _, _)| *k == bucket) {
                Some((_, sum, count)) => {
                    *sum += value;
                    *count += 1;
                }
                None => buckets.push((bucket, value, 1)),
            }
        }

        Ok(buckets
            .into_iter()
            .map(|(key, sum, count)| GroupAverage { key, average: sum / count as f64 })
            .collect())
    }

    async fn count_by_group(
        &self,
        key: GroupKey,
        order: RollupOrder,
        limit: Option<usize>,
        collection: &str,
    ) -> CatalogResult<Vec<GroupCount>> {
        let store = self.store.read().await;
        let collection_map = match store.get(collection) {
            Some(col) => col,
            None => return Ok(vec![]),
        };

        let mut buckets: Vec<(Bson, u64)> = Vec::new();

        for doc in collection_map.values() {
            let bucket = group_key(doc, &key);
            match buckets.iter_mut().find(|(k, _)| *k == bucket) {
                Some((_, count)) => *count += 1,
                None => buckets.push((bucket, 1)),
            }
        }

        match order {
            RollupOrder::KeyAsc => buckets.sort_by(|(a, _), (b, _)| {
                Comparable::from(a)
                    .partial_cmp(&Comparable::from(b))
                    .unwrap_or(Ordering::Equal)
            }),
            // Stable sort: tied buckets stay in first-seen order.
            RollupOrder::CountDesc => buckets.sort_by(|(_, a), (_, b)| b.cmp(a)),
        }

        if let Some(limit) = limit {
            buckets.truncate(limit);
        }

        Ok(buckets
            .into_iter()
            .map(|(key, count)| GroupCount { key, count })
            .collect())
    }

    async fn create_index(&self, keys: Vec<IndexKey>, collection: &str) -> CatalogResult<String> {
        let name = index_name(&keys);

        let mut indexes = self.indexes.write().await;
        let names = indexes
            .entry(collection.to_string())
            .or_default();
        if !names.contains(&name) {
            names.push(name.clone());
        }

        Ok(name)
    }

    async fn explain_find(
        &self,
        query: Query,
        collection: &str,
    ) -> CatalogResult<ExplainReport> {
        let started = Instant::now();

        let store = self.store.read().await;
        let collection_map = match store.get(collection) {
            Some(col) => col,
            None => return Ok(ExplainReport {
                stages: vec!["COLLSCAN".to_string()],
                ..ExplainReport::default()
            }),
        };

        let matched = match &query.filter {
            Some(filter) => {
                DocumentEvaluator::filter_documents(collection_map.values(), filter)?.len()
            }
            None => collection_map.len(),
        };
        let returned = matched
            .saturating_sub(query.offset.unwrap_or(0))
            .min(query.limit.unwrap_or(usize::MAX));

        // This store never consults indexes, so every plan is a full scan.
        let mut stages = Vec::new();
        if query.sort.is_some() {
            stages.push("SORT".to_string());
        }
        stages.push("COLLSCAN".to_string());

        Ok(ExplainReport {
            returned: returned as u64,
            docs_examined: collection_map.len() as u64,
            keys_examined: 0,
            execution_time_ms: started.elapsed().as_millis() as u64,
            stages,
            index_used: None,
        })
    }
}

/// Builder for constructing [`InMemoryStore`] instances.
#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl CatalogBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    /// Builds and returns a new [`InMemoryStore`] instance.
    ///
    /// This always succeeds and returns a freshly initialized store.
    async fn build(self) -> CatalogResult<Self::Backend> {
        Ok(InMemoryStore::new())
    }
}

#[cfg(test)]
mod tests {
    use bson::{Bson, Uuid, doc};

    use super::InMemoryStore;
    use bookcat_core::{
        aggregate::{GroupKey, RollupOrder},
        backend::CatalogBackend,
        index::IndexKey,
        query::{Filter, Query, SortDirection},
    };

    fn book(title: &str, author: &str, genre: &str, year: i32, price: f64) -> (Uuid, Bson) {
        (
            Uuid::new(),
            Bson::Document(doc! {
                "title": title,
                "author": author,
                "genre": genre,
                "published_year": year,
                "price": price,
                "in_stock": true,
            }),
        )
    }

    async fn seeded() -> InMemoryStore {
        let store = InMemoryStore::new();
        store
            .insert_documents(
                vec![
                    book("1984", "George Orwell", "Dystopian", 1949, 10.0),
                    book("Animal Farm", "George Orwell", "Dystopian", 1945, 8.0),
                    book("Moby Dick", "Herman Melville", "Adventure", 1851, 9.0),
                    book("The Hobbit", "J.R.R. Tolkien", "Fantasy", 1937, 14.0),
                    book("Dune", "Frank Herbert", "Science Fiction", 1965, 12.0),
                    book("Emma", "Jane Austen", "Romance", 1815, 7.0),
                ],
                "books",
            )
            .await
            .unwrap();
        store
    }

    fn titles(docs: &[Bson]) -> Vec<String> {
        docs.iter()
            .map(|doc| {
                doc.as_document()
                    .and_then(|d| d.get("title"))
                    .and_then(|t| t.as_str())
                    .unwrap()
                    .to_string()
            })
            .collect()
    }

    #[tokio::test]
    async fn unfiltered_find_keeps_insertion_order() {
        let store = seeded().await;
        let docs = store
            .find_documents(Query::new(), "books")
            .await
            .unwrap();

        assert_eq!(
            titles(&docs),
            vec!["1984", "Animal Farm", "Moby Dick", "The Hobbit", "Dune", "Emma"]
        );
    }

    #[tokio::test]
    async fn pages_are_disjoint_and_cover_the_prefix() {
        let store = seeded().await;
        let all = store
            .find_documents(Query::new(), "books")
            .await
            .unwrap();
        let first = store
            .find_documents(Query::builder().limit(3).offset(0).build(), "books")
            .await
            .unwrap();
        let second = store
            .find_documents(Query::builder().limit(3).offset(3).build(), "books")
            .await
            .unwrap();

        let mut combined = titles(&first);
        combined.extend(titles(&second));
        assert_eq!(combined, titles(&all)[..6].to_vec());
    }

    #[tokio::test]
    async fn sort_directions_reverse_each_other() {
        let store = seeded().await;
        let asc = store
            .find_documents(
                Query::builder().sort("price", SortDirection::Asc).build(),
                "books",
            )
            .await
            .unwrap();
        let desc = store
            .find_documents(
                Query::builder().sort("price", SortDirection::Desc).build(),
                "books",
            )
            .await
            .unwrap();

        let mut reversed = titles(&desc);
        reversed.reverse();
        assert_eq!(titles(&asc), reversed);
        assert_eq!(titles(&asc)[0], "Emma");
    }

    #[tokio::test]
    async fn update_first_counts_only_real_changes() {
        let store = seeded().await;

        let modified = store
            .update_first(
                Filter::eq("title", "1984"),
                doc! { "price": 12.99 },
                "books",
            )
            .await
            .unwrap();
        assert_eq!(modified, 1);

        // Same values again: matched but not modified.
        let modified = store
            .update_first(
                Filter::eq("title", "1984"),
                doc! { "price": 12.99 },
                "books",
            )
            .await
            .unwrap();
        assert_eq!(modified, 0);

        let modified = store
            .update_first(
                Filter::eq("title", "No Such Book"),
                doc! { "price": 1.0 },
                "books",
            )
            .await
            .unwrap();
        assert_eq!(modified, 0);
    }

    #[tokio::test]
    async fn delete_first_removes_exactly_one() {
        let store = seeded().await;

        assert_eq!(
            store
                .delete_first(Filter::eq("title", "Moby Dick"), "books")
                .await
                .unwrap(),
            1
        );
        assert_eq!(
            store
                .delete_first(Filter::eq("title", "Moby Dick"), "books")
                .await
                .unwrap(),
            0
        );

        let remaining = store
            .find_documents(Query::new(), "books")
            .await
            .unwrap();
        assert_eq!(remaining.len(), 5);
        assert!(!titles(&remaining).contains(&"Moby Dick".to_string()));
    }

    #[tokio::test]
    async fn average_by_genre_is_the_arithmetic_mean() {
        let store = seeded().await;
        let rows = store
            .average_by_group(GroupKey::field("genre"), "price", "books")
            .await
            .unwrap();

        let dystopian = rows
            .iter()
            .find(|row| row.key == Bson::String("Dystopian".to_string()))
            .unwrap();
        assert_eq!(dystopian.average, 9.0);
        assert_eq!(rows.len(), 5);
    }

    #[tokio::test]
    async fn count_desc_with_limit_keeps_the_top_bucket() {
        let store = seeded().await;
        let rows = store
            .count_by_group(
                GroupKey::field("author"),
                RollupOrder::CountDesc,
                Some(1),
                "books",
            )
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key, Bson::String("George Orwell".to_string()));
        assert_eq!(rows[0].count, 2);
    }

    #[tokio::test]
    async fn decade_buckets_ascend() {
        let store = seeded().await;
        let rows = store
            .count_by_group(
                GroupKey::decade("published_year"),
                RollupOrder::KeyAsc,
                None,
                "books",
            )
            .await
            .unwrap();

        let keys: Vec<i64> = rows
            .iter()
            .map(|row| row.key.as_i64().unwrap())
            .collect();
        assert_eq!(keys, vec![1810, 1850, 1930, 1940, 1960]);

        let forties = rows
            .iter()
            .find(|row| row.key == Bson::Int64(1940))
            .unwrap();
        assert_eq!(forties.count, 2);
    }

    #[tokio::test]
    async fn creating_the_same_index_twice_is_idempotent() {
        let store = seeded().await;
        let keys = vec![IndexKey::asc("author"), IndexKey::desc("published_year")];

        let first = store
            .create_index(keys.clone(), "books")
            .await
            .unwrap();
        let second = store.create_index(keys, "books").await.unwrap();

        assert_eq!(first, "author_1_published_year_-1");
        assert_eq!(first, second);
        assert_eq!(store.indexes.read().await["books"].len(), 1);
    }

    #[tokio::test]
    async fn explain_reports_a_full_scan() {
        let store = seeded().await;
        let report = store
            .explain_find(
                Query::builder()
                    .filter(Filter::eq("title", "1984"))
                    .build(),
                "books",
            )
            .await
            .unwrap();

        assert!(report.collection_scan());
        assert_eq!(report.docs_examined, 6);
        assert_eq!(report.keys_examined, 0);
        assert_eq!(report.returned, 1);

        let sorted = store
            .explain_find(
                Query::builder()
                    .filter(Filter::eq("author", "George Orwell"))
                    .sort("published_year", SortDirection::Desc)
                    .build(),
                "books",
            )
            .await
            .unwrap();
        assert_eq!(sorted.stages, vec!["SORT", "COLLSCAN"]);
        assert_eq!(sorted.returned, 2);
    }
}
