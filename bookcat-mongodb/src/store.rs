use async_trait::async_trait;
use bson::{Bson, Document, Uuid, doc};
use futures::TryStreamExt;
use mongodb::{
    Client, Collection as MongoCollection, IndexModel,
    options::{ClientOptions, FindOptions},
};

use bookcat_core::{
    aggregate::{GroupAverage, GroupCount, GroupKey, RollupOrder},
    backend::{CatalogBackend, CatalogBackendBuilder},
    error::{CatalogError, CatalogResult},
    explain::ExplainReport,
    index::IndexKey,
    query::{Expr, Query, QueryVisitor, Sort, SortDirection},
};

use crate::query::{MongoQueryTranslator, average_pipeline, count_pipeline};

#[derive(Debug)]
pub struct MongoDbStore {
    client: Client,
    database: String,
}

impl MongoDbStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(dsn: &str, database: &str) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(dsn, database)
    }

    fn get_collection(&self, collection_name: &str) -> MongoCollection<Document> {
        self.client
            .database(&self.database)
            .collection(collection_name)
    }

    fn prepare_document(&self, id: &Uuid, document: &Bson) -> CatalogResult<Document> {
        Ok(Document::from_iter(
            document
                .as_document()
                .cloned()
                .ok_or_else(|| CatalogError::InvalidDocument("Expected document".into()))?
                .into_iter()
                .chain(vec![("_id".to_string(), id.into())].into_iter()),
        ))
    }

    fn restore_document(&self, document: &Document) -> CatalogResult<Bson> {
        Ok(Bson::Document(Document::from_iter(
            document
                .clone()
                .into_iter()
                .filter(|(k, _)| !["_id"].contains(&k.as_str())),
        )))
    }

    fn translate_filter(&self, filter: Option<&Expr>) -> CatalogResult<Document> {
        match filter {
            Some(expr) => MongoQueryTranslator.visit_expr(expr),
            None => Ok(doc! {}),
        }
    }

    fn sort_document(sort: &Sort) -> Document {
        doc! {
            sort.field.clone(): match sort.direction {
                SortDirection::Asc => 1,
                SortDirection::Desc => -1,
            }
        }
    }

    async fn shutdown(self) -> CatalogResult<()> {
        self.client.shutdown().await;

        Ok(())
    }
}

// Explain replies report counters as Int32 or Int64 depending on topology.
fn stat_u64(doc: &Document, key: &str) -> u64 {
    match doc.get(key) {
        Some(Bson::Int32(value)) => *value as u64,
        Some(Bson::Int64(value)) => *value as u64,
        Some(Bson::Double(value)) => *value as u64,
        _ => 0,
    }
}

fn sub_document<'a>(doc: &'a Document, key: &str) -> Option<&'a Document> {
    doc.get(key).and_then(|value| value.as_document())
}

/// Walks a winning plan root-first, collecting stage names and the first
/// index name encountered.
fn collect_stages(plan: &Document, stages: &mut Vec<String>, index: &mut Option<String>) {
    if let Some(Bson::String(stage)) = plan.get("stage") {
        stages.push(stage.clone());
    }
    if index.is_none() {
        if let Some(Bson::String(name)) = plan.get("indexName") {
            *index = Some(name.clone());
        }
    }
    if let Some(inner) = sub_document(plan, "inputStage") {
        collect_stages(inner, stages, index);
    }
    if let Some(Bson::Array(inners)) = plan.get("inputStages") {
        for inner in inners {
            if let Some(inner) = inner.as_document() {
                collect_stages(inner, stages, index);
            }
        }
    }
}

#[async_trait]
impl CatalogBackend for MongoDbStore {
    async fn insert_documents(
        &self,
        documents: Vec<(Uuid, Bson)>,
        collection: &str,
    ) -> CatalogResult<()> {
        self.get_collection(collection)
            .insert_many(
                documents
                    .iter()
                    .map(|(id, doc)| self.prepare_document(id, doc))
                    .collect::<CatalogResult<Vec<Document>>>()?,
            )
            .await
            .map_err(|e| CatalogError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn find_documents(&self, query: Query, collection: &str) -> CatalogResult<Vec<Bson>> {
        let mut options = FindOptions::default();

        if let Some(limit) = query.limit {
            options.limit = Some(limit as i64);
        }
        if let Some(skip) = query.offset {
            options.skip = Some(skip as u64);
        }
        if let Some(sort) = &query.sort {
            options.sort = Some(Self::sort_document(sort));
        }
        if let Some(fields) = &query.projection {
            // The engine drops everything but the listed fields; `_id` must be
            // suppressed explicitly.
            let mut projection = Document::new();
            for field in fields {
                projection.insert(field.clone(), 1);
            }
            projection.insert("_id", 0);
            options.projection = Some(projection);
        }

        Ok(self
            .get_collection(collection)
            .find(self.translate_filter(query.filter.as_ref())?)
            .with_options(options)
            .await
            .map_err(|e| CatalogError::Backend(e.to_string()))?
            .try_collect::<Vec<Document>>()
            .await
            .map_err(|e| CatalogError::Backend(e.to_string()))?
            .into_iter()
            .map(|doc| self.restore_document(&doc))
            .collect::<CatalogResult<Vec<Bson>>>()?)
    }

    async fn update_first(
        &self,
        filter: Expr,
        changes: Document,
        collection: &str,
    ) -> CatalogResult<u64> {
        let result = self
            .get_collection(collection)
            .update_one(
                MongoQueryTranslator.visit_expr(&filter)?,
                doc! { "$set": changes },
            )
            .await
            .map_err(|e| CatalogError::Backend(e.to_string()))?;

        Ok(result.modified_count)
    }

    async fn delete_first(&self, filter: Expr, collection: &str) -> CatalogResult<u64> {
        let result = self
            .get_collection(collection)
            .delete_one(MongoQueryTranslator.visit_expr(&filter)?)
            .await
            .map_err(|e| CatalogError::Backend(e.to_string()))?;

        Ok(result.deleted_count)
    }

    async fn average_by_group(
        &self,
        key: GroupKey,
        field: &str,
        collection: &str,
    ) -> CatalogResult<Vec<GroupAverage>> {
        Ok(self
            .get_collection(collection)
            .aggregate(average_pipeline(&key, field))
            .await
            .map_err(|e| CatalogError::Backend(e.to_string()))?
            .try_collect::<Vec<Document>>()
            .await
            .map_err(|e| CatalogError::Backend(e.to_string()))?
            .into_iter()
            .map(|row| GroupAverage {
                key: row.get("_id").cloned().unwrap_or(Bson::Null),
                average: match row.get("value") {
                    Some(Bson::Double(value)) => *value,
                    Some(Bson::Int32(value)) => *value as f64,
                    Some(Bson::Int64(value)) => *value as f64,
                    _ => 0.0,
                },
            })
            .collect())
    }

    async fn count_by_group(
        &self,
        key: GroupKey,
        order: RollupOrder,
        limit: Option<usize>,
        collection: &str,
    ) -> CatalogResult<Vec<GroupCount>> {
        Ok(self
            .get_collection(collection)
            .aggregate(count_pipeline(&key, order, limit))
            .await
            .map_err(|e| CatalogError::Backend(e.to_string()))?
            .try_collect::<Vec<Document>>()
            .await
            .map_err(|e| CatalogError::Backend(e.to_string()))?
            .into_iter()
            .map(|row| GroupCount {
                key: row.get("_id").cloned().unwrap_or(Bson::Null),
                count: stat_u64(&row, "value"),
            })
            .collect())
    }

    async fn create_index(&self, keys: Vec<IndexKey>, collection: &str) -> CatalogResult<String> {
        let result = self
            .get_collection(collection)
            .create_index(
                IndexModel::builder()
                    .keys(Document::from_iter(keys.iter().map(|key| {
                        (
                            key.field.clone(),
                            Bson::Int32(match key.direction {
                                SortDirection::Asc => 1,
                                SortDirection::Desc => -1,
                            }),
                        )
                    })))
                    .build(),
            )
            .await
            .map_err(|e| CatalogError::Backend(e.to_string()))?;

        Ok(result.index_name)
    }

    async fn explain_find(
        &self,
        query: Query,
        collection: &str,
    ) -> CatalogResult<ExplainReport> {
        let mut find_command = doc! {
            "find": collection,
            "filter": self.translate_filter(query.filter.as_ref())?,
        };
        if let Some(sort) = &query.sort {
            find_command.insert("sort", Self::sort_document(sort));
        }
        if let Some(limit) = query.limit {
            find_command.insert("limit", limit as i64);
        }
        if let Some(skip) = query.offset {
            find_command.insert("skip", skip as i64);
        }

        let reply = self
            .client
            .database(&self.database)
            .run_command(doc! {
                "explain": find_command,
                "verbosity": "executionStats",
            })
            .await
            .map_err(|e| CatalogError::Backend(e.to_string()))?;

        let mut stages = Vec::new();
        let mut index_used = None;
        if let Some(winning) = sub_document(&reply, "queryPlanner")
            .and_then(|planner| sub_document(planner, "winningPlan"))
        {
            collect_stages(winning, &mut stages, &mut index_used);
        }

        let stats = sub_document(&reply, "executionStats")
            .cloned()
            .unwrap_or_default();

        Ok(ExplainReport {
            returned: stat_u64(&stats, "nReturned"),
            docs_examined: stat_u64(&stats, "totalDocsExamined"),
            keys_examined: stat_u64(&stats, "totalKeysExamined"),
            execution_time_ms: stat_u64(&stats, "executionTimeMillis"),
            stages,
            index_used,
        })
    }

    async fn shutdown(self) -> CatalogResult<()> {
        self.shutdown().await
    }
}

pub struct MongoDbStoreBuilder {
    dsn: String,
    database: String,
}

impl MongoDbStoreBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
        }
    }
}

#[async_trait]
impl CatalogBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    async fn build(self) -> CatalogResult<Self::Backend> {
        Ok(MongoDbStore::new(
            Client::with_options(
                ClientOptions::parse(&self.dsn)
                    .await
                    .map_err(|e| CatalogError::Initialization(e.to_string()))?,
            )
            .map_err(|e| CatalogError::Initialization(e.to_string()))?,
            self.database,
        ))
    }
}

#[cfg(test)]
mod tests {
    use bson::doc;

    use super::collect_stages;

    #[test]
    fn stage_walk_is_root_first_and_finds_the_index() {
        let plan = doc! {
            "stage": "FETCH",
            "inputStage": {
                "stage": "IXSCAN",
                "indexName": "title_1",
            },
        };

        let mut stages = Vec::new();
        let mut index = None;
        collect_stages(&plan, &mut stages, &mut index);

        assert_eq!(stages, vec!["FETCH", "IXSCAN"]);
        assert_eq!(index.as_deref(), Some("title_1"));
    }
}
