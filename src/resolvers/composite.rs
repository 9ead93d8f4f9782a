//! Relationship (composite) field resolvers
//!
//! Stored records carry relationship fields as a plain id (to-one) or a
//! comma-joined id list (to-many), the latter usually produced by evaluating a
//! relationship formula. These resolvers decode that representation and load
//! the related records.

use anyhow::Result;
use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;

use super::{
    Args, FieldResolver, FieldResolvers, ResolverContext, record_to_value, records_to_value,
    value_to_id,
};
use crate::core::store::RecordStore;
use crate::schema::{Cardinality, FieldClassification, TypeClassification};

/// Split a comma-joined id list
///
/// Purely syntactic: order and duplicates are kept, tokens are not trimmed,
/// and an empty string yields no ids.
pub fn split_ids(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(',').map(str::to_string).collect()
}

/// Loads the record referenced by `parent[field]`
pub struct ToOneResolver {
    field_name: String,
    target_type: String,
    store: Arc<dyn RecordStore>,
}

#[async_trait]
impl FieldResolver for ToOneResolver {
    fn kind(&self) -> &'static str {
        "to-one"
    }

    async fn resolve(&self, parent: &Value, _args: &Args, ctx: &ResolverContext) -> Result<Value> {
        let id = match parent.get(&self.field_name) {
            // Already materialized, e.g. returned by a nested create
            Some(Value::Object(record)) => return Ok(Value::Object(record.clone())),
            Some(value) => value_to_id(value).filter(|id| !id.is_empty()),
            None => None,
        };
        let Some(id) = id else {
            return Ok(Value::Null);
        };

        tracing::trace!(request_id = %ctx.request_id, type_name = %self.target_type, %id, "findRecord");
        let record = self.store.find_record(&self.target_type, &id).await?;
        Ok(record_to_value(record))
    }
}

/// Loads the records referenced by the comma-joined ids in `parent[field]`
pub struct ToManyResolver {
    field_name: String,
    target_type: String,
    store: Arc<dyn RecordStore>,
}

#[async_trait]
impl FieldResolver for ToManyResolver {
    fn kind(&self) -> &'static str {
        "to-many"
    }

    async fn resolve(&self, parent: &Value, _args: &Args, ctx: &ResolverContext) -> Result<Value> {
        let ids = match parent.get(&self.field_name) {
            Some(Value::String(raw)) => split_ids(raw),
            Some(Value::Array(items)) if items.iter().all(Value::is_object) => {
                return Ok(Value::Array(items.clone()));
            }
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| match item {
                    Value::Object(record) => record.get("id").and_then(value_to_id),
                    other => value_to_id(other),
                })
                .collect(),
            Some(other) => value_to_id(other).into_iter().collect(),
            None => Vec::new(),
        };

        tracing::trace!(
            request_id = %ctx.request_id,
            type_name = %self.target_type,
            count = ids.len(),
            "findRecords"
        );
        let records = self.store.find_records(&self.target_type, &ids).await?;
        Ok(records_to_value(records))
    }
}

/// Resolver for one relationship field
pub fn composite_resolver(
    field: &FieldClassification,
    store: &Arc<dyn RecordStore>,
) -> Arc<dyn FieldResolver> {
    match field.cardinality {
        Cardinality::One => Arc::new(ToOneResolver {
            field_name: field.name.clone(),
            target_type: field.target_type.clone(),
            store: store.clone(),
        }),
        Cardinality::Many => Arc::new(ToManyResolver {
            field_name: field.name.clone(),
            target_type: field.target_type.clone(),
            store: store.clone(),
        }),
    }
}

/// Build relationship resolvers for every object type that has relationships
///
/// Scalar fields get no resolver; types without relationship fields are left
/// out of the result.
pub fn build_composite_resolvers<'a>(
    object_types: impl IntoIterator<Item = &'a TypeClassification>,
    store: &Arc<dyn RecordStore>,
) -> IndexMap<String, FieldResolvers> {
    object_types
        .into_iter()
        .filter(|t| !t.relationships.is_empty())
        .map(|t| {
            let resolvers: FieldResolvers = t
                .relationships
                .iter()
                .map(|field| (field.name.clone(), composite_resolver(field, store)))
                .collect();
            tracing::debug!(type_name = %t.name, fields = resolvers.len(), "Built composite resolvers");
            (t.name.clone(), resolvers)
        })
        .collect()
}
