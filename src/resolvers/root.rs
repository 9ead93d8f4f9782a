//! Root query resolvers

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use super::{
    Args, FieldResolver, FieldResolvers, ResolverContext, id_argument, record_to_value,
    records_to_value,
};
use crate::core::store::RecordStore;
use crate::schema::{Cardinality, FieldClassification, RootType};

/// Fetches one record by the `id` argument
pub struct FindOneResolver {
    field_name: String,
    type_name: String,
    store: Arc<dyn RecordStore>,
}

#[async_trait]
impl FieldResolver for FindOneResolver {
    fn kind(&self) -> &'static str {
        "find-one"
    }

    async fn resolve(&self, _parent: &Value, args: &Args, ctx: &ResolverContext) -> Result<Value> {
        let id = id_argument(&self.field_name, args)?;
        tracing::trace!(request_id = %ctx.request_id, type_name = %self.type_name, %id, "findRecord");

        let record = self.store.find_record(&self.type_name, &id).await?;
        Ok(record_to_value(record))
    }
}

/// Fetches every record of a type
///
/// Arguments declared on the field are not consulted: the fetch is always
/// unfiltered.
pub struct FindAllResolver {
    type_name: String,
    store: Arc<dyn RecordStore>,
}

#[async_trait]
impl FieldResolver for FindAllResolver {
    fn kind(&self) -> &'static str {
        "find-all"
    }

    async fn resolve(&self, _parent: &Value, _args: &Args, ctx: &ResolverContext) -> Result<Value> {
        tracing::trace!(request_id = %ctx.request_id, type_name = %self.type_name, "findAll");

        let records = self.store.find_all(&self.type_name).await?;
        Ok(records_to_value(records))
    }
}

/// Resolver for one root query field
///
/// The store is addressed with the field's target type name, never with the
/// field name.
pub fn root_resolver(
    field: &FieldClassification,
    store: &Arc<dyn RecordStore>,
) -> Arc<dyn FieldResolver> {
    match field.cardinality {
        Cardinality::One => Arc::new(FindOneResolver {
            field_name: field.name.clone(),
            type_name: field.target_type.clone(),
            store: store.clone(),
        }),
        Cardinality::Many => Arc::new(FindAllResolver {
            type_name: field.target_type.clone(),
            store: store.clone(),
        }),
    }
}

/// Build one resolver per field of the root query type
pub fn build_root_resolvers(query_type: &RootType, store: &Arc<dyn RecordStore>) -> FieldResolvers {
    query_type
        .fields
        .iter()
        .map(|root| {
            let resolver = root_resolver(&root.field, store);
            tracing::debug!(
                field = %root.field.name,
                type_name = %root.field.target_type,
                kind = resolver.kind(),
                "Built root resolver"
            );
            (root.field.name.clone(), resolver)
        })
        .collect()
}
