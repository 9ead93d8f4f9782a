//! Resolver synthesis
//!
//! [`ResolverGenerator`] classifies a schema once and turns every
//! classification entry into a resolver:
//!
//! - `root`: `Query` fields become find-one / find-all resolvers
//! - `composite`: relationship fields of object types dereference stored ids
//! - `mutation`: `create<Type>`, `update<Type>` and `delete<Type>` fields
//!
//! The resulting [`ResolverMap`] holds no mutable state. Every resolver shares
//! the same store handle and can be invoked concurrently.

pub mod composite;
pub mod formula;
pub mod mutation;
pub mod root;

#[cfg(test)]
pub(crate) mod test_support;

use anyhow::Result;
use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::GeneratorConfig;
use crate::core::error::{ResolverError, SchemaError};
use crate::core::store::{Record, RecordStore};
use crate::schema::{Schema, classify};

/// Arguments passed to a resolver
pub type Args = Map<String, Value>;

/// Resolvers of one type, keyed by field name
pub type FieldResolvers = IndexMap<String, Arc<dyn FieldResolver>>;

/// Per-request context handed to every resolver
#[derive(Debug, Clone)]
pub struct ResolverContext {
    /// Correlates the store calls issued while serving one request
    pub request_id: Uuid,
}

impl Default for ResolverContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolverContext {
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4(),
        }
    }
}

/// A generated field resolver
///
/// Invoked by the execution engine with the parent value, the field's
/// arguments and the request context. Store errors are returned unchanged.
#[async_trait]
pub trait FieldResolver: Send + Sync {
    /// Short label of the resolver flavour (e.g. "find-one", "to-many")
    fn kind(&self) -> &'static str;

    async fn resolve(&self, parent: &Value, args: &Args, ctx: &ResolverContext) -> Result<Value>;
}

/// All generated resolvers, keyed by type name then field name
///
/// Root resolvers live under the reserved names [`ResolverMap::QUERY`] and
/// [`ResolverMap::MUTATION`] whatever the schema calls its root types.
#[derive(Clone, Default)]
pub struct ResolverMap {
    types: IndexMap<String, FieldResolvers>,
}

impl ResolverMap {
    pub const QUERY: &'static str = "Query";
    pub const MUTATION: &'static str = "Mutation";

    /// Root query resolvers
    pub fn query(&self) -> Option<&FieldResolvers> {
        self.types.get(Self::QUERY)
    }

    /// Root mutation resolvers, absent when the schema has no mutation type
    pub fn mutation(&self) -> Option<&FieldResolvers> {
        self.types.get(Self::MUTATION)
    }

    /// Resolvers registered for a type
    pub fn type_resolvers(&self, type_name: &str) -> Option<&FieldResolvers> {
        self.types.get(type_name)
    }

    /// Look up one resolver
    pub fn get(&self, type_name: &str, field_name: &str) -> Option<&Arc<dyn FieldResolver>> {
        self.types.get(type_name)?.get(field_name)
    }

    pub fn contains(&self, type_name: &str, field_name: &str) -> bool {
        self.get(type_name, field_name).is_some()
    }

    /// Names of every type with at least one entry, roots included
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Invoke the resolver for `type_name.field_name`
    pub async fn resolve(
        &self,
        type_name: &str,
        field_name: &str,
        parent: &Value,
        args: &Args,
        ctx: &ResolverContext,
    ) -> Result<Value> {
        let resolver = self
            .get(type_name, field_name)
            .ok_or_else(|| ResolverError::NoResolver {
                type_name: type_name.to_string(),
                field: field_name.to_string(),
            })?;
        resolver.resolve(parent, args, ctx).await
    }

    fn insert(&mut self, type_name: impl Into<String>, resolvers: FieldResolvers) {
        self.types.insert(type_name.into(), resolvers);
    }
}

impl fmt::Debug for ResolverMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (type_name, resolvers) in &self.types {
            let fields: Vec<String> = resolvers
                .iter()
                .map(|(name, r)| format!("{}: {}", name, r.kind()))
                .collect();
            map.entry(type_name, &fields);
        }
        map.finish()
    }
}

/// Builds a [`ResolverMap`] from a schema and a store
#[derive(Debug, Clone, Default)]
pub struct ResolverGenerator {
    config: GeneratorConfig,
}

impl ResolverGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Classify `schema` and build every resolver
    ///
    /// Fails before any resolver exists when the schema references an
    /// undefined type. Building has no side effects: the store is captured,
    /// never called.
    pub fn generate(
        &self,
        schema: &Schema,
        store: Arc<dyn RecordStore>,
    ) -> Result<ResolverMap, SchemaError> {
        let classification = classify(schema)?;
        let mut map = ResolverMap::default();

        let query = classification
            .query_type
            .as_ref()
            .map(|query| root::build_root_resolvers(query, &store))
            .unwrap_or_default();
        let query_count = query.len();
        map.insert(ResolverMap::QUERY, query);

        let mut mutation_count = 0;
        if let Some(mutation_type) = &classification.mutation_type {
            let mutations = mutation::build_mutation_resolvers(
                mutation_type,
                &classification,
                &store,
                &self.config,
            );
            mutation_count = mutations.len();
            map.insert(ResolverMap::MUTATION, mutations);
        }

        let composites =
            composite::build_composite_resolvers(classification.object_types.values(), &store);
        let composite_types = composites.len();
        for (type_name, resolvers) in composites {
            map.insert(type_name, resolvers);
        }

        tracing::info!(
            queries = query_count,
            mutations = mutation_count,
            composite_types,
            "Generated resolver map"
        );

        Ok(map)
    }
}

/// Build a resolver map with the default configuration
pub fn generate_resolvers(
    schema: &Schema,
    store: Arc<dyn RecordStore>,
) -> Result<ResolverMap, SchemaError> {
    ResolverGenerator::default().generate(schema, store)
}

/// Read an id out of a JSON value
///
/// Strings are taken as-is and numbers are stringified. Anything else is not
/// an id.
pub(crate) fn value_to_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Read the required `id` argument of a field
pub(crate) fn id_argument(field_name: &str, args: &Args) -> Result<String, ResolverError> {
    match args.get("id") {
        None | Some(Value::Null) => Err(ResolverError::MissingArgument {
            field: field_name.to_string(),
            argument: "id".to_string(),
        }),
        Some(value) => value_to_id(value).ok_or_else(|| ResolverError::InvalidArgument {
            field: field_name.to_string(),
            argument: "id".to_string(),
            expected: "an ID string".to_string(),
        }),
    }
}

pub(crate) fn record_to_value(record: Option<Record>) -> Value {
    record.map(Value::Object).unwrap_or(Value::Null)
}

pub(crate) fn records_to_value(records: Vec<Record>) -> Value {
    Value::Array(records.into_iter().map(Value::Object).collect())
}
