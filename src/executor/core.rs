//! Core GraphQL executor orchestration

use anyhow::Result;
use graphql_parser::query::{
    Definition, Document, FragmentDefinition, OperationDefinition, parse_query,
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;

use super::field_resolver::{self, ExecutionContext};
use super::utils::{self, Variables};
use crate::config::GeneratorConfig;
use crate::core::error::{ExecutionError, SchemaError, SheetqlError};
use crate::core::store::RecordStore;
use crate::resolvers::{ResolverContext, ResolverGenerator, ResolverMap};
use crate::schema::Schema;

/// GraphQL executor running operations against generated resolvers
pub struct GraphQLExecutor {
    schema: Arc<Schema>,
    resolvers: Arc<ResolverMap>,
}

impl GraphQLExecutor {
    /// Create an executor over an already generated resolver map
    pub fn new(schema: Arc<Schema>, resolvers: Arc<ResolverMap>) -> Self {
        Self { schema, resolvers }
    }

    /// Generate resolvers for `schema` against `store` and wrap them
    pub fn from_store(
        schema: Schema,
        store: Arc<dyn RecordStore>,
        config: GeneratorConfig,
    ) -> Result<Self, SchemaError> {
        let resolvers = ResolverGenerator::new(config).generate(&schema, store)?;
        Ok(Self::new(Arc::new(schema), Arc::new(resolvers)))
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn resolvers(&self) -> &ResolverMap {
        &self.resolvers
    }

    /// Execute a GraphQL operation and return the result as JSON
    pub async fn execute(
        &self,
        query: &str,
        variables: Option<HashMap<String, Value>>,
    ) -> Result<Value> {
        let doc = parse_query::<String>(query).map_err(|e| ExecutionError::Parse {
            message: e.to_string(),
        })?;

        let result = self
            .execute_document(&doc, variables.unwrap_or_default())
            .await?;

        Ok(json!({
            "data": result
        }))
    }

    /// Execute an operation, folding any failure into a GraphQL error response
    pub async fn execute_to_response(
        &self,
        query: &str,
        variables: Option<HashMap<String, Value>>,
    ) -> Value {
        match self.execute(query, variables).await {
            Ok(response) => response,
            Err(err) => {
                let err = SheetqlError::from_anyhow(err);
                tracing::warn!(code = err.error_code(), error = %err, "GraphQL operation failed");
                json!({
                    "data": null,
                    "errors": [err.to_response()]
                })
            }
        }
    }

    /// Execute the first operation of a parsed document
    async fn execute_document<'q>(
        &self,
        doc: &Document<'q, String>,
        variables: Variables,
    ) -> Result<Value> {
        let fragments: HashMap<String, &FragmentDefinition<'q, String>> = doc
            .definitions
            .iter()
            .filter_map(|def| match def {
                Definition::Fragment(fragment) => Some((fragment.name.clone(), fragment)),
                Definition::Operation(_) => None,
            })
            .collect();

        let operation = doc
            .definitions
            .iter()
            .find_map(|def| match def {
                Definition::Operation(op) => Some(op),
                Definition::Fragment(_) => None,
            })
            .ok_or(ExecutionError::NoOperation)?;

        let (root_type, variable_definitions, selection_set) = match operation {
            OperationDefinition::Query(query) => (
                self.root_type("query", &self.schema.query_type)?,
                query.variable_definitions.as_slice(),
                &query.selection_set,
            ),
            OperationDefinition::Mutation(mutation) => (
                self.root_type("mutation", &self.schema.mutation_type)?,
                mutation.variable_definitions.as_slice(),
                &mutation.selection_set,
            ),
            OperationDefinition::SelectionSet(selection_set) => (
                self.root_type("query", &self.schema.query_type)?,
                &[][..],
                selection_set,
            ),
            OperationDefinition::Subscription(_) => {
                return Err(ExecutionError::UnsupportedOperation {
                    operation: "subscription".to_string(),
                }
                .into());
            }
        };

        let variables = utils::effective_variables(variable_definitions, variables);
        let request = ResolverContext::new();
        tracing::debug!(request_id = %request.request_id, %root_type, "Executing operation");

        let ctx = ExecutionContext {
            schema: &self.schema,
            resolvers: &self.resolvers,
            variables: &variables,
            fragments: &fragments,
            request: &request,
        };
        // Root fields run one after another, in selection order
        field_resolver::resolve_object(&ctx, json!({}), root_type, &selection_set.items).await
    }

    fn root_type<'s>(&self, operation: &str, type_name: &'s str) -> Result<&'s str> {
        if self.schema.get_type(type_name).is_none() {
            return Err(SchemaError::MissingRootType {
                operation: operation.to_string(),
                type_name: type_name.to_string(),
            }
            .into());
        }
        Ok(type_name)
    }
}
