//! Selection set resolution

use anyhow::Result;
use futures::future::{BoxFuture, FutureExt};
use graphql_parser::query::{Field, FragmentDefinition, Selection, TypeCondition};
use serde_json::{Map, Value};
use std::collections::HashMap;

use super::utils::{self, Variables};
use crate::core::error::{ExecutionError, ResolverError};
use crate::resolvers::{ResolverContext, ResolverMap};
use crate::schema::Schema;

/// Everything a field needs while one operation executes
pub(super) struct ExecutionContext<'a, 'q> {
    pub schema: &'a Schema,
    pub resolvers: &'a ResolverMap,
    pub variables: &'a Variables,
    pub fragments: &'a HashMap<String, &'a FragmentDefinition<'q, String>>,
    pub request: &'a ResolverContext,
}

impl ExecutionContext<'_, '_> {
    /// Key of a type in the resolver map; roots are stored under fixed names
    fn resolver_key<'t>(&self, type_name: &'t str) -> &'t str {
        if type_name == self.schema.query_type {
            ResolverMap::QUERY
        } else if type_name == self.schema.mutation_type {
            ResolverMap::MUTATION
        } else {
            type_name
        }
    }

    fn is_root(&self, type_name: &str) -> bool {
        type_name == self.schema.query_type || type_name == self.schema.mutation_type
    }
}

/// Flatten fragments into the list of fields selected on `type_name`
fn collect_fields<'a, 'q>(
    ctx: &ExecutionContext<'a, 'q>,
    selections: &'a [Selection<'q, String>],
    type_name: &str,
    fields: &mut Vec<&'a Field<'q, String>>,
) -> Result<()> {
    for selection in selections {
        match selection {
            Selection::Field(field) => fields.push(field),
            Selection::InlineFragment(fragment) => {
                let applies = match &fragment.type_condition {
                    Some(TypeCondition::On(on)) => on == type_name,
                    None => true,
                };
                if applies {
                    collect_fields(ctx, &fragment.selection_set.items, type_name, fields)?;
                }
            }
            Selection::FragmentSpread(spread) => {
                let fragment: &'a FragmentDefinition<'q, String> = ctx
                    .fragments
                    .get(&spread.fragment_name)
                    .copied()
                    .ok_or_else(|| ExecutionError::UnknownFragment {
                        name: spread.fragment_name.clone(),
                    })?;
                let TypeCondition::On(on) = &fragment.type_condition;
                if on == type_name {
                    collect_fields(ctx, &fragment.selection_set.items, type_name, fields)?;
                }
            }
        }
    }
    Ok(())
}

/// Resolve the selection set of one object value
pub(super) fn resolve_object<'a, 'q>(
    ctx: &'a ExecutionContext<'a, 'q>,
    parent: Value,
    type_name: &'a str,
    selections: &'a [Selection<'q, String>],
) -> BoxFuture<'a, Result<Value>> {
    async move { resolve_object_impl(ctx, parent, type_name, selections).await }.boxed()
}

async fn resolve_object_impl<'a, 'q>(
    ctx: &'a ExecutionContext<'a, 'q>,
    parent: Value,
    type_name: &'a str,
    selections: &'a [Selection<'q, String>],
) -> Result<Value> {
    let mut fields = Vec::new();
    collect_fields(ctx, selections, type_name, &mut fields)?;

    let mut result = Map::new();
    for field in fields {
        let value = resolve_field(ctx, &parent, type_name, field).await?;
        result.insert(utils::response_key(field).to_string(), value);
    }

    Ok(Value::Object(result))
}

/// Resolve one field of `parent`
///
/// Fields with a generated resolver go through it; any other field of an
/// object type is read from the parent record. Root fields must have a
/// resolver.
async fn resolve_field<'a, 'q>(
    ctx: &'a ExecutionContext<'a, 'q>,
    parent: &Value,
    type_name: &'a str,
    field: &'a Field<'q, String>,
) -> Result<Value> {
    let field_name = field.name.as_str();
    if field_name == "__typename" {
        return Ok(Value::String(type_name.to_string()));
    }

    let Some(definition) = ctx.schema.field(type_name, field_name) else {
        return Err(ExecutionError::UnknownField {
            type_name: type_name.to_string(),
            field: field_name.to_string(),
        }
        .into());
    };

    let value = match ctx.resolvers.get(ctx.resolver_key(type_name), field_name) {
        Some(resolver) => {
            let args = utils::field_arguments(field, ctx.variables);
            tracing::trace!(
                request_id = %ctx.request.request_id,
                %type_name,
                field = %field_name,
                kind = resolver.kind(),
                "Resolving field"
            );
            resolver.resolve(parent, &args, ctx.request).await?
        }
        None if ctx.is_root(type_name) => {
            return Err(ResolverError::NoResolver {
                type_name: type_name.to_string(),
                field: field_name.to_string(),
            }
            .into());
        }
        None => parent.get(field_name).cloned().unwrap_or(Value::Null),
    };

    complete_value(
        ctx,
        value,
        definition.field_type.innermost_name(),
        &field.selection_set.items,
    )
    .await
}

/// Apply a sub-selection to a resolved value, element-wise for lists
pub(super) fn complete_value<'a, 'q>(
    ctx: &'a ExecutionContext<'a, 'q>,
    value: Value,
    type_name: &'a str,
    selections: &'a [Selection<'q, String>],
) -> BoxFuture<'a, Result<Value>> {
    async move {
        if selections.is_empty() {
            return Ok(value);
        }
        match value {
            Value::Array(items) => {
                let mut completed = Vec::with_capacity(items.len());
                for item in items {
                    completed.push(complete_value(ctx, item, type_name, selections).await?);
                }
                Ok(Value::Array(completed))
            }
            Value::Object(_) => resolve_object(ctx, value, type_name, selections).await,
            other => Ok(other),
        }
    }
    .boxed()
}
