//! Utility functions for GraphQL execution

use graphql_parser::query::{Field, Value as GqlValue, VariableDefinition};
use serde_json::{Map, Value, json};
use std::collections::HashMap;

use crate::resolvers::Args;

/// Variables of one operation, keyed by name without the `$`
pub type Variables = HashMap<String, Value>;

/// Convert a GraphQL value to JSON, substituting variables
///
/// Unknown variables become `null`.
pub fn gql_value_to_json(value: &GqlValue<'_, String>, variables: &Variables) -> Value {
    match value {
        GqlValue::Null => Value::Null,
        GqlValue::Int(i) => json!(i.as_i64().unwrap_or(0)),
        GqlValue::Float(f) => json!(f),
        GqlValue::String(s) => json!(s),
        GqlValue::Boolean(b) => json!(b),
        GqlValue::Enum(e) => json!(e),
        GqlValue::List(list) => Value::Array(
            list.iter()
                .map(|item| gql_value_to_json(item, variables))
                .collect(),
        ),
        GqlValue::Object(obj) => Value::Object(
            obj.iter()
                .map(|(k, v)| (k.clone(), gql_value_to_json(v, variables)))
                .collect(),
        ),
        GqlValue::Variable(name) => variables.get(name).cloned().unwrap_or(Value::Null),
    }
}

/// Collect a field's arguments as resolver input
pub fn field_arguments(field: &Field<'_, String>, variables: &Variables) -> Args {
    field
        .arguments
        .iter()
        .map(|(name, value)| (name.clone(), gql_value_to_json(value, variables)))
        .collect::<Map<String, Value>>()
}

/// Merge supplied variables over the operation's declared defaults
pub fn effective_variables(
    definitions: &[VariableDefinition<'_, String>],
    supplied: Variables,
) -> Variables {
    let empty = Variables::new();
    let mut variables: Variables = definitions
        .iter()
        .filter_map(|def| {
            def.default_value
                .as_ref()
                .map(|value| (def.name.clone(), gql_value_to_json(value, &empty)))
        })
        .collect();
    variables.extend(supplied);
    variables
}

/// Key under which a field appears in the response
pub fn response_key<'f>(field: &'f Field<'_, String>) -> &'f str {
    field.alias.as_deref().unwrap_or(&field.name)
}
