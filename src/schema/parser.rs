//! SDL loading: builds a [`Schema`] from GraphQL type definitions

use graphql_parser::schema::{
    Definition, Field, InputValue, Type, TypeDefinition as GqlTypeDefinition, TypeExtension,
    parse_schema,
};

use super::types::{
    ArgumentDefinition, FieldDefinition, Schema, TypeDefinition, TypeKind, TypeRef,
};
use crate::core::error::SchemaError;

impl Schema {
    /// Parse GraphQL SDL into a schema
    ///
    /// Object and input object type extensions merge their fields into the
    /// extended type. A `schema { query: ..., mutation: ... }` block overrides
    /// the default `Query` / `Mutation` root names. Directives, descriptions
    /// and default values are not retained.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let schema = Schema::from_sdl(r#"
    ///     type Person { id: String! father: Person siblings: [Person] }
    ///     type Query { person(id: String!): Person }
    /// "#)?;
    /// ```
    pub fn from_sdl(sdl: &str) -> Result<Self, SchemaError> {
        let doc = parse_schema::<String>(sdl).map_err(|e| SchemaError::Parse {
            message: e.to_string(),
        })?;

        let mut schema = Schema::new();
        let mut extensions = Vec::new();
        let mut explicit_roots = Vec::new();

        for definition in doc.definitions {
            match definition {
                Definition::SchemaDefinition(def) => {
                    if let Some(query) = def.query {
                        explicit_roots.push(("query", query.clone()));
                        schema.query_type = query;
                    }
                    if let Some(mutation) = def.mutation {
                        explicit_roots.push(("mutation", mutation.clone()));
                        schema.mutation_type = mutation;
                    }
                }
                Definition::TypeDefinition(def) => schema.insert_type(convert_type(def)),
                Definition::TypeExtension(ext) => extensions.push(ext),
                Definition::DirectiveDefinition(_) => {}
            }
        }

        // Extensions may precede the definition they extend
        for ext in extensions {
            let (name, fields) = match ext {
                TypeExtension::Object(ext) => {
                    (ext.name, ext.fields.into_iter().map(convert_field).collect())
                }
                TypeExtension::Interface(ext) => {
                    (ext.name, ext.fields.into_iter().map(convert_field).collect())
                }
                TypeExtension::InputObject(ext) => (
                    ext.name,
                    ext.fields.into_iter().map(convert_input_field).collect(),
                ),
                _ => continue,
            };
            extend_type(&mut schema, name, fields);
        }

        for (operation, type_name) in explicit_roots {
            if schema.get_type(&type_name).is_none() {
                return Err(SchemaError::MissingRootType {
                    operation: operation.to_string(),
                    type_name,
                });
            }
        }

        Ok(schema)
    }
}

fn extend_type(schema: &mut Schema, name: String, fields: Vec<FieldDefinition>) {
    match schema.types.get_mut(&name) {
        Some(existing) => existing.fields.extend(fields),
        None => {
            tracing::warn!(type_name = %name, "Extension of undefined type, treating it as a definition");
            schema.insert_type(TypeDefinition::object(name, fields));
        }
    }
}

fn convert_type(def: GqlTypeDefinition<'_, String>) -> TypeDefinition {
    match def {
        GqlTypeDefinition::Scalar(t) => TypeDefinition::scalar(t.name),
        GqlTypeDefinition::Object(t) => TypeDefinition {
            name: t.name,
            kind: TypeKind::Object,
            fields: t.fields.into_iter().map(convert_field).collect(),
        },
        GqlTypeDefinition::Interface(t) => TypeDefinition {
            name: t.name,
            kind: TypeKind::Interface,
            fields: t.fields.into_iter().map(convert_field).collect(),
        },
        GqlTypeDefinition::Union(t) => TypeDefinition {
            name: t.name,
            kind: TypeKind::Union,
            fields: Vec::new(),
        },
        GqlTypeDefinition::Enum(t) => TypeDefinition {
            name: t.name,
            kind: TypeKind::Enum,
            fields: Vec::new(),
        },
        GqlTypeDefinition::InputObject(t) => TypeDefinition {
            name: t.name,
            kind: TypeKind::InputObject,
            fields: t.fields.into_iter().map(convert_input_field).collect(),
        },
    }
}

fn convert_field(field: Field<'_, String>) -> FieldDefinition {
    FieldDefinition {
        name: field.name,
        field_type: convert_type_ref(field.field_type),
        arguments: field
            .arguments
            .into_iter()
            .map(|arg| ArgumentDefinition {
                name: arg.name,
                value_type: convert_type_ref(arg.value_type),
            })
            .collect(),
    }
}

fn convert_input_field(value: InputValue<'_, String>) -> FieldDefinition {
    FieldDefinition::new(value.name, convert_type_ref(value.value_type))
}

fn convert_type_ref(t: Type<'_, String>) -> TypeRef {
    match t {
        Type::NamedType(name) => TypeRef::Named(name),
        Type::ListType(inner) => TypeRef::List(Box::new(convert_type_ref(*inner))),
        Type::NonNullType(inner) => TypeRef::NonNull(Box::new(convert_type_ref(*inner))),
    }
}
