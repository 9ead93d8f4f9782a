//! Type classification pass
//!
//! Walks the schema's type map once and produces plain data describing which
//! fields need resolvers. No behavior lives here: the resolver builders turn
//! each entry into a resolver afterwards.

use indexmap::IndexMap;

use super::types::{Schema, TypeDefinition, TypeRef};
use crate::core::error::SchemaError;

/// How many records a relationship field points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    One,
    Many,
}

/// Derived view of one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldClassification {
    pub name: String,
    /// Innermost named type of the field
    pub target_type: String,
    pub cardinality: Cardinality,
    /// False when the field type is wrapped in non-null
    pub nullable: bool,
}

impl FieldClassification {
    fn from_field(name: &str, field_type: &TypeRef) -> Self {
        Self {
            name: name.to_string(),
            target_type: field_type.innermost_name().to_string(),
            cardinality: if field_type.is_list() {
                Cardinality::Many
            } else {
                Cardinality::One
            },
            nullable: !field_type.is_non_null(),
        }
    }
}

/// A user-defined object type and its relationship fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeClassification {
    pub name: String,
    /// Relationship fields only, in declaration order
    pub relationships: Vec<FieldClassification>,
}

/// A field of a root type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootField {
    pub field: FieldClassification,
    /// Names of the arguments declared on the field
    pub arguments: Vec<String>,
}

/// One of the root operation types
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootType {
    pub name: String,
    pub fields: Vec<RootField>,
}

/// Output of [`classify`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub query_type: Option<RootType>,
    pub mutation_type: Option<RootType>,
    /// Every user-defined object type, keyed by name, in schema order
    pub object_types: IndexMap<String, TypeClassification>,
}

impl Classification {
    /// Relationship fields of a user-defined object type
    ///
    /// Returns `None` when `type_name` is not a user-defined object type.
    pub fn relationships_of(&self, type_name: &str) -> Option<&[FieldClassification]> {
        self.object_types
            .get(type_name)
            .map(|t| t.relationships.as_slice())
    }
}

/// Classify every type of `schema`
///
/// Fails fast when any field or argument refers to a type the schema does
/// not define.
pub fn classify(schema: &Schema) -> Result<Classification, SchemaError> {
    check_references(schema)?;

    let object_types = schema
        .types
        .values()
        .filter(|def| schema.is_user_object(&def.name))
        .map(|def| classify_object(schema, def))
        .map(|t| (t.name.clone(), t))
        .collect();

    Ok(Classification {
        query_type: schema.query().map(classify_root),
        mutation_type: schema.mutation().map(classify_root),
        object_types,
    })
}

/// Classify a single field of a user-defined object type
///
/// Returns `None` for scalar-valued fields, which are served straight from
/// the stored record. Lists count as relationships only when their element
/// type is a user-defined object type.
pub fn classify_field(schema: &Schema, name: &str, field_type: &TypeRef) -> Option<FieldClassification> {
    let classification = FieldClassification::from_field(name, field_type);
    schema
        .is_user_object(&classification.target_type)
        .then_some(classification)
}

fn classify_object(schema: &Schema, def: &TypeDefinition) -> TypeClassification {
    let relationships = def
        .fields
        .iter()
        .filter_map(|field| classify_field(schema, &field.name, &field.field_type))
        .collect::<Vec<_>>();

    tracing::debug!(
        type_name = %def.name,
        relationships = relationships.len(),
        "Classified object type"
    );

    TypeClassification {
        name: def.name.clone(),
        relationships,
    }
}

fn classify_root(def: &TypeDefinition) -> RootType {
    RootType {
        name: def.name.clone(),
        fields: def
            .fields
            .iter()
            .map(|field| RootField {
                field: FieldClassification::from_field(&field.name, &field.field_type),
                arguments: field.arguments.iter().map(|a| a.name.clone()).collect(),
            })
            .collect(),
    }
}

fn check_references(schema: &Schema) -> Result<(), SchemaError> {
    for def in schema.types.values() {
        for field in &def.fields {
            let referenced = std::iter::once(&field.field_type)
                .chain(field.arguments.iter().map(|a| &a.value_type))
                .map(TypeRef::innermost_name);

            for name in referenced {
                if schema.get_type(name).is_none() {
                    return Err(SchemaError::UnknownType {
                        type_name: def.name.clone(),
                        field: field.name.clone(),
                        referenced: name.to_string(),
                    });
                }
            }
        }
    }
    Ok(())
}
