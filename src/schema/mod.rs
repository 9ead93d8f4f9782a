//! Schema model, SDL loading and type classification

pub mod classifier;
mod parser;
pub mod types;

pub use classifier::{
    Cardinality, Classification, FieldClassification, RootField, RootType, TypeClassification,
    classify,
};
pub use types::{
    ArgumentDefinition, FieldDefinition, Schema, TypeDefinition, TypeKind, TypeRef,
};
