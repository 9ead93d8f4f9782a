//! # sheetql
//!
//! Schema-driven resolver generation for spreadsheet-shaped record stores.
//!
//! Given a GraphQL schema, sheetql produces a complete resolver map:
//!
//! - **Root queries**: single-valued fields fetch one record by `id`,
//!   list-valued fields fetch every record of the type
//! - **Relationships**: object-typed fields dereference stored ids, list
//!   fields split comma-joined id lists
//! - **Mutations**: `create<Type>`, `update<Type>` and `delete<Type>` fields,
//!   with nested creates persisted depth-first
//! - **Relationship formulas**: relationships are never stored as ids but as
//!   formulas over a relationship ledger, evaluated on read
//!
//! Persistence is abstracted behind [`RecordStore`](core::store::RecordStore).
//! An in-memory store with a working ledger ships behind the `in-memory`
//! feature (on by default).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sheetql::prelude::*;
//! use std::sync::Arc;
//!
//! let schema = Schema::from_sdl(r#"
//!     type Person { id: String! name: String siblings: [Person] }
//!     type Query { person(id: String!): Person }
//!     type Mutation { createPerson(person: PersonInput): Person }
//!     input PersonInput { id: String name: String }
//! "#)?;
//!
//! let store = Arc::new(InMemoryRecordStore::new());
//! let executor = GraphQLExecutor::from_store(schema, store, GeneratorConfig::default())?;
//!
//! let response = executor
//!     .execute_to_response(r#"mutation { createPerson(person: {name: "Taras"}) { id } }"#, None)
//!     .await;
//! ```

pub mod config;
pub mod core;
pub mod executor;
pub mod resolvers;
pub mod schema;
pub mod storage;
pub mod telemetry;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        error::{ExecutionError, ResolverError, SchemaError, SheetqlError},
        store::{Record, RecordStore},
    };

    // === Configuration ===
    pub use crate::config::GeneratorConfig;

    // === Schema ===
    pub use crate::schema::{
        Cardinality, Classification, FieldClassification, Schema, TypeRef, classify,
    };

    // === Resolvers ===
    pub use crate::resolvers::{
        Args, FieldResolver, ResolverContext, ResolverGenerator, ResolverMap,
        formula::{FormulaSynthesizer, RelationshipKey, relationship_formula},
        generate_resolvers,
    };

    // === Storage ===
    #[cfg(feature = "in-memory")]
    pub use crate::storage::InMemoryRecordStore;
    pub use crate::storage::RelationshipLedger;

    // === Execution ===
    pub use crate::executor::GraphQLExecutor;

    // === Telemetry ===
    pub use crate::telemetry::init_tracing;

    // === External re-exports ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use serde_json::{Value, json};
    pub use std::sync::Arc;
}
