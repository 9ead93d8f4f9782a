//! Typed error handling for sheetql
//!
//! Errors are split by the phase in which they occur:
//!
//! - [`SchemaError`]: raised while loading or classifying a schema. These are
//!   configuration errors and surface before any resolver runs.
//! - [`ResolverError`]: raised by a generated resolver while marshaling its
//!   arguments (missing input, nesting too deep, ...).
//! - [`ExecutionError`]: raised by the bundled GraphQL executor.
//!
//! Store failures are *not* represented here. They are returned by the
//! [`RecordStore`](crate::core::store::RecordStore) as `anyhow::Error` and
//! flow through resolvers untouched, so callers can downcast them to whatever
//! the backend produced.
//!
//! # Example
//!
//! ```rust,ignore
//! match generate_resolvers(&schema, store) {
//!     Ok(map) => serve(map),
//!     Err(SchemaError::UnknownType { referenced, .. }) => {
//!         eprintln!("schema references undefined type {}", referenced);
//!     }
//!     Err(e) => eprintln!("invalid schema: {}", e),
//! }
//! ```

use serde::Serialize;
use thiserror::Error;

/// The umbrella error type for the crate
///
/// Wraps each error category and exposes a stable error code for protocol
/// level mapping.
#[derive(Debug, Error)]
pub enum SheetqlError {
    /// Schema loading or classification errors
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Resolver argument errors
    #[error(transparent)]
    Resolver(#[from] ResolverError),

    /// GraphQL execution errors
    #[error(transparent)]
    Execution(#[from] ExecutionError),

    /// Anything else, most notably store failures
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Error body as reported in a GraphQL `errors` array
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub message: String,
    /// Extensions carrying the programmatic error code
    pub extensions: ErrorExtensions,
}

/// The `extensions` object of an [`ErrorResponse`]
#[derive(Debug, Serialize)]
pub struct ErrorExtensions {
    pub code: String,
}

impl SheetqlError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            SheetqlError::Schema(e) => e.error_code(),
            SheetqlError::Resolver(e) => e.error_code(),
            SheetqlError::Execution(e) => e.error_code(),
            SheetqlError::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to a GraphQL error entry
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            message: self.to_string(),
            extensions: ErrorExtensions {
                code: self.error_code().to_string(),
            },
        }
    }

    /// Recover the typed error from an `anyhow::Error` produced by a resolver
    ///
    /// Resolver and executor errors are raised as `anyhow::Error` so that store
    /// errors can travel alongside them unchanged. This puts the typed variant
    /// back when there is one.
    pub fn from_anyhow(err: anyhow::Error) -> Self {
        let err = match err.downcast::<SchemaError>() {
            Ok(e) => return SheetqlError::Schema(e),
            Err(err) => err,
        };
        let err = match err.downcast::<ResolverError>() {
            Ok(e) => return SheetqlError::Resolver(e),
            Err(err) => err,
        };
        match err.downcast::<ExecutionError>() {
            Ok(e) => SheetqlError::Execution(e),
            Err(err) => SheetqlError::Other(err),
        }
    }
}

// =============================================================================
// Schema Errors
// =============================================================================

/// Errors raised while building resolvers from a schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The SDL source could not be parsed
    #[error("Failed to parse schema: {message}")]
    Parse { message: String },

    /// A field or argument references a type that is not defined
    #[error("Field '{type_name}.{field}' references unknown type '{referenced}'")]
    UnknownType {
        type_name: String,
        field: String,
        referenced: String,
    },

    /// An explicit `schema { ... }` block names a root type that is not defined
    #[error("Root {operation} type '{type_name}' is not defined")]
    MissingRootType { operation: String, type_name: String },
}

impl SchemaError {
    pub fn error_code(&self) -> &'static str {
        match self {
            SchemaError::Parse { .. } => "SCHEMA_PARSE_ERROR",
            SchemaError::UnknownType { .. } => "SCHEMA_UNKNOWN_TYPE",
            SchemaError::MissingRootType { .. } => "SCHEMA_MISSING_ROOT_TYPE",
        }
    }
}

// =============================================================================
// Resolver Errors
// =============================================================================

/// Errors raised by generated resolvers before the store is reached
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolverError {
    /// A required argument was not supplied
    #[error("Missing required argument '{argument}' for field '{field}'")]
    MissingArgument { field: String, argument: String },

    /// An argument was supplied with the wrong shape
    #[error("Invalid argument '{argument}' for field '{field}': expected {expected}")]
    InvalidArgument {
        field: String,
        argument: String,
        expected: String,
    },

    /// A nested create payload exceeded the configured depth
    #[error("Nested {type_name} payload exceeds the maximum nesting depth of {max_depth}")]
    NestingTooDeep { type_name: String, max_depth: usize },

    /// No resolver is registered for the requested field
    #[error("No resolver for field '{type_name}.{field}'")]
    NoResolver { type_name: String, field: String },
}

impl ResolverError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ResolverError::MissingArgument { .. } => "RESOLVER_MISSING_ARGUMENT",
            ResolverError::InvalidArgument { .. } => "RESOLVER_INVALID_ARGUMENT",
            ResolverError::NestingTooDeep { .. } => "RESOLVER_NESTING_TOO_DEEP",
            ResolverError::NoResolver { .. } => "RESOLVER_NOT_FOUND",
        }
    }
}

// =============================================================================
// Execution Errors
// =============================================================================

/// Errors raised by the bundled GraphQL executor
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// The operation text could not be parsed
    #[error("Failed to parse query: {message}")]
    Parse { message: String },

    /// The document contains no executable operation
    #[error("No operation found in query")]
    NoOperation,

    /// The operation kind is not supported (subscriptions)
    #[error("{operation} operations are not supported")]
    UnsupportedOperation { operation: String },

    /// A selected field does not exist on its parent type
    #[error("Unknown field '{field}' on type '{type_name}'")]
    UnknownField { type_name: String, field: String },

    /// A fragment spread names a fragment the document does not define
    #[error("Unknown fragment '{name}'")]
    UnknownFragment { name: String },
}

impl ExecutionError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ExecutionError::Parse { .. } => "GRAPHQL_PARSE_ERROR",
            ExecutionError::NoOperation => "GRAPHQL_NO_OPERATION",
            ExecutionError::UnsupportedOperation { .. } => "GRAPHQL_UNSUPPORTED_OPERATION",
            ExecutionError::UnknownField { .. } => "GRAPHQL_UNKNOWN_FIELD",
            ExecutionError::UnknownFragment { .. } => "GRAPHQL_UNKNOWN_FRAGMENT",
        }
    }
}
