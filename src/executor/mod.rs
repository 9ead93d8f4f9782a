//! GraphQL executor
//!
//! A small executor that runs GraphQL operations directly against a
//! [`ResolverMap`](crate::resolvers::ResolverMap):
//! - `core`: operation selection, variables and the response envelope
//! - `field_resolver`: selection set walking and value completion
//! - `utils`: argument and variable conversion

mod core;
mod field_resolver;
pub mod utils;

pub use core::GraphQLExecutor;
