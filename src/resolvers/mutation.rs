//! Mutation resolvers
//!
//! Root mutation fields follow a naming convention: `create<Type>`,
//! `update<Type>` and `delete<Type>`. Any other field is left to the caller
//! and gets no resolver.
//!
//! # Create pipeline
//!
//! A create payload may carry nested objects for relationship fields. The
//! payload tree is walked with an explicit work stack, depth-first in field
//! declaration order. For each node:
//!
//! 1. an `id` is allocated with [`RecordStore::new_id`] unless supplied;
//! 2. every relationship field of the node's type is replaced with its
//!    relationship formula, whether or not the caller supplied a value;
//! 3. the node is persisted with [`RecordStore::create_record`];
//! 4. nested objects found in step 2 are queued as child nodes.
//!
//! Once the tree is persisted, each child's created record is folded back into
//! its parent's result under the same field name, so the caller gets the
//! created graph back. Only formulas ever reach the store.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;

use super::formula::{FormulaSynthesizer, RelationshipKey};
use super::{
    Args, FieldResolver, FieldResolvers, ResolverContext, id_argument, record_to_value,
    value_to_id,
};
use crate::config::GeneratorConfig;
use crate::core::error::ResolverError;
use crate::core::store::{Record, RecordStore};
use crate::schema::{Classification, FieldClassification, RootType};

/// Operation encoded in a mutation field name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

impl MutationKind {
    fn prefix(self) -> &'static str {
        match self {
            MutationKind::Create => "create",
            MutationKind::Update => "update",
            MutationKind::Delete => "delete",
        }
    }
}

/// Split a mutation field name into its operation and record type
///
/// `createPerson` gives `(Create, "Person")`. The type part must start with an
/// upper-case letter, so `created` or `update` alone do not match.
pub fn parse_mutation_name(field_name: &str) -> Option<(MutationKind, &str)> {
    [MutationKind::Create, MutationKind::Update, MutationKind::Delete]
        .into_iter()
        .find_map(|kind| {
            let type_name = field_name.strip_prefix(kind.prefix())?;
            type_name
                .starts_with(|c: char| c.is_ascii_uppercase())
                .then_some((kind, type_name))
        })
}

/// Name of the argument carrying a create/update input object
pub fn input_argument_name(type_name: &str) -> String {
    type_name.to_lowercase()
}

/// Relationship fields of every object type, shared by all create resolvers
type RelationshipCatalog = IndexMap<String, Vec<FieldClassification>>;

fn input_object<'a>(
    field_name: &str,
    type_name: &str,
    args: &'a Args,
) -> Result<&'a Record, ResolverError> {
    let argument = input_argument_name(type_name);
    let value = args
        .get(&argument)
        .or_else(|| args.get(&lower_first(type_name)));

    match value {
        Some(Value::Object(input)) => Ok(input),
        None | Some(Value::Null) => Err(ResolverError::MissingArgument {
            field: field_name.to_string(),
            argument,
        }),
        Some(_) => Err(ResolverError::InvalidArgument {
            field: field_name.to_string(),
            argument,
            expected: "an input object".to_string(),
        }),
    }
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Where a created child lands in its parent's result
struct ParentSlot {
    node: usize,
    field: String,
    /// Position within a to-many list, `None` for to-one
    index: Option<usize>,
}

/// A payload node waiting to be persisted
struct PendingCreate {
    type_name: String,
    input: Record,
    depth: usize,
    slot: Option<ParentSlot>,
}

/// Nested results collected for one relationship field
enum NestedResult {
    One(Value),
    Many(Vec<Value>),
}

impl NestedResult {
    fn into_value(self) -> Value {
        match self {
            NestedResult::One(value) => value,
            NestedResult::Many(values) => Value::Array(values),
        }
    }
}

/// A persisted payload node
struct CreatedNode {
    record: Record,
    nested: IndexMap<String, NestedResult>,
    slot: Option<ParentSlot>,
}

/// `create<Type>` resolver
pub struct CreateResolver {
    field_name: String,
    type_name: String,
    catalog: Arc<RelationshipCatalog>,
    formulas: FormulaSynthesizer,
    max_depth: usize,
    store: Arc<dyn RecordStore>,
}

impl CreateResolver {
    /// Allocate the node's id, substitute formulas and collect child payloads
    fn prepare(
        &self,
        pending: PendingCreate,
        node: usize,
    ) -> (Record, IndexMap<String, NestedResult>, Vec<PendingCreate>) {
        let PendingCreate {
            type_name,
            input: mut props,
            depth,
            ..
        } = pending;

        let id = match props.get("id").and_then(value_to_id) {
            Some(id) => id,
            None => {
                let id = self.store.new_id();
                props.insert("id".to_string(), Value::String(id.clone()));
                id
            }
        };

        let mut nested = IndexMap::new();
        let mut children = Vec::new();
        let relationships = self
            .catalog
            .get(&type_name)
            .map(Vec::as_slice)
            .unwrap_or_default();

        for rel in relationships {
            let key = RelationshipKey::new(&type_name, &id, &rel.target_type, &rel.name);
            let supplied = props.insert(rel.name.clone(), Value::String(self.formulas.formula(&key)));

            let child = |input: Record, index: Option<usize>| PendingCreate {
                type_name: rel.target_type.clone(),
                input,
                depth: depth + 1,
                slot: Some(ParentSlot {
                    node,
                    field: rel.name.clone(),
                    index,
                }),
            };

            match supplied {
                Some(Value::Object(input)) => {
                    children.push(child(input, None));
                    nested.insert(rel.name.clone(), NestedResult::One(Value::Null));
                }
                Some(Value::Array(items)) if items.iter().any(Value::is_object) => {
                    let mut slots = Vec::with_capacity(items.len());
                    for (index, item) in items.into_iter().enumerate() {
                        match item {
                            Value::Object(input) => {
                                children.push(child(input, Some(index)));
                                slots.push(Value::Null);
                            }
                            other => slots.push(other),
                        }
                    }
                    nested.insert(rel.name.clone(), NestedResult::Many(slots));
                }
                // Bare ids and nulls are superseded by the formula
                _ => {}
            }
        }

        (props, nested, children)
    }

    async fn create_tree(&self, input: Record, ctx: &ResolverContext) -> Result<Value> {
        let mut stack = vec![PendingCreate {
            type_name: self.type_name.clone(),
            input,
            depth: 0,
            slot: None,
        }];
        let mut created: Vec<CreatedNode> = Vec::new();

        while let Some(mut pending) = stack.pop() {
            if pending.depth > self.max_depth {
                return Err(ResolverError::NestingTooDeep {
                    type_name: pending.type_name,
                    max_depth: self.max_depth,
                }
                .into());
            }

            let type_name = pending.type_name.clone();
            let slot = pending.slot.take();
            let node = created.len();
            let (props, nested, children) = self.prepare(pending, node);

            tracing::trace!(request_id = %ctx.request_id, %type_name, "createRecord");
            let record = self.store.create_record(&type_name, props).await?;
            created.push(CreatedNode {
                record,
                nested,
                slot,
            });

            // Reversed so children pop in declaration order
            stack.extend(children.into_iter().rev());
        }

        // Children always sit after their parent, so folding from the back
        // completes every child before its parent is folded
        while let Some(node) = created.pop() {
            let mut record = node.record;
            for (field, result) in node.nested {
                record.insert(field, result.into_value());
            }
            let value = Value::Object(record);

            let Some(slot) = node.slot else {
                return Ok(value);
            };
            let parent = &mut created[slot.node];
            match (parent.nested.get_mut(&slot.field), slot.index) {
                (Some(NestedResult::One(target)), None) => *target = value,
                (Some(NestedResult::Many(targets)), Some(index)) => targets[index] = value,
                _ => return Err(anyhow!("Nested result slot {} is missing", slot.field)),
            }
        }

        Err(anyhow!("Create pipeline for {} produced no record", self.type_name))
    }
}

#[async_trait]
impl FieldResolver for CreateResolver {
    fn kind(&self) -> &'static str {
        "create"
    }

    async fn resolve(&self, _parent: &Value, args: &Args, ctx: &ResolverContext) -> Result<Value> {
        let input = input_object(&self.field_name, &self.type_name, args)?.clone();
        tracing::debug!(request_id = %ctx.request_id, mutation = %self.field_name, "Creating record");
        self.create_tree(input, ctx).await
    }
}

/// `update<Type>` resolver: forwards the input object verbatim
pub struct UpdateResolver {
    field_name: String,
    type_name: String,
    store: Arc<dyn RecordStore>,
}

#[async_trait]
impl FieldResolver for UpdateResolver {
    fn kind(&self) -> &'static str {
        "update"
    }

    async fn resolve(&self, _parent: &Value, args: &Args, ctx: &ResolverContext) -> Result<Value> {
        let props = input_object(&self.field_name, &self.type_name, args)?.clone();
        tracing::debug!(request_id = %ctx.request_id, mutation = %self.field_name, "Updating record");

        let record = self.store.update_record(&self.type_name, props).await?;
        Ok(record_to_value(record))
    }
}

/// `delete<Type>` resolver: reads the top-level `id` argument
pub struct DeleteResolver {
    field_name: String,
    type_name: String,
    store: Arc<dyn RecordStore>,
}

#[async_trait]
impl FieldResolver for DeleteResolver {
    fn kind(&self) -> &'static str {
        "delete"
    }

    async fn resolve(&self, _parent: &Value, args: &Args, ctx: &ResolverContext) -> Result<Value> {
        let id = id_argument(&self.field_name, args)?;
        tracing::debug!(request_id = %ctx.request_id, mutation = %self.field_name, %id, "Deleting record");

        self.store.delete_record(&self.type_name, &id).await?;
        Ok(Value::Null)
    }
}

/// Build resolvers for the conventionally named fields of the mutation type
///
/// Fields outside the convention, and conventional names whose type part is
/// not a user-defined object type (`createSession` returning a scalar), get
/// no resolver.
pub fn build_mutation_resolvers(
    mutation_type: &RootType,
    classification: &Classification,
    store: &Arc<dyn RecordStore>,
    config: &GeneratorConfig,
) -> FieldResolvers {
    let catalog: Arc<RelationshipCatalog> = Arc::new(
        classification
            .object_types
            .values()
            .map(|t| (t.name.clone(), t.relationships.clone()))
            .collect(),
    );
    let formulas = FormulaSynthesizer::new(config.ledger_sheet.clone());

    let mut resolvers = FieldResolvers::new();
    for root in &mutation_type.fields {
        let field_name = &root.field.name;
        let Some((kind, type_name)) = parse_mutation_name(field_name) else {
            tracing::warn!(field = %field_name, "Mutation does not follow the create/update/delete convention, skipping");
            continue;
        };
        if !catalog.contains_key(type_name) {
            tracing::warn!(field = %field_name, %type_name, "Mutation targets no object type, skipping");
            continue;
        }

        let resolver: Arc<dyn FieldResolver> = match kind {
            MutationKind::Create => Arc::new(CreateResolver {
                field_name: field_name.clone(),
                type_name: type_name.to_string(),
                catalog: catalog.clone(),
                formulas: formulas.clone(),
                max_depth: config.max_nesting_depth,
                store: store.clone(),
            }),
            MutationKind::Update => Arc::new(UpdateResolver {
                field_name: field_name.clone(),
                type_name: type_name.to_string(),
                store: store.clone(),
            }),
            MutationKind::Delete => Arc::new(DeleteResolver {
                field_name: field_name.clone(),
                type_name: type_name.to_string(),
                store: store.clone(),
            }),
        };

        tracing::debug!(field = %field_name, %type_name, kind = resolver.kind(), "Built mutation resolver");
        resolvers.insert(field_name.clone(), resolver);
    }

    resolvers
}
