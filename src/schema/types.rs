//! Schema type map: the immutable input to resolver generation

use indexmap::IndexMap;

/// Scalars every GraphQL schema carries implicitly
pub const BUILTIN_SCALARS: [&str; 5] = ["String", "Int", "Float", "Boolean", "ID"];

/// Default name of the root query type
pub const DEFAULT_QUERY_TYPE: &str = "Query";

/// Default name of the root mutation type
pub const DEFAULT_MUTATION_TYPE: &str = "Mutation";

/// Kind of a named type definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
}

/// Reference to a type from a field or argument
///
/// List and non-null are wrappers around another reference; only `Named`
/// points into the type map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    /// Shorthand for a named reference
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    /// Wrap this reference in a list
    pub fn list(self) -> Self {
        TypeRef::List(Box::new(self))
    }

    /// Wrap this reference in a non-null marker
    pub fn non_null(self) -> Self {
        TypeRef::NonNull(Box::new(self))
    }

    /// Whether the outermost wrapper is non-null
    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }

    /// Strip any non-null wrappers from the outside of this reference
    pub fn unwrap_non_null(&self) -> &TypeRef {
        match self {
            TypeRef::NonNull(inner) => inner.unwrap_non_null(),
            other => other,
        }
    }

    /// Whether the reference is a list once non-null wrappers are removed
    pub fn is_list(&self) -> bool {
        matches!(self.unwrap_non_null(), TypeRef::List(_))
    }

    /// Name of the innermost named type
    pub fn innermost_name(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.innermost_name(),
        }
    }
}

/// An argument declared on a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentDefinition {
    pub name: String,
    pub value_type: TypeRef,
}

/// A field of an object, interface or input object type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    pub name: String,
    pub field_type: TypeRef,
    pub arguments: Vec<ArgumentDefinition>,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, field_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            field_type,
            arguments: Vec::new(),
        }
    }

    /// Add an argument (builder style)
    pub fn with_argument(mut self, name: impl Into<String>, value_type: TypeRef) -> Self {
        self.arguments.push(ArgumentDefinition {
            name: name.into(),
            value_type,
        });
        self
    }
}

/// A named type definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDefinition {
    pub name: String,
    pub kind: TypeKind,
    /// Ordered fields; empty for scalars, enums and unions
    pub fields: Vec<FieldDefinition>,
}

impl TypeDefinition {
    pub fn scalar(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Scalar,
            fields: Vec::new(),
        }
    }

    pub fn object(name: impl Into<String>, fields: Vec<FieldDefinition>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Object,
            fields,
        }
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A complete schema: the type map plus the names of its root types
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub types: IndexMap<String, TypeDefinition>,
    pub query_type: String,
    pub mutation_type: String,
}

impl Default for Schema {
    fn default() -> Self {
        Self::new()
    }
}

impl Schema {
    /// Create a schema containing only the built-in scalars
    pub fn new() -> Self {
        let types = BUILTIN_SCALARS
            .iter()
            .map(|name| (name.to_string(), TypeDefinition::scalar(*name)))
            .collect();

        Self {
            types,
            query_type: DEFAULT_QUERY_TYPE.to_string(),
            mutation_type: DEFAULT_MUTATION_TYPE.to_string(),
        }
    }

    /// Add or replace a type definition (builder style)
    pub fn with_type(mut self, definition: TypeDefinition) -> Self {
        self.insert_type(definition);
        self
    }

    /// Add or replace a type definition
    pub fn insert_type(&mut self, definition: TypeDefinition) {
        self.types.insert(definition.name.clone(), definition);
    }

    /// Look up a type by name
    pub fn get_type(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.get(name)
    }

    /// Look up a field of a type
    pub fn field(&self, type_name: &str, field_name: &str) -> Option<&FieldDefinition> {
        self.get_type(type_name)?.field(field_name)
    }

    /// The root query type, if the schema defines one
    pub fn query(&self) -> Option<&TypeDefinition> {
        self.get_type(&self.query_type)
    }

    /// The root mutation type, if the schema defines one
    pub fn mutation(&self) -> Option<&TypeDefinition> {
        self.get_type(&self.mutation_type)
    }

    /// Whether `name` is a built-in scalar or an introspection type
    pub fn is_builtin(name: &str) -> bool {
        name.starts_with("__") || BUILTIN_SCALARS.contains(&name)
    }

    /// Whether `name` is an object type defined by the schema author
    ///
    /// Root query and mutation types are not user-defined object types.
    pub fn is_user_object(&self, name: &str) -> bool {
        if Self::is_builtin(name) || name == self.query_type || name == self.mutation_type {
            return false;
        }
        self.get_type(name)
            .is_some_and(|def| def.kind == TypeKind::Object)
    }
}
