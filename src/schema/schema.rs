use crate::context::{BuildContext, DefaultIn};
use crate::introspection::{IntrospectionProc, IntrospectionType};
use bumpalo::collections::Vec;
use bumpalo::Bump;
use hashbrown::hash_map::DefaultHashBuilder;
use hashbrown::{HashMap, HashSet};

/// Schema Definition
///
/// A schema is a registry of named types with optional root types for queries and mutations.
/// In this library the schema is never executable. It's the metadata a database-generated API is
/// served from, and what argument values are walked against when they're rewritten.
/// [Reference](https://spec.graphql.org/October2021/#sec-Schema)
#[derive(Debug, Clone, PartialEq)]
pub struct Schema<'a> {
    pub(crate) query_type: Option<&'a SchemaObject<'a>>,
    pub(crate) mutation_type: Option<&'a SchemaObject<'a>>,
    pub(crate) types: HashMap<&'a str, &'a SchemaType<'a>, DefaultHashBuilder, &'a Bump>,
}

impl<'a> DefaultIn<'a> for Schema<'a> {
    fn default_in(arena: &'a Bump) -> Self {
        Schema {
            query_type: None,
            mutation_type: None,
            types: HashMap::new_in(arena),
        }
    }
}

impl<'a> Schema<'a> {
    /// Returns the root object type for query operations
    #[inline]
    pub fn query_type(&self) -> Option<&'a SchemaObject<'a>> {
        self.query_type
    }

    /// Returns the root object type for mutation operations
    #[inline]
    pub fn mutation_type(&self) -> Option<&'a SchemaObject<'a>> {
        self.mutation_type
    }

    /// Retrieves a type by name from known schema types.
    #[inline]
    pub fn get_type(&self, name: &str) -> Option<&'a SchemaType<'a>> {
        self.types.get(name).copied()
    }

    /// Retrieves an input object type by name.
    #[inline]
    pub fn get_input_object(&self, name: &str) -> Option<&'a SchemaInputObject<'a>> {
        self.get_type(name).and_then(|schema_type| schema_type.input_object())
    }

    /// Iterates over all types in the schema in no particular order.
    pub fn types(&self) -> impl Iterator<Item = SchemaType<'a>> + '_ {
        self.types.values().map(|schema_type| **schema_type)
    }
}

/// The procedure a field was generated from, if any.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FieldScope<'a> {
    #[default]
    None,
    /// The field calls a stored procedure.
    Procedure(&'a IntrospectionProc),
}

/// What an input object type was generated for.
///
/// Annotations are only ever looked up for input objects that were generated for a mutation's
/// input or for a composite type.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputObjectScope<'a> {
    #[default]
    None,
    /// The input object is the `input` argument's type of a procedure mutation.
    MutationInput,
    /// The input object represents a composite type.
    CompositeType(&'a IntrospectionType),
}

/// An Object type definition.
///
/// Object types define a set of fields and the interfaces they implement.
/// [Reference](https://spec.graphql.org/October2021/#sec-Objects)
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaObject<'a> {
    pub name: &'a str,
    pub(crate) fields: HashMap<&'a str, &'a SchemaField<'a>, DefaultHashBuilder, &'a Bump>,
    pub(crate) interfaces: Vec<'a, &'a str>,
}

impl<'a> SchemaObject<'a> {
    #[inline]
    pub fn new(ctx: &'a BuildContext, name: &'a str) -> Self {
        SchemaObject {
            name,
            fields: HashMap::new_in(&ctx.arena),
            interfaces: Vec::new_in(&ctx.arena),
        }
    }

    /// Add a new [SchemaField] to the list of fields
    pub fn add_field(&mut self, ctx: &'a BuildContext, field: SchemaField<'a>) {
        self.fields.insert(field.name, ctx.alloc(field));
    }

    /// Get a known field by name
    #[inline]
    pub fn get_field(&self, name: &str) -> Option<&'a SchemaField<'a>> {
        self.fields.get(name).copied()
    }

    /// Iterates over all fields in no particular order.
    pub fn fields(&self) -> impl Iterator<Item = &'a SchemaField<'a>> + '_ {
        self.fields.values().copied()
    }

    /// Add an interface to the list of implemented interfaces
    pub fn add_interface(&mut self, interface: &'a str) {
        self.interfaces.push(interface);
    }

    #[inline]
    pub fn interfaces(&self) -> &[&'a str] {
        &self.interfaces
    }
}

/// An Interface type definition.
///
/// Interfaces only appear as output types, but they're still traversed when looking for
/// annotated input objects beneath them.
/// [Reference](https://spec.graphql.org/October2021/#sec-Interfaces)
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaInterface<'a> {
    pub name: &'a str,
    pub(crate) fields: HashMap<&'a str, &'a SchemaField<'a>, DefaultHashBuilder, &'a Bump>,
    pub(crate) interfaces: Vec<'a, &'a str>,
}

impl<'a> SchemaInterface<'a> {
    #[inline]
    pub fn new(ctx: &'a BuildContext, name: &'a str) -> Self {
        SchemaInterface {
            name,
            fields: HashMap::new_in(&ctx.arena),
            interfaces: Vec::new_in(&ctx.arena),
        }
    }

    /// Add a new [SchemaField] to the list of fields
    pub fn add_field(&mut self, ctx: &'a BuildContext, field: SchemaField<'a>) {
        self.fields.insert(field.name, ctx.alloc(field));
    }

    /// Get a known field by name
    #[inline]
    pub fn get_field(&self, name: &str) -> Option<&'a SchemaField<'a>> {
        self.fields.get(name).copied()
    }

    pub fn add_interface(&mut self, interface: &'a str) {
        self.interfaces.push(interface);
    }
}

/// An object Field type definition.
///
/// A field is like a function that given its arguments as input values produces an output value.
/// Fields generated from procedures carry that procedure in their scope.
/// [Reference](https://spec.graphql.org/October2021/#FieldsDefinition)
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaField<'a> {
    pub name: &'a str,
    pub arguments: HashMap<&'a str, SchemaInputField<'a>, DefaultHashBuilder, &'a Bump>,
    pub output_type: &'a TypeRef<'a>,
    pub scope: FieldScope<'a>,
}

impl<'a> SchemaField<'a> {
    #[inline]
    pub fn new(ctx: &'a BuildContext, name: &'a str, output_type: &'a TypeRef<'a>) -> Self {
        SchemaField {
            name,
            arguments: HashMap::new_in(&ctx.arena),
            output_type,
            scope: FieldScope::None,
        }
    }

    pub fn add_argument(&mut self, arg: SchemaInputField<'a>) {
        self.arguments.insert(arg.name, arg);
    }

    #[inline]
    pub fn get_argument(&self, name: &str) -> Option<&SchemaInputField<'a>> {
        self.arguments.get(name)
    }
}

/// A Scalar type definition.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Scalars)
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaScalar<'a> {
    pub name: &'a str,
}

impl<'a> SchemaScalar<'a> {
    #[inline]
    pub fn new(name: &'a str) -> Self {
        SchemaScalar { name }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct SchemaEnum<'a> {
    pub name: &'a str,
    pub values: HashSet<&'a str, DefaultHashBuilder, &'a Bump>,
}

impl<'a> SchemaEnum<'a> {
    #[inline]
    pub fn new(ctx: &'a BuildContext, name: &'a str) -> Self {
        SchemaEnum {
            name,
            values: HashSet::new_in(&ctx.arena),
        }
    }

    pub fn add_value(&mut self, value: &'a str) {
        self.values.insert(value);
    }
}

/// An Input Object type definition.
///
/// Mutation inputs, composite types, and table patches are all represented as input objects.
/// [Reference](https://spec.graphql.org/October2021/#sec-Input-Objects)
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaInputObject<'a> {
    pub name: &'a str,
    pub fields: HashMap<&'a str, SchemaInputField<'a>, DefaultHashBuilder, &'a Bump>,
    pub scope: InputObjectScope<'a>,
}

impl<'a> SchemaInputObject<'a> {
    #[inline]
    pub fn new(ctx: &'a BuildContext, name: &'a str, scope: InputObjectScope<'a>) -> Self {
        SchemaInputObject {
            name,
            fields: HashMap::new_in(&ctx.arena),
            scope,
        }
    }

    pub fn add_field(&mut self, field: SchemaInputField<'a>) {
        self.fields.insert(field.name, field);
    }

    #[inline]
    pub fn get_field(&self, name: &str) -> Option<&SchemaInputField<'a>> {
        self.fields.get(name)
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct SchemaInputField<'a> {
    pub name: &'a str,
    pub input_type: &'a TypeRef<'a>,
}

impl<'a> SchemaInputField<'a> {
    #[inline]
    pub fn new(name: &'a str, input_type: &'a TypeRef<'a>) -> Self {
        SchemaInputField { name, input_type }
    }
}

/// A named type enum that represents all GraphQL definition types this library knows about.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Types)
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum SchemaType<'a> {
    InputObject(&'a SchemaInputObject<'a>),
    Object(&'a SchemaObject<'a>),
    Interface(&'a SchemaInterface<'a>),
    Scalar(&'a SchemaScalar<'a>),
    Enum(&'a SchemaEnum<'a>),
}

impl<'a> SchemaType<'a> {
    #[inline]
    pub fn name(&self) -> &'a str {
        match self {
            SchemaType::InputObject(x) => x.name,
            SchemaType::Object(x) => x.name,
            SchemaType::Interface(x) => x.name,
            SchemaType::Scalar(x) => x.name,
            SchemaType::Enum(x) => x.name,
        }
    }

    pub fn object(&self) -> Option<&'a SchemaObject<'a>> {
        match *self {
            SchemaType::Object(x) => Some(x),
            _ => None,
        }
    }

    pub fn input_object(&self) -> Option<&'a SchemaInputObject<'a>> {
        match *self {
            SchemaType::InputObject(x) => Some(x),
            _ => None,
        }
    }

    pub fn interface(&self) -> Option<&'a SchemaInterface<'a>> {
        match *self {
            SchemaType::Interface(x) => Some(x),
            _ => None,
        }
    }

    /// Returns whether values of this type may be passed as arguments.
    pub fn is_input_type(&self) -> bool {
        matches!(
            self,
            SchemaType::InputObject(_) | SchemaType::Scalar(_) | SchemaType::Enum(_)
        )
    }

    /// Returns whether fields may return values of this type.
    pub fn is_output_type(&self) -> bool {
        !matches!(self, SchemaType::InputObject(_))
    }
}

/// A reference to a type, including list and non-null wrappers.
#[derive(Clone, Copy)]
pub enum TypeRef<'a> {
    Type(&'a str),
    ListType(&'a TypeRef<'a>),
    NonNullType(&'a TypeRef<'a>),
}

impl<'a> TypeRef<'a> {
    /// Allocates a reference to a named type.
    #[inline]
    pub fn named(ctx: &'a BuildContext, name: &'a str) -> &'a TypeRef<'a> {
        ctx.alloc(TypeRef::Type(name))
    }

    /// Wraps this type in a list.
    #[inline]
    pub fn into_list(&'a self, ctx: &'a BuildContext) -> &'a TypeRef<'a> {
        ctx.alloc(TypeRef::ListType(self))
    }

    /// Wraps this type in a non-null wrapper.
    #[inline]
    pub fn into_nonnull(&'a self, ctx: &'a BuildContext) -> &'a TypeRef<'a> {
        ctx.alloc(TypeRef::NonNullType(self))
    }

    /// Unwraps this reference recursively and returns the name of the contained named type.
    #[inline]
    pub fn named_type(&self) -> &'a str {
        match *self {
            TypeRef::Type(name) => name,
            TypeRef::ListType(of_type) => of_type.named_type(),
            TypeRef::NonNullType(of_type) => of_type.named_type(),
        }
    }

    /// Resolves the named type of this reference, if it exists in the schema.
    #[inline]
    pub fn of_type(&self, schema: &Schema<'a>) -> Option<&'a SchemaType<'a>> {
        schema.get_type(self.named_type())
    }

    /// Returns the outermost shape of this reference.
    ///
    /// Wrappers are returned one level at a time. Named types resolve to `Object` for input
    /// objects, objects, and interfaces, while scalars, enums, and unknown names are `Scalar`.
    pub fn shape(&'a self, schema: &Schema<'a>) -> TypeShape<'a> {
        match *self {
            TypeRef::ListType(of_type) => TypeShape::List(of_type),
            TypeRef::NonNullType(of_type) => TypeShape::NonNull(of_type),
            TypeRef::Type(name) => match schema.get_type(name).copied() {
                Some(SchemaType::InputObject(x)) => TypeShape::Object(ObjectShape::InputObject(x)),
                Some(SchemaType::Object(x)) => TypeShape::Object(ObjectShape::Object(x)),
                Some(SchemaType::Interface(x)) => TypeShape::Object(ObjectShape::Interface(x)),
                Some(SchemaType::Scalar(_)) | Some(SchemaType::Enum(_)) | None => TypeShape::Scalar,
            },
        }
    }
}

/// This implementation is necessary to circuit break circular types.
/// Without this impl, `Debug` would print on and on, overflowing the stack as it's bouncing between types over and over.
impl<'a> std::fmt::Debug for TypeRef<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Type(name) => f.debug_tuple("Type").field(&name).finish(),
            Self::ListType(of_type) => f.debug_tuple("ListType").field(of_type).finish(),
            Self::NonNullType(of_type) => f.debug_tuple("NonNullType").field(of_type).finish(),
        }
    }
}

/// Type references are compared by name only, which is all we need for comparing references.
impl<'a> PartialEq for TypeRef<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Type(left), Self::Type(right)) => left == right,
            (Self::ListType(left), Self::ListType(right)) => left == right,
            (Self::NonNullType(left), Self::NonNullType(right)) => left == right,
            _ => false,
        }
    }
}

/// The shape of a type as seen by a traversal over input type graphs.
///
/// This is a small, closed set of variants so that walks over types are exhaustive and don't need
/// to know about every kind of schema type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypeShape<'a> {
    List(&'a TypeRef<'a>),
    NonNull(&'a TypeRef<'a>),
    Object(ObjectShape<'a>),
    Scalar,
}

/// A named type that has fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObjectShape<'a> {
    InputObject(&'a SchemaInputObject<'a>),
    Object(&'a SchemaObject<'a>),
    Interface(&'a SchemaInterface<'a>),
}

impl<'a> ObjectShape<'a> {
    #[inline]
    pub fn name(&self) -> &'a str {
        match self {
            ObjectShape::InputObject(x) => x.name,
            ObjectShape::Object(x) => x.name,
            ObjectShape::Interface(x) => x.name,
        }
    }

    /// Looks up a field by name and returns its declared name and type.
    pub fn field(&self, name: &str) -> Option<(&'a str, &'a TypeRef<'a>)> {
        match *self {
            ObjectShape::InputObject(x) => x.fields.get(name).map(|f| (f.name, f.input_type)),
            ObjectShape::Object(x) => x.fields.get(name).map(|f| (f.name, f.output_type)),
            ObjectShape::Interface(x) => x.fields.get(name).map(|f| (f.name, f.output_type)),
        }
    }

    /// Returns the types of all fields in no particular order.
    pub fn field_types(&self) -> std::vec::Vec<&'a TypeRef<'a>> {
        match *self {
            ObjectShape::InputObject(x) => x.fields.values().map(|f| f.input_type).collect(),
            ObjectShape::Object(x) => x.fields.values().map(|f| f.output_type).collect(),
            ObjectShape::Interface(x) => x.fields.values().map(|f| f.output_type).collect(),
        }
    }
}
