use bumpalo::Bump;
use hashbrown::hash_map::DefaultHashBuilder;
use hashbrown::HashMap;

use super::schema::*;
use crate::context::{BuildContext, DefaultIn};
use crate::error::{Error, ErrorType, Result};

/// Scalars that every schema contains without them being defined.
pub const DEFAULT_SCALARS: [&str; 5] = ["String", "Int", "Float", "Boolean", "ID"];

/// The definition of a named type before it's built into a [Schema].
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDefinition<'a> {
    Scalar(&'a str),
    Enum(EnumDefinition<'a>),
    Object(ObjectDefinition<'a>),
    Interface(ObjectDefinition<'a>),
    InputObject(InputObjectDefinition<'a>),
}

impl<'a> TypeDefinition<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            TypeDefinition::Scalar(name) => *name,
            TypeDefinition::Enum(x) => x.name,
            TypeDefinition::Object(x) => x.name,
            TypeDefinition::Interface(x) => x.name,
            TypeDefinition::InputObject(x) => x.name,
        }
    }

    fn kind(&self) -> TypeKind {
        match self {
            TypeDefinition::Scalar(_) => TypeKind::Scalar,
            TypeDefinition::Enum(_) => TypeKind::Enum,
            TypeDefinition::Object(_) => TypeKind::Object,
            TypeDefinition::Interface(_) => TypeKind::Interface,
            TypeDefinition::InputObject(_) => TypeKind::InputObject,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDefinition<'a> {
    pub name: &'a str,
    pub values: Vec<&'a str>,
}

/// Definition of an object or an interface type.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDefinition<'a> {
    pub name: &'a str,
    pub fields: Vec<FieldDefinition<'a>>,
    pub interfaces: Vec<&'a str>,
}

impl<'a> ObjectDefinition<'a> {
    pub fn new(name: &'a str) -> Self {
        ObjectDefinition {
            name,
            fields: Vec::new(),
            interfaces: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldDefinition<'a>) -> Self {
        self.fields.push(field);
        self
    }

    pub fn implements(mut self, interface: &'a str) -> Self {
        self.interfaces.push(interface);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition<'a> {
    pub name: &'a str,
    pub arguments: Vec<SchemaInputField<'a>>,
    pub output_type: &'a TypeRef<'a>,
    pub scope: FieldScope<'a>,
}

impl<'a> FieldDefinition<'a> {
    pub fn new(name: &'a str, output_type: &'a TypeRef<'a>) -> Self {
        FieldDefinition {
            name,
            arguments: Vec::new(),
            output_type,
            scope: FieldScope::None,
        }
    }

    pub fn argument(mut self, name: &'a str, input_type: &'a TypeRef<'a>) -> Self {
        self.arguments.push(SchemaInputField::new(name, input_type));
        self
    }

    pub fn scope(mut self, scope: FieldScope<'a>) -> Self {
        self.scope = scope;
        self
    }
}

/// Definition of an input object type.
///
/// The fields are kept in their declared order. [InputFieldsHook]s receive them in this order and
/// may replace any of them before the type is built.
#[derive(Debug, Clone, PartialEq)]
pub struct InputObjectDefinition<'a> {
    pub name: &'a str,
    pub fields: Vec<SchemaInputField<'a>>,
    pub scope: InputObjectScope<'a>,
}

impl<'a> InputObjectDefinition<'a> {
    pub fn new(name: &'a str, scope: InputObjectScope<'a>) -> Self {
        InputObjectDefinition {
            name,
            fields: Vec::new(),
            scope,
        }
    }

    pub fn field(mut self, name: &'a str, input_type: &'a TypeRef<'a>) -> Self {
        self.fields.push(SchemaInputField::new(name, input_type));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Scalar,
    Enum,
    Object,
    Interface,
    InputObject,
}

/// The names of all types of a schema that's being built.
///
/// Every type is registered before any type is built so that hooks may refer to any type by name,
/// regardless of the order types were defined in.
pub struct TypeRegistry<'a> {
    types: HashMap<&'a str, TypeKind, DefaultHashBuilder, &'a Bump>,
}

impl<'a> DefaultIn<'a> for TypeRegistry<'a> {
    fn default_in(arena: &'a Bump) -> Self {
        TypeRegistry {
            types: HashMap::new_in(arena),
        }
    }
}

impl<'a> TypeRegistry<'a> {
    #[inline]
    pub fn kind(&self, name: &str) -> Option<TypeKind> {
        self.types.get(name).copied()
    }

    /// Returns a reference to a registered type, or `None` if no type with this name exists.
    pub fn type_ref(&self, ctx: &'a BuildContext, name: &str) -> Option<&'a TypeRef<'a>> {
        self.types
            .get_key_value(name)
            .map(|(name, _)| TypeRef::named(ctx, *name))
    }

    fn insert(&mut self, name: &'a str, kind: TypeKind) {
        self.types.insert(name, kind);
    }
}

/// What an [InputFieldsHook] knows about the input object whose fields it receives.
pub struct InputFieldsContext<'a, 'b> {
    pub ctx: &'a BuildContext,
    pub type_name: &'a str,
    pub scope: InputObjectScope<'a>,
    pub registry: &'b TypeRegistry<'a>,
}

/// A hook that's called with the fields of every input object type while the schema is built.
///
/// The fields it returns replace the type's fields. Returning an error fails the build.
pub trait InputFieldsHook<'a> {
    fn input_fields(
        &self,
        fields: Vec<SchemaInputField<'a>>,
        cx: &InputFieldsContext<'a, '_>,
    ) -> Result<Vec<SchemaInputField<'a>>>;
}

/// Builds a [Schema] from type definitions in two phases.
///
/// First every type's name is registered, then every type is built with the [InputFieldsHook]s
/// applied to input objects. The result is validated so that every reference resolves to an
/// existing type of the right kind.
pub struct SchemaBuilder<'a, 'h> {
    ctx: &'a BuildContext,
    definitions: Vec<TypeDefinition<'a>>,
    hooks: Vec<&'h dyn InputFieldsHook<'a>>,
    query_type: Option<&'a str>,
    mutation_type: Option<&'a str>,
}

impl<'a, 'h> SchemaBuilder<'a, 'h> {
    pub fn new(ctx: &'a BuildContext) -> Self {
        SchemaBuilder {
            ctx,
            definitions: Vec::new(),
            hooks: Vec::new(),
            query_type: None,
            mutation_type: None,
        }
    }

    pub fn add_type(&mut self, definition: TypeDefinition<'a>) -> &mut Self {
        self.definitions.push(definition);
        self
    }

    /// Adds a hook. Hooks run in the order they were added.
    pub fn add_hook(&mut self, hook: &'h dyn InputFieldsHook<'a>) -> &mut Self {
        self.hooks.push(hook);
        self
    }

    /// Sets the name of the query root type, which defaults to `Query`.
    pub fn query_type(&mut self, name: &'a str) -> &mut Self {
        self.query_type = Some(name);
        self
    }

    /// Sets the name of the mutation root type, which defaults to `Mutation`.
    pub fn mutation_type(&mut self, name: &'a str) -> &mut Self {
        self.mutation_type = Some(name);
        self
    }

    fn register(&self) -> Result<TypeRegistry<'a>> {
        let mut registry = TypeRegistry::default_in(&self.ctx.arena);
        for name in DEFAULT_SCALARS {
            registry.insert(name, TypeKind::Scalar);
        }
        for definition in self.definitions.iter() {
            let name = definition.name();
            match registry.kind(name) {
                Some(TypeKind::Scalar)
                    if DEFAULT_SCALARS.contains(&name)
                        && definition.kind() == TypeKind::Scalar => {}
                Some(_) => {
                    return Err(Error::new(
                        format!("Type `{}` is defined more than once.", name),
                        Some(ErrorType::Schema),
                    ))
                }
                None => registry.insert(name, definition.kind()),
            }
        }
        Ok(registry)
    }

    fn build_field(&self, definition: &FieldDefinition<'a>) -> SchemaField<'a> {
        let mut field = SchemaField::new(self.ctx, definition.name, definition.output_type);
        field.scope = definition.scope;
        for argument in definition.arguments.iter() {
            field.add_argument(*argument);
        }
        field
    }

    fn build_type(
        &self,
        definition: &TypeDefinition<'a>,
        registry: &TypeRegistry<'a>,
    ) -> Result<SchemaType<'a>> {
        let ctx = self.ctx;
        Ok(match definition {
            TypeDefinition::Scalar(name) => SchemaType::Scalar(ctx.alloc(SchemaScalar::new(*name))),
            TypeDefinition::Enum(definition) => {
                let mut schema_enum = SchemaEnum::new(ctx, definition.name);
                for value in definition.values.iter() {
                    schema_enum.add_value(*value);
                }
                SchemaType::Enum(ctx.alloc(schema_enum))
            }
            TypeDefinition::Object(definition) => {
                let mut object = SchemaObject::new(ctx, definition.name);
                for field in definition.fields.iter() {
                    object.add_field(ctx, self.build_field(field));
                }
                for interface in definition.interfaces.iter() {
                    object.add_interface(*interface);
                }
                SchemaType::Object(ctx.alloc(object))
            }
            TypeDefinition::Interface(definition) => {
                let mut interface = SchemaInterface::new(ctx, definition.name);
                for field in definition.fields.iter() {
                    interface.add_field(ctx, self.build_field(field));
                }
                for name in definition.interfaces.iter() {
                    interface.add_interface(*name);
                }
                SchemaType::Interface(ctx.alloc(interface))
            }
            TypeDefinition::InputObject(definition) => {
                let cx = InputFieldsContext {
                    ctx,
                    type_name: definition.name,
                    scope: definition.scope,
                    registry,
                };
                let mut fields = definition.fields.clone();
                for hook in self.hooks.iter() {
                    fields = hook.input_fields(fields, &cx)?;
                }
                let mut input_object = SchemaInputObject::new(ctx, definition.name, definition.scope);
                for field in fields {
                    input_object.add_field(field);
                }
                SchemaType::InputObject(ctx.alloc(input_object))
            }
        })
    }

    fn root_type(
        schema: &Schema<'a>,
        name: Option<&'a str>,
        default_name: &str,
    ) -> Result<Option<&'a SchemaObject<'a>>> {
        let schema_type = match name {
            Some(name) => match schema.get_type(name) {
                Some(schema_type) => schema_type,
                None => {
                    return Err(Error::new(
                        format!("Root type `{}` does not exist.", name),
                        Some(ErrorType::Schema),
                    ))
                }
            },
            None => match schema.get_type(default_name) {
                Some(schema_type) => schema_type,
                None => return Ok(None),
            },
        };
        match schema_type.object() {
            Some(object) => Ok(Some(object)),
            None => Err(Error::new(
                format!("Root type `{}` must be an object type.", schema_type.name()),
                Some(ErrorType::Schema),
            )),
        }
    }

    /// Builds and validates the schema.
    pub fn build(&self) -> Result<&'a Schema<'a>> {
        let registry = self.register()?;

        let mut schema = Schema::default_in(&self.ctx.arena);
        for name in DEFAULT_SCALARS {
            let scalar = SchemaType::Scalar(self.ctx.alloc(SchemaScalar::new(name)));
            schema.types.insert(name, self.ctx.alloc(scalar));
        }
        for definition in self.definitions.iter() {
            let schema_type = self.build_type(definition, &registry)?;
            schema
                .types
                .insert(definition.name(), self.ctx.alloc(schema_type));
        }

        schema.query_type = Self::root_type(&schema, self.query_type, "Query")?;
        schema.mutation_type = Self::root_type(&schema, self.mutation_type, "Mutation")?;

        validate(&schema)?;
        tracing::debug!(types = schema.types.len(), "built schema");
        Ok(self.ctx.alloc(schema))
    }
}

fn is_valid_input<'a>(schema: &Schema<'a>, type_ref: &TypeRef<'a>) -> bool {
    type_ref
        .of_type(schema)
        .map_or(false, |schema_type| schema_type.is_input_type())
}

fn is_valid_output<'a>(schema: &Schema<'a>, type_ref: &TypeRef<'a>) -> bool {
    type_ref
        .of_type(schema)
        .map_or(false, |schema_type| schema_type.is_output_type())
}

fn validate_field<'a>(
    schema: &Schema<'a>,
    type_name: &str,
    field: &SchemaField<'a>,
    errors: &mut Vec<String>,
) {
    if !is_valid_output(schema, field.output_type) {
        errors.push(format!(
            "Field `{}` of type `{}` has an invalid type.",
            field.name, type_name
        ));
    }
    for argument in field.arguments.values() {
        if !is_valid_input(schema, argument.input_type) {
            errors.push(format!(
                "Argument `{}` of field `{}.{}` has an invalid type.",
                argument.name, type_name, field.name
            ));
        }
    }
}

fn validate_interfaces(
    schema: &Schema,
    type_name: &str,
    interfaces: &[&str],
    errors: &mut Vec<String>,
) {
    for name in interfaces {
        if schema.get_type(name).and_then(|x| x.interface()).is_none() {
            errors.push(format!(
                "Type `{}` implements `{}` which is not an interface.",
                type_name, name
            ));
        }
    }
}

/// Checks that every field, argument, and interface refers to a type of the right kind.
fn validate(schema: &Schema) -> Result<()> {
    let mut errors = Vec::new();
    for schema_type in schema.types() {
        match schema_type {
            SchemaType::Object(object) => {
                for field in object.fields() {
                    validate_field(schema, object.name, field, &mut errors);
                }
                validate_interfaces(schema, object.name, object.interfaces(), &mut errors);
            }
            SchemaType::Interface(interface) => {
                for field in interface.fields.values() {
                    validate_field(schema, interface.name, field, &mut errors);
                }
                validate_interfaces(schema, interface.name, &interface.interfaces, &mut errors);
            }
            SchemaType::InputObject(input_object) => {
                for field in input_object.fields.values() {
                    if !is_valid_input(schema, field.input_type) {
                        errors.push(format!(
                            "Field `{}` of type `{}` has an invalid type.",
                            field.name, input_object.name
                        ));
                    }
                }
            }
            SchemaType::Scalar(_) | SchemaType::Enum(_) => {}
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        errors.sort();
        let context = errors
            .iter()
            .map(|error| format!("- {}", error))
            .collect::<Vec<_>>()
            .join("\n");
        Err(Error::new_with_context(
            "Schema failed validation".to_string(),
            None,
            context,
            Some(ErrorType::Schema),
        ))
    }
}
