use bumpalo::collections::Vec;
use bumpalo::Bump;
use hashbrown::hash_map::DefaultHashBuilder;
use hashbrown::{HashMap, HashSet};
use serde_json::{Map, Value as JSValue};
use tracing::trace;

use super::resolver::{Arguments, INPUT_ARGUMENT};
use super::PatchPlugin;
use crate::context::BuildContext;
use crate::error::Result;
use crate::inflection::Inflector;
use crate::introspection::IntrospectionClass;
use crate::schema::{ObjectShape, Schema, TypeRef, TypeShape};

/// Identifies a field of an input object type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PatchKey<'a> {
    pub type_name: &'a str,
    pub field_name: &'a str,
}

/// Maps the inflected field name of a patch type to the raw name of its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping<'a> {
    pub field_name: &'a str,
    pub column_name: &'a str,
}

/// The table a patched field's values are converted to rows of.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchTarget<'a> {
    pub table: &'a IntrospectionClass,
    /// One mapping per attribute, in the table's attribute order
    pub columns: Vec<'a, ColumnMapping<'a>>,
}

impl<'a> PatchTarget<'a> {
    pub fn new<I: Inflector>(
        ctx: &'a BuildContext,
        table: &'a IntrospectionClass,
        inflector: &I,
    ) -> Self {
        let mut columns = Vec::with_capacity_in(table.attributes.len(), &ctx.arena);
        for attribute in table.attributes.iter() {
            columns.push(ColumnMapping {
                field_name: ctx.alloc_string(inflector.column(attribute)),
                column_name: &attribute.name,
            });
        }
        PatchTarget { table, columns }
    }

    /// Converts a patch value into a row keyed by raw column names.
    ///
    /// Only columns whose inflected name is present in the value are included and keys that
    /// aren't columns are dropped. Values that aren't objects are returned unchanged.
    pub fn rewrite(&self, value: JSValue) -> JSValue {
        match value {
            JSValue::Object(mut fields) => {
                let mut row = Map::new();
                for column in self.columns.iter() {
                    if let Some(value) = fields.remove(column.field_name) {
                        row.insert(column.column_name.to_string(), value);
                    }
                }
                JSValue::Object(row)
            }
            value => value,
        }
    }
}

/// The patched fields that are reachable from a mutation's input type.
#[derive(Debug, Clone)]
pub struct PatchMap<'a> {
    entries: HashMap<PatchKey<'a>, PatchTarget<'a>, DefaultHashBuilder, &'a Bump>,
}

impl<'a> PatchMap<'a> {
    /// Walks all types reachable from `input_type` and records every patched field.
    ///
    /// Input objects, objects, and interfaces are all descended into, but only input objects may
    /// have patched fields. Each named type is visited once.
    pub fn collect<I: Inflector>(
        plugin: &PatchPlugin<'a, I>,
        schema: &'a Schema<'a>,
        input_type: &'a TypeRef<'a>,
    ) -> Result<Self> {
        let ctx = plugin.ctx;
        let mut entries = HashMap::new_in(&ctx.arena);
        let mut seen: HashSet<&'a str> = HashSet::new();
        let mut stack = vec![input_type];

        while let Some(type_ref) = stack.pop() {
            let object = match type_ref.shape(schema) {
                TypeShape::List(of_type) | TypeShape::NonNull(of_type) => {
                    stack.push(of_type);
                    continue;
                }
                TypeShape::Scalar => continue,
                TypeShape::Object(object) => object,
            };
            if !seen.insert(object.name()) {
                continue;
            }

            if let ObjectShape::InputObject(input_object) = object {
                for patch in plugin.prepared_patches_for(input_object.name, input_object.scope)? {
                    if let Some((field_name, _)) = object.field(patch.field_name) {
                        let key = PatchKey {
                            type_name: input_object.name,
                            field_name,
                        };
                        let target = PatchTarget::new(ctx, patch.table, &plugin.inflector);
                        entries.insert(key, target);
                    }
                }
            }
            stack.extend(object.field_types());
        }

        Ok(PatchMap { entries })
    }

    #[inline]
    pub fn get(&self, type_name: &'a str, field_name: &'a str) -> Option<&PatchTarget<'a>> {
        self.entries.get(&PatchKey {
            type_name,
            field_name,
        })
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Rewrites the `input` argument of a mutation field.
///
/// The argument's value is walked alongside its type. Wherever a patched field is found its value
/// is replaced with a row keyed by raw column names, and the walk doesn't descend into it any
/// further. Everything else is returned as it was submitted.
#[derive(Debug, Clone)]
pub struct ArgumentRewriter<'a> {
    schema: &'a Schema<'a>,
    input_type: &'a TypeRef<'a>,
    patches: PatchMap<'a>,
}

impl<'a> ArgumentRewriter<'a> {
    pub fn new(schema: &'a Schema<'a>, input_type: &'a TypeRef<'a>, patches: PatchMap<'a>) -> Self {
        ArgumentRewriter {
            schema,
            input_type,
            patches,
        }
    }

    #[inline]
    pub fn patches(&self) -> &PatchMap<'a> {
        &self.patches
    }

    /// Rewrites the `input` argument and leaves all other arguments untouched.
    pub fn rewrite_arguments(&self, mut arguments: Arguments) -> Arguments {
        if let Some(input) = arguments.get_mut(INPUT_ARGUMENT) {
            let value = input.take();
            *input = self.rewrite_value(self.input_type, value);
        }
        arguments
    }

    /// Rewrites a value that was submitted for the type `of_type`.
    pub fn rewrite_value(&self, of_type: &'a TypeRef<'a>, value: JSValue) -> JSValue {
        match (of_type.shape(self.schema), value) {
            (TypeShape::NonNull(of_type), value) => self.rewrite_value(of_type, value),
            (TypeShape::List(of_type), JSValue::Array(items)) => JSValue::Array(
                items
                    .into_iter()
                    .map(|item| self.rewrite_value(of_type, item))
                    .collect(),
            ),
            // A single value is accepted in place of a list
            (TypeShape::List(of_type), value) => self.rewrite_value(of_type, value),
            (TypeShape::Object(object), JSValue::Object(fields)) => {
                JSValue::Object(self.rewrite_object(object, fields))
            }
            (_, value) => value,
        }
    }

    fn rewrite_object(&self, object: ObjectShape<'a>, fields: Map<String, JSValue>) -> Map<String, JSValue> {
        let type_name = object.name();
        fields
            .into_iter()
            .map(|(key, value)| {
                let value = match object.field(&key) {
                    Some((field_name, field_type)) => match self.patches.get(type_name, field_name) {
                        Some(target) => {
                            trace!(
                                type_name,
                                field_name,
                                table = target.table.name.as_str(),
                                "rewriting patch"
                            );
                            target.rewrite(value)
                        }
                        None => self.rewrite_value(field_type, value),
                    },
                    None => value,
                };
                (key, value)
            })
            .collect()
    }
}
