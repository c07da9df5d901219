use hashbrown::HashMap;
use serde_json::Value as JSValue;

use super::rewrite::{ArgumentRewriter, PatchMap};
use super::PatchPlugin;
use crate::error::Result;
use crate::inflection::Inflector;
use crate::schema::{FieldScope, Schema, SchemaField};

/// The arguments a field is called with.
pub type Arguments = serde_json::Map<String, JSValue>;

/// Name of the argument that carries a mutation's input object.
pub const INPUT_ARGUMENT: &str = "input";

/// Resolves a field given its arguments.
pub trait Resolve {
    fn resolve(&self, arguments: Arguments) -> Result<JSValue>;
}

impl<F> Resolve for F
where
    F: Fn(Arguments) -> Result<JSValue>,
{
    #[inline]
    fn resolve(&self, arguments: Arguments) -> Result<JSValue> {
        self(arguments)
    }
}

/// A field's resolver, wrapped with an [ArgumentRewriter] if patch values may be passed to it.
#[derive(Debug)]
pub enum FieldResolver<'a, R> {
    Plain(R),
    Patched {
        resolver: R,
        rewriter: ArgumentRewriter<'a>,
    },
}

impl<'a, R> FieldResolver<'a, R> {
    #[inline]
    pub fn is_patched(&self) -> bool {
        matches!(self, FieldResolver::Patched { .. })
    }

    #[inline]
    pub fn rewriter(&self) -> Option<&ArgumentRewriter<'a>> {
        match self {
            FieldResolver::Plain(_) => None,
            FieldResolver::Patched { rewriter, .. } => Some(rewriter),
        }
    }
}

impl<'a, R: Resolve> Resolve for FieldResolver<'a, R> {
    fn resolve(&self, arguments: Arguments) -> Result<JSValue> {
        match self {
            FieldResolver::Plain(resolver) => resolver.resolve(arguments),
            FieldResolver::Patched { resolver, rewriter } => {
                resolver.resolve(rewriter.rewrite_arguments(arguments))
            }
        }
    }
}

impl<'a, I: Inflector> PatchPlugin<'a, I> {
    /// Creates the [ArgumentRewriter] of a field.
    ///
    /// Only fields that call a procedure and have an `input` argument are rewritten. `None` is
    /// returned when no patched field is reachable from the input's type.
    pub fn rewriter(
        &self,
        schema: &'a Schema<'a>,
        field: &'a SchemaField<'a>,
    ) -> Result<Option<ArgumentRewriter<'a>>> {
        if !matches!(field.scope, FieldScope::Procedure(_)) {
            return Ok(None);
        }
        let input_type = match field.get_argument(INPUT_ARGUMENT) {
            Some(argument) => argument.input_type,
            None => return Ok(None),
        };

        let patches = PatchMap::collect(self, schema, input_type)?;
        if patches.is_empty() {
            Ok(None)
        } else {
            Ok(Some(ArgumentRewriter::new(schema, input_type, patches)))
        }
    }

    /// Wraps a field's resolver so that patch values are rewritten before it's called.
    pub fn wrap<R: Resolve>(
        &self,
        schema: &'a Schema<'a>,
        field: &'a SchemaField<'a>,
        resolver: R,
    ) -> Result<FieldResolver<'a, R>> {
        Ok(match self.rewriter(schema, field)? {
            Some(rewriter) => FieldResolver::Patched { resolver, rewriter },
            None => FieldResolver::Plain(resolver),
        })
    }

    /// Wraps the resolvers of all fields of the mutation root type.
    pub fn wrap_mutations<R, F>(
        &self,
        schema: &'a Schema<'a>,
        mut resolver_for: F,
    ) -> Result<HashMap<&'a str, FieldResolver<'a, R>>>
    where
        R: Resolve,
        F: FnMut(&'a SchemaField<'a>) -> R,
    {
        let mut resolvers = HashMap::new();
        if let Some(mutation_type) = schema.mutation_type() {
            for field in mutation_type.fields() {
                let resolver = self.wrap(schema, field, resolver_for(field))?;
                resolvers.insert(field.name, resolver);
            }
        }
        Ok(resolvers)
    }
}
