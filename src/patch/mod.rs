//! # Patch Annotations
//!
//! The `graphql_patch::patch` module turns opaque JSON arguments of database procedures into typed
//! patch inputs. A procedure or composite type may be annotated with `@patch` smart tags, each
//! pairing one of its arguments or fields with a table:
//!
//! ```sql
//! comment on function app.update_entity(id text, patch json) is
//!   E'@patch patch app.entity_table';
//! ```
//!
//! The [PatchPlugin] then does two things:
//!
//! - While the schema is built it's an [InputFieldsHook](crate::schema::InputFieldsHook) that
//!   replaces the annotated field's type with the table's generated patch type, e.g.
//!   `EntityTablePatch`.
//! - When a mutation is called, the [ArgumentRewriter] it creates converts the submitted patch
//!   values back from inflected field names (`firstColumn`) to raw column names (`first_column`).
//!
//! ```
//! use graphql_patch::{context::BuildContext, inflection::DefaultInflector};
//! use graphql_patch::{introspection::Introspection, patch::PatchPlugin, schema::*};
//!
//! let ctx = BuildContext::new();
//! let introspection = Introspection::from_json(r#"{
//!     "procedures": [{ "name": "touch", "namespaceName": "app", "argNames": ["patch"] }]
//! }"#).unwrap();
//!
//! let plugin = PatchPlugin::new(&ctx, &introspection, DefaultInflector);
//! let mut builder = SchemaBuilder::new(&ctx);
//! builder.add_hook(&plugin).add_type(TypeDefinition::InputObject(
//!     InputObjectDefinition::new("TouchInput", InputObjectScope::MutationInput)
//!         .field("patch", TypeRef::named(&ctx, "String")),
//! ));
//!
//! let schema = builder.build().unwrap();
//! assert!(schema.get_input_object("TouchInput").is_some());
//! ```

mod annotation;
mod declaration;
mod lexer;
mod options;
mod resolver;
mod rewrite;
mod substitute;

#[cfg(test)]
mod tests;

pub use annotation::*;
pub use declaration::*;
pub use options::*;
pub use resolver::*;
pub use rewrite::*;

use crate::context::BuildContext;
use crate::error::Result;
use crate::inflection::Inflector;
use crate::introspection::{Introspection, IntrospectionClass};
use crate::schema::InputObjectScope;

/// An argument or field whose type is replaced by the patch type of a table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatchedField<'a> {
    /// The inflected name of the argument or field
    pub field_name: &'a str,
    pub table: &'a IntrospectionClass,
}

/// Substitutes patch types into a schema while it's built and rewrites patch values when
/// mutations are called.
pub struct PatchPlugin<'a, I: Inflector> {
    pub(crate) ctx: &'a BuildContext,
    pub(crate) introspection: &'a Introspection,
    pub(crate) inflector: I,
    pub(crate) options: PatchOptions,
}

impl<'a, I: Inflector> PatchPlugin<'a, I> {
    pub fn new(ctx: &'a BuildContext, introspection: &'a Introspection, inflector: I) -> Self {
        PatchPlugin {
            ctx,
            introspection,
            inflector,
            options: PatchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PatchOptions) -> Self {
        self.options = options;
        self
    }

    #[inline]
    pub fn options(&self) -> &PatchOptions {
        &self.options
    }

    #[inline]
    pub fn inflector(&self) -> &I {
        &self.inflector
    }

    /// Returns the patched fields of an input object type with resolved tables.
    ///
    /// Annotations are looked up on the procedure or composite type the input object was
    /// generated from. Annotations whose table doesn't exist are handled according to
    /// [PatchOptions::unresolved_table].
    pub fn patches_for(
        &self,
        type_name: &str,
        scope: InputObjectScope<'a>,
    ) -> Result<Vec<PatchedField<'a>>> {
        self.resolve_patches(type_name, scope, self.options.unresolved_table)
    }

    /// Like [PatchPlugin::patches_for], but doesn't log unresolved tables again.
    pub(crate) fn prepared_patches_for(
        &self,
        type_name: &str,
        scope: InputObjectScope<'a>,
    ) -> Result<Vec<PatchedField<'a>>> {
        self.resolve_patches(type_name, scope, self.options.unresolved_table.quiet())
    }

    fn resolve_patches(
        &self,
        type_name: &str,
        scope: InputObjectScope<'a>,
        policy: UnresolvedTable,
    ) -> Result<Vec<PatchedField<'a>>> {
        let declaration =
            match Declaration::find(scope, type_name, self.introspection, &self.inflector) {
                Some(declaration) => declaration,
                None => return Ok(Vec::new()),
            };
        let value = match declaration.patch_annotation(&self.options.tag_name) {
            Some(value) => value,
            None => return Ok(Vec::new()),
        };

        let resolved =
            resolve_patch_annotation(self.ctx, value, self.introspection, &self.inflector)?;
        let mut patches = Vec::with_capacity(resolved.len());
        for patch in resolved.iter() {
            if let Some(field) = policy.check(patch, type_name)? {
                patches.push(field);
            }
        }
        Ok(patches)
    }
}
