use tracing::{debug, warn};

use super::{patch_type_name, PatchPlugin};
use crate::error::Result;
use crate::inflection::Inflector;
use crate::schema::{InputFieldsContext, InputFieldsHook, SchemaInputField, TypeRef};

impl<'a, I: Inflector> InputFieldsHook<'a> for PatchPlugin<'a, I> {
    /// Replaces the type of every annotated field with its table's patch type.
    ///
    /// A patch type that doesn't exist is still referenced by name, which fails the schema's
    /// validation once it's built.
    fn input_fields(
        &self,
        mut fields: Vec<SchemaInputField<'a>>,
        cx: &InputFieldsContext<'a, '_>,
    ) -> Result<Vec<SchemaInputField<'a>>> {
        for patch in self.patches_for(cx.type_name, cx.scope)? {
            let field = match fields.iter_mut().find(|field| field.name == patch.field_name) {
                Some(field) => field,
                None => {
                    debug!(
                        type_name = cx.type_name,
                        field_name = patch.field_name,
                        "patch annotation does not match any field"
                    );
                    continue;
                }
            };

            let patch_type = patch_type_name(&self.inflector, patch.table);
            field.input_type = match cx.registry.type_ref(cx.ctx, &patch_type) {
                Some(type_ref) => type_ref,
                None => {
                    warn!(
                        type_name = cx.type_name,
                        field_name = patch.field_name,
                        patch_type = patch_type.as_str(),
                        "patch type does not exist"
                    );
                    TypeRef::named(cx.ctx, cx.ctx.alloc_string(patch_type))
                }
            };
            debug!(
                type_name = cx.type_name,
                field_name = patch.field_name,
                patch_type = field.input_type.named_type(),
                "substituted patch type"
            );
        }
        Ok(fields)
    }
}
