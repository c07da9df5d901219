use serde::{Deserialize, Serialize};
use tracing::warn;

use super::annotation::ResolvedPatch;
use super::PatchedField;
use crate::error::{Error, ErrorType, Result};

/// What happens to an annotation whose table doesn't exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum UnresolvedTable {
    /// The annotation is dropped and a warning is logged.
    #[default]
    Warn,
    /// The annotation is dropped silently.
    Ignore,
    /// The annotation fails the schema build.
    Error,
}

impl UnresolvedTable {
    /// The same policy without logging.
    #[inline]
    pub(crate) fn quiet(self) -> Self {
        match self {
            UnresolvedTable::Warn => UnresolvedTable::Ignore,
            policy => policy,
        }
    }

    /// Applies this policy to a resolved annotation of the type `type_name`.
    pub(crate) fn check<'a>(
        self,
        patch: &ResolvedPatch<'a>,
        type_name: &str,
    ) -> Result<Option<PatchedField<'a>>> {
        let annotation = &patch.annotation;
        match (patch.table, self) {
            (Some(table), _) => Ok(Some(PatchedField {
                field_name: patch.field_name,
                table,
            })),
            (None, UnresolvedTable::Warn) => {
                warn!(
                    type_name,
                    field_name = patch.field_name,
                    namespace = annotation.namespace,
                    table = annotation.table,
                    "patch annotation refers to a table that does not exist"
                );
                Ok(None)
            }
            (None, UnresolvedTable::Ignore) => Ok(None),
            (None, UnresolvedTable::Error) => Err(Error::new(
                format!(
                    "Patch annotation `{}` of type `{}` refers to table `{}.{}` which does not exist.",
                    annotation.source, type_name, annotation.namespace, annotation.table
                ),
                Some(ErrorType::Annotation),
            )),
        }
    }
}

/// Options of the [PatchPlugin](super::PatchPlugin).
///
/// ```
/// use graphql_patch::patch::{PatchOptions, UnresolvedTable};
///
/// let options = PatchOptions::from_json(r#"{ "unresolvedTable": "error" }"#).unwrap();
/// assert_eq!(options.tag_name, "patch");
/// assert_eq!(options.unresolved_table, UnresolvedTable::Error);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatchOptions {
    /// Name of the tag that carries patch annotations
    pub tag_name: String,
    pub unresolved_table: UnresolvedTable,
}

impl Default for PatchOptions {
    fn default() -> Self {
        PatchOptions {
            tag_name: "patch".to_string(),
            unresolved_table: UnresolvedTable::default(),
        }
    }
}

impl PatchOptions {
    /// Loads options from JSON. Missing keys take their default values.
    pub fn from_json(source: &str) -> Result<Self> {
        serde_json::from_str(source).map_err(|err| {
            Error::new(
                format!("Invalid patch options: {}", err),
                Some(ErrorType::Configuration),
            )
        })
    }
}
