//! # Database Introspection Metadata
//!
//! The schema is generated from an introspected database. This module contains the parts of that
//! metadata the patch annotations are resolved against: procedures, classes (tables and views)
//! with their attributes, and composite types. It's read-only and typically loaded from JSON:
//!
//! ```
//! use graphql_patch::introspection::Introspection;
//!
//! let introspection = Introspection::from_json(r#"{
//!     "classes": [{
//!         "name": "users",
//!         "namespaceName": "app",
//!         "attributes": [{ "name": "first_name", "num": 1 }]
//!     }]
//! }"#).unwrap();
//!
//! assert!(introspection.find_class("app", "users").is_some());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorType, Result};
use crate::tags::{merge_tag, parse_smart_comment, Tags};

/// The introspected procedures, classes, and composite types of a database.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Introspection {
    pub procedures: Vec<IntrospectionProc>,
    pub classes: Vec<IntrospectionClass>,
    pub types: Vec<IntrospectionType>,
}

/// A stored procedure.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntrospectionProc {
    pub name: String,
    pub namespace_name: String,
    pub is_stable: bool,
    pub comment: Option<String>,
    pub description: Option<String>,
    pub tags: Tags,
}

/// A relational class, i.e. a table or a view.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntrospectionClass {
    pub name: String,
    pub namespace_name: String,
    pub attributes: Vec<IntrospectionAttribute>,
    pub comment: Option<String>,
    pub description: Option<String>,
    pub tags: Tags,
}

impl IntrospectionClass {
    /// Returns the class's `namespace.name` identifier.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.namespace_name, self.name)
    }
}

/// A column of a class.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntrospectionAttribute {
    pub name: String,
    pub num: i32,
    pub comment: Option<String>,
    pub description: Option<String>,
    pub tags: Tags,
}

/// A composite (row) type.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntrospectionType {
    pub name: String,
    pub namespace_name: String,
    pub comment: Option<String>,
    pub description: Option<String>,
    pub tags: Tags,
}

/// Parses an entity's comment and merges its tags into the entity's explicit tags.
fn apply_comment(comment: &Option<String>, tags: &mut Tags, description: &mut Option<String>) {
    if let Some(comment) = comment {
        let smart_comment = parse_smart_comment(comment);
        for (name, value) in smart_comment.tags {
            merge_tag(tags, &name, value);
        }
        if description.is_none() {
            *description = smart_comment.description;
        }
    }
}

impl Introspection {
    /// Loads introspection metadata from JSON and applies smart comments.
    pub fn from_json(source: &str) -> Result<Self> {
        let mut introspection: Introspection = serde_json::from_str(source).map_err(|err| {
            Error::new(
                format!("Invalid introspection data: {}", err),
                Some(ErrorType::Introspection),
            )
        })?;
        introspection.apply_smart_comments();
        Ok(introspection)
    }

    /// Parses the comment of every entity into tags and a description, and orders every class's
    /// attributes by their position.
    pub fn apply_smart_comments(&mut self) {
        for procedure in self.procedures.iter_mut() {
            apply_comment(
                &procedure.comment,
                &mut procedure.tags,
                &mut procedure.description,
            );
        }
        for class in self.classes.iter_mut() {
            apply_comment(&class.comment, &mut class.tags, &mut class.description);
            for attribute in class.attributes.iter_mut() {
                apply_comment(
                    &attribute.comment,
                    &mut attribute.tags,
                    &mut attribute.description,
                );
            }
            class.attributes.sort_by_key(|attribute| attribute.num);
        }
        for composite in self.types.iter_mut() {
            apply_comment(
                &composite.comment,
                &mut composite.tags,
                &mut composite.description,
            );
        }
    }

    /// Finds a class by its exact namespace and name.
    pub fn find_class(&self, namespace: &str, name: &str) -> Option<&IntrospectionClass> {
        self.classes
            .iter()
            .find(|class| class.namespace_name == namespace && class.name == name)
    }

    /// Finds a composite type by its exact namespace and name.
    pub fn find_type(&self, namespace: &str, name: &str) -> Option<&IntrospectionType> {
        self.types
            .iter()
            .find(|composite| composite.namespace_name == namespace && composite.name == name)
    }

    /// Finds a procedure by its exact namespace and name.
    pub fn find_procedure(&self, namespace: &str, name: &str) -> Option<&IntrospectionProc> {
        self.procedures
            .iter()
            .find(|procedure| procedure.namespace_name == namespace && procedure.name == name)
    }
}
