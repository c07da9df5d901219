//! # Inflection
//!
//! Database identifiers and schema identifiers follow different naming conventions. The
//! [Inflector] trait is the single place where one is turned into the other, so that the schema
//! build and the argument rewrite agree on every generated name.

use convert_case::{Case, Casing};

use crate::introspection::{
    IntrospectionAttribute, IntrospectionClass, IntrospectionProc, IntrospectionType,
};
use crate::tags::Tags;

/// Naming rules that convert database identifiers into GraphQL identifiers.
///
/// Implementations must be pure: the same input always produces the same name.
pub trait Inflector {
    /// Name of an argument, or of an input field, given its raw name and position.
    fn argument(&self, name: &str, index: usize) -> String;

    /// Name of the input field that represents an attribute.
    fn column(&self, attribute: &IntrospectionAttribute) -> String;

    /// Name of the object type that's generated for a table.
    fn table_type(&self, table: &IntrospectionClass) -> String;

    /// Name of the patch input type that's generated for a table type.
    fn patch_type(&self, table_type: &str) -> String;

    /// Name of the input object type of a procedure's mutation.
    fn function_input_type(&self, procedure: &IntrospectionProc) -> String;

    /// Name of the input object type that's generated for a composite type.
    fn composite_input_type(&self, composite: &IntrospectionType) -> String;
}

impl<I: Inflector + ?Sized> Inflector for &I {
    #[inline]
    fn argument(&self, name: &str, index: usize) -> String {
        (**self).argument(name, index)
    }

    #[inline]
    fn column(&self, attribute: &IntrospectionAttribute) -> String {
        (**self).column(attribute)
    }

    #[inline]
    fn table_type(&self, table: &IntrospectionClass) -> String {
        (**self).table_type(table)
    }

    #[inline]
    fn patch_type(&self, table_type: &str) -> String {
        (**self).patch_type(table_type)
    }

    #[inline]
    fn function_input_type(&self, procedure: &IntrospectionProc) -> String {
        (**self).function_input_type(procedure)
    }

    #[inline]
    fn composite_input_type(&self, composite: &IntrospectionType) -> String {
        (**self).composite_input_type(composite)
    }
}

/// The default naming rules: camel case fields, Pascal case types.
///
/// An entity may override its base name with a `@name` tag, e.g. `@name person` on a
/// `people_table` class produces the type `Person`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultInflector;

fn base_name<'a>(name: &'a str, tags: &'a Tags) -> &'a str {
    tags.get("name")
        .and_then(|value| value.as_text())
        .unwrap_or(name)
}

impl Inflector for DefaultInflector {
    fn argument(&self, name: &str, index: usize) -> String {
        if name.is_empty() {
            format!("arg{}", index)
        } else {
            name.to_case(Case::Camel)
        }
    }

    fn column(&self, attribute: &IntrospectionAttribute) -> String {
        base_name(&attribute.name, &attribute.tags).to_case(Case::Camel)
    }

    fn table_type(&self, table: &IntrospectionClass) -> String {
        base_name(&table.name, &table.tags).to_case(Case::Pascal)
    }

    fn patch_type(&self, table_type: &str) -> String {
        format!("{}Patch", table_type)
    }

    fn function_input_type(&self, procedure: &IntrospectionProc) -> String {
        let name = base_name(&procedure.name, &procedure.tags).to_case(Case::Pascal);
        format!("{}Input", name)
    }

    fn composite_input_type(&self, composite: &IntrospectionType) -> String {
        let name = base_name(&composite.name, &composite.tags).to_case(Case::Pascal);
        format!("{}Input", name)
    }
}
