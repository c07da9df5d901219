use crate::inflection::Inflector;
use crate::introspection::{Introspection, IntrospectionProc, IntrospectionType};
use crate::schema::InputObjectScope;
use crate::tags::{TagValue, Tags};

/// A database object that may carry patch annotations in its tags.
pub trait AnnotatedDeclaration<'a> {
    /// All tags of the declaration
    fn tags(&self) -> &'a Tags;

    /// Returns the value of the tag that carries patch annotations, if the declaration has one.
    #[inline]
    fn patch_annotation(&self, tag_name: &str) -> Option<&'a TagValue> {
        self.tags().get(tag_name)
    }
}

impl<'a> AnnotatedDeclaration<'a> for &'a IntrospectionProc {
    #[inline]
    fn tags(&self) -> &'a Tags {
        &self.tags
    }
}

impl<'a> AnnotatedDeclaration<'a> for &'a IntrospectionType {
    #[inline]
    fn tags(&self) -> &'a Tags {
        &self.tags
    }
}

/// The declaration an input object type was generated from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Declaration<'a> {
    Procedure(&'a IntrospectionProc),
    CompositeType(&'a IntrospectionType),
}

impl<'a> AnnotatedDeclaration<'a> for Declaration<'a> {
    fn tags(&self) -> &'a Tags {
        match *self {
            Declaration::Procedure(procedure) => &procedure.tags,
            Declaration::CompositeType(composite) => &composite.tags,
        }
    }
}

impl<'a> Declaration<'a> {
    /// Finds the declaration an input object type was generated from.
    ///
    /// A mutation's input type is matched to the mutation procedure whose inflected input type
    /// name equals the type's name. A composite type's input type already knows its composite
    /// type. Any other input type has no declaration.
    pub fn find<I: Inflector>(
        scope: InputObjectScope<'a>,
        type_name: &str,
        introspection: &'a Introspection,
        inflector: &I,
    ) -> Option<Self> {
        match scope {
            InputObjectScope::MutationInput => introspection
                .procedures
                .iter()
                .filter(|procedure| !procedure.is_stable)
                .find(|procedure| inflector.function_input_type(procedure) == type_name)
                .map(Declaration::Procedure),
            InputObjectScope::CompositeType(composite) => Some(Declaration::CompositeType(composite)),
            InputObjectScope::None => None,
        }
    }
}
