use logos::{Lexer, Logos};

use super::lexer::Token;
use crate::context::BuildContext;
use crate::error::{get_location, print_span, Error, ErrorType, Result};
use crate::inflection::Inflector;
use crate::introspection::{Introspection, IntrospectionClass};
use crate::tags::TagValue;

/// A single parsed annotation, pairing a raw argument or field name with a table identifier.
///
/// The annotation `patch app.entity_table` pairs the `patch` argument with the `entity_table`
/// table in the `app` namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchAnnotation<'a> {
    /// The annotation as it was written
    pub source: &'a str,
    pub name: &'a str,
    pub namespace: &'a str,
    pub table: &'a str,
}

struct AnnotationParser<'a> {
    source: &'a str,
    lexer: Lexer<'a, Token<'a>>,
}

impl<'a> AnnotationParser<'a> {
    fn new(source: &'a str) -> Self {
        AnnotationParser {
            source,
            lexer: Token::lexer(source),
        }
    }

    #[inline]
    fn next(&mut self) -> Token<'a> {
        self.lexer.next().unwrap_or(Token::End)
    }

    fn error(&self, message: &str) -> Error {
        let mut span = self.lexer.span();
        // error tokens may end inside of a multi-byte character
        while !self.source.is_char_boundary(span.start) {
            span.start -= 1;
        }
        while !self.source.is_char_boundary(span.end) {
            span.end += 1;
        }
        Error::new_with_context(
            format!("Invalid patch annotation `{}`: {}", self.source, message),
            Some(get_location(self.source, span.clone())),
            print_span(self.source, span),
            Some(ErrorType::Annotation),
        )
    }

    fn name(&mut self, expected: &str) -> Result<&'a str> {
        match self.next() {
            Token::Name(name) => Ok(name),
            _ => Err(self.error(&format!("Expected {}.", expected))),
        }
    }

    /// Checks that the last token directly follows the previous one.
    fn adjacent(&self, previous_end: usize) -> Result<()> {
        if self.lexer.span().start == previous_end {
            Ok(())
        } else {
            Err(self.error("The table identifier must not contain whitespace."))
        }
    }

    fn parse(mut self) -> Result<PatchAnnotation<'a>> {
        let name = self.name("an argument or field name")?;
        let namespace = self.name("a `namespace.table` identifier")?;
        let namespace_end = self.lexer.span().end;

        if self.next() != Token::Dot {
            return Err(self.error("Expected `.` between the namespace and the table."));
        }
        self.adjacent(namespace_end)?;
        let dot_end = self.lexer.span().end;

        let table = self.name("a table name")?;
        self.adjacent(dot_end)?;

        if self.next() != Token::End {
            return Err(self.error("Unexpected trailing input."));
        }

        Ok(PatchAnnotation {
            source: self.source,
            name,
            namespace,
            table,
        })
    }
}

impl<'a> PatchAnnotation<'a> {
    /// Parses an annotation of the form `<name> <namespace>.<table>`.
    pub fn parse(source: &'a str) -> Result<Self> {
        if source.trim().is_empty() {
            return Err(Error::new(
                "Invalid patch annotation: Expected `<name> <namespace>.<table>` but got an empty annotation.",
                Some(ErrorType::Annotation),
            ));
        }
        AnnotationParser::new(source).parse()
    }
}

/// An annotation whose table was looked up in the introspected metadata.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedPatch<'a> {
    pub annotation: PatchAnnotation<'a>,
    /// The inflected name of the argument or field the annotation applies to
    pub field_name: &'a str,
    /// The annotated table, or `None` if no such table was introspected
    pub table: Option<&'a IntrospectionClass>,
}

impl<'a> ResolvedPatch<'a> {
    /// Returns the name of the patch input type that's generated for the annotated table.
    pub fn patch_type_name<I: Inflector>(&self, inflector: &I) -> Option<String> {
        self.table.map(|table| patch_type_name(inflector, table))
    }
}

/// Returns the name of the patch input type that's generated for a table.
pub fn patch_type_name<I: Inflector>(inflector: &I, table: &IntrospectionClass) -> String {
    inflector.patch_type(&inflector.table_type(table))
}

/// Parses every annotation of a tag value and looks up the tables they refer to.
///
/// The resolved patches keep the order the annotations were written in. A table that doesn't
/// exist isn't an error here and results in a [ResolvedPatch] without a table.
pub fn resolve_patch_annotation<'a, I: Inflector>(
    ctx: &'a BuildContext,
    value: &'a TagValue,
    introspection: &'a Introspection,
    inflector: &I,
) -> Result<Vec<ResolvedPatch<'a>>> {
    if let TagValue::Flag(_) = value {
        return Err(Error::new(
            "Invalid patch annotation: Expected `<name> <namespace>.<table>` but the tag has no value.",
            Some(ErrorType::Annotation),
        ));
    }

    value
        .values()
        .into_iter()
        .enumerate()
        .map(|(index, source)| -> Result<ResolvedPatch<'a>> {
            let annotation = PatchAnnotation::parse(source)?;
            Ok(ResolvedPatch {
                annotation,
                field_name: ctx.alloc_string(inflector.argument(annotation.name, index)),
                table: introspection.find_class(annotation.namespace, annotation.table),
            })
        })
        .collect()
}
