//! # Error and Result for this crate
//!
//! This crate defines a common [Error] structure that's used across all of its modules. Annotation
//! parsing, schema building, and metadata loading all convert their failures into it.

use logos::Span;
use std::{error, fmt, result};

/// This crate's result type using the [Error] structure.
pub type Result<T> = result::Result<T, Error>;

/// This crate's error structure which internal errors are converted into.
///
/// The error is split into a general message and a context string. For annotations the context
/// is populated with a snippet of the offending annotation, while for schema validation it's
/// populated with a list of problems that were found.
///
/// The Error implements both the [`fmt::Display`] and [`fmt::Debug`] traits. It also implements
/// [`error::Error`] so that it can be used with existing patterns for error handling.
#[derive(PartialEq, Eq, Clone)]
pub struct Error {
    pub(crate) message: String,
    pub(crate) location: Option<Location>,
    pub(crate) context: Option<String>,
    pub(crate) error_type: ErrorType,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ErrorType {
    /// A `@patch` annotation is malformed or refers to something that can't be used.
    Annotation,
    /// The schema being built is inconsistent.
    Schema,
    /// Introspection metadata could not be loaded.
    Introspection,
    /// Options could not be loaded.
    Configuration,
}

impl Error {
    /// Create a new Error with only a main message from an input string.
    pub fn new<S: Into<String>>(message: S, error_type: Option<ErrorType>) -> Self {
        Self {
            message: message.into(),
            location: None,
            context: None,
            error_type: error_type.unwrap_or(ErrorType::Schema),
        }
    }

    /// Create a new Error with a main message and a context string from two input strings.
    pub fn new_with_context<S: Into<String>>(
        message: S,
        location: Option<Location>,
        context: S,
        error_type: Option<ErrorType>,
    ) -> Self {
        Self {
            message: message.into(),
            location,
            context: Some(context.into()),
            error_type: error_type.unwrap_or(ErrorType::Schema),
        }
    }

    /// Returns the message of the current error. The context is discarded.
    pub fn message(&self) -> &str {
        self.message.as_ref()
    }

    /// Returns the context of the current error, if any.
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Returns the location of the current error.
    pub fn location(&self) -> &Option<Location> {
        &self.location
    }

    /// Returns the kind of the current error.
    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }

    /// Formats this error, with the option to include the context information as well,
    /// which will cause the string to be multi-line.
    pub fn print(&self, include_ctx: bool) -> String {
        let formatted = match self.error_type {
            ErrorType::Annotation => format!("Annotation Error: {}", self.message),
            ErrorType::Schema => format!("Schema Error: {}", self.message),
            ErrorType::Introspection => format!("Introspection Error: {}", self.message),
            ErrorType::Configuration => format!("Configuration Error: {}", self.message),
        };

        match self.context {
            Some(ref context) if include_ctx => format!("{}\n{}", formatted, context),
            _ => formatted,
        }
    }
}

/// Prints the line of `source` that contains `span` with a caret marker underneath it.
pub(crate) fn print_span(source: &str, span: Span) -> String {
    let line_start = source[..span.start].rfind('\n').map_or(0, |idx| idx + 1);
    let line_end = source[span.start..]
        .find('\n')
        .map_or(source.len(), |idx| idx + span.start);

    let line_num = (source[..span.start].matches('\n').count() + 1).to_string();
    let marker_len = span.end.min(line_end).saturating_sub(span.start).max(1);

    let mut out = String::new();
    out.push(' ');
    out.push_str(&line_num);
    out.push_str(" | ");
    out.push_str(&source[line_start..line_end]);
    out.push('\n');
    out.push_str(&" ".repeat(line_num.len() + 1));
    out.push_str(" | ");
    out.push_str(&" ".repeat(span.start - line_start));
    out.push_str(&"^".repeat(marker_len));
    out
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

pub(crate) fn get_location(source: &str, span: Span) -> Location {
    let line_start = source[..span.start].rfind('\n').map_or(0, |idx| idx + 1);
    Location {
        line: source[..span.start].matches('\n').count() + 1,
        column: span.start - line_start + 1,
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.print(true))
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\n{}\n", self)
    }
}

impl error::Error for Error {}
