//! # Schema Definitions
//!
//! The `graphql_patch::schema` module contains the type registry of a database-generated schema
//! and the [SchemaBuilder] that creates it. Schemas are built in two phases: all type names are
//! registered first, then every type is built while [InputFieldsHook]s may replace the fields of
//! input objects. This is where `@patch` annotations substitute their patch types.
//!
//! ```
//! use graphql_patch::{context::BuildContext, schema::*};
//!
//! let ctx = BuildContext::new();
//! let mut builder = SchemaBuilder::new(&ctx);
//! builder.add_type(TypeDefinition::Object(
//!     ObjectDefinition::new("Query").field(FieldDefinition::new("count", TypeRef::named(&ctx, "Int"))),
//! ));
//!
//! let schema = builder.build().unwrap();
//! assert!(schema.query_type().is_some());
//! ```
//!
//! [More information on the Schema struct.](Schema)

pub mod builder;
#[allow(clippy::module_inception)]
pub mod schema;

pub use builder::*;
pub use schema::*;
