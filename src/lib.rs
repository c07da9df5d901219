//! `graphql_patch`
//! =========
//!
//! _Typed patch inputs for database-generated GraphQL schemas._
//!
//! Database procedures often take an opaque `json` argument that's meant to be a partial row of
//! some table. The **`graphql_patch`** library lets such an argument be annotated with a smart
//! comment, e.g. `@patch patch app.entity_table`, and then:
//!
//! - Substitutes the table's generated patch input type (`EntityTablePatch`) for the argument's
//!   type while the schema is built
//! - Rewrites the values submitted for it from inflected field names back to raw column names
//!   before the procedure is called
//!
//! The rewrite only touches the sub-trees of a mutation's `input` argument that were annotated,
//! however deeply they're nested in input objects and lists.
//!
//! ```
//! use graphql_patch::{context::BuildContext, inflection::DefaultInflector};
//! use graphql_patch::{introspection::Introspection, patch::*, schema::*};
//! use serde_json::json;
//!
//! let ctx = BuildContext::new();
//! let introspection = Introspection::from_json(r#"{
//!     "procedures": [{
//!         "name": "update_user",
//!         "namespaceName": "app",
//!         "argNames": ["patch"],
//!         "comment": "@patch patch app.users"
//!     }],
//!     "classes": [{
//!         "name": "users",
//!         "namespaceName": "app",
//!         "attributes": [{ "name": "first_name", "num": 1 }]
//!     }]
//! }"#).unwrap();
//! let update_user = introspection.find_procedure("app", "update_user").unwrap();
//!
//! let plugin = PatchPlugin::new(&ctx, &introspection, DefaultInflector);
//! let mut builder = SchemaBuilder::new(&ctx);
//! builder
//!     .add_hook(&plugin)
//!     .add_type(TypeDefinition::Scalar("JSON"))
//!     .add_type(TypeDefinition::InputObject(
//!         InputObjectDefinition::new("UsersPatch", InputObjectScope::None)
//!             .field("firstName", TypeRef::named(&ctx, "String")),
//!     ))
//!     .add_type(TypeDefinition::InputObject(
//!         InputObjectDefinition::new("UpdateUserInput", InputObjectScope::MutationInput)
//!             .field("patch", TypeRef::named(&ctx, "JSON")),
//!     ))
//!     .add_type(TypeDefinition::Object(ObjectDefinition::new("Mutation").field(
//!         FieldDefinition::new("updateUser", TypeRef::named(&ctx, "Boolean"))
//!             .argument("input", TypeRef::named(&ctx, "UpdateUserInput"))
//!             .scope(FieldScope::Procedure(update_user)),
//!     )));
//! let schema = builder.build().unwrap();
//!
//! let field = schema.mutation_type().unwrap().get_field("updateUser").unwrap();
//! let rewriter = plugin.rewriter(schema, field).unwrap().unwrap();
//!
//! let arguments = json!({ "input": { "patch": { "firstName": "Ada" } } });
//! let rewritten = rewriter.rewrite_arguments(arguments.as_object().unwrap().clone());
//! assert_eq!(rewritten["input"], json!({ "patch": { "first_name": "Ada" } }));
//! ```
//!
//! [A good place to start learning more about this crate is the `patch` module...](patch)

pub mod context;
pub mod error;
pub mod inflection;
pub mod introspection;
pub mod patch;
pub mod schema;
pub mod tags;

pub use bumpalo;
