use serde_json::{json, Value as JSValue};

use super::*;
use crate::context::BuildContext;
use crate::error::{ErrorType, Result};
use crate::inflection::DefaultInflector;
use crate::introspection::Introspection;
use crate::schema::*;
use crate::tags::TagValue;

fn introspection() -> Introspection {
    Introspection::from_json(include_str!("../../fixture/introspection.json")).unwrap()
}

fn echo(arguments: Arguments) -> Result<JSValue> {
    Ok(JSValue::Object(arguments))
}

fn arguments(value: JSValue) -> Arguments {
    match value {
        JSValue::Object(arguments) => arguments,
        _ => panic!("arguments must be an object"),
    }
}

fn mutation<'a>(
    ctx: &'a BuildContext,
    introspection: &'a Introspection,
    name: &'a str,
    procedure: &str,
    input_type: &'a str,
) -> FieldDefinition<'a> {
    let procedure = introspection.find_procedure("app", procedure).unwrap();
    FieldDefinition::new(name, TypeRef::named(ctx, "MutationPayload"))
        .argument(
            "input",
            TypeRef::named(ctx, input_type).into_nonnull(ctx),
        )
        .scope(FieldScope::Procedure(procedure))
}

/// The types that are generated for the fixture's tables, composite types, and procedures.
fn definitions<'a>(
    ctx: &'a BuildContext,
    introspection: &'a Introspection,
) -> Vec<TypeDefinition<'a>> {
    let named = |name: &'a str| TypeRef::named(ctx, name);
    let person_entry = introspection.find_type("app", "person_entry").unwrap();

    vec![
        TypeDefinition::Scalar("JSON"),
        TypeDefinition::InputObject(
            InputObjectDefinition::new("EntityTablePatch", InputObjectScope::None)
                .field("firstColumn", named("Int"))
                .field("secondColumn", named("Int")),
        ),
        TypeDefinition::InputObject(
            InputObjectDefinition::new("PersonPatch", InputObjectScope::None)
                .field("id", named("Int"))
                .field("fullName", named("String"))
                .field("emailAddress", named("String")),
        ),
        TypeDefinition::InputObject(
            InputObjectDefinition::new("UpdateEntityInput", InputObjectScope::MutationInput)
                .field("clientMutationId", named("String"))
                .field("id", named("ID").into_nonnull(ctx))
                .field("patch", named("JSON")),
        ),
        TypeDefinition::InputObject(
            InputObjectDefinition::new(
                "PersonEntryInput",
                InputObjectScope::CompositeType(person_entry),
            )
            .field("label", named("String"))
            .field("details", named("JSON")),
        ),
        TypeDefinition::InputObject(
            InputObjectDefinition::new("RegisterPeopleInput", InputObjectScope::MutationInput)
                .field("clientMutationId", named("String"))
                .field(
                    "people",
                    named("PersonEntryInput").into_nonnull(ctx).into_list(ctx),
                ),
        ),
        TypeDefinition::InputObject(
            InputObjectDefinition::new("EntityFilterInput", InputObjectScope::None)
                .field(
                    "and",
                    named("EntityFilterInput").into_nonnull(ctx).into_list(ctx),
                )
                .field("firstColumn", named("Int")),
        ),
        TypeDefinition::InputObject(
            InputObjectDefinition::new("ArchiveEntitiesInput", InputObjectScope::MutationInput)
                .field("filter", named("EntityFilterInput")),
        ),
        TypeDefinition::InputObject(
            InputObjectDefinition::new("RenameEntityInput", InputObjectScope::MutationInput)
                .field("id", named("ID"))
                .field("patch", named("JSON")),
        ),
        TypeDefinition::InputObject(
            InputObjectDefinition::new("UpdatePairInput", InputObjectScope::MutationInput)
                .field("left", named("JSON"))
                .field("right", named("JSON"))
                .field("note", named("String")),
        ),
        TypeDefinition::Object(
            ObjectDefinition::new("MutationPayload")
                .field(FieldDefinition::new("clientMutationId", named("String"))),
        ),
        TypeDefinition::Object(
            ObjectDefinition::new("Query").field(FieldDefinition::new("ping", named("Boolean"))),
        ),
        TypeDefinition::Object(
            ObjectDefinition::new("Mutation")
                .field(mutation(ctx, introspection, "updateEntity", "update_entity", "UpdateEntityInput"))
                .field(mutation(ctx, introspection, "registerPeople", "register_people", "RegisterPeopleInput"))
                .field(mutation(ctx, introspection, "archiveEntities", "archive_entities", "ArchiveEntitiesInput"))
                .field(mutation(ctx, introspection, "renameEntity", "rename_entity", "RenameEntityInput"))
                .field(mutation(ctx, introspection, "updatePair", "update_pair", "UpdatePairInput"))
                .field(
                    FieldDefinition::new("touchEntity", named("MutationPayload"))
                        .argument("input", named("UpdateEntityInput").into_nonnull(ctx)),
                ),
        ),
    ]
}

fn build<'a>(
    ctx: &'a BuildContext,
    plugin: &PatchPlugin<'a, DefaultInflector>,
    definitions: Vec<TypeDefinition<'a>>,
) -> Result<&'a Schema<'a>> {
    let mut builder = SchemaBuilder::new(ctx);
    builder.add_hook(plugin);
    for definition in definitions {
        builder.add_type(definition);
    }
    builder.build()
}

fn mutation_field<'a>(schema: &'a Schema<'a>, name: &str) -> &'a SchemaField<'a> {
    schema.mutation_type().unwrap().get_field(name).unwrap()
}

fn field_type<'a>(schema: &'a Schema<'a>, type_name: &str, field_name: &str) -> TypeRef<'a> {
    *schema
        .get_input_object(type_name)
        .unwrap()
        .get_field(field_name)
        .unwrap()
        .input_type
}

#[test]
fn substitutes_only_the_annotated_field() {
    let ctx = BuildContext::new();
    let introspection = introspection();
    let plugin = PatchPlugin::new(&ctx, &introspection, DefaultInflector);
    let schema = build(&ctx, &plugin, definitions(&ctx, &introspection)).unwrap();

    assert_eq!(
        field_type(schema, "UpdateEntityInput", "patch"),
        TypeRef::Type("EntityTablePatch")
    );
    let table = introspection.find_class("app", "entity_table").unwrap();
    assert_eq!(
        field_type(schema, "UpdateEntityInput", "patch").named_type(),
        patch_type_name(&DefaultInflector, table)
    );
    assert_eq!(
        field_type(schema, "UpdateEntityInput", "id"),
        TypeRef::NonNullType(&TypeRef::Type("ID"))
    );
    assert_eq!(
        field_type(schema, "UpdateEntityInput", "clientMutationId"),
        TypeRef::Type("String")
    );
}

#[test]
fn substitutes_every_annotation() {
    let ctx = BuildContext::new();
    let introspection = introspection();
    let plugin = PatchPlugin::new(&ctx, &introspection, DefaultInflector);
    let schema = build(&ctx, &plugin, definitions(&ctx, &introspection)).unwrap();

    assert_eq!(
        field_type(schema, "UpdatePairInput", "left"),
        TypeRef::Type("EntityTablePatch")
    );
    assert_eq!(
        field_type(schema, "UpdatePairInput", "right"),
        TypeRef::Type("PersonPatch")
    );
    assert_eq!(
        field_type(schema, "UpdatePairInput", "note"),
        TypeRef::Type("String")
    );
    assert_eq!(
        field_type(schema, "PersonEntryInput", "details"),
        TypeRef::Type("PersonPatch")
    );
}

#[test]
fn unannotated_mutations_are_not_wrapped() {
    let ctx = BuildContext::new();
    let introspection = introspection();
    let plugin = PatchPlugin::new(&ctx, &introspection, DefaultInflector);
    let schema = build(&ctx, &plugin, definitions(&ctx, &introspection)).unwrap();

    let resolver = plugin
        .wrap(schema, mutation_field(schema, "archiveEntities"), echo)
        .unwrap();
    assert!(!resolver.is_patched());

    let input = json!({
        "input": { "filter": { "and": [{ "firstColumn": 1 }], "firstColumn": 2 } },
        "other": { "firstColumn": 3 }
    });
    assert_eq!(resolver.resolve(arguments(input.clone())).unwrap(), input);
}

#[test]
fn rewrites_patch_to_columns() {
    let ctx = BuildContext::new();
    let introspection = introspection();
    let plugin = PatchPlugin::new(&ctx, &introspection, DefaultInflector);
    let schema = build(&ctx, &plugin, definitions(&ctx, &introspection)).unwrap();

    let resolver = plugin
        .wrap(schema, mutation_field(schema, "updateEntity"), echo)
        .unwrap();
    assert!(resolver.is_patched());

    let result = resolver
        .resolve(arguments(json!({
            "input": { "id": "u1", "patch": { "firstColumn": 1, "secondColumn": 2 } },
            "patch": { "firstColumn": 1 }
        })))
        .unwrap();
    assert_eq!(
        result,
        json!({
            "input": { "id": "u1", "patch": { "first_column": 1, "second_column": 2 } },
            "patch": { "firstColumn": 1 }
        })
    );
}

#[test]
fn rewrites_partial_patch() {
    let ctx = BuildContext::new();
    let introspection = introspection();
    let plugin = PatchPlugin::new(&ctx, &introspection, DefaultInflector);
    let schema = build(&ctx, &plugin, definitions(&ctx, &introspection)).unwrap();

    let rewriter = plugin
        .rewriter(schema, mutation_field(schema, "updateEntity"))
        .unwrap()
        .unwrap();
    let result = rewriter.rewrite_arguments(arguments(json!({
        "input": { "patch": { "firstColumn": 1 } }
    })));
    assert_eq!(
        JSValue::Object(result),
        json!({ "input": { "patch": { "first_column": 1 } } })
    );
}

#[test]
fn rewrites_list_elements_of_nested_composite_types() {
    let ctx = BuildContext::new();
    let introspection = introspection();
    let plugin = PatchPlugin::new(&ctx, &introspection, DefaultInflector);
    let schema = build(&ctx, &plugin, definitions(&ctx, &introspection)).unwrap();

    let rewriter = plugin
        .rewriter(schema, mutation_field(schema, "registerPeople"))
        .unwrap()
        .unwrap();
    assert_eq!(rewriter.patches().len(), 1);
    assert!(rewriter
        .patches()
        .get("PersonEntryInput", "details")
        .is_some());

    let result = rewriter.rewrite_arguments(arguments(json!({
        "input": {
            "clientMutationId": "m1",
            "people": [
                { "label": "a", "details": { "fullName": "Ada", "emailAddress": "ada@example.com" } },
                { "label": "b", "details": { "id": 2 } },
                { "label": "c", "details": null }
            ]
        }
    })));
    assert_eq!(
        JSValue::Object(result),
        json!({
            "input": {
                "clientMutationId": "m1",
                "people": [
                    { "label": "a", "details": { "full_name": "Ada", "email_address": "ada@example.com" } },
                    { "label": "b", "details": { "id": 2 } },
                    { "label": "c", "details": null }
                ]
            }
        })
    );
}

#[test]
fn walks_objects_and_interfaces_without_patching_them() {
    let ctx = BuildContext::new();
    let introspection = introspection();
    let plugin = PatchPlugin::new(&ctx, &introspection, DefaultInflector);
    let mut schema = build(&ctx, &plugin, definitions(&ctx, &introspection))
        .unwrap()
        .clone();

    // output types don't reference input objects in a valid schema, so these are added by hand
    let mut interface = SchemaInterface::new(&ctx, "EntryNode");
    interface.add_field(
        &ctx,
        SchemaField::new(
            &ctx,
            "details",
            TypeRef::named(&ctx, "PersonEntryInput").into_list(&ctx),
        ),
    );
    let interface = ctx.alloc(interface);
    schema
        .types
        .insert("EntryNode", ctx.alloc(SchemaType::Interface(interface)));

    let mut object = SchemaObject::new(&ctx, "EntryPayload");
    object.add_field(
        &ctx,
        SchemaField::new(&ctx, "node", TypeRef::named(&ctx, "EntryNode")),
    );
    let object = ctx.alloc(object);
    schema
        .types
        .insert("EntryPayload", ctx.alloc(SchemaType::Object(object)));
    let schema = ctx.alloc(schema);

    let root = TypeRef::named(&ctx, "EntryPayload");
    let patches = PatchMap::collect(&plugin, schema, root).unwrap();
    assert_eq!(patches.len(), 1);
    assert!(patches.get("PersonEntryInput", "details").is_some());
    assert!(patches.get("EntryNode", "details").is_none());
    assert!(patches.get("EntryPayload", "node").is_none());

    let rewriter = ArgumentRewriter::new(schema, root, patches);
    let value = rewriter.rewrite_value(
        root,
        json!({
            "node": {
                "details": [{ "label": "a", "details": { "fullName": "Ada" } }]
            }
        }),
    );
    assert_eq!(
        value,
        json!({
            "node": {
                "details": [{ "label": "a", "details": { "full_name": "Ada" } }]
            }
        })
    );
}

#[test]
fn rewrites_single_value_in_place_of_list() {
    let ctx = BuildContext::new();
    let introspection = introspection();
    let plugin = PatchPlugin::new(&ctx, &introspection, DefaultInflector);
    let schema = build(&ctx, &plugin, definitions(&ctx, &introspection)).unwrap();

    let rewriter = plugin
        .rewriter(schema, mutation_field(schema, "registerPeople"))
        .unwrap()
        .unwrap();
    let result = rewriter.rewrite_arguments(arguments(json!({
        "input": { "people": { "details": { "fullName": "Ada" }, "unknown": { "fullName": 1 } } }
    })));
    assert_eq!(
        JSValue::Object(result),
        json!({
            "input": { "people": { "details": { "full_name": "Ada" }, "unknown": { "fullName": 1 } } }
        })
    );
}

#[test]
fn rewrites_multiple_annotations() {
    let ctx = BuildContext::new();
    let introspection = introspection();
    let plugin = PatchPlugin::new(&ctx, &introspection, DefaultInflector);
    let schema = build(&ctx, &plugin, definitions(&ctx, &introspection)).unwrap();

    let resolver = plugin
        .wrap(schema, mutation_field(schema, "updatePair"), echo)
        .unwrap();
    let result = resolver
        .resolve(arguments(json!({
            "input": {
                "left": { "secondColumn": 2 },
                "right": { "fullName": "Ada", "firstColumn": 1 },
                "note": "both"
            }
        })))
        .unwrap();
    assert_eq!(
        result,
        json!({
            "input": {
                "left": { "second_column": 2 },
                "right": { "full_name": "Ada" },
                "note": "both"
            }
        })
    );
}

#[test]
fn rewritten_values_do_not_match_again() {
    let ctx = BuildContext::new();
    let introspection = introspection();
    let plugin = PatchPlugin::new(&ctx, &introspection, DefaultInflector);
    let schema = build(&ctx, &plugin, definitions(&ctx, &introspection)).unwrap();

    let rewriter = plugin
        .rewriter(schema, mutation_field(schema, "updateEntity"))
        .unwrap()
        .unwrap();
    let once = rewriter.rewrite_arguments(arguments(json!({
        "input": { "id": "u1", "patch": { "firstColumn": 1, "secondColumn": 2 } }
    })));
    let twice = rewriter.rewrite_arguments(once.clone());

    assert_ne!(once, twice);
    assert_eq!(
        JSValue::Object(twice),
        json!({ "input": { "id": "u1", "patch": {} } })
    );
}

#[test]
fn unresolved_tables_are_not_substituted() {
    let ctx = BuildContext::new();
    let introspection = introspection();
    let plugin = PatchPlugin::new(&ctx, &introspection, DefaultInflector);
    let schema = build(&ctx, &plugin, definitions(&ctx, &introspection)).unwrap();

    assert_eq!(
        field_type(schema, "RenameEntityInput", "patch"),
        TypeRef::Type("JSON")
    );

    let resolver = plugin
        .wrap(schema, mutation_field(schema, "renameEntity"), echo)
        .unwrap();
    assert!(!resolver.is_patched());

    let input = json!({ "input": { "id": "u1", "patch": { "firstColumn": 1 } } });
    assert_eq!(resolver.resolve(arguments(input.clone())).unwrap(), input);
}

#[test]
fn unresolved_tables_fail_with_error_policy() {
    let ctx = BuildContext::new();
    let introspection = introspection();
    let options = PatchOptions {
        unresolved_table: UnresolvedTable::Error,
        ..PatchOptions::default()
    };
    let plugin = PatchPlugin::new(&ctx, &introspection, DefaultInflector).with_options(options);

    let error = build(&ctx, &plugin, definitions(&ctx, &introspection)).unwrap_err();
    assert_eq!(error.error_type(), ErrorType::Annotation);
    assert!(error.message().contains("app.missing_table"));
}

#[test]
fn missing_patch_type_fails_validation() {
    let ctx = BuildContext::new();
    let introspection = introspection();
    let plugin = PatchPlugin::new(&ctx, &introspection, DefaultInflector);
    let definitions = definitions(&ctx, &introspection)
        .into_iter()
        .filter(|definition| definition.name() != "EntityTablePatch")
        .collect();

    let error = build(&ctx, &plugin, definitions).unwrap_err();
    assert_eq!(error.error_type(), ErrorType::Schema);
    assert_eq!(error.message(), "Schema failed validation");
    assert_eq!(
        error.context(),
        Some(
            "- Field `left` of type `UpdatePairInput` has an invalid type.\n\
             - Field `patch` of type `UpdateEntityInput` has an invalid type."
        )
    );
}

#[test]
fn malformed_annotations_fail_the_build() {
    let ctx = BuildContext::new();
    let mut introspection = introspection();
    let procedure = introspection
        .procedures
        .iter_mut()
        .find(|procedure| procedure.name == "update_entity")
        .unwrap();
    procedure
        .tags
        .insert("patch".into(), TagValue::Text("patch app.entity.table".into()));

    let plugin = PatchPlugin::new(&ctx, &introspection, DefaultInflector);
    let error = build(&ctx, &plugin, definitions(&ctx, &introspection)).unwrap_err();
    assert_eq!(error.error_type(), ErrorType::Annotation);
    assert!(error.message().contains("patch app.entity.table"));
}

#[test]
fn custom_tag_name() {
    let ctx = BuildContext::new();
    let mut introspection = introspection();
    for procedure in introspection.procedures.iter_mut() {
        if let Some(value) = procedure.tags.remove("patch") {
            procedure.tags.insert("typedPatch".into(), value);
        }
    }

    let options = PatchOptions {
        tag_name: "typedPatch".into(),
        ..PatchOptions::default()
    };
    let plugin = PatchPlugin::new(&ctx, &introspection, DefaultInflector).with_options(options);
    let schema = build(&ctx, &plugin, definitions(&ctx, &introspection)).unwrap();

    assert_eq!(
        field_type(schema, "UpdateEntityInput", "patch"),
        TypeRef::Type("EntityTablePatch")
    );
    // composite types still use the default tag
    assert_eq!(
        field_type(schema, "PersonEntryInput", "details"),
        TypeRef::Type("JSON")
    );
}

#[test]
fn wraps_all_mutations() {
    let ctx = BuildContext::new();
    let introspection = introspection();
    let plugin = PatchPlugin::new(&ctx, &introspection, DefaultInflector);
    let schema = build(&ctx, &plugin, definitions(&ctx, &introspection)).unwrap();

    let resolvers = plugin.wrap_mutations(schema, |_| echo).unwrap();
    assert_eq!(resolvers.len(), 6);

    let mut patched: Vec<&str> = resolvers
        .iter()
        .filter(|(_, resolver)| resolver.is_patched())
        .map(|(name, _)| *name)
        .collect();
    patched.sort_unstable();
    assert_eq!(patched, vec!["registerPeople", "updateEntity", "updatePair"]);

    // not generated from a procedure
    assert!(!resolvers["touchEntity"].is_patched());
}
