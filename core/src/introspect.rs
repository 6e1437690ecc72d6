#![deny(missing_docs)]

//! # Structural Introspection
//!
//! Flattens compound types into parameter lists by walking their static
//! descriptors and resolving every member through the extension chain.
//!
//! Three entry points share the same machinery:
//! * [`introspect_bean`] unwraps a `BeanParam` member during chain resolution.
//! * [`collect_constructor_parameters`] picks the richest usable constructor.
//! * [`collect_field_parameters`] resolves every declared field.

use crate::error::AppResult;
use crate::extension::chain::ExtensionChain;
use crate::extension::request::{ExtractionRequest, ScanContext, TypeExclusionSet};
use crate::model::parameter::{Parameter, ResolvedParameter};
use crate::model::types::{AnnotatedMember, TypeName};
use crate::processor::{apply_annotations, layer_annotations};

/// Outcome of unwrapping one compound type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Introspection {
    /// Parameters and form fields collected from the members.
    pub resolved: ResolvedParameter,
    /// True once at least one member was resolved through the chain, even if
    /// it produced nothing.
    pub handled: bool,
}

/// Unwraps the request's type into its members and resolves each through the
/// full chain.
///
/// Nested members never become request bodies. The type is added to the
/// exclusion set for the nested calls, so a type that contains itself
/// (directly or through other types) is unwrapped once per call path.
pub fn introspect_bean(
    request: &ExtractionRequest<'_>,
    chain: ExtensionChain<'_>,
) -> AppResult<Introspection> {
    if request.exclusions.contains(request.ty) {
        tracing::debug!(ty = %request.ty, "Type already being unwrapped; skipping");
        return Ok(Introspection::default());
    }
    let Some(descriptor) = request.descriptor() else {
        return Ok(Introspection::default());
    };

    let exclusions = request.exclusions.with(request.ty);
    let mut outcome = Introspection::default();

    for property in &descriptor.properties {
        let Some(member) = property.member() else {
            tracing::trace!(ty = %request.ty, property = %property.name, "Property has no type");
            continue;
        };
        if member.is_context() {
            continue;
        }

        let nested = ExtractionRequest::for_member(&member, &exclusions, request.context);
        let resolved = chain.restart().extract_parameters(&nested)?;

        let reapply = |params: Vec<Parameter>| -> Vec<Parameter> {
            params
                .into_iter()
                .filter_map(|p| layer_annotations(p, &member.annotations))
                .collect()
        };
        outcome.resolved.merge(ResolvedParameter {
            parameters: reapply(resolved.parameters),
            form_parameters: reapply(resolved.form_parameters),
            request_body: None,
        });
        outcome.handled = true;
    }

    Ok(outcome)
}

/// Parameters declared on the best constructor of `ty`.
///
/// Inner and local types have no usable constructor and yield nothing.
/// Public constructors, protected ones without parameters and injectable ones
/// are candidates. Each is scored by its context parameters plus the
/// parameters that resolved to something; the highest score wins and a later
/// constructor wins a tie.
pub fn collect_constructor_parameters(
    ty: &TypeName,
    context: ScanContext<'_>,
    chain: ExtensionChain<'_>,
) -> AppResult<Vec<Parameter>> {
    let Some(descriptor) = context.catalog.get(ty) else {
        return Ok(Vec::new());
    };
    if descriptor.nesting.needs_enclosing_instance() {
        return Ok(Vec::new());
    }

    let mut selected = Vec::new();
    let mut best = 0;

    for constructor in &descriptor.constructors {
        if !constructor.is_compatible() && !constructor.is_injectable() {
            continue;
        }

        let mut score = 0;
        let mut parameters = Vec::new();
        for member in &constructor.parameters {
            if member.is_context() {
                score += 1;
                continue;
            }
            let collected = collect_parameters(member, context, chain)?;
            if collected.is_empty() {
                continue;
            }
            parameters.extend(collected.into_iter().filter_map(|p| {
                apply_annotations(p, &member.ty, &member.annotations, context)
            }));
            score += 1;
        }

        if score >= best {
            best = score;
            selected = parameters;
        }
    }

    Ok(selected)
}

/// Parameters declared on the fields of `ty`, in declaration order.
pub fn collect_field_parameters(
    ty: &TypeName,
    context: ScanContext<'_>,
    chain: ExtensionChain<'_>,
) -> AppResult<Vec<Parameter>> {
    let Some(descriptor) = context.catalog.get(ty) else {
        return Ok(Vec::new());
    };
    let mut parameters = Vec::new();
    for member in descriptor.declared_fields() {
        parameters.extend(collect_parameters(&member, context, chain)?);
    }
    Ok(parameters)
}

/// Resolves one member from the chain head with a fresh exclusion set.
fn collect_parameters(
    member: &AnnotatedMember,
    context: ScanContext<'_>,
    chain: ExtensionChain<'_>,
) -> AppResult<Vec<Parameter>> {
    let exclusions = TypeExclusionSet::new();
    let request = ExtractionRequest::for_member(member, &exclusions, context);
    Ok(chain.restart().extract_parameters(&request)?.parameters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::ComponentRegistry;
    use crate::config::ReaderConfig;
    use crate::extension::chain::ExtensionRegistry;
    use crate::model::annotations::{Annotation, AnnotationRef, ParameterAnnotation};
    use crate::model::parameter::ParameterIn;
    use crate::model::types::{
        ConstructorDescriptor, Nesting, PropertyDescriptor, TypeCatalog, TypeDescriptor,
        Visibility,
    };

    fn query(name: &str) -> AnnotationRef {
        AnnotationRef::new(ParameterAnnotation {
            name: Some(name.into()),
            location: Some(ParameterIn::Query),
            ..Default::default()
        })
    }

    fn names(params: &[Parameter]) -> Vec<&str> {
        params.iter().filter_map(|p| p.name.as_deref()).collect()
    }

    #[test]
    fn test_bean_members_become_parameters() {
        let catalog = TypeCatalog::new().with(
            TypeDescriptor::new("Filter")
                .with_property(PropertyDescriptor::new("limit").field("i32", vec![query("limit")]))
                .with_property(PropertyDescriptor::new("ghost").setter(None, vec![query("ghost")]))
                .with_property(PropertyDescriptor::new("plain").field("String", vec![])),
        );
        let components = ComponentRegistry::new();
        let config = ReaderConfig::default();
        let ctx = ScanContext::new(&catalog, &components, &config);
        let registry = ExtensionRegistry::new();
        let exclusions = TypeExclusionSet::new();
        let ty = TypeName::new("Filter");
        let request = ExtractionRequest::new(&[], &ty, &exclusions, ctx);

        let outcome = introspect_bean(&request, registry.chain(64)).unwrap();
        assert!(outcome.handled);
        assert_eq!(names(&outcome.resolved.parameters), vec!["limit"]);
        assert!(outcome.resolved.request_body.is_none());
    }

    #[test]
    fn test_excluded_type_is_not_handled() {
        let catalog = TypeCatalog::new().with(
            TypeDescriptor::new("Filter")
                .with_property(PropertyDescriptor::new("limit").field("i32", vec![query("limit")])),
        );
        let components = ComponentRegistry::new();
        let config = ReaderConfig::default();
        let ctx = ScanContext::new(&catalog, &components, &config);
        let registry = ExtensionRegistry::new();
        let ty = TypeName::new("Filter");
        let exclusions = TypeExclusionSet::new().with(&ty);
        let request = ExtractionRequest::new(&[], &ty, &exclusions, ctx);

        let outcome = introspect_bean(&request, registry.chain(64)).unwrap();
        assert!(!outcome.handled);
        assert!(outcome.resolved.is_empty());
    }

    #[test]
    fn test_constructor_with_most_resolved_parameters_wins() {
        let small = ConstructorDescriptor {
            parameters: vec![AnnotatedMember::new("a", "i32", vec![query("a")])],
            ..Default::default()
        };
        let large = ConstructorDescriptor {
            parameters: vec![
                AnnotatedMember::new("b", "i32", vec![query("b")]),
                AnnotatedMember::new("c", "i32", vec![query("c")]),
            ],
            ..Default::default()
        };
        let private = ConstructorDescriptor {
            visibility: Visibility::Private,
            parameters: vec![
                AnnotatedMember::new("x", "i32", vec![query("x")]),
                AnnotatedMember::new("y", "i32", vec![query("y")]),
                AnnotatedMember::new("z", "i32", vec![query("z")]),
            ],
            ..Default::default()
        };
        let catalog = TypeCatalog::new().with(
            TypeDescriptor::new("Resource")
                .with_constructor(large)
                .with_constructor(small)
                .with_constructor(private),
        );
        let components = ComponentRegistry::new();
        let config = ReaderConfig::default();
        let ctx = ScanContext::new(&catalog, &components, &config);
        let registry = ExtensionRegistry::new();

        let params =
            collect_constructor_parameters(&"Resource".into(), ctx, registry.chain(64)).unwrap();
        assert_eq!(names(&params), vec!["b", "c"]);
    }

    #[test]
    fn test_constructor_tie_goes_to_later() {
        let first = ConstructorDescriptor {
            parameters: vec![AnnotatedMember::new("a", "i32", vec![query("a")])],
            ..Default::default()
        };
        let second = ConstructorDescriptor {
            visibility: Visibility::Private,
            annotations: vec![AnnotationRef::new(Annotation::Inject)],
            parameters: vec![AnnotatedMember::new(
                "ctx",
                "Request",
                vec![AnnotationRef::new(Annotation::Context)],
            )],
        };
        let catalog = TypeCatalog::new().with(
            TypeDescriptor::new("Resource")
                .with_constructor(first)
                .with_constructor(second),
        );
        let components = ComponentRegistry::new();
        let config = ReaderConfig::default();
        let ctx = ScanContext::new(&catalog, &components, &config);
        let registry = ExtensionRegistry::new();

        let params =
            collect_constructor_parameters(&"Resource".into(), ctx, registry.chain(64)).unwrap();
        assert!(params.is_empty());
    }

    #[test]
    fn test_inner_type_has_no_constructor_parameters() {
        let catalog = TypeCatalog::new().with(
            TypeDescriptor::new("Inner")
                .with_nesting(Nesting::Inner)
                .with_constructor(ConstructorDescriptor {
                    parameters: vec![AnnotatedMember::new("a", "i32", vec![query("a")])],
                    ..Default::default()
                }),
        );
        let components = ComponentRegistry::new();
        let config = ReaderConfig::default();
        let ctx = ScanContext::new(&catalog, &components, &config);
        let registry = ExtensionRegistry::new();

        let params =
            collect_constructor_parameters(&"Inner".into(), ctx, registry.chain(64)).unwrap();
        assert!(params.is_empty());
    }

    #[test]
    fn test_field_parameters() {
        let catalog = TypeCatalog::new().with(
            TypeDescriptor::new("Resource")
                .with_property(PropertyDescriptor::new("page").field("i32", vec![query("page")]))
                .with_property(PropertyDescriptor::new("size").getter("i32", vec![query("size")]))
                .with_property(PropertyDescriptor::new("sort").field("String", vec![query("sort")])),
        );
        let components = ComponentRegistry::new();
        let config = ReaderConfig::default();
        let ctx = ScanContext::new(&catalog, &components, &config);
        let registry = ExtensionRegistry::new();

        let params =
            collect_field_parameters(&"Resource".into(), ctx, registry.chain(64)).unwrap();
        assert_eq!(names(&params), vec!["page", "sort"]);
    }
}
