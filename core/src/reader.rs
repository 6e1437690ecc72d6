#![deny(missing_docs)]

//! # Operation Reader
//!
//! Runs the whole pipeline for one handler method: path, verb, parameters,
//! request body, responses, then the decoration hook.

use crate::assembler::{get_api_responses, get_request_body};
use crate::components::ComponentRegistry;
use crate::config::ReaderConfig;
use crate::error::AppResult;
use crate::extension::chain::ExtensionRegistry;
use crate::extension::request::{ExtractionRequest, ScanContext, TypeExclusionSet, ViewToken};
use crate::model::annotations::RequestMappingAnnotation;
use crate::model::operation::{ClassDescriptor, MethodDescriptor, OperationFragment};
use crate::model::parameter::{Parameter, ResolvedParameter};
use crate::model::types::TypeCatalog;
use crate::routes::{extract_operation_method, get_path, is_ignored};

/// Where a method sits: its class mapping and any parent resource path.
#[derive(Debug, Clone, Copy, Default)]
pub struct OperationSite<'a> {
    /// Class-level path mapping.
    pub class_mapping: Option<&'a RequestMappingAnnotation>,
    /// Path of the parent resource, for subresources.
    pub parent_path: Option<&'a str>,
    /// The method is reached through a subresource locator.
    pub is_subresource: bool,
    /// Serialization view, passed through.
    pub view: Option<&'a ViewToken>,
}

/// Everything read from one handler method.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadOperation {
    /// Path, verb, request body and responses.
    pub fragment: OperationFragment,
    /// Path, query, header and cookie parameters.
    pub parameters: Vec<Parameter>,
    /// Form fields, without a location.
    pub form_parameters: Vec<Parameter>,
    /// Parameter inferred as the request body.
    pub request_body_parameter: Option<Parameter>,
}

/// Reads operations using one extension registry and configuration.
#[derive(Debug)]
pub struct OperationReader {
    registry: ExtensionRegistry,
    config: ReaderConfig,
}

impl OperationReader {
    /// Creates a reader.
    pub fn new(registry: ExtensionRegistry, config: ReaderConfig) -> Self {
        Self { registry, config }
    }

    /// The extension registry.
    pub fn registry(&self) -> &ExtensionRegistry {
        &self.registry
    }

    /// The configuration.
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Reads one handler method.
    ///
    /// Returns `Ok(None)` when the method has no path, sits on an ignored
    /// route or has no resolvable verb. Fails only when an extension breaks
    /// the chain contract.
    pub fn read_operation(
        &self,
        method: &MethodDescriptor,
        site: OperationSite<'_>,
        catalog: &TypeCatalog,
        components: &ComponentRegistry,
    ) -> AppResult<Option<ReadOperation>> {
        let Some(path) = get_path(
            site.class_mapping,
            Some(method),
            site.parent_path,
            site.is_subresource,
        ) else {
            return Ok(None);
        };
        if is_ignored(&path, &self.config) {
            tracing::debug!(%path, method = %method.name, "Ignored route");
            return Ok(None);
        }

        let chain = self.registry.chain(self.config.max_chain_depth);
        let Some(verb) = extract_operation_method(method, chain)? else {
            return Ok(None);
        };

        let context = ScanContext::new(catalog, components, &self.config).with_view(site.view);
        let mut resolved = ResolvedParameter::new();
        for member in method.parameters.iter().filter(|m| !m.is_context()) {
            let exclusions = TypeExclusionSet::new();
            let request =
                ExtractionRequest::for_member(member, &exclusions, context).allow_request_body(true);
            resolved.merge(chain.extract_parameters(&request)?);
        }

        let mut fragment = OperationFragment {
            path: Some(path),
            method: Some(verb),
            request_body: get_request_body(method.request_body(), &self.config),
            responses: get_api_responses(&method.responses(), &self.config),
        };
        chain.decorate_operation(&mut fragment, method)?;

        tracing::trace!(
            path = ?fragment.path,
            %verb,
            parameters = resolved.parameters.len(),
            "Read operation"
        );

        Ok(Some(ReadOperation {
            fragment,
            parameters: resolved.parameters,
            form_parameters: resolved.form_parameters,
            request_body_parameter: resolved.request_body,
        }))
    }
}

impl OperationReader {
    /// Reads every handler method of a class, in declaration order.
    ///
    /// The class mapping is the site's class mapping. Methods that produce no
    /// operation are skipped.
    pub fn read_class(
        &self,
        class: &ClassDescriptor,
        view: Option<&ViewToken>,
        catalog: &TypeCatalog,
        components: &ComponentRegistry,
    ) -> AppResult<Vec<ReadOperation>> {
        let site = OperationSite {
            class_mapping: class.request_mapping.as_ref(),
            view,
            ..Default::default()
        };
        let mut operations = Vec::with_capacity(class.methods.len());
        for method in &class.methods {
            if let Some(operation) = self.read_operation(method, site, catalog, components)? {
                operations.push(operation);
            }
        }
        tracing::debug!(
            class = %class.name,
            operations = operations.len(),
            "Read class"
        );
        Ok(operations)
    }
}

impl Default for OperationReader {
    fn default() -> Self {
        Self::new(ExtensionRegistry::new(), ReaderConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extension::chain::{Extension, ExtensionChain};
    use crate::model::annotations::{
        Annotation, AnnotationRef, MappingAnnotation, MappingVerb, ParameterAnnotation,
        ResponseAnnotation,
    };
    use crate::model::operation::HttpMethod;
    use crate::model::parameter::ParameterIn;
    use crate::model::types::AnnotatedMember;
    use std::sync::{Arc, Mutex};

    fn get_user() -> MethodDescriptor {
        MethodDescriptor::new("getUser")
            .annotated(MappingAnnotation::new(MappingVerb::Get, "/{id}"))
            .annotated(ResponseAnnotation {
                response_code: Some("200".into()),
                description: Some("the user".into()),
                ..Default::default()
            })
            .with_parameter(AnnotatedMember::new(
                "id",
                "i64",
                vec![AnnotationRef::new(ParameterAnnotation {
                    location: Some(ParameterIn::Path),
                    required: true,
                    ..Default::default()
                })],
            ))
            .with_parameter(AnnotatedMember::new(
                "request",
                "HttpRequest",
                vec![AnnotationRef::new(Annotation::Context)],
            ))
    }

    #[test]
    fn test_reads_full_operation() {
        let reader = OperationReader::default();
        let class = RequestMappingAnnotation::new("/users");
        let site = OperationSite {
            class_mapping: Some(&class),
            ..Default::default()
        };
        let catalog = TypeCatalog::new();
        let components = ComponentRegistry::new();

        let op = reader
            .read_operation(&get_user(), site, &catalog, &components)
            .unwrap()
            .unwrap();
        assert_eq!(op.fragment.path.as_deref(), Some("/users/{id}"));
        assert_eq!(op.fragment.method, Some(HttpMethod::Get));
        assert!(op.fragment.request_body.is_none());
        assert!(op.fragment.responses.is_some());
        assert_eq!(op.parameters.len(), 1);
        assert_eq!(op.parameters[0].name.as_deref(), Some("id"));
        assert!(op.request_body_parameter.is_none());
    }

    #[test]
    fn test_ignored_route_is_skipped() {
        let config = ReaderConfig {
            ignored_routes: vec!["/users".into()],
            ..Default::default()
        };
        let reader = OperationReader::new(ExtensionRegistry::new(), config);
        let class = RequestMappingAnnotation::new("/users");
        let site = OperationSite {
            class_mapping: Some(&class),
            ..Default::default()
        };
        let op = reader
            .read_operation(&get_user(), site, &TypeCatalog::new(), &ComponentRegistry::new())
            .unwrap();
        assert!(op.is_none());
    }

    #[test]
    fn test_unresolved_verb_is_skipped() {
        let reader = OperationReader::default();
        let method = MethodDescriptor::new("helper").annotated(RequestMappingAnnotation::new("/x"));
        let op = reader
            .read_operation(
                &method,
                OperationSite::default(),
                &TypeCatalog::new(),
                &ComponentRegistry::new(),
            )
            .unwrap();
        assert!(op.is_none());
    }

    struct OperationIdPath;
    impl Extension for OperationIdPath {
        fn decorate_operation(
            &self,
            operation: &mut OperationFragment,
            method: &MethodDescriptor,
            chain: ExtensionChain<'_>,
        ) -> AppResult<()> {
            operation.path = operation.path.take().map(|p| format!("{}#{}", p, method.name));
            chain.decorate_operation(operation, method)
        }
    }

    #[test]
    fn test_decorate_hook_runs() {
        let reader = OperationReader::new(
            ExtensionRegistry::new().with(OperationIdPath),
            ReaderConfig::default(),
        );
        let op = reader
            .read_operation(
                &get_user(),
                OperationSite::default(),
                &TypeCatalog::new(),
                &ComponentRegistry::new(),
            )
            .unwrap()
            .unwrap();
        assert_eq!(op.fragment.path.as_deref(), Some("/{id}#getUser"));
    }

    #[derive(Default)]
    struct ViewRecorder {
        seen: Arc<Mutex<Vec<Option<ViewToken>>>>,
    }

    impl Extension for ViewRecorder {
        fn extract_parameters(
            &self,
            request: &ExtractionRequest<'_>,
            chain: ExtensionChain<'_>,
        ) -> AppResult<ResolvedParameter> {
            self.seen
                .lock()
                .unwrap()
                .push(request.context.view.cloned());
            chain.extract_parameters(request)
        }
    }

    #[test]
    fn test_view_reaches_extensions_unchanged() {
        let recorder = ViewRecorder::default();
        let seen = Arc::clone(&recorder.seen);
        let reader = OperationReader::new(
            ExtensionRegistry::new().with(recorder),
            ReaderConfig::default(),
        );
        let view = ViewToken::new(vec!["Public".into(), "Summary".into()]);
        let site = OperationSite {
            view: Some(&view),
            ..Default::default()
        };

        let op = reader
            .read_operation(&get_user(), site, &TypeCatalog::new(), &ComponentRegistry::new())
            .unwrap()
            .unwrap();
        assert_eq!(op.parameters.len(), 1);
        assert_eq!(*seen.lock().unwrap(), vec![Some(view.clone())]);

        seen.lock().unwrap().clear();
        reader
            .read_operation(
                &get_user(),
                OperationSite::default(),
                &TypeCatalog::new(),
                &ComponentRegistry::new(),
            )
            .unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![None]);
    }

    #[test]
    fn test_read_class_uses_class_mapping() {
        let class = ClassDescriptor {
            name: "UserResource".into(),
            request_mapping: Some(RequestMappingAnnotation::new("/users")),
            methods: vec![
                get_user(),
                MethodDescriptor::new("helper"),
                MethodDescriptor::new("create")
                    .annotated(MappingAnnotation::new(MappingVerb::Post, "")),
            ],
        };
        let view = ViewToken::new(vec!["Public".into()]);
        let ops = OperationReader::default()
            .read_class(&class, Some(&view), &TypeCatalog::new(), &ComponentRegistry::new())
            .unwrap();

        let routes: Vec<_> = ops
            .iter()
            .map(|op| (op.fragment.method, op.fragment.path.as_deref()))
            .collect();
        assert_eq!(
            routes,
            vec![
                (Some(HttpMethod::Get), Some("/users/{id}")),
                (Some(HttpMethod::Post), Some("/users")),
            ]
        );
    }
}
