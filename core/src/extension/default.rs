#![deny(missing_docs)]

//! # Default Parameter Extension
//!
//! The trailing, authoritative handler. It classifies a member into the path,
//! query, header, cookie or form bucket, turns it into the request body
//! candidate, or drops it.

use crate::error::AppResult;
use crate::extension::chain::{Extension, ExtensionChain};
use crate::extension::request::ExtractionRequest;
use crate::introspect::introspect_bean;
use crate::model::annotations::{non_blank, Annotation, ParameterAnnotation};
use crate::model::parameter::{Parameter, ParameterIn, ResolvedParameter};
use crate::processor::apply_annotations;
use crate::refs::{component_ref, ComponentSection};

/// Classifies members from their `Parameter` annotations.
///
/// Precedence: hidden, `$ref`, `BeanParam` unwrapping, explicit location,
/// body inference, drop. This handler never delegates.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultParameterExtension;

impl DefaultParameterExtension {
    /// Creates the handler.
    pub fn new() -> Self {
        Self
    }
}

impl Extension for DefaultParameterExtension {
    fn name(&self) -> &str {
        "DefaultParameterExtension"
    }

    fn extract_parameters(
        &self,
        request: &ExtractionRequest<'_>,
        chain: ExtensionChain<'_>,
    ) -> AppResult<ResolvedParameter> {
        let ty = request.ty;
        if request.exclusions.contains(ty) || request.context.config.is_ignored_type(ty.as_str()) {
            return Ok(ResolvedParameter::new());
        }

        let declared: Vec<&ParameterAnnotation> = request
            .annotations
            .iter()
            .filter_map(|a| a.as_parameter())
            .collect();

        if declared.iter().any(|p| p.hidden) {
            tracing::debug!(member = ?request.member_name, %ty, "Hidden member; skipping");
            return Ok(ResolvedParameter::new());
        }

        if let Some(reference) = declared.iter().find_map(|p| non_blank(&p.reference)) {
            let reference = component_ref(ComponentSection::Parameters, reference);
            return Ok(ResolvedParameter {
                parameters: vec![Parameter::reference(reference)],
                ..Default::default()
            });
        }

        let is_bean = request
            .annotations
            .iter()
            .any(|a| matches!(a.value(), Annotation::BeanParam));
        if is_bean && request.descriptor().is_some() {
            let outcome = introspect_bean(request, chain)?;
            if outcome.handled {
                return Ok(outcome.resolved);
            }
        }

        let stub = Parameter {
            location: declared.iter().find_map(|p| p.location),
            ..Default::default()
        };
        let Some(mut parameter) = apply_annotations(stub, ty, request.annotations, request.context)
        else {
            return Ok(ResolvedParameter::new());
        };
        if parameter.name.is_none() {
            parameter.name = request.member_name.map(str::to_string);
        }

        let mut resolved = ResolvedParameter::new();
        match parameter.location {
            Some(ParameterIn::Form) => {
                parameter.location = None;
                resolved.form_parameters.push(parameter);
            }
            Some(_) => resolved.parameters.push(parameter),
            None if request.include_request_body => {
                tracing::debug!(member = ?request.member_name, %ty, "Inferred request body");
                resolved.request_body = Some(parameter);
            }
            None => {
                tracing::trace!(member = ?request.member_name, %ty, "Unresolvable member dropped");
            }
        }
        Ok(resolved)
    }
}
