#![deny(missing_docs)]

//! # Extension Chain
//!
//! The capability protocol shared by every extraction handler.
//!
//! Handlers are tried in registration order. Each one receives an
//! [`ExtensionChain`] cursor over the handlers after it and either resolves the
//! request itself or passes it on. The cursor is a plain `Copy` value: it is
//! handed down explicitly and never advanced behind a handler's back.

use crate::error::{AppError, AppResult};
use crate::extension::default::DefaultParameterExtension;
use crate::extension::request::ExtractionRequest;
use crate::model::operation::{HttpMethod, MethodDescriptor, OperationFragment};
use crate::model::parameter::ResolvedParameter;
use std::fmt;
use std::sync::Arc;

/// A pluggable extraction handler.
///
/// Every method defaults to delegating to the next handler, and to an
/// absent/empty/no-op result once the chain is exhausted. A handler that does
/// not recognise its input must delegate; only an authoritative handler may
/// answer without consulting the rest of the chain.
pub trait Extension: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Resolves the HTTP verb of a handler method.
    fn extract_operation_method(
        &self,
        method: &MethodDescriptor,
        chain: ExtensionChain<'_>,
    ) -> AppResult<Option<HttpMethod>> {
        chain.extract_operation_method(method)
    }

    /// Resolves the parameters, form fields or body candidate of one member.
    fn extract_parameters(
        &self,
        request: &ExtractionRequest<'_>,
        chain: ExtensionChain<'_>,
    ) -> AppResult<ResolvedParameter> {
        chain.extract_parameters(request)
    }

    /// Enriches an assembled operation.
    fn decorate_operation(
        &self,
        operation: &mut OperationFragment,
        method: &MethodDescriptor,
        chain: ExtensionChain<'_>,
    ) -> AppResult<()> {
        chain.decorate_operation(operation, method)
    }
}

/// Cursor over the remaining handlers.
///
/// `depth` counts every hop taken along the current call path, including hops
/// taken after [`ExtensionChain::restart`], and is bounded by `limit`.
#[derive(Clone, Copy)]
pub struct ExtensionChain<'a> {
    extensions: &'a [Arc<dyn Extension>],
    position: usize,
    depth: usize,
    limit: usize,
}

impl<'a> ExtensionChain<'a> {
    /// A cursor at the head of `extensions`.
    pub fn new(extensions: &'a [Arc<dyn Extension>], limit: usize) -> Self {
        Self {
            extensions,
            position: 0,
            depth: 0,
            limit,
        }
    }

    /// True if another handler is available.
    pub fn has_next(&self) -> bool {
        self.position < self.extensions.len()
    }

    /// Hops taken so far.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Takes the next handler and the cursor positioned after it.
    ///
    /// Fails with [`AppError::ChainDepthExceeded`] once the hop count passes
    /// the limit, which only happens when a handler keeps re-entering the
    /// chain without making progress.
    pub fn advance(self) -> AppResult<Option<(&'a dyn Extension, ExtensionChain<'a>)>> {
        let Some(extension) = self.extensions.get(self.position) else {
            return Ok(None);
        };
        let depth = self.depth + 1;
        if depth > self.limit {
            tracing::warn!(
                depth,
                limit = self.limit,
                extension = extension.name(),
                "Extension chain depth exceeded"
            );
            return Err(AppError::ChainDepthExceeded {
                depth,
                limit: self.limit,
            });
        }
        let rest = ExtensionChain {
            position: self.position + 1,
            depth,
            ..self
        };
        Ok(Some((extension.as_ref(), rest)))
    }

    /// A cursor back at the head, keeping the hop count.
    ///
    /// Used when a nested member is resolved by the full chain again.
    pub fn restart(self) -> Self {
        Self {
            position: 0,
            ..self
        }
    }

    /// Hands verb resolution to the next handler.
    pub fn extract_operation_method(
        self,
        method: &MethodDescriptor,
    ) -> AppResult<Option<HttpMethod>> {
        match self.advance()? {
            Some((next, rest)) => next.extract_operation_method(method, rest),
            None => Ok(None),
        }
    }

    /// Hands parameter resolution to the next handler.
    pub fn extract_parameters(
        self,
        request: &ExtractionRequest<'_>,
    ) -> AppResult<ResolvedParameter> {
        match self.advance()? {
            Some((next, rest)) => next.extract_parameters(request, rest),
            None => Ok(ResolvedParameter::new()),
        }
    }

    /// Hands decoration to the next handler.
    pub fn decorate_operation(
        self,
        operation: &mut OperationFragment,
        method: &MethodDescriptor,
    ) -> AppResult<()> {
        match self.advance()? {
            Some((next, rest)) => next.decorate_operation(operation, method, rest),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for ExtensionChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionChain")
            .field("len", &self.extensions.len())
            .field("position", &self.position)
            .field("depth", &self.depth)
            .field("limit", &self.limit)
            .finish()
    }
}

/// Ordered set of handlers.
///
/// A registry created with [`ExtensionRegistry::new`] ends with the
/// authoritative [`DefaultParameterExtension`]; registered handlers are
/// inserted in front of it.
pub struct ExtensionRegistry {
    extensions: Vec<Arc<dyn Extension>>,
    has_fallback: bool,
}

impl ExtensionRegistry {
    /// A registry holding only the default parameter handler.
    pub fn new() -> Self {
        Self {
            extensions: vec![Arc::new(DefaultParameterExtension::new())],
            has_fallback: true,
        }
    }

    /// A registry with no handlers at all.
    pub fn empty() -> Self {
        Self {
            extensions: Vec::new(),
            has_fallback: false,
        }
    }

    /// Adds a handler after the previously registered ones, before the default handler.
    pub fn register(&mut self, extension: Arc<dyn Extension>) {
        let at = if self.has_fallback {
            self.extensions.len() - 1
        } else {
            self.extensions.len()
        };
        self.extensions.insert(at, extension);
    }

    /// Builder-style [`ExtensionRegistry::register`].
    pub fn with(mut self, extension: impl Extension + 'static) -> Self {
        self.register(Arc::new(extension));
        self
    }

    /// Handlers in dispatch order.
    pub fn extensions(&self) -> &[Arc<dyn Extension>] {
        &self.extensions
    }

    /// A cursor at the head of the chain.
    pub fn chain(&self, limit: usize) -> ExtensionChain<'_> {
        ExtensionChain::new(&self.extensions, limit)
    }
}

impl Default for ExtensionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.extensions.iter().map(|e| e.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::annotations::{Annotation, MappingVerb};

    struct Passthrough;
    impl Extension for Passthrough {}

    struct HeadOnMarker;
    impl Extension for HeadOnMarker {
        fn extract_operation_method(
            &self,
            method: &MethodDescriptor,
            chain: ExtensionChain<'_>,
        ) -> AppResult<Option<HttpMethod>> {
            let is_head = method
                .annotations
                .iter()
                .any(|a| *a.value() == Annotation::marker("Head"));
            if is_head {
                return Ok(Some(HttpMethod::Head));
            }
            chain.extract_operation_method(method)
        }
    }

    struct Looping;
    impl Extension for Looping {
        fn extract_operation_method(
            &self,
            method: &MethodDescriptor,
            chain: ExtensionChain<'_>,
        ) -> AppResult<Option<HttpMethod>> {
            // never makes progress
            chain.restart().extract_operation_method(method)
        }
    }

    #[test]
    fn test_exhausted_chain_is_absent() {
        let registry = ExtensionRegistry::empty().with(Passthrough).with(Passthrough);
        let method = MethodDescriptor::new("m");
        let verb = registry.chain(16).extract_operation_method(&method).unwrap();
        assert!(verb.is_none());
    }

    #[test]
    fn test_later_handler_answers_after_delegation() {
        let registry = ExtensionRegistry::empty().with(Passthrough).with(HeadOnMarker);
        let method = MethodDescriptor::new("m").annotated(Annotation::marker("Head"));
        let verb = registry.chain(16).extract_operation_method(&method).unwrap();
        assert_eq!(verb, Some(HttpMethod::Head));
    }

    #[test]
    fn test_register_inserts_before_default() {
        let registry = ExtensionRegistry::new().with(Passthrough).with(HeadOnMarker);
        let names: Vec<&str> = registry.extensions().iter().map(|e| e.name()).collect();
        assert_eq!(names.len(), 3);
        assert!(names[2].ends_with("DefaultParameterExtension"));
        assert!(names[0].ends_with("Passthrough"));
    }

    #[test]
    fn test_non_advancing_handler_trips_guard() {
        let registry = ExtensionRegistry::empty().with(Looping);
        let method = MethodDescriptor::new("m").annotated(
            crate::model::annotations::MappingAnnotation::new(MappingVerb::Get, "/"),
        );
        let err = registry
            .chain(32)
            .extract_operation_method(&method)
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::ChainDepthExceeded {
                depth: 33,
                limit: 32
            }
        ));
    }

    #[test]
    fn test_cursor_is_a_value() {
        let registry = ExtensionRegistry::empty().with(Passthrough).with(Passthrough);
        let head = registry.chain(8);
        let (_, rest) = head.advance().unwrap().unwrap();
        assert_eq!(head.depth(), 0);
        assert_eq!(rest.depth(), 1);
        assert!(rest.has_next());
        let (_, last) = rest.advance().unwrap().unwrap();
        assert!(!last.has_next());
        assert!(last.advance().unwrap().is_none());
        assert_eq!(last.restart().depth(), 2);
        assert!(last.restart().has_next());
    }
}
