#![deny(missing_docs)]

//! # Extraction Requests
//!
//! The unit of work handed along the extension chain, and the scan-wide
//! context it borrows from.

use crate::components::ComponentRegistry;
use crate::config::ReaderConfig;
use crate::model::annotations::AnnotationRef;
use crate::model::types::{AnnotatedMember, TypeCatalog, TypeDescriptor, TypeName};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Opaque serialization-view token. Passed through, never inspected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewToken(Vec<String>);

impl ViewToken {
    /// Wraps the view names.
    pub fn new(views: Vec<String>) -> Self {
        Self(views)
    }
}

/// Types currently being unwrapped along one call path.
///
/// Each recursive descent gets its own extended copy, so siblings never see
/// each other's entries and the set never shrinks within a call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeExclusionSet {
    types: HashSet<TypeName>,
}

impl TypeExclusionSet {
    /// An empty set, one per top-level extraction call.
    pub fn new() -> Self {
        Self::default()
    }

    /// True if the type is already being unwrapped.
    pub fn contains(&self, ty: &TypeName) -> bool {
        self.types.contains(ty)
    }

    /// A copy of this set that also holds `ty`.
    pub fn with(&self, ty: &TypeName) -> Self {
        let mut next = self.clone();
        next.types.insert(ty.clone());
        next
    }

    /// Number of excluded types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// True when no type is excluded.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Scan-wide collaborators shared by every request of one scan.
#[derive(Debug, Clone, Copy)]
pub struct ScanContext<'a> {
    /// Described types.
    pub catalog: &'a TypeCatalog,
    /// Schema sink for the secondary pass.
    pub components: &'a ComponentRegistry,
    /// Reader settings.
    pub config: &'a ReaderConfig,
    /// Serialization view, passed through.
    pub view: Option<&'a ViewToken>,
}

impl<'a> ScanContext<'a> {
    /// Creates a context without a view.
    pub fn new(
        catalog: &'a TypeCatalog,
        components: &'a ComponentRegistry,
        config: &'a ReaderConfig,
    ) -> Self {
        Self {
            catalog,
            components,
            config,
            view: None,
        }
    }

    /// Sets the view token.
    pub fn with_view(mut self, view: Option<&'a ViewToken>) -> Self {
        self.view = view;
        self
    }
}

/// One member to resolve: its annotations, declared type and recursion state.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionRequest<'a> {
    /// Annotations on the member.
    pub annotations: &'a [AnnotationRef],
    /// Declared type.
    pub ty: &'a TypeName,
    /// Member name, the fallback parameter name.
    pub member_name: Option<&'a str>,
    /// Types already being unwrapped.
    pub exclusions: &'a TypeExclusionSet,
    /// May an unlocated member become the request body.
    pub include_request_body: bool,
    /// Scan-wide collaborators.
    pub context: ScanContext<'a>,
}

impl<'a> ExtractionRequest<'a> {
    /// Creates a request with body inference disabled.
    pub fn new(
        annotations: &'a [AnnotationRef],
        ty: &'a TypeName,
        exclusions: &'a TypeExclusionSet,
        context: ScanContext<'a>,
    ) -> Self {
        Self {
            annotations,
            ty,
            member_name: None,
            exclusions,
            include_request_body: false,
            context,
        }
    }

    /// Creates a request for a member, named after it.
    pub fn for_member(
        member: &'a AnnotatedMember,
        exclusions: &'a TypeExclusionSet,
        context: ScanContext<'a>,
    ) -> Self {
        Self::new(&member.annotations, &member.ty, exclusions, context).named(&member.name)
    }

    /// Sets the fallback name.
    pub fn named(mut self, name: &'a str) -> Self {
        self.member_name = Some(name);
        self
    }

    /// Enables or disables body inference.
    pub fn allow_request_body(mut self, allow: bool) -> Self {
        self.include_request_body = allow;
        self
    }

    /// Descriptor of the declared type, if it is described.
    pub fn descriptor(&self) -> Option<&'a TypeDescriptor> {
        self.context.catalog.get(self.ty)
    }
}
