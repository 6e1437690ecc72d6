#![deny(missing_docs)]

//! # Component Registry
//!
//! The shared, append-mostly store of reusable schemas that the secondary
//! annotation pass registers into. Extraction never reads it back; the owner
//! collects the result once the scan is over.

use crate::refs::{encode_pointer_segment, ComponentSection};
use arc_swap::ArcSwap;
use std::sync::Arc;
use utoipa::openapi::{Components, RefOr, Schema};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Registration {
    Unchanged,
    Added,
    Replaced,
}

/// Lock-free, copy-on-write store over [`Components`].
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    inner: ArcSwap<Components>,
}

impl ComponentRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from existing components.
    pub fn from_components(components: Components) -> Self {
        Self {
            inner: ArcSwap::from_pointee(components),
        }
    }

    /// Registers a schema under `name` and returns the reference to it.
    ///
    /// A differing schema already stored under the same name is replaced.
    pub fn register_schema(&self, name: &str, schema: RefOr<Schema>) -> String {
        let mut outcome = Registration::Unchanged;
        self.inner.rcu(|current| {
            outcome = match current.schemas.get(name) {
                Some(existing) if *existing == schema => Registration::Unchanged,
                Some(_) => Registration::Replaced,
                None => Registration::Added,
            };
            if outcome == Registration::Unchanged {
                return Arc::clone(current);
            }
            let mut next = (**current).clone();
            next.schemas.insert(name.to_string(), schema.clone());
            Arc::new(next)
        });

        match outcome {
            Registration::Replaced => {
                tracing::warn!(%name, "Schema content conflict; overriding with latest")
            }
            Registration::Added => tracing::trace!(%name, "Registering component schema"),
            Registration::Unchanged => {}
        }

        format!(
            "#/components/{}/{}",
            ComponentSection::Schemas.as_str(),
            encode_pointer_segment(name)
        )
    }

    /// True if a schema with this name is registered.
    pub fn contains_schema(&self, name: &str) -> bool {
        self.inner.load().schemas.contains_key(name)
    }

    /// Copy of the current components.
    pub fn snapshot(&self) -> Components {
        (**self.inner.load()).clone()
    }

    /// Consumes the registry.
    pub fn into_inner(self) -> Components {
        Arc::try_unwrap(self.inner.into_inner()).unwrap_or_else(|shared| (*shared).clone())
    }
}
