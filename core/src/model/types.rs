#![deny(missing_docs)]

//! # Type Descriptors
//!
//! Static, declared-once descriptions of compound types: their logical
//! properties (field, getter, setter), constructors and schema. The extraction
//! algorithms walk these descriptors instead of inspecting values at runtime.

use crate::error::{AppError, AppResult};
use crate::model::annotations::{Annotation, AnnotationRef};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use utoipa::openapi::{RefOr, Schema};

/// Key of a described type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeName(String);

impl TypeName {
    /// Creates a type name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the raw name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last path segment: `User` for `com.acme.User` or `crate::dto::User`.
    pub fn simple_name(&self) -> &str {
        let tail = self.0.rsplit("::").next().unwrap_or(&self.0);
        tail.rsplit('.').next().unwrap_or(tail)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TypeName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Where a type is declared relative to other types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Nesting {
    /// Declared at module level.
    #[default]
    TopLevel,
    /// Nested, with no binding to an enclosing instance.
    StaticMember,
    /// Nested and bound to an enclosing instance.
    Inner,
    /// Declared inside a function body.
    Local,
}

impl Nesting {
    /// True when instances cannot be created without an enclosing context.
    pub fn needs_enclosing_instance(&self) -> bool {
        matches!(self, Nesting::Inner | Nesting::Local)
    }
}

/// Constructor visibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Visibility {
    /// Public.
    #[default]
    Public,
    /// Protected.
    Protected,
    /// Private or package-private.
    Private,
}

/// One access path (field, getter or setter) of a property.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Accessor {
    /// Field type, getter return type or setter parameter type.
    #[serde(rename = "type")]
    pub ty: Option<TypeName>,
    /// Annotations declared on this accessor.
    pub annotations: Vec<AnnotationRef>,
}

impl Accessor {
    /// Creates an accessor.
    pub fn new(ty: Option<TypeName>, annotations: Vec<AnnotationRef>) -> Self {
        Self { ty, annotations }
    }
}

/// A logical property discovered on a compound type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyDescriptor {
    /// Logical property name.
    pub name: String,
    /// Backing field.
    pub field: Option<Accessor>,
    /// Getter.
    pub getter: Option<Accessor>,
    /// Setter.
    pub setter: Option<Accessor>,
}

impl PropertyDescriptor {
    /// Creates a property with no accessors.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Adds a field.
    pub fn field(mut self, ty: impl Into<TypeName>, annotations: Vec<AnnotationRef>) -> Self {
        self.field = Some(Accessor::new(Some(ty.into()), annotations));
        self
    }

    /// Adds a getter.
    pub fn getter(mut self, ty: impl Into<TypeName>, annotations: Vec<AnnotationRef>) -> Self {
        self.getter = Some(Accessor::new(Some(ty.into()), annotations));
        self
    }

    /// Adds a setter; `ty` is its single parameter type, if it has one.
    pub fn setter(mut self, ty: Option<TypeName>, annotations: Vec<AnnotationRef>) -> Self {
        self.setter = Some(Accessor::new(ty, annotations));
        self
    }

    /// Merges the accessors into one member.
    ///
    /// Annotations are collected field, setter, getter, collapsing the same
    /// instance seen twice. The type comes from the first accessor that has
    /// one. Returns `None` when no accessor declares a type.
    ///
    /// Sharing is only expressible in code, by cloning one [`AnnotationRef`]
    /// onto several accessors. Deserialized annotations are always distinct
    /// instances, YAML aliases of one anchored node included.
    pub fn member(&self) -> Option<AnnotatedMember> {
        let mut seen = HashSet::new();
        let mut annotations = Vec::new();
        let mut ty: Option<TypeName> = None;

        for accessor in [&self.field, &self.setter, &self.getter]
            .into_iter()
            .flatten()
        {
            if ty.is_none() {
                ty = accessor.ty.clone();
            }
            for annotation in &accessor.annotations {
                if seen.insert(annotation.id()) {
                    annotations.push(annotation.clone());
                }
            }
        }

        Some(AnnotatedMember::new(self.name.clone(), ty?, annotations))
    }
}

/// A named, typed, annotated slot: a merged property or a constructor/method parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedMember {
    /// Member name.
    pub name: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub ty: TypeName,
    /// Annotations, duplicates by identity removed.
    #[serde(default)]
    pub annotations: Vec<AnnotationRef>,
}

impl AnnotatedMember {
    /// Creates a member.
    pub fn new(name: impl Into<String>, ty: impl Into<TypeName>, annotations: Vec<AnnotationRef>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            annotations,
        }
    }

    /// True for framework-injected members, which never become parameters.
    pub fn is_context(&self) -> bool {
        self.annotations
            .iter()
            .any(|a| matches!(a.value(), Annotation::Context))
    }
}

/// A constructor of a compound type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstructorDescriptor {
    /// Visibility.
    pub visibility: Visibility,
    /// Constructor-level annotations.
    pub annotations: Vec<AnnotationRef>,
    /// Parameters in declaration order.
    pub parameters: Vec<AnnotatedMember>,
}

impl ConstructorDescriptor {
    /// True if the constructor carries an `Inject` marker.
    pub fn is_injectable(&self) -> bool {
        self.annotations
            .iter()
            .any(|a| matches!(a.value(), Annotation::Inject))
    }

    /// True if the constructor can be used without an injection marker.
    pub fn is_compatible(&self) -> bool {
        match self.visibility {
            Visibility::Public => true,
            Visibility::Protected => self.parameters.is_empty(),
            Visibility::Private => false,
        }
    }
}

/// Static description of one type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Type key.
    pub name: TypeName,
    /// Declaration site.
    #[serde(default)]
    pub nesting: Nesting,
    /// Schema of the type, supplied by the schema collaborator.
    #[serde(default)]
    pub schema: Option<RefOr<Schema>>,
    /// Register the schema as a reusable component and refer to it.
    #[serde(default)]
    pub component: bool,
    /// Logical properties.
    #[serde(default)]
    pub properties: Vec<PropertyDescriptor>,
    /// Constructors.
    #[serde(default)]
    pub constructors: Vec<ConstructorDescriptor>,
}

impl TypeDescriptor {
    /// Creates a top-level descriptor with no members.
    pub fn new(name: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            nesting: Nesting::TopLevel,
            schema: None,
            component: false,
            properties: Vec::new(),
            constructors: Vec::new(),
        }
    }

    /// Sets the schema.
    pub fn with_schema(mut self, schema: impl Into<RefOr<Schema>>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Marks the schema as a reusable component.
    pub fn as_component(mut self) -> Self {
        self.component = true;
        self
    }

    /// Sets the declaration site.
    pub fn with_nesting(mut self, nesting: Nesting) -> Self {
        self.nesting = nesting;
        self
    }

    /// Adds a property.
    pub fn with_property(mut self, property: PropertyDescriptor) -> Self {
        self.properties.push(property);
        self
    }

    /// Adds a constructor.
    pub fn with_constructor(mut self, constructor: ConstructorDescriptor) -> Self {
        self.constructors.push(constructor);
        self
    }

    /// Declared fields as members, in declaration order.
    pub fn declared_fields(&self) -> impl Iterator<Item = AnnotatedMember> + '_ {
        self.properties.iter().filter_map(|p| {
            let field = p.field.as_ref()?;
            let ty = field.ty.clone()?;
            Some(AnnotatedMember::new(
                p.name.clone(),
                ty,
                field.annotations.clone(),
            ))
        })
    }
}

/// The set of described types for one scan.
///
/// Types without a descriptor are leaves: no properties, no schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<TypeDescriptor>", into = "Vec<TypeDescriptor>")]
pub struct TypeCatalog {
    types: HashMap<TypeName, TypeDescriptor>,
}

impl TypeCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a descriptor.
    pub fn register(&mut self, descriptor: TypeDescriptor) {
        self.types.insert(descriptor.name.clone(), descriptor);
    }

    /// Builder-style [`TypeCatalog::register`].
    pub fn with(mut self, descriptor: TypeDescriptor) -> Self {
        self.register(descriptor);
        self
    }

    /// Looks up a descriptor.
    pub fn get(&self, name: &TypeName) -> Option<&TypeDescriptor> {
        self.types.get(name)
    }

    /// Number of described types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// True when nothing is described.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Parses a list of descriptors from YAML.
    pub fn from_yaml_str(yaml: &str) -> AppResult<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| AppError::Config(format!("Failed to parse type catalog YAML: {}", e)))
    }
}

impl From<Vec<TypeDescriptor>> for TypeCatalog {
    fn from(descriptors: Vec<TypeDescriptor>) -> Self {
        descriptors
            .into_iter()
            .fold(TypeCatalog::new(), TypeCatalog::with)
    }
}

impl From<TypeCatalog> for Vec<TypeDescriptor> {
    fn from(catalog: TypeCatalog) -> Self {
        let mut descriptors: Vec<_> = catalog.types.into_values().collect();
        descriptors.sort_by(|a, b| a.name.cmp(&b.name));
        descriptors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::annotations::ParameterAnnotation;

    fn marker(name: &str) -> AnnotationRef {
        AnnotationRef::new(Annotation::marker(name))
    }

    #[test]
    fn test_simple_name() {
        assert_eq!(TypeName::new("com.acme.User").simple_name(), "User");
        assert_eq!(TypeName::new("crate::dto::Page").simple_name(), "Page");
        assert_eq!(TypeName::new("i64").simple_name(), "i64");
    }

    #[test]
    fn test_member_collapses_shared_instances() {
        let shared = marker("NotNull");
        let prop = PropertyDescriptor::new("id")
            .field("i64", vec![shared.clone()])
            .getter("i64", vec![shared.clone()]);

        let member = prop.member().unwrap();
        assert_eq!(member.annotations, vec![shared]);
    }

    #[test]
    fn test_member_keeps_equal_but_distinct_instances() {
        let prop = PropertyDescriptor::new("id")
            .field("i64", vec![marker("NotNull")])
            .getter("i64", vec![marker("NotNull")]);

        let member = prop.member().unwrap();
        assert_eq!(member.annotations.len(), 2);
    }

    #[test]
    fn test_member_keeps_yaml_aliases_distinct() {
        let yaml = r#"
name: id
field:
  type: i64
  annotations:
    - &shared
      kind: marker
      name: NotNull
getter:
  type: i64
  annotations:
    - *shared
"#;
        let prop: PropertyDescriptor = serde_yaml::from_str(yaml).unwrap();
        let member = prop.member().unwrap();
        assert_eq!(member.annotations.len(), 2);
        assert_eq!(member.annotations[0].value(), member.annotations[1].value());
        assert_ne!(member.annotations[0], member.annotations[1]);
    }

    #[test]
    fn test_member_type_first_source_wins() {
        let prop = PropertyDescriptor::new("id")
            .setter(Some("String".into()), vec![])
            .getter("i64", vec![]);
        assert_eq!(prop.member().unwrap().ty, TypeName::new("String"));

        let prop = PropertyDescriptor::new("id")
            .field("u8", vec![])
            .setter(Some("String".into()), vec![])
            .getter("i64", vec![]);
        assert_eq!(prop.member().unwrap().ty, TypeName::new("u8"));
    }

    #[test]
    fn test_member_order_field_setter_getter() {
        let f = marker("F");
        let s = marker("S");
        let g = marker("G");
        let prop = PropertyDescriptor::new("x")
            .getter("i32", vec![g.clone()])
            .setter(None, vec![s.clone()])
            .field("i32", vec![f.clone()]);
        assert_eq!(prop.member().unwrap().annotations, vec![f, s, g]);
    }

    #[test]
    fn test_member_without_type_is_skipped() {
        let prop = PropertyDescriptor::new("ghost").setter(None, vec![marker("X")]);
        assert!(prop.member().is_none());
    }

    #[test]
    fn test_context_member() {
        let member = AnnotatedMember::new(
            "ctx",
            "Request",
            vec![AnnotationRef::new(Annotation::Context)],
        );
        assert!(member.is_context());
        let member = AnnotatedMember::new(
            "q",
            "String",
            vec![AnnotationRef::new(ParameterAnnotation::default())],
        );
        assert!(!member.is_context());
    }

    #[test]
    fn test_constructor_compatibility() {
        let public = ConstructorDescriptor::default();
        assert!(public.is_compatible());

        let protected_noarg = ConstructorDescriptor {
            visibility: Visibility::Protected,
            ..Default::default()
        };
        assert!(protected_noarg.is_compatible());

        let protected_args = ConstructorDescriptor {
            visibility: Visibility::Protected,
            parameters: vec![AnnotatedMember::new("a", "i32", vec![])],
            ..Default::default()
        };
        assert!(!protected_args.is_compatible());

        let injected = ConstructorDescriptor {
            visibility: Visibility::Private,
            annotations: vec![AnnotationRef::new(Annotation::Inject)],
            ..Default::default()
        };
        assert!(!injected.is_compatible());
        assert!(injected.is_injectable());
    }

    #[test]
    fn test_catalog_from_yaml() {
        let yaml = r#"
- name: UserQuery
  component: true
  schema:
    type: object
  properties:
    - name: limit
      field:
        type: i32
        annotations:
          - kind: parameter
            in: query
- name: Inner
  nesting: inner
"#;
        let catalog = TypeCatalog::from_yaml_str(yaml).unwrap();
        assert_eq!(catalog.len(), 2);
        let user = catalog.get(&"UserQuery".into()).unwrap();
        assert!(user.component);
        assert!(user.schema.is_some());
        let fields: Vec<_> = user.declared_fields().collect();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].ty.as_str(), "i32");
        assert!(catalog
            .get(&"Inner".into())
            .unwrap()
            .nesting
            .needs_enclosing_instance());
    }
}
