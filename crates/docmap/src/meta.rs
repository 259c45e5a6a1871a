//! Structural metadata for registered classes.
//!
//! Metadata is supplied explicitly at startup through builder calls (or by
//! code generation feeding the same builders); nothing in this crate relies
//! on ambient runtime reflection. The convention pipeline consumes this
//! module read-only.

use crate::class_map::{ClassMap, MapError};
use serde::Serialize;
use std::{fmt, sync::Arc};

///
/// MemberType
///
/// Declared static type of a member, projected to the surface the pipeline
/// needs: generator-registry keying and extra-elements eligibility.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
pub enum MemberType {
    Bool,
    Int32,
    Int64,
    Double,
    Text,
    /// Untyped document value; eligible for extra-elements capture.
    Document,
    /// String-keyed associative container; eligible for extra-elements capture.
    StringMap,
    /// Any other declared type, keyed by its type path.
    Other(&'static str),
}

impl MemberType {
    #[must_use]
    pub const fn captures_extra_elements(self) -> bool {
        matches!(self, Self::Document | Self::StringMap)
    }
}

///
/// MemberKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum MemberKind {
    Field,
    Property,
}

///
/// Visibility
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum Visibility {
    Public,
    Private,
}

///
/// MarkerKind
///
/// Classification of declarative markers; the unit tracked by single-use
/// conflict detection.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MarkerKind {
    Id,
    ExtraElements,
    ElementName,
    Ignore,
    DefaultValue,
    IgnoreIfDefault,
    IgnoreIfNone,
    Representation,
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Id => "id",
            Self::ExtraElements => "extra_elements",
            Self::ElementName => "element_name",
            Self::Ignore => "ignore",
            Self::DefaultValue => "default_value",
            Self::IgnoreIfDefault => "ignore_if_default",
            Self::IgnoreIfNone => "ignore_if_none",
            Self::Representation => "representation",
        };
        write!(f, "{label}")
    }
}

///
/// ClassMarker
///
/// Declarative marker attached to a class. Applied during the
/// before-members phase of the marker convention, in registration order.
///

pub trait ClassMarker: Send + Sync {
    fn apply(&self, class_map: &mut ClassMap) -> Result<(), MapError>;
}

///
/// MemberMarker
///
/// Declarative marker attached to a member. Applied once per mapped member
/// during the per-member phase, in registration order.
///

pub trait MemberMarker: Send + Sync {
    fn kind(&self) -> MarkerKind;

    /// Whether this marker kind may appear on at most one member per class.
    fn single_use(&self) -> bool {
        false
    }

    fn apply(&self, class_map: &mut ClassMap, member: &'static str) -> Result<(), MapError>;
}

///
/// MemberMeta
///
/// One declared member (field or property) of a registered class.
///

pub struct MemberMeta {
    pub name: &'static str,
    pub kind: MemberKind,
    pub ty: MemberType,
    pub visibility: Visibility,
    pub readable: bool,
    pub writable: bool,
    /// Indexer-style accessor; never mapped by discovery.
    pub indexed: bool,
    /// Overrides a base declaration already covered by the base class.
    pub overrides_base: bool,
    markers: Vec<Arc<dyn MemberMarker>>,
}

impl MemberMeta {
    #[must_use]
    pub fn field(name: &'static str, ty: MemberType) -> Self {
        Self::new(name, MemberKind::Field, ty)
    }

    #[must_use]
    pub fn property(name: &'static str, ty: MemberType) -> Self {
        Self::new(name, MemberKind::Property, ty)
    }

    fn new(name: &'static str, kind: MemberKind, ty: MemberType) -> Self {
        Self {
            name,
            kind,
            ty,
            visibility: Visibility::Public,
            readable: true,
            writable: true,
            indexed: false,
            overrides_base: false,
            markers: Vec::new(),
        }
    }

    #[must_use]
    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }

    #[must_use]
    pub fn no_getter(mut self) -> Self {
        self.readable = false;
        self
    }

    #[must_use]
    pub fn indexed(mut self) -> Self {
        self.indexed = true;
        self
    }

    #[must_use]
    pub fn overrides_base(mut self) -> Self {
        self.overrides_base = true;
        self
    }

    #[must_use]
    pub fn marker(mut self, marker: impl MemberMarker + 'static) -> Self {
        self.markers.push(Arc::new(marker));
        self
    }

    #[must_use]
    pub fn markers(&self) -> &[Arc<dyn MemberMarker>] {
        &self.markers
    }

    #[must_use]
    pub fn has_marker_kind(&self, kind: MarkerKind) -> bool {
        self.markers.iter().any(|m| m.kind() == kind)
    }

    /// Whether any marker opts this member into mapping. Ignore markers do
    /// not opt in; they only remove already-mapped members.
    #[must_use]
    pub fn has_mapping_markers(&self) -> bool {
        self.markers.iter().any(|m| m.kind() != MarkerKind::Ignore)
    }
}

///
/// ClassMeta
///
/// One registered class: ordered declared members plus any attached
/// declarative markers. Declaration order is significant.
///

pub struct ClassMeta {
    /// Fully-qualified type path (for registry keying and diagnostics).
    pub path: &'static str,
    /// Compiler-generated type; relaxes the property setter requirement.
    pub synthesized: bool,
    members: Vec<Arc<MemberMeta>>,
    markers: Vec<Arc<dyn ClassMarker>>,
}

impl ClassMeta {
    #[must_use]
    pub fn builder(path: &'static str) -> ClassMetaBuilder {
        ClassMetaBuilder {
            path,
            synthesized: false,
            members: Vec::new(),
            markers: Vec::new(),
        }
    }

    #[must_use]
    pub fn members(&self) -> &[Arc<MemberMeta>] {
        &self.members
    }

    #[must_use]
    pub fn markers(&self) -> &[Arc<dyn ClassMarker>] {
        &self.markers
    }

    #[must_use]
    pub fn member(&self, name: &str) -> Option<&Arc<MemberMeta>> {
        self.members.iter().find(|m| m.name == name)
    }
}

///
/// ClassMetaBuilder
///
/// Startup-time registration surface for one class.
///

pub struct ClassMetaBuilder {
    path: &'static str,
    synthesized: bool,
    members: Vec<Arc<MemberMeta>>,
    markers: Vec<Arc<dyn ClassMarker>>,
}

impl ClassMetaBuilder {
    #[must_use]
    pub fn member(mut self, member: MemberMeta) -> Self {
        self.members.push(Arc::new(member));
        self
    }

    #[must_use]
    pub fn marker(mut self, marker: impl ClassMarker + 'static) -> Self {
        self.markers.push(Arc::new(marker));
        self
    }

    #[must_use]
    pub fn synthesized(mut self) -> Self {
        self.synthesized = true;
        self
    }

    #[must_use]
    pub fn build(self) -> Arc<ClassMeta> {
        Arc::new(ClassMeta {
            path: self.path,
            synthesized: self.synthesized,
            members: self.members,
            markers: self.markers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markers::{IdMarker, IgnoreMarker};

    #[test]
    fn builder_preserves_declaration_order() {
        let meta = ClassMeta::builder("tests::Widget")
            .member(MemberMeta::field("b", MemberType::Text))
            .member(MemberMeta::field("a", MemberType::Int32))
            .build();

        let names: Vec<_> = meta.members().iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn member_lookup_by_name() {
        let meta = ClassMeta::builder("tests::Widget")
            .member(MemberMeta::property("count", MemberType::Int64))
            .build();

        assert!(meta.member("count").is_some());
        assert!(meta.member("missing").is_none());
    }

    #[test]
    fn ignore_markers_do_not_opt_in() {
        let ignored = MemberMeta::field("a", MemberType::Text).marker(IgnoreMarker);
        assert!(!ignored.has_mapping_markers());
        assert!(ignored.has_marker_kind(MarkerKind::Ignore));

        let marked = MemberMeta::field("b", MemberType::Text).marker(IdMarker);
        assert!(marked.has_mapping_markers());
    }

    #[test]
    fn marker_kind_labels() {
        assert_eq!(MarkerKind::ExtraElements.to_string(), "extra_elements");
        assert_eq!(MarkerKind::Id.to_string(), "id");
    }
}
