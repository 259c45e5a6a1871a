//! Built-in conventions and the default pack.

use crate::{
    class_map::ClassMap,
    convention::{ClassMapConvention, Convention, ConventionError, pack::ConventionPack},
    generator::{IdGeneratorRegistry, StringObjectIdGenerator},
    meta::{MemberKind, MemberType, Visibility},
    value::{Representation, SerializationOptions},
};
use std::sync::Arc;

///
/// MemberScope
///
/// Which member kinds a metadata scan covers.
///

#[derive(Clone, Copy, Debug)]
pub struct MemberScope {
    pub fields: bool,
    pub properties: bool,
}

impl MemberScope {
    #[must_use]
    pub const fn all() -> Self {
        Self {
            fields: true,
            properties: true,
        }
    }

    const fn admits(self, kind: MemberKind) -> bool {
        match kind {
            MemberKind::Field => self.fields,
            MemberKind::Property => self.properties,
        }
    }
}

impl Default for MemberScope {
    fn default() -> Self {
        Self::all()
    }
}

///
/// VisibilityFilter
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum VisibilityFilter {
    #[default]
    Public,
    Any,
}

impl VisibilityFilter {
    const fn admits(self, visibility: Visibility) -> bool {
        match self {
            Self::Public => matches!(visibility, Visibility::Public),
            Self::Any => true,
        }
    }
}

///
/// ReadWriteMemberFinder
///
/// Before-members: maps every declared member that can be both read and
/// written. Fields are scanned before properties, each in declaration
/// order; the split preserves historical mapping order.
///

#[derive(Default)]
pub struct ReadWriteMemberFinder {
    scope: MemberScope,
    filter: VisibilityFilter,
}

impl ReadWriteMemberFinder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_scope(scope: MemberScope, filter: VisibilityFilter) -> Self {
        Self { scope, filter }
    }
}

impl Convention for ReadWriteMemberFinder {
    fn name(&self) -> &str {
        "ReadWriteMemberFinder"
    }

    fn before_members(&self) -> Option<&dyn ClassMapConvention> {
        Some(self)
    }
}

impl ClassMapConvention for ReadWriteMemberFinder {
    fn apply(&self, class_map: &mut ClassMap) -> Result<(), ConventionError> {
        let synthesized = class_map.meta().synthesized;

        let mut selected: Vec<&'static str> = Vec::new();
        for pass in [MemberKind::Field, MemberKind::Property] {
            for member in class_map.meta().members() {
                if member.kind != pass
                    || !self.scope.admits(member.kind)
                    || !self.filter.admits(member.visibility)
                {
                    continue;
                }

                let mappable = match member.kind {
                    MemberKind::Field => member.readable && member.writable,
                    // A setter-less property is only mappable on synthesized
                    // types; indexers and overrides are never mapped here.
                    MemberKind::Property => {
                        member.readable
                            && (member.writable || synthesized)
                            && !member.indexed
                            && !member.overrides_base
                    }
                };

                if mappable {
                    selected.push(member.name);
                }
            }
        }

        for member in selected {
            class_map.map_member(member)?;
        }

        Ok(())
    }
}

///
/// NamedIdMember
///
/// Before-members: maps the first declared member matching a candidate
/// name, in candidate-priority order, as the id member.
///

pub struct NamedIdMember {
    names: Vec<&'static str>,
}

impl NamedIdMember {
    #[must_use]
    pub fn new<I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'static str>,
    {
        Self {
            names: names.into_iter().collect(),
        }
    }
}

impl Convention for NamedIdMember {
    fn name(&self) -> &str {
        "NamedIdMember"
    }

    fn before_members(&self) -> Option<&dyn ClassMapConvention> {
        Some(self)
    }
}

impl ClassMapConvention for NamedIdMember {
    fn apply(&self, class_map: &mut ClassMap) -> Result<(), ConventionError> {
        for &name in &self.names {
            if class_map.meta().member(name).is_some() {
                class_map.map_member(name)?;
                class_map.set_id_member(name)?;
                return Ok(());
            }
        }

        Ok(())
    }
}

///
/// NamedExtraElements
///
/// After-members: maps the first candidate-named member whose declared type
/// can capture undeclared document fields as the extra-elements member. A
/// candidate with an ineligible type is skipped silently.
///

pub struct NamedExtraElements {
    names: Vec<&'static str>,
}

impl NamedExtraElements {
    #[must_use]
    pub fn new<I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'static str>,
    {
        Self {
            names: names.into_iter().collect(),
        }
    }
}

impl Convention for NamedExtraElements {
    fn name(&self) -> &str {
        "NamedExtraElements"
    }

    fn after_members(&self) -> Option<&dyn ClassMapConvention> {
        Some(self)
    }
}

impl ClassMapConvention for NamedExtraElements {
    fn apply(&self, class_map: &mut ClassMap) -> Result<(), ConventionError> {
        for &name in &self.names {
            let eligible = class_map
                .meta()
                .member(name)
                .is_some_and(|m| m.ty.captures_extra_elements());

            if eligible {
                class_map.map_member(name)?;
                class_map.set_extra_elements_member(name)?;
                return Ok(());
            }
        }

        Ok(())
    }
}

///
/// IgnoreExtraElements
///
/// Before-members: fixes the descriptor's ignore-extra-elements flag.
///

pub struct IgnoreExtraElements {
    ignore: bool,
}

impl IgnoreExtraElements {
    #[must_use]
    pub const fn new(ignore: bool) -> Self {
        Self { ignore }
    }
}

impl Convention for IgnoreExtraElements {
    fn name(&self) -> &str {
        "IgnoreExtraElements"
    }

    fn before_members(&self) -> Option<&dyn ClassMapConvention> {
        Some(self)
    }
}

impl ClassMapConvention for IgnoreExtraElements {
    fn apply(&self, class_map: &mut ClassMap) -> Result<(), ConventionError> {
        class_map.set_ignore_extra_elements(self.ignore);

        Ok(())
    }
}

///
/// StringObjectIdIdGenerator
///
/// After-members: a string id member stored with the object-id
/// representation gets the string-object-id generator. Runs ahead of the
/// generic lookup in the default pack so this rule pre-empts it.
///

pub struct StringObjectIdIdGenerator;

impl Convention for StringObjectIdIdGenerator {
    fn name(&self) -> &str {
        "StringObjectIdIdGenerator"
    }

    fn after_members(&self) -> Option<&dyn ClassMapConvention> {
        Some(self)
    }
}

impl ClassMapConvention for StringObjectIdIdGenerator {
    fn apply(&self, class_map: &mut ClassMap) -> Result<(), ConventionError> {
        let Some(id_map) = class_map.id_member_mut() else {
            return Ok(());
        };
        if id_map.id_generator().is_some() {
            return Ok(());
        }

        let object_id_representation = id_map
            .serialization_options()
            .and_then(SerializationOptions::representation)
            == Some(Representation::ObjectId);

        if id_map.member_type() == MemberType::Text && object_id_representation {
            id_map.set_id_generator(Some(StringObjectIdGenerator::instance()));
        }

        Ok(())
    }
}

///
/// IdGeneratorLookup
///
/// After-members: resolves a generator for the id member from the registry,
/// keyed by declared type. Explicit configuration wins; no-op when a
/// generator is already set or no id member exists.
///

pub struct IdGeneratorLookup {
    registry: Arc<IdGeneratorRegistry>,
}

impl IdGeneratorLookup {
    #[must_use]
    pub const fn new(registry: Arc<IdGeneratorRegistry>) -> Self {
        Self { registry }
    }
}

impl Convention for IdGeneratorLookup {
    fn name(&self) -> &str {
        "IdGeneratorLookup"
    }

    fn after_members(&self) -> Option<&dyn ClassMapConvention> {
        Some(self)
    }
}

impl ClassMapConvention for IdGeneratorLookup {
    fn apply(&self, class_map: &mut ClassMap) -> Result<(), ConventionError> {
        let Some(id_map) = class_map.id_member_mut() else {
            return Ok(());
        };
        if id_map.id_generator().is_some() {
            return Ok(());
        }

        if let Some(generator) = self.registry.lookup(id_map.member_type()) {
            id_map.set_id_generator(Some(generator));
        }

        Ok(())
    }
}

/// The default pack. Callers compose on top of this (typically appending
/// [`marker_conventions`](crate::convention::marker::marker_conventions))
/// rather than mutating process-wide state.
#[must_use]
pub fn default_conventions(id_generators: Arc<IdGeneratorRegistry>) -> ConventionPack {
    let mut pack = ConventionPack::new();
    pack.add_range(vec![
        Arc::new(ReadWriteMemberFinder::new()) as Arc<dyn Convention>,
        Arc::new(NamedIdMember::new(["Id", "id", "_id"])),
        Arc::new(NamedExtraElements::new(["ExtraElements"])),
        Arc::new(IgnoreExtraElements::new(false)),
        Arc::new(StringObjectIdIdGenerator),
        Arc::new(IdGeneratorLookup::new(id_generators)),
    ]);

    pack
}
