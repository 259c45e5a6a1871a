//! Concrete declarative markers.
//!
//! Markers are attached to class or member metadata at registration time and
//! folded into the class map by the marker convention. Each marker states a
//! single mapping decision; it never inspects other members.

use crate::{
    class_map::{ClassMap, MapError},
    meta::{ClassMarker, MarkerKind, MemberMarker},
    value::{Representation, SerializationOptions, Value},
};

///
/// IdMarker
///
/// Declares the bearing member as the class id. Single-use per class.
///

pub struct IdMarker;

impl MemberMarker for IdMarker {
    fn kind(&self) -> MarkerKind {
        MarkerKind::Id
    }

    fn single_use(&self) -> bool {
        true
    }

    fn apply(&self, class_map: &mut ClassMap, member: &'static str) -> Result<(), MapError> {
        class_map.set_id_member(member)
    }
}

///
/// ExtraElementsMarker
///
/// Declares the bearing member as the extra-elements capture slot.
/// Single-use per class.
///

pub struct ExtraElementsMarker;

impl MemberMarker for ExtraElementsMarker {
    fn kind(&self) -> MarkerKind {
        MarkerKind::ExtraElements
    }

    fn single_use(&self) -> bool {
        true
    }

    fn apply(&self, class_map: &mut ClassMap, member: &'static str) -> Result<(), MapError> {
        class_map.set_extra_elements_member(member)
    }
}

///
/// ElementNameMarker
///
/// Overrides the document element name for the bearing member.
///

pub struct ElementNameMarker(pub &'static str);

impl MemberMarker for ElementNameMarker {
    fn kind(&self) -> MarkerKind {
        MarkerKind::ElementName
    }

    fn apply(&self, class_map: &mut ClassMap, member: &'static str) -> Result<(), MapError> {
        class_map.require_member_map_mut(member)?.set_element_name(self.0);

        Ok(())
    }
}

///
/// IgnoreMarker
///
/// Excludes the bearing member from mapping. Interpreted by the marker
/// convention's before-members scan; never opts a member in and carries no
/// per-member mutation of its own.
///

pub struct IgnoreMarker;

impl MemberMarker for IgnoreMarker {
    fn kind(&self) -> MarkerKind {
        MarkerKind::Ignore
    }

    fn apply(&self, _class_map: &mut ClassMap, _member: &'static str) -> Result<(), MapError> {
        Ok(())
    }
}

///
/// DefaultValueMarker
///

pub struct DefaultValueMarker(pub Value);

impl MemberMarker for DefaultValueMarker {
    fn kind(&self) -> MarkerKind {
        MarkerKind::DefaultValue
    }

    fn apply(&self, class_map: &mut ClassMap, member: &'static str) -> Result<(), MapError> {
        class_map
            .require_member_map_mut(member)?
            .set_default_value(self.0.clone());

        Ok(())
    }
}

///
/// IgnoreIfDefaultMarker
///

pub struct IgnoreIfDefaultMarker(pub bool);

impl MemberMarker for IgnoreIfDefaultMarker {
    fn kind(&self) -> MarkerKind {
        MarkerKind::IgnoreIfDefault
    }

    fn apply(&self, class_map: &mut ClassMap, member: &'static str) -> Result<(), MapError> {
        class_map
            .require_member_map_mut(member)?
            .set_ignore_if_default(self.0);

        Ok(())
    }
}

///
/// IgnoreIfNoneMarker
///

pub struct IgnoreIfNoneMarker(pub bool);

impl MemberMarker for IgnoreIfNoneMarker {
    fn kind(&self) -> MarkerKind {
        MarkerKind::IgnoreIfNone
    }

    fn apply(&self, class_map: &mut ClassMap, member: &'static str) -> Result<(), MapError> {
        class_map
            .require_member_map_mut(member)?
            .set_ignore_if_none(self.0);

        Ok(())
    }
}

///
/// RepresentationMarker
///

pub struct RepresentationMarker(pub Representation);

impl MemberMarker for RepresentationMarker {
    fn kind(&self) -> MarkerKind {
        MarkerKind::Representation
    }

    fn apply(&self, class_map: &mut ClassMap, member: &'static str) -> Result<(), MapError> {
        class_map
            .require_member_map_mut(member)?
            .set_serialization_options(Some(SerializationOptions::Representation(self.0)));

        Ok(())
    }
}

///
/// IgnoreExtraElementsMarker
///
/// Class-level: fixes the ignore-extra-elements flag for the class.
///

pub struct IgnoreExtraElementsMarker(pub bool);

impl ClassMarker for IgnoreExtraElementsMarker {
    fn apply(&self, class_map: &mut ClassMap) -> Result<(), MapError> {
        class_map.set_ignore_extra_elements(self.0);

        Ok(())
    }
}
