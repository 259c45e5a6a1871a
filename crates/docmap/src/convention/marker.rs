//! The declarative-marker convention: folds class and member markers
//! attached to the metadata into the class map.

use crate::{
    class_map::{ClassMap, MemberMap},
    convention::{
        ClassMapConvention, Convention, ConventionError, MemberMapConvention,
        pack::ConventionPack,
    },
    meta::MarkerKind,
};
use std::sync::Arc;

///
/// MarkerConvention
///
/// Before-members: applies class markers, opts in members bearing mapping
/// markers, removes members bearing an ignore marker, then checks
/// single-use marker conflicts across the full member set. Per-member:
/// applies each member's markers in registration order.
///

pub struct MarkerConvention;

impl Convention for MarkerConvention {
    fn name(&self) -> &str {
        "Markers"
    }

    fn before_members(&self) -> Option<&dyn ClassMapConvention> {
        Some(self)
    }

    fn per_member(&self) -> Option<&dyn MemberMapConvention> {
        Some(self)
    }
}

impl ClassMapConvention for MarkerConvention {
    fn apply(&self, class_map: &mut ClassMap) -> Result<(), ConventionError> {
        Self::apply_class_markers(class_map)?;
        Self::opt_in_marked_members(class_map)?;
        Self::unmap_ignored_members(class_map);
        Self::check_single_use_markers(class_map)?;

        Ok(())
    }
}

impl MemberMapConvention for MarkerConvention {
    fn apply(&self, class_map: &mut ClassMap, member: &'static str) -> Result<(), ConventionError> {
        let Some(meta) = class_map.meta().member(member).cloned() else {
            return Ok(());
        };

        for marker in meta.markers() {
            if marker.kind() == MarkerKind::Ignore {
                continue;
            }
            marker.apply(class_map, member)?;
        }

        Ok(())
    }
}

impl MarkerConvention {
    fn apply_class_markers(class_map: &mut ClassMap) -> Result<(), ConventionError> {
        let markers = class_map.meta().markers().to_vec();
        for marker in markers {
            marker.apply(class_map)?;
        }

        Ok(())
    }

    /// Members bearing at least one mapping marker are opted in even when
    /// discovery skipped them, in declaration order.
    fn opt_in_marked_members(class_map: &mut ClassMap) -> Result<(), ConventionError> {
        let marked: Vec<&'static str> = class_map
            .meta()
            .members()
            .iter()
            .filter(|m| m.has_mapping_markers())
            .map(|m| m.name)
            .collect();

        for member in marked {
            class_map.map_member(member)?;
        }

        Ok(())
    }

    fn unmap_ignored_members(class_map: &mut ClassMap) {
        let ignored: Vec<&'static str> = class_map
            .declared_member_maps()
            .filter(|m| m.meta().has_marker_kind(MarkerKind::Ignore))
            .map(MemberMap::name)
            .collect();

        for member in ignored {
            class_map.unmap_member(member);
        }
    }

    /// Runs after the full member set is settled; the first duplicate in
    /// scan order raises.
    fn check_single_use_markers(class_map: &ClassMap) -> Result<(), ConventionError> {
        let mut single_use_seen: Vec<MarkerKind> = Vec::new();

        for member_map in class_map.declared_member_maps() {
            for marker in member_map.meta().markers() {
                let kind = marker.kind();
                if kind == MarkerKind::Ignore {
                    continue;
                }

                if single_use_seen.contains(&kind) {
                    return Err(ConventionError::DuplicateMemberMarker {
                        kind,
                        class: class_map.path(),
                        member: member_map.name(),
                    });
                }

                if marker.single_use() {
                    single_use_seen.push(kind);
                }
            }
        }

        Ok(())
    }
}

/// One-element pack holding the marker convention, for appending to a
/// caller-assembled pipeline.
#[must_use]
pub fn marker_conventions() -> ConventionPack {
    let mut pack = ConventionPack::new();
    pack.add(Arc::new(MarkerConvention));

    pack
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        convention::runner::ConventionRunner,
        markers::{
            ElementNameMarker, ExtraElementsMarker, IdMarker, IgnoreExtraElementsMarker,
            IgnoreIfNoneMarker, IgnoreMarker,
        },
        meta::{ClassMeta, MemberMeta, MemberType},
    };

    fn run(meta: Arc<ClassMeta>) -> Result<ClassMap, ConventionError> {
        let mut map = ClassMap::new(meta);
        ConventionRunner::new(&marker_conventions()).apply(&mut map)?;
        Ok(map)
    }

    #[test]
    fn class_markers_apply_in_registration_order() {
        let meta = ClassMeta::builder("tests::Loose")
            .member(MemberMeta::field("name", MemberType::Text))
            .marker(IgnoreExtraElementsMarker(true))
            .marker(IgnoreExtraElementsMarker(false))
            .build();

        let map = run(meta).unwrap();
        assert!(!map.ignore_extra_elements());
    }

    #[test]
    fn marked_members_opt_in_in_declaration_order() {
        let meta = ClassMeta::builder("tests::OptIn")
            .member(MemberMeta::field("b", MemberType::Text).marker(ElementNameMarker("bee")))
            .member(MemberMeta::field("plain", MemberType::Text))
            .member(MemberMeta::field("a", MemberType::Int64).marker(IdMarker))
            .build();

        let map = run(meta).unwrap();
        assert_eq!(map.declared_member_names(), vec!["b", "a"]);
        assert_eq!(map.member_map("b").unwrap().element_name(), "bee");
        assert_eq!(map.id_member_name(), Some("a"));
    }

    #[test]
    fn ignore_only_member_does_not_opt_in() {
        let meta = ClassMeta::builder("tests::Quiet")
            .member(MemberMeta::field("skipped", MemberType::Text).marker(IgnoreMarker))
            .build();

        let map = run(meta).unwrap();
        assert!(map.declared_member_names().is_empty());
    }

    #[test]
    fn ignore_unmaps_and_clears_extra_elements_slot() {
        let meta = ClassMeta::builder("tests::Overflowing")
            .member(
                MemberMeta::field("extra", MemberType::Document)
                    .marker(ExtraElementsMarker)
                    .marker(IgnoreMarker),
            )
            .build();

        // Pre-populated as if an earlier convention had selected the slot.
        let mut map = ClassMap::new(meta);
        map.map_member("extra").unwrap();
        map.set_extra_elements_member("extra").unwrap();

        ConventionRunner::new(&marker_conventions())
            .apply(&mut map)
            .unwrap();

        assert!(map.extra_elements_member().is_none());
        assert!(map.member_map("extra").is_none());
    }

    #[test]
    fn duplicate_single_use_marker_fails() {
        let meta = ClassMeta::builder("tests::TwoIds")
            .member(MemberMeta::field("first", MemberType::Int64).marker(IdMarker))
            .member(MemberMeta::field("second", MemberType::Int64).marker(IdMarker))
            .build();

        let err = run(meta).err().unwrap();
        assert!(matches!(
            err,
            ConventionError::DuplicateMemberMarker {
                kind: MarkerKind::Id,
                member: "second",
                ..
            }
        ));
        assert!(err.to_string().contains("`id`"));
    }

    #[test]
    fn multi_use_marker_on_several_members_is_allowed() {
        let meta = ClassMeta::builder("tests::Sparse")
            .member(MemberMeta::field("a", MemberType::Text).marker(IgnoreIfNoneMarker(true)))
            .member(
                MemberMeta::field("b", MemberType::Text)
                    .marker(IgnoreIfNoneMarker(true))
                    .marker(IgnoreIfNoneMarker(false)),
            )
            .build();

        let map = run(meta).unwrap();
        assert!(map.member_map("a").unwrap().ignore_if_none());
        // Registration order: the later marker wins.
        assert!(!map.member_map("b").unwrap().ignore_if_none());
    }

    #[test]
    fn per_member_markers_apply_in_registration_order() {
        let meta = ClassMeta::builder("tests::Renamed")
            .member(
                MemberMeta::field("n", MemberType::Text)
                    .marker(ElementNameMarker("first"))
                    .marker(ElementNameMarker("second")),
            )
            .build();

        let map = run(meta).unwrap();
        assert_eq!(map.member_map("n").unwrap().element_name(), "second");
    }
}
