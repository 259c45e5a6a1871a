//! Adapters for the deprecated single-purpose convention family.
//!
//! Each legacy trait answers one narrow question about class metadata; the
//! wrappers translate those answers into class-map mutations through exactly
//! one phase capability of the current model. Wrapper names derive from the
//! wrapped convention's concrete type identity, preserving the historical
//! pack-addressing behavior.

use crate::{
    class_map::{ClassMap, MemberMap},
    convention::{ClassMapConvention, Convention, ConventionError, MemberMapConvention},
    generator::{IdGenerator, StringObjectIdGenerator},
    meta::{ClassMeta, MemberMeta, MemberType},
    value::{Representation, SerializationOptions, Value},
};
use std::sync::Arc;

/// Last path segment of a concrete type name.
fn short_type_name<C>() -> &'static str {
    let name = std::any::type_name::<C>();

    name.rsplit("::").next().unwrap_or(name)
}

///
/// Legacy convention traits
///
/// Deprecated: implement [`Convention`] with the appropriate phase
/// capability instead.
///

pub trait MemberFinderConvention: Send + Sync {
    fn find_members(&self, meta: &ClassMeta) -> Vec<&'static str>;
}

pub trait IdMemberConvention: Send + Sync {
    fn find_id_member(&self, meta: &ClassMeta) -> Option<&'static str>;
}

pub trait IdGeneratorConvention: Send + Sync {
    fn id_generator(&self, member: &MemberMeta) -> Option<Arc<dyn IdGenerator>>;
}

pub trait ExtraElementsMemberConvention: Send + Sync {
    fn find_extra_elements_member(&self, meta: &ClassMeta) -> Option<&'static str>;
}

pub trait IgnoreExtraElementsConvention: Send + Sync {
    fn ignore_extra_elements(&self, meta: &ClassMeta) -> bool;
}

pub trait DefaultValueConvention: Send + Sync {
    fn default_value(&self, member: &MemberMeta) -> Option<Value>;
}

pub trait IgnoreIfDefaultConvention: Send + Sync {
    fn ignore_if_default(&self, member: &MemberMeta) -> bool;
}

pub trait IgnoreIfNoneConvention: Send + Sync {
    fn ignore_if_none(&self, member: &MemberMeta) -> bool;
}

pub trait SerializationOptionsConvention: Send + Sync {
    fn serialization_options(&self, member: &MemberMeta) -> Option<SerializationOptions>;
}

pub trait ElementNameConvention: Send + Sync {
    fn element_name(&self, member: &MemberMeta) -> String;
}

///
/// MemberFinderConventionWrapper
///
/// Before-members. Optionally unmaps previously mapped members absent from
/// the legacy convention's result set; names that resolve to no declared
/// member are skipped silently.
///

pub struct MemberFinderConventionWrapper<C> {
    convention: C,
    remove_old_member_maps: bool,
}

impl<C: MemberFinderConvention> MemberFinderConventionWrapper<C> {
    pub fn new(convention: C) -> Self {
        Self::with_remove_old(convention, true)
    }

    pub const fn with_remove_old(convention: C, remove_old_member_maps: bool) -> Self {
        Self {
            convention,
            remove_old_member_maps,
        }
    }
}

impl<C: MemberFinderConvention> Convention for MemberFinderConventionWrapper<C> {
    fn name(&self) -> &str {
        short_type_name::<C>()
    }

    fn before_members(&self) -> Option<&dyn ClassMapConvention> {
        Some(self)
    }
}

impl<C: MemberFinderConvention> ClassMapConvention for MemberFinderConventionWrapper<C> {
    fn apply(&self, class_map: &mut ClassMap) -> Result<(), ConventionError> {
        let found = self.convention.find_members(class_map.meta());

        if self.remove_old_member_maps {
            let stale: Vec<&'static str> = class_map
                .declared_member_maps()
                .map(MemberMap::name)
                .filter(|name| !found.contains(name))
                .collect();

            for member in stale {
                class_map.unmap_member(member);
            }
        }

        for member in found {
            if class_map.meta().member(member).is_none() {
                continue;
            }
            class_map.map_member(member)?;
        }

        Ok(())
    }
}

///
/// IdMemberConventionWrapper
///

pub struct IdMemberConventionWrapper<C> {
    convention: C,
}

impl<C: IdMemberConvention> IdMemberConventionWrapper<C> {
    pub const fn new(convention: C) -> Self {
        Self { convention }
    }
}

impl<C: IdMemberConvention> Convention for IdMemberConventionWrapper<C> {
    fn name(&self) -> &str {
        short_type_name::<C>()
    }

    fn before_members(&self) -> Option<&dyn ClassMapConvention> {
        Some(self)
    }
}

impl<C: IdMemberConvention> ClassMapConvention for IdMemberConventionWrapper<C> {
    fn apply(&self, class_map: &mut ClassMap) -> Result<(), ConventionError> {
        let Some(member) = self.convention.find_id_member(class_map.meta()) else {
            return Ok(());
        };
        if class_map.meta().member(member).is_none() {
            return Ok(());
        }

        class_map.map_member(member)?;
        class_map.set_id_member(member)?;

        Ok(())
    }
}

///
/// IdGeneratorConventionWrapper
///
/// After-members. Carries the string/object-id special case inline, exactly
/// as the combined legacy convention did before the split into two separate
/// conventions; assigns unconditionally.
///

pub struct IdGeneratorConventionWrapper<C> {
    convention: C,
}

impl<C: IdGeneratorConvention> IdGeneratorConventionWrapper<C> {
    pub const fn new(convention: C) -> Self {
        Self { convention }
    }
}

impl<C: IdGeneratorConvention> Convention for IdGeneratorConventionWrapper<C> {
    fn name(&self) -> &str {
        short_type_name::<C>()
    }

    fn after_members(&self) -> Option<&dyn ClassMapConvention> {
        Some(self)
    }
}

impl<C: IdGeneratorConvention> ClassMapConvention for IdGeneratorConventionWrapper<C> {
    fn apply(&self, class_map: &mut ClassMap) -> Result<(), ConventionError> {
        let Some(id_name) = class_map.id_member_name() else {
            return Ok(());
        };
        let Some(meta) = class_map.meta().member(id_name).cloned() else {
            return Ok(());
        };
        let Some(id_map) = class_map.id_member_mut() else {
            return Ok(());
        };

        let object_id_representation = id_map
            .serialization_options()
            .and_then(SerializationOptions::representation)
            == Some(Representation::ObjectId);

        if id_map.member_type() == MemberType::Text && object_id_representation {
            id_map.set_id_generator(Some(StringObjectIdGenerator::instance()));
        } else {
            id_map.set_id_generator(self.convention.id_generator(&meta));
        }

        Ok(())
    }
}

///
/// ExtraElementsConventionWrapper
///

pub struct ExtraElementsConventionWrapper<C> {
    convention: C,
}

impl<C: ExtraElementsMemberConvention> ExtraElementsConventionWrapper<C> {
    pub const fn new(convention: C) -> Self {
        Self { convention }
    }
}

impl<C: ExtraElementsMemberConvention> Convention for ExtraElementsConventionWrapper<C> {
    fn name(&self) -> &str {
        short_type_name::<C>()
    }

    fn after_members(&self) -> Option<&dyn ClassMapConvention> {
        Some(self)
    }
}

impl<C: ExtraElementsMemberConvention> ClassMapConvention for ExtraElementsConventionWrapper<C> {
    fn apply(&self, class_map: &mut ClassMap) -> Result<(), ConventionError> {
        let Some(member) = self.convention.find_extra_elements_member(class_map.meta()) else {
            return Ok(());
        };
        if class_map.meta().member(member).is_none() {
            return Ok(());
        }

        class_map.map_member(member)?;
        class_map.set_extra_elements_member(member)?;

        Ok(())
    }
}

///
/// IgnoreExtraElementsConventionWrapper
///

pub struct IgnoreExtraElementsConventionWrapper<C> {
    convention: C,
}

impl<C: IgnoreExtraElementsConvention> IgnoreExtraElementsConventionWrapper<C> {
    pub const fn new(convention: C) -> Self {
        Self { convention }
    }
}

impl<C: IgnoreExtraElementsConvention> Convention for IgnoreExtraElementsConventionWrapper<C> {
    fn name(&self) -> &str {
        short_type_name::<C>()
    }

    fn before_members(&self) -> Option<&dyn ClassMapConvention> {
        Some(self)
    }
}

impl<C: IgnoreExtraElementsConvention> ClassMapConvention
    for IgnoreExtraElementsConventionWrapper<C>
{
    fn apply(&self, class_map: &mut ClassMap) -> Result<(), ConventionError> {
        let value = self.convention.ignore_extra_elements(class_map.meta());
        class_map.set_ignore_extra_elements(value);

        Ok(())
    }
}

///
/// DefaultValueConventionWrapper
///

pub struct DefaultValueConventionWrapper<C> {
    convention: C,
}

impl<C: DefaultValueConvention> DefaultValueConventionWrapper<C> {
    pub const fn new(convention: C) -> Self {
        Self { convention }
    }
}

impl<C: DefaultValueConvention> Convention for DefaultValueConventionWrapper<C> {
    fn name(&self) -> &str {
        short_type_name::<C>()
    }

    fn per_member(&self) -> Option<&dyn MemberMapConvention> {
        Some(self)
    }
}

impl<C: DefaultValueConvention> MemberMapConvention for DefaultValueConventionWrapper<C> {
    fn apply(&self, class_map: &mut ClassMap, member: &'static str) -> Result<(), ConventionError> {
        let Some(meta) = class_map.meta().member(member).cloned() else {
            return Ok(());
        };

        if let Some(value) = self.convention.default_value(&meta) {
            class_map
                .require_member_map_mut(member)?
                .set_default_value(value);
        }

        Ok(())
    }
}

///
/// IgnoreIfDefaultConventionWrapper
///

pub struct IgnoreIfDefaultConventionWrapper<C> {
    convention: C,
}

impl<C: IgnoreIfDefaultConvention> IgnoreIfDefaultConventionWrapper<C> {
    pub const fn new(convention: C) -> Self {
        Self { convention }
    }
}

impl<C: IgnoreIfDefaultConvention> Convention for IgnoreIfDefaultConventionWrapper<C> {
    fn name(&self) -> &str {
        short_type_name::<C>()
    }

    fn per_member(&self) -> Option<&dyn MemberMapConvention> {
        Some(self)
    }
}

impl<C: IgnoreIfDefaultConvention> MemberMapConvention for IgnoreIfDefaultConventionWrapper<C> {
    fn apply(&self, class_map: &mut ClassMap, member: &'static str) -> Result<(), ConventionError> {
        let Some(meta) = class_map.meta().member(member).cloned() else {
            return Ok(());
        };

        let value = self.convention.ignore_if_default(&meta);
        class_map
            .require_member_map_mut(member)?
            .set_ignore_if_default(value);

        Ok(())
    }
}

///
/// IgnoreIfNoneConventionWrapper
///

pub struct IgnoreIfNoneConventionWrapper<C> {
    convention: C,
}

impl<C: IgnoreIfNoneConvention> IgnoreIfNoneConventionWrapper<C> {
    pub const fn new(convention: C) -> Self {
        Self { convention }
    }
}

impl<C: IgnoreIfNoneConvention> Convention for IgnoreIfNoneConventionWrapper<C> {
    fn name(&self) -> &str {
        short_type_name::<C>()
    }

    fn per_member(&self) -> Option<&dyn MemberMapConvention> {
        Some(self)
    }
}

impl<C: IgnoreIfNoneConvention> MemberMapConvention for IgnoreIfNoneConventionWrapper<C> {
    fn apply(&self, class_map: &mut ClassMap, member: &'static str) -> Result<(), ConventionError> {
        let Some(meta) = class_map.meta().member(member).cloned() else {
            return Ok(());
        };

        let value = self.convention.ignore_if_none(&meta);
        class_map
            .require_member_map_mut(member)?
            .set_ignore_if_none(value);

        Ok(())
    }
}

///
/// SerializationOptionsConventionWrapper
///

pub struct SerializationOptionsConventionWrapper<C> {
    convention: C,
}

impl<C: SerializationOptionsConvention> SerializationOptionsConventionWrapper<C> {
    pub const fn new(convention: C) -> Self {
        Self { convention }
    }
}

impl<C: SerializationOptionsConvention> Convention for SerializationOptionsConventionWrapper<C> {
    fn name(&self) -> &str {
        short_type_name::<C>()
    }

    fn per_member(&self) -> Option<&dyn MemberMapConvention> {
        Some(self)
    }
}

impl<C: SerializationOptionsConvention> MemberMapConvention
    for SerializationOptionsConventionWrapper<C>
{
    fn apply(&self, class_map: &mut ClassMap, member: &'static str) -> Result<(), ConventionError> {
        let Some(meta) = class_map.meta().member(member).cloned() else {
            return Ok(());
        };

        let options = self.convention.serialization_options(&meta);
        class_map
            .require_member_map_mut(member)?
            .set_serialization_options(options);

        Ok(())
    }
}

///
/// ElementNameConventionWrapper
///

pub struct ElementNameConventionWrapper<C> {
    convention: C,
}

impl<C: ElementNameConvention> ElementNameConventionWrapper<C> {
    pub const fn new(convention: C) -> Self {
        Self { convention }
    }
}

impl<C: ElementNameConvention> Convention for ElementNameConventionWrapper<C> {
    fn name(&self) -> &str {
        short_type_name::<C>()
    }

    fn per_member(&self) -> Option<&dyn MemberMapConvention> {
        Some(self)
    }
}

impl<C: ElementNameConvention> MemberMapConvention for ElementNameConventionWrapper<C> {
    fn apply(&self, class_map: &mut ClassMap, member: &'static str) -> Result<(), ConventionError> {
        let Some(meta) = class_map.meta().member(member).cloned() else {
            return Ok(());
        };

        let name = self.convention.element_name(&meta);
        class_map
            .require_member_map_mut(member)?
            .set_element_name(name);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        convention::{marker::MarkerConvention, pack::ConventionPack, runner::ConventionRunner},
        markers::RepresentationMarker,
    };

    struct PublicFieldFinder;

    impl MemberFinderConvention for PublicFieldFinder {
        fn find_members(&self, meta: &ClassMeta) -> Vec<&'static str> {
            meta.members().iter().map(|m| m.name).collect()
        }
    }

    struct LowercaseIdFinder;

    impl IdMemberConvention for LowercaseIdFinder {
        fn find_id_member(&self, _meta: &ClassMeta) -> Option<&'static str> {
            Some("id")
        }
    }

    struct MissingIdFinder;

    impl IdMemberConvention for MissingIdFinder {
        fn find_id_member(&self, _meta: &ClassMeta) -> Option<&'static str> {
            Some("nonexistent")
        }
    }

    struct FixedGenerator;

    impl IdGeneratorConvention for FixedGenerator {
        fn id_generator(&self, _member: &MemberMeta) -> Option<Arc<dyn IdGenerator>> {
            struct Fixed;

            impl IdGenerator for Fixed {
                fn name(&self) -> &'static str {
                    "fixed"
                }
            }

            Some(Arc::new(Fixed))
        }
    }

    struct SnakeCaseNames;

    impl ElementNameConvention for SnakeCaseNames {
        fn element_name(&self, member: &MemberMeta) -> String {
            member.name.to_lowercase()
        }
    }

    fn widget_meta() -> Arc<ClassMeta> {
        ClassMeta::builder("tests::Widget")
            .member(MemberMeta::field("id", MemberType::Int64))
            .member(MemberMeta::field("Name", MemberType::Text))
            .member(MemberMeta::field("Extra", MemberType::Document))
            .build()
    }

    #[test]
    fn wrapper_names_derive_from_wrapped_type() {
        assert_eq!(
            IdMemberConventionWrapper::new(LowercaseIdFinder).name(),
            "LowercaseIdFinder"
        );
        assert_eq!(
            MemberFinderConventionWrapper::new(PublicFieldFinder).name(),
            "PublicFieldFinder"
        );
    }

    #[test]
    fn id_member_wrapper_maps_and_sets() {
        let mut map = ClassMap::new(widget_meta());
        IdMemberConventionWrapper::new(LowercaseIdFinder)
            .apply(&mut map)
            .unwrap();

        assert_eq!(map.id_member_name(), Some("id"));
        assert!(map.member_map("id").is_some());
    }

    #[test]
    fn id_member_wrapper_skips_unresolvable_names() {
        let mut map = ClassMap::new(widget_meta());
        IdMemberConventionWrapper::new(MissingIdFinder)
            .apply(&mut map)
            .unwrap();

        assert!(map.id_member().is_none());
        assert!(map.declared_member_names().is_empty());
    }

    #[test]
    fn member_finder_wrapper_removes_stale_maps() {
        struct OnlyName;

        impl MemberFinderConvention for OnlyName {
            fn find_members(&self, _meta: &ClassMeta) -> Vec<&'static str> {
                vec!["Name", "ghost"]
            }
        }

        let mut map = ClassMap::new(widget_meta());
        map.map_member("id").unwrap();
        map.set_id_member("id").unwrap();

        MemberFinderConventionWrapper::new(OnlyName)
            .apply(&mut map)
            .unwrap();

        // `id` was unmapped (clearing the slot); `ghost` was skipped.
        assert_eq!(map.declared_member_names(), vec!["Name"]);
        assert!(map.id_member().is_none());
    }

    #[test]
    fn member_finder_wrapper_can_keep_old_maps() {
        struct Nothing;

        impl MemberFinderConvention for Nothing {
            fn find_members(&self, _meta: &ClassMeta) -> Vec<&'static str> {
                Vec::new()
            }
        }

        let mut map = ClassMap::new(widget_meta());
        map.map_member("id").unwrap();

        MemberFinderConventionWrapper::with_remove_old(Nothing, false)
            .apply(&mut map)
            .unwrap();

        assert_eq!(map.declared_member_names(), vec!["id"]);
    }

    #[test]
    fn id_generator_wrapper_delegates_to_the_convention() {
        let mut map = ClassMap::new(widget_meta());
        map.map_member("id").unwrap();
        map.set_id_member("id").unwrap();

        IdGeneratorConventionWrapper::new(FixedGenerator)
            .apply(&mut map)
            .unwrap();

        assert_eq!(
            map.id_member().unwrap().id_generator().map(|g| g.name()),
            Some("fixed")
        );
    }

    #[test]
    fn id_generator_wrapper_applies_string_object_id_special_case() {
        let meta = ClassMeta::builder("tests::Tagged")
            .member(
                MemberMeta::field("_id", MemberType::Text)
                    .marker(RepresentationMarker(Representation::ObjectId)),
            )
            .build();

        let mut pack = ConventionPack::new();
        pack.add_before_members("map-id", |class_map| {
            class_map.map_member("_id")?;
            class_map.set_id_member("_id")?;
            Ok(())
        });
        pack.add(Arc::new(MarkerConvention));
        pack.add(Arc::new(IdGeneratorConventionWrapper::new(FixedGenerator)));

        let mut map = ClassMap::new(meta);
        ConventionRunner::new(&pack).apply(&mut map).unwrap();

        assert_eq!(
            map.id_member().unwrap().id_generator().map(|g| g.name()),
            Some("string-object-id")
        );
    }

    #[test]
    fn element_name_wrapper_renames_members() {
        let mut map = ClassMap::new(widget_meta());
        map.map_member("Name").unwrap();

        ElementNameConventionWrapper::new(SnakeCaseNames)
            .apply(&mut map, "Name")
            .unwrap();

        assert_eq!(map.member_map("Name").unwrap().element_name(), "name");
    }

    #[test]
    fn extra_elements_wrapper_maps_by_name() {
        struct ExtraByName;

        impl ExtraElementsMemberConvention for ExtraByName {
            fn find_extra_elements_member(&self, _meta: &ClassMeta) -> Option<&'static str> {
                Some("Extra")
            }
        }

        let mut map = ClassMap::new(widget_meta());
        ExtraElementsConventionWrapper::new(ExtraByName)
            .apply(&mut map)
            .unwrap();

        assert_eq!(map.extra_elements_member_name(), Some("Extra"));
    }

    #[test]
    fn ignore_extra_elements_wrapper_sets_flag() {
        struct AlwaysIgnore;

        impl IgnoreExtraElementsConvention for AlwaysIgnore {
            fn ignore_extra_elements(&self, _meta: &ClassMeta) -> bool {
                true
            }
        }

        let mut map = ClassMap::new(widget_meta());
        IgnoreExtraElementsConventionWrapper::new(AlwaysIgnore)
            .apply(&mut map)
            .unwrap();

        assert!(map.ignore_extra_elements());
    }

    #[test]
    fn per_member_wrappers_set_values_and_flags() {
        struct Defaults;

        impl DefaultValueConvention for Defaults {
            fn default_value(&self, member: &MemberMeta) -> Option<Value> {
                (member.ty == MemberType::Text).then(|| Value::Text(String::new()))
            }
        }

        struct SparseOptionals;

        impl IgnoreIfNoneConvention for SparseOptionals {
            fn ignore_if_none(&self, _member: &MemberMeta) -> bool {
                true
            }
        }

        let mut map = ClassMap::new(widget_meta());
        map.map_member("Name").unwrap();

        DefaultValueConventionWrapper::new(Defaults)
            .apply(&mut map, "Name")
            .unwrap();
        IgnoreIfNoneConventionWrapper::new(SparseOptionals)
            .apply(&mut map, "Name")
            .unwrap();

        let member = map.member_map("Name").unwrap();
        assert_eq!(member.default_value(), Some(&Value::Text(String::new())));
        assert!(member.ignore_if_none());
    }
}
