use crate::{
    generator::IdGenerator,
    meta::{ClassMeta, MemberMeta, MemberType},
    value::{SerializationOptions, Value},
};
use std::sync::Arc;
use thiserror::Error as ThisError;

///
/// MapError
///
/// Descriptor-level failures. `NotMapped` is the defensive check behind the
/// slot invariant: the id and extra-elements slots may only reference
/// currently-mapped members.
///

#[derive(Debug, ThisError)]
pub enum MapError {
    #[error("member `{member}` is not declared on class `{class}`")]
    NotDeclared {
        class: &'static str,
        member: &'static str,
    },

    #[error("member `{member}` of class `{class}` is not mapped")]
    NotMapped {
        class: &'static str,
        member: &'static str,
    },
}

///
/// MemberMap
///
/// Mapping state for one declared member: how it appears in documents and
/// how it behaves during conversion. Created when a convention maps the
/// member, mutated by later phases.
///

pub struct MemberMap {
    meta: Arc<MemberMeta>,
    element_name: String,
    default_value: Option<Value>,
    id_generator: Option<Arc<dyn IdGenerator>>,
    ignore_if_default: bool,
    ignore_if_none: bool,
    options: Option<SerializationOptions>,
}

impl MemberMap {
    pub(crate) fn new(meta: Arc<MemberMeta>) -> Self {
        let element_name = meta.name.to_string();

        Self {
            meta,
            element_name,
            default_value: None,
            id_generator: None,
            ignore_if_default: false,
            ignore_if_none: false,
            options: None,
        }
    }

    #[must_use]
    pub fn meta(&self) -> &MemberMeta {
        &self.meta
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.meta.name
    }

    #[must_use]
    pub fn member_type(&self) -> MemberType {
        self.meta.ty
    }

    #[must_use]
    pub fn element_name(&self) -> &str {
        &self.element_name
    }

    pub fn set_element_name(&mut self, name: impl Into<String>) {
        self.element_name = name.into();
    }

    #[must_use]
    pub const fn default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    pub fn set_default_value(&mut self, value: Value) {
        self.default_value = Some(value);
    }

    #[must_use]
    pub const fn id_generator(&self) -> Option<&Arc<dyn IdGenerator>> {
        self.id_generator.as_ref()
    }

    pub fn set_id_generator(&mut self, generator: Option<Arc<dyn IdGenerator>>) {
        self.id_generator = generator;
    }

    #[must_use]
    pub const fn ignore_if_default(&self) -> bool {
        self.ignore_if_default
    }

    pub const fn set_ignore_if_default(&mut self, value: bool) {
        self.ignore_if_default = value;
    }

    #[must_use]
    pub const fn ignore_if_none(&self) -> bool {
        self.ignore_if_none
    }

    pub const fn set_ignore_if_none(&mut self, value: bool) {
        self.ignore_if_none = value;
    }

    #[must_use]
    pub const fn serialization_options(&self) -> Option<&SerializationOptions> {
        self.options.as_ref()
    }

    pub fn set_serialization_options(&mut self, options: Option<SerializationOptions>) {
        self.options = options;
    }
}

///
/// ClassMap
///
/// Mapping descriptor for one registered class. Mutated in place by the
/// convention pipeline, then treated as read-only once the run completes.
/// Mapping order (the order members were mapped in) drives document field
/// order and is preserved.
///

pub struct ClassMap {
    meta: Arc<ClassMeta>,
    member_maps: Vec<MemberMap>,
    id_member: Option<&'static str>,
    extra_elements_member: Option<&'static str>,
    ignore_extra_elements: bool,
}

impl ClassMap {
    #[must_use]
    pub fn new(meta: Arc<ClassMeta>) -> Self {
        Self {
            meta,
            member_maps: Vec::new(),
            id_member: None,
            extra_elements_member: None,
            ignore_extra_elements: false,
        }
    }

    #[must_use]
    pub fn meta(&self) -> &ClassMeta {
        &self.meta
    }

    #[must_use]
    pub fn path(&self) -> &'static str {
        self.meta.path
    }

    pub fn declared_member_maps(&self) -> impl Iterator<Item = &MemberMap> {
        self.member_maps.iter()
    }

    /// Mapped member names in mapping order. Used by the runner to snapshot
    /// the member set at per-member phase entry.
    #[must_use]
    pub fn declared_member_names(&self) -> Vec<&'static str> {
        self.member_maps.iter().map(MemberMap::name).collect()
    }

    /// Map a declared member, or return the existing map if the member is
    /// already mapped.
    pub fn map_member(&mut self, member: &'static str) -> Result<&mut MemberMap, MapError> {
        if let Some(index) = self.index_of(member) {
            return Ok(&mut self.member_maps[index]);
        }

        let meta = self
            .meta
            .member(member)
            .cloned()
            .ok_or(MapError::NotDeclared {
                class: self.meta.path,
                member,
            })?;

        let index = self.member_maps.len();
        self.member_maps.push(MemberMap::new(meta));

        Ok(&mut self.member_maps[index])
    }

    /// Remove a member's map. Clears the id or extra-elements slot if the
    /// member occupied one. No-op for unmapped members.
    pub fn unmap_member(&mut self, member: &str) {
        self.member_maps.retain(|m| m.name() != member);

        if self.id_member.is_some_and(|name| name == member) {
            self.id_member = None;
        }
        if self.extra_elements_member.is_some_and(|name| name == member) {
            self.extra_elements_member = None;
        }
    }

    #[must_use]
    pub fn member_map(&self, member: &str) -> Option<&MemberMap> {
        self.member_maps.iter().find(|m| m.name() == member)
    }

    pub fn member_map_mut(&mut self, member: &str) -> Option<&mut MemberMap> {
        self.member_maps.iter_mut().find(|m| m.name() == member)
    }

    pub(crate) fn require_member_map_mut(
        &mut self,
        member: &'static str,
    ) -> Result<&mut MemberMap, MapError> {
        let class = self.meta.path;

        self.member_map_mut(member)
            .ok_or(MapError::NotMapped { class, member })
    }

    /// Designate the id member. Replaces any previous designation; the
    /// member must be currently mapped.
    pub fn set_id_member(&mut self, member: &'static str) -> Result<(), MapError> {
        if self.member_map(member).is_none() {
            return Err(MapError::NotMapped {
                class: self.meta.path,
                member,
            });
        }

        self.id_member = Some(member);

        Ok(())
    }

    #[must_use]
    pub fn id_member(&self) -> Option<&MemberMap> {
        let name = self.id_member?;
        self.member_map(name)
    }

    pub fn id_member_mut(&mut self) -> Option<&mut MemberMap> {
        let name = self.id_member?;
        self.member_map_mut(name)
    }

    #[must_use]
    pub const fn id_member_name(&self) -> Option<&'static str> {
        self.id_member
    }

    /// Designate the extra-elements member. Replaces any previous
    /// designation; the member must be currently mapped.
    pub fn set_extra_elements_member(&mut self, member: &'static str) -> Result<(), MapError> {
        if self.member_map(member).is_none() {
            return Err(MapError::NotMapped {
                class: self.meta.path,
                member,
            });
        }

        self.extra_elements_member = Some(member);

        Ok(())
    }

    #[must_use]
    pub fn extra_elements_member(&self) -> Option<&MemberMap> {
        let name = self.extra_elements_member?;
        self.member_map(name)
    }

    #[must_use]
    pub const fn extra_elements_member_name(&self) -> Option<&'static str> {
        self.extra_elements_member
    }

    #[must_use]
    pub const fn ignore_extra_elements(&self) -> bool {
        self.ignore_extra_elements
    }

    pub const fn set_ignore_extra_elements(&mut self, value: bool) {
        self.ignore_extra_elements = value;
    }

    fn index_of(&self, member: &str) -> Option<usize> {
        self.member_maps.iter().position(|m| m.name() == member)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::{MemberMeta, MemberType};

    fn widget_map() -> ClassMap {
        let meta = ClassMeta::builder("tests::Widget")
            .member(MemberMeta::field("id", MemberType::Int64))
            .member(MemberMeta::field("name", MemberType::Text))
            .member(MemberMeta::field("extra", MemberType::Document))
            .build();

        ClassMap::new(meta)
    }

    #[test]
    fn map_member_creates_once() {
        let mut map = widget_map();
        map.map_member("name").unwrap();
        map.map_member("name").unwrap();

        assert_eq!(map.declared_member_names(), vec!["name"]);
    }

    #[test]
    fn map_member_rejects_undeclared() {
        let mut map = widget_map();
        let err = map.map_member("bogus").err().unwrap();

        assert!(matches!(err, MapError::NotDeclared { member: "bogus", .. }));
    }

    #[test]
    fn element_name_defaults_to_member_name() {
        let mut map = widget_map();
        let member = map.map_member("name").unwrap();

        assert_eq!(member.element_name(), "name");
    }

    #[test]
    fn slot_setters_require_mapped_members() {
        let mut map = widget_map();

        assert!(map.set_id_member("id").is_err());

        map.map_member("id").unwrap();
        map.set_id_member("id").unwrap();
        assert_eq!(map.id_member_name(), Some("id"));
    }

    #[test]
    fn set_id_member_replaces_previous() {
        let mut map = widget_map();
        map.map_member("id").unwrap();
        map.map_member("name").unwrap();

        map.set_id_member("id").unwrap();
        map.set_id_member("name").unwrap();

        assert_eq!(map.id_member_name(), Some("name"));
    }

    #[test]
    fn unmap_clears_occupied_slots() {
        let mut map = widget_map();
        map.map_member("id").unwrap();
        map.map_member("extra").unwrap();
        map.set_id_member("id").unwrap();
        map.set_extra_elements_member("extra").unwrap();

        map.unmap_member("extra");
        assert!(map.extra_elements_member().is_none());
        assert_eq!(map.id_member_name(), Some("id"));

        map.unmap_member("id");
        assert!(map.id_member().is_none());
        assert!(map.declared_member_names().is_empty());
    }
}
