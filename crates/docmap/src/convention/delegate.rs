//! Closure-backed conventions, for one-off rules that do not warrant a
//! named type. Usually created through the pack helper methods.

use crate::{
    class_map::ClassMap,
    convention::{ClassMapConvention, Convention, ConventionError, MemberMapConvention},
};

type ClassMapAction = Box<dyn Fn(&mut ClassMap) -> Result<(), ConventionError> + Send + Sync>;
type MemberMapAction =
    Box<dyn Fn(&mut ClassMap, &'static str) -> Result<(), ConventionError> + Send + Sync>;

///
/// DelegateBeforeMembersConvention
///

pub struct DelegateBeforeMembersConvention {
    name: String,
    action: ClassMapAction,
}

impl DelegateBeforeMembersConvention {
    pub fn new<F>(name: impl Into<String>, action: F) -> Self
    where
        F: Fn(&mut ClassMap) -> Result<(), ConventionError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            action: Box::new(action),
        }
    }
}

impl Convention for DelegateBeforeMembersConvention {
    fn name(&self) -> &str {
        &self.name
    }

    fn before_members(&self) -> Option<&dyn ClassMapConvention> {
        Some(self)
    }
}

impl ClassMapConvention for DelegateBeforeMembersConvention {
    fn apply(&self, class_map: &mut ClassMap) -> Result<(), ConventionError> {
        (self.action)(class_map)
    }
}

///
/// DelegateAfterMembersConvention
///

pub struct DelegateAfterMembersConvention {
    name: String,
    action: ClassMapAction,
}

impl DelegateAfterMembersConvention {
    pub fn new<F>(name: impl Into<String>, action: F) -> Self
    where
        F: Fn(&mut ClassMap) -> Result<(), ConventionError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            action: Box::new(action),
        }
    }
}

impl Convention for DelegateAfterMembersConvention {
    fn name(&self) -> &str {
        &self.name
    }

    fn after_members(&self) -> Option<&dyn ClassMapConvention> {
        Some(self)
    }
}

impl ClassMapConvention for DelegateAfterMembersConvention {
    fn apply(&self, class_map: &mut ClassMap) -> Result<(), ConventionError> {
        (self.action)(class_map)
    }
}

///
/// DelegateMemberMapConvention
///

pub struct DelegateMemberMapConvention {
    name: String,
    action: MemberMapAction,
}

impl DelegateMemberMapConvention {
    pub fn new<F>(name: impl Into<String>, action: F) -> Self
    where
        F: Fn(&mut ClassMap, &'static str) -> Result<(), ConventionError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            action: Box::new(action),
        }
    }
}

impl Convention for DelegateMemberMapConvention {
    fn name(&self) -> &str {
        &self.name
    }

    fn per_member(&self) -> Option<&dyn MemberMapConvention> {
        Some(self)
    }
}

impl MemberMapConvention for DelegateMemberMapConvention {
    fn apply(&self, class_map: &mut ClassMap, member: &'static str) -> Result<(), ConventionError> {
        (self.action)(class_map, member)
    }
}
