use crate::{
    class_map::ClassMap,
    convention::{
        Convention, ConventionError,
        delegate::{
            DelegateAfterMembersConvention, DelegateBeforeMembersConvention,
            DelegateMemberMapConvention,
        },
    },
};
use derive_more::{Deref, IntoIterator};
use std::sync::Arc;
use thiserror::Error as ThisError;

///
/// PackError
///

#[derive(Debug, ThisError)]
pub enum PackError {
    #[error("unable to find a convention named `{name}`")]
    NameNotFound { name: String },
}

///
/// ConventionPack
///
/// Ordered, mutable collection of conventions. Insertion order is
/// significant and preserved; names are not required to be unique.
/// Mutated by its owner before a run, read-only while a runner holds it.
///

#[derive(Clone, Default, Deref, IntoIterator)]
pub struct ConventionPack {
    #[deref]
    #[into_iterator(owned, ref)]
    conventions: Vec<Arc<dyn Convention>>,
}

impl ConventionPack {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            conventions: Vec::new(),
        }
    }

    /// Append a convention.
    pub fn add(&mut self, convention: Arc<dyn Convention>) {
        self.conventions.push(convention);
    }

    /// Append all conventions in order.
    pub fn add_range<I>(&mut self, conventions: I)
    where
        I: IntoIterator<Item = Arc<dyn Convention>>,
    {
        self.conventions.extend(conventions);
    }

    /// Append the conventions of another pack, preserving their relative
    /// order.
    pub fn append(&mut self, other: &Self) {
        self.conventions.extend(other.conventions.iter().cloned());
    }

    /// Insert immediately before the first convention with the given name.
    pub fn insert_before(
        &mut self,
        name: &str,
        convention: Arc<dyn Convention>,
    ) -> Result<(), PackError> {
        let index = self.position(name).ok_or_else(|| PackError::NameNotFound {
            name: name.to_string(),
        })?;

        self.conventions.insert(index, convention);

        Ok(())
    }

    /// Insert immediately after the first convention with the given name.
    pub fn insert_after(
        &mut self,
        name: &str,
        convention: Arc<dyn Convention>,
    ) -> Result<(), PackError> {
        let index = self.position(name).ok_or_else(|| PackError::NameNotFound {
            name: name.to_string(),
        })?;

        self.conventions.insert(index + 1, convention);

        Ok(())
    }

    /// Remove every convention with the given name.
    pub fn remove(&mut self, name: &str) {
        self.conventions.retain(|c| c.name() != name);
    }

    /// Append a closure-backed before-members convention.
    pub fn add_before_members<F>(&mut self, name: impl Into<String>, action: F)
    where
        F: Fn(&mut ClassMap) -> Result<(), ConventionError> + Send + Sync + 'static,
    {
        self.add(Arc::new(DelegateBeforeMembersConvention::new(name, action)));
    }

    /// Append a closure-backed per-member convention.
    pub fn add_member_map<F>(&mut self, name: impl Into<String>, action: F)
    where
        F: Fn(&mut ClassMap, &'static str) -> Result<(), ConventionError> + Send + Sync + 'static,
    {
        self.add(Arc::new(DelegateMemberMapConvention::new(name, action)));
    }

    /// Append a closure-backed after-members convention.
    pub fn add_after_members<F>(&mut self, name: impl Into<String>, action: F)
    where
        F: Fn(&mut ClassMap) -> Result<(), ConventionError> + Send + Sync + 'static,
    {
        self.add(Arc::new(DelegateAfterMembersConvention::new(name, action)));
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.conventions.iter().position(|c| c.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str);

    impl Convention for Named {
        fn name(&self) -> &str {
            self.0
        }
    }

    fn names(pack: &ConventionPack) -> Vec<String> {
        pack.iter().map(|c| c.name().to_string()).collect()
    }

    #[test]
    fn add_appends_in_order() {
        let mut pack = ConventionPack::new();
        pack.add(Arc::new(Named("A")));
        pack.add(Arc::new(Named("B")));

        assert_eq!(names(&pack), vec!["A", "B"]);
    }

    #[test]
    fn insert_before_and_after_surround_target() {
        let mut pack = ConventionPack::new();
        pack.add(Arc::new(Named("X")));

        pack.insert_before("X", Arc::new(Named("before"))).unwrap();
        pack.insert_after("X", Arc::new(Named("after"))).unwrap();

        assert_eq!(pack.len(), 3);
        assert_eq!(names(&pack), vec!["before", "X", "after"]);
    }

    #[test]
    fn insert_targets_first_name_match() {
        let mut pack = ConventionPack::new();
        pack.add(Arc::new(Named("X")));
        pack.add(Arc::new(Named("X")));

        pack.insert_after("X", Arc::new(Named("mid"))).unwrap();

        assert_eq!(names(&pack), vec!["X", "mid", "X"]);
    }

    #[test]
    fn insert_before_unknown_name_fails() {
        let mut pack = ConventionPack::new();
        let err = pack.insert_before("Nope", Arc::new(Named("A"))).unwrap_err();

        assert!(err.to_string().contains("Nope"));
    }

    #[test]
    fn remove_removes_all_matches() {
        let mut pack = ConventionPack::new();
        pack.add(Arc::new(Named("X")));
        pack.add(Arc::new(Named("Y")));
        pack.add(Arc::new(Named("X")));

        pack.remove("X");

        assert_eq!(names(&pack), vec!["Y"]);
    }

    #[test]
    fn append_preserves_relative_order() {
        let mut first = ConventionPack::new();
        first.add(Arc::new(Named("A")));

        let mut second = ConventionPack::new();
        second.add(Arc::new(Named("B")));
        second.add(Arc::new(Named("C")));

        first.append(&second);

        assert_eq!(names(&first), vec!["A", "B", "C"]);
        assert_eq!(second.len(), 2);
    }
}
