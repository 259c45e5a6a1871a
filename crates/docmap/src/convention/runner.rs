use crate::{
    class_map::ClassMap,
    convention::{Convention, ConventionError, pack::ConventionPack},
};
use std::sync::Arc;

///
/// ConventionRunner
///
/// Applies a pack to one class map in three strict phases:
///
/// 1. before-members: each capable convention once, in pack order
/// 2. per-member: conventions in pack order (outer loop), each applied to
///    every member of a snapshot taken at phase entry (inner loop)
/// 3. after-members: each capable convention once, in pack order
///
/// Any convention failure aborts the run and propagates. The runner holds
/// its own copy of the pack's convention list; later pack mutation does not
/// affect a constructed runner.
///

pub struct ConventionRunner {
    conventions: Vec<Arc<dyn Convention>>,
}

impl ConventionRunner {
    #[must_use]
    pub fn new(pack: &ConventionPack) -> Self {
        Self {
            conventions: pack.iter().cloned().collect(),
        }
    }

    pub fn apply(&self, class_map: &mut ClassMap) -> Result<(), ConventionError> {
        for convention in &self.conventions {
            if let Some(before) = convention.before_members() {
                before.apply(class_map)?;
            }
        }

        // Snapshot: members mapped after phase entry are never visited,
        // members unmapped mid-phase are skipped.
        let members = class_map.declared_member_names();
        for convention in &self.conventions {
            if let Some(per_member) = convention.per_member() {
                for &member in &members {
                    if class_map.member_map(member).is_none() {
                        continue;
                    }
                    per_member.apply(class_map, member)?;
                }
            }
        }

        for convention in &self.conventions {
            if let Some(after) = convention.after_members() {
                after.apply(class_map)?;
            }
        }

        Ok(())
    }
}
