//! The convention pipeline: named rules grouped into ordered packs and
//! applied to a class map in three strict phases (before-members,
//! per-member, after-members).
//!
//! A convention exposes each phase it participates in through a capability
//! probe; the runner dispatches one instance independently into every phase
//! it exposes.

pub mod default;
pub mod delegate;
pub mod legacy;
pub mod marker;
pub mod pack;
pub mod runner;

use crate::{
    class_map::{ClassMap, MapError},
    meta::MarkerKind,
};
use thiserror::Error as ThisError;

///
/// ConventionError
///
/// Any failure aborts the pipeline run; partially-mapped class maps are
/// never cached or reused.
///

#[derive(Debug, ThisError)]
pub enum ConventionError {
    #[error(
        "marker `{kind}` may only be applied to a single member of class `{class}` (second occurrence on `{member}`)"
    )]
    DuplicateMemberMarker {
        kind: MarkerKind,
        class: &'static str,
        member: &'static str,
    },

    #[error(transparent)]
    Map(#[from] MapError),
}

///
/// Convention
///
/// A named, composable mapping rule. Immutable once constructed; any
/// internal state is configuration, never run-to-run mutable state.
///

pub trait Convention: Send + Sync {
    fn name(&self) -> &str;

    fn before_members(&self) -> Option<&dyn ClassMapConvention> {
        None
    }

    fn per_member(&self) -> Option<&dyn MemberMapConvention> {
        None
    }

    fn after_members(&self) -> Option<&dyn ClassMapConvention> {
        None
    }
}

///
/// ClassMapConvention
///
/// Whole-descriptor capability, used for both the before-members and
/// after-members phases.
///

pub trait ClassMapConvention {
    fn apply(&self, class_map: &mut ClassMap) -> Result<(), ConventionError>;
}

///
/// MemberMapConvention
///
/// Per-member capability. Receives the owning class map so marker
/// application can address the id and extra-elements slots.
///
/// Contract: implementations must not map or unmap members; the runner
/// snapshots the member set at phase entry and will not visit members
/// mapped afterwards.
///

pub trait MemberMapConvention {
    fn apply(&self, class_map: &mut ClassMap, member: &'static str) -> Result<(), ConventionError>;
}
