//! Convention-driven document mapping.
//!
//! A [`ClassMap`](class_map::ClassMap) describes how a class's members are
//! mapped to document elements. Rather than configuring every map by hand,
//! applications register [`Convention`](convention::Convention)s in an
//! ordered [`ConventionPack`](convention::pack::ConventionPack); the
//! [`ConventionRunner`](convention::runner::ConventionRunner) applies the
//! pack in three strict phases (before-members, per-member, after-members)
//! to produce the finished map.

pub mod class_map;
pub mod convention;
pub mod generator;
pub mod markers;
pub mod meta;
pub mod value;

use thiserror::Error as ThisError;

///
/// Error
///
/// Top-level error wrapper for the crate.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Convention(#[from] convention::ConventionError),

    #[error(transparent)]
    Map(#[from] class_map::MapError),

    #[error(transparent)]
    Pack(#[from] convention::pack::PackError),
}

///
/// PRELUDE
///

pub mod prelude {
    pub use crate::{
        Error,
        class_map::{ClassMap, MapError, MemberMap},
        convention::{
            ClassMapConvention, Convention, ConventionError, MemberMapConvention,
            default::default_conventions,
            marker::{MarkerConvention, marker_conventions},
            pack::{ConventionPack, PackError},
            runner::ConventionRunner,
        },
        generator::{IdGenerator, IdGeneratorRegistry, StringObjectIdGenerator},
        meta::{
            ClassMarker, ClassMeta, ClassMetaBuilder, MarkerKind, MemberKind, MemberMarker,
            MemberMeta, MemberType, Visibility,
        },
        value::{Document, Representation, SerializationOptions, Value},
    };
    pub use std::sync::Arc;
}
