use crate::meta::MemberType;
use std::{
    collections::HashMap,
    sync::{Arc, LazyLock},
};

///
/// IdGenerator
///
/// Identity of an id-generation strategy. The concrete algorithms live
/// downstream in the driver; the pipeline only assigns references.
///

pub trait IdGenerator: Send + Sync {
    fn name(&self) -> &'static str;
}

///
/// StringObjectIdGenerator
///
/// Generator assigned to string id members stored with the object-id
/// representation.
///

pub struct StringObjectIdGenerator;

static STRING_OBJECT_ID: LazyLock<Arc<StringObjectIdGenerator>> =
    LazyLock::new(|| Arc::new(StringObjectIdGenerator));

impl StringObjectIdGenerator {
    #[must_use]
    pub fn instance() -> Arc<dyn IdGenerator> {
        STRING_OBJECT_ID.clone()
    }
}

impl IdGenerator for StringObjectIdGenerator {
    fn name(&self) -> &'static str {
        "string-object-id"
    }
}

///
/// IdGeneratorRegistry
///
/// Generator registrations keyed by declared member type. Constructed
/// explicitly by the caller and handed to the lookup convention; there is
/// no process-wide mutable registry.
///

#[derive(Default)]
pub struct IdGeneratorRegistry {
    generators: HashMap<MemberType, Arc<dyn IdGenerator>>,
}

impl IdGeneratorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            generators: HashMap::new(),
        }
    }

    pub fn register(&mut self, ty: MemberType, generator: Arc<dyn IdGenerator>) {
        self.generators.insert(ty, generator);
    }

    #[must_use]
    pub fn lookup(&self, ty: MemberType) -> Option<Arc<dyn IdGenerator>> {
        self.generators.get(&ty).cloned()
    }
}
