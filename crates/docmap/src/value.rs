use serde::{Serialize, Serializer, ser::SerializeMap};

///
/// Value
///
/// Runtime value in the self-describing document model. Only the surface
/// consumed by mapping conventions lives here; the wire encoding of
/// documents is owned by the codec layer.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Value {
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Double(f64),
    Text(String),
    Document(Document),
}

impl Value {
    #[must_use]
    pub const fn is_document(&self) -> bool {
        matches!(self, Self::Document(_))
    }
}

///
/// Document
///
/// Ordered element container. Element order is significant and preserved;
/// duplicate element names are not rejected at this layer.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    elements: Vec<(String, Value)>,
}

impl Document {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.elements.push((name.into(), value));
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.elements.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.elements.len()))?;
        for (name, value) in &self.elements {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

///
/// Representation
///
/// Wire-representation hint for a single element.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum Representation {
    ObjectId,
    Text,
    Int32,
    Int64,
    Double,
}

///
/// SerializationOptions
///
/// Per-member serialization payload. Opaque to the convention pipeline
/// except for the representation probe used by the string-id rule.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum SerializationOptions {
    Representation(Representation),
}

impl SerializationOptions {
    #[must_use]
    pub const fn representation(&self) -> Option<Representation> {
        match self {
            Self::Representation(representation) => Some(*representation),
        }
    }
}
