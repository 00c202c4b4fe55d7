//! Schemaless documents and entity encoding.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::StoreError;

/// Field map of a schemaless document.
pub type Fields = serde_json::Map<String, Value>;

/// A document as read from or written to the store.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    /// Collection the document lives in.
    pub collection: String,
    /// Document id within the collection.
    pub id: String,
    /// Field map.
    pub fields: Fields,
}

impl Document {
    /// Encode an entity into a document at the given address.
    ///
    /// # Errors
    /// Fails if the entity does not serialize to a JSON object.
    pub fn encode<T: Serialize>(
        collection: &str,
        id: &str,
        entity: &T,
    ) -> Result<Self, StoreError> {
        let fields = fields_of(entity)?;
        Ok(Self {
            collection: collection.to_string(),
            id: id.to_string(),
            fields,
        })
    }

    /// Decode the field map back into an entity.
    ///
    /// # Errors
    /// Fails if the fields do not match the entity's shape.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        let value = Value::Object(self.fields.clone());
        Ok(serde_json::from_value(value)?)
    }
}

/// Serialize an entity to a bare field map.
///
/// # Errors
/// Fails if the entity serializes to a non-object value.
pub fn fields_of<T: Serialize>(entity: &T) -> Result<Fields, StoreError> {
    match serde_json::to_value(entity)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Serialization(serde::ser::Error::custom(
            format!("expected JSON object, got {other}"),
        ))),
    }
}
