use alloc::vec::Vec;

use log::trace;
use serde_json::Value;

use crate::MappingError;
use crate::registry::MappingRegistry;
use crate::serde::Serializable;
use crate::table::PropertyEntry;
use crate::value::{FieldValue, JsonInput};

// -----------------------------------------------------------------------------
// Deserialization

impl MappingRegistry {
    /// Populates `instance` from JSON text or an already-parsed JSON object.
    ///
    /// Input keys without an entry in the instance's table are dropped.
    /// Matched values go through the entry's hydration strategy, element by
    /// element for arrays, and are written with [`Serializable::write_field`].
    ///
    /// Returns the same instance to allow chaining.
    pub fn deserialize<'a, 'i, T: Serializable + ?Sized>(
        &self,
        instance: &'a mut T,
        input: impl Into<JsonInput<'i>>,
    ) -> Result<&'a mut T, MappingError> {
        let class = instance.class_id();
        let table = self.require_table(class)?;
        let input = input.into().into_object()?;

        for (key, raw) in input {
            let Some(entry) = table.get_by_external_key(&key) else {
                trace!("dropping unmapped key `{key}` while deserializing `{class}`");
                continue;
            };
            let value = self.hydrate(entry, raw)?;
            instance.write_field(entry.field(), value)?;
        }

        Ok(instance)
    }

    /// Creates a default `T` and populates it.
    pub fn deserialize_new<'i, T: Serializable + Default>(
        &self,
        input: impl Into<JsonInput<'i>>,
    ) -> Result<T, MappingError> {
        let mut instance = T::default();
        self.deserialize(&mut instance, input)?;
        Ok(instance)
    }

    fn hydrate(&self, entry: &PropertyEntry, raw: Value) -> Result<FieldValue, MappingError> {
        let Some(strategy) = entry.hydrate() else {
            return Ok(FieldValue::Json(raw));
        };
        match raw {
            Value::Array(items) => items
                .into_iter()
                .map(|item| strategy.apply(FieldValue::Json(item), self))
                .collect::<Result<Vec<_>, _>>()
                .map(FieldValue::Array),
            raw => strategy.apply(FieldValue::Json(raw), self),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
