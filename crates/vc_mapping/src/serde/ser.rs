use alloc::string::{String, ToString};
use alloc::vec::Vec;

use serde_json::{Map, Value};

use crate::MappingError;
use crate::info::ClassId;
use crate::registry::MappingRegistry;
use crate::serde::Serializable;
use crate::table::PropertyEntry;
use crate::value::FieldValue;

// -----------------------------------------------------------------------------
// Serialization

impl MappingRegistry {
    /// Converts `instance` into an ordered JSON object.
    ///
    /// Keys follow the merged-entries order of the instance's mapping table.
    /// Fails with [`MappingError::MissingMappingTable`] if neither the class
    /// nor any of its ancestors registered a field.
    pub fn to_plain_object<T: Serializable + ?Sized>(
        &self,
        instance: &T,
    ) -> Result<Map<String, Value>, MappingError> {
        let class = instance.class_id();
        let table = self.require_table(class)?;

        let mut output = Map::new();
        for entry in table.all_entries() {
            let Some(value) = instance.read_field(entry.field()) else {
                continue;
            };
            let dehydrator = Dehydrator {
                registry: self,
                class,
                entry,
            };
            output.insert(entry.key().to_string(), dehydrator.value(value)?);
        }
        Ok(output)
    }

    /// Converts `instance` into compact JSON text.
    pub fn serialize<T: Serializable + ?Sized>(&self, instance: &T) -> Result<String, MappingError> {
        let object = self.to_plain_object(instance)?;
        Ok(serde_json::to_string(&object)?)
    }

    /// Converts `instance` into indented JSON text.
    pub fn serialize_pretty<T: Serializable + ?Sized>(
        &self,
        instance: &T,
    ) -> Result<String, MappingError> {
        let object = self.to_plain_object(instance)?;
        Ok(serde_json::to_string_pretty(&object)?)
    }
}

// -----------------------------------------------------------------------------
// Dehydrator

/// Dehydrates the value of one entry.
struct Dehydrator<'a> {
    registry: &'a MappingRegistry,
    class: ClassId,
    entry: &'a PropertyEntry,
}

impl Dehydrator<'_> {
    /// Nested objects recurse through their own table and never see the
    /// entry's strategy. Arrays are split and each element decided alone.
    fn value(&self, value: FieldValue) -> Result<Value, MappingError> {
        match value {
            FieldValue::Object(object) => self.object(&*object),
            FieldValue::Array(items) => self.array(items),
            FieldValue::Json(Value::Array(items)) => {
                self.array(items.into_iter().map(FieldValue::Json).collect())
            }
            other => {
                let other = match self.entry.dehydrate() {
                    Some(strategy) => strategy.apply(other, self.registry)?,
                    None => other,
                };
                self.finish(other)
            }
        }
    }

    fn array(&self, items: Vec<FieldValue>) -> Result<Value, MappingError> {
        items
            .into_iter()
            .map(|item| self.value(item))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array)
    }

    fn object(&self, object: &dyn Serializable) -> Result<Value, MappingError> {
        self.registry.to_plain_object(object).map(Value::Object)
    }

    /// Converts a strategy's output into JSON without applying it again.
    fn finish(&self, value: FieldValue) -> Result<Value, MappingError> {
        match value {
            FieldValue::Json(value) => Ok(value),
            FieldValue::Object(object) => self.object(&*object),
            FieldValue::Array(items) => items
                .into_iter()
                .map(|item| self.finish(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            FieldValue::Opaque(_) => Err(MappingError::Unrepresentable {
                class: self.class,
                field: self.entry.field().clone(),
            }),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
