use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use serde_json::Value;

use crate::MappingError;
use crate::info::ClassId;
use crate::registry::MappingRegistry;
use crate::serde::Serializable;
use crate::value::FieldValue;

/// Produces a blank instance of a concrete subclass.
pub type Initializer = Arc<dyn Fn() -> Box<dyn Serializable> + Send + Sync>;

// -----------------------------------------------------------------------------
// SwitchCase

/// One entry of a base class's discriminant switch table.
#[derive(Clone)]
pub struct SwitchCase {
    key: String,
    value: Value,
    class: ClassId,
    init: Initializer,
}

impl SwitchCase {
    /// The external key of the discriminant field.
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The value selecting this case.
    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The subclass this case instantiates.
    #[inline]
    pub fn class(&self) -> ClassId {
        self.class
    }

    /// Creates a blank instance of the subclass.
    #[inline]
    pub fn instantiate(&self) -> Box<dyn Serializable> {
        (self.init)()
    }
}

impl fmt::Debug for SwitchCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwitchCase")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("class", &self.class)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Registration

impl MappingRegistry {
    /// Adds a case to the switch table of `base`.
    ///
    /// If `value` is `None`, the expected value is read now from a blank
    /// instance produced by `init`, through the entry `class` maps under `key`.
    /// That entry must exist and the blank instance must hold a JSON value for
    /// it, otherwise this fails with [`MappingError::InvalidDiscriminant`].
    pub fn register_switch(
        &mut self,
        base: ClassId,
        key: impl Into<String>,
        value: Option<Value>,
        class: ClassId,
        init: Initializer,
    ) -> Result<(), MappingError> {
        let key = key.into();
        let value = match value {
            Some(value) => value,
            None => self.default_discriminant(class, &key, &init)?,
        };

        self.switches
            .get_or_insert(base.type_id(), Vec::new)
            .push(SwitchCase {
                key,
                value,
                class,
                init,
            });
        Ok(())
    }

    /// Returns the switch cases registered against `base`, in order.
    pub fn switch_cases(&self, base: ClassId) -> &[SwitchCase] {
        self.switches
            .get(&base.type_id())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn default_discriminant(
        &self,
        class: ClassId,
        key: &str,
        init: &Initializer,
    ) -> Result<Value, MappingError> {
        let invalid = || MappingError::InvalidDiscriminant {
            class,
            key: key.into(),
        };
        let entry = self
            .table_for(class)
            .and_then(|table| table.get_by_external_key(key))
            .ok_or_else(invalid)?;

        match init().read_field(entry.field()) {
            Some(FieldValue::Json(value)) => Ok(value),
            _ => Err(invalid()),
        }
    }
}
