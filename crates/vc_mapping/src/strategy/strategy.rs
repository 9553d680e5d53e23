use alloc::sync::Arc;
use core::fmt;

use serde_json::Value;

use crate::MappingError;
use crate::registry::MappingRegistry;
use crate::serde::Serializable;
use crate::value::FieldValue;

type TransformFn =
    dyn Fn(FieldValue, &MappingRegistry) -> Result<FieldValue, MappingError> + Send + Sync;

// -----------------------------------------------------------------------------
// Strategy

/// A pure transform from one [`FieldValue`] to another.
///
/// Strategies receive the [`MappingRegistry`] driving the conversion, so a
/// stage can build nested mapped objects (see [`Strategy::object`]). Most
/// strategies ignore it and are created with [`Strategy::new`] or
/// [`Strategy::json`].
///
/// Cloning is cheap: the function is shared.
///
/// # Examples
///
/// ```
/// use serde_json::{Value, json};
/// use vc_mapping::MappingRegistry;
/// use vc_mapping::strategy::Strategy;
/// use vc_mapping::value::FieldValue;
///
/// let registry = MappingRegistry::new();
/// let double = Strategy::json(|v: Value| Ok(json!(v.as_i64().unwrap_or(0) * 2)));
///
/// let out = double.apply(FieldValue::from(21), &registry).unwrap();
/// assert_eq!(out.as_json(), Some(&json!(42)));
/// ```
#[derive(Clone)]
pub struct Strategy {
    func: Arc<TransformFn>,
}

impl Strategy {
    /// Creates a strategy from a function of the value alone.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(FieldValue) -> Result<FieldValue, MappingError> + Send + Sync + 'static,
    {
        Self::with_registry(move |value, _| func(value))
    }

    /// Creates a strategy that also reads the registry.
    pub fn with_registry<F>(func: F) -> Self
    where
        F: Fn(FieldValue, &MappingRegistry) -> Result<FieldValue, MappingError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            func: Arc::new(func),
        }
    }

    /// Returns the value unchanged.
    pub fn identity() -> Self {
        Self::new(Ok)
    }

    /// Creates a strategy over plain JSON values.
    ///
    /// Arrays of JSON values are converted to a JSON array first;
    /// any other non-JSON input is rejected with [`MappingError::UnexpectedValue`].
    pub fn json<F>(func: F) -> Self
    where
        F: Fn(Value) -> Result<Value, MappingError> + Send + Sync + 'static,
    {
        Self::new(move |value: FieldValue| func(value.into_json()?).map(FieldValue::Json))
    }

    /// Hydrates a JSON object into a fresh `T` through `T`'s own mapping table.
    ///
    /// Nested objects are never rebuilt automatically on the hydration side;
    /// a field holding a mapped object registers this strategy to get one.
    /// Values that are not JSON objects, such as `null`, pass through.
    pub fn object<T: Serializable + Default>() -> Self {
        Self::with_registry(|value, registry| match value {
            FieldValue::Json(Value::Object(map)) => {
                let mut instance = T::default();
                registry.deserialize(&mut instance, map)?;
                Ok(FieldValue::object(instance))
            }
            other => Ok(other),
        })
    }

    /// Applies the strategy.
    #[inline]
    pub fn apply(
        &self,
        value: FieldValue,
        registry: &MappingRegistry,
    ) -> Result<FieldValue, MappingError> {
        (self.func)(value, registry)
    }

    /// Returns a strategy applying `self`, then `next`.
    pub fn then(self, next: Strategy) -> Self {
        Self::with_registry(move |value, registry| {
            next.apply(self.apply(value, registry)?, registry)
        })
    }
}

impl fmt::Debug for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Strategy").finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Tests
