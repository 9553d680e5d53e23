//! The dynamic value model shared by fields and strategies.
//!
//! - [`FieldValue`]: what a field reads as, what strategies transform, and what
//!   a field is written from.
//! - [`JsonInput`]: text or already-parsed JSON accepted by deserialization.

use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::MappingError;
use crate::serde::Serializable;

// -----------------------------------------------------------------------------
// FieldValue

/// The value of one mapped field, in either direction.
///
/// - [`FieldValue::Json`]: plain JSON data.
/// - [`FieldValue::Object`]: a nested [`Serializable`]; dehydration always
///   recurses into it through its own mapping table.
/// - [`FieldValue::Array`]: a sequence whose elements are handled one by one.
/// - [`FieldValue::Opaque`]: a native value, such as a parsed date, that only a
///   strategy knows how to turn into JSON.
pub enum FieldValue {
    Json(Value),
    Object(Box<dyn Serializable>),
    Array(Vec<FieldValue>),
    Opaque(Box<dyn Any>),
}

impl FieldValue {
    /// Wraps a nested serializable value.
    #[inline]
    pub fn object<T: Serializable>(value: T) -> Self {
        FieldValue::Object(Box::new(value))
    }

    /// Wraps a native value.
    #[inline]
    pub fn opaque<T: Any>(value: T) -> Self {
        FieldValue::Opaque(Box::new(value))
    }

    /// Converts any `serde` value into [`FieldValue::Json`].
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, MappingError> {
        Ok(FieldValue::Json(serde_json::to_value(value)?))
    }

    /// Collects values into a [`FieldValue::Array`].
    pub fn array<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<FieldValue>,
    {
        FieldValue::Array(items.into_iter().map(Into::into).collect())
    }

    /// A short description of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Json(value) => json_kind(value),
            FieldValue::Object(_) => "object instance",
            FieldValue::Array(_) => "array",
            FieldValue::Opaque(_) => "opaque value",
        }
    }

    /// Returns the JSON data, if this is [`FieldValue::Json`].
    #[inline]
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            FieldValue::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the native value, if this is an [`FieldValue::Opaque`] of type `T`.
    #[inline]
    pub fn as_opaque<T: Any>(&self) -> Option<&T> {
        match self {
            FieldValue::Opaque(value) => value.downcast_ref(),
            _ => None,
        }
    }

    /// Converts into plain JSON.
    ///
    /// Arrays are converted element by element. Objects and opaque values fail,
    /// since turning them into JSON needs a registry or a strategy.
    pub fn into_json(self) -> Result<Value, MappingError> {
        match self {
            FieldValue::Json(value) => Ok(value),
            FieldValue::Array(items) => items
                .into_iter()
                .map(FieldValue::into_json)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            other => Err(MappingError::UnexpectedValue {
                expected: "JSON data",
                found: other.kind(),
            }),
        }
    }

    /// Decodes plain JSON into `T` with `serde_json`.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_mapping::value::FieldValue;
    ///
    /// let tags: Vec<String> = FieldValue::from(vec!["a", "b"]).decode().unwrap();
    /// assert_eq!(tags, ["a", "b"]);
    /// ```
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, MappingError> {
        Ok(serde_json::from_value(self.into_json()?)?)
    }

    /// Takes the nested object out, if it is a `T`.
    pub fn into_object<T: Serializable>(self) -> Result<T, MappingError> {
        match self {
            FieldValue::Object(object) => <dyn Serializable>::downcast::<T>(object).map(|b| *b),
            other => Err(MappingError::UnexpectedValue {
                expected: "object instance",
                found: other.kind(),
            }),
        }
    }

    /// Takes the native value out, if it is a `T`.
    pub fn into_opaque<T: Any>(self) -> Result<T, MappingError> {
        match self {
            FieldValue::Opaque(value) => match value.downcast::<T>() {
                Ok(value) => Ok(*value),
                Err(_) => Err(MappingError::UnexpectedClass {
                    expected: core::any::type_name::<T>(),
                    found: "opaque value",
                }),
            },
            other => Err(MappingError::UnexpectedValue {
                expected: "opaque value",
                found: other.kind(),
            }),
        }
    }

    /// Splits an array into its elements.
    ///
    /// Accepts both [`FieldValue::Array`] and a JSON array.
    pub fn into_items(self) -> Result<Vec<FieldValue>, MappingError> {
        match self {
            FieldValue::Array(items) => Ok(items),
            FieldValue::Json(Value::Array(items)) => {
                Ok(items.into_iter().map(FieldValue::Json).collect())
            }
            other => Err(MappingError::UnexpectedValue {
                expected: "array",
                found: other.kind(),
            }),
        }
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Json(value) => f.debug_tuple("Json").field(value).finish(),
            FieldValue::Object(object) => f
                .debug_tuple("Object")
                .field(&object.class_id())
                .finish(),
            FieldValue::Array(items) => f.debug_tuple("Array").field(items).finish(),
            FieldValue::Opaque(_) => f.write_str("Opaque(..)"),
        }
    }
}

impl From<Value> for FieldValue {
    #[inline]
    fn from(value: Value) -> Self {
        FieldValue::Json(value)
    }
}

macro_rules! impl_from_json {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for FieldValue {
                #[inline]
                fn from(value: $ty) -> Self {
                    FieldValue::Json(Value::from(value))
                }
            }
        )*
    };
}

impl_from_json!(
    bool,
    i8,
    i16,
    i32,
    i64,
    isize,
    u8,
    u16,
    u32,
    u64,
    usize,
    f32,
    f64,
    String,
    &str,
    Map<String, Value>,
);

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    #[inline]
    fn from(value: Vec<T>) -> Self {
        FieldValue::array(value)
    }
}

// -----------------------------------------------------------------------------
// JsonInput

/// Input accepted by deserialization: JSON text or already-parsed JSON.
#[derive(Debug, Clone)]
pub enum JsonInput<'a> {
    Text(&'a str),
    Value(Value),
}

impl JsonInput<'_> {
    /// Parses text input; parsed input is returned as is.
    pub fn into_value(self) -> Result<Value, MappingError> {
        match self {
            JsonInput::Text(text) => serde_json::from_str(text)
                .map_err(|err| MappingError::MalformedInput(format!("{err}"))),
            JsonInput::Value(value) => Ok(value),
        }
    }

    /// Parses the input and requires a JSON object at the top level.
    pub fn into_object(self) -> Result<Map<String, Value>, MappingError> {
        match self.into_value()? {
            Value::Object(map) => Ok(map),
            other => Err(MappingError::MalformedInput(format!(
                "expected a JSON object, found {}",
                json_kind(&other)
            ))),
        }
    }
}

impl<'a> From<&'a str> for JsonInput<'a> {
    #[inline]
    fn from(value: &'a str) -> Self {
        JsonInput::Text(value)
    }
}

impl<'a> From<&'a String> for JsonInput<'a> {
    #[inline]
    fn from(value: &'a String) -> Self {
        JsonInput::Text(value)
    }
}

impl From<Value> for JsonInput<'_> {
    #[inline]
    fn from(value: Value) -> Self {
        JsonInput::Value(value)
    }
}

impl From<Map<String, Value>> for JsonInput<'_> {
    #[inline]
    fn from(value: Map<String, Value>) -> Self {
        JsonInput::Value(Value::Object(value))
    }
}

// -----------------------------------------------------------------------------
// Tests
