use alloc::boxed::Box;
use alloc::string::String;
use core::any::Any;
use core::fmt;

use serde_json::{Map, Value};

use crate::MappingError;
use crate::info::{ClassId, FieldId};
use crate::registry::MappingRegistry;
use crate::value::{FieldValue, JsonInput};

// -----------------------------------------------------------------------------
// Serializable

/// A type whose fields can be read and written through a mapping table.
///
/// The registry decides *which* fields are mapped and under which keys;
/// the implementation only moves values in and out of the struct.
///
/// - `read_field` returns `None` for an absent value; the key is then left
///   out of the output.
/// - `write_field` receives the hydrated value and converts it to the field's
///   type, usually with [`FieldValue::decode`] or [`FieldValue::into_object`].
///
/// Inheritance is expressed by composition: a subclass embeds its parent and
/// forwards the fields it does not own.
pub trait Serializable: Any {
    /// Reads the current value of `field`.
    fn read_field(&self, field: &FieldId) -> Option<FieldValue>;

    /// Assigns `value` to `field`.
    fn write_field(&mut self, field: &FieldId, value: FieldValue) -> Result<(), MappingError>;

    /// The concrete class of this instance.
    fn class_id(&self) -> ClassId {
        ClassId::of::<Self>()
    }
}

impl dyn Serializable {
    /// Returns `true` if the instance is a `T`.
    #[inline]
    pub fn is<T: Serializable>(&self) -> bool {
        (self as &dyn Any).is::<T>()
    }

    /// Returns a reference to the instance as a `T`.
    #[inline]
    pub fn downcast_ref<T: Serializable>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref()
    }

    /// Returns a mutable reference to the instance as a `T`.
    #[inline]
    pub fn downcast_mut<T: Serializable>(&mut self) -> Option<&mut T> {
        (self as &mut dyn Any).downcast_mut()
    }

    /// Converts a boxed instance into a `Box<T>`.
    pub fn downcast<T: Serializable>(self: Box<Self>) -> Result<Box<T>, MappingError> {
        let found = self.class_id().name();
        let any: Box<dyn Any> = self;
        any.downcast().map_err(|_| MappingError::UnexpectedClass {
            expected: core::any::type_name::<T>(),
            found,
        })
    }
}

impl fmt::Debug for dyn Serializable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Serializable").field(&self.class_id()).finish()
    }
}

// -----------------------------------------------------------------------------
// SerializableExt

/// Object-level shorthands for the registry operations.
///
/// # Examples
///
/// ```
/// # use vc_mapping::info::FieldId;
/// # use vc_mapping::registry::{ClassDeclaration, Mappable};
/// # use vc_mapping::value::FieldValue;
/// use vc_mapping::{MappingError, MappingRegistry, Serializable, SerializableExt};
///
/// #[derive(Default)]
/// struct Counter {
///     hits: Option<u32>,
/// }
///
/// impl Serializable for Counter {
///     fn read_field(&self, field: &FieldId) -> Option<FieldValue> {
///         self.hits.filter(|_| field.as_name() == Some("hits")).map(FieldValue::from)
///     }
///
///     fn write_field(&mut self, field: &FieldId, value: FieldValue) -> Result<(), MappingError> {
///         match field.as_name() {
///             Some("hits") => self.hits = Some(value.decode()?),
///             _ => return Err(MappingError::unknown_field(self, field)),
///         }
///         Ok(())
///     }
/// }
///
/// impl Mappable for Counter {
///     fn declare(class: &mut ClassDeclaration<'_, Self>) -> Result<(), MappingError> {
///         class.field("hits")?;
///         Ok(())
///     }
/// }
///
/// let mut registry = MappingRegistry::new();
/// registry.register::<Counter>().unwrap();
///
/// let mut counter = Counter::default();
/// counter.deserialize(&registry, r#"{"hits": 3}"#).unwrap();
/// assert_eq!(counter.serialize(&registry).unwrap(), r#"{"hits":3}"#);
/// ```
pub trait SerializableExt: Serializable {
    /// See [`MappingRegistry::to_plain_object`].
    fn to_plain_object(&self, registry: &MappingRegistry) -> Result<Map<String, Value>, MappingError>;

    /// See [`MappingRegistry::serialize`].
    fn serialize(&self, registry: &MappingRegistry) -> Result<String, MappingError>;

    /// See [`MappingRegistry::deserialize`].
    fn deserialize<'i>(
        &mut self,
        registry: &MappingRegistry,
        input: impl Into<JsonInput<'i>>,
    ) -> Result<&mut Self, MappingError>;
}

impl<T: Serializable + ?Sized> SerializableExt for T {
    #[inline]
    fn to_plain_object(&self, registry: &MappingRegistry) -> Result<Map<String, Value>, MappingError> {
        registry.to_plain_object(self)
    }

    #[inline]
    fn serialize(&self, registry: &MappingRegistry) -> Result<String, MappingError> {
        registry.serialize(self)
    }

    #[inline]
    fn deserialize<'i>(
        &mut self,
        registry: &MappingRegistry,
        input: impl Into<JsonInput<'i>>,
    ) -> Result<&mut Self, MappingError> {
        registry.deserialize(self, input)
    }
}

// -----------------------------------------------------------------------------
// Tests
