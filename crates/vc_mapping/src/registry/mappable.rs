use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use core::marker::PhantomData;

use log::debug;
use serde_json::Value;

use crate::MappingError;
use crate::info::ClassId;
use crate::polymorphic::Initializer;
use crate::registry::MappingRegistry;
use crate::serde::Serializable;
use crate::table::{EntryBuilder, PropertyEntry};

// -----------------------------------------------------------------------------
// Mappable

/// A [`Serializable`] type that knows how to register itself.
///
/// This replaces per-field annotations with one explicit declaration per type.
/// [`MappingRegistry::register`] calls it once, after registering the parent.
///
/// # Examples
///
/// ```
/// # use vc_mapping::info::FieldId;
/// # use vc_mapping::value::FieldValue;
/// use vc_mapping::registry::{ClassDeclaration, Mappable, ParentClass};
/// use vc_mapping::table::PropertyEntry;
/// use vc_mapping::{MappingError, MappingRegistry, Serializable, SerializableExt};
///
/// #[derive(Default)]
/// struct Base {
///     id: Option<u64>,
/// }
///
/// #[derive(Default)]
/// struct Derived {
///     base: Base,
///     label: Option<String>,
/// }
///
/// impl Serializable for Base {
///     fn read_field(&self, field: &FieldId) -> Option<FieldValue> {
///         match field.as_name()? {
///             "id" => self.id.map(FieldValue::from),
///             _ => None,
///         }
///     }
///
///     fn write_field(&mut self, field: &FieldId, value: FieldValue) -> Result<(), MappingError> {
///         match field.as_name() {
///             Some("id") => self.id = value.decode()?,
///             _ => return Err(MappingError::unknown_field(self, field)),
///         }
///         Ok(())
///     }
/// }
///
/// impl Serializable for Derived {
///     fn read_field(&self, field: &FieldId) -> Option<FieldValue> {
///         match field.as_name()? {
///             "label" => self.label.clone().map(FieldValue::from),
///             _ => self.base.read_field(field),
///         }
///     }
///
///     fn write_field(&mut self, field: &FieldId, value: FieldValue) -> Result<(), MappingError> {
///         match field.as_name() {
///             Some("label") => self.label = value.decode()?,
///             _ => self.base.write_field(field, value)?,
///         }
///         Ok(())
///     }
/// }
///
/// impl Mappable for Base {
///     fn declare(class: &mut ClassDeclaration<'_, Self>) -> Result<(), MappingError> {
///         class.field("id")?;
///         Ok(())
///     }
/// }
///
/// impl Mappable for Derived {
///     fn parent() -> Option<ParentClass> {
///         Some(ParentClass::of::<Base>())
///     }
///
///     fn declare(class: &mut ClassDeclaration<'_, Self>) -> Result<(), MappingError> {
///         class.field(PropertyEntry::builder("label").key("name"))?;
///         Ok(())
///     }
/// }
///
/// let mut registry = MappingRegistry::new();
/// registry.register::<Derived>().unwrap();
///
/// let value = Derived { base: Base { id: Some(7) }, label: Some("seven".into()) };
/// assert_eq!(value.serialize(&registry).unwrap(), r#"{"id":7,"name":"seven"}"#);
/// ```
pub trait Mappable: Serializable + Sized {
    /// The immediate parent class, if any.
    fn parent() -> Option<ParentClass> {
        None
    }

    /// Registers the fields, discriminants and resolvers of this class.
    fn declare(class: &mut ClassDeclaration<'_, Self>) -> Result<(), MappingError>;
}

// -----------------------------------------------------------------------------
// ParentClass

/// The explicit link from a class to its immediate parent.
#[derive(Clone, Copy)]
pub struct ParentClass {
    id: ClassId,
    register: fn(&mut MappingRegistry) -> Result<(), MappingError>,
}

impl ParentClass {
    /// Links to `P`; registering the child registers `P` first.
    #[inline]
    pub fn of<P: Mappable>() -> Self {
        Self {
            id: ClassId::of::<P>(),
            register: MappingRegistry::register::<P>,
        }
    }

    /// The parent's class identity.
    #[inline]
    pub const fn id(&self) -> ClassId {
        self.id
    }
}

impl core::fmt::Debug for ParentClass {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("ParentClass").field(&self.id).finish()
    }
}

// -----------------------------------------------------------------------------
// Registration

impl MappingRegistry {
    /// Registers `T` and, before it, every ancestor named by [`Mappable::parent`].
    ///
    /// Registering an already registered type does nothing. If
    /// [`Mappable::declare`] fails, the fields, resolver and switch cases it
    /// registered for `T` are removed again, so a retry reports the same error.
    /// Ancestors registered on the way stay registered.
    pub fn register<T: Mappable>(&mut self) -> Result<(), MappingError> {
        let class = ClassId::of::<T>();
        if self.is_declared(class) {
            return Ok(());
        }

        let parent = T::parent();
        if let Some(parent) = parent {
            (parent.register)(self)?;
        }
        self.link(class, parent.map(|p| p.id));

        self.set_declared(class, true);
        let checkpoint = self.checkpoint(class, parent.map(|p| p.id));
        let mut declaration = ClassDeclaration {
            registry: self,
            class,
            parent: parent.map(|p| p.id),
            _marker: PhantomData,
        };
        if let Err(err) = T::declare(&mut declaration) {
            self.rollback(checkpoint);
            self.set_declared(class, false);
            return Err(err);
        }

        debug!("registered class `{class}`");
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// ClassDeclaration

/// The registration surface of one class, handed to [`Mappable::declare`].
///
/// Discriminants must be declared after the field they read.
pub struct ClassDeclaration<'a, T> {
    registry: &'a mut MappingRegistry,
    class: ClassId,
    parent: Option<ClassId>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Mappable> ClassDeclaration<'_, T> {
    /// The class being declared.
    #[inline]
    pub fn class(&self) -> ClassId {
        self.class
    }

    /// The registry being populated.
    #[inline]
    pub fn registry(&mut self) -> &mut MappingRegistry {
        self.registry
    }

    /// Registers a field; a bare name maps to a key of the same name.
    pub fn field(&mut self, field: impl Into<EntryBuilder>) -> Result<&mut Self, MappingError> {
        self.entry(field.into().build()?)
    }

    /// Registers a fully built entry.
    pub fn entry(&mut self, entry: PropertyEntry) -> Result<&mut Self, MappingError> {
        self.registry.register_field(self.class, entry)?;
        Ok(self)
    }

    /// Registers a resolver choosing a concrete subclass when `T` is resolved.
    pub fn resolver<F>(&mut self, resolver: F) -> &mut Self
    where
        F: Fn(&Value) -> Result<Option<Box<dyn Serializable>>, MappingError>
            + Send
            + Sync
            + 'static,
    {
        self.registry.register_resolver(self.class, resolver);
        self
    }

    fn parent_or_err(&self) -> Result<ClassId, MappingError> {
        self.parent.ok_or(MappingError::MissingParent(self.class))
    }
}

impl<T: Mappable + Default> ClassDeclaration<'_, T> {
    /// Selects `T` when the parent is resolved from input whose `key` holds
    /// the value `T::default()` reads for that key.
    pub fn discriminant(&mut self, key: impl Into<String>) -> Result<&mut Self, MappingError> {
        let parent = self.parent_or_err()?;
        self.registry
            .register_switch(parent, key, None, self.class, initializer::<T>())?;
        Ok(self)
    }

    /// Selects `T` when the parent is resolved from input whose `key` equals `value`.
    pub fn discriminant_value(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<&mut Self, MappingError> {
        let parent = self.parent_or_err()?;
        self.registry.register_switch(
            parent,
            key,
            Some(value.into()),
            self.class,
            initializer::<T>(),
        )?;
        Ok(self)
    }
}

fn initializer<T: Serializable + Default>() -> Initializer {
    Arc::new(|| Box::new(T::default()) as Box<dyn Serializable>)
}

// -----------------------------------------------------------------------------
// Tests
