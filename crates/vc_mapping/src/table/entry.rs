use alloc::string::String;

use crate::MappingError;
use crate::info::{FieldId, Symbol};
use crate::strategy::Strategy;

// -----------------------------------------------------------------------------
// PropertyEntry

/// The mapping of one field.
///
/// Missing strategies behave as the identity. On the dehydration side a
/// nested [`Serializable`](crate::serde::Serializable) value is always
/// serialized through its own table, whether a strategy is set or not.
#[derive(Clone, Debug)]
pub struct PropertyEntry {
    field: FieldId,
    key: String,
    hydrate: Option<Strategy>,
    dehydrate: Option<Strategy>,
}

impl PropertyEntry {
    /// Creates an entry with an explicit external key and no strategies.
    pub fn new(field: impl Into<FieldId>, key: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            key: key.into(),
            hydrate: None,
            dehydrate: None,
        }
    }

    /// Starts building an entry for `field`.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_mapping::table::PropertyEntry;
    ///
    /// let entry = PropertyEntry::builder("created_at").key("createdAt").build().unwrap();
    /// assert_eq!(entry.key(), "createdAt");
    ///
    /// let entry = PropertyEntry::builder("id").build().unwrap();
    /// assert_eq!(entry.key(), "id");
    /// ```
    #[inline]
    pub fn builder(field: impl Into<FieldId>) -> EntryBuilder {
        EntryBuilder {
            field: field.into(),
            key: None,
            hydrate: None,
            dehydrate: None,
        }
    }

    /// The internal field identifier.
    #[inline]
    pub fn field(&self) -> &FieldId {
        &self.field
    }

    /// The external JSON key.
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The hydration strategy, if any.
    #[inline]
    pub fn hydrate(&self) -> Option<&Strategy> {
        self.hydrate.as_ref()
    }

    /// The dehydration strategy, if any.
    #[inline]
    pub fn dehydrate(&self) -> Option<&Strategy> {
        self.dehydrate.as_ref()
    }

    /// Replaces the hydration strategy.
    #[inline]
    pub fn with_hydrate(mut self, strategy: Strategy) -> Self {
        self.hydrate = Some(strategy);
        self
    }

    /// Replaces the dehydration strategy.
    #[inline]
    pub fn with_dehydrate(mut self, strategy: Strategy) -> Self {
        self.dehydrate = Some(strategy);
        self
    }
}

// -----------------------------------------------------------------------------
// EntryBuilder

/// Builder for [`PropertyEntry`], see [`PropertyEntry::builder`].
#[derive(Clone, Debug)]
#[must_use]
pub struct EntryBuilder {
    field: FieldId,
    key: Option<String>,
    hydrate: Option<Strategy>,
    dehydrate: Option<Strategy>,
}

impl EntryBuilder {
    /// Sets the external key.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Sets the hydration strategy.
    pub fn hydrate(mut self, strategy: Strategy) -> Self {
        self.hydrate = Some(strategy);
        self
    }

    /// Sets the dehydration strategy.
    pub fn dehydrate(mut self, strategy: Strategy) -> Self {
        self.dehydrate = Some(strategy);
        self
    }

    /// Finishes the entry.
    ///
    /// A symbol field without an explicit key fails with
    /// [`MappingError::SymbolKeyRequiresExplicitName`].
    pub fn build(self) -> Result<PropertyEntry, MappingError> {
        let key = match self.key {
            Some(key) => key,
            None => match self.field.as_name() {
                Some(name) => String::from(name),
                None => return Err(MappingError::SymbolKeyRequiresExplicitName(self.field)),
            },
        };
        Ok(PropertyEntry {
            field: self.field,
            key,
            hydrate: self.hydrate,
            dehydrate: self.dehydrate,
        })
    }
}

macro_rules! impl_builder_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for EntryBuilder {
                #[inline]
                fn from(value: $ty) -> Self {
                    PropertyEntry::builder(value)
                }
            }
        )*
    };
}

impl_builder_from!(&'static str, String, Symbol, FieldId);

// -----------------------------------------------------------------------------
// Tests
