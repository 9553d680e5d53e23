use alloc::string::String;

use thiserror::Error;

use crate::info::{ClassId, FieldId};
use crate::serde::Serializable;

// -----------------------------------------------------------------------------
// Error

/// Errors raised while registering, serializing, deserializing or resolving.
///
/// Every failure surfaces synchronously to the caller; nothing is retried.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MappingError {
    #[error("field {field} is already mapped in `{class}`")]
    DuplicateFieldId { class: ClassId, field: FieldId },

    #[error("external key `{key}` is already mapped in `{class}`")]
    DuplicateExternalKey { class: ClassId, key: String },

    #[error("no mapping table is registered for `{0}` or any of its ancestors")]
    MissingMappingTable(ClassId),

    #[error("field {0} has no name and needs an explicit external key")]
    SymbolKeyRequiresExplicitName(FieldId),

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("no concrete class of `{0}` matches the input")]
    PolymorphicResolutionFailed(ClassId),

    #[error("discriminant `{key}` is not a mapped field of `{class}`")]
    InvalidDiscriminant { class: ClassId, key: String },

    #[error("mapping table of `{0}` is already shared with a subclass and can no longer change")]
    SealedTable(ClassId),

    #[error("`{0}` declares no parent class to register a discriminant against")]
    MissingParent(ClassId),

    #[error("`{class}` has no field {field}")]
    UnknownField { class: ClassId, field: FieldId },

    #[error("expected {expected} but found {found}")]
    UnexpectedValue {
        expected: &'static str,
        found: &'static str,
    },

    #[error("field {field} of `{class}` holds a value without a JSON representation")]
    Unrepresentable { class: ClassId, field: FieldId },

    #[error("expected an instance of `{expected}` but found `{found}`")]
    UnexpectedClass {
        expected: &'static str,
        found: &'static str,
    },

    #[error("transform failed: {0}")]
    Transform(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl MappingError {
    /// Shorthand for [`MappingError::UnknownField`] inside `write_field` implementations.
    #[cold]
    pub fn unknown_field<T: Serializable + ?Sized>(instance: &T, field: &FieldId) -> Self {
        MappingError::UnknownField {
            class: instance.class_id(),
            field: field.clone(),
        }
    }

    /// Shorthand for [`MappingError::Transform`].
    #[cold]
    pub fn transform(message: impl Into<String>) -> Self {
        MappingError::Transform(message.into())
    }
}
