use core::any::TypeId;
use core::fmt;
use core::hash::{Hash, Hasher};

// -----------------------------------------------------------------------------
// ClassId

/// Identity of a mapped class.
///
/// Equality and hashing only consider the [`TypeId`]; the type name is kept
/// for diagnostics.
///
/// # Examples
///
/// ```
/// use vc_mapping::info::ClassId;
///
/// struct Account;
///
/// let id = ClassId::of::<Account>();
/// assert_eq!(id, ClassId::of::<Account>());
/// assert_ne!(id, ClassId::of::<String>());
/// assert!(id.name().ends_with("Account"));
/// ```
#[derive(Clone, Copy)]
pub struct ClassId {
    type_id: TypeId,
    name: &'static str,
}

impl ClassId {
    /// Returns the identity of `T`.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: core::any::type_name::<T>(),
        }
    }

    /// Returns the underlying [`TypeId`].
    #[inline(always)]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the full type name, as given by [`core::any::type_name`].
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the last path segment of the type name, generics included.
    pub fn short_name(&self) -> &'static str {
        let path = match self.name.find('<') {
            Some(index) => &self.name[..index],
            None => self.name,
        };
        match path.rfind("::") {
            Some(index) => &self.name[index + 2..],
            None => self.name,
        }
    }
}

impl PartialEq for ClassId {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ClassId {}

impl Hash for ClassId {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClassId").field(&self.name).finish()
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// -----------------------------------------------------------------------------
// Tests
