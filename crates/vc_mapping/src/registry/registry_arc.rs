use alloc::sync::Arc;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::registry::MappingRegistry;

// -----------------------------------------------------------------------------
// MappingRegistryArc

/// A [`MappingRegistry`] shared between threads.
///
/// Take [`write`](Self::write) while registering classes and
/// [`read`](Self::read) while serving. Poisoned locks are recovered.
///
/// # Examples
///
/// ```
/// use vc_mapping::info::ClassId;
/// use vc_mapping::registry::MappingRegistryArc;
/// use vc_mapping::table::PropertyEntry;
///
/// struct Point;
///
/// let shared = MappingRegistryArc::default();
/// shared
///     .write()
///     .register_field(ClassId::of::<Point>(), PropertyEntry::new("x", "x"))
///     .unwrap();
///
/// let reader = shared.clone();
/// std::thread::spawn(move || {
///     assert!(reader.read().table_for(ClassId::of::<Point>()).is_some());
/// })
/// .join()
/// .unwrap();
/// ```
#[derive(Clone, Default)]
pub struct MappingRegistryArc {
    /// The wrapped [`MappingRegistry`].
    pub internal: Arc<RwLock<MappingRegistry>>,
}

impl MappingRegistryArc {
    /// Wraps an already populated registry.
    #[inline]
    pub fn new(registry: MappingRegistry) -> Self {
        Self {
            internal: Arc::new(RwLock::new(registry)),
        }
    }

    /// Takes a read lock on the underlying [`MappingRegistry`].
    pub fn read(&self) -> RwLockReadGuard<'_, MappingRegistry> {
        self.internal.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a write lock on the underlying [`MappingRegistry`].
    pub fn write(&self) -> RwLockWriteGuard<'_, MappingRegistry> {
        self.internal
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<MappingRegistry> for MappingRegistryArc {
    #[inline]
    fn from(registry: MappingRegistry) -> Self {
        Self::new(registry)
    }
}

impl core::fmt::Debug for MappingRegistryArc {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.read().fmt(f)
    }
}

// -----------------------------------------------------------------------------
// Tests
