use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use log::{debug, warn};
use vc_utils::TypeIdMap;

use crate::MappingError;
use crate::info::ClassId;
use crate::polymorphic::{Resolver, SwitchCase};
use crate::table::{MappingTable, PropertyEntry};

// -----------------------------------------------------------------------------
// ClassLink

#[derive(Debug, Clone, Copy)]
pub(crate) struct ClassLink {
    pub class: ClassId,
    pub parent: Option<ClassId>,
    /// `true` once [`MappingRegistry::register`] has run for the class.
    pub declared: bool,
}

// -----------------------------------------------------------------------------
// Checkpoint

enum SavedTable {
    Absent,
    Sealed,
    Open(MappingTable),
}

/// Registry state restored when a class declaration fails.
pub(crate) struct Checkpoint {
    class: ClassId,
    table: SavedTable,
    resolver: Option<Resolver>,
    switch_cases: Option<(ClassId, usize)>,
}

// -----------------------------------------------------------------------------
// MappingRegistry

/// The class-to-table registry.
///
/// Holds one [`MappingTable`] per class that declared at least one field,
/// the explicit parent link of every known class, and the polymorphic
/// resolvers and switch cases keyed by base class.
///
/// A class without a table of its own defers to its nearest ancestor's table
/// (see [`MappingRegistry::table_for`]).
///
/// # Examples
///
/// ```
/// use vc_mapping::MappingRegistry;
/// use vc_mapping::info::ClassId;
/// use vc_mapping::table::PropertyEntry;
///
/// struct Parent;
/// struct Child;
///
/// let mut registry = MappingRegistry::new();
/// let parent = ClassId::of::<Parent>();
/// let child = ClassId::of::<Child>();
///
/// registry.register_field(parent, PropertyEntry::new("a", "a")).unwrap();
/// registry.link(child, Some(parent));
///
/// let table = registry.table_for(child).unwrap();
/// assert_eq!(table.class(), parent);
/// assert!(registry.own_table(child).is_none());
/// ```
pub struct MappingRegistry {
    tables: TypeIdMap<Arc<MappingTable>>,
    classes: TypeIdMap<ClassLink>,
    pub(crate) resolvers: TypeIdMap<Resolver>,
    pub(crate) switches: TypeIdMap<Vec<SwitchCase>>,
}

impl Default for MappingRegistry {
    /// See [`MappingRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl MappingRegistry {
    /// Creates an empty registry.
    #[inline]
    pub const fn new() -> Self {
        Self {
            tables: TypeIdMap::new(),
            classes: TypeIdMap::new(),
            resolvers: TypeIdMap::new(),
            switches: TypeIdMap::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Hierarchy

    /// Records the immediate parent of `class`.
    ///
    /// The first link of a class wins. Re-linking to the same parent is a
    /// no-op; re-linking to a different one is ignored with a warning.
    pub fn link(&mut self, class: ClassId, parent: Option<ClassId>) {
        let parent = parent.filter(|p| *p != class);
        if let Some(link) = self.classes.get(&class.type_id()) {
            if link.parent != parent {
                warn!(
                    "`{class}` is already linked to {:?}, ignoring {:?}",
                    link.parent.map(|p| p.name()),
                    parent.map(|p| p.name()),
                );
            }
            return;
        }

        self.classes.insert(
            class.type_id(),
            ClassLink {
                class,
                parent,
                declared: false,
            },
        );
    }

    /// Returns the immediate parent of `class`, if it is linked to one.
    #[inline]
    pub fn parent_of(&self, class: ClassId) -> Option<ClassId> {
        self.classes.get(&class.type_id()).and_then(|link| link.parent)
    }

    /// Returns `true` if `ancestor` appears strictly above `class` in its chain.
    pub fn is_ancestor(&self, ancestor: ClassId, class: ClassId) -> bool {
        self.ancestors(class).any(|id| id == ancestor)
    }

    /// Iterates the parent chain of `class`, nearest first.
    ///
    /// The walk stops after as many steps as there are known classes, so a
    /// cyclic link set cannot loop forever.
    pub fn ancestors(&self, class: ClassId) -> impl Iterator<Item = ClassId> + '_ {
        let mut current = class;
        (0..self.classes.len()).map_while(move |_| {
            current = self.parent_of(current)?;
            Some(current)
        })
    }

    pub(crate) fn is_declared(&self, class: ClassId) -> bool {
        self.classes
            .get(&class.type_id())
            .is_some_and(|link| link.declared)
    }

    pub(crate) fn set_declared(&mut self, class: ClassId, declared: bool) {
        if let Some(link) = self.classes.get_mut(&class.type_id()) {
            link.declared = declared;
        }
    }

    /// Records what a declaration of `class` may change: its own table, its
    /// resolver and the switch cases of `parent`.
    pub(crate) fn checkpoint(&self, class: ClassId, parent: Option<ClassId>) -> Checkpoint {
        let table = match self.own_table(class) {
            None => SavedTable::Absent,
            Some(table) if Arc::strong_count(table) > 1 => SavedTable::Sealed,
            Some(table) => SavedTable::Open(MappingTable::clone(table)),
        };
        Checkpoint {
            class,
            table,
            resolver: self.resolvers.get(&class.type_id()).cloned(),
            switch_cases: parent.map(|parent| (parent, self.switch_cases(parent).len())),
        }
    }

    /// Undoes everything registered for the class since `checkpoint`.
    pub(crate) fn rollback(&mut self, checkpoint: Checkpoint) {
        let id = checkpoint.class.type_id();
        match checkpoint.table {
            // A table another table already chains to stays.
            SavedTable::Absent => {
                if self.tables.get(&id).is_some_and(|t| Arc::strong_count(t) == 1) {
                    self.tables.remove(&id);
                }
            }
            SavedTable::Sealed => {}
            SavedTable::Open(saved) => {
                if let Some(table) = self.tables.get_mut(&id).and_then(Arc::get_mut) {
                    *table = saved;
                }
            }
        }

        match checkpoint.resolver {
            Some(resolver) => {
                self.resolvers.insert(id, resolver);
            }
            None => {
                self.resolvers.remove(&id);
            }
        }

        if let Some((parent, len)) = checkpoint.switch_cases
            && let Some(cases) = self.switches.get_mut(&parent.type_id())
        {
            cases.truncate(len);
        }
    }

    // -------------------------------------------------------------------------
    // Tables

    /// Returns the table declared by `class` itself.
    #[inline]
    pub fn own_table(&self, class: ClassId) -> Option<&Arc<MappingTable>> {
        self.tables.get(&class.type_id())
    }

    /// Returns the table used for instances of `class`: its own table, or
    /// the nearest ancestor's table if it declared no fields.
    pub fn table_for(&self, class: ClassId) -> Option<&Arc<MappingTable>> {
        self.own_table(class)
            .or_else(|| self.ancestors(class).find_map(|id| self.own_table(id)))
    }

    pub(crate) fn require_table(&self, class: ClassId) -> Result<&Arc<MappingTable>, MappingError> {
        self.table_for(class)
            .ok_or(MappingError::MissingMappingTable(class))
    }

    /// Registers one field of `class`.
    ///
    /// The class's table is created on first use and chained to the nearest
    /// ancestor's table at that moment. Fails with
    /// [`MappingError::SealedTable`] once a subclass table depends on the
    /// class, and with the duplicate errors of [`MappingTable::set`].
    pub fn register_field(
        &mut self,
        class: ClassId,
        entry: PropertyEntry,
    ) -> Result<(), MappingError> {
        if let Some(table) = self.tables.get_mut(&class.type_id()) {
            let table = Arc::get_mut(table).ok_or(MappingError::SealedTable(class))?;
            return table.set(entry);
        }

        if self.has_dependent_table(class) {
            return Err(MappingError::SealedTable(class));
        }

        let parent = self
            .ancestors(class)
            .find_map(|id| self.own_table(id))
            .cloned();
        debug!(
            "creating mapping table for `{class}` (parent table: {:?})",
            parent.as_ref().map(|table| table.class().name()),
        );

        let mut table = MappingTable::new(class, parent);
        table.set(entry)?;
        self.tables.insert(class.type_id(), Arc::new(table));
        Ok(())
    }

    /// A descendant table created before `class` had its own would skip it.
    fn has_dependent_table(&self, class: ClassId) -> bool {
        self.tables
            .values()
            .any(|table| self.is_ancestor(class, table.class()))
    }
}

impl fmt::Debug for MappingRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappingRegistry")
            .field(
                "classes",
                &self
                    .classes
                    .values()
                    .map(|link| link.class.name())
                    .collect::<Vec<_>>(),
            )
            .field("tables", &self.tables.len())
            .field("resolvers", &self.resolvers.len())
            .field("switches", &self.switches.len())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests
