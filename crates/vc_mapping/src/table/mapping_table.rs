use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use vc_utils::hash::{HashMap, HashSet};

use crate::MappingError;
use crate::info::{ClassId, FieldId};
use crate::table::PropertyEntry;

// -----------------------------------------------------------------------------
// MappingTable

/// The property mapping table of one class.
///
/// Holds the entries the class declares itself, indexed both by field id
/// and by external key, plus a shared pointer to the nearest ancestor's
/// table. Two ignore sets hide inherited pairings that this class changed:
///
/// - repointing an inherited external key to another field hides the
///   inherited field;
/// - renaming an inherited field hides its inherited external key.
///
/// The parent table is never modified.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use vc_mapping::info::ClassId;
/// use vc_mapping::table::{MappingTable, PropertyEntry};
///
/// struct Parent;
/// struct Child;
///
/// let mut parent = MappingTable::new(ClassId::of::<Parent>(), None);
/// parent.set(PropertyEntry::new("a", "a")).unwrap();
/// let parent = Arc::new(parent);
///
/// let mut child = MappingTable::new(ClassId::of::<Child>(), Some(parent.clone()));
/// child.set(PropertyEntry::new("b", "a")).unwrap();
///
/// assert_eq!(child.get_by_external_key("a").unwrap().field().as_name(), Some("b"));
/// assert!(!child.has_field_id(&"a".into()));
/// assert_eq!(parent.get_by_external_key("a").unwrap().field().as_name(), Some("a"));
/// ```
#[derive(Clone, Debug)]
pub struct MappingTable {
    class: ClassId,
    parent: Option<Arc<MappingTable>>,
    entries: Vec<PropertyEntry>,
    by_field: HashMap<FieldId, usize>,
    by_key: HashMap<String, usize>,
    ignored_fields: HashSet<FieldId>,
    ignored_keys: HashSet<String>,
}

impl MappingTable {
    /// Creates an empty table for `class`, chained to `parent`.
    pub fn new(class: ClassId, parent: Option<Arc<MappingTable>>) -> Self {
        Self {
            class,
            parent,
            entries: Vec::new(),
            by_field: HashMap::default(),
            by_key: HashMap::default(),
            ignored_fields: HashSet::default(),
            ignored_keys: HashSet::default(),
        }
    }

    /// The class owning this table.
    #[inline]
    pub const fn class(&self) -> ClassId {
        self.class
    }

    /// The nearest ancestor's table.
    #[inline]
    pub fn parent(&self) -> Option<&Arc<MappingTable>> {
        self.parent.as_ref()
    }

    /// The entries declared by this class, in declaration order.
    #[inline]
    pub fn own_entries(&self) -> &[PropertyEntry] {
        &self.entries
    }

    /// Adds an entry declared by this class.
    ///
    /// Fails if the field id or the external key is already declared by this
    /// class itself; inherited entries may be overridden freely.
    pub fn set(&mut self, entry: PropertyEntry) -> Result<(), MappingError> {
        if self.by_key.contains_key(entry.key()) {
            return Err(MappingError::DuplicateExternalKey {
                class: self.class,
                key: String::from(entry.key()),
            });
        }
        if self.by_field.contains_key(entry.field()) {
            return Err(MappingError::DuplicateFieldId {
                class: self.class,
                field: entry.field().clone(),
            });
        }

        self.ignored_fields.remove(entry.field());
        self.ignored_keys.remove(entry.key());

        if let Some(parent) = &self.parent {
            // The inherited key now belongs to another field. A field this
            // class redeclares keeps its inherited position.
            if let Some(inherited) = parent.get_by_external_key(entry.key())
                && inherited.field() != entry.field()
                && !self.by_field.contains_key(inherited.field())
            {
                self.ignored_fields.insert(inherited.field().clone());
            }
            // The inherited field now lives under another key.
            if let Some(inherited) = parent.get_by_field_id(entry.field())
                && inherited.key() != entry.key()
            {
                self.ignored_keys.insert(String::from(inherited.key()));
            }
        }

        let index = self.entries.len();
        self.by_field.insert(entry.field().clone(), index);
        self.by_key.insert(String::from(entry.key()), index);
        self.entries.push(entry);
        Ok(())
    }

    /// Looks up the entry mapping `field`, falling through to the parent
    /// unless this class hides it.
    pub fn get_by_field_id(&self, field: &FieldId) -> Option<&PropertyEntry> {
        if let Some(&index) = self.by_field.get(field) {
            return Some(&self.entries[index]);
        }
        if self.ignored_fields.contains(field) {
            return None;
        }
        self.parent.as_deref()?.get_by_field_id(field)
    }

    /// Looks up the entry mapped under the external `key`, falling through to
    /// the parent unless this class hides it.
    pub fn get_by_external_key(&self, key: &str) -> Option<&PropertyEntry> {
        if let Some(&index) = self.by_key.get(key) {
            return Some(&self.entries[index]);
        }
        if self.ignored_keys.contains(key) {
            return None;
        }
        self.parent.as_deref()?.get_by_external_key(key)
    }

    /// Returns `true` if `field` is visible through this table.
    #[inline]
    pub fn has_field_id(&self, field: &FieldId) -> bool {
        self.get_by_field_id(field).is_some()
    }

    /// Returns `true` if `key` is visible through this table.
    #[inline]
    pub fn has_external_key(&self, key: &str) -> bool {
        self.get_by_external_key(key).is_some()
    }

    /// The merged view of the whole chain.
    ///
    /// Ancestor fields come first, root-most class first, each class in
    /// declaration order. A field redeclared by a more specific class keeps
    /// the position where it first appeared but carries the most specific
    /// entry. Inherited fields hidden by this class are left out.
    pub fn all_entries(&self) -> Vec<&PropertyEntry> {
        let mut merged: Vec<&PropertyEntry> = match &self.parent {
            Some(parent) => parent
                .all_entries()
                .into_iter()
                .filter(|entry| !self.ignored_fields.contains(entry.field()))
                .collect(),
            None => Vec::with_capacity(self.entries.len()),
        };

        let positions: HashMap<&FieldId, usize> = merged
            .iter()
            .copied()
            .enumerate()
            .map(|(index, entry)| (entry.field(), index))
            .collect();

        for entry in &self.entries {
            match positions.get(entry.field()) {
                Some(&index) => merged[index] = entry,
                None => merged.push(entry),
            }
        }
        merged
    }

    /// The number of entries in the merged view.
    pub fn len(&self) -> usize {
        self.all_entries().len()
    }
}

// -----------------------------------------------------------------------------
// Tests
