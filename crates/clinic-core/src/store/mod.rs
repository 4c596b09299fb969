//! Bounded, ordered in-memory stores, one per entity type.

mod ids;

pub use ids::*;

use thiserror::Error;
use tracing::{debug, warn};

use crate::log::STORE;
use crate::models::{names_match, EntityKind, TextField};

/// Store errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{kind} store is full (capacity {capacity})")]
    Capacity { kind: EntityKind, capacity: usize },

    #[error("{kind} not found: {key}")]
    NotFound { kind: EntityKind, key: String },

    #[error("{kind} {id} is already inactive")]
    AlreadyInactive { kind: EntityKind, id: i32 },

    #[error("{kind} {id} is still active")]
    StillActive { kind: EntityKind, id: i32 },

    #[error("Field {field} is too long (max {max} bytes)")]
    FieldTooLong { field: &'static str, max: usize },

    #[error("Field {field} contains a NUL byte")]
    FieldContainsNul { field: &'static str },

    #[error("Field {field} cannot be changed by an update")]
    Immutable { field: &'static str },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A record kept in an [`EntityStore`].
pub trait Entity: Clone + std::fmt::Debug {
    const KIND: EntityKind;

    fn id(&self) -> i32;

    fn set_id(&mut self, id: i32);

    /// Records without a lifecycle flag are always active.
    fn is_active(&self) -> bool {
        true
    }

    /// Display name used by name lookups, if the record has one.
    fn name(&self) -> Option<&str> {
        None
    }

    fn phone(&self) -> Option<&str> {
        None
    }

    /// Every fixed-width text field with its buffer width.
    fn text_fields(&self) -> Vec<TextField<'_>>;
}

/// Records that support soft delete.
pub trait SoftDelete: Entity {
    fn set_active(&mut self, active: bool);
}

/// Reject values that would not survive the fixed-width snapshot layout.
pub fn check_fields<T: Entity>(record: &T) -> StoreResult<()> {
    for field in record.text_fields() {
        if field.contains_nul() {
            return Err(StoreError::FieldContainsNul { field: field.name });
        }
        if !field.fits() {
            return Err(StoreError::FieldTooLong {
                field: field.name,
                max: field.width - 1,
            });
        }
    }
    Ok(())
}

/// A capacity-bounded, insertion-ordered collection of records.
///
/// `available` counts active records; `unavailable` is the remainder, so
/// the two always sum to the record count.
#[derive(Debug, Clone)]
pub struct EntityStore<T: Entity> {
    records: Vec<T>,
    available: usize,
    id_policy: IdPolicy,
    high_water: HighWater,
}

// id marks are not part of a snapshot, so they do not take part in equality
impl<T: Entity + PartialEq> PartialEq for EntityStore<T> {
    fn eq(&self, other: &Self) -> bool {
        self.records == other.records
            && self.available == other.available
            && self.id_policy == other.id_policy
    }
}

impl<T: Entity> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> EntityStore<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::with_policy(IdPolicy::default())
    }

    pub fn with_policy(id_policy: IdPolicy) -> Self {
        Self {
            records: Vec::with_capacity(T::KIND.capacity()),
            available: 0,
            id_policy,
            high_water: HighWater::default(),
        }
    }

    /// Rebuild a store from loaded records.
    ///
    /// The counters are derived from the active flags; a persisted
    /// `available` that disagrees is logged and discarded.
    pub fn from_records(
        records: Vec<T>,
        persisted_available: Option<usize>,
        id_policy: IdPolicy,
    ) -> StoreResult<Self> {
        if records.len() > T::KIND.capacity() {
            return Err(StoreError::Capacity {
                kind: T::KIND,
                capacity: T::KIND.capacity(),
            });
        }

        let available = records.iter().filter(|r| r.is_active()).count();
        if let Some(persisted) = persisted_available {
            if persisted != available {
                warn!(
                    target: STORE,
                    kind = %T::KIND,
                    persisted,
                    actual = available,
                    "Available counter disagrees with active flags, recounting"
                );
            }
        }

        let mut store = Self::with_policy(id_policy);
        store.reserve_ids(records.iter().map(Entity::id));
        store.records.extend(records);
        store.available = available;
        Ok(store)
    }

    pub fn capacity(&self) -> usize {
        T::KIND.capacity()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.records.len() >= self.capacity()
    }

    /// Number of active records.
    pub fn available(&self) -> usize {
        self.available
    }

    /// Number of soft-deleted records.
    pub fn unavailable(&self) -> usize {
        self.records.len() - self.available
    }

    pub fn id_policy(&self) -> IdPolicy {
        self.id_policy
    }

    /// Records in insertion order.
    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }

    pub fn active(&self) -> impl Iterator<Item = &T> + '_ {
        self.records.iter().filter(|r| r.is_active())
    }

    pub fn inactive(&self) -> impl Iterator<Item = &T> + '_ {
        self.records.iter().filter(|r| !r.is_active())
    }

    /// Id the next record would get for `base`.
    pub fn next_id(&self, base: i32) -> i32 {
        generate_id(
            self.id_policy,
            base,
            self.records.len(),
            self.high_water.highest(base),
        )
    }

    /// Mark ids as taken so [`IdPolicy::Monotonic`] never issues them,
    /// such as ids that other stores still reference.
    pub fn reserve_ids<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = i32>,
    {
        for id in ids {
            self.high_water.raise(id);
        }
    }

    /// Append a record under the next id for this entity type.
    pub fn add(&mut self, record: T) -> StoreResult<i32> {
        self.ensure_capacity()?;
        let id = self.next_id(T::KIND.id_base());
        self.insert_with_id(record, id)
    }

    /// Append a record under an id chosen by the caller.
    pub fn insert_with_id(&mut self, mut record: T, id: i32) -> StoreResult<i32> {
        self.ensure_capacity()?;
        check_fields(&record)?;

        if self.records.iter().any(|r| r.id() == id) {
            warn!(target: STORE, kind = %T::KIND, id, "Reusing an id that is still live");
        }

        record.set_id(id);
        self.high_water.raise(id);
        if record.is_active() {
            self.available += 1;
        }
        self.records.push(record);
        debug!(target: STORE, kind = %T::KIND, id, count = self.records.len(), "Added record");
        Ok(id)
    }

    /// Index of the first record with `id`.
    pub fn find_by_id(&self, id: i32) -> StoreResult<usize> {
        self.records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| not_found::<T>(id.to_string()))
    }

    /// Index of the first record matching `predicate`.
    pub fn find_by<P>(&self, predicate: P) -> StoreResult<usize>
    where
        P: Fn(&T) -> bool,
    {
        self.records
            .iter()
            .position(predicate)
            .ok_or_else(|| not_found::<T>("no record matches".to_string()))
    }

    /// Index of the first record whose name matches, ignoring case and spacing.
    pub fn find_by_name(&self, name: &str) -> StoreResult<usize> {
        self.records
            .iter()
            .position(|r| r.name().is_some_and(|n| names_match(n, name)))
            .ok_or_else(|| not_found::<T>(name.to_string()))
    }

    pub fn find_by_phone(&self, phone: &str) -> StoreResult<usize> {
        let phone = phone.trim();
        self.records
            .iter()
            .position(|r| r.phone() == Some(phone))
            .ok_or_else(|| not_found::<T>(phone.to_string()))
    }

    pub fn get(&self, id: i32) -> StoreResult<&T> {
        let index = self.find_by_id(id)?;
        Ok(&self.records[index])
    }

    /// Edit a record in place.
    ///
    /// The edit is applied to a copy first; the id and the active flag must
    /// be left alone and every text field must still fit, otherwise the
    /// store is untouched.
    pub fn update<F>(&mut self, id: i32, edit: F) -> StoreResult<&T>
    where
        F: FnOnce(&mut T),
    {
        let index = self.find_by_id(id)?;
        let mut edited = self.records[index].clone();
        edit(&mut edited);

        if edited.id() != id {
            return Err(StoreError::Immutable { field: "id" });
        }
        if edited.is_active() != self.records[index].is_active() {
            return Err(StoreError::Immutable { field: "active" });
        }
        check_fields(&edited)?;

        self.records[index] = edited;
        debug!(target: STORE, kind = %T::KIND, id, "Updated record");
        Ok(&self.records[index])
    }

    fn ensure_capacity(&self) -> StoreResult<()> {
        if self.is_full() {
            return Err(StoreError::Capacity {
                kind: T::KIND,
                capacity: self.capacity(),
            });
        }
        Ok(())
    }
}

impl<T: SoftDelete> EntityStore<T> {
    /// Soft delete: flip the record to inactive and move it across counters.
    pub fn deactivate(&mut self, id: i32) -> StoreResult<()> {
        let index = self
            .records
            .iter()
            .position(|r| r.id() == id && r.is_active())
            .ok_or_else(|| match self.find_by_id(id) {
                Ok(_) => StoreError::AlreadyInactive { kind: T::KIND, id },
                Err(e) => e,
            })?;

        self.records[index].set_active(false);
        self.available -= 1;
        debug!(
            target: STORE,
            kind = %T::KIND,
            id,
            available = self.available,
            unavailable = self.unavailable(),
            "Deactivated record"
        );
        Ok(())
    }

    /// Hard delete: remove an inactive record, shifting later records down.
    pub fn hard_delete(&mut self, id: i32) -> StoreResult<T> {
        let index = self
            .records
            .iter()
            .position(|r| r.id() == id && !r.is_active())
            .ok_or_else(|| match self.find_by_id(id) {
                Ok(_) => StoreError::StillActive { kind: T::KIND, id },
                Err(e) => e,
            })?;

        // Vec::remove keeps the relative order of the tail
        let removed = self.records.remove(index);
        debug!(
            target: STORE,
            kind = %T::KIND,
            id,
            count = self.records.len(),
            unavailable = self.unavailable(),
            "Permanently deleted record"
        );
        Ok(removed)
    }
}

fn not_found<T: Entity>(key: String) -> StoreError {
    StoreError::NotFound { kind: T::KIND, key }
}
