//! Generic id-keyed table.
//!
//! A table owns its rows and the counter that assigns ids. Both live behind
//! one `RwLock`, so reading the counter, bumping it and inserting the row
//! happen as a single step and two concurrent inserts can never share an id.
//! Every read hands back clones; callers never hold references into the map.

use std::collections::BTreeMap;

use tokio::sync::RwLock;

use skybook_core::{BookingId, ServiceId, UserId};

/// Key type for a [`Table`]: totally ordered, with a first value and a
/// successor.
pub trait TableKey: Copy + Ord + Send + Sync {
    /// Id assigned to the first inserted row.
    const FIRST: Self;

    /// The id assigned after `self`.
    #[must_use]
    fn successor(self) -> Self;
}

macro_rules! impl_table_key {
    ($($id:ty),+ $(,)?) => {
        $(
            impl TableKey for $id {
                const FIRST: Self = <$id>::FIRST;

                fn successor(self) -> Self {
                    self.next()
                }
            }
        )+
    };
}

impl_table_key!(UserId, ServiceId, BookingId);

struct Rows<K, T> {
    next_id: K,
    map: BTreeMap<K, T>,
}

/// An in-memory table of `T` rows keyed by sequentially assigned `K` ids.
pub struct Table<K, T> {
    rows: RwLock<Rows<K, T>>,
}

impl<K: TableKey, T: Clone + Send + Sync> Default for Table<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: TableKey, T: Clone + Send + Sync> Table<K, T> {
    /// Create an empty table whose first id will be `K::FIRST`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Rows {
                next_id: K::FIRST,
                map: BTreeMap::new(),
            }),
        }
    }

    /// Snapshot of the row with `id`, if present.
    pub async fn get(&self, id: K) -> Option<T> {
        self.rows.read().await.map.get(&id).cloned()
    }

    /// First row (in id order) matching `predicate`.
    pub async fn find(&self, predicate: impl Fn(&T) -> bool) -> Option<T> {
        self.rows
            .read()
            .await
            .map
            .values()
            .find(|row| predicate(row))
            .cloned()
    }

    /// All rows in id order.
    pub async fn list(&self) -> Vec<T> {
        self.rows.read().await.map.values().cloned().collect()
    }

    /// Rows matching `predicate`, in id order.
    pub async fn filter(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        self.rows
            .read()
            .await
            .map
            .values()
            .filter(|row| predicate(row))
            .cloned()
            .collect()
    }

    /// Assign the next id, build the row with it, and store it.
    pub async fn insert_with(&self, build: impl FnOnce(K) -> T) -> T {
        let mut rows = self.rows.write().await;
        let id = rows.next_id;
        rows.next_id = id.successor();
        let row = build(id);
        rows.map.insert(id, row.clone());
        row
    }

    /// Like [`insert_with`](Self::insert_with), unless some existing row
    /// matches `conflict`. The check and the insert happen under one lock.
    /// Returns `None` (and consumes no id) on conflict.
    pub async fn insert_unless(
        &self,
        conflict: impl Fn(&T) -> bool,
        build: impl FnOnce(K) -> T,
    ) -> Option<T> {
        let mut rows = self.rows.write().await;
        if rows.map.values().any(|row| conflict(row)) {
            return None;
        }
        let id = rows.next_id;
        rows.next_id = id.successor();
        let row = build(id);
        rows.map.insert(id, row.clone());
        Some(row)
    }

    /// Mutate the row with `id` in place and return the updated snapshot.
    /// Returns `None` if no such row exists.
    pub async fn update(&self, id: K, apply: impl FnOnce(&mut T)) -> Option<T> {
        let mut rows = self.rows.write().await;
        let row = rows.map.get_mut(&id)?;
        apply(row);
        Some(row.clone())
    }

    /// Apply a fallible mutation to the row with `id`.
    ///
    /// The mutation runs on a copy that replaces the stored row only if it
    /// succeeds, so on error the row is unchanged.
    ///
    /// # Errors
    ///
    /// Returns whatever `apply` returns.
    pub async fn try_update<E>(
        &self,
        id: K,
        apply: impl FnOnce(&mut T) -> Result<(), E>,
    ) -> Result<Option<T>, E> {
        let mut rows = self.rows.write().await;
        let Some(row) = rows.map.get_mut(&id) else {
            return Ok(None);
        };
        let mut draft = row.clone();
        apply(&mut draft)?;
        *row = draft.clone();
        Ok(Some(draft))
    }

    /// Delete the row with `id`. Its id is never handed out again.
    /// Returns whether a row was removed.
    pub async fn remove(&self, id: K) -> bool {
        self.rows.write().await.map.remove(&id).is_some()
    }

    /// Number of stored rows.
    pub async fn count(&self) -> usize {
        self.rows.read().await.map.len()
    }
}
