//! Fan-in reconciler
//!
//! Drains the two producer channels into the users and collections indexes.
//! Whichever channel has a value ready is served first, with no priority
//! between them. The loop ends only after both channels report closed, and a
//! closed channel only reports closed once its buffer is empty, so every value
//! sent before closure is indexed.

use super::stats::ScanCounters;
use crate::record::{
    Collection, CollectionRawRecord, CollectionsIndex, RecipeRawRecord, SavedItem, UsersIndex,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error};

/// The two indexes built from a scan
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Reconciled {
    pub users: UsersIndex,
    pub collections: CollectionsIndex,
}

/// Single-writer accumulator for both indexes
#[derive(Debug)]
pub struct Reconciler {
    counters: Arc<ScanCounters>,
    indexes: Reconciled,
}

impl Reconciler {
    pub fn new(counters: Arc<ScanCounters>) -> Self {
        Self {
            counters,
            indexes: Reconciled::default(),
        }
    }

    /// Map a collection row and append it under its owner. Invalid rows are
    /// logged and dropped.
    pub fn accept_collection(&mut self, raw: &CollectionRawRecord) {
        match Collection::from_raw(raw) {
            Ok(collection) => self
                .indexes
                .users
                .entry(collection.owner)
                .or_default()
                .push(collection),
            Err(e) => {
                self.counters.record_invalid_collection();
                error!(field = e.field(), value = %e.value(), record = ?raw, "{}", e);
            }
        }
    }

    /// Map a recipe row and append it under its collection. Invalid rows are
    /// logged and dropped.
    pub fn accept_recipe(&mut self, raw: &RecipeRawRecord) {
        match SavedItem::from_raw(raw) {
            Ok(item) => self
                .indexes
                .collections
                .entry(item.collection_id)
                .or_default()
                .push(item),
            Err(e) => {
                self.counters.record_invalid_recipe();
                error!(field = e.field(), value = %e.value(), record = ?raw, "{}", e);
            }
        }
    }

    /// Drain both channels until each has closed, then hand back the indexes
    pub async fn run(
        mut self,
        mut collections: mpsc::Receiver<CollectionRawRecord>,
        mut recipes: mpsc::Receiver<RecipeRawRecord>,
    ) -> Reconciled {
        let mut collections_open = true;
        let mut recipes_open = true;

        loop {
            tokio::select! {
                msg = collections.recv(), if collections_open => match msg {
                    Some(raw) => self.accept_collection(&raw),
                    None => {
                        debug!("Collections channel closed");
                        collections_open = false;
                    }
                },
                msg = recipes.recv(), if recipes_open => match msg {
                    Some(raw) => self.accept_recipe(&raw),
                    None => {
                        debug!("Recipes channel closed");
                        recipes_open = false;
                    }
                },
                else => break,
            }
        }

        self.indexes
    }

    pub fn into_indexes(self) -> Reconciled {
        self.indexes
    }
}

/// Convenience wrapper around [`Reconciler::run`]
pub async fn reconcile(
    collections: mpsc::Receiver<CollectionRawRecord>,
    recipes: mpsc::Receiver<RecipeRawRecord>,
    counters: Arc<ScanCounters>,
) -> Reconciled {
    Reconciler::new(counters).run(collections, recipes).await
}
