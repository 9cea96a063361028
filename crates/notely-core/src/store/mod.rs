//! Observable caches mirroring the service's collections.
//!
//! A store owns a [`Snapshot`] inside a `tokio::sync::watch` channel. Every
//! operation is an independent round trip to the service; on success the
//! cached list is reconciled with the response, on failure the cache is left
//! untouched and the error message is recorded for display. Callers read the
//! current state with `snapshot()` and observe changes with `subscribe()`;
//! dropping the receiver unsubscribes.

mod categories;
mod notes;

#[cfg(test)]
mod testing;

pub use categories::CategoryStore;
pub use notes::NoteStore;

use tokio::sync::watch;

use crate::error::Result;
use crate::models::{Category, CategoryId, Note, NoteId};

/// Point-in-time view of a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot<T> {
    /// Cached entities in display order
    pub items: Vec<T>,
    /// True while at least one fetch is in flight
    pub loading: bool,
    /// Message of the most recent failure, cleared by the next success
    pub error: Option<String>,
    fetches_in_flight: usize,
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            fetches_in_flight: 0,
        }
    }
}

/// Cached entities addressable by id.
pub trait Entity: Clone {
    type Id: PartialEq + Copy + std::fmt::Display;

    fn id(&self) -> Self::Id;
}

impl Entity for Note {
    type Id = NoteId;

    fn id(&self) -> NoteId {
        self.id
    }
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> CategoryId {
        self.id
    }
}

/// Shared bookkeeping behind both stores.
struct Cache<T> {
    kind: &'static str,
    state: watch::Sender<Snapshot<T>>,
}

impl<T: Entity> Cache<T> {
    fn new(kind: &'static str) -> Self {
        let (state, _) = watch::channel(Snapshot::default());
        Self { kind, state }
    }

    fn snapshot(&self) -> Snapshot<T> {
        self.state.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Snapshot<T>> {
        self.state.subscribe()
    }

    fn begin_fetch(&self) {
        self.state.send_modify(|state| {
            state.fetches_in_flight += 1;
            state.loading = true;
        });
    }

    /// Replace the cache wholesale with a fetch result, or record its failure.
    fn finish_fetch(&self, result: Result<Vec<T>>) -> Result<()> {
        let outcome = match result {
            Ok(items) => {
                tracing::debug!(kind = self.kind, count = items.len(), "Fetched cache contents");
                self.state.send_modify(|state| {
                    state.items = items;
                    state.error = None;
                });
                Ok(())
            }
            Err(error) => {
                tracing::warn!(kind = self.kind, %error, "Fetch failed");
                self.state
                    .send_modify(|state| state.error = Some(error.to_string()));
                Err(error)
            }
        };
        self.state.send_modify(|state| {
            state.fetches_in_flight = state.fetches_in_flight.saturating_sub(1);
            state.loading = state.fetches_in_flight > 0;
        });
        outcome
    }

    /// Apply a mutation's result to the cache.
    ///
    /// On success `apply` edits the cached items and the error is cleared. On
    /// failure the items are left as they were, the message is recorded and
    /// the error is handed back to the caller.
    fn settle<R>(
        &self,
        operation: &'static str,
        result: Result<R>,
        apply: impl FnOnce(&mut Vec<T>, &R),
    ) -> Result<R> {
        match result {
            Ok(value) => {
                self.state.send_modify(|state| {
                    apply(&mut state.items, &value);
                    state.error = None;
                });
                Ok(value)
            }
            Err(error) => {
                tracing::warn!(kind = self.kind, operation, %error, "Mutation failed");
                self.state
                    .send_modify(|state| state.error = Some(error.to_string()));
                Err(error)
            }
        }
    }
}

/// Replace the entry with `entity`'s id in place; absent ids are ignored.
fn replace_by_id<T: Entity>(items: &mut [T], entity: &T) {
    if let Some(slot) = items.iter_mut().find(|item| item.id() == entity.id()) {
        *slot = entity.clone();
    }
}

fn remove_by_id<T: Entity>(items: &mut Vec<T>, id: T::Id) {
    items.retain(|item| item.id() != id);
}
