//! Note cache scoped to one filter.

use tokio::sync::watch;

use super::{remove_by_id, replace_by_id, Cache, Snapshot};
use crate::api::NotesApi;
use crate::error::Result;
use crate::models::{CategoryId, NewNote, Note, NoteChanges, NoteFilter, NoteId};

/// Ordered, filtered mirror of the notes collection.
///
/// The cache is most-recent-first: created notes are prepended, updates keep
/// their position. A store is scoped to a single [`NoteFilter`]; changing the
/// filter refetches instead of reconciling.
pub struct NoteStore<A> {
    api: A,
    filter: watch::Sender<NoteFilter>,
    cache: Cache<Note>,
}

impl<A: NotesApi> NoteStore<A> {
    /// Create an empty store without contacting the service.
    ///
    /// The snapshot starts empty with `loading == false`; it only reports
    /// loading once [`NoteStore::fetch`] is under way. Use [`NoteStore::open`]
    /// to get a store whose first snapshot already reflects the service.
    pub fn new(api: A, filter: NoteFilter) -> Self {
        let (filter, _) = watch::channel(filter);
        Self {
            api,
            filter,
            cache: Cache::new("notes"),
        }
    }

    /// Create a store and load its first page of notes.
    ///
    /// A failed initial fetch is recorded in the snapshot rather than returned.
    pub async fn open(api: A, filter: NoteFilter) -> Self {
        let store = Self::new(api, filter);
        // Recorded in the snapshot.
        let _ = store.fetch().await;
        store
    }

    /// The filter this store is currently scoped to.
    pub fn filter(&self) -> NoteFilter {
        *self.filter.borrow()
    }

    pub fn snapshot(&self) -> Snapshot<Note> {
        self.cache.snapshot()
    }

    /// Observe every state change; drop the receiver to unsubscribe.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<Note>> {
        self.cache.subscribe()
    }

    /// Observe filter changes.
    pub fn subscribe_filter(&self) -> watch::Receiver<NoteFilter> {
        self.filter.subscribe()
    }

    /// Reload the cache for the current filter, replacing it wholesale.
    ///
    /// In-flight fetches are never cancelled; whichever response is applied
    /// last determines the cache contents.
    pub async fn fetch(&self) -> Result<()> {
        let filter = self.filter();
        self.cache.begin_fetch();
        let result = self.api.list_notes(&filter).await;
        self.cache.finish_fetch(result)
    }

    /// Re-scope the store, fetching once if the filter actually changed.
    ///
    /// Returns whether a fetch was issued.
    pub async fn set_filter(&self, filter: NoteFilter) -> Result<bool> {
        let changed = self.filter.send_if_modified(|current| {
            if *current == filter {
                false
            } else {
                *current = filter;
                true
            }
        });
        if !changed {
            return Ok(false);
        }
        tracing::debug!(?filter, "Note filter changed");
        self.fetch().await?;
        Ok(true)
    }

    /// Fetch one note straight from the service; the cache is not touched.
    pub async fn get(&self, id: &NoteId) -> Result<Note> {
        self.api.get_note(id).await
    }

    pub async fn create(&self, note: &NewNote) -> Result<Note> {
        let result = match note.validate() {
            Ok(()) => self.api.create_note(note).await,
            Err(error) => Err(error),
        };
        self.cache
            .settle("create", result, |notes, created| notes.insert(0, created.clone()))
    }

    pub async fn update(&self, id: &NoteId, changes: &NoteChanges) -> Result<Note> {
        let result = match changes.validate() {
            Ok(()) => self.api.update_note(id, changes).await,
            Err(error) => Err(error),
        };
        self.cache
            .settle("update", result, |notes, updated| replace_by_id(notes, updated))
    }

    pub async fn delete(&self, id: &NoteId) -> Result<()> {
        let result = self.api.delete_note(id).await;
        self.cache
            .settle("delete", result, |notes, _| remove_by_id(notes, *id))
    }

    /// Archive a note.
    ///
    /// The note leaves this store when it no longer matches the filter (the
    /// usual case for a store scoped to active notes); a store showing all
    /// notes keeps it in place with the updated flag. It is never moved into
    /// a sibling store.
    pub async fn archive(&self, id: &NoteId) -> Result<Note> {
        let result = self.api.archive_note(id).await;
        let filter = self.filter();
        self.cache.settle("archive", result, |notes, archived| {
            reconcile_with_filter(notes, archived, &filter);
        })
    }

    /// Unarchive a note; see [`NoteStore::archive`] for cache behaviour.
    pub async fn unarchive(&self, id: &NoteId) -> Result<Note> {
        let result = self.api.unarchive_note(id).await;
        let filter = self.filter();
        self.cache.settle("unarchive", result, |notes, restored| {
            reconcile_with_filter(notes, restored, &filter);
        })
    }

    /// Attach a category; the server's representation replaces the cached note.
    pub async fn add_category(&self, note_id: &NoteId, category_id: &CategoryId) -> Result<Note> {
        let result = self.api.add_category(note_id, category_id).await;
        self.cache
            .settle("add_category", result, |notes, tagged| replace_by_id(notes, tagged))
    }

    /// Detach a category; the server's representation replaces the cached note.
    pub async fn remove_category(
        &self,
        note_id: &NoteId,
        category_id: &CategoryId,
    ) -> Result<Note> {
        let result = self.api.remove_category(note_id, category_id).await;
        self.cache
            .settle("remove_category", result, |notes, untagged| {
                replace_by_id(notes, untagged);
            })
    }
}

fn reconcile_with_filter(notes: &mut Vec<Note>, note: &Note, filter: &NoteFilter) {
    if filter.matches(note) {
        replace_by_id(notes, note);
    } else {
        remove_by_id(notes, note.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::FakeService;
    use pretty_assertions::assert_eq;

    fn ids(store: &NoteStore<FakeService>) -> Vec<NoteId> {
        store.snapshot().items.iter().map(|note| note.id).collect()
    }

    #[tokio::test]
    async fn open_fetches_matching_notes() {
        let service = FakeService::new();
        let active = service.seed_note("Active", false);
        service.seed_note("Old", true);

        let store = NoteStore::open(service.clone(), NoteFilter::active()).await;
        let snapshot = store.snapshot();

        assert_eq!(ids(&store), vec![active.id]);
        assert!(!snapshot.loading);
        assert_eq!(snapshot.error, None);
        assert_eq!(service.list_calls(), 1);
    }

    #[tokio::test]
    async fn new_store_is_idle_until_fetched() {
        let service = FakeService::new();
        service.seed_note("Waiting", false);

        let store = NoteStore::new(service.clone(), NoteFilter::active());
        let snapshot = store.snapshot();

        assert!(snapshot.items.is_empty());
        assert!(!snapshot.loading);
        assert_eq!(service.list_calls(), 0);
    }

    #[tokio::test]
    async fn loading_stays_set_until_every_fetch_finishes() {
        let service = FakeService::new();
        let note = service.seed_note("Slow", false);
        let gate = service.gate_lists();
        let store = NoteStore::new(service.clone(), NoteFilter::active());

        let control = async {
            while service.list_calls() < 2 {
                tokio::task::yield_now().await;
            }
            assert!(store.snapshot().loading);

            gate.add_permits(1);
            while store.snapshot().items.is_empty() {
                tokio::task::yield_now().await;
            }
            let snapshot = store.snapshot();
            assert!(snapshot.loading);
            assert_eq!(snapshot.items[0].id, note.id);

            gate.add_permits(1);
        };
        let (first, second, ()) = tokio::join!(store.fetch(), store.fetch(), control);

        first.unwrap();
        second.unwrap();
        let snapshot = store.snapshot();
        assert!(!snapshot.loading);
        assert_eq!(ids(&store), vec![note.id]);
    }

    #[tokio::test]
    async fn failed_fetch_records_error_and_keeps_cache() {
        let service = FakeService::new();
        service.seed_note("Kept", false);
        let store = NoteStore::open(service.clone(), NoteFilter::active()).await;
        let before = store.snapshot().items;

        service.set_failing(true);
        assert!(store.fetch().await.is_err());

        let snapshot = store.snapshot();
        assert_eq!(snapshot.items, before);
        assert!(!snapshot.loading);
        assert!(snapshot.error.unwrap().contains("Service unavailable"));

        service.set_failing(false);
        store.fetch().await.unwrap();
        assert_eq!(store.snapshot().error, None);
    }

    #[tokio::test]
    async fn create_prepends_exactly_once() {
        let service = FakeService::new();
        let existing = service.seed_note("Existing", false);
        let store = NoteStore::open(service.clone(), NoteFilter::active()).await;

        let created = store
            .create(&NewNote::new("Fresh", "Just written"))
            .await
            .unwrap();

        assert_eq!(ids(&store), vec![created.id, existing.id]);
        assert_eq!(store.snapshot().items[0].title, "Fresh");
    }

    #[tokio::test]
    async fn create_rejects_invalid_input_without_request() {
        let service = FakeService::new();
        let store = NoteStore::open(service.clone(), NoteFilter::active()).await;

        let error = store.create(&NewNote::new("  ", "Body")).await.unwrap_err();

        assert!(error.to_string().contains("title must not be empty"));
        assert_eq!(service.mutation_calls(), 0);
        assert!(store.snapshot().items.is_empty());
        assert!(store.snapshot().error.is_some());
    }

    #[tokio::test]
    async fn update_replaces_in_place() {
        let service = FakeService::new();
        let first = service.seed_note("First", false);
        let second = service.seed_note("Second", false);
        let third = service.seed_note("Third", false);
        let store = NoteStore::open(service.clone(), NoteFilter::active()).await;
        let order = ids(&store);

        let changes = NoteChanges {
            title: Some("Second, revised".to_string()),
            content: None,
        };
        store.update(&second.id, &changes).await.unwrap();

        assert_eq!(ids(&store), order);
        let snapshot = store.snapshot();
        let updated = snapshot.items.iter().find(|n| n.id == second.id).unwrap();
        assert_eq!(updated.title, "Second, revised");
        assert_eq!(updated.content, second.content);
        assert!(order.contains(&first.id) && order.contains(&third.id));
    }

    #[tokio::test]
    async fn delete_removes_entry() {
        let service = FakeService::new();
        let doomed = service.seed_note("Doomed", false);
        let kept = service.seed_note("Kept", false);
        let store = NoteStore::open(service.clone(), NoteFilter::active()).await;

        store.delete(&doomed.id).await.unwrap();

        assert_eq!(ids(&store), vec![kept.id]);
    }

    #[tokio::test]
    async fn failed_mutation_leaves_cache_identical() {
        let service = FakeService::new();
        let note = service.seed_note("Stable", false);
        let store = NoteStore::open(service.clone(), NoteFilter::active()).await;
        let before = store.snapshot().items;

        service.set_failing(true);
        assert!(store.delete(&note.id).await.is_err());
        assert!(store.archive(&note.id).await.is_err());
        let changes = NoteChanges {
            title: Some("Nope".to_string()),
            content: None,
        };
        let error = store.update(&note.id, &changes).await.unwrap_err();

        assert_eq!(error.status(), Some(503));
        let snapshot = store.snapshot();
        assert_eq!(snapshot.items, before);
        assert!(!snapshot.error.unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn success_after_failure_clears_error() {
        let service = FakeService::new();
        let store = NoteStore::open(service.clone(), NoteFilter::active()).await;

        service.set_failing(true);
        assert!(store.create(&NewNote::new("A", "B")).await.is_err());
        assert!(store.snapshot().error.is_some());

        service.set_failing(false);
        store.create(&NewNote::new("A", "B")).await.unwrap();
        assert_eq!(store.snapshot().error, None);
    }

    #[tokio::test]
    async fn archive_drops_note_from_active_view() {
        let service = FakeService::new();
        let note = service.seed_note("Done", false);
        let other = service.seed_note("Pending", false);
        let store = NoteStore::open(service.clone(), NoteFilter::active()).await;

        let archived = store.archive(&note.id).await.unwrap();

        assert!(archived.is_archived);
        assert_eq!(ids(&store), vec![other.id]);
    }

    #[tokio::test]
    async fn unarchive_drops_note_from_archived_view() {
        let service = FakeService::new();
        let note = service.seed_note("Revived", true);
        let store = NoteStore::open(service.clone(), NoteFilter::archived()).await;
        assert_eq!(ids(&store), vec![note.id]);

        store.unarchive(&note.id).await.unwrap();

        assert!(store.snapshot().items.is_empty());
    }

    #[tokio::test]
    async fn archive_keeps_note_when_view_shows_everything() {
        let service = FakeService::new();
        let note = service.seed_note("Either way", false);
        let store = NoteStore::open(service.clone(), NoteFilter::default()).await;

        store.archive(&note.id).await.unwrap();

        let snapshot = store.snapshot();
        assert_eq!(snapshot.items.len(), 1);
        assert!(snapshot.items[0].is_archived);
    }

    #[tokio::test]
    async fn category_association_uses_server_representation() {
        let service = FakeService::new();
        let note = service.seed_note("Tagged", false);
        let category = service.seed_category("Work");
        let store = NoteStore::open(service.clone(), NoteFilter::active()).await;

        store.add_category(&note.id, &category.id).await.unwrap();
        let snapshot = store.snapshot();
        assert_eq!(snapshot.items[0].categories, vec![category.clone()]);

        // Adding twice does not duplicate the association.
        store.add_category(&note.id, &category.id).await.unwrap();
        assert_eq!(store.snapshot().items[0].categories.len(), 1);

        store.remove_category(&note.id, &category.id).await.unwrap();
        assert!(store.snapshot().items[0].categories.is_empty());
    }

    #[tokio::test]
    async fn set_filter_fetches_once_per_change() {
        let service = FakeService::new();
        let category = service.seed_category("Work");
        let tagged = service.seed_note("Tagged", false);
        service.seed_note("Untagged", false);
        service.attach(&tagged.id, &category.id);

        let store = NoteStore::open(service.clone(), NoteFilter::active()).await;
        assert_eq!(service.list_calls(), 1);
        assert_eq!(store.snapshot().items.len(), 2);

        let scoped = NoteFilter::active().with_category(Some(category.id));
        assert!(store.set_filter(scoped).await.unwrap());
        assert_eq!(service.list_calls(), 2);
        assert_eq!(ids(&store), vec![tagged.id]);
        assert_eq!(store.filter(), scoped);

        assert!(!store.set_filter(scoped).await.unwrap());
        assert_eq!(service.list_calls(), 2);
    }

    #[tokio::test]
    async fn subscribers_observe_mutations() {
        let service = FakeService::new();
        let store = NoteStore::open(service.clone(), NoteFilter::active()).await;
        let mut receiver = store.subscribe();

        let created = store.create(&NewNote::new("Seen", "By others")).await.unwrap();

        assert!(receiver.has_changed().unwrap());
        let observed = receiver.borrow_and_update().clone();
        assert_eq!(observed.items[0].id, created.id);
    }

    #[tokio::test]
    async fn get_does_not_touch_cache() {
        let service = FakeService::new();
        let archived = service.seed_note("Hidden", true);
        let store = NoteStore::open(service.clone(), NoteFilter::active()).await;

        let fetched = store.get(&archived.id).await.unwrap();

        assert_eq!(fetched.id, archived.id);
        assert!(store.snapshot().items.is_empty());
    }
}
