//! Category cache.

use tokio::sync::watch;

use super::{remove_by_id, replace_by_id, Cache, Snapshot};
use crate::api::CategoriesApi;
use crate::error::Result;
use crate::models::{Category, CategoryChanges, CategoryId, NewCategory};

/// Unfiltered mirror of the categories collection, in service order.
pub struct CategoryStore<A> {
    api: A,
    cache: Cache<Category>,
}

impl<A: CategoriesApi> CategoryStore<A> {
    /// Create an empty, idle store; nothing is loaded until [`CategoryStore::fetch`].
    pub fn new(api: A) -> Self {
        Self {
            api,
            cache: Cache::new("categories"),
        }
    }

    /// Create a store and load every category.
    ///
    /// A failed initial fetch is recorded in the snapshot rather than returned.
    pub async fn open(api: A) -> Self {
        let store = Self::new(api);
        let _ = store.fetch().await;
        store
    }

    pub fn snapshot(&self) -> Snapshot<Category> {
        self.cache.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot<Category>> {
        self.cache.subscribe()
    }

    pub async fn fetch(&self) -> Result<()> {
        self.cache.begin_fetch();
        let result = self.api.list_categories().await;
        self.cache.finish_fetch(result)
    }

    pub async fn get(&self, id: &CategoryId) -> Result<Category> {
        self.api.get_category(id).await
    }

    /// Create a category and append it to the cache.
    pub async fn create(&self, category: &NewCategory) -> Result<Category> {
        let result = match category.validate() {
            Ok(()) => self.api.create_category(category).await,
            Err(error) => Err(error),
        };
        self.cache
            .settle("create", result, |categories, created| {
                categories.push(created.clone());
            })
    }

    pub async fn update(&self, id: &CategoryId, changes: &CategoryChanges) -> Result<Category> {
        let result = match changes.validate() {
            Ok(()) => self.api.update_category(id, changes).await,
            Err(error) => Err(error),
        };
        self.cache.settle("update", result, |categories, updated| {
            replace_by_id(categories, updated);
        })
    }

    pub async fn delete(&self, id: &CategoryId) -> Result<()> {
        let result = self.api.delete_category(id).await;
        self.cache
            .settle("delete", result, |categories, _| remove_by_id(categories, *id))
    }
}
