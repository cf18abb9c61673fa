//! Named shopping lists persisted as one JSON document.
//!
//! Layout on disk:
//!
//! ```json
//! { "42": { "lists": { "Кухня": [ {"item": "Клей", "quantity": 3, "unit": "шт"}, "Грунтовка" ] } } }
//! ```
//!
//! Every mutation is a whole-document read-modify-write. The cycle runs under
//! a mutex owned by the store, so concurrent sessions cannot lose each
//! other's updates. A missing or unreadable document counts as empty.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::db::UserKey;

/// List that receives items saved by the first, flat version of the document.
pub const LEGACY_LIST_NAME: &str = "Основной";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawItem")]
pub struct ShoppingItem {
    #[serde(rename = "item")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl ShoppingItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: None,
            unit: None,
        }
    }

    pub fn with_quantity(mut self, quantity: f64, unit: Option<String>) -> Self {
        self.quantity = Some(quantity);
        self.unit = unit;
        self
    }

    fn same_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawItem {
    Full {
        item: String,
        #[serde(default)]
        quantity: Option<f64>,
        #[serde(default)]
        unit: Option<String>,
    },
    Bare(String),
}

impl From<RawItem> for ShoppingItem {
    fn from(raw: RawItem) -> Self {
        match raw {
            RawItem::Full {
                item,
                quantity,
                unit,
            } => ShoppingItem {
                name: item,
                quantity,
                unit,
            },
            RawItem::Bare(name) => ShoppingItem::new(name),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawUserLists")]
pub struct UserLists {
    pub lists: BTreeMap<String, Vec<ShoppingItem>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawUserLists {
    Named {
        #[serde(default)]
        lists: BTreeMap<String, Vec<ShoppingItem>>,
    },
    Flat(Vec<ShoppingItem>),
}

impl From<RawUserLists> for UserLists {
    fn from(raw: RawUserLists) -> Self {
        match raw {
            RawUserLists::Named { lists } => UserLists { lists },
            RawUserLists::Flat(items) => {
                let mut lists = BTreeMap::new();
                if !items.is_empty() {
                    lists.insert(LEGACY_LIST_NAME.to_string(), items);
                }
                UserLists { lists }
            }
        }
    }
}

pub type Document = BTreeMap<String, UserLists>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    Updated,
}

#[derive(Clone)]
pub struct ShoppingListStore {
    path: Arc<PathBuf>,
    write_lock: Arc<Mutex<()>>,
}

impl ShoppingListStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Document {
        let raw = match tokio::fs::read_to_string(self.path.as_path()).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Document::new(),
            Err(err) => {
                tracing::warn!(error = %err, path = %self.path.display(), "Failed to read shopping lists");
                return Document::new();
            }
        };
        if raw.trim().is_empty() {
            return Document::new();
        }
        match serde_json::from_str(&raw) {
            Ok(doc) => doc,
            Err(err) => {
                tracing::warn!(error = %err, path = %self.path.display(), "Malformed shopping list document, starting empty");
                Document::new()
            }
        }
    }

    async fn save(&self, doc: &Document) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(doc)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, self.path.as_path()).await?;
        tracing::trace!(path = %self.path.display(), users = doc.len(), "Saved shopping lists");
        Ok(())
    }

    async fn mutate<R>(&self, f: impl FnOnce(&mut Document) -> R) -> Result<R> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.load().await;
        let result = f(&mut doc);
        doc.retain(|_, user| !user.lists.is_empty());
        self.save(&doc).await?;
        Ok(result)
    }

    /// Returns `false` when a list with that name already exists.
    pub async fn create_list(&self, user: UserKey, list: &str) -> Result<bool> {
        tracing::debug!(user = user.0, list, "Creating shopping list");
        self.mutate(|doc| {
            let lists = &mut doc.entry(user.to_string()).or_default().lists;
            if lists.contains_key(list) {
                false
            } else {
                lists.insert(list.to_string(), Vec::new());
                true
            }
        })
        .await
    }

    /// Upsert by item name. A repeated name keeps its position and takes the
    /// new quantity and unit when they are given.
    pub async fn add_item(&self, user: UserKey, list: &str, item: ShoppingItem) -> Result<AddOutcome> {
        tracing::debug!(user = user.0, list, item = %item.name, "Adding shopping list item");
        self.mutate(|doc| {
            let items = doc
                .entry(user.to_string())
                .or_default()
                .lists
                .entry(list.to_string())
                .or_default();
            match items.iter_mut().find(|i| i.same_name(&item.name)) {
                Some(existing) => {
                    if item.quantity.is_some() {
                        existing.quantity = item.quantity;
                        existing.unit = item.unit;
                    }
                    AddOutcome::Updated
                }
                None => {
                    items.push(item);
                    AddOutcome::Added
                }
            }
        })
        .await
    }

    /// Returns whether an item was removed.
    pub async fn remove_item(&self, user: UserKey, list: &str, name: &str) -> Result<bool> {
        tracing::debug!(user = user.0, list, item = name, "Removing shopping list item");
        self.mutate(|doc| {
            let Some(items) = doc
                .get_mut(&user.to_string())
                .and_then(|u| u.lists.get_mut(list))
            else {
                return false;
            };
            let before = items.len();
            items.retain(|i| !i.same_name(name));
            items.len() != before
        })
        .await
    }

    pub async fn remove_at(&self, user: UserKey, list: &str, index: usize) -> Result<Option<ShoppingItem>> {
        tracing::debug!(user = user.0, list, index, "Removing shopping list item by position");
        self.mutate(|doc| {
            let items = doc
                .get_mut(&user.to_string())
                .and_then(|u| u.lists.get_mut(list))?;
            (index < items.len()).then(|| items.remove(index))
        })
        .await
    }

    pub async fn clear_list(&self, user: UserKey, list: &str) -> Result<bool> {
        tracing::debug!(user = user.0, list, "Clearing shopping list");
        self.mutate(|doc| {
            match doc
                .get_mut(&user.to_string())
                .and_then(|u| u.lists.get_mut(list))
            {
                Some(items) => {
                    items.clear();
                    true
                }
                None => false,
            }
        })
        .await
    }

    pub async fn delete_list(&self, user: UserKey, list: &str) -> Result<bool> {
        tracing::debug!(user = user.0, list, "Deleting shopping list");
        self.mutate(|doc| {
            doc.get_mut(&user.to_string())
                .map(|u| u.lists.remove(list).is_some())
                .unwrap_or(false)
        })
        .await
    }

    /// Items in insertion order, or `None` for an unknown list.
    pub async fn items(&self, user: UserKey, list: &str) -> Option<Vec<ShoppingItem>> {
        self.load()
            .await
            .remove(&user.to_string())
            .and_then(|mut u| u.lists.remove(list))
    }

    /// List names with their item counts.
    pub async fn lists(&self, user: UserKey) -> Vec<(String, usize)> {
        self.load()
            .await
            .remove(&user.to_string())
            .map(|u| {
                u.lists
                    .into_iter()
                    .map(|(name, items)| (name, items.len()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> ShoppingListStore {
        ShoppingListStore::new(dir.path().join("shopping_list.json"))
    }

    #[tokio::test]
    async fn duplicate_add_updates_instead_of_appending() -> Result<()> {
        let dir = TempDir::new()?;
        let store = store_in(&dir);
        let user = UserKey(7);

        assert_eq!(
            store.add_item(user, "Кухня", ShoppingItem::new("Клей")).await?,
            AddOutcome::Added
        );
        let outcome = store
            .add_item(
                user,
                "Кухня",
                ShoppingItem::new("клей").with_quantity(3.0, Some("шт".into())),
            )
            .await?;
        assert_eq!(outcome, AddOutcome::Updated);

        let items = store.items(user, "Кухня").await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Клей");
        assert_eq!(items[0].quantity, Some(3.0));
        assert_eq!(items[0].unit.as_deref(), Some("шт"));
        Ok(())
    }

    #[tokio::test]
    async fn reload_preserves_insertion_order() -> Result<()> {
        let dir = TempDir::new()?;
        let user = UserKey(1);
        {
            let store = store_in(&dir);
            for name in ["Шпаклёвка", "Грунтовка", "Валик"] {
                store.add_item(user, "Ремонт", ShoppingItem::new(name)).await?;
            }
        }
        let reopened = store_in(&dir);
        let names: Vec<String> = reopened
            .items(user, "Ремонт")
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Шпаклёвка", "Грунтовка", "Валик"]);
        Ok(())
    }

    #[tokio::test]
    async fn remove_clear_delete() -> Result<()> {
        let dir = TempDir::new()?;
        let store = store_in(&dir);
        let user = UserKey(3);
        store.add_item(user, "A", ShoppingItem::new("x")).await?;
        store.add_item(user, "A", ShoppingItem::new("y")).await?;

        assert!(!store.remove_item(user, "A", "missing").await?);
        assert!(store.remove_item(user, "A", "X").await?);
        assert_eq!(store.items(user, "A").await.unwrap().len(), 1);

        assert!(store.clear_list(user, "A").await?);
        assert_eq!(store.items(user, "A").await, Some(Vec::new()));

        assert!(store.delete_list(user, "A").await?);
        assert!(store.items(user, "A").await.is_none());
        assert!(!store.delete_list(user, "A").await?);
        Ok(())
    }

    #[tokio::test]
    async fn create_list_rejects_duplicates() -> Result<()> {
        let dir = TempDir::new()?;
        let store = store_in(&dir);
        let user = UserKey(9);
        assert!(store.create_list(user, "Ванная").await?);
        assert!(!store.create_list(user, "Ванная").await?);
        assert_eq!(store.lists(user).await, vec![("Ванная".to_string(), 0)]);
        Ok(())
    }

    #[tokio::test]
    async fn malformed_document_is_treated_as_empty() -> Result<()> {
        let dir = TempDir::new()?;
        let store = store_in(&dir);
        tokio::fs::write(store.path(), "{ not json").await?;
        assert!(store.load().await.is_empty());

        store.add_item(UserKey(5), "Список", ShoppingItem::new("Клей")).await?;
        assert_eq!(store.items(UserKey(5), "Список").await.unwrap().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn reads_bare_and_flat_legacy_entries() -> Result<()> {
        let dir = TempDir::new()?;
        let store = store_in(&dir);
        tokio::fs::write(
            store.path(),
            r#"{"1": ["Клей", "Ламинат"], "2": {"lists": {"Дача": ["Краска", {"item": "Доска", "quantity": 4}]}}}"#,
        )
        .await?;

        let legacy = store.items(UserKey(1), LEGACY_LIST_NAME).await.unwrap();
        assert_eq!(legacy, vec![ShoppingItem::new("Клей"), ShoppingItem::new("Ламинат")]);

        let dacha = store.items(UserKey(2), "Дача").await.unwrap();
        assert_eq!(dacha[0], ShoppingItem::new("Краска"));
        assert_eq!(dacha[1].quantity, Some(4.0));
        assert_eq!(dacha[1].unit, None);
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_adds_are_not_lost() -> Result<()> {
        let dir = TempDir::new()?;
        let store = store_in(&dir);
        let mut tasks = Vec::new();
        for i in 0..10u64 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                store
                    .add_item(UserKey(i % 2), "Общий", ShoppingItem::new(format!("item {i}")))
                    .await
            }));
        }
        for task in tasks {
            task.await??;
        }
        assert_eq!(store.items(UserKey(0), "Общий").await.unwrap().len(), 5);
        assert_eq!(store.items(UserKey(1), "Общий").await.unwrap().len(), 5);
        Ok(())
    }
}
