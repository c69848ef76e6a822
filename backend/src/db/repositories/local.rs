//! In-memory repository for unit testing and local development.
//!
//! Rows live in per-entity ordered maps behind a single `RwLock`. IDs are
//! allocated from one counter shared by all entities, mirroring the single
//! sequence used by the Postgres backend.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

use crate::db::filter::FilterSet;
use crate::db::models::{InsertedFamily, NewFamily, Page, PageRequest, Record};
use crate::db::repository::{EntityRepository, RepositoryResult, SettingsRepository};

#[derive(Debug, Default)]
struct LocalData {
    tables: HashMap<String, BTreeMap<i64, Record>>,
    settings: BTreeMap<String, Map<String, Value>>,
    next_id: i64,
}

/// In-memory repository implementation.
#[derive(Debug, Default)]
pub struct LocalRepository {
    data: RwLock<LocalData>,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows stored for an entity.
    pub fn row_count(&self, entity: &str) -> usize {
        self.data
            .read()
            .tables
            .get(entity)
            .map(BTreeMap::len)
            .unwrap_or(0)
    }

    fn matching(&self, entity: &str, filter: &FilterSet) -> Vec<Record> {
        let data = self.data.read();
        data.tables
            .get(entity)
            .map(|rows| {
                rows.values()
                    .filter(|row| filter.matches(row))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn timestamp() -> Value {
    Value::String(Utc::now().to_rfc3339())
}

impl LocalData {
    fn store(&mut self, entity: &str, mut attrs: Record) -> Record {
        self.next_id += 1;
        let id = self.next_id;

        let now = timestamp();
        attrs.insert("id".to_string(), Value::from(id));
        attrs.insert("created_at".to_string(), now.clone());
        attrs.insert("updated_at".to_string(), now);

        self.tables
            .entry(entity.to_string())
            .or_default()
            .insert(id, attrs.clone());
        attrs
    }
}

#[async_trait]
impl EntityRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }

    async fn find(&self, entity: &str, id: i64) -> RepositoryResult<Option<Record>> {
        let data = self.data.read();
        Ok(data.tables.get(entity).and_then(|rows| rows.get(&id)).cloned())
    }

    async fn list(
        &self,
        entity: &str,
        filter: &FilterSet,
        page: PageRequest,
    ) -> RepositoryResult<Page<Record>> {
        Ok(Page::from_vec(self.matching(entity, filter), page))
    }

    async fn count(&self, entity: &str, filter: &FilterSet) -> RepositoryResult<u64> {
        Ok(self.matching(entity, filter).len() as u64)
    }

    async fn insert(&self, entity: &str, attrs: Record) -> RepositoryResult<Record> {
        Ok(self.data.write().store(entity, attrs))
    }

    async fn insert_family(&self, family: NewFamily) -> RepositoryResult<Option<InsertedFamily>> {
        let mut data = self.data.write();
        let taken = data
            .tables
            .get(&family.entity)
            .is_some_and(|rows| rows.values().any(|row| family.unique.matches(row)));
        if taken {
            return Ok(None);
        }

        let parent = data.store(&family.entity, family.attrs);
        let parent_id = parent.get("id").cloned().unwrap_or(Value::Null);
        let children = family
            .children
            .into_iter()
            .map(|mut child| {
                child.insert(family.foreign_key.clone(), parent_id.clone());
                data.store(&family.child_entity, child)
            })
            .collect();
        Ok(Some(InsertedFamily { parent, children }))
    }

    async fn update(
        &self,
        entity: &str,
        id: i64,
        attrs: Record,
    ) -> RepositoryResult<Option<Record>> {
        let mut data = self.data.write();
        let Some(row) = data.tables.get_mut(entity).and_then(|rows| rows.get_mut(&id)) else {
            return Ok(None);
        };

        for (key, value) in attrs {
            if key != "id" && key != "created_at" {
                row.insert(key, value);
            }
        }
        row.insert("updated_at".to_string(), timestamp());
        Ok(Some(row.clone()))
    }

    async fn delete(&self, entity: &str, id: i64) -> RepositoryResult<bool> {
        let mut data = self.data.write();
        Ok(data
            .tables
            .get_mut(entity)
            .and_then(|rows| rows.remove(&id))
            .is_some())
    }

    async fn delete_where(&self, entity: &str, filter: &FilterSet) -> RepositoryResult<u64> {
        let mut data = self.data.write();
        let Some(rows) = data.tables.get_mut(entity) else {
            return Ok(0);
        };
        let before = rows.len();
        rows.retain(|_, row| !filter.matches(row));
        Ok((before - rows.len()) as u64)
    }
}

#[async_trait]
impl SettingsRepository for LocalRepository {
    async fn settings_for(&self, group: &str) -> RepositoryResult<Map<String, Value>> {
        Ok(self.data.read().settings.get(group).cloned().unwrap_or_default())
    }

    async fn all_settings(&self) -> RepositoryResult<Map<String, Value>> {
        let data = self.data.read();
        Ok(data
            .settings
            .iter()
            .map(|(group, values)| (group.clone(), Value::Object(values.clone())))
            .collect())
    }

    async fn put_setting(&self, group: &str, key: &str, value: Value) -> RepositoryResult<()> {
        self.data
            .write()
            .settings
            .entry(group.to_string())
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_insert_assigns_ids_and_timestamps() {
        let repo = LocalRepository::new();
        let first = repo.insert("teams", attrs(json!({"name": "A"}))).await.unwrap();
        let second = repo.insert("cities", attrs(json!({"name": "B"}))).await.unwrap();

        assert_eq!(first["id"], json!(1));
        assert_eq!(second["id"], json!(2));
        assert!(first.contains_key("created_at"));
        assert_eq!(repo.row_count("teams"), 1);
    }

    #[tokio::test]
    async fn test_update_merges_and_keeps_identity() {
        let repo = LocalRepository::new();
        let row = repo
            .insert("teams", attrs(json!({"name": "A", "city_id": 3})))
            .await
            .unwrap();
        let id = row["id"].as_i64().unwrap();

        let updated = repo
            .update("teams", id, attrs(json!({"name": "B", "id": 99})))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated["name"], json!("B"));
        assert_eq!(updated["city_id"], json!(3));
        assert_eq!(updated["id"], json!(id));

        assert!(repo.update("teams", 404, Record::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_filters_and_pages() {
        let repo = LocalRepository::new();
        for i in 0..7 {
            repo.insert("laps", attrs(json!({"swimmer_id": i % 2, "length_in_meters": 50})))
                .await
                .unwrap();
        }

        let filter = FilterSet::new().exact("swimmer_id", 1);
        let page = repo.list("laps", &filter, PageRequest::new(1, 2)).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 2);
        assert_eq!(repo.count("laps", &filter).await.unwrap(), 3);

        let unknown = repo
            .list("nothing", &FilterSet::new(), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(unknown.total, 0);
    }

    #[tokio::test]
    async fn test_delete_and_delete_where() {
        let repo = LocalRepository::new();
        let row = repo.insert("badges", attrs(json!({"team_id": 1}))).await.unwrap();
        repo.insert("badges", attrs(json!({"team_id": 2}))).await.unwrap();
        repo.insert("badges", attrs(json!({"team_id": 2}))).await.unwrap();

        assert!(repo.delete("badges", row["id"].as_i64().unwrap()).await.unwrap());
        assert!(!repo.delete("badges", 999).await.unwrap());

        let removed = repo
            .delete_where("badges", &FilterSet::new().exact("team_id", 2))
            .await
            .unwrap();
        assert_eq!(removed, 2);
        assert_eq!(repo.row_count("badges"), 0);
    }

    #[tokio::test]
    async fn test_insert_family_links_children_and_refuses_duplicates() {
        let repo = LocalRepository::new();
        let family = NewFamily {
            entity: "meeting_reservations".into(),
            attrs: attrs(json!({"badge_id": 4, "meeting_id": 9})),
            unique: FilterSet::new().exact("badge_id", 4).exact("meeting_id", 9),
            child_entity: "meeting_event_reservations".into(),
            foreign_key: "meeting_reservation_id".into(),
            children: vec![attrs(json!({"meeting_event_id": 1})), attrs(json!({"meeting_event_id": 2}))],
        };

        let stored = repo.insert_family(family.clone()).await.unwrap().unwrap();
        let parent_id = stored.parent["id"].clone();
        assert_eq!(stored.children.len(), 2);
        assert!(stored
            .children
            .iter()
            .all(|child| child["meeting_reservation_id"] == parent_id));

        assert!(repo.insert_family(family).await.unwrap().is_none());
        assert_eq!(repo.row_count("meeting_reservations"), 1);
        assert_eq!(repo.row_count("meeting_event_reservations"), 2);
    }

    #[tokio::test]
    async fn test_settings_and_maintenance_flag() {
        let repo = LocalRepository::new();
        assert!(!repo.maintenance().await.unwrap());

        repo.put_setting("app", "maintenance", json!(true)).await.unwrap();
        assert!(repo.maintenance().await.unwrap());

        let all = repo.all_settings().await.unwrap();
        assert_eq!(all["app"]["maintenance"], json!(true));
    }
}
