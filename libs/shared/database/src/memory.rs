use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use shared_models::entities::Table;

use crate::store::{Filter, Mutation, Store, StoreError};

/// In-process store keeping rows in insertion order. Used for local runs and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<Table, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn row_id(row: &Value) -> Option<Uuid> {
    row.get("id")
        .and_then(Value::as_str)
        .and_then(|id| Uuid::parse_str(id).ok())
}

fn position(rows: &[Value], id: Uuid) -> Option<usize> {
    rows.iter().position(|row| row_id(row) == Some(id))
}

fn apply_one(rows: &mut Vec<Value>, mutation: Mutation) -> Result<(), StoreError> {
    match mutation {
        Mutation::Insert { table, id, row } => {
            if position(rows, id).is_some() {
                return Err(StoreError::DuplicateRow { table, id });
            }
            rows.push(row);
        }
        Mutation::Update { table, id, row } => {
            let index = position(rows, id).ok_or(StoreError::RowNotFound { table, id })?;
            rows[index] = row;
        }
        Mutation::Delete { table, id } => {
            let index = position(rows, id).ok_or(StoreError::RowNotFound { table, id })?;
            rows.remove(index);
        }
    }
    Ok(())
}

#[async_trait]
impl Store for MemoryStore {
    async fn select(&self, table: Table, filter: &Filter) -> Result<Vec<Value>, StoreError> {
        let tables = self.tables.read().await;

        Ok(tables
            .get(&table)
            .map(|rows| rows.iter().filter(|row| filter.matches(row)).cloned().collect())
            .unwrap_or_default())
    }

    async fn apply(&self, changes: Vec<Mutation>) -> Result<usize, StoreError> {
        let count = changes.len();
        let mut tables = self.tables.write().await;

        // Work on copies of the touched tables so a failure leaves the store untouched.
        let touched: BTreeSet<Table> = changes.iter().map(Mutation::table).collect();
        let mut staged: HashMap<Table, Vec<Value>> = touched
            .iter()
            .map(|table| (*table, tables.get(table).cloned().unwrap_or_default()))
            .collect();

        for mutation in changes {
            let rows = staged.entry(mutation.table()).or_default();
            apply_one(rows, mutation)?;
        }

        tables.extend(staged);
        debug!("Applied {} mutations to memory store", count);

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn insert(table: Table, id: Uuid, name: &str) -> Mutation {
        Mutation::Insert { table, id, row: json!({ "id": id, "full_name": name }) }
    }

    #[tokio::test]
    async fn insert_update_delete_round() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();

        store.apply(vec![insert(Table::Doctors, id, "Dr. Who")]).await.unwrap();
        store
            .apply(vec![Mutation::Update {
                table: Table::Doctors,
                id,
                row: json!({ "id": id, "full_name": "Dr. House" }),
            }])
            .await
            .unwrap();

        let rows = store.select(Table::Doctors, &Filter::by_id(id)).await.unwrap();
        assert_eq!(rows[0]["full_name"], "Dr. House");

        store.apply(vec![Mutation::Delete { table: Table::Doctors, id }]).await.unwrap();
        assert!(store.select(Table::Doctors, &Filter::all()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_batch_applies_nothing() {
        let store = MemoryStore::new();
        let first = Uuid::new_v4();
        let missing = Uuid::new_v4();

        let result = store
            .apply(vec![
                insert(Table::Doctors, first, "Dr. One"),
                Mutation::Delete { table: Table::Patients, id: missing },
            ])
            .await;

        assert_matches!(result, Err(StoreError::RowNotFound { table: Table::Patients, id }) if id == missing);
        assert!(store.select(Table::Doctors, &Filter::all()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_insert_is_rejected() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();

        store.apply(vec![insert(Table::Doctors, id, "Dr. One")]).await.unwrap();
        let result = store.apply(vec![insert(Table::Doctors, id, "Dr. Two")]).await;

        assert_matches!(result, Err(StoreError::DuplicateRow { .. }));
    }

    #[tokio::test]
    async fn select_keeps_insertion_order() {
        let store = MemoryStore::new();
        let names = ["A", "B", "C"];

        for name in names {
            store.apply(vec![insert(Table::Doctors, Uuid::new_v4(), name)]).await.unwrap();
        }

        let rows = store.select(Table::Doctors, &Filter::all()).await.unwrap();
        let listed: Vec<&str> = rows.iter().filter_map(|r| r["full_name"].as_str()).collect();
        assert_eq!(listed, names);
    }
}
