use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use shared_models::entities::Table;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Row {id} not found in {table}")]
    RowNotFound { table: Table, id: Uuid },

    #[error("Row {id} already exists in {table}")]
    DuplicateRow { table: Table, id: Uuid },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

/// Column equality conditions, all of which must hold for a row to match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
}

impl Filter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_id(id: Uuid) -> Self {
        Self::all().eq("id", id)
    }

    pub fn eq<V: Serialize>(mut self, column: &str, value: V) -> Self {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.conditions.push((column.to_string(), value));
        self
    }

    pub fn conditions(&self) -> &[(String, Value)] {
        &self.conditions
    }

    pub fn matches(&self, row: &Value) -> bool {
        self.conditions
            .iter()
            .all(|(column, expected)| row.get(column) == Some(expected))
    }
}

/// A pending write, staged by a repository and applied on commit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    Insert { table: Table, id: Uuid, row: Value },
    Update { table: Table, id: Uuid, row: Value },
    Delete { table: Table, id: Uuid },
}

impl Mutation {
    pub fn table(&self) -> Table {
        match self {
            Mutation::Insert { table, .. }
            | Mutation::Update { table, .. }
            | Mutation::Delete { table, .. } => *table,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            Mutation::Insert { id, .. } | Mutation::Update { id, .. } | Mutation::Delete { id, .. } => {
                *id
            }
        }
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Rows of `table` matching `filter`, in storage order.
    async fn select(&self, table: Table, filter: &Filter) -> Result<Vec<Value>, StoreError>;

    /// Applies the whole batch or none of it. Returns the number of mutations applied.
    async fn apply(&self, changes: Vec<Mutation>) -> Result<usize, StoreError>;
}

pub type SharedStore = Arc<dyn Store>;
