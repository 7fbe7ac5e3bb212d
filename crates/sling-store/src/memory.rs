//! In-process store implementation
//!
//! All tables live behind one mutex, so every transaction observes and
//! mutates a single consistent state. Writes are applied in two phases: all
//! conditions are checked first, and only if every one holds are the writes
//! applied.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use crate::model::{GetOp, Item, TableSpec, WriteOp};
use crate::{LockStore, Result, StoreError};

struct Table {
    key_attribute: String,
    items: HashMap<String, Item>,
}

/// In-memory [`LockStore`] with serializable transactions
#[derive(Default)]
pub struct MemoryLockStore {
    tables: Mutex<HashMap<String, Table>>,
}

impl MemoryLockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with the given tables already declared
    pub fn with_tables(specs: &[TableSpec]) -> Self {
        let store = Self::new();
        for spec in specs {
            store.create_table(&spec.name, &spec.key_attribute);
        }
        store
    }

    /// Declare a table. Returns false if it already exists.
    pub fn create_table(&self, name: &str, key_attribute: &str) -> bool {
        let mut tables = self.tables.lock();
        if tables.contains_key(name) {
            return false;
        }
        tables.insert(
            name.to_string(),
            Table {
                key_attribute: key_attribute.to_string(),
                items: HashMap::new(),
            },
        );
        debug!(table = name, key_attribute, "Created table");
        true
    }

    /// Every item in a table, ordered by key
    pub fn scan(&self, table: &str) -> Result<Vec<Item>> {
        let tables = self.tables.lock();
        let table = tables
            .get(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;
        let mut keys: Vec<&String> = table.items.keys().collect();
        keys.sort();
        Ok(keys
            .into_iter()
            .filter_map(|k| table.items.get(k).cloned())
            .collect())
    }

    fn key_of(op: &WriteOp, table: &Table) -> Result<String> {
        let key = match op {
            WriteOp::Put { item, .. } => item.get(&table.key_attribute).cloned().ok_or_else(|| {
                StoreError::Validation(format!(
                    "item is missing key attribute '{}'",
                    table.key_attribute
                ))
            })?,
            WriteOp::Update { key, .. } | WriteOp::Delete { key, .. } => key.clone(),
        };
        non_empty(op.table(), key)
    }
}

fn non_empty(table: &str, key: String) -> Result<String> {
    if key.is_empty() {
        return Err(StoreError::EmptyKey {
            table: table.to_string(),
        });
    }
    Ok(key)
}

#[async_trait]
impl LockStore for MemoryLockStore {
    async fn transact_get(&self, gets: Vec<GetOp>) -> Result<Vec<Option<Item>>> {
        let tables = self.tables.lock();
        gets.iter()
            .map(|get| {
                let table = tables
                    .get(&get.table)
                    .ok_or_else(|| StoreError::TableNotFound(get.table.clone()))?;
                let key = non_empty(&get.table, get.key.clone())?;
                Ok(table.items.get(&key).cloned())
            })
            .collect()
    }

    async fn transact_write(&self, writes: Vec<WriteOp>) -> Result<()> {
        let mut tables = self.tables.lock();

        // Phase 1: resolve keys and check every condition against current state
        let mut keys = Vec::with_capacity(writes.len());
        let mut seen = HashSet::new();
        for (index, op) in writes.iter().enumerate() {
            let table = tables
                .get(op.table())
                .ok_or_else(|| StoreError::TableNotFound(op.table().to_string()))?;
            let key = Self::key_of(op, table)?;
            if !seen.insert((op.table().to_string(), key.clone())) {
                return Err(StoreError::Validation(format!(
                    "transaction touches '{}' in '{}' more than once",
                    key,
                    op.table()
                )));
            }
            if let Some(condition) = op.condition()
                && !condition.evaluate(table.items.get(&key))
            {
                debug!(index, table = op.table(), key = %key, "Conditional check failed");
                return Err(StoreError::ConditionalCheckFailed { index });
            }
            keys.push(key);
        }

        // Phase 2: apply
        for (op, key) in writes.into_iter().zip(keys) {
            match op {
                WriteOp::Put { table, item, .. } => {
                    if let Some(table) = tables.get_mut(&table) {
                        table.items.insert(key, item);
                    }
                }
                WriteOp::Update { table, set, .. } => {
                    if let Some(table) = tables.get_mut(&table) {
                        let key_attribute = table.key_attribute.clone();
                        let entry = table.items.entry(key.clone()).or_insert_with(|| {
                            let mut fresh = Item::new();
                            fresh.insert(key_attribute, key);
                            fresh
                        });
                        for (attribute, value) in set {
                            entry.insert(attribute, value);
                        }
                    }
                }
                WriteOp::Delete { table, .. } => {
                    if let Some(table) = tables.get_mut(&table) {
                        table.items.remove(&key);
                    }
                }
            }
        }

        Ok(())
    }
}
