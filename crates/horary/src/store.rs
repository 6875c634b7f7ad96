//! Persistence seam for chart history and notes.
//!
//! The engine never touches a store. Callers that keep history hand a
//! [`KeyValueStore`] to [`ChartHistory`].

use crate::chart::types::Chart;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;
use uuid::Uuid;

const INDEX_KEY: &str = "history:index";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Store backend failed: {0}")]
    Backend(String),
    #[error("Could not encode record: {0}")]
    Encode(String),
    #[error("Corrupt record under {key}: {message}")]
    Corrupt { key: String, message: String },
}

/// String key-value storage owned by the host application.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn put(&self, key: &str, value: String) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let values = self
            .values
            .read()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn put(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut values = self
            .values
            .write()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        values.insert(key.to_string(), value);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub chart_id: Uuid,
    pub question: String,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub text: String,
    pub written_at: DateTime<Utc>,
}

/// Chart snapshots and notes, newest first.
pub struct ChartHistory<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> ChartHistory<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn record(&self, chart: &Chart, question: &str, at: DateTime<Utc>) -> Result<(), StoreError> {
        self.put_json(&chart_key(chart.id), chart)?;

        let mut index = self.entries()?;
        index.retain(|e| e.chart_id != chart.id);
        index.insert(
            0,
            HistoryEntry {
                chart_id: chart.id,
                question: question.to_string(),
                recorded_at: at,
            },
        );
        self.put_json(INDEX_KEY, &index)?;
        log::debug!("recorded chart {} in history ({} entries)", chart.id, index.len());
        Ok(())
    }

    pub fn entries(&self) -> Result<Vec<HistoryEntry>, StoreError> {
        Ok(self.get_json(INDEX_KEY)?.unwrap_or_default())
    }

    pub fn chart(&self, id: Uuid) -> Result<Option<Chart>, StoreError> {
        self.get_json(&chart_key(id))
    }

    pub fn add_note(&self, id: Uuid, text: &str, at: DateTime<Utc>) -> Result<(), StoreError> {
        let mut notes = self.notes(id)?;
        notes.push(Note {
            text: text.to_string(),
            written_at: at,
        });
        self.put_json(&notes_key(id), &notes)
    }

    pub fn notes(&self, id: Uuid) -> Result<Vec<Note>, StoreError> {
        Ok(self.get_json(&notes_key(id))?.unwrap_or_default())
    }

    fn put_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let text = serde_json::to_string(value).map_err(|e| StoreError::Encode(e.to_string()))?;
        self.store.put(key, text)
    }

    fn get_json<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.store.get(key)? {
            None => Ok(None),
            Some(text) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|e| StoreError::Corrupt {
                    key: key.to_string(),
                    message: e.to_string(),
                }),
        }
    }
}

fn chart_key(id: Uuid) -> String {
    format!("chart:{}", id)
}

fn notes_key(id: Uuid) -> String {
    format!("notes:{}", id)
}
