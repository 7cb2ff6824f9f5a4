use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::warn;

use super::domain::{CustomerId, DecisionRecord};

/// Persistence policy for decision records. Append keeps the full audit trail;
/// override retains only the most recent decision per customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecisionPolicy {
    #[default]
    AppendOnly,
    OverrideLatest,
}

impl DecisionPolicy {
    pub const fn label(self) -> &'static str {
        match self {
            DecisionPolicy::AppendOnly => "append",
            DecisionPolicy::OverrideLatest => "override",
        }
    }
}

/// Storage abstraction for persisted decisions.
pub trait DecisionStore: Send + Sync {
    /// Add a record without touching existing ones.
    fn append(&self, record: &DecisionRecord) -> Result<(), StoreError>;

    /// Drop any prior records for the customer, then add the new one.
    fn override_latest(
        &self,
        customer_id: &CustomerId,
        record: &DecisionRecord,
    ) -> Result<(), StoreError>;

    /// Records most-recent-first by `created_at`. An empty or missing store
    /// yields an empty vec, never an error.
    fn query(
        &self,
        customer_id: Option<&CustomerId>,
        limit: usize,
    ) -> Result<Vec<DecisionRecord>, StoreError>;
}

/// Error enumeration for store failures. Read-side corruption is not an error:
/// it is logged and the store treated as empty.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to write decision store at {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to encode decision records: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("decision store unavailable: {0}")]
    Unavailable(String),
}

/// JSON-file-backed store. Every mutation runs its whole read-modify-write
/// cycle behind one mutex so concurrent evaluations cannot lose updates, and
/// writes land on a temp file that is renamed into place so a failed write
/// cannot corrupt existing records.
pub struct JsonFileDecisionStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileDecisionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn load(&self) -> Vec<DecisionRecord> {
        let raw = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(err) => {
                warn!(path = %self.path.display(), %err, "decision store unreadable, treating as empty");
                return Vec::new();
            }
        };
        match serde_json::from_slice(&raw) {
            Ok(records) => records,
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    %err,
                    "decision store corrupt, existing records will be replaced"
                );
                Vec::new()
            }
        }
    }

    fn persist(&self, records: &[DecisionRecord]) -> Result<(), StoreError> {
        let encoded = serde_json::to_vec_pretty(records)?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, &encoded).map_err(|source| StoreError::Write {
            path: staging.clone(),
            source,
        })?;
        fs::rename(&staging, &self.path).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

impl DecisionStore for JsonFileDecisionStore {
    fn append(&self, record: &DecisionRecord) -> Result<(), StoreError> {
        let _guard = self.lock.lock().expect("store mutex poisoned");
        let mut records = self.load();
        records.push(record.clone());
        self.persist(&records)
    }

    fn override_latest(
        &self,
        customer_id: &CustomerId,
        record: &DecisionRecord,
    ) -> Result<(), StoreError> {
        let _guard = self.lock.lock().expect("store mutex poisoned");
        let mut records = self.load();
        records.retain(|existing| &existing.customer_id != customer_id);
        records.push(record.clone());
        self.persist(&records)
    }

    fn query(
        &self,
        customer_id: Option<&CustomerId>,
        limit: usize,
    ) -> Result<Vec<DecisionRecord>, StoreError> {
        let _guard = self.lock.lock().expect("store mutex poisoned");
        let mut records = self.load();
        if let Some(id) = customer_id {
            records.retain(|record| &record.customer_id == id);
        }
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(limit);
        Ok(records)
    }
}

/// In-memory store for tests and demos, with the same policy surface as the
/// file store.
#[derive(Default)]
pub struct InMemoryDecisionStore {
    records: Mutex<Vec<DecisionRecord>>,
}

impl DecisionStore for InMemoryDecisionStore {
    fn append(&self, record: &DecisionRecord) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        guard.push(record.clone());
        Ok(())
    }

    fn override_latest(
        &self,
        customer_id: &CustomerId,
        record: &DecisionRecord,
    ) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        guard.retain(|existing| &existing.customer_id != customer_id);
        guard.push(record.clone());
        Ok(())
    }

    fn query(
        &self,
        customer_id: Option<&CustomerId>,
        limit: usize,
    ) -> Result<Vec<DecisionRecord>, StoreError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        let mut records: Vec<DecisionRecord> = guard
            .iter()
            .filter(|record| customer_id.map_or(true, |id| &record.customer_id == id))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(limit);
        Ok(records)
    }
}
