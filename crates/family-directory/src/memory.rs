//! In-process directory service
//!
//! Keeps the signed-in account and the member records in memory. Every call
//! can be slowed down or made to fail per operation, which is how the sync
//! layer's ordering and rollback behavior gets exercised without a real
//! network.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use family_common::DirectoryConfig;
use family_core::{
    AccountId, AccountRecord, AccountStatus, DirectoryError, DirectoryRecord, DirectoryResult,
    DirectoryService, Member, MemberFields, MEMBER_RECORD_TYPE,
};
use parking_lot::RwLock;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::operation::DirectoryOperation;

/// In-memory implementation of `DirectoryService`
///
/// Cloning is cheap and every clone observes the same state, so a test can
/// keep a handle while the sync layer owns another.
#[derive(Clone, Default)]
pub struct InMemoryDirectory {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    state: RwLock<DirectoryState>,
    calls: [AtomicU64; 6],
}

#[derive(Default)]
struct DirectoryState {
    account_id: String,
    status: Option<AccountStatus>,
    account: AccountRecord,
    records: Vec<DirectoryRecord>,
    latency: Duration,
    op_latency: HashMap<DirectoryOperation, Duration>,
    failing: HashSet<DirectoryOperation>,
}

impl InMemoryDirectory {
    /// Create an empty directory with an available, anonymous account
    pub fn new() -> Self {
        let directory = Self::default();
        directory.inner.state.write().status = Some(AccountStatus::Available);
        directory
    }

    /// Build from application configuration
    pub fn from_config(config: &DirectoryConfig) -> Self {
        let directory = Self::new();
        {
            let mut state = directory.inner.state.write();
            state.account_id = config.account_id.clone();
            state.status = Some(config.account_status);
            state.account = config.account.clone();
            state.latency = Duration::from_millis(config.latency_ms);
        }
        if config.seed_sample {
            directory.seed_samples();
        }
        directory
    }

    /// Builder-style account id
    #[must_use]
    pub fn with_account(self, account_id: impl Into<String>, record: AccountRecord) -> Self {
        {
            let mut state = self.inner.state.write();
            state.account_id = account_id.into();
            state.account = record;
        }
        self
    }

    /// Builder-style record seed
    #[must_use]
    pub fn with_member(self, member: &Member) -> Self {
        self.insert_record(DirectoryRecord::new(member.id.clone(), member.to_fields()));
        self
    }

    /// Add the sample family under their fixed ids
    pub fn seed_samples(&self) {
        for member in Member::samples() {
            self.insert_record(DirectoryRecord::new(member.id.clone(), member.to_fields()));
        }
    }

    // ------------------------------------------------------------------
    // Account knobs
    // ------------------------------------------------------------------

    pub fn set_account_id(&self, account_id: impl Into<String>) {
        self.inner.state.write().account_id = account_id.into();
    }

    pub fn set_account_status(&self, status: AccountStatus) {
        self.inner.state.write().status = Some(status);
    }

    pub fn set_account_record(&self, record: AccountRecord) {
        self.inner.state.write().account = record;
    }

    // ------------------------------------------------------------------
    // Records
    // ------------------------------------------------------------------

    /// Store a record as-is, replacing any record with the same id
    pub fn insert_record(&self, record: DirectoryRecord) {
        let mut state = self.inner.state.write();
        match state.records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record,
            None => state.records.push(record),
        }
    }

    /// Drop a record without going through the service API
    pub fn remove_record(&self, record_id: &str) -> bool {
        let mut state = self.inner.state.write();
        let before = state.records.len();
        state.records.retain(|r| r.id != record_id);
        state.records.len() != before
    }

    /// Snapshot of stored records in insertion order
    pub fn records(&self) -> Vec<DirectoryRecord> {
        self.inner.state.read().records.clone()
    }

    // ------------------------------------------------------------------
    // Latency and fault injection
    // ------------------------------------------------------------------

    /// Latency applied to every call without a per-operation override
    pub fn set_latency(&self, latency: Duration) {
        self.inner.state.write().latency = latency;
    }

    pub fn set_operation_latency(&self, op: DirectoryOperation, latency: Duration) {
        self.inner.state.write().op_latency.insert(op, latency);
    }

    /// Make every subsequent call of `op` fail with a network error
    pub fn fail(&self, op: DirectoryOperation) {
        self.inner.state.write().failing.insert(op);
    }

    pub fn recover(&self, op: DirectoryOperation) {
        self.inner.state.write().failing.remove(&op);
    }

    /// Number of calls made to `op`, failed ones included
    pub fn call_count(&self, op: DirectoryOperation) -> u64 {
        self.inner.calls[op.index()].load(Ordering::SeqCst)
    }

    /// Count the call, wait out the latency, then apply any injected fault
    async fn enter(&self, op: DirectoryOperation) -> DirectoryResult<()> {
        self.inner.calls[op.index()].fetch_add(1, Ordering::SeqCst);

        let latency = {
            let state = self.inner.state.read();
            state.op_latency.get(&op).copied().unwrap_or(state.latency)
        };
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        if self.inner.state.read().failing.contains(&op) {
            warn!(operation = %op, "Injected directory failure");
            return Err(DirectoryError::network(format!("{op} unavailable")));
        }
        Ok(())
    }

    /// Calls other than the status check need a usable account
    fn require_account(&self) -> DirectoryResult<()> {
        match self.inner.state.read().status {
            Some(status) if status.is_available() => Ok(()),
            _ => Err(DirectoryError::NotAuthenticated),
        }
    }
}

impl std::fmt::Debug for InMemoryDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.read();
        f.debug_struct("InMemoryDirectory")
            .field("account_id", &state.account_id)
            .field("status", &state.status)
            .field("records", &state.records.len())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl DirectoryService for InMemoryDirectory {
    #[instrument(skip(self))]
    async fn get_account_status(&self) -> DirectoryResult<AccountStatus> {
        self.enter(DirectoryOperation::AccountStatus).await?;
        let status = self.inner.state.read().status;
        status.ok_or_else(|| DirectoryError::internal("account status not set"))
    }

    #[instrument(skip(self))]
    async fn get_current_account_id(&self) -> DirectoryResult<AccountId> {
        self.enter(DirectoryOperation::CurrentAccountId).await?;
        self.require_account()?;
        Ok(AccountId::new(self.inner.state.read().account_id.clone()))
    }

    #[instrument(skip(self))]
    async fn get_account_record(&self, account_id: &AccountId) -> DirectoryResult<AccountRecord> {
        self.enter(DirectoryOperation::AccountRecord).await?;
        self.require_account()?;

        let state = self.inner.state.read();
        if state.account_id != account_id.as_str() {
            return Err(DirectoryError::RecordNotFound(account_id.to_string()));
        }
        Ok(state.account.clone())
    }

    #[instrument(skip(self))]
    async fn query_records(&self, record_type: &str) -> DirectoryResult<Vec<DirectoryRecord>> {
        self.enter(DirectoryOperation::QueryRecords).await?;
        self.require_account()?;

        if record_type != MEMBER_RECORD_TYPE {
            debug!(record_type, "Unknown record type, returning no records");
            return Ok(Vec::new());
        }
        let records = self.records();
        debug!(count = records.len(), "Queried member records");
        Ok(records)
    }

    #[instrument(skip(self, fields))]
    async fn save_record(
        &self,
        record_type: &str,
        mut fields: MemberFields,
    ) -> DirectoryResult<DirectoryRecord> {
        self.enter(DirectoryOperation::SaveRecord).await?;
        self.require_account()?;

        if record_type != MEMBER_RECORD_TYPE {
            return Err(DirectoryError::internal(format!(
                "unsupported record type: {record_type}"
            )));
        }
        fields.date_added.get_or_insert_with(Utc::now);

        let record = DirectoryRecord::new(Uuid::new_v4().to_string(), fields);
        self.inner.state.write().records.push(record.clone());
        debug!(record_id = %record.id, "Saved member record");
        Ok(record)
    }

    #[instrument(skip(self))]
    async fn delete_record(&self, record_id: &str) -> DirectoryResult<()> {
        self.enter(DirectoryOperation::DeleteRecord).await?;
        self.require_account()?;

        if self.remove_record(record_id) {
            debug!(record_id, "Deleted member record");
            Ok(())
        } else {
            Err(DirectoryError::RecordNotFound(record_id.to_string()))
        }
    }
}
