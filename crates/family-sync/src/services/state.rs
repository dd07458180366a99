//! Mutable synchronization state, only ever touched under the sync guard

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use family_core::{AccountIdentity, AccountStatus, Member, SyncError};

use crate::dto::{ErrorInfo, MemberResponse, SyncSnapshot};

#[derive(Debug, Default)]
pub(crate) struct SyncState {
    pub identity: Option<AccountIdentity>,
    pub account_status: Option<AccountStatus>,
    pub signed_in: bool,
    pub last_error: Option<SyncError>,
    pub roster: Vec<Member>,
    /// Device ids with a registration write in flight
    pub pending_registration: HashSet<String>,
    pub last_synced_at: Option<DateTime<Utc>>,
    /// Bumped on every account change; results tagged with an older epoch are dropped
    pub epoch: u64,
}

impl SyncState {
    /// Resolved, non-empty account id
    pub fn account_id(&self) -> Option<&str> {
        self.identity
            .as_ref()
            .map(|identity| identity.id.as_str())
            .filter(|id| !id.trim().is_empty())
    }

    pub fn position_of_device(&self, device_id: &str) -> Option<usize> {
        self.roster.iter().position(|m| m.device_id == device_id)
    }

    pub fn current_member(&self) -> Option<&Member> {
        let account_id = self.account_id()?;
        self.roster.iter().find(|m| m.is_account(account_id))
    }

    pub fn is_current_user_member(&self) -> bool {
        self.current_member().is_some()
    }

    /// Replace the roster with fetched members
    ///
    /// Keeps the first member per device id, then carries over optimistic
    /// members whose registration is still in flight.
    pub fn replace_roster(&mut self, fetched: impl IntoIterator<Item = Member>) {
        let mut seen = HashSet::new();
        let mut roster: Vec<Member> = fetched
            .into_iter()
            .filter(|m| seen.insert(m.device_id.clone()))
            .collect();

        for device_id in &self.pending_registration {
            if seen.contains(device_id) {
                continue;
            }
            if let Some(member) = self.roster.iter().find(|m| &m.device_id == device_id) {
                roster.push(member.clone());
            }
        }

        self.roster = roster;
        self.last_synced_at = Some(Utc::now());
    }

    /// Forget everything tied to the previous account
    pub fn reset_account(&mut self) {
        self.identity = None;
        self.account_status = None;
        self.signed_in = false;
        self.roster.clear();
        self.pending_registration.clear();
        self.last_synced_at = None;
        self.epoch += 1;
    }

    pub fn snapshot(&self, loading: bool) -> SyncSnapshot {
        let account_id = self.account_id();
        SyncSnapshot {
            signed_in: self.signed_in,
            loading,
            account_status: self.account_status,
            identity: self.identity.clone(),
            is_current_user_member: self.is_current_user_member(),
            members: self
                .roster
                .iter()
                .cloned()
                .map(|m| MemberResponse::new(m, account_id))
                .collect(),
            last_error: self.last_error.as_ref().map(ErrorInfo::from),
            last_synced_at: self.last_synced_at,
        }
    }
}
