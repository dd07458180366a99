//! Family directory synchronization
//!
//! `FamilyDirectorySync` owns the local roster and reconciles it with the
//! directory service. Every mutation happens under one async guard that is
//! never held across a directory call; completions re-acquire it before
//! touching the roster, so changes are applied and published in order.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use family_common::{InviteConfig, SyncConfig};
use family_core::{
    AccountIdentity, DirectoryService, FamilyRole, Invitation, InvitationError, Member,
    RosterEvent, SyncError, SyncResult, DEFAULT_MEMBER_NAME, MEMBER_RECORD_TYPE,
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::state::SyncState;
use crate::dto::SyncSnapshot;

/// Roster state holder shared by everything that observes or mutates it
pub struct FamilyDirectorySync {
    directory: Arc<dyn DirectoryService>,
    state: Mutex<SyncState>,
    in_flight: AtomicUsize,
    events: broadcast::Sender<RosterEvent>,
    invite_base: Url,
}

impl FamilyDirectorySync {
    pub fn new(directory: Arc<dyn DirectoryService>, invite_base: Url, event_buffer: usize) -> Arc<Self> {
        let (events, _) = broadcast::channel(event_buffer.max(1));
        Arc::new(Self {
            directory,
            state: Mutex::new(SyncState::default()),
            in_flight: AtomicUsize::new(0),
            events,
            invite_base,
        })
    }

    /// Build from configuration, validating the invite base URL up front
    pub fn from_config(
        directory: Arc<dyn DirectoryService>,
        sync: &SyncConfig,
        invite: &InviteConfig,
    ) -> Result<Arc<Self>, InvitationError> {
        let base = Invitation::parse_base(&invite.base_url)?;
        Ok(Self::new(directory, base, sync.event_buffer))
    }

    // ========================================================================
    // Observation
    // ========================================================================

    /// Subscribe to change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<RosterEvent> {
        self.events.subscribe()
    }

    /// `true` while any directory call is in flight
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub async fn snapshot(&self) -> SyncSnapshot {
        let state = self.state.lock().await;
        state.snapshot(self.is_loading())
    }

    pub async fn roster(&self) -> Vec<Member> {
        self.state.lock().await.roster.clone()
    }

    pub async fn identity(&self) -> Option<AccountIdentity> {
        self.state.lock().await.identity.clone()
    }

    pub async fn is_signed_in(&self) -> bool {
        self.state.lock().await.signed_in
    }

    pub async fn last_error(&self) -> Option<SyncError> {
        self.state.lock().await.last_error.clone()
    }

    pub async fn is_current_user_member(&self) -> bool {
        self.state.lock().await.is_current_user_member()
    }

    pub async fn current_member(&self) -> Option<Member> {
        self.state.lock().await.current_member().cloned()
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Check the account status and, when available, resolve the identity
    /// and fetch the roster
    #[instrument(skip(self))]
    pub async fn check_account_status(&self) {
        let _loading = self.begin();
        let epoch = {
            let mut state = self.state.lock().await;
            state.last_error = None;
            state.epoch
        };

        let result = self.directory.get_account_status().await;

        {
            let mut state = self.state.lock().await;
            if state.epoch != epoch {
                debug!("Account changed during status check, dropping result");
                return;
            }
            match result {
                Ok(status) if status.is_available() => {
                    state.signed_in = true;
                    state.account_status = Some(status);
                    self.emit(RosterEvent::account_status(true, Some(status)));
                    info!("Account available");
                }
                Ok(status) => {
                    state.signed_in = false;
                    state.account_status = Some(status);
                    self.emit(RosterEvent::account_status(false, Some(status)));
                    self.record_error(&mut state, SyncError::AccountUnavailable { status });
                    return;
                }
                Err(e) => {
                    state.signed_in = false;
                    state.account_status = None;
                    self.emit(RosterEvent::account_status(false, None));
                    self.record_error(&mut state, e.into());
                    return;
                }
            }
        }

        self.fetch_user_identity().await;
    }

    /// Resolve the account id and display name, then fetch the roster
    #[instrument(skip(self))]
    pub async fn fetch_user_identity(&self) {
        let _loading = self.begin();
        let epoch = self.state.lock().await.epoch;

        let account_id = match self.directory.get_current_account_id().await {
            Ok(id) => id,
            Err(e) => {
                let mut state = self.state.lock().await;
                if state.epoch == epoch {
                    self.record_error(&mut state, e.into());
                }
                return;
            }
        };
        if account_id.is_empty() {
            let mut state = self.state.lock().await;
            if state.epoch == epoch {
                self.record_error(&mut state, SyncError::MissingIdentity);
            }
            return;
        }

        let name = match self.directory.get_account_record(&account_id).await {
            Ok(record) => record.resolve_display_name(),
            Err(e) => {
                debug!(error = %e, "Account record unavailable, using default name");
                DEFAULT_MEMBER_NAME.to_string()
            }
        };

        let identity = AccountIdentity::new(account_id.into_inner(), name);
        {
            let mut state = self.state.lock().await;
            if state.epoch != epoch {
                debug!("Account changed during identity fetch, dropping result");
                return;
            }
            state.identity = Some(identity.clone());
            info!(account_id = %identity.id, name = %identity.name, "Identity resolved");
            self.emit(RosterEvent::identity_resolved(identity));
        }

        self.fetch_roster().await;
    }

    /// Replace the roster with the directory's member records
    ///
    /// Registers the current account as `Owner` when the fetched roster
    /// lacks it, or when the fetch failed and the roster is empty.
    #[instrument(skip(self))]
    pub async fn fetch_roster(&self) {
        let _loading = self.begin();
        let epoch = self.state.lock().await.epoch;

        let result = self.directory.query_records(MEMBER_RECORD_TYPE).await;

        let heal = {
            let mut state = self.state.lock().await;
            if state.epoch != epoch {
                debug!("Account changed during roster fetch, dropping result");
                return;
            }
            match result {
                Ok(records) => {
                    state.replace_roster(records.into_iter().map(Member::from_record));
                    info!(count = state.roster.len(), "Roster replaced");
                    self.emit(RosterEvent::roster_replaced(state.roster.clone()));
                    state.account_id().is_some() && !state.is_current_user_member()
                }
                Err(e) => {
                    self.record_error(&mut state, e.into());
                    state.account_id().is_some() && state.roster.is_empty()
                }
            }
        };

        if heal {
            info!("Current account missing from roster, registering as owner");
            if let Err(e) = self.register_self(FamilyRole::Owner).await {
                debug!(error = %e, "Self registration skipped");
            }
        }
    }

    /// Add the current account to the roster and the directory
    ///
    /// The optimistic member is appended and announced before the directory
    /// write is issued. A failed write keeps it in the roster.
    ///
    /// # Errors
    /// `MissingIdentity` when no account id has been resolved.
    #[instrument(skip(self))]
    pub async fn register_self(&self, role: FamilyRole) -> SyncResult<()> {
        let _loading = self.begin();

        let (member, epoch) = {
            let mut state = self.state.lock().await;
            let Some(identity) = state.identity.clone().filter(|i| !i.id.trim().is_empty()) else {
                self.record_error(&mut state, SyncError::MissingIdentity);
                return Err(SyncError::MissingIdentity);
            };

            if let Some(existing) = state.current_member() {
                debug!(member_id = %existing.id, "Already a member");
                self.emit(RosterEvent::member_present(existing.clone()));
                return Ok(());
            }
            if state.pending_registration.contains(&identity.id) {
                debug!("Registration already in flight");
                return Ok(());
            }

            let member = Member::placeholder(identity.name, role, identity.id);
            state.pending_registration.insert(member.device_id.clone());
            state.roster.push(member.clone());
            self.emit(RosterEvent::member_added(member.clone(), false));
            (member, state.epoch)
        };

        let result = self
            .directory
            .save_record(MEMBER_RECORD_TYPE, member.to_fields())
            .await;

        let mut state = self.state.lock().await;
        if state.epoch != epoch {
            debug!("Account changed during registration, dropping result");
            return Ok(());
        }
        state.pending_registration.remove(&member.device_id);

        match result {
            Ok(record) => {
                let confirmed = member.confirmed(record.id);
                match state.position_of_device(&confirmed.device_id) {
                    Some(index) => state.roster[index] = confirmed.clone(),
                    None => state.roster.push(confirmed.clone()),
                }
                info!(member_id = %confirmed.id, role = %confirmed.role, "Registered current account");
                self.emit(RosterEvent::member_added(confirmed, true));
            }
            Err(e) => {
                warn!(member_id = %member.id, "Registration not confirmed, keeping local member");
                self.record_error(&mut state, e.into());
            }
        }
        Ok(())
    }

    /// Remove a member, restoring it if the directory delete fails
    ///
    /// Unknown ids are ignored.
    #[instrument(skip(self))]
    pub async fn remove_member(&self, member_id: &str) {
        let _loading = self.begin();

        let (index, member, epoch) = {
            let mut state = self.state.lock().await;
            let Some(index) = state.roster.iter().position(|m| m.id == member_id) else {
                let err = SyncError::RecordNotFound(member_id.to_string());
                debug!(error = %err, "Nothing to remove");
                return;
            };
            let member = state.roster.remove(index);
            self.emit(RosterEvent::member_removed(member.clone()));
            (index, member, state.epoch)
        };

        let result = self.directory.delete_record(member_id).await;

        let mut state = self.state.lock().await;
        match result {
            Ok(()) => info!(member_id, "Member removed"),
            Err(e) => {
                if state.epoch != epoch {
                    debug!("Account changed during removal, not restoring");
                    return;
                }
                let reappeared = state
                    .roster
                    .iter()
                    .any(|m| m.id == member.id || m.device_id == member.device_id);
                if !reappeared {
                    let index = index.min(state.roster.len());
                    state.roster.insert(index, member.clone());
                    warn!(member_id, "Delete failed, member restored");
                    self.emit(RosterEvent::member_restored(member));
                }
                self.record_error(&mut state, e.into());
            }
        }
    }

    /// Create a shareable invitation link
    ///
    /// Nothing is written to the roster or the directory.
    ///
    /// # Errors
    /// `NotRegistered` when the current account is not in the roster.
    #[instrument(skip(self))]
    pub async fn invite(&self, name: &str, role: FamilyRole) -> SyncResult<Invitation> {
        let mut state = self.state.lock().await;
        let Some(inviter_id) = state.current_member().map(|m| m.device_id.clone()) else {
            self.record_error(&mut state, SyncError::NotRegistered);
            return Err(SyncError::NotRegistered);
        };

        let invitation = Invitation::issue(&self.invite_base, name.trim(), role, inviter_id);
        info!(token = %invitation.token, role = %role, "Invitation created");
        self.emit(RosterEvent::invitation_created(invitation.clone()));
        Ok(invitation)
    }

    /// React to the signed-in account changing: forget the previous
    /// account's state and start over
    #[instrument(skip(self))]
    pub async fn handle_account_changed(&self) {
        {
            let mut state = self.state.lock().await;
            state.reset_account();
            info!(epoch = state.epoch, "Account changed, resetting roster");
            self.emit(RosterEvent::roster_replaced(Vec::new()));
        }
        self.check_account_status().await;
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn begin(&self) -> InFlight<'_> {
        InFlight::enter(&self.in_flight)
    }

    /// Publish an event; having no subscribers is not an error
    fn emit(&self, event: RosterEvent) {
        let event_type = event.event_type();
        if self.events.send(event).is_err() {
            debug!(event_type, "No subscribers");
        }
    }

    fn record_error(&self, state: &mut SyncState, err: SyncError) {
        warn!(code = err.code(), error = %err, "Sync error");
        self.emit(RosterEvent::error_recorded(err.code(), err.to_string()));
        state.last_error = Some(err);
    }
}

impl std::fmt::Debug for FamilyDirectorySync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FamilyDirectorySync")
            .field("invite_base", &self.invite_base.as_str())
            .field("in_flight", &self.in_flight.load(Ordering::SeqCst))
            .field("subscribers", &self.events.receiver_count())
            .finish_non_exhaustive()
    }
}

/// Counts a directory call as in flight until dropped
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
