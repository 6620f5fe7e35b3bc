//! Campaign Review Client
//!
//! Operator desk for moderating pending campaigns: list them, inspect one,
//! approve (`pending -> active`) or reject (delete).
//!
//! # Request lifecycle
//!
//! Each mutation goes through three explicit stages so the UI can issue
//! several of them concurrently without sharing mutable state:
//!
//! 1. [`ReviewClient::begin`] checks the target and marks it in flight
//! 2. [`ReviewRequest::execute`] performs the network call (no client borrow)
//! 3. [`ReviewClient::apply`] reconciles the local list from the response
//!
//! Local state only changes in stage 3 and only from what the server said.
//! A campaign with a request in flight refuses further requests.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use thiserror::Error;

use crate::core::api::{ApiError, CampaignApi, ErrorKind};
use crate::core::campaign::{Campaign, CampaignId, CampaignStatus};

// ============================================================================
// Requests and outcomes
// ============================================================================

/// Moderation decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Approve,
    Reject,
}

impl ReviewAction {
    pub fn label(&self) -> &'static str {
        match self {
            ReviewAction::Approve => "approve",
            ReviewAction::Reject => "reject",
        }
    }
}

/// A mutation that passed local checks and is ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRequest {
    pub id: CampaignId,
    pub action: ReviewAction,
}

/// Server answer for a [`ReviewRequest`].
#[derive(Debug, Clone)]
pub enum ReviewOutcome {
    Approved(Campaign),
    Rejected(CampaignId),
    Failed { request: ReviewRequest, error: ApiError },
}

impl ReviewOutcome {
    pub fn id(&self) -> &CampaignId {
        match self {
            ReviewOutcome::Approved(campaign) => &campaign.id,
            ReviewOutcome::Rejected(id) => id,
            ReviewOutcome::Failed { request, .. } => &request.id,
        }
    }
}

impl ReviewRequest {
    /// Perform the API call. Never fails; errors are carried in the outcome.
    pub async fn execute(self, api: &dyn CampaignApi) -> ReviewOutcome {
        let result = match self.action {
            ReviewAction::Approve => api
                .update_status(&self.id, CampaignStatus::Active)
                .await
                .map(ReviewOutcome::Approved),
            ReviewAction::Reject => api
                .delete_campaign(&self.id)
                .await
                .map(|()| ReviewOutcome::Rejected(self.id.clone())),
        };

        result.unwrap_or_else(|error| ReviewOutcome::Failed { request: self, error })
    }
}

// ============================================================================
// Errors and view state
// ============================================================================

/// Why a review action was refused or failed.
#[derive(Debug, Clone, Error)]
pub enum ReviewError {
    #[error("Campaign {0} is not in the review list")]
    UnknownCampaign(CampaignId),

    #[error("A request for campaign {0} is already in flight")]
    InFlight(CampaignId),

    #[error("Campaign {0} is no longer pending")]
    NotPending(CampaignId),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ReviewError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReviewError::Api(err) => err.kind(),
            ReviewError::UnknownCampaign(_) => ErrorKind::NotFound,
            ReviewError::InFlight(_) | ReviewError::NotPending(_) => ErrorKind::Other,
        }
    }
}

/// What the review list should display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReviewView<'a> {
    /// First load has not completed.
    Loading,
    /// Loaded, and nothing is waiting for review.
    Empty,
    Populated(&'a [Campaign]),
    /// First load failed; nothing to show.
    Failed(&'a str),
}

// ============================================================================
// ReviewClient
// ============================================================================

/// Stamp taken when a pending-list fetch is issued.
///
/// Mutations applied after the stamp are replayed over the fetched list, so
/// a listing that raced a reject or approve cannot undo it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingTicket {
    epoch: u64,
}

/// Local review desk state backed by the remote API.
pub struct ReviewClient {
    api: Arc<dyn CampaignApi>,
    campaigns: Vec<Campaign>,
    selected: Option<CampaignId>,
    in_flight: HashSet<CampaignId>,
    loaded: bool,
    last_error: Option<String>,
    /// Bumped each time a mutation result is applied.
    epoch: u64,
    /// Applied mutations not yet confirmed by a later listing.
    /// `None` means the campaign was removed.
    changes: HashMap<CampaignId, (u64, Option<Campaign>)>,
}

impl ReviewClient {
    pub fn new(api: Arc<dyn CampaignApi>) -> Self {
        Self {
            api,
            campaigns: Vec::new(),
            selected: None,
            in_flight: HashSet::new(),
            loaded: false,
            last_error: None,
            epoch: 0,
            changes: HashMap::new(),
        }
    }

    pub fn api(&self) -> Arc<dyn CampaignApi> {
        Arc::clone(&self.api)
    }

    pub fn campaigns(&self) -> &[Campaign] {
        &self.campaigns
    }

    pub fn get(&self, id: &CampaignId) -> Option<&Campaign> {
        self.campaigns.iter().find(|c| &c.id == id)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn view(&self) -> ReviewView<'_> {
        match (&self.last_error, self.loaded) {
            (_, true) if self.campaigns.is_empty() => ReviewView::Empty,
            (_, true) => ReviewView::Populated(&self.campaigns),
            (Some(err), false) => ReviewView::Failed(err),
            (None, false) => ReviewView::Loading,
        }
    }

    // ------------------------------------------------------------------------
    // Listing
    // ------------------------------------------------------------------------

    /// Fetch the pending campaigns and replace the local list.
    pub async fn list_pending(&mut self) -> Result<&[Campaign], ReviewError> {
        let ticket = self.begin_listing();
        let result = self.api.list_campaigns(CampaignStatus::Pending).await;
        self.apply_listing(ticket, result)?;
        Ok(&self.campaigns)
    }

    /// Stamp a listing fetch that is about to be sent.
    pub fn begin_listing(&self) -> ListingTicket {
        ListingTicket { epoch: self.epoch }
    }

    /// Apply the result of a pending-list fetch issued with `ticket`.
    ///
    /// On failure the previous list is kept untouched.
    pub fn apply_listing(
        &mut self,
        ticket: ListingTicket,
        result: Result<Vec<Campaign>, ApiError>,
    ) -> Result<(), ReviewError> {
        match result {
            Ok(campaigns) => {
                log::info!("Loaded {} pending campaign(s)", campaigns.len());
                self.campaigns = self.replay_changes(ticket, campaigns);
                self.loaded = true;
                self.last_error = None;
                self.reconcile_selection();
                Ok(())
            }
            Err(e) => {
                log::warn!("Failed to load pending campaigns: {e}");
                self.last_error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Re-apply mutations the listing was fetched too early to see.
    fn replay_changes(&mut self, ticket: ListingTicket, mut campaigns: Vec<Campaign>) -> Vec<Campaign> {
        // Changes up to the ticket are already reflected server-side.
        self.changes.retain(|_, (epoch, _)| *epoch > ticket.epoch);

        for (id, (_, change)) in &self.changes {
            match change {
                None => {
                    if campaigns.iter().any(|c| &c.id == id) {
                        log::debug!("Dropping {id} from stale listing; already removed");
                    }
                    campaigns.retain(|c| &c.id != id);
                }
                Some(updated) => {
                    if let Some(entry) = campaigns.iter_mut().find(|c| &c.id == id) {
                        *entry = updated.clone();
                    }
                }
            }
        }
        campaigns
    }

    fn record_change(&mut self, id: CampaignId, change: Option<Campaign>) {
        self.epoch += 1;
        self.changes.insert(id, (self.epoch, change));
    }

    // ------------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------------

    /// Select a listed campaign, replacing any previous selection.
    pub fn select(&mut self, id: &CampaignId) -> Result<&Campaign, ReviewError> {
        let index = self
            .campaigns
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(|| ReviewError::UnknownCampaign(id.clone()))?;
        self.selected = Some(id.clone());
        Ok(&self.campaigns[index])
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&Campaign> {
        self.selected.as_ref().and_then(|id| self.get(id))
    }

    pub fn selected_id(&self) -> Option<&CampaignId> {
        self.selected.as_ref()
    }

    /// Drop the selection when its campaign has left the list.
    fn reconcile_selection(&mut self) {
        if let Some(id) = &self.selected {
            if self.get(id).is_none() {
                log::debug!("Clearing selection of vanished campaign {id}");
                self.selected = None;
            }
        }
    }

    // ------------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------------

    pub fn is_in_flight(&self, id: &CampaignId) -> bool {
        self.in_flight.contains(id)
    }

    /// Check and reserve a mutation on `id`.
    pub fn begin(&mut self, id: &CampaignId, action: ReviewAction) -> Result<ReviewRequest, ReviewError> {
        let campaign = self
            .get(id)
            .ok_or_else(|| ReviewError::UnknownCampaign(id.clone()))?;

        if action == ReviewAction::Approve && !campaign.is_pending() {
            return Err(ReviewError::NotPending(id.clone()));
        }
        if !self.in_flight.insert(id.clone()) {
            log::debug!("Refusing duplicate {} of {id}", action.label());
            return Err(ReviewError::InFlight(id.clone()));
        }

        log::info!("Requesting {} of campaign {id}", action.label());
        Ok(ReviewRequest {
            id: id.clone(),
            action,
        })
    }

    /// Reconcile local state with a finished request.
    pub fn apply(&mut self, outcome: ReviewOutcome) -> Result<(), ReviewError> {
        self.in_flight.remove(outcome.id());

        match outcome {
            ReviewOutcome::Approved(updated) => {
                log::info!("Campaign {} is now {}", updated.id, updated.status);
                if let Some(entry) = self.campaigns.iter_mut().find(|c| c.id == updated.id) {
                    *entry = updated.clone();
                }
                self.record_change(updated.id.clone(), Some(updated));
                Ok(())
            }
            ReviewOutcome::Rejected(id) => {
                log::info!("Campaign {id} rejected");
                self.remove(&id);
                self.record_change(id, None);
                Ok(())
            }
            ReviewOutcome::Failed { request, error } => {
                if error.kind() == ErrorKind::NotFound {
                    log::warn!("Campaign {} no longer exists; dropping stale entry", request.id);
                    self.remove(&request.id);
                    self.record_change(request.id.clone(), None);
                } else {
                    log::error!("Failed to {} campaign {}: {error}", request.action.label(), request.id);
                }
                Err(error.into())
            }
        }
    }

    fn remove(&mut self, id: &CampaignId) {
        self.campaigns.retain(|c| &c.id != id);
        self.reconcile_selection();
    }

    /// Approve `id` and wait for the result.
    pub async fn approve(&mut self, id: &CampaignId) -> Result<(), ReviewError> {
        let request = self.begin(id, ReviewAction::Approve)?;
        let outcome = request.execute(self.api.as_ref()).await;
        self.apply(outcome)
    }

    /// Reject `id` and wait for the result.
    pub async fn reject(&mut self, id: &CampaignId) -> Result<(), ReviewError> {
        let request = self.begin(id, ReviewAction::Reject)?;
        let outcome = request.execute(self.api.as_ref()).await;
        self.apply(outcome)
    }
}
