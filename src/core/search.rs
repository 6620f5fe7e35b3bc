//! Incremental Search Client
//!
//! Debounces keystrokes into lookup queries and keeps the top matches for
//! display. Every dispatched query carries a sequence token; a response is
//! only applied when its token is still the latest one issued, so a slow
//! reply for an older query can never overwrite a newer one.
//!
//! The client never sleeps or spawns. Callers drive it with:
//!
//! ```text
//! on_input(text, now)   -> schedules (or cancels) a debounce deadline
//! poll_due(now)         -> Some(SearchTicket) once the deadline has passed
//! ticket.execute(api)   -> SearchResponse (off the UI thread if desired)
//! apply(response)       -> updates results if the token is current
//! ```

use std::time::{Duration, Instant};

use crate::config::SearchConfig;
use crate::core::api::{ApiError, CampaignApi};
use crate::core::campaign::CampaignSummary;

/// A query ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub seq: u64,
    pub term: String,
}

/// Answer to a [`SearchTicket`].
#[derive(Debug)]
pub struct SearchResponse {
    pub seq: u64,
    pub term: String,
    pub result: Result<Vec<CampaignSummary>, ApiError>,
}

impl SearchTicket {
    pub async fn execute(self, api: &dyn CampaignApi) -> SearchResponse {
        let result = api.search(&self.term).await;
        SearchResponse {
            seq: self.seq,
            term: self.term,
            result,
        }
    }
}

/// What the search dropdown should display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchView<'a> {
    /// Not focused and nothing worth showing.
    Hidden,
    /// Focused with a query shorter than the minimum ("start typing").
    Prompt,
    /// Waiting on the debounce or on the network.
    Loading,
    Results(&'a [CampaignSummary]),
    NoResults,
    /// The lookup failed and there is nothing earlier to fall back on.
    Failed(&'a str),
}

pub struct SearchClient {
    debounce: Duration,
    min_query_len: usize,
    max_results: usize,

    query: String,
    focused: bool,
    deadline: Option<Instant>,
    /// Token of the most recently issued ticket.
    seq: u64,
    awaiting: Option<u64>,

    results: Vec<CampaignSummary>,
    results_term: Option<String>,
    last_error: Option<String>,
}

impl SearchClient {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            debounce: Duration::from_millis(config.debounce_ms),
            min_query_len: config.min_query_len,
            max_results: config.max_results,
            query: String::new(),
            focused: false,
            deadline: None,
            seq: 0,
            awaiting: None,
            results: Vec::new(),
            results_term: None,
            last_error: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[CampaignSummary] {
        &self.results
    }

    /// Term the current results were fetched for.
    pub fn results_term(&self) -> Option<&str> {
        self.results_term.as_deref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.deadline.is_some() || self.awaiting.is_some()
    }

    /// When the pending query becomes due, if one is scheduled.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn set_focus(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn is_searchable(&self, term: &str) -> bool {
        term.trim().chars().count() >= self.min_query_len
    }

    /// Invalidate any issued token so its late reply is discarded.
    fn supersede(&mut self) {
        if self.awaiting.take().is_some() {
            self.seq += 1;
        }
    }

    /// Record a keystroke. Restarts the debounce window.
    pub fn on_input(&mut self, text: impl Into<String>, now: Instant) {
        self.query = text.into();

        if self.is_searchable(&self.query) {
            self.deadline = Some(now + self.debounce);
        } else {
            // Short queries never hit the network and show nothing.
            self.deadline = None;
            self.supersede();
            self.results.clear();
            self.results_term = None;
            self.last_error = None;
        }
    }

    /// Issue a ticket if the debounce deadline has passed.
    pub fn poll_due(&mut self, now: Instant) -> Option<SearchTicket> {
        match self.deadline {
            Some(due) if due <= now => {
                self.deadline = None;
                Some(self.issue())
            }
            _ => None,
        }
    }

    fn issue(&mut self) -> SearchTicket {
        self.seq += 1;
        self.awaiting = Some(self.seq);
        let term = self.query.trim().to_string();
        log::debug!("Issuing search #{} for '{term}'", self.seq);
        SearchTicket { seq: self.seq, term }
    }

    /// Apply a response. Returns `false` when it was stale and discarded.
    pub fn apply(&mut self, response: SearchResponse) -> bool {
        if self.awaiting != Some(response.seq) {
            log::debug!(
                "Discarding stale search #{} for '{}' (latest #{})",
                response.seq,
                response.term,
                self.seq
            );
            return false;
        }
        self.awaiting = None;

        match response.result {
            Ok(mut results) => {
                results.truncate(self.max_results);
                log::debug!("Search '{}' returned {} match(es)", response.term, results.len());
                self.results = results;
                self.results_term = Some(response.term);
                self.last_error = None;
            }
            Err(e) => {
                // Earlier results stay on screen.
                log::warn!("Search for '{}' failed: {e}", response.term);
                self.last_error = Some(e.to_string());
            }
        }
        true
    }

    /// Search for `term` immediately, bypassing the debounce.
    pub async fn search_now(&mut self, term: &str, api: &dyn CampaignApi) -> Result<&[CampaignSummary], ApiError> {
        self.on_input(term, Instant::now());
        if !self.is_searchable(term) {
            return Ok(&self.results);
        }
        self.deadline = None;

        let ticket = self.issue();
        let response = ticket.execute(api).await;
        let error = response.result.as_ref().err().cloned();
        self.apply(response);

        match error {
            Some(e) => Err(e),
            None => Ok(&self.results),
        }
    }

    /// Reset to an empty query.
    pub fn clear(&mut self) {
        self.on_input(String::new(), Instant::now());
    }

    pub fn view(&self) -> SearchView<'_> {
        if !self.is_searchable(&self.query) {
            return if self.focused {
                SearchView::Prompt
            } else {
                SearchView::Hidden
            };
        }
        if self.is_loading() {
            return SearchView::Loading;
        }
        match (&self.last_error, self.results.is_empty()) {
            (_, false) => SearchView::Results(&self.results),
            (Some(err), true) => SearchView::Failed(err),
            (None, true) if self.results_term.is_some() => SearchView::NoResults,
            (None, true) => SearchView::Loading,
        }
    }
}
