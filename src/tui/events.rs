use std::collections::VecDeque;

use crate::core::api::ApiError;
use crate::core::campaign::{Campaign, CampaignId};
use crate::core::review::{ListingTicket, ReviewOutcome};
use crate::core::search::SearchResponse;
use crate::core::submission::SubmissionError;

/// Events flowing through the Elm-architecture event loop.
#[derive(Debug)]
pub enum AppEvent {
    /// Periodic tick for debounce deadlines, notification TTLs, etc.
    Tick,
    /// Raw terminal input (keyboard/mouse).
    Input(crossterm::event::Event),
    /// Pending campaign list fetched (or failed).
    ReviewListed(ListingTicket, Result<Vec<Campaign>, ApiError>),
    /// An approve/reject request finished.
    ReviewFinished(ReviewOutcome),
    /// A search lookup finished.
    SearchFinished(SearchResponse),
    /// Wizard submission finished.
    Submitted(Result<CampaignId, SubmissionError>),
    /// Request to quit the application.
    Quit,
}

/// High-level actions dispatched by the input mapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    FocusCreate,
    FocusReview,
    FocusSearch,
    TabNext,
    TabPrev,

    ShowHelp,
    CloseHelp,
    CloseSignIn,

    Quit,
}

/// Which top-level view has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Focus {
    Create,
    Review,
    Search,
}

impl Focus {
    pub const ALL: [Focus; 3] = [Focus::Create, Focus::Review, Focus::Search];

    pub fn label(self) -> &'static str {
        match self {
            Focus::Create => "Create",
            Focus::Review => "Review",
            Focus::Search => "Search",
        }
    }

    pub fn index(self) -> usize {
        Focus::ALL.iter().position(|&f| f == self).unwrap_or(0)
    }

    pub fn next(self) -> Focus {
        Focus::ALL[(self.index() + 1) % Focus::ALL.len()]
    }

    pub fn prev(self) -> Focus {
        Focus::ALL[(self.index() + Focus::ALL.len() - 1) % Focus::ALL.len()]
    }
}

/// Notification level for the overlay system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationLevel {
    /// Overlay glyph for the level.
    pub fn icon(self) -> &'static str {
        match self {
            NotificationLevel::Info => "ℹ",
            NotificationLevel::Success => "✓",
            NotificationLevel::Warning => "⚠",
            NotificationLevel::Error => "✗",
        }
    }
}

/// A timed notification shown in the overlay.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    /// Ticks remaining before auto-dismiss.
    pub ttl_ticks: u32,
}

/// Short-lived messages in the top-right corner.
///
/// Identical messages are collapsed, and only the newest few are kept.
#[derive(Debug)]
pub struct Notifications {
    items: VecDeque<Notification>,
    capacity: usize,
    ttl_ticks: u32,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(3, 100)
    }
}

impl Notifications {
    pub fn new(capacity: usize, ttl_ticks: u32) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity + 1),
            capacity,
            ttl_ticks,
        }
    }

    /// Queue a message. Returns `false` if the same text is already shown.
    pub fn push(&mut self, message: impl Into<String>, level: NotificationLevel) -> bool {
        let message = message.into();
        if self.items.iter().any(|n| n.message == message) {
            return false;
        }
        self.items.push_back(Notification {
            message,
            level,
            ttl_ticks: self.ttl_ticks,
        });
        while self.items.len() > self.capacity {
            self.items.pop_front();
        }
        true
    }

    /// Age every message by one tick and drop the expired ones.
    pub fn tick(&mut self) {
        self.items.retain_mut(|n| {
            n.ttl_ticks = n.ttl_ticks.saturating_sub(1);
            n.ttl_ticks > 0
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
