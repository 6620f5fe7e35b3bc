//! Step Navigator
//!
//! A bounded state machine over the four ordered wizard steps. Moving never
//! skips a step and never leaves the `[0, COUNT - 1]` range; the review step
//! is terminal and only offers submission as a forward action.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::draft::DraftField;

// ============================================================================
// WizardStep
// ============================================================================

/// Ordered stages of the campaign creation wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    Info,
    FundingMedia,
    DocumentsDetails,
    ReviewSubmit,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::Info,
        WizardStep::FundingMedia,
        WizardStep::DocumentsDetails,
        WizardStep::ReviewSubmit,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn index(&self) -> usize {
        match self {
            WizardStep::Info => 0,
            WizardStep::FundingMedia => 1,
            WizardStep::DocumentsDetails => 2,
            WizardStep::ReviewSubmit => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn label(&self) -> &'static str {
        match self {
            WizardStep::Info => "Campaign Info",
            WizardStep::FundingMedia => "Funding & Media",
            WizardStep::DocumentsDetails => "Documents & Details",
            WizardStep::ReviewSubmit => "Review & Submit",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            WizardStep::Info => "Name, category and story",
            WizardStep::FundingMedia => "Goal, duration, image and video",
            WizardStep::DocumentsDetails => "Supporting documents and extra details",
            WizardStep::ReviewSubmit => "Check everything and submit",
        }
    }

    /// Draft fields collected on this step.
    pub fn fields(&self) -> &'static [DraftField] {
        match self {
            WizardStep::Info => &[DraftField::Name, DraftField::Category, DraftField::Description],
            WizardStep::FundingMedia => &[
                DraftField::Target,
                DraftField::Duration,
                DraftField::Image,
                DraftField::Video,
            ],
            WizardStep::DocumentsDetails => &[DraftField::Documents, DraftField::Details],
            WizardStep::ReviewSubmit => &[],
        }
    }

    pub fn next(&self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn previous(&self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    pub fn is_terminal(&self) -> bool {
        self.next().is_none()
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// StepNavigator
// ============================================================================

/// Holds the single "current" step of a wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepNavigator {
    current: WizardStep,
}

impl StepNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> WizardStep {
        self.current
    }

    pub fn index(&self) -> usize {
        self.current.index()
    }

    /// Move one step forward. A no-op on the terminal step.
    pub fn advance(&mut self) -> WizardStep {
        if let Some(next) = self.current.next() {
            self.current = next;
        }
        self.current
    }

    /// Move one step back. A no-op on the first step.
    pub fn retreat(&mut self) -> WizardStep {
        if let Some(prev) = self.current.previous() {
            self.current = prev;
        }
        self.current
    }

    pub fn can_advance(&self) -> bool {
        self.current.next().is_some()
    }

    pub fn can_go_back(&self) -> bool {
        self.current.previous().is_some()
    }

    pub fn is_terminal(&self) -> bool {
        self.current.is_terminal()
    }

    pub fn reset(&mut self) {
        self.current = WizardStep::default();
    }

    /// Progress through the wizard as a percentage (0-100).
    pub fn progress_percent(&self) -> u8 {
        ((self.index() as f32 / (WizardStep::COUNT - 1) as f32) * 100.0) as u8
    }
}

/// Invalid navigator move.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid step transition: cannot move from {from} to {to}")]
pub struct InvalidTransition {
    pub from: WizardStep,
    pub to: WizardStep,
}

/// Validates that a step transition moves at most one step in either direction.
pub fn validate_step_transition(from: WizardStep, to: WizardStep) -> Result<(), InvalidTransition> {
    if from == to || from.next() == Some(to) || from.previous() == Some(to) {
        Ok(())
    } else {
        Err(InvalidTransition { from, to })
    }
}

// ============================================================================
// Tests
// ============================================================================
