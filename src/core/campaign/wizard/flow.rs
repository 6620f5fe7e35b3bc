//! Wizard session combining the step navigator with the draft it fills.

use super::draft::{CampaignDraft, DraftValidationError};
use super::navigator::{StepNavigator, WizardStep};

/// One run of the creation wizard.
#[derive(Debug, Clone, Default)]
pub struct CampaignWizard {
    navigator: StepNavigator,
    draft: CampaignDraft,
    strict_steps: bool,
}

impl CampaignWizard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A wizard whose "next" refuses to leave a step with missing or invalid fields.
    pub fn strict() -> Self {
        Self {
            strict_steps: true,
            ..Self::default()
        }
    }

    pub fn with_strict_steps(mut self, strict: bool) -> Self {
        self.strict_steps = strict;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict_steps
    }

    pub fn step(&self) -> WizardStep {
        self.navigator.current()
    }

    pub fn navigator(&self) -> &StepNavigator {
        &self.navigator
    }

    pub fn draft(&self) -> &CampaignDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut CampaignDraft {
        &mut self.draft
    }

    /// Move to the next step.
    ///
    /// Ungated unless strict mode is on, in which case the current step's
    /// fields are validated first and the wizard stays put on failure.
    pub fn next(&mut self) -> Result<WizardStep, DraftValidationError> {
        if self.strict_steps {
            self.draft.validate_step(self.navigator.current())?;
        }
        Ok(self.navigator.advance())
    }

    pub fn back(&mut self) -> WizardStep {
        self.navigator.retreat()
    }

    /// Ready to offer the submit action.
    pub fn at_review(&self) -> bool {
        self.navigator.is_terminal()
    }

    /// Start over with an empty draft, typically after a successful submission.
    pub fn reset(&mut self) {
        self.navigator.reset();
        self.draft.clear();
        log::debug!("Wizard reset");
    }
}
