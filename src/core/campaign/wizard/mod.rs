//! Campaign Creation Wizard
//!
//! Guides a fundraiser through creating a campaign in four steps:
//! 1. Info - Name, category, description
//! 2. Funding & Media - Target amount, duration, cover image, video
//! 3. Documents & Details - Supporting documents, free-form details
//! 4. Review & Submit - Final check before the draft is sent
//!
//! # Design Principles
//!
//! - **Progressive**: Users move forward and backward without losing input
//! - **Deferred validation**: Required fields are checked at submission time;
//!   strict mode additionally gates "next" on the current step's fields
//! - **Single draft**: One [`CampaignDraft`] outlives every step transition

mod draft;
mod flow;
mod navigator;

pub use draft::*;
pub use flow::*;
pub use navigator::*;
