//! Property-based tests for the Step Navigator
//!
//! Tests invariants:
//! - Current step index stays within [0, 3]
//! - Every move is to an adjacent (or the same) step
//! - Values set in the draft persist across navigation

use proptest::prelude::*;

use crate::core::campaign::wizard::{
    validate_step_transition, CampaignWizard, DraftField, StepNavigator, WizardStep,
};

// ============================================================================
// Strategies
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum Move {
    Advance,
    Retreat,
}

fn arb_move() -> impl Strategy<Value = Move> {
    prop_oneof![Just(Move::Advance), Just(Move::Retreat)]
}

fn arb_moves() -> impl Strategy<Value = Vec<Move>> {
    prop::collection::vec(arb_move(), 0..64)
}

fn arb_field() -> impl Strategy<Value = DraftField> {
    prop::sample::select(DraftField::ALL.to_vec())
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_index_stays_in_bounds(moves in arb_moves()) {
        let mut nav = StepNavigator::new();
        for m in moves {
            match m {
                Move::Advance => nav.advance(),
                Move::Retreat => nav.retreat(),
            };
            prop_assert!(nav.index() < WizardStep::COUNT);
            prop_assert!(nav.progress_percent() <= 100);
        }
    }

    #[test]
    fn prop_moves_never_skip(moves in arb_moves()) {
        let mut nav = StepNavigator::new();
        for m in moves {
            let before = nav.current();
            let after = match m {
                Move::Advance => nav.advance(),
                Move::Retreat => nav.retreat(),
            };
            prop_assert!(validate_step_transition(before, after).is_ok());
        }
    }

    #[test]
    fn prop_draft_survives_navigation(
        field in arb_field(),
        value in "[A-Za-z0-9 ]{1,40}",
        moves in arb_moves(),
    ) {
        let mut wizard = CampaignWizard::new();
        wizard.draft_mut().set_text(field, value.clone());

        for m in moves {
            match m {
                Move::Advance => { wizard.next().ok(); }
                Move::Retreat => { wizard.back(); }
            }
        }

        prop_assert_eq!(wizard.draft().text(field), Some(value.as_str()));
    }
}

#[test]
fn test_round_trip_to_review_and_back_keeps_name() {
    let mut wizard = CampaignWizard::new();
    wizard.draft_mut().set_text(DraftField::Name, "X");
    while !wizard.at_review() {
        wizard.next().expect("lenient wizard never blocks");
    }
    while wizard.step() != WizardStep::Info {
        wizard.back();
    }
    assert_eq!(wizard.draft().text(DraftField::Name), Some("X"));
}
