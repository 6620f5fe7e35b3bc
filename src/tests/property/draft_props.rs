//! Property-based tests for the Form State Store
//!
//! Tests invariants:
//! - Writing one field never changes another
//! - A draft missing any required field fails validation with a
//!   missing-field error and is left untouched

use proptest::prelude::*;

use crate::core::campaign::wizard::{DraftField, DraftValidationError, FieldValue};
use crate::tests::common::complete_draft;

fn arb_field() -> impl Strategy<Value = DraftField> {
    prop::sample::select(DraftField::ALL.to_vec())
}

fn arb_required_subset() -> impl Strategy<Value = Vec<DraftField>> {
    let required: Vec<DraftField> = DraftField::ALL.into_iter().filter(|f| f.is_required()).collect();
    prop::sample::subsequence(required.clone(), 1..=required.len())
}

proptest! {
    #[test]
    fn prop_writes_are_isolated(a in arb_field(), b in arb_field(), x in "[a-z]{1,12}", y in "[a-z]{1,12}") {
        prop_assume!(a != b);
        let mut draft = complete_draft();
        draft.set_text(a, x.clone());
        draft.set_text(b, y.clone());
        prop_assert_eq!(draft.get_field(a), Some(&FieldValue::text(x)));
        prop_assert_eq!(draft.get_field(b), Some(&FieldValue::text(y)));
    }

    #[test]
    fn prop_missing_required_never_validates(cleared in arb_required_subset(), blank in prop::bool::ANY) {
        let mut draft = complete_draft();
        for field in &cleared {
            if blank {
                draft.set_text(*field, "   ");
            } else {
                draft.clear_field(*field);
            }
        }
        let before = draft.clone();

        match draft.validate() {
            Err(DraftValidationError::MissingField(field)) => prop_assert!(cleared.contains(&field)),
            other => prop_assert!(false, "expected missing field, got {:?}", other),
        }
        prop_assert_eq!(draft, before);
    }
}
