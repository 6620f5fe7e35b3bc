//! Property-based tests
//!
//! Invariants checked over generated inputs with proptest:
//!
//! - `navigator_props`: the step navigator never leaves `[0, 3]`, moves at
//!   most one step at a time, and draft values survive any navigation
//! - `draft_props`: field writes are isolated, and a draft missing any
//!   required field never validates
//! - `search_ordering_props`: whatever order replies arrive in, only the
//!   latest query's reply is ever displayed
//!
//! Run with more cases via `PROPTEST_CASES=1000 cargo test property`.

mod draft_props;
mod navigator_props;
mod search_ordering_props;
