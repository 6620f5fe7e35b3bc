//! Property-based tests for search result ordering
//!
//! Tests invariants:
//! - Regardless of reply arrival order, displayed results always belong to
//!   the most recently issued query
//! - Exactly one reply (the latest) is accepted

use std::time::{Duration, Instant};

use proptest::prelude::*;

use crate::config::SearchConfig;
use crate::core::campaign::{CampaignId, CampaignSummary};
use crate::core::search::{SearchClient, SearchResponse, SearchTicket};

fn reply_for(ticket: &SearchTicket) -> SearchResponse {
    SearchResponse {
        seq: ticket.seq,
        term: ticket.term.clone(),
        result: Ok(vec![CampaignSummary {
            id: CampaignId::new(format!("c{}", ticket.seq)),
            title: format!("match for {}", ticket.term),
            category: None,
            goal_amount: None,
            image: vec![],
        }]),
    }
}

/// Queries of growing length, like a user typing, and a shuffled arrival order.
fn arb_session() -> impl Strategy<Value = (Vec<String>, Vec<usize>)> {
    prop::collection::vec("[a-z]{2,6}", 1..6).prop_flat_map(|queries| {
        let order: Vec<usize> = (0..queries.len()).collect();
        (Just(queries), Just(order).prop_shuffle())
    })
}

proptest! {
    #[test]
    fn prop_only_latest_reply_is_shown((queries, arrival) in arb_session()) {
        let mut search = SearchClient::new(&SearchConfig::default());
        let mut now = Instant::now();
        let mut tickets = Vec::new();

        for q in &queries {
            search.on_input(q.clone(), now);
            now += Duration::from_millis(400);
            tickets.push(search.poll_due(now).expect("debounce elapsed"));
        }

        let latest = tickets.last().cloned().expect("at least one query");
        let mut accepted = 0;
        for i in arrival {
            if search.apply(reply_for(&tickets[i])) {
                accepted += 1;
            }
            if let Some(term) = search.results_term() {
                prop_assert_eq!(term, latest.term.as_str());
            }
        }

        prop_assert_eq!(accepted, 1);
        prop_assert_eq!(search.results_term(), Some(latest.term.as_str()));
    }
}
