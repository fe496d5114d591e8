//! Vote tally collections derived from swipe records.

use std::collections::HashMap;

use swipe_data::{RestaurantId, TimeWindow};

/// Net votes for one restaurant, plus the input index of the first record
/// that mentioned it. The index is the documented tie-break for ranking:
/// restaurants with equal net votes sort by arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TallyEntry {
    pub net_votes: i64,
    pub first_seen: usize,
}

/// Map from restaurant id to its tally; no meaningful iteration order,
/// ranking happens downstream.
pub type TallyMap = HashMap<RestaurantId, TallyEntry>;

/// A restaurant's net vote count in the active window, as handed to the
/// ranking pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteTally {
    pub restaurant_id: RestaurantId,
    pub net_votes: i64,
}

/// Both tally windows, recomputed in full on every aggregation pass.
/// Never persisted; always derived from the current record set.
#[derive(Debug, Clone, Default)]
pub struct TallyBook {
    pub all_time: TallyMap,
    pub recent: TallyMap,
}

impl TallyBook {
    /// Tallies for the selected window.
    pub fn window(&self, window: TimeWindow) -> &TallyMap {
        match window {
            TimeWindow::AllTime => &self.all_time,
            TimeWindow::Last24Hours => &self.recent,
        }
    }

    /// Restaurant tallies for the selected window, sorted by net votes
    /// descending with ties broken by first-arrival input order.
    pub fn ranked(&self, window: TimeWindow) -> Vec<VoteTally> {
        let mut entries: Vec<(&RestaurantId, &TallyEntry)> = self.window(window).iter().collect();
        entries.sort_unstable_by(|a, b| {
            b.1.net_votes
                .cmp(&a.1.net_votes)
                .then_with(|| a.1.first_seen.cmp(&b.1.first_seen))
        });
        entries
            .into_iter()
            .map(|(id, entry)| VoteTally {
                restaurant_id: id.clone(),
                net_votes: entry.net_votes,
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.all_time.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(net_votes: i64, first_seen: usize) -> TallyEntry {
        TallyEntry {
            net_votes,
            first_seen,
        }
    }

    #[test]
    fn test_ranked_sorts_by_net_votes_descending() {
        let mut book = TallyBook::default();
        book.all_time.insert("low".to_string(), entry(-1, 0));
        book.all_time.insert("high".to_string(), entry(5, 1));
        book.all_time.insert("mid".to_string(), entry(2, 2));

        let ranked = book.ranked(TimeWindow::AllTime);
        let ids: Vec<&str> = ranked.iter().map(|t| t.restaurant_id.as_str()).collect();
        assert_eq!(ids, vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_ranked_breaks_ties_by_arrival_order() {
        let mut book = TallyBook::default();
        book.all_time.insert("second".to_string(), entry(3, 7));
        book.all_time.insert("first".to_string(), entry(3, 2));

        let ranked = book.ranked(TimeWindow::AllTime);
        let ids: Vec<&str> = ranked.iter().map(|t| t.restaurant_id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second"]);
    }

    #[test]
    fn test_window_selects_the_right_map() {
        let mut book = TallyBook::default();
        book.all_time.insert("r1".to_string(), entry(4, 0));
        book.recent.insert("r1".to_string(), entry(1, 0));

        assert_eq!(book.window(TimeWindow::AllTime)["r1"].net_votes, 4);
        assert_eq!(book.window(TimeWindow::Last24Hours)["r1"].net_votes, 1);
    }
}
