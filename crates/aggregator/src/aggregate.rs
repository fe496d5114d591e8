//! Swipe aggregation over the all-time and last-24-hours windows.
//!
//! ## Algorithm
//! 1. For each record, add its vote value to the all-time tally of its
//!    restaurant (default 0 when absent)
//! 2. If `now_ms - timestamp <= 86_400_000` (boundary inclusive), add to
//!    the recent tally as well
//! 3. Records with an empty restaurant id are skipped and never counted
//!
//! Input ordering carries no meaning for the sums, but the index of the
//! first record mentioning each restaurant is kept as the ranking
//! tie-break. The fold/reduce merge takes the minimum index, so the result
//! is deterministic regardless of how rayon splits the input.

use rayon::prelude::*;
use tracing::{debug, instrument};

use swipe_data::{SwipeRecord, TimestampMs, RECENT_WINDOW_MS};

use crate::tally::{TallyBook, TallyEntry, TallyMap};

fn add_vote(map: &mut TallyMap, record: &SwipeRecord, index: usize) {
    let entry = map
        .entry(record.restaurant_id.clone())
        .or_insert(TallyEntry {
            net_votes: 0,
            first_seen: index,
        });
    entry.net_votes += record.vote.value();
    entry.first_seen = entry.first_seen.min(index);
}

fn merge_maps(mut acc: TallyMap, local: TallyMap) -> TallyMap {
    for (id, entry) in local {
        acc.entry(id)
            .and_modify(|existing| {
                existing.net_votes += entry.net_votes;
                existing.first_seen = existing.first_seen.min(entry.first_seen);
            })
            .or_insert(entry);
    }
    acc
}

/// Aggregate an unordered set of swipe records into both tally windows.
///
/// Empty input yields empty tallies, not an error.
#[instrument(skip(records), fields(records = records.len()))]
pub fn aggregate(records: &[SwipeRecord], now_ms: TimestampMs) -> TallyBook {
    let (all_time, recent) = records
        .par_iter()
        .enumerate()
        .fold(
            || (TallyMap::new(), TallyMap::new()),
            |(mut all_time, mut recent), (index, record)| {
                // Skip rather than count records that lost their id upstream
                if record.restaurant_id.is_empty() {
                    debug!("skipping swipe record with empty restaurant id");
                    return (all_time, recent);
                }

                add_vote(&mut all_time, record, index);
                if now_ms - record.timestamp_ms <= RECENT_WINDOW_MS {
                    add_vote(&mut recent, record, index);
                }
                (all_time, recent)
            },
        )
        .reduce(
            || (TallyMap::new(), TallyMap::new()),
            |(all_a, recent_a), (all_b, recent_b)| {
                (merge_maps(all_a, all_b), merge_maps(recent_a, recent_b))
            },
        );

    debug!(
        "aggregated {} records into {} all-time and {} recent tallies",
        records.len(),
        all_time.len(),
        recent.len()
    );

    TallyBook { all_time, recent }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swipe_data::{TimeWindow, Vote};

    fn swipe(restaurant_id: &str, vote: Vote, timestamp_ms: i64) -> SwipeRecord {
        SwipeRecord {
            restaurant_id: restaurant_id.to_string(),
            vote,
            timestamp_ms,
        }
    }

    #[test]
    fn test_all_time_tallies_are_the_sum_of_vote_values() {
        let records = vec![
            swipe("r1", Vote::Like, 0),
            swipe("r1", Vote::Like, 10),
            swipe("r1", Vote::Dislike, 20),
            swipe("r2", Vote::Dislike, 30),
        ];

        let book = aggregate(&records, 100);

        assert_eq!(book.all_time["r1"].net_votes, 1);
        assert_eq!(book.all_time["r2"].net_votes, -1);
        assert_eq!(book.all_time.len(), 2);
    }

    #[test]
    fn test_scenario_small_timestamps_land_in_both_windows() {
        // [(R1,+1,t=0), (R1,+1,t=10), (R2,-1,t=20)] at now=100: the recent
        // window covers everything, so both tallies match
        let records = vec![
            swipe("R1", Vote::Like, 0),
            swipe("R1", Vote::Like, 10),
            swipe("R2", Vote::Dislike, 20),
        ];

        let book = aggregate(&records, 100);

        assert_eq!(book.all_time["R1"].net_votes, 2);
        assert_eq!(book.all_time["R2"].net_votes, -1);
        assert_eq!(book.recent["R1"].net_votes, 2);
        assert_eq!(book.recent["R2"].net_votes, -1);
    }

    #[test]
    fn test_recent_window_boundary_is_inclusive() {
        let now = 2 * RECENT_WINDOW_MS;
        let records = vec![
            swipe("edge", Vote::Like, now - RECENT_WINDOW_MS),
            swipe("stale", Vote::Like, now - RECENT_WINDOW_MS - 1),
        ];

        let book = aggregate(&records, now);

        assert!(book.recent.contains_key("edge"));
        assert!(!book.recent.contains_key("stale"));
        // Both still count all-time
        assert_eq!(book.all_time.len(), 2);
    }

    #[test]
    fn test_empty_input_yields_empty_tallies() {
        let book = aggregate(&[], 100);
        assert!(book.all_time.is_empty());
        assert!(book.recent.is_empty());
        assert!(book.is_empty());
    }

    #[test]
    fn test_records_without_restaurant_id_are_not_counted() {
        let records = vec![
            swipe("", Vote::Like, 0),
            swipe("r1", Vote::Like, 10),
        ];

        let book = aggregate(&records, 100);

        assert_eq!(book.all_time.len(), 1);
        assert_eq!(book.all_time["r1"].net_votes, 1);
    }

    #[test]
    fn test_first_seen_tracks_the_earliest_mention() {
        let records = vec![
            swipe("r1", Vote::Like, 0),
            swipe("r2", Vote::Like, 10),
            swipe("r1", Vote::Like, 20),
        ];

        let book = aggregate(&records, 100);

        assert_eq!(book.all_time["r1"].first_seen, 0);
        assert_eq!(book.all_time["r2"].first_seen, 1);
    }

    #[test]
    fn test_ranked_ties_follow_arrival_order() {
        let records = vec![
            swipe("early", Vote::Like, 0),
            swipe("late", Vote::Like, 10),
        ];

        let book = aggregate(&records, 100);
        let ranked = book.ranked(TimeWindow::AllTime);

        assert_eq!(ranked[0].restaurant_id, "early");
        assert_eq!(ranked[1].restaurant_id, "late");
    }
}
