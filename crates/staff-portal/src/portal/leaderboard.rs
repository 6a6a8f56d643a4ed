use super::domain::{LeaderboardEntry, RecordId};
use super::error::ValidationError;

/// Apply `delta` to the entry with `id`, then re-sort by score descending and renumber.
///
/// Ranks are 1-based positions with no shared places; equal scores keep their prior
/// relative order because `sort_by` is stable. Returns whether `id` was present.
/// A delta that would overflow the score is rejected and leaves the board untouched.
pub fn adjust_and_rerank(
    entries: &mut [LeaderboardEntry],
    id: &RecordId,
    delta: i64,
) -> Result<bool, ValidationError> {
    let mut found = false;
    if let Some(entry) = entries.iter_mut().find(|entry| &entry.id == id) {
        entry.score = entry
            .score
            .checked_add(delta)
            .ok_or(ValidationError::missing("delta"))?;
        found = true;
    }

    rerank(entries);
    Ok(found)
}

/// Sort by score descending and assign `rank = position + 1`.
pub fn rerank(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    for (position, entry) in entries.iter_mut().enumerate() {
        entry.rank = position as u32 + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portal::domain::{EmployeeRole, RankTrack};

    fn entry(id: &str, score: i64) -> LeaderboardEntry {
        LeaderboardEntry {
            id: RecordId::from(id),
            rank: 0,
            name: id.to_uppercase(),
            score,
            department: "技术部".to_string(),
            trend: None,
            role: EmployeeRole::Member,
            superior_id: None,
            rank_track: RankTrack::F,
            rank_level: 5,
        }
    }

    fn board() -> Vec<LeaderboardEntry> {
        vec![
            entry("u_boss", 12000),
            entry("u2", 9850),
            entry("u3", 9720),
            entry("u4", 9540),
            entry("u1", 5000),
        ]
    }

    fn assert_dense_and_sorted(entries: &[LeaderboardEntry]) {
        let ranks: Vec<u32> = entries.iter().map(|entry| entry.rank).collect();
        let expected: Vec<u32> = (1..=entries.len() as u32).collect();
        assert_eq!(ranks, expected);
        assert!(entries.windows(2).all(|pair| pair[0].score >= pair[1].score));
    }

    #[test]
    fn adjustment_moves_entry_and_renumbers() {
        let mut entries = board();
        assert_eq!(adjust_and_rerank(&mut entries, &RecordId::from("u1"), 5000), Ok(true));

        assert_eq!(entries[0].id, RecordId::from("u_boss"));
        assert_eq!(entries[1].id, RecordId::from("u1"));
        assert_eq!(entries[1].score, 10000);
        assert_eq!(entries[1].rank, 2);
        assert_dense_and_sorted(&entries);
    }

    #[test]
    fn negative_adjustment_drops_entry() {
        let mut entries = board();
        adjust_and_rerank(&mut entries, &RecordId::from("u_boss"), -10000).expect("in range");
        assert_eq!(entries.last().map(|e| e.id.as_str()), Some("u_boss"));
        assert_dense_and_sorted(&entries);
    }

    #[test]
    fn ties_keep_prior_order() {
        let mut entries = vec![entry("a", 100), entry("b", 90), entry("c", 80)];
        adjust_and_rerank(&mut entries, &RecordId::from("c"), 10).expect("in range");
        let order: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
        assert_eq!(entries[1].score, entries[2].score);
        assert_eq!(entries[2].rank, 3);
    }

    #[test]
    fn unknown_id_still_reranks() {
        let mut entries = vec![entry("a", 1), entry("b", 2)];
        assert_eq!(adjust_and_rerank(&mut entries, &RecordId::from("zzz"), 50), Ok(false));
        assert_eq!(entries[0].id, RecordId::from("b"));
        assert_dense_and_sorted(&entries);
    }

    #[test]
    fn overflowing_delta_is_rejected_without_touching_scores() {
        let mut entries = board();
        let error = adjust_and_rerank(&mut entries, &RecordId::from("u_boss"), i64::MAX)
            .expect_err("overflow");
        assert_eq!(error.field, "delta");
        assert_eq!(entries[0].score, 12000);

        let error = adjust_and_rerank(&mut entries, &RecordId::from("u2"), i64::MAX - 100)
            .expect_err("overflow");
        assert_eq!(error.field, "delta");
        assert_eq!(entries.iter().map(|e| e.score).sum::<i64>(), 46110);
    }
}
