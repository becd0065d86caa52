//! Ordering and truncation of aggregate groups.

use crate::aggregator::{AggregateGroup, SkipStat, UNKNOWN_DAY};
use spotistats_common::SortMode;
use spotistats_config::DEFAULT_TOP_N;

/// Turns grouping maps into ordered views.
///
/// All sorts are stable, so equal entries keep the order they arrive in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ranker {
    top_n: usize,
}

impl Default for Ranker {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_N)
    }
}

impl Ranker {
    /// Ranker truncating top views to `top_n` entries.
    #[must_use]
    pub const fn new(top_n: usize) -> Self {
        Self { top_n }
    }

    /// Truncation limit for top views.
    #[must_use]
    pub const fn top_n(&self) -> usize {
        self.top_n
    }

    /// Sorts descending by `sort`'s metric, then keeps the first `top_n`.
    #[must_use]
    pub fn rank<I>(&self, groups: I, sort: SortMode) -> Vec<AggregateGroup>
    where
        I: IntoIterator<Item = AggregateGroup>,
    {
        let mut ranked: Vec<AggregateGroup> = groups.into_iter().collect();
        ranked.sort_by(|a, b| b.metric(sort).cmp(&a.metric(sort)));
        ranked.truncate(self.top_n);
        ranked
    }

    /// All day groups, ascending by day, with [`UNKNOWN_DAY`] last.
    #[must_use]
    pub fn order_days<I>(&self, days: I) -> Vec<AggregateGroup>
    where
        I: IntoIterator<Item = AggregateGroup>,
    {
        let mut ordered: Vec<AggregateGroup> = days.into_iter().collect();
        ordered.sort_by(|a, b| {
            (a.key == UNKNOWN_DAY, &a.key).cmp(&(b.key == UNKNOWN_DAY, &b.key))
        });
        ordered
    }

    /// All skip entries, highest skip rate first.
    #[must_use]
    pub fn order_skip_rates<I>(&self, skips: I) -> Vec<SkipStat>
    where
        I: IntoIterator<Item = SkipStat>,
    {
        let mut ordered: Vec<SkipStat> = skips.into_iter().collect();
        ordered.sort_by(|a, b| b.skip_rate.total_cmp(&a.skip_rate));
        ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(key: &str, plays: u64, total_ms: u64) -> AggregateGroup {
        AggregateGroup {
            plays,
            total_ms,
            ..AggregateGroup::new(key, key, "")
        }
    }

    fn keys(groups: &[AggregateGroup]) -> Vec<&str> {
        groups.iter().map(|g| g.key.as_str()).collect()
    }

    #[test]
    fn test_rank_by_metric() {
        let groups = vec![group("a", 3, 300_000), group("b", 1, 900_000)];
        let ranker = Ranker::default();
        assert_eq!(keys(&ranker.rank(groups.clone(), SortMode::Duration)), ["b", "a"]);
        assert_eq!(keys(&ranker.rank(groups, SortMode::Plays)), ["a", "b"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let groups = vec![group("x", 1, 10), group("y", 2, 10), group("z", 1, 10)];
        let ranked = Ranker::default().rank(groups, SortMode::Duration);
        assert_eq!(keys(&ranked), ["x", "y", "z"]);
    }

    #[test]
    fn test_truncates_after_sorting() {
        let groups: Vec<_> = (0..30_u64).map(|i| group(&i.to_string(), i, i)).collect();
        let ranked = Ranker::new(20).rank(groups, SortMode::Plays);
        assert_eq!(ranked.len(), 20);
        assert_eq!(ranked[0].plays, 29);
        assert_eq!(ranked[19].plays, 10);
    }

    #[test]
    fn test_days_ascending_unknown_last() {
        let days = vec![
            group(UNKNOWN_DAY, 1, 1),
            group("2024-02-01", 1, 1),
            group("2023-12-31", 1, 1),
        ];
        let ordered = Ranker::default().order_days(days);
        assert_eq!(keys(&ordered), ["2023-12-31", "2024-02-01", UNKNOWN_DAY]);
    }

    #[test]
    fn test_skip_rates_descending() {
        let stat = |key: &str, skip_rate: f64| SkipStat {
            skip_rate,
            ..SkipStat::new(key, key)
        };
        let ordered =
            Ranker::default().order_skip_rates(vec![stat("a", 0.25), stat("b", 1.0), stat("c", 0.5)]);
        let order: Vec<_> = ordered.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(order, ["b", "c", "a"]);
    }
}
