use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{to_hundredths, AnalyzedResult};
use super::grading::GradingMethod;

/// How equal metrics share ranks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingPolicy {
    /// Ties share a rank and the next distinct value skips ahead (1, 1, 3).
    #[default]
    Competition,
    /// Ties share a rank and the next distinct value follows on (1, 1, 2).
    Dense,
}

impl RankingPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "competition" | "standard" => Some(Self::Competition),
            "dense" => Some(Self::Dense),
            _ => None,
        }
    }
}

/// Comparison group a rank is computed within.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankScope {
    /// Every student of a form.
    Overall,
    /// Students sharing a form and stream.
    Stream,
}

/// Orders a scoped batch by the active grading metric and assigns ranks.
#[derive(Debug, Clone, Copy)]
pub struct RankingEngine {
    method: GradingMethod,
    policy: RankingPolicy,
}

impl RankingEngine {
    pub fn new(method: GradingMethod, policy: RankingPolicy) -> Self {
        Self { method, policy }
    }

    /// Annotate every result of one scope with its rank for `scope`.
    ///
    /// The batch comes back ordered best first, ties ordered by admission
    /// number. Ranks held for the other scope are left untouched.
    pub fn rank(&self, results: Vec<AnalyzedResult>, scope: RankScope) -> Vec<AnalyzedResult> {
        if results.is_empty() {
            debug!(?scope, "ranking skipped for empty scope");
            return results;
        }

        let method = self.method;
        let mut ordered = results;
        ordered.sort_by(|a, b| {
            to_hundredths(b.metric(method))
                .cmp(&to_hundredths(a.metric(method)))
                .then_with(|| a.admission_number.cmp(&b.admission_number))
        });

        let metrics: Vec<i64> = ordered
            .iter()
            .map(|result| to_hundredths(result.metric(method)))
            .collect();
        let ranks = assign_ranks(&metrics, self.policy);

        for (result, rank) in ordered.iter_mut().zip(ranks) {
            match scope {
                RankScope::Overall => result.overall_rank = Some(rank),
                RankScope::Stream => result.stream_rank = Some(rank),
            }
        }

        ordered
    }
}

/// Ranks for metrics, in hundredths, already sorted in descending order.
pub(crate) fn assign_ranks(sorted_metrics: &[i64], policy: RankingPolicy) -> Vec<u32> {
    let mut ranks = Vec::with_capacity(sorted_metrics.len());
    let mut current: u32 = 0;

    for (index, metric) in sorted_metrics.iter().enumerate() {
        let tied = index > 0 && sorted_metrics[index - 1] == *metric;
        if !tied {
            current = match policy {
                RankingPolicy::Competition => index as u32 + 1,
                RankingPolicy::Dense => current + 1,
            };
        }
        ranks.push(current);
    }

    ranks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn competition_ranking_skips_after_ties() {
        assert_eq!(
            assign_ranks(&[50_000, 50_000, 48_000], RankingPolicy::Competition),
            vec![1, 1, 3]
        );
        assert_eq!(
            assign_ranks(&[9_000, 8_000, 8_000, 8_000, 1_000], RankingPolicy::Competition),
            vec![1, 2, 2, 2, 5]
        );
    }

    #[test]
    fn dense_ranking_does_not_skip() {
        assert_eq!(
            assign_ranks(&[50_000, 50_000, 48_000], RankingPolicy::Dense),
            vec![1, 1, 2]
        );
    }

    #[test]
    fn empty_metrics_produce_no_ranks() {
        assert!(assign_ranks(&[], RankingPolicy::Competition).is_empty());
    }

    #[test]
    fn parses_policy_names() {
        assert_eq!(RankingPolicy::parse("Dense"), Some(RankingPolicy::Dense));
        assert_eq!(
            RankingPolicy::parse("standard"),
            Some(RankingPolicy::Competition)
        );
        assert_eq!(RankingPolicy::parse("fractional"), None);
    }
}
