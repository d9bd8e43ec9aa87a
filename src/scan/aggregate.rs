// src/scan/aggregate.rs
// =============================================================================
// Merges every worker's result into one deduplicated set.
//
// There is exactly one owner of the set: the task that drains the pool's
// result stream. Workers never touch it, so no lock is needed and no insert
// can be lost.
// =============================================================================

use futures::stream::{Stream, StreamExt};
use std::collections::BTreeSet;

// What one worker produced for one domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskResult {
    pub domain: String,
    /// In the order the extractor found them; may be empty
    pub subdomains: Vec<String>,
}

impl TaskResult {
    pub fn empty(domain: String) -> Self {
        Self {
            domain,
            subdomains: Vec::new(),
        }
    }
}

// Unique subdomains across all domains
//
// A BTreeSet keeps the output file sorted, which makes runs easy to diff.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateSet {
    subdomains: BTreeSet<String>,
    /// Domains that contributed nothing
    empty_domains: usize,
}

impl AggregateSet {
    // Adds one task's findings; returns how many were new
    pub fn merge(&mut self, result: TaskResult) -> usize {
        if result.subdomains.is_empty() {
            self.empty_domains += 1;
        }

        result
            .subdomains
            .into_iter()
            .filter(|s| !s.is_empty())
            .filter(|s| self.subdomains.insert(s.clone()))
            .count()
    }

    pub fn len(&self) -> usize {
        self.subdomains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subdomains.is_empty()
    }

    pub fn empty_domains(&self) -> usize {
        self.empty_domains
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.subdomains.iter().map(String::as_str)
    }
}

// Drains the result stream into a single set
//
// Only returns once every task has reported, so callers never see a
// half-built set.
pub async fn aggregate<S>(results: S) -> AggregateSet
where
    S: Stream<Item = TaskResult>,
{
    results
        .fold(AggregateSet::default(), |mut set, result| async move {
            let domain = result.domain.clone();
            let found = result.subdomains.len();
            let new = set.merge(result);
            tracing::info!(%domain, found, new, total = set.len(), "domain finished");
            set
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn task(domain: &str, subdomains: &[&str]) -> TaskResult {
        TaskResult {
            domain: domain.to_string(),
            subdomains: subdomains.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_merge_deduplicates() {
        let mut set = AggregateSet::default();
        assert_eq!(set.merge(task("a.com", &["www.a.com", "api.a.com", "www.a.com"])), 2);
        assert_eq!(set.merge(task("b.com", &["api.a.com", "www.b.com"])), 1);

        let all: Vec<_> = set.iter().collect();
        assert_eq!(all, vec!["api.a.com", "www.a.com", "www.b.com"]);
    }

    #[test]
    fn test_merge_ignores_empty_strings() {
        let mut set = AggregateSet::default();
        set.merge(task("a.com", &["", "www.a.com"]));
        assert_eq!(set.len(), 1);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["www.a.com"]);
    }

    #[test]
    fn test_empty_results_are_counted() {
        let mut set = AggregateSet::default();
        set.merge(TaskResult::empty("dead.com".to_string()));
        set.merge(task("a.com", &["www.a.com"]));
        assert_eq!(set.empty_domains(), 1);
        assert_eq!(set.len(), 1);
    }

    #[tokio::test]
    async fn test_aggregate_is_order_independent() {
        let forward = vec![
            task("a.com", &["x.a.com", "shared.com"]),
            task("b.com", &["y.b.com", "shared.com"]),
        ];
        let mut backward = forward.clone();
        backward.reverse();

        let one = aggregate(stream::iter(forward)).await;
        let two = aggregate(stream::iter(backward)).await;

        assert_eq!(one, two);
        assert_eq!(one.len(), 3);
    }
}
