//! The issue registry and its graph-level operations.
//!
//! [`IssueCollection`] owns every issue of a resolution pass, keyed by URL.
//! Relation edges are URL references into the registry, never copies, so a
//! derived-field mutation is visible through every edge that points at the
//! issue. The `BTreeMap` key order doubles as the deterministic iteration
//! order required for stable output.
//!
//! # Pass ordering
//!
//! Resolution is a pipeline of explicit passes (see [`resolve`]): reset,
//! directive application, hiding, epic-linkage closure. Hiding must precede
//! the closure pass because hidden issues never count as epic-linked; the
//! pipeline encodes that ordering as a contract instead of implicit call
//! order.

mod graph;
mod resolve;

use crate::domain::{Issue, IssueUrl, RawIssue};
use crate::error::Error;
use std::collections::BTreeMap;

/// An owned registry of issues keyed by their tracker URL.
///
/// Built once per resolution pass by merging fetch batches, then resolved
/// and rendered. Not safe for concurrent mutation; concurrent fetch sources
/// must serialize their batches through a single writer (see
/// [`crate::source::drain_batches`]).
#[derive(Debug, Clone, Default)]
pub struct IssueCollection {
    issues: BTreeMap<IssueUrl, Issue>,
}

impl IssueCollection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a collection from a persisted snapshot.
    ///
    /// Later records win when a snapshot contains the same URL twice, the
    /// same overwrite rule [`insert`](Self::insert) applies to batches.
    #[must_use]
    pub fn from_snapshot(issues: Vec<Issue>) -> Self {
        let mut collection = Self::new();
        for issue in issues {
            collection.insert(issue);
        }
        collection
    }

    /// Clones the collection into snapshot order (lexicographic by URL).
    ///
    /// Every derived field is included, so a round-trip through persistence
    /// needs no re-resolution.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Issue> {
        self.issues.values().cloned().collect()
    }

    /// Inserts an issue, overwriting any previous issue with the same URL.
    ///
    /// Overwrite-by-key is what makes batch re-delivery from fetch
    /// collaborators idempotent.
    pub fn insert(&mut self, issue: Issue) {
        self.issues.insert(issue.url.clone(), issue);
    }

    /// Normalizes and merges one batch of raw provider records.
    ///
    /// Malformed records (missing required fields) are skipped and logged;
    /// the returned list reports them to the caller. The rest of the batch
    /// is merged regardless.
    pub fn merge_batch(&mut self, batch: Vec<RawIssue>) -> Vec<Error> {
        let mut rejected = Vec::new();
        for raw in batch {
            match raw.normalize() {
                Ok(issue) => self.insert(issue),
                Err(err) => {
                    tracing::warn!(error = %err, "skipping malformed provider record");
                    rejected.push(err);
                }
            }
        }
        rejected
    }

    /// Looks up an issue by URL.
    #[must_use]
    pub fn get(&self, url: &IssueUrl) -> Option<&Issue> {
        self.issues.get(url)
    }

    /// Number of issues in the collection.
    #[must_use]
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// True when the collection holds no issues.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Iterates issues in URL order.
    pub fn iter(&self) -> impl Iterator<Item = &Issue> {
        self.issues.values()
    }

    /// Marks every closed issue hidden. Idempotent.
    pub fn hide_closed(&mut self) {
        for issue in self.issues.values_mut() {
            if issue.is_closed() {
                issue.hidden = true;
            }
        }
    }

    /// Marks every orphan or epic-unlinked issue hidden. Idempotent.
    pub fn hide_orphans(&mut self) {
        for issue in self.issues.values_mut() {
            if issue.is_orphan || !issue.linked_with_epic {
                issue.hidden = true;
            }
        }
    }

    /// True when any visible issue is still an orphan.
    #[must_use]
    pub fn has_orphans(&self) -> bool {
        self.issues
            .values()
            .any(|issue| !issue.hidden && issue.is_orphan)
    }

    /// True when any visible issue participates in the graph and is
    /// epic-linked.
    #[must_use]
    pub fn has_non_orphans(&self) -> bool {
        self.issues
            .values()
            .any(|issue| !issue.hidden && !issue.is_orphan && issue.linked_with_epic)
    }
}


#[cfg(test)]
mod tests {
    use super::testutil::{issue, url_of};
    use super::*;
    use crate::domain::{IssueState, RawIssue};
    use crate::domain::provider::RawGitHubIssue;

    #[test]
    fn insert_overwrites_by_url() {
        let mut collection = IssueCollection::new();
        collection.insert(issue(1, "first delivery"));
        collection.insert(issue(1, "second delivery"));

        assert_eq!(collection.len(), 1);
        assert_eq!(
            collection.get(&url_of(1)).map(|i| i.body.as_str()),
            Some("second delivery")
        );
    }

    #[test]
    fn iteration_is_lexicographic_by_url() {
        let mut collection = IssueCollection::new();
        collection.insert(issue(10, ""));
        collection.insert(issue(2, ""));
        collection.insert(issue(1, ""));

        let urls: Vec<String> = collection.iter().map(|i| i.url.to_string()).collect();
        let mut sorted = urls.clone();
        sorted.sort();
        assert_eq!(urls, sorted);
    }

    #[test]
    fn merge_batch_skips_malformed_records() {
        let mut collection = IssueCollection::new();
        let good = RawGitHubIssue {
            number: Some(1),
            title: Some("ok".to_string()),
            state: Some("open".to_string()),
            html_url: Some("https://github.com/acme/widgets/issues/1".to_string()),
            repository_url: Some("https://api.github.com/repos/acme/widgets".to_string()),
            ..RawGitHubIssue::default()
        };
        let bad = RawGitHubIssue {
            number: Some(2),
            ..RawGitHubIssue::default()
        };

        let rejected =
            collection.merge_batch(vec![RawIssue::GitHub(good), RawIssue::GitHub(bad)]);

        assert_eq!(collection.len(), 1);
        assert_eq!(rejected.len(), 1);
    }

    #[test]
    fn hide_closed_is_idempotent() {
        let mut collection = IssueCollection::new();
        let mut closed = issue(1, "");
        closed.state = IssueState::Closed;
        collection.insert(closed);
        collection.insert(issue(2, ""));

        collection.hide_closed();
        collection.hide_closed();

        assert!(collection.get(&url_of(1)).is_some_and(|i| i.hidden));
        assert!(collection.get(&url_of(2)).is_some_and(|i| !i.hidden));
    }

    #[test]
    fn emptiness_queries_ignore_hidden_issues() {
        let mut collection = IssueCollection::new();
        let mut hidden_orphan = issue(1, "");
        hidden_orphan.hidden = true;
        collection.insert(hidden_orphan);

        assert!(!collection.has_orphans());
        assert!(!collection.has_non_orphans());
    }

    #[test]
    fn snapshot_round_trips_derived_state() {
        let mut collection = IssueCollection::new();
        let mut resolved = issue(1, "");
        resolved.is_orphan = false;
        resolved.base_weight = 3;
        resolved.blocks.insert(url_of(2));
        collection.insert(resolved);
        collection.insert(issue(2, ""));

        let restored = IssueCollection::from_snapshot(collection.snapshot());

        let restored_issue = restored.get(&url_of(1)).unwrap();
        assert!(!restored_issue.is_orphan);
        assert_eq!(restored_issue.base_weight, 3);
        assert!(restored_issue.blocks.contains(&url_of(2)));
    }
}
