//! Graph computations over the resolved relation.
//!
//! Weight aggregation and epic reachability walk the per-issue edge sets
//! directly; the petgraph view exists for whole-graph questions (is the
//! mined relation cyclic, and where). Edge direction in the petgraph view
//! follows the dependent -> dependency convention: an edge from A to B
//! means A depends on B.

use super::IssueCollection;
use crate::domain::IssueUrl;
use crate::error::{Error, Result};
use petgraph::algo::tarjan_scc;
use petgraph::graph::DiGraph;
use std::collections::{BTreeSet, HashMap};

impl IssueCollection {
    /// Recursively aggregated cost of an issue.
    ///
    /// `weight(i) = (base_weight(i) + sum of weight(d) for d in blocks(i))
    /// * weight_multiplier_chain(i)`, aggregating over the de-duplicated
    /// `blocks` set. The value is recomputed on every call; callers that
    /// need performance over a stable collection must memoize externally.
    ///
    /// An issue reachable through two distinct direct neighbors counts once
    /// per neighbor; de-duplication applies to each node's own `blocks`
    /// set, not to the whole traversal.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DependencyCycle`] when the `blocks` relation loops
    /// back into the current recursion path, and [`Error::IssueNotFound`]
    /// when an edge references a URL missing from the collection.
    pub fn weight(&self, url: &IssueUrl) -> Result<i64> {
        self.weight_on_path(url, &mut Vec::new())
    }

    /// Multiplier chain of an issue: its own multiplier times the chain of
    /// everything it blocks.
    ///
    /// # Errors
    ///
    /// Same conditions as [`weight`](Self::weight).
    pub fn weight_multiplier_chain(&self, url: &IssueUrl) -> Result<i64> {
        self.multiplier_on_path(url, &mut Vec::new())
    }

    fn weight_on_path(&self, url: &IssueUrl, path: &mut Vec<IssueUrl>) -> Result<i64> {
        if path.contains(url) {
            return Err(Error::DependencyCycle(url.clone()));
        }
        let issue = self
            .issues
            .get(url)
            .ok_or_else(|| Error::IssueNotFound(url.clone()))?;

        path.push(url.clone());
        let mut total = issue.base_weight;
        for blocked in &issue.blocks {
            total += self.weight_on_path(blocked, path)?;
        }
        path.pop();

        Ok(total * self.multiplier_on_path(url, &mut Vec::new())?)
    }

    fn multiplier_on_path(&self, url: &IssueUrl, path: &mut Vec<IssueUrl>) -> Result<i64> {
        if path.contains(url) {
            return Err(Error::DependencyCycle(url.clone()));
        }
        let issue = self
            .issues
            .get(url)
            .ok_or_else(|| Error::IssueNotFound(url.clone()))?;

        path.push(url.clone());
        let mut multiplier = issue.weight_multiplier;
        for blocked in &issue.blocks {
            multiplier *= self.multiplier_on_path(blocked, path)?;
        }
        path.pop();

        Ok(multiplier)
    }

    /// True when the issue transitively blocks an epic-labeled issue.
    pub(super) fn reaches_epic_via_blocks(&self, start: &IssueUrl, epic_label: &str) -> bool {
        self.reaches_epic(start, epic_label, |issue| &issue.blocks)
    }

    /// True when the issue transitively depends on an epic-labeled issue.
    pub(super) fn reaches_epic_via_depends_on(&self, start: &IssueUrl, epic_label: &str) -> bool {
        self.reaches_epic(start, epic_label, |issue| &issue.depends_on)
    }

    /// Reachability query with a visited set, so cyclic relations
    /// terminate. The start issue itself does not count; only issues
    /// reached over at least one edge do.
    fn reaches_epic<'a, F>(&'a self, start: &IssueUrl, epic_label: &str, neighbors: F) -> bool
    where
        F: Fn(&'a crate::domain::Issue) -> &'a BTreeSet<IssueUrl>,
    {
        let mut visited = BTreeSet::new();
        let mut stack: Vec<IssueUrl> = match self.issues.get(start) {
            Some(issue) => neighbors(issue).iter().cloned().collect(),
            None => return false,
        };

        while let Some(url) = stack.pop() {
            if !visited.insert(url.clone()) {
                continue;
            }
            let Some(issue) = self.issues.get(&url) else {
                continue;
            };
            if issue.is_epic(epic_label) {
                return true;
            }
            stack.extend(neighbors(issue).iter().cloned());
        }
        false
    }

    /// Finds a cycle in the resolved relation, if any.
    ///
    /// Returns the members of the first strongly connected component with
    /// more than one node, sorted by URL. Callers can use this to surface
    /// cyclic input before asking for weights.
    #[must_use]
    pub fn find_cycle(&self) -> Option<Vec<IssueUrl>> {
        let graph = self.relation_graph();
        for scc in tarjan_scc(&graph) {
            if scc.len() > 1 {
                let mut cycle: Vec<IssueUrl> =
                    scc.into_iter().map(|index| graph[index].clone()).collect();
                cycle.sort();
                return Some(cycle);
            }
        }
        None
    }

    /// Builds the petgraph view of the resolved relation.
    fn relation_graph(&self) -> DiGraph<IssueUrl, ()> {
        let mut graph = DiGraph::new();
        let mut node_map = HashMap::new();
        for url in self.issues.keys() {
            let index = graph.add_node(url.clone());
            node_map.insert(url.clone(), index);
        }
        for issue in self.issues.values() {
            for dependency in &issue.depends_on {
                if let (Some(&from), Some(&to)) =
                    (node_map.get(&issue.url), node_map.get(dependency))
                {
                    graph.add_edge(from, to, ());
                }
            }
        }
        graph
    }
}
